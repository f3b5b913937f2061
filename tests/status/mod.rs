mod print_every_section_in_name_order;
