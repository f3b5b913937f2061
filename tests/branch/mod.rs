mod create_branch_at_current_head;
mod create_duplicate_branch;
mod delete_branch;
