mod checkout_file_from_commit;
mod checkout_with_untracked_conflicts;
