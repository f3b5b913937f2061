mod find_commits_by_message;
mod global_log_lists_every_branch;
mod show_first_parent_history;
