mod commit_without_changes_fails;
