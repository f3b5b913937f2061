use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use minus::Pager;
use std::process::ExitCode;
use twig::areas::repository::Repository;
use twig::artifacts::core::PagerWriter;
use twig::artifacts::core::config::Config;
use twig::errors::{ErrorKind, TwigError};

const LOG_FILTER_VAR: &str = "TWIG_LOG";

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small content-addressed version-control system",
    long_about = "twig tracks snapshots of a directory as commits, keeps branches \
    pointing at them, and merges divergent branches with a three-way merge.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create a new repository in the current directory",
        long_about = "This command creates the .twig directory with an initial commit \
        that the master branch points to."
    )]
    Init,
    #[command(name = "add", about = "Stage the current content of a file")]
    Add {
        #[arg(index = 1)]
        path: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or stage its removal",
        long_about = "This command unstages a file staged for addition. A tracked file is \
        staged for removal and deleted from the working directory if it is unchanged."
    )]
    Rm {
        #[arg(index = 1)]
        path: String,
    },
    #[command(name = "commit", about = "Record the staged changes")]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the IDs of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and local changes")]
    Status,
    #[command(
        name = "checkout",
        about = "Restore a file or switch branches",
        long_about = "This command takes one of three forms:\n\
        twig checkout -- <file>            restore a file from the current head\n\
        twig checkout <commit> -- <file>   restore a file from a commit\n\
        twig checkout <branch>             switch to a branch"
    )]
    Checkout {
        #[arg(index = 1, help = "A commit ID (prefix) or a branch name")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        path: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current head")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Check out a commit and move the current branch to it"
    )]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_FILTER_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            match error.downcast_ref::<TwigError>().map(TwigError::kind) {
                Some(ErrorKind::Usage) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    let config = Config::load_from_env()?;
    let pwd = std::env::current_dir()?;

    let pager = (matches!(command, Commands::Log | Commands::GlobalLog)
        && !config.no_pager()
        && std::io::stdout().is_terminal())
    .then(Pager::new);
    let writer: Box<dyn std::io::Write> = match &pager {
        Some(pager) => Box::new(PagerWriter::new(pager.clone())),
        None => Box::new(std::io::stdout()),
    };

    let mut repository = Repository::new(&pwd.to_string_lossy(), writer, config)?;

    match command {
        Commands::Init => repository.init()?,
        Commands::Add { path } => repository.add(&path)?,
        Commands::Rm { path } => repository.rm(&path)?,
        Commands::Commit { message } => repository.commit(&message)?,
        Commands::Log => repository.log()?,
        Commands::GlobalLog => repository.global_log()?,
        Commands::Find { message } => repository.find(&message)?,
        Commands::Status => repository.status()?,
        Commands::Checkout { target, path } => match (target, path) {
            (None, Some(path)) => repository.checkout_file(&path)?,
            (Some(commit), Some(path)) => repository.checkout_commit_file(&commit, &path)?,
            (Some(branch), None) => repository.checkout_branch(&branch)?,
            (None, None) => {
                return Err(TwigError::Usage(
                    "Usage: twig checkout (-- <file> | <commit> -- <file> | <branch>)".to_string(),
                )
                .into());
            }
        },
        Commands::Branch { name } => repository.branch(&name)?,
        Commands::RmBranch { name } => repository.remove_branch(&name)?,
        Commands::Reset { commit } => repository.reset(&commit)?,
        Commands::Merge { branch } => repository.merge(&branch)?,
    }

    drop(repository);
    if let Some(pager) = pager {
        minus::page_all(pager)?;
    }

    Ok(())
}
