use anyhow::{Context, Result};
use castor::areas::config::Config;
use castor::areas::repository::Repository;
use castor::areas::runner::ProcessRunner;
use castor::artifacts::branch::branch_name::BranchName;
use castor::artifacts::checkpoint::checkpoint::PrTarget;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "CASTOR_LOG";

#[derive(Parser)]
#[command(
    name = "castor",
    version = "0.1.0",
    author = "Christian Gill",
    about = "Review pull requests without losing your work in progress",
    long_about = "Castor saves whatever you are working on as a temporary commit, \
    switches to the branch of the pull request under review and pulls it. \
    When the review is done, `castor back` returns to the original branch \
    and puts the saved changes back in the working tree.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        long = "token",
        global = true,
        value_name = "TOKEN",
        help = "API token to use instead of the saved one"
    )]
    api_token: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "review",
        about = "Save work in progress and switch to a pull request branch",
        long_about = "This command commits any uncommitted changes as a work-in-progress commit, \
        checks out the given branch and pulls it from `origin`. \
        If any step fails, the earlier steps are rolled back."
    )]
    Review {
        #[arg(index = 1, help = "The head branch of the pull request")]
        branch: BranchName,
    },
    #[command(
        name = "back",
        about = "Return to the original branch and restore work in progress",
        long_about = "This command checks out the branch the review started from \
        and, when its last commit is the work-in-progress commit, undoes it \
        so the saved changes are back in the working tree."
    )]
    Back {
        #[arg(short, long, help = "Go back to this branch instead of the recorded one")]
        branch: Option<BranchName>,
    },
    #[command(name = "status", about = "Show the review in progress, if any")]
    Status,
    #[command(
        name = "remote",
        about = "Print the owner and repository name of `origin`"
    )]
    Remote,
    #[command(
        name = "token",
        about = "Store the API token used to look up pull requests",
        long_about = "This command saves the token in the config file \
        (`~/.castor.json`, or the path in CASTOR_CONFIG), readable only by the current user. \
        The global `--token` flag takes precedence over the argument."
    )]
    Token {
        #[arg(index = 1, help = "The API token")]
        token: Option<String>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_repository(config: &Config) -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    let runner = ProcessRunner::new(pwd, config.git_timeout());

    Ok(Repository::new(Box::new(std::io::stdout()), Box::new(runner)))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();
    let config_path = Config::default_path()?;
    let mut config = Config::load(&config_path)?;
    if let Some(token) = &cli.api_token {
        config.token = Some(token.clone());
    }

    match cli.command {
        Commands::Review { branch } => {
            let repository = open_repository(&config)?;
            let outcome = repository.switch_to_pr(&PrTarget::new(branch)).await?;
            tracing::info!(
                origin = %outcome.checkpoint().origin_branch(),
                degraded = outcome.warning().is_some(),
                "review started"
            );
        }
        Commands::Back { branch } => {
            let repository = open_repository(&config)?;
            let outcome = repository.go_back(branch.as_ref()).await?;
            tracing::info!(
                branch = %outcome.branch,
                restored_marker = outcome.restored_marker,
                checkpoint_cleared = outcome.checkpoint_cleared,
                "review finished"
            );
        }
        Commands::Status => {
            let repository = open_repository(&config)?;
            repository.show_status().await?
        }
        Commands::Remote => {
            let repository = open_repository(&config)?;
            repository.show_remote().await?
        }
        Commands::Token { token } => {
            let token = cli.api_token.or(token).context("no token provided")?;
            let config = Config {
                token: Some(token),
                ..config
            };
            config.save(&config_path)?;
            println!("Token saved to {}", config_path.display());
        }
    }

    Ok(())
}
