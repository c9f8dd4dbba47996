use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "longship")]
#[command(version)]
#[command(about = "Declaratively manage Longship webhooks", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file [default: ~/.config/longship/longship.toml]
    #[arg(long, global = true, env = "LONGSHIP_CONFIG")]
    pub config: Option<String>,

    /// State file [default: ~/.local/state/longship/state.toml]
    #[arg(long, global = true, env = "LONGSHIP_STATE")]
    pub state: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show what apply would change
    Plan(PlanArgs),

    /// Refresh state, then create, update and delete webhooks to match config
    Apply(ApplyArgs),

    /// Refresh state from the API and drop webhooks removed elsewhere
    Refresh,

    /// Adopt an existing webhook under a config address
    Import {
        /// Config address, e.g. `sessions` for `[webhooks.sessions]`
        address: String,
        /// Server id of the webhook
        id: String,
    },

    /// Delete every managed webhook
    Destroy(DestroyArgs),

    /// Inspect and edit the state file
    #[command(subcommand)]
    State(StateCommand),

    /// Read-only listings from the API
    #[command(subcommand)]
    Data(DataCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct PlanArgs {
    /// Limit to one resource, e.g. `webhook.sessions`
    #[arg(short, long)]
    pub target: Option<String>,

    /// Plan against stored state without refreshing it first
    #[arg(long)]
    pub no_refresh: bool,
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Show changes without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Limit to one resource, e.g. `webhook.sessions`
    #[arg(short, long)]
    pub target: Option<String>,

    /// Plan against stored state without refreshing it first
    #[arg(long)]
    pub no_refresh: bool,

    /// Stop at the first failed change
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Parser)]
pub struct DestroyArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Limit to one resource, e.g. `webhook.sessions`
    #[arg(short, long)]
    pub target: Option<String>,
}

#[derive(Subcommand)]
pub enum StateCommand {
    /// List managed addresses
    List,
    /// Show the stored attributes of one address
    Show {
        /// Config address
        address: String,
    },
    /// Forget an address without deleting the remote webhook
    Rm {
        /// Config address
        address: String,
    },
}

#[derive(Subcommand)]
pub enum DataCommand {
    /// List every webhook on the account
    Webhooks(DataArgs),
    /// List charge points with their EVSEs and connectors
    Chargepoints(DataArgs),
    /// List organizational units
    OrganizationalUnits(DataArgs),
}

#[derive(Parser)]
pub struct DataArgs {
    /// Print raw JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply_flags() {
        let cli = Cli::parse_from([
            "longship",
            "-vv",
            "apply",
            "--dry-run",
            "--yes",
            "--target",
            "webhook.sessions",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Apply(args) => {
                assert!(args.dry_run);
                assert!(args.yes);
                assert!(!args.no_refresh);
                assert_eq!(args.target.as_deref(), Some("webhook.sessions"));
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::parse_from(["longship", "--state", "/tmp/s.toml", "import", "sessions", "wh-1"]);
        assert_eq!(cli.state.as_deref(), Some("/tmp/s.toml"));
        match cli.command {
            Command::Import { address, id } => {
                assert_eq!(address, "sessions");
                assert_eq!(id, "wh-1");
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_parse_data_subcommand() {
        let cli = Cli::parse_from(["longship", "data", "organizational-units", "--json"]);
        assert!(matches!(cli.command, Command::Data(DataCommand::OrganizationalUnits(DataArgs { json: true }))));
    }
}
