//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// FRA - Track forest-rights claims through review and map their boundaries.
#[derive(Debug, Parser)]
#[command(name = "fra")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Claims database path (overrides the configuration file)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Session token identifying the acting officer
    #[arg(short, long, global = true, env = "FRA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// File a new claim
    Submit(SubmitArgs),

    /// Show a claim with its boundary summary
    Show(ClaimArgs),

    /// Show a claim's review history
    History(ClaimArgs),

    /// List claims
    List(ListArgs),

    /// List claims waiting on the current officer
    Pending,

    /// Apply a workflow action to a claim
    Act(ActArgs),

    /// Manage a claim's mapped boundary
    Boundary(BoundaryArgs),
}

/// Arguments for the submit command.
#[derive(Debug, Parser)]
pub struct SubmitArgs {
    /// Applicant name
    #[arg(long)]
    pub name: String,

    /// Contact number or address
    #[arg(long, default_value = "")]
    pub contact: String,

    /// Identity document number
    #[arg(long, default_value = "")]
    pub identity: String,

    /// Village
    #[arg(long, default_value = "")]
    pub village: String,

    /// Gram Panchayat
    #[arg(long)]
    pub gram_panchayat: String,

    /// Tehsil
    #[arg(long, default_value = "")]
    pub tehsil: String,

    /// District
    #[arg(long)]
    pub district: String,

    /// State
    #[arg(long, default_value = "")]
    pub state: String,

    /// Claim type
    #[arg(long, value_enum, default_value = "individual")]
    pub claim_type: ClaimTypeArg,

    /// Declared area, in the given unit
    #[arg(long)]
    pub area: f64,

    /// Unit of the declared area
    #[arg(long, value_enum, default_value = "hectares")]
    pub unit: AreaUnitArg,

    /// Description of the land
    #[arg(long, default_value = "")]
    pub description: String,

    /// Forest compartment number
    #[arg(long)]
    pub compartment: Option<String>,
}

/// Arguments for commands that take a single claim ID.
#[derive(Debug, Parser)]
pub struct ClaimArgs {
    /// Claim ID
    pub id: String,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Only claims in these statuses (repeatable)
    #[arg(short, long)]
    pub status: Vec<String>,

    /// Filter by state
    #[arg(long)]
    pub state: Option<String>,

    /// Filter by district
    #[arg(long)]
    pub district: Option<String>,

    /// Filter by tehsil
    #[arg(long)]
    pub tehsil: Option<String>,

    /// Filter by Gram Panchayat
    #[arg(long)]
    pub gram_panchayat: Option<String>,

    /// Filter by claim type
    #[arg(long, value_enum)]
    pub claim_type: Option<ClaimTypeArg>,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the act command.
#[derive(Debug, Parser)]
pub struct ActArgs {
    /// Claim ID
    pub id: String,

    /// Action (verify, save-map, forward, begin-review, approve, reject)
    pub action: String,

    /// Remarks recorded with the action
    #[arg(short, long, default_value = "")]
    pub remarks: String,
}

/// Arguments for boundary management.
#[derive(Debug, Parser)]
pub struct BoundaryArgs {
    #[command(subcommand)]
    pub action: BoundaryAction,
}

/// Boundary management actions.
#[derive(Debug, Subcommand)]
pub enum BoundaryAction {
    /// Replace a claim's boundary with shapes from a JSON document
    Save {
        /// Claim ID
        id: String,
        /// JSON file containing the shapes
        #[arg(long)]
        file: Option<String>,
        /// Read the shapes from stdin
        #[arg(long)]
        stdin: bool,
    },

    /// Show a claim's boundary
    Show {
        /// Claim ID
        id: String,
    },

    /// Remove a claim's boundary
    Clear {
        /// Claim ID
        id: String,
    },
}

/// Claim type argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ClaimTypeArg {
    /// Individual forest right
    Individual,
    /// Community forest right
    Community,
}

/// Area unit argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum AreaUnitArg {
    /// Hectares
    Hectares,
    /// Acres
    Acres,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<ClaimTypeArg> for fra_domain::ClaimType {
    fn from(claim_type: ClaimTypeArg) -> Self {
        match claim_type {
            ClaimTypeArg::Individual => fra_domain::ClaimType::Individual,
            ClaimTypeArg::Community => fra_domain::ClaimType::Community,
        }
    }
}

impl From<AreaUnitArg> for fra_domain::AreaUnit {
    fn from(unit: AreaUnitArg) -> Self {
        match unit {
            AreaUnitArg::Hectares => fra_domain::AreaUnit::Hectares,
            AreaUnitArg::Acres => fra_domain::AreaUnit::Acres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_command() {
        let cli = Cli::parse_from([
            "fra",
            "submit",
            "--name",
            "Lalita Maravi",
            "--gram-panchayat",
            "Samnapur",
            "--district",
            "Dindori",
            "--area",
            "1.5",
            "--claim-type",
            "community",
        ]);
        match cli.command {
            Command::Submit(args) => {
                assert_eq!(args.name, "Lalita Maravi");
                assert_eq!(args.area, 1.5);
                assert!(matches!(args.claim_type, ClaimTypeArg::Community));
                assert!(matches!(args.unit, AreaUnitArg::Hectares));
            }
            _ => panic!("Expected Submit command"),
        }
    }

    #[test]
    fn test_act_command_with_global_token() {
        let cli = Cli::parse_from([
            "fra",
            "act",
            "abc",
            "forward",
            "--remarks",
            "Sabha resolution attached",
            "--token",
            "tok-1",
        ]);
        assert_eq!(cli.token.as_deref(), Some("tok-1"));
        match cli.command {
            Command::Act(args) => {
                assert_eq!(args.action, "forward");
                assert_eq!(args.remarks, "Sabha resolution attached");
            }
            _ => panic!("Expected Act command"),
        }
    }

    #[test]
    fn test_boundary_save_command() {
        let cli = Cli::parse_from(["fra", "boundary", "save", "abc", "--file", "plot.json"]);
        match cli.command {
            Command::Boundary(BoundaryArgs {
                action: BoundaryAction::Save { id, file, stdin },
            }) => {
                assert_eq!(id, "abc");
                assert_eq!(file.as_deref(), Some("plot.json"));
                assert!(!stdin);
            }
            _ => panic!("Expected Boundary Save command"),
        }
    }

    #[test]
    fn test_list_repeatable_status() {
        let cli = Cli::parse_from(["fra", "list", "-s", "submitted", "-s", "title_granted"]);
        match cli.command {
            Command::List(args) => assert_eq!(args.status.len(), 2),
            _ => panic!("Expected List command"),
        }
    }
}
