use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use pocketbook::cli::commission::CommissionArgs;
use pocketbook::cli::salary::SalaryArgs;
use pocketbook::cli::settings::SettingsCommand;
use pocketbook::cli::setup::setup;
use pocketbook::cli::transactions::TransactionsCommand;
use pocketbook::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for pocketbook::AppCommand {
    fn from(cmd: Commands) -> pocketbook::AppCommand {
        match cmd {
            Commands::Login { email, password } => {
                pocketbook::AppCommand::Login { email, password }
            }
            Commands::Logout => pocketbook::AppCommand::Logout,
            Commands::Whoami => pocketbook::AppCommand::Whoami,
            Commands::Dashboard => pocketbook::AppCommand::Dashboard,
            Commands::Transactions { command } => pocketbook::AppCommand::Transactions(command),
            Commands::Salary(args) => pocketbook::AppCommand::Salary(args),
            Commands::Commission(args) => pocketbook::AppCommand::Commission(args),
            Commands::Settings { command } => pocketbook::AppCommand::Settings(command),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        /// Read from the terminal when omitted
        #[arg(long, hide = true)]
        password: Option<String>,
    },
    /// Sign out and forget the local session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Display balances and recent transactions
    Dashboard,
    /// List and manage transactions
    Transactions {
        #[command(subcommand)]
        command: TransactionsCommand,
    },
    /// Calculate net salary after deductions
    Salary(SalaryArgs),
    /// Calculate commission on a base value
    Commission(CommissionArgs),
    /// Show or change deduction and commission rates
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => pocketbook::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
