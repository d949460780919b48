pub mod app;
pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::app::App;
use crate::cli::commission::CommissionArgs;
use crate::cli::salary::SalaryArgs;
use crate::cli::settings::SettingsCommand;
use crate::cli::transactions::TransactionsCommand;
use crate::cli::ui;
use crate::core::AuthProvider;
use crate::core::config::AppConfig;
use crate::providers::GoTrueProvider;
use anyhow::{Result, anyhow};
use chrono::Local;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Login {
        email: String,
        password: Option<String>,
    },
    Logout,
    Whoami,
    Dashboard,
    Transactions(TransactionsCommand),
    Salary(SalaryArgs),
    Commission(CommissionArgs),
    Settings(SettingsCommand),
}

impl AppCommand {
    fn needs_data(&self) -> bool {
        !matches!(
            self,
            AppCommand::Login { .. } | AppCommand::Logout | AppCommand::Whoami
        )
    }
}

pub async fn run_command(cmd: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Pocketbook starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    run_with_config(cmd, config).await
}

/// Runs a command against an already loaded configuration.
pub async fn run_with_config(cmd: AppCommand, config: AppConfig) -> Result<()> {
    let mut app = App::from_config(config)?;
    let today = Local::now().date_naive();

    if cmd.needs_data() {
        if app.user.is_none() {
            warn!("Not signed in, nothing will be loaded or saved");
        }
        let pb = ui::new_spinner("Loading...");
        app.load().await;
        pb.finish_and_clear();
    }

    match cmd {
        AppCommand::Login { email, password } => {
            let credentials = app
                .credentials
                .as_ref()
                .ok_or_else(|| anyhow!("Backend is not configured, run `pocketbook setup`"))?;
            let provider = GoTrueProvider::new(credentials)?;
            cli::session::login(&provider, &app.sessions, &email, password).await?;
        }
        AppCommand::Logout => {
            let provider = match &app.credentials {
                Some(credentials) => Some(GoTrueProvider::new(credentials)?),
                None => None,
            };
            cli::session::logout(
                provider.as_ref().map(|p| p as &dyn AuthProvider),
                &app.sessions,
            )
            .await?;
        }
        AppCommand::Whoami => println!("{}", cli::session::whoami(app.user.as_ref())),
        AppCommand::Dashboard => {
            cli::dashboard::run(app.transactions.transactions(), &app.config.currency, today)
        }
        AppCommand::Transactions(command) => {
            cli::transactions::run(command, &mut app.transactions, &app.config.currency, today)
                .await?
        }
        AppCommand::Salary(args) => {
            cli::salary::run(&args, app.settings.settings(), app.currency())
        }
        AppCommand::Commission(args) => {
            cli::commission::run(&args, app.settings.settings(), app.currency())
        }
        AppCommand::Settings(command) => cli::settings::run(command, &mut app.settings).await?,
    }
    Ok(())
}
