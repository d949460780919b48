use super::ui;
use crate::core::auth::{AuthProvider, SessionManager, User};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Signs in with email and password and stores the session locally.
///
/// The password is read from the terminal without echo when not supplied.
pub async fn login(
    provider: &dyn AuthProvider,
    sessions: &SessionManager,
    email: &str,
    password: Option<String>,
) -> Result<User> {
    let password = match password {
        Some(password) => password,
        None => {
            let term = console::Term::stdout();
            term.write_str("Password: ")?;
            term.read_secure_line().context("Failed to read password")?
        }
    };

    let pb = ui::new_spinner("Signing in...");
    let result = provider.sign_in(email.trim(), &password).await;
    pb.finish_and_clear();

    let session = result?;
    sessions.save(&session)?;
    info!(user_id = %session.user.id, "Signed in");
    println!(
        "Signed in as {}",
        ui::style_text(session.user.display_name(), ui::StyleType::TotalLabel)
    );
    Ok(session.user)
}

/// Ends the session. The remote sign-out is best effort, the local session
/// is always removed.
pub async fn logout(provider: Option<&dyn AuthProvider>, sessions: &SessionManager) -> Result<()> {
    let Some(session) = sessions.current() else {
        println!("Not signed in");
        return sessions.clear();
    };

    if let Some(provider) = provider
        && let Err(e) = provider.sign_out(&session).await
    {
        warn!(error = %e, "Remote sign-out failed, clearing local session anyway");
    }
    sessions.clear()?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(user: Option<&User>) -> String {
    match user {
        Some(user) => {
            let mut output = format!(
                "Signed in as {}",
                ui::style_text(user.display_name(), ui::StyleType::TotalLabel)
            );
            if let Some(email) = &user.email {
                output.push_str(&format!(" <{email}>"));
            }
            output
        }
        None => ui::style_text(
            "Not signed in. Run `pocketbook login --email <email>` first.",
            ui::StyleType::Subtle,
        ),
    }
}
