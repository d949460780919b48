use crate::core::auth::{AuthProvider, Session, User};
use crate::core::config::SupabaseCredentials;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    user: GoTrueUser,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    full_name: Option<String>,
}

/// Email/password authentication against the project's GoTrue endpoint.
pub struct GoTrueProvider {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl GoTrueProvider {
    pub fn new(credentials: &SupabaseCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("pocketbook/0.1")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: credentials.base_url(),
            anon_key: credentials.anon_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl AuthProvider for GoTrueProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        debug!("Requesting token from {}", url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .context("Failed to send sign-in request")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to get response text")?;
        if !status.is_success() {
            return Err(anyhow!("Sign-in failed ({}): {}", status, response_text));
        }

        let token: TokenResponse = match serde_json::from_str(&response_text) {
            Ok(token) => token,
            Err(e) => {
                error!(error = ?e, "Failed to parse token response");
                return Err(e).context("Failed to parse token response");
            }
        };

        let expires_at = match (token.expires_at, token.expires_in) {
            (Some(ts), _) => Utc.timestamp_opt(ts, 0).single(),
            (None, Some(secs)) => Some(Utc::now() + Duration::seconds(secs)),
            (None, None) => None,
        };

        Ok(Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at,
            user: User {
                id: token.user.id,
                email: token.user.email,
                full_name: token.user.user_metadata.full_name,
            },
        })
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        debug!("Signing out at {}", url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", session.access_token))
            .send()
            .await
            .context("Failed to send sign-out request")?;

        if !response.status().is_success() {
            return Err(anyhow!("Sign-out failed with status {}", response.status()));
        }
        Ok(())
    }
}
