//! PostgREST-backed repositories for the hosted Supabase project.

use crate::core::config::SupabaseCredentials;
use crate::core::repository::{SettingsRepository, TransactionRepository};
use crate::core::settings::RateSettings;
use crate::core::transaction::{Transaction, TransactionDraft};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, error};

const TRANSACTIONS_TABLE: &str = "transactions";
const SETTINGS_TABLE: &str = "user_settings";

/// Media type asking PostgREST for exactly one object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// PostgREST code for "the result contains 0 rows" on a single-object request.
const NO_ROWS: &str = "PGRST116";

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// A non-success response from the REST endpoint.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: Option<String>,
    pub message: String,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({}): {}", self.status, code, self.message),
            None => write!(f, "{}: {}", self.status, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    async fn from_response(response: Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<PostgrestErrorBody>(&body) {
            Ok(parsed) => Self {
                status,
                code: parsed.code,
                message: parsed.message.unwrap_or(body),
            },
            Err(_) => Self {
                status,
                code: None,
                message: body,
            },
        }
    }

    pub fn is_no_rows(&self) -> bool {
        self.code.as_deref() == Some(NO_ROWS)
    }
}

#[derive(Serialize)]
struct TransactionRow<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    draft: &'a TransactionDraft,
}

#[derive(Serialize)]
struct SettingsRow<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    settings: &'a RateSettings,
}

pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

impl SupabaseClient {
    /// Requests are authorised with `access_token` when signed in, and with
    /// the anonymous key otherwise.
    pub fn new(credentials: &SupabaseCredentials, access_token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("pocketbook/0.1")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: credentials.base_url(),
            anon_key: credentials.anon_key.clone(),
            access_token,
            client,
        })
    }

    fn table_url(&self, table: &str, params: &[(&str, String)]) -> Result<Url> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        Url::parse_with_params(&url, params).with_context(|| format!("Invalid table URL: {url}"))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request
            .header("apikey", &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {bearer}"))
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {what}"))?;
        if response.status().is_success() {
            Ok(response)
        } else {
            let err = ApiError::from_response(response).await;
            Err(anyhow::Error::new(err).context(format!("Request to {what} failed")))
        }
    }

    async fn single_transaction(&self, response: Response) -> Result<Transaction> {
        let text = response
            .text()
            .await
            .context("Failed to get response text")?;
        serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, response = %text, "Failed to parse transaction row");
            anyhow::Error::new(e).context("Failed to parse transaction row")
        })
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl TransactionRepository for SupabaseClient {
    async fn list(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let url = self.table_url(
            TRANSACTIONS_TABLE,
            &[
                ("select", "*".to_string()),
                ("user_id", eq(user_id)),
                ("order", "date.desc".to_string()),
            ],
        )?;
        debug!("Requesting transactions from {}", url);

        let response = self.send(self.client.get(url), TRANSACTIONS_TABLE).await?;
        let text = response
            .text()
            .await
            .context("Failed to get response text")?;
        let rows: Vec<Transaction> = match serde_json::from_str(&text) {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = ?e, response = %text, "Failed to parse transactions");
                return Err(e).context("Failed to parse transactions");
            }
        };
        Ok(rows)
    }

    async fn insert(&self, user_id: &str, draft: &TransactionDraft) -> Result<Transaction> {
        let url = self.table_url(TRANSACTIONS_TABLE, &[("select", "*".to_string())])?;
        debug!("Inserting transaction into {}", url);

        let request = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(&TransactionRow { user_id, draft });
        let response = self.send(request, TRANSACTIONS_TABLE).await?;
        self.single_transaction(response).await
    }

    async fn update(
        &self,
        user_id: &str,
        id: &str,
        draft: &TransactionDraft,
    ) -> Result<Transaction> {
        let url = self.table_url(
            TRANSACTIONS_TABLE,
            &[
                ("id", eq(id)),
                ("user_id", eq(user_id)),
                ("select", "*".to_string()),
            ],
        )?;
        debug!("Updating transaction at {}", url);

        let request = self
            .client
            .patch(url)
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(draft);
        let response = self.send(request, TRANSACTIONS_TABLE).await?;
        self.single_transaction(response).await
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
        let url = self.table_url(
            TRANSACTIONS_TABLE,
            &[("id", eq(id)), ("user_id", eq(user_id))],
        )?;
        debug!("Deleting transaction at {}", url);

        self.send(self.client.delete(url), TRANSACTIONS_TABLE)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for SupabaseClient {
    async fn get(&self, user_id: &str) -> Result<Option<RateSettings>> {
        let url = self.table_url(
            SETTINGS_TABLE,
            &[("select", "*".to_string()), ("user_id", eq(user_id))],
        )?;
        debug!("Requesting settings from {}", url);

        let request = self.authorize(self.client.get(url).header(ACCEPT, SINGLE_OBJECT));
        let response = request
            .send()
            .await
            .context("Failed to send request to user_settings")?;

        if !response.status().is_success() {
            let err = ApiError::from_response(response).await;
            if err.is_no_rows() {
                return Ok(None);
            }
            return Err(anyhow::Error::new(err).context("Request to user_settings failed"));
        }

        let settings = response
            .json::<RateSettings>()
            .await
            .context("Failed to parse settings row")?;
        Ok(Some(settings))
    }

    async fn upsert(&self, user_id: &str, settings: &RateSettings) -> Result<()> {
        let url = self.table_url(SETTINGS_TABLE, &[("on_conflict", "user_id".to_string())])?;
        debug!("Upserting settings at {}", url);

        let request = self
            .client
            .post(url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[SettingsRow { user_id, settings }]);
        self.send(request, SETTINGS_TABLE).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::TransactionType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER: &str = "user-1";

    fn client(server: &MockServer) -> SupabaseClient {
        let credentials = SupabaseCredentials::parse(&server.uri(), "anon-key").unwrap();
        SupabaseClient::new(&credentials, Some("user-token".to_string())).unwrap()
    }

    fn draft() -> TransactionDraft {
        TransactionDraft {
            description: "Groceries".to_string(),
            amount: dec!(250.5),
            category: "Food".to_string(),
            kind: TransactionType::Expense,
            date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        }
    }

    const ROW_JSON: &str = r#"{
        "id": "tx-1",
        "user_id": "user-1",
        "description": "Groceries",
        "amount": 250.5,
        "category": "Food",
        "type": "expense",
        "date": "2025-03-02",
        "created_at": "2025-03-02T08:00:00+00:00"
    }"#;

    #[tokio::test]
    async fn test_list_transactions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/transactions"))
            .and(query_param("user_id", "eq.user-1"))
            .and(query_param("order", "date.desc"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("[{ROW_JSON}]")))
            .mount(&server)
            .await;

        let rows = client(&server).list(USER).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "tx-1");
        assert_eq!(rows[0].amount, dec!(250.5));
        assert_eq!(rows[0].kind, TransactionType::Expense);
    }

    #[tokio::test]
    async fn test_insert_sends_owner_and_returns_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/transactions"))
            .and(header("prefer", "return=representation"))
            .and(body_partial_json(serde_json::json!({
                "user_id": "user-1",
                "description": "Groceries",
                "type": "expense",
                "date": "2025-03-02"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_string(ROW_JSON))
            .mount(&server)
            .await;

        let created = client(&server).insert(USER, &draft()).await.unwrap();
        assert_eq!(created.id, "tx-1");
        assert_eq!(created.description, "Groceries");
    }

    #[tokio::test]
    async fn test_update_is_scoped_by_id_and_owner() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/transactions"))
            .and(query_param("id", "eq.tx-1"))
            .and(query_param("user_id", "eq.user-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ROW_JSON))
            .mount(&server)
            .await;

        let updated = client(&server).update(USER, "tx-1", &draft()).await.unwrap();
        assert_eq!(updated.id, "tx-1");
    }

    #[tokio::test]
    async fn test_delete_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/transactions"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"code":"42501","message":"permission denied for table transactions"}"#,
            ))
            .mount(&server)
            .await;

        let err = client(&server).delete(USER, "tx-1").await.unwrap_err();
        let api_error = err.downcast_ref::<ApiError>().expect("should carry ApiError");
        assert_eq!(api_error.status, StatusCode::UNAUTHORIZED);
        assert_eq!(api_error.code.as_deref(), Some("42501"));
    }

    #[tokio::test]
    async fn test_get_settings_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/user_settings"))
            .and(query_param("user_id", "eq.user-1"))
            .and(header("accept", SINGLE_OBJECT))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{
                    "id": "s-1",
                    "user_id": "user-1",
                    "social_insurance_rate": 0.03,
                    "taxes_rate": 0.12,
                    "additional_taxes_rate": 0.0005,
                    "commission_rate": 4000,
                    "created_at": "2025-01-01T00:00:00Z",
                    "updated_at": "2025-01-01T00:00:00Z"
                }"#,
            ))
            .mount(&server)
            .await;

        let settings = client(&server).get(USER).await.unwrap().unwrap();
        assert_eq!(settings.social_insurance_rate, dec!(0.03));
        assert_eq!(settings.taxes_rate, dec!(0.12));
        assert_eq!(settings.commission_rate, dec!(4000));
    }

    #[tokio::test]
    async fn test_missing_settings_row_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/user_settings"))
            .respond_with(ResponseTemplate::new(406).set_body_string(
                r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#,
            ))
            .mount(&server)
            .await;

        assert!(client(&server).get(USER).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_other_settings_errors_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/user_settings"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        assert!(client(&server).get(USER).await.is_err());
    }

    #[tokio::test]
    async fn test_upsert_settings_merges_on_owner() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/user_settings"))
            .and(query_param("on_conflict", "user_id"))
            .and(body_partial_json(serde_json::json!([{
                "user_id": "user-1",
                "commission_rate": 4000.0
            }])))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .upsert(USER, &RateSettings::default())
            .await
            .unwrap();
    }
}
