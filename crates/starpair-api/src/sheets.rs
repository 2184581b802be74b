//! Append-only request log backed by a Google Sheets worksheet.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use starpair_core::{NarrativeBundle, Person, SheetsConfig};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Tokens are refreshed this long before Google says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

pub const HEADER_ROW: [&str; 11] = [
    "Timestamp",
    "Name 1",
    "Birth date 1",
    "Gender 1",
    "Zodiac sign 1",
    "Name 2",
    "Birth date 2",
    "Gender 2",
    "Zodiac sign 2",
    "Compatibility score",
    "Compatibility tier",
];

/// One logged analysis, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub timestamp: String,
    pub name1: String,
    pub birth1: String,
    pub gender1: String,
    pub sign1: String,
    pub name2: String,
    pub birth2: String,
    pub gender2: String,
    pub sign2: String,
    pub score: u8,
    pub tier: String,
}

impl LogRow {
    pub fn new(
        person1: &Person,
        person2: &Person,
        bundle: &NarrativeBundle,
        at: DateTime<Local>,
    ) -> Self {
        Self {
            timestamp: at.format("%Y-%m-%d %H:%M:%S").to_string(),
            name1: person1.name.clone(),
            birth1: person1.birth.clone(),
            gender1: person1.gender.clone(),
            sign1: person1.zodiac_sign.to_string(),
            name2: person2.name.clone(),
            birth2: person2.birth.clone(),
            gender2: person2.gender.clone(),
            sign2: person2.zodiac_sign.to_string(),
            score: bundle.compatibility_score,
            tier: bundle.compatibility_tier.label().to_string(),
        }
    }

    pub fn to_values(&self) -> Vec<Value> {
        vec![
            json!(self.timestamp),
            json!(self.name1),
            json!(self.birth1),
            json!(self.gender1),
            json!(self.sign1),
            json!(self.name2),
            json!(self.birth2),
            json!(self.gender2),
            json!(self.sign2),
            json!(self.score),
            json!(self.tier),
        ]
    }
}

/// Somewhere analyses are recorded. Failures never reach the client.
#[async_trait]
pub trait AnalysisLogSink: Send + Sync {
    async fn append(&self, row: &LogRow) -> Result<()>;
}

/// The fields of a service-account key file that the JWT grant needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Failed to parse service-account credentials JSON")
    }

    pub async fn from_file(path: &std::path::Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read credentials file {}", path.display()))?;
        Self::from_json(&raw)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

pub struct GoogleSheetsSink {
    client: Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    sheet_id: String,
    range: String,
    api_base: String,
    token: Mutex<Option<CachedToken>>,
    /// Set once the worksheet is known to start with a header row. Held
    /// across the check and the header write so data rows wait behind it.
    header_ready: Mutex<bool>,
}

impl GoogleSheetsSink {
    pub fn new(
        key: ServiceAccountKey,
        sheet_id: String,
        range: String,
        api_base: String,
        timeout: Duration,
    ) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .context("Service-account private key is not a valid RSA PEM")?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            key,
            encoding_key,
            sheet_id,
            range,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
            header_ready: Mutex::new(false),
        })
    }

    /// Build the sink when logging is enabled and both a sheet id and
    /// credentials are available; `Ok(None)` otherwise.
    pub async fn from_config(config: &SheetsConfig) -> Result<Option<Self>> {
        if !config.enabled {
            info!("Spreadsheet logging disabled in configuration");
            return Ok(None);
        }
        let Some(sheet_id) = config.sheet_id() else {
            info!("No sheet id configured; spreadsheet logging disabled");
            return Ok(None);
        };

        let key = if let Some(raw) = config.credentials_json() {
            ServiceAccountKey::from_json(&raw)?
        } else if let Some(path) = config.credentials_path() {
            ServiceAccountKey::from_file(&path).await?
        } else {
            info!("No service-account credentials configured; spreadsheet logging disabled");
            return Ok(None);
        };

        info!(client_email = %key.client_email, "Spreadsheet logging enabled");
        Self::new(
            key,
            sheet_id,
            config.range.clone(),
            config.api_base.clone(),
            Duration::from_secs(config.timeout_secs),
        )
        .map(Some)
    }

    fn values_url(&self, suffix: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .with_context(|| format!("Invalid Sheets API base URL {}", self.api_base))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Sheets API base URL cannot take a path"))?
            .extend(["spreadsheets", self.sheet_id.as_str(), "values"])
            .push(&format!("{}{}", self.range, suffix));
        Ok(url)
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + 3600,
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .context("Failed to sign service-account JWT")?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("Failed to reach OAuth token endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Token endpoint error ({}): {}", status, body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse OAuth token response")?;
        debug!(expires_in = token.expires_in, "Obtained Sheets access token");

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn sheet_is_empty(&self, token: &str) -> Result<bool> {
        let response = self
            .client
            .get(self.values_url("")?)
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to read worksheet")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Sheets read error ({}): {}", status, body));
        }

        let range: ValueRange = response
            .json()
            .await
            .context("Failed to parse worksheet values")?;
        Ok(range.values.is_empty())
    }

    /// Write the header if the worksheet is empty. Returns whether the
    /// header question is settled; failures are logged and retried on the
    /// next append.
    async fn ensure_header(&self, token: &str) -> bool {
        match self.sheet_is_empty(token).await {
            Ok(true) => {
                let header = HEADER_ROW.iter().map(|h| json!(h)).collect();
                match self.append_values(token, header).await {
                    Ok(()) => {
                        info!("Wrote header row to empty worksheet");
                        true
                    }
                    Err(e) => {
                        warn!(error = %e, "Could not write worksheet header");
                        false
                    }
                }
            }
            Ok(false) => true,
            Err(e) => {
                warn!(error = %e, "Could not check worksheet header");
                false
            }
        }
    }

    async fn append_values(&self, token: &str, row: Vec<Value>) -> Result<()> {
        let mut url = self.values_url(":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .context("Failed to append to worksheet")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Sheets append error ({}): {}", status, body));
        }
        Ok(())
    }
}

#[async_trait]
impl AnalysisLogSink for GoogleSheetsSink {
    async fn append(&self, row: &LogRow) -> Result<()> {
        let token = self.access_token().await?;

        {
            let mut ready = self.header_ready.lock().await;
            if !*ready {
                *ready = self.ensure_header(&token).await;
            }
        }

        self.append_values(&token, row.to_values()).await?;
        debug!(name1 = %row.name1, name2 = %row.name2, "Logged analysis to worksheet");
        Ok(())
    }
}
