use crate::error::{config_error, env_error, SyncResult};
use dotenvy::dotenv;
use std::env;
use url::Url;

/// Default Google Sheets REST endpoint
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/";

/// Default OAuth token endpoint for the refresh-token grant
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Default metadata server endpoint for the ambient service account
pub const DEFAULT_METADATA_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// How the spreadsheet client obtains its access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoogleAuth {
    /// A fixed bearer token, used as-is
    StaticToken(String),
    /// OAuth refresh-token grant against `token_url`
    RefreshToken {
        client_id: String,
        client_secret: String,
        refresh_token: String,
        token_url: String,
    },
    /// Service identity from the compute metadata server
    Metadata { url: String },
}

/// Main configuration structure for the sync job
#[derive(Debug, Clone)]
pub struct Config {
    /// CRM API base URL, always ending in `/`
    pub crm_api_base: Url,
    /// CRM API token
    pub crm_api_key: String,
    /// Target spreadsheet
    pub spreadsheet_id: String,
    /// Sheets API base URL, always ending in `/`
    pub sheets_api_base: Url,
    /// Spreadsheet credentials
    pub google_auth: GoogleAuth,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn load() -> SyncResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> SyncResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| env_error(key));

        // Required environment variables
        let crm_api_base = parse_base_url("AN_API_BASE", &require("AN_API_BASE")?)?;
        let crm_api_key = require("AN_API_KEY")?;
        let spreadsheet_id = require("SPREADSHEET_ID")?;

        let sheets_api_base = parse_base_url(
            "SHEETS_API_BASE",
            &get("SHEETS_API_BASE").unwrap_or_else(|| DEFAULT_SHEETS_API_BASE.to_string()),
        )?;

        // Pick the credential source, most explicit first
        let refresh = (
            get("GOOGLE_CLIENT_ID"),
            get("GOOGLE_CLIENT_SECRET"),
            get("GOOGLE_REFRESH_TOKEN"),
        );
        let google_auth = if let Some(token) = get("GOOGLE_ACCESS_TOKEN") {
            GoogleAuth::StaticToken(token)
        } else {
            match refresh {
                (Some(client_id), Some(client_secret), Some(refresh_token)) => {
                    GoogleAuth::RefreshToken {
                        client_id,
                        client_secret,
                        refresh_token,
                        token_url: get("GOOGLE_TOKEN_URL")
                            .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
                    }
                }
                (None, None, None) => GoogleAuth::Metadata {
                    url: get("GOOGLE_METADATA_URL")
                        .unwrap_or_else(|| DEFAULT_METADATA_URL.to_string()),
                },
                _ => {
                    return Err(config_error(
                        "GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REFRESH_TOKEN must be set together",
                    ))
                }
            }
        };

        Ok(Config {
            crm_api_base,
            crm_api_key,
            spreadsheet_id,
            sheets_api_base,
            google_auth,
        })
    }
}

/// Parse a base URL, appending the trailing slash `Url::join` needs
fn parse_base_url(var: &str, raw: &str) -> SyncResult<Url> {
    let raw = raw.trim();
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash).map_err(|e| config_error(&format!("Invalid {}: {}", var, e)))
}
