use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the sync job
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(rsvp_sync::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(rsvp_sync::config))]
    Config(String),

    /// A request failed in transport or came back with a non-success status
    #[error("Error running {service} API call to {route}: {message}")]
    #[diagnostic(code(rsvp_sync::remote_call))]
    RemoteCall {
        service: &'static str,
        route: String,
        message: String,
    },

    #[error("Unexpected response from {route}: {message}")]
    #[diagnostic(code(rsvp_sync::decode))]
    Decode { route: String, message: String },

    #[error("Authentication error: {0}")]
    #[diagnostic(code(rsvp_sync::auth))]
    Auth(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(rsvp_sync::other))]
    Other(String),
}

/// Type alias for Result with our Error type
pub type SyncResult<T> = Result<T, Error>;

/// Service label used in CRM errors
pub const CRM_SERVICE: &str = "CRM";

/// Service label used in spreadsheet errors
pub const SHEETS_SERVICE: &str = "Sheets";

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create remote call errors
pub fn remote_error(service: &'static str, route: &str, message: impl ToString) -> Error {
    Error::RemoteCall {
        service,
        route: route.to_string(),
        message: message.to_string(),
    }
}

/// Helper to create decode errors
pub fn decode_error(route: &str, message: impl ToString) -> Error {
    Error::Decode {
        route: route.to_string(),
        message: message.to_string(),
    }
}

/// Helper to create authentication errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
