//! Error types for ghost-migrate

use thiserror::Error;

/// Main error type for ghost-migrate
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("Malformed Ghost export: {0}")]
    MalformedExport(String),

    #[error("Unparseable date: {0}")]
    UnparseableDate(String),

    #[error("Remote call '{operation}' failed{}: {body}", status_suffix(.status))]
    RemoteCall {
        operation: String,
        status: Option<u16>,
        body: String,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl MigrateError {
    /// Build a remote call error from a failed HTTP exchange
    pub fn remote(operation: &str, status: Option<u16>, body: impl Into<String>) -> Self {
        MigrateError::RemoteCall {
            operation: operation.to_string(),
            status,
            body: body.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MigrateError::MalformedExport(_) => 2,
            MigrateError::RemoteCall { .. } | MigrateError::Transport(_) => 3,
            MigrateError::Config(_) | MigrateError::TomlDeserialize(_) => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            MigrateError::MalformedExport(msg) => {
                format!(
                    "Malformed Ghost export: {}\n\n\
                    Suggestions:\n\
                    • Export the blog again from Ghost Admin (Settings → Labs → Export)\n\
                    • Make sure the file contains db[0].data.posts, tags and posts_tags\n\
                    • Run 'ghost-migrate inspect --file <export>' to check the file",
                    msg
                )
            }
            MigrateError::RemoteCall { .. } => {
                format!(
                    "{}\n\n\
                    Posts published before this error stay published.\n\
                    Suggestions:\n\
                    • Check the endpoint URL and your credentials\n\
                    • For WordPress, make sure XML-RPC is enabled on the site\n\
                    • Re-running creates tags again; use --tag-policy reuse for WordPress",
                    self
                )
            }
            MigrateError::Config(msg) => {
                if msg.contains("password") {
                    format!(
                        "{}\n\n\
                        Pass --password, set GHOST_MIGRATE_PASSWORD, or type it when prompted",
                        msg
                    )
                } else {
                    format!(
                        "{}\n\n\
                        Values can be passed as flags or set in the file given by --config \
                        (or GHOST_MIGRATE_CONFIG)",
                        msg
                    )
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using MigrateError
pub type Result<T> = std::result::Result<T, MigrateError>;
