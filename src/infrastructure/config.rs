//! Configuration management
//!
//! Settings come from command-line flags first, then an optional TOML file,
//! then built-in defaults.

use crate::domain::TagPolicy;
use crate::error::{MigrateError, Result};
use crate::infrastructure::post_store::DEFAULT_POST_DIR;
use crate::infrastructure::wordpress::WordPressOptions;
use crate::infrastructure::writeas::DEFAULT_BASE_URL;
use dialoguer::Password;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "GHOST_MIGRATE_CONFIG";
pub const PASSWORD_ENV: &str = "GHOST_MIGRATE_PASSWORD";
pub const DEFAULT_POST_DELAY_SECS: u64 = 10;

/// Contents of the optional config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wordpress: WordPressSection,
    pub writeas: WriteAsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordPressSection {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub blog_id: Option<i64>,
    pub tag_policy: Option<TagPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteAsSection {
    pub base_url: Option<String>,
    pub publication: Option<String>,
    pub username: Option<String>,
    pub post_delay_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
}

/// WordPress values given on the command line
#[derive(Debug, Clone, Default)]
pub struct WordPressArgs {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub blog_id: Option<i64>,
    pub tag_policy: Option<TagPolicy>,
}

/// Write.as values given on the command line
#[derive(Debug, Clone, Default)]
pub struct WriteAsArgs {
    pub publication: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub base_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub delay_secs: Option<u64>,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct WordPressSettings {
    pub options: WordPressOptions,
    pub tag_policy: TagPolicy,
}

#[derive(Debug, Clone)]
pub struct WriteAsSettings {
    pub base_url: String,
    pub publication: String,
    pub username: String,
    pub password: String,
    pub output_dir: PathBuf,
    pub post_delay: Duration,
    pub dry_run: bool,
}

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                MigrateError::Config(format!("Config file not found: {}", path.display()))
            } else {
                MigrateError::Io(e)
            }
        })?;

        Ok(toml::from_str(&contents)?)
    }

    /// Load the file named by `--config`, else by GHOST_MIGRATE_CONFIG, else use defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => Self::load_from_file(Path::new(&path)),
            _ => Ok(Config::default()),
        }
    }

    /// Merge command-line values over the `[wordpress]` table
    pub fn wordpress_settings(&self, args: WordPressArgs) -> Result<WordPressSettings> {
        let section = &self.wordpress;
        let endpoint = require(args.endpoint, &section.endpoint, "WordPress endpoint", "--endpoint")?;
        let username = require(args.username, &section.username, "WordPress username", "--username")?;
        let password = resolve_password(
            args.password,
            std::env::var(PASSWORD_ENV).ok(),
            "WordPress",
            prompt_password,
        )?;

        Ok(WordPressSettings {
            options: WordPressOptions {
                endpoint,
                username,
                password,
                blog_id: args.blog_id.or(section.blog_id).unwrap_or(0),
            },
            tag_policy: args.tag_policy.or(section.tag_policy).unwrap_or_default(),
        })
    }

    /// Merge command-line values over the `[writeas]` table
    pub fn writeas_settings(&self, args: WriteAsArgs) -> Result<WriteAsSettings> {
        let section = &self.writeas;
        let publication = require(args.publication, &section.publication, "Write.as publication", "--blog")?;
        let username = require(args.username, &section.username, "Write.as username", "--user")?;
        let password = if args.dry_run {
            args.password.unwrap_or_default()
        } else {
            resolve_password(
                args.password,
                std::env::var(PASSWORD_ENV).ok(),
                "Write.as",
                prompt_password,
            )?
        };

        Ok(WriteAsSettings {
            base_url: args
                .base_url
                .or_else(|| section.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            publication,
            username,
            password,
            output_dir: args
                .output_dir
                .or_else(|| section.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_POST_DIR)),
            post_delay: Duration::from_secs(
                args.delay_secs
                    .or(section.post_delay_secs)
                    .unwrap_or(DEFAULT_POST_DELAY_SECS),
            ),
            dry_run: args.dry_run,
        })
    }
}

fn require(flag: Option<String>, file: &Option<String>, what: &str, flag_name: &str) -> Result<String> {
    flag.or_else(|| file.clone())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| MigrateError::Config(format!("Missing {} (use {})", what, flag_name)))
}

/// Password from the flag, then GHOST_MIGRATE_PASSWORD, then the prompt.
/// Empty values fall through to the next source.
fn resolve_password<F>(
    flag: Option<String>,
    env: Option<String>,
    service: &str,
    prompt: F,
) -> Result<String>
where
    F: FnOnce(&str) -> Result<Option<String>>,
{
    if let Some(password) = flag.or(env).filter(|password| !password.is_empty()) {
        return Ok(password);
    }

    prompt(service)?
        .filter(|password| !password.is_empty())
        .ok_or_else(|| MigrateError::Config(format!("Missing {} password", service)))
}

/// Ask for a password on the terminal without echoing it
fn prompt_password(service: &str) -> Result<Option<String>> {
    if !io::stdin().is_terminal() {
        return Ok(None);
    }

    let password = Password::new()
        .with_prompt(format!("{} password", service))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| MigrateError::Config(format!("Could not read {} password: {}", service, e)))?;
    Ok(Some(password))
}
