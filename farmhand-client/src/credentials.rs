//! AWS credentials lookup
//!
//! Credentials come from the environment (`AWS_ACCESS_KEY_ID`,
//! `AWS_SECRET_ACCESS_KEY`, optional `AWS_SESSION_TOKEN`) or, failing that,
//! from the shared credentials file written by `aws configure`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ClientError, Result};

/// Access key pair with optional session token
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Reads credentials from environment variables
    pub fn from_env() -> Result<Self> {
        let access_key_id = non_empty_var("AWS_ACCESS_KEY_ID")
            .ok_or_else(|| ClientError::MissingCredentials("AWS_ACCESS_KEY_ID is not set".into()))?;
        let secret_access_key = non_empty_var("AWS_SECRET_ACCESS_KEY").ok_or_else(|| {
            ClientError::MissingCredentials("AWS_SECRET_ACCESS_KEY is not set".into())
        })?;

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: non_empty_var("AWS_SESSION_TOKEN"),
        })
    }

    /// Reads one profile from a shared credentials file
    pub fn from_profile_file(path: &Path, profile: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        parse_profile(&content, profile).ok_or_else(|| {
            ClientError::MissingCredentials(format!(
                "profile '{}' not found or incomplete in {}",
                profile,
                path.display()
            ))
        })
    }

    /// Environment first, then the `AWS_PROFILE` (or `default`) profile of the shared file
    pub fn load() -> Result<Self> {
        match Self::from_env() {
            Ok(credentials) => Ok(credentials),
            Err(env_err) => {
                debug!("No credentials in environment: {}", env_err);
                let path = shared_credentials_path().ok_or(env_err)?;
                let profile = non_empty_var("AWS_PROFILE").unwrap_or_else(|| "default".to_string());
                Self::from_profile_file(&path, &profile)
            }
        }
    }
}

/// Location of the shared credentials file
///
/// Honours `AWS_SHARED_CREDENTIALS_FILE`, otherwise `~/.aws/credentials`.
pub fn shared_credentials_path() -> Option<PathBuf> {
    if let Some(path) = non_empty_var("AWS_SHARED_CREDENTIALS_FILE") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".aws").join("credentials"))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_profile(content: &str, profile: &str) -> Option<Credentials> {
    let mut in_profile = false;
    let mut access_key_id = None;
    let mut secret_access_key = None;
    let mut session_token = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_profile = section.trim() == profile;
            continue;
        }

        if !in_profile {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().to_string();
            match key.trim() {
                "aws_access_key_id" => access_key_id = Some(value),
                "aws_secret_access_key" => secret_access_key = Some(value),
                "aws_session_token" => session_token = Some(value),
                _ => {}
            }
        }
    }

    Some(Credentials {
        access_key_id: access_key_id?,
        secret_access_key: secret_access_key?,
        session_token,
    })
}
