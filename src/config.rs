use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::constants::SESSION_KEY;

pub const DEFAULT_LOGO: &str = "/static/images/intro-logo.png";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid logo source '{0}': {1}")]
    InvalidLogo(String, &'static str),
    #[error("session key must not be empty")]
    EmptySessionKey,
}

/// Where the overlay's logo image is served from.
///
/// Only locations a browser can resolve are accepted: a path served next to the
/// application, or an absolute http(s) URL. Local filesystem references are rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogoSource {
    Bundled(String),
    Remote(Url),
}

impl LogoSource {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let invalid = |reason| ConfigError::InvalidLogo(value.to_string(), reason);

        let value = value.trim();
        if value.is_empty() {
            return Err(invalid("empty"));
        }

        if value.contains("://") {
            let url = Url::parse(value).map_err(|_| invalid("not a valid URL"))?;
            return match url.scheme() {
                "http" | "https" => Ok(Self::Remote(url)),
                _ => Err(invalid("only http and https URLs are supported")),
            };
        }

        // C:\..., C:/...
        let bytes = value.as_bytes();
        if value.contains('\\') || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':') {
            return Err(invalid("looks like a local filesystem path"));
        }

        Ok(Self::Bundled(value.to_string()))
    }

    /// The value for the `src` attribute.
    pub fn src(&self) -> &str {
        match self {
            Self::Bundled(path) => path,
            Self::Remote(url) => url.as_str(),
        }
    }

    /// Resolves a bundled logo against a local asset root, for offline checks.
    pub fn bundled_path(&self, asset_root: &Path) -> Option<PathBuf> {
        match self {
            Self::Bundled(path) => Some(asset_root.join(path.trim_start_matches('/'))),
            Self::Remote(_) => None,
        }
    }
}

impl Default for LogoSource {
    fn default() -> Self {
        Self::Bundled(DEFAULT_LOGO.to_string())
    }
}

impl TryFrom<String> for LogoSource {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LogoSource> for String {
    fn from(value: LogoSource) -> Self {
        value.src().to_string()
    }
}

impl fmt::Display for LogoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.src())
    }
}

/// Application-level settings handed to the intro host at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct IntroConfig {
    /// Session storage key marking the automatic intro as already shown.
    pub session_key: String,
    pub title: String,
    pub subtitle: String,
    pub tagline: String,
    pub status: String,
    pub logo: LogoSource,
    pub logo_alt: String,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            session_key: SESSION_KEY.to_string(),
            title: "NEXUS ULTRA".to_string(),
            subtitle: "Literature Analysis System".to_string(),
            tagline: "Based on R-Bibliometrix & VOSviewer".to_string(),
            status: "Initializing System...".to_string(),
            logo: LogoSource::default(),
            logo_alt: "Ultraman".to_string(),
        }
    }
}

impl IntroConfig {
    pub fn from_toml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_key.trim().is_empty() {
            return Err(ConfigError::EmptySessionKey);
        }
        Ok(())
    }
}
