use anyhow::{Context, Result};
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub type Number = f32;

pub const EPSILON: f32 = 1e-6;

pub const DEFAULT_MODEL_DIR: &str = "models/all-MiniLM-L6-v2";
pub const DEFAULT_MAX_LENGTH: usize = 256;
pub const DEFAULT_HASHING_DIMENSIONS: usize = 384;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 1000;

#[derive(Deserialize, Default)]
pub struct FaqbotConfig {
    pub provider: Option<String>,
    pub model_dir: Option<String>,
    pub max_length: Option<usize>,
    pub hashing_dimensions: Option<usize>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_message_chars: Option<usize>,
    pub cors_origins: Option<String>,
}

impl FaqbotConfig {
    pub fn try_from(config: &Config) -> Result<Self, ConfigError> {
        Ok(FaqbotConfig {
            provider: config.get("provider").ok(),
            model_dir: config.get("model_dir").ok(),
            max_length: config.get("max_length").ok(),
            hashing_dimensions: config.get("hashing_dimensions").ok(),
            host: config.get("host").ok(),
            port: config.get("port").ok(),
            max_message_chars: config.get("max_message_chars").ok(),
            cors_origins: config.get("cors_origins").ok(),
        })
    }
}

/// Which embedding provider backs the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// all-MiniLM-L6-v2 exported to ONNX.
    Onnx,
    /// Offline feature-hashing embedder, no model files needed.
    Hashing,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onnx" => Ok(Self::Onnx),
            "hashing" | "hash" => Ok(Self::Hashing),
            other => anyhow::bail!("Unknown embedding provider: {}", other),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Onnx => write!(f, "onnx"),
            Self::Hashing => write!(f, "hashing"),
        }
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: ProviderKind,
    pub model_dir: PathBuf,
    pub max_length: usize,
    pub hashing_dimensions: usize,
    pub host: String,
    pub port: u16,
    pub max_message_chars: usize,
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Load `faqbot_config.*` (optional) and `FAQBOT_*` environment variables.
    pub fn new() -> Result<Self> {
        let mut config = Config::default();
        #[allow(deprecated)]
        {
            config.merge(ConfigFile::with_name("faqbot_config").required(false))?;
            config.merge(Environment::with_prefix("FAQBOT"))?;
        }

        Self::from_config(&config)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let faqbot_config = FaqbotConfig::try_from(config)?;

        let provider = faqbot_config
            .provider
            .or_else(|| env::var("FAQBOT_PROVIDER").ok())
            .unwrap_or_else(|| "onnx".to_string())
            .parse::<ProviderKind>()
            .context("FAQBOT_PROVIDER must be 'onnx' or 'hashing'")?;

        let model_dir = faqbot_config
            .model_dir
            .or_else(|| env::var("FAQBOT_MODEL_DIR").ok())
            .unwrap_or_else(|| DEFAULT_MODEL_DIR.to_string());

        let max_length = faqbot_config
            .max_length
            .or_else(|| env::var("FAQBOT_MAX_LENGTH").ok().and_then(|s| s.parse().ok()))
            .unwrap_or(DEFAULT_MAX_LENGTH);

        let hashing_dimensions = faqbot_config
            .hashing_dimensions
            .or_else(|| {
                env::var("FAQBOT_HASHING_DIMENSIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or(DEFAULT_HASHING_DIMENSIONS);

        let host = faqbot_config
            .host
            .or_else(|| env::var("FAQBOT_HOST").ok())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = faqbot_config
            .port
            .or_else(|| env::var("FAQBOT_PORT").ok().and_then(|s| s.parse().ok()))
            .unwrap_or(DEFAULT_PORT);

        let max_message_chars = faqbot_config
            .max_message_chars
            .or_else(|| {
                env::var("FAQBOT_MAX_MESSAGE_CHARS")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or(DEFAULT_MAX_MESSAGE_CHARS);

        let cors_origins = faqbot_config
            .cors_origins
            .or_else(|| env::var("FAQBOT_CORS_ORIGINS").ok())
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        if max_length == 0 {
            anyhow::bail!("FAQBOT_MAX_LENGTH must be greater than zero.");
        }
        if hashing_dimensions == 0 {
            anyhow::bail!("FAQBOT_HASHING_DIMENSIONS must be greater than zero.");
        }
        if max_message_chars == 0 {
            anyhow::bail!("FAQBOT_MAX_MESSAGE_CHARS must be greater than zero.");
        }

        Ok(Self {
            provider,
            model_dir: PathBuf::from(model_dir),
            max_length,
            hashing_dimensions,
            host,
            port,
            max_message_chars,
            cors_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn print_config(&self) {
        println!("provider={}", self.provider);
        println!("model_dir={}", self.model_dir.display());
        println!("max_length={}", self.max_length);
        println!("hashing_dimensions={}", self.hashing_dimensions);
        println!("host={}", self.host);
        println!("port={}", self.port);
        println!("max_message_chars={}", self.max_message_chars);
        if self.cors_origins.is_empty() {
            println!("cors_origins=*");
        } else {
            println!("cors_origins={}", self.cors_origins.join(","));
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "*")
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with(overrides: &[(&str, &str)]) -> Result<Settings> {
        let mut builder = Config::builder();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        Settings::from_config(&builder.build()?)
    }

    #[test]
    fn test_overrides_are_applied() {
        let settings = settings_with(&[
            ("provider", "hashing"),
            ("model_dir", "/opt/models/minilm"),
            ("host", "127.0.0.1"),
            ("port", "9100"),
            ("hashing_dimensions", "128"),
            ("max_message_chars", "200"),
            ("max_length", "128"),
        ])
        .unwrap();

        assert_eq!(settings.provider, ProviderKind::Hashing);
        assert_eq!(settings.model_dir, PathBuf::from("/opt/models/minilm"));
        assert_eq!(settings.bind_addr(), "127.0.0.1:9100");
        assert_eq!(settings.hashing_dimensions, 128);
        assert_eq!(settings.max_message_chars, 200);
        assert_eq!(settings.max_length, 128);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        assert!(settings_with(&[("provider", "word2vec")]).is_err());
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        assert!(settings_with(&[("hashing_dimensions", "0")]).is_err());
        assert!(settings_with(&[("max_message_chars", "0")]).is_err());
        assert!(settings_with(&[("max_length", "0")]).is_err());
    }

    #[test]
    fn test_cors_origins_parsing() {
        let settings = settings_with(&[(
            "cors_origins",
            "https://app.example.com, https://admin.example.com,,",
        )])
        .unwrap();
        assert_eq!(
            settings.cors_origins,
            vec!["https://app.example.com", "https://admin.example.com"]
        );

        assert!(parse_origins("*").is_empty());
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("ONNX".parse::<ProviderKind>().unwrap(), ProviderKind::Onnx);
        assert_eq!(" hash ".parse::<ProviderKind>().unwrap(), ProviderKind::Hashing);
        assert_eq!(ProviderKind::Hashing.to_string(), "hashing");
    }
}
