// src/config/app.rs
use anyhow::{bail, Context};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::analyze::{AnalysisParams, LexiconConfig};
use crate::history::DEFAULT_HISTORY_CAP;
use crate::ocr::OcrConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/analyzer.toml";
pub const ENV_CONFIG_PATH: &str = "ANALYZER_CONFIG_PATH";
pub const ENV_SECRET_KEY: &str = "SECRET_KEY";
pub const ENV_JWT_ALGO: &str = "JWT_ALGO";

/// Used when `SECRET_KEY` is not set. Fine for local runs, never for deployment.
pub const DEV_SECRET: &str = "dev_secret";

fn default_users_file() -> PathBuf {
    PathBuf::from("users.json")
}
fn default_history_file() -> PathBuf {
    PathBuf::from("history.json")
}
fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}
fn default_history_cap() -> usize {
    DEFAULT_HISTORY_CAP
}
fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}
fn default_token_ttl_hours() -> i64 {
    24
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_users_file")]
    pub users_file: PathBuf,
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Records kept per user (newest first).
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            users_file: default_users_file(),
            history_file: default_history_file(),
            upload_dir: default_upload_dir(),
            history_cap: default_history_cap(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// Signing secret; only ever read from the environment.
    #[serde(skip)]
    pub secret_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl_hours(),
            secret_key: DEV_SECRET.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisParams,
    #[serde(default)]
    pub lexicon: LexiconConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

impl AppConfig {
    /// Parse a TOML document and sanitize it. Environment is not consulted.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let mut cfg: AppConfig = toml::from_str(s)?;
        cfg.auth.secret_key = DEV_SECRET.to_string();
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $ANALYZER_CONFIG_PATH (must exist)
    /// 2) config/analyzer.toml
    /// 3) built-in defaults
    pub fn load_default() -> anyhow::Result<Self> {
        let mut cfg = match env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    bail!("{ENV_CONFIG_PATH} points to non-existent path {}", pb.display());
                }
                Self::load_from_file(&pb)?
            }
            Err(_) => {
                let pb = PathBuf::from(DEFAULT_CONFIG_PATH);
                if pb.exists() {
                    Self::load_from_file(&pb)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env()?;
        Ok(cfg)
    }

    /// `SECRET_KEY` sets the token secret; `JWT_ALGO` may only name HS256.
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Ok(algo) = env::var(ENV_JWT_ALGO) {
            if !algo.trim().eq_ignore_ascii_case("HS256") {
                bail!("Unsupported {ENV_JWT_ALGO}: {algo} (only HS256)");
            }
        }
        match env::var(ENV_SECRET_KEY) {
            Ok(s) if !s.trim().is_empty() => self.auth.secret_key = s,
            _ => {
                warn!("{ENV_SECRET_KEY} not set; signing tokens with the development secret");
                self.auth.secret_key = DEV_SECRET.to_string();
            }
        }
        Ok(())
    }

    fn sanitize(&mut self) {
        if self.analysis.max_sentences == 0 {
            self.analysis.max_sentences = 1;
        }
        if self.storage.history_cap == 0 {
            self.storage.history_cap = default_history_cap();
        }
        if self.storage.max_upload_bytes == 0 {
            self.storage.max_upload_bytes = default_max_upload_bytes();
        }
        if self.auth.token_ttl_hours < 1 {
            self.auth.token_ttl_hours = 1;
        }
        if self.ocr.dpi == 0 {
            self.ocr.dpi = OcrConfig::default().dpi;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::ToneMatch;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.analysis, AnalysisParams::default());
        assert_eq!(cfg.storage.history_cap, 30);
        assert_eq!(cfg.auth.token_ttl_hours, 24);
        assert_eq!(cfg.auth.secret_key, DEV_SECRET);
        assert_eq!(cfg.ocr.language, "eng");
    }

    #[test]
    fn sections_override_and_get_sanitized() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [analysis]
            max_sentences = 0
            top_n = 7
            tone_match = "word"

            [storage]
            history_cap = 0
            upload_dir = "/tmp/up"

            [auth]
            token_ttl_hours = -5

            [lexicon]
            extra_stopwords = ["page"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.max_sentences, 1);
        assert_eq!(cfg.analysis.top_n, 7);
        assert_eq!(cfg.analysis.tone_match, ToneMatch::Word);
        assert_eq!(cfg.storage.history_cap, 30);
        assert_eq!(cfg.storage.upload_dir, PathBuf::from("/tmp/up"));
        assert_eq!(cfg.auth.token_ttl_hours, 1);
        assert_eq!(cfg.lexicon.extra_stopwords, vec!["page".to_string()]);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(AppConfig::from_toml_str("[analysis\nmax = ").is_err());
    }
}
