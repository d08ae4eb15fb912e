use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::perfume::ScoringOptions;

pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const CATALOG_PATH_VAR: &str = "SCENT_SAJU_CATALOG";
pub const LOG_PATH_VAR: &str = "SCENT_SAJU_LOG";
pub const MODEL_VAR: &str = "SCENT_SAJU_MODEL";
pub const NARRATIVE_TIMEOUT_VAR: &str = "SCENT_SAJU_NARRATIVE_TIMEOUT_SECS";
pub const SCORING_FILE_VAR: &str = "SCENT_SAJU_SCORING";

const DEFAULT_CATALOG_PATH: &str = "data/perfumes.json";
const DEFAULT_LOG_PATH: &str = "logs/recommendation_logs.jsonl";
const DEFAULT_MODEL: &str = "sonnet";
const DEFAULT_NARRATIVE_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("환경 변수 {name}의 값이 올바른 숫자가 아닙니다: {value}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("점수 설정 파일을 읽을 수 없습니다 ({path}): {message}")]
    ScoringFile { path: String, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    api_key: Option<String>,
    catalog_path: PathBuf,
    log_path: PathBuf,
    model: String,
    narrative_timeout: Duration,
    scoring: ScoringOptions,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 빈 문자열은 설정하지 않은 것으로 본다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let narrative_timeout_secs = match get(NARRATIVE_TIMEOUT_VAR) {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                name: NARRATIVE_TIMEOUT_VAR,
                value: raw.clone(),
            })?,
            None => DEFAULT_NARRATIVE_TIMEOUT_SECS,
        };

        let scoring = match get(SCORING_FILE_VAR) {
            Some(path) => load_scoring_options(Path::new(&path))?,
            None => ScoringOptions::default(),
        };

        Ok(Self {
            api_key: get(API_KEY_VAR),
            catalog_path: PathBuf::from(
                get(CATALOG_PATH_VAR).unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string()),
            ),
            log_path: PathBuf::from(
                get(LOG_PATH_VAR).unwrap_or_else(|| DEFAULT_LOG_PATH.to_string()),
            ),
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            narrative_timeout: Duration::from_secs(narrative_timeout_secs),
            scoring,
        })
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn narrative_timeout(&self) -> Duration {
        self.narrative_timeout
    }

    pub fn scoring(&self) -> &ScoringOptions {
        &self.scoring
    }
}

/// 파일에 없는 필드는 기본값을 쓴다.
fn load_scoring_options(path: &Path) -> Result<ScoringOptions, ConfigError> {
    let scoring_error = |message: String| ConfigError::ScoringFile {
        path: path.display().to_string(),
        message,
    };

    let content = std::fs::read_to_string(path).map_err(|e| scoring_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| scoring_error(e.to_string()))
}
