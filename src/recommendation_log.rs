use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::perfume::ScoredPerfume;
use crate::saju::{Element, ElementProfile};
use crate::session::{SessionContext, now_timestamp};

#[derive(Debug, Error)]
pub enum RecommendationLogError {
    #[error("추천 로그 파일에 쓸 수 없습니다 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("추천 로그 직렬화 실패: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// JSON Lines 한 줄. 순위가 매겨진 결과 하나에 대응한다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationLogEntry {
    pub timestamp: String,
    pub session_id: String,
    pub user_name: String,
    pub birth_date: String,
    pub birth_time: Option<String>,
    pub label: String,
    pub strongest: Element,
    pub weakest: Element,
    pub rank: usize,
    pub brand: String,
    pub name: String,
    pub score: f64,
}

impl RecommendationLogEntry {
    pub fn from_results(
        session: &SessionContext,
        profile: &ElementProfile,
        top: &[ScoredPerfume],
    ) -> Vec<Self> {
        let timestamp = now_timestamp();
        let label = profile.label.to_display_string();

        top.iter()
            .enumerate()
            .map(|(i, scored)| Self {
                timestamp: timestamp.clone(),
                session_id: session.session_id.clone(),
                user_name: session.user_name.clone(),
                birth_date: session.birth_date.clone(),
                birth_time: session.birth_time.clone(),
                label: label.clone(),
                strongest: profile.strongest,
                weakest: profile.weakest,
                rank: i + 1,
                brand: scored.record.brand.clone(),
                name: scored.record.name.clone(),
                score: scored.score,
            })
            .collect()
    }
}

/// 추천 결과를 덧붙이기만 하는 로그. 코어는 이 파일을 다시 읽지 않는다.
pub struct RecommendationLog {
    file_path: PathBuf,
}

impl RecommendationLog {
    pub fn new(path: &Path) -> Result<Self, RecommendationLogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RecommendationLogError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        Ok(Self {
            file_path: path.to_path_buf(),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// 기록한 줄 수를 돌려준다.
    pub fn append_results(
        &self,
        session: &SessionContext,
        profile: &ElementProfile,
        top: &[ScoredPerfume],
    ) -> Result<usize, RecommendationLogError> {
        let entries = RecommendationLogEntry::from_results(session, profile, top);

        let mut buffer = String::new();
        for entry in &entries {
            buffer.push_str(&serde_json::to_string(entry)?);
            buffer.push('\n');
        }

        let io_error = |source| RecommendationLogError::Io {
            path: self.file_path.display().to_string(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .map_err(io_error)?;
        file.write_all(buffer.as_bytes()).map_err(io_error)?;

        crate::app_log!(
            "[추천 로그] 세션 {}: {}줄 기록 -> {}",
            session.session_id,
            entries.len(),
            self.file_path.display(),
        );

        Ok(entries.len())
    }
}
