//! 추천 결과에 붙는 사주 풀이 글.
//!
//! 모델 호출이 실패하면 항상 고정 문안으로 대체하므로 화면에는 늘 풀이가 나온다.

mod error;
mod fallback;
mod prompt;

pub use error::NarrativeError;
pub use fallback::FallbackNarrator;
pub use prompt::{build_user_prompt, reading_schema, system_prompt};

use crate::claude_code_client::{ClaudeCodeClient, ClaudeCodeRequest};
use crate::perfume::ScoredPerfume;
use crate::saju::ElementProfile;

use prompt::ReadingResponse;

pub trait NarrativeGenerator: Send + Sync {
    fn generate(
        &self,
        profile: &ElementProfile,
        top: &[ScoredPerfume],
    ) -> Result<String, NarrativeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub text: String,
    pub source: NarrativeSource,
}

pub struct ClaudeNarrator {
    client: ClaudeCodeClient,
}

impl ClaudeNarrator {
    pub fn new(client: ClaudeCodeClient) -> Self {
        Self { client }
    }
}

impl NarrativeGenerator for ClaudeNarrator {
    fn generate(
        &self,
        profile: &ElementProfile,
        top: &[ScoredPerfume],
    ) -> Result<String, NarrativeError> {
        let best = top.first().ok_or(NarrativeError::NoRecommendation)?;

        let request = ClaudeCodeRequest {
            system_prompt: Some(system_prompt().to_string()),
            user_prompt: build_user_prompt(profile, best),
            output_schema: reading_schema(),
        };

        let response: ReadingResponse = self.client.query(&request)?;
        let reading = response.reading.trim();
        if reading.is_empty() {
            return Err(NarrativeError::EmptyReading);
        }

        Ok(reading.to_string())
    }
}

/// 기본 생성기를 한 번 시도하고, 없거나 실패하면 고정 문안을 쓴다. 재시도는 하지 않는다.
pub fn narrate(
    primary: Option<&dyn NarrativeGenerator>,
    profile: &ElementProfile,
    top: &[ScoredPerfume],
) -> Narrative {
    if let Some(generator) = primary {
        match generator.generate(profile, top) {
            Ok(text) => {
                return Narrative {
                    text,
                    source: NarrativeSource::Model,
                };
            }
            Err(err) => {
                crate::app_log!("[풀이 대체] 모델 풀이 실패: {}", err);
            }
        }
    }

    let text = FallbackNarrator
        .generate(profile, top)
        .unwrap_or_else(|err| err.to_string());

    Narrative {
        text,
        source: NarrativeSource::Fallback,
    }
}
