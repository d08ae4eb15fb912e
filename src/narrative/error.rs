use thiserror::Error;

use crate::claude_code_client::ClaudeCodeClientError;

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("풀이할 추천 향수가 없습니다.")]
    NoRecommendation,

    #[error("모델이 빈 풀이를 반환했습니다.")]
    EmptyReading,

    #[error(transparent)]
    Client(#[from] ClaudeCodeClientError),
}
