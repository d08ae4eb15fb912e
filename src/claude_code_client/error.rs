use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaudeCodeClientError {
    #[error("claude 실행 파일을 찾을 수 없습니다. 설치 여부와 PATH를 확인하세요.")]
    BinaryNotFound,

    #[error("claude 명령 실행에 실패했습니다: {message}")]
    CommandExecutionFailed { message: String },

    #[error("claude 응답이 {seconds}초 안에 도착하지 않았습니다.")]
    Timeout { seconds: u64 },

    #[error("claude가 오류를 반환했습니다: {message}")]
    CliReturnedError { message: String },

    #[error("claude 출력에 result 메시지가 없습니다.")]
    NoResultMessage,

    #[error("claude 출력에 structured_output이 없습니다.")]
    MissingStructuredOutput,

    #[error("claude 출력 JSON 파싱에 실패했습니다: {source}")]
    JsonParsingFailed {
        #[from]
        source: serde_json::Error,
    },
}
