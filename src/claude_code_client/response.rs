use serde::Deserialize;

/// `--output-format json` 출력 중 `type == "result"` 메시지.
#[derive(Debug, Deserialize)]
pub struct CliResponse {
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub structured_output: Option<serde_json::Value>,
}
