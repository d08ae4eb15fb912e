mod binary_finder;
mod error;
pub mod logger;
mod response;

pub use error::ClaudeCodeClientError;
pub use response::CliResponse;

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct ClaudeCodeRequest {
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub output_schema: serde_json::Value,
}

fn parse_cli_output<T: DeserializeOwned>(stdout: &[u8]) -> Result<T, ClaudeCodeClientError> {
    // 표준 출력 형식은 JSON 배열이지만 단일 객체가 올 수도 있으므로 둘 다 처리한다.
    let messages: Vec<serde_json::Value> = match serde_json::from_slice(stdout) {
        Ok(messages) => messages,
        Err(_) => {
            let single: serde_json::Value = serde_json::from_slice(stdout)?;
            vec![single]
        }
    };

    let result_value = messages
        .into_iter()
        .rev()
        .find(|msg| msg.get("type").and_then(|v| v.as_str()) == Some("result"))
        .ok_or(ClaudeCodeClientError::NoResultMessage)?;

    let response: CliResponse = serde_json::from_value(result_value)?;
    if response.is_error {
        return Err(ClaudeCodeClientError::CliReturnedError {
            message: response.result.unwrap_or_default(),
        });
    }

    let output_value = response
        .structured_output
        .ok_or(ClaudeCodeClientError::MissingStructuredOutput)?;

    Ok(serde_json::from_value(output_value)?)
}

/// 도구 없이 한 번 묻고 끝나는 비대화형 호출만 지원한다.
pub struct ClaudeCodeClient {
    binary_path: PathBuf,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl ClaudeCodeClient {
    pub fn new(
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ClaudeCodeClientError> {
        let binary_path = binary_finder::find_claude_binary()?;
        Ok(Self::with_binary(binary_path, api_key, model, timeout))
    }

    pub fn with_binary(
        binary_path: PathBuf,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Self {
        Self {
            binary_path,
            api_key,
            model,
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_command(&self, request: &ClaudeCodeRequest) -> Command {
        let mut command = Command::new(&self.binary_path);

        command
            .env("ANTHROPIC_API_KEY", &self.api_key)
            .env("CLAUDE_CODE_DISABLE_FEEDBACK_SURVEY", "1")
            .arg("-p")
            .arg("--output-format").arg("json")
            .arg("--tools").arg("")
            .arg("--model").arg(&self.model);

        if let Some(system_prompt) = &request.system_prompt {
            command.arg("--append-system-prompt").arg(system_prompt);
        }

        command.arg("--json-schema").arg(request.output_schema.to_string());
        command.arg(&request.user_prompt);

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        command
    }

    pub fn query<T: DeserializeOwned>(
        &self,
        request: &ClaudeCodeRequest,
    ) -> Result<T, ClaudeCodeClientError> {
        crate::app_log!(
            "[쿼리 시작] 바이너리: {}, 모델: {}, 사용자 프롬프트 {} bytes",
            self.binary_path.display(),
            self.model,
            request.user_prompt.len(),
        );

        let mut child = self.build_command(request).spawn().map_err(|err| {
            crate::app_log!("[쿼리 실패] 프로세스 생성 오류: {}", err);
            ClaudeCodeClientError::CommandExecutionFailed {
                message: err.to_string(),
            }
        })?;

        // 파이프 버퍼 데드락 방지를 위해 stdout/stderr를 별도 스레드에서 읽는다.
        let stdout_thread = spawn_pipe_reader(child.stdout.take());
        let stderr_thread = spawn_pipe_reader(child.stderr.take());

        let status = wait_with_timeout(&mut child, self.timeout)?;
        let stdout = stdout_thread.join().unwrap_or_default();
        let stderr = String::from_utf8_lossy(&stderr_thread.join().unwrap_or_default()).to_string();

        let Some(status) = status else {
            crate::app_log!("[쿼리 실패] {}초 제한 시간 초과", self.timeout.as_secs());
            return Err(ClaudeCodeClientError::Timeout {
                seconds: self.timeout.as_secs(),
            });
        };

        crate::app_log!(
            "[쿼리 완료] 종료 코드: {}, stdout {} bytes",
            status,
            stdout.len(),
        );

        if !status.success() {
            crate::app_log!("[쿼리 실패] stderr:\n{}", stderr);
            let message = if stderr.is_empty() {
                format!("프로세스 종료 코드: {}", status)
            } else {
                stderr
            };
            return Err(ClaudeCodeClientError::CommandExecutionFailed { message });
        }

        parse_cli_output(&stdout)
    }
}

fn spawn_pipe_reader<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        buffer
    })
}

/// 제한 시간 안에 끝나면 종료 상태를, 넘기면 프로세스를 죽이고 `None`을 돌려준다.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> Result<Option<ExitStatus>, ClaudeCodeClientError> {
    let deadline = Instant::now() + timeout;
    let execution_error = |err: std::io::Error| ClaudeCodeClientError::CommandExecutionFailed {
        message: err.to_string(),
    };

    loop {
        if let Some(status) = child.try_wait().map_err(execution_error)? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        std::thread::sleep(WAIT_POLL_INTERVAL);
    }
}
