use std::path::{Path, PathBuf};

use super::error::ClaudeCodeClientError;

const BINARY_NAME: &str = "claude";

/// PATH에서 먼저 찾고, 없으면 알려진 설치 경로를 순서대로 확인한다.
pub fn find_claude_binary() -> Result<PathBuf, ClaudeCodeClientError> {
    if let Ok(path) = which::which(BINARY_NAME) {
        return Ok(path);
    }

    let home = std::env::var_os("HOME").map(PathBuf::from);
    candidate_paths(home.as_deref())
        .into_iter()
        .find(|path| path.is_file())
        .ok_or(ClaudeCodeClientError::BinaryNotFound)
}

fn candidate_paths(home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = home {
        paths.push(home.join(".claude").join("local").join(BINARY_NAME));
        paths.push(home.join(".local").join("bin").join(BINARY_NAME));
    }
    paths.push(PathBuf::from("/usr/local/bin").join(BINARY_NAME));
    paths.push(PathBuf::from("/opt/homebrew/bin").join(BINARY_NAME));
    paths
}
