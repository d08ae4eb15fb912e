use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{FixedOffset, Utc};

fn kst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("valid KST offset")
}

/// 날짜별 진단 로그 파일 경로. 터미널은 TUI가 쓰고 있으므로 로그는 파일로만 남긴다.
pub fn log_file_path() -> PathBuf {
    let date = Utc::now().with_timezone(&kst()).format("%Y%m%d");
    std::env::temp_dir().join(format!("scent-saju-{}.log", date))
}

pub fn format_line(location: &str, message: &str) -> String {
    let timestamp = Utc::now().with_timezone(&kst()).format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{}] [{}] {}\n", timestamp, location, message)
}

/// 로그 기록 실패는 무시한다.
pub fn write_log(location: &str, message: &str) {
    let line = format_line(location, message);
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path())
    {
        let _ = file.write_all(line.as_bytes());
    }
}

#[macro_export]
macro_rules! app_log {
    ($($arg:tt)*) => {
        $crate::claude_code_client::logger::write_log(module_path!(), &format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_line_contains_location_and_message() {
        let line = format_line("scent_saju::perfume", "후보 2개");
        assert!(line.contains("[scent_saju::perfume]"));
        assert!(line.ends_with("후보 2개\n"));
        assert!(line.starts_with('['));
    }

    #[test]
    fn log_file_is_dated() {
        let path = log_file_path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("scent-saju-"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "scent-saju-".len() + 8 + ".log".len());
    }
}
