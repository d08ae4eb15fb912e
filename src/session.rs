use chrono::{FixedOffset, Utc};
use uuid::Uuid;

use crate::saju::BirthMoment;

fn kst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("valid KST offset")
}

/// Asia/Seoul (KST, UTC+9) 기준 현재 시각을 RFC 3339 형식으로 반환한다.
pub fn now_timestamp() -> String {
    Utc::now().with_timezone(&kst()).to_rfc3339()
}

/// UUID v4 문자열을 생성하여 세션 식별자로 반환한다.
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// 추천 요청 한 번의 신원 정보. 로그 줄마다 같이 기록된다.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub session_id: String,
    pub user_name: String,
    pub birth_date: String,
    /// 시각을 모르면 `None`.
    pub birth_time: Option<String>,
}

impl SessionContext {
    pub fn new(user_name: &str, moment: &BirthMoment) -> Self {
        Self {
            session_id: generate_session_id(),
            user_name: user_name.trim().to_string(),
            birth_date: moment.date.format("%Y-%m-%d").to_string(),
            birth_time: moment
                .time
                .map(|t| format!("{:02}:{:02}", t.hour, t.minute)),
        }
    }
}
