use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SajuError {
    #[error("유효하지 않은 생년월일시입니다: {reason}")]
    InvalidDate { reason: String },

    #[error("만세력 변환 결과가 올바르지 않습니다: {label:?}")]
    CalendarConversion { label: String },
}
