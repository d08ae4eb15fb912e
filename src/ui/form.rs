//! 입력 한 줄을 도메인 값으로 바꾸는 파서들.

use chrono::NaiveDate;
use thiserror::Error;

use crate::perfume::ScentTag;
use crate::saju::{BirthMoment, BirthTime, SajuError};

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("생년월일은 YYYY-MM-DD 형식으로 입력해 주세요. (입력: {input})")]
    DateFormat { input: String },

    #[error("태어난 시각은 HH:MM 형식으로 입력하거나, 모르면 비워 두세요. (입력: {input})")]
    TimeFormat { input: String },

    #[error("1~{max} 사이의 번호를 쉼표로 구분해 입력해 주세요. (입력: {input})")]
    TagSelection { input: String, max: usize },

    #[error("y 또는 n으로 답해 주세요. (입력: {input})")]
    YesNo { input: String },

    #[error(transparent)]
    Saju(#[from] SajuError),
}

fn parse_numbers(input: &str, separator: char, expected: usize) -> Option<Vec<u32>> {
    let parts: Vec<&str> = input.split(separator).map(str::trim).collect();
    if parts.len() != expected {
        return None;
    }
    parts.iter().map(|p| p.parse::<u32>().ok()).collect()
}

/// 지원 범위를 벗어나거나 존재하지 않는 날짜는 `SajuError::InvalidDate`로 돌려준다.
pub fn parse_birth_date(input: &str) -> Result<NaiveDate, FormError> {
    let input = input.trim();
    let format_error = || FormError::DateFormat {
        input: input.to_string(),
    };

    let numbers = parse_numbers(input, '-', 3).ok_or_else(format_error)?;
    let year = i32::try_from(numbers[0]).map_err(|_| format_error())?;
    let moment = BirthMoment::new(year, numbers[1], numbers[2], None)?;

    Ok(moment.date)
}

/// 빈 입력은 시각을 모르는 것으로 본다.
pub fn parse_birth_time(input: &str) -> Result<Option<BirthTime>, FormError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let numbers = parse_numbers(input, ':', 2).ok_or_else(|| FormError::TimeFormat {
        input: input.to_string(),
    })?;

    Ok(Some(BirthTime::new(numbers[0], numbers[1])?))
}

/// `"1, 3"` 같은 번호 목록. 중복은 한 번만, 입력 순서대로 남긴다.
pub fn parse_tag_selection(input: &str) -> Result<Vec<ScentTag>, FormError> {
    let selection_error = || FormError::TagSelection {
        input: input.trim().to_string(),
        max: ScentTag::ALL.len(),
    };

    let mut tags = Vec::new();
    for token in input.split([',', ' ']).map(str::trim).filter(|t| !t.is_empty()) {
        let number: usize = token.parse().map_err(|_| selection_error())?;
        let tag = number
            .checked_sub(1)
            .and_then(|i| ScentTag::ALL.get(i))
            .ok_or_else(selection_error)?;
        if !tags.contains(tag) {
            tags.push(*tag);
        }
    }

    Ok(tags)
}

/// 빈 입력은 "아니오".
pub fn parse_yes_no(input: &str) -> Result<bool, FormError> {
    match input.trim().to_lowercase().as_str() {
        "" | "n" | "no" | "아니오" | "아니요" => Ok(false),
        "y" | "yes" | "예" | "네" => Ok(true),
        other => Err(FormError::YesNo {
            input: other.to_string(),
        }),
    }
}

pub fn tag_menu() -> String {
    ScentTag::ALL
        .iter()
        .enumerate()
        .map(|(i, tag)| format!("  {}. {}", i + 1, tag.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn describe_tags(tags: &[ScentTag]) -> String {
    if tags.is_empty() {
        "없음".to_string()
    } else {
        tags.iter().map(|t| t.label()).collect::<Vec<_>>().join(", ")
    }
}
