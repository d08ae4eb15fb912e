use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::error::SajuError;
use super::ganji::{Branch, Pillar, Stem};

pub const MIN_SUPPORTED_YEAR: i32 = 1900;
pub const MAX_SUPPORTED_YEAR: i32 = 2100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthTime {
    pub hour: u32,
    pub minute: u32,
}

impl BirthTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, SajuError> {
        if hour > 23 {
            return Err(SajuError::InvalidDate {
                reason: format!("시는 0~23 사이여야 합니다 (입력: {hour})"),
            });
        }
        if minute > 59 {
            return Err(SajuError::InvalidDate {
                reason: format!("분은 0~59 사이여야 합니다 (입력: {minute})"),
            });
        }
        Ok(Self { hour, minute })
    }

    pub fn total_minutes(self) -> u32 {
        self.hour * 60 + self.minute
    }
}

/// 요청 하나에 대응하는 출생 시점. 시각을 모르면 `time`이 `None`이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthMoment {
    pub date: NaiveDate,
    pub time: Option<BirthTime>,
}

impl BirthMoment {
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        time: Option<BirthTime>,
    ) -> Result<Self, SajuError> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            SajuError::InvalidDate {
                reason: format!("존재하지 않는 날짜입니다: {year:04}-{month:02}-{day:02}"),
            }
        })?;
        Self::from_date(date, time)
    }

    pub fn from_date(date: NaiveDate, time: Option<BirthTime>) -> Result<Self, SajuError> {
        if !(MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&date.year()) {
            return Err(SajuError::InvalidDate {
                reason: format!(
                    "지원 범위({MIN_SUPPORTED_YEAR}~{MAX_SUPPORTED_YEAR}년)를 벗어난 날짜입니다: {date}"
                ),
            });
        }
        Ok(Self { date, time })
    }
}

/// 양력 날짜를 `XX년 XX월 XX일` 형태의 간지 문자열로 바꿔주는 협력자.
///
/// 반환 문자열의 형태는 신뢰하지 않는다. 해석과 검증은 호출하는 쪽에서 한다.
pub trait SexagenaryCalendar {
    fn gapja_string(&self, date: NaiveDate) -> String;
}

/// 절기(節) 진입일을 고정 날짜로 근사한 만세력.
///
/// 실제 절입 시각과 하루 정도 어긋날 수 있다. 정밀 천문 계산은 하지 않는다.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarTermCalendar;

// 각 양력 월의 절입일(근사). 1월 소한(축월), 2월 입춘(인월) ... 12월 대설(자월).
const TERM_START_DAY: [u32; 12] = [6, 4, 6, 5, 6, 6, 7, 8, 8, 8, 7, 7];

// 1900-01-01은 갑술일(60갑자 순번 10).
const DAY_CYCLE_EPOCH_OFFSET: i64 = 10;

impl SolarTermCalendar {
    pub fn year_pillar(date: NaiveDate) -> Pillar {
        Pillar::from_cycle_index(i64::from(Self::solar_year(date)) - 4)
    }

    pub fn month_pillar(date: NaiveDate) -> Pillar {
        let branch = Self::month_branch(date);
        let year_stem = Self::year_pillar(date).stem;
        // 인월부터 센 월 순번.
        let offset = (branch.index() + 10) % 12;
        let first_stem = (year_stem.index() % 5) * 2 + 2;
        Pillar::new(Stem::from_index(first_stem + offset), branch)
    }

    pub fn day_pillar(date: NaiveDate) -> Pillar {
        let epoch = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
        let days = date.signed_duration_since(epoch).num_days();
        Pillar::from_cycle_index(days + DAY_CYCLE_EPOCH_OFFSET)
    }

    /// 입춘 전이면 전년도로 본다.
    fn solar_year(date: NaiveDate) -> i32 {
        if (date.month(), date.day()) < (2, TERM_START_DAY[1]) {
            date.year() - 1
        } else {
            date.year()
        }
    }

    fn month_branch(date: NaiveDate) -> Branch {
        let month = date.month() as usize;
        if date.day() >= TERM_START_DAY[month - 1] {
            Branch::from_index(month % 12)
        } else {
            Branch::from_index((month + 11) % 12)
        }
    }
}

impl SexagenaryCalendar for SolarTermCalendar {
    fn gapja_string(&self, date: NaiveDate) -> String {
        format!(
            "{}년 {}월 {}일",
            Self::year_pillar(date),
            Self::month_pillar(date),
            Self::day_pillar(date),
        )
    }
}
