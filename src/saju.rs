//! 생년월일시로부터 사주 기둥을 세우고 오행 분포를 계산한다.

mod calendar;
mod deriver;
mod element;
mod error;
mod ganji;

pub use calendar::{
    BirthMoment, BirthTime, MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR, SexagenaryCalendar,
    SolarTermCalendar,
};
pub use deriver::{
    ElementProfile, SexagenaryLabel, derive_elements, hour_branch_slot, hour_pillar, hour_stem,
};
pub use element::{Element, ElementCounts};
pub use error::SajuError;
pub use ganji::{BRANCH_HANGUL, Branch, Pillar, STEM_HANGUL, Stem, classify_char};
