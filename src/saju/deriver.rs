use serde::Serialize;

use super::calendar::{BirthMoment, BirthTime, SexagenaryCalendar};
use super::element::{Element, ElementCounts};
use super::error::SajuError;
use super::ganji::{Branch, Pillar, Stem, classify_char};

const MINUTES_PER_DAY: u32 = 24 * 60;
// 자시는 23:30에 시작해서 01:29에 끝난다.
const JA_HOUR_START: u32 = 23 * 60 + 30;
const JA_HOUR_END: u32 = 60 + 30;
const HOUR_SLOT_MINUTES: u32 = 120;

const PILLAR_SUFFIXES: [char; 4] = ['년', '월', '일', '시'];

/// 사주 기둥(년/월/일/[시])과 그 문자열 표현.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SexagenaryLabel {
    pub pillars: Vec<Pillar>,
}

impl SexagenaryLabel {
    pub fn day_pillar(&self) -> Pillar {
        self.pillars[2]
    }

    pub fn hour_pillar(&self) -> Option<Pillar> {
        self.pillars.get(3).copied()
    }

    pub fn characters(&self) -> Vec<char> {
        self.pillars.iter().flat_map(|p| p.chars()).collect()
    }

    pub fn to_display_string(&self) -> String {
        self.pillars
            .iter()
            .zip(PILLAR_SUFFIXES)
            .map(|(pillar, suffix)| format!("{pillar}{suffix}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementProfile {
    pub label: SexagenaryLabel,
    pub counts: ElementCounts,
    pub strongest: Element,
    pub weakest: Element,
}

/// 출생 시각(분)을 12지시 슬롯으로 바꾼다. 0 = 자시.
///
/// 하루 단위로 주기적이므로 1440분 이상이 들어와도 같은 슬롯을 돌려준다.
pub fn hour_branch_slot(total_minutes: u32) -> usize {
    let minutes = total_minutes % MINUTES_PER_DAY;
    if minutes >= JA_HOUR_START || minutes < JA_HOUR_END {
        0
    } else {
        (((minutes - JA_HOUR_END) / HOUR_SLOT_MINUTES + 1) % 12) as usize
    }
}

/// 일간에 따라 자시의 천간이 정해지고, 이후 시진마다 한 칸씩 나아간다.
pub fn hour_stem(day_stem: Stem, slot: usize) -> Stem {
    Stem::from_index((day_stem.index() % 5) * 2 + slot)
}

pub fn hour_pillar(day_stem: Stem, time: BirthTime) -> Pillar {
    let slot = hour_branch_slot(time.total_minutes());
    Pillar::new(hour_stem(day_stem, slot), Branch::from_index(slot))
}

fn parse_gapja(raw: &str) -> Result<Vec<Pillar>, SajuError> {
    let conversion_error = || SajuError::CalendarConversion {
        label: raw.to_string(),
    };

    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(conversion_error());
    }

    tokens[..3]
        .iter()
        .map(|token| Pillar::parse_token(token).ok_or_else(conversion_error))
        .collect()
}

/// 출생 시점으로부터 사주 기둥을 세우고 오행 분포를 구한다.
pub fn derive_elements(
    calendar: &dyn SexagenaryCalendar,
    moment: &BirthMoment,
) -> Result<ElementProfile, SajuError> {
    let raw = calendar.gapja_string(moment.date);
    let mut pillars = parse_gapja(&raw)?;

    if let Some(time) = moment.time {
        let day_stem = pillars[2].stem;
        pillars.push(hour_pillar(day_stem, time));
    }

    let label = SexagenaryLabel { pillars };

    let mut counts = ElementCounts::default();
    for element in label.characters().into_iter().filter_map(classify_char) {
        counts.increment(element);
    }

    Ok(ElementProfile {
        strongest: counts.strongest(),
        weakest: counts.weakest(),
        label,
        counts,
    })
}
