use std::fmt;

use serde::{Deserialize, Serialize};

/// 오행. 선언 순서(목-화-토-금-수)가 동점 처리의 기준 순서다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Element::Wood => "Wood",
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Metal => "Metal",
            Element::Water => "Water",
        }
    }

    pub fn korean_name(self) -> &'static str {
        match self {
            Element::Wood => "목(木/나무)",
            Element::Fire => "화(火/불)",
            Element::Earth => "토(土/흙)",
            Element::Metal => "금(金/쇠)",
            Element::Water => "수(水/물)",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ElementCounts {
    counts: [u8; 5],
}

impl ElementCounts {
    pub fn increment(&mut self, element: Element) {
        self.counts[element.index()] += 1;
    }

    pub fn get(&self, element: Element) -> u8 {
        self.counts[element.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| u32::from(c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, u8)> + '_ {
        Element::ALL.iter().map(|&e| (e, self.get(e)))
    }

    /// 개수 내림차순으로 정렬한다. 안정 정렬이므로 동점이면 목-화-토-금-수 순서가 유지된다.
    pub fn ranked(&self) -> [Element; 5] {
        let mut ranked = Element::ALL;
        ranked.sort_by(|a, b| self.get(*b).cmp(&self.get(*a)));
        ranked
    }

    pub fn strongest(&self) -> Element {
        self.ranked()[0]
    }

    pub fn weakest(&self) -> Element {
        self.ranked()[4]
    }
}
