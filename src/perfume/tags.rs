use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// 사용자가 고르는 향 취향 카테고리.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScentTag {
    Floral,
    Fruity,
    Woody,
    Citrus,
    Musk,
    Amber,
    Aquatic,
    SmokyLeather,
}

impl ScentTag {
    pub const ALL: [ScentTag; 8] = [
        ScentTag::Floral,
        ScentTag::Fruity,
        ScentTag::Woody,
        ScentTag::Citrus,
        ScentTag::Musk,
        ScentTag::Amber,
        ScentTag::Aquatic,
        ScentTag::SmokyLeather,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScentTag::Floral => "꽃향기(플로럴)",
            ScentTag::Fruity => "과일향(프루티)",
            ScentTag::Woody => "나무향(우디)",
            ScentTag::Citrus => "상큼한(시트러스)",
            ScentTag::Musk => "포근한(머스크)",
            ScentTag::Amber => "달콤한(앰버/바닐라)",
            ScentTag::Aquatic => "시원한(아쿠아/마린)",
            ScentTag::SmokyLeather => "스모키/가죽",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            ScentTag::Floral => &[
                "floral", "rose", "jasmine", "lily", "peony", "iris", "violet", "tuberose",
                "magnolia", "neroli",
            ],
            ScentTag::Fruity => &[
                "fruity", "peach", "pear", "apple", "berry", "fig", "plum", "blackcurrant",
            ],
            ScentTag::Woody => &[
                "woody", "wood", "cedar", "sandalwood", "vetiver", "oud", "patchouli", "moss",
            ],
            ScentTag::Citrus => &[
                "citrus", "bergamot", "lemon", "orange", "grapefruit", "mandarin", "yuzu", "lime",
            ],
            ScentTag::Musk => &["musk", "powder", "soap", "cotton", "clean", "iris"],
            ScentTag::Amber => &[
                "amber", "vanilla", "tonka", "honey", "caramel", "benzoin", "sweet",
            ],
            ScentTag::Aquatic => &[
                "aquatic", "marine", "sea", "salt", "ozonic", "water", "fresh",
            ],
            ScentTag::SmokyLeather => &[
                "smoky", "smoke", "leather", "incense", "tobacco", "birch", "suede",
            ],
        }
    }
}

/// 태그 집합을 중복 없는 키워드 목록으로 펼친다.
pub fn expand_keywords(tags: &[ScentTag]) -> BTreeSet<&'static str> {
    tags.iter().flat_map(|tag| tag.keywords().iter().copied()).collect()
}

/// 검색 텍스트에 포함된 키워드 비율. 태그가 없으면 0.
pub fn keyword_hit_rate(text: &str, keywords: &BTreeSet<&'static str>) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let hits = keywords.iter().filter(|kw| text.contains(*kw)).count();
    hits as f64 / keywords.len() as f64
}
