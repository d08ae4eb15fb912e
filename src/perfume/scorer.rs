use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, PerfumeRecord};
use super::error::ScoringError;
use super::tags::{ScentTag, expand_keywords, keyword_hit_rate};
use crate::saju::Element;

const TARGET_WEAKEST: f64 = 1.0;
const TARGET_STRONGEST: f64 = 0.1;
const TARGET_NEUTRAL: f64 = 0.5;

pub const DEFAULT_FAMOUS_BRANDS: [&str; 16] = [
    "Jo Malone",
    "Diptyque",
    "Byredo",
    "Aesop",
    "Chanel",
    "Dior",
    "Clean",
    "W.Dressroom",
    "Forment",
    "Tamburins",
    "Nonfiction",
    "Le Labo",
    "Creed",
    "John Varvatos",
    "Ferrari",
    "Acqua di Parma",
];

/// 점수 계산에 쓰이는 가중치와 상수. 설정 파일에서 일부만 덮어써도 나머지는 기본값을 쓴다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringOptions {
    pub similarity_weight: f64,
    pub weakest_affinity_weight: f64,
    pub preference_weight: f64,
    pub dislike_weight: f64,
    pub brand_bonus: f64,
    pub dislike_threshold: f64,
    pub dislike_penalty: f64,
    pub famous_brands: Vec<String>,
    pub famous_brands_only: bool,
    pub min_filtered_rows: usize,
    pub top_n: usize,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            similarity_weight: 1.0,
            weakest_affinity_weight: 0.5,
            preference_weight: 0.3,
            dislike_weight: 0.3,
            brand_bonus: 0.20,
            dislike_threshold: 0.4,
            dislike_penalty: 0.5,
            famous_brands: DEFAULT_FAMOUS_BRANDS.iter().map(|b| b.to_string()).collect(),
            famous_brands_only: false,
            min_filtered_rows: 20,
            top_n: 3,
        }
    }
}

impl ScoringOptions {
    pub fn is_famous_brand(&self, brand: &str) -> bool {
        let brand = brand.to_lowercase();
        self.famous_brands
            .iter()
            .any(|famous| brand.contains(&famous.to_lowercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub similarity: f64,
    pub weakest_affinity: f64,
    pub preference: f64,
    pub dislike: f64,
    pub brand_bonus: f64,
    pub penalty: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPerfume {
    pub record: PerfumeRecord,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// 가장 부족한 오행 1.0, 가장 강한 오행 0.1, 나머지 0.5.
pub fn target_vector(strongest: Element, weakest: Element) -> [f64; 5] {
    Element::ALL.map(|e| {
        if e == weakest {
            TARGET_WEAKEST
        } else if e == strongest {
            TARGET_STRONGEST
        } else {
            TARGET_NEUTRAL
        }
    })
}

pub fn cosine_similarity(a: &[f64; 5], b: &[f64; 5]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

struct ScoringContext<'a> {
    target: [f64; 5],
    weakest: Element,
    preferred: BTreeSet<&'static str>,
    disliked: BTreeSet<&'static str>,
    options: &'a ScoringOptions,
}

impl ScoringContext<'_> {
    fn score(&self, record: &PerfumeRecord) -> ScoredPerfume {
        let options = self.options;
        let text = record.searchable_text();

        let similarity = cosine_similarity(&self.target, &record.affinity_vector());
        let weakest_affinity = record.affinity(self.weakest);
        let preference = keyword_hit_rate(&text, &self.preferred);
        let dislike = keyword_hit_rate(&text, &self.disliked);
        let brand_bonus = if options.is_famous_brand(&record.brand) {
            options.brand_bonus
        } else {
            0.0
        };
        // 싫어하는 향이 일정 비율 이상이면 사실상 제외한다.
        let penalty = if !self.disliked.is_empty() && dislike >= options.dislike_threshold {
            options.dislike_penalty
        } else {
            0.0
        };

        let score = options.similarity_weight * similarity
            + options.weakest_affinity_weight * weakest_affinity
            + options.preference_weight * preference
            - options.dislike_weight * dislike
            + brand_bonus
            - penalty;

        ScoredPerfume {
            record: record.clone(),
            score,
            breakdown: ScoreBreakdown {
                similarity,
                weakest_affinity,
                preference,
                dislike,
                brand_bonus,
                penalty,
            },
        }
    }
}

/// 브랜드 필터가 켜져 있어도 남는 향수가 너무 적으면 전체 카탈로그로 되돌아간다.
pub fn candidate_records<'a>(
    catalog: &'a Catalog,
    options: &ScoringOptions,
) -> Vec<&'a PerfumeRecord> {
    let all: Vec<&PerfumeRecord> = catalog.records().iter().collect();
    if !options.famous_brands_only {
        return all;
    }

    let filtered: Vec<&PerfumeRecord> = all
        .iter()
        .copied()
        .filter(|record| options.is_famous_brand(&record.brand))
        .collect();

    if filtered.len() < options.min_filtered_rows {
        crate::app_log!(
            "[브랜드 필터] 후보 {}개로 최소 {}개 미만이라 전체 카탈로그({}개)를 사용합니다.",
            filtered.len(),
            options.min_filtered_rows,
            all.len(),
        );
        return all;
    }
    filtered
}

/// 카탈로그 전체를 채점하고 상위 N개를 돌려준다.
///
/// 양수 점수만 남기며, 점수가 같으면 카탈로그 순서를 유지한다. 이름이 같은 향수는 처음 것만 남긴다.
pub fn score_perfumes(
    catalog: &Catalog,
    strongest: Element,
    weakest: Element,
    preferred: &[ScentTag],
    disliked: &[ScentTag],
    options: &ScoringOptions,
) -> Result<Vec<ScoredPerfume>, ScoringError> {
    if catalog.is_empty() {
        return Err(ScoringError::EmptyCatalog);
    }

    let context = ScoringContext {
        target: target_vector(strongest, weakest),
        weakest,
        preferred: expand_keywords(preferred),
        disliked: expand_keywords(disliked),
        options,
    };

    let mut scored: Vec<ScoredPerfume> = candidate_records(catalog, options)
        .into_iter()
        .map(|record| context.score(record))
        .filter(|scored| scored.score > 0.0)
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut seen_names: HashSet<String> = HashSet::new();
    let ranked: Vec<ScoredPerfume> = scored
        .into_iter()
        .filter(|scored| seen_names.insert(scored.record.name.trim().to_lowercase()))
        .take(options.top_n)
        .collect();

    if ranked.is_empty() {
        return Err(ScoringError::NoResults);
    }
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, brand: &str, affinity: [f64; 5]) -> PerfumeRecord {
        PerfumeRecord {
            name: name.to_string(),
            brand: brand.to_string(),
            wood: affinity[0],
            fire: affinity[1],
            earth: affinity[2],
            metal: affinity[3],
            water: affinity[4],
            ..Default::default()
        }
    }

    fn with_notes(mut record: PerfumeRecord, notes: &str) -> PerfumeRecord {
        record.notes = notes.to_string();
        record
    }

    #[test]
    fn target_vector_floors_strongest_element() {
        assert_eq!(
            target_vector(Element::Fire, Element::Metal),
            [0.5, 0.1, 0.5, 1.0, 0.5],
        );
    }

    #[test]
    fn cosine_similarity_handles_zero_vectors() {
        let target = target_vector(Element::Fire, Element::Metal);
        assert_eq!(cosine_similarity(&target, &[0.0; 5]), 0.0);
        let same = cosine_similarity(&target, &target);
        assert!((same - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_catalog_is_reported() {
        let result = score_perfumes(
            &Catalog::default(),
            Element::Fire,
            Element::Metal,
            &[],
            &[],
            &ScoringOptions::default(),
        );
        assert_eq!(result.unwrap_err(), ScoringError::EmptyCatalog);
    }

    #[test]
    fn row_matching_weakest_element_ranks_first() {
        let catalog = Catalog::new(vec![
            record("Ember", "House A", [0.0, 1.0, 0.0, 0.0, 0.0]),
            record("Steel", "House B", [0.0, 0.0, 0.0, 1.0, 0.0]),
            record("Grove", "House C", [1.0, 0.0, 0.0, 0.0, 0.0]),
        ]);

        let ranked = score_perfumes(
            &catalog,
            Element::Fire,
            Element::Metal,
            &[],
            &[],
            &ScoringOptions::default(),
        )
        .unwrap();

        assert_eq!(ranked[0].record.name, "Steel");
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn strong_dislike_applies_penalty() {
        let options = ScoringOptions::default();
        let smoky = with_notes(
            record("Campfire", "House", [0.2, 1.0, 0.2, 0.0, 0.1]),
            "smoky leather incense tobacco birch suede smoke",
        );
        let catalog = Catalog::new(vec![smoky.clone()]);

        let context = ScoringContext {
            target: target_vector(Element::Fire, Element::Metal),
            weakest: Element::Metal,
            preferred: expand_keywords(&[]),
            disliked: expand_keywords(&[ScentTag::SmokyLeather]),
            options: &options,
        };
        let scored = context.score(&smoky);

        assert!(scored.breakdown.dislike >= options.dislike_threshold);
        assert_eq!(scored.breakdown.penalty, options.dislike_penalty);

        let pre_penalty = options.similarity_weight * scored.breakdown.similarity
            + options.weakest_affinity_weight * scored.breakdown.weakest_affinity
            + options.preference_weight * scored.breakdown.preference
            + scored.breakdown.brand_bonus;
        assert!(pre_penalty - scored.score >= options.dislike_penalty);

        let result = score_perfumes(
            &catalog,
            Element::Fire,
            Element::Metal,
            &[],
            &[ScentTag::SmokyLeather],
            &options,
        );
        assert_eq!(result.unwrap_err(), ScoringError::NoResults);
    }

    #[test]
    fn light_dislike_is_smooth() {
        let options = ScoringOptions::default();
        let record = with_notes(record("Hint", "House", [0.3, 0.3, 0.3, 0.3, 0.3]), "leather");
        let context = ScoringContext {
            target: target_vector(Element::Fire, Element::Metal),
            weakest: Element::Metal,
            preferred: expand_keywords(&[]),
            disliked: expand_keywords(&[ScentTag::SmokyLeather]),
            options: &options,
        };

        let scored = context.score(&record);

        assert!(scored.breakdown.dislike > 0.0);
        assert!(scored.breakdown.dislike < options.dislike_threshold);
        assert_eq!(scored.breakdown.penalty, 0.0);
    }

    #[test]
    fn preferences_lift_matching_rows() {
        let catalog = Catalog::new(vec![
            record("Plain", "House", [0.5, 0.5, 0.5, 0.5, 0.5]),
            with_notes(
                record("Bouquet", "House", [0.5, 0.5, 0.5, 0.5, 0.5]),
                "rose jasmine peony",
            ),
        ]);

        let ranked = score_perfumes(
            &catalog,
            Element::Fire,
            Element::Metal,
            &[ScentTag::Floral],
            &[],
            &ScoringOptions::default(),
        )
        .unwrap();

        assert_eq!(ranked[0].record.name, "Bouquet");
        assert!(ranked[0].breakdown.preference > 0.0);
    }

    #[test]
    fn famous_brand_gets_bonus_case_insensitively() {
        let options = ScoringOptions::default();
        assert!(options.is_famous_brand("JO MALONE LONDON"));
        assert!(options.is_famous_brand("le labo"));
        assert!(!options.is_famous_brand("Unknown House"));

        let catalog = Catalog::new(vec![
            record("Same", "Unknown House", [0.5, 0.5, 0.5, 0.5, 0.5]),
            record("Same Too", "diptyque", [0.5, 0.5, 0.5, 0.5, 0.5]),
        ]);
        let ranked = score_perfumes(
            &catalog,
            Element::Fire,
            Element::Metal,
            &[],
            &[],
            &options,
        )
        .unwrap();

        assert_eq!(ranked[0].record.name, "Same Too");
        assert_eq!(ranked[0].breakdown.brand_bonus, options.brand_bonus);
    }

    #[test]
    fn duplicate_names_are_removed_and_list_truncated() {
        let catalog = Catalog::new(vec![
            record("Twin", "House", [0.0, 0.0, 0.0, 1.0, 0.0]),
            record("twin ", "House", [0.0, 0.0, 0.0, 0.9, 0.0]),
            record("Second", "House", [0.0, 0.0, 0.5, 0.8, 0.0]),
            record("Third", "House", [0.3, 0.0, 0.5, 0.5, 0.0]),
            record("Fourth", "House", [0.5, 0.0, 0.5, 0.2, 0.5]),
        ]);

        let ranked = score_perfumes(
            &catalog,
            Element::Fire,
            Element::Metal,
            &[],
            &[],
            &ScoringOptions::default(),
        )
        .unwrap();

        let names: Vec<&str> = ranked.iter().map(|s| s.record.name.as_str()).collect();
        assert_eq!(names.len(), 3);
        assert_eq!(names[0], "Twin");
        assert!(!names.contains(&"twin "));
    }

    #[test]
    fn scoring_is_deterministic() {
        let catalog = Catalog::new(
            (0..40)
                .map(|i| {
                    let x = (i % 7) as f64 / 7.0;
                    let y = (i % 5) as f64 / 5.0;
                    record(&format!("P{i}"), "House", [x, y, 0.3, 1.0 - x, y * x])
                })
                .collect(),
        );
        let options = ScoringOptions {
            top_n: 10,
            ..ScoringOptions::default()
        };

        let first = score_perfumes(
            &catalog,
            Element::Water,
            Element::Wood,
            &[ScentTag::Woody],
            &[ScentTag::Citrus],
            &options,
        )
        .unwrap();
        let second = score_perfumes(
            &catalog,
            Element::Water,
            Element::Wood,
            &[ScentTag::Woody],
            &[ScentTag::Citrus],
            &options,
        )
        .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn ties_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            record("First", "House", [0.4, 0.4, 0.4, 0.4, 0.4]),
            record("Second", "House", [0.4, 0.4, 0.4, 0.4, 0.4]),
        ]);

        let ranked = score_perfumes(
            &catalog,
            Element::Fire,
            Element::Metal,
            &[],
            &[],
            &ScoringOptions::default(),
        )
        .unwrap();

        assert_eq!(ranked[0].record.name, "First");
        assert_eq!(ranked[1].record.name, "Second");
    }

    #[test]
    fn brand_filter_falls_back_when_too_few_rows_remain() {
        let mut records: Vec<PerfumeRecord> = (0..8)
            .map(|i| record(&format!("Indie {i}"), "Small House", [0.2, 0.2, 0.2, 0.2, 0.2]))
            .collect();
        records.push(record("Famous A", "Chanel", [0.2, 0.2, 0.2, 0.2, 0.2]));
        records.push(record("Famous B", "Dior", [0.2, 0.2, 0.2, 0.2, 0.2]));
        let catalog = Catalog::new(records);
        let options = ScoringOptions {
            famous_brands_only: true,
            ..ScoringOptions::default()
        };

        let candidates = candidate_records(&catalog, &options);

        assert_eq!(candidates.len(), 10);
    }

    #[test]
    fn brand_filter_applies_when_enough_rows_remain() {
        let mut records: Vec<PerfumeRecord> = (0..5)
            .map(|i| record(&format!("Indie {i}"), "Small House", [0.0, 0.0, 0.0, 1.0, 0.0]))
            .collect();
        records.extend(
            (0..3).map(|i| record(&format!("Byredo {i}"), "Byredo", [0.2, 0.2, 0.2, 0.2, 0.2])),
        );
        let catalog = Catalog::new(records);
        let options = ScoringOptions {
            famous_brands_only: true,
            min_filtered_rows: 3,
            ..ScoringOptions::default()
        };

        let ranked = score_perfumes(
            &catalog,
            Element::Fire,
            Element::Metal,
            &[],
            &[],
            &options,
        )
        .unwrap();

        assert!(ranked.iter().all(|s| s.record.brand == "Byredo"));
    }

    #[test]
    fn options_deserialize_partially() {
        let options: ScoringOptions =
            serde_json::from_str(r#"{"brand_bonus": 0.35, "top_n": 5}"#).unwrap();
        assert_eq!(options.brand_bonus, 0.35);
        assert_eq!(options.top_n, 5);
        assert_eq!(options.dislike_threshold, 0.4);
        assert_eq!(options.famous_brands.len(), DEFAULT_FAMOUS_BRANDS.len());
    }
}
