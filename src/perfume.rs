//! 향수 카탈로그 로드와 오행 기반 추천 점수 계산.

mod catalog;
mod error;
mod scorer;
mod tags;

pub use catalog::{Catalog, PerfumeRecord};
pub use error::{CatalogError, ScoringError};
pub use scorer::{
    DEFAULT_FAMOUS_BRANDS, ScoreBreakdown, ScoredPerfume, ScoringOptions, candidate_records,
    cosine_similarity, score_perfumes, target_vector,
};
pub use tags::{ScentTag, expand_keywords, keyword_hit_rate};

/// 네이버 쇼핑 검색 링크. 공백만 `%20`으로 바꾼다.
pub fn shopping_search_url(brand: &str, name: &str) -> String {
    let query = format!("{brand} {name} 향수");
    format!(
        "https://search.shopping.naver.com/search/all?query={}",
        query.replace(' ', "%20")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saju::{BirthMoment, BirthTime, SolarTermCalendar, derive_elements};

    #[test]
    fn shopping_url_encodes_spaces() {
        assert_eq!(
            shopping_search_url("Jo Malone", "Wood Sage"),
            "https://search.shopping.naver.com/search/all?query=Jo%20Malone%20Wood%20Sage%20향수",
        );
    }

    #[test]
    fn birth_profile_feeds_scorer_end_to_end() {
        let moment =
            BirthMoment::new(1995, 1, 1, Some(BirthTime::new(12, 0).unwrap())).unwrap();
        let profile = derive_elements(&SolarTermCalendar, &moment).unwrap();
        assert_eq!(profile.label.pillars.len(), 4);
        assert_eq!(profile.counts.total(), 8);

        let mut affinities = [[0.0; 5]; 3];
        affinities[1][profile.weakest.index()] = 1.0;
        affinities[0][profile.strongest.index()] = 1.0;
        let other = crate::saju::Element::ALL
            .into_iter()
            .find(|e| *e != profile.weakest && *e != profile.strongest)
            .unwrap();
        affinities[2][other.index()] = 1.0;

        let records = affinities
            .iter()
            .enumerate()
            .map(|(i, a)| PerfumeRecord {
                name: format!("Perfume {i}"),
                brand: "Test House".to_string(),
                wood: a[0],
                fire: a[1],
                earth: a[2],
                metal: a[3],
                water: a[4],
                ..Default::default()
            })
            .collect();
        let catalog = Catalog::new(records);

        let ranked = score_perfumes(
            &catalog,
            profile.strongest,
            profile.weakest,
            &[],
            &[],
            &ScoringOptions::default(),
        )
        .unwrap();

        assert_eq!(ranked[0].record.name, "Perfume 1");
    }
}
