use super::NarrativeGenerator;
use super::error::NarrativeError;
use crate::perfume::ScoredPerfume;
use crate::saju::ElementProfile;

/// 모델 없이 만드는 고정 문안. 같은 입력이면 항상 같은 글을 돌려준다.
pub struct FallbackNarrator;

impl NarrativeGenerator for FallbackNarrator {
    fn generate(
        &self,
        profile: &ElementProfile,
        top: &[ScoredPerfume],
    ) -> Result<String, NarrativeError> {
        let best = top.first().ok_or(NarrativeError::NoRecommendation)?;
        let strongest = profile.strongest.korean_name();
        let weakest = profile.weakest.korean_name();
        let perfume = format!("{} {}", best.record.brand, best.record.name);

        let mut text = String::new();
        text.push_str("1. 사주 형국 분석\n");
        text.push_str(&format!(
            "'{}' 사주에서는 {} 기운이 가장 두드러지고, {} 기운이 가장 약해요.\n\n",
            profile.label.to_display_string(),
            strongest,
            weakest,
        ));
        text.push_str("2. 향수 처방의 이유\n");
        text.push_str(&format!(
            "{}은(는) {} 기운을 채워주는 향이라 넘치는 {} 기운과 균형을 맞춰줘요.\n\n",
            perfume, weakest, strongest,
        ));
        text.push_str("3. 운세 발복(상승) 효과\n");
        text.push_str(&format!(
            "매일 {}을(를) 뿌리면 막혀 있던 {} 기운이 돌면서 일과 관계 모두 한결 부드럽게 풀릴 거예요.",
            perfume, weakest,
        ));

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perfume::{PerfumeRecord, ScoreBreakdown};
    use crate::saju::{BirthMoment, BirthTime, SolarTermCalendar, derive_elements};

    fn profile() -> ElementProfile {
        let moment =
            BirthMoment::new(1995, 1, 1, Some(BirthTime::new(12, 0).unwrap())).unwrap();
        derive_elements(&SolarTermCalendar, &moment).unwrap()
    }

    fn top() -> Vec<ScoredPerfume> {
        vec![ScoredPerfume {
            record: PerfumeRecord {
                name: "Santal 33".to_string(),
                brand: "Le Labo".to_string(),
                ..Default::default()
            },
            score: 1.0,
            breakdown: ScoreBreakdown {
                similarity: 1.0,
                weakest_affinity: 0.0,
                preference: 0.0,
                dislike: 0.0,
                brand_bonus: 0.0,
                penalty: 0.0,
            },
        }]
    }

    #[test]
    fn fallback_has_three_sections_and_names_the_perfume() {
        let text = FallbackNarrator.generate(&profile(), &top()).unwrap();

        assert!(text.contains("1. 사주 형국 분석"));
        assert!(text.contains("2. 향수 처방의 이유"));
        assert!(text.contains("3. 운세 발복(상승) 효과"));
        assert!(text.contains("Le Labo Santal 33"));
        assert!(text.contains("금(金/쇠)"));
    }

    #[test]
    fn fallback_is_deterministic() {
        let first = FallbackNarrator.generate(&profile(), &top()).unwrap();
        let second = FallbackNarrator.generate(&profile(), &top()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fallback_requires_a_recommendation() {
        let err = FallbackNarrator.generate(&profile(), &[]).unwrap_err();
        assert!(matches!(err, NarrativeError::NoRecommendation));
    }
}
