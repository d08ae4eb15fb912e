use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::error::CatalogError;
use crate::saju::Element;

/// 카탈로그 한 줄. 문자열 필드가 없으면 빈 문자열, 오행 점수가 없거나 숫자가 아니면 0.0이다.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PerfumeRecord {
    pub name: String,
    pub brand: String,
    pub notes: String,
    pub description: String,
    pub keywords: String,
    #[serde(deserialize_with = "lenient_affinity")]
    pub wood: f64,
    #[serde(deserialize_with = "lenient_affinity")]
    pub fire: f64,
    #[serde(deserialize_with = "lenient_affinity")]
    pub earth: f64,
    #[serde(deserialize_with = "lenient_affinity")]
    pub metal: f64,
    #[serde(deserialize_with = "lenient_affinity")]
    pub water: f64,
}

impl PerfumeRecord {
    pub fn affinity(&self, element: Element) -> f64 {
        match element {
            Element::Wood => self.wood,
            Element::Fire => self.fire,
            Element::Earth => self.earth,
            Element::Metal => self.metal,
            Element::Water => self.water,
        }
    }

    pub fn affinity_vector(&self) -> [f64; 5] {
        Element::ALL.map(|e| self.affinity(e))
    }

    /// 키워드 매칭용 검색 텍스트 (소문자).
    pub fn searchable_text(&self) -> String {
        [
            self.name.as_str(),
            self.brand.as_str(),
            self.notes.as_str(),
            self.description.as_str(),
            self.keywords.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }
}

fn sanitize_affinity(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn lenient_affinity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(sanitize_affinity(parsed))
}

/// 읽기 전용 향수 카탈로그. 시작 시 한 번 로드한 뒤 참조로만 넘긴다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Vec<PerfumeRecord>,
}

impl Catalog {
    pub fn new(records: Vec<PerfumeRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| CatalogError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<PerfumeRecord> = serde_json::from_str(content)?;
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[PerfumeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_fields_take_defaults() {
        let catalog = Catalog::from_json(r#"[{"name": "Untitled"}]"#).unwrap();
        let record = &catalog.records()[0];

        assert_eq!(record.name, "Untitled");
        assert_eq!(record.brand, "");
        assert_eq!(record.affinity_vector(), [0.0; 5]);
    }

    #[test]
    fn affinities_accept_numeric_strings_and_reject_garbage() {
        let json = r#"[{
            "name": "Mixed",
            "wood": "0.7",
            "fire": "n/a",
            "earth": null,
            "metal": -0.3,
            "water": 0.25
        }]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let record = &catalog.records()[0];

        assert_eq!(record.affinity_vector(), [0.7, 0.0, 0.0, 0.0, 0.25]);
    }

    #[test]
    fn searchable_text_is_lowercased_concatenation() {
        let record = PerfumeRecord {
            name: "Wood Sage".to_string(),
            brand: "Jo Malone".to_string(),
            notes: "Sea Salt".to_string(),
            description: "Breezy".to_string(),
            keywords: "Aquatic".to_string(),
            ..Default::default()
        };

        assert_eq!(
            record.searchable_text(),
            "wood sage jo malone sea salt breezy aquatic",
        );
    }

    #[test]
    fn load_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("perfumes.json");
        fs::write(&path, r#"[{"name": "A", "brand": "B", "wood": 1.0}]"#).unwrap();

        let catalog = Catalog::load(&path).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records()[0].affinity(Element::Wood), 1.0);
    }

    #[test]
    fn load_reports_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = Catalog::load(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn load_reports_malformed_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Catalog::load(&path).unwrap_err();

        assert!(matches!(err, CatalogError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
