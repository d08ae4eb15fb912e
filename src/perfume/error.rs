use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("향수 데이터 파일을 읽을 수 없습니다: {path} ({source})")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("향수 데이터 파일 형식이 올바르지 않습니다: {path} ({source})")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("향수 데이터베이스가 비어 있습니다.")]
    EmptyCatalog,

    #[error("조건에 맞는 향수를 찾지 못했습니다. 취향 필터를 줄여보세요!")]
    NoResults,
}
