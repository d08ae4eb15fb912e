pub mod claude_code_client;
pub mod config;
pub mod narrative;
pub mod perfume;
pub mod recommendation_log;
pub mod saju;
pub mod session;
pub mod ui;
