use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Engine(#[from] engine::EngineError),
    #[error("intent #{index} ({label}) rejected: {source}")]
    Rejected {
        index: usize,
        label: &'static str,
        #[source]
        source: engine::EngineError,
    },
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("holiday feed URL is not configured")]
    NoHolidayFeed,
}
