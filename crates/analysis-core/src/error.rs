use thiserror::Error;

/// Rejected engine configuration. Never auto-corrected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Weight budget exceeded: {total} points allocated, maximum is {max}")]
    BudgetExceeded { total: u64, max: u32 },

    #[error("Headline limit must be at least 1")]
    InvalidHeadlineLimit,
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
