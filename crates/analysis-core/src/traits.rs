use async_trait::async_trait;
use crate::{AnalysisError, FundamentalSnapshot, Headline, PriceBar};

/// Source of daily price history, oldest bar first
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn get_price_history(&self, symbol: &str) -> Result<Vec<PriceBar>, AnalysisError>;
}

/// Source of company fundamentals; fields may be sparse
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    async fn get_fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, AnalysisError>;
}

/// Source of headlines, most recent first
#[async_trait]
pub trait HeadlineProvider: Send + Sync {
    async fn get_headlines(&self, symbol: &str) -> Result<Vec<Headline>, AnalysisError>;
}
