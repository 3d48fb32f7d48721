use std::path::PathBuf;

use analysis_core::{
    AnalysisError, FundamentalSnapshot, FundamentalsProvider, Headline, HeadlineProvider,
    MarketDataProvider, PriceBar,
};
use analysis_orchestrator::InstrumentSnapshot;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// On-disk snapshot of one instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentFile {
    pub symbol: String,
    pub prices: Vec<PriceBar>,
    #[serde(default)]
    pub fundamentals: FundamentalSnapshot,
    /// Most recent first
    #[serde(default)]
    pub headlines: Vec<Headline>,
}

/// Serves `<dir>/<SYMBOL>.json` files through the provider traits
pub struct JsonFileProvider {
    dir: PathBuf,
}

impl JsonFileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.json", symbol.to_uppercase()))
    }

    async fn read(&self, symbol: &str) -> Result<InstrumentFile, AnalysisError> {
        let path = self.path_for(symbol);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AnalysisError::Provider(format!("{}: {}", path.display(), e)))?;
        let file: InstrumentFile = serde_json::from_str(&raw)
            .map_err(|e| AnalysisError::InvalidData(format!("{}: {}", path.display(), e)))?;

        if !file.symbol.eq_ignore_ascii_case(symbol) {
            return Err(AnalysisError::InvalidData(format!(
                "{} holds {} instead of {}",
                path.display(),
                file.symbol,
                symbol
            )));
        }
        Ok(file)
    }

    /// Everything the engine needs for `symbol` from one read of its file
    pub async fn snapshot(&self, symbol: &str) -> Result<InstrumentSnapshot, AnalysisError> {
        let file = self.read(symbol).await?;
        let prices = chronological(file.prices);

        tracing::debug!(
            symbol,
            bars = prices.len(),
            headlines = file.headlines.len(),
            "snapshot loaded"
        );

        Ok(InstrumentSnapshot {
            symbol: symbol.to_uppercase(),
            prices,
            fundamentals: file.fundamentals,
            headlines: file.headlines,
        })
    }
}

fn chronological(mut prices: Vec<PriceBar>) -> Vec<PriceBar> {
    prices.sort_by_key(|b| b.timestamp);
    prices
}

#[async_trait]
impl MarketDataProvider for JsonFileProvider {
    async fn get_price_history(&self, symbol: &str) -> Result<Vec<PriceBar>, AnalysisError> {
        Ok(chronological(self.read(symbol).await?.prices))
    }
}

#[async_trait]
impl FundamentalsProvider for JsonFileProvider {
    async fn get_fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, AnalysisError> {
        Ok(self.read(symbol).await?.fundamentals)
    }
}

#[async_trait]
impl HeadlineProvider for JsonFileProvider {
    async fn get_headlines(&self, symbol: &str) -> Result<Vec<Headline>, AnalysisError> {
        Ok(self.read(symbol).await?.headlines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "symbol": "ACME",
        "prices": [
            {"timestamp": "2024-01-03T00:00:00Z", "open": 11.0, "high": 12.0, "low": 10.5, "close": 11.5, "volume": 1200.0},
            {"timestamp": "2024-01-02T00:00:00Z", "open": 10.0, "high": 11.0, "low": 9.5, "close": 10.5, "volume": 1000.0}
        ],
        "fundamentals": {"operatingMargin": 0.21, "forwardPE": 14.0},
        "headlines": [{"title": "ACME beats estimates", "publishedAt": "2024-01-03T09:00:00Z"}]
    }"#;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("verdict-cli-{}-{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_reads_whole_snapshot() {
        let dir = temp_dir("read");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("ACME.json"), SAMPLE).await.unwrap();

        let provider = JsonFileProvider::new(&dir);
        let snapshot = provider.snapshot("acme").await.unwrap();
        let prices = provider.get_price_history("ACME").await.unwrap();
        tokio::fs::remove_dir_all(&dir).await.ok();

        assert_eq!(prices[0].close, snapshot.prices[0].close);

        assert_eq!(snapshot.symbol, "ACME");
        assert_eq!(snapshot.prices.len(), 2);
        // re-ordered chronologically
        assert_eq!(snapshot.prices[0].close, 10.5);
        assert_eq!(snapshot.fundamentals.forward_pe, Some(14.0));
        assert!(snapshot.fundamentals.total_cash.is_none());
        assert_eq!(snapshot.headlines.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_provider_error() {
        let provider = JsonFileProvider::new(temp_dir("missing"));
        let err = provider.get_fundamentals("NOPE").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Provider(_)));
    }

    #[tokio::test]
    async fn test_symbol_mismatch_is_invalid_data() {
        let dir = temp_dir("mismatch");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("OTHER.json"), SAMPLE).await.unwrap();

        let provider = JsonFileProvider::new(&dir);
        let err = provider.get_headlines("OTHER").await.unwrap_err();
        tokio::fs::remove_dir_all(&dir).await.ok();

        assert!(matches!(err, AnalysisError::InvalidData(_)));
    }
}
