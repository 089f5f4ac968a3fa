//! This module provides the `SupervisorBuilder` for constructing a `Supervisor`.

use std::sync::Arc;

use crate::aggregator::BlockRangeAggregator;
use crate::feed::BlockFeed;
use crate::price::PriceLookup;
use crate::providers::traits::ChainDataSource;

use super::{Supervisor, SupervisorError};

/// A builder for creating a `Supervisor` instance.
#[derive(Default)]
pub struct SupervisorBuilder {
    config: Option<crate::config::AppConfig>,
    data_source: Option<Arc<dyn ChainDataSource>>,
    price_lookup: Option<Arc<dyn PriceLookup>>,
}

impl SupervisorBuilder {
    /// Creates a new, empty `SupervisorBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application configuration for the `Supervisor`.
    pub fn config(mut self, config: crate::config::AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the chain data source (the node RPC client) for the `Supervisor`.
    pub fn data_source(mut self, data_source: Arc<dyn ChainDataSource>) -> Self {
        self.data_source = Some(data_source);
        self
    }

    /// Sets the historical price lookup for the `Supervisor`.
    pub fn price_lookup(mut self, price_lookup: Arc<dyn PriceLookup>) -> Self {
        self.price_lookup = Some(price_lookup);
        self
    }

    /// Assembles and validates the components to build a `Supervisor`.
    ///
    /// Performs the final wiring: the aggregator over the provided data
    /// source and price lookup, and the live feed with its configured dedup
    /// window.
    pub fn build(self) -> Result<Supervisor, SupervisorError> {
        let config = self.config.ok_or(SupervisorError::MissingConfig)?;
        let data_source = self.data_source.ok_or(SupervisorError::MissingDataSource)?;
        let price_lookup = self.price_lookup.ok_or(SupervisorError::MissingPriceLookup)?;

        let aggregator = Arc::new(BlockRangeAggregator::new(
            Arc::clone(&data_source),
            price_lookup,
            config.concurrency,
        ));
        let feed = Arc::new(BlockFeed::new(config.feed_dedup_capacity));

        Ok(Supervisor::new(config, data_source, aggregator, feed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::price::MockPriceLookup;
    use crate::providers::traits::MockChainDataSource;

    #[test]
    fn test_build_fails_without_config() {
        let result = SupervisorBuilder::new()
            .data_source(Arc::new(MockChainDataSource::new()))
            .price_lookup(Arc::new(MockPriceLookup::new()))
            .build();
        assert!(matches!(result, Err(SupervisorError::MissingConfig)));
    }

    #[test]
    fn test_build_fails_without_data_source() {
        let result = SupervisorBuilder::new()
            .config(AppConfig::default())
            .price_lookup(Arc::new(MockPriceLookup::new()))
            .build();
        assert!(matches!(result, Err(SupervisorError::MissingDataSource)));
    }

    #[test]
    fn test_build_fails_without_price_lookup() {
        let result = SupervisorBuilder::new()
            .config(AppConfig::default())
            .data_source(Arc::new(MockChainDataSource::new()))
            .build();
        assert!(matches!(result, Err(SupervisorError::MissingPriceLookup)));
    }

    #[test]
    fn test_build_succeeds_with_all_components() {
        let result = SupervisorBuilder::new()
            .config(AppConfig::default())
            .data_source(Arc::new(MockChainDataSource::new()))
            .price_lookup(Arc::new(MockPriceLookup::new()))
            .build();
        assert!(result.is_ok());
    }
}
