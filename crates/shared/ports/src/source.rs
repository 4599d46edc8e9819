use crate::error::SourceResult;
use async_trait::async_trait;
use vigil_core::{IndicatorReadings, MarketSeries};

/// One pass worth of upstream input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pub readings: IndicatorReadings,
    pub series: MarketSeries,
}

impl Observation {
    pub fn new(readings: IndicatorReadings, series: MarketSeries) -> Self {
        Self { readings, series }
    }
}

/// Port for the ingestion layer feeding the monitor
///
/// Implementations adapt whatever upstream payload they receive into typed
/// readings and series. The engine never sees raw payloads.
#[async_trait]
pub trait ReadingsSource: Send + Sync {
    /// Fetch the latest observation
    async fn fetch(&self) -> SourceResult<Observation>;

    /// Source name for logging
    fn name(&self) -> &str {
        "ReadingsSource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceError;

    struct StaticSource(IndicatorReadings);

    #[async_trait]
    impl ReadingsSource for StaticSource {
        async fn fetch(&self) -> SourceResult<Observation> {
            Ok(Observation::new(self.0.clone(), MarketSeries::default()))
        }
    }

    struct DownSource;

    #[async_trait]
    impl ReadingsSource for DownSource {
        async fn fetch(&self) -> SourceResult<Observation> {
            Err(SourceError::Unavailable("feed offline".into()))
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    #[tokio::test]
    async fn test_trait_objects() {
        let mut readings = IndicatorReadings::new();
        readings.insert("ted_spread".into(), 0.4);

        let sources: Vec<Box<dyn ReadingsSource>> =
            vec![Box::new(StaticSource(readings)), Box::new(DownSource)];

        let first = sources[0].fetch().await.unwrap();
        assert_eq!(first.readings.get("ted_spread"), Some(&0.4));
        assert_eq!(sources[0].name(), "ReadingsSource");

        let second = sources[1].fetch().await;
        assert!(matches!(second, Err(SourceError::Unavailable(_))));
    }
}
