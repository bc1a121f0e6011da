// Polling service - Periodic fetch cycle feeding the series store
use crate::application::environment_repository::EnvironmentRepository;
use crate::application::live_series::LiveSeries;
use crate::domain::environment::{Attribute, Batch};
use crate::domain::time::to_samples;
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// What a single fetch cycle did to the store
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Appended(usize),
    /// At least one attribute came back empty; store untouched
    SkippedEmpty,
    /// Data arrived but could not be applied; store untouched
    Rejected(String),
}

#[derive(Clone)]
pub struct PollingService {
    repository: Arc<dyn EnvironmentRepository>,
    last_n: u32,
    timezone: Tz,
}

impl PollingService {
    pub fn new(repository: Arc<dyn EnvironmentRepository>, last_n: u32, timezone: Tz) -> Self {
        Self {
            repository,
            last_n,
            timezone,
        }
    }

    /// Fetch all three attributes and append them to `series` only if every one returned data.
    pub async fn run_cycle(&self, series: &LiveSeries) -> CycleOutcome {
        let (luminosity, temperature, humidity) = futures::future::join3(
            self.repository.fetch(Attribute::Luminosity, self.last_n),
            self.repository.fetch(Attribute::Temperature, self.last_n),
            self.repository.fetch(Attribute::Humidity, self.last_n),
        )
        .await;

        if luminosity.is_empty() || temperature.is_empty() || humidity.is_empty() {
            tracing::info!(
                luminosity = luminosity.len(),
                temperature = temperature.len(),
                humidity = humidity.len(),
                "Skipping cycle, at least one attribute returned no data"
            );
            return CycleOutcome::SkippedEmpty;
        }

        // Luminosity instants index the whole batch
        let luminosity = match to_samples(&luminosity, self.timezone) {
            Ok(samples) => samples,
            Err(e) => {
                tracing::error!(error = %e, "Discarding batch");
                return CycleOutcome::Rejected(e.to_string());
            }
        };
        let batch = Batch::from_samples(
            luminosity,
            temperature.iter().map(|r| r.value).collect(),
            humidity.iter().map(|r| r.value).collect(),
        );

        match series.append(batch).await
        {
            Ok(appended) => CycleOutcome::Appended(appended),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding batch");
                CycleOutcome::Rejected(e.to_string())
            }
        }
    }

    /// Run a fetch cycle on every tick, forever.
    ///
    /// Each cycle runs as its own task so a hung request never delays the next tick.
    pub async fn run(self, series: Arc<LiveSeries>, every: Duration) {
        tracing::info!(
            interval_secs = every.as_secs(),
            last_n = self.last_n,
            timezone = %self.timezone,
            "Starting polling scheduler"
        );

        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let service = self.clone();
            let series = series.clone();
            tokio::spawn(async move {
                let outcome = service.run_cycle(&series).await;
                let total = series.len().await;
                tracing::debug!(?outcome, total, "Fetch cycle finished");
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::environment::Reading;
    use crate::domain::series_store::RetentionPolicy;
    use async_trait::async_trait;
    use chrono::Timelike;
    use chrono_tz::America::Sao_Paulo;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves a queue of canned responses per attribute, empty once exhausted
    #[derive(Default)]
    struct FakeRepository {
        responses: Mutex<HashMap<Attribute, Vec<Vec<Reading>>>>,
    }

    impl FakeRepository {
        fn with(self, attribute: Attribute, readings: Vec<Reading>) -> Self {
            self.responses
                .lock()
                .unwrap()
                .entry(attribute)
                .or_default()
                .push(readings);
            self
        }

        fn with_all(self, readings: Vec<Reading>) -> Self {
            self.with(Attribute::Luminosity, readings.clone())
                .with(Attribute::Temperature, readings.clone())
                .with(Attribute::Humidity, readings)
        }
    }

    #[async_trait]
    impl EnvironmentRepository for FakeRepository {
        async fn fetch(&self, attribute: Attribute, _last_n: u32) -> Vec<Reading> {
            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(&attribute) {
                Some(queue) if !queue.is_empty() => queue.remove(0),
                _ => Vec::new(),
            }
        }
    }

    fn window(start_secs: u32, count: u32) -> Vec<Reading> {
        (start_secs..start_secs + count)
            .map(|s| Reading::new(format!("2024-01-01T12:00:{:02}.000Z", s), s as f64))
            .collect()
    }

    fn service(repository: FakeRepository) -> PollingService {
        PollingService::new(Arc::new(repository), 10, Sao_Paulo)
    }

    #[tokio::test]
    async fn test_single_reading_cycle() {
        let repo = FakeRepository::default()
            .with_all(vec![Reading::new("2024-01-01T12:00:00.000Z", 23.5)]);
        let series = LiveSeries::new(RetentionPolicy::default());

        let outcome = service(repo).run_cycle(&series).await;

        assert_eq!(outcome, CycleOutcome::Appended(1));
        let snapshot = series.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.timestamps[0].hour(), 9);
        assert_eq!(snapshot.luminosity, vec![23.5]);
        assert_eq!(snapshot.temperature, vec![23.5]);
        assert_eq!(snapshot.humidity, vec![23.5]);
    }

    #[tokio::test]
    async fn test_empty_attribute_skips_cycle() {
        let repo = FakeRepository::default()
            .with(Attribute::Luminosity, window(0, 3))
            .with(Attribute::Temperature, window(0, 3));
        let series = LiveSeries::new(RetentionPolicy::default());

        let outcome = service(repo).run_cycle(&series).await;

        assert_eq!(outcome, CycleOutcome::SkippedEmpty);
        assert_eq!(series.len().await, 0);
        assert_eq!(series.version(), 0);
    }

    #[tokio::test]
    async fn test_overlapping_cycles_keep_duplicates() {
        let repo = FakeRepository::default()
            .with_all(window(0, 10))
            .with_all(window(5, 10));
        let series = LiveSeries::new(RetentionPolicy::default());
        let service = service(repo);

        assert_eq!(service.run_cycle(&series).await, CycleOutcome::Appended(10));
        assert_eq!(service.run_cycle(&series).await, CycleOutcome::Appended(10));

        assert_eq!(series.len().await, 20);
        assert_eq!(series.version(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_timestamp_rejects_batch() {
        let mut readings = window(0, 2);
        readings.push(Reading::new("not a time", 1.0));
        let repo = FakeRepository::default()
            .with(Attribute::Luminosity, readings)
            .with(Attribute::Temperature, window(0, 3))
            .with(Attribute::Humidity, window(0, 3));
        let series = LiveSeries::new(RetentionPolicy::default());

        let outcome = service(repo).run_cycle(&series).await;

        assert!(matches!(outcome, CycleOutcome::Rejected(_)));
        assert_eq!(series.len().await, 0);
    }

    #[tokio::test]
    async fn test_mismatched_attribute_lengths_rejected() {
        let repo = FakeRepository::default()
            .with(Attribute::Luminosity, window(0, 3))
            .with(Attribute::Temperature, window(0, 2))
            .with(Attribute::Humidity, window(0, 3));
        let series = LiveSeries::new(RetentionPolicy::default());

        let outcome = service(repo).run_cycle(&series).await;

        assert!(matches!(outcome, CycleOutcome::Rejected(_)));
        assert!(series.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_only_luminosity_timestamps_are_parsed() {
        let mut humidity = window(0, 2);
        humidity.push(Reading::new("bogus", 60.0));
        let repo = FakeRepository::default()
            .with(Attribute::Luminosity, window(0, 3))
            .with(Attribute::Temperature, window(0, 3))
            .with(Attribute::Humidity, humidity);
        let series = LiveSeries::new(RetentionPolicy::default());

        let outcome = service(repo).run_cycle(&series).await;

        assert_eq!(outcome, CycleOutcome::Appended(3));
        let snapshot = series.snapshot().await;
        assert_eq!(snapshot.humidity, vec![0.0, 1.0, 60.0]);
        assert_eq!(snapshot.timestamps[2].second(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_appends_on_every_tick() {
        let repo = FakeRepository::default()
            .with_all(window(0, 10))
            .with_all(window(5, 10));
        let series = Arc::new(LiveSeries::new(RetentionPolicy::default()));
        let mut changes = series.subscribe();

        let handle = tokio::spawn(service(repo).run(series.clone(), Duration::from_secs(10)));

        // First tick fires immediately, the second after one interval of paused time
        changes.changed().await.unwrap();
        assert_eq!(series.len().await, 10);
        changes.changed().await.unwrap();
        assert_eq!(series.len().await, 20);

        handle.abort();
    }
}
