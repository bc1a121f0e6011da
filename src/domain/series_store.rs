// In-memory accumulator for the environment series
use chrono::DateTime;
use chrono_tz::Tz;

use super::environment::Batch;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error(
        "batch sequences differ in length (timestamps={timestamps}, luminosity={luminosity}, temperature={temperature}, humidity={humidity})"
    )]
    LengthMismatch {
        timestamps: usize,
        luminosity: usize,
        temperature: usize,
        humidity: usize,
    },
}

/// How much history the store keeps and whether overlapping fetch windows are collapsed.
///
/// The default keeps everything, duplicates included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub max_samples: Option<usize>,
    pub deduplicate: bool,
}

/// Consistent copy of the four sequences
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSnapshot {
    pub timestamps: Vec<DateTime<Tz>>,
    pub luminosity: Vec<f64>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
}

impl SeriesSnapshot {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
            || self.luminosity.is_empty()
            || self.temperature.is_empty()
            || self.humidity.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    series: SeriesSnapshot,
    policy: RetentionPolicy,
}

impl SeriesStore {
    pub fn new(policy: RetentionPolicy) -> Self {
        Self {
            series: SeriesSnapshot::default(),
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn snapshot(&self) -> SeriesSnapshot {
        self.series.clone()
    }

    /// Append a batch to the end of every sequence.
    ///
    /// All-or-nothing: a batch whose sequences differ in length is rejected and the
    /// store is left unchanged. Returns the number of samples actually appended.
    pub fn append_batch(&mut self, batch: Batch) -> Result<usize, StoreError> {
        if !batch.is_aligned() {
            return Err(StoreError::LengthMismatch {
                timestamps: batch.timestamps.len(),
                luminosity: batch.luminosity.len(),
                temperature: batch.temperature.len(),
                humidity: batch.humidity.len(),
            });
        }

        let batch = if self.policy.deduplicate {
            self.drop_seen(batch)
        } else {
            batch
        };
        if batch.is_empty() {
            return Ok(0);
        }
        let appended = batch.len();

        self.series.timestamps.extend(batch.timestamps);
        self.series.luminosity.extend(batch.luminosity);
        self.series.temperature.extend(batch.temperature);
        self.series.humidity.extend(batch.humidity);

        if let Some(max) = self.policy.max_samples {
            self.truncate_front(max);
        }

        Ok(appended)
    }

    /// Keep only samples newer than the last stored timestamp
    fn drop_seen(&self, batch: Batch) -> Batch {
        let Some(last) = self.series.timestamps.last().copied() else {
            return batch;
        };

        let keep: Vec<bool> = batch.timestamps.iter().map(|t| *t > last).collect();
        let filter = |values: Vec<f64>| -> Vec<f64> {
            values
                .into_iter()
                .zip(&keep)
                .filter_map(|(v, k)| k.then_some(v))
                .collect()
        };

        Batch::new(
            batch
                .timestamps
                .iter()
                .zip(&keep)
                .filter_map(|(t, k)| k.then_some(*t))
                .collect(),
            filter(batch.luminosity),
            filter(batch.temperature),
            filter(batch.humidity),
        )
    }

    fn truncate_front(&mut self, max: usize) {
        let excess = self.series.len().saturating_sub(max);
        if excess == 0 {
            return;
        }
        self.series.timestamps.drain(..excess);
        self.series.luminosity.drain(..excess);
        self.series.temperature.drain(..excess);
        self.series.humidity.drain(..excess);
    }
}
