// Environment reading domain models
use chrono::DateTime;
use chrono_tz::Tz;

/// One measured property of the monitored lamp entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Luminosity,
    Temperature,
    Humidity,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [
        Attribute::Luminosity,
        Attribute::Temperature,
        Attribute::Humidity,
    ];

    /// Attribute name as addressed in the STH path
    pub fn path(&self) -> &'static str {
        match self {
            Attribute::Luminosity => "luminosity",
            Attribute::Temperature => "temperature",
            Attribute::Humidity => "humidity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Attribute::Luminosity => "Luminosity",
            Attribute::Temperature => "Temperature",
            Attribute::Humidity => "Humidity",
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// A raw reading as received from the history service, timestamp still textual (UTC)
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub recv_time: String,
    pub value: f64,
}

impl Reading {
    pub fn new(recv_time: impl Into<String>, value: f64) -> Self {
        Self {
            recv_time: recv_time.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Tz>,
    pub value: f64,
}

/// One fetch cycle worth of data, four parallel sequences indexed by sample instant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub timestamps: Vec<DateTime<Tz>>,
    pub luminosity: Vec<f64>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
}

impl Batch {
    pub fn new(
        timestamps: Vec<DateTime<Tz>>,
        luminosity: Vec<f64>,
        temperature: Vec<f64>,
        humidity: Vec<f64>,
    ) -> Self {
        Self {
            timestamps,
            luminosity,
            temperature,
            humidity,
        }
    }

    /// Assemble a batch keyed on the luminosity samples' instants
    pub fn from_samples(luminosity: Vec<Sample>, temperature: Vec<f64>, humidity: Vec<f64>) -> Self {
        let timestamps = luminosity.iter().map(|s| s.timestamp).collect();
        Self {
            timestamps,
            luminosity: luminosity.into_iter().map(|s| s.value).collect(),
            temperature,
            humidity,
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn is_aligned(&self) -> bool {
        let n = self.timestamps.len();
        self.luminosity.len() == n && self.temperature.len() == n && self.humidity.len() == n
    }
}
