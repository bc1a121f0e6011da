// Chart service - Builds the chart description from the accumulated series
use crate::application::live_series::LiveSeries;
use crate::domain::chart::{AxisTitle, ChartDescription, DashStyle, HoverMode, Layout, Trace, TraceMode};
use crate::domain::environment::Attribute;
use crate::domain::series_store::SeriesSnapshot;
use chrono::DateTime;
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;

pub const CHART_TITLE: &str = "Environmental Data Over Time";
pub const X_AXIS_TITLE: &str = "Timestamp";
pub const Y_AXIS_TITLE: &str = "Environment Data";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

fn raw_color(attribute: Attribute) -> &'static str {
    match attribute {
        Attribute::Luminosity => "orange",
        Attribute::Temperature => "red",
        Attribute::Humidity => "green",
    }
}

fn mean_color(attribute: Attribute) -> &'static str {
    match attribute {
        Attribute::Luminosity => "blue",
        Attribute::Temperature => "purple",
        Attribute::Humidity => "cyan",
    }
}

fn values(snapshot: &SeriesSnapshot, attribute: Attribute) -> &[f64] {
    match attribute {
        Attribute::Luminosity => &snapshot.luminosity,
        Attribute::Temperature => &snapshot.temperature,
        Attribute::Humidity => &snapshot.humidity,
    }
}

/// Arithmetic mean over the whole history; `None` for an empty series
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn format_timestamp(timestamp: &DateTime<Tz>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Build the six-trace figure for `snapshot`, or the empty chart when any series is empty.
pub fn render(snapshot: &SeriesSnapshot) -> ChartDescription {
    if snapshot.is_empty() {
        return ChartDescription::empty();
    }

    let x: Vec<String> = snapshot.timestamps.iter().map(format_timestamp).collect();
    // is_empty() above guarantees both ends exist
    let span = vec![x[0].clone(), x[x.len() - 1].clone()];

    let mut data = Vec::with_capacity(6);
    for attribute in Attribute::ALL {
        data.push(Trace::new(
            attribute.label(),
            x.clone(),
            values(snapshot, attribute).to_vec(),
            TraceMode::LinesMarkers,
            raw_color(attribute),
            DashStyle::Solid,
        ));
    }
    for attribute in Attribute::ALL {
        let Some(avg) = mean(values(snapshot, attribute)) else {
            return ChartDescription::empty();
        };
        data.push(Trace::new(
            format!("Mean {}", attribute.label()),
            span.clone(),
            vec![avg, avg],
            TraceMode::Lines,
            mean_color(attribute),
            DashStyle::Dash,
        ));
    }

    ChartDescription::Figure {
        data,
        layout: Layout {
            title: CHART_TITLE.to_string(),
            xaxis: AxisTitle {
                title: X_AXIS_TITLE.to_string(),
            },
            yaxis: AxisTitle {
                title: Y_AXIS_TITLE.to_string(),
            },
            hovermode: HoverMode::Closest,
        },
    }
}

/// Keeps the latest chart description, re-rendered whenever the series change
#[derive(Clone)]
pub struct ChartService {
    latest: Arc<watch::Sender<Arc<ChartDescription>>>,
}

impl ChartService {
    pub fn new() -> Self {
        let (latest, _) = watch::channel(Arc::new(ChartDescription::empty()));
        Self {
            latest: Arc::new(latest),
        }
    }

    pub fn latest(&self) -> Arc<ChartDescription> {
        self.latest.borrow().clone()
    }

    pub async fn refresh(&self, series: &LiveSeries) {
        let snapshot = series.snapshot().await;
        let chart = render(&snapshot);
        tracing::debug!(
            version = series.version(),
            samples = snapshot.len(),
            traces = chart.traces().len(),
            empty = chart.is_empty(),
            "Rendered chart"
        );
        self.latest.send_replace(Arc::new(chart));
    }

    /// Render once, then again on every store change.
    pub async fn run(self, series: Arc<LiveSeries>) {
        tracing::info!("Starting render pass");

        // WatchStream yields the current version first, covering the initial render
        let mut changes = WatchStream::new(series.subscribe());
        while let Some(version) = changes.next().await {
            tracing::trace!(version, "Series changed");
            self.refresh(&series).await;
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
