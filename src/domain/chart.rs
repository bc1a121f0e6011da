// Declarative chart description handed to the presentation layer
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceMode {
    #[serde(rename = "lines+markers")]
    LinesMarkers,
    #[serde(rename = "lines")]
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashStyle {
    Solid,
    Dash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverMode {
    /// Nearest point
    Closest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub dash: DashStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub mode: TraceMode,
    pub line: LineStyle,
}

impl Trace {
    pub fn new(
        name: impl Into<String>,
        x: Vec<String>,
        y: Vec<f64>,
        mode: TraceMode,
        color: impl Into<String>,
        dash: DashStyle,
    ) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            mode,
            line: LineStyle {
                color: color.into(),
                dash,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    pub xaxis: AxisTitle,
    pub yaxis: AxisTitle,
    pub hovermode: HoverMode,
}

/// A full figure, or the explicit "no data" chart which serializes as `{}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartDescription {
    Figure { data: Vec<Trace>, layout: Layout },
    Empty {},
}

impl ChartDescription {
    pub fn empty() -> Self {
        ChartDescription::Empty {}
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ChartDescription::Empty {})
    }

    pub fn traces(&self) -> &[Trace] {
        match self {
            ChartDescription::Figure { data, .. } => data,
            ChartDescription::Empty {} => &[],
        }
    }
}

impl Default for ChartDescription {
    fn default() -> Self {
        Self::empty()
    }
}
