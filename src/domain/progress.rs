use crate::domain::models::ProgressSample;
use serde::Serialize;

const INDICATOR_BASELINE_KG: f64 = 50.0;

/// Append-only, insertion-ordered record of (day, weight) samples for one session.
///
/// Range checks happen before samples get here; the ledger accepts whatever it
/// is given, including repeated days.
#[derive(Debug, Clone, Default)]
pub struct ProgressLedger {
    samples: Vec<ProgressSample>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSeries {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<ProgressSample>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProgressView {
    Empty,
    NonEmpty { completion: u8, chart: ChartSeries },
}

impl ProgressLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, day: u32, weight: f64) -> &[ProgressSample] {
        self.samples.push(ProgressSample { day, weight });
        &self.samples
    }

    pub fn render(&self) -> ProgressView {
        let Some(last) = self.samples.last() else {
            return ProgressView::Empty;
        };
        ProgressView::NonEmpty {
            completion: completion_indicator(last.weight),
            chart: ChartSeries {
                title: "Weight Progress Over Time",
                x_label: "Day",
                y_label: "Weight (kg)",
                points: self.samples.clone(),
            },
        }
    }
}

/// `clamp(0, 100, (weight - 50) * 2)`, truncated toward zero.
pub fn completion_indicator(weight: f64) -> u8 {
    let raw = (weight - INDICATOR_BASELINE_KG) * 2.0;
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0) as u8
}
