use crate::models::report::{CellValue, ReportRow};

/// One bar of a section chart, scaled against the largest value shown.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub date: String,
    pub label: String,
    pub value: String,
    pub width_pct: u32,
}

/// The most recent `limit` dated records, oldest first.
pub fn recent_series<R: ReportRow>(records: &[R], limit: usize) -> Vec<ChartBar> {
    let mut points: Vec<_> = records.iter().filter_map(|r| r.chart_point()).collect();
    points.sort_by(|a, b| b.0.cmp(&a.0));
    points.truncate(limit);
    points.reverse();

    let max = points.iter().map(|p| p.2).fold(0.0_f64, f64::max);
    points
        .into_iter()
        .map(|(date, label, value)| ChartBar {
            date: date.format("%Y-%m-%d").to_string(),
            label,
            value: CellValue::Number(value).display(),
            width_pct: if max > 0.0 {
                ((value.max(0.0) / max) * 100.0).round() as u32
            } else {
                0
            },
        })
        .collect()
}
