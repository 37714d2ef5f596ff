//! Report dashboard sections: sortable, filterable tables over precomputed
//! payloads, a recent-activity bar chart, and CSV export of what is visible.

pub mod chart;
pub mod csv;
pub mod table;

use std::collections::HashMap;

use crate::models::report::ReportRow;
use chart::ChartBar;
use table::{HeaderCell, TableQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSection {
    VolunteerHours,
    EventAttendance,
    Donations,
    Users,
}

/// Every action on `reports`; holding any of them opens the reports page.
pub const REPORT_ACTIONS: [&str; 4] = [
    "view_volunteer_hours",
    "view_event_attendance",
    "view_donations",
    "view_users",
];

impl ReportSection {
    pub const ALL: [ReportSection; 4] = [
        ReportSection::VolunteerHours,
        ReportSection::EventAttendance,
        ReportSection::Donations,
        ReportSection::Users,
    ];

    /// Query-parameter prefix and privilege suffix.
    pub fn key(self) -> &'static str {
        match self {
            ReportSection::VolunteerHours => "volunteer_hours",
            ReportSection::EventAttendance => "event_attendance",
            ReportSection::Donations => "donations",
            ReportSection::Users => "users",
        }
    }

    /// URL segment, also the page anchor.
    pub fn slug(self) -> &'static str {
        match self {
            ReportSection::VolunteerHours => "volunteer-hours",
            ReportSection::EventAttendance => "event-attendance",
            ReportSection::Donations => "donations",
            ReportSection::Users => "users",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportSection::VolunteerHours => "Volunteer Hours",
            ReportSection::EventAttendance => "Event Attendance",
            ReportSection::Donations => "Donations",
            ReportSection::Users => "Users",
        }
    }

    /// Action on the `reports` resource that unlocks this section.
    pub fn action(self) -> &'static str {
        match self {
            ReportSection::VolunteerHours => "view_volunteer_hours",
            ReportSection::EventAttendance => "view_event_attendance",
            ReportSection::Donations => "view_donations",
            ReportSection::Users => "view_users",
        }
    }

    pub fn endpoint(self) -> String {
        format!("/reports/{}", self.slug())
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }
}

/// What a section renders as, after its own guard and fetch settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStatus {
    Loading,
    Denied,
    Failed(String),
    Loaded,
}

#[derive(Debug, Clone)]
pub struct SectionView {
    pub slug: String,
    pub key: String,
    pub title: String,
    pub status: SectionStatus,
    pub summary: Vec<(String, String)>,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub chart: Vec<ChartBar>,
    pub filter: String,
    /// Hidden inputs that keep the other tables' state when this filter is submitted.
    pub carried_params: Vec<(String, String)>,
    pub csv_href: String,
}

impl SectionView {
    fn empty(section: ReportSection, status: SectionStatus) -> Self {
        SectionView {
            slug: section.slug().to_string(),
            key: section.key().to_string(),
            title: section.title().to_string(),
            status,
            summary: vec![],
            headers: vec![],
            rows: vec![],
            total_rows: 0,
            chart: vec![],
            filter: String::new(),
            carried_params: vec![],
            csv_href: String::new(),
        }
    }

    pub fn loading(section: ReportSection) -> Self {
        Self::empty(section, SectionStatus::Loading)
    }

    pub fn denied(section: ReportSection) -> Self {
        Self::empty(section, SectionStatus::Denied)
    }

    pub fn failed(section: ReportSection, message: String) -> Self {
        Self::empty(section, SectionStatus::Failed(message))
    }

    pub fn loaded<R: ReportRow>(
        section: ReportSection,
        summary: Vec<(String, String)>,
        records: &[R],
        params: &HashMap<String, String>,
        chart_limit: usize,
    ) -> Self {
        let query = TableQuery::from_params(params, section.key());
        let visible = table::visible_rows(records, &query);
        let own_prefix = format!("{}_", section.key());
        let mut carried: Vec<(String, String)> = params
            .iter()
            .filter(|(k, _)| !k.starts_with(&own_prefix) || k.ends_with("_sort") || k.ends_with("_dir"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        carried.sort();
        let csv_query = serde_urlencoded::to_string(query.to_params(section.key())).unwrap_or_default();

        SectionView {
            headers: table::header_cells::<R>("/reports", params, section.key(), &query, section.slug()),
            rows: table::render_rows(&visible),
            total_rows: records.len(),
            chart: chart::recent_series(records, chart_limit),
            filter: query.filter.clone(),
            carried_params: carried,
            csv_href: if csv_query.is_empty() {
                format!("/reports/{}.csv", section.slug())
            } else {
                format!("/reports/{}.csv?{csv_query}", section.slug())
            },
            summary,
            ..Self::empty(section, SectionStatus::Loaded)
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.status == SectionStatus::Loaded
    }

    pub fn is_loading(&self) -> bool {
        self.status == SectionStatus::Loading
    }

    pub fn is_denied(&self) -> bool {
        self.status == SectionStatus::Denied
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            SectionStatus::Failed(m) => Some(m),
            _ => None,
        }
    }
}

/// CSV of the rows a section table currently shows.
pub fn export_csv<R: ReportRow>(section: ReportSection, records: &[R], params: &HashMap<String, String>) -> String {
    let query = TableQuery::from_params(params, section.key());
    let visible = table::visible_rows(records, &query);
    csv::to_csv(&table::header_labels::<R>(), &table::render_rows(&visible))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::EventAttendanceRecord;

    fn event(name: &str, date: &str, rate: f64) -> EventAttendanceRecord {
        EventAttendanceRecord {
            event_name: Some(name.to_string()),
            event_date: Some(date.to_string()),
            registered: Some(10),
            attended: Some((rate / 10.0) as i64),
            attendance_rate: Some(rate),
        }
    }

    #[test]
    fn slugs_round_trip() {
        for s in ReportSection::ALL {
            assert_eq!(ReportSection::from_slug(s.slug()), Some(s));
        }
        assert_eq!(ReportSection::from_slug("payroll"), None);
        assert_eq!(ReportSection::Donations.action(), "view_donations");
        let actions: Vec<&str> = ReportSection::ALL.iter().map(|s| s.action()).collect();
        assert_eq!(actions, REPORT_ACTIONS);
        assert_eq!(ReportSection::VolunteerHours.endpoint(), "/reports/volunteer-hours");
    }

    #[test]
    fn export_follows_filter_and_sort() {
        let records = vec![
            event("Beach cleanup", "2024-03-01", 80.0),
            event("Food drive", "2024-02-01", 50.0),
            event("Beach party", "2024-01-01", 90.0),
        ];
        let params: HashMap<String, String> = [
            ("event_attendance_q", "beach"),
            ("event_attendance_sort", "attendance_rate"),
            ("event_attendance_dir", "desc"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let csv = export_csv(ReportSection::EventAttendance, &records, &params);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"Beach party\""));
        assert!(lines[2].starts_with("\"Beach cleanup\""));
    }

    #[test]
    fn loaded_view_links_csv_with_table_state() {
        let records = vec![event("A", "2024-01-01", 10.0)];
        let params: HashMap<String, String> =
            [("event_attendance_q".to_string(), "a".to_string()), ("users_q".to_string(), "x".to_string())]
                .into_iter()
                .collect();
        let view = SectionView::loaded(ReportSection::EventAttendance, vec![], &records, &params, 10);
        assert!(view.is_loaded());
        assert_eq!(view.csv_href, "/reports/event-attendance.csv?event_attendance_q=a");
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.chart.len(), 1);
        assert_eq!(view.carried_params, vec![("users_q".to_string(), "x".to_string())]);
    }
}
