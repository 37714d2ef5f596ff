//! Precomputed report payloads served under `/reports/*`. Read-only.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::display::{NOT_AVAILABLE, amount_or_na, or_na, parse_date};
use super::donation::kind_label;

/// A typed cell, so sorting can compare numbers and dates by value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Missing,
}

impl CellValue {
    pub fn text(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => CellValue::Text(v.to_string()),
            _ => CellValue::Missing,
        }
    }

    pub fn number(value: Option<f64>) -> Self {
        value.map_or(CellValue::Missing, CellValue::Number)
    }

    pub fn count(value: Option<i64>) -> Self {
        value.map_or(CellValue::Missing, |v| CellValue::Number(v as f64))
    }

    /// Dates that fail to parse are kept as text.
    pub fn date(value: Option<&str>) -> Self {
        match value {
            Some(v) => parse_date(v).map_or_else(|| CellValue::text(Some(v)), CellValue::Date),
            None => CellValue::Missing,
        }
    }

    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 => format!("{n:.0}"),
            CellValue::Number(n) => format!("{n:.2}"),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Missing => NOT_AVAILABLE.to_string(),
        }
    }
}

/// Column metadata for report tables.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

/// A report endpoint's response: headline totals plus table rows.
pub trait ReportPayload: DeserializeOwned {
    type Row: ReportRow;

    fn records(&self) -> &[Self::Row];

    /// Headline (label, value) pairs shown above the table.
    fn summary(&self) -> Vec<(String, String)>;
}

/// One row of a report table.
pub trait ReportRow {
    fn columns() -> &'static [Column];

    fn cell(&self, key: &str) -> CellValue;

    /// Date, label, and value plotted in the section's bar chart.
    fn chart_point(&self) -> Option<(NaiveDate, String, f64)> {
        None
    }
}

// ---------------------------------------------------------------------------
// Volunteer hours
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolunteerHoursReport {
    #[serde(default)]
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub total_volunteers: Option<i64>,
    #[serde(default)]
    pub records: Vec<VolunteerHoursRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolunteerHoursRecord {
    #[serde(default)]
    pub volunteer_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub events_attended: Option<i64>,
    #[serde(default)]
    pub last_activity: Option<String>,
}

const VOLUNTEER_HOURS_COLUMNS: &[Column] = &[
    Column { key: "volunteer_name", label: "Volunteer" },
    Column { key: "email", label: "Email" },
    Column { key: "total_hours", label: "Hours" },
    Column { key: "events_attended", label: "Events" },
    Column { key: "last_activity", label: "Last activity" },
];

impl ReportRow for VolunteerHoursRecord {
    fn columns() -> &'static [Column] {
        VOLUNTEER_HOURS_COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "volunteer_name" => CellValue::text(self.volunteer_name.as_deref()),
            "email" => CellValue::text(self.email.as_deref()),
            "total_hours" => CellValue::number(self.total_hours),
            "events_attended" => CellValue::count(self.events_attended),
            "last_activity" => CellValue::date(self.last_activity.as_deref()),
            _ => CellValue::Missing,
        }
    }

    fn chart_point(&self) -> Option<(NaiveDate, String, f64)> {
        let date = parse_date(self.last_activity.as_deref()?)?;
        Some((date, or_na(self.volunteer_name.as_deref()), self.total_hours.unwrap_or(0.0)))
    }
}

impl ReportPayload for VolunteerHoursReport {
    type Row = VolunteerHoursRecord;

    fn records(&self) -> &[VolunteerHoursRecord] {
        &self.records
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("Total hours".into(), CellValue::number(self.total_hours).display()),
            ("Volunteers".into(), CellValue::count(self.total_volunteers).display()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Event attendance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventAttendanceReport {
    #[serde(default)]
    pub total_events: Option<i64>,
    #[serde(default)]
    pub average_attendance_rate: Option<f64>,
    #[serde(default)]
    pub records: Vec<EventAttendanceRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventAttendanceRecord {
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub registered: Option<i64>,
    #[serde(default)]
    pub attended: Option<i64>,
    /// Percentage, 0–100.
    #[serde(default)]
    pub attendance_rate: Option<f64>,
}

const EVENT_ATTENDANCE_COLUMNS: &[Column] = &[
    Column { key: "event_name", label: "Event" },
    Column { key: "event_date", label: "Date" },
    Column { key: "registered", label: "Registered" },
    Column { key: "attended", label: "Attended" },
    Column { key: "attendance_rate", label: "Rate (%)" },
];

impl ReportRow for EventAttendanceRecord {
    fn columns() -> &'static [Column] {
        EVENT_ATTENDANCE_COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "event_name" => CellValue::text(self.event_name.as_deref()),
            "event_date" => CellValue::date(self.event_date.as_deref()),
            "registered" => CellValue::count(self.registered),
            "attended" => CellValue::count(self.attended),
            "attendance_rate" => CellValue::number(self.attendance_rate),
            _ => CellValue::Missing,
        }
    }

    fn chart_point(&self) -> Option<(NaiveDate, String, f64)> {
        let date = parse_date(self.event_date.as_deref()?)?;
        Some((date, or_na(self.event_name.as_deref()), self.attendance_rate.unwrap_or(0.0)))
    }
}

impl ReportPayload for EventAttendanceReport {
    type Row = EventAttendanceRecord;

    fn records(&self) -> &[EventAttendanceRecord] {
        &self.records
    }

    fn summary(&self) -> Vec<(String, String)> {
        let rate = match self.average_attendance_rate {
            Some(r) => format!("{r:.1}%"),
            None => NOT_AVAILABLE.to_string(),
        };
        vec![
            ("Events".into(), CellValue::count(self.total_events).display()),
            ("Average attendance".into(), rate),
        ]
    }
}

// ---------------------------------------------------------------------------
// Donations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonationReport {
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub total_count: Option<i64>,
    #[serde(default)]
    pub by_type: Vec<DonationTypeTotal>,
    #[serde(default)]
    pub records: Vec<DonationReportRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonationTypeTotal {
    #[serde(default)]
    pub donation_type: Option<String>,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonationReportRecord {
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub donation_type: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub donation_date: Option<String>,
}

const DONATION_COLUMNS: &[Column] = &[
    Column { key: "donation_date", label: "Date" },
    Column { key: "donor_name", label: "Donor" },
    Column { key: "donation_type", label: "Type" },
    Column { key: "amount", label: "Amount" },
    Column { key: "currency", label: "Currency" },
];

impl ReportRow for DonationReportRecord {
    fn columns() -> &'static [Column] {
        DONATION_COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "donation_date" => CellValue::date(self.donation_date.as_deref()),
            "donor_name" => CellValue::text(self.donor_name.as_deref()),
            "donation_type" => match self.donation_type.as_deref() {
                Some(_) => CellValue::Text(kind_label(self.donation_type.as_deref())),
                None => CellValue::Missing,
            },
            "amount" => CellValue::number(self.amount),
            "currency" => CellValue::text(self.currency.as_deref()),
            _ => CellValue::Missing,
        }
    }

    fn chart_point(&self) -> Option<(NaiveDate, String, f64)> {
        let date = parse_date(self.donation_date.as_deref()?)?;
        Some((date, or_na(self.donor_name.as_deref()), self.amount?))
    }
}

impl ReportPayload for DonationReport {
    type Row = DonationReportRecord;

    fn records(&self) -> &[DonationReportRecord] {
        &self.records
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut stats = vec![
            (
                "Total monetary".into(),
                amount_or_na(self.total_amount, self.currency.as_deref()),
            ),
            ("Donations".into(), CellValue::count(self.total_count).display()),
        ];
        for t in &self.by_type {
            stats.push((
                kind_label(t.donation_type.as_deref()),
                format!(
                    "{} ({})",
                    CellValue::count(t.count).display(),
                    amount_or_na(t.total_amount, self.currency.as_deref())
                ),
            ));
        }
        stats
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserReport {
    #[serde(default)]
    pub total_users: Option<i64>,
    #[serde(default)]
    pub by_status: BTreeMap<String, i64>,
    #[serde(default)]
    pub records: Vec<UserReportRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserReportRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

const USER_COLUMNS: &[Column] = &[
    Column { key: "name", label: "Name" },
    Column { key: "email", label: "Email" },
    Column { key: "status", label: "Status" },
    Column { key: "roles", label: "Roles" },
    Column { key: "created_at", label: "Joined" },
];

impl ReportRow for UserReportRecord {
    fn columns() -> &'static [Column] {
        USER_COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "name" => CellValue::text(self.name.as_deref()),
            "email" => CellValue::text(self.email.as_deref()),
            "status" => CellValue::text(self.status.as_deref()),
            "roles" if self.roles.is_empty() => CellValue::Missing,
            "roles" => CellValue::Text(self.roles.join(", ")),
            "created_at" => CellValue::date(self.created_at.as_deref()),
            _ => CellValue::Missing,
        }
    }
}

impl ReportPayload for UserReport {
    type Row = UserReportRecord;

    fn records(&self) -> &[UserReportRecord] {
        &self.records
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut stats = vec![("Users".into(), CellValue::count(self.total_users).display())];
        stats.extend(self.by_status.iter().map(|(status, n)| (status.clone(), n.to_string())));
        stats
    }
}
