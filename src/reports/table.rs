use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::models::report::{CellValue, ReportRow};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortSpec {
    pub column: String,
    pub dir: SortDir,
}

impl SortSpec {
    pub fn from_params(sort: Option<&str>, dir: Option<&str>) -> Self {
        SortSpec {
            column: sort.unwrap_or("").to_string(),
            dir: if dir == Some("desc") { SortDir::Desc } else { SortDir::Asc },
        }
    }

    pub fn dir_str(&self) -> &'static str {
        match self.dir {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn toggle_dir(&self) -> &'static str {
        match self.dir {
            SortDir::Asc => "desc",
            SortDir::Desc => "asc",
        }
    }
}

/// Per-table view state, carried in query parameters prefixed with the
/// table's key (`{prefix}_q`, `{prefix}_sort`, `{prefix}_dir`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    pub filter: String,
    pub sort: SortSpec,
}

impl TableQuery {
    pub fn from_params(params: &HashMap<String, String>, prefix: &str) -> Self {
        let get = |suffix: &str| params.get(&format!("{prefix}_{suffix}")).map(String::as_str);
        TableQuery {
            filter: get("q").unwrap_or("").trim().to_string(),
            sort: SortSpec::from_params(get("sort"), get("dir")),
        }
    }

    /// This table's parameters only, for CSV links.
    pub fn to_params(&self, prefix: &str) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if !self.filter.is_empty() {
            out.push((format!("{prefix}_q"), self.filter.clone()));
        }
        if !self.sort.column.is_empty() {
            out.push((format!("{prefix}_sort"), self.sort.column.clone()));
            out.push((format!("{prefix}_dir"), self.sort.dir_str().to_string()));
        }
        out
    }
}

/// Sortable column header for templates.
#[derive(Debug, Clone)]
pub struct HeaderCell {
    pub label: String,
    pub href: String,
    /// "▲", "▼" or empty.
    pub indicator: String,
}

/// Rows that pass the filter, in sort order.
pub fn visible_rows<'a, R: ReportRow>(records: &'a [R], query: &TableQuery) -> Vec<&'a R> {
    let needle = query.filter.to_lowercase();
    let mut rows: Vec<&R> = records
        .iter()
        .filter(|r| {
            needle.is_empty()
                || R::columns()
                    .iter()
                    .any(|c| r.cell(c.key).display().to_lowercase().contains(&needle))
        })
        .collect();

    let known = R::columns().iter().any(|c| c.key == query.sort.column);
    if known {
        let key = query.sort.column.as_str();
        rows.sort_by(|a, b| {
            let ord = compare_cells(&a.cell(key), &b.cell(key));
            match query.sort.dir {
                SortDir::Asc => ord,
                SortDir::Desc => ord.reverse(),
            }
        });
    }
    rows
}

/// Display strings of the visible rows, one `Vec` per row in column order.
pub fn render_rows<R: ReportRow>(rows: &[&R]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| R::columns().iter().map(|c| r.cell(c.key).display()).collect())
        .collect()
}

pub fn header_labels<R: ReportRow>() -> Vec<&'static str> {
    R::columns().iter().map(|c| c.label).collect()
}

/// Header cells whose links toggle this table's sort while keeping every
/// other parameter on the page.
pub fn header_cells<R: ReportRow>(
    base_path: &str,
    params: &HashMap<String, String>,
    prefix: &str,
    query: &TableQuery,
    anchor: &str,
) -> Vec<HeaderCell> {
    R::columns()
        .iter()
        .map(|c| {
            let active = query.sort.column == c.key;
            let next_dir = if active { query.sort.toggle_dir() } else { "asc" };
            let mut merged: BTreeMap<String, String> =
                params.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            merged.insert(format!("{prefix}_sort"), c.key.to_string());
            merged.insert(format!("{prefix}_dir"), next_dir.to_string());
            let qs = serde_urlencoded::to_string(&merged).unwrap_or_default();
            HeaderCell {
                label: c.label.to_string(),
                href: format!("{base_path}?{qs}#{anchor}"),
                indicator: match (active, query.sort.dir) {
                    (false, _) => String::new(),
                    (true, SortDir::Asc) => "▲".to_string(),
                    (true, SortDir::Desc) => "▼".to_string(),
                },
            }
        })
        .collect()
}

fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Missing, CellValue::Missing) => Ordering::Equal,
        (CellValue::Missing, _) => Ordering::Less,
        (_, CellValue::Missing) => Ordering::Greater,
        (CellValue::Number(x), CellValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (CellValue::Date(x), CellValue::Date(y)) => x.cmp(y),
        (x, y) => x.display().to_lowercase().cmp(&y.display().to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::VolunteerHoursRecord;

    fn record(name: &str, hours: Option<f64>, last: Option<&str>) -> VolunteerHoursRecord {
        VolunteerHoursRecord {
            volunteer_name: Some(name.to_string()),
            email: Some(format!("{}@example.org", name.to_lowercase())),
            total_hours: hours,
            events_attended: Some(1),
            last_activity: last.map(String::from),
        }
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn query_reads_prefixed_params() {
        let p = params(&[("hours_q", " ana "), ("hours_sort", "total_hours"), ("hours_dir", "desc"), ("q", "x")]);
        let q = TableQuery::from_params(&p, "hours");
        assert_eq!(q.filter, "ana");
        assert_eq!(q.sort.column, "total_hours");
        assert_eq!(q.sort.dir, SortDir::Desc);
    }

    #[test]
    fn numeric_sort_is_by_value_not_text() {
        let records = vec![record("A", Some(9.0), None), record("B", Some(10.0), None), record("C", None, None)];
        let q = TableQuery {
            filter: String::new(),
            sort: SortSpec::from_params(Some("total_hours"), Some("desc")),
        };
        let names: Vec<_> = visible_rows(&records, &q)
            .iter()
            .map(|r| r.volunteer_name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn filter_matches_any_cell_case_insensitively() {
        let records = vec![record("Ana", Some(1.0), None), record("Bo", Some(2.0), Some("2024-01-02"))];
        let q = TableQuery { filter: "2024-01".into(), sort: SortSpec::default() };
        assert_eq!(visible_rows(&records, &q).len(), 1);
        let q = TableQuery { filter: "ANA@".into(), sort: SortSpec::default() };
        assert_eq!(visible_rows(&records, &q).len(), 1);
    }

    #[test]
    fn unknown_sort_column_keeps_payload_order() {
        let records = vec![record("Z", Some(1.0), None), record("A", Some(2.0), None)];
        let q = TableQuery { filter: String::new(), sort: SortSpec::from_params(Some("nope"), None) };
        let rows = render_rows(&visible_rows(&records, &q));
        assert_eq!(rows[0][0], "Z");
    }

    #[test]
    fn header_links_toggle_and_preserve_other_params() {
        let p = params(&[("donations_q", "bake"), ("hours_sort", "email"), ("hours_dir", "asc")]);
        let q = TableQuery::from_params(&p, "hours");
        let headers = header_cells::<VolunteerHoursRecord>("/reports", &p, "hours", &q, "volunteer-hours");
        let email = headers.iter().find(|h| h.label == "Email").unwrap();
        assert_eq!(email.indicator, "▲");
        assert!(email.href.contains("hours_dir=desc"));
        assert!(email.href.contains("donations_q=bake"));
        assert!(email.href.ends_with("#volunteer-hours"));
        let hours = headers.iter().find(|h| h.label == "Hours").unwrap();
        assert_eq!(hours.indicator, "");
        assert!(hours.href.contains("hours_sort=total_hours"));
    }
}
