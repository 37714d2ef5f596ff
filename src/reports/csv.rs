/// Quote a field, doubling any embedded quotes.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Header line followed by one line per row; every field quoted.
pub fn to_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut csv = String::new();
    push_line(&mut csv, headers.iter().copied());
    for row in rows {
        push_line(&mut csv, row.iter().map(String::as_str));
    }
    csv
}

fn push_line<'a>(csv: &mut String, fields: impl Iterator<Item = &'a str>) {
    let line = fields.map(quote_field).collect::<Vec<_>>().join(",");
    csv.push_str(&line);
    csv.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn n_rows_give_n_plus_one_lines() {
        let rows = vec![
            vec!["Ana".to_string(), "3".to_string()],
            vec!["Bo".to_string(), "4".to_string()],
            vec!["Cy".to_string(), "5".to_string()],
        ];
        let csv = to_csv(&["Name", "Hours"], &rows);
        assert_eq!(csv.lines().count(), 4);
        assert_eq!(csv.lines().next(), Some("\"Name\",\"Hours\""));
    }

    #[test]
    fn embedded_quotes_and_commas_are_escaped() {
        let rows = vec![vec!["The \"Big\" Bakery, Ltd".to_string()]];
        let csv = to_csv(&["Donor"], &rows);
        assert_eq!(csv.lines().nth(1), Some("\"The \"\"Big\"\" Bakery, Ltd\""));
    }

    #[test]
    fn empty_table_is_header_only() {
        let csv = to_csv(&["A", "B"], &[]);
        assert_eq!(csv, "\"A\",\"B\"\n");
    }
}
