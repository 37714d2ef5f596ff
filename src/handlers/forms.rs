use serde::Deserialize;

/// Parse URL-encoded form body, supporting duplicate keys (e.g. checkboxes).
pub fn parse_form_body(body: &str) -> Vec<(String, String)> {
    serde_urlencoded::from_str(body).unwrap_or_else(|e| {
        log::warn!("Unparsable form body: {e}");
        Vec::new()
    })
}

pub fn get_field<'a>(params: &'a [(String, String)], key: &str) -> &'a str {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

pub fn get_all<'a>(params: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

/// `?q=` on list pages.
#[derive(Deserialize, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}
