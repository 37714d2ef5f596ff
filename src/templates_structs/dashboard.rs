use askama::Template;

use super::PageContext;

pub struct QuickLink {
    pub label: String,
    pub url: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub role_label: String,
    pub quick_links: Vec<QuickLink>,
}
