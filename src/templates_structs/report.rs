use askama::Template;

use crate::reports::SectionView;
use super::PageContext;

#[derive(Template)]
#[template(path = "reports/index.html")]
pub struct ReportsTemplate {
    pub ctx: PageContext,
    pub sections: Vec<SectionView>,
    /// Any section still waiting on auth; the page reloads itself.
    pub refresh: bool,
}
