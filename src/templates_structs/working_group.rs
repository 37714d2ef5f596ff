use askama::Template;

use crate::models::working_group::WorkingGroupDisplay;
use super::PageContext;

#[derive(Template)]
#[template(path = "working_groups/list.html")]
pub struct WorkingGroupListTemplate {
    pub ctx: PageContext,
    pub groups: Vec<WorkingGroupDisplay>,
    pub search: String,
    pub can_view: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

#[derive(Template)]
#[template(path = "working_groups/detail.html")]
pub struct WorkingGroupDetailTemplate {
    pub ctx: PageContext,
    pub group: WorkingGroupDisplay,
    pub can_edit: bool,
    pub can_delete: bool,
}

#[derive(Debug, Clone)]
pub struct WorkingGroupFormValues {
    pub name: String,
    pub description: String,
    pub status: String,
}

impl Default for WorkingGroupFormValues {
    fn default() -> Self {
        WorkingGroupFormValues {
            name: String::new(),
            description: String::new(),
            status: "active".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "working_groups/form.html")]
pub struct WorkingGroupFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: WorkingGroupFormValues,
    pub statuses: Vec<String>,
    pub errors: Vec<String>,
}
