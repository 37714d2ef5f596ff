use askama::Template;

use crate::models::role::{PrivilegeGroup, RoleListItem};
use super::PageContext;

#[derive(Template)]
#[template(path = "roles/list.html")]
pub struct RoleListTemplate {
    pub ctx: PageContext,
    pub roles: Vec<RoleListItem>,
    pub search: String,
    pub can_view: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

#[derive(Template)]
#[template(path = "roles/detail.html")]
pub struct RoleDetailTemplate {
    pub ctx: PageContext,
    pub role: RoleListItem,
    pub privileges: Vec<String>,
    pub can_edit: bool,
    pub can_delete: bool,
}

#[derive(Template)]
#[template(path = "roles/form.html")]
pub struct RoleFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub name: String,
    pub description: String,
    pub privilege_groups: Vec<PrivilegeGroup>,
    /// Granted codes the grid has no checkbox for, resubmitted as hidden fields.
    pub kept_privileges: Vec<String>,
    pub errors: Vec<String>,
}
