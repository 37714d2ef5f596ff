use askama::Template;

use crate::models::user::UserDisplay;
use super::PageContext;

#[derive(Template)]
#[template(path = "users/list.html")]
pub struct UserListTemplate {
    pub ctx: PageContext,
    pub users: Vec<UserDisplay>,
    pub search: String,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

#[derive(Template)]
#[template(path = "users/detail.html")]
pub struct UserDetailTemplate {
    pub ctx: PageContext,
    pub user: UserDisplay,
    pub can_edit: bool,
    pub can_delete: bool,
}

/// Editable fields, as submitted or as loaded.
#[derive(Debug, Clone, Default)]
pub struct UserFormValues {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub skills: String,
    pub qualifications: String,
    pub preferences: String,
    pub status: String,
}

/// A role the user may be assigned, for the edit form.
#[derive(Debug, Clone)]
pub struct RoleOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "users/form.html")]
pub struct UserFormTemplate {
    pub ctx: PageContext,
    pub user_id: String,
    pub email: String,
    pub form: UserFormValues,
    pub roles: Vec<RoleOption>,
    pub statuses: Vec<String>,
    pub errors: Vec<String>,
}
