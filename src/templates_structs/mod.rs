// Template context structures for Askama templates, organized by domain.

use actix_session::Session;

use crate::auth::context::AuthContext;
use crate::auth::csrf;
use crate::auth::session::{Notice, take_notice};
use crate::models::nav_item::{Navigation, build_navigation};
use crate::state::AppState;

mod common;
mod dashboard;
mod donation;
mod invitation;
mod report;
mod role;
mod user;
mod working_group;

pub use self::common::{AccountTemplate, ErrorTemplate, LoginTemplate, PasswordResetTemplate, StatusTemplate};
pub use self::dashboard::{DashboardTemplate, QuickLink};
pub use self::donation::{DonationDetailTemplate, DonationFormTemplate, DonationFormValues, DonationListTemplate};
pub use self::invitation::InvitationListTemplate;
pub use self::report::ReportsTemplate;
pub use self::role::{RoleDetailTemplate, RoleFormTemplate, RoleListTemplate};
pub use self::user::{RoleOption, UserDetailTemplate, UserFormTemplate, UserFormValues, UserListTemplate};
pub use self::working_group::{
    WorkingGroupDetailTemplate, WorkingGroupFormTemplate, WorkingGroupFormValues, WorkingGroupListTemplate,
};

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.username`, `ctx.nav`, etc.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub signed_in: bool,
    pub nav: Navigation,
    pub notice: Option<Notice>,
    pub app_name: String,
    pub csrf_token: String,
    pub notice_dismiss_ms: u64,
}

impl PageContext {
    pub fn build(auth: &AuthContext, session: &Session, state: &AppState, current_path: &str) -> Self {
        let username = auth.display_name();
        let avatar_initial = username.chars().next().unwrap_or('?').to_uppercase().to_string();
        Self {
            avatar_initial,
            username,
            signed_in: auth.user.is_some(),
            nav: build_navigation(&auth.checker(), current_path),
            notice: take_notice(session),
            app_name: state.config.app_name.clone(),
            csrf_token: csrf::get_or_create_token(session),
            notice_dismiss_ms: state.config.notice_dismiss_ms,
        }
    }
}
