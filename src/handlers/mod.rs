pub mod account_handlers;
pub mod auth_handlers;
pub mod dashboard;
pub mod donation_handlers;
pub mod forms;
pub mod guarded;
pub mod helpers;
pub mod invitation_handlers;
pub mod report_handlers;
pub mod role_handlers;
pub mod user_handlers;
pub mod working_group_handlers;
