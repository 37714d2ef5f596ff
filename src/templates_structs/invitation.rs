use askama::Template;

use crate::models::invitation::InvitationDisplay;
use super::PageContext;

#[derive(Template)]
#[template(path = "invitations/list.html")]
pub struct InvitationListTemplate {
    pub ctx: PageContext,
    pub invitations: Vec<InvitationDisplay>,
    pub search: String,
}
