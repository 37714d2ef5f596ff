use actix_session::Session;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::identity::IdentitySession;

const IDENTITY_KEY: &str = "identity";
const NOTICE_KEY: &str = "notice";

pub fn get_identity(session: &Session) -> Option<IdentitySession> {
    session.get::<IdentitySession>(IDENTITY_KEY).unwrap_or(None)
}

pub fn set_identity(session: &Session, identity: &IdentitySession) -> Result<(), AppError> {
    session
        .insert(IDENTITY_KEY, identity)
        .map_err(|e| AppError::Session(format!("Failed to store identity: {e}")))
}

/// Forget the signed-in user and everything stored with them. The session
/// stays usable so a notice can still be shown on the next page.
pub fn end(session: &Session) {
    session.clear();
    session.renew();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message shown once on the next page and dismissed automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Error, message: message.into() }
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "notice-success",
            NoticeKind::Error => "notice-error",
        }
    }
}

pub fn set_notice(session: &Session, notice: Notice) {
    if let Err(e) = session.insert(NOTICE_KEY, &notice) {
        log::warn!("Could not store notice: {e}");
    }
}

pub fn take_notice(session: &Session) -> Option<Notice> {
    let notice = session.get::<Notice>(NOTICE_KEY).unwrap_or(None);
    if notice.is_some() {
        session.remove(NOTICE_KEY);
    }
    notice
}
