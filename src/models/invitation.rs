use serde::Deserialize;

use super::display::{or_na, timestamp_or_na};
use super::listing::{Listed, lenient_id};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Invitation {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub role_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Listed for Invitation {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        [self.email.as_deref(), self.status.as_deref()].into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone)]
pub struct InvitationDisplay {
    pub email: String,
    pub role: String,
    pub status: String,
    pub expires_at: String,
    pub created_at: String,
}

impl InvitationDisplay {
    pub fn build(i: &Invitation, role_names: &dyn Fn(&str) -> Option<String>) -> Self {
        InvitationDisplay {
            email: or_na(i.email.as_deref()),
            role: match i.role_id.as_deref() {
                Some(id) => role_names(id).unwrap_or_else(|| id.to_string()),
                None => or_na(None),
            },
            status: or_na(i.status.as_deref()),
            expires_at: timestamp_or_na(i.expires_at.as_deref()),
            created_at: timestamp_or_na(i.created_at.as_deref()),
        }
    }
}
