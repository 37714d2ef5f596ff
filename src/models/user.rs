use serde::{Deserialize, Serialize};

use super::display::{or_na, timestamp_or_na};
use super::listing::{Listed, lenient_id, lenient_id_list};
use super::role::PrivilegeMap;

/// Backend-held profile: identity, contact details, assigned roles.
/// `privileges` is only populated by `GET /users/me`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub qualifications: Option<String>,
    #[serde(default)]
    pub preferences: Option<String>,
    #[serde(default, deserialize_with = "lenient_id_list")]
    pub roles: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub privileges: PrivilegeMap,
}

impl UserProfile {
    /// "First Last", falling back to the email, then `N/A`.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() { or_na(self.email.as_deref()) } else { full }
    }
}

impl Listed for UserProfile {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        [self.first_name.as_deref(), self.last_name.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Template-ready user, every optional field already rendered.
#[derive(Debug, Clone)]
pub struct UserDisplay {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub skills: String,
    pub qualifications: String,
    pub preferences: String,
    pub role_labels: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl UserDisplay {
    /// `role_names` maps role ids to names; unknown ids are shown raw.
    pub fn build(u: &UserProfile, role_names: &dyn Fn(&str) -> Option<String>) -> Self {
        let labels: Vec<String> = u
            .roles
            .iter()
            .map(|id| role_names(id).unwrap_or_else(|| id.clone()))
            .collect();
        UserDisplay {
            id: u.id.clone().unwrap_or_default(),
            display_name: u.display_name(),
            email: or_na(u.email.as_deref()),
            phone: or_na(u.phone.as_deref()),
            skills: or_na(u.skills.as_deref()),
            qualifications: or_na(u.qualifications.as_deref()),
            preferences: or_na(u.preferences.as_deref()),
            role_labels: if labels.is_empty() { or_na(None) } else { labels.join(", ") },
            status: or_na(u.status.as_deref()),
            created_at: timestamp_or_na(u.created_at.as_deref()),
            updated_at: timestamp_or_na(u.updated_at.as_deref()),
        }
    }
}

/// Body for `PUT /users/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub skills: Option<String>,
    pub qualifications: Option<String>,
    pub preferences: Option<String>,
    pub status: String,
    /// `None` leaves the user's role assignments untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

pub const USER_STATUSES: &[&str] = &["active", "inactive", "pending"];
