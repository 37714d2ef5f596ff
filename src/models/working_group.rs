use serde::{Deserialize, Serialize};

use super::display::{or_na, timestamp_or_na};
use super::listing::{Listed, lenient_id};

pub const GROUP_STATUSES: &[&str] = &["active", "archived"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkingGroup {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Listed for WorkingGroup {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        [self.name.as_deref(), self.description.as_deref()].into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone)]
pub struct WorkingGroupDisplay {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub archived: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&WorkingGroup> for WorkingGroupDisplay {
    fn from(g: &WorkingGroup) -> Self {
        WorkingGroupDisplay {
            id: g.id.clone().unwrap_or_default(),
            name: or_na(g.name.as_deref()),
            description: or_na(g.description.as_deref()),
            status: or_na(g.status.as_deref()),
            archived: g.status.as_deref() == Some("archived"),
            created_at: timestamp_or_na(g.created_at.as_deref()),
            updated_at: timestamp_or_na(g.updated_at.as_deref()),
        }
    }
}

/// Body for `POST /working-groups/` and `PUT /working-groups/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct WorkingGroupRequest {
    pub name: String,
    pub description: String,
    pub status: String,
}
