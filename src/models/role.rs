use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::display::or_na;
use super::listing::{Listed, lenient_id};

/// Resource name → allowed action names.
pub type PrivilegeMap = BTreeMap<String, BTreeSet<String>>;

/// Resources and actions the console knows how to gate. Drives the role
/// editor's checkbox grid.
pub const PRIVILEGE_CATALOGUE: &[(&str, &[&str])] = &[
    ("users", &["list", "view", "edit", "delete"]),
    ("roles", &["list", "view", "create", "edit", "delete"]),
    ("working_groups", &["list", "view", "create", "edit", "delete"]),
    ("donations", &["list", "view", "create", "edit", "delete"]),
    ("invitations", &["list"]),
    (
        "reports",
        &["view_volunteer_hours", "view_event_attendance", "view_donations", "view_users"],
    ),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub privileges: PrivilegeMap,
    #[serde(default)]
    pub user_count: Option<i64>,
}

impl Role {
    pub fn privilege_count(&self) -> usize {
        self.privileges.values().map(BTreeSet::len).sum()
    }

    /// Privileges as `resource:action` strings, sorted.
    pub fn privilege_codes(&self) -> Vec<String> {
        self.privileges
            .iter()
            .flat_map(|(resource, actions)| actions.iter().map(move |a| format!("{resource}:{a}")))
            .collect()
    }
}

impl Listed for Role {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        [self.name.as_deref(), self.description.as_deref()].into_iter().flatten().collect()
    }
}

/// Display row for the roles list.
#[derive(Debug, Clone)]
pub struct RoleListItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub user_count: String,
    pub privilege_count: usize,
}

impl From<&Role> for RoleListItem {
    fn from(r: &Role) -> Self {
        RoleListItem {
            id: r.id.clone().unwrap_or_default(),
            name: or_na(r.name.as_deref()),
            description: or_na(r.description.as_deref()),
            user_count: r.user_count.map(|c| c.to_string()).unwrap_or_else(|| or_na(None)),
            privilege_count: r.privilege_count(),
        }
    }
}

/// Body for `POST /roles/` and `PUT /roles/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct RoleRequest {
    pub name: String,
    pub description: String,
    pub privileges: PrivilegeMap,
}

/// A single checkbox in the role editor.
#[derive(Debug, Clone)]
pub struct PrivilegeCheckbox {
    pub code: String,
    pub action: String,
    pub checked: bool,
}

/// One resource row of the role editor grid.
#[derive(Debug, Clone)]
pub struct PrivilegeGroup {
    pub resource: String,
    pub checkboxes: Vec<PrivilegeCheckbox>,
}

/// Build the editor grid from the catalogue, ticking what `granted` holds.
pub fn privilege_grid(granted: &PrivilegeMap) -> Vec<PrivilegeGroup> {
    PRIVILEGE_CATALOGUE
        .iter()
        .map(|(resource, actions)| PrivilegeGroup {
            resource: resource.to_string(),
            checkboxes: actions
                .iter()
                .map(|action| PrivilegeCheckbox {
                    code: format!("{resource}:{action}"),
                    action: action.to_string(),
                    checked: granted.get(*resource).is_some_and(|a| a.contains(*action)),
                })
                .collect(),
        })
        .collect()
}

/// Granted `resource:action` codes outside the catalogue, sorted. The
/// editor has no checkbox for them but must not drop them on save.
pub fn uncatalogued_codes(granted: &PrivilegeMap) -> Vec<String> {
    granted
        .iter()
        .flat_map(|(resource, actions)| {
            let known = PRIVILEGE_CATALOGUE
                .iter()
                .find(|(r, _)| *r == resource.as_str())
                .map(|(_, a)| *a)
                .unwrap_or(&[]);
            actions
                .iter()
                .filter(move |a| !known.contains(&a.as_str()))
                .map(move |a| format!("{resource}:{a}"))
        })
        .collect()
}

/// Parse submitted `resource:action` codes into a privilege map. Malformed
/// codes are ignored.
pub fn privileges_from_codes<'a>(codes: impl IntoIterator<Item = &'a str>) -> PrivilegeMap {
    let mut map = PrivilegeMap::new();
    for code in codes {
        if let Some((resource, action)) = code.split_once(':') {
            let (resource, action) = (resource.trim(), action.trim());
            if resource.is_empty() || action.is_empty() {
                continue;
            }
            map.entry(resource.to_string()).or_default().insert(action.to_string());
        }
    }
    map
}
