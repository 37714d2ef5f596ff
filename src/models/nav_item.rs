use crate::auth::privilege::PrivilegeChecker;
use crate::reports::REPORT_ACTIONS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub url: String,
    pub is_active: bool,
}

/// Visible links, split into the main group and the admin subgroup.
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    pub primary: Vec<NavLink>,
    pub admin: Vec<NavLink>,
}

impl Navigation {
    pub fn has_admin(&self) -> bool {
        !self.admin.is_empty()
    }

    pub fn links(&self) -> impl Iterator<Item = &NavLink> {
        self.primary.iter().chain(self.admin.iter())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Group {
    Primary,
    Admin,
}

enum Requires {
    Nothing,
    Privilege(&'static str, &'static str),
    AnyOf(&'static str, &'static [&'static str]),
}

struct Candidate {
    label: &'static str,
    url: &'static str,
    group: Group,
    requires: Requires,
}

const CANDIDATES: &[Candidate] = &[
    Candidate { label: "Dashboard", url: "/dashboard", group: Group::Primary, requires: Requires::Nothing },
    Candidate { label: "Users", url: "/users", group: Group::Primary, requires: Requires::Privilege("users", "list") },
    Candidate {
        label: "Working Groups",
        url: "/working-groups",
        group: Group::Primary,
        requires: Requires::Privilege("working_groups", "list"),
    },
    Candidate {
        label: "Donations",
        url: "/donations",
        group: Group::Primary,
        requires: Requires::Privilege("donations", "list"),
    },
    Candidate {
        label: "Reports",
        url: "/reports",
        group: Group::Primary,
        requires: Requires::AnyOf("reports", &REPORT_ACTIONS),
    },
    Candidate { label: "Roles", url: "/roles", group: Group::Admin, requires: Requires::Privilege("roles", "list") },
    Candidate {
        label: "Invitations",
        url: "/invitations",
        group: Group::Admin,
        requires: Requires::Privilege("invitations", "list"),
    },
];

/// Links the caller may follow, with the one matching `current_path` most
/// specifically marked active.
pub fn build_navigation(checker: &dyn PrivilegeChecker, current_path: &str) -> Navigation {
    let visible: Vec<&Candidate> = CANDIDATES
        .iter()
        .filter(|c| match c.requires {
            Requires::Nothing => true,
            Requires::Privilege(resource, action) => checker.has_privilege(resource, action),
            Requires::AnyOf(resource, actions) => checker.has_any(resource, actions),
        })
        .collect();

    // Longest-prefix match: only the most specific matching URL is active
    let best_match_len = visible
        .iter()
        .filter(|c| path_matches(current_path, c.url))
        .map(|c| c.url.len())
        .max()
        .unwrap_or(0);

    let mut nav = Navigation::default();
    for c in visible {
        let link = NavLink {
            label: c.label.to_string(),
            url: c.url.to_string(),
            is_active: c.url.len() == best_match_len && path_matches(current_path, c.url),
        };
        match c.group {
            Group::Primary => nav.primary.push(link),
            Group::Admin => nav.admin.push(link),
        }
    }
    nav
}

/// `/users/7` is under `/users`; `/users-archive` is not.
fn path_matches(path: &str, url: &str) -> bool {
    path == url || path.strip_prefix(url).is_some_and(|rest| rest.starts_with('/') || rest.starts_with('?'))
}
