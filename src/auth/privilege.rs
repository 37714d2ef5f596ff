use std::fmt;

use crate::models::user::UserProfile;

/// A (resource, action) pair a role may grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Privilege {
    pub resource: String,
    pub action: String,
}

impl Privilege {
    pub fn new(resource: &str, action: &str) -> Self {
        Privilege {
            resource: resource.to_string(),
            action: action.to_string(),
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// The single capability check used by pages and the navigation shell.
pub trait PrivilegeChecker {
    fn has_privilege(&self, resource: &str, action: &str) -> bool;

    fn has_any(&self, resource: &str, actions: &[&str]) -> bool {
        actions.iter().any(|a| self.has_privilege(resource, a))
    }
}

/// Checks against the signed-in profile's privilege map, with the superuser
/// role granting everything.
pub struct ProfilePrivileges<'a> {
    profile: Option<&'a UserProfile>,
    superuser_role: &'a str,
}

impl<'a> ProfilePrivileges<'a> {
    pub fn new(profile: Option<&'a UserProfile>, superuser_role: &'a str) -> Self {
        ProfilePrivileges { profile, superuser_role }
    }
}

impl PrivilegeChecker for ProfilePrivileges<'_> {
    fn has_privilege(&self, resource: &str, action: &str) -> bool {
        let Some(profile) = self.profile else {
            return false;
        };
        let granted = profile
            .privileges
            .get(resource)
            .is_some_and(|actions| actions.contains(action));
        granted || (!self.superuser_role.is_empty() && profile.roles.iter().any(|r| r == self.superuser_role))
    }
}
