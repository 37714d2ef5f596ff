use actix_session::Session;

use super::privilege::{PrivilegeChecker, ProfilePrivileges};
use super::profile_cache::Lookup;
use super::session;
use crate::identity::{IdentityError, IdentitySession};
use crate::models::user::UserProfile;
use crate::state::AppState;

/// Where auth resolution ended up for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// Another request is fetching this user's profile.
    Loading,
    Unauthenticated,
    Failed(String),
    Ready,
}

/// The signed-in user, their bearer token and profile, resolved once per
/// request.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub user: Option<IdentitySession>,
    pub profile: Option<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
    superuser_role: String,
}

impl AuthContext {
    pub fn signed_out() -> Self {
        AuthContext::default()
    }

    pub fn ready(user: IdentitySession, profile: UserProfile, superuser_role: &str) -> Self {
        AuthContext {
            user: Some(user),
            profile: Some(profile),
            superuser_role: superuser_role.to_string(),
            ..Default::default()
        }
    }

    pub fn loading(user: IdentitySession) -> Self {
        AuthContext {
            user: Some(user),
            loading: true,
            ..Default::default()
        }
    }

    pub fn failed(user: IdentitySession, message: impl Into<String>) -> Self {
        AuthContext {
            user: Some(user),
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Read the session, refresh an expired ID token, and obtain the profile
    /// through the shared cache.
    pub async fn resolve(session: &Session, state: &AppState) -> Self {
        let Some(mut user) = session::get_identity(session) else {
            return Self::signed_out();
        };

        if user.is_expired(chrono::Utc::now().timestamp()) {
            match state.identity.refresh(&user).await {
                Ok(fresh) => {
                    if let Err(e) = session::set_identity(session, &fresh) {
                        log::warn!("{e}");
                    }
                    user = fresh;
                }
                Err(IdentityError::SessionExpired) => {
                    log::info!("Session for {} expired; signing out", user.uid);
                    state.profiles.invalidate(&user.uid);
                    session::end(session);
                    return Self::signed_out();
                }
                Err(e) => {
                    log::warn!("Token refresh for {} failed: {e}", user.uid);
                    return Self::failed(user, e.user_message());
                }
            }
        }

        match state.profiles.lookup_or_claim(&user.uid) {
            Lookup::Ready(profile) => Self::ready(user, profile, &state.config.superuser_role),
            Lookup::Pending => Self::loading(user),
            Lookup::Claimed(claim) => match state.backend.get::<UserProfile>("/users/me", &user.id_token).await {
                Ok(profile) => {
                    claim.fulfil(profile.clone());
                    Self::ready(user, profile, &state.config.superuser_role)
                }
                Err(e) => {
                    log::warn!("Profile fetch for {} failed: {e}", user.uid);
                    Self::failed(user, e.user_message())
                }
            },
        }
    }

    pub fn status(&self) -> AuthStatus {
        if self.user.is_none() {
            AuthStatus::Unauthenticated
        } else if self.loading {
            AuthStatus::Loading
        } else if let Some(e) = &self.error {
            AuthStatus::Failed(e.clone())
        } else {
            AuthStatus::Ready
        }
    }

    pub fn id_token(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id_token.as_str())
    }

    pub fn checker(&self) -> ProfilePrivileges<'_> {
        ProfilePrivileges::new(self.profile.as_ref(), &self.superuser_role)
    }

    pub fn has_privilege(&self, resource: &str, action: &str) -> bool {
        self.checker().has_privilege(resource, action)
    }

    /// Name for the header: profile name, else the sign-in email.
    pub fn display_name(&self) -> String {
        match (&self.profile, &self.user) {
            (Some(p), _) => p.display_name(),
            (None, Some(u)) => u.email.clone(),
            (None, None) => "No User".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::privileges_from_codes;

    fn identity() -> IdentitySession {
        IdentitySession {
            uid: "u1".into(),
            email: "ana@example.org".into(),
            id_token: "tok".into(),
            refresh_token: "ref".into(),
            expires_at: i64::MAX,
        }
    }

    #[test]
    fn status_reflects_each_stage() {
        assert_eq!(AuthContext::signed_out().status(), AuthStatus::Unauthenticated);
        assert_eq!(AuthContext::loading(identity()).status(), AuthStatus::Loading);
        assert_eq!(
            AuthContext::failed(identity(), "boom").status(),
            AuthStatus::Failed("boom".into())
        );
        let ready = AuthContext::ready(identity(), UserProfile::default(), "admin");
        assert_eq!(ready.status(), AuthStatus::Ready);
        assert_eq!(ready.id_token(), Some("tok"));
    }

    #[test]
    fn privileges_come_from_the_profile() {
        let profile = UserProfile {
            privileges: privileges_from_codes(["donations:list"]),
            ..Default::default()
        };
        let ctx = AuthContext::ready(identity(), profile, "admin");
        assert!(ctx.has_privilege("donations", "list"));
        assert!(!ctx.has_privilege("donations", "delete"));
        assert!(!AuthContext::loading(identity()).has_privilege("donations", "list"));
    }

    #[test]
    fn display_name_falls_back_to_email_then_no_user() {
        assert_eq!(AuthContext::loading(identity()).display_name(), "ana@example.org");
        assert_eq!(AuthContext::signed_out().display_name(), "No User");
    }
}
