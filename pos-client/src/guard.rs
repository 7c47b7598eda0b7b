//! Route guard
//!
//! Decides whether the current session may open a route:
//!
//! | Session | Route roles | Decision |
//! |---------|-------------|----------|
//! | no token | any | login |
//! | token, profile fetch fails | any | login (with notice), session cleared |
//! | profile role allowed (or list empty) | - | authorized |
//! | profile role not allowed | - | the role's landing page |
//!
//! The server enforces the same role lists on every route; the guard only
//! keeps users away from screens they cannot use.

use async_trait::async_trait;
use shared::client::LoginResponse;
use shared::models::{Role, User};

use crate::ClientResult;

/// Login screen path
pub const LOGIN_ROUTE: &str = "/login";

/// Loads the profile behind a token (normally `GET /api/auth/me`)
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, token: &str) -> ClientResult<User>;
}

/// Client-side session: the bearer token and the profile once loaded
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    profile: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a session from a stored token; the profile is fetched lazily
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            profile: None,
        }
    }

    pub fn sign_in(&mut self, login: LoginResponse) {
        self.token = Some(login.token);
        self.profile = Some(login.user);
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.profile = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn profile(&self) -> Option<&User> {
        self.profile.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|u| u.role)
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Authorized,
    /// Back to login; `notice` explains why when the session was rejected
    RedirectToLogin { notice: Option<String> },
    /// Signed in but not allowed here: go to the role's landing page
    RedirectToRoleDefault { path: &'static str },
}

impl GuardDecision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, GuardDecision::Authorized)
    }

    /// Where to navigate instead, if anywhere
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            GuardDecision::Authorized => None,
            GuardDecision::RedirectToLogin { .. } => Some(LOGIN_ROUTE),
            GuardDecision::RedirectToRoleDefault { path } => Some(path),
        }
    }
}

pub struct RouteGuard<P> {
    source: P,
}

impl<P: ProfileSource> RouteGuard<P> {
    pub fn new(source: P) -> Self {
        Self { source }
    }

    /// Check `session` against a route's allowed roles (empty = any signed-in user)
    pub async fn check(&self, session: &mut Session, allowed: &[Role]) -> GuardDecision {
        let Some(token) = session.token.clone() else {
            return GuardDecision::RedirectToLogin { notice: None };
        };

        if session.profile.is_none() {
            match self.source.fetch_profile(&token).await {
                Ok(user) => session.profile = Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Profile fetch failed, signing out");
                    session.sign_out();
                    return GuardDecision::RedirectToLogin {
                        notice: Some(session_notice(&e)),
                    };
                }
            }
        }

        match session.role() {
            Some(role) if role.is_allowed(allowed) => GuardDecision::Authorized,
            Some(role) => GuardDecision::RedirectToRoleDefault {
                path: role.default_route(),
            },
            None => GuardDecision::RedirectToLogin { notice: None },
        }
    }
}

fn session_notice(err: &crate::ClientError) -> String {
    if err.is_session_error() {
        "Your session has expired. Please sign in again.".to_string()
    } else {
        format!("Could not load your profile: {}", err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use shared::ErrorCode;

    use super::*;
    use crate::ClientError;

    struct FixedProfile {
        role: Option<Role>,
        calls: AtomicUsize,
    }

    impl FixedProfile {
        fn returning(role: Role) -> Self {
            Self {
                role: Some(role),
                calls: AtomicUsize::new(0),
            }
        }

        fn rejecting() -> Self {
            Self {
                role: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ProfileSource for FixedProfile {
        async fn fetch_profile(&self, _token: &str) -> ClientResult<User> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.role {
                Some(role) => Ok(user(role)),
                None => Err(ClientError::Unauthorized {
                    code: ErrorCode::TokenExpired,
                    message: "Token has expired".into(),
                }),
            }
        }
    }

    fn user(role: Role) -> User {
        User {
            id: 7,
            name: "Sam".into(),
            email: "sam@pos.test".into(),
            role,
            active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn chef_on_owner_route_goes_to_kitchen() {
        let guard = RouteGuard::new(FixedProfile::returning(Role::Chef));
        let mut session = Session::with_token("t");

        let decision = guard.check(&mut session, &[Role::Owner]).await;
        assert_eq!(decision, GuardDecision::RedirectToRoleDefault { path: "/kitchen" });
        assert_eq!(decision.redirect_path(), Some("/kitchen"));
    }

    #[tokio::test]
    async fn landing_pages_per_role() {
        for (role, path) in [
            (Role::Host, "/tables"),
            (Role::Admin, "/admin"),
            (Role::Waiter, "/dashboard"),
            (Role::Manager, "/dashboard"),
        ] {
            let guard = RouteGuard::new(FixedProfile::returning(role));
            let mut session = Session::with_token("t");
            let decision = guard.check(&mut session, &[Role::Owner]).await;
            assert_eq!(decision.redirect_path(), Some(path), "{role}");
        }
    }

    #[tokio::test]
    async fn missing_token_goes_to_login() {
        let source = FixedProfile::returning(Role::Owner);
        let guard = RouteGuard::new(source);
        let mut session = Session::new();

        let decision = guard.check(&mut session, &[]).await;
        assert_eq!(decision, GuardDecision::RedirectToLogin { notice: None });
        assert_eq!(guard.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn profile_is_fetched_once_and_cached() {
        let guard = RouteGuard::new(FixedProfile::returning(Role::Waiter));
        let mut session = Session::with_token("t");

        assert!(guard.check(&mut session, &[]).await.is_authorized());
        assert!(guard.check(&mut session, &[Role::Waiter]).await.is_authorized());
        assert_eq!(guard.source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.role(), Some(Role::Waiter));
    }

    #[tokio::test]
    async fn rejected_token_clears_session_with_notice() {
        let guard = RouteGuard::new(FixedProfile::rejecting());
        let mut session = Session::with_token("stale");

        let decision = guard.check(&mut session, &[]).await;
        match decision {
            GuardDecision::RedirectToLogin { notice: Some(notice) } => {
                assert!(notice.contains("expired"));
            }
            other => panic!("unexpected decision: {other:?}"),
        }
        assert!(session.token().is_none());
        assert!(session.profile().is_none());
    }

    #[tokio::test]
    async fn signed_in_session_skips_fetch() {
        let guard = RouteGuard::new(FixedProfile::rejecting());
        let mut session = Session::new();
        session.sign_in(LoginResponse {
            user: user(Role::Owner),
            token: "fresh".into(),
        });

        assert!(guard.check(&mut session, &[Role::Owner]).await.is_authorized());
        assert_eq!(guard.source.calls.load(Ordering::SeqCst), 0);
    }
}
