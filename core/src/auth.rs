//! Authentication state and the `/auth/*` calls that drive it.

use tracing::{debug, warn};

use crate::error::{ApiError, SESSION_EXPIRED_MESSAGE};
use crate::http::{HttpClient, Method, Transport};
use crate::models::{AuthResponse, Credentials, Registration, Role, User, UserId};
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub user: Option<User>,
    pub error: Option<String>,
}

impl AuthState {
    /// Hydrates from a persisted token and user snapshot without touching the network.
    #[must_use]
    pub fn bootstrap(session: &SessionStore) -> Self {
        match (session.token(), session.persisted_user()) {
            (Some(_), Some(user)) => {
                debug!(user = %user.id, "restored session from storage");
                Self {
                    phase: AuthPhase::Authenticated,
                    user: Some(user),
                    error: None,
                }
            }
            _ => Self::default(),
        }
    }

    pub fn begin(&mut self) {
        self.phase = AuthPhase::Authenticating;
        self.error = None;
    }

    /// Applies the outcome of `login` or `register`.
    pub fn finish(&mut self, result: Result<User, ApiError>) {
        match result {
            Ok(user) => {
                self.phase = AuthPhase::Authenticated;
                self.user = Some(user);
                self.error = None;
            }
            Err(e) => {
                self.phase = AuthPhase::Anonymous;
                self.user = None;
                self.error = Some(e.user_message());
            }
        }
    }

    pub fn logged_out(&mut self) {
        *self = Self::default();
    }

    pub fn session_expired(&mut self) {
        *self = Self {
            error: Some(SESSION_EXPIRED_MESSAGE.to_string()),
            ..Self::default()
        };
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated && self.user.is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == AuthPhase::Authenticating
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|user| &user.id)
    }
}

impl<T: Transport> HttpClient<T> {
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let response: AuthResponse = self.post("/auth/login", credentials).await?;
        Ok(self.store_session(response))
    }

    pub async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        let response: AuthResponse = self.post("/auth/register", registration).await?;
        Ok(self.store_session(response))
    }

    /// Notifies the server, then clears local credentials whatever it answered.
    pub async fn logout(&self) {
        if let Err(e) = self.send_unit(Method::Post, "/auth/logout", None).await {
            warn!("logout request failed, clearing session anyway: {e}");
        }
        self.session().clear();
    }

    fn store_session(&self, response: AuthResponse) -> User {
        let session = self.session();
        session.set_token(&response.access_token);
        session.persist_user(&response.user);
        debug!(user = %response.user.id, role = %response.user.role, "authenticated");
        response.user
    }
}
