//! Login mock and session context.
//!
//! The login form fabricates a [`Session`] after a fixed delay. Once created,
//! the session is an immutable snapshot handed to whichever dashboard renders;
//! switching roles means building a new session.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Error, Result, Role};

/// Avatar reference used for every demo user.
pub const DEMO_AVATAR: &str = "/api/placeholder/40/40";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub last_login: DateTime<Utc>,
}

/// Immutable session context for the active dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub role: Role,
    pub user: UserProfile,
}

impl Session {
    /// Create a session without going through the login form.
    pub fn demo(role: Role) -> Arc<Self> {
        let username = role
            .sample_credentials()
            .map_or_else(|| role.id().to_lowercase(), |c| c.username.to_string());
        Arc::new(Self::fabricate(role, username))
    }

    fn fabricate(role: Role, username: String) -> Self {
        Self {
            role,
            user: UserProfile {
                username,
                display_name: role.demo_user_name().to_string(),
                avatar: Some(DEMO_AVATAR.to_string()),
                last_login: Utc::now(),
            },
        }
    }

    /// Avatar fallback initials for the user.
    pub fn initials(&self) -> String {
        initials(&self.user.display_name)
    }
}

/// First letter of each word in a name.
pub fn initials(name: &str) -> String {
    name.split_whitespace().filter_map(|part| part.chars().next()).collect()
}

/// Which login form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

/// Credential form state.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub role: Option<Role>,
    pub username: String,
    pub password: String,
    pub remember_me: bool,
    pub focus: LoginField,
}

/// A validated login request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub role: Role,
    pub username: String,
}

impl LoginForm {
    /// Create a form with a role preselected.
    pub fn with_role(role: Role) -> Self {
        Self { role: Some(role), ..Self::default() }
    }

    /// Fill the form with a role's sample credentials.
    pub fn quick_fill(&mut self, role: Role) {
        self.role = Some(role);
        if let Some(sample) = role.sample_credentials() {
            self.username = sample.username.to_string();
            self.password = sample.password.to_string();
        }
    }

    /// Type a character into the focused field.
    pub fn enter_char(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    /// Delete the last character of the focused field.
    pub fn delete_char(&mut self) {
        self.focused_mut().pop();
    }

    /// Move focus to the other field.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    /// Check the form before attempting a login.
    ///
    /// A blank username falls back to the role's sample username.
    pub fn validate(&self) -> Result<LoginRequest> {
        let role = self.role.ok_or_else(|| Error::validation("role", "select a role"))?;
        if self.password.trim().is_empty() {
            return Err(Error::validation("password", "must not be empty"));
        }

        let username = if self.username.trim().is_empty() {
            role.sample_credentials().map(|c| c.username.to_string()).ok_or_else(|| {
                Error::validation("username", "must not be empty")
            })?
        } else {
            self.username.trim().to_string()
        };

        Ok(LoginRequest { role, username })
    }
}

/// Fabricate a session for a validated request after a simulated delay.
pub async fn authenticate(request: LoginRequest, delay: Duration) -> Arc<Session> {
    tracing::debug!(role = %request.role, username = %request.username, "Signing in");
    tokio::time::sleep(delay).await;
    let session = Session::fabricate(request.role, request.username);
    tracing::info!(role = %session.role, user = %session.user.display_name, "Signed in");
    Arc::new(session)
}
