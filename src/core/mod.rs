//! Core types for EduManage.
//!
//! Roles, the static navigation/theme/notification registries, the session
//! context produced by the login mock, configuration and the error taxonomy.

mod config;
mod error;
mod navigation;
mod notification;
mod role;
mod session;
mod theme;

pub use config::{Config, GeneralConfig, LoggingConfig, UiConfig, WorkflowConfig, CONFIG_ENV};
pub use error::{Error, Result};
pub use navigation::{NavIcon, NavigationItem, NavigationRegistry};
pub use notification::{badge_count, default_notifications, Notification, NotificationKind};
pub use role::{Readiness, Role, SampleCredentials};
pub use session::{
    authenticate, initials, LoginField, LoginForm, LoginRequest, Session, UserProfile, DEMO_AVATAR,
};
pub use theme::ThemeDescriptor;
