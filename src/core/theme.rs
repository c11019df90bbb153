//! Role theme descriptors.
//!
//! A descriptor is a palette selection in `#RRGGBB` form. The TUI turns it
//! into terminal colours; nothing here depends on the renderer.

use serde::Serialize;

use super::{Error, Role};

/// Cohesive palette for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeDescriptor {
    /// Palette name
    pub name: &'static str,
    /// Active navigation rows, avatar, primary buttons
    pub primary: &'static str,
    /// Soft background tint
    pub secondary: &'static str,
    /// Accent text
    pub accent: &'static str,
    /// Gradient stops for the chat affordance and banners
    pub gradient: (&'static str, &'static str),
}

impl Default for ThemeDescriptor {
    fn default() -> Self {
        Self::default_blue()
    }
}

impl ThemeDescriptor {
    /// Shell default when a dashboard supplies no theme.
    pub const fn default_blue() -> Self {
        Self {
            name: "blue",
            primary: "#2563EB",
            secondary: "#EFF6FF",
            accent: "#2563EB",
            gradient: ("#3B82F6", "#9333EA"),
        }
    }

    /// Vibrant blue/teal.
    pub const fn student() -> Self {
        Self {
            name: "student",
            primary: "#3B82F6",
            secondary: "#EFF6FF",
            accent: "#2563EB",
            gradient: ("#3B82F6", "#14B8A6"),
        }
    }

    /// Dark green, professional.
    pub const fn teacher() -> Self {
        Self {
            name: "teacher",
            primary: "#059669",
            secondary: "#F0FDF4",
            accent: "#16A34A",
            gradient: ("#059669", "#16A34A"),
        }
    }

    /// Indigo/purple.
    pub const fn parent() -> Self {
        Self {
            name: "parent",
            primary: "#6366F1",
            secondary: "#EEF2FF",
            accent: "#4F46E5",
            gradient: ("#6366F1", "#A855F7"),
        }
    }

    /// Grey/black with orange highlights.
    pub const fn admin() -> Self {
        Self {
            name: "admin",
            primary: "#1F2937",
            secondary: "#F9FAFB",
            accent: "#EA580C",
            gradient: ("#1F2937", "#000000"),
        }
    }

    /// Registered theme for a role.
    pub fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::Student => Some(Self::student()),
            Role::Teacher => Some(Self::teacher()),
            Role::Parent => Some(Self::parent()),
            Role::Admin | Role::DeanDeveloper => Some(Self::admin()),
            _ => None,
        }
    }

    /// Registered theme for a role, falling back to [`ThemeDescriptor::default_blue`].
    pub fn resolve(role: Role) -> Self {
        Self::for_role(role).unwrap_or_else(|| {
            let err = Error::FatalConfig { role, what: "theme" };
            tracing::debug!(role = %role, error = %err, "Using default theme");
            Self::default_blue()
        })
    }
}
