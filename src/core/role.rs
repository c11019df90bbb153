//! User roles.
//!
//! A role decides which navigation set, theme and dashboard variant a
//! session sees. Roles are fixed for the lifetime of a session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Error;

/// Access/persona category of a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Student,
    Faculty,
    Teacher,
    Parent,
    Admin,
    DeanDeveloper,
    Principal,
    AssetManager,
    HostelWarden,
    PlacementOfficer,
    FinanceOfficer,
    Librarian,
    ClubEventManager,
    HelpdeskOfficer,
}

/// Whether a role has a complete dashboard or only a preview placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    Ready,
    Preview,
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "Ready"),
            Self::Preview => write!(f, "Preview"),
        }
    }
}

/// Sample credentials offered on the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleCredentials {
    pub username: &'static str,
    pub password: &'static str,
}

const ALL_ROLES: [Role; 14] = [
    Role::DeanDeveloper,
    Role::Principal,
    Role::AssetManager,
    Role::Faculty,
    Role::Student,
    Role::Parent,
    Role::HostelWarden,
    Role::PlacementOfficer,
    Role::FinanceOfficer,
    Role::Librarian,
    Role::ClubEventManager,
    Role::HelpdeskOfficer,
    Role::Teacher,
    Role::Admin,
];

impl Role {
    /// Every role, in the order the role switcher presents them.
    pub fn all() -> &'static [Role] {
        &ALL_ROLES
    }

    /// Roles selectable on the login form.
    pub fn login_roles() -> &'static [Role] {
        &[Role::Student, Role::Parent, Role::Faculty, Role::Admin]
    }

    /// Stable identifier (`Dean_Developer`).
    pub fn id(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Faculty => "Faculty",
            Self::Teacher => "Teacher",
            Self::Parent => "Parent",
            Self::Admin => "Admin",
            Self::DeanDeveloper => "Dean_Developer",
            Self::Principal => "Principal",
            Self::AssetManager => "Asset_Manager",
            Self::HostelWarden => "Hostel_Warden",
            Self::PlacementOfficer => "Placement_Officer",
            Self::FinanceOfficer => "Finance_Officer",
            Self::Librarian => "Librarian",
            Self::ClubEventManager => "Club_Event_Manager",
            Self::HelpdeskOfficer => "Helpdesk_Officer",
        }
    }

    /// Human readable label (`Dean Developer`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Faculty => "Faculty",
            Self::Teacher => "Teacher",
            Self::Parent => "Parent",
            Self::Admin => "Admin",
            Self::DeanDeveloper => "Dean Developer",
            Self::Principal => "Principal",
            Self::AssetManager => "Asset Manager",
            Self::HostelWarden => "Hostel Warden",
            Self::PlacementOfficer => "Placement Officer",
            Self::FinanceOfficer => "Finance Officer",
            Self::Librarian => "Librarian",
            Self::ClubEventManager => "Club Event Manager",
            Self::HelpdeskOfficer => "Helpdesk Officer",
        }
    }

    /// One-line description shown in role pickers.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Student => "Learning and academic activities",
            Self::Faculty => "Teaching and student mentorship",
            Self::Teacher => "Classes, attendance and grading",
            Self::Parent => "Child progress monitoring",
            Self::Admin => "System administration and analytics",
            Self::DeanDeveloper => "System administrator with full access",
            Self::Principal => "Academic oversight and administration",
            Self::AssetManager => "Inventory and resource management",
            Self::HostelWarden => "Hostel facility management",
            Self::PlacementOfficer => "Career services and placements",
            Self::FinanceOfficer => "Financial operations and fees",
            Self::Librarian => "Library resources and services",
            Self::ClubEventManager => "Student activities and events",
            Self::HelpdeskOfficer => "Technical support and assistance",
        }
    }

    /// Whether this role renders a full dashboard.
    pub fn readiness(&self) -> Readiness {
        match self {
            Self::Student
            | Self::Faculty
            | Self::Teacher
            | Self::Parent
            | Self::Admin
            | Self::DeanDeveloper => Readiness::Ready,
            _ => Readiness::Preview,
        }
    }

    /// Sample credentials for roles offered on the login form.
    pub fn sample_credentials(&self) -> Option<SampleCredentials> {
        let (username, password) = match self {
            Self::Student => ("alex.johnson", "student123"),
            Self::Parent => ("parent.johnson", "parent123"),
            Self::Faculty => ("dr.williams", "faculty123"),
            Self::Admin => ("admin.system", "admin123"),
            _ => return None,
        };
        Some(SampleCredentials { username, password })
    }

    /// Display name of the demo user fabricated for this role.
    pub fn demo_user_name(&self) -> &'static str {
        match self {
            Self::Student => "Alex Johnson",
            Self::Parent => "Michael Johnson",
            Self::Faculty | Self::Teacher => "Dr. Sarah Williams",
            Self::Admin | Self::DeanDeveloper => "System Administrator",
            _ => "Demo User",
        }
    }

    /// The role after this one in [`Role::all`], wrapping around.
    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|r| r == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Role {
    type Err = Error;

    /// Parse a role from its id or label, ignoring case and separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::all()
            .iter()
            .copied()
            .find(|role| normalize(role.id()) == wanted || normalize(role.label()) == wanted)
            .ok_or_else(|| Error::validation("role", format!("unknown role '{}'", s.trim())))
    }
}

fn normalize(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).map(|c| c.to_ascii_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_variants() {
        assert_eq!("student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!("Dean_Developer".parse::<Role>().unwrap(), Role::DeanDeveloper);
        assert_eq!("dean-developer".parse::<Role>().unwrap(), Role::DeanDeveloper);
        assert_eq!("Club Event Manager".parse::<Role>().unwrap(), Role::ClubEventManager);
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn test_all_roles_unique() {
        let mut ids: Vec<_> = Role::all().iter().map(|r| r.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Role::all().len());
    }

    #[test]
    fn test_readiness() {
        assert_eq!(Role::Student.readiness(), Readiness::Ready);
        assert_eq!(Role::DeanDeveloper.readiness(), Readiness::Ready);
        assert_eq!(Role::Librarian.readiness(), Readiness::Preview);
    }

    #[test]
    fn test_login_roles_have_credentials() {
        for role in Role::login_roles() {
            assert!(role.sample_credentials().is_some(), "{role} should have sample credentials");
        }
        assert!(Role::Teacher.sample_credentials().is_none());
    }

    #[test]
    fn test_next_wraps() {
        let last = *Role::all().last().unwrap();
        assert_eq!(last.next(), Role::all()[0]);
    }

    #[test]
    fn test_demo_user_names() {
        assert_eq!(Role::Student.demo_user_name(), "Alex Johnson");
        assert_eq!(Role::Teacher.demo_user_name(), "Dr. Sarah Williams");
        assert_eq!(Role::HostelWarden.demo_user_name(), "Demo User");
    }
}
