//! Navigation registry.
//!
//! Static per-role sidebar definitions. Icons are symbolic keys here and
//! only become glyphs in the TUI layer.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::{Error, Role};

/// Symbolic icon key for a navigation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavIcon {
    Home,
    Courses,
    Timetable,
    Fees,
    Results,
    Library,
    Achievements,
    Students,
    Attendance,
    Gradebook,
    Schedule,
    Messages,
    Children,
    Performance,
    Reports,
    Users,
    Analytics,
    SystemHealth,
    Finance,
    Settings,
}

/// A single sidebar row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    pub icon: NavIcon,
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

impl NavigationItem {
    const fn new(icon: NavIcon, label: &'static str, path: &'static str) -> Self {
        Self { icon, label, path, active: false }
    }

    const fn active(icon: NavIcon, label: &'static str, path: &'static str) -> Self {
        Self { icon, label, path, active: true }
    }
}

const STUDENT_NAV: &[NavigationItem] = &[
    NavigationItem::active(NavIcon::Home, "Dashboard", "/dashboard"),
    NavigationItem::new(NavIcon::Courses, "My Courses", "/courses"),
    NavigationItem::new(NavIcon::Timetable, "Timetable", "/timetable"),
    NavigationItem::new(NavIcon::Fees, "Fee Status", "/fees"),
    NavigationItem::new(NavIcon::Results, "Results", "/results"),
    NavigationItem::new(NavIcon::Library, "Library", "/library"),
    NavigationItem::new(NavIcon::Achievements, "Achievements", "/achievements"),
];

const TEACHER_NAV: &[NavigationItem] = &[
    NavigationItem::active(NavIcon::Home, "Dashboard", "/dashboard"),
    NavigationItem::new(NavIcon::Students, "My Students", "/students"),
    NavigationItem::new(NavIcon::Courses, "Courses", "/courses"),
    NavigationItem::new(NavIcon::Attendance, "Attendance", "/attendance"),
    NavigationItem::new(NavIcon::Gradebook, "Gradebook", "/gradebook"),
    NavigationItem::new(NavIcon::Schedule, "Schedule", "/schedule"),
    NavigationItem::new(NavIcon::Messages, "Messages", "/messages"),
];

const PARENT_NAV: &[NavigationItem] = &[
    NavigationItem::active(NavIcon::Home, "Dashboard", "/dashboard"),
    NavigationItem::new(NavIcon::Children, "My Children", "/children"),
    NavigationItem::new(NavIcon::Performance, "Performance", "/performance"),
    NavigationItem::new(NavIcon::Fees, "Fee Status", "/fees"),
    NavigationItem::new(NavIcon::Messages, "Messages", "/messages"),
    NavigationItem::new(NavIcon::Reports, "Reports", "/reports"),
];

const ADMIN_NAV: &[NavigationItem] = &[
    NavigationItem::active(NavIcon::Home, "Dashboard", "/dashboard"),
    NavigationItem::new(NavIcon::Users, "User Management", "/users"),
    NavigationItem::new(NavIcon::Analytics, "Analytics", "/analytics"),
    NavigationItem::new(NavIcon::SystemHealth, "System Health", "/system"),
    NavigationItem::new(NavIcon::Finance, "Finance", "/finance"),
    NavigationItem::new(NavIcon::Settings, "Settings", "/settings"),
    NavigationItem::new(NavIcon::Reports, "Reports", "/reports"),
];

static REGISTRY: Lazy<HashMap<Role, &'static [NavigationItem]>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(Role::Student, STUDENT_NAV);
    map.insert(Role::Teacher, TEACHER_NAV);
    map.insert(Role::Parent, PARENT_NAV);
    map.insert(Role::Admin, ADMIN_NAV);
    map.insert(Role::DeanDeveloper, ADMIN_NAV);
    map
});

/// Read-only lookup of navigation lists by role.
pub struct NavigationRegistry;

impl NavigationRegistry {
    /// Registered navigation for a role, if any.
    pub fn lookup(role: Role) -> Option<&'static [NavigationItem]> {
        REGISTRY.get(&role).copied()
    }

    /// Navigation for a role, or an empty list when none is registered.
    pub fn items_for(role: Role) -> Vec<NavigationItem> {
        match Self::lookup(role) {
            Some(items) => items.to_vec(),
            None => {
                let err = Error::FatalConfig { role, what: "navigation" };
                tracing::warn!(role = %role, error = %err, "Falling back to empty navigation");
                Vec::new()
            }
        }
    }

    /// Whether the role has a navigation entry.
    pub fn is_registered(role: Role) -> bool {
        REGISTRY.contains_key(&role)
    }
}
