//! Role dashboards.
//!
//! Each role renders one dashboard variant inside the shared shell. A
//! variant owns its sample data and its local UI state (active tab, modal,
//! selected sub-entity); nothing here talks to a backend.

mod admin;
mod content;
mod faculty;
mod form;
mod parent;
mod preview;
mod shell;
mod student;
mod teacher;

use std::sync::Arc;

pub use admin::{AdminDashboard, AdminData, SystemMetrics, TimeRange};
pub use content::{rupees, rupees_short, Row, Section, SectionBody, Stat, Tone};
pub use faculty::{FacultyDashboard, FacultyData, Mentee};
pub use form::{Acknowledgment, FormField, ModalForm};
pub use parent::{Child, ParentDashboard, ParentData};
pub use preview::PreviewDashboard;
pub use shell::{
    search, ChatLog, ChatMessage, ChatSender, QuickAction, SearchHit, SearchState, SearchTarget,
    ShellProps, ShellState,
};
pub use student::{LeaveKind, StudentDashboard, StudentData};
pub use teacher::{TeacherDashboard, TeacherData};

use crate::core::{Error, Notification, Result, Role, Session};

/// Behaviour shared by every dashboard variant.
pub trait RoleDashboard {
    /// Role whose data this variant shows.
    fn role(&self) -> Role;

    fn tabs(&self) -> &'static [&'static str];

    fn active_tab(&self) -> usize;

    /// Store the active tab. Callers go through [`RoleDashboard::select_tab`].
    fn set_active_tab(&mut self, index: usize);

    /// Switch tabs. Out of range indices are ignored.
    fn select_tab(&mut self, index: usize) -> bool {
        if index < self.tabs().len() {
            self.set_active_tab(index);
            true
        } else {
            false
        }
    }

    fn next_tab(&mut self) {
        let n = self.tabs().len();
        if n > 0 {
            self.set_active_tab((self.active_tab() + 1) % n);
        }
    }

    fn prev_tab(&mut self) {
        let n = self.tabs().len();
        if n > 0 {
            self.set_active_tab((self.active_tab() + n - 1) % n);
        }
    }

    fn active_tab_label(&self) -> &'static str {
        self.tabs().get(self.active_tab()).copied().unwrap_or_default()
    }

    /// Welcome line above the content.
    fn greeting(&self) -> String;

    /// Headline numbers shown on every tab.
    fn headline(&self) -> Vec<Stat>;

    /// Content of the active tab.
    fn sections(&self) -> Vec<Section>;

    fn quick_actions(&self) -> Option<Vec<QuickAction>> {
        None
    }

    /// Dashboard-specific notifications; `None` uses the shell defaults.
    fn notifications(&self) -> Option<Vec<Notification>> {
        None
    }

    fn shell_props(&self, session: &Session) -> ShellProps {
        let mut props = ShellProps::new(session);
        if let Some(actions) = self.quick_actions() {
            props = props.with_quick_actions(actions);
        }
        if let Some(notifications) = self.notifications() {
            props = props.with_notifications(notifications);
        }
        props
    }

    /// Quick action that opens the variant's form.
    fn modal_action(&self) -> Option<&'static str> {
        None
    }

    fn modal(&self) -> Option<&ModalForm> {
        None
    }

    fn modal_mut(&mut self) -> Option<&mut ModalForm> {
        None
    }

    /// Open the variant's form. Returns false if it has none.
    fn open_modal(&mut self) -> bool {
        false
    }

    fn close_modal(&mut self) {}

    /// Validate and submit the open form.
    ///
    /// On success the modal closes; on a validation error it stays open with
    /// the message attached.
    fn submit_modal(&mut self) -> Result<Acknowledgment> {
        Err(Error::validation("form", "no form is open"))
    }

    /// Move to the next sub-entity (child, class, mentee, time range).
    fn select_next(&mut self) -> Option<String> {
        None
    }

    /// Label of the selected sub-entity.
    fn selection(&self) -> Option<String> {
        None
    }
}

/// The active dashboard, one variant per role family.
#[derive(Debug, Clone)]
pub enum Dashboard {
    Student(StudentDashboard),
    Faculty(FacultyDashboard),
    Teacher(TeacherDashboard),
    Parent(ParentDashboard),
    Admin(AdminDashboard),
    Preview(PreviewDashboard),
}

impl Dashboard {
    /// Pick the variant for a session's role, using sample data.
    pub fn for_session(session: &Session) -> Self {
        Self::for_role(session.role)
    }

    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Student => Self::Student(StudentDashboard::default()),
            Role::Faculty => Self::Faculty(FacultyDashboard::default()),
            Role::Teacher => Self::Teacher(TeacherDashboard::default()),
            Role::Parent => Self::Parent(ParentDashboard::default()),
            Role::Admin | Role::DeanDeveloper => Self::Admin(AdminDashboard::default()),
            Role::Principal
            | Role::AssetManager
            | Role::HostelWarden
            | Role::PlacementOfficer
            | Role::FinanceOfficer
            | Role::Librarian
            | Role::ClubEventManager
            | Role::HelpdeskOfficer => Self::Preview(PreviewDashboard::new(role)),
        }
    }

    pub fn view(&self) -> &dyn RoleDashboard {
        match self {
            Self::Student(d) => d,
            Self::Faculty(d) => d,
            Self::Teacher(d) => d,
            Self::Parent(d) => d,
            Self::Admin(d) => d,
            Self::Preview(d) => d,
        }
    }

    pub fn view_mut(&mut self) -> &mut dyn RoleDashboard {
        match self {
            Self::Student(d) => d,
            Self::Faculty(d) => d,
            Self::Teacher(d) => d,
            Self::Parent(d) => d,
            Self::Admin(d) => d,
            Self::Preview(d) => d,
        }
    }

    /// Variant name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Student(_) => "student",
            Self::Faculty(_) => "faculty",
            Self::Teacher(_) => "teacher",
            Self::Parent(_) => "parent",
            Self::Admin(_) => "admin",
            Self::Preview(_) => "preview",
        }
    }
}

/// Session and dashboard travelling together.
#[derive(Debug, Clone)]
pub struct ActiveDashboard {
    pub session: Arc<Session>,
    pub dashboard: Dashboard,
    pub props: ShellProps,
}

impl ActiveDashboard {
    pub fn new(session: Arc<Session>) -> Self {
        let dashboard = Dashboard::for_session(&session);
        let props = dashboard.view().shell_props(&session);
        tracing::debug!(role = %session.role, variant = dashboard.kind(), "Dashboard mounted");
        Self { session, dashboard, props }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NavigationRegistry;

    #[test]
    fn test_dispatch_covers_every_role() {
        for role in Role::all() {
            let dashboard = Dashboard::for_role(*role);
            let expected = match role {
                Role::Student => "student",
                Role::Faculty => "faculty",
                Role::Teacher => "teacher",
                Role::Parent => "parent",
                Role::Admin | Role::DeanDeveloper => "admin",
                _ => "preview",
            };
            assert_eq!(dashboard.kind(), expected, "role {role}");
            assert!(!dashboard.view().tabs().is_empty());
        }
    }

    #[test]
    fn test_badge_matches_notifications_for_every_role() {
        for role in Role::all() {
            let active = ActiveDashboard::new(Session::demo(*role));
            assert_eq!(active.props.badge_count(), active.props.notifications.len());
        }
    }

    #[test]
    fn test_navigation_count_matches_registry() {
        for role in Role::all() {
            let active = ActiveDashboard::new(Session::demo(*role));
            let expected = NavigationRegistry::lookup(*role).map_or(0, <[_]>::len);
            assert_eq!(active.props.sidebar_items.len(), expected, "role {role}");
        }
    }

    #[test]
    fn test_tab_cycling() {
        let mut dashboard = Dashboard::for_role(Role::Student);
        let view = dashboard.view_mut();
        view.prev_tab();
        assert_eq!(view.active_tab(), 3);
        view.next_tab();
        assert_eq!(view.active_tab(), 0);
        assert!(!view.select_tab(9));
        assert!(view.select_tab(2));
        assert_eq!(view.active_tab_label(), "Fee Status");
    }

    #[test]
    fn test_dean_developer_uses_admin_variant() {
        let active = ActiveDashboard::new(Session::demo(Role::DeanDeveloper));
        assert_eq!(active.props.role_label, "Dean Developer");
        assert_eq!(active.dashboard.view().role(), Role::Admin);
        assert_eq!(active.props.user_name, "System Administrator");
    }
}
