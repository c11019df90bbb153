//! Placeholder dashboard for roles that are listed but not built out.

use super::content::{Section, Stat, Tone};
use super::RoleDashboard;
use crate::core::Role;

const TABS: &[&str] = &["Coming Soon"];

#[derive(Debug, Clone)]
pub struct PreviewDashboard {
    role: Role,
}

impl PreviewDashboard {
    pub fn new(role: Role) -> Self {
        Self { role }
    }
}

impl RoleDashboard for PreviewDashboard {
    fn role(&self) -> Role {
        self.role
    }

    fn tabs(&self) -> &'static [&'static str] {
        TABS
    }

    fn active_tab(&self) -> usize {
        0
    }

    fn set_active_tab(&mut self, _index: usize) {}

    fn greeting(&self) -> String {
        format!("{} Dashboard · {}", self.role.label(), self.role.description())
    }

    fn headline(&self) -> Vec<Stat> {
        vec![Stat::new("Status", "Preview").tone(Tone::Muted)]
    }

    fn sections(&self) -> Vec<Section> {
        vec![Section::text(
            "Coming Soon",
            [
                format!("The {} dashboard is under development.", self.role.label()),
                "Navigation is available from the sidebar; pages open in a later release.".to_string(),
            ],
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_coming_soon_tab() {
        let mut dashboard = PreviewDashboard::new(Role::Librarian);
        assert_eq!(dashboard.tabs(), &["Coming Soon"]);
        dashboard.next_tab();
        assert_eq!(dashboard.active_tab(), 0);
        assert!(!dashboard.open_modal());
        assert!(dashboard.submit_modal().is_err());
        assert!(dashboard.select_next().is_none());
    }

    #[test]
    fn test_sections_name_the_role() {
        let dashboard = PreviewDashboard::new(Role::HostelWarden);
        let sections = dashboard.sections();
        assert_eq!(sections.len(), 1);
        assert!(sections[0].plain_lines()[0].contains("Hostel Warden"));
        assert!(dashboard.greeting().starts_with("Hostel Warden Dashboard"));
    }
}
