//! Admin dashboard ("System Control Center").

use std::fmt;

use serde::Serialize;

use super::content::{rupees_short, Row, Section, Stat, Tone};
use super::form::{Acknowledgment, FormField, ModalForm};
use super::shell::QuickAction;
use super::RoleDashboard;
use crate::core::{Error, Notification, NotificationKind, Result, Role};

const TABS: &[&str] = &["System Overview", "User Management", "Analytics", "System Health"];

const USER_ROLES: &[&str] = &["Student", "Faculty", "Parent", "Staff"];

/// Window the analytics tab summarises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TimeRange {
    pub fn next(self) -> Self {
        match self {
            Self::Day => Self::Week,
            Self::Week => Self::Month,
            Self::Month => Self::Quarter,
            Self::Quarter => Self::Day,
        }
    }

    fn days(self) -> u64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminData {
    pub name: String,
    pub role: String,
    pub last_login: String,
}

impl Default for AdminData {
    fn default() -> Self {
        Self {
            name: "System Administrator".to_string(),
            role: "Super Admin".to_string(),
            last_login: "2 hours ago".to_string(),
        }
    }
}

/// Institution-wide counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemMetrics {
    pub total_users: u64,
    pub active_users: u64,
    pub total_revenue: u64,
    pub pending_fees: u64,
    /// Percent
    pub uptime: f32,
    /// Percent
    pub storage_used: u8,
    /// Per day
    pub api_calls: u64,
    /// Percent
    pub error_rate: f32,
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self {
            total_users: 2847,
            active_users: 2156,
            total_revenue: 45_600_000,
            pending_fees: 2_300_000,
            uptime: 99.9,
            storage_used: 78,
            api_calls: 125_000,
            error_rate: 0.2,
        }
    }
}

// (role, count, active, percentage, growth)
const USER_STATS: &[(&str, u64, u64, u8, &str)] = &[
    ("Students", 2156, 1834, 85, "+12%"),
    ("Faculty", 287, 245, 85, "+3%"),
    ("Parents", 1890, 1234, 65, "+8%"),
    ("Staff", 145, 132, 91, "+1%"),
];

// (kind, message, time, severity)
const SYSTEM_ALERTS: &[(&str, &str, &str, &str)] = &[
    ("critical", "Server disk usage above 80%", "10 mins ago", "high"),
    ("warning", "15 students with attendance below 75%", "1 hour ago", "medium"),
    ("info", "Monthly report generation scheduled", "2 hours ago", "low"),
];

// (user, action, time, kind)
const ACTIVITIES: &[(&str, &str, &str, &str)] = &[
    ("Dr. Sarah Williams", "Updated course syllabus", "5 mins ago", "academic"),
    ("Finance Dept", "Generated fee reports", "15 mins ago", "financial"),
    ("System", "Automated backup completed", "30 mins ago", "system"),
    ("Alex Johnson", "Fee payment processed", "1 hour ago", "student"),
    ("Admin Portal", "New user accounts created", "2 hours ago", "administrative"),
];

// (department, students, revenue, efficiency)
const DEPARTMENTS: &[(&str, u32, u64, u8)] = &[
    ("Computer Science", 450, 5_400_000, 94),
    ("Electronics", 380, 4_560_000, 89),
    ("Mechanical", 420, 5_040_000, 92),
    ("Civil", 350, 4_200_000, 87),
];

#[derive(Debug, Clone, Default)]
pub struct AdminDashboard {
    pub data: AdminData,
    pub metrics: SystemMetrics,
    active_tab: usize,
    time_range: TimeRange,
    modal: Option<ModalForm>,
}

impl AdminDashboard {
    pub fn new(data: AdminData, metrics: SystemMetrics) -> Self {
        Self { data, metrics, ..Self::default() }
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    fn overview() -> Vec<Section> {
        vec![
            Section::rows(
                "User Activity Overview",
                USER_STATS
                    .iter()
                    .map(|(role, count, active, pct, growth)| {
                        Row::new(*role, format!("{active} active of {count} total"), format!("{pct}% · {growth}"))
                    })
                    .collect(),
            ),
            Section::rows(
                "System Activity Log",
                ACTIVITIES
                    .iter()
                    .map(|(user, action, time, kind)| {
                        let tone = match *kind {
                            "system" => Tone::Warning,
                            "financial" => Tone::Good,
                            _ => Tone::Normal,
                        };
                        Row::new(*user, format!("{action} ({kind})"), *time).tone(tone)
                    })
                    .collect(),
            ),
            Section::rows(
                "Department Performance Metrics",
                DEPARTMENTS
                    .iter()
                    .map(|(name, students, revenue, efficiency)| {
                        Row::new(
                            *name,
                            format!("{students} students · {}", rupees_short(*revenue)),
                            format!("{efficiency}%"),
                        )
                    })
                    .collect(),
            ),
        ]
    }

    fn users(&self) -> Vec<Section> {
        vec![
            Section::stats(
                "User Management Console",
                vec![
                    Stat::new("Total Users", group(self.metrics.total_users)),
                    Stat::new("Active Today", group(self.metrics.active_users)),
                    Stat::new("New This Week", "23"),
                    Stat::new("Pending Approval", "5").tone(Tone::Warning),
                ],
            ),
            Section::rows(
                "Users",
                vec![Row::new(
                    "Dr. Sarah Williams",
                    "sarah.williams@college.edu · Faculty · Computer Science",
                    "Active · 2 hours ago",
                )
                .tone(Tone::Good)],
            ),
        ]
    }

    fn analytics(&self) -> Vec<Section> {
        let days = self.time_range.days();
        let api_calls = self.metrics.api_calls * days;
        let revenue = self.metrics.total_revenue * days / 365;
        vec![Section::stats(
            format!("Analytics (last {})", self.time_range),
            vec![
                Stat::new("API Calls", group(api_calls)),
                Stat::new("Revenue Collected", rupees_short(revenue)),
                Stat::new("Active Users", group(self.metrics.active_users)),
                Stat::new("Error Rate", format!("{}%", self.metrics.error_rate)),
            ],
        )]
    }

    fn health(&self) -> Vec<Section> {
        vec![
            Section::stats(
                "Server Status",
                vec![
                    Stat::new("CPU Usage", "45%"),
                    Stat::new("Memory Usage", "62%"),
                    Stat::new("Disk Usage", format!("{}%", self.metrics.storage_used))
                        .tone(if self.metrics.storage_used >= 75 { Tone::Warning } else { Tone::Normal }),
                ],
            ),
            Section::stats(
                "Database Health",
                vec![
                    Stat::new("Total Records", "2.8M"),
                    Stat::new("Avg Query Time", "15ms"),
                    Stat::new("Index Hit Ratio", "98%"),
                ],
            ),
            Section::stats(
                "Network Status",
                vec![
                    Stat::new("Uptime", format!("{}%", self.metrics.uptime)).tone(Tone::Good),
                    Stat::new("API Calls/day", format!("{}K", self.metrics.api_calls / 1000)),
                    Stat::new("Error Rate", format!("{}%", self.metrics.error_rate)),
                ],
            ),
        ]
    }
}

/// Thousands separators: `2,847`.
fn group(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn notifications() -> Vec<Notification> {
    vec![
        Notification::new(
            "1",
            NotificationKind::Error,
            "Critical System Alert",
            "Database connection pool reaching capacity",
            "5 mins ago",
        ),
        Notification::new(
            "2",
            NotificationKind::Warning,
            "Performance Degradation",
            "API response time increased by 15%",
            "30 mins ago",
        ),
        Notification::new(
            "3",
            NotificationKind::Info,
            "Scheduled Maintenance",
            "System backup completed successfully",
            "2 hours ago",
        ),
    ]
}

impl RoleDashboard for AdminDashboard {
    fn role(&self) -> Role {
        Role::Admin
    }

    fn tabs(&self) -> &'static [&'static str] {
        TABS
    }

    fn active_tab(&self) -> usize {
        self.active_tab
    }

    fn set_active_tab(&mut self, index: usize) {
        self.active_tab = index;
    }

    fn greeting(&self) -> String {
        format!(
            "System Control Center · {} · {} · Last login: {}",
            self.data.name, self.data.role, self.data.last_login
        )
    }

    fn headline(&self) -> Vec<Stat> {
        let mut stats = vec![
            Stat::new("Total Users", group(self.metrics.total_users)).hint("↑ 12% this month"),
            Stat::new("Total Revenue", rupees_short(self.metrics.total_revenue)).hint("↑ 8% this month"),
            Stat::new("System Uptime", format!("{}%", self.metrics.uptime)).hint("Last 30 days"),
            Stat::new("Pending Fees", rupees_short(self.metrics.pending_fees)).hint("↓ 5% this week"),
        ];
        stats.extend(
            SYSTEM_ALERTS
                .iter()
                .filter(|a| a.3 == "high")
                .map(|a| Stat::new("CRITICAL", a.1).hint("Resolve Now").tone(Tone::Critical)),
        );
        stats
    }

    fn sections(&self) -> Vec<Section> {
        match self.active_tab {
            1 => self.users(),
            2 => self.analytics(),
            3 => self.health(),
            _ => Self::overview(),
        }
    }

    fn quick_actions(&self) -> Option<Vec<QuickAction>> {
        Some(vec![
            QuickAction::primary("add-user", "Add New User"),
            QuickAction::new("export-reports", "Export Reports"),
            QuickAction::new("system-backup", "System Backup"),
            QuickAction::new("manage-settings", "Manage Settings"),
            QuickAction::new("system-logs", "System Logs"),
        ])
    }

    fn notifications(&self) -> Option<Vec<Notification>> {
        Some(notifications())
    }

    fn modal_action(&self) -> Option<&'static str> {
        Some("add-user")
    }

    fn modal(&self) -> Option<&ModalForm> {
        self.modal.as_ref()
    }

    fn modal_mut(&mut self) -> Option<&mut ModalForm> {
        self.modal.as_mut()
    }

    fn open_modal(&mut self) -> bool {
        self.modal = Some(ModalForm::new(
            "Add New User",
            vec![
                FormField::text("name", "Full Name"),
                FormField::text("email", "Email"),
                FormField::choice("role", "Role", USER_ROLES),
            ],
        ));
        true
    }

    fn close_modal(&mut self) {
        self.modal = None;
    }

    fn submit_modal(&mut self) -> Result<Acknowledgment> {
        let form = self.modal.as_mut().ok_or_else(|| Error::validation("form", "no form is open"))?;
        let (name, email, role) = form.check(|f| {
            let name = f.required("name")?.to_string();
            let email = f.required("email")?;
            let valid = email
                .split_once('@')
                .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
            if !valid {
                return Err(Error::validation("email", format!("'{email}' is not an email address")));
            }
            Ok((name, email.to_string(), f.value("role").to_string()))
        })?;
        self.modal = None;
        self.metrics.total_users += 1;

        let ack = Acknowledgment::new(format!("{role} account created for {name} <{email}>"));
        tracing::info!(reference = %ack.reference(), %role, "User account created");
        Ok(ack)
    }

    fn select_next(&mut self) -> Option<String> {
        self.time_range = self.time_range.next();
        self.selection()
    }

    fn selection(&self) -> Option<String> {
        Some(self.time_range.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group() {
        assert_eq!(group(0), "0");
        assert_eq!(group(999), "999");
        assert_eq!(group(2847), "2,847");
        assert_eq!(group(875_000), "875,000");
        assert_eq!(group(1_234_567), "1,234,567");
    }

    #[test]
    fn test_headline_includes_critical_alerts() {
        let dashboard = AdminDashboard::default();
        let headline = dashboard.headline();
        assert_eq!(headline[0].value, "2,847");
        assert_eq!(headline[1].value, "₹4.56Cr");
        let critical: Vec<_> = headline.iter().filter(|s| s.tone == Tone::Critical).collect();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].value, "Server disk usage above 80%");
    }

    #[test]
    fn test_time_range_cycles() {
        let mut dashboard = AdminDashboard::default();
        assert_eq!(dashboard.selection().as_deref(), Some("7d"));
        assert_eq!(dashboard.select_next().as_deref(), Some("30d"));
        dashboard.select_next();
        assert_eq!(dashboard.select_next().as_deref(), Some("24h"));

        dashboard.select_tab(2);
        let analytics = dashboard.sections();
        assert_eq!(analytics[0].title, "Analytics (last 24h)");
        assert_eq!(analytics[0].stat("API Calls").unwrap().value, "125,000");
    }

    #[test]
    fn test_add_user_validates_email() {
        let mut dashboard = AdminDashboard::default();
        dashboard.open_modal();
        let form = dashboard.modal_mut().unwrap();
        form.set("name", "Priya Nair");
        form.set("email", "priya.nair");
        let err = dashboard.submit_modal().unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "email"));

        dashboard.modal_mut().unwrap().set("email", "priya@college.edu");
        let ack = dashboard.submit_modal().unwrap();
        assert_eq!(ack.message, "Student account created for Priya Nair <priya@college.edu>");
        assert_eq!(dashboard.metrics.total_users, 2848);
    }

    #[test]
    fn test_health_tab() {
        let mut dashboard = AdminDashboard::default();
        dashboard.select_tab(3);
        let sections = dashboard.sections();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[2].stat("Uptime").unwrap().value, "99.9%");
        assert_eq!(sections[0].stat("Disk Usage").unwrap().tone, Tone::Warning);
    }
}
