//! Parent dashboard.

use serde::Serialize;

use super::content::{rupees, Row, Section, Stat, Tone};
use super::form::{Acknowledgment, FormField, ModalForm};
use super::shell::QuickAction;
use super::RoleDashboard;
use crate::core::{Error, Notification, NotificationKind, Result, Role};

const TABS: &[&str] = &["Academic Overview", "Performance", "Attendance", "Messages"];

const RECIPIENTS: &[&str] = &["Dr. Sarah Williams", "Admin Office"];

/// Monthly CGPA per child, in the order of [`ParentData::children`].
const PROGRESS: &[(&str, [f32; 2])] =
    &[("Jan", [8.2, 8.8]), ("Feb", [8.4, 9.0]), ("Mar", [8.6, 9.1]), ("Apr", [8.7, 9.1])];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Child {
    pub id: String,
    pub name: String,
    /// "Programme - Semester"
    pub class: String,
    pub roll_no: String,
    pub attendance: u8,
    pub cgpa: f32,
    pub fee_balance: u64,
    pub last_active: String,
}

impl Child {
    fn semester(&self) -> &str {
        self.class.split(" - ").nth(1).unwrap_or(&self.class)
    }

    fn programme(&self) -> &str {
        self.class.split_whitespace().next().unwrap_or_default()
    }

    fn attendance_tone(&self) -> Tone {
        if self.attendance >= 75 {
            Tone::Good
        } else {
            Tone::Critical
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParentData {
    pub name: String,
    pub children: Vec<Child>,
}

impl Default for ParentData {
    fn default() -> Self {
        Self {
            name: "Michael Johnson".to_string(),
            children: vec![
                Child {
                    id: "1".to_string(),
                    name: "Alex Johnson".to_string(),
                    class: "B.Tech Computer Science - 6th Semester".to_string(),
                    roll_no: "CS2025001".to_string(),
                    attendance: 87,
                    cgpa: 8.7,
                    fee_balance: 45000,
                    last_active: "2 hours ago".to_string(),
                },
                Child {
                    id: "2".to_string(),
                    name: "Emma Johnson".to_string(),
                    class: "B.Com Finance - 4th Semester".to_string(),
                    roll_no: "CM2023045".to_string(),
                    attendance: 94,
                    cgpa: 9.1,
                    fee_balance: 0,
                    last_active: "1 day ago".to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParentDashboard {
    pub data: ParentData,
    active_tab: usize,
    selected_child: usize,
    modal: Option<ModalForm>,
}

impl ParentDashboard {
    pub fn new(data: ParentData) -> Self {
        Self { data, ..Self::default() }
    }

    pub fn selected_child(&self) -> Option<&Child> {
        self.data.children.get(self.selected_child)
    }

    fn average_cgpa(&self) -> f32 {
        if self.data.children.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.data.children.len() as f32;
        self.data.children.iter().map(|c| c.cgpa).sum::<f32>() / n
    }

    fn children_cards(&self) -> Section {
        Section::rows(
            "Children",
            self.data
                .children
                .iter()
                .enumerate()
                .map(|(i, child)| {
                    let marker = if i == self.selected_child { "▸ " } else { "" };
                    let status = if child.fee_balance > 0 { "Fee Due" } else { "All Clear" };
                    Row::new(
                        format!("{marker}{}", child.name),
                        format!("{} · {} · last active {}", child.roll_no, child.class, child.last_active),
                        format!(
                            "CGPA {:.1} · {}% · {} · {status}",
                            child.cgpa,
                            child.attendance,
                            rupees(child.fee_balance)
                        ),
                    )
                    .tone(if child.fee_balance > 0 { Tone::Warning } else { Tone::Good })
                })
                .collect(),
        )
    }

    fn overview(&self, child: &Child) -> Vec<Section> {
        let tracker = PROGRESS
            .iter()
            .map(|(month, values)| {
                let cgpa = values.get(self.selected_child).copied().unwrap_or(child.cgpa);
                Stat::new(*month, format!("{cgpa:.1}"))
            })
            .collect();
        vec![
            self.children_cards(),
            Section::stats(
                format!("{}'s Academic Progress ({})", child.name, child.semester()),
                vec![
                    Stat::new("Current CGPA", format!("{:.1}/10", child.cgpa)),
                    Stat::new("Attendance", format!("{}%", child.attendance)).tone(child.attendance_tone()),
                    Stat::new("Last Grade", "A"),
                    Stat::new("Assignments", "3"),
                    Stat::new("Academic Performance", format!("{:.0}%", child.cgpa * 10.0)),
                    Stat::new("Assignment Completion", "92%"),
                ],
            ),
            Section::stats("Performance Tracker", tracker),
        ]
    }

    fn performance(&self) -> Section {
        Section::rows(
            "Performance",
            self.data
                .children
                .iter()
                .map(|child| {
                    Row::new(
                        child.name.clone(),
                        format!("{} · Rank in Class: 5th out of 45", child.programme()),
                        format!("CGPA {:.1} · {}% · progress {:.0}%", child.cgpa, child.attendance, child.cgpa * 10.0),
                    )
                })
                .collect(),
        )
    }

    fn attendance(child: &Child) -> Vec<Section> {
        let mut sections = vec![Section::stats(
            format!("Attendance Report - {}", child.name),
            vec![
                Stat::new("Classes Attended", "156").tone(Tone::Good),
                Stat::new("Classes Missed", "23").tone(Tone::Critical),
                Stat::new("Total Classes", "179"),
                Stat::new("Overall Attendance", format!("{}%", child.attendance)).tone(child.attendance_tone()),
            ],
        )];
        if child.attendance < 75 {
            sections.push(Section::text(
                "Alert",
                ["Attendance is below the required 75% threshold. Please ensure regular attendance."],
            ));
        }
        sections
    }

    fn messages() -> Section {
        Section::rows(
            "Recent Communications",
            vec![
                Row::new(
                    "Dr. Sarah Williams",
                    "Alex is showing great improvement in Data Structures. Please encourage him to \
                     continue the good work. Next assignment due on Friday.",
                    "2 hours ago",
                ),
                Row::new(
                    "Admin Office",
                    "Parent-teacher meeting scheduled for Oct 25, 2025 at 10:00 AM. Please confirm \
                     your attendance.",
                    "1 day ago",
                )
                .tone(Tone::Warning),
            ],
        )
    }
}

fn notifications() -> Vec<Notification> {
    vec![
        Notification::new(
            "1",
            NotificationKind::Info,
            "Parent-Teacher Meeting",
            "Scheduled for Oct 25, 2025 at 10:00 AM",
            "2 hours ago",
        ),
        Notification::new(
            "2",
            NotificationKind::Success,
            "Payment Confirmed",
            "Emma's semester fee payment processed successfully",
            "1 day ago",
        ),
        Notification::new(
            "3",
            NotificationKind::Warning,
            "Attendance Alert",
            "Alex missed 2 classes this week",
            "3 days ago",
        ),
    ]
}

impl RoleDashboard for ParentDashboard {
    fn role(&self) -> Role {
        Role::Parent
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
            "Welcome, {}! · Monitoring the academic journey of {} children",
            self.data.name,
            self.data.children.len()
        )
    }

    fn headline(&self) -> Vec<Stat> {
        let due: u64 = self.data.children.iter().map(|c| c.fee_balance).sum();
        vec![
            Stat::new("Active Students", self.data.children.len().to_string()),
            Stat::new("Avg Performance", format!("{:.1}", self.average_cgpa())),
            Stat::new("Total Due", rupees(due)).tone(if due > 0 { Tone::Warning } else { Tone::Good }),
        ]
    }

    fn sections(&self) -> Vec<Section> {
        let Some(child) = self.selected_child() else {
            return vec![Section::text("Children", ["No children linked to this account."])];
        };
        match self.active_tab {
            1 => vec![self.performance()],
            2 => Self::attendance(child),
            3 => vec![Self::messages()],
            _ => self.overview(child),
        }
    }

    fn quick_actions(&self) -> Option<Vec<QuickAction>> {
        Some(vec![
            QuickAction::primary("pay-fees", "Pay Fees"),
            QuickAction::new("message-teachers", "Message Teachers"),
            QuickAction::new("schedule-meeting", "Schedule Meeting"),
            QuickAction::new("download-reports", "Download Reports"),
            QuickAction::new("emergency-contact", "Emergency Contact"),
        ])
    }

    fn notifications(&self) -> Option<Vec<Notification>> {
        Some(notifications())
    }

    fn modal_action(&self) -> Option<&'static str> {
        Some("message-teachers")
    }

    fn modal(&self) -> Option<&ModalForm> {
        self.modal.as_ref()
    }

    fn modal_mut(&mut self) -> Option<&mut ModalForm> {
        self.modal.as_mut()
    }

    fn open_modal(&mut self) -> bool {
        self.modal = Some(ModalForm::new(
            "Message Teachers",
            vec![
                FormField::choice("to", "To", RECIPIENTS),
                FormField::text("message", "Message"),
            ],
        ));
        true
    }

    fn close_modal(&mut self) {
        self.modal = None;
    }

    fn submit_modal(&mut self) -> Result<Acknowledgment> {
        let form = self.modal.as_mut().ok_or_else(|| Error::validation("form", "no form is open"))?;
        let to = form.check(|f| {
            f.required("message")?;
            Ok(f.value("to").to_string())
        })?;
        self.modal = None;

        let ack = Acknowledgment::new(format!("Message sent to {to}"));
        tracing::info!(reference = %ack.reference(), %to, "Parent message sent");
        Ok(ack)
    }

    fn select_next(&mut self) -> Option<String> {
        if self.data.children.is_empty() {
            return None;
        }
        self.selected_child = (self.selected_child + 1) % self.data.children.len();
        self.selection()
    }

    fn selection(&self) -> Option<String> {
        self.selected_child().map(|c| c.name.clone())
    }
}
