//! Teacher dashboard.

use chrono::Local;
use serde::Serialize;

use super::content::{Row, Section, Stat, Tone};
use super::form::{Acknowledgment, FormField, ModalForm};
use super::shell::QuickAction;
use super::RoleDashboard;
use crate::core::{Error, Notification, NotificationKind, Result, Role};

const TABS: &[&str] = &["Today's Classes", "Class Performance", "Student Requests", "Gradebook"];

const CHOOSE_CLASS: &str = "Choose a class";
const CLASS_CHOICES: &[&str] = &[CHOOSE_CLASS, "CS-6A", "CS-6B", "CS-8A"];
const METHODS: &[&str] = &["Manual Entry", "QR Code Scan", "Bulk Upload"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherData {
    pub name: String,
    pub employee_id: String,
    pub department: String,
    pub subjects: Vec<String>,
    /// Weekly classes
    pub classes: u32,
    pub students: u32,
}

impl Default for TeacherData {
    fn default() -> Self {
        Self {
            name: "Dr. Sarah Williams".to_string(),
            employee_id: "FAC2023001".to_string(),
            department: "Computer Science".to_string(),
            subjects: vec![
                "Data Structures".to_string(),
                "Database Management".to_string(),
                "Software Engineering".to_string(),
            ],
            classes: 8,
            students: 156,
        }
    }
}

struct ClassSlot {
    subject: &'static str,
    class: &'static str,
    time: &'static str,
    room: &'static str,
    students: u32,
    avg_grade: f32,
    attendance: u8,
}

const CLASSES: &[ClassSlot] = &[
    ClassSlot {
        subject: "Data Structures",
        class: "CS-6A",
        time: "09:00 AM",
        room: "CS-101",
        students: 45,
        avg_grade: 8.2,
        attendance: 89,
    },
    ClassSlot {
        subject: "Database Management",
        class: "CS-6B",
        time: "11:00 AM",
        room: "CS-203",
        students: 42,
        avg_grade: 7.8,
        attendance: 92,
    },
    ClassSlot {
        subject: "Software Engineering",
        class: "CS-8A",
        time: "02:00 PM",
        room: "CS-105",
        students: 38,
        avg_grade: 8.5,
        attendance: 87,
    },
];

// (name, kind, subject, date, status)
const REQUESTS: &[(&str, &str, &str, &str, &str)] = &[
    ("Alex Johnson", "Leave Request", "Medical Leave", "2025-09-25", "pending"),
    ("Emma Davis", "OD Request", "Technical Event", "2025-09-26", "pending"),
    ("Michael Brown", "Assignment Extension", "Database Project", "2025-09-24", "approved"),
];

#[derive(Debug, Clone, Default)]
pub struct TeacherDashboard {
    pub data: TeacherData,
    active_tab: usize,
    selected_class: Option<usize>,
    modal: Option<ModalForm>,
}

impl TeacherDashboard {
    pub fn new(data: TeacherData) -> Self {
        Self { data, ..Self::default() }
    }

    pub fn selected_class(&self) -> Option<&'static str> {
        self.selected_class.and_then(|i| CLASSES.get(i)).map(|c| c.class)
    }

    fn pending_requests() -> usize {
        REQUESTS.iter().filter(|r| r.4 == "pending").count()
    }

    fn today() -> Vec<Section> {
        vec![
            Section::rows(
                "Today's Schedule",
                CLASSES
                    .iter()
                    .map(|c| {
                        Row::new(
                            c.subject,
                            format!("{} · {} · {} students enrolled", c.class, c.room, c.students),
                            c.time,
                        )
                    })
                    .collect(),
            ),
            Section::rows(
                "Schedule Notifications",
                vec![
                    Row::new(
                        "Lab Session Rescheduled",
                        "Database Lab moved from CS-203 to CS-301 due to maintenance",
                        "2 hours ago",
                    )
                    .tone(Tone::Warning),
                    Row::new(
                        "Extra Class Request",
                        "CS-6A students requested extra doubt clearing session",
                        "1 day ago",
                    ),
                ],
            ),
            Section::stats(
                "Quick Statistics",
                vec![
                    Stat::new("Average Attendance", "89.3%"),
                    Stat::new("Assignment Submissions", "92%"),
                    Stat::new("Grade Processing", "78%").tone(Tone::Warning),
                ],
            ),
        ]
    }

    fn performance() -> Section {
        Section::rows(
            "Class Performance Analytics",
            CLASSES
                .iter()
                .map(|c| {
                    let tone = if c.attendance >= 85 { Tone::Good } else { Tone::Critical };
                    Row::new(
                        c.class,
                        format!("{} · {} students", c.subject, c.students),
                        format!("{:.1}/10 · {}%", c.avg_grade, c.attendance),
                    )
                    .tone(tone)
                })
                .collect(),
        )
    }

    fn requests() -> Section {
        Section::rows(
            format!("Student Requests ({} pending)", Self::pending_requests()),
            REQUESTS
                .iter()
                .map(|(name, kind, subject, date, status)| {
                    let tone = if *status == "pending" { Tone::Warning } else { Tone::Good };
                    Row::new(*name, format!("{kind} · {subject} · requested on {date}"), *status)
                        .tone(tone)
                })
                .collect(),
        )
    }

    fn gradebook() -> Section {
        Section::stats(
            "Grade Management",
            vec![
                Stat::new("Total Grades", "156"),
                Stat::new("Pending Reviews", "23").tone(Tone::Warning),
                Stat::new("Class Average", "8.2"),
            ],
        )
    }
}

fn notifications() -> Vec<Notification> {
    vec![
        Notification::new(
            "1",
            NotificationKind::Info,
            "Faculty Meeting",
            "Department meeting scheduled for tomorrow at 2:00 PM",
            "2 hours ago",
        ),
        Notification::new(
            "2",
            NotificationKind::Warning,
            "Grade Submission Due",
            "Midterm grades must be submitted by Friday",
            "1 day ago",
        ),
        Notification::new(
            "3",
            NotificationKind::Success,
            "Class Feedback",
            "Received positive feedback from CS-6A students",
            "2 days ago",
        ),
    ]
}

impl RoleDashboard for TeacherDashboard {
    fn role(&self) -> Role {
        Role::Teacher
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
            "Good Morning, {}! · {} Department · {}",
            self.data.name, self.data.department, self.data.employee_id
        )
    }

    fn headline(&self) -> Vec<Stat> {
        let mut stats = vec![
            Stat::new("Today's Classes", CLASSES.len().to_string()),
            Stat::new("Total Students", self.data.students.to_string()),
            Stat::new("Subjects", self.data.subjects.len().to_string()),
            Stat::new("Weekly Classes", self.data.classes.to_string()),
            Stat::new("Avg Class Grade", "8.2"),
            Stat::new("Pending Requests", Self::pending_requests().to_string()),
        ];
        // Warnings are surfaced as action-required banners
        stats.extend(
            notifications()
                .into_iter()
                .filter(|n| n.kind == NotificationKind::Warning)
                .map(|n| Stat::new(n.title, n.message).hint("Action Required").tone(Tone::Warning)),
        );
        stats
    }

    fn sections(&self) -> Vec<Section> {
        match self.active_tab {
            1 => vec![Self::performance()],
            2 => vec![Self::requests()],
            3 => vec![Self::gradebook()],
            _ => Self::today(),
        }
    }

    fn quick_actions(&self) -> Option<Vec<QuickAction>> {
        Some(vec![
            QuickAction::primary("take-attendance", "Take Attendance"),
            QuickAction::new("upload-grades", "Upload Grades"),
            QuickAction::new("manage-timetable", "Manage Timetable"),
            QuickAction::new("send-announcement", "Send Announcement"),
            QuickAction::new("generate-reports", "Generate Reports"),
        ])
    }

    fn notifications(&self) -> Option<Vec<Notification>> {
        Some(notifications())
    }

    fn modal_action(&self) -> Option<&'static str> {
        Some("take-attendance")
    }

    fn modal(&self) -> Option<&ModalForm> {
        self.modal.as_ref()
    }

    fn modal_mut(&mut self) -> Option<&mut ModalForm> {
        self.modal.as_mut()
    }

    /// Open "Take Attendance", preselecting the selected class.
    fn open_modal(&mut self) -> bool {
        let mut form = ModalForm::new(
            "Take Attendance",
            vec![
                FormField::choice("class", "Select Class", CLASS_CHOICES),
                FormField::text("date", "Date (YYYY-MM-DD)"),
                FormField::choice("method", "Method", METHODS),
            ],
        );
        form.set("date", Local::now().date_naive().format("%Y-%m-%d").to_string());
        if let Some(class) = self.selected_class() {
            form.set("class", class);
        }
        self.modal = Some(form);
        true
    }

    fn close_modal(&mut self) {
        self.modal = None;
    }

    fn submit_modal(&mut self) -> Result<Acknowledgment> {
        let form = self.modal.as_mut().ok_or_else(|| Error::validation("form", "no form is open"))?;
        let (class, date, method) = form.check(|f| {
            let class = f.value("class");
            if class == CHOOSE_CLASS || class.is_empty() {
                return Err(Error::validation("class", "choose a class"));
            }
            Ok((class.to_string(), f.date("date")?, f.value("method").to_string()))
        })?;
        self.modal = None;

        let ack = Acknowledgment::new(format!("Attendance session for {class} on {date} started ({method})"));
        tracing::info!(reference = %ack.reference(), %class, %method, "Attendance session started");
        Ok(ack)
    }

    fn select_next(&mut self) -> Option<String> {
        let next = self.selected_class.map_or(0, |i| (i + 1) % CLASSES.len());
        self.selected_class = Some(next);
        self.selection()
    }

    fn selection(&self) -> Option<String> {
        self.selected_class().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline() {
        let dashboard = TeacherDashboard::default();
        let headline = Section::stats("h", dashboard.headline());
        assert_eq!(headline.stat("Today's Classes").unwrap().value, "3");
        assert_eq!(headline.stat("Subjects").unwrap().value, "3");
        assert_eq!(headline.stat("Pending Requests").unwrap().value, "2");
        assert!(headline.stat("Grade Submission Due").is_some());
    }

    #[test]
    fn test_attendance_requires_class() {
        let mut dashboard = TeacherDashboard::default();
        dashboard.open_modal();
        let err = dashboard.submit_modal().unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "class"));

        dashboard.modal_mut().unwrap().set("class", "CS-6B");
        let ack = dashboard.submit_modal().unwrap();
        assert!(ack.message.contains("CS-6B"));
        assert!(ack.message.contains("Manual Entry"));
    }

    #[test]
    fn test_selected_class_prefills_modal() {
        let mut dashboard = TeacherDashboard::default();
        assert_eq!(dashboard.select_next().as_deref(), Some("CS-6A"));
        assert_eq!(dashboard.select_next().as_deref(), Some("CS-6B"));
        dashboard.open_modal();
        assert_eq!(dashboard.modal().unwrap().value("class"), "CS-6B");
        assert!(dashboard.submit_modal().is_ok());
    }

    #[test]
    fn test_performance_tones() {
        let mut dashboard = TeacherDashboard::default();
        dashboard.select_tab(1);
        let section = &dashboard.sections()[0];
        assert_eq!(section.len(), 3);
        assert_eq!(section.plain_lines()[0], "CS-6A - Data Structures · 45 students  8.2/10 · 89%");
    }

    #[test]
    fn test_requests_tab() {
        let mut dashboard = TeacherDashboard::default();
        dashboard.select_tab(2);
        assert_eq!(dashboard.sections()[0].title, "Student Requests (2 pending)");
    }
}
