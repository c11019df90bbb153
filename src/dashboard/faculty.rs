//! Faculty dashboard.
//!
//! Faculty has no registered navigation list, so the shell renders an empty
//! sidebar for it.

use serde::Serialize;

use super::content::{Row, Section, Stat, Tone};
use super::form::{Acknowledgment, FormField, ModalForm};
use super::shell::QuickAction;
use super::RoleDashboard;
use crate::core::{Error, Result, Role};

const TABS: &[&str] = &["Today's Schedule", "My Mentees", "Grading Queue", "Class Analytics"];

const COURSES: &[&str] = &["DS&A", "DBMS", "Software Engg"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacultyData {
    pub name: String,
    pub department: String,
    pub courses: u32,
    pub students: u32,
    pub classes_today: u32,
}

impl Default for FacultyData {
    fn default() -> Self {
        Self {
            name: "Dr. Sarah Williams".to_string(),
            department: "Computer Science".to_string(),
            courses: 3,
            students: 156,
            classes_today: 4,
        }
    }
}

/// A student mentored by the faculty member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mentee {
    pub name: &'static str,
    pub roll_no: &'static str,
    pub cgpa: f32,
    pub attendance: u8,
    pub last_contact: &'static str,
    pub status: &'static str,
}

impl Mentee {
    fn tone(&self) -> Tone {
        match self.status {
            "excellent" => Tone::Good,
            "warning" => Tone::Critical,
            _ => Tone::Normal,
        }
    }
}

const MENTEES: &[Mentee] = &[
    Mentee {
        name: "Alex Johnson",
        roll_no: "CS2025001",
        cgpa: 8.7,
        attendance: 87,
        last_contact: "2 days ago",
        status: "good",
    },
    Mentee {
        name: "Sarah Chen",
        roll_no: "CS2025002",
        cgpa: 9.2,
        attendance: 95,
        last_contact: "1 week ago",
        status: "excellent",
    },
    Mentee {
        name: "Mike Rodriguez",
        roll_no: "CS2025003",
        cgpa: 6.8,
        attendance: 72,
        last_contact: "3 days ago",
        status: "warning",
    },
    Mentee {
        name: "Emily Davis",
        roll_no: "CS2025004",
        cgpa: 8.1,
        attendance: 89,
        last_contact: "1 day ago",
        status: "good",
    },
];

// (course, time, room, students, kind)
const TODAY: &[(&str, &str, &str, u32, &str)] = &[
    ("Data Structures & Algorithms", "09:00 AM", "CS-101", 45, "Lecture"),
    ("Advanced Database Systems", "11:00 AM", "CS-Lab-2", 30, "Lab"),
    ("Software Engineering", "02:00 PM", "CS-105", 38, "Tutorial"),
    ("Capstone Project Review", "04:00 PM", "CS-201", 12, "Seminar"),
];

// (task, due, priority)
const TASKS: &[(&str, &str, &str)] = &[
    ("Grade Midterm Exams - DS&A", "Today", "high"),
    ("Upload Assignment 3 - Database", "Tomorrow", "medium"),
    ("Mentor Meeting - Alex Johnson", "Sep 25", "medium"),
    ("Submit Course Feedback Report", "Sep 28", "low"),
];

// (student, assignment, course, submitted, status)
const SUBMISSIONS: &[(&str, &str, &str, &str, &str)] = &[
    ("Alex Johnson", "Binary Tree Implementation", "DS&A", "2 hours ago", "pending"),
    ("Sarah Chen", "Database Normalization", "DBMS", "4 hours ago", "reviewed"),
    ("Mike Rodriguez", "UML Diagrams", "Software Engg", "1 day ago", "pending"),
];

#[derive(Debug, Clone, Default)]
pub struct FacultyDashboard {
    pub data: FacultyData,
    active_tab: usize,
    selected_mentee: Option<usize>,
    modal: Option<ModalForm>,
}

impl FacultyDashboard {
    pub fn new(data: FacultyData) -> Self {
        Self { data, ..Self::default() }
    }

    pub fn mentees(&self) -> &'static [Mentee] {
        MENTEES
    }

    pub fn selected_mentee(&self) -> Option<&'static Mentee> {
        self.selected_mentee.and_then(|i| MENTEES.get(i))
    }

    fn schedule() -> Vec<Section> {
        vec![
            Section::rows(
                "Today's Classes",
                TODAY
                    .iter()
                    .map(|(course, time, room, students, kind)| {
                        Row::new(*course, format!("{time} · {room}"), format!("{students} students · {kind}"))
                    })
                    .collect(),
            ),
            Section::rows(
                "Pending Tasks",
                TASKS
                    .iter()
                    .map(|(task, due, priority)| {
                        let tone = match *priority {
                            "high" => Tone::Critical,
                            "medium" => Tone::Warning,
                            _ => Tone::Muted,
                        };
                        Row::new(*task, format!("due {due}"), *priority).tone(tone)
                    })
                    .collect(),
            ),
        ]
    }

    fn mentee_rows(&self) -> Section {
        let selected = self.selected_mentee;
        Section::rows(
            "My Mentees",
            MENTEES
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    let marker = if Some(i) == selected { "▸ " } else { "" };
                    Row::new(
                        format!("{marker}{}", m.name),
                        format!("{} · last contact {}", m.roll_no, m.last_contact),
                        format!("CGPA {:.1} · {}% · {}", m.cgpa, m.attendance, m.status),
                    )
                    .tone(m.tone())
                })
                .collect(),
        )
    }

    fn grading() -> Section {
        let pending = SUBMISSIONS.iter().filter(|s| s.4 == "pending").count();
        Section::rows(
            format!("Recent Submissions ({pending} pending)"),
            SUBMISSIONS
                .iter()
                .map(|(student, assignment, course, at, status)| {
                    let (action, tone) = if *status == "reviewed" {
                        ("View Grade", Tone::Good)
                    } else {
                        ("Grade Now", Tone::Warning)
                    };
                    Row::new(*assignment, format!("{student} · {course} · submitted {at}"), action).tone(tone)
                })
                .collect(),
        )
    }

    fn analytics() -> Vec<Section> {
        vec![
            Section::stats(
                "Class Attendance Overview",
                vec![
                    Stat::new("Data Structures & Algorithms", "92%"),
                    Stat::new("Advanced Database Systems", "88%"),
                    Stat::new("Software Engineering", "85%"),
                ],
            ),
            Section::stats(
                "Performance Metrics",
                vec![
                    Stat::new("Avg Class CGPA", "8.4"),
                    Stat::new("Assignment Completion", "94%"),
                    Stat::new("Teaching Rating", "4.6"),
                    Stat::new("Hours/Week", "23"),
                ],
            ),
            Section::stats(
                "Student Performance Distribution",
                vec![
                    Stat::new("Excellent (9-10)", "15").tone(Tone::Good),
                    Stat::new("Good (8-8.9)", "45"),
                    Stat::new("Average (7-7.9)", "72"),
                    Stat::new("Below Avg (6-6.9)", "18").tone(Tone::Warning),
                    Stat::new("Poor (<6)", "6").tone(Tone::Critical),
                ],
            ),
        ]
    }
}

impl RoleDashboard for FacultyDashboard {
    fn role(&self) -> Role {
        Role::Faculty
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
            "Welcome, {}! · {} Department · {} Active Courses",
            self.data.name, self.data.department, self.data.courses
        )
    }

    fn headline(&self) -> Vec<Stat> {
        let low_attendance = MENTEES.iter().filter(|m| m.attendance < 75).count();
        let mut stats = vec![
            Stat::new("Classes Today", self.data.classes_today.to_string()),
            Stat::new("Total Students", self.data.students.to_string()),
            Stat::new("Pending Reviews", "12"),
            Stat::new("Mentees", "25"),
        ];
        if low_attendance > 0 {
            stats.push(
                Stat::new("Mentees below 75%", low_attendance.to_string())
                    .hint("consider scheduling meetings")
                    .tone(Tone::Warning),
            );
        }
        stats
    }

    fn sections(&self) -> Vec<Section> {
        match self.active_tab {
            1 => vec![self.mentee_rows()],
            2 => vec![Self::grading()],
            3 => Self::analytics(),
            _ => Self::schedule(),
        }
    }

    fn quick_actions(&self) -> Option<Vec<QuickAction>> {
        Some(vec![
            QuickAction::primary("quick-attendance", "Quick Attendance"),
            QuickAction::new("new-assignment", "New Assignment"),
            QuickAction::new("sos-alert", "SOS Alert"),
        ])
    }

    fn modal_action(&self) -> Option<&'static str> {
        Some("new-assignment")
    }

    fn modal(&self) -> Option<&ModalForm> {
        self.modal.as_ref()
    }

    fn modal_mut(&mut self) -> Option<&mut ModalForm> {
        self.modal.as_mut()
    }

    fn open_modal(&mut self) -> bool {
        self.modal = Some(ModalForm::new(
            "New Assignment",
            vec![
                FormField::choice("course", "Course", COURSES),
                FormField::text("title", "Title"),
                FormField::text("due", "Due Date (YYYY-MM-DD)"),
            ],
        ));
        true
    }

    fn close_modal(&mut self) {
        self.modal = None;
    }

    fn submit_modal(&mut self) -> Result<Acknowledgment> {
        let form = self.modal.as_mut().ok_or_else(|| Error::validation("form", "no form is open"))?;
        let (course, title, due) = form.check(|f| {
            let title = f.required("title")?.to_string();
            let due = f.date("due")?;
            Ok((f.value("course").to_string(), title, due))
        })?;
        self.modal = None;

        let ack = Acknowledgment::new(format!("Assignment '{title}' for {course} due {due} published"));
        tracing::info!(reference = %ack.reference(), %course, "Assignment created");
        Ok(ack)
    }

    fn select_next(&mut self) -> Option<String> {
        let next = self.selected_mentee.map_or(0, |i| (i + 1) % MENTEES.len());
        self.selected_mentee = Some(next);
        self.selection()
    }

    fn selection(&self) -> Option<String> {
        self.selected_mentee().map(|m| m.name.to_string())
    }
}
