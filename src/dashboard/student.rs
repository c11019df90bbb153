//! Student dashboard.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::content::{rupees, Row, Section, Stat, Tone};
use super::form::{Acknowledgment, FormField, ModalForm};
use super::shell::QuickAction;
use super::RoleDashboard;
use crate::core::{Error, Notification, NotificationKind, Result, Role};

const TABS: &[&str] = &["Overview", "Exams", "Fee Status", "Results"];

const LEAVE_KINDS: &[&str] = &["On Duty (OD)", "Sick Leave", "Emergency Leave"];

/// Kind of absence requested through the OD/leave form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveKind {
    Od,
    Sick,
    Emergency,
}

impl LeaveKind {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "On Duty (OD)" => Some(Self::Od),
            "Sick Leave" => Some(Self::Sick),
            "Emergency Leave" => Some(Self::Emergency),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Od => "OD",
            Self::Sick => "Sick leave",
            Self::Emergency => "Emergency leave",
        }
    }
}

/// Profile shown on the student dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentData {
    pub name: String,
    pub roll_no: String,
    pub class: String,
    pub semester: String,
    pub cgpa: f32,
    /// Percent
    pub attendance: u8,
    pub fee_balance: u64,
}

impl Default for StudentData {
    fn default() -> Self {
        Self {
            name: "Alex Johnson".to_string(),
            roll_no: "CS2025001".to_string(),
            class: "B.Tech Computer Science".to_string(),
            semester: "6th Semester".to_string(),
            cgpa: 8.7,
            attendance: 87,
            fee_balance: 45000,
        }
    }
}

struct Exam {
    subject: &'static str,
    date: &'static str,
    time: &'static str,
    kind: &'static str,
}

const EXAMS: &[Exam] = &[
    Exam { subject: "Data Structures", date: "2025-09-28", time: "09:00 AM", kind: "Midterm" },
    Exam { subject: "Database Management", date: "2025-10-02", time: "02:00 PM", kind: "Lab Exam" },
    Exam {
        subject: "Software Engineering",
        date: "2025-10-05",
        time: "11:00 AM",
        kind: "Project Viva",
    },
];

struct Fee {
    item: &'static str,
    amount: u64,
    paid: bool,
}

const FEES: &[Fee] = &[
    Fee { item: "Tuition Fee", amount: 75000, paid: true },
    Fee { item: "Lab Fee", amount: 15000, paid: true },
    Fee { item: "Library Fee", amount: 5000, paid: false },
    Fee { item: "Exam Fee", amount: 8000, paid: false },
];

#[derive(Debug, Clone, Default)]
pub struct StudentDashboard {
    pub data: StudentData,
    active_tab: usize,
    modal: Option<ModalForm>,
    applications: Vec<Acknowledgment>,
}

impl StudentDashboard {
    pub fn new(data: StudentData) -> Self {
        Self { data, ..Self::default() }
    }

    /// Leave applications submitted during this session.
    pub fn applications(&self) -> &[Acknowledgment] {
        &self.applications
    }

    fn leave_form() -> ModalForm {
        ModalForm::new(
            "Apply for OD/Leave",
            vec![
                FormField::choice("kind", "Application Type", LEAVE_KINDS),
                FormField::text("from", "From Date (YYYY-MM-DD)"),
                FormField::text("to", "To Date (YYYY-MM-DD)"),
                FormField::text("reason", "Reason"),
            ],
        )
    }

    fn validate_leave(form: &ModalForm) -> Result<(LeaveKind, NaiveDate, NaiveDate, u32)> {
        let kind = LeaveKind::from_label(form.value("kind"))
            .ok_or_else(|| Error::validation("kind", "choose an application type"))?;
        let from = form.date("from")?;
        let to = form.date("to")?;
        if to < from {
            return Err(Error::validation("to", "must not be before the from date"));
        }
        form.required("reason")?;
        let days = u32::try_from((to - from).num_days() + 1).unwrap_or(u32::MAX);
        Ok((kind, from, to, days))
    }

    fn overview(&self) -> Vec<Section> {
        let attended = 156;
        let missed = 23;
        vec![
            Section::stats(
                "Attendance Overview",
                vec![
                    Stat::new("Overall Attendance", format!("{}%", self.data.attendance))
                        .tone(attendance_tone(self.data.attendance)),
                    Stat::new("Classes Attended", attended.to_string()).tone(Tone::Good),
                    Stat::new("Classes Missed", missed.to_string()).tone(Tone::Critical),
                ],
            ),
            Section::rows(
                "Recent Notifications",
                notifications()
                    .into_iter()
                    .map(|n| Row::new(n.title, n.message, n.time).tone(n.kind.into()))
                    .collect(),
            ),
        ]
    }

    fn exams(today: NaiveDate) -> Section {
        Section::rows(
            "Upcoming Examinations",
            EXAMS
                .iter()
                .map(|exam| {
                    let countdown = NaiveDate::parse_from_str(exam.date, "%Y-%m-%d")
                        .map(|date| countdown_label(today, date))
                        .unwrap_or_default();
                    Row::new(exam.subject, format!("{} · {} at {}", exam.kind, exam.date, exam.time), countdown)
                })
                .collect(),
        )
    }

    fn fees() -> Vec<Section> {
        let pending: u64 = FEES.iter().filter(|f| !f.paid).map(|f| f.amount).sum();
        vec![
            Section::rows(
                "Fee Payment Status",
                FEES.iter()
                    .map(|fee| {
                        let (status, tone) =
                            if fee.paid { ("Paid", Tone::Good) } else { ("Pending", Tone::Critical) };
                        Row::new(fee.item, rupees(fee.amount), status).tone(tone)
                    })
                    .collect(),
            ),
            Section::stats(
                "Summary",
                vec![Stat::new("Total Pending", rupees(pending)).tone(Tone::Critical)],
            ),
        ]
    }

    fn results(&self) -> Section {
        Section::stats(
            "Academic Performance",
            vec![
                Stat::new("Current CGPA", format!("{:.1}", self.data.cgpa)),
                Stat::new("Best Semester", "9.1"),
                Stat::new("Latest Grade", "A+").tone(Tone::Good),
                Stat::new("Class Rank", "5th"),
                Stat::new("CGPA Progress", format!("{:.1}/10", self.data.cgpa)),
            ],
        )
    }

    /// Content for a given day; `sections` uses today.
    pub fn sections_on(&self, today: NaiveDate) -> Vec<Section> {
        match self.active_tab {
            1 => vec![Self::exams(today)],
            2 => Self::fees(),
            3 => vec![self.results()],
            _ => self.overview(),
        }
    }
}

fn attendance_tone(percent: u8) -> Tone {
    match percent {
        90.. => Tone::Good,
        75..=89 => Tone::Normal,
        _ => Tone::Warning,
    }
}

fn countdown_label(today: NaiveDate, date: NaiveDate) -> String {
    match (date - today).num_days() {
        d if d < 0 => "done".to_string(),
        0 => "today".to_string(),
        1 => "1 day".to_string(),
        d => format!("{d} days"),
    }
}

fn notifications() -> Vec<Notification> {
    vec![
        Notification::new(
            "1",
            NotificationKind::Info,
            "Assignment Due Tomorrow",
            "Database project submission due tomorrow at 11:59 PM",
            "2 hours ago",
        ),
        Notification::new(
            "2",
            NotificationKind::Success,
            "Grade Updated",
            "Your Data Structures midterm result is now available",
            "1 day ago",
        ),
        Notification::new(
            "3",
            NotificationKind::Warning,
            "Attendance Alert",
            "Your attendance in Software Engineering is below 75%",
            "3 days ago",
        ),
    ]
}

impl RoleDashboard for StudentDashboard {
    fn role(&self) -> Role {
        Role::Student
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
            "Welcome back, {}! · {} · {} · {}",
            self.data.name, self.data.class, self.data.roll_no, self.data.semester
        )
    }

    fn headline(&self) -> Vec<Stat> {
        let mut stats = vec![
            Stat::new("CGPA", format!("{:.1}", self.data.cgpa)).hint("/10"),
            Stat::new("Attendance", format!("{}%", self.data.attendance))
                .tone(attendance_tone(self.data.attendance)),
            Stat::new("Active Courses", "8"),
            Stat::new("Achievements", "12"),
            Stat::new("Pending Tasks", "3"),
        ];
        if self.data.fee_balance > 0 {
            stats.push(
                Stat::new("Fee Balance", rupees(self.data.fee_balance))
                    .hint("Pay Now")
                    .tone(Tone::Warning),
            );
        }
        stats
    }

    fn sections(&self) -> Vec<Section> {
        self.sections_on(Local::now().date_naive())
    }

    fn quick_actions(&self) -> Option<Vec<QuickAction>> {
        Some(vec![
            QuickAction::primary("pay-fees", "Pay Fees Online"),
            QuickAction::new("apply-leave", "Apply for OD/Leave"),
            QuickAction::new("download-results", "Download Results"),
            QuickAction::new("timetable", "View Timetable"),
            QuickAction::new("contact-faculty", "Contact Faculty"),
        ])
    }

    fn notifications(&self) -> Option<Vec<Notification>> {
        Some(notifications())
    }

    fn modal_action(&self) -> Option<&'static str> {
        Some("apply-leave")
    }

    fn modal(&self) -> Option<&ModalForm> {
        self.modal.as_ref()
    }

    fn modal_mut(&mut self) -> Option<&mut ModalForm> {
        self.modal.as_mut()
    }

    fn open_modal(&mut self) -> bool {
        self.modal = Some(Self::leave_form());
        true
    }

    fn close_modal(&mut self) {
        self.modal = None;
    }

    fn submit_modal(&mut self) -> Result<Acknowledgment> {
        let form = self.modal.as_mut().ok_or_else(|| Error::validation("form", "no form is open"))?;
        let (kind, from, to, days) = form.check(Self::validate_leave)?;
        self.modal = None;

        let ack = Acknowledgment::new(format!(
            "{} application for {days} day(s) from {from} to {to} submitted",
            kind.label()
        ));
        tracing::info!(reference = %ack.reference(), ?kind, %from, %to, "Leave application submitted");
        self.applications.push(ack.clone());
        Ok(ack)
    }
}
