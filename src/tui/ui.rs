//! UI rendering for the TUI.
//!
//! Handles layout and widget rendering using ratatui. Every colour comes from
//! the active [`Theme`], which follows the signed-in role's palette.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::AppMode;
use crate::core::{LoginField, NavIcon, Notification, NotificationKind, Role};
use crate::dashboard::{ActiveDashboard, ChatSender, ModalForm, Section, SectionBody, Tone};
use crate::tui::Theme;
use crate::workflow::{mock_sources, StepStatus};
use crate::App;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Draw the main UI.
pub fn draw(frame: &mut Frame, app: &App) {
    match app.mode {
        AppMode::Login => draw_login(frame, app),
        AppMode::Dashboard => draw_dashboard(frame, app),
        AppMode::Workflow => draw_workflow_screen(frame, app),
        AppMode::Help => draw_help_screen(frame, app),
    }
}

fn spinner(app: &App) -> &'static str {
    SPINNER[app.tick_count % SPINNER.len()]
}

fn tone_color(tone: Tone, theme: &Theme) -> Color {
    match tone {
        Tone::Normal => theme.text,
        Tone::Good => theme.success,
        Tone::Warning => theme.warning,
        Tone::Critical => theme.error,
        Tone::Muted => theme.text_muted,
    }
}

fn kind_color(kind: NotificationKind, theme: &Theme) -> Color {
    tone_color(Tone::from(kind), theme)
}

fn nav_glyph(icon: NavIcon) -> &'static str {
    match icon {
        NavIcon::Home => "⌂",
        NavIcon::Courses | NavIcon::Library => "▤",
        NavIcon::Timetable | NavIcon::Schedule => "◷",
        NavIcon::Fees | NavIcon::Finance => "₹",
        NavIcon::Results | NavIcon::Performance | NavIcon::Analytics => "▲",
        NavIcon::Achievements => "★",
        NavIcon::Students | NavIcon::Children | NavIcon::Users => "☺",
        NavIcon::Attendance => "✓",
        NavIcon::Gradebook | NavIcon::Reports => "≡",
        NavIcon::Messages => "✉",
        NavIcon::SystemHealth => "♥",
        NavIcon::Settings => "⚙",
    }
}

/// A rectangle of the given size centred in `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

fn key_hint<'a>(key: &'a str, theme: &Theme) -> Span<'a> {
    Span::styled(key, Style::default().fg(theme.text).bg(theme.selected_bg).add_modifier(Modifier::BOLD))
}

// ---- Login -----------------------------------------------------------------

fn draw_login(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = centered_rect(64, 22, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary))
        .title(" EduManage · College ERP ")
        .title_alignment(Alignment::Center)
        .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
        .padding(Padding::horizontal(2));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled("Sign in to your account", Style::default().fg(theme.text_dim))),
        Line::from(""),
        Line::from(Span::styled("Role", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    ];
    for role in Role::login_roles() {
        let selected = app.login.role == Some(*role);
        let marker = if selected { "▶ " } else { "  " };
        let style = if selected {
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<10}", role.label()), style),
            Span::styled(role.description(), Style::default().fg(theme.text_muted)),
        ]));
    }
    lines.push(Line::from(""));

    let focused = |field: LoginField| app.login.focus == field;
    let field_line = |label: &'static str, value: String, active: bool| {
        let label_style = if active {
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_dim)
        };
        let cursor = if active { "▏" } else { "" };
        Line::from(vec![
            Span::styled(format!("{label:<10}"), label_style),
            Span::styled(format!("{value}{cursor}"), Style::default().fg(theme.text)),
        ])
    };
    lines.push(field_line(
        "Username",
        app.login.username.clone(),
        focused(LoginField::Username),
    ));
    lines.push(field_line(
        "Password",
        "•".repeat(app.login.password.chars().count()),
        focused(LoginField::Password),
    ));
    lines.push(Line::from(""));

    if app.is_signing_in() {
        lines.push(Line::from(Span::styled(
            format!("{} Signing in...", spinner(app)),
            Style::default().fg(theme.accent),
        )));
    } else if let Some(error) = &app.login_error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(theme.error))));
    } else {
        lines.push(Line::from(vec![
            key_hint("Enter", theme),
            Span::styled(" sign in  ", Style::default().fg(theme.text_dim)),
            key_hint("Tab", theme),
            Span::styled(" switch field  ", Style::default().fg(theme.text_dim)),
            key_hint("↑↓", theme),
            Span::styled(" role", Style::default().fg(theme.text_dim)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Quick login", Style::default().fg(theme.text_muted))));
    let quick: Vec<Span> = Role::login_roles()
        .iter()
        .enumerate()
        .flat_map(|(i, role)| {
            [
                Span::styled(format!("F{}", i + 1), Style::default().fg(theme.secondary).add_modifier(Modifier::BOLD)),
                Span::styled(format!(" {}  ", role.label()), Style::default().fg(theme.text_dim)),
            ]
        })
        .collect();
    lines.push(Line::from(quick));

    frame.render_widget(Paragraph::new(lines), inner);
}

// ---- Dashboard -------------------------------------------------------------

fn draw_dashboard(frame: &mut Frame, app: &App) {
    let Some(active) = &app.active else {
        return;
    };
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Top bar
            Constraint::Min(8),    // Sidebar + content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let sidebar_width = if app.shell.sidebar_collapsed { 5 } else { 24 };
    let mut columns = vec![Constraint::Length(sidebar_width), Constraint::Min(30)];
    if active.props.has_quick_panel() {
        columns.push(Constraint::Length(32));
    }
    let body = Layout::default().direction(Direction::Horizontal).constraints(columns).split(chunks[1]);

    draw_top_bar(frame, app, active, chunks[0]);
    draw_sidebar(frame, app, active, body[0]);
    draw_content(frame, app, active, body[1]);
    if active.props.has_quick_panel() {
        draw_quick_panel(frame, app, active, body[2]);
    }
    draw_status_bar(frame, app, chunks[2]);

    if app.shell.notifications_open {
        draw_notifications_dropdown(frame, app, &active.props.notifications, chunks[1]);
    }
    if app.shell.profile_open {
        draw_profile_menu(frame, app, active, chunks[1]);
    }
    if app.shell.chat_open {
        draw_chat(frame, app, chunks[1]);
    }
    if app.shell.search.active {
        draw_search(frame, app, chunks[1]);
    }
    if let Some(form) = active.dashboard.view().modal() {
        draw_modal(frame, app, form);
    }
}

fn draw_top_bar(frame: &mut Frame, app: &App, active: &ActiveDashboard, area: Rect) {
    let theme = &app.theme;
    let props = &active.props;

    let search = if app.shell.search.active {
        Span::styled(format!(" / {}▏", app.shell.search.query), Style::default().fg(theme.text))
    } else {
        Span::styled(" / Search...", Style::default().fg(theme.text_muted))
    };
    let badge = props.badge_count();
    let badge_style = if badge > 0 {
        Style::default().fg(theme.background).bg(theme.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let line = Line::from(vec![
        Span::styled(" EduManage ", Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
        Span::styled(format!("│ {} ", props.role_label), Style::default().fg(theme.accent)),
        Span::styled("│", Style::default().fg(theme.border)),
        search,
        Span::raw("   "),
        Span::styled(format!(" {badge} "), badge_style),
        Span::styled("  ", Style::default()),
        Span::styled(
            format!(" {} ", active.session.initials()),
            Style::default().fg(theme.text).bg(theme.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", props.user_name), Style::default().fg(theme.text)),
    ]);

    let bar = Paragraph::new(line).block(
        Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(bar, area);
}

fn draw_sidebar(frame: &mut Frame, app: &App, active: &ActiveDashboard, area: Rect) {
    let theme = &app.theme;
    let collapsed = app.shell.sidebar_collapsed;

    let items: Vec<ListItem> = if active.props.sidebar_items.is_empty() && !collapsed {
        vec![ListItem::new(Span::styled("No navigation", Style::default().fg(theme.text_muted)))]
    } else {
        active
            .props
            .sidebar_items
            .iter()
            .map(|item| {
                let text = if collapsed {
                    format!(" {}", nav_glyph(item.icon))
                } else {
                    format!(" {} {}", nav_glyph(item.icon), item.label)
                };
                let style = if item.active {
                    Style::default().fg(theme.text).bg(theme.primary).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text_dim)
                };
                ListItem::new(Span::styled(text, style))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(list, area);
}

fn draw_content(frame: &mut Frame, app: &App, active: &ActiveDashboard, area: Rect) {
    let theme = &app.theme;
    let view = active.dashboard.view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Greeting
            Constraint::Length(3), // Headline stats
            Constraint::Length(1), // Tabs
            Constraint::Min(3),    // Sections
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {}", view.greeting()),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );

    let headline: Vec<Span> = view
        .headline()
        .into_iter()
        .flat_map(|stat| {
            let color = tone_color(stat.tone, theme);
            [
                Span::styled(format!(" {} ", stat.value), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(format!("{}  ", stat.label), Style::default().fg(theme.text_dim)),
            ]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(headline))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(theme.border))),
        chunks[1],
    );

    let tabs = Tabs::new(view.tabs().iter().map(|t| Line::from(*t)).collect::<Vec<_>>())
        .select(view.active_tab())
        .style(Style::default().fg(theme.text_dim))
        .highlight_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
        .divider("│");
    frame.render_widget(tabs, chunks[2]);

    let mut lines = Vec::new();
    if let Some(selection) = view.selection() {
        lines.push(Line::from(vec![
            Span::styled(" Selected: ", Style::default().fg(theme.text_muted)),
            Span::styled(selection, Style::default().fg(theme.accent)),
        ]));
    }
    let sections = view.sections();
    for section in &sections {
        lines.extend(section_lines(section, theme));
        lines.push(Line::from(""));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border))),
        chunks[3],
    );
}

fn section_lines<'a>(section: &'a Section, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(
        section.title.as_str(),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    ))];
    match &section.body {
        SectionBody::Stats(stats) => {
            for stat in stats {
                let mut spans = vec![
                    Span::styled(format!("  {:<26}", stat.label), Style::default().fg(theme.text_dim)),
                    Span::styled(
                        stat.value.as_str(),
                        Style::default().fg(tone_color(stat.tone, theme)).add_modifier(Modifier::BOLD),
                    ),
                ];
                if let Some(hint) = &stat.hint {
                    spans.push(Span::styled(format!("  {hint}"), Style::default().fg(theme.text_muted)));
                }
                lines.push(Line::from(spans));
            }
        }
        SectionBody::Rows(rows) => {
            for row in rows {
                let mut spans = vec![Span::styled(
                    format!("  {}", row.label),
                    Style::default().fg(tone_color(row.tone, theme)).add_modifier(Modifier::BOLD),
                )];
                if !row.detail.is_empty() {
                    spans.push(Span::styled(format!("  {}", row.detail), Style::default().fg(theme.text_dim)));
                }
                spans.push(Span::styled(format!("  {}", row.value), Style::default().fg(theme.text)));
                lines.push(Line::from(spans));
            }
        }
        SectionBody::Text(text) => {
            lines.extend(
                text.iter().map(|t| Line::from(Span::styled(format!("  {t}"), Style::default().fg(theme.text)))),
            );
        }
    }
    lines
}

fn draw_quick_panel(frame: &mut Frame, app: &App, active: &ActiveDashboard, area: Rect) {
    let theme = &app.theme;
    let mut lines = vec![Line::from(Span::styled(
        "Quick Actions",
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    ))];
    for action in active.props.quick_actions.iter().flatten() {
        let style = if action.emphasis {
            Style::default().fg(theme.text).bg(theme.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(Span::styled(format!(" {} ", action.label), style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Recent Alerts",
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    )));
    for alert in active.props.recent_alerts() {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", alert.kind.glyph()), Style::default().fg(kind_color(alert.kind, theme))),
            Span::styled(alert.title.as_str(), Style::default().fg(theme.text)),
        ]));
        lines.push(Line::from(Span::styled(format!("  {}", alert.time), Style::default().fg(theme.text_muted))));
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .padding(Padding::horizontal(1)),
        ),
        area,
    );
}

fn draw_notifications_dropdown(frame: &mut Frame, app: &App, notifications: &[Notification], body: Rect) {
    let theme = &app.theme;
    let height = (notifications.len() as u16 * 3 + 2).max(4);
    let width = 48.min(body.width);
    let area = Rect::new(body.right().saturating_sub(width), body.y, width, height.min(body.height));
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    if notifications.is_empty() {
        lines.push(Line::from(Span::styled("No notifications", Style::default().fg(theme.text_muted))));
    }
    for n in notifications {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", n.kind.glyph()), Style::default().fg(kind_color(n.kind, theme))),
            Span::styled(n.title.as_str(), Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", n.time), Style::default().fg(theme.text_muted)),
        ]));
        lines.push(Line::from(Span::styled(format!("  {}", n.message), Style::default().fg(theme.text_dim))));
        lines.push(Line::from(""));
    }

    let popup = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(" Notifications ")
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(popup, area);
}

fn draw_profile_menu(frame: &mut Frame, app: &App, active: &ActiveDashboard, body: Rect) {
    let theme = &app.theme;
    let width = 34.min(body.width);
    let area = Rect::new(body.right().saturating_sub(width), body.y, width, 7.min(body.height));
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            active.session.user.display_name.as_str(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(active.props.role_label.as_str(), Style::default().fg(theme.text_dim))),
        Line::from(""),
        Line::from(vec![key_hint("r", theme), Span::raw(" Switch role")]),
        Line::from(vec![key_hint("q", theme), Span::raw(" Sign out")]),
    ];
    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(" Profile ")
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(popup, area);
}

fn draw_chat(frame: &mut Frame, app: &App, body: Rect) {
    let theme = &app.theme;
    let width = 44.min(body.width);
    let height = 16.min(body.height);
    let area = Rect::new(body.right().saturating_sub(width), body.bottom().saturating_sub(height), width, height);
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = app
        .shell
        .chat
        .messages
        .iter()
        .map(|m| match m.from {
            ChatSender::Assistant => Line::from(Span::styled(m.text.as_str(), Style::default().fg(theme.text))),
            ChatSender::User => Line::from(Span::styled(m.text.as_str(), Style::default().fg(theme.gradient.0)))
                .alignment(Alignment::Right),
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("> ", Style::default().fg(theme.primary)),
        Span::styled(format!("{}▏", app.shell.chat.draft), Style::default().fg(theme.text)),
    ]));

    let popup = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.gradient.1))
            .title(" AI Assistant ")
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(popup, area);
}

fn draw_search(frame: &mut Frame, app: &App, body: Rect) {
    let theme = &app.theme;
    let search = &app.shell.search;
    let height = (search.results.len() as u16 + 2).clamp(3, 12);
    let area = Rect::new(body.x + 26, body.y, 40.min(body.width.saturating_sub(26)), height.min(body.height));
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = if search.results.is_empty() {
        let hint = if search.query.is_empty() { "Type to search" } else { "No matches" };
        vec![ListItem::new(Span::styled(hint, Style::default().fg(theme.text_muted)))]
    } else {
        search
            .results
            .iter()
            .enumerate()
            .map(|(i, hit)| {
                let style = if i == search.selected {
                    Style::default().fg(theme.text).bg(theme.selected_bg).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text_dim)
                };
                ListItem::new(Span::styled(format!(" {}", hit.label), style))
            })
            .collect()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(list, area);
}

fn draw_modal(frame: &mut Frame, app: &App, form: &ModalForm) {
    let theme = &app.theme;
    let height = form.fields.len() as u16 * 2 + 6;
    let area = centered_rect(60, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_dim)
        };
        lines.push(Line::from(Span::styled(field.label, label_style)));
        let value = if field.is_choice() {
            format!("◀ {} ▶", field.value)
        } else if focused {
            format!("{}▏", field.value)
        } else {
            field.value.clone()
        };
        lines.push(Line::from(Span::styled(format!("  {value}"), Style::default().fg(theme.text))));
    }
    lines.push(Line::from(""));
    match &form.error {
        Some(error) => lines.push(Line::from(Span::styled(error.as_str(), Style::default().fg(theme.error)))),
        None => lines.push(Line::from(vec![
            key_hint("Enter", theme),
            Span::styled(" submit  ", Style::default().fg(theme.text_dim)),
            key_hint("Tab", theme),
            Span::styled(" next field  ", Style::default().fg(theme.text_dim)),
            key_hint("←→", theme),
            Span::styled(" choose  ", Style::default().fg(theme.text_dim)),
            key_hint("Esc", theme),
            Span::styled(" cancel", Style::default().fg(theme.text_dim)),
        ])),
    }

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(format!(" {} ", form.title))
            .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
            .padding(Padding::horizontal(1))
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(popup, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        match app.mode {
            AppMode::Login => " LOGIN ",
            AppMode::Dashboard => " DASH ",
            AppMode::Workflow => " FLOW ",
            AppMode::Help => " HELP ",
        },
        Style::default().bg(theme.accent).fg(theme.background).add_modifier(Modifier::BOLD),
    )];
    if app.is_workflow_running() {
        spans.push(Span::styled(format!(" {} workflow", spinner(app)), Style::default().fg(theme.warning)));
    }
    if let Some(message) = &app.status_message {
        spans.push(Span::styled(format!(" {message}"), Style::default().fg(theme.text_dim)));
    }
    spans.push(Span::styled("  │ ? help", Style::default().fg(theme.text_muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---- Workflow --------------------------------------------------------------

fn draw_workflow_screen(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title + query
            Constraint::Length(3), // Progress
            Constraint::Min(8),    // Steps
            Constraint::Length(1), // Footer
            Constraint::Length(1), // Status
        ])
        .split(area);

    let panel = app.workflow.lock();

    let title = Paragraph::new(Line::from(vec![
        Span::styled("Query: ", Style::default().fg(theme.text_dim)),
        Span::styled(panel.query().to_string(), Style::default().fg(theme.text)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(" AI Research Workflow ")
            .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(title, chunks[0]);

    let progress = panel.progress();
    let label = format!(
        "{}/{} completed · {} failed · run {}",
        progress.completed,
        progress.total,
        progress.failed,
        panel.history().len()
    );
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border)))
        .gauge_style(Style::default().fg(theme.primary).bg(theme.selected_bg))
        .ratio(progress.ratio().clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, chunks[1]);

    let mut lines = Vec::new();
    for (i, step) in panel.steps().iter().enumerate() {
        let color = match step.status {
            StepStatus::Pending => theme.text_muted,
            StepStatus::Running => theme.warning,
            StepStatus::Completed => theme.success,
            StepStatus::Failed => theme.error,
        };
        let glyph = if step.status == StepStatus::Running { spinner(app) } else { step.status.glyph() };
        let mut header = vec![
            Span::styled(format!("{glyph} "), Style::default().fg(color)),
            Span::styled(format!("{}. {}", i + 1, step.name), Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  [{}]", step.model), Style::default().fg(theme.accent)),
            Span::styled(format!("  {}", step.status), Style::default().fg(color)),
        ];
        if let Some(confidence) = step.confidence {
            header.push(Span::styled(format!("  {confidence}% confidence"), Style::default().fg(theme.text_dim)));
        }
        if let Some(secs) = step.execution_time_secs {
            header.push(Span::styled(format!("  {secs:.1}s"), Style::default().fg(theme.text_muted)));
        }
        lines.push(Line::from(header));
        if let Some(output) = &step.output {
            lines.push(Line::from(Span::styled(format!("   {output}"), Style::default().fg(theme.text_dim))));
        }
        if let Some(error) = &step.error {
            lines.push(Line::from(Span::styled(format!("   {error}"), Style::default().fg(theme.error))));
        }
        if let Some(sources) = &step.sources {
            lines.push(Line::from(Span::styled(
                format!("   sources: {}", sources.join(", ")),
                Style::default().fg(theme.text_muted),
            )));
        }
        lines.push(Line::from(""));
    }
    drop(panel);

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border))),
        chunks[2],
    );

    let footer = Paragraph::new(Line::from(vec![
        key_hint("x", theme),
        Span::styled(" execute all  ", Style::default().fg(theme.text_dim)),
        key_hint("1-9", theme),
        Span::styled(" retry step  ", Style::default().fg(theme.text_dim)),
        key_hint("a", theme),
        Span::styled(" retry all  ", Style::default().fg(theme.text_dim)),
        key_hint("e", theme),
        Span::styled(" save session  ", Style::default().fg(theme.text_dim)),
        key_hint("s", theme),
        Span::styled(" sources  ", Style::default().fg(theme.text_dim)),
        key_hint("Esc", theme),
        Span::styled(" back", Style::default().fg(theme.text_dim)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[3]);
    draw_status_bar(frame, app, chunks[4]);

    if app.sources_open {
        draw_sources_drawer(frame, app, chunks[2]);
    }
}

fn draw_sources_drawer(frame: &mut Frame, app: &App, body: Rect) {
    let theme = &app.theme;
    let width = 56.min(body.width);
    let area = Rect::new(body.right().saturating_sub(width), body.y, width, body.height);
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    for source in mock_sources() {
        lines.push(Line::from(vec![
            Span::styled(source.title, Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}%", source.relevance), Style::default().fg(theme.success)),
        ]));
        lines.push(Line::from(Span::styled(format!("  {} · {}", source.kind, source.url), Style::default().fg(theme.text_muted))));
        lines.push(Line::from(""));
    }

    let drawer = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(" Sources & Citations ")
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(drawer, area);
}

// ---- Help ------------------------------------------------------------------

fn draw_help_screen(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(10),   // Content
            Constraint::Length(2), // Footer
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![Span::styled(
        " Keyboard Shortcuts ",
        Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
    )]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.primary)));
    frame.render_widget(title, chunks[0]);

    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)))
    };

    let lines = vec![
        heading("Login"),
        help_line("↑ / ↓", "Choose role", theme),
        help_line("Tab", "Switch username / password", theme),
        help_line("Enter", "Sign in", theme),
        help_line("F1-F4", "Quick login with sample credentials", theme),
        Line::from(""),
        heading("Dashboard"),
        help_line("Tab / Shift+Tab", "Next / previous tab", theme),
        help_line("1-9", "Jump to tab", theme),
        help_line("Ctrl+B", "Collapse sidebar", theme),
        help_line("/", "Search navigation and actions", theme),
        help_line("n", "Notifications", theme),
        help_line("p", "Profile menu", theme),
        help_line("c", "AI assistant chat", theme),
        help_line("m", "Open the dashboard form", theme),
        help_line("s", "Select next child / class / mentee / range", theme),
        help_line("r", "Switch role", theme),
        help_line("w", "AI research workflow", theme),
        help_line("q", "Sign out", theme),
        Line::from(""),
        heading("Workflow"),
        help_line("x", "Execute all steps", theme),
        help_line("1-9", "Reset a step for retry", theme),
        help_line("a", "Reset all steps", theme),
        help_line("c", "Cancel the running workflow", theme),
        help_line("e", "Save session as JSON", theme),
        help_line("s", "Sources drawer", theme),
        Line::from(""),
        heading("General"),
        help_line("?", "Show this help", theme),
        help_line("Esc", "Close / back", theme),
        help_line("Ctrl+C", "Quit", theme),
    ];

    let content = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(content, chunks[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" Press ", Style::default().fg(theme.text_dim)),
        key_hint("Esc", theme),
        Span::styled(" or ", Style::default().fg(theme.text_dim)),
        key_hint("?", theme),
        Span::styled(" to close ", Style::default().fg(theme.text_dim)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[2]);
}

fn help_line<'a>(key: &'a str, description: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {key:18}"), Style::default().fg(theme.secondary).add_modifier(Modifier::BOLD)),
        Span::styled(description, Style::default().fg(theme.text)),
    ])
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    use super::*;
    use crate::core::Config;

    fn app() -> (tokio::runtime::Runtime, App) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let app = App::new(Config::default(), rt.handle().clone());
        (rt, app)
    }

    fn render(app: &App) -> String {
        let backend = TestBackend::new(140, 45);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_login_screen() {
        let (_rt, app) = app();
        let screen = render(&app);
        assert!(screen.contains("EduManage"));
        assert!(screen.contains("Student"));
        assert!(screen.contains("Quick login"));
    }

    #[test]
    fn test_every_role_dashboard_renders() {
        let (_rt, mut app) = app();
        for role in Role::all() {
            app.sign_in_as(*role);
            let screen = render(&app);
            assert!(screen.contains(role.label()), "{role}");
        }
    }

    #[test]
    fn test_student_dashboard_content() {
        let (_rt, mut app) = app();
        app.sign_in_as(Role::Student);
        let screen = render(&app);
        assert!(screen.contains("Alex Johnson"));
        assert!(screen.contains("Quick Actions"));
        assert!(screen.contains("Fee Status"));
    }

    #[test]
    fn test_overlays_render() {
        let (_rt, mut app) = app();
        app.sign_in_as(Role::Admin);
        app.shell.toggle_notifications();
        assert!(render(&app).contains("Notifications"));

        app.shell.toggle_chat();
        assert!(render(&app).contains("AI Assistant"));

        app.shell.toggle_chat();
        app.open_modal();
        assert!(render(&app).contains("Full Name"));
    }

    #[test]
    fn test_workflow_screen() {
        let (_rt, mut app) = app();
        app.sign_in_as(Role::Teacher);
        app.open_workflow();
        let screen = render(&app);
        assert!(screen.contains("AI Research Workflow"));
        assert!(screen.contains("3/3 completed"));

        app.toggle_sources();
        assert!(render(&app).contains("Sources & Citations"));
    }

    #[test]
    fn test_help_screen() {
        let (_rt, mut app) = app();
        app.show_help();
        let screen = render(&app);
        assert!(screen.contains("Keyboard Shortcuts"));
        assert!(screen.contains("Execute all steps"));
    }

    #[test]
    fn test_collapsed_sidebar_hides_labels() {
        let (_rt, mut app) = app();
        app.sign_in_as(Role::Parent);
        assert!(render(&app).contains("My Children"));
        app.shell.toggle_sidebar();
        assert!(!render(&app).contains("My Children"));
    }
}
