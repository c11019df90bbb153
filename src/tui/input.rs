//! Input handling for the TUI.
//!
//! Processes keyboard events and updates application state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::AppMode;
use crate::App;

/// Handle keyboard events.
pub fn handle_events(key: KeyEvent, app: &mut App) {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode {
        AppMode::Login => handle_login_mode(key, app),
        AppMode::Dashboard => handle_dashboard_mode(key, app),
        AppMode::Workflow => handle_workflow_mode(key, app),
        AppMode::Help => handle_help_mode(key, app),
    }
}

fn handle_login_mode(key: KeyEvent, app: &mut App) {
    if app.is_signing_in() {
        return;
    }
    match key.code {
        KeyCode::Up => app.cycle_login_role(false),
        KeyCode::Down => app.cycle_login_role(true),
        KeyCode::Tab | KeyCode::BackTab => app.login.toggle_focus(),
        KeyCode::Enter => app.submit_login(),
        KeyCode::Backspace => app.login.delete_char(),
        KeyCode::F(n @ 1..=4) => app.quick_login(usize::from(n) - 1),
        KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => app.login.enter_char(c),
        _ => {}
    }
}

fn handle_help_mode(key: KeyEvent, app: &mut App) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?' | 'q') | KeyCode::Enter) {
        app.dismiss_help();
    }
}

fn handle_dashboard_mode(key: KeyEvent, app: &mut App) {
    if app.has_modal() {
        handle_modal(key, app);
        return;
    }
    if app.shell.search.active {
        handle_search(key, app);
        return;
    }
    if app.shell.chat_open {
        handle_chat(key, app);
        return;
    }

    match key.code {
        KeyCode::Char('b') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.shell.toggle_sidebar();
        }
        KeyCode::Tab | KeyCode::Right => app.next_tab(),
        KeyCode::BackTab | KeyCode::Left => app.prev_tab(),
        KeyCode::Char(c @ '1'..='9') => {
            if let (Some(view), Some(index)) = (app.dashboard_mut(), c.to_digit(10)) {
                view.select_tab(index as usize - 1);
            }
        }
        KeyCode::Char('n') => app.shell.toggle_notifications(),
        KeyCode::Char('p') => app.shell.toggle_profile(),
        KeyCode::Char('c') => app.shell.toggle_chat(),
        KeyCode::Char('/') => app.open_search(),
        KeyCode::Char('m') => app.open_modal(),
        KeyCode::Char('s') => app.select_next(),
        KeyCode::Char('r') => app.switch_role(),
        KeyCode::Char('w') => app.open_workflow(),
        KeyCode::Char('?') => app.show_help(),
        KeyCode::Char('q') => app.logout(),
        KeyCode::Esc => {
            if !app.shell.close_overlay() {
                app.clear_status();
            }
        }
        _ => {}
    }
}

fn handle_modal(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.close_modal(),
        KeyCode::Enter => app.submit_modal(),
        _ => {
            let Some(form) = app.dashboard_mut().and_then(|d| d.modal_mut()) else {
                return;
            };
            match key.code {
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                KeyCode::Left => form.cycle_choice(false),
                KeyCode::Right => form.cycle_choice(true),
                KeyCode::Backspace => form.delete_char(),
                KeyCode::Char(c) => form.enter_char(c),
                _ => {}
            }
        }
    }
}

fn handle_search(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.shell.close_search(),
        KeyCode::Enter => app.activate_search_hit(),
        KeyCode::Down | KeyCode::Tab => app.shell.search.select_next(),
        KeyCode::Up | KeyCode::BackTab => app.shell.search.select_prev(),
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) => app.search_input(c),
        _ => {}
    }
}

fn handle_chat(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.shell.toggle_chat(),
        KeyCode::Enter => app.send_chat(),
        KeyCode::Backspace => {
            app.shell.chat.draft.pop();
        }
        KeyCode::Char(c) => app.shell.chat.draft.push(c),
        _ => {}
    }
}

fn handle_workflow_mode(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('x') => {
            app.execute_workflow();
        }
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(n) = c.to_digit(10) {
                app.retry_step(n as usize);
            }
        }
        KeyCode::Char('a') => app.retry_all(),
        KeyCode::Char('e') => app.export_workflow(),
        KeyCode::Char('s') => app.toggle_sources(),
        KeyCode::Char('c') => app.cancel_workflow(),
        KeyCode::Char('?') => app.show_help(),
        KeyCode::Esc | KeyCode::Char('q') => {
            if app.sources_open {
                app.toggle_sources();
            } else {
                app.close_workflow();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, Role};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app() -> (tokio::runtime::Runtime, App) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let app = App::new(Config::default(), rt.handle().clone());
        (rt, app)
    }

    #[test]
    fn test_login_typing() {
        let (_rt, mut app) = app();
        for c in "ab".chars() {
            handle_events(key(KeyCode::Char(c)), &mut app);
        }
        handle_events(key(KeyCode::Tab), &mut app);
        handle_events(key(KeyCode::Char('x')), &mut app);
        handle_events(key(KeyCode::Down), &mut app);
        assert_eq!(app.login.username, "ab");
        assert_eq!(app.login.password, "x");
        assert_eq!(app.login.role, Some(Role::Parent));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let (_rt, mut app) = app();
        handle_events(ctrl('c'), &mut app);
        assert!(app.should_quit);
    }

    #[test]
    fn test_dashboard_keys() {
        let (_rt, mut app) = app();
        app.sign_in_as(Role::Student);

        handle_events(key(KeyCode::Tab), &mut app);
        assert_eq!(app.dashboard().unwrap().active_tab(), 1);
        handle_events(key(KeyCode::Char('4')), &mut app);
        assert_eq!(app.dashboard().unwrap().active_tab_label(), "Results");

        let collapsed = app.shell.sidebar_collapsed;
        handle_events(ctrl('b'), &mut app);
        assert_ne!(app.shell.sidebar_collapsed, collapsed);

        handle_events(key(KeyCode::Char('n')), &mut app);
        assert!(app.shell.notifications_open);
        handle_events(key(KeyCode::Char('c')), &mut app);
        assert!(app.shell.chat_open);
        assert!(!app.shell.notifications_open);

        // Chat captures typing until closed
        handle_events(key(KeyCode::Char('q')), &mut app);
        assert_eq!(app.shell.chat.draft, "q");
        handle_events(key(KeyCode::Esc), &mut app);
        assert!(!app.shell.chat_open);

        handle_events(key(KeyCode::Char('w')), &mut app);
        assert_eq!(app.mode, AppMode::Workflow);
        handle_events(key(KeyCode::Esc), &mut app);
        assert_eq!(app.mode, AppMode::Dashboard);

        handle_events(key(KeyCode::Char('q')), &mut app);
        assert_eq!(app.mode, AppMode::Login);
    }

    #[test]
    fn test_modal_keys() {
        let (_rt, mut app) = app();
        app.sign_in_as(Role::Teacher);
        handle_events(key(KeyCode::Char('m')), &mut app);
        assert!(app.has_modal());

        // Placeholder class is rejected and the form stays open
        handle_events(key(KeyCode::Enter), &mut app);
        assert!(app.has_modal());
        let form = app.dashboard().unwrap().modal().unwrap();
        assert!(form.error.is_some());

        handle_events(key(KeyCode::Right), &mut app);
        handle_events(key(KeyCode::Enter), &mut app);
        assert!(!app.has_modal());
        assert!(app.status_message.as_deref().unwrap().contains("CS-6A"));
    }

    #[test]
    fn test_search_keys() {
        let (_rt, mut app) = app();
        app.sign_in_as(Role::Admin);
        handle_events(key(KeyCode::Char('/')), &mut app);
        for c in "backup".chars() {
            handle_events(key(KeyCode::Char(c)), &mut app);
        }
        handle_events(key(KeyCode::Enter), &mut app);
        assert_eq!(app.status_message.as_deref(), Some("System Backup requested"));
    }

    #[test]
    fn test_help_round_trip() {
        let (_rt, mut app) = app();
        app.sign_in_as(Role::Parent);
        handle_events(key(KeyCode::Char('?')), &mut app);
        assert_eq!(app.mode, AppMode::Help);
        handle_events(key(KeyCode::Esc), &mut app);
        assert_eq!(app.mode, AppMode::Dashboard);
    }

    #[test]
    fn test_workflow_retry_keys() {
        let (_rt, mut app) = app();
        app.sign_in_as(Role::Admin);
        handle_events(key(KeyCode::Char('w')), &mut app);
        handle_events(key(KeyCode::Char('3')), &mut app);
        assert_eq!(app.workflow.lock().steps()[2].status, crate::workflow::StepStatus::Pending);
        handle_events(key(KeyCode::Char('s')), &mut app);
        assert!(app.sources_open);
        handle_events(key(KeyCode::Esc), &mut app);
        assert!(!app.sources_open);
        assert_eq!(app.mode, AppMode::Workflow);
    }
}
