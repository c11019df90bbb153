//! Application state and lifecycle management.
//!
//! The `App` struct owns everything the TUI draws: the login form, the
//! session and dashboard produced by it, the shell's local UI state and the
//! shared workflow panel. Async work (sign-in, workflow runs) is spawned on
//! the runtime handle and reported back through channels polled in
//! [`App::tick`].

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};

use crate::core::{authenticate, Config, LoginForm, Role, Session, ThemeDescriptor};
use crate::dashboard::{ActiveDashboard, RoleDashboard, SearchTarget, ShellState};
use crate::tui::Theme;
use crate::workflow::{
    export_report, CancelHandle, RunSummary, SharedPanel, SimulatedBackend, WorkflowEvent,
    WorkflowPanel, WorkflowRunner,
};

/// Top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Login,
    Dashboard,
    Workflow,
    Help,
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    pub mode: AppMode,
    /// View to return to when help is dismissed
    help_return: AppMode,

    pub config: Config,

    pub login: LoginForm,
    /// Last login validation failure
    pub login_error: Option<String>,
    pending_login: Option<oneshot::Receiver<Arc<Session>>>,

    /// Session and dashboard, once signed in
    pub active: Option<ActiveDashboard>,
    pub shell: ShellState,
    pub theme: Theme,

    pub workflow: SharedPanel,
    pub sources_open: bool,
    pub last_run: Option<RunSummary>,
    workflow_events: Option<mpsc::UnboundedReceiver<WorkflowEvent>>,
    cancel: Option<CancelHandle>,

    runtime: Handle,

    /// Status message shown in the footer
    pub status_message: Option<String>,
    pub should_quit: bool,
    /// Frames since start, drives the spinners
    pub tick_count: usize,
}

impl App {
    /// Create the app on the given runtime.
    ///
    /// When the config names a default role the login form is skipped.
    pub fn new(config: Config, runtime: Handle) -> Self {
        let mut panel = WorkflowPanel::attendance_report();
        if !config.workflow.query.trim().is_empty() {
            panel.set_query(config.workflow.query.clone());
        }

        let theme = Theme::resolve(&ThemeDescriptor::default_blue(), config.ui.theme.as_deref());
        let default_role = config.general.default_role;
        let mut app = Self {
            mode: AppMode::Login,
            help_return: AppMode::Login,
            shell: ShellState::new(config.ui.sidebar_collapsed),
            config,
            login: LoginForm::with_role(Role::login_roles()[0]),
            login_error: None,
            pending_login: None,
            active: None,
            theme,
            workflow: panel.shared(),
            sources_open: false,
            last_run: None,
            workflow_events: None,
            cancel: None,
            runtime,
            status_message: None,
            should_quit: false,
            tick_count: 0,
        };
        if let Some(role) = default_role {
            app.sign_in_as(role);
        }
        app
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Request the application to quit.
    pub fn quit(&mut self) {
        self.shutdown();
        self.should_quit = true;
    }

    /// Cancel anything still running in the background.
    pub fn shutdown(&mut self) {
        self.pending_login = None;
        self.cancel_workflow();
    }

    /// Poll background work. Called once per frame.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        self.poll_login();
        self.poll_workflow();
    }

    // ---- Login -------------------------------------------------------------

    pub fn is_signing_in(&self) -> bool {
        self.pending_login.is_some()
    }

    /// Move the login role selection up or down.
    pub fn cycle_login_role(&mut self, forward: bool) {
        let roles = Role::login_roles();
        let current = self.login.role.and_then(|r| roles.iter().position(|x| *x == r)).unwrap_or(0);
        let next = if forward { (current + 1) % roles.len() } else { (current + roles.len() - 1) % roles.len() };
        self.login.role = Some(roles[next]);
        self.login_error = None;
    }

    /// Fill in the sample credentials for the n-th login role and submit.
    pub fn quick_login(&mut self, index: usize) {
        if let Some(role) = Role::login_roles().get(index) {
            self.login.quick_fill(*role);
            self.submit_login();
        }
    }

    /// Validate the form and start the simulated sign-in.
    pub fn submit_login(&mut self) {
        if self.is_signing_in() {
            return;
        }
        let request = match self.login.validate() {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "Login rejected");
                self.login_error = Some(e.to_string());
                return;
            }
        };
        self.login_error = None;

        let (tx, rx) = oneshot::channel();
        let delay = self.config.general.login_delay();
        self.runtime.spawn(async move {
            let session = authenticate(request, delay).await;
            let _ = tx.send(session);
        });
        self.pending_login = Some(rx);
    }

    fn poll_login(&mut self) {
        let Some(rx) = self.pending_login.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(session) => {
                self.pending_login = None;
                self.enter_dashboard(session);
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending_login = None;
                self.login_error = Some("sign-in was interrupted".to_string());
            }
        }
    }

    /// Skip the form and open a role's dashboard with a demo session.
    pub fn sign_in_as(&mut self, role: Role) {
        self.enter_dashboard(Session::demo(role));
    }

    fn enter_dashboard(&mut self, session: Arc<Session>) {
        let mut active = ActiveDashboard::new(session);
        if !self.config.ui.show_quick_actions {
            active.props.quick_actions = None;
        }
        self.theme = Theme::resolve(&active.props.theme, self.config.ui.theme.as_deref());
        self.shell = ShellState::new(self.config.ui.sidebar_collapsed);
        self.set_status(format!("Welcome, {}", active.session.user.display_name));
        self.active = Some(active);
        self.mode = AppMode::Dashboard;
    }

    /// Sign out and return to the login form with the same role selected.
    pub fn logout(&mut self) {
        self.cancel_workflow();
        let role = self.active.take().map(|a| a.session.role);
        tracing::info!(role = ?role, "Signed out");
        self.login = LoginForm::with_role(role.filter(|r| Role::login_roles().contains(r)).unwrap_or(Role::Student));
        self.theme = Theme::resolve(&ThemeDescriptor::default_blue(), self.config.ui.theme.as_deref());
        self.mode = AppMode::Login;
        self.set_status("Signed out");
    }

    /// Cycle to the next role with a fresh demo session.
    pub fn switch_role(&mut self) {
        let Some(active) = &self.active else {
            return;
        };
        let next = active.session.role.next();
        tracing::info!(from = %active.session.role, to = %next, "Switching role");
        self.sign_in_as(next);
        self.set_status(format!("Switched to {}", next.label()));
    }

    // ---- Dashboard ---------------------------------------------------------

    pub fn dashboard(&self) -> Option<&dyn RoleDashboard> {
        self.active.as_ref().map(|a| a.dashboard.view())
    }

    pub fn dashboard_mut(&mut self) -> Option<&mut dyn RoleDashboard> {
        self.active.as_mut().map(|a| a.dashboard.view_mut())
    }

    pub fn next_tab(&mut self) {
        if let Some(view) = self.dashboard_mut() {
            view.next_tab();
        }
    }

    pub fn prev_tab(&mut self) {
        if let Some(view) = self.dashboard_mut() {
            view.prev_tab();
        }
    }

    pub fn has_modal(&self) -> bool {
        self.dashboard().is_some_and(|d| d.modal().is_some())
    }

    pub fn open_modal(&mut self) {
        let opened = self.dashboard_mut().is_some_and(|d| d.open_modal());
        if !opened {
            self.set_status("This dashboard has no form");
        }
    }

    pub fn close_modal(&mut self) {
        if let Some(view) = self.dashboard_mut() {
            view.close_modal();
        }
    }

    /// Submit the open form. Validation errors stay on the form.
    pub fn submit_modal(&mut self) {
        let Some(view) = self.dashboard_mut() else {
            return;
        };
        match view.submit_modal() {
            Ok(ack) => {
                let message = format!("{} (ref {})", ack.message, ack.reference());
                self.set_status(message);
            }
            Err(e) => tracing::debug!(error = %e, "Form rejected"),
        }
    }

    /// Select the next child / class / mentee / time range.
    pub fn select_next(&mut self) {
        let selected = self.dashboard_mut().and_then(|d| d.select_next());
        match selected {
            Some(label) => self.set_status(format!("Selected {label}")),
            None => self.set_status("Nothing to select here"),
        }
    }

    pub fn open_search(&mut self) {
        self.shell.open_search();
    }

    pub fn search_input(&mut self, c: char) {
        self.shell.search.query.push(c);
        self.refresh_search();
    }

    pub fn search_backspace(&mut self) {
        self.shell.search.query.pop();
        self.refresh_search();
    }

    fn refresh_search(&mut self) {
        if let Some(active) = &self.active {
            self.shell.search.refresh(&active.props);
        }
    }

    /// Jump to the selected search result.
    pub fn activate_search_hit(&mut self) {
        let hit = self.shell.search.selected_hit().cloned();
        self.shell.close_search();
        let Some(hit) = hit else {
            return;
        };
        match hit.target {
            SearchTarget::Navigation { path } => self.navigate(path),
            SearchTarget::QuickAction { id } => self.trigger_quick_action(id),
        }
    }

    /// Mark a sidebar entry active.
    pub fn navigate(&mut self, path: &str) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let mut label = None;
        for item in &mut active.props.sidebar_items {
            item.active = item.path == path;
            if item.active {
                label = Some(item.label);
            }
        }
        if let Some(label) = label {
            tracing::debug!(path, "Navigated");
            self.set_status(format!("{label} opens in a later release"));
        }
    }

    /// Run a quick action. The action tied to the dashboard form opens it.
    pub fn trigger_quick_action(&mut self, id: &str) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.dashboard.view().modal_action() == Some(id) {
            active.dashboard.view_mut().open_modal();
            return;
        }
        let label = active
            .props
            .quick_actions
            .iter()
            .flatten()
            .find(|a| a.id == id)
            .map(|a| a.label);
        if let Some(label) = label {
            tracing::info!(action = id, "Quick action");
            self.set_status(format!("{label} requested"));
        }
    }

    pub fn send_chat(&mut self) {
        self.shell.chat.send();
    }

    // ---- Workflow ----------------------------------------------------------

    pub fn open_workflow(&mut self) {
        self.mode = AppMode::Workflow;
    }

    pub fn close_workflow(&mut self) {
        self.sources_open = false;
        self.mode = if self.active.is_some() { AppMode::Dashboard } else { AppMode::Login };
    }

    pub fn is_workflow_running(&self) -> bool {
        self.cancel.is_some() || self.workflow.lock().is_running()
    }

    /// Spawn a run of every step. Returns false if one is already in flight.
    pub fn execute_workflow(&mut self) -> bool {
        if self.is_workflow_running() {
            self.set_status("Workflow is already running");
            return false;
        }

        let (handle, token) = CancelHandle::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = SimulatedBackend::new(self.config.workflow.step_delay());
        let runner = WorkflowRunner::new(Arc::clone(&self.workflow), Arc::new(backend))
            .with_policy(self.config.workflow.failure_policy)
            .with_events(tx);

        self.runtime.spawn(async move {
            if let Err(e) = runner.execute_all(token).await {
                tracing::error!(error = %e, "Workflow run failed");
            }
        });
        self.cancel = Some(handle);
        self.workflow_events = Some(rx);
        self.last_run = None;
        self.set_status("Executing workflow...");
        true
    }

    pub fn cancel_workflow(&mut self) {
        if let Some(handle) = self.cancel.take() {
            handle.cancel();
            self.set_status("Workflow cancelled");
        }
    }

    fn poll_workflow(&mut self) {
        let mut events = Vec::new();
        let mut disconnected = false;
        if let Some(rx) = self.workflow_events.as_mut() {
            loop {
                match rx.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }
        for event in events {
            self.on_workflow_event(event);
        }

        // The run task ended without reporting a summary
        if disconnected && self.workflow_events.is_some() {
            tracing::warn!("Workflow run ended without a summary");
            self.cancel = None;
            self.workflow_events = None;
            self.set_status("Workflow run aborted");
        }
    }

    fn on_workflow_event(&mut self, event: WorkflowEvent) {
        match event {
            WorkflowEvent::RunStarted { run, .. } => self.set_status(format!("Run #{run} started")),
            WorkflowEvent::StepStarted { index, id } => {
                self.set_status(format!("Step {} running ({id})", index + 1));
            }
            WorkflowEvent::StepCompleted { .. } => {}
            WorkflowEvent::StepFailed { index, message, .. } => {
                self.set_status(format!("Step {} failed: {message}", index + 1));
            }
            WorkflowEvent::RunFinished(summary) => {
                self.set_status(format!("Workflow finished: {summary}"));
                self.last_run = Some(summary);
                self.cancel = None;
                self.workflow_events = None;
            }
        }
    }

    /// Reset the n-th step (1-based) to pending.
    pub fn retry_step(&mut self, number: usize) {
        let result = {
            let mut panel = self.workflow.lock();
            let id = number.checked_sub(1).and_then(|i| panel.step(i)).map(|s| s.id.clone());
            match id {
                Some(id) => panel.retry_step(&id).map(|()| id),
                None => Err(crate::core::Error::UnknownStep(format!("#{number}"))),
            }
        };
        match result {
            Ok(id) => self.set_status(format!("Step {id} reset, press x to run again")),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn retry_all(&mut self) {
        self.workflow.lock().retry_all();
        self.set_status("All steps reset");
    }

    pub fn toggle_sources(&mut self) {
        self.sources_open = !self.sources_open;
    }

    /// Save the panel as a JSON report.
    pub fn export_workflow(&mut self) {
        let dir = self.config.export_dir();
        let result = export_report(&self.workflow.lock(), &dir);
        match result {
            Ok(path) => self.set_status(format!("Session saved to {}", path.display())),
            Err(e) => {
                tracing::warn!(error = %e, "Export failed");
                self.set_status(format!("Export failed: {e}"));
            }
        }
    }

    // ---- Help --------------------------------------------------------------

    pub fn show_help(&mut self) {
        if self.mode != AppMode::Help {
            self.help_return = self.mode;
            self.mode = AppMode::Help;
        }
    }

    pub fn dismiss_help(&mut self) {
        self.mode = self.help_return;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::runtime::Runtime;

    use super::*;
    use crate::workflow::StepStatus;

    fn test_app() -> (Runtime, App) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let mut config = Config::default();
        config.general.login_delay_ms = 0;
        config.workflow.step_delay_ms = 0;
        let app = App::new(config, rt.handle().clone());
        (rt, app)
    }

    /// Drive the runtime until `done` holds or we give up.
    fn pump(rt: &Runtime, app: &mut App, done: impl Fn(&App) -> bool) {
        for _ in 0..100 {
            rt.block_on(async { tokio::time::sleep(Duration::from_millis(2)).await });
            app.tick();
            if done(app) {
                return;
            }
        }
        panic!("condition not reached");
    }

    #[test]
    fn test_starts_on_login() {
        let (_rt, app) = test_app();
        assert_eq!(app.mode, AppMode::Login);
        assert!(app.active.is_none());
        assert_eq!(app.login.role, Some(Role::Student));
    }

    #[test]
    fn test_default_role_skips_login() {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let mut config = Config::default();
        config.general.default_role = Some(Role::Teacher);
        let app = App::new(config, rt.handle().clone());
        assert_eq!(app.mode, AppMode::Dashboard);
        assert_eq!(app.theme.name, "teacher");
    }

    #[test]
    fn test_quick_login_reaches_dashboard() {
        let (rt, mut app) = test_app();
        app.quick_login(1);
        assert!(app.is_signing_in());
        pump(&rt, &mut app, |a| a.mode == AppMode::Dashboard);
        let active = app.active.as_ref().unwrap();
        assert_eq!(active.session.role, Role::Parent);
        assert_eq!(active.session.user.username, "parent.johnson");
        assert_eq!(app.theme.name, "parent");
    }

    #[test]
    fn test_login_validation_error() {
        let (_rt, mut app) = test_app();
        app.submit_login();
        assert!(!app.is_signing_in());
        assert!(app.login_error.as_deref().unwrap().contains("password"));
    }

    #[test]
    fn test_cycle_login_role() {
        let (_rt, mut app) = test_app();
        app.cycle_login_role(false);
        assert_eq!(app.login.role, Some(Role::Admin));
        app.cycle_login_role(true);
        assert_eq!(app.login.role, Some(Role::Student));
    }

    #[test]
    fn test_switch_role_and_logout() {
        let (_rt, mut app) = test_app();
        app.sign_in_as(Role::Student);
        app.switch_role();
        assert_eq!(app.active.as_ref().unwrap().session.role, Role::Student.next());

        app.sign_in_as(Role::Admin);
        app.logout();
        assert_eq!(app.mode, AppMode::Login);
        assert!(app.active.is_none());
        assert_eq!(app.login.role, Some(Role::Admin));
    }

    #[test]
    fn test_quick_action_opens_form() {
        let (_rt, mut app) = test_app();
        app.sign_in_as(Role::Student);
        app.trigger_quick_action("apply-leave");
        assert!(app.has_modal());
        app.close_modal();

        app.trigger_quick_action("timetable");
        assert!(!app.has_modal());
        assert_eq!(app.status_message.as_deref(), Some("View Timetable requested"));
    }

    #[test]
    fn test_search_navigates() {
        let (_rt, mut app) = test_app();
        app.sign_in_as(Role::Student);
        app.open_search();
        for c in "library".chars() {
            app.search_input(c);
        }
        assert_eq!(app.shell.search.selected_hit().unwrap().label, "Library");
        app.activate_search_hit();
        assert!(!app.shell.search.active);
        let props = &app.active.as_ref().unwrap().props;
        assert_eq!(props.active_item().unwrap().path, "/library");
    }

    #[test]
    fn test_hidden_quick_actions() {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let mut config = Config::default();
        config.ui.show_quick_actions = false;
        let mut app = App::new(config, rt.handle().clone());
        app.sign_in_as(Role::Admin);
        assert!(!app.active.as_ref().unwrap().props.has_quick_panel());
    }

    #[test]
    fn test_execute_workflow_runs_to_completion() {
        let (rt, mut app) = test_app();
        app.sign_in_as(Role::Teacher);
        app.open_workflow();
        assert!(app.execute_workflow());
        assert!(!app.execute_workflow());

        pump(&rt, &mut app, |a| a.last_run.is_some());
        let summary = app.last_run.clone().unwrap();
        assert!(summary.is_success());
        assert_eq!(summary.completed, 3);
        assert_eq!(app.workflow.lock().history().len(), 1);
        assert!(!app.is_workflow_running());
    }

    #[test]
    fn test_retry_while_running_keeps_run_alive() {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let mut config = Config::default();
        config.workflow.step_delay_ms = 20;
        let mut app = App::new(config, rt.handle().clone());
        app.sign_in_as(Role::Admin);
        app.open_workflow();
        assert!(app.execute_workflow());

        pump(&rt, &mut app, |a| a.workflow.lock().step(0).is_some_and(|s| s.status == StepStatus::Running));
        app.retry_step(1);
        assert_eq!(app.status_message.as_deref(), Some("workflow is already running"));
        app.retry_all();

        pump(&rt, &mut app, |a| a.last_run.is_some());
        assert!(app.last_run.as_ref().unwrap().is_success());
        assert!(!app.is_workflow_running());
        assert!(app.execute_workflow());
    }

    #[test]
    fn test_closed_event_channel_releases_run() {
        let (_rt, mut app) = test_app();
        let (handle, _token) = CancelHandle::new();
        let (tx, rx) = mpsc::unbounded_channel::<WorkflowEvent>();
        drop(tx);
        app.cancel = Some(handle);
        app.workflow_events = Some(rx);
        assert!(app.is_workflow_running());

        app.tick();
        assert!(!app.is_workflow_running());
        assert_eq!(app.status_message.as_deref(), Some("Workflow run aborted"));
    }

    #[test]
    fn test_logout_cancels_run() {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let mut config = Config::default();
        config.workflow.step_delay_ms = 10_000;
        let mut app = App::new(config, rt.handle().clone());
        app.sign_in_as(Role::Admin);
        app.execute_workflow();
        rt.block_on(async { tokio::time::sleep(Duration::from_millis(5)).await });
        assert!(app.workflow.lock().is_running());

        app.logout();
        for _ in 0..50 {
            rt.block_on(async { tokio::time::sleep(Duration::from_millis(2)).await });
            if !app.workflow.lock().is_running() {
                break;
            }
        }
        let panel = app.workflow.lock();
        assert!(!panel.is_running());
        assert_eq!(panel.steps()[0].status, StepStatus::Failed);
        assert_eq!(panel.steps()[0].error.as_deref(), Some("cancelled"));
    }

    #[test]
    fn test_retry_step_by_number() {
        let (_rt, mut app) = test_app();
        app.retry_step(2);
        assert_eq!(app.workflow.lock().steps()[1].status, StepStatus::Pending);
        app.retry_step(9);
        assert!(app.status_message.as_deref().unwrap().contains("#9"));
    }

    #[test]
    fn test_help_returns_to_previous_view() {
        let (_rt, mut app) = test_app();
        app.sign_in_as(Role::Parent);
        app.open_workflow();
        app.show_help();
        assert_eq!(app.mode, AppMode::Help);
        app.dismiss_help();
        assert_eq!(app.mode, AppMode::Workflow);
        app.close_workflow();
        assert_eq!(app.mode, AppMode::Dashboard);
    }
}
