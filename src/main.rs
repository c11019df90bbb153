//! EduManage - role-based college ERP dashboards for your terminal.
//!
//! Without a subcommand the interactive TUI opens on the login screen. The
//! other subcommands print the same data non-interactively.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use edumanage::core::{authenticate, Config, LoginForm, Role, Session};
use edumanage::dashboard::{ActiveDashboard, Dashboard};
use edumanage::workflow::{
    export_report, CancelHandle, FailurePolicy, SimulatedBackend, WorkflowEvent, WorkflowPanel,
    WorkflowRunner,
};
use edumanage::{tui, APP_NAME};

/// Role-based college ERP dashboards for your terminal
#[derive(Parser)]
#[command(name = "edumanage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Use this config file instead of the default lookup
    #[arg(long, global = true, value_name = "PATH", env = "EDUMANAGE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Run {
        /// Skip the login form and open this role's dashboard
        #[arg(short, long)]
        role: Option<Role>,
    },

    /// List every role and whether its dashboard is complete
    Roles {
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show a role's sidebar navigation
    Nav {
        role: Role,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Print one tab of a role's dashboard
    Dashboard {
        role: Role,

        /// Tab number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        tab: usize,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show the notifications a role's top bar would display
    Notifications {
        role: Role,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Sign in through the mock login and print the session
    Login {
        #[arg(short, long)]
        role: Role,

        /// Defaults to the role's sample username
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        password: String,

        /// Simulated latency (defaults to the configured value)
        #[arg(long)]
        delay_ms: Option<u64>,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Run the AI research workflow once
    Workflow {
        /// Research query
        #[arg(short, long)]
        query: Option<String>,

        /// Simulated per-step latency (defaults to the configured value)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Make this step fail
        #[arg(long, value_name = "STEP_ID")]
        fail_step: Option<String>,

        /// What to do after a failed step (halt, continue)
        #[arg(long)]
        policy: Option<FailurePolicy>,

        /// Save the session report as JSON into this directory
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };

    let interactive = matches!(cli.command, None | Some(Commands::Run { .. }));
    init_logging(&cli, &config, interactive)?;

    match cli.command {
        None => cmd_run(config, None),
        Some(Commands::Run { role }) => cmd_run(config, role),
        Some(Commands::Roles { format }) => cmd_roles(format),
        Some(Commands::Nav { role, format }) => cmd_nav(role, format),
        Some(Commands::Dashboard { role, tab, format }) => cmd_dashboard(role, tab, format),
        Some(Commands::Notifications { role, format }) => cmd_notifications(role, format),
        Some(Commands::Login { role, username, password, delay_ms, format }) => {
            let delay = delay_ms.map_or_else(|| config.general.login_delay(), Duration::from_millis);
            cmd_login(role, username, password, delay, format)
        }
        Some(Commands::Workflow { query, delay_ms, fail_step, policy, export }) => {
            let options = WorkflowOptions {
                query: query.unwrap_or_else(|| config.workflow.query.clone()),
                delay: delay_ms.map_or_else(|| config.workflow.step_delay(), Duration::from_millis),
                fail_step,
                policy: policy.unwrap_or(config.workflow.failure_policy),
                export,
            };
            cmd_workflow(options)
        }
        Some(Commands::Config { path }) => cmd_config(&config, cli.config.as_deref(), path),
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

/// Install the tracing subscriber.
///
/// Subcommands log to stderr. The TUI owns the terminal, so it only logs
/// when a log file is configured.
fn init_logging(cli: &Cli, config: &Config, interactive: bool) -> Result<()> {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let stderr_layer =
        (!interactive).then(|| fmt::layer().with_target(false).with_writer(io::stderr));

    let file_layer = match cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_target(false).with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry().with(stderr_layer).with(file_layer).with(filter).init();
    Ok(())
}

/// Run the interactive TUI.
fn cmd_run(config: Config, role: Option<Role>) -> Result<()> {
    tracing::info!(role = ?role, "Starting TUI");
    tui::run_tui(config, role)
}

/// List roles.
fn cmd_roles(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let roles: Vec<_> = Role::all()
                .iter()
                .map(|role| {
                    serde_json::json!({
                        "id": role.id(),
                        "label": role.label(),
                        "description": role.description(),
                        "readiness": role.readiness(),
                        "login": Role::login_roles().contains(role),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&roles)?);
        }
        OutputFormat::Text => {
            for role in Role::all() {
                println!(
                    "{:<20} {:<20} {:<8} {}",
                    role.id(),
                    role.label(),
                    role.readiness(),
                    role.description()
                );
            }
            println!("\nTotal: {} roles", Role::all().len());
        }
    }
    Ok(())
}

/// Show navigation for a role.
fn cmd_nav(role: Role, format: OutputFormat) -> Result<()> {
    let active = ActiveDashboard::new(Session::demo(role));
    let items = &active.props.sidebar_items;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
        OutputFormat::Text => {
            if items.is_empty() {
                println!("No navigation registered for {}", role.label());
            }
            for item in items {
                let marker = if item.active { "*" } else { " " };
                println!("{marker} {:<20} {}", item.label, item.path);
            }
        }
    }
    Ok(())
}

/// Print one dashboard tab.
fn cmd_dashboard(role: Role, tab: usize, format: OutputFormat) -> Result<()> {
    let mut dashboard = Dashboard::for_role(role);
    let view = dashboard.view_mut();
    let tabs = view.tabs().len();
    if tab == 0 || !view.select_tab(tab - 1) {
        bail!("tab {tab} is out of range for {} (1-{tabs})", role.label());
    }
    let view = dashboard.view();

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "role": role.id(),
                "variant": dashboard.kind(),
                "greeting": view.greeting(),
                "tabs": view.tabs(),
                "active_tab": view.active_tab_label(),
                "headline": view.headline(),
                "sections": view.sections(),
                "quick_actions": view.quick_actions(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("{}", view.greeting());
            let tabs: Vec<String> = view
                .tabs()
                .iter()
                .enumerate()
                .map(|(i, t)| if i == view.active_tab() { format!("[{t}]") } else { (*t).to_string() })
                .collect();
            println!("{}\n", tabs.join(" | "));
            for stat in view.headline() {
                println!("  {}: {}", stat.label, stat.value);
            }
            for section in view.sections() {
                println!("\n== {} ==", section.title);
                for line in section.plain_lines() {
                    println!("  {line}");
                }
            }
        }
    }
    Ok(())
}

/// Show notifications for a role.
fn cmd_notifications(role: Role, format: OutputFormat) -> Result<()> {
    let active = ActiveDashboard::new(Session::demo(role));
    let notifications = &active.props.notifications;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(notifications)?),
        OutputFormat::Text => {
            for n in notifications {
                println!("[{}] {} - {} ({})", n.kind, n.title, n.message, n.time);
            }
            println!("\n{} unread", active.props.badge_count());
        }
    }
    Ok(())
}

/// Sign in through the mock login.
fn cmd_login(
    role: Role,
    username: Option<String>,
    password: String,
    delay: Duration,
    format: OutputFormat,
) -> Result<()> {
    let form = LoginForm {
        role: Some(role),
        username: username.unwrap_or_default(),
        password,
        ..LoginForm::default()
    };
    let request = form.validate()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let session = runtime.block_on(authenticate(request, delay));

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&*session)?),
        OutputFormat::Text => {
            println!(
                "Signed in as {} ({}) as {}",
                session.user.display_name,
                session.user.username,
                session.role.label()
            );
        }
    }
    Ok(())
}

struct WorkflowOptions {
    query: String,
    delay: Duration,
    fail_step: Option<String>,
    policy: FailurePolicy,
    export: Option<PathBuf>,
}

/// Run the workflow once, printing progress as it happens.
fn cmd_workflow(options: WorkflowOptions) -> Result<()> {
    let mut panel = WorkflowPanel::attendance_report();
    panel.set_query(options.query);
    let panel = panel.shared();

    let mut backend = SimulatedBackend::new(options.delay);
    if let Some(step) = options.fail_step {
        backend = backend.fail_on(step);
    }
    let (tx, mut rx) = mpsc::unbounded_channel();
    let runner = WorkflowRunner::new(Arc::clone(&panel), Arc::new(backend))
        .with_policy(options.policy)
        .with_events(tx);

    let runtime = tokio::runtime::Runtime::new()?;
    let summary = runtime.block_on(async {
        let (handle, token) = CancelHandle::new();
        let run = runner.execute_all(token);
        tokio::pin!(run);
        let result = loop {
            tokio::select! {
                result = &mut run => break result,
                Some(event) = rx.recv() => print_event(&event),
                _ = tokio::signal::ctrl_c() => {
                    tracing::warn!("Interrupted, cancelling workflow");
                    handle.cancel();
                }
            }
        };
        while let Ok(event) = rx.try_recv() {
            print_event(&event);
        }
        result
    })?;

    println!();
    for step in panel.lock().steps() {
        let confidence = step.confidence.map(|c| format!("{c}%")).unwrap_or_default();
        println!(
            "{} {:<28} {:<10} {:<10} {}",
            step.status.glyph(),
            step.name,
            step.model.to_string(),
            step.status.to_string(),
            confidence
        );
    }
    println!("\n{summary}");

    if let Some(dir) = options.export {
        let path = export_report(&panel.lock(), &dir)?;
        println!("Session saved to {}", path.display());
    }

    if !summary.is_success() {
        bail!("workflow did not complete: {summary}");
    }
    Ok(())
}

fn print_event(event: &WorkflowEvent) {
    match event {
        WorkflowEvent::RunStarted { run, query } => println!("Run #{run}: {query}"),
        WorkflowEvent::StepStarted { index, id } => println!("  [{}] {id} running", index + 1),
        WorkflowEvent::StepCompleted { index, id } => println!("  [{}] {id} completed", index + 1),
        WorkflowEvent::StepFailed { index, id, message } => {
            println!("  [{}] {id} failed: {message}", index + 1);
        }
        WorkflowEvent::RunFinished(_) => {}
    }
}

/// Show configuration.
fn cmd_config(config: &Config, explicit: Option<&Path>, show_path: bool) -> Result<()> {
    if show_path {
        let path = explicit.map(Path::to_path_buf).or_else(Config::global_path);
        if let Some(path) = path {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let toml = toml::to_string_pretty(config)?;
    println!("{toml}");
    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
}
