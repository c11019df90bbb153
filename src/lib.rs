//! # EduManage
//!
//! Role-based college ERP dashboards for your terminal.
//!
//! EduManage signs a user in against a mock login, builds an immutable
//! session for the chosen role and renders that role's dashboard inside a
//! shared shell: sidebar navigation, notifications, search, quick actions
//! and a canned AI chat. An AI research workflow panel runs a fixed sequence
//! of simulated model steps with retry, cancellation and JSON export.
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the login screen
//! edumanage
//!
//! # Jump straight to a dashboard
//! edm run --role admin
//!
//! # Print a dashboard tab without the TUI
//! edm dashboard student --tab 2
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::match_same_arms)]

pub mod app;
pub mod core;
pub mod dashboard;
pub mod tui;
pub mod workflow;

// Re-export commonly used types
pub use app::App;
pub use core::{Config, Error, Result, Role, Session};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "edumanage";

/// Short alias
pub const APP_ALIAS: &str = "edm";
