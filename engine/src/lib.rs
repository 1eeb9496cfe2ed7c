//! Resolution and value-extraction engine for `argtree` applications.
//!
//! Given an [`App`](argtree_core::App) and an argument vector, the engine:
//!
//! 1. walks groups from the top of the tree until it reaches a command,
//!    running global switches it meets on the way;
//! 2. classifies every remaining token as a named argument, option, switch
//!    or positional value;
//! 3. extracts values according to each entity's arity, honoring the `--`
//!    escape, and converts them into typed [`Value`]s;
//! 4. checks required entities and calls the bound command handler with
//!    the filled [`Slots`].
//!
//! Failures are reported as a [`Failure`] holding a [`ParseError`] and the
//! breadcrumb of the path taken, rendered as
//! `Error: <message>.` followed by `Try: <breadcrumb> --help`.
//!
//! # Example
//!
//! ```
//! use argtree_core::{App, Argument, Command, Positional, Scope, ValueType};
//! use argtree_engine::{Engine, Slots};
//!
//! let mut app = App::new("tool", "1.0.0").with_builtin_switches();
//! let build = app.add_command(
//!     Scope::Root,
//!     Command::new("build")
//!         .with_positional(Positional::required("target", ValueType::String))
//!         .with_argument(Argument::optional("out", Some('o'), ValueType::String)),
//! );
//!
//! let mut engine = Engine::new(&app);
//! engine.on_command(build, |slots: &Slots, out: &mut Option<String>| {
//!     *out = slots.string(1).map(str::to_string);
//!     0
//! });
//!
//! let mut out = None;
//! let argv = ["tool", "build", "app.bin", "-o", "dist"].map(String::from);
//! assert_eq!(engine.run(&argv, &mut out), 0);
//! assert_eq!(out.as_deref(), Some("dist"));
//! ```

mod canonical;
mod convert;
mod dispatch;
mod engine;
mod error;
mod extract;
mod handler;
mod help;
pub mod matcher;
mod runner;
mod session;
mod slots;

pub use canonical::canonical_args;
pub use convert::{FsProbe, PathKind, PathProbe, convert};
pub use engine::Engine;
pub use error::{EntityRef, Failure, ParseError, PathProblem};
pub use handler::{CommandHandler, SwitchHandler};
pub use help::{HELP_WIDTH, help_node, render_help, render_version};
pub use session::ParseContext;
pub use slots::{Slots, Value};
