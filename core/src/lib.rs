//! Schema entities for hierarchical command-line argument resolution.
//!
//! This crate defines the static, declarative side of an application:
//!
//! - [`Positional`]: a value matched by position, with a type and arity.
//! - [`Argument`]: a named value-taking argument (`--out dist`, `-o dist`).
//! - [`OptionFlag`]: a named boolean option (`--release`, `-r`).
//! - [`Switch`]: a global option recognized anywhere, e.g. `--help`.
//! - [`Command`]: a runnable node owning the above and a slot counter.
//! - [`CommandGroup`]: a routing node holding commands and sub-groups.
//! - [`App`]: the arena that owns every command, group and switch.
//!
//! Validation ([`validate_app`]) catches malformed names, duplicate entries
//! and broken slot numbering. [`AppManifest`] loads an application from YAML
//! or JSON.
//!
//! # Example
//!
//! ```
//! use argtree_core::*;
//!
//! let mut app = App::new("tool", "1.0.0").with_builtin_switches();
//! let build = app.add_command(
//!     Scope::Root,
//!     Command::new("build")
//!         .with_positional(Positional::required("target", ValueType::String))
//!         .with_argument(Argument::optional("out", Some('o'), ValueType::String)),
//! );
//!
//! assert_eq!(app.command(build).fields(), 2);
//! assert_eq!(app.resolve_path(&["build"]), Some(Node::Command(build)));
//! assert!(validate_app(&app).is_empty());
//! ```

mod app;
mod error;
mod manifest;
mod types;
mod validate;

pub use app::{App, CommandGroup, CommandId, GroupId, Node, Scope, SwitchId};
pub use error::{Result, SchemaError};
pub use manifest::{AppManifest, GroupManifest};
pub use types::*;
pub use validate::{ValidationError, validate_app, validate_command};
