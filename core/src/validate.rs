//! Schema validation.
//!
//! Catches structural mistakes in an [`App`] before it is used to parse
//! anything: empty or malformed names, bad aliases, duplicates inside one
//! collection and broken slot numbering.
//!
//! Duplicate aliases are reported but are not fatal. At parse time the first
//! declared entity wins, which is occasionally what an author wants.
//!
//! # Examples
//!
//! ```
//! use argtree_core::*;
//!
//! let mut app = App::new("tool", "1.0.0");
//! app.add_command(Scope::Root, Command::new("build"));
//! assert!(validate_app(&app).is_empty());
//!
//! // Invalid: flag written with its leading dashes
//! let mut bad = App::new("tool", "1.0.0");
//! bad.add_command(
//!     Scope::Root,
//!     Command::new("build").with_option(OptionFlag::new("--release", None)),
//! );
//! assert!(!validate_app(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{App, Command, Named, Scope};

/// Schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// App, command, group or argument name is empty.
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),
    /// Name starts with `-` or contains whitespace.
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    /// Alias is not a printable ASCII character, or is `-`.
    #[error("invalid alias {alias:?} on {owner}")]
    InvalidAlias { owner: String, alias: char },
    /// Two entities in one collection share a name.
    #[error("duplicate name in {scope}: {name}")]
    DuplicateName { scope: String, name: String },
    /// Two entities in one collection share an alias. First declared wins.
    #[error("duplicate alias in {scope}: {alias}")]
    DuplicateAlias { scope: String, alias: char },
    /// Slot numbering does not cover `0..fields` exactly once.
    #[error("command {command} has inconsistent result slots")]
    SlotMismatch { command: String },
}

impl ValidationError {
    /// Returns `true` for problems that still leave the schema usable.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::DuplicateAlias { .. })
    }
}

/// Validates a whole application.
///
/// Checks every switch, every command (including the main command) and every
/// command/group collection in the tree.
///
/// # Examples
///
/// ```
/// use argtree_core::*;
///
/// let mut app = App::new("tool", "1.0.0");
/// app.add_command(Scope::Root, Command::new("build").with_alias('b'));
/// app.add_command(Scope::Root, Command::new("bench").with_alias('b'));
///
/// let errors = validate_app(&app);
/// assert!(errors.iter().all(|e| e.is_warning()));
/// assert!(matches!(errors[0], ValidationError::DuplicateAlias { alias: 'b', .. }));
/// ```
pub fn validate_app(app: &App) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if app.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName("app"));
    }

    let switches: Vec<&dyn Named> = app.switches().iter().map(|s| s as &dyn Named).collect();
    check_flags(&switches, &mut errors);
    check_collection("switches", &switches, &mut errors);

    for (id, command) in app.command_entries() {
        let is_main = app.main() == Some(id);
        errors.extend(validate_command(command, is_main));
    }

    check_scope(app, Scope::Root, &app.name, &mut errors);

    errors
}

/// Validates a single command's arguments, options and slot numbering.
///
/// The main command is allowed an empty name.
pub fn validate_command(command: &Command, is_main: bool) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !is_main {
        check_name("command", &command.name, &mut errors);
        if let Some(alias) = command.alias {
            check_alias(&command.name, alias, &mut errors);
        }
    }

    let mut seen = HashSet::new();
    for positional in command.positionals() {
        check_name("positional", &positional.name, &mut errors);
        if !seen.insert(positional.name.as_str()) {
            errors.push(ValidationError::DuplicateName {
                scope: command.name.clone(),
                name: positional.name.clone(),
            });
        }
    }

    let flags: Vec<&dyn Named> = command
        .arguments()
        .iter()
        .map(|a| a as &dyn Named)
        .chain(command.options().iter().map(|o| o as &dyn Named))
        .collect();
    check_flags(&flags, &mut errors);
    check_collection(&command.name, &flags, &mut errors);

    let mut slots: Vec<usize> = command
        .positionals()
        .iter()
        .map(|p| p.slot)
        .chain(command.arguments().iter().map(|a| a.slot))
        .chain(command.options().iter().map(|o| o.slot))
        .collect();
    slots.sort_unstable();
    if slots.len() != command.fields() || slots.iter().enumerate().any(|(i, s)| i != *s) {
        errors.push(ValidationError::SlotMismatch {
            command: command.name.clone(),
        });
    }

    errors
}

fn check_scope(app: &App, scope: Scope, label: &str, errors: &mut Vec<ValidationError>) {
    let commands = app.scope_commands(scope).iter().map(|id| app.command(*id));
    let groups = app.scope_groups(scope).iter().map(|id| app.group(*id));
    let nodes: Vec<&dyn Named> = commands
        .map(|c| c as &dyn Named)
        .chain(groups.map(|g| g as &dyn Named))
        .collect();
    check_collection(label, &nodes, errors);

    for id in app.scope_groups(scope) {
        let group = app.group(*id);
        check_name("group", &group.name, errors);
        if let Some(alias) = group.alias {
            check_alias(&group.name, alias, errors);
        }
        check_scope(app, Scope::Group(*id), &group.name, errors);
    }
}

fn check_flags(entries: &[&dyn Named], errors: &mut Vec<ValidationError>) {
    for entry in entries {
        check_name("flag", entry.name(), errors);
        if let Some(alias) = entry.alias() {
            check_alias(entry.name(), alias, errors);
        }
    }
}

fn check_collection(scope: &str, entries: &[&dyn Named], errors: &mut Vec<ValidationError>) {
    let mut names = HashSet::new();
    let mut aliases = HashSet::new();

    for entry in entries {
        let name = entry.name();
        if !names.insert(name) {
            errors.push(ValidationError::DuplicateName {
                scope: scope.to_string(),
                name: name.to_string(),
            });
        }
        if let Some(alias) = entry.alias() {
            if !aliases.insert(alias) {
                errors.push(ValidationError::DuplicateAlias {
                    scope: scope.to_string(),
                    alias,
                });
            }
        }
    }
}

fn check_name(kind: &'static str, name: &str, errors: &mut Vec<ValidationError>) {
    if name.is_empty() {
        errors.push(ValidationError::EmptyName(kind));
    } else if name.starts_with('-') || name.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidName(name.to_string()));
    }
}

fn check_alias(owner: &str, alias: char, errors: &mut Vec<ValidationError>) {
    if !alias.is_ascii_graphic() || alias == '-' {
        errors.push(ValidationError::InvalidAlias {
            owner: owner.to_string(),
            alias,
        });
    }
}
