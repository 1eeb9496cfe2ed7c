//! Declarative application manifests.
//!
//! A manifest is the serializable, nested form of an [`App`]. Commands in a
//! manifest carry no slot numbers; slots are assigned when the manifest is
//! loaded (positionals first, then arguments, then options).
//!
//! # Example YAML
//!
//! ```yaml
//! name: tool
//! version: "1.2.0"
//! description: Build and ship things
//! switches:
//!   - flag: quiet
//!     alias: q
//! commands:
//!   - name: build
//!     alias: b
//!     positionals:
//!       - name: target
//!         required: true
//!     arguments:
//!       - flag: out
//!         alias: o
//! groups:
//!   - name: db
//!     commands:
//!       - name: migrate
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::{App, Command, CommandGroup, Scope, Switch, validate_app};

/// A command group and everything below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupManifest {
    /// Group name.
    pub name: String,
    /// Optional one-character shorthand.
    #[serde(default)]
    pub alias: Option<char>,
    /// Description for help output.
    #[serde(default)]
    pub description: String,
    /// Commands inside the group.
    #[serde(default)]
    pub commands: Vec<Command>,
    /// Nested groups.
    #[serde(default)]
    pub groups: Vec<GroupManifest>,
}

/// Serializable description of a whole application.
///
/// # Examples
///
/// ```
/// use argtree_core::{AppManifest, Node};
///
/// let yaml = r#"
/// name: tool
/// version: "1.0.0"
/// groups:
///   - name: db
///     commands:
///       - name: migrate
/// "#;
/// let app = AppManifest::from_yaml_str(yaml).unwrap().into_app().unwrap();
/// assert!(matches!(app.resolve_path(&["db", "migrate"]), Some(Node::Command(_))));
/// assert_eq!(app.switches().len(), 2); // --help and --version
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppManifest {
    /// Application name.
    pub name: String,
    /// Application version.
    #[serde(default)]
    pub version: String,
    /// Description for help output.
    #[serde(default)]
    pub description: String,
    /// Usage lines for help output.
    #[serde(default)]
    pub usage: Vec<String>,
    /// Append the `--help` / `--version` switches after `switches`.
    #[serde(default = "default_true")]
    pub builtin_switches: bool,
    /// Global switches.
    #[serde(default)]
    pub switches: Vec<Switch>,
    /// Command run when no sub-command is named.
    #[serde(default)]
    pub main: Option<Command>,
    /// Top-level commands.
    #[serde(default)]
    pub commands: Vec<Command>,
    /// Top-level groups.
    #[serde(default)]
    pub groups: Vec<GroupManifest>,
}

fn default_true() -> bool {
    true
}

impl AppManifest {
    /// Loads a manifest from a file.
    ///
    /// Files ending in `.yaml` or `.yml` are read as YAML, anything else as
    /// JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](SchemaError::IoError) if the file cannot be read,
    /// or a [`YamlError`](SchemaError::YamlError) /
    /// [`JsonError`](SchemaError::JsonError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let manifest = if is_yaml(path) {
            serde_yaml::from_reader(reader)?
        } else {
            serde_json::from_reader(reader)?
        };
        Ok(manifest)
    }

    /// Saves the manifest, choosing the format from the extension like
    /// [`load`](Self::load).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(std::fs::File::create(path)?);
        if is_yaml(path) {
            serde_yaml::to_writer(writer, self)?;
        } else {
            serde_json::to_writer_pretty(writer, self)?;
        }
        Ok(())
    }

    /// Parses a YAML manifest.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a JSON manifest.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds and validates the application.
    ///
    /// # Errors
    ///
    /// Returns [`Invalid`](SchemaError::Invalid) with every non-warning
    /// validation error found.
    pub fn into_app(self) -> Result<App> {
        let app = self.build();
        let errors: Vec<_> = validate_app(&app)
            .into_iter()
            .filter(|e| !e.is_warning())
            .collect();
        if !errors.is_empty() {
            return Err(SchemaError::Invalid(errors));
        }
        Ok(app)
    }

    /// Builds the application without validating it.
    pub fn build(self) -> App {
        let mut app = App::new(&self.name, &self.version).with_description(&self.description);
        app.usage = self.usage;
        for switch in self.switches {
            app.add_switch(switch);
        }
        if self.builtin_switches {
            app = app.with_builtin_switches();
        }
        if let Some(main) = self.main {
            app.set_main(main);
        }
        for command in self.commands {
            app.add_command(Scope::Root, command);
        }
        for group in self.groups {
            add_group(&mut app, Scope::Root, group);
        }
        app
    }
}

impl From<&App> for AppManifest {
    fn from(app: &App) -> Self {
        let builtin = app.switches().len() >= 2
            && app.switches()[app.switches().len() - 2..] == [Switch::help(), Switch::version()];
        let switch_count = if builtin {
            app.switches().len() - 2
        } else {
            app.switches().len()
        };
        Self {
            name: app.name.clone(),
            version: app.version.clone(),
            description: app.description.clone(),
            usage: app.usage.clone(),
            builtin_switches: builtin,
            switches: app.switches()[..switch_count].to_vec(),
            main: app.main().map(|id| app.command(id).clone()),
            commands: scope_commands(app, Scope::Root),
            groups: scope_groups(app, Scope::Root),
        }
    }
}

fn add_group(app: &mut App, scope: Scope, manifest: GroupManifest) {
    let mut group = CommandGroup::new(&manifest.name).with_description(&manifest.description);
    group.alias = manifest.alias;
    let id = app.add_group(scope, group);
    for command in manifest.commands {
        app.add_command(Scope::Group(id), command);
    }
    for child in manifest.groups {
        add_group(app, Scope::Group(id), child);
    }
}

fn scope_commands(app: &App, scope: Scope) -> Vec<Command> {
    app.scope_commands(scope)
        .iter()
        .map(|id| app.command(*id).clone())
        .collect()
}

fn scope_groups(app: &App, scope: Scope) -> Vec<GroupManifest> {
    app.scope_groups(scope)
        .iter()
        .map(|id| {
            let group = app.group(*id);
            GroupManifest {
                name: group.name.clone(),
                alias: group.alias,
                description: group.description.clone(),
                commands: scope_commands(app, Scope::Group(*id)),
                groups: scope_groups(app, Scope::Group(*id)),
            }
        })
        .collect()
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}
