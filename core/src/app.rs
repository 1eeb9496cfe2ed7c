//! Application tree stored as an arena.
//!
//! Commands and groups live in flat vectors owned by the [`App`] and are
//! addressed by [`CommandId`] / [`GroupId`]. A group only stores the ids of
//! its children, so ownership always runs from the app down and no node
//! points back at its parent.

use serde::{Deserialize, Serialize};

use crate::{Command, Named, Switch};

/// Handle to a command registered in an [`App`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommandId(usize);

/// Handle to a command group registered in an [`App`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(usize);

/// Handle to a global switch registered in an [`App`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SwitchId(usize);

impl SwitchId {
    /// Position of the switch in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a command or group is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Top level of the application.
    #[default]
    Root,
    /// Inside a command group.
    Group(GroupId),
}

/// A named node that only exists to route to the commands below it.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandGroup {
    /// Name matched against the group token.
    pub name: String,
    /// Optional one-character shorthand.
    pub alias: Option<char>,
    /// Description for help output.
    pub description: String,
    commands: Vec<CommandId>,
    groups: Vec<GroupId>,
}

impl CommandGroup {
    /// Creates an empty group.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
            description: String::new(),
            commands: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Sets the one-character shorthand.
    pub fn with_alias(mut self, alias: char) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Child commands in declaration order.
    pub fn commands(&self) -> &[CommandId] {
        &self.commands
    }

    /// Child groups in declaration order.
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }
}

impl Named for CommandGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn alias(&self) -> Option<char> {
        self.alias
    }
}

/// A node reached by walking names from the top of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// A runnable command.
    Command(CommandId),
    /// A command group.
    Group(GroupId),
}

/// The complete, immutable description of a command-line application.
///
/// # Examples
///
/// ```
/// use argtree_core::{App, Command, CommandGroup, Node, Scope};
///
/// let mut app = App::new("tool", "1.0.0").with_builtin_switches();
/// let db = app.add_group(Scope::Root, CommandGroup::new("db"));
/// let migrate = app.add_command(Scope::Group(db), Command::new("migrate"));
///
/// assert_eq!(app.resolve_path(&["db", "migrate"]), Some(Node::Command(migrate)));
/// assert_eq!(app.switches().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Description for help output.
    pub description: String,
    /// Usage lines for help output.
    pub usage: Vec<String>,
    commands: Vec<Command>,
    groups: Vec<CommandGroup>,
    switches: Vec<Switch>,
    root_commands: Vec<CommandId>,
    root_groups: Vec<GroupId>,
    main: Option<CommandId>,
}

impl App {
    /// Creates an application with no commands or switches.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            description: String::new(),
            usage: Vec::new(),
            commands: Vec::new(),
            groups: Vec::new(),
            switches: Vec::new(),
            root_commands: Vec::new(),
            root_groups: Vec::new(),
            main: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Adds a usage line.
    pub fn with_usage(mut self, line: &str) -> Self {
        self.usage.push(line.to_string());
        self
    }

    /// Appends the built-in `--help` and `--version` switches.
    pub fn with_builtin_switches(mut self) -> Self {
        self.switches.push(Switch::help());
        self.switches.push(Switch::version());
        self
    }

    /// Registers a global switch.
    pub fn add_switch(&mut self, switch: Switch) -> SwitchId {
        self.switches.push(switch);
        SwitchId(self.switches.len() - 1)
    }

    /// Registers a command under `scope`.
    ///
    /// # Panics
    ///
    /// Panics if `scope` names a group that was not created by this app.
    pub fn add_command(&mut self, scope: Scope, command: Command) -> CommandId {
        let id = CommandId(self.commands.len());
        self.commands.push(command);
        match scope {
            Scope::Root => self.root_commands.push(id),
            Scope::Group(group) => self.groups[group.0].commands.push(id),
        }
        id
    }

    /// Registers a group under `scope`.
    ///
    /// # Panics
    ///
    /// Panics if `scope` names a group that was not created by this app.
    pub fn add_group(&mut self, scope: Scope, group: CommandGroup) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(group);
        match scope {
            Scope::Root => self.root_groups.push(id),
            Scope::Group(parent) => self.groups[parent.0].groups.push(id),
        }
        id
    }

    /// Sets the main command, run when no sub-command is named.
    pub fn set_main(&mut self, command: Command) -> CommandId {
        let id = CommandId(self.commands.len());
        self.commands.push(command);
        self.main = Some(id);
        id
    }

    /// The main command, if one was set.
    pub fn main(&self) -> Option<CommandId> {
        self.main
    }

    /// Looks up a registered command.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this app.
    pub fn command(&self, id: CommandId) -> &Command {
        &self.commands[id.0]
    }

    /// Looks up a registered group.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this app.
    pub fn group(&self, id: GroupId) -> &CommandGroup {
        &self.groups[id.0]
    }

    /// Looks up a registered switch.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this app.
    pub fn switch(&self, id: SwitchId) -> &Switch {
        &self.switches[id.0]
    }

    /// Global switches in declaration order.
    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    /// Global switches paired with their ids.
    pub fn switch_entries(&self) -> impl Iterator<Item = (SwitchId, &Switch)> {
        self.switches
            .iter()
            .enumerate()
            .map(|(i, s)| (SwitchId(i), s))
    }

    /// Every registered command, including the main command.
    pub fn command_entries(&self) -> impl Iterator<Item = (CommandId, &Command)> {
        self.commands
            .iter()
            .enumerate()
            .map(|(i, c)| (CommandId(i), c))
    }

    /// Every registered group.
    pub fn group_entries(&self) -> impl Iterator<Item = (GroupId, &CommandGroup)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| (GroupId(i), g))
    }

    /// Ids of the commands directly inside `scope`.
    pub fn scope_commands(&self, scope: Scope) -> &[CommandId] {
        match scope {
            Scope::Root => &self.root_commands,
            Scope::Group(group) => &self.groups[group.0].commands,
        }
    }

    /// Ids of the groups directly inside `scope`.
    pub fn scope_groups(&self, scope: Scope) -> &[GroupId] {
        match scope {
            Scope::Root => &self.root_groups,
            Scope::Group(group) => &self.groups[group.0].groups,
        }
    }

    /// Walks `path` by exact name from the top of the tree.
    ///
    /// Returns `None` if a segment does not exist or a command is followed by
    /// more segments.
    pub fn resolve_path(&self, path: &[&str]) -> Option<Node> {
        let mut scope = Scope::Root;
        let mut node = None;
        for segment in path {
            if matches!(node, Some(Node::Command(_))) {
                return None;
            }
            if let Some(id) = self
                .scope_commands(scope)
                .iter()
                .find(|id| self.command(**id).name == *segment)
            {
                node = Some(Node::Command(*id));
                continue;
            }
            let group = self
                .scope_groups(scope)
                .iter()
                .find(|id| self.group(**id).name == *segment)?;
            scope = Scope::Group(*group);
            node = Some(Node::Group(*group));
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_app() -> (App, GroupId, CommandId) {
        let mut app = App::new("tool", "0.3.1");
        app.add_command(Scope::Root, Command::new("build"));
        let db = app.add_group(Scope::Root, CommandGroup::new("db").with_alias('d'));
        let remote = app.add_group(Scope::Group(db), CommandGroup::new("remote"));
        let push = app.add_command(Scope::Group(remote), Command::new("push"));
        (app, db, push)
    }

    #[test]
    fn test_scopes_hold_children_by_id() {
        let (app, db, _) = sample_app();

        assert_eq!(app.scope_commands(Scope::Root).len(), 1);
        assert_eq!(app.scope_groups(Scope::Root), &[db]);
        assert!(app.scope_commands(Scope::Group(db)).is_empty());
        assert_eq!(app.scope_groups(Scope::Group(db)).len(), 1);
        assert_eq!(app.group(db).alias, Some('d'));
    }

    #[test]
    fn test_resolve_path() {
        let (app, db, push) = sample_app();

        assert_eq!(app.resolve_path(&["db"]), Some(Node::Group(db)));
        assert_eq!(
            app.resolve_path(&["db", "remote", "push"]),
            Some(Node::Command(push))
        );
        assert_eq!(app.resolve_path(&["db", "push"]), None);
        assert_eq!(app.resolve_path(&["build", "extra"]), None);
        assert_eq!(app.resolve_path(&[]), None);
    }

    #[test]
    fn test_main_is_not_in_root_scope() {
        let mut app = App::new("tool", "1.0.0");
        let main = app.set_main(Command::new(""));

        assert_eq!(app.main(), Some(main));
        assert!(app.scope_commands(Scope::Root).is_empty());
        assert_eq!(app.command_entries().count(), 1);
    }

    #[test]
    fn test_builtin_switches_are_appended() {
        let mut app = App::new("tool", "1.0.0");
        let quiet = app.add_switch(Switch::new("quiet", Some('q')));
        let app = app.with_builtin_switches();

        assert_eq!(quiet.index(), 0);
        let names: Vec<&str> = app.switches().iter().map(|s| s.flag.as_str()).collect();
        assert_eq!(names, vec!["quiet", "help", "version"]);
    }
}
