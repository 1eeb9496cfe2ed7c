//! Schema entity definitions.
//!
//! This module defines the declarative pieces an application is built from:
//! positional arguments, named value-taking arguments, boolean options,
//! global switches and commands. Entities are plain data; once they are
//! registered in an [`App`](crate::App) they are never mutated again.

use serde::{Deserialize, Serialize};

/// Kind of value an argument accepts.
///
/// Numeric kinds are converted with a strict full-string parse. Path kinds
/// are checked against the filesystem before they are accepted.
///
/// # Examples
///
/// ```
/// use argtree_core::ValueType;
///
/// assert_eq!(ValueType::default(), ValueType::String);
/// assert_eq!(ValueType::Directory.label(), "DIRECTORY");
/// assert!(ValueType::File.is_path());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Free text, stored as given (the default).
    #[default]
    String,
    /// Signed base-10 integer.
    Integer,
    /// Floating point number.
    Float,
    /// Existing regular file.
    File,
    /// Existing directory.
    Directory,
    /// Any existing filesystem entry.
    Path,
}

impl ValueType {
    /// Returns the placeholder shown in help output.
    pub fn label(self) -> &'static str {
        match self {
            Self::String => "TEXT",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::File => "FILE",
            Self::Directory => "DIRECTORY",
            Self::Path => "PATH",
        }
    }

    /// Returns `true` for the kinds validated against the filesystem.
    pub fn is_path(self) -> bool {
        matches!(self, Self::File | Self::Directory | Self::Path)
    }

    /// Returns `true` for the numeric kinds.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

/// How many tokens a value-bearing entity consumes.
///
/// Declared as a plain `nargs` count where `0` means unbounded.
///
/// # Examples
///
/// ```
/// use argtree_core::Arity;
///
/// assert_eq!(Arity::from_nargs(0), Arity::Unbounded);
/// assert_eq!(Arity::from_nargs(1), Arity::Single);
/// assert_eq!(Arity::from_nargs(3), Arity::Fixed(3));
/// assert_eq!(Arity::Fixed(3).nargs(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// One or more tokens, as many as are available.
    Unbounded,
    /// Exactly one token.
    Single,
    /// Exactly `n` tokens, `n > 1`.
    Fixed(usize),
}

impl Arity {
    /// Converts a declared `nargs` count.
    pub fn from_nargs(nargs: usize) -> Self {
        match nargs {
            0 => Self::Unbounded,
            1 => Self::Single,
            n => Self::Fixed(n),
        }
    }

    /// Returns the declared `nargs` count.
    pub fn nargs(self) -> usize {
        match self {
            Self::Unbounded => 0,
            Self::Single => 1,
            Self::Fixed(n) => n,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unbounded => write!(f, "at least one value"),
            Self::Single => write!(f, "1 value"),
            Self::Fixed(n) => write!(f, "{n} values"),
        }
    }
}

/// Anything the matcher can look up by full name or single-character alias.
pub trait Named {
    /// Full name, without any leading hyphens.
    fn name(&self) -> &str;
    /// Optional one-character shorthand.
    fn alias(&self) -> Option<char>;
}

/// A value-bearing entity that owns a result slot.
///
/// Implemented by [`Positional`] and [`Argument`]; the extractor only needs
/// this view of them.
pub trait Field: Named {
    /// Kind of value the entity accepts.
    fn value_type(&self) -> ValueType;
    /// Number of tokens the entity consumes.
    fn arity(&self) -> Arity;
    /// Whether a value must be supplied.
    fn required(&self) -> bool;
    /// Index into the command's result slots.
    fn slot(&self) -> usize;
    /// Whether the entity is matched by position rather than by flag.
    fn is_positional(&self) -> bool;
}

/// A positional argument, matched strictly in declaration order.
///
/// # Examples
///
/// ```
/// use argtree_core::{Arity, Positional, ValueType};
///
/// let files = Positional::required("files", ValueType::File).with_nargs(0);
/// assert!(files.required);
/// assert_eq!(files.arity(), Arity::Unbounded);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Positional {
    /// Name shown in help and error messages.
    pub name: String,
    /// Description for help output.
    #[serde(default)]
    pub description: String,
    /// Kind of value accepted.
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    /// Declared token count; `0` is unbounded.
    #[serde(default = "default_nargs")]
    pub nargs: usize,
    /// Whether the positional must receive a value.
    #[serde(default)]
    pub required: bool,
    #[serde(skip)]
    pub(crate) slot: usize,
}

fn default_nargs() -> usize {
    1
}

impl Positional {
    /// Creates a required single-value positional.
    pub fn required(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            value_type,
            nargs: 1,
            required: true,
            slot: 0,
        }
    }

    /// Creates an optional single-value positional.
    pub fn optional(name: &str, value_type: ValueType) -> Self {
        Self {
            required: false,
            ..Self::required(name, value_type)
        }
    }

    /// Sets the declared token count (`0` for unbounded).
    pub fn with_nargs(mut self, nargs: usize) -> Self {
        self.nargs = nargs;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Returns the arity policy derived from `nargs`.
    pub fn arity(&self) -> Arity {
        Arity::from_nargs(self.nargs)
    }
}

impl Named for Positional {
    fn name(&self) -> &str {
        &self.name
    }

    fn alias(&self) -> Option<char> {
        None
    }
}

impl Field for Positional {
    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn arity(&self) -> Arity {
        Positional::arity(self)
    }

    fn required(&self) -> bool {
        self.required
    }

    fn slot(&self) -> usize {
        self.slot
    }

    fn is_positional(&self) -> bool {
        true
    }
}

/// A named argument that takes one or more values (`--out dist`, `-o dist`).
///
/// # Examples
///
/// ```
/// use argtree_core::{Argument, ValueType};
///
/// let out = Argument::optional("out", Some('o'), ValueType::String)
///     .with_description("Output directory");
/// assert_eq!(out.flag, "out");
/// assert_eq!(out.alias, Some('o'));
/// assert!(!out.required);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// Long flag without the leading `--`.
    pub flag: String,
    /// Optional shorthand, matched as `-x`.
    #[serde(default)]
    pub alias: Option<char>,
    /// Description for help output.
    #[serde(default)]
    pub description: String,
    /// Kind of value accepted.
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    /// Declared token count; `0` is unbounded.
    #[serde(default = "default_nargs")]
    pub nargs: usize,
    /// Whether the argument must be supplied.
    #[serde(default)]
    pub required: bool,
    #[serde(skip)]
    pub(crate) slot: usize,
}

impl Argument {
    /// Creates a required single-value argument.
    pub fn required(flag: &str, alias: Option<char>, value_type: ValueType) -> Self {
        Self {
            flag: flag.to_string(),
            alias,
            description: String::new(),
            value_type,
            nargs: 1,
            required: true,
            slot: 0,
        }
    }

    /// Creates an optional single-value argument.
    pub fn optional(flag: &str, alias: Option<char>, value_type: ValueType) -> Self {
        Self {
            required: false,
            ..Self::required(flag, alias, value_type)
        }
    }

    /// Sets the declared token count (`0` for unbounded).
    pub fn with_nargs(mut self, nargs: usize) -> Self {
        self.nargs = nargs;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Returns the arity policy derived from `nargs`.
    pub fn arity(&self) -> Arity {
        Arity::from_nargs(self.nargs)
    }
}

impl Named for Argument {
    fn name(&self) -> &str {
        &self.flag
    }

    fn alias(&self) -> Option<char> {
        self.alias
    }
}

impl Field for Argument {
    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn arity(&self) -> Arity {
        Argument::arity(self)
    }

    fn required(&self) -> bool {
        self.required
    }

    fn slot(&self) -> usize {
        self.slot
    }

    fn is_positional(&self) -> bool {
        false
    }
}

/// A boolean option. Its presence alone stores `true` in its slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionFlag {
    /// Long flag without the leading `--`.
    pub flag: String,
    /// Optional shorthand, matched as `-x`.
    #[serde(default)]
    pub alias: Option<char>,
    /// Description for help output.
    #[serde(default)]
    pub description: String,
    #[serde(skip)]
    pub(crate) slot: usize,
}

impl OptionFlag {
    /// Creates an option.
    pub fn new(flag: &str, alias: Option<char>) -> Self {
        Self {
            flag: flag.to_string(),
            alias,
            description: String::new(),
            slot: 0,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Index into the command's result slots.
    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl Named for OptionFlag {
    fn name(&self) -> &str {
        &self.flag
    }

    fn alias(&self) -> Option<char> {
        self.alias
    }
}

/// What a switch does when it is matched.
///
/// `Help` and `Version` have default behavior in the engine; `Custom`
/// switches only do something once a handler is bound to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SwitchAction {
    /// Print context-sensitive help.
    Help,
    /// Print the application name and version.
    Version,
    /// Run a user-bound handler (the default).
    #[default]
    Custom,
}

/// A global, value-less option recognized at every level of the tree.
///
/// Switches are checked by the dispatcher before any command is chosen and
/// by the command runner after arguments and options, so `--help` works
/// anywhere on the command line.
///
/// # Examples
///
/// ```
/// use argtree_core::{Switch, SwitchAction};
///
/// let help = Switch::help();
/// assert_eq!(help.flag, "help");
/// assert_eq!(help.alias, Some('h'));
/// assert!(help.exits);
/// assert_eq!(help.action, SwitchAction::Help);
///
/// let quiet = Switch::new("quiet", Some('q'));
/// assert!(!quiet.exits);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    /// Long flag without the leading `--`.
    pub flag: String,
    /// Optional shorthand, matched as `-x`.
    #[serde(default)]
    pub alias: Option<char>,
    /// Description for help output.
    #[serde(default)]
    pub description: String,
    /// Stop parsing once the switch has run.
    #[serde(default)]
    pub exits: bool,
    /// Built-in behavior, if any.
    #[serde(default)]
    pub action: SwitchAction,
}

impl Switch {
    /// Creates a custom switch that does not stop parsing.
    pub fn new(flag: &str, alias: Option<char>) -> Self {
        Self {
            flag: flag.to_string(),
            alias,
            description: String::new(),
            exits: false,
            action: SwitchAction::Custom,
        }
    }

    /// The built-in `--help` / `-h` switch.
    pub fn help() -> Self {
        Self {
            description: "Show context-sensitive help and exit.".to_string(),
            exits: true,
            action: SwitchAction::Help,
            ..Self::new("help", Some('h'))
        }
    }

    /// The built-in `--version` / `-v` switch.
    pub fn version() -> Self {
        Self {
            description: "Show app version and exit.".to_string(),
            exits: true,
            action: SwitchAction::Version,
            ..Self::new("version", Some('v'))
        }
    }

    /// Marks the switch as terminating the parse.
    pub fn exiting(mut self) -> Self {
        self.exits = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }
}

impl Named for Switch {
    fn name(&self) -> &str {
        &self.flag
    }

    fn alias(&self) -> Option<char> {
        self.alias
    }
}

/// A runnable command with its positional arguments, named arguments and
/// options.
///
/// Every value-bearing entity gets the next free result slot when it is
/// added, so slots follow declaration order and `fields()` is always the
/// number of entities declared.
///
/// # Examples
///
/// ```
/// use argtree_core::{Argument, Command, Field, OptionFlag, Positional, ValueType};
///
/// let build = Command::new("build")
///     .with_alias('b')
///     .with_positional(Positional::required("target", ValueType::String))
///     .with_argument(Argument::optional("out", Some('o'), ValueType::String))
///     .with_option(OptionFlag::new("release", Some('r')));
///
/// assert_eq!(build.fields(), 3);
/// assert_eq!(build.positionals()[0].slot(), 0);
/// assert_eq!(build.arguments()[0].slot(), 1);
/// assert_eq!(build.options()[0].slot(), 2);
/// ```
///
/// The collections are read-only, so an entity can never skip slot
/// assignment:
///
/// ```compile_fail
/// use argtree_core::{Command, Positional, ValueType};
///
/// let mut cmd = Command::new("cmd");
/// cmd.positionals.push(Positional::required("target", ValueType::String));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CommandDef")]
pub struct Command {
    /// Name matched against the command token.
    pub name: String,
    /// Optional one-character shorthand.
    pub alias: Option<char>,
    /// Description for help output.
    pub description: String,
    /// Usage lines for help output, each shown after the breadcrumb.
    pub usage: Vec<String>,
    positionals: Vec<Positional>,
    arguments: Vec<Argument>,
    options: Vec<OptionFlag>,
    #[serde(skip)]
    fields: usize,
}

impl Command {
    /// Creates an empty command.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
            description: String::new(),
            usage: Vec::new(),
            positionals: Vec::new(),
            arguments: Vec::new(),
            options: Vec::new(),
            fields: 0,
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

    /// Adds a usage line.
    pub fn with_usage(mut self, line: &str) -> Self {
        self.usage.push(line.to_string());
        self
    }

    /// Adds a positional argument and assigns it the next slot.
    pub fn with_positional(mut self, mut positional: Positional) -> Self {
        positional.slot = self.next_slot();
        self.positionals.push(positional);
        self
    }

    /// Adds a named argument and assigns it the next slot.
    pub fn with_argument(mut self, mut argument: Argument) -> Self {
        argument.slot = self.next_slot();
        self.arguments.push(argument);
        self
    }

    /// Adds an option and assigns it the next slot.
    pub fn with_option(mut self, mut option: OptionFlag) -> Self {
        option.slot = self.next_slot();
        self.options.push(option);
        self
    }

    /// Positional arguments in matching order.
    pub fn positionals(&self) -> &[Positional] {
        &self.positionals
    }

    /// Named value-taking arguments.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Boolean options.
    pub fn options(&self) -> &[OptionFlag] {
        &self.options
    }

    /// Number of result slots the command needs.
    pub fn fields(&self) -> usize {
        self.fields
    }

    /// Finds the positional, argument or option that owns `slot`.
    pub fn slot_owner(&self, slot: usize) -> Option<&str> {
        self.positionals
            .iter()
            .find(|p| p.slot == slot)
            .map(|p| p.name.as_str())
            .or_else(|| {
                self.arguments
                    .iter()
                    .find(|a| a.slot == slot)
                    .map(|a| a.flag.as_str())
            })
            .or_else(|| {
                self.options
                    .iter()
                    .find(|o| o.slot == slot)
                    .map(|o| o.flag.as_str())
            })
    }

    fn next_slot(&mut self) -> usize {
        let slot = self.fields;
        self.fields += 1;
        slot
    }
}

impl Named for Command {
    fn name(&self) -> &str {
        &self.name
    }

    fn alias(&self) -> Option<char> {
        self.alias
    }
}

/// Serialized form of a [`Command`]; slots are reassigned on load.
#[derive(Deserialize)]
struct CommandDef {
    name: String,
    #[serde(default)]
    alias: Option<char>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    usage: Vec<String>,
    #[serde(default)]
    positionals: Vec<Positional>,
    #[serde(default)]
    arguments: Vec<Argument>,
    #[serde(default)]
    options: Vec<OptionFlag>,
}

impl From<CommandDef> for Command {
    fn from(def: CommandDef) -> Self {
        let mut command = Command::new(&def.name);
        command.alias = def.alias;
        command.description = def.description;
        command.usage = def.usage;
        let command = def
            .positionals
            .into_iter()
            .fold(command, Command::with_positional);
        let command = def
            .arguments
            .into_iter()
            .fold(command, Command::with_argument);
        def.options.into_iter().fold(command, Command::with_option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_follow_declaration_order() {
        let command = Command::new("copy")
            .with_argument(Argument::optional("mode", Some('m'), ValueType::String))
            .with_positional(Positional::required("src", ValueType::String))
            .with_option(OptionFlag::new("force", Some('f')))
            .with_positional(Positional::required("dest", ValueType::String));

        assert_eq!(command.fields(), 4);
        assert_eq!(command.arguments[0].slot(), 0);
        assert_eq!(command.positionals[0].slot(), 1);
        assert_eq!(command.options[0].slot(), 2);
        assert_eq!(command.positionals[1].slot(), 3);
        assert_eq!(command.slot_owner(3), Some("dest"));
        assert_eq!(command.slot_owner(4), None);
    }

    #[test]
    fn test_command_deserialize_assigns_slots() {
        let json = r#"{
            "name": "build",
            "alias": "b",
            "options": [{"flag": "release", "alias": "r"}],
            "positionals": [{"name": "target", "required": true}],
            "arguments": [{"flag": "out", "alias": "o", "type": "directory", "nargs": 2}]
        }"#;
        let command: Command = serde_json::from_str(json).unwrap();

        assert_eq!(command.alias, Some('b'));
        assert_eq!(command.fields(), 3);
        assert_eq!(command.positionals[0].slot(), 0);
        assert_eq!(command.positionals[0].arity(), Arity::Single);
        assert_eq!(command.arguments[0].slot(), 1);
        assert_eq!(command.arguments[0].arity(), Arity::Fixed(2));
        assert_eq!(command.arguments[0].value_type, ValueType::Directory);
        assert_eq!(command.options[0].slot(), 2);
    }

    #[test]
    fn test_builtin_switches() {
        let version = Switch::version();
        assert_eq!(version.alias, Some('v'));
        assert!(version.exits);
        assert_eq!(version.action, SwitchAction::Version);
        assert!(Switch::new("trace", None).exiting().exits);
    }

    #[test]
    fn test_arity_display() {
        assert_eq!(Arity::Unbounded.to_string(), "at least one value");
        assert_eq!(Arity::Single.to_string(), "1 value");
        assert_eq!(Arity::Fixed(2).to_string(), "2 values");
    }
}
