//! Per-invocation parse state.

use argtree_core::{App, CommandId, GroupId, Scope};

/// The state of one in-flight parse.
///
/// A context is created by [`Engine::try_run`](crate::Engine::try_run) and
/// threaded through the dispatcher, the runner and the extractor. Switch
/// handlers get read access to it, which is how the built-in help knows
/// where on the tree it was invoked.
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    app: &'a App,
    argv: &'a [String],
    index: usize,
    greedy: bool,
    trail: Vec<usize>,
    group: Option<GroupId>,
    command: Option<CommandId>,
}

impl<'a> ParseContext<'a> {
    /// Starts a parse of `argv`; index 0 is the program name and is skipped.
    pub fn new(app: &'a App, argv: &'a [String]) -> Self {
        Self {
            app,
            argv,
            index: 1,
            greedy: false,
            trail: Vec::new(),
            group: None,
            command: None,
        }
    }

    /// The application being parsed against.
    pub fn app(&self) -> &'a App {
        self.app
    }

    /// The full argument vector.
    pub fn argv(&self) -> &'a [String] {
        self.argv
    }

    /// Index of the token currently under the cursor.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether hyphen tokens are currently taken as plain values.
    pub fn greedy(&self) -> bool {
        self.greedy
    }

    /// The innermost group entered so far.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// The command being run, once one is chosen.
    pub fn command(&self) -> Option<CommandId> {
        self.command
    }

    /// The group and command tokens matched so far, in order.
    pub fn path(&self) -> Vec<&'a str> {
        self.trail.iter().map(|&i| self.argv[i].as_str()).collect()
    }

    /// The program name followed by every matched group and command token.
    ///
    /// Falls back to the application name when `argv` is empty.
    pub fn breadcrumb(&self) -> String {
        let program = self
            .argv
            .first()
            .map(String::as_str)
            .unwrap_or(self.app.name.as_str());
        std::iter::once(program)
            .chain(self.path())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn current(&self) -> Option<&'a str> {
        self.argv.get(self.index).map(String::as_str)
    }

    pub(crate) fn advance(&mut self) {
        self.index += 1;
    }

    pub(crate) fn set_greedy(&mut self, greedy: bool) {
        self.greedy = greedy;
    }

    /// Number of groups and commands descended through.
    pub(crate) fn depth(&self) -> usize {
        self.trail.len()
    }

    /// The scope commands are currently looked up in.
    pub fn scope(&self) -> Scope {
        self.group.map_or(Scope::Root, Scope::Group)
    }

    /// Records the current token as a group on the trail and moves past it.
    pub(crate) fn enter_group(&mut self, group: GroupId) {
        self.trail.push(self.index);
        self.group = Some(group);
        self.index += 1;
    }

    /// Records the current token as a command on the trail and moves past it.
    pub(crate) fn enter_command(&mut self, command: CommandId) {
        self.trail.push(self.index);
        self.command = Some(command);
        self.index += 1;
    }

    /// Selects a command without consuming a token, as when falling back to
    /// the main command.
    pub(crate) fn set_command(&mut self, command: CommandId) {
        self.command = Some(command);
    }
}

#[cfg(test)]
mod tests {
    use argtree_core::{Command, CommandGroup};

    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_breadcrumb_follows_trail() {
        let mut app = App::new("tool", "1.0.0");
        let db = app.add_group(Scope::Root, CommandGroup::new("db"));
        let migrate = app.add_command(Scope::Group(db), Command::new("migrate"));
        let args = argv(&["./tool", "db", "migrate", "--force"]);

        let mut ctx = ParseContext::new(&app, &args);
        assert_eq!(ctx.breadcrumb(), "./tool");
        assert_eq!(ctx.current(), Some("db"));

        ctx.enter_group(db);
        ctx.enter_command(migrate);
        assert_eq!(ctx.breadcrumb(), "./tool db migrate");
        assert_eq!(ctx.path(), vec!["db", "migrate"]);
        assert_eq!(ctx.depth(), 2);
        assert_eq!(ctx.scope(), Scope::Group(db));
        assert_eq!(ctx.current(), Some("--force"));
        ctx.advance();
        assert_eq!(ctx.current(), None);
    }

    #[test]
    fn test_empty_argv_uses_app_name() {
        let app = App::new("tool", "1.0.0");
        let ctx = ParseContext::new(&app, &[]);
        assert_eq!(ctx.breadcrumb(), "tool");
        assert_eq!(ctx.current(), None);
    }
}
