//! The engine: handler bindings and the `run` entry point.

use std::collections::HashMap;

use argtree_core::{App, CommandId, SwitchAction, SwitchId};
use tracing::{debug, warn};

use crate::convert::{FsProbe, PathProbe};
use crate::dispatch::{Dispatch, dispatch};
use crate::error::Failure;
use crate::handler::{CommandHandler, SwitchHandler};
use crate::help::{help_node, render_help, render_version};
use crate::runner::run_command;
use crate::session::ParseContext;
use crate::slots::Slots;

/// Resolves argument vectors against an [`App`] and calls the bound
/// handlers.
///
/// The engine borrows the application and can be run any number of times;
/// each run gets its own [`ParseContext`] and [`Slots`]. `S` is the user
/// state handed to every handler.
///
/// # Examples
///
/// ```
/// use argtree_core::{App, Command, Positional, Scope, ValueType};
/// use argtree_engine::{Engine, Slots};
///
/// let mut app = App::new("tool", "1.0.0").with_builtin_switches();
/// let build = app.add_command(
///     Scope::Root,
///     Command::new("build").with_positional(Positional::required("target", ValueType::String)),
/// );
///
/// let mut engine = Engine::new(&app);
/// engine.on_command(build, |slots: &Slots, seen: &mut Vec<String>| {
///     seen.push(slots.string(0).unwrap_or_default().to_string());
///     0
/// });
///
/// let mut seen = Vec::new();
/// let argv = ["tool", "build", "app.bin"].map(String::from);
/// assert_eq!(engine.try_run(&argv, &mut seen), Ok(0));
/// assert_eq!(seen, vec!["app.bin"]);
///
/// let failure = engine.try_run(&argv[..2], &mut seen).unwrap_err();
/// assert_eq!(failure.breadcrumb, "tool build");
/// ```
pub struct Engine<'a, S> {
    app: &'a App,
    commands: HashMap<CommandId, Box<dyn CommandHandler<S> + 'a>>,
    switches: HashMap<SwitchId, Box<dyn SwitchHandler<S> + 'a>>,
    probe: Box<dyn PathProbe + 'a>,
}

impl<'a, S> Engine<'a, S> {
    /// Creates an engine with no handlers bound and the real filesystem as
    /// path probe.
    pub fn new(app: &'a App) -> Self {
        Self {
            app,
            commands: HashMap::new(),
            switches: HashMap::new(),
            probe: Box::new(FsProbe),
        }
    }

    /// Replaces the probe used to validate path values.
    pub fn with_probe(mut self, probe: impl PathProbe + 'a) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// The application this engine runs.
    pub fn app(&self) -> &'a App {
        self.app
    }

    /// Binds a closure to a command.
    pub fn on_command<F>(&mut self, id: CommandId, handler: F) -> &mut Self
    where
        F: Fn(&Slots, &mut S) -> i32 + 'a,
    {
        self.bind_command(id, handler)
    }

    /// Binds a closure to a switch, replacing any built-in behavior.
    pub fn on_switch<F>(&mut self, id: SwitchId, handler: F) -> &mut Self
    where
        F: Fn(&ParseContext<'_>, &mut S) -> i32 + 'a,
    {
        self.bind_switch(id, handler)
    }

    /// Binds any [`CommandHandler`] to a command.
    pub fn bind_command(&mut self, id: CommandId, handler: impl CommandHandler<S> + 'a) -> &mut Self {
        self.commands.insert(id, Box::new(handler));
        self
    }

    /// Binds any [`SwitchHandler`] to a switch.
    pub fn bind_switch(&mut self, id: SwitchId, handler: impl SwitchHandler<S> + 'a) -> &mut Self {
        self.switches.insert(id, Box::new(handler));
        self
    }

    /// Resolves `argv` and runs the matching handler.
    ///
    /// `argv[0]` is the program name and is never matched. Returns the exit
    /// code of the handler (or of the switch that ended the run).
    ///
    /// # Errors
    ///
    /// Returns a [`Failure`] when the arguments do not fit the schema. No
    /// command handler has run in that case.
    pub fn try_run(&self, argv: &[String], state: &mut S) -> Result<i32, Failure> {
        let mut ctx = ParseContext::new(self.app, argv);
        let outcome = dispatch(self, &mut ctx, state).and_then(|dispatched| match dispatched {
            Dispatch::Run(id) => run_command(self, &mut ctx, id, state),
            Dispatch::Exit(code) => Ok(code),
        });
        outcome.map_err(|error| Failure {
            error,
            breadcrumb: ctx.breadcrumb(),
        })
    }

    /// Like [`try_run`](Self::try_run), but writes any failure to stderr and
    /// returns exit code `1` for it.
    pub fn run(&self, argv: &[String], state: &mut S) -> i32 {
        match self.try_run(argv, state) {
            Ok(code) => code,
            Err(failure) => {
                debug!(error = ?failure.error, "run failed");
                eprintln!("{failure}");
                1
            }
        }
    }

    pub(crate) fn probe(&self) -> &dyn PathProbe {
        self.probe.as_ref()
    }

    /// Runs a switch and returns `Some(code)` if the parse has to stop.
    pub(crate) fn run_switch(&self, id: SwitchId, ctx: &ParseContext<'_>, state: &mut S) -> Option<i32> {
        let switch = self.app.switch(id);
        let code = match (self.switches.get(&id), switch.action) {
            (Some(handler), _) => handler.call(ctx, state),
            (None, SwitchAction::Help) => {
                print!("{}", render_help(self.app, help_node(ctx), &ctx.breadcrumb()));
                0
            }
            (None, SwitchAction::Version) => {
                println!("{}", render_version(self.app));
                0
            }
            (None, SwitchAction::Custom) => {
                warn!(switch = %switch.flag, "no handler bound to switch");
                0
            }
        };
        debug!(switch = %switch.flag, code, exits = switch.exits, "switch ran");
        (code != 0 || switch.exits).then_some(code)
    }

    pub(crate) fn call_command(&self, id: CommandId, slots: &Slots, state: &mut S) -> i32 {
        match self.commands.get(&id) {
            Some(handler) => handler.call(slots, state),
            None => {
                warn!(command = %self.app.command(id).name, "no handler bound to command");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use argtree_core::{Command, Scope, Switch};

    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_unbound_command_succeeds() {
        let mut app = App::new("tool", "1.0.0");
        app.add_command(Scope::Root, Command::new("build"));
        let engine: Engine<'_, ()> = Engine::new(&app);
        assert_eq!(engine.try_run(&argv(&["tool", "build"]), &mut ()), Ok(0));
    }

    #[test]
    fn test_switch_codes() {
        let mut app = App::new("tool", "1.0.0");
        let quiet = app.add_switch(Switch::new("quiet", Some('q')));
        let stop = app.add_switch(Switch::new("stop", None).exiting());
        let build = app.add_command(Scope::Root, Command::new("build"));

        let calls = Cell::new(0);
        let mut engine = Engine::new(&app);
        engine
            .on_switch(quiet, |_: &ParseContext<'_>, _: &mut ()| {
                calls.set(calls.get() + 1);
                0
            })
            .on_switch(stop, |_: &ParseContext<'_>, _: &mut ()| 0)
            .on_command(build, |_: &Slots, _: &mut ()| 7);

        assert_eq!(engine.try_run(&argv(&["tool", "-q", "build", "--quiet"]), &mut ()), Ok(7));
        assert_eq!(calls.get(), 2);
        assert_eq!(engine.try_run(&argv(&["tool", "build", "--stop"]), &mut ()), Ok(0));
        assert_eq!(engine.try_run(&argv(&["tool", "--stop", "nope"]), &mut ()), Ok(0));
    }

    #[test]
    fn test_failing_switch_skips_command() {
        let mut app = App::new("tool", "1.0.0");
        let check = app.add_switch(Switch::new("check", None));
        let build = app.add_command(Scope::Root, Command::new("build"));

        let ran = Cell::new(false);
        let mut engine = Engine::new(&app);
        engine
            .on_switch(check, |_: &ParseContext<'_>, _: &mut ()| 3)
            .on_command(build, |_: &Slots, _: &mut ()| {
                ran.set(true);
                0
            });

        assert_eq!(engine.try_run(&argv(&["tool", "build", "--check"]), &mut ()), Ok(3));
        assert!(!ran.get());
    }

    #[test]
    fn test_run_reports_failure_code() {
        let app = App::new("tool", "1.0.0");
        let engine: Engine<'_, ()> = Engine::new(&app);
        assert_eq!(engine.run(&argv(&["tool", "stray"]), &mut ()), 1);
    }
}
