//! Callbacks bound to commands and switches.
//!
//! Both traits are implemented for plain closures, so most applications
//! never name them:
//!
//! ```
//! use argtree_core::{App, Command, Scope};
//! use argtree_engine::{Engine, Slots};
//!
//! let mut app = App::new("tool", "1.0.0");
//! let build = app.add_command(Scope::Root, Command::new("build"));
//!
//! let mut engine = Engine::new(&app);
//! engine.on_command(build, |_: &Slots, runs: &mut u32| {
//!     *runs += 1;
//!     0
//! });
//!
//! let mut runs = 0;
//! let argv = ["tool", "build"].map(String::from);
//! assert_eq!(engine.run(&argv, &mut runs), 0);
//! assert_eq!(runs, 1);
//! ```

use crate::session::ParseContext;
use crate::slots::Slots;

/// Runs a resolved command. The return value is the process exit code.
pub trait CommandHandler<S> {
    /// Handles one invocation with the parsed `slots`.
    fn call(&self, slots: &Slots, state: &mut S) -> i32;
}

impl<S, F> CommandHandler<S> for F
where
    F: Fn(&Slots, &mut S) -> i32,
{
    fn call(&self, slots: &Slots, state: &mut S) -> i32 {
        self(slots, state)
    }
}

/// Runs a global switch.
///
/// A non-zero return value stops the parse with that code, as does any
/// return from a switch declared with `exits`.
pub trait SwitchHandler<S> {
    /// Handles the switch with read access to the in-flight parse.
    fn call(&self, ctx: &ParseContext<'_>, state: &mut S) -> i32;
}

impl<S, F> SwitchHandler<S> for F
where
    F: Fn(&ParseContext<'_>, &mut S) -> i32,
{
    fn call(&self, ctx: &ParseContext<'_>, state: &mut S) -> i32 {
        self(ctx, state)
    }
}
