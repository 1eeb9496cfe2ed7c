//! Tree walker: resolves the leading tokens to a command.

use argtree_core::CommandId;
use tracing::debug;

use crate::engine::Engine;
use crate::error::ParseError;
use crate::matcher::{Lookup, find, find_switch, is_escape, is_flag};
use crate::session::ParseContext;

/// Outcome of walking the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dispatch {
    /// Hand the remaining tokens to this command.
    Run(CommandId),
    /// A switch ended the run with this exit code.
    Exit(i32),
}

/// Walks groups until a command is found, running global switches on the
/// way.
pub(crate) fn dispatch<S>(
    engine: &Engine<'_, S>,
    ctx: &mut ParseContext<'_>,
    state: &mut S,
) -> Result<Dispatch, ParseError> {
    let app = ctx.app();

    while let Some(token) = ctx.current() {
        if !ctx.greedy() && is_escape(token) {
            ctx.set_greedy(true);
            ctx.advance();
            if ctx.depth() > 0 {
                continue;
            }
            let main = app
                .main()
                .ok_or_else(|| ParseError::UnexpectedValue(token.to_string()))?;
            debug!("escape at top level, running main command");
            ctx.set_command(main);
            return Ok(Dispatch::Run(main));
        }

        if !ctx.greedy() && is_flag(token) {
            if let Some((id, switch)) = find_switch(app, token) {
                debug!(switch = %switch.flag, "switch matched while dispatching");
                if let Some(code) = engine.run_switch(id, ctx, state) {
                    return Ok(Dispatch::Exit(code));
                }
                ctx.advance();
                continue;
            }
            let main = app
                .main()
                .ok_or_else(|| ParseError::UnrecognizedOption(token.to_string()))?;
            debug!(token, "unmatched flag, running main command");
            ctx.set_command(main);
            return Ok(Dispatch::Run(main));
        }

        let scope = ctx.scope();
        let lookup = Lookup::word(token);
        let commands = app
            .scope_commands(scope)
            .iter()
            .map(|&id| (id, app.command(id)));
        if let Some((id, command)) = find(token, commands, lookup) {
            debug!(command = %command.name, "command matched");
            ctx.enter_command(id);
            return Ok(Dispatch::Run(id));
        }

        let groups = app
            .scope_groups(scope)
            .iter()
            .map(|&id| (id, app.group(id)));
        if let Some((id, group)) = find(token, groups, lookup) {
            debug!(group = %group.name, "descending into group");
            ctx.enter_group(id);
            continue;
        }

        if let Some(main) = app
            .main()
            .filter(|&main| !app.command(main).positionals().is_empty())
        {
            debug!(token, "no command matched, running main command");
            ctx.set_command(main);
            return Ok(Dispatch::Run(main));
        }

        return Err(if app.scope_commands(scope).is_empty() {
            ParseError::UnexpectedValue(token.to_string())
        } else {
            ParseError::UnrecognizedCommand(token.to_string())
        });
    }

    match (ctx.group(), app.main()) {
        (None, Some(main)) => {
            ctx.set_command(main);
            Ok(Dispatch::Run(main))
        }
        _ => Err(ParseError::MissingCommandName),
    }
}
