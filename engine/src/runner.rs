//! Per-command token loop.

use argtree_core::{Arity, CommandId, Field};
use tracing::debug;

use crate::engine::Engine;
use crate::error::{EntityRef, ParseError};
use crate::extract::extract;
use crate::matcher::{Lookup, find, find_switch, is_escape, is_flag};
use crate::session::ParseContext;
use crate::slots::{Slots, Value};

/// Parses the remaining tokens for `id` and calls its handler.
///
/// The slots live only for the duration of this call.
pub(crate) fn run_command<S>(
    engine: &Engine<'_, S>,
    ctx: &mut ParseContext<'_>,
    id: CommandId,
    state: &mut S,
) -> Result<i32, ParseError> {
    let app = ctx.app();
    let command = app.command(id);
    let mut slots = Slots::try_new(command.fields())?;
    let mut positionals = command.positionals().iter();
    let mut last: Option<&dyn Field> = None;

    while let Some(token) = ctx.current() {
        if !ctx.greedy() && is_flag(token) {
            if is_escape(token) {
                ctx.set_greedy(true);
                ctx.advance();
                continue;
            }

            let lookup = Lookup::flag(token);
            if let Some((_, argument)) =
                lookup.and_then(|l| find(token, command.arguments().iter().enumerate(), l))
            {
                debug!(argument = %argument.flag, "argument matched");
                ctx.advance();
                let value = extract(ctx, argument, engine.probe())?;
                slots.set(argument.slot(), value);
                last = Some(argument);
                continue;
            }
            if let Some((_, option)) =
                lookup.and_then(|l| find(token, command.options().iter().enumerate(), l))
            {
                debug!(option = %option.flag, "option set");
                slots.set(option.slot(), Value::Flag(true));
                ctx.advance();
                last = None;
                continue;
            }
            if let Some((switch, _)) = find_switch(app, token) {
                if let Some(code) = engine.run_switch(switch, ctx, state) {
                    return Ok(code);
                }
                ctx.advance();
                last = None;
                continue;
            }
            return Err(ParseError::UnrecognizedOption(token.to_string()));
        }

        let Some(positional) = positionals.next() else {
            return Err(stray(ctx, last, token));
        };
        debug!(positional = %positional.name, "positional matched");
        let value = extract(ctx, positional, engine.probe())?;
        slots.set(positional.slot(), value);
        last = Some(positional);
    }

    let missing = command
        .positionals()
        .iter()
        .map(|p| p as &dyn Field)
        .chain(command.arguments().iter().map(|a| a as &dyn Field))
        .find(|field| field.required() && !slots.is_set(field.slot()));
    if let Some(field) = missing {
        return Err(ParseError::MissingValue(EntityRef::of(field)));
    }

    Ok(engine.call_command(id, &slots, state))
}

/// Error for a value that no remaining positional can take.
///
/// When it directly follows a bounded entity, the whole run of stray values
/// is counted against that entity's arity.
fn stray(ctx: &ParseContext<'_>, last: Option<&dyn Field>, token: &str) -> ParseError {
    match last {
        Some(field) if field.arity() != Arity::Unbounded => {
            let run = ctx.argv()[ctx.index()..]
                .iter()
                .take_while(|t| ctx.greedy() || !is_flag(t))
                .count();
            ParseError::ArityMismatch {
                entity: EntityRef::of(field),
                expected: field.arity(),
                received: field.arity().nargs() + run,
            }
        }
        _ => ParseError::UnexpectedValue(token.to_string()),
    }
}
