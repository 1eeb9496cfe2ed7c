//! Re-serialization of parsed slots into a canonical argument list.

use argtree_core::{Arity, Command, Field};

use crate::matcher::{ESCAPE, is_flag};
use crate::slots::Slots;

/// Rebuilds the argument list for `command` from its parsed `slots`.
///
/// Named arguments come first as `--flag value…`, then options as
/// `--flag`, then the filled positionals in order. Escapes are inserted so
/// that values starting with `-` parse back into the same slots. Unbounded
/// arguments are always wrapped as `--flag -- values… --`, and so is an
/// unbounded positional that another positional follows. The command name
/// itself is not included.
///
/// A value that is exactly `--` inside an unbounded argument or an escaped
/// positional run cannot be represented.
///
/// # Examples
///
/// ```
/// use argtree_core::{Argument, Command, Positional, ValueType};
/// use argtree_engine::{Slots, canonical_args};
///
/// let build = Command::new("build")
///     .with_positional(Positional::required("target", ValueType::String))
///     .with_argument(Argument::optional("out", Some('o'), ValueType::String));
///
/// // Nothing parsed yet, so nothing to emit.
/// assert!(canonical_args(&build, &Slots::new(build.fields())).is_empty());
/// ```
pub fn canonical_args(command: &Command, slots: &Slots) -> Vec<String> {
    let mut args = Vec::new();

    for argument in command.arguments() {
        let Some(value) = slots.get(argument.slot()) else {
            continue;
        };
        args.push(format!("--{}", argument.flag));
        push_escaped(&mut args, argument, value.to_tokens());
    }

    for option in command.options() {
        if slots.flag(option.slot()) {
            args.push(format!("--{}", option.flag));
        }
    }

    let filled: Vec<_> = command
        .positionals()
        .iter()
        .map_while(|p| slots.get(p.slot()).map(|value| (p, value.to_tokens())))
        .collect();
    let mut greedy = false;
    for (i, (positional, tokens)) in filled.iter().enumerate() {
        let hyphen = tokens.iter().any(|t| is_flag(t));
        // An unbounded run followed by another positional has to be closed.
        if positional.arity() == Arity::Unbounded && i + 1 < filled.len() {
            if !greedy {
                args.push(ESCAPE.to_string());
            }
            args.extend(tokens.iter().cloned());
            args.push(ESCAPE.to_string());
            greedy = false;
            continue;
        }
        if hyphen && !greedy {
            args.push(ESCAPE.to_string());
            greedy = true;
        }
        args.extend(tokens.iter().cloned());
    }
    args
}

fn push_escaped(args: &mut Vec<String>, field: &dyn Field, tokens: Vec<String>) {
    let leading = tokens.first().is_some_and(|t| is_flag(t));
    match field.arity() {
        // Bracketed so the run cannot swallow the positionals that follow.
        Arity::Unbounded => {
            args.push(ESCAPE.to_string());
            args.extend(tokens);
            args.push(ESCAPE.to_string());
            return;
        }
        Arity::Fixed(_) if leading => {
            args.push(ESCAPE.to_string());
            args.extend(tokens);
            return;
        }
        _ => {}
    }
    for token in tokens {
        if is_flag(&token) {
            args.push(ESCAPE.to_string());
        }
        args.push(token);
    }
}
