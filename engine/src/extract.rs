//! Arity-driven value extraction.
//!
//! The extractor is entered with the cursor on the first candidate value and
//! leaves it on the first token it did not consume. It honors the `--`
//! escape convention:
//!
//! - single value: `--` makes the next token literal;
//! - unbounded: `--` before any value turns greedy mode on until a second
//!   `--`, while `--` after a value makes only the next token literal;
//! - fixed count: `--` before any value turns greedy mode on for the rest of
//!   this entity's run, while `--` inside the run makes the next token literal.

use argtree_core::{Arity, Field};
use tracing::debug;

use crate::convert::{PathProbe, convert};
use crate::error::{EntityRef, ParseError};
use crate::matcher::{is_escape, is_flag};
use crate::session::ParseContext;
use crate::slots::Value;

/// Consumes the values for `field` and converts them.
pub(crate) fn extract(
    ctx: &mut ParseContext<'_>,
    field: &dyn Field,
    probe: &dyn PathProbe,
) -> Result<Value, ParseError> {
    let value = match field.arity() {
        Arity::Single => single(ctx, field, probe)?,
        Arity::Unbounded => Value::List(unbounded(ctx, field, probe)?),
        Arity::Fixed(n) => Value::List(fixed(ctx, field, probe, n)?),
    };
    debug!(entity = field.name(), value = ?value, "extracted");
    Ok(value)
}

fn single(
    ctx: &mut ParseContext<'_>,
    field: &dyn Field,
    probe: &dyn PathProbe,
) -> Result<Value, ParseError> {
    let missing = || ParseError::MissingValue(EntityRef::of(field));
    let mut token = ctx.current().ok_or_else(missing)?;
    if !ctx.greedy() && is_flag(token) {
        if !is_escape(token) {
            return Err(missing());
        }
        ctx.advance();
        token = ctx.current().ok_or_else(missing)?;
    }
    ctx.advance();
    convert(token, field, probe)
}

fn unbounded(
    ctx: &mut ParseContext<'_>,
    field: &dyn Field,
    probe: &dyn PathProbe,
) -> Result<Vec<Value>, ParseError> {
    let mut values = Vec::new();
    let mut literal = false;
    while let Some(token) = ctx.current() {
        if literal {
            literal = false;
        } else if is_escape(token) {
            ctx.advance();
            if ctx.greedy() {
                ctx.set_greedy(false);
                break;
            }
            if values.is_empty() {
                ctx.set_greedy(true);
            } else {
                literal = true;
            }
            continue;
        } else if !ctx.greedy() && is_flag(token) {
            break;
        }
        values.push(convert(token, field, probe)?);
        ctx.advance();
    }

    if values.is_empty() {
        return Err(ParseError::ArityMismatch {
            entity: EntityRef::of(field),
            expected: Arity::Unbounded,
            received: 0,
        });
    }
    Ok(values)
}

fn fixed(
    ctx: &mut ParseContext<'_>,
    field: &dyn Field,
    probe: &dyn PathProbe,
    n: usize,
) -> Result<Vec<Value>, ParseError> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(n)
        .map_err(|_| ParseError::AllocationFailure)?;

    let outer = ctx.greedy();
    let mut literal = false;
    while values.len() < n {
        let Some(token) = ctx.current() else {
            break;
        };
        if literal {
            literal = false;
        } else if !ctx.greedy() && is_escape(token) {
            ctx.advance();
            if values.is_empty() {
                ctx.set_greedy(true);
            } else {
                literal = true;
            }
            continue;
        } else if !ctx.greedy() && is_flag(token) {
            break;
        }
        values.push(convert(token, field, probe)?);
        ctx.advance();
    }
    ctx.set_greedy(outer);

    if values.len() < n {
        return Err(ParseError::ArityMismatch {
            entity: EntityRef::of(field),
            expected: Arity::Fixed(n),
            received: values.len(),
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use argtree_core::{App, Argument, Positional, ValueType};

    use super::*;
    use crate::convert::PathKind;

    fn nothing(_: &Path) -> PathKind {
        PathKind::Missing
    }

    fn argv(tokens: &[&str]) -> Vec<String> {
        std::iter::once("tool")
            .chain(tokens.iter().copied())
            .map(str::to_string)
            .collect()
    }

    fn strings(value: &Value) -> Vec<&str> {
        match value {
            Value::List(items) => items.iter().filter_map(Value::as_str).collect(),
            other => other.as_str().into_iter().collect(),
        }
    }

    fn run(tokens: &[&str], field: &dyn Field) -> (Result<Value, ParseError>, usize, bool) {
        let app = App::new("tool", "1.0.0");
        let args = argv(tokens);
        let mut ctx = ParseContext::new(&app, &args);
        let result = extract(&mut ctx, field, &nothing);
        (result, ctx.index(), ctx.greedy())
    }

    #[test]
    fn test_single_value() {
        let out = Argument::optional("out", Some('o'), ValueType::String);

        let (value, index, _) = run(&["dist", "rest"], &out);
        assert_eq!(value.unwrap(), Value::String("dist".into()));
        assert_eq!(index, 2);

        let (value, index, _) = run(&["--", "-dist"], &out);
        assert_eq!(value.unwrap(), Value::String("-dist".into()));
        assert_eq!(index, 3);

        for tokens in [&[][..], &["-x"], &["--"], &["--release"]] {
            let (value, _, _) = run(tokens, &out);
            assert!(matches!(value, Err(ParseError::MissingValue(_))), "{tokens:?}");
        }
    }

    #[test]
    fn test_unbounded_stops_at_flag() {
        let files = Positional::required("files", ValueType::String).with_nargs(0);
        let (value, index, greedy) = run(&["a", "b", "-x", "c"], &files);
        assert_eq!(strings(&value.unwrap()), vec!["a", "b"]);
        assert_eq!(index, 3);
        assert!(!greedy);
    }

    #[test]
    fn test_unbounded_escape_after_values_is_one_literal() {
        let files = Positional::required("files", ValueType::String).with_nargs(0);
        let (value, _, greedy) = run(&["a.txt", "b.txt", "--", "-x.txt", "-y"], &files);
        assert_eq!(strings(&value.unwrap()), vec!["a.txt", "b.txt", "-x.txt"]);
        assert!(!greedy);
    }

    #[test]
    fn test_unbounded_leading_escape_is_greedy_until_closed() {
        let files = Positional::required("files", ValueType::String).with_nargs(0);
        let (value, index, greedy) = run(&["--", "-a", "--b", "--", "-c"], &files);
        assert_eq!(strings(&value.unwrap()), vec!["-a", "--b"]);
        assert_eq!(index, 5);
        assert!(!greedy);

        let (value, _, greedy) = run(&["--", "-a", "-b"], &files);
        assert_eq!(strings(&value.unwrap()), vec!["-a", "-b"]);
        assert!(greedy);
    }

    #[test]
    fn test_unbounded_requires_a_value() {
        let files = Positional::required("files", ValueType::String).with_nargs(0);
        for tokens in [&[][..], &["-x"], &["--"]] {
            let (value, _, _) = run(tokens, &files);
            assert!(matches!(
                value,
                Err(ParseError::ArityMismatch { expected: Arity::Unbounded, received: 0, .. })
            ));
        }
    }

    #[test]
    fn test_fixed_count() {
        let pair = Argument::optional("pair", None, ValueType::Integer).with_nargs(2);

        let (value, index, _) = run(&["1", "2", "3"], &pair);
        assert_eq!(value.unwrap(), Value::List(vec![Value::Integer(1), Value::Integer(2)]));
        assert_eq!(index, 3);

        let (value, _, _) = run(&["1", "--x"], &pair);
        assert!(matches!(
            value,
            Err(ParseError::ArityMismatch { expected: Arity::Fixed(2), received: 1, .. })
        ));

        let (value, _, _) = run(&["1", "--", "-2"], &pair);
        assert_eq!(value.unwrap(), Value::List(vec![Value::Integer(1), Value::Integer(-2)]));
    }

    #[test]
    fn test_fixed_leading_escape_is_scoped_to_the_run() {
        let pair = Positional::required("pair", ValueType::String).with_nargs(2);
        let (value, index, greedy) = run(&["--", "-a", "-b", "-c"], &pair);
        assert_eq!(strings(&value.unwrap()), vec!["-a", "-b"]);
        assert_eq!(index, 4);
        assert!(!greedy);
    }

    #[test]
    fn test_conversion_error_stops_extraction() {
        let nums = Positional::required("nums", ValueType::Integer).with_nargs(0);
        let (value, _, _) = run(&["1", "two"], &nums);
        assert!(matches!(value, Err(ParseError::TypeConversion { .. })));
    }
}
