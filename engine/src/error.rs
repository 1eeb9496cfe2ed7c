//! Parse errors and the user-facing failure report.

use std::fmt;

use argtree_core::{Arity, Field};
use thiserror::Error;

/// The positional or named argument an error is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    /// Positional name, or argument flag without `--`.
    pub name: String,
    /// Whether the entity is a positional argument.
    pub positional: bool,
}

impl EntityRef {
    pub(crate) fn of(field: &dyn Field) -> Self {
        Self {
            name: field.name().to_string(),
            positional: field.is_positional(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positional {
            write!(f, "positional argument [{}]", self.name)
        } else {
            write!(f, "argument --{}", self.name)
        }
    }
}

/// Why a path value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathProblem {
    /// Nothing exists at the path.
    Missing,
    /// A file was expected.
    NotAFile,
    /// A directory was expected.
    NotADirectory,
}

impl fmt::Display for PathProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "does not exist"),
            Self::NotAFile => write!(f, "is not a file"),
            Self::NotADirectory => write!(f, "is not a directory"),
        }
    }
}

/// Everything that can stop a parse.
///
/// All variants are terminal: the run stops consuming tokens and exits
/// with code `1`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A flag that matches no argument, option or switch in scope.
    #[error("unrecognized option \"{0}\"")]
    UnrecognizedOption(String),
    /// A word that matches no command or group in scope.
    #[error("unrecognized command \"{0}\"")]
    UnrecognizedCommand(String),
    /// A value nothing was waiting for.
    #[error("unexpected value \"{0}\"")]
    UnexpectedValue(String),
    /// A required entity received no value, or a flag was given where a
    /// value belongs.
    #[error("missing value for {0}")]
    MissingValue(EntityRef),
    /// Wrong number of values for the entity's arity.
    #[error("{entity} expected {expected} but received {received}")]
    ArityMismatch {
        entity: EntityRef,
        expected: Arity,
        received: usize,
    },
    /// A numeric value failed to parse.
    #[error("{entity} expected {expected} but received \"{value}\"")]
    TypeConversion {
        entity: EntityRef,
        expected: &'static str,
        value: String,
    },
    /// A path value failed its filesystem check.
    #[error("path \"{value}\" provided for {entity} {problem}")]
    PathValidation {
        entity: EntityRef,
        value: String,
        problem: PathProblem,
    },
    /// A group was reached but no command inside it was named.
    #[error("missing command name")]
    MissingCommandName,
    /// Result storage could not be reserved.
    #[error("memory allocation failed")]
    AllocationFailure,
}

impl ParseError {
    /// Whether the report should end with a `--help` suggestion.
    pub fn suggests_help(&self) -> bool {
        !matches!(self, Self::AllocationFailure)
    }
}

/// A [`ParseError`] together with the breadcrumb of the path taken so far.
///
/// The `Display` form is the report written to stderr:
///
/// ```text
/// Error: missing value for positional argument [target].
///
/// Try: tool build --help
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// What went wrong.
    pub error: ParseError,
    /// Program name followed by every group/command token matched.
    pub breadcrumb: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}.", self.error)?;
        if self.error.suggests_help() {
            write!(f, "\n\nTry: {} --help", self.breadcrumb)?;
        }
        Ok(())
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> EntityRef {
        EntityRef {
            name: "target".to_string(),
            positional: true,
        }
    }

    #[test]
    fn test_messages_name_the_entity() {
        let err = ParseError::ArityMismatch {
            entity: EntityRef {
                name: "pair".to_string(),
                positional: false,
            },
            expected: Arity::Fixed(2),
            received: 1,
        };
        assert_eq!(
            err.to_string(),
            "argument --pair expected 2 values but received 1"
        );

        let err = ParseError::PathValidation {
            entity: target(),
            value: "nope.txt".to_string(),
            problem: PathProblem::Missing,
        };
        assert_eq!(
            err.to_string(),
            "path \"nope.txt\" provided for positional argument [target] does not exist"
        );
    }

    #[test]
    fn test_failure_report() {
        let failure = Failure {
            error: ParseError::MissingValue(target()),
            breadcrumb: "tool build".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "Error: missing value for positional argument [target].\n\nTry: tool build --help"
        );
    }

    #[test]
    fn test_allocation_failure_has_no_hint() {
        let failure = Failure {
            error: ParseError::AllocationFailure,
            breadcrumb: "tool".to_string(),
        };
        assert_eq!(failure.to_string(), "Error: memory allocation failed.");
    }
}
