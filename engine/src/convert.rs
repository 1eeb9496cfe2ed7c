//! Per-token value conversion.

use std::path::{Path, PathBuf};

use argtree_core::{Field, ValueType};

use crate::error::{EntityRef, ParseError, PathProblem};
use crate::slots::Value;

/// What a path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Nothing exists at the path.
    Missing,
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// Something else, such as a socket or device.
    Other,
}

/// Filesystem check used to validate `file`, `directory` and `path` values.
///
/// The default [`FsProbe`] asks the operating system; tests can plug in a
/// closure instead.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use argtree_engine::{PathKind, PathProbe};
///
/// let probe = |path: &Path| {
///     if path == Path::new("Cargo.toml") { PathKind::File } else { PathKind::Missing }
/// };
/// assert_eq!(probe.probe(Path::new("Cargo.toml")), PathKind::File);
/// ```
pub trait PathProbe {
    /// Classifies `path`.
    fn probe(&self, path: &Path) -> PathKind;
}

impl<F> PathProbe for F
where
    F: Fn(&Path) -> PathKind,
{
    fn probe(&self, path: &Path) -> PathKind {
        self(path)
    }
}

/// Probe backed by `std::fs::metadata`, following symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl PathProbe for FsProbe {
    fn probe(&self, path: &Path) -> PathKind {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => PathKind::File,
            Ok(meta) if meta.is_dir() => PathKind::Directory,
            Ok(_) => PathKind::Other,
            Err(_) => PathKind::Missing,
        }
    }
}

/// Converts one token for `field` according to its value type.
pub fn convert(token: &str, field: &dyn Field, probe: &dyn PathProbe) -> Result<Value, ParseError> {
    let value_type = field.value_type();
    match value_type {
        ValueType::String => Ok(Value::String(token.to_string())),
        ValueType::Integer => token
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| type_error(token, field, "integer")),
        ValueType::Float => token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| type_error(token, field, "float")),
        ValueType::File | ValueType::Directory | ValueType::Path => {
            let path = PathBuf::from(token);
            let problem = match (value_type, probe.probe(&path)) {
                (_, PathKind::Missing) => Some(PathProblem::Missing),
                (ValueType::File, kind) if kind != PathKind::File => Some(PathProblem::NotAFile),
                (ValueType::Directory, kind) if kind != PathKind::Directory => {
                    Some(PathProblem::NotADirectory)
                }
                _ => None,
            };
            match problem {
                None => Ok(Value::Path(path)),
                Some(problem) => Err(ParseError::PathValidation {
                    entity: EntityRef::of(field),
                    value: token.to_string(),
                    problem,
                }),
            }
        }
    }
}

fn type_error(token: &str, field: &dyn Field, expected: &'static str) -> ParseError {
    ParseError::TypeConversion {
        entity: EntityRef::of(field),
        expected,
        value: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use argtree_core::{Argument, Positional};

    use super::*;

    fn nothing(_: &Path) -> PathKind {
        PathKind::Missing
    }

    #[test]
    fn test_numbers_parse_strictly() {
        let count = Argument::optional("count", Some('c'), ValueType::Integer);
        assert_eq!(convert("-12", &count, &nothing), Ok(Value::Integer(-12)));
        assert!(matches!(
            convert("12abc", &count, &nothing),
            Err(ParseError::TypeConversion { expected: "integer", .. })
        ));
        assert!(convert("", &count, &nothing).is_err());

        let ratio = Positional::required("ratio", ValueType::Float);
        assert_eq!(convert("0.25", &ratio, &nothing), Ok(Value::Float(0.25)));
        let err = convert("1.5x", &ratio, &nothing).unwrap_err();
        assert_eq!(
            err.to_string(),
            "positional argument [ratio] expected float but received \"1.5x\""
        );
    }

    #[test]
    fn test_path_kinds() {
        let probe = |path: &Path| match path.to_str() {
            Some("a.txt") => PathKind::File,
            Some("src") => PathKind::Directory,
            _ => PathKind::Missing,
        };
        let file = Positional::required("input", ValueType::File);
        let dir = Positional::required("root", ValueType::Directory);
        let any = Positional::required("any", ValueType::Path);

        assert_eq!(convert("a.txt", &file, &probe), Ok(Value::Path("a.txt".into())));
        assert!(matches!(
            convert("src", &file, &probe),
            Err(ParseError::PathValidation { problem: PathProblem::NotAFile, .. })
        ));
        assert!(matches!(
            convert("a.txt", &dir, &probe),
            Err(ParseError::PathValidation { problem: PathProblem::NotADirectory, .. })
        ));
        assert!(convert("src", &any, &probe).is_ok());
        assert!(matches!(
            convert("gone", &any, &probe),
            Err(ParseError::PathValidation { problem: PathProblem::Missing, .. })
        ));
    }

    #[test]
    fn test_fs_probe() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "x").unwrap();

        assert_eq!(FsProbe.probe(dir.path()), PathKind::Directory);
        assert_eq!(FsProbe.probe(&file), PathKind::File);
        assert_eq!(FsProbe.probe(&dir.path().join("missing")), PathKind::Missing);
    }
}
