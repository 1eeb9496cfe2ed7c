//! Token classification, name comparison and candidate lookup.

use argtree_core::{App, Named, Switch, SwitchId};

/// The escape token.
pub const ESCAPE: &str = "--";

/// Returns `true` if `token` is exactly the `--` escape.
pub fn is_escape(token: &str) -> bool {
    token == ESCAPE
}

/// Returns `true` if `token` looks like a flag.
pub fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}

/// Compares `token[padding..]` to `name`, requiring the lengths to line up
/// exactly. There is no abbreviation or prefix matching.
///
/// # Examples
///
/// ```
/// use argtree_engine::matcher::equals;
///
/// assert!(equals("--help", "help", 2));
/// assert!(equals("build", "build", 0));
/// assert!(!equals("--hel", "help", 2));
/// assert!(!equals("--helper", "help", 2));
/// ```
pub fn equals(token: &str, name: &str, padding: usize) -> bool {
    token.len() == name.len() + padding && &token.as_bytes()[padding..] == name.as_bytes()
}

/// How a token is compared against candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Compare the byte at `offset` with each candidate's alias.
    Alias { offset: usize },
    /// Compare the token after `padding` bytes with each candidate's name.
    Name { padding: usize },
}

impl Lookup {
    /// Lookup for a hyphenated token.
    ///
    /// Two-byte tokens (`-x`) are aliases and `--name` tokens are full
    /// names. Anything else, such as `-abc`, can never match.
    pub fn flag(token: &str) -> Option<Self> {
        if token.len() == 2 {
            Some(Self::Alias { offset: 1 })
        } else if token.starts_with(ESCAPE) {
            Some(Self::Name { padding: 2 })
        } else {
            None
        }
    }

    /// Lookup for a bare command or group token; one byte means an alias.
    pub fn word(token: &str) -> Self {
        if token.len() == 1 {
            Self::Alias { offset: 0 }
        } else {
            Self::Name { padding: 0 }
        }
    }

    fn matches(self, token: &str, candidate: &(impl Named + ?Sized)) -> bool {
        match self {
            Self::Alias { offset } => match (token.as_bytes().get(offset), candidate.alias()) {
                (Some(byte), Some(alias)) => alias.is_ascii() && alias as u8 == *byte,
                _ => false,
            },
            Self::Name { padding } => equals(token, candidate.name(), padding),
        }
    }
}

/// Finds the first candidate `token` refers to.
///
/// Candidates are tried in declaration order, so when two share an alias the
/// first one declared wins.
pub fn find<'a, K, T>(
    token: &str,
    candidates: impl IntoIterator<Item = (K, &'a T)>,
    lookup: Lookup,
) -> Option<(K, &'a T)>
where
    T: Named + 'a,
{
    candidates
        .into_iter()
        .find(|(_, candidate)| lookup.matches(token, *candidate))
}

/// Finds the global switch a hyphenated token refers to.
pub fn find_switch<'a>(app: &'a App, token: &str) -> Option<(SwitchId, &'a Switch)> {
    find(token, app.switch_entries(), Lookup::flag(token)?)
}
