//! The closed set of value kinds a flag can carry.

use std::fmt::Display;

/// The value stored in a flag.
///
/// This is a closed set: the parser matches on it exhaustively. `Boolean`
/// flags never consume a separate token, `List` flags are the greedy ones,
/// and everything else (currently only `Str`) is treated as a scalar that
/// takes exactly one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A boolean switch, set from a truthy/falsy spelling.
    Boolean(bool),
    /// A single string, replaced on every set.
    Str(String),
    /// An ordered list of strings, appended to on every set.
    List(Vec<String>),
}

impl Value {
    /// Update the value from a command line token.
    ///
    /// `Str` replaces, `List` appends. `Boolean` accepts (ignoring ASCII
    /// case) `true`/`false`, `t`/`f`, `1`/`0` and `yes`/`no`, and fails on
    /// anything else.
    pub fn set(&mut self, token: &str) -> Result<(), ValueError> {
        match self {
            Value::Boolean(b) => {
                *b = parse_bool(token)?;
                Ok(())
            }
            Value::Str(s) => {
                token.clone_into(s);
                Ok(())
            }
            Value::List(items) => {
                items.push(token.to_owned());
                Ok(())
            }
        }
    }

    /// Render the value as text, as used for default values in usage output.
    ///
    /// Lists render as `[a,b,c]` (`[]` when empty).
    pub fn render(&self) -> String {
        match self {
            Value::Boolean(b) => b.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(items) => format!("[{}]", items.join(",")),
        }
    }

    /// The boolean inside, if this is a `Boolean`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The string inside, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The items inside, if this is a `List`.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

fn parse_bool(token: &str) -> Result<bool, ValueError> {
    if token.eq_ignore_ascii_case("true")
        || token.eq_ignore_ascii_case("t")
        || token.eq_ignore_ascii_case("yes")
        || token == "1"
    {
        Ok(true)
    } else if token.eq_ignore_ascii_case("false")
        || token.eq_ignore_ascii_case("f")
        || token.eq_ignore_ascii_case("no")
        || token == "0"
    {
        Ok(false)
    } else {
        Err(ValueError::InvalidBoolean(token.to_owned()))
    }
}

/// An error converting a token into a value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValueError {
    /// A boolean flag was given a token that is not a recognized spelling.
    InvalidBoolean(String),
}

impl Display for ValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueError::InvalidBoolean(token) => {
                write!(f, "invalid boolean value {:?}", token)
            }
        }
    }
}

impl std::error::Error for ValueError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_spellings() {
        let mut v = Value::Boolean(false);
        for spelling in &["true", "TRUE", "True", "t", "1", "yes", "YES"] {
            v.set(spelling).unwrap();
            assert_eq!(v.as_bool(), Some(true));
        }
        for spelling in &["false", "F", "0", "no", "No"] {
            v.set(spelling).unwrap();
            assert_eq!(v.as_bool(), Some(false));
        }
        match v.set("maybe").unwrap_err() {
            ValueError::InvalidBoolean(token) => assert_eq!(token, "maybe"),
        }
        // A failed set leaves the previous value in place.
        assert_eq!(v.as_bool(), Some(false));
    }

    #[test]
    fn test_str_replaces() {
        let mut v = Value::Str("default".into());
        v.set("first").unwrap();
        v.set("second").unwrap();
        assert_eq!(v.as_str(), Some("second"));
        assert_eq!(v.render(), "second");
    }

    #[test]
    fn test_list_appends() {
        let mut v = Value::List(Vec::new());
        assert_eq!(v.render(), "[]");
        v.set("go").unwrap();
        v.set("mod").unwrap();
        v.set("py").unwrap();
        assert_eq!(v.as_list(), Some(&["go".into(), "mod".into(), "py".into()][..]));
        assert_eq!(v.render(), "[go,mod,py]");
    }
}
