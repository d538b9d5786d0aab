//! A command line parser with greedy list flags.
//!
//! Most parsers make a repeated flag collect one value per occurrence:
//! `-e a -e b -e c`. This one supports *greedy* flags, which consume every
//! following token until something flag-like interrupts them: `-e a b c`.
//!
//! This is a non-standard convention. It deviates from POSIX and GNU
//! behavior, so document it clearly for your users.
//!
//! Positional arguments are governed by one of three policies, chosen before
//! any flag is defined: none at all (the default), any number but only before
//! the first flag, or exactly N, either all before the first flag or all
//! after the last one.
//!
//! ## Example
//! ```no_run
//! use greedyopt::{Flag, Parser};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut parser = Parser::new();
//!     parser.require_positionals(1)?;
//!     parser.define(Flag::bool("verbose", false, "print every file visited").short('v'))?;
//!     parser.define(Flag::list("ext", &[], "file extensions to include").short('e'))?;
//!     parser.define(Flag::string("out", "-", "where to write results").short('o'))?;
//!
//!     match parser.parse_env() {
//!         Ok(()) => {}
//!         Err(greedyopt::Error::Help) => {
//!             print!("{}", greedyopt::help::usage(&parser, "filegrep"));
//!             std::process::exit(0);
//!         }
//!         Err(err) => return Err(err.into()),
//!     }
//!
//!     // filegrep src -e rs toml -v
//!     println!("searching {} for {:?}", parser.args()[0], parser.get_list("ext"));
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::HashMap;
use std::fmt::Display;

pub mod help;
mod value;

pub use crate::value::{Value, ValueError};

/// A single flag definition.
///
/// Built with one of the typed constructors and registered with
/// [`Parser::define`]. After parsing, the same record is readable through
/// [`Parser::lookup`] to inspect the final value and whether the user
/// supplied the flag at all.
#[derive(Debug, Clone)]
pub struct Flag {
    long: String,
    short: Option<char>,
    usage: String,
    default_text: String,
    greedy: bool,
    changed: bool,
    value: Value,
}

impl Flag {
    /// A boolean switch. Set by mention (`-v`), or explicitly with an inline
    /// value on the long form (`--verbose=false`).
    pub fn bool(long: &str, default: bool, usage: &str) -> Flag {
        Flag::with_value(long, usage, Value::Boolean(default), false)
    }

    /// A scalar string flag taking exactly one value.
    pub fn string(long: &str, default: &str, usage: &str) -> Flag {
        Flag::with_value(long, usage, Value::Str(default.to_owned()), false)
    }

    /// A greedy list flag. Invoked without an inline value it consumes every
    /// following token until interrupted by a flag or the `--` terminator.
    pub fn list(long: &str, default: &[&str], usage: &str) -> Flag {
        let items = default.iter().map(|item| (*item).to_owned()).collect();
        Flag::with_value(long, usage, Value::List(items), true)
    }

    fn with_value(long: &str, usage: &str, value: Value, greedy: bool) -> Flag {
        Flag {
            long: long.to_owned(),
            short: None,
            usage: usage.to_owned(),
            default_text: value.render(),
            greedy,
            changed: false,
            value,
        }
    }

    /// Give the flag a single-character shorthand.
    pub fn short(mut self, short: char) -> Flag {
        self.short = Some(short);
        self
    }

    /// The long name, without dashes.
    pub fn long(&self) -> &str {
        &self.long
    }

    /// The shorthand character, if any.
    pub fn shorthand(&self) -> Option<char> {
        self.short
    }

    /// The usage text given at definition time.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The rendering of the default value, for usage output.
    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    /// Whether this flag consumes tokens greedily.
    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    /// Whether this is a boolean switch.
    pub fn is_boolean(&self) -> bool {
        matches!(self.value, Value::Boolean(_))
    }

    /// True if the user supplied this flag on the command line.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// The current value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// How positional arguments are treated. Fixed before the first flag is
/// defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Positionals {
    None,
    ArbitraryLeading,
    MandatoryN(usize),
}

impl Default for Positionals {
    fn default() -> Positionals {
        Positionals::None
    }
}

/// A flag registry and parser.
///
/// Define flags and pick a positional policy, then call [`parse`][Parser::parse]
/// (or [`parse_env`][Parser::parse_env]) exactly once. Results are read back
/// through the accessors afterwards.
#[derive(Debug, Default)]
pub struct Parser {
    flags: Vec<Flag>,
    by_long: HashMap<String, usize>,
    by_short: HashMap<char, usize>,
    pub(crate) positionals: Positionals,
    parsed: bool,
    args: Vec<String>,
}

impl Parser {
    /// Create an empty parser with the default positional policy (none
    /// allowed).
    pub fn new() -> Parser {
        Parser::default()
    }

    /// Register a flag definition.
    ///
    /// Long names and shorthands must be unique across the registry.
    /// Registering the first flag locks the positional policy.
    pub fn define(&mut self, flag: Flag) -> Result<(), ConfigError> {
        if flag.long.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.by_long.contains_key(&flag.long) {
            return Err(ConfigError::DuplicateFlag(flag.long));
        }
        if let Some(short) = flag.short {
            if self.by_short.contains_key(&short) {
                return Err(ConfigError::DuplicateShorthand(short));
            }
        }
        self.insert_flag(flag);
        Ok(())
    }

    /// Accept any number of positional arguments, but only before the first
    /// flag on the command line.
    ///
    /// Mutually exclusive with [`require_positionals`][Parser::require_positionals];
    /// must be called before any flag is defined.
    pub fn allow_leading_positionals(&mut self) -> Result<(), ConfigError> {
        self.set_policy(Positionals::ArbitraryLeading)
    }

    /// Require exactly `n` positional arguments, either all before the first
    /// flag or all at the tail end after every flag and flag value.
    ///
    /// Mutually exclusive with [`allow_leading_positionals`][Parser::allow_leading_positionals];
    /// must be called before any flag is defined.
    pub fn require_positionals(&mut self, n: usize) -> Result<(), ConfigError> {
        self.set_policy(Positionals::MandatoryN(n))
    }

    fn set_policy(&mut self, policy: Positionals) -> Result<(), ConfigError> {
        if !self.flags.is_empty() {
            return Err(ConfigError::PolicyLocked);
        }
        match (self.positionals, policy) {
            (Positionals::None, _) => {}
            (Positionals::ArbitraryLeading, Positionals::ArbitraryLeading) => {}
            (Positionals::MandatoryN(_), Positionals::MandatoryN(_)) => {}
            _ => return Err(ConfigError::PolicyConflict),
        }
        log::debug!("positional mode set: {:?}", policy);
        self.positionals = policy;
        Ok(())
    }

    fn insert_flag(&mut self, flag: Flag) {
        if let Some(short) = flag.short {
            self.by_short.insert(short, self.flags.len());
        }
        self.by_long.insert(flag.long.clone(), self.flags.len());
        self.flags.push(flag);
    }

    /// Unless the user claimed the name, a hidden boolean `help` flag is
    /// registered when parsing starts, taking `-h` only if that is free too.
    fn ensure_help_flag(&mut self) {
        if self.by_long.contains_key("help") {
            return;
        }
        let mut flag = Flag::bool("help", false, "display this help message");
        if !self.by_short.contains_key(&'h') {
            flag = flag.short('h');
        }
        self.insert_flag(flag);
    }

    /// Parse the process arguments from [`std::env::args`], skipping the
    /// program name.
    pub fn parse_env(&mut self) -> Result<(), Error> {
        self.parse(std::env::args().skip(1))
    }

    /// Walk the token stream once, updating flag values and collecting
    /// positional arguments per the configured policy.
    ///
    /// Returns [`Error::Help`] when a help flag is seen; treat it as "print
    /// usage and stop", not as a failure. Any other error aborts the pass.
    ///
    /// A parser parses once: list values would accumulate across runs, so a
    /// second call fails with [`Error::AlreadyParsed`].
    pub fn parse<I>(&mut self, tokens: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        if self.parsed {
            return Err(Error::AlreadyParsed);
        }
        self.parsed = true;
        self.ensure_help_flag();

        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();

        // Leading attempt for the mandatory-N policy: commit the first N
        // tokens as the positional result only when the run of non-flag
        // tokens at the front is exactly N long.
        let mut leading: Vec<String> = Vec::new();
        let mut found_leading = false;
        let rest: &[String];
        if let Positionals::MandatoryN(n) = self.positionals {
            let run = tokens
                .iter()
                .take_while(|token| !looks_like_flag(token.as_str()))
                .count();
            if run == n {
                log::debug!("committed {} leading positional arguments", n);
                leading = tokens[..n].to_vec();
                found_leading = true;
                rest = &tokens[n..];
            } else {
                log::debug!("leading attempt abandoned: wanted {}, ran into {}", n, run);
                rest = &tokens;
            }
        } else {
            rest = &tokens;
        }

        let mut trailing: Vec<String> = Vec::new();
        let mut flags_seen = found_leading;
        let mut active: Option<usize> = None;
        let mut terminated = false;
        let mut i = 0;

        while i < rest.len() {
            let token = rest[i].as_str();
            i += 1;

            if terminated {
                trailing.push(token.to_owned());
                continue;
            }
            if token == "--" {
                log::debug!("flag interpretation stopped by terminator");
                terminated = true;
                active = None;
                continue;
            }

            if let Some(index) = active {
                if !looks_like_flag(token) {
                    let flag = &mut self.flags[index];
                    flag.changed = true;
                    let spelled = format!("--{}", flag.long);
                    set_value(flag, &spelled, token)?;
                    continue;
                }
                // A flag token interrupts the scan without being consumed
                // by it. The values appended so far stay where they are.
                log::debug!(
                    "greedy scan for --{} stopped by {:?}",
                    self.flags[index].long,
                    token
                );
                active = None;
            }

            if looks_like_flag(token) {
                flags_seen = true;
                if let Some(body) = token.strip_prefix("--") {
                    self.apply_long(body, rest, &mut i, &mut active)?;
                } else {
                    self.apply_short(token, rest, &mut i, &mut active)?;
                }
                continue;
            }

            match self.positionals {
                Positionals::ArbitraryLeading | Positionals::MandatoryN(_) if !flags_seen => {
                    leading.push(token.to_owned());
                }
                Positionals::MandatoryN(_) if !found_leading => {
                    log::debug!("buffering candidate trailing positional {:?}", token);
                    trailing.push(token.to_owned());
                }
                _ => return Err(Error::UnexpectedArgument(vec![token.to_owned()])),
            }
        }

        self.args = self.resolve_positionals(found_leading, leading, trailing)?;

        // The short help form only marks the flag; positional errors above
        // take precedence over reporting it.
        if let Some(&index) = self.by_long.get("help") {
            if self.flags[index].changed {
                return Err(Error::Help);
            }
        }
        Ok(())
    }

    /// Dispatch a `--name` or `--name=value` token. `body` is the part after
    /// the dashes.
    fn apply_long(
        &mut self,
        body: &str,
        rest: &[String],
        i: &mut usize,
        active: &mut Option<usize>,
    ) -> Result<(), Error> {
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        if name == "help" {
            return Err(Error::Help);
        }
        let spelled = format!("--{}", name);
        let index = match self.by_long.get(name) {
            Some(&index) => index,
            None => return Err(Error::UnknownFlag(spelled)),
        };
        let flag = &mut self.flags[index];
        flag.changed = true;

        if flag.is_boolean() {
            // Booleans never consume a following token.
            set_value(flag, &spelled, inline.unwrap_or("true"))?;
        } else if flag.greedy {
            match inline {
                // An inline value is a single append and never starts a scan.
                Some(value) => set_value(flag, &spelled, value)?,
                None => {
                    log::debug!("greedy scan activated for {}", spelled);
                    *active = Some(index);
                }
            }
        } else {
            match inline {
                Some(value) => set_value(flag, &spelled, value)?,
                None => {
                    let value = match take_value_token(rest, i) {
                        Some(value) => value.to_owned(),
                        None => return Err(Error::MissingArgument(spelled)),
                    };
                    set_value(flag, &spelled, &value)?;
                }
            }
        }
        Ok(())
    }

    /// Dispatch a short token: `-x=value`, a single `-x`, or a cluster
    /// `-abc`. `token` is the whole token as typed.
    fn apply_short(
        &mut self,
        token: &str,
        rest: &[String],
        i: &mut usize,
        active: &mut Option<usize>,
    ) -> Result<(), Error> {
        let body = &token[1..];

        if let Some((name, value)) = body.split_once('=') {
            let mut chars = name.chars();
            let short = match (chars.next(), chars.next()) {
                (Some(short), None) => short,
                _ => return Err(Error::UnknownFlag(token.to_owned())),
            };
            let spelled = format!("-{}", short);
            let index = match self.by_short.get(&short) {
                Some(&index) => index,
                None => return Err(Error::UnknownFlag(spelled)),
            };
            let flag = &mut self.flags[index];
            if flag.is_boolean() {
                // Rejected before the flag is touched at all.
                return Err(Error::BooleanWithValue {
                    flag: spelled,
                    value: value.to_owned(),
                });
            }
            flag.changed = true;
            set_value(flag, &spelled, value)?;
            // The inline `=` short form never starts a greedy scan.
            return Ok(());
        }

        // A cluster like -abc. Resolve and check every character before any
        // flag is mutated, so a bad cluster has no side effects.
        let shorts: Vec<char> = body.chars().collect();
        let mut indices = Vec::with_capacity(shorts.len());
        for (pos, &short) in shorts.iter().enumerate() {
            let index = match self.by_short.get(&short) {
                Some(&index) => index,
                None => return Err(Error::UnknownFlag(format!("-{}", short))),
            };
            if pos + 1 < shorts.len() && !self.flags[index].is_boolean() {
                // Value-taking flags may only close a cluster.
                return Err(Error::CombinedNonBoolean {
                    flag: format!("-{}", short),
                    cluster: token.to_owned(),
                });
            }
            indices.push(index);
        }

        // A scalar in last position reads its value from the next whole
        // token. Look it up before mutating anything.
        let last_index = indices[indices.len() - 1];
        let last_short = shorts[shorts.len() - 1];
        let mut scalar_value = None;
        let last = &self.flags[last_index];
        if !last.is_boolean() && !last.greedy {
            match take_value_token(rest, i) {
                Some(value) => scalar_value = Some(value.to_owned()),
                None => return Err(Error::MissingArgument(format!("-{}", last_short))),
            }
        }

        for (pos, &index) in indices.iter().enumerate() {
            let spelled = format!("-{}", shorts[pos]);
            let flag = &mut self.flags[index];
            flag.changed = true;
            if pos + 1 < indices.len() || flag.is_boolean() {
                set_value(flag, &spelled, "true")?;
            } else if flag.greedy {
                log::debug!("greedy scan activated for {}", spelled);
                *active = Some(index);
            } else if let Some(value) = scalar_value.take() {
                set_value(flag, &spelled, &value)?;
            }
        }
        Ok(())
    }

    /// Terminal step of the pass: reconcile the collected runs against the
    /// policy.
    fn resolve_positionals(
        &self,
        found_leading: bool,
        leading: Vec<String>,
        trailing: Vec<String>,
    ) -> Result<Vec<String>, Error> {
        match self.positionals {
            Positionals::None => {
                if !trailing.is_empty() {
                    return Err(Error::UnexpectedArgument(trailing));
                }
                Ok(Vec::new())
            }
            Positionals::ArbitraryLeading => {
                if !trailing.is_empty() {
                    return Err(Error::UnexpectedArgument(trailing));
                }
                Ok(leading)
            }
            Positionals::MandatoryN(expected) => {
                if found_leading {
                    // The leading run was committed; anything buffered after
                    // the flags is one positional too many.
                    if !trailing.is_empty() {
                        return Err(Error::UnexpectedArgument(trailing));
                    }
                    Ok(leading)
                } else if trailing.len() != expected {
                    // An abandoned leading run is not counted: the mismatch
                    // is always reported against the trailing run alone.
                    Err(Error::CountMismatch {
                        expected,
                        found: trailing,
                    })
                } else if !leading.is_empty() {
                    // A full trailing run cannot absolve stray tokens left
                    // over from an abandoned leading attempt.
                    Err(Error::UnexpectedArgument(leading))
                } else {
                    Ok(trailing)
                }
            }
        }
    }

    /// The positional arguments resolved by [`parse`][Parser::parse].
    ///
    /// Empty before a successful parse.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The number of resolved positional arguments.
    pub fn n_args(&self) -> usize {
        self.args.len()
    }

    /// Look up a flag record by long name.
    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        let &index = self.by_long.get(name)?;
        Some(&self.flags[index])
    }

    /// True if the named flag was supplied on the command line.
    pub fn changed(&self, name: &str) -> bool {
        self.lookup(name).map_or(false, Flag::changed)
    }

    /// The value of a boolean flag, or `None` if no such flag exists.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.lookup(name)?.value.as_bool()
    }

    /// The value of a string flag, or `None` if no such flag exists.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.lookup(name)?.value.as_str()
    }

    /// The collected values of a list flag, or `None` if no such flag exists.
    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.lookup(name)?.value.as_list()
    }

    /// All defined flags, sorted by long name for deterministic output.
    pub fn flags(&self) -> Vec<&Flag> {
        let mut all: Vec<&Flag> = self.flags.iter().collect();
        all.sort_by(|a, b| a.long.cmp(&b.long));
        all
    }
}

fn set_value(flag: &mut Flag, spelled: &str, token: &str) -> Result<(), Error> {
    let outcome = flag.value.set(token);
    match outcome {
        Ok(()) => Ok(()),
        Err(error) => Err(Error::InvalidValue {
            flag: spelled.to_owned(),
            error,
        }),
    }
}

/// One token of lookahead for a scalar flag's standalone value: it must
/// exist, not look like a flag, and not be the terminator. A bare `-` is a
/// valid value.
fn take_value_token<'a>(rest: &'a [String], i: &mut usize) -> Option<&'a str> {
    let next = rest.get(*i)?;
    if looks_like_flag(next) || next.as_str() == "--" {
        return None;
    }
    *i += 1;
    Some(next)
}

/// Whether a token is interpreted as a flag: it starts with `-`, is longer
/// than just the dash, and is not a negative decimal integer. The numeric
/// carve-out lets greedy and scalar flags consume literals like `-5`.
fn looks_like_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && !is_decimal_integer(token)
}

fn is_decimal_integer(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

/// An error raised while defining flags or selecting a positional policy,
/// before any token is read. These are programming mistakes, not user input
/// problems.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A flag was defined with an empty long name.
    EmptyName,
    /// A flag with this long name already exists.
    DuplicateFlag(String),
    /// A flag with this shorthand already exists.
    DuplicateShorthand(char),
    /// A different positional policy was already selected.
    PolicyConflict,
    /// The positional policy cannot change once a flag has been defined.
    PolicyLocked,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ConfigError::*;
        match self {
            EmptyName => write!(f, "flag name cannot be empty"),
            DuplicateFlag(name) => write!(f, "flag redefined: --{}", name),
            DuplicateShorthand(short) => write!(f, "flag shorthand redefined: -{}", short),
            PolicyConflict => write!(f, "cannot set multiple positional argument modes"),
            PolicyLocked => write!(
                f,
                "cannot change positional argument mode after flags have been defined"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// An error during the token pass or its finalization.
#[non_exhaustive]
pub enum Error {
    /// A help flag was seen. Not a failure: print usage and stop.
    Help,

    /// A flag was found that is not defined in the registry.
    UnknownFlag(String),

    /// A value-taking flag at the end of input, or followed by another flag.
    MissingArgument(String),

    /// A value could not be converted, e.g. a malformed boolean.
    InvalidValue {
        /// The flag as typed, with dashes.
        flag: String,
        /// The underlying conversion failure.
        error: ValueError,
    },

    /// A boolean shorthand was given an inline value, as in `-q=yes`.
    BooleanWithValue {
        /// The flag as typed, with dashes.
        flag: String,
        /// The rejected value.
        value: String,
    },

    /// A value-taking flag appeared before the end of a short cluster.
    CombinedNonBoolean {
        /// The offending flag, with dash.
        flag: String,
        /// The whole cluster token as typed.
        cluster: String,
    },

    /// Positional tokens were found where the policy does not allow them.
    /// Carries the offending tokens in their original order.
    UnexpectedArgument(Vec<String>),

    /// The mandatory-N policy found the wrong number of trailing positionals.
    CountMismatch {
        /// The configured N.
        expected: usize,
        /// The trailing tokens actually found.
        found: Vec<String>,
    },

    /// [`parse`][Parser::parse] was called a second time on the same parser.
    AlreadyParsed,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Error::*;
        match self {
            Help => write!(f, "help requested"),
            UnknownFlag(flag) => write!(f, "invalid option '{}'", flag),
            MissingArgument(flag) => write!(f, "missing argument for option '{}'", flag),
            InvalidValue { flag, error } => {
                write!(f, "invalid value for option '{}': {}", flag, error)
            }
            BooleanWithValue { flag, value } => write!(
                f,
                "boolean option '{}' does not take a value (got {:?})",
                flag, value
            ),
            CombinedNonBoolean { flag, cluster } => write!(
                f,
                "option '{}' requires a value and must come last in '{}'",
                flag, cluster
            ),
            UnexpectedArgument(tokens) if tokens.len() == 1 => {
                write!(f, "unexpected argument {:?}", tokens[0])
            }
            UnexpectedArgument(tokens) => write!(f, "unexpected arguments {:?}", tokens),
            CountMismatch { expected, found } if found.is_empty() => write!(
                f,
                "expected exactly {} positional arguments, found 0",
                expected
            ),
            CountMismatch { expected, found } => write!(
                f,
                "expected exactly {} positional arguments, found {}: {:?}",
                expected,
                found.len(),
                found
            ),
            AlreadyParsed => write!(f, "parse was already called"),
        }
    }
}

// This is printed when returning an error from main(), so defer to Display
impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidValue { error, .. } => Some(error),
            _ => None,
        }
    }
}
