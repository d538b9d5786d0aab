//! Usage text rendering.
//!
//! Pure formatting over the flag registry: the parser core never prints.
//! Callers typically render this on [`Error::Help`](crate::Error::Help) or
//! after a parse error.

use crate::{Parser, Positionals, Value};

const USAGE_COLUMN: usize = 24;

/// Render a usage message for all defined flags and the positional policy.
///
/// The mandatory-N policy shows both accepted shapes, since the arguments
/// may come before or after the flags. Flags are listed sorted by long name.
pub fn usage(parser: &Parser, bin_name: &str) -> String {
    let mut out = format!("Usage: {}", bin_name);
    let has_flags = !parser.flags().is_empty();
    match parser.positionals {
        Positionals::ArbitraryLeading => {
            out.push_str(" [pos_args...]");
            if has_flags {
                out.push_str(" [flags]");
            }
        }
        Positionals::MandatoryN(n) => {
            let placeholders: Vec<String> = (1..=n).map(|i| format!("<arg{}>", i)).collect();
            let placeholders = placeholders.join(" ");
            out.push_str(&format!(
                " {} [flags]\n   or: {} [flags] {}",
                placeholders, bin_name, placeholders
            ));
        }
        Positionals::None => {
            if has_flags {
                out.push_str(" [flags]");
            }
        }
    }
    out.push('\n');

    if has_flags {
        out.push_str("\nFlags:\n");
        for flag in parser.flags() {
            out.push_str(&flag_line(flag));
            out.push('\n');
        }
    }
    out
}

fn flag_line(flag: &crate::Flag) -> String {
    let mut line = String::from("  ");
    match flag.shorthand() {
        Some(short) => line.push_str(&format!("-{}, --{}", short, flag.long())),
        None => line.push_str(&format!("    --{}", flag.long())),
    }
    match flag.value() {
        Value::Boolean(_) => {}
        Value::Str(_) => line.push_str(" string"),
        // The trailing dots mark greedy repetition.
        Value::List(_) => line.push_str(" string..."),
    }

    if line.len() < USAGE_COLUMN {
        line.push_str(&" ".repeat(USAGE_COLUMN - line.len()));
    } else {
        line.push_str("\n    \t");
    }
    line.push_str(flag.usage());

    let default_text = flag.default_text();
    if !flag.is_boolean() && !default_text.is_empty() && default_text != "[]" && default_text != "0"
    {
        line.push_str(&format!(" (default {})", default_text));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Flag;

    fn sample() -> Parser {
        let mut p = Parser::new();
        p.define(Flag::bool("verbose", false, "verbose output").short('v'))
            .unwrap();
        p.define(Flag::list("ext", &[], "extensions to match").short('e'))
            .unwrap();
        p.define(Flag::string("out", "-", "output destination"))
            .unwrap();
        p
    }

    #[test]
    fn test_usage_none_policy() {
        let text = usage(&sample(), "prog");
        assert!(text.starts_with("Usage: prog [flags]\n"));
        assert!(text.contains("  -e, --ext string..."));
        assert!(text.contains("  -v, --verbose"));
        // No shorthand: padded to keep the long names aligned.
        assert!(text.contains("      --out string"));
        assert!(text.contains("(default -)"));
        // Booleans and empty list defaults are not repeated.
        assert!(!text.contains("(default [])"));
        assert!(!text.contains("(default false)"));
    }

    #[test]
    fn test_usage_mandatory_policy() {
        let mut p = Parser::new();
        p.require_positionals(2).unwrap();
        p.define(Flag::bool("verbose", false, "verbose output"))
            .unwrap();
        let text = usage(&p, "prog");
        assert!(text.starts_with("Usage: prog <arg1> <arg2> [flags]\n"));
        assert!(text.contains("   or: prog [flags] <arg1> <arg2>\n"));
    }

    #[test]
    fn test_usage_leading_policy() {
        let mut p = Parser::new();
        p.allow_leading_positionals().unwrap();
        let text = usage(&p, "prog");
        assert_eq!(text, "Usage: prog [pos_args...]\n");
    }
}
