//! Command-line parsing for slash-command envelopes.
//!
//! Some transports deliver a command name and argument list as explicit
//! fields; others only mark the envelope as command-shaped and leave the
//! raw text to us. [`parse_command_line`] covers the second case, turning
//! `/kick "some user" spam` into a [`CommandInvocation`] with shell-style
//! argument splitting.

/// A parsed slash-command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Command name, lowercased, without the leading slash.
    pub name: String,
    /// Arguments after the command name, quote-aware.
    pub args: Vec<String>,
}

/// Parses a command-shaped text line.
///
/// Returns `None` unless the text starts with `/` followed by a command
/// name. The name is lowercased; everything after it is split with
/// [`shell_split`].
pub fn parse_command_line(text: &str) -> Option<CommandInvocation> {
    let trimmed = text.trim_start();
    let rest = trimmed.strip_prefix('/')?;

    let mut tokens = shell_split(rest);
    if tokens.is_empty() {
        return None;
    }

    let name = tokens.remove(0).to_lowercase();
    if name.is_empty() {
        return None;
    }

    Some(CommandInvocation { name, args: tokens })
}

/// Normalizes an explicit command-name field from an envelope.
///
/// Strips an optional leading slash and lowercases, so `/Ping` and `ping`
/// register under the same name.
pub fn normalize_command_name(name: &str) -> String {
    name.trim().trim_start_matches('/').to_lowercase()
}

/// Simple shell-like argument splitting.
///
/// Handles:
/// - Space/tab-separated arguments
/// - Quoted strings (single and double quotes)
/// - Backslash escapes within double quotes
pub fn shell_split(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut escape_next = false;

    for ch in input.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_double_quote => {
                escape_next = true;
            }
            '\'' if !in_double_quote => {
                in_single_quote = !in_single_quote;
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
            }
            ' ' | '\t' if !in_single_quote && !in_double_quote => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_simple() {
        assert_eq!(shell_split("kick spammer now"), vec![
            "kick", "spammer", "now"
        ]);
    }

    #[test]
    fn split_double_quoted() {
        assert_eq!(shell_split(r#"echo "hello world" test"#), vec![
            "echo",
            "hello world",
            "test"
        ]);
    }

    #[test]
    fn split_single_quoted() {
        assert_eq!(shell_split("echo 'hello world'"), vec![
            "echo",
            "hello world"
        ]);
    }

    #[test]
    fn split_escapes_inside_double_quotes() {
        assert_eq!(shell_split(r#"say "a \"b\" c""#), vec![
            "say",
            r#"a "b" c"#
        ]);
    }

    #[test]
    fn split_empty_and_whitespace() {
        assert!(shell_split("").is_empty());
        assert!(shell_split("   \t ").is_empty());
    }

    #[test]
    fn parse_basic_command() {
        let inv = parse_command_line("/ping").unwrap();
        assert_eq!(inv.name, "ping");
        assert!(inv.args.is_empty());
    }

    #[test]
    fn parse_command_with_args() {
        let inv = parse_command_line(r#"/kick "some user" spam"#).unwrap();
        assert_eq!(inv.name, "kick");
        assert_eq!(inv.args, vec!["some user", "spam"]);
    }

    #[test]
    fn parse_lowercases_name() {
        let inv = parse_command_line("/Ping now").unwrap();
        assert_eq!(inv.name, "ping");
        assert_eq!(inv.args, vec!["now"]);
    }

    #[test]
    fn parse_rejects_non_commands() {
        assert!(parse_command_line("hello /ping").is_none());
        assert!(parse_command_line("/").is_none());
        assert!(parse_command_line("").is_none());
    }

    #[test]
    fn normalize_strips_slash_and_case() {
        assert_eq!(normalize_command_name("/Ping"), "ping");
        assert_eq!(normalize_command_name("ping"), "ping");
        assert_eq!(normalize_command_name(" /BAN "), "ban");
    }
}
