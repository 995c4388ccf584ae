//! Shell quoting and RUN-body construction.
//!
//! Every value that reaches a shell argument position goes through
//! [`quote`]. [`ShellCommand`] only accepts static fragments as unquoted
//! text, so dynamic values cannot be spliced in raw by accident.

use std::borrow::Cow;
use std::fmt;

/// Characters `shell_words::quote` leaves bare that still expand in `sh`/`bash`
/// (tilde, brace, and history expansion).
const EXPANSION_CHARS: [char; 5] = ['~', '{', '}', '!', '^'];

/// Quotes `value` for use as one shell word.
///
/// Values made only of characters with no shell meaning are returned
/// unchanged. Anything else is single-quoted, with embedded single quotes
/// written as `'\''`.
#[must_use]
pub fn quote(value: &str) -> Cow<'_, str> {
    let quoted = shell_words::quote(value);
    match quoted {
        // A borrowed result contains no single quote, so plain wrapping is safe.
        Cow::Borrowed(bare) if bare.contains(EXPANSION_CHARS) => Cow::Owned(format!("'{bare}'")),
        other => other,
    }
}

/// Escapes `\` and `$` so a build instruction's own variable substitution
/// leaves `value` untouched. For instructions whose argument is not passed
/// through a shell, such as `WORKDIR`.
#[must_use]
pub fn escape_substitution(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '$']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if matches!(c, '\\' | '$') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

/// A shell command assembled from static fragments and quoted values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    text: String,
}

impl ShellCommand {
    /// Starts a command with a static fragment.
    #[must_use]
    pub fn new(fragment: &'static str) -> Self {
        Self {
            text: fragment.to_owned(),
        }
    }

    /// Starts a command with a `NAME=value` assignment prefix.
    #[must_use]
    pub fn assign(name: &'static str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        Self {
            text: format!("{name}={}", quote(&value)),
        }
    }

    /// Wraps a caller-supplied command that is meant to be run as written.
    #[must_use]
    pub fn verbatim(command: impl Into<String>) -> Self {
        Self {
            text: command.into(),
        }
    }

    /// Appends a static fragment. Fragments starting with `;` attach without a space.
    #[must_use]
    pub fn literal(mut self, fragment: &'static str) -> Self {
        if !fragment.starts_with(';') && !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(fragment);
        self
    }

    /// Appends one quoted argument.
    #[must_use]
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(&quote(&value));
        self
    }

    /// Appends each value as its own quoted argument.
    #[must_use]
    pub fn args<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: fmt::Display,
    {
        values.into_iter().fold(self, |cmd, value| cmd.arg(value))
    }

    /// Chains `next` with `&&`.
    #[must_use]
    pub fn and(mut self, next: Self) -> Self {
        self.text.push_str(" && ");
        self.text.push_str(&next.text);
        self
    }

    /// Chains `next` with `||`.
    #[must_use]
    pub fn or(mut self, next: Self) -> Self {
        self.text.push_str(" || ");
        self.text.push_str(&next.text);
        self
    }

    /// Returns the command text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the command, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn plain_values_are_unchanged() {
        for value in ["debian", "3.11", "/home/bento/bento", "torch", "bento:bento"] {
            assert_eq!(quote(value), value);
        }
    }

    #[test]
    fn whitespace_is_quoted() {
        assert_eq!(quote("a b"), "'a b'");
    }

    #[test]
    fn single_quotes_are_escaped() {
        let quoted = quote("it's");
        assert_eq!(shell_words::split(&quoted).expect("split"), vec!["it's"]);
    }

    #[test]
    fn expansion_characters_are_quoted() {
        assert_eq!(quote("~root"), "'~root'");
        assert_eq!(quote("{a,b}"), "'{a,b}'");
    }

    #[test]
    fn empty_value_becomes_empty_word() {
        assert_eq!(shell_words::split(&quote("")).expect("split"), vec![""]);
    }

    #[test]
    fn substitution_escape_covers_dollar_and_backslash() {
        assert_eq!(escape_substitution("/srv/app"), "/srv/app");
        assert_eq!(escape_substitution("/srv/$HOME app"), "/srv/\\$HOME app");
        assert_eq!(escape_substitution(r"C:\dir"), r"C:\\dir");
    }

    #[test]
    fn command_quotes_arguments_only() {
        let cmd = ShellCommand::new("uv pip install")
            .arg("my package")
            .literal("|| true");
        assert_eq!(cmd.as_str(), "uv pip install 'my package' || true");
    }

    #[test]
    fn semicolon_fragment_attaches() {
        let cmd = ShellCommand::new("if true").literal("; then :").literal("; fi");
        assert_eq!(cmd.as_str(), "if true; then :; fi");
    }

    #[test]
    fn assign_quotes_value() {
        let cmd = ShellCommand::assign("DIR", "/a b").literal("env");
        assert_eq!(cmd.as_str(), "DIR='/a b' env");
    }

    #[test]
    fn chaining_joins_with_operators() {
        let cmd = ShellCommand::new("a")
            .and(ShellCommand::new("b"))
            .or(ShellCommand::new("c"));
        assert_eq!(cmd.to_string(), "a && b || c");
    }

    #[test]
    fn hostile_argument_stays_one_token() {
        let hostile = "x; rm -rf / #";
        let cmd = ShellCommand::new("echo").arg(hostile);
        assert_eq!(
            shell_words::split(cmd.as_str()).expect("split"),
            vec!["echo", hostile]
        );
    }

    proptest! {
        #[test]
        fn quoted_value_splits_to_itself(value in "\\PC{0,40}") {
            let quoted = quote(&value);
            let tokens = shell_words::split(&quoted).expect("quoted text must split");
            prop_assert_eq!(tokens, vec![value]);
        }

        #[test]
        fn safe_values_pass_through(value in "[A-Za-z0-9_./:@,+-]{1,30}") {
            prop_assert_eq!(quote(&value), value.as_str());
        }
    }
}
