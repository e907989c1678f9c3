//! Splits raw command-line tokens into a command path and options.

use std::collections::BTreeMap;

/// Parsed view of the command line.
///
/// Tokens starting with `--` are options (`--name` or `--name=value`);
/// everything else is part of the command path, in order. Options listed
/// as valued when parsing also take the following token as their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    commands: Vec<String>,
    options: BTreeMap<String, Option<String>>,
}

impl Arguments {
    pub fn parse<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::parse_valued(tokens, &[])
    }

    /// Like [`Arguments::parse`], but `--name value` is accepted for every
    /// option in `valued`.
    pub fn parse_valued<I, S>(tokens: I, valued: &[&str]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = Arguments::default();
        let mut tokens = tokens.into_iter().map(Into::into);
        while let Some(token) = tokens.next() {
            if token.starts_with("--") && token.len() > 2 {
                match token.split_once('=') {
                    Some((name, value)) => {
                        args.options
                            .insert(name.to_string(), Some(value.to_string()));
                    }
                    None if valued.contains(&token.as_str()) => {
                        let value = tokens.next();
                        args.options.insert(token, value);
                    }
                    None => {
                        args.options.insert(token, None);
                    }
                }
            } else {
                args.commands.push(token);
            }
        }
        args
    }

    /// Command path tokens, in the order given.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Whether the option `name` (including the leading `--`) was given.
    #[must_use]
    pub fn option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// The value given as `--name=value`, if any.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.options.get(name).and_then(Option::as_deref)
    }

    /// Names of every option given, sorted.
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }
}
