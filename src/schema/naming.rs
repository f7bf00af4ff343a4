//! Bidirectional transforms between record field names and column names.
//!
//! Field names are expected in `camelCase`. Each strategy is a pair of pure
//! functions; round trips are exact only for names the strategy was built for
//! (`PascalCase` cannot recover a word boundary that was never there).

use std::fmt::Debug;

/// Maps a field name to the column name written in the header, and back.
pub trait NamingStrategy: Debug + Send + Sync {
    /// Field name to column name.
    fn to_column_name(&self, field_name: &str) -> String;

    /// Column name to field name.
    fn to_field_name(&self, column_name: &str) -> String;

    /// Swaps the two directions.
    fn reversed(self) -> Reversed<Self>
    where
        Self: Sized,
    {
        Reversed(self)
    }
}

impl<S: NamingStrategy + ?Sized> NamingStrategy for Box<S> {
    fn to_column_name(&self, field_name: &str) -> String {
        (**self).to_column_name(field_name)
    }

    fn to_field_name(&self, column_name: &str) -> String {
        (**self).to_field_name(column_name)
    }
}

impl<S: NamingStrategy + ?Sized> NamingStrategy for std::sync::Arc<S> {
    fn to_column_name(&self, field_name: &str) -> String {
        (**self).to_column_name(field_name)
    }

    fn to_field_name(&self, column_name: &str) -> String {
        (**self).to_field_name(column_name)
    }
}

/// Column names are the field names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl NamingStrategy for Identity {
    fn to_column_name(&self, field_name: &str) -> String {
        field_name.to_string()
    }

    fn to_field_name(&self, column_name: &str) -> String {
        column_name.to_string()
    }
}

/// `fooBarBaz` <-> `foo_bar_baz`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnakeCase;

impl NamingStrategy for SnakeCase {
    fn to_column_name(&self, field_name: &str) -> String {
        split_on_upper(field_name, '_')
    }

    fn to_field_name(&self, column_name: &str) -> String {
        join_on_separator(column_name, '_')
    }
}

/// `fooBarBaz` <-> `foo-bar-baz`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KebabCase;

impl NamingStrategy for KebabCase {
    fn to_column_name(&self, field_name: &str) -> String {
        split_on_upper(field_name, '-')
    }

    fn to_field_name(&self, column_name: &str) -> String {
        join_on_separator(column_name, '-')
    }
}

/// `fooBarBaz` <-> `FooBarBaz`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PascalCase;

impl NamingStrategy for PascalCase {
    fn to_column_name(&self, field_name: &str) -> String {
        map_first(field_name, |c| c.to_uppercase().collect())
    }

    fn to_field_name(&self, column_name: &str) -> String {
        map_first(column_name, |c| c.to_lowercase().collect())
    }
}

/// `fooBarBaz` <-> `Foo Bar Baz`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TitleCaseWords;

impl NamingStrategy for TitleCaseWords {
    fn to_column_name(&self, field_name: &str) -> String {
        let words: Vec<String> = words(field_name).iter().map(|w| capitalize(w)).collect();
        words.join(" ")
    }

    fn to_field_name(&self, column_name: &str) -> String {
        camelize(column_name)
    }
}

/// `fooBarBaz` <-> `Foo bar baz`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentenceCaseWords;

impl NamingStrategy for SentenceCaseWords {
    fn to_column_name(&self, field_name: &str) -> String {
        capitalize(&words(field_name).join(" "))
    }

    fn to_field_name(&self, column_name: &str) -> String {
        camelize(column_name)
    }
}

/// `fooBarBaz` <-> `foo bar baz`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LowercaseWords;

impl NamingStrategy for LowercaseWords {
    fn to_column_name(&self, field_name: &str) -> String {
        words(field_name).join(" ")
    }

    fn to_field_name(&self, column_name: &str) -> String {
        camelize(column_name)
    }
}

/// `fooBarBaz` <-> `FOO BAR BAZ`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UppercaseWords;

impl NamingStrategy for UppercaseWords {
    fn to_column_name(&self, field_name: &str) -> String {
        words(field_name).join(" ").to_uppercase()
    }

    fn to_field_name(&self, column_name: &str) -> String {
        camelize(column_name)
    }
}

/// A strategy with its two directions swapped. See [`NamingStrategy::reversed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reversed<S>(pub S);

impl<S: NamingStrategy> NamingStrategy for Reversed<S> {
    fn to_column_name(&self, field_name: &str) -> String {
        self.0.to_field_name(field_name)
    }

    fn to_field_name(&self, column_name: &str) -> String {
        self.0.to_column_name(column_name)
    }
}

/// Applies strategies in order towards column names and in reverse order back.
///
/// ```
/// use dsvkit::naming::{Composite, KebabCase, NamingStrategy, SnakeCase};
///
/// let strategy = Composite::new()
///     .then(KebabCase.reversed())
///     .then(SnakeCase);
/// assert_eq!(strategy.to_column_name("foo-bar-baz"), "foo_bar_baz");
/// assert_eq!(strategy.to_field_name("foo_bar_baz"), "foo-bar-baz");
/// ```
#[derive(Debug, Default)]
pub struct Composite {
    strategies: Vec<Box<dyn NamingStrategy>>,
}

impl Composite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a strategy to the chain.
    pub fn then<S: NamingStrategy + 'static>(mut self, strategy: S) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }
}

impl From<Vec<Box<dyn NamingStrategy>>> for Composite {
    fn from(strategies: Vec<Box<dyn NamingStrategy>>) -> Self {
        Composite { strategies }
    }
}

impl NamingStrategy for Composite {
    fn to_column_name(&self, field_name: &str) -> String {
        self.strategies
            .iter()
            .fold(field_name.to_string(), |name, s| s.to_column_name(&name))
    }

    fn to_field_name(&self, column_name: &str) -> String {
        self.strategies
            .iter()
            .rev()
            .fold(column_name.to_string(), |name, s| s.to_field_name(&name))
    }
}

/// Replaces every ASCII uppercase letter with `separator` and its lowercase form.
fn split_on_upper(name: &str, separator: char) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push(separator);
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Replaces every `separator` followed by an ASCII lowercase letter with that letter uppercased.
fn join_on_separator(name: &str, separator: char) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == separator && next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// Splits a camelCase name into lowercase words at each uppercase letter.
fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Lowercases space-separated words and joins them as camelCase.
fn camelize(column_name: &str) -> String {
    let mut out = String::with_capacity(column_name.len());
    for (i, word) in column_name.split_whitespace().enumerate() {
        let word = word.to_lowercase();
        if i == 0 {
            out.push_str(&word);
        } else {
            out.push_str(&capitalize(&word));
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    map_first(word, |c| c.to_uppercase().collect())
}

fn map_first(s: &str, f: impl FnOnce(char) -> String) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => f(first) + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(strategy: &dyn NamingStrategy, field_name: &str, column_name: &str) {
        assert_eq!(strategy.to_column_name(field_name), column_name);
        assert_eq!(strategy.to_field_name(column_name), field_name);
    }

    #[test]
    fn test_identity() {
        check(&Identity, "fooBarBaz", "fooBarBaz");
    }

    #[test]
    fn test_snake_case() {
        check(&SnakeCase, "fooBarBaz", "foo_bar_baz");
    }

    #[test]
    fn test_kebab_case() {
        check(&KebabCase, "fooBarBaz", "foo-bar-baz");
    }

    #[test]
    fn test_pascal_case() {
        check(&PascalCase, "fooBarBaz", "FooBarBaz");
    }

    #[test]
    fn test_title_case_words() {
        check(&TitleCaseWords, "fooBarBaz", "Foo Bar Baz");
    }

    #[test]
    fn test_sentence_case_words() {
        check(&SentenceCaseWords, "fooBarBaz", "Foo bar baz");
    }

    #[test]
    fn test_lowercase_words() {
        check(&LowercaseWords, "fooBarBaz", "foo bar baz");
    }

    #[test]
    fn test_uppercase_words() {
        check(&UppercaseWords, "fooBarBaz", "FOO BAR BAZ");
    }

    #[test]
    fn test_reversed() {
        check(&SnakeCase.reversed(), "foo_bar_baz", "fooBarBaz");
    }

    #[test]
    fn test_composite() {
        let strategy = Composite::new().then(KebabCase.reversed()).then(SnakeCase);
        check(&strategy, "foo-bar-baz", "foo_bar_baz");
    }

    #[test]
    fn test_empty_composite_is_identity() {
        check(&Composite::new(), "fooBar", "fooBar");
    }

    #[test]
    fn test_single_word() {
        check(&SnakeCase, "id", "id");
        check(&TitleCaseWords, "id", "Id");
        check(&UppercaseWords, "id", "ID");
    }

    #[test]
    fn test_pascal_is_lossy_for_unsplit_names() {
        assert_eq!(PascalCase.to_field_name("URL"), "uRL");
    }
}
