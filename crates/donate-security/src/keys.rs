//! Key sanitization
//!
//! Export formats embed free text in object keys ("comments: my thread",
//! "Chat History with alice"). Those keys are folded into a canonical label
//! before they are matched against the sensitive-key set or written back out.

use donate_core::{Error, Result};
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;

/// Decides whether a raw key is folded by a rule.
///
/// Every matcher tests the start of the key case-insensitively; whatever
/// follows the matched prefix is an unconstrained tail.
#[derive(Debug, Clone)]
pub enum KeyMatcher {
    /// `literal` followed by at least `min_tail` more characters
    Prefix { literal: String, min_tail: usize },
    /// One of `stems` directly followed by a colon
    Label { stems: Vec<String> },
    /// Regex anchored at the start of the key
    Pattern(Regex),
}

impl KeyMatcher {
    pub fn prefix(literal: impl Into<String>, min_tail: usize) -> Self {
        KeyMatcher::Prefix {
            literal: literal.into(),
            min_tail,
        }
    }

    pub fn label<I, S>(stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyMatcher::Label {
            stems: stems.into_iter().map(Into::into).collect(),
        }
    }

    /// Compile a user-supplied pattern; matches from the first character only
    pub fn pattern(pattern: &str) -> Result<Self> {
        RegexBuilder::new(&format!("^(?:{})", pattern))
            .case_insensitive(true)
            .build()
            .map(KeyMatcher::Pattern)
            .map_err(|e| Error::InvalidPattern(format!("{}: {}", pattern, e)))
    }

    pub fn matches(&self, raw: &str) -> bool {
        match self {
            KeyMatcher::Prefix { literal, min_tail } => strip_prefix_ignore_case(raw, literal)
                .is_some_and(|tail| tail.chars().count() >= *min_tail),
            KeyMatcher::Label { stems } => stems.iter().any(|stem| {
                strip_prefix_ignore_case(raw, stem).is_some_and(|tail| tail.starts_with(':'))
            }),
            KeyMatcher::Pattern(re) => re.is_match(raw),
        }
    }
}

/// Named matcher; a match folds the key to its title-cased label
#[derive(Debug, Clone)]
pub struct KeyRule {
    pub name: String,
    pub matcher: KeyMatcher,
}

impl KeyRule {
    pub fn new(name: impl Into<String>, matcher: KeyMatcher) -> Self {
        Self {
            name: name.into(),
            matcher,
        }
    }
}

/// Ordered rule list, first match wins
#[derive(Debug, Clone)]
pub struct KeyRules {
    rules: Vec<KeyRule>,
}

impl KeyRules {
    pub fn new(rules: Vec<KeyRule>) -> Self {
        Self { rules }
    }

    /// Rules for the free-text keys found in common export formats
    pub fn builtin() -> Self {
        Self::new(vec![
            KeyRule::new("chat_history", KeyMatcher::prefix("Chat History with ", 1)),
            KeyRule::new("comments", KeyMatcher::label(["comment", "comments"])),
            KeyRule::new("replies", KeyMatcher::label(["reply", "replies"])),
            KeyRule::new("posts", KeyMatcher::label(["post", "posts"])),
            KeyRule::new("story", KeyMatcher::label(["story"])),
        ])
    }

    /// Built-in rules followed by custom regex patterns
    pub fn with_custom(patterns: &[String]) -> Result<Self> {
        let mut rules = Self::builtin();
        for (i, pattern) in patterns.iter().enumerate() {
            rules.push(KeyRule::new(
                format!("custom_{}", i),
                KeyMatcher::pattern(pattern)?,
            ));
        }
        Ok(rules)
    }

    pub fn push(&mut self, rule: KeyRule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyRule> {
        self.rules.iter()
    }

    /// Rule that folds `raw`, if any
    pub fn matching_rule(&self, raw: &str) -> Option<&KeyRule> {
        self.rules.iter().find(|rule| rule.matcher.matches(raw))
    }

    /// Canonical form of a raw key.
    ///
    /// A key claimed by a rule becomes the text before its first colon,
    /// title-cased. Any other key only loses one trailing colon.
    pub fn sanitize<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if self.matching_rule(raw).is_some() {
            let head = raw.split_once(':').map_or(raw, |(head, _)| head);
            Cow::Owned(title_case(head))
        } else {
            Cow::Borrowed(raw.strip_suffix(':').unwrap_or(raw))
        }
    }
}

impl Default for KeyRules {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Upper-case the first letter of each whitespace-separated word and
/// lower-case the rest; whitespace is kept as is
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            word_start = true;
            out.push(c);
        } else if word_start {
            out.extend(c.to_uppercase());
            word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(raw: &str) -> String {
        KeyRules::builtin().sanitize(raw).into_owned()
    }

    #[test]
    fn test_label_rules_fold_to_title_case() {
        assert_eq!(sanitize("comments: thread1"), "Comments");
        assert_eq!(sanitize("COMMENT:x"), "Comment");
        assert_eq!(sanitize("replies: to bob"), "Replies");
        assert_eq!(sanitize("Reply:"), "Reply");
        assert_eq!(sanitize("posts:2021"), "Posts");
        assert_eq!(sanitize("Story:"), "Story");
    }

    #[test]
    fn test_label_requires_colon() {
        // Bare labels are regular keys so platform sets can name them
        assert_eq!(sanitize("comments"), "comments");
        assert_eq!(sanitize("posts"), "posts");
        assert_eq!(sanitize("storyline: x"), "storyline: x");
    }

    #[test]
    fn test_chat_history_prefix() {
        assert_eq!(
            sanitize("Chat History with alice SMITH"),
            "Chat History With Alice Smith"
        );
        assert_eq!(sanitize("chat history with bob: 2020"), "Chat History With Bob");
        // Needs at least one character after the prefix
        assert_eq!(sanitize("Chat History with "), "Chat History with ");
    }

    #[test]
    fn test_unmatched_keys_lose_one_trailing_colon() {
        assert_eq!(sanitize("username"), "username");
        assert_eq!(sanitize("Date:"), "Date");
        assert_eq!(sanitize("Date::"), "Date:");
        assert_eq!(sanitize("Mixed Case"), "Mixed Case");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_sanitize_is_not_idempotent() {
        let once = sanitize("note::");
        let twice = sanitize(&once);
        assert_eq!(once, "note:");
        assert_eq!(twice, "note");
    }

    #[test]
    fn test_first_match_wins() {
        let mut rules = KeyRules::new(vec![KeyRule::new(
            "first",
            KeyMatcher::prefix("com", 0),
        )]);
        rules.push(KeyRule::new("second", KeyMatcher::label(["comments"])));

        let rule = rules.matching_rule("comments: x").unwrap();
        assert_eq!(rule.name, "first");
    }

    #[test]
    fn test_non_ascii_keys_do_not_panic() {
        assert_eq!(sanitize("čomments: x"), "čomments: x");
        assert_eq!(sanitize("コメント:"), "コメント");
    }

    #[test]
    fn test_custom_pattern_is_anchored() {
        let rules = KeyRules::with_custom(&["messages? from .+".to_string()]).unwrap();
        assert_eq!(rules.sanitize("Messages from carol: jan"), "Messages From Carol");
        assert_eq!(rules.sanitize("old messages from carol"), "old messages from carol");
    }

    #[test]
    fn test_invalid_custom_pattern() {
        let err = KeyRules::with_custom(&["(unclosed".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }

    #[test]
    fn test_title_case_keeps_whitespace() {
        assert_eq!(title_case("hello  wORLD\tagain"), "Hello  World\tAgain");
    }
}
