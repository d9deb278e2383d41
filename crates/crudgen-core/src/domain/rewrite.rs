//! Rewrite rules for the convention patcher.
//!
//! Rules are regex based. Each rule carries a witness: a sample the pattern
//! must match, and whose rewritten form the pattern must no longer match.
//! A [`RuleSet`] additionally runs twice over all of its witnesses at
//! construction, and [`RuleSet::apply_checked`] repeats that check on every
//! file, so a set whose rules feed each other is rejected.
//!
//! Application order for one file:
//!
//! 1. One line-by-line pass over `line-drop` and `field-declaration-rewrite`
//!    rules. A dropped line is never offered to a rewrite. A dropped line
//!    that leaves a `{` open also drops the following lines up to the
//!    matching `}`. Line terminators of kept lines are preserved
//!    byte-for-byte.
//! 2. `call-site-rewrite` and `global-substitution` rules, in declaration
//!    order, over the whole resulting text.

use std::borrow::Cow;
use std::collections::HashSet;

use regex::Regex;

use crate::domain::{error::DomainError, value_objects::RuleKind};

/// Name of the built-in rule set.
pub const EXPECTED_MESSAGE: &str = "expected-message";

#[derive(Debug, Clone)]
pub struct RewriteRule {
    name: String,
    kind: RuleKind,
    pattern: Regex,
    replacement: String,
    witness: String,
}

impl RewriteRule {
    /// Compile and validate a rule against its witness.
    ///
    /// `replacement` uses `regex` expansion syntax (`${indent}`); it is
    /// ignored for `line-drop` rules.
    pub fn new(
        name: impl Into<String>,
        kind: RuleKind,
        pattern: &str,
        replacement: impl Into<String>,
        witness: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let invalid = |reason: String| DomainError::InvalidRule {
            rule: name.clone(),
            reason,
        };

        if name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "rule name" });
        }
        let pattern = Regex::new(pattern).map_err(|e| invalid(e.to_string()))?;
        let replacement = match kind {
            RuleKind::LineDrop => String::new(),
            _ => replacement.into(),
        };

        let rule = Self {
            name: name.clone(),
            kind,
            pattern,
            replacement,
            witness: witness.into(),
        };

        if !rule.pattern.is_match(&rule.witness) {
            return Err(invalid(format!(
                "witness '{}' does not match the pattern",
                rule.witness
            )));
        }
        let output = rule.apply_alone(&rule.witness);
        if rule.pattern.is_match(&output) {
            return Err(DomainError::NonIdempotentRule { rule: name, output });
        }

        Ok(rule)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn witness(&self) -> &str {
        &self.witness
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Replace every occurrence, returning the new text and the match count.
    fn replace<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let count = self.pattern.find_iter(text).count();
        if count == 0 {
            return (Cow::Borrowed(text), 0);
        }
        (
            self.pattern.replace_all(text, self.replacement.as_str()),
            count,
        )
    }

    /// Effect of this rule on `text` as if it were the only rule.
    fn apply_alone(&self, text: &str) -> String {
        match self.kind {
            RuleKind::LineDrop => line_pass(text, &[self], &[]).0,
            RuleKind::FieldDeclarationRewrite => line_pass(text, &[], &[self]).0,
            _ => self.replace(text).0.into_owned(),
        }
    }
}

/// Result of applying a rule set to one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub content: String,
    /// Dropped lines plus replaced occurrences.
    pub applied: usize,
}

impl PatchOutcome {
    pub fn changed(&self, original: &str) -> bool {
        self.content != original
    }
}

/// An ordered, validated list of rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    rules: Vec<RewriteRule>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>, rules: Vec<RewriteRule>) -> Result<Self, DomainError> {
        let name = name.into();
        if rules.is_empty() {
            return Err(DomainError::InvalidRule {
                rule: name,
                reason: "rule set has no rules".into(),
            });
        }
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name()) {
                return Err(DomainError::InvalidRule {
                    rule: rule.name().to_string(),
                    reason: format!("declared twice in rule set '{name}'"),
                });
            }
        }

        let set = Self { name, rules };
        set.apply_checked(&set.witnesses())?;
        Ok(set)
    }

    /// Look up a built-in rule set by name.
    pub fn builtin(name: &str) -> Result<Self, DomainError> {
        match name {
            EXPECTED_MESSAGE => Self::expected_message(),
            other => Err(DomainError::UnknownRuleSet(other.to_string())),
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &[EXPECTED_MESSAGE]
    }

    /// Migrates controller tests from the map-shaped `expectedBody` field to
    /// the typed `expectedMessage string` field, and switches mock contexts
    /// to `mock.Anything`.
    pub fn expected_message() -> Result<Self, DomainError> {
        Self::new(
            EXPECTED_MESSAGE,
            vec![
                RewriteRule::new(
                    "expected-body-field",
                    RuleKind::FieldDeclarationRewrite,
                    r"^(?P<indent>\s*)expectedBody\s+map\[string\](?:interface\{\}|any|string)",
                    "${indent}expectedMessage string",
                    "\t\texpectedBody   map[string]interface{}",
                )?,
                RewriteRule::new(
                    "expected-body-literal",
                    RuleKind::LineDrop,
                    r"expectedBody:\s*map\[string\]",
                    "",
                    "\t\t\texpectedBody: map[string]interface{}{\"message\": \"ok\"},",
                )?,
                RewriteRule::new(
                    "expected-body-call-site",
                    RuleKind::CallSiteRewrite,
                    r#"tt\.expectedBody\["message"\]"#,
                    "tt.expectedMessage",
                    r#"assert.Equal(t, tt.expectedBody["message"], body["message"])"#,
                )?,
                RewriteRule::new(
                    "background-context",
                    RuleKind::GlobalSubstitution,
                    r"context\.Background\(\)",
                    "mock.Anything",
                    r#"m.On("List", context.Background()).Return(nil, nil)"#,
                )?,
            ],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, text: &str) -> PatchOutcome {
        let (drops, rewrites): (Vec<_>, Vec<_>) = self
            .rules
            .iter()
            .filter(|r| r.kind().is_line_scoped())
            .partition(|r| r.kind() == RuleKind::LineDrop);

        let (mut content, mut applied) = line_pass(text, &drops, &rewrites);

        for rule in self.rules.iter().filter(|r| !r.kind().is_line_scoped()) {
            let (next, count) = rule.replace(&content);
            if count > 0 {
                applied += count;
                content = next.into_owned();
            }
        }

        PatchOutcome { content, applied }
    }

    /// Apply the set and confirm a second pass is a no-op.
    ///
    /// Fails with [`DomainError::NonIdempotentRule`] naming the first line the
    /// second pass would still rewrite.
    pub fn apply_checked(&self, text: &str) -> Result<PatchOutcome, DomainError> {
        let once = self.apply(text);
        let twice = self.apply(&once.content);
        if twice.changed(&once.content) {
            return Err(DomainError::NonIdempotentRule {
                rule: self.name.clone(),
                output: first_unstable_line(&once.content, &twice.content).to_string(),
            });
        }
        Ok(once)
    }

    /// Every rule's witness on its own line.
    fn witnesses(&self) -> String {
        self.rules
            .iter()
            .map(|r| format!("{}\n", r.witness()))
            .collect()
    }
}

/// Drops and line-scoped rewrites, one line at a time.
fn line_pass(text: &str, drops: &[&RewriteRule], rewrites: &[&RewriteRule]) -> (String, usize) {
    let mut applied = 0;
    let mut content = String::with_capacity(text.len());
    // Braces still open from a dropped line whose literal continues below.
    let mut open = 0;

    for line in text.split_inclusive('\n') {
        let (body, terminator) = split_terminator(line);
        if open > 0 {
            open += brace_balance(body);
            applied += 1;
            continue;
        }
        if drops.iter().any(|r| r.is_match(body)) {
            open = brace_balance(body).max(0);
            applied += 1;
            continue;
        }
        let mut current = Cow::Borrowed(body);
        for rule in rewrites {
            let (next, count) = rule.replace(&current);
            if count > 0 {
                applied += count;
                current = Cow::Owned(next.into_owned());
            }
        }
        content.push_str(&current);
        content.push_str(terminator);
    }
    (content, applied)
}

/// Net `{` minus `}` on one line of Go, ignoring string and rune literals
/// and line comments.
fn brace_balance(line: &str) -> i32 {
    let mut depth = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev = '\0';

    for c in line.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' && q != '`' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '/' if prev == '/' => break,
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        prev = c;
    }
    depth
}

fn first_unstable_line<'a>(once: &'a str, twice: &str) -> &'a str {
    once.lines()
        .zip(twice.lines())
        .find(|(a, b)| a != b)
        .map(|(a, _)| a)
        .or_else(|| once.lines().nth(twice.lines().count()))
        .unwrap_or_default()
}

/// Split a line into its body and its `\n` / `\r\n` terminator.
fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, &line[body.len()..])
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, &line[body.len()..])
    } else {
        (line, "")
    }
}
