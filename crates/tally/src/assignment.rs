//! Assignment detection, free-text stripping and referenced names

use crate::ledger::LineValue;
use lazy_regex::regex;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};

/// Identifiers the engine gives meaning to, kept by the stripper
static ENGINE_WORDS: Lazy<BTreeSet<&'static str>> =
    Lazy::new(|| tally_expr::reserved_words().into_iter().collect());

/// What an `=` in a line means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentShape<'a> {
    /// No `=`, or nothing usable on its left
    None,
    /// `name =` with nothing on the right
    Incomplete,
    Binding { name: &'a str, rhs: &'a str },
}

impl<'a> AssignmentShape<'a> {
    /// Split `lhs = rhs` on the first `=`; the left side may not contain a colon
    pub fn detect(line: &'a str) -> Self {
        let Some(caps) = regex!(r"(?s)^([^:=]*)=(.*)$").captures(line) else {
            return AssignmentShape::None;
        };
        let name = caps.get(1).map_or("", |m| m.as_str()).trim();
        let rhs = caps.get(2).map_or("", |m| m.as_str()).trim();
        match (name.is_empty(), rhs.is_empty()) {
            (true, _) => AssignmentShape::None,
            (false, true) => AssignmentShape::Incomplete,
            (false, false) => AssignmentShape::Binding { name, rhs },
        }
    }

    /// The bound name, if this is a binding
    pub fn name(&self) -> Option<&'a str> {
        match self {
            AssignmentShape::Binding { name, .. } => Some(*name),
            _ => None,
        }
    }
}

/// Words free-text stripping must leave in place
pub struct Vocabulary<'a> {
    variables: &'a BTreeMap<String, LineValue>,
    binding: Option<&'a str>,
    currencies: &'a [String],
}

impl<'a> Vocabulary<'a> {
    pub fn new(
        variables: &'a BTreeMap<String, LineValue>,
        binding: Option<&'a str>,
        currencies: &'a [String],
    ) -> Self {
        Self {
            variables,
            binding,
            currencies,
        }
    }

    /// Whether `word` means something to the solver or the engine
    pub fn knows(&self, word: &str) -> bool {
        self.variables.contains_key(word)
            || self.binding == Some(word)
            || ENGINE_WORDS.contains(word)
            || tally_expr::function_registry().contains(word)
            || self.currencies.iter().any(|symbol| symbol == word)
    }
}

/// Remove every word the vocabulary does not know and collapse whitespace
///
/// `4 for books + 6 for bees` → `4 + 6`
pub fn strip_free_text(text: &str, vocabulary: &Vocabulary<'_>) -> String {
    let stripped = regex!(r"\b[\p{L}_][\p{L}\p{N}_]*").replace_all(text, |caps: &regex::Captures| {
        let word = &caps[0];
        if vocabulary.knows(word) {
            word.to_string()
        } else {
            String::new()
        }
    });
    regex!(r"\s+").replace_all(&stripped, " ").trim().to_string()
}

/// Variable names (including row pseudo-variables) an expression reads
pub fn referenced_names(expression: &str, variables: &BTreeMap<String, LineValue>) -> Vec<String> {
    regex!(r"\b[\p{L}_][\p{L}\p{N}_]*")
        .find_iter(expression)
        .map(|m| m.as_str())
        .filter(|word| variables.contains_key(*word))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
