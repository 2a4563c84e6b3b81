// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query intent classification
//!
//! Decides whether a query should be answered from the symbol store, the
//! full-text index, or both. The classifier is a deterministic, ordered rule
//! table over shallow lexical features. No backend is consulted here; the
//! same query always yields the same analysis.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::config::ClassifierConfig;

/// How a query should be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Exact-name lookup against the symbol store
    Symbol,
    /// Full-text search against the chunk index
    Natural,
    /// Both backends, merged
    Hybrid,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Symbol => write!(f, "symbol"),
            Intent::Natural => write!(f, "natural"),
            Intent::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Lexical features extracted from a query before any rule runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryFeatures {
    pub word_count: usize,
    pub is_single_word: bool,
    pub has_boolean_operators: bool,
    pub looks_like_identifier: bool,
    pub contains_common_words: bool,
    pub has_special_characters: bool,
}

/// Classification outcome plus the evidence behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnalysis {
    pub query: String,
    /// Whitespace-collapsed form of the query
    pub normalized: String,
    pub intent: Intent,
    /// Heuristic confidence in [0.0, 1.0]
    pub confidence: f64,
    /// Name of the rule that decided the intent
    pub rule: &'static str,
    pub features: QueryFeatures,
}

const OPERATOR_CONFIDENCE: f64 = 0.9;
const SYMBOL_BASE: f64 = 0.5;
const SYMBOL_SINGLE_WORD_BONUS: f64 = 0.1;
const SYMBOL_IDENTIFIER_BONUS: f64 = 0.1;
const SYMBOL_NO_COMMON_BONUS: f64 = 0.2;
const SINGLE_WORD_CAP: f64 = 0.7;
const COMMON_PHRASE_CONFIDENCE: f64 = 0.8;
const HYBRID_CONFIDENCE: f64 = 0.6;
const FALLBACK_CONFIDENCE: f64 = 0.7;

/// One row of the decision table. Rules are evaluated top to bottom and the
/// first one whose predicate holds decides the intent.
struct Rule {
    name: &'static str,
    applies: fn(&QueryFeatures) -> bool,
    outcome: fn(&QueryFeatures) -> (Intent, f64),
}

static RULES: [Rule; 6] = [
    Rule {
        name: "boolean-operators",
        applies: |f| f.has_boolean_operators,
        outcome: |_| (Intent::Natural, OPERATOR_CONFIDENCE),
    },
    Rule {
        name: "single-identifier",
        applies: |f| f.is_single_word && f.looks_like_identifier && !f.contains_common_words,
        outcome: |f| {
            let mut confidence = SYMBOL_BASE;
            if f.is_single_word {
                confidence += SYMBOL_SINGLE_WORD_BONUS;
            }
            if f.looks_like_identifier {
                confidence += SYMBOL_IDENTIFIER_BONUS;
            }
            if !f.contains_common_words {
                confidence += SYMBOL_NO_COMMON_BONUS;
            }
            if f.is_single_word {
                confidence = confidence.min(SINGLE_WORD_CAP);
            }
            (Intent::Symbol, confidence)
        },
    },
    Rule {
        name: "common-phrase",
        applies: |f| f.word_count > 1 && f.contains_common_words,
        outcome: |_| (Intent::Natural, COMMON_PHRASE_CONFIDENCE),
    },
    Rule {
        name: "identifier-phrase",
        applies: |f| f.word_count > 1 && f.looks_like_identifier && !f.contains_common_words,
        outcome: |_| (Intent::Hybrid, HYBRID_CONFIDENCE),
    },
    Rule {
        name: "single-common",
        applies: |f| f.is_single_word && f.contains_common_words,
        outcome: |_| (Intent::Hybrid, HYBRID_CONFIDENCE),
    },
    Rule {
        name: "fallback",
        applies: |_| true,
        outcome: |_| (Intent::Natural, FALLBACK_CONFIDENCE),
    },
];

/// Identifier shapes the classifier recognizes: PascalCase, camelCase,
/// snake_case (a bare lowercase word counts), CONSTANT_CASE.
const DEFAULT_IDENTIFIER_PATTERNS: [&str; 4] = [
    r"^[A-Z][A-Za-z0-9]*[a-z][A-Za-z0-9]*$",
    r"^[a-z][a-z0-9]*(?:[A-Z][A-Za-z0-9]*)+$",
    r"^[a-z][a-z0-9]*(?:_[a-z0-9]+)*$",
    r"^[A-Z][A-Z0-9]*(?:_[A-Z0-9]+)*$",
];

static DEFAULT_IDENTIFIER_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    DEFAULT_IDENTIFIER_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("built-in identifier pattern"))
        .collect()
});

/// English words that signal a natural-language query rather than a symbol
/// name. Compared case-insensitively against whole query words.
const DEFAULT_COMMON_WORDS: [&str; 50] = [
    "the", "a", "an", "this", "that", "of", "in", "on", "for", "with", "from", "to", "into",
    "and", "or", "not", "is", "are", "does", "how", "what", "where", "get", "set", "find",
    "show", "add", "remove", "create", "update", "delete", "handle", "check", "use", "code",
    "function", "class", "method", "file", "line", "error", "test", "value", "name", "type",
    "data", "logic", "token", "variable", "string",
];

/// Heuristic intent classifier with injectable vocabularies.
pub struct IntentClassifier {
    common_words: HashSet<String>,
    identifier_shapes: Vec<Regex>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        IntentClassifier {
            common_words: DEFAULT_COMMON_WORDS.iter().map(|w| w.to_string()).collect(),
            identifier_shapes: DEFAULT_IDENTIFIER_SHAPES.clone(),
        }
    }

    /// Build a classifier honoring config overrides.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let mut classifier = Self::new();
        if let Some(words) = &config.common_words {
            classifier = classifier.with_common_words(words.iter().map(String::as_str));
        }
        classifier
    }

    /// Replace the common-words list.
    pub fn with_common_words<'a, I>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.common_words = words.into_iter().map(|w| w.to_lowercase()).collect();
        self
    }

    /// Replace the identifier-shape patterns.
    pub fn with_identifier_patterns(mut self, patterns: &[&str]) -> anyhow::Result<Self> {
        let mut shapes = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            shapes.push(Regex::new(pattern)?);
        }
        self.identifier_shapes = shapes;
        Ok(self)
    }

    /// Classify a query. Pure and deterministic.
    pub fn classify(&self, query: &str) -> QueryAnalysis {
        let words: Vec<&str> = query.split_whitespace().collect();
        if words.is_empty() {
            return QueryAnalysis {
                query: query.to_string(),
                normalized: String::new(),
                intent: Intent::Natural,
                confidence: 0.0,
                rule: "empty",
                features: QueryFeatures::default(),
            };
        }

        let features = self.features(query, &words);
        let rule = RULES
            .iter()
            .find(|rule| (rule.applies)(&features))
            .unwrap_or(&RULES[RULES.len() - 1]);
        let (intent, confidence) = (rule.outcome)(&features);

        QueryAnalysis {
            query: query.to_string(),
            normalized: words.join(" "),
            intent,
            confidence: confidence.clamp(0.0, 1.0),
            rule: rule.name,
            features,
        }
    }

    fn features(&self, query: &str, words: &[&str]) -> QueryFeatures {
        let word_count = words.len();
        QueryFeatures {
            word_count,
            is_single_word: word_count == 1,
            // Operators are case-sensitive: "AND" is syntax, "and" is English.
            has_boolean_operators: words.iter().any(|w| matches!(*w, "AND" | "OR" | "NOT")),
            looks_like_identifier: words.iter().any(|w| self.is_identifier_shaped(w)),
            contains_common_words: words.iter().any(|w| self.is_common_word(w)),
            has_special_characters: query
                .chars()
                .any(|c| !c.is_alphanumeric() && c != '_' && !c.is_whitespace()),
        }
    }

    fn is_identifier_shaped(&self, word: &str) -> bool {
        self.identifier_shapes.iter().any(|re| re.is_match(word))
    }

    fn is_common_word(&self, word: &str) -> bool {
        self.common_words.contains(&word.to_lowercase())
    }
}
