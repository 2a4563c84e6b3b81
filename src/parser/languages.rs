// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grammar registry

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tree_sitter::Language;

/// Compiled grammars keyed by canonical language name.
pub static LANGUAGES: Lazy<HashMap<&'static str, Language>> = Lazy::new(|| {
    HashMap::from([
        (
            "typescript",
            Language::from(tree_sitter_typescript::LANGUAGE_TYPESCRIPT),
        ),
        ("javascript", Language::from(tree_sitter_javascript::LANGUAGE)),
        ("python", Language::from(tree_sitter_python::LANGUAGE)),
        ("rust", Language::from(tree_sitter_rust::LANGUAGE)),
        ("go", Language::from(tree_sitter_go::LANGUAGE)),
        ("java", Language::from(tree_sitter_java::LANGUAGE)),
        ("c", Language::from(tree_sitter_c::LANGUAGE)),
        ("cpp", Language::from(tree_sitter_cpp::LANGUAGE)),
    ])
});

/// Sorted list of supported language names.
pub fn supported() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = LANGUAGES.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_holds_every_supported_language() {
        let names = supported();
        assert_eq!(
            names,
            vec!["c", "cpp", "go", "java", "javascript", "python", "rust", "typescript"]
        );
        for name in names {
            assert!(LANGUAGES.contains_key(name));
        }
    }
}
