//! Text folding for catalog comparisons.
//!
//! Product names arrive from the extractor as free text and frequently carry
//! the pizza size inside the name (`"Pizza grande Calabresa"`). Everything
//! here works on the folded form produced by [`normalize`], so accents and
//! case never affect a match.

use std::fmt;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Size tokens removed from product names, in folded form.
const SIZE_TOKENS: [&str; 5] = ["grande", "pequeno", "pequena", "medio", "media"];

/// Canonical size qualifier recognised inside a product name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeQualifier {
    Grande,
    Pequeno,
    Medio,
}

impl SizeQualifier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SizeQualifier::Grande => "grande",
            SizeQualifier::Pequeno => "pequeno",
            SizeQualifier::Medio => "médio",
        }
    }
}

impl fmt::Display for SizeQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Folds `text` for comparison: compatibility decomposition, combining marks
/// dropped, lower-cased, and trimmed.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    // Lower-casing can re-introduce decomposable characters (`İ` → `i̇`),
    // so marks are stripped again after folding case.
    let lowered: String = without_marks(text).flat_map(char::to_lowercase).collect();
    without_marks(&lowered).collect::<String>().trim().to_owned()
}

fn without_marks(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfkd().filter(|c| !is_combining_mark(*c))
}

/// Removes every size token from a product name and returns the folded
/// remainder with internal whitespace collapsed.
///
/// Tokens are matched as plain substrings after folding, so `"MÉDIA"` and
/// `"media"` are both removed. Only meant for product names.
#[must_use]
pub fn strip_size_qualifier(name: &str) -> String {
    let mut folded = normalize(name);
    for token in SIZE_TOKENS {
        folded = folded.replace(token, "");
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Finds the size embedded in a product name, checking `grande` first, then
/// `pequena`/`pequeno`, then `média`/`médio`.
#[must_use]
pub fn extract_size_qualifier(name: &str) -> Option<SizeQualifier> {
    let folded = normalize(name);
    if folded.contains("grande") {
        Some(SizeQualifier::Grande)
    } else if folded.contains("pequena") || folded.contains("pequeno") {
        Some(SizeQualifier::Pequeno)
    } else if folded.contains("media") || folded.contains("medio") {
        Some(SizeQualifier::Medio)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_empty_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn normalize_folds_case_and_accents() {
        assert_eq!(normalize("Médio"), "medio");
        assert_eq!(normalize("medio"), "medio");
        assert_eq!(normalize("MEDIO"), "medio");
        assert_eq!(normalize("  Açaí Pequeno "), "acai pequeno");
        assert_eq!(normalize("São João"), "sao joao");
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in [
            "Pizza GRANDE Calabresa",
            "Vila Cristina",
            "Coração de Frango à Moda",
            "İstanbul",
            "ﬁlé ½",
            "  spaced  out  ",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn strip_size_qualifier_removes_size_and_collapses_spaces() {
        assert_eq!(
            strip_size_qualifier("Pizza grande Calabresa"),
            "pizza calabresa"
        );
        assert_eq!(strip_size_qualifier("Pizza pequena Mussarela"), "pizza mussarela");
        assert_eq!(strip_size_qualifier("Pizza Média Portuguesa"), "pizza portuguesa");
        assert_eq!(strip_size_qualifier("Pizza MEDIO Frango"), "pizza frango");
    }

    #[test]
    fn strip_size_qualifier_leaves_unsized_names() {
        assert_eq!(strip_size_qualifier("Coca-Cola 2L"), "coca-cola 2l");
    }

    #[test]
    fn strip_size_qualifier_matches_substrings() {
        // Substring matching is intentional: a token glued to another word is still removed.
        assert_eq!(strip_size_qualifier("Grande Combo"), "combo");
    }

    #[test]
    fn extract_size_qualifier_finds_each_size() {
        assert_eq!(
            extract_size_qualifier("Pizza grande Calabresa"),
            Some(SizeQualifier::Grande)
        );
        assert_eq!(
            extract_size_qualifier("Pizza pequena Mussarela"),
            Some(SizeQualifier::Pequeno)
        );
        assert_eq!(
            extract_size_qualifier("Pizza Pequeno Atum"),
            Some(SizeQualifier::Pequeno)
        );
        assert_eq!(
            extract_size_qualifier("Pizza média Frango"),
            Some(SizeQualifier::Medio)
        );
        assert_eq!(extract_size_qualifier("Guaraná 2L"), None);
    }

    #[test]
    fn extract_size_qualifier_prefers_grande() {
        assert_eq!(
            extract_size_qualifier("Pizza pequena grande"),
            Some(SizeQualifier::Grande)
        );
    }

    #[test]
    fn size_qualifier_canonical_tokens() {
        assert_eq!(SizeQualifier::Grande.as_str(), "grande");
        assert_eq!(SizeQualifier::Pequeno.as_str(), "pequeno");
        assert_eq!(SizeQualifier::Medio.to_string(), "médio");
    }
}
