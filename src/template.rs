//! Placeholder templating for catalog prompts.
//!
//! A placeholder is a bracketed run of uppercase letters, digits, `_`, `/`,
//! space, or `-`, like `[FEATURE_NAME]` or `[HOURS/DAYS]`. Anything else in
//! brackets is plain text. Rendering never fails: names without a usable
//! binding stay literal so the remaining gaps are visible to the user.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[A-Z0-9_/ -]+\]").expect("placeholder pattern is valid"));

/// Variable names appearing in `template`, brackets stripped, in first
/// occurrence order with duplicates removed.
pub fn extract_placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in PLACEHOLDER.find_iter(template) {
        let name = &template[token.start() + 1..token.end() - 1];
        if !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Substitute bound, non-empty variables into `template`.
///
/// One pass over the original text: every placeholder position is decided
/// independently, and inserted values are never re-scanned. A value that
/// itself contains `[OTHER]` comes through verbatim even when `OTHER` is
/// bound. Unbound or empty-bound placeholders stay literal.
pub fn render(template: &str, bindings: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |token: &regex::Captures<'_>| {
            let token = &token[0];
            let name = &token[1..token.len() - 1];
            match bindings.get(name) {
                Some(value) if !value.is_empty() => value.clone(),
                _ => token.to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extracts_in_first_occurrence_order() {
        let names = extract_placeholders("[B] then [A] then [C]");
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_extraction_dedupes_repeats() {
        let names = extract_placeholders("[X] and [Y] and [X] again");
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let template = "Draft [FEATURE_NAME] for [USER_ROLE] with [FEATURE_NAME]";
        assert_eq!(extract_placeholders(template), extract_placeholders(template));
    }

    #[test]
    fn test_extraction_allows_digits_slash_space_hyphen() {
        let names = extract_placeholders("do [STEP 2] in [HOURS/DAYS] as [CO-PILOT_1]");
        assert_eq!(names, vec!["STEP 2", "HOURS/DAYS", "CO-PILOT_1"]);
    }

    #[test]
    fn test_extraction_ignores_lowercase_and_unclosed() {
        assert!(extract_placeholders("[not a var] [Mixed] [TRAILING").is_empty());
    }

    #[test]
    fn test_extraction_of_plain_text_is_empty() {
        assert!(extract_placeholders("no placeholders here").is_empty());
        assert!(extract_placeholders("").is_empty());
    }

    #[test]
    fn test_render_substitutes_every_occurrence() {
        let out = render("[NAME] meets [NAME]", &bindings(&[("NAME", "Ada")]));
        assert_eq!(out, "Ada meets Ada");
    }

    #[test]
    fn test_render_leaves_unbound_literal() {
        let out = render(
            "Draft a story for [FEATURE_NAME] for [USER_ROLE].",
            &bindings(&[("FEATURE_NAME", "Login")]),
        );
        assert_eq!(out, "Draft a story for Login for [USER_ROLE].");
    }

    #[test]
    fn test_render_with_all_bindings() {
        let out = render(
            "Draft a story for [FEATURE_NAME] for [USER_ROLE].",
            &bindings(&[("FEATURE_NAME", "Login"), ("USER_ROLE", "Admin")]),
        );
        assert_eq!(out, "Draft a story for Login for Admin.");
        assert!(extract_placeholders(&out).is_empty());
    }

    #[test]
    fn test_render_treats_empty_binding_as_unbound() {
        let out = render("[A] [B]", &bindings(&[("A", ""), ("B", "filled")]));
        assert_eq!(out, "[A] filled");
    }

    #[test]
    fn test_render_ignores_bindings_not_in_template() {
        let out = render("[A]", &bindings(&[("A", "x"), ("GHOST", "y")]));
        assert_eq!(out, "x");
    }

    #[test]
    fn test_render_never_rescans_inserted_values() {
        // [A]'s value contains the token [B]; only the original [B] position
        // is substituted.
        let out = render("[A] [B]", &bindings(&[("A", "[B]"), ("B", "x")]));
        assert_eq!(out, "[B] x");
    }

    #[test]
    fn test_render_value_containing_own_token() {
        let out = render("[A]", &bindings(&[("A", "see [A]")]));
        assert_eq!(out, "see [A]");
    }

    #[test]
    fn test_render_is_total_on_odd_input() {
        let template = "[[DOUBLE]] ]stray[ [lower] [OK]";
        let out = render(template, &bindings(&[("DOUBLE", "d"), ("OK", "ok")]));
        assert_eq!(out, "[d] ]stray[ [lower] ok");
    }

    #[test]
    fn test_render_without_placeholders_is_identity() {
        let out = render("nothing to do", &bindings(&[("A", "x")]));
        assert_eq!(out, "nothing to do");
    }

    #[test]
    fn test_render_value_with_dollar_signs_is_verbatim() {
        let out = render("[BUDGET]", &bindings(&[("BUDGET", "$2.5M, then $1")]));
        assert_eq!(out, "$2.5M, then $1");
    }
}
