/// Union of two space-separated class lists.
///
/// Tokens keep their first-seen order (`a` before `b`), duplicates and empty
/// tokens are dropped, and the result is joined with single spaces.
pub fn merge_class_names(a: Option<&str>, b: Option<&str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    for token in a
        .unwrap_or_default()
        .split_whitespace()
        .chain(b.unwrap_or_default().split_whitespace())
    {
        if !out.contains(&token) {
            out.push(token);
        }
    }
    out.join(" ")
}

/// Like [`merge_class_names`] but `None` when nothing is left.
pub(crate) fn merge_optional(a: Option<&str>, b: Option<&str>) -> Option<String> {
    let merged = merge_class_names(a, b);
    (!merged.is_empty()).then_some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overlapping() {
        assert_eq!(merge_class_names(Some("a b"), Some("b c")), "a b c");
    }

    #[test]
    fn test_merge_missing_side() {
        assert_eq!(merge_class_names(None, Some("x")), "x");
        assert_eq!(merge_class_names(Some("x"), None), "x");
        assert_eq!(merge_class_names(None, None), "");
    }

    #[test]
    fn test_merge_collapses_whitespace() {
        assert_eq!(
            merge_class_names(Some("  row\tselected "), Some("exiting\n row")),
            "row selected exiting"
        );
    }

    #[test]
    fn test_merge_optional_empty() {
        assert_eq!(merge_optional(Some("   "), None), None);
        assert_eq!(merge_optional(None, Some("exit")), Some("exit".to_string()));
    }
}
