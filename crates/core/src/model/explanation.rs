/// One fragment of a command's explanation, e.g. `-r: recurse into directories`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationItem {
    pub key: Option<String>,
    pub text: String,
}

/// Split an explanation into displayable items.
///
/// Parts are separated by `,` or the full-width `，`. A part containing `:`
/// becomes a keyed item (option name and its meaning).
#[must_use]
pub fn parse_explanation(explanation: &str) -> Vec<ExplanationItem> {
    explanation
        .split([',', '，'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once(':') {
            Some((key, value)) => ExplanationItem {
                key: Some(key.trim().to_string()),
                text: value.trim().to_string(),
            },
            None => ExplanationItem {
                key: None,
                text: part.to_string(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_keyed_and_plain_parts() {
        let items = parse_explanation("-l: long format, -a: include hidden，sorted by name");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].key.as_deref(), Some("-l"));
        assert_eq!(items[0].text, "long format");
        assert_eq!(items[1].key.as_deref(), Some("-a"));
        assert_eq!(items[2].key, None);
        assert_eq!(items[2].text, "sorted by name");
    }

    #[test]
    fn value_keeps_later_colons() {
        let items = parse_explanation("-p: host:port");
        assert_eq!(items[0].text, "host:port");
    }

    #[test]
    fn empty_explanation_yields_nothing() {
        assert!(parse_explanation("").is_empty());
        assert!(parse_explanation(" , ").is_empty());
    }
}
