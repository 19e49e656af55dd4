//! Line normalization: comments, labels and passthrough segments

use lazy_regex::regex;

/// Labels that are commands, not free text, and survive label stripping
const RESERVED_LABELS: &[&str] = &["subtotal", "total"];

/// Remove a `# ...` comment (first `#` wins) and a trailing `// ...` comment
pub fn strip_comments(line: &str) -> &str {
    let line = match line.find('#') {
        Some(index) => &line[..index],
        None => line,
    };
    match line.find("//") {
        Some(index) => &line[..index],
        None => line,
    }
}

/// Drop a leading `label:` unless the label is `subtotal` or `total`
pub fn strip_label(line: &str) -> &str {
    match regex!(r"(?s)^([^:]*):(.*)$").captures(line) {
        Some(caps) => {
            let label = caps.get(1).map_or("", |m| m.as_str()).trim();
            if RESERVED_LABELS
                .iter()
                .any(|reserved| label.eq_ignore_ascii_case(reserved))
            {
                line
            } else {
                caps.get(2).map_or("", |m| m.as_str())
            }
        }
        None => line,
    }
}

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

/// Literal segments lifted out of a line so later passes leave them alone
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Passthrough {
    segments: Vec<String>,
}

impl Passthrough {
    /// Replace every `"..."` and `{...}` segment with a placeholder
    pub fn extract(line: &str) -> (String, Passthrough) {
        let mut segments = Vec::new();
        let shielded = regex!(r#""([^"]*)"|\{([^}]*)\}"#).replace_all(line, |caps: &regex::Captures| {
            let inner = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            segments.push(inner.to_string());
            format!("{}{}{}", PLACEHOLDER_OPEN, segments.len() - 1, PLACEHOLDER_CLOSE)
        });
        (shielded.into_owned(), Passthrough { segments })
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Put the lifted segments back, without their delimiters
    pub fn restore(&self, line: &str) -> String {
        if self.segments.is_empty() {
            return line.to_string();
        }
        regex!("\u{E000}(\\d+)\u{E001}")
            .replace_all(line, |caps: &regex::Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.segments.get(index))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_hash_comments() {
        assert_eq!(strip_comments("# Groceries"), "");
        assert_eq!(strip_comments("4 + 5 # fruit"), "4 + 5 ");
        assert_eq!(strip_comments("1 # a # b"), "1 ");
    }

    #[test]
    fn test_strip_slash_comments() {
        assert_eq!(strip_comments("12 //= 12"), "12 ");
        assert_eq!(strip_comments("10 / 2 // half"), "10 / 2 ");
        assert_eq!(strip_comments("10 / 2"), "10 / 2");
    }

    #[test]
    fn test_strip_label() {
        assert_eq!(strip_label("Quickbooks: 300"), " 300");
        assert_eq!(strip_label("books:"), "");
        assert_eq!(strip_label("no label here"), "no label here");
    }

    #[test]
    fn test_reserved_labels_survive() {
        assert_eq!(strip_label("subtotal: 5"), "subtotal: 5");
        assert_eq!(strip_label("TOTAL:"), "TOTAL:");
        assert_eq!(strip_label("grand total: 5"), " 5");
    }

    #[test]
    fn test_passthrough_round_trip() {
        let (shielded, passthrough) = Passthrough::extract(r#"4 "feet of" + {cm}"#);
        assert!(!passthrough.is_empty());
        assert!(!shielded.contains("feet"));
        assert_eq!(passthrough.restore(&shielded), "4 feet of + cm");
    }

    #[test]
    fn test_passthrough_without_segments() {
        let (shielded, passthrough) = Passthrough::extract("1 + 2");
        assert!(passthrough.is_empty());
        assert_eq!(passthrough.restore(&shielded), "1 + 2");
    }
}
