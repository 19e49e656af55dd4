//! Numeric shorthand rewrites
//!
//! Each pass is a named, ordered regex substitution. Order matters: later
//! passes see the output of earlier ones, and all of them run before free
//! text is stripped (they consume words such as `of` and `as`).

use lazy_regex::regex;
use std::borrow::Cow;
use tally_expr::format_number;

/// Output of the shorthand passes
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    pub text: String,
    /// A `N as a % of M` ratio was produced; display it as a percentage
    pub percent: bool,
}

/// Run every pass in order
pub fn rewrite(line: &str) -> Rewritten {
    let text = expand_suffixes(line);
    let text = percent_of(&text);
    let text = percent_increase(&text);
    let text = percent_decrease(&text);
    let (text, percent) = as_percent_of(&text);
    tracing::trace!(input = line, output = %text, "shorthand rewritten");
    Rewritten {
        text: text.into_owned(),
        percent,
    }
}

fn number(text: &str) -> f64 {
    text.parse().unwrap_or(0.0)
}

/// `4k` → `4*1000`, `4M` → `4*1000000`
pub fn expand_suffixes(line: &str) -> String {
    let line = regex!(r"\b(\d+(?:\.\d+)?)k\b").replace_all(line, "${1}*1000");
    regex!(r"\b(\d+(?:\.\d+)?)M\b")
        .replace_all(&line, "${1}*1000000")
        .into_owned()
}

/// `20% of 50` → `10`
pub fn percent_of(line: &str) -> Cow<'_, str> {
    regex!(r"(?i)(\d+(?:\.\d+)?)\s*%\s*of\s+(\d+(?:\.\d+)?)").replace_all(
        line,
        |caps: &regex::Captures| format_number(number(&caps[1]) / 100.0 * number(&caps[2])),
    )
}

/// `10 + 10%` → `10 * (1 + 10/100)`
pub fn percent_increase(line: &str) -> Cow<'_, str> {
    apply_until_stable(
        line,
        regex!(r"([\w).%])\s*\+\s*(\d+(?:\.\d+)?)\s*%"),
        "${1} * (1 + ${2}/100)",
    )
}

/// `10 - 10%` → `10 * (1 - 10/100)`
pub fn percent_decrease(line: &str) -> Cow<'_, str> {
    apply_until_stable(
        line,
        regex!(r"([\w).%])\s*-\s*(\d+(?:\.\d+)?)\s*%"),
        "${1} * (1 - ${2}/100)",
    )
}

/// `5 as a % of 20` → `0.25`; the flag reports whether it fired
pub fn as_percent_of(line: &str) -> (Cow<'_, str>, bool) {
    let pattern = regex!(r"(?i)(\d+(?:\.\d+)?)\s+as\s+(?:an?\s+)?%\s*of\s+(\d+(?:\.\d+)?)");
    let fired = pattern.is_match(line);
    let text = pattern.replace_all(line, |caps: &regex::Captures| {
        let whole = number(&caps[2]);
        if whole == 0.0 {
            // Leave a division the engine will reject with a proper message
            format!("{}/0", &caps[1])
        } else {
            format_number(number(&caps[1]) / whole)
        }
    });
    (text, fired)
}

/// Replace repeatedly; a chained `+ 5% + 10%` needs the first rewrite's
/// closing parenthesis as the second one's left operand
fn apply_until_stable<'a>(line: &'a str, pattern: &regex::Regex, replacement: &str) -> Cow<'a, str> {
    let mut text = Cow::Borrowed(line);
    while pattern.is_match(&text) {
        let next = pattern.replace_all(&text, replacement).into_owned();
        text = Cow::Owned(next);
    }
    text
}
