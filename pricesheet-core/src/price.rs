//! Price-label parsing.
//!
//! Operators type prices by hand, so the field mixes currency markers,
//! unit suffixes, ranges and statuses: "$1,200", "850元", "3.5-4kg
//! 12000", "售完". [`parse`] turns any of these into a comparable
//! amount without ever failing.

use regex::Regex;
use std::sync::OnceLock;

fn dollar_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$(\d+(?:\.\d+)?)").expect("valid regex"))
}

fn yuan_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)元").expect("valid regex"))
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid regex"))
}

/// Parse a human-entered price string into an amount.
///
/// Commas and surrounding whitespace are stripped first. A
/// `$`-marked number wins over everything else, then a `元`-suffixed
/// number, then the maximum of all bare numeric tokens. Compound
/// strings mixing a size figure with a price ("3.5-4kg 12000") are
/// resolved by assuming the price is the larger number; a string
/// carrying two real prices resolves to the larger one as well,
/// which is a documented limitation of this heuristic.
///
/// Returns 0.0 when no amount can be derived (sold-out text, empty
/// input). That sentinel is only distinguishable from a true zero
/// price by convention; [`has_amount`] tells the two apart while the
/// raw text is still at hand.
pub fn parse(text: &str) -> f64 {
    let cleaned = text.trim().replace(',', "");
    if let Some(c) = dollar_re().captures(&cleaned)
        && let Ok(v) = c[1].parse::<f64>()
    {
        return v;
    }
    if let Some(c) = yuan_re().captures(&cleaned)
        && let Ok(v) = c[1].parse::<f64>()
    {
        return v;
    }
    let mut best: Option<f64> = None;
    for m in number_re().find_iter(&cleaned) {
        if let Ok(v) = m.as_str().parse::<f64>() {
            best = Some(match best {
                Some(b) => b.max(v),
                None => v,
            });
        }
    }
    // Amounts are non-negative; an all-negative token set collapses
    // to the sentinel.
    best.map_or(0.0, |v| v.max(0.0))
}

/// Whether the text contains any numeric token at all. Text without
/// one ("售完", "sold out") denotes an out-of-stock status rather
/// than an amount.
pub fn has_amount(text: &str) -> bool {
    number_re().is_match(&text.replace(',', ""))
}
