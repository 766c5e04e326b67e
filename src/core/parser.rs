//! Resolves scraped price chips such as `"US$ 5.00"` into a currency and amount.
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ANY_NUMBER: Regex = Regex::new(r"[0-9,.]+").expect("Invalid regex pattern");
    static ref ANY_SYMBOL: Regex = Regex::new(r"[^0-9,.\s]+").expect("Invalid regex pattern");
}

/// Where a marker must sit for its rule to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Anywhere,
    Start,
}

/// Priority order of the fixed marker rules.
///
/// Every `XX$` marker must come before the bare `$`, which is also anchored to
/// the start of the text, or `AU$50` would resolve as `$`.
pub const MARKER_PRIORITY: &[(&str, Anchor)] = &[
    ("US$", Anchor::Anywhere),
    ("CA$", Anchor::Anywhere),
    ("HK$", Anchor::Anywhere),
    ("SGD", Anchor::Anywhere),
    ("MYR", Anchor::Anywhere),
    ("¥", Anchor::Anywhere),
    ("AU$", Anchor::Anywhere),
    ("£", Anchor::Anywhere),
    ("€", Anchor::Anywhere),
    ("NZ$", Anchor::Anywhere),
    ("PHP", Anchor::Anywhere),
    ("THB", Anchor::Anywhere),
    ("IDR", Anchor::Anywhere),
    ("TRY", Anchor::Anywhere),
    ("CLP", Anchor::Anywhere),
    ("ARS", Anchor::Anywhere),
    ("AED", Anchor::Anywhere),
    ("$", Anchor::Start),
];

/// A currency marker immediately followed (optionally after whitespace) by a number.
#[derive(Debug, Clone)]
pub struct MarkerRule {
    pub currency: String,
    pub anchor: Anchor,
    pattern: Regex,
}

impl MarkerRule {
    pub fn new(marker: &str, anchor: Anchor) -> Self {
        let prefix = match anchor {
            Anchor::Anywhere => "",
            Anchor::Start => "^",
        };
        let pattern = Regex::new(&format!(r"{prefix}{}\s*([0-9,.]+)", regex::escape(marker)))
            .expect("Escaped marker is always a valid pattern");
        Self {
            currency: marker.to_string(),
            anchor,
            pattern,
        }
    }

    fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAmount {
    pub currency: String,
    pub amount: f64,
}

/// Outcome of resolving one fragment. `NoMatch` is an ordinary result.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(ParsedAmount),
    NoMatch,
}

impl Resolution {
    pub fn into_option(self) -> Option<ParsedAmount> {
        match self {
            Resolution::Resolved(p) => Some(p),
            Resolution::NoMatch => None,
        }
    }
}

/// Strips `,` grouping separators and parses the remainder.
///
/// Runs that are not a single number (`"."`, `"1.2.3"`) yield `None`.
pub fn parse_number(run: &str) -> Option<f64> {
    let cleaned: String = run.chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
}

/// Ordered, first-match-wins resolver with a generic fallback.
#[derive(Debug, Clone)]
pub struct AmountParser {
    rules: Vec<MarkerRule>,
}

impl Default for AmountParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AmountParser {
    pub fn new() -> Self {
        let rules = MARKER_PRIORITY
            .iter()
            .map(|(marker, anchor)| MarkerRule::new(marker, *anchor))
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[MarkerRule] {
        &self.rules
    }

    pub fn resolve(&self, raw_text: &str) -> Resolution {
        let text = raw_text.trim();
        if text.is_empty() {
            return Resolution::NoMatch;
        }

        for rule in &self.rules {
            if let Some(run) = rule.capture(text) {
                return match parse_number(run) {
                    Some(amount) => Resolution::Resolved(ParsedAmount {
                        currency: rule.currency.clone(),
                        amount,
                    }),
                    None => Resolution::NoMatch,
                };
            }
        }

        self.resolve_fallback(text)
    }

    // The symbol run is searched independently of the number, so its
    // position relative to the number is not checked.
    fn resolve_fallback(&self, text: &str) -> Resolution {
        let Some(run) = ANY_NUMBER.find(text) else {
            return Resolution::NoMatch;
        };
        let Some(symbol) = ANY_SYMBOL.find(text) else {
            return Resolution::NoMatch;
        };
        match parse_number(run.as_str()) {
            Some(amount) => Resolution::Resolved(ParsedAmount {
                currency: symbol.as_str().to_string(),
                amount,
            }),
            None => Resolution::NoMatch,
        }
    }
}
