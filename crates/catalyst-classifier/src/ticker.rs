use std::collections::HashSet;

use regex::Regex;

/// Extracts plausible ticker symbols from a title/body snippet when the
/// feed didn't supply a `tickers_hint` (spec.md §4.F step 3). Looks for
/// parenthetical exchange-qualified forms like `(NASDAQ: XYZ)` first, then
/// falls back to bare `$XYZ` cashtags.
pub fn extract_tickers(text: &str, hint: &[String]) -> Vec<String> {
    if !hint.is_empty() {
        return dedupe_preserving_order(hint.iter().map(|t| t.to_uppercase()));
    }

    let exchange_pattern =
        Regex::new(r"(?i)\((?:NASDAQ|NYSE|NYSE American|OTC|OTCQB|OTCQX)\s*:\s*([A-Z]{1,5})\)")
            .expect("valid exchange regex");
    let cashtag_pattern = Regex::new(r"\$([A-Z]{1,5})\b").expect("valid cashtag regex");

    let mut found = Vec::new();
    for cap in exchange_pattern.captures_iter(text) {
        found.push(cap[1].to_uppercase());
    }
    if found.is_empty() {
        for cap in cashtag_pattern.captures_iter(text) {
            found.push(cap[1].to_uppercase());
        }
    }
    dedupe_preserving_order(found.into_iter())
}

fn dedupe_preserving_order(iter: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in iter {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_tickers_are_used_verbatim_uppercased() {
        let tickers = extract_tickers("irrelevant text", &["xyz".to_string()]);
        assert_eq!(tickers, vec!["XYZ".to_string()]);
    }

    #[test]
    fn extracts_exchange_qualified_ticker() {
        let tickers = extract_tickers("Acme Corp (NASDAQ: ACME) announces results", &[]);
        assert_eq!(tickers, vec!["ACME".to_string()]);
    }

    #[test]
    fn falls_back_to_cashtag_when_no_exchange_form() {
        let tickers = extract_tickers("Traders watching $XYZ after the announcement", &[]);
        assert_eq!(tickers, vec!["XYZ".to_string()]);
    }

    #[test]
    fn no_ticker_signal_returns_empty() {
        let tickers = extract_tickers("Generic market commentary with no symbols", &[]);
        assert!(tickers.is_empty());
    }

    #[test]
    fn duplicates_are_deduplicated() {
        let tickers = extract_tickers("$XYZ rallies as $XYZ volume spikes", &[]);
        assert_eq!(tickers, vec!["XYZ".to_string()]);
    }
}
