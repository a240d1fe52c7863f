/// Pure scoring arithmetic for the classifier pipeline (spec.md §4.F step
/// 7, properties P3/P4). Kept free of I/O so the composition itself is
/// trivially deterministic and unit-testable in isolation from the
/// enrichment providers that supply its inputs.
///
/// Composition order resolves the specification's open question on
/// multiplier ordering: multipliers are applied multiplicatively to the
/// sentiment-blended base score, and the offering penalty is applied last,
/// additively, so a severe dilution event can pull an otherwise-bullish
/// item negative regardless of how the multipliers scaled it.
pub fn base_score(keyword_score: f64, sentiment_score: f64, alpha: f64) -> f64 {
    (keyword_score + alpha * sentiment_score).clamp(-1.0, 1.0)
}

pub fn composed_score(base: f64, regime_multiplier: f64, rvol_multiplier: f64, float_multiplier: f64) -> f64 {
    base * regime_multiplier * rvol_multiplier * float_multiplier
}

pub fn source_weight(composed: f64, offering_penalty: f64) -> f64 {
    (composed + offering_penalty).clamp(-1.0, 1.0)
}

/// Confidence is a separate signal from source_weight's magnitude: it
/// reflects how much corroborating enrichment data was available, not how
/// bullish/bearish the item reads (spec.md §4.F step 7). Missing price or
/// sector data reduces confidence without changing the score's sign.
pub fn confidence(has_price: bool, has_sector: bool, keyword_match_count: usize) -> f64 {
    let mut conf = 0.4;
    if has_price {
        conf += 0.3;
    }
    if has_sector {
        conf += 0.1;
    }
    conf += (keyword_match_count.min(3) as f64) * 0.05;
    conf.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_score_blends_keyword_and_sentiment() {
        let base = base_score(0.4, 0.6, 0.3);
        assert!((base - 0.58).abs() < 1e-9);
    }

    #[test]
    fn base_score_clips_at_unit_interval() {
        assert_eq!(base_score(0.9, 0.9, 1.0), 1.0);
        assert_eq!(base_score(-0.9, -0.9, 1.0), -1.0);
    }

    #[test]
    fn composed_score_is_multiplicative() {
        let composed = composed_score(0.5, 1.2, 1.1, 1.0);
        assert!((composed - 0.66).abs() < 1e-9);
    }

    #[test]
    fn offering_penalty_can_flip_sign_of_bullish_composed_score() {
        let weight = source_weight(0.1, -0.50);
        assert!(weight < 0.0);
    }

    #[test]
    fn source_weight_is_clipped() {
        assert_eq!(source_weight(1.5, 0.5), 1.0);
        assert_eq!(source_weight(-1.5, -0.5), -1.0);
    }

    #[test]
    fn confidence_increases_with_available_signal() {
        let low = confidence(false, false, 0);
        let high = confidence(true, true, 3);
        assert!(high > low);
        assert!(high <= 1.0);
    }

    #[test]
    fn same_inputs_always_produce_same_outputs() {
        // Determinism (P3): repeated calls with identical inputs must be
        // bit-for-bit identical, since composition is pure arithmetic.
        let a = composed_score(base_score(0.3, 0.2, 0.3), 1.1, 1.0, 1.2);
        let b = composed_score(base_score(0.3, 0.2, 0.3), 1.1, 1.0, 1.2);
        assert_eq!(a, b);
    }
}
