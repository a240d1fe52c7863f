use rand::seq::SliceRandom;
use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal};

const BOOTSTRAP_RESAMPLES: usize = 10_000;

/// Two-proportion z-test comparing a phrase's success rate against the
/// baseline success rate, returning a one-sided p-value for "phrase's
/// success rate is higher" (spec.md §4.J step 4, mandated to use a
/// statistics library rather than hand-rolled numerics).
pub fn proportion_z_test(successes: u64, trials: u64, baseline_rate: f64) -> Result<f64, String> {
    if trials == 0 {
        return Err("cannot run a proportion test with zero trials".to_string());
    }
    let observed_rate = successes as f64 / trials as f64;
    let variance = baseline_rate * (1.0 - baseline_rate) / trials as f64;
    if variance <= 0.0 {
        return Err("degenerate baseline rate for z-test".to_string());
    }
    let z = (observed_rate - baseline_rate) / variance.sqrt();
    let normal = Normal::new(0.0, 1.0).map_err(|e| e.to_string())?;
    Ok(1.0 - normal.cdf(z))
}

/// Benjamini-Hochberg false-discovery-rate correction. Returns the
/// indices (into the original `p_values` slice) that remain significant
/// at the given `alpha`, e.g. 0.05 (spec.md §4.J step 4).
pub fn benjamini_hochberg(p_values: &[f64], alpha: f64) -> Vec<usize> {
    let m = p_values.len();
    if m == 0 {
        return Vec::new();
    }
    let mut indexed: Vec<(usize, f64)> = p_values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

    let mut largest_rank_significant = None;
    for (rank, (_, p)) in indexed.iter().enumerate() {
        let threshold = ((rank + 1) as f64 / m as f64) * alpha;
        if *p <= threshold {
            largest_rank_significant = Some(rank);
        }
    }

    match largest_rank_significant {
        Some(cutoff_rank) => indexed[..=cutoff_rank].iter().map(|(i, _)| *i).collect(),
        None => Vec::new(),
    }
}

/// Bootstrap confidence interval for the mean of `samples`, resampling
/// with replacement `BOOTSTRAP_RESAMPLES` times (spec.md §4.J step 4).
/// Returns `(lower, upper)` at the given confidence level, e.g. 0.95.
pub fn bootstrap_ci(samples: &[f64], confidence: f64, rng: &mut impl Rng) -> Result<(f64, f64), String> {
    if samples.is_empty() {
        return Err("cannot bootstrap an empty sample".to_string());
    }
    let mut means = Vec::with_capacity(BOOTSTRAP_RESAMPLES);
    for _ in 0..BOOTSTRAP_RESAMPLES {
        let resample: f64 = (0..samples.len())
            .map(|_| *samples.choose(rng).unwrap())
            .sum::<f64>()
            / samples.len() as f64;
        means.push(resample);
    }
    means.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let alpha = 1.0 - confidence;
    let lower_idx = ((alpha / 2.0) * means.len() as f64).floor() as usize;
    let upper_idx = ((1.0 - alpha / 2.0) * means.len() as f64).ceil() as usize - 1;
    Ok((means[lower_idx], means[upper_idx.min(means.len() - 1)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn higher_success_rate_yields_small_p_value() {
        let p = proportion_z_test(90, 100, 0.5).unwrap();
        assert!(p < 0.01);
    }

    #[test]
    fn rate_matching_baseline_yields_large_p_value() {
        let p = proportion_z_test(50, 100, 0.5).unwrap();
        assert!(p > 0.4);
    }

    #[test]
    fn zero_trials_is_an_error() {
        assert!(proportion_z_test(0, 0, 0.5).is_err());
    }

    #[test]
    fn benjamini_hochberg_keeps_strongly_significant_and_drops_weak() {
        let p_values = vec![0.001, 0.20, 0.50, 0.002];
        let kept = benjamini_hochberg(&p_values, 0.05);
        assert!(kept.contains(&0));
        assert!(kept.contains(&3));
        assert!(!kept.contains(&2));
    }

    #[test]
    fn benjamini_hochberg_with_all_large_p_values_keeps_none() {
        let p_values = vec![0.9, 0.8, 0.95];
        assert!(benjamini_hochberg(&p_values, 0.05).is_empty());
    }

    #[test]
    fn bootstrap_ci_brackets_the_sample_mean() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let (lower, upper) = bootstrap_ci(&samples, 0.95, &mut rng).unwrap();
        assert!(lower <= 3.0);
        assert!(upper >= 3.0);
    }

    #[test]
    fn bootstrap_ci_on_empty_samples_is_an_error() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        assert!(bootstrap_ci(&[], 0.95, &mut rng).is_err());
    }
}
