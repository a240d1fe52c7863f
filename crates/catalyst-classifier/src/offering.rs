use async_trait::async_trait;
use catalyst_models::OfferingSeverity;
use moka::future::Cache;
use regex::Regex;

use crate::error::ClassifierError;

/// Phrases that signal a dilutive offering is being discussed at all.
/// Severity itself is banded from the dilution percentage or dollar size
/// extracted from the surrounding text, not from which phrase matched
/// (spec.md §4.D). Bankruptcy-risk language like "going concern" is not a
/// dilutive-offering signal and is scored instead as a negative keyword
/// (spec.md §4.F step 2, config/keywords.toml).
const OFFERING_SIGNAL_PHRASES: &[&str] = &[
    "shelf registration",
    "registered direct offering",
    "public offering",
    "reverse stock split",
    "at-the-market",
    "dilutive financing",
];

/// Dilution/offering detector (spec.md §4.D): scans item text for phrases
/// signaling share dilution, extracts the implied size or percentage, and
/// bands the result into a severity that feeds the offering penalty.
#[async_trait]
pub trait OfferingProvider: Send + Sync {
    async fn severity(&self, ticker: &str, text: &str) -> Result<OfferingSeverity, ClassifierError>;
}

/// Size/percentage extracted from offering-related text.
pub struct OfferingSignal {
    pub size_usd: Option<f64>,
    pub dilution_pct: Option<f64>,
}

fn offering_signal_present(text: &str) -> bool {
    OFFERING_SIGNAL_PHRASES.iter().any(|phrase| {
        let escaped = regex::escape(phrase);
        Regex::new(&format!(r"(?i)\b{escaped}\b"))
            .expect("valid offering regex")
            .is_match(text)
    })
}

fn extract_dilution_percentage(text: &str) -> Option<f64> {
    const PATTERNS: &[&str] = &[
        r"(?i)dilution\s+of\s+(?:approximately|up to|about)?\s*(\d+(?:\.\d+)?)\s*%",
        r"(?i)(\d+(?:\.\d+)?)\s*%\s+dilut\w*",
    ];
    for pattern in PATTERNS {
        if let Some(caps) = Regex::new(pattern).expect("valid dilution regex").captures(text) {
            if let Some(pct) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
                return Some(pct);
            }
        }
    }
    None
}

fn extract_offering_size_usd(text: &str) -> Option<f64> {
    let pattern = r"(?i)\$\s*(\d+(?:\.\d+)?)\s*(million|billion|m|b)\b";
    let caps = Regex::new(pattern).expect("valid offering-size regex").captures(text)?;
    let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_lowercase();
    let scale = if unit.starts_with('b') { 1_000_000_000.0 } else { 1_000_000.0 };
    Some(amount * scale)
}

pub fn extract_offering_signal(text: &str) -> OfferingSignal {
    OfferingSignal {
        size_usd: extract_offering_size_usd(text),
        dilution_pct: extract_dilution_percentage(text),
    }
}

fn band_from_percentage(pct: f64) -> OfferingSeverity {
    if pct > 30.0 {
        OfferingSeverity::Extreme
    } else if pct > 15.0 {
        OfferingSeverity::Severe
    } else if pct >= 5.0 {
        OfferingSeverity::Moderate
    } else {
        OfferingSeverity::Minor
    }
}

/// Bands a signal into a severity. A stated percentage wins; failing that,
/// a stated dollar size implies at least moderate dilution; failing both,
/// bare offering language without a quantified figure is treated as minor.
pub fn band_offering_severity(signal: &OfferingSignal) -> OfferingSeverity {
    if let Some(pct) = signal.dilution_pct {
        return band_from_percentage(pct);
    }
    if signal.size_usd.is_some() {
        return OfferingSeverity::Moderate;
    }
    OfferingSeverity::Minor
}

pub fn detect_offering_severity(text: &str) -> OfferingSeverity {
    if !offering_signal_present(text) {
        return OfferingSeverity::None;
    }
    band_offering_severity(&extract_offering_signal(text))
}

/// Adjustment added to `composed` before clipping (spec.md §4.F step 6).
/// Returned as a non-positive value so the formula reads as a plain sum
/// (`composed + offering_penalty`) while still pulling the score toward
/// bearish as severity escalates.
pub fn offering_penalty(severity: OfferingSeverity) -> f64 {
    match severity {
        OfferingSeverity::None => 0.0,
        OfferingSeverity::Minor => -0.05,
        OfferingSeverity::Moderate => -0.15,
        OfferingSeverity::Severe => -0.35,
        OfferingSeverity::Extreme => -0.50,
    }
}

pub struct CachedOfferingProvider {
    cache: Cache<String, OfferingSeverity>,
}

impl CachedOfferingProvider {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            cache: Cache::builder().time_to_live(ttl).max_capacity(10_000).build(),
        }
    }
}

impl Default for CachedOfferingProvider {
    fn default() -> Self {
        Self::new(std::time::Duration::from_secs(3600))
    }
}

#[async_trait]
impl OfferingProvider for CachedOfferingProvider {
    async fn severity(&self, ticker: &str, text: &str) -> Result<OfferingSeverity, ClassifierError> {
        let key = format!("{ticker}:{text}");
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }
        let severity = detect_offering_severity(text);
        self.cache.insert(key, severity).await;
        Ok(severity)
    }
}
