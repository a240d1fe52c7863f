use serde::{Deserialize, Serialize};

/// Primary reason a `RawItem`/`ScoredItem` was rejected. Every rejection
/// carries exactly one of these (spec.md §4.G); secondary reasons may be
/// attached separately by the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    NoTicker,
    NoPrice,
    PriceOutOfBand,
    BelowMinScore,
    BelowMinConfidence,
    Stale,
    Duplicate,
    ClassifierError,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::NoTicker => "no_ticker",
            RejectionReason::NoPrice => "no_price",
            RejectionReason::PriceOutOfBand => "price_out_of_band",
            RejectionReason::BelowMinScore => "below_min_score",
            RejectionReason::BelowMinConfidence => "below_min_confidence",
            RejectionReason::Stale => "stale",
            RejectionReason::Duplicate => "duplicate",
            RejectionReason::ClassifierError => "classifier_error",
        }
    }
}
