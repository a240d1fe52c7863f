use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Timeframes over which the historical analyzer measures realized returns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
}

impl Timeframe {
    pub const ALL: [Timeframe; 6] = [
        Timeframe::FifteenMinutes,
        Timeframe::ThirtyMinutes,
        Timeframe::OneHour,
        Timeframe::FourHours,
        Timeframe::OneDay,
        Timeframe::SevenDays,
    ];

    pub fn duration(&self) -> chrono::Duration {
        match self {
            Timeframe::FifteenMinutes => chrono::Duration::minutes(15),
            Timeframe::ThirtyMinutes => chrono::Duration::minutes(30),
            Timeframe::OneHour => chrono::Duration::hours(1),
            Timeframe::FourHours => chrono::Duration::hours(4),
            Timeframe::OneDay => chrono::Duration::days(1),
            Timeframe::SevenDays => chrono::Duration::days(7),
        }
    }
}

/// Outcome of a rejected (or any) item over a given timeframe, produced by
/// the historical analyzer (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Outcome {
    pub source_id: String,
    pub canonical_id: String,
    pub ticker: String,
    pub timeframe: Timeframe,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub max_return: f64,
    pub drawdown: f64,
    pub volume_at_entry: u64,
    pub is_missed_opportunity: bool,
}

/// Minimum realized return over a timeframe to qualify as a "missed
/// opportunity" (spec.md §4.J step 5).
pub const MISSED_OPPORTUNITY_RETURN_THRESHOLD: f64 = 0.10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_durations_are_distinct_and_increasing() {
        let durations: Vec<_> = Timeframe::ALL.iter().map(|t| t.duration()).collect();
        for w in durations.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn serializes_with_short_names() {
        assert_eq!(
            serde_json::to_string(&Timeframe::FourHours).unwrap(),
            "\"4h\""
        );
        assert_eq!(
            serde_json::to_string(&Timeframe::SevenDays).unwrap(),
            "\"7d\""
        );
    }
}
