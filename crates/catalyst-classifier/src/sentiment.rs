use vader_sentiment::SentimentIntensityAnalyzer;

/// Pluggable sentiment scorer. Returns a compound score in [-1, 1]
/// (spec.md §4.F step 2).
pub trait SentimentAnalyzer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

/// Lexicon-based VADER sentiment, the default analyzer.
pub struct VaderSentimentAnalyzer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderSentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderSentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer for VaderSentimentAnalyzer {
    fn score(&self, text: &str) -> f64 {
        let scores = self.analyzer.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(0.0).clamp(-1.0, 1.0)
    }
}

/// Identity analyzer used when `sentiment_enabled = false`: always reports
/// neutral so the rest of the pipeline stays well-defined without
/// fabricating a signal.
pub struct NullSentimentAnalyzer;

impl SentimentAnalyzer for NullSentimentAnalyzer {
    fn score(&self, _text: &str) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_analyzer_is_always_neutral() {
        let analyzer = NullSentimentAnalyzer;
        assert_eq!(analyzer.score("This is terrible news"), 0.0);
        assert_eq!(analyzer.score("This is wonderful news"), 0.0);
    }

    #[test]
    fn vader_distinguishes_positive_from_negative() {
        let analyzer = VaderSentimentAnalyzer::new();
        let positive = analyzer.score("The drug trial was a tremendous success");
        let negative = analyzer.score("The drug trial was a catastrophic failure");
        assert!(positive > negative);
    }

    #[test]
    fn vader_score_stays_within_unit_interval() {
        let analyzer = VaderSentimentAnalyzer::new();
        let score = analyzer.score("amazing incredible fantastic wonderful great");
        assert!((-1.0..=1.0).contains(&score));
    }
}
