pub mod analyzer;
pub mod error;
pub mod loader;
pub mod mining;
pub mod outcomes;
pub mod recommend;
pub mod stats;

pub use analyzer::Analyzer;
pub use error::AnalyzerError;
pub use loader::load_rejected_within_window;
pub use mining::{mine_phrases, PhraseStats};
pub use outcomes::compute_outcomes;
pub use recommend::recommend_for_phrase;
pub use stats::{benjamini_hochberg, bootstrap_ci, proportion_z_test};
