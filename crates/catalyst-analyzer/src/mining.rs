use std::collections::{HashMap, HashSet};

const MIN_GRAM: usize = 1;
const MAX_GRAM: usize = 4;
pub const MIN_OCCURRENCES: u64 = 5;
pub const MIN_LIFT: f64 = 2.0;

/// Candidate phrase extracted from titles, with its occurrence statistics
/// split between items that turned out to be missed opportunities and
/// items that didn't (spec.md §4.J step 3).
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseStats {
    pub phrase: String,
    pub occurrences: u64,
    pub missed_occurrences: u64,
    pub lift: f64,
}

fn tokenize(title: &str) -> Vec<String> {
    title
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn ngrams(tokens: &[String]) -> HashSet<String> {
    let mut grams = HashSet::new();
    for n in MIN_GRAM..=MAX_GRAM {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            grams.insert(window.join(" "));
        }
    }
    grams
}

/// Mines 1-4 gram phrases from a set of titles, each flagged as whether it
/// led to a missed opportunity, and computes lift = P(phrase | missed) /
/// P(phrase | not missed). Phrases below `MIN_OCCURRENCES` or `MIN_LIFT`
/// are dropped.
pub fn mine_phrases(titled_outcomes: &[(&str, bool)]) -> Vec<PhraseStats> {
    let missed_total = titled_outcomes.iter().filter(|(_, missed)| *missed).count().max(1) as f64;
    let not_missed_total = titled_outcomes.iter().filter(|(_, missed)| !*missed).count().max(1) as f64;

    let mut counts: HashMap<String, (u64, u64)> = HashMap::new();
    for (title, missed) in titled_outcomes {
        let tokens = tokenize(title);
        for phrase in ngrams(&tokens) {
            let entry = counts.entry(phrase).or_insert((0, 0));
            if *missed {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }

    let mut results = Vec::new();
    for (phrase, (missed_count, not_missed_count)) in counts {
        let occurrences = missed_count + not_missed_count;
        if occurrences < MIN_OCCURRENCES {
            continue;
        }
        let p_missed = missed_count as f64 / missed_total;
        let p_not_missed = (not_missed_count as f64 / not_missed_total).max(1e-9);
        let lift = p_missed / p_not_missed;
        if lift < MIN_LIFT {
            continue;
        }
        results.push(PhraseStats {
            phrase,
            occurrences,
            missed_occurrences: missed_count,
            lift,
        });
    }
    results.sort_by(|a, b| b.lift.partial_cmp(&a.lift).unwrap());
    results
}
