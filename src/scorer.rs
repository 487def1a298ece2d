/*!
Speech accuracy scoring.

Compares a recognized utterance against the prompt the patient was asked to
read, word by word. Near-miss words earn partial credit through their edit
distance, and a length mismatch between the two scales the result down by at
most half.
*/

use log::debug;
use rayon::prelude::*;
use unicode_general_category::{get_general_category, GeneralCategory};

use crate::config::ScorerConfig;

/// Prompts offered by the articulation exercises.
pub const PROMPTS: &[&str] = &[
    "The quick brown fox jumps over the lazy dog.",
    "I saw Susie sitting in a shoeshine shop.",
    "Flo rode a boat to the shore.",
    "Irish wristwatch, Swiss wristwatch.",
    "Joe throws a stone to the cove.",
    "She sells seashells by the seashore.",
    "How can a clam cram in a clean cream can?",
    "Peter Piper picked a peck of pickled peppers.",
    "Bo knows the golden rose.",
    "Fuzzy Wuzzy was a bear. Fuzzy Wuzzy had no hair.",
    "Red lorry, yellow lorry.",
    "Joe rode a slow boat home.",
    "Unique New York, unique New York, you need unique New York.",
    "Betty bought a bit of butter, but the butter was bitter.",
];

/// Unicode punctuation, general categories Pc, Pd, Ps, Pe, Pi, Pf and Po.
/// Symbols such as `$` or `+` are kept.
fn is_punctuation(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
    )
}

/// Lowercase, drop punctuation and trim surrounding whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !is_punctuation(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Levenshtein distance over characters, unit cost per insertion, deletion and substitution.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a = a.chars().collect::<Vec<char>>();
    let b = b.chars().collect::<Vec<char>>();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev = (0..=b.len()).collect::<Vec<usize>>();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `1 - distance / longer length`. Two empty words are identical.
pub fn word_similarity(a: &str, b: &str) -> f32 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }

    1.0 - edit_distance(a, b) as f32 / longest as f32
}

#[derive(Debug, Default, Clone)]
pub struct Scorer {
    config: ScorerConfig,
}

impl Scorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Credit for one aligned word pair, in whole words.
    ///
    /// Partial credit is truncated to whole percent, never rounded up.
    fn word_credit(&self, spoken: &str, expected: &str) -> f32 {
        if spoken == expected {
            return 1.0;
        }

        let similarity = word_similarity(spoken, expected);
        if similarity > self.config.similarity_threshold {
            (similarity * 100.0).floor() / 100.0
        } else {
            0.0
        }
    }

    /// Accuracy of `spoken` against `expected` as a percentage in `[0, 100]`.
    pub fn score(&self, spoken: &str, expected: &str) -> f32 {
        let spoken = normalize(spoken);
        let expected = normalize(expected);

        let spoken_words = spoken.split_whitespace().collect::<Vec<&str>>();
        let expected_words = expected.split_whitespace().collect::<Vec<&str>>();

        if spoken_words.is_empty() || expected_words.is_empty() {
            debug!("Nothing to compare, scoring 0");
            return 0.0;
        }

        let credit = spoken_words
            .iter()
            .zip(expected_words.iter())
            .map(|(s, e)| self.word_credit(s, e))
            .sum::<f32>();

        let word_accuracy = credit / expected_words.len() as f32 * 100.0;

        let length_diff = spoken_words.len().abs_diff(expected_words.len()) as f32;
        let length_penalty = 1.0
            - length_diff / expected_words.len().max(1) as f32 * self.config.length_penalty_weight;

        let accuracy =
            (word_accuracy * length_penalty.max(self.config.min_length_multiplier)).max(0.0);

        debug!(
            "Scored {} spoken against {} expected words: credit {credit}, accuracy {accuracy}",
            spoken_words.len(),
            expected_words.len()
        );

        accuracy
    }

    /// Score many `(spoken, expected)` pairs in parallel. Output order matches input order.
    pub fn score_batch<S, E>(&self, pairs: &[(S, E)]) -> Vec<f32>
    where
        S: AsRef<str> + Sync,
        E: AsRef<str> + Sync,
    {
        pairs
            .par_iter()
            .map(|(spoken, expected)| self.score(spoken.as_ref(), expected.as_ref()))
            .collect()
    }
}
