//! Matching spoken transcripts against target words.

use serde::{Deserialize, Serialize};

/// Result of comparing a transcript to the word the learner tried to say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PronunciationResult {
    /// Whether the target was heard in the transcript.
    pub is_correct: bool,
    /// Similarity between transcript and target, 0.0 to 1.0. Shown as a hint
    /// when the attempt missed.
    pub similarity: f64,
    pub heard: String,
    pub target: String,
}

/// Lowercase, trim and collapse inner whitespace.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether the normalized transcript contains the normalized target.
/// An empty target never matches.
pub fn transcript_matches(transcript: &str, target: &str) -> bool {
    let target = normalize(target);
    !target.is_empty() && normalize(transcript).contains(&target)
}

pub fn compare_pronunciation(transcript: &str, target: &str) -> PronunciationResult {
    let heard = normalize(transcript);
    let wanted = normalize(target);
    let is_correct = transcript_matches(transcript, target);
    PronunciationResult {
        is_correct,
        similarity: if is_correct {
            1.0
        } else {
            normalized_similarity(&heard, &wanted)
        },
        heard,
        target: wanted,
    }
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (m, n) = (a_chars.len(), b_chars.len());

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Similarity in `[0, 1]` from the edit distance over character counts.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_match_is_case_and_space_insensitive() {
        assert!(transcript_matches("  The ANCHOR is down ", "anchor"));
        assert!(transcript_matches("sun   glasses", "Sun Glasses"));
        assert!(!transcript_matches("anchors away", "harbor"));
    }

    #[test]
    fn empty_target_never_matches() {
        assert!(!transcript_matches("anything", "   "));
        assert!(!transcript_matches("", ""));
    }

    #[test]
    fn miss_reports_similarity() {
        let result = compare_pronunciation("ankor", "Anchor");
        assert!(!result.is_correct);
        assert_eq!(result.target, "anchor");
        assert!(result.similarity > 0.5 && result.similarity < 1.0);

        let hit = compare_pronunciation("anchor", "anchor");
        assert_eq!(hit.similarity, 1.0);
    }

    #[test]
    fn levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("çapa", "capa"), 1);
    }
}
