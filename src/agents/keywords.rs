//! Keyword heuristics used by the router before it falls back to the LLM.

/// Phrases that continue a previous explanation.
pub const FOLLOW_UP_KEYWORDS: &[&str] = &[
    "another example",
    "more examples",
    "go on",
    "continue",
    "make it better",
    "different way",
];

/// Words that signal a request for an explanation.
pub const TEACHING_KEYWORDS: &[&str] = &[
    "explain",
    "what is",
    "define",
    "teach",
    "simplify",
    "clarify",
    "how does",
];

/// Minimum similarity for a word to count as a teaching keyword.
pub const TEACHING_MATCH_CUTOFF: f64 = 0.8;

/// Ratcliff/Obershelp similarity: `2 * matched / (len(a) + len(b))`.
///
/// Matched characters are found by taking the longest common substring
/// (leftmost in `a`, then leftmost in `b` on ties) and recursing on both sides.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (start_a, start_b, len) = longest_common_substring(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..start_a], &b[..start_b])
        + matching_chars(&a[start_a + len..], &b[start_b + len..])
}

fn longest_common_substring(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // lengths[j + 1] = length of the common run ending at a[i], b[j]
    let mut lengths = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        let mut next = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let run = lengths[j] + 1;
                next[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        lengths = next;
    }

    best
}

/// Best candidate whose similarity to `word` reaches `cutoff`.
///
/// The ratio is taken candidate-first; with tied longest blocks the order
/// changes which blocks are matched.
pub fn closest_match<'a>(word: &str, candidates: &[&'a str], cutoff: f64) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, similarity_ratio(c, word)))
        .filter(|(_, score)| *score >= cutoff)
        .max_by(|x, y| x.1.total_cmp(&y.1))
        .map(|(c, _)| c)
}

/// Whether the (lowercased) input contains a follow-up phrase.
pub fn has_follow_up(lower_input: &str) -> bool {
    FOLLOW_UP_KEYWORDS.iter().any(|k| lower_input.contains(k))
}

/// Whether any word of the (lowercased) input is close to a teaching keyword.
pub fn has_teaching_keyword(lower_input: &str) -> bool {
    lower_input
        .split_whitespace()
        .any(|word| closest_match(word, TEACHING_KEYWORDS, TEACHING_MATCH_CUTOFF).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_similarity_ratio_basics() {
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("abc", "abc"), 1.0);
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
    }

    #[test]
    fn test_similarity_ratio_recurses_on_both_sides() {
        // "what" + "s" match: 2 * 5 / 12
        let ratio = similarity_ratio("whats", "what is");
        assert!((ratio - 10.0 / 12.0).abs() < 1e-9);
    }

    #[rstest]
    #[case("explain", true)]
    #[case("explian", true)]
    #[case("defin", true)]
    #[case("whats", true)]
    #[case("simplyfiy", true)]
    #[case("teahcwh", true)]
    #[case("defienme", true)]
    #[case("what", false)]
    #[case("how", false)]
    #[case("sad", false)]
    fn test_teaching_keyword_fuzzy_match(#[case] word: &str, #[case] expected: bool) {
        assert_eq!(has_teaching_keyword(word), expected);
    }

    #[test]
    fn test_similarity_ratio_depends_on_order_with_tied_blocks() {
        assert!(similarity_ratio("simplify", "simplyfiy") > 0.82);
        assert!(similarity_ratio("simplyfiy", "simplify") < 0.71);
    }

    #[test]
    fn test_closest_match_picks_best_score() {
        assert_eq!(
            closest_match("teach", TEACHING_KEYWORDS, TEACHING_MATCH_CUTOFF),
            Some("teach")
        );
        assert_eq!(closest_match("zzz", TEACHING_KEYWORDS, TEACHING_MATCH_CUTOFF), None);
    }

    #[test]
    fn test_follow_up_is_substring_match() {
        assert!(has_follow_up("can you give me another example please"));
        assert!(has_follow_up("please continue"));
        assert!(!has_follow_up("i feel tired"));
    }
}
