//! Similarity matching for unrecognized command names.
//!
//! Uses the Ratcliff/Obershelp ratio: twice the number of matching
//! characters divided by the total length of both strings, where matches are
//! found by taking the longest common block and recursing on either side.

/// Minimum ratio a candidate needs to be suggested.
pub const FUZZY_CUTOFF: f64 = 0.7;

/// Similarity of `a` and `b` in `[0.0, 1.0]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Best candidate whose similarity to `word` is at least `cutoff`.
///
/// Comparison is case-insensitive on `word`. Equal scores go to the
/// lexicographically greatest candidate.
pub fn closest_match<'a, I>(word: &str, choices: I, cutoff: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let word = word.to_lowercase();
    let mut best: Option<(f64, &'a str)> = None;
    for candidate in choices {
        // The ratio is not symmetric; the candidate goes first.
        let score = similarity(candidate, &word);
        if score < cutoff {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_score, best_name)) => {
                score > best_score || (score == best_score && candidate > best_name)
            },
        };
        if better {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, name)| name)
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (start_a, start_b, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..start_a], &b[..start_b])
        + matching_chars(&a[start_a + len..], &b[start_b + len..])
}

/// Longest common contiguous block as `(start_in_a, start_in_b, len)`.
///
/// The earliest block in `a` wins ties, then the earliest in `b`.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // prev[j + 1] = length of the common suffix of a[..i] and b[..=j].
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            let len = curr[j + 1];
            if len > best.2 {
                best = (i + 1 - len, j + 1 - len, len);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHOICES: [&str; 8] = ["load", "quote", "ta", "help", "home", "quit", "reset", "about"];

    #[test]
    fn identical_is_one() {
        assert_eq!(similarity("load", "load"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn disjoint_is_zero() {
        assert_eq!(similarity("zzzz", "load"), 0.0);
    }

    #[test]
    fn transposition_ratio() {
        // "lo" + "d" match: 2 * 3 / 8.
        assert!((similarity("loda", "load") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn near_miss_is_suggested() {
        assert_eq!(closest_match("loda", CHOICES, FUZZY_CUTOFF), Some("load"));
        assert_eq!(closest_match("quotes", CHOICES, FUZZY_CUTOFF), Some("quote"));
    }

    #[test]
    fn candidate_is_the_first_sequence() {
        assert_eq!(similarity("load", "ldod"), 0.75);
        assert_eq!(similarity("ldod", "load"), 0.5);
        assert_eq!(closest_match("ldod", CHOICES, FUZZY_CUTOFF), Some("load"));
        assert_eq!(closest_match("qtut", CHOICES, FUZZY_CUTOFF), Some("quit"));
    }

    #[test]
    fn case_insensitive_input() {
        assert_eq!(closest_match("LOAD", CHOICES, FUZZY_CUTOFF), Some("load"));
    }

    #[test]
    fn far_miss_is_none() {
        assert_eq!(closest_match("zzzzzz", CHOICES, FUZZY_CUTOFF), None);
    }

    #[test]
    fn tie_prefers_greatest_name() {
        // "hxme" is 0.75 from both "home" and "hame".
        assert_eq!(closest_match("hxme", ["home", "hame"], FUZZY_CUTOFF), Some("home"));
        assert_eq!(closest_match("hxme", ["hame", "home"], FUZZY_CUTOFF), Some("home"));
    }
}
