//! Correctness scoring

/// Lenient containment check of the ground truth inside the extracted answer
///
/// Both sides are trimmed and lower-cased; an empty side never scores.
/// Containment rather than equality is the scoring policy: "the answer is 42"
/// counts for ground truth "42".
pub fn is_correct(extracted: &str, ground_truth: &str) -> bool {
    let extracted = extracted.trim();
    let ground_truth = ground_truth.trim();
    if extracted.is_empty() || ground_truth.is_empty() {
        return false;
    }
    extracted
        .to_lowercase()
        .contains(&ground_truth.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containment() {
        assert!(is_correct("the answer is 42", "42"));
        assert!(is_correct("PARIS", " paris "));
        assert!(!is_correct("42", "420"));
    }

    #[test]
    fn test_empty_sides_never_score() {
        assert!(!is_correct("", "42"));
        assert!(!is_correct("42", "   "));
        assert!(!is_correct("  \n", ""));
    }
}
