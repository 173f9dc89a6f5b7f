/// Outcome of validating one click against the sequencing cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Correct label, more to go; carries the new expected label.
    Advance(usize),
    /// Correct label and it was the last one.
    Complete,
    /// Wrong label.
    Reject,
}

/// Decide what a click on `clicked` means given `total` points in play and
/// `expected` as the next label in sequence. Pure function of its inputs.
pub fn evaluate_click(clicked: usize, total: usize, expected: usize) -> Verdict {
    if clicked != expected {
        Verdict::Reject
    } else if clicked == total {
        Verdict::Complete
    } else {
        Verdict::Advance(expected + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_label_rejects() {
        assert_eq!(evaluate_click(2, 5, 1), Verdict::Reject);
        assert_eq!(evaluate_click(5, 5, 1), Verdict::Reject);
        assert_eq!(evaluate_click(1, 5, 2), Verdict::Reject);
    }

    #[test]
    fn expected_label_advances() {
        assert_eq!(evaluate_click(1, 5, 1), Verdict::Advance(2));
        assert_eq!(evaluate_click(4, 5, 4), Verdict::Advance(5));
    }

    #[test]
    fn last_label_completes() {
        assert_eq!(evaluate_click(5, 5, 5), Verdict::Complete);
        assert_eq!(evaluate_click(1, 1, 1), Verdict::Complete);
    }

    #[test]
    fn exactly_one_verdict_per_triple() {
        // exhaustive over a small domain: verdicts partition the input space
        for total in 1..=6usize {
            for expected in 1..=total {
                for clicked in 1..=total {
                    let verdict = evaluate_click(clicked, total, expected);
                    match verdict {
                        Verdict::Advance(next) => {
                            assert_eq!(clicked, expected);
                            assert!(expected < total);
                            assert_eq!(next, expected + 1);
                        }
                        Verdict::Complete => {
                            assert_eq!(clicked, expected);
                            assert_eq!(expected, total);
                        }
                        Verdict::Reject => assert_ne!(clicked, expected),
                    }
                }
            }
        }
    }

    #[test]
    fn deterministic_for_same_arguments() {
        assert_eq!(evaluate_click(3, 7, 3), evaluate_click(3, 7, 3));
    }
}
