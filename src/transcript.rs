//! Protocol transcripts and the parity-consistency verifier.
//!
//! A transcript holds one [`Round`] per color. Each round carries three bit
//! strings (parties s, t, u), one bit per color. Within a round, at color c:
//!
//! - c = 0: exactly one party holds a 1 (`sum == 1`).
//! - previous sum 0: the sum must be even.
//! - previous sum 2: the sum must be odd.
//! - previous sum 1: unconstrained.
//!
//! The `prev_sum == 1` case is intentionally left open and must not be
//! tightened without a protocol change.

use log::debug;

use crate::error::TranscriptError;

/// One bit per color for a single party in a single round.
pub type BitString = Vec<u8>;

/// Number of cooperating parties.
pub const PARTIES: usize = 3;

/// The three parties' bit strings for one round.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Round {
    pub s: BitString,
    pub t: BitString,
    pub u: BitString,
}

impl Round {
    pub fn new(s: BitString, t: BitString, u: BitString) -> Self {
        Round { s, t, u }
    }

    /// Bit string of party 0 (s), 1 (t) or 2 (u).
    pub fn party(&self, index: usize) -> &BitString {
        match index {
            0 => &self.s,
            1 => &self.t,
            2 => &self.u,
            _ => panic!("party index {} out of range", index),
        }
    }

    /// s[c] + t[c] + u[c]. Panics if any bit string is shorter than `color + 1`.
    pub fn color_sum(&self, color: usize) -> u8 {
        self.s[color] + self.t[color] + self.u[color]
    }
}

/// Where and why a transcript failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub round: usize,
    pub color: usize,
    pub sum_now: u8,
    /// Sum at `color - 1`, `None` for the color-0 check.
    pub prev_sum: Option<u8>,
}

fn color_passes(sum_now: u8, prev_sum: Option<u8>) -> bool {
    match prev_sum {
        None => sum_now == 1,
        Some(0) => sum_now % 2 == 0,
        Some(2) => sum_now % 2 == 1,
        Some(_) => true,
    }
}

fn scan(rounds: &[Round], number_of_colors: usize) -> Option<Violation> {
    for (r, round) in rounds.iter().enumerate().take(number_of_colors) {
        let mut prev_sum = None;
        for color in 0..number_of_colors {
            let sum_now = round.color_sum(color);
            if !color_passes(sum_now, prev_sum) {
                return Some(Violation {
                    round: r,
                    color,
                    sum_now,
                    prev_sum,
                });
            }
            prev_sum = Some(sum_now);
        }
    }
    None
}

/// Check the first `number_of_colors` rounds over `number_of_colors` colors.
///
/// Performs no shape validation: a transcript with fewer rounds or shorter bit
/// strings than `number_of_colors` panics with an index-out-of-bounds error.
/// Use [`Transcript`] for a checked alternative.
pub fn verify(rounds: &[Round], number_of_colors: usize) -> bool {
    // Index every required round so a short transcript fails loudly.
    let rounds = &rounds[..number_of_colors];
    let violation = scan(rounds, number_of_colors);
    debug!("verify over {} colors: {:?}", number_of_colors, violation);
    violation.is_none()
}

/// A transcript whose shape has been checked against `number_of_colors`.
///
/// Round count and bit-string length are both tied to the one
/// `number_of_colors` value stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    rounds: Vec<Round>,
    number_of_colors: usize,
}

impl Transcript {
    pub fn new(rounds: Vec<Round>, number_of_colors: usize) -> Result<Self, TranscriptError> {
        if number_of_colors == 0 {
            return Err(TranscriptError::NoColors);
        }
        if rounds.len() < number_of_colors {
            return Err(TranscriptError::TooFewRounds {
                expected: number_of_colors,
                found: rounds.len(),
            });
        }
        for (r, round) in rounds.iter().enumerate().take(number_of_colors) {
            for party in 0..PARTIES {
                let bits = round.party(party);
                if bits.len() < number_of_colors {
                    return Err(TranscriptError::BitStringTooShort {
                        round: r,
                        party,
                        expected: number_of_colors,
                        found: bits.len(),
                    });
                }
                if let Some((color, &value)) = bits.iter().enumerate().find(|(_, b)| **b > 1) {
                    return Err(TranscriptError::InvalidBit {
                        round: r,
                        party,
                        color,
                        value,
                    });
                }
            }
        }
        Ok(Transcript {
            rounds,
            number_of_colors,
        })
    }

    pub fn number_of_colors(&self) -> usize {
        self.number_of_colors
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// First rule violation, scanning rounds then colors in order.
    pub fn first_violation(&self) -> Option<Violation> {
        scan(&self.rounds, self.number_of_colors)
    }

    pub fn verify(&self) -> bool {
        verify(&self.rounds, self.number_of_colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(s: &[u8], t: &[u8], u: &[u8]) -> Round {
        Round::new(s.to_vec(), t.to_vec(), u.to_vec())
    }

    #[test]
    fn accepts_hand_built_valid_transcript() {
        let rounds = vec![
            // sums: 1, 1
            round(&[1, 0], &[0, 1], &[0, 0]),
            // sums: 1, 3
            round(&[0, 1], &[0, 1], &[1, 1]),
        ];
        assert!(verify(&rounds, 2));
    }

    #[test]
    fn parity_rules_after_zero_and_two() {
        // sums: 1, 0, 2 (prev 0 → even ok), then 1 (prev 2 → odd ok)
        let ok = round(&[1, 0, 1, 1], &[0, 0, 1, 0], &[0, 0, 0, 0]);
        let filler = round(&[1, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]);
        let rounds = vec![ok.clone(), filler.clone(), filler.clone(), filler.clone()];
        assert!(verify(&rounds, 4));

        // sums: 1, 0, 1 → odd after 0 fails
        let bad_after_zero = round(&[1, 0, 1, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]);
        let t = Transcript::new(vec![bad_after_zero, filler.clone(), filler.clone(), filler.clone()], 4).unwrap();
        assert!(!t.verify());
        assert_eq!(
            t.first_violation(),
            Some(Violation { round: 0, color: 2, sum_now: 1, prev_sum: Some(0) })
        );

        // sums: 1, 0, 2, 2 → even after 2 fails
        let bad_after_two = round(&[1, 0, 1, 1], &[0, 0, 1, 1], &[0, 0, 0, 0]);
        assert!(!verify(&[filler.clone(), bad_after_two, filler.clone(), filler], 4));
    }

    #[test]
    fn rejects_color_zero_sum_other_than_one() {
        let valid = round(&[1, 0], &[0, 0], &[0, 0]);
        for bad in [round(&[0, 0], &[0, 0], &[0, 0]), round(&[1, 0], &[1, 0], &[0, 0])] {
            assert!(!verify(&[bad.clone(), valid.clone()], 2));
            assert!(!verify(&[valid.clone(), bad], 2));
        }
    }

    #[test]
    fn prev_sum_one_accepts_anything() {
        for (s1, t1, u1) in [(0, 0, 0), (1, 0, 0), (1, 1, 0), (1, 1, 1)] {
            let r = round(&[1, s1], &[0, t1], &[0, u1]);
            assert!(verify(&[r.clone(), r], 2), "sum {} rejected after prev_sum 1", s1 + t1 + u1);
        }
    }

    #[test]
    fn only_first_number_of_colors_rounds_are_checked() {
        let good = round(&[1], &[0], &[0]);
        let bad = round(&[0], &[0], &[0]);
        assert!(verify(&[good, bad], 1));
    }

    #[test]
    #[should_panic]
    fn too_few_rounds_panics() {
        let r = round(&[1, 0], &[0, 0], &[0, 0]);
        verify(&[r], 2);
    }

    #[test]
    #[should_panic]
    fn short_bit_string_panics() {
        let r = round(&[1], &[0], &[0]);
        verify(&[r.clone(), r], 2);
    }

    #[test]
    fn validated_transcript_reports_shape_errors() {
        let r = round(&[1, 0], &[0, 0], &[0, 0]);
        assert_eq!(Transcript::new(vec![], 0), Err(TranscriptError::NoColors));
        assert_eq!(
            Transcript::new(vec![r.clone()], 2),
            Err(TranscriptError::TooFewRounds { expected: 2, found: 1 })
        );
        assert_eq!(
            Transcript::new(vec![r.clone(), round(&[1, 0], &[0], &[0, 0])], 2),
            Err(TranscriptError::BitStringTooShort { round: 1, party: 1, expected: 2, found: 1 })
        );
        assert_eq!(
            Transcript::new(vec![r.clone(), round(&[1, 0], &[0, 0], &[0, 2])], 2),
            Err(TranscriptError::InvalidBit { round: 1, party: 2, color: 1, value: 2 })
        );
        let t = Transcript::new(vec![r.clone(), r], 2).unwrap();
        assert!(t.verify());
        assert_eq!(t.first_violation(), None);
    }
}
