pub struct ScoringEngine;

impl ScoringEngine {
    /// Normalize text for title comparison: whitespace-trimmed and lowercased.
    pub fn normalize(text: &str) -> String {
        text.trim().to_lowercase()
    }

    /// Check a guess against the movie title for exact normalized equality
    pub fn is_correct(guess: &str, title: &str) -> bool {
        Self::normalize(guess) == Self::normalize(title)
    }

    /// Points awarded for a correct guess while the given clue is the latest visible one
    pub fn points_for_clue(clue_index: u8) -> i32 {
        match clue_index {
            0 => 6,
            1 => 3,
            2 => 1,
            _ => 0,
        }
    }

    /// Evaluate a guess and calculate the points it earns
    pub fn score_guess(guess: &str, title: &str, clue_index: u8) -> (bool, i32) {
        if Self::is_correct(guess, title) {
            (true, Self::points_for_clue(clue_index))
        } else {
            (false, 0)
        }
    }
}
