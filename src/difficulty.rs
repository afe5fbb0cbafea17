//! Difficulty visualization
//!
//! Maps a numeric difficulty on the service's `[0, 5]` scale to display
//! values. The label and the colour tier use different cut points:
//!
//! | difficulty | label        | tier |
//! |------------|--------------|------|
//! | `< 1.5`    | Beginner     | Low  |
//! | `< 2.0`    | Intermediate | Low  |
//! | `< 2.5`    | Intermediate | Mid  |
//! | `< 3.5`    | Advanced     | Mid  |
//! | otherwise  | Expert       | High |
//!
//! Out-of-range input is not clamped; the percentage may fall outside
//! `0..=100`.

use colored::{ColoredString, Colorize};
use std::fmt;

/// Top of the difficulty scale
pub const MAX_DIFFICULTY: f64 = 5.0;

/// Categorical difficulty label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyLabel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl fmt::Display for DifficultyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => write!(f, "Beginner"),
            Self::Intermediate => write!(f, "Intermediate"),
            Self::Advanced => write!(f, "Advanced"),
            Self::Expert => write!(f, "Expert"),
        }
    }
}

/// Colour bucket used when painting a difficulty value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTier {
    /// Green
    Low,
    /// Orange
    Mid,
    /// Red
    High,
}

impl ColorTier {
    /// Paint `text` in this tier's terminal colour
    pub fn paint(&self, text: &str) -> ColoredString {
        match self {
            Self::Low => text.green(),
            Self::Mid => text.yellow(),
            Self::High => text.red(),
        }
    }
}

/// Label for a difficulty value
pub fn difficulty_label(difficulty: f64) -> DifficultyLabel {
    if difficulty < 1.5 {
        DifficultyLabel::Beginner
    } else if difficulty < 2.5 {
        DifficultyLabel::Intermediate
    } else if difficulty < 3.5 {
        DifficultyLabel::Advanced
    } else {
        DifficultyLabel::Expert
    }
}

/// Colour tier for a difficulty value
pub fn color_tier(difficulty: f64) -> ColorTier {
    if difficulty < 2.0 {
        ColorTier::Low
    } else if difficulty < 3.5 {
        ColorTier::Mid
    } else {
        ColorTier::High
    }
}

/// All display values derived from one difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyView {
    pub difficulty: f64,
    pub percentage: f64,
    pub label: DifficultyLabel,
    pub tier: ColorTier,
}

impl DifficultyView {
    /// Build the view for `difficulty`
    ///
    /// # Examples
    ///
    /// ```
    /// use secquiz::difficulty::{ColorTier, DifficultyLabel, DifficultyView};
    ///
    /// let view = DifficultyView::new(3.0);
    /// assert_eq!(view.percentage, 60.0);
    /// assert_eq!(view.label, DifficultyLabel::Advanced);
    /// assert_eq!(view.tier, ColorTier::Mid);
    /// ```
    pub fn new(difficulty: f64) -> Self {
        Self {
            difficulty,
            percentage: difficulty / MAX_DIFFICULTY * 100.0,
            label: difficulty_label(difficulty),
            tier: color_tier(difficulty),
        }
    }

    /// `"2.3 (Intermediate)"`, coloured by tier
    pub fn colored_summary(&self) -> ColoredString {
        self.tier
            .paint(&format!("{:.1} ({})", self.difficulty, self.label))
    }

    /// Text bar of `width` cells filled to the percentage, followed by the label
    pub fn bar(&self, width: usize) -> String {
        let filled = ((self.percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        let cells = format!("{}{}", "#".repeat(filled), "-".repeat(width - filled));
        format!("[{}] {}", self.tier.paint(&cells), self.label)
    }
}

impl fmt::Display for DifficultyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} ({})", self.difficulty, self.label)
    }
}
