//! Request complexity heuristic
//!
//! Word count plus keyword matching. Deliberately coarse: the tier only picks
//! a cost/quality trade-off in the routing table.

use crate::config::RoutingConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phrases that mark a request as needing reasoning
pub const COMPLEXITY_INDICATORS: &[&str] = &[
    "explain",
    "analyze",
    "compare",
    "difference",
    "how does",
    "why",
    "describe",
    "detail",
    "what is the relationship",
];

/// Coarse request complexity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    Simple,
    Medium,
    Complex,
}

impl ComplexityTier {
    pub const ALL: [ComplexityTier; 3] = [
        ComplexityTier::Simple,
        ComplexityTier::Medium,
        ComplexityTier::Complex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityTier::Simple => "simple",
            ComplexityTier::Medium => "medium",
            ComplexityTier::Complex => "complex",
        }
    }
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplexityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(ComplexityTier::Simple),
            "medium" => Ok(ComplexityTier::Medium),
            "complex" => Ok(ComplexityTier::Complex),
            other => Err(format!("unknown complexity tier: {}", other)),
        }
    }
}

/// Inputs the classification was based on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexitySignals {
    pub word_count: usize,
    pub indicators: Vec<&'static str>,
    pub has_question: bool,
}

/// Complexity classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityAnalyzer {
    simple_threshold: usize,
    medium_threshold: usize,
}

impl Default for ComplexityAnalyzer {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}

impl ComplexityAnalyzer {
    pub fn new(simple_threshold: usize, medium_threshold: usize) -> Self {
        Self {
            simple_threshold,
            medium_threshold,
        }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(config.simple_threshold, config.medium_threshold)
    }

    pub fn thresholds(&self) -> (usize, usize) {
        (self.simple_threshold, self.medium_threshold)
    }

    pub fn signals(&self, text: &str) -> ComplexitySignals {
        let lowered = text.to_lowercase();
        ComplexitySignals {
            word_count: text.split_whitespace().count(),
            indicators: COMPLEXITY_INDICATORS
                .iter()
                .copied()
                .filter(|phrase| lowered.contains(phrase))
                .collect(),
            has_question: text.contains('?'),
        }
    }

    pub fn analyze(&self, text: &str) -> ComplexityTier {
        self.classify(&self.signals(text))
    }

    pub fn classify(&self, signals: &ComplexitySignals) -> ComplexityTier {
        let has_indicator = !signals.indicators.is_empty();

        if signals.word_count <= self.simple_threshold && !has_indicator && !signals.has_question
        {
            ComplexityTier::Simple
        } else if signals.word_count <= self.medium_threshold && !has_indicator {
            ComplexityTier::Medium
        } else {
            ComplexityTier::Complex
        }
    }
}
