// Analyzer module: aggregates submodules for different aspects of analysis.

pub mod indicators;
pub mod quarterly;

// Re-export the main Analyzer implementation for ease of use.
pub use quarterly::{Analyzer, AnalyzerImpl, Observation, QuarterlySummary};
