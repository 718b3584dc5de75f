// ABOUTME: Training intelligence algorithms for strength and cardio analysis
// ABOUTME: Groups 1RM estimation, VO2max estimation, recovery autoregulation, and volume tracking

//! # Training Intelligence
//!
//! The pure computation layer of the server. Each module implements one
//! family of training algorithms over plain values, with the categorical
//! tables injected from [`crate::config::fitness`]; nothing here touches the
//! database or HTTP.

/// Epley one-rep-max estimation with RIR adjustment
pub mod one_rep_max;
/// Mesocycle phase transition planning
pub mod progression;
/// Recovery-score autoregulation
pub mod recovery;
/// Cooper VO2max estimation and cardio session validation
pub mod vo2max;
/// Weekly volume tracking and landmark zone classification
pub mod volume;
