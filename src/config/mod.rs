// ABOUTME: Configuration module grouping environment settings and fitness policy tables
// ABOUTME: Re-exports the server configuration and the training methodology constants

//! Configuration management
//!
//! Two configuration surfaces:
//! - [`environment::ServerConfig`]: deployment settings read from environment
//!   variables (port, database URL, JWT secret)
//! - [`fitness::FitnessPolicy`]: versioned training-methodology tables
//!   (volume landmarks, recovery thresholds, phase multipliers)

/// Environment-based server configuration
pub mod environment;

/// Training methodology policy tables
pub mod fitness;
