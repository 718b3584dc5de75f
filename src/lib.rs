// ABOUTME: Main library entry point for the FitFlow training backend
// ABOUTME: Provides REST API for workout logging, programs, recovery, and volume analytics

#![deny(unsafe_code)]

//! # FitFlow Server
//!
//! A REST backend for personal resistance-training tracking built around a
//! Renaissance Periodization style methodology:
//!
//! - **Workout logging**: sessions, per-set weight/reps/RIR, completion metrics
//! - **Program management**: weekly templates with mesocycle phase progression
//! - **Recovery autoregulation**: daily assessments mapped to volume adjustments
//! - **Volume analytics**: weekly per-muscle-group set counts against
//!   MEV/MAV/MRV landmarks, 1RM progression, VO2max tracking
//!
//! ## Architecture
//!
//! - **Routes**: thin axum handlers, one router per domain area
//! - **Database**: `sqlx` over SQLite with per-domain query modules
//! - **Intelligence**: pure formula functions (Epley-RIR 1RM, Cooper VO2max,
//!   recovery scoring, volume zones, phase multipliers) testable without a store
//! - **Config**: environment-driven server settings plus versioned fitness
//!   policy tables

/// Authentication and JWT session management
pub mod auth;

/// Configuration management (environment + fitness policy tables)
pub mod config;

/// Application constants and validation limits
pub mod constants;

/// Database management and per-domain query modules
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Pure training-science calculations (1RM, VO2max, recovery, volume, phases)
pub mod intelligence;

/// Production logging and structured output
pub mod logging;

/// Common data models for training entities
pub mod models;

/// `HTTP` routes for the REST API
pub mod routes;
