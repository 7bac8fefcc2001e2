// src/core/mod.rs

/// Data structures shared by every part of the engine: findings, reports and
/// certificate facts.
pub mod models;

/// Typed errors for validation, fetching and certificate inspection.
pub mod error;

/// Process-wide engine settings (timeouts, thresholds).
pub mod config;

/// The parsed page that every check reads from.
pub mod document;

/// Fetcher, feature checks, certificate inspector and the engine that runs
/// them in order.
pub mod scanner;

/// Human-readable explanation and severity for each finding category.
pub mod knowledge_base;
