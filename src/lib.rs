// src/lib.rs

//! Rule-based trust analysis of a single web page.
//!
//! ```no_run
//! # async fn run() -> Result<(), trustlens::core::error::ValidationError> {
//! let report = trustlens::analyze_website("https://shop.example.com").await?;
//! for finding in &report.findings {
//!     println!("{finding}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use crate::core::config::EngineConfig;
pub use crate::core::error::ValidationError;
pub use crate::core::models::{AnalysisReport, Category, Finding};
pub use crate::core::scanner::{analyze_website, HeuristicEngine};
