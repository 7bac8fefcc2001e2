// src/ui/widgets/mod.rs

pub mod analysis_view; // Findings list with knowledge-base details.
pub mod footer;        // Key hints for the current state.
pub mod input;         // URL input field.
pub mod summary;       // Trust score, counts and page info.
