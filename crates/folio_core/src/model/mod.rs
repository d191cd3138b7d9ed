//! Static portfolio data model.
//!
//! # Responsibility
//! - Define the records the page is rendered from.
//! - Name the page sections and their navigation anchors.
//!
//! # Invariants
//! - Data is immutable after load; core components only read it.
//! - Optional fields may be absent and must render nothing.
//! - Skill and language levels are percentages in `0..=100`.

pub mod portfolio;
pub mod section;
