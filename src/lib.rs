//! sales-dash: a terminal sales analytics dashboard.
//!
//! The crate is split into a strict ingestion tier and a permissive query
//! tier. `io::ingest` validates a CSV source up front and refuses to load
//! anything malformed; `engine` then answers the four dashboard queries over
//! the validated, immutable dataset, where an empty selection simply yields
//! an empty table. `tui` and `report` are the two presentation surfaces, both
//! fed from the same engine and the same bilingual `labels`.

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod labels;
pub mod report;
pub mod tui;
