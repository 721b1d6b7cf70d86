//! library-core: Shared infrastructure for the PDF library front end.
pub mod config;
pub mod error;
pub mod observability;
