//! Utility modules for EDM literal handling.

pub mod datetime;

pub use datetime::DateTimeParseError;
