//! Subcommand implementations.

pub mod init;
pub mod rubric;
pub mod score;
pub mod validate;
