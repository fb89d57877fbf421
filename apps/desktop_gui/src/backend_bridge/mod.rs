//! Worker thread that owns the database and answers UI commands.

pub mod commands;
pub mod runtime;
