//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed to by
//! [`CommandDispatcher`].

pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod init;
pub mod matrix;
pub mod project;
pub mod rules;
pub mod schema;
pub mod verify;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
