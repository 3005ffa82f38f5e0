//! Subcommand implementations

pub mod calculate;
pub mod init;
pub mod quick;
pub mod sizes;
pub mod validate;
