pub mod commands;
pub mod messages;
