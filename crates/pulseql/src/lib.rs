pub mod args;
pub mod commands;
pub mod highlighter;
pub mod local;
