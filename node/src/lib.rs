pub mod commands;
pub mod opt;
