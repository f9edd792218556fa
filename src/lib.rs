// library crate for condctl
// the condition engine and resolver are usable without the CLI

pub mod cli;
pub mod conditions;
pub mod config;
pub mod resolver;
