//! Native CLI support for the phpgen binary.

pub mod args;
pub mod commands;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod commands_tests;
