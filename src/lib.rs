#[macro_use]
extern crate lazy_static;

#[macro_use]
pub mod macros;

pub mod catalog;
pub mod classify;
pub mod cli;
pub mod collections;
pub mod config;
pub mod driver;
pub mod emit;
pub mod errors;
pub mod logger;
pub mod lowering;
pub mod parse;
pub mod schema;
pub mod span;
pub mod synth;
