//! Text emitters for the dispatch registrations and their tests.

mod dispatch;
pub mod templates;
mod testcase;

pub use dispatch::GenOpDispatcher;
pub use testcase::{
    generate_test_ir_arguments, generate_test_value_definitions, generate_test_value_names,
    test_value_expression, GenOpTestCase,
};

#[cfg(test)]
mod tests;
