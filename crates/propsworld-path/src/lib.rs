//! Reference expression and property path parsing for propsworld.
//!
//! The crate turns the textual references used in scenario steps into
//! structured expressions. It performs no navigation itself: the runtime crate
//! walks parsed [`PropertyPath`] values over its own value model.

mod errors;
mod expression;
mod lexer;

pub use errors::{PathError, PathErrorKind};
pub use expression::{Expression, braced_inner, is_numeric_literal, parse_expression};
pub use lexer::{PropertyPath, Segment};
