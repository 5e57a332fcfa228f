//! An expression and type engine: tagged values, type patterns, curried
//! dispatch, sum types and lazy sequences.
//!
//! ```
//! use tyfn::{define, pattern, Expr};
//!
//! let add = define(
//!     |args| match (i64::try_from(&args[0]), i64::try_from(&args[1])) {
//!         (Ok(a), Ok(b)) => Expr::from(a + b),
//!         _ => Expr::None,
//!     },
//!     pattern!(Int -> Int -> Int),
//! );
//!
//! assert_eq!(Expr::from(7), add.call(&[3.into()]).call(&[4.into()]));
//! assert_eq!(Expr::None, add.call(&["x".into(), 4.into()]));
//! ```

pub mod collection;
pub mod cont;
pub mod curry;
pub mod error;
pub mod expr;
pub mod flag;
pub mod pattern;
pub mod registry;
pub mod sumtype;
pub mod value;

pub use collection::{record_def, tuple_def};
pub use cont::{Continuation, Sequence, Step};
pub use curry::{compose, constant, define, define_expr, FuncDef};
pub use error::{Error, Result};
pub use expr::Expr;
pub use flag::{Atom, Tag};
pub use pattern::Pattern;
pub use registry::Registry;
pub use sumtype::{Alternate, Case, Maybe, Outcome, Switch};
pub use value::{Ratio, Typed, Value};

#[cfg(test)]
mod tests;
