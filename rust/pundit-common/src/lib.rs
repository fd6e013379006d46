#![warn(missing_docs)]

//! Light weight helpers shared by the `pundit` crates. They carry no
//! dependencies of their own.

mod sync;
pub use sync::*;
