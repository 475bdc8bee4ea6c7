//! Numerical building blocks.
//!
//! - [`linear`]: closed-form solver for small dense linear systems

pub mod linear;
