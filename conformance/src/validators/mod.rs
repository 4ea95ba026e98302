//! Validators over decorated output.

pub mod decorated;
