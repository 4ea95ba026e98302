//! Structural checks on decorated pages (theorems, proofs, cases, leftovers).

pub mod cases;
pub mod leftovers;
pub mod proofs;
pub mod theorems;
