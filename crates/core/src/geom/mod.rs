//! Low-level geometry kernel.

pub mod polygon;
