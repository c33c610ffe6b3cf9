// src/matrix/mod.rs
//! Sparse matrices, rank-1 corrections and the algorithms over them.

pub mod correction;
pub mod sparse;
pub mod tools;
pub mod vector;

pub use correction::CorrectionMatrix;
pub use sparse::SparseMatrix;
