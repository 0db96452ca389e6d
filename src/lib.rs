//! Population allele frequency annotation from a sharded reference library.

pub mod annotate;
pub mod common;
pub mod library;
