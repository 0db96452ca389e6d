//! Common I/O code.

pub mod std;
