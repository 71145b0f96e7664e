// src/options/mod.rs

//! Run options and their resolution into an I/O strategy.
//!
//! - [`model`] defines the tagged option values (`Progress`, `Record`) and
//!   the `Options` bundle a `Command` owns.
//! - [`resolve`] is the pure classification `Options -> IoStrategy`.

pub mod model;
pub mod resolve;

pub use model::{Options, OptionsUpdate, Progress, Record};
pub use resolve::{IoStrategy, resolve};
