// src/display/drivers/mod.rs
//! Display driver implementations.

pub mod headless;
pub mod png;

pub use headless::{HeadlessDisplayDriver, HeadlessStats};
pub use png::{PngDisplayDriver, PngTarget};
