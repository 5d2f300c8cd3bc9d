// src/display/mod.rs
//! Message-based display system.
//!
//! - DisplayDriver: output backends (headless, PNG files)
//! - Surface: framebuffer ownership and lifecycle
//! - Messages: Request/Response protocol between the two

pub mod driver;
pub mod drivers;
pub mod messages;
pub mod surface;

pub use driver::DisplayDriver;
pub use messages::{DisplayError, DriverConfig, DriverRequest, DriverResponse};
pub use surface::{DisplayMetrics, Surface};
