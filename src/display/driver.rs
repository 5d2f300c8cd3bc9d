// src/display/driver.rs
//! DisplayDriver trait - minimal interface for frame output backends.
//!
//! All common logic (framebuffer ownership, release, error recovery) lives in
//! `Surface`. A driver only answers requests.
//!
//! ## Lifecycle
//! 1. construct the driver
//! 2. `handle_request(Init)` - prepare output, report metrics
//! 3. `handle_request(Present(buf))` once per frame
//! 4. `handle_request(Release)` - flush and close outputs

use crate::display::messages::{DisplayError, DriverRequest, DriverResponse};

/// Minimal display driver interface.
pub trait DisplayDriver: Send {
    /// Short name for log messages.
    fn name(&self) -> &str;

    /// Handle a request from a `Surface`, returning a response.
    ///
    /// ## Request/Response Pairs
    /// - `Init(config)` → `InitComplete`
    /// - `Present(buf)` → `PresentComplete` (display and return ownership)
    /// - `Release` → `Released`
    ///
    /// ## Error Handling
    /// When a `Present` request fails, the buffer is returned via
    /// `DisplayError::PresentationFailed` so the surface keeps its framebuffer.
    fn handle_request(&mut self, request: DriverRequest) -> Result<DriverResponse, DisplayError>;
}
