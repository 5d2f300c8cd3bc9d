// src/display/messages.rs
//! Message types for communication between a `Surface` and its `DisplayDriver`.
//!
//! All communication happens via ownership transfer: the framebuffer travels
//! with `Present` and comes back with `PresentComplete`.

use thiserror::Error;

/// Geometry and identity of the surface a driver should set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub width_px: u32,
    pub height_px: u32,
    pub bytes_per_pixel: usize,
    /// Human-readable name, used by drivers for titles and file names.
    pub title: String,
}

impl DriverConfig {
    pub fn buffer_len(&self) -> usize {
        self.width_px as usize * self.height_px as usize * self.bytes_per_pixel
    }
}

/// Requests sent from a `Surface` to its `DisplayDriver`.
#[derive(Debug, Clone)]
pub enum DriverRequest {
    /// Driver prepares its output and reports the metrics it accepted.
    Init(DriverConfig),

    /// Display the framebuffer. The surface sends this with framebuffer ownership.
    /// The driver takes ownership, displays it, and responds with PresentComplete.
    Present(Box<[u8]>),

    /// Nothing further will be presented; flush and close outputs.
    Release,
}

/// Responses sent from a `DisplayDriver` to its `Surface`.
#[derive(Debug)]
pub enum DriverResponse {
    /// Initialization complete with accepted metrics.
    InitComplete { width_px: u32, height_px: u32 },

    /// Frame presentation complete, framebuffer ownership returned for reuse.
    PresentComplete(Box<[u8]>),

    /// Driver released its outputs.
    Released,
}

/// Errors a surface or driver can report.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The surface was released; no further frames are accepted.
    #[error("surface '{0}' has been released")]
    SurfaceReleased(String),

    /// Presentation failed. The buffer is handed back so the surface keeps it.
    #[error("presentation failed: {reason}")]
    PresentationFailed { buffer: Box<[u8]>, reason: String },

    /// The driver answered a request with the wrong response.
    #[error("unexpected driver response to {request}: {response}")]
    Protocol {
        request: &'static str,
        response: String,
    },

    #[error("framebuffer is {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("image export failed: {0}")]
    Export(#[from] image::ImageError),

    #[error("display i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
