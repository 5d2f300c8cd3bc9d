//! Headless display driver: accepts frames and remembers the last one.

use crate::display::driver::DisplayDriver;
use crate::display::messages::{DisplayError, DriverRequest, DriverResponse};
use log::{info, trace};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct HeadlessState {
    frames: u64,
    releases: u32,
    last_frame: Option<Vec<u8>>,
}

/// Shared view of what a `HeadlessDisplayDriver` has received.
///
/// Stays valid after the driver has been boxed into a surface.
#[derive(Debug, Clone, Default)]
pub struct HeadlessStats {
    inner: Arc<Mutex<HeadlessState>>,
}

impl HeadlessStats {
    fn with<R>(&self, f: impl FnOnce(&mut HeadlessState) -> R) -> R {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    pub fn frames(&self) -> u64 {
        self.with(|s| s.frames)
    }

    pub fn releases(&self) -> u32 {
        self.with(|s| s.releases)
    }

    /// Copy of the most recently presented framebuffer.
    pub fn last_frame(&self) -> Option<Vec<u8>> {
        self.with(|s| s.last_frame.clone())
    }
}

#[derive(Debug, Default)]
pub struct HeadlessDisplayDriver {
    stats: HeadlessStats,
    keep_frames: bool,
}

impl HeadlessDisplayDriver {
    pub fn new() -> Self {
        HeadlessDisplayDriver {
            stats: HeadlessStats::default(),
            keep_frames: true,
        }
    }

    /// A driver that only counts frames.
    pub fn counting() -> Self {
        HeadlessDisplayDriver {
            stats: HeadlessStats::default(),
            keep_frames: false,
        }
    }

    pub fn stats(&self) -> HeadlessStats {
        self.stats.clone()
    }
}

impl DisplayDriver for HeadlessDisplayDriver {
    fn name(&self) -> &str {
        "headless"
    }

    fn handle_request(&mut self, request: DriverRequest) -> Result<DriverResponse, DisplayError> {
        match request {
            DriverRequest::Init(config) => {
                info!(
                    "HeadlessDisplayDriver: Init '{}' {}x{}",
                    config.title, config.width_px, config.height_px
                );
                Ok(DriverResponse::InitComplete {
                    width_px: config.width_px,
                    height_px: config.height_px,
                })
            }
            DriverRequest::Present(buffer) => {
                trace!("HeadlessDisplayDriver: Present");
                let keep = self.keep_frames;
                self.stats.with(|s| {
                    s.frames += 1;
                    if keep {
                        s.last_frame = Some(buffer.to_vec());
                    }
                });
                Ok(DriverResponse::PresentComplete(buffer))
            }
            DriverRequest::Release => {
                self.stats.with(|s| s.releases += 1);
                Ok(DriverResponse::Released)
            }
        }
    }
}
