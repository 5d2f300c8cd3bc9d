// src/display/surface.rs
//! Surface - owns a framebuffer and the driver it is presented through.

use crate::display::driver::DisplayDriver;
use crate::display::messages::{DisplayError, DriverConfig, DriverRequest, DriverResponse};
use log::{debug, info, warn};

/// Display metrics accepted by the driver during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetrics {
    pub width_px: u32,
    pub height_px: u32,
}

/// A session's drawing target.
///
/// The framebuffer ping-pongs between the surface and its driver on every
/// `present`. Once released, a surface owns no framebuffer and refuses all
/// further frames. Release is idempotent and also happens on drop.
pub struct Surface {
    name: String,
    driver: Box<dyn DisplayDriver>,
    metrics: DisplayMetrics,
    bytes_per_pixel: usize,
    framebuffer: Option<Box<[u8]>>,
    frames_presented: u64,
    released: bool,
}

impl Surface {
    /// Initializes `driver` with `config` and allocates a matching framebuffer.
    pub fn new(mut driver: Box<dyn DisplayDriver>, config: DriverConfig) -> Result<Self, DisplayError> {
        info!(
            "Surface '{}': initializing {} driver at {}x{} px",
            config.title,
            driver.name(),
            config.width_px,
            config.height_px
        );
        let name = config.title.clone();
        let bytes_per_pixel = config.bytes_per_pixel;
        let metrics = match driver.handle_request(DriverRequest::Init(config))? {
            DriverResponse::InitComplete {
                width_px,
                height_px,
            } => DisplayMetrics {
                width_px,
                height_px,
            },
            other => {
                return Err(DisplayError::Protocol {
                    request: "Init",
                    response: format!("{:?}", other),
                })
            }
        };
        let len = metrics.width_px as usize * metrics.height_px as usize * bytes_per_pixel;
        Ok(Surface {
            name,
            driver,
            metrics,
            bytes_per_pixel,
            framebuffer: Some(vec![0u8; len].into_boxed_slice()),
            frames_presented: 0,
            released: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> DisplayMetrics {
        self.metrics
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    fn buffer_len(&self) -> usize {
        self.metrics.width_px as usize * self.metrics.height_px as usize * self.bytes_per_pixel
    }

    /// Mutable access to the framebuffer for rasterization.
    pub fn framebuffer_mut(&mut self) -> Result<&mut [u8], DisplayError> {
        if self.released {
            return Err(DisplayError::SurfaceReleased(self.name.clone()));
        }
        let len = self.buffer_len();
        let buffer = self
            .framebuffer
            .get_or_insert_with(|| vec![0u8; len].into_boxed_slice());
        Ok(&mut buffer[..])
    }

    /// Hands the framebuffer to the driver and takes it back.
    pub fn present(&mut self) -> Result<(), DisplayError> {
        if self.released {
            return Err(DisplayError::SurfaceReleased(self.name.clone()));
        }
        let len = self.buffer_len();
        let buffer = self
            .framebuffer
            .take()
            .unwrap_or_else(|| vec![0u8; len].into_boxed_slice());

        match self.driver.handle_request(DriverRequest::Present(buffer)) {
            Ok(DriverResponse::PresentComplete(buffer)) => {
                self.framebuffer = Some(buffer);
                self.frames_presented += 1;
                Ok(())
            }
            Ok(other) => {
                self.framebuffer = Some(vec![0u8; len].into_boxed_slice());
                Err(DisplayError::Protocol {
                    request: "Present",
                    response: format!("{:?}", other),
                })
            }
            Err(DisplayError::PresentationFailed { buffer, reason }) => {
                warn!("Surface '{}': present failed, keeping buffer: {}", self.name, reason);
                self.framebuffer = Some(buffer);
                Err(DisplayError::PresentationFailed {
                    buffer: Box::default(),
                    reason,
                })
            }
            Err(e) => {
                self.framebuffer = Some(vec![0u8; len].into_boxed_slice());
                Err(e)
            }
        }
    }

    /// Releases the framebuffer and the driver's outputs.
    ///
    /// Safe to call any number of times; never fails. Driver errors during
    /// release are logged.
    pub fn release(&mut self) {
        if self.released {
            debug!("Surface '{}': already released", self.name);
            return;
        }
        self.released = true;
        self.framebuffer = None;
        match self.driver.handle_request(DriverRequest::Release) {
            Ok(_) => info!(
                "Surface '{}': released after {} frames",
                self.name, self.frames_presented
            ),
            Err(e) => warn!("Surface '{}': driver error during release: {}", self.name, e),
        }
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("name", &self.name)
            .field("driver", &self.driver.name())
            .field("metrics", &self.metrics)
            .field("frames_presented", &self.frames_presented)
            .field("released", &self.released)
            .finish()
    }
}
