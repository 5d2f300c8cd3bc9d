//! PNG display driver: writes presented frames to disk.

use crate::display::driver::DisplayDriver;
use crate::display::messages::{DisplayError, DriverRequest, DriverResponse};
use image::RgbaImage;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Where presented frames go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PngTarget {
    /// Every frame overwrites one file.
    Snapshot(PathBuf),
    /// `frame_0001.png`, `frame_0002.png`, ... inside a directory.
    Sequence(PathBuf),
}

#[derive(Debug)]
pub struct PngDisplayDriver {
    target: PngTarget,
    width_px: u32,
    height_px: u32,
    frame_num: u32,
}

impl PngDisplayDriver {
    pub fn new(target: PngTarget) -> Self {
        PngDisplayDriver {
            target,
            width_px: 0,
            height_px: 0,
            frame_num: 0,
        }
    }

    /// Path the next presented frame is written to.
    pub fn next_path(&self) -> PathBuf {
        match &self.target {
            PngTarget::Snapshot(path) => path.clone(),
            PngTarget::Sequence(dir) => dir.join(format!("frame_{:04}.png", self.frame_num + 1)),
        }
    }

    fn write(&self, buffer: &[u8], path: &Path) -> Result<(), DisplayError> {
        let expected = self.width_px as usize * self.height_px as usize * 4;
        if buffer.len() != expected {
            return Err(DisplayError::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }
        let img = RgbaImage::from_raw(self.width_px, self.height_px, buffer.to_vec()).ok_or(
            DisplayError::BufferSize {
                expected,
                actual: buffer.len(),
            },
        )?;
        img.save(path)?;
        debug!("PngDisplayDriver: wrote {}", path.display());
        Ok(())
    }
}

impl DisplayDriver for PngDisplayDriver {
    fn name(&self) -> &str {
        "png"
    }

    fn handle_request(&mut self, request: DriverRequest) -> Result<DriverResponse, DisplayError> {
        match request {
            DriverRequest::Init(config) => {
                if let PngTarget::Sequence(dir) = &self.target {
                    std::fs::create_dir_all(dir)?;
                }
                if config.bytes_per_pixel != 4 {
                    return Err(DisplayError::BufferSize {
                        expected: config.width_px as usize * config.height_px as usize * 4,
                        actual: config.buffer_len(),
                    });
                }
                self.width_px = config.width_px;
                self.height_px = config.height_px;
                info!(
                    "PngDisplayDriver: Init '{}' {}x{} -> {:?}",
                    config.title, config.width_px, config.height_px, self.target
                );
                Ok(DriverResponse::InitComplete {
                    width_px: config.width_px,
                    height_px: config.height_px,
                })
            }
            DriverRequest::Present(buffer) => {
                let path = self.next_path();
                match self.write(&buffer, &path) {
                    Ok(()) => {
                        self.frame_num += 1;
                        Ok(DriverResponse::PresentComplete(buffer))
                    }
                    Err(e) => Err(DisplayError::PresentationFailed {
                        buffer,
                        reason: format!("{}: {}", path.display(), e),
                    }),
                }
            }
            DriverRequest::Release => {
                info!("PngDisplayDriver: {} frame(s) written", self.frame_num);
                Ok(DriverResponse::Released)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::messages::DriverConfig;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("seedglyph-png-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn init(driver: &mut PngDisplayDriver) {
        driver
            .handle_request(DriverRequest::Init(DriverConfig {
                width_px: 3,
                height_px: 2,
                bytes_per_pixel: 4,
                title: "png".into(),
            }))
            .unwrap();
    }

    #[test]
    fn sequence_numbers_frames() {
        let dir = scratch_dir("sequence");
        let mut driver = PngDisplayDriver::new(PngTarget::Sequence(dir.clone()));
        init(&mut driver);
        for _ in 0..2 {
            let buffer = vec![128u8; 3 * 2 * 4].into_boxed_slice();
            driver.handle_request(DriverRequest::Present(buffer)).unwrap();
        }
        assert!(dir.join("frame_0001.png").exists());
        assert!(dir.join("frame_0002.png").exists());

        let img = image::open(dir.join("frame_0002.png")).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0).0, [128, 128, 128, 128]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn wrong_size_buffer_is_handed_back() {
        let dir = scratch_dir("short");
        let mut driver = PngDisplayDriver::new(PngTarget::Sequence(dir.clone()));
        init(&mut driver);
        let result = driver.handle_request(DriverRequest::Present(vec![0u8; 5].into_boxed_slice()));
        match result {
            Err(DisplayError::PresentationFailed { buffer, .. }) => assert_eq!(buffer.len(), 5),
            other => panic!("expected PresentationFailed, got {:?}", other),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }
}
