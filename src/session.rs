// src/session.rs

//! One running visualization: its grid, animation state, renderer context,
//! and surface.
//!
//! A frame is `paint → prepare commands → rasterize → present → advance`.
//! Sessions share nothing mutable with each other. Cancelling a session
//! releases its surface and makes every later `render_frame` call fail with
//! `SessionError::Cancelled` without touching the visualization.

use crate::animation::{AnimationState, AnimationStyle};
use crate::color::Color;
use crate::config::{AnimationConfig, GridSize, RasterConfig};
use crate::display::{DisplayDriver, DisplayError, DriverConfig, Surface};
use crate::grid::Grid;
use crate::pattern::Visualization;
use crate::rasterizer::{compile_into_buffer, FrameSummary, SoftwareRasterizer};
use crate::renderer::Renderer;
use log::{debug, info, trace};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} has been cancelled")]
    Cancelled(SessionId),
    #[error("session {id}: {source}")]
    Display {
        id: SessionId,
        #[source]
        source: DisplayError,
    },
}

/// Everything a session needs besides its visualization and driver.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub name: String,
    pub style: AnimationStyle,
    pub grid: GridSize,
    pub raster: RasterConfig,
    pub animation: AnimationConfig,
    pub background: Color,
    pub label: Option<String>,
    pub initial_state: AnimationState,
}

pub struct Session {
    id: SessionId,
    name: String,
    visualization: Box<dyn Visualization>,
    style: AnimationStyle,
    state: AnimationState,
    steps: AnimationConfig,
    grid: Grid,
    renderer: Renderer,
    rasterizer: SoftwareRasterizer,
    surface: Surface,
    label: Option<String>,
    frames_rendered: u64,
    cancelled: bool,
}

impl Session {
    pub fn new(
        id: SessionId,
        visualization: Box<dyn Visualization>,
        config: SessionConfig,
        driver: Box<dyn DisplayDriver>,
    ) -> Result<Self, SessionError> {
        let GridSize { cols, rows } = config.grid;
        let driver_config = DriverConfig {
            width_px: (cols * config.raster.cell_width_px) as u32,
            height_px: (rows * config.raster.cell_height_px) as u32,
            bytes_per_pixel: 4,
            title: config.name.clone(),
        };
        let surface =
            Surface::new(driver, driver_config).map_err(|source| SessionError::Display { id, source })?;
        info!(
            "Session {}: '{}' {} {}x{} ({} style)",
            id,
            config.name,
            visualization.name(),
            cols,
            rows,
            config.style
        );
        Ok(Session {
            id,
            name: config.name,
            visualization,
            style: config.style,
            state: config.initial_state,
            steps: config.animation,
            grid: Grid::new(cols, rows),
            renderer: Renderer::new(config.background),
            rasterizer: SoftwareRasterizer::new(
                config.raster.cell_width_px,
                config.raster.cell_height_px,
            ),
            surface,
            label: config.label,
            frames_rendered: 0,
            cancelled: false,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> AnimationStyle {
        self.style
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// The most recently painted grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Paints, rasterizes, and presents one frame, then advances the animation.
    pub fn render_frame(&mut self) -> Result<FrameSummary, SessionError> {
        if self.cancelled {
            return Err(SessionError::Cancelled(self.id));
        }
        let id = self.id;
        trace!("Session {}: frame {}", id, self.frames_rendered);

        self.visualization
            .paint(&mut self.grid, self.style, &self.state);
        let commands = self
            .renderer
            .prepare_frame(&self.grid, self.label.as_deref());

        let metrics = self.surface.metrics();
        let framebuffer = self
            .surface
            .framebuffer_mut()
            .map_err(|source| SessionError::Display { id, source })?;
        let summary = compile_into_buffer(
            &mut self.rasterizer,
            &commands,
            framebuffer,
            metrics.width_px as usize,
            metrics.height_px as usize,
        );
        if summary.present {
            self.surface
                .present()
                .map_err(|source| SessionError::Display { id, source })?;
        }

        self.state.advance(self.style, &self.steps);
        self.frames_rendered += 1;
        Ok(summary)
    }

    /// Stops the session and releases its surface. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        if self.cancelled {
            debug!("Session {}: already cancelled", self.id);
            return;
        }
        self.cancelled = true;
        self.surface.release();
        info!(
            "Session {}: cancelled after {} frames",
            self.id, self.frames_rendered
        );
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("visualization", &self.visualization.name())
            .field("style", &self.style)
            .field("state", &self.state)
            .field("frames_rendered", &self.frames_rendered)
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::HeadlessDisplayDriver;
    use crate::input::VisualizationInput;
    use crate::pattern::HelixCompositor;
    use std::cell::Cell as Counter;
    use std::rc::Rc;

    fn config(style: AnimationStyle) -> SessionConfig {
        SessionConfig {
            name: "test".into(),
            style,
            grid: GridSize { cols: 24, rows: 16 },
            raster: RasterConfig {
                cell_width_px: 6,
                cell_height_px: 8,
            },
            animation: AnimationConfig::default(),
            background: Color::Rgb(20, 20, 20),
            label: Some("test".into()),
            initial_state: AnimationState::default(),
        }
    }

    fn helix() -> Box<dyn Visualization> {
        Box::new(HelixCompositor::new(
            VisualizationInput::reference().validate().unwrap(),
        ))
    }

    /// Counts paint calls.
    struct Probe(Rc<Counter<u32>>);

    impl Visualization for Probe {
        fn name(&self) -> &str {
            "probe"
        }

        fn paint(&mut self, _grid: &mut Grid, _style: AnimationStyle, _state: &AnimationState) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test_log::test]
    fn frame_is_presented_and_state_advances() {
        let driver = HeadlessDisplayDriver::new();
        let stats = driver.stats();
        let mut session =
            Session::new(SessionId(1), helix(), config(AnimationStyle::Combined), Box::new(driver)).unwrap();

        let summary = session.render_frame().unwrap();
        assert!(summary.present && summary.label_drawn && summary.glyphs_drawn > 0);
        assert_eq!(stats.frames(), 1);
        assert_eq!(stats.last_frame().unwrap().len(), 24 * 6 * 16 * 8 * 4);
        assert!(session.state().phase > 0.0 && session.state().flow_offset > 0.0);
        assert_eq!(session.frames_rendered(), 1);
    }

    #[test_log::test]
    fn cancel_stops_painting_and_releases_surface() {
        let paints = Rc::new(Counter::new(0));
        let driver = HeadlessDisplayDriver::new();
        let stats = driver.stats();
        let mut session = Session::new(
            SessionId(2),
            Box::new(Probe(Rc::clone(&paints))),
            config(AnimationStyle::Rotate),
            Box::new(driver),
        )
        .unwrap();

        session.render_frame().unwrap();
        session.cancel();
        session.cancel();
        assert!(matches!(
            session.render_frame(),
            Err(SessionError::Cancelled(SessionId(2)))
        ));
        assert_eq!(paints.get(), 1);
        assert!(session.surface().is_released());
        assert_eq!(stats.releases(), 1);
    }

    #[test_log::test]
    fn identical_sessions_present_identical_pixels() {
        let a = HeadlessDisplayDriver::new();
        let b = HeadlessDisplayDriver::new();
        let (sa, sb) = (a.stats(), b.stats());
        let mut first = Session::new(SessionId(1), helix(), config(AnimationStyle::Pulse), Box::new(a)).unwrap();
        let mut second = Session::new(SessionId(2), helix(), config(AnimationStyle::Pulse), Box::new(b)).unwrap();
        for _ in 0..3 {
            first.render_frame().unwrap();
            second.render_frame().unwrap();
            assert_eq!(sa.last_frame(), sb.last_frame());
        }
    }
}
