// src/orchestrator.rs
//! Drives every registered session from a single control channel.
//!
//! The frame loop is cooperative: the orchestrator blocks on the channel,
//! drains whatever else is queued, and then renders at most one frame per live
//! session. Frame ticks that pile up while a frame is being drawn collapse
//! into one frame. A session whose frame fails is cancelled and removed; the
//! other sessions keep running.

use crate::session::{Session, SessionId};
use log::{debug, error, info, trace, warn};
use std::collections::BTreeMap;
use std::sync::mpsc::{Receiver, TryRecvError};

/// Events the frame loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Time to draw the next frame.
    FrameTick,
    /// Cancel one session.
    Cancel(SessionId),
    /// Cancel every session and stop the loop.
    Shutdown,
}

/// Represents the status of the orchestrator after processing an event or an iteration of its loop.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OrchestratorStatus {
    /// Keep running.
    Running,
    /// A shutdown was requested, the channel closed, or no sessions remain.
    Shutdown,
}

#[derive(Debug, Default)]
pub struct Orchestrator {
    sessions: BTreeMap<SessionId, Session>,
    next_id: u32,
    ticks: u64,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves an id for a session about to be created.
    pub fn allocate_id(&mut self) -> SessionId {
        self.next_id += 1;
        SessionId(self.next_id)
    }

    /// Adds a session to the registry. A session already registered under the
    /// same id is cancelled and replaced.
    pub fn register(&mut self, session: Session) -> SessionId {
        let id = session.id();
        if let Some(mut previous) = self.sessions.insert(id, session) {
            warn!("Orchestrator: Session {} replaced", id);
            previous.cancel();
        }
        debug!("Orchestrator: {} session(s) registered", self.sessions.len());
        id
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Frame ticks handled so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Deregisters and cancels a session, handing it back. Unknown ids are
    /// ignored.
    pub fn cancel(&mut self, id: SessionId) -> Option<Session> {
        match self.sessions.remove(&id) {
            Some(mut session) => {
                session.cancel();
                Some(session)
            }
            None => {
                debug!("Orchestrator: Cancel for unknown session {}", id);
                None
            }
        }
    }

    /// Cancels every session.
    pub fn shutdown(&mut self) {
        let ids = self.session_ids();
        info!("Orchestrator: Shutting down {} session(s)", ids.len());
        for id in ids {
            self.cancel(id);
        }
    }

    /// Renders one frame for every live session. Returns how many succeeded.
    pub fn tick(&mut self) -> usize {
        self.ticks += 1;
        let mut failed = Vec::new();
        let mut rendered = 0;
        for (id, session) in self.sessions.iter_mut() {
            match session.render_frame() {
                Ok(summary) => {
                    trace!("Orchestrator: Session {} drew {} glyphs", id, summary.glyphs_drawn);
                    rendered += 1;
                }
                Err(e) => {
                    error!("Orchestrator: {}; cancelling session", e);
                    failed.push(*id);
                }
            }
        }
        for id in failed {
            self.cancel(id);
        }
        rendered
    }

    /// Applies one control event without drawing.
    fn apply(&mut self, event: ControlEvent, frame_requested: &mut bool) -> OrchestratorStatus {
        match event {
            ControlEvent::FrameTick => {
                *frame_requested = true;
                OrchestratorStatus::Running
            }
            ControlEvent::Cancel(id) => {
                self.cancel(id);
                OrchestratorStatus::Running
            }
            ControlEvent::Shutdown => {
                self.shutdown();
                OrchestratorStatus::Shutdown
            }
        }
    }

    /// Handles a single event, drawing immediately on a frame tick.
    pub fn handle_event(&mut self, event: ControlEvent) -> OrchestratorStatus {
        let mut frame_requested = false;
        let status = self.apply(event, &mut frame_requested);
        if frame_requested && status == OrchestratorStatus::Running {
            self.tick();
        }
        self.status_after(status)
    }

    fn status_after(&self, status: OrchestratorStatus) -> OrchestratorStatus {
        if status == OrchestratorStatus::Running && self.sessions.is_empty() {
            OrchestratorStatus::Shutdown
        } else {
            status
        }
    }

    /// Runs the frame loop until shutdown, channel close, no sessions left,
    /// or `max_ticks` frames. Remaining sessions are cancelled on exit.
    pub fn run(&mut self, event_rx: &Receiver<ControlEvent>, max_ticks: Option<u64>) -> u64 {
        info!(
            "Orchestrator: Frame loop started with {} session(s)",
            self.sessions.len()
        );
        let start = self.ticks;
        loop {
            if self.sessions.is_empty() {
                info!("Orchestrator: No sessions left");
                break;
            }
            if max_ticks.is_some_and(|max| self.ticks - start >= max) {
                info!("Orchestrator: Frame limit reached");
                break;
            }

            let event = match event_rx.recv() {
                Ok(event) => event,
                Err(_) => {
                    info!("Orchestrator: Event channel closed, shutting down");
                    break;
                }
            };

            let mut frame_requested = false;
            let mut status = self.apply(event, &mut frame_requested);
            while status == OrchestratorStatus::Running {
                match event_rx.try_recv() {
                    Ok(event) => status = self.apply(event, &mut frame_requested),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        status = OrchestratorStatus::Shutdown;
                    }
                }
            }

            if frame_requested && !self.sessions.is_empty() {
                self.tick();
            }
            if status == OrchestratorStatus::Shutdown {
                break;
            }
        }
        self.shutdown();
        self.ticks - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationState, AnimationStyle};
    use crate::color::Color;
    use crate::config::{AnimationConfig, GridSize, RasterConfig};
    use crate::display::drivers::{HeadlessDisplayDriver, HeadlessStats};
    use crate::display::{DisplayDriver, DisplayError, DriverRequest, DriverResponse};
    use crate::grid::Grid;
    use crate::pattern::Visualization;
    use crate::scheduler::VsyncActor;
    use crate::session::SessionConfig;
    use std::sync::mpsc;

    struct Blank;

    impl Visualization for Blank {
        fn name(&self) -> &str {
            "blank"
        }

        fn paint(&mut self, grid: &mut Grid, _style: AnimationStyle, _state: &AnimationState) {
            grid.clear();
        }
    }

    /// Accepts `Init`, fails every `Present` without handing the buffer back.
    struct BrokenDriver;

    impl DisplayDriver for BrokenDriver {
        fn name(&self) -> &str {
            "broken"
        }

        fn handle_request(&mut self, request: DriverRequest) -> Result<DriverResponse, DisplayError> {
            match request {
                DriverRequest::Init(c) => Ok(DriverResponse::InitComplete {
                    width_px: c.width_px,
                    height_px: c.height_px,
                }),
                DriverRequest::Present(_) => Err(DisplayError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "gone",
                ))),
                DriverRequest::Release => Ok(DriverResponse::Released),
            }
        }
    }

    fn config() -> SessionConfig {
        SessionConfig {
            name: "orchestrated".into(),
            style: AnimationStyle::Rotate,
            grid: GridSize { cols: 8, rows: 9 },
            raster: RasterConfig {
                cell_width_px: 6,
                cell_height_px: 8,
            },
            animation: AnimationConfig::default(),
            background: Color::Rgb(0, 0, 0),
            label: None,
            initial_state: AnimationState::default(),
        }
    }

    fn add_headless(orchestrator: &mut Orchestrator) -> (SessionId, HeadlessStats) {
        let driver = HeadlessDisplayDriver::new();
        let stats = driver.stats();
        let id = orchestrator.allocate_id();
        let session = Session::new(id, Box::new(Blank), config(), Box::new(driver)).unwrap();
        orchestrator.register(session);
        (id, stats)
    }

    #[test_log::test]
    fn tick_renders_every_session() {
        let mut orchestrator = Orchestrator::new();
        let (_, a) = add_headless(&mut orchestrator);
        let (_, b) = add_headless(&mut orchestrator);
        assert_eq!(orchestrator.tick(), 2);
        assert_eq!((a.frames(), b.frames()), (1, 1));
    }

    #[test_log::test]
    fn cancel_event_only_affects_its_session() {
        let mut orchestrator = Orchestrator::new();
        let (first, a) = add_headless(&mut orchestrator);
        let (_, b) = add_headless(&mut orchestrator);

        assert_eq!(orchestrator.handle_event(ControlEvent::Cancel(first)), OrchestratorStatus::Running);
        assert_eq!(orchestrator.handle_event(ControlEvent::Cancel(first)), OrchestratorStatus::Running);
        orchestrator.handle_event(ControlEvent::FrameTick);

        assert_eq!(a.frames(), 0);
        assert_eq!(a.releases(), 1);
        assert_eq!(b.frames(), 1);
        assert!(orchestrator.session(first).is_none());
    }

    #[test_log::test]
    fn failing_session_is_cancelled_without_affecting_others() {
        let mut orchestrator = Orchestrator::new();
        let id = orchestrator.allocate_id();
        let broken = Session::new(id, Box::new(Blank), config(), Box::new(BrokenDriver)).unwrap();
        orchestrator.register(broken);
        let (_, healthy) = add_headless(&mut orchestrator);

        assert_eq!(orchestrator.tick(), 1);
        assert!(orchestrator.session(id).is_none());
        assert_eq!(orchestrator.tick(), 1);
        assert_eq!(healthy.frames(), 2);
    }

    #[test_log::test]
    fn queued_ticks_collapse_into_one_frame() {
        let mut orchestrator = Orchestrator::new();
        let (_, stats) = add_headless(&mut orchestrator);
        let (tx, rx) = mpsc::channel();
        for _ in 0..10 {
            tx.send(ControlEvent::FrameTick).unwrap();
        }
        drop(tx);
        assert_eq!(orchestrator.run(&rx, None), 1);
        assert_eq!(stats.frames(), 1);
        assert_eq!(stats.releases(), 1);
        assert!(orchestrator.is_empty());
    }

    #[test_log::test]
    fn run_stops_at_frame_limit_with_vsync() {
        let mut orchestrator = Orchestrator::new();
        let (_, stats) = add_headless(&mut orchestrator);
        let (tx, rx) = mpsc::channel();
        let mut vsync = VsyncActor::spawn(tx, 200).unwrap();
        assert_eq!(orchestrator.run(&rx, Some(3)), 3);
        vsync.stop();
        assert_eq!(stats.frames(), 3);
        assert_eq!(stats.releases(), 1);
    }

    #[test_log::test]
    fn run_exits_on_shutdown_and_closed_channel() {
        let mut orchestrator = Orchestrator::new();
        add_headless(&mut orchestrator);
        let (tx, rx) = mpsc::channel();
        tx.send(ControlEvent::Shutdown).unwrap();
        assert_eq!(orchestrator.run(&rx, None), 0);
        assert!(orchestrator.is_empty());

        let mut orchestrator = Orchestrator::new();
        let (_, stats) = add_headless(&mut orchestrator);
        let (tx, rx) = mpsc::channel();
        tx.send(ControlEvent::FrameTick).unwrap();
        drop(tx);
        assert_eq!(orchestrator.run(&rx, None), 1);
        assert_eq!(stats.releases(), 1);
    }

    #[test_log::test]
    fn shutdown_event_reports_shutdown() {
        let mut orchestrator = Orchestrator::new();
        add_headless(&mut orchestrator);
        assert_eq!(orchestrator.handle_event(ControlEvent::Shutdown), OrchestratorStatus::Shutdown);
    }
}
