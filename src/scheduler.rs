// src/scheduler.rs

//! Fixed-interval background tasks.
//!
//! A `ScheduledTask` runs on a named thread and sends one event per interval
//! into a channel. It stops when asked, when dropped, or when the receiving
//! side of the channel goes away. The `VsyncActor` is the task that paces the
//! frame loop.

use crate::orchestrator::ControlEvent;
use anyhow::{Context, Result};
use log::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A background thread emitting events at a fixed rate.
pub struct ScheduledTask {
    name: String,
    stop: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    /// Spawns the task. `make_event` is called once per interval.
    pub fn spawn<T, F>(name: &str, interval: Duration, tx: Sender<T>, make_event: F) -> Result<Self>
    where
        T: Send + 'static,
        F: Fn() -> T + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let thread_name = name.to_string();

        let thread_handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                debug!("{}: Started (interval {:?})", thread_name, interval);
                loop {
                    thread::sleep(interval);
                    if thread_stop.load(Ordering::Acquire) {
                        break;
                    }
                    if tx.send(make_event()).is_err() {
                        info!("{}: Receiver closed, exiting", thread_name);
                        break;
                    }
                }
                debug!("{}: Thread exiting", thread_name);
            })
            .with_context(|| format!("Failed to spawn {} thread", name))?;

        Ok(ScheduledTask {
            name: name.to_string(),
            stop,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True until the thread has exited.
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Stops the task and waits for its thread. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                error!("{} thread panicked: {:?}", self.name, e);
            }
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        debug!("{} dropped", self.name);
        self.stop();
    }
}

/// Sends `ControlEvent::FrameTick` at the configured frame rate.
pub struct VsyncActor {
    task: ScheduledTask,
}

impl VsyncActor {
    /// Spawns the vsync actor in a background thread.
    pub fn spawn(orchestrator_tx: Sender<ControlEvent>, target_fps: u32) -> Result<Self> {
        let fps = target_fps.max(1);
        let frame_duration = Duration::from_secs_f64(1.0 / fps as f64);
        let task = ScheduledTask::spawn("vsync", frame_duration, orchestrator_tx, || {
            ControlEvent::FrameTick
        })?;
        info!("VsyncActor spawned successfully ({} FPS)", fps);
        Ok(VsyncActor { task })
    }

    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    pub fn stop(&mut self) {
        self.task.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test_log::test]
    fn ticks_arrive_until_stopped() {
        let (tx, rx) = mpsc::channel();
        let mut vsync = VsyncActor::spawn(tx, 500).unwrap();
        for _ in 0..3 {
            let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            assert_eq!(event, ControlEvent::FrameTick);
        }
        vsync.stop();
        vsync.stop();
        assert!(!vsync.is_running());
        // drain whatever was in flight; the channel then disconnects
        while rx.recv_timeout(Duration::from_millis(50)).is_ok() {}
        assert!(rx.try_recv().is_err());
    }

    #[test_log::test]
    fn task_exits_when_receiver_is_dropped() {
        let (tx, rx) = mpsc::channel::<u32>();
        let task = ScheduledTask::spawn("counter", Duration::from_millis(1), tx, || 7).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 7);
        drop(rx);
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while task.is_running() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!task.is_running());
        assert_eq!(task.name(), "counter");
    }
}
