//! Fixed-hertz background scheduling for the simulation pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context;
use thiserror::Error;

use crate::body::BodySource;
use crate::physics::Simulation;

/// Errors from [`Scheduler::start`].
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// One active loop per scheduler instance.
    #[error("simulation loop is already running")]
    AlreadyRunning,
    #[error("hertz must be nonzero")]
    ZeroHertz,
}

/// Runs a [`Simulation`] on a dedicated background thread at a fixed cadence.
///
/// The loop locks the body source for the duration of one tick; readers
/// (such as a render thread) take the same lock between ticks. `stop` is
/// cooperative and takes effect once the in-flight tick completes.
pub struct Scheduler {
    simulation: Arc<Simulation>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            simulation: Arc::new(simulation),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Whether the background loop is active.
    pub fn running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Spawn the background loop at `hertz` ticks per second.
    ///
    /// Returns immediately; the caller is never blocked by simulation work.
    /// Fails if a loop is already running, so repeated calls cannot stack
    /// concurrent loops.
    pub fn start<S>(&mut self, hertz: u32, source: Arc<Mutex<S>>) -> anyhow::Result<()>
    where
        S: BodySource + Send + 'static,
    {
        if hertz == 0 {
            return Err(SchedulerError::ZeroHertz.into());
        }
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(SchedulerError::AlreadyRunning.into());
        }
        // A previous loop that stopped itself leaves its handle behind.
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }

        let simulation = Arc::clone(&self.simulation);
        let running = Arc::clone(&self.running);
        let time_step = 1.0 / hertz as f32;
        let budget = Duration::from_secs_f64(1.0 / f64::from(hertz));

        let spawned = std::thread::Builder::new()
            .name("physics-sim".into())
            .spawn(move || {
                tracing::debug!(hertz, "simulation loop started");
                while running.load(Ordering::Acquire) {
                    let tick_start = Instant::now();
                    match source.lock() {
                        Ok(mut source) => simulation.simulate(time_step, &mut *source),
                        Err(_) => {
                            tracing::error!("body source lock poisoned; stopping simulation loop");
                            running.store(false, Ordering::Release);
                            break;
                        }
                    }

                    // Sleep off the remaining budget. A late tick starts the
                    // next one immediately, so drift never accumulates
                    // across iterations.
                    let elapsed = tick_start.elapsed();
                    match budget.checked_sub(elapsed) {
                        Some(rest) => std::thread::sleep(rest),
                        None => tracing::trace!(?elapsed, "tick exceeded its budget"),
                    }
                }
                tracing::debug!("simulation loop stopped");
            });

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                Err(e).context("failed to spawn simulation thread")
            }
        }
    }

    /// Stop the loop after the in-flight tick and wait for the thread.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
