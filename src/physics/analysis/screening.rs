// src/physics/analysis/screening.rs
//
// Orientation screening: enumerate the symmetry-distinct Miller
// indices of a bulk structure, generate every termination of each,
// and classify the faces of each slab. One failing orientation is
// recorded and skipped; the rest of the run continues.

use crate::config::ScreeningConfig;
use crate::error::SlabError;
use crate::model::record::{OrientationFailure, ScreeningOutcome, ScreeningRecord};
use crate::model::structure::Structure;
use crate::physics::analysis::surfaces::compare_faces;
use crate::physics::analysis::symmetry::{distinct_miller_indices, space_group};
use crate::physics::slab::generate_all_terminations;
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

pub struct Screener {
    structure: Structure,
    config: ScreeningConfig,
}

/// Progress and completion messages emitted by a spawned screening run.
#[derive(Debug)]
pub enum ScreeningEvent {
    Progress { completed: usize, total: usize },
    Finished(ScreeningOutcome),
    Failed(SlabError),
}

impl Screener {
    pub fn new(structure: Structure, config: ScreeningConfig) -> Self {
        Self { structure, config }
    }

    /// Runs the screen on the calling thread.
    ///
    /// `progress` is invoked once with (0, total) before any work and
    /// after each orientation with (done, total). `cancel` is polled
    /// between orientations; once observed, the partial outcome is
    /// returned with `cancelled` set. A failure to enumerate the
    /// orientations is the only hard error; per-orientation failures
    /// land in `outcome.failures`.
    pub fn screen(
        &self,
        progress: Option<&dyn Fn(usize, usize)>,
        cancel: Option<&AtomicBool>,
    ) -> Result<ScreeningOutcome, SlabError> {
        let sg = space_group(&self.structure, self.config.symprec)?;
        let orientations =
            distinct_miller_indices(&self.structure, self.config.max_index, self.config.symprec)?;
        let total = orientations.len();
        info!(
            "screening {} (space group {}, {}): {} orientation(s), max index {}",
            self.structure.formula, sg.number, sg.system, total, self.config.max_index
        );

        let mut outcome = ScreeningOutcome {
            total_orientations: total,
            ..ScreeningOutcome::default()
        };
        if let Some(cb) = progress {
            cb(0, total);
        }

        for (done, &(h, k, l)) in orientations.iter().enumerate() {
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                outcome.cancelled = true;
                break;
            }
            match generate_all_terminations(&self.structure, h, k, l, &self.config.slab) {
                Ok(slabs) => {
                    for mut slab in slabs {
                        slab.material_id = self.config.material_id.clone();
                        let symmetry =
                            compare_faces(&slab, self.config.compare_depth, self.config.match_tol);
                        outcome.records.push(ScreeningRecord {
                            miller_index: slab.miller_index,
                            shift: slab.shift,
                            atom_count: slab.atom_count(),
                            surface_area: slab.surface_area(),
                            symmetry,
                            formula: slab.formula().to_string(),
                            slab,
                        });
                    }
                }
                Err(e) => {
                    warn!("({},{},{}) skipped: {}", h, k, l, e);
                    outcome.failures.push(OrientationFailure {
                        miller_index: [h, k, l],
                        reason: e.to_string(),
                    });
                }
            }
            outcome.completed_orientations = done + 1;
            if let Some(cb) = progress {
                cb(done + 1, total);
            }
        }

        info!(
            "screening done: {} termination(s), {} failure(s){}",
            outcome.records.len(),
            outcome.failures.len(),
            if outcome.cancelled { ", cancelled" } else { "" }
        );
        Ok(outcome)
    }

    /// Moves the screen onto a worker thread. The returned task owns
    /// the cancellation flag and the event channel.
    pub fn spawn(self) -> ScreeningTask {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let (tx, rx): (Sender<ScreeningEvent>, Receiver<ScreeningEvent>) = mpsc::channel();

        let handle = thread::spawn(move || {
            let progress_tx = tx.clone();
            let progress = move |completed: usize, total: usize| {
                // The receiver may have been dropped; progress is best-effort.
                let _ = progress_tx.send(ScreeningEvent::Progress { completed, total });
            };
            let result = self.screen(Some(&progress), Some(&flag));
            let _ = tx.send(match result {
                Ok(outcome) => ScreeningEvent::Finished(outcome),
                Err(e) => ScreeningEvent::Failed(e),
            });
        });

        ScreeningTask {
            cancel,
            events: rx,
            handle,
        }
    }
}

/// Handle to a screening run in flight.
pub struct ScreeningTask {
    cancel: Arc<AtomicBool>,
    events: Receiver<ScreeningEvent>,
    handle: thread::JoinHandle<()>,
}

impl ScreeningTask {
    /// Requests cancellation; the worker notices at the next
    /// orientation boundary.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Non-blocking poll for the next event.
    pub fn try_event(&self) -> Option<ScreeningEvent> {
        self.events.try_recv().ok()
    }

    /// The raw event channel, for hosts that integrate it into their
    /// own event loop.
    pub fn events(&self) -> &Receiver<ScreeningEvent> {
        &self.events
    }

    /// Blocks until the run finishes and returns its outcome. Pending
    /// progress events are drained and discarded.
    pub fn join(self) -> Result<ScreeningOutcome, SlabError> {
        self.handle
            .join()
            .map_err(|_| SlabError::Internal("screening thread panicked".into()))?;
        while let Ok(event) = self.events.try_recv() {
            match event {
                ScreeningEvent::Finished(outcome) => return Ok(outcome),
                ScreeningEvent::Failed(e) => return Err(e),
                ScreeningEvent::Progress { .. } => {}
            }
        }
        Err(SlabError::Internal("screening finished without result".into()))
    }
}
