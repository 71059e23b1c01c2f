use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::IntroConfig;
use crate::constants::*;
use crate::markup;
use crate::particle::spawn_batch;
use crate::state::OverlayState;
use crate::surface::{Mounted, Surface};

// A particle batch armed by one show(), bound to that root's container
struct ParticleBatch<H> {
    due: Duration,
    generation: u32,
    container: Option<H>,
}

#[derive(Debug, Clone, Copy)]
enum Task {
    Particles,
    AutoHide,
    Removal,
}

fn insert_sorted(queue: &mut VecDeque<Duration>, due: Duration) {
    let at = queue.partition_point(|d| *d <= due);
    queue.insert(at, due);
}

/// The splash overlay shown while the application starts.
///
/// The overlay never touches a timer itself. Each operation takes the surface
/// and the current time, and [`IntroOverlay::next_deadline`] tells the host
/// when [`IntroOverlay::poll`] has work to do.
///
/// Tasks armed by `show()` and `hide()` are never cancelled. A task whose work
/// no longer applies, such as an auto-hide after removal, runs as a no-op.
pub struct IntroOverlay<S: Surface> {
    config: IntroConfig,
    state: OverlayState,
    visible: bool,
    mounted: Option<Mounted<S::Handle>>,
    generation: u32,
    particles_due: VecDeque<ParticleBatch<S::Handle>>,
    hides_due: VecDeque<Duration>,
    removals_due: VecDeque<Duration>,
    rng: SmallRng,
}

impl<S: Surface> IntroOverlay<S> {
    pub fn new(config: IntroConfig, seed: u64) -> Self {
        Self {
            config,
            state: OverlayState::Idle,
            visible: true,
            mounted: None,
            generation: 0,
            particles_due: VecDeque::new(),
            hides_due: VecDeque::new(),
            removals_due: VecDeque::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn mounted(&self) -> Option<&Mounted<S::Handle>> {
        self.mounted.as_ref()
    }

    /// Inserts the overlay as the body's first child and arms its particle
    /// batch and auto-hide.
    ///
    /// Not guarded: showing again inserts a second root. The instance then
    /// follows the newest root, the previous one stays in the document, and
    /// tasks armed by earlier calls still fire.
    pub fn show(&mut self, surface: &mut S, now: Duration) {
        let root = markup::overlay(&self.config);
        let Some(mounted) = surface.mount(&root, PARTICLES_ID) else {
            debug!("no document body, intro not shown");
            return;
        };

        if self.state.is_mounted() {
            warn!(state = %self.state, "intro shown again, previous root left in the document");
        }

        self.generation += 1;
        let batch = ParticleBatch {
            due: now + PARTICLE_DELAY,
            generation: self.generation,
            container: mounted.particles.clone(),
        };
        let at = self.particles_due.partition_point(|b| b.due <= batch.due);
        self.particles_due.insert(at, batch);
        insert_sorted(&mut self.hides_due, now + DISPLAY_DURATION);

        self.mounted = Some(mounted);
        self.state = OverlayState::Showing;
        debug!(at = ?now, generation = self.generation, "intro mounted");
    }

    /// Starts the fade-out. No-op when nothing is mounted or a fade is already running.
    pub fn hide(&mut self, surface: &mut S, now: Duration) {
        match self.state {
            OverlayState::Showing | OverlayState::ParticlesActive => {}
            _ => return,
        }
        let Some(mounted) = &self.mounted else {
            return;
        };

        surface.add_class(&mounted.root, HIDING_CLASS);
        insert_sorted(&mut self.removals_due, now + FADE_OUT_DURATION);
        self.state = OverlayState::Hiding;
        debug!(at = ?now, "intro hiding");
    }

    /// User-facing dismiss action.
    pub fn hide_manual(&mut self, surface: &mut S, now: Duration) {
        self.hide(surface, now);
    }

    /// When the next armed task is due, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.next_task().map(|(due, _)| due)
    }

    // Ties run particles, then auto-hide, then removal
    fn next_task(&self) -> Option<(Duration, Task)> {
        let candidates = [
            (self.particles_due.front().map(|b| b.due), Task::Particles),
            (self.hides_due.front().copied(), Task::AutoHide),
            (self.removals_due.front().copied(), Task::Removal),
        ];

        let mut next: Option<(Duration, Task)> = None;
        for (due, task) in candidates {
            let Some(due) = due else {
                continue;
            };
            if next.is_none_or(|(best, _)| due < best) {
                next = Some((due, task));
            }
        }
        next
    }

    /// Runs every task due at or before `now`, each at its own deadline.
    pub fn poll(&mut self, surface: &mut S, now: Duration) -> OverlayState {
        while let Some((due, task)) = self.next_task() {
            if due > now {
                break;
            }
            match task {
                Task::Particles => {
                    if let Some(batch) = self.particles_due.pop_front() {
                        self.spawn_particles(surface, batch);
                    }
                }
                Task::AutoHide => {
                    self.hides_due.pop_front();
                    self.hide(surface, due);
                }
                Task::Removal => {
                    self.removals_due.pop_front();
                    self.remove(surface);
                }
            }
        }
        self.state
    }

    fn spawn_particles(&mut self, surface: &mut S, batch: ParticleBatch<S::Handle>) {
        if batch.generation == self.generation && self.state == OverlayState::Showing {
            self.state = OverlayState::ParticlesActive;
        }

        let Some(container) = batch.container else {
            debug!("no particle container, skipping particles");
            return;
        };
        // Still appended while fading; skipped once the root is gone
        if !surface.is_attached(&container) {
            debug!("particle container detached, skipping particles");
            return;
        }

        for particle in spawn_batch(&mut self.rng) {
            surface.append(&container, &markup::particle(&particle));
        }
        debug!(count = PARTICLE_COUNT, generation = batch.generation, "particles spawned");
    }

    fn remove(&mut self, surface: &mut S) {
        self.visible = false;
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        if !surface.detach(&mounted.root) {
            debug!("intro root already detached");
        }
        self.state = OverlayState::Removed;
        debug!("intro removed");
    }
}
