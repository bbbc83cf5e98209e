//! Top-level interaction state and the page-wide click fan-out.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{OverlayOnClick, PageConfig};
use crate::cursor::CursorState;
use crate::particles::{BURST_LIFETIME_MS, ParticleEmitter};
use crate::speech::Speaker;
use crate::timers::{ClearPolicy, Deferred, OVERLAY_CLEAR_MS, SHAKE_CLEAR_MS, Scheduler};

/// Source of controller sessions; never reused within a process.
static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

pub struct Controller {
    config: PageConfig,
    session: u64,
    cursor: CursorState,
    emitter: ParticleEmitter,
    shaking: bool,
    shake_generation: u64,
    overlay_visible: bool,
    overlay_generation: u64,
    rng: StdRng,
}

impl Controller {
    pub fn new(config: PageConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => entropy_rng(),
        };
        Self {
            emitter: ParticleEmitter::new(config.particle_style),
            config,
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            cursor: CursorState::new(),
            shaking: false,
            shake_generation: 0,
            overlay_visible: false,
            overlay_generation: 0,
            rng,
        }
    }

    /// Click fan-out. Side effects run synchronously in a fixed order:
    /// cursor flip, particle burst, speech, shake, overlay.
    pub fn handle_click<S, P>(&mut self, x: f64, y: f64, scheduler: &mut S, speaker: &mut P)
    where
        S: Scheduler + ?Sized,
        P: Speaker + ?Sized,
    {
        self.trigger_click();

        let batch = self.trigger_explosion(x, y);
        scheduler.schedule(BURST_LIFETIME_MS, self.particle_clear(batch));

        if let Err(err) = speaker.speak(&self.config.utterance) {
            tracing::error!(%err, "speech request failed");
        }

        self.shaking = true;
        self.shake_generation += 1;
        scheduler.schedule(
            SHAKE_CLEAR_MS,
            Deferred::ClearShake {
                session: self.session,
                generation: self.shake_generation,
            },
        );

        if self.config.overlay_on_click == OverlayOnClick::Enabled {
            self.overlay_visible = true;
            self.overlay_generation += 1;
            scheduler.schedule(
                OVERLAY_CLEAR_MS,
                Deferred::ClearOverlay {
                    session: self.session,
                    generation: self.overlay_generation,
                },
            );
        }

        tracing::debug!(x, y, "click");
    }

    pub fn trigger_click(&mut self) {
        self.cursor.trigger_click();
    }

    /// Returns the new batch generation.
    pub fn trigger_explosion(&mut self, x: f64, y: f64) -> u64 {
        self.emitter.trigger_explosion(x, y, &mut self.rng)
    }

    /// Clear task for the batch with the given generation.
    pub fn particle_clear(&self, generation: u64) -> Deferred {
        Deferred::ClearParticles {
            session: self.session,
            generation,
        }
    }

    pub fn run_deferred(&mut self, task: Deferred) {
        if task.session() != self.session {
            tracing::debug!(
                ?task,
                session = self.session,
                "dropping task from another session"
            );
            return;
        }
        let cancel_stale = self.config.clear_policy == ClearPolicy::CancelPrevious;
        match task {
            Deferred::ClearShake { generation, .. } => {
                if !(cancel_stale && generation != self.shake_generation) {
                    self.shaking = false;
                }
            }
            Deferred::ClearOverlay { generation, .. } => {
                if !(cancel_stale && generation != self.overlay_generation) {
                    self.overlay_visible = false;
                }
            }
            Deferred::ClearParticles { generation, .. } => {
                if !(cancel_stale && generation != self.emitter.generation()) {
                    self.emitter.clear();
                }
            }
        }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut CursorState {
        &mut self.cursor
    }

    pub fn emitter(&self) -> &ParticleEmitter {
        &self.emitter
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    /// Bumped on every click; a change while shaking restarts the animation.
    pub fn shake_generation(&self) -> u64 {
        self.shake_generation
    }

    pub fn is_overlay_visible(&self) -> bool {
        self.overlay_visible
    }
}

#[cfg(feature = "rng")]
fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

#[cfg(not(feature = "rng"))]
fn entropy_rng() -> StdRng {
    StdRng::seed_from_u64(crate::performance_now().to_bits())
}
