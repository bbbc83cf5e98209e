//! Deferred flag / batch clears.
//!
//! Clears are fire-and-forget: a scheduled task is never cancelled, so a late
//! clear from an earlier click can turn off a flag a newer click just set.
//! [`ClearPolicy::CancelPrevious`] opts out of that by skipping clears whose
//! generation is stale.
//!
//! Every task also carries the session of the controller that armed it. A
//! controller ignores tasks from other sessions, so timers left over from a
//! previous mount never touch a remounted page.

use crate::controller::Controller;

/// Flag-clear delay after a click.
pub const SHAKE_CLEAR_MS: u32 = 500;
pub const OVERLAY_CLEAR_MS: u32 = 2000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    ClearShake { session: u64, generation: u64 },
    ClearOverlay { session: u64, generation: u64 },
    ClearParticles { session: u64, generation: u64 },
}

impl Deferred {
    pub fn session(&self) -> u64 {
        match *self {
            Deferred::ClearShake { session, .. }
            | Deferred::ClearOverlay { session, .. }
            | Deferred::ClearParticles { session, .. } => session,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ClearPolicy {
    /// Every clear fires unconditionally.
    #[default]
    FireAndForget,
    /// A clear only fires if nothing re-armed its target since it was scheduled.
    CancelPrevious,
}

pub trait Scheduler {
    fn schedule(&mut self, delay_ms: u32, task: Deferred);
}

/// Virtual clock for native tests and headless drivers.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    seq: u64,
    pending: Vec<Pending>,
}

#[derive(Debug)]
struct Pending {
    due_ms: u64,
    seq: u64,
    task: Deferred,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Move the clock forward by `ms`, running every task that comes due on
    /// `controller` in due-time order (ties in scheduling order).
    pub fn advance(&mut self, ms: u64, controller: &mut Controller) {
        let target = self.now_ms + ms;
        loop {
            let next = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, p)| p.due_ms <= target)
                .min_by_key(|(_, p)| (p.due_ms, p.seq))
                .map(|(idx, _)| idx);
            let Some(idx) = next else { break };
            let due = self.pending.remove(idx);
            self.now_ms = due.due_ms;
            controller.run_deferred(due.task);
        }
        self.now_ms = target;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay_ms: u32, task: Deferred) {
        self.seq += 1;
        self.pending.push(Pending {
            due_ms: self.now_ms + delay_ms as u64,
            seq: self.seq,
            task,
        });
    }
}

/// `window.setTimeout` backed scheduler. The handle is dropped; the callback
/// re-enters whatever page is mounted when it fires, and that page's
/// controller drops the task unless the session matches.
pub struct WindowScheduler;

impl Scheduler for WindowScheduler {
    fn schedule(&mut self, delay_ms: u32, task: Deferred) {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::prelude::*;

        let Some(win) = web_sys::window() else {
            tracing::error!(?task, "no window to schedule deferred task on");
            return;
        };
        let callback = Closure::once_into_js(move || crate::page::run_deferred(task));
        if let Err(err) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms as i32,
        ) {
            tracing::error!(?err, ?task, "setTimeout failed");
        }
    }
}
