//! Autosize attachment.
//!
//! Binds to one text surface and keeps its height fitted to its content.
//!
//! # Lifecycle
//!
//! ```text
//! attach ──► Searching{attempts} ──found──► Bound ⇄ (recompute)
//!                  │  ▲                       │
//!          timer   │  │ retry                 │ detach / drop
//!                  ▼  │                       ▼
//!               (not found) ──exhausted──► GaveUp       Detached
//! ```
//!
//! The lookup retry is a timer on a [`Scheduler`], never a blocking wait.
//! Each attachment owns a [`CancellationToken`]; detaching or dropping the
//! attachment cancels it, so a retry that fires after teardown is discarded.

use crate::metrics::{fit_height, resolve_line_height, Fit};
use crate::model::{MeasureStrategy, Overflow, Px, RowConstraints};
use crate::scheduler::{CancellationToken, Scheduler, TimerId};
use crate::surface::{MeasureProbe, SurfaceLocator, TextSurface};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Default number of lookup retries after the first attempt.
pub const DEFAULT_LOOKUP_RETRIES: u32 = 3;

/// Default delay between lookup attempts.
pub const DEFAULT_LOOKUP_DELAY: Duration = Duration::from_millis(100);

/// Message logged when the lookup gives up.
pub const NOT_FOUND_WARNING: &str = "autosize: textarea not found";

/// Bounded retry policy for locating the surface under a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupRetry {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Fixed delay before each retry.
    pub delay: Duration,
}

impl Default for LookupRetry {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_LOOKUP_RETRIES,
            delay: DEFAULT_LOOKUP_DELAY,
        }
    }
}

/// Settings for one attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutosizeOptions {
    /// Initial row constraints.
    pub constraints: RowConstraints,
    /// How natural height is measured.
    pub strategy: MeasureStrategy,
    /// Lookup retry policy.
    pub retry: LookupRetry,
}

/// Where an attachment is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachPhase {
    /// Still looking for the surface; `attempts` lookups made so far.
    Searching {
        /// Lookups made so far, including the initial one.
        attempts: u32,
    },
    /// Surface found and being driven.
    Bound,
    /// Lookup exhausted its retries. Terminal and inert.
    GaveUp,
    /// Torn down by its owner, or its host disappeared. Terminal and inert.
    Detached,
}

/// Outcome of a recompute request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recompute {
    /// No surface is bound; nothing happened.
    Unbound,
    /// Value identical to the last recompute; nothing happened.
    Unchanged,
    /// Constraints changed before any line height was known; the recompute
    /// will happen on the next content change.
    Deferred,
    /// Height and overflow were written to the surface.
    Applied(Fit),
}

impl Recompute {
    /// The fit that was applied, if any.
    pub fn fit(&self) -> Option<Fit> {
        match self {
            Recompute::Applied(fit) => Some(*fit),
            _ => None,
        }
    }
}

/// Keeps a text surface's height fitted to its content.
pub struct Autosize<L: SurfaceLocator> {
    locator: L,
    surface: Option<L::Surface>,
    phase: AttachPhase,
    options: AutosizeOptions,
    line_height: Option<u32>,
    previous_value: Option<String>,
    lifetime: CancellationToken,
    pending_lookup: Option<TimerId>,
}

impl<L: SurfaceLocator> Autosize<L> {
    /// Attach to the host behind `locator`.
    ///
    /// The first lookup runs immediately. If it misses, retries are
    /// scheduled on `scheduler` and must be fed back through
    /// [`Autosize::on_timer`].
    pub fn attach(locator: L, options: AutosizeOptions, scheduler: &mut impl Scheduler) -> Self {
        let mut autosize = Self {
            locator,
            surface: None,
            phase: AttachPhase::Searching { attempts: 0 },
            options,
            line_height: None,
            previous_value: None,
            lifetime: CancellationToken::new(),
            pending_lookup: None,
        };
        autosize.lookup(scheduler);
        autosize
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> AttachPhase {
        self.phase
    }

    /// Whether a surface is bound.
    pub fn is_bound(&self) -> bool {
        self.surface.is_some()
    }

    /// The bound surface, if any.
    pub fn surface(&self) -> Option<&L::Surface> {
        self.surface.as_ref()
    }

    /// Current row constraints.
    pub fn constraints(&self) -> RowConstraints {
        self.options.constraints
    }

    /// Measurement strategy in use.
    pub fn strategy(&self) -> MeasureStrategy {
        self.options.strategy
    }

    /// Cached line height, once a recompute has resolved it.
    pub fn line_height(&self) -> Option<u32> {
        self.line_height
    }

    /// Token cancelled when this attachment is torn down.
    pub fn lifetime(&self) -> &CancellationToken {
        &self.lifetime
    }

    fn lookup(&mut self, scheduler: &mut impl Scheduler) {
        let attempts = match self.phase {
            AttachPhase::Searching { attempts } => attempts + 1,
            _ => return,
        };

        if let Some(mut surface) = self.locator.locate() {
            surface.set_overflow(Overflow::Clipped);
            surface.set_rows(1);
            self.surface = Some(surface);
            self.phase = AttachPhase::Bound;
            debug!(attempts, "autosize: text surface bound");
            return;
        }

        let retries_used = attempts - 1;
        if retries_used >= self.options.retry.max_retries {
            warn!(attempts, "{}", NOT_FOUND_WARNING);
            self.phase = AttachPhase::GaveUp;
            return;
        }

        let id = scheduler.schedule(self.options.retry.delay, &self.lifetime);
        self.pending_lookup = Some(id);
        self.phase = AttachPhase::Searching { attempts };
        debug!(
            attempts,
            delay_ms = self.options.retry.delay.as_millis() as u64,
            "autosize: text surface not rendered yet, retrying"
        );
    }

    /// Handle a fired timer. Timers this attachment did not schedule are
    /// ignored.
    pub fn on_timer(&mut self, id: TimerId, scheduler: &mut impl Scheduler) {
        if self.pending_lookup != Some(id) {
            return;
        }
        self.pending_lookup = None;

        if self.lifetime.is_cancelled() {
            return;
        }
        if !self.locator.is_alive() {
            debug!("autosize: host torn down before lookup retry");
            self.phase = AttachPhase::Detached;
            return;
        }
        self.lookup(scheduler);
    }

    /// Replace both row constraints.
    ///
    /// Recomputes immediately when a line height is already known,
    /// otherwise defers to the next content change. Either way the next
    /// recompute is not skipped for an unchanged value.
    pub fn set_constraints(&mut self, min_rows: Option<u32>, max_rows: Option<u32>) -> Recompute {
        let constraints = RowConstraints::new(min_rows, max_rows);
        if constraints == self.options.constraints {
            return Recompute::Unchanged;
        }
        self.options.constraints = constraints;
        self.previous_value = None;

        if self.line_height.is_some() {
            self.recompute()
        } else {
            Recompute::Deferred
        }
    }

    /// Change the minimum row count (zero clears it).
    pub fn set_min_rows(&mut self, min_rows: u32) -> Recompute {
        let max_rows = self.options.constraints.max_rows();
        self.set_constraints(Some(min_rows), max_rows)
    }

    /// Change the maximum row count (zero clears it).
    pub fn set_max_rows(&mut self, max_rows: u32) -> Recompute {
        let min_rows = self.options.constraints.min_rows();
        self.set_constraints(min_rows, Some(max_rows))
    }

    /// The surface's value changed through user input.
    pub fn on_input(&mut self) -> Recompute {
        trace!("autosize: input");
        self.recompute()
    }

    /// The surrounding view finished a render pass.
    pub fn after_render(&mut self) -> Recompute {
        self.recompute()
    }

    /// Forget the last recomputed value so the next recompute always runs.
    ///
    /// Needed when layout changes without the value changing, such as a
    /// width change that rewraps the text.
    pub fn invalidate(&mut self) {
        self.previous_value = None;
    }

    /// Forget the cached line height as well as the last value.
    pub fn invalidate_metrics(&mut self) {
        self.line_height = None;
        self.previous_value = None;
    }

    /// Fit the surface's height to its current value.
    pub fn recompute(&mut self) -> Recompute {
        let Some(surface) = self.surface.as_mut() else {
            return Recompute::Unbound;
        };

        let value = surface.value();
        if self.previous_value.as_deref() == Some(value.as_str()) {
            return Recompute::Unchanged;
        }

        let natural = measure_natural_height(surface, self.options.strategy);
        let line_height = match self.line_height {
            Some(px) => px,
            None => {
                let resolved = resolve_line_height(&surface.style());
                debug!(
                    px = resolved.px,
                    source = ?resolved.source,
                    "autosize: line height resolved"
                );
                self.line_height = Some(resolved.px);
                resolved.px
            }
        };

        let fit = fit_height(natural, line_height, self.options.constraints);
        surface.set_overflow(fit.overflow);
        surface.set_height(Some(fit.height));
        self.previous_value = Some(value);

        trace!(
            natural = %natural,
            height = %fit.height,
            overflow = %fit.overflow,
            "autosize: height applied"
        );
        Recompute::Applied(fit)
    }

    /// Tear the attachment down, cancelling any pending lookup.
    ///
    /// The surface is released and all later calls are no-ops.
    pub fn detach(&mut self, scheduler: &mut impl Scheduler) {
        self.lifetime.cancel();
        if let Some(id) = self.pending_lookup.take() {
            scheduler.cancel(id);
        }
        self.surface = None;
        self.phase = AttachPhase::Detached;
    }
}

impl<L: SurfaceLocator> Drop for Autosize<L> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

/// Natural content height of `surface` using `strategy`.
pub fn measure_natural_height<S: TextSurface>(surface: &mut S, strategy: MeasureStrategy) -> Px {
    match strategy {
        MeasureStrategy::Clone => {
            let mut probe = surface.spawn_probe();
            probe.hide();
            probe.set_overflow(Overflow::Scrollable);
            probe.set_height(None);
            probe.scroll_height()
        }
        MeasureStrategy::Live => {
            surface.set_height(None);
            surface.scroll_height()
        }
    }
}

#[cfg(test)]
#[path = "attachment_tests.rs"]
mod tests;
