//! Tests for the autosize attachment against an in-memory surface.

use super::*;
use crate::metrics::StyleSnapshot;
use crate::scheduler::TimerQueue;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// ===== Test Helpers =====

/// Everything a fake surface has been asked to do.
#[derive(Debug, Default)]
struct FakeState {
    value: String,
    natural: u32,
    height: Option<Px>,
    overflow: Option<Overflow>,
    rows: Option<u32>,
    style: StyleSnapshot,
    mutations: usize,
    probes_spawned: usize,
    probes_alive: usize,
}

#[derive(Clone, Default)]
struct FakeSurface(Rc<RefCell<FakeState>>);

impl FakeSurface {
    fn with(value: &str, natural: u32, line_height: &str) -> Self {
        let surface = Self::default();
        {
            let mut s = surface.0.borrow_mut();
            s.value = value.to_string();
            s.natural = natural;
            s.style.computed_line_height = Some(line_height.to_string());
        }
        surface
    }

    fn set_content(&self, value: &str, natural: u32) {
        let mut s = self.0.borrow_mut();
        s.value = value.to_string();
        s.natural = natural;
    }

    fn state(&self) -> std::cell::Ref<'_, FakeState> {
        self.0.borrow()
    }
}

struct FakeProbe {
    natural: u32,
    height: Option<Px>,
    hidden: bool,
    owner: Rc<RefCell<FakeState>>,
}

impl MeasureProbe for FakeProbe {
    fn hide(&mut self) {
        self.hidden = true;
    }

    fn set_overflow(&mut self, _overflow: Overflow) {}

    fn set_height(&mut self, height: Option<Px>) {
        self.height = height;
    }

    fn scroll_height(&self) -> Px {
        assert!(self.hidden, "probe must be hidden before measuring");
        Px::new(self.natural.max(self.height.map_or(0, Px::get)))
    }
}

impl Drop for FakeProbe {
    fn drop(&mut self) {
        self.owner.borrow_mut().probes_alive -= 1;
    }
}

impl TextSurface for FakeSurface {
    type Probe = FakeProbe;

    fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    fn height(&self) -> Option<Px> {
        self.0.borrow().height
    }

    fn set_height(&mut self, height: Option<Px>) {
        let mut s = self.0.borrow_mut();
        s.height = height;
        s.mutations += 1;
    }

    fn overflow(&self) -> Overflow {
        self.0.borrow().overflow.unwrap_or_default()
    }

    fn set_overflow(&mut self, overflow: Overflow) {
        let mut s = self.0.borrow_mut();
        s.overflow = Some(overflow);
        s.mutations += 1;
    }

    fn set_rows(&mut self, rows: u32) {
        let mut s = self.0.borrow_mut();
        s.rows = Some(rows);
        s.mutations += 1;
    }

    fn scroll_height(&self) -> Px {
        let s = self.0.borrow();
        Px::new(s.natural.max(s.height.map_or(0, Px::get)))
    }

    fn style(&self) -> StyleSnapshot {
        self.0.borrow().style.clone()
    }

    fn spawn_probe(&self) -> FakeProbe {
        let mut s = self.0.borrow_mut();
        s.probes_spawned += 1;
        s.probes_alive += 1;
        FakeProbe {
            natural: s.natural,
            height: s.height,
            hidden: false,
            owner: Rc::clone(&self.0),
        }
    }
}

/// Locator that finds its surface only from the `found_on`-th attempt on.
struct FakeLocator {
    surface: FakeSurface,
    found_on: Option<u32>,
    attempts: Rc<Cell<u32>>,
    alive: Rc<Cell<bool>>,
}

impl FakeLocator {
    fn immediate(surface: &FakeSurface) -> Self {
        Self::found_on(surface, Some(1))
    }

    fn never(surface: &FakeSurface) -> Self {
        Self::found_on(surface, None)
    }

    fn found_on(surface: &FakeSurface, found_on: Option<u32>) -> Self {
        Self {
            surface: surface.clone(),
            found_on,
            attempts: Rc::new(Cell::new(0)),
            alive: Rc::new(Cell::new(true)),
        }
    }
}

impl SurfaceLocator for FakeLocator {
    type Surface = FakeSurface;

    fn locate(&mut self) -> Option<FakeSurface> {
        let attempt = self.attempts.get() + 1;
        self.attempts.set(attempt);
        match self.found_on {
            Some(n) if attempt >= n => Some(self.surface.clone()),
            _ => None,
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.get()
    }
}

fn options(min_rows: Option<u32>, max_rows: Option<u32>) -> AutosizeOptions {
    AutosizeOptions {
        constraints: RowConstraints::new(min_rows, max_rows),
        ..AutosizeOptions::default()
    }
}

fn run_timers(queue: &mut TimerQueue, autosize: &mut Autosize<FakeLocator>, by: Duration) {
    for id in queue.advance(by) {
        autosize.on_timer(id, queue);
    }
}

// ===== Binding =====

#[test]
fn direct_surface_binds_immediately_and_clips() {
    let surface = FakeSurface::with("", 20, "20px");
    let mut queue = TimerQueue::new();
    let autosize = Autosize::attach(FakeLocator::immediate(&surface), options(None, None), &mut queue);

    assert_eq!(autosize.phase(), AttachPhase::Bound);
    assert_eq!(surface.state().overflow, Some(Overflow::Clipped));
    assert_eq!(surface.state().rows, Some(1));
    assert!(queue.is_idle(), "no retry scheduled once bound");
}

#[test]
fn late_surface_found_on_retry() {
    let surface = FakeSurface::with("hi", 20, "20px");
    let locator = FakeLocator::found_on(&surface, Some(3));
    let attempts = Rc::clone(&locator.attempts);
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(locator, options(None, None), &mut queue);

    assert_eq!(autosize.phase(), AttachPhase::Searching { attempts: 1 });
    run_timers(&mut queue, &mut autosize, DEFAULT_LOOKUP_DELAY);
    assert_eq!(autosize.phase(), AttachPhase::Searching { attempts: 2 });
    run_timers(&mut queue, &mut autosize, DEFAULT_LOOKUP_DELAY);

    assert_eq!(autosize.phase(), AttachPhase::Bound);
    assert_eq!(attempts.get(), 3);
    assert!(queue.is_idle());
}

#[test]
fn retry_waits_for_the_full_delay() {
    let surface = FakeSurface::default();
    let locator = FakeLocator::never(&surface);
    let attempts = Rc::clone(&locator.attempts);
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(locator, options(None, None), &mut queue);

    run_timers(&mut queue, &mut autosize, Duration::from_millis(99));
    assert_eq!(attempts.get(), 1);
    run_timers(&mut queue, &mut autosize, Duration::from_millis(1));
    assert_eq!(attempts.get(), 2);
}

#[test]
fn lookup_gives_up_after_four_attempts() {
    let surface = FakeSurface::default();
    let locator = FakeLocator::never(&surface);
    let attempts = Rc::clone(&locator.attempts);
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(locator, options(None, None), &mut queue);

    for _ in 0..10 {
        run_timers(&mut queue, &mut autosize, DEFAULT_LOOKUP_DELAY);
    }

    assert_eq!(attempts.get(), 4, "initial attempt plus three retries");
    assert_eq!(autosize.phase(), AttachPhase::GaveUp);
    assert!(queue.is_idle());
    assert_eq!(autosize.recompute(), Recompute::Unbound);
}

#[test]
fn custom_retry_policy_is_honored() {
    let surface = FakeSurface::default();
    let locator = FakeLocator::never(&surface);
    let attempts = Rc::clone(&locator.attempts);
    let mut queue = TimerQueue::new();
    let opts = AutosizeOptions {
        retry: LookupRetry {
            max_retries: 1,
            delay: Duration::from_millis(5),
        },
        ..AutosizeOptions::default()
    };
    let mut autosize = Autosize::attach(locator, opts, &mut queue);

    for _ in 0..5 {
        run_timers(&mut queue, &mut autosize, Duration::from_millis(5));
    }
    assert_eq!(attempts.get(), 2);
    assert_eq!(autosize.phase(), AttachPhase::GaveUp);
}

#[test]
fn detach_cancels_pending_lookup() {
    let surface = FakeSurface::default();
    let locator = FakeLocator::never(&surface);
    let attempts = Rc::clone(&locator.attempts);
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(locator, options(None, None), &mut queue);

    autosize.detach(&mut queue);
    run_timers(&mut queue, &mut autosize, DEFAULT_LOOKUP_DELAY * 10);

    assert_eq!(attempts.get(), 1);
    assert_eq!(autosize.phase(), AttachPhase::Detached);
}

#[test]
fn dropping_attachment_discards_its_timers() {
    let surface = FakeSurface::default();
    let mut queue = TimerQueue::new();
    let autosize = Autosize::attach(FakeLocator::never(&surface), options(None, None), &mut queue);
    assert_eq!(queue.pending_len(), 1);

    drop(autosize);

    assert!(queue.is_idle());
    assert!(queue.advance(DEFAULT_LOOKUP_DELAY).is_empty());
}

#[test]
fn dead_host_stops_lookup_quietly() {
    let surface = FakeSurface::default();
    let locator = FakeLocator::never(&surface);
    let attempts = Rc::clone(&locator.attempts);
    let alive = Rc::clone(&locator.alive);
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(locator, options(None, None), &mut queue);

    alive.set(false);
    run_timers(&mut queue, &mut autosize, DEFAULT_LOOKUP_DELAY);

    assert_eq!(attempts.get(), 1, "no lookup against a dead host");
    assert_eq!(autosize.phase(), AttachPhase::Detached);
    assert!(queue.is_idle());
}

#[test]
fn foreign_timer_is_ignored() {
    let surface = FakeSurface::default();
    let locator = FakeLocator::never(&surface);
    let attempts = Rc::clone(&locator.attempts);
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(locator, options(None, None), &mut queue);

    let other = CancellationToken::new();
    let foreign = queue.schedule(Duration::ZERO, &other);
    autosize.on_timer(foreign, &mut queue);

    assert_eq!(attempts.get(), 1);
}

// ===== Recompute =====

#[test]
fn unbound_recompute_is_noop() {
    let surface = FakeSurface::default();
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(FakeLocator::never(&surface), options(None, None), &mut queue);
    assert_eq!(autosize.recompute(), Recompute::Unbound);
    assert_eq!(surface.state().mutations, 0);
}

#[test]
fn natural_height_without_constraints() {
    let surface = FakeSurface::with("a\nb\nc\nd", 80, "20px");
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(FakeLocator::immediate(&surface), options(None, None), &mut queue);

    let fit = autosize.after_render().fit().expect("applied");
    assert_eq!(fit.height, Px::new(80));
    assert_eq!(surface.state().height, Some(Px::new(80)));
    assert_eq!(surface.state().overflow, Some(Overflow::Clipped));
}

#[test]
fn second_recompute_with_same_value_mutates_nothing() {
    let surface = FakeSurface::with("hello", 20, "20px");
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(FakeLocator::immediate(&surface), options(None, None), &mut queue);

    autosize.recompute();
    let before = surface.state().mutations;
    let spawned = surface.state().probes_spawned;

    assert_eq!(autosize.recompute(), Recompute::Unchanged);
    assert_eq!(surface.state().mutations, before);
    assert_eq!(surface.state().probes_spawned, spawned, "nothing measured");
}

#[test]
fn empty_value_on_first_run_still_lays_out() {
    let surface = FakeSurface::with("", 20, "20px");
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(
        FakeLocator::immediate(&surface),
        options(Some(3), None),
        &mut queue,
    );

    assert!(matches!(autosize.after_render(), Recompute::Applied(_)));
    assert_eq!(surface.state().height, Some(Px::new(60)));

    let before = surface.state().mutations;
    assert_eq!(autosize.on_input(), Recompute::Unchanged);
    assert_eq!(surface.state().mutations, before);
}

#[test]
fn changed_value_recomputes() {
    let surface = FakeSurface::with("one", 20, "20px");
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(FakeLocator::immediate(&surface), options(None, None), &mut queue);
    autosize.recompute();

    surface.set_content("one\ntwo", 40);
    let fit = autosize.on_input().fit().expect("applied");
    assert_eq!(fit.height, Px::new(40));
}

#[test]
fn clone_strategy_never_touches_live_height_while_measuring() {
    let surface = FakeSurface::with("abc", 20, "20px");
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(FakeLocator::immediate(&surface), options(None, None), &mut queue);
    let before = surface.state().mutations;

    autosize.recompute();

    // Exactly overflow + height written back, probe discarded.
    assert_eq!(surface.state().mutations, before + 2);
    assert_eq!(surface.state().probes_spawned, 1);
    assert_eq!(surface.state().probes_alive, 0);
}

#[test]
fn live_strategy_collapses_then_sets_height() {
    let surface = FakeSurface::with("abc", 20, "20px");
    let mut queue = TimerQueue::new();
    let opts = AutosizeOptions {
        strategy: MeasureStrategy::Live,
        ..AutosizeOptions::default()
    };
    let mut autosize = Autosize::attach(FakeLocator::immediate(&surface), opts, &mut queue);
    let before = surface.state().mutations;

    autosize.recompute();

    assert_eq!(surface.state().probes_spawned, 0);
    assert_eq!(surface.state().mutations, before + 3);
    assert_eq!(surface.state().height, Some(Px::new(20)));
}

#[test]
fn live_strategy_can_shrink_after_explicit_height() {
    let surface = FakeSurface::with("a\nb\nc", 60, "20px");
    let mut queue = TimerQueue::new();
    let opts = AutosizeOptions {
        strategy: MeasureStrategy::Live,
        ..AutosizeOptions::default()
    };
    let mut autosize = Autosize::attach(FakeLocator::immediate(&surface), opts, &mut queue);
    autosize.recompute();

    surface.set_content("a", 20);
    let fit = autosize.on_input().fit().expect("applied");
    assert_eq!(fit.height, Px::new(20));
}

#[test]
fn line_height_is_cached_after_first_resolution() {
    let surface = FakeSurface::with("x", 20, "20px");
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(FakeLocator::immediate(&surface), options(Some(2), None), &mut queue);
    autosize.recompute();
    assert_eq!(autosize.line_height(), Some(20));

    surface.0.borrow_mut().style.computed_line_height = Some("30px".to_string());
    surface.set_content("y", 20);
    let fit = autosize.on_input().fit().expect("applied");
    assert_eq!(fit.height, Px::new(40), "cached 20px line height still used");

    autosize.invalidate_metrics();
    let fit = autosize.recompute().fit().expect("applied");
    assert_eq!(fit.height, Px::new(60));
}

// ===== Constraints =====

#[test]
fn constraint_change_before_line_height_is_deferred() {
    let surface = FakeSurface::with("x", 20, "20px");
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(FakeLocator::immediate(&surface), options(None, None), &mut queue);

    assert_eq!(autosize.set_min_rows(2), Recompute::Deferred);
    assert_eq!(surface.state().height, None);

    let fit = autosize.after_render().fit().expect("applied");
    assert_eq!(fit.height, Px::new(40));
}

#[test]
fn constraint_change_recomputes_with_unchanged_value() {
    let surface = FakeSurface::with("x", 20, "20px");
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(FakeLocator::immediate(&surface), options(None, None), &mut queue);
    autosize.recompute();

    let fit = autosize.set_min_rows(3).fit().expect("applied immediately");
    assert_eq!(fit.height, Px::new(60));
    assert_eq!(surface.state().height, Some(Px::new(60)));
}

#[test]
fn max_rows_switches_overflow_to_scrollable() {
    let surface = FakeSurface::with("long", 100, "20px");
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(FakeLocator::immediate(&surface), options(None, None), &mut queue);
    autosize.recompute();
    assert_eq!(surface.state().overflow, Some(Overflow::Clipped));

    autosize.set_max_rows(3);
    assert_eq!(surface.state().height, Some(Px::new(60)));
    assert_eq!(surface.state().overflow, Some(Overflow::Scrollable));

    autosize.set_max_rows(0);
    assert_eq!(surface.state().height, Some(Px::new(100)));
    assert_eq!(surface.state().overflow, Some(Overflow::Clipped));
}

#[test]
fn setting_same_constraints_is_noop() {
    let surface = FakeSurface::with("x", 20, "20px");
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(FakeLocator::immediate(&surface), options(Some(2), Some(4)), &mut queue);
    autosize.recompute();
    let before = surface.state().mutations;

    assert_eq!(autosize.set_constraints(Some(2), Some(4)), Recompute::Unchanged);
    assert_eq!(surface.state().mutations, before);
}

#[test]
fn detached_attachment_is_inert() {
    let surface = FakeSurface::with("x", 20, "20px");
    let mut queue = TimerQueue::new();
    let mut autosize = Autosize::attach(FakeLocator::immediate(&surface), options(None, None), &mut queue);
    autosize.detach(&mut queue);

    assert!(!autosize.is_bound());
    assert_eq!(autosize.on_input(), Recompute::Unbound);
    assert!(autosize.lifetime().is_cancelled());
}
