//! Shared test utilities.
//!
//! Fakes for the seams the controllers are written against, so state machine
//! tests run without a browser:
//!
//! - [`RecordingView`]: a [`GalleryView`] that remembers every active flag.
//! - [`FakeHost`]: a [`LightboxHost`] whose page state the test can inspect
//!   through a cloned handle.
//! - [`FakeTimers`] / [`TimerBoard`]: a manual clock for auto-advance.
//! - [`captured_logs`]: the log lines a closure emitted on this thread.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (timers, board) = FakeTimers::new();
//! let mut autoplay = Autoplay::new(timers, 5000);
//! autoplay.start();
//! assert_eq!(board.next_due(), Some(5000));
//! ```

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Once;

use crate::autoplay::TimerFactory;
use crate::lightbox::LightboxHost;
use crate::markup::OverlayMarkup;
use crate::render::{GalleryView, Part};
use crate::types::Slide;

/// `n` slides: `img/{i}.jpg` captioned `Caption {i}`.
pub fn sample_slides(n: usize) -> Vec<Slide> {
    (0..n)
        .map(|i| Slide::new(format!("img/{i}.jpg"), format!("Caption {i}")))
        .collect()
}

// =========================================================================
// Views
// =========================================================================

/// Records the active flag of every element.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    slides: Vec<bool>,
    dots: Vec<bool>,
    thumbnails: Vec<bool>,
    pub shown: Option<Slide>,
}

impl RecordingView {
    pub fn new(slides: usize, dots: usize, thumbnails: usize) -> Self {
        Self {
            slides: vec![false; slides],
            dots: vec![false; dots],
            thumbnails: vec![false; thumbnails],
            shown: None,
        }
    }

    fn flags(&self, part: Part) -> &Vec<bool> {
        match part {
            Part::Slide => &self.slides,
            Part::Dot => &self.dots,
            Part::Thumbnail => &self.thumbnails,
        }
    }

    /// Indices currently flagged active.
    pub fn active(&self, part: Part) -> Vec<usize> {
        active_indices(self.flags(part))
    }

    pub fn snapshot(&self) -> (Vec<bool>, Vec<bool>, Vec<bool>, Option<Slide>) {
        (
            self.slides.clone(),
            self.dots.clone(),
            self.thumbnails.clone(),
            self.shown.clone(),
        )
    }
}

fn active_indices(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter(|&(_, &on)| on)
        .map(|(i, _)| i)
        .collect()
}

impl GalleryView for RecordingView {
    fn part_len(&self, part: Part) -> usize {
        self.flags(part).len()
    }

    fn set_active(&mut self, part: Part, index: usize, active: bool) {
        let flags = match part {
            Part::Slide => &mut self.slides,
            Part::Dot => &mut self.dots,
            Part::Thumbnail => &mut self.thumbnails,
        };
        flags[index] = active;
    }

    fn show(&mut self, slide: &Slide) {
        self.shown = Some(slide.clone());
    }
}

/// Page state behind a [`FakeHost`].
#[derive(Debug, Default)]
pub struct FakePage {
    pub mounted: bool,
    pub scroll_locked: bool,
    pub mount_count: usize,
    pub unmount_count: usize,
    pub thumbnails: usize,
    pub active: Vec<bool>,
    pub shown: Option<Slide>,
}

impl FakePage {
    pub fn active_thumbnails(&self) -> Vec<usize> {
        active_indices(&self.active)
    }
}

/// Lightbox host over a shared [`FakePage`]. Clones observe the same page.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    page: Rc<RefCell<FakePage>>,
}

impl FakeHost {
    pub fn page(&self) -> Ref<'_, FakePage> {
        self.page.borrow()
    }

    /// Remove the overlay without going through the session.
    pub fn detach(&self) {
        self.page.borrow_mut().mounted = false;
    }
}

impl GalleryView for FakeHost {
    fn part_len(&self, part: Part) -> usize {
        match part {
            Part::Thumbnail => self.page.borrow().thumbnails,
            _ => 0,
        }
    }

    fn set_active(&mut self, part: Part, index: usize, active: bool) {
        if part == Part::Thumbnail {
            self.page.borrow_mut().active[index] = active;
        }
    }

    fn show(&mut self, slide: &Slide) {
        self.page.borrow_mut().shown = Some(slide.clone());
    }
}

impl LightboxHost for FakeHost {
    fn mount(&mut self, overlay: &OverlayMarkup) {
        let mut page = self.page.borrow_mut();
        page.mounted = true;
        page.mount_count += 1;
        page.thumbnails = overlay.thumbnails;
        page.active = vec![false; overlay.thumbnails];
    }

    fn unmount(&mut self) {
        let mut page = self.page.borrow_mut();
        page.mounted = false;
        page.unmount_count += 1;
    }

    fn is_mounted(&self) -> bool {
        self.page.borrow().mounted
    }

    fn lock_scroll(&mut self) {
        self.page.borrow_mut().scroll_locked = true;
    }

    fn restore_scroll(&mut self) {
        self.page.borrow_mut().scroll_locked = false;
    }
}

// =========================================================================
// Timers
// =========================================================================

#[derive(Debug, Default)]
struct Clock {
    now: u64,
    next_id: u64,
    /// (id, next due time, interval)
    live: Vec<(u64, u64, u64)>,
    max_live: usize,
    started: usize,
    fired: usize,
}

/// Manual clock shared by a [`FakeTimers`] factory and its timers.
#[derive(Debug, Clone, Default)]
pub struct TimerBoard {
    clock: Rc<RefCell<Clock>>,
}

impl TimerBoard {
    pub fn set_now(&self, now: u64) {
        self.clock.borrow_mut().now = now;
    }

    pub fn live_count(&self) -> usize {
        self.clock.borrow().live.len()
    }

    /// Most timers ever alive at once.
    pub fn max_live(&self) -> usize {
        self.clock.borrow().max_live
    }

    /// Timers created so far.
    pub fn started(&self) -> usize {
        self.clock.borrow().started
    }

    /// Timer callbacks run so far.
    pub fn fired(&self) -> usize {
        self.clock.borrow().fired
    }

    pub fn next_due(&self) -> Option<u64> {
        self.clock.borrow().live.iter().map(|&(_, due, _)| due).min()
    }

    /// Advance the clock to `until`, calling `on_fire` once for every timer
    /// expiry on the way, in time order.
    pub fn run_until(&self, until: u64, on_fire: &mut dyn FnMut()) {
        loop {
            {
                let mut clock = self.clock.borrow_mut();
                let Some(slot) = clock
                    .live
                    .iter_mut()
                    .filter(|(_, due, _)| *due <= until)
                    .min_by_key(|(_, due, _)| *due)
                else {
                    break;
                };
                let due = slot.1;
                slot.1 += slot.2;
                clock.now = due;
                clock.fired += 1;
            }
            // Borrow released: the callback may drop or create timers.
            on_fire();
        }
        self.clock.borrow_mut().now = until;
    }
}

/// [`TimerFactory`] on a [`TimerBoard`].
#[derive(Debug)]
pub struct FakeTimers {
    board: TimerBoard,
}

impl FakeTimers {
    pub fn new() -> (Self, TimerBoard) {
        let board = TimerBoard::default();
        (
            Self {
                board: board.clone(),
            },
            board,
        )
    }
}

#[derive(Debug)]
pub struct FakeTimer {
    id: u64,
    board: TimerBoard,
}

impl Drop for FakeTimer {
    fn drop(&mut self) {
        self.board
            .clock
            .borrow_mut()
            .live
            .retain(|&(id, _, _)| id != self.id);
    }
}

impl TimerFactory for FakeTimers {
    type Timer = FakeTimer;

    fn every(&mut self, interval_ms: u32) -> FakeTimer {
        let mut clock = self.board.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let due = clock.now + u64::from(interval_ms);
        clock.live.push((id, due, u64::from(interval_ms)));
        clock.started += 1;
        clock.max_live = clock.max_live.max(clock.live.len());
        FakeTimer {
            id,
            board: self.board.clone(),
        }
    }
}

// =========================================================================
// Logging
// =========================================================================

thread_local! {
    static CAPTURE: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURE.with(|c| {
            if let Some(lines) = c.borrow_mut().as_mut() {
                lines.push(format!("{} {}", record.level(), record.args()));
            }
        });
    }

    fn flush(&self) {}
}

static INSTALL: Once = Once::new();

/// Run `f` and return the log lines it emitted on this thread, formatted as
/// `"{LEVEL} {message}"`.
pub fn captured_logs(f: impl FnOnce()) -> Vec<String> {
    INSTALL.call_once(|| {
        let _ = log::set_logger(&CaptureLogger);
        log::set_max_level(log::LevelFilter::Trace);
    });
    CAPTURE.with(|c| *c.borrow_mut() = Some(Vec::new()));
    f();
    CAPTURE.with(|c| c.borrow_mut().take()).unwrap_or_default()
}
