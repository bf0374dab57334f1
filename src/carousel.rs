//! The slide-index state machine and the per-gallery controller.
//!
//! [`SlideIndex`] is the one piece of logic the inline carousel, the
//! auto-advancing carousel and the lightbox all share: a current index in
//! `0..len` with wrap-around `next`/`previous` and range-checked `goto`.
//!
//! [`Carousel`] wraps a `SlideIndex` together with a [`GalleryView`], a swipe
//! tracker and an optional [`Autoplay`]. Every navigation funnels through
//! [`Carousel::goto`], which renders one synchronized frame and resets the
//! auto-advance timer.
//!
//! ```text
//!   dot/thumbnail click ──► goto(k) ──► SlideIndex ──► render(frame) ──► view
//!   prev/next button ─────► previous()/next() ─┘          │
//!   swipe ───────────────► touch_end ───────────┘          └─► autoplay.reset()
//!   timer ───────────────► tick (advances, keeps its interval)
//! ```

use crate::autoplay::{Autoplay, NoTimers, TimerFactory};
use crate::render::{self, Frame, GalleryView, Part};
use crate::swipe::{Swipe, SwipeTracker};
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("slide index {index} out of range for {len} slides")]
    OutOfRange { index: usize, len: usize },
    #[error("gallery has no slides")]
    Empty,
    #[error("{part:?} count {found} does not match {len} slides")]
    PartMismatch { part: Part, found: usize, len: usize },
}

/// Current position within a non-empty, fixed-size slide list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideIndex {
    current: usize,
    len: NonZeroUsize,
}

impl SlideIndex {
    /// Start at slide 0.
    pub fn new(len: NonZeroUsize) -> Self {
        Self { current: 0, len }
    }

    /// `None` for an empty gallery, which has no valid index at all.
    pub fn for_len(len: usize) -> Option<Self> {
        NonZeroUsize::new(len).map(Self::new)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len.get()
    }

    /// Index `next` would move to.
    pub fn peek_next(&self) -> usize {
        (self.current + 1) % self.len()
    }

    /// Index `previous` would move to.
    pub fn peek_previous(&self) -> usize {
        (self.current + self.len() - 1) % self.len()
    }

    pub fn next(&mut self) -> usize {
        self.current = self.peek_next();
        self.current
    }

    pub fn previous(&mut self) -> usize {
        self.current = self.peek_previous();
        self.current
    }

    pub fn goto(&mut self, index: usize) -> Result<usize, NavigationError> {
        if index >= self.len() {
            return Err(NavigationError::OutOfRange {
                index,
                len: self.len(),
            });
        }
        self.current = index;
        Ok(index)
    }

    pub fn frame(&self) -> Frame<'static> {
        Frame::new(self.current, self.len())
    }
}

/// Controller for one gallery on the page.
pub struct Carousel<V, T: TimerFactory = NoTimers> {
    index: SlideIndex,
    view: V,
    swipe: SwipeTracker,
    autoplay: Option<Autoplay<T>>,
}

impl<V: GalleryView, T: TimerFactory> Carousel<V, T> {
    /// Build a controller over `len` slides and render slide 0.
    ///
    /// Rejects empty galleries and views whose dots or thumbnails do not line
    /// up one-to-one with the slides.
    pub fn new(mut view: V, len: usize, swipe: SwipeTracker) -> Result<Self, NavigationError> {
        let index = SlideIndex::for_len(len).ok_or(NavigationError::Empty)?;
        if let Some((part, found)) = render::mismatched_part(&view, len) {
            return Err(NavigationError::PartMismatch { part, found, len });
        }
        render::render(&mut view, index.frame());
        Ok(Self {
            index,
            view,
            swipe,
            autoplay: None,
        })
    }

    /// Attach and start an auto-advance timer.
    pub fn with_autoplay(mut self, mut autoplay: Autoplay<T>) -> Self {
        autoplay.start();
        self.autoplay = Some(autoplay);
        self
    }

    pub fn current(&self) -> usize {
        self.index.current()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn autoplay(&self) -> Option<&Autoplay<T>> {
        self.autoplay.as_ref()
    }

    pub fn goto(&mut self, index: usize) -> Result<(), NavigationError> {
        self.index.goto(index)?;
        render::render(&mut self.view, self.index.frame());
        if let Some(autoplay) = self.autoplay.as_mut() {
            autoplay.reset();
        }
        Ok(())
    }

    pub fn next(&mut self) {
        self.navigate(self.index.peek_next());
    }

    pub fn previous(&mut self) {
        self.navigate(self.index.peek_previous());
    }

    /// Timer-driven advance. Unlike [`Carousel::next`] this leaves the running
    /// interval alone; it is the interval.
    pub fn tick(&mut self) {
        self.index.next();
        render::render(&mut self.view, self.index.frame());
    }

    pub fn touch_start(&mut self, x: f64) {
        self.swipe.begin(x);
        if let Some(autoplay) = self.autoplay.as_mut() {
            autoplay.pause();
        }
    }

    pub fn touch_end(&mut self, x: f64) {
        match self.swipe.finish(x) {
            Some(Swipe::Next) => self.next(),
            Some(Swipe::Previous) => self.previous(),
            None => {}
        }
        if let Some(autoplay) = self.autoplay.as_mut() {
            autoplay.resume();
        }
    }

    pub fn pointer_enter(&mut self) {
        if let Some(autoplay) = self.autoplay.as_mut() {
            autoplay.pause();
        }
    }

    pub fn pointer_leave(&mut self) {
        if let Some(autoplay) = self.autoplay.as_mut() {
            autoplay.resume();
        }
    }

    fn navigate(&mut self, index: usize) {
        // peek_* always yields an in-range index
        if let Err(err) = self.goto(index) {
            log::error!("internal navigation failed: {err}");
        }
    }
}
