//! Horizontal swipe recognition.
//!
//! Only the start and end X of a touch matter. Moving the finger left (start
//! greater than end) asks for the next slide, moving right for the previous.
//! The threshold is strict: a swipe of exactly `threshold` is ignored.

/// Direction a completed swipe asks the carousel to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Next,
    Previous,
}

/// Classify a gesture from its start and end X coordinates.
pub fn classify(start_x: f64, end_x: f64, threshold: f64) -> Option<Swipe> {
    if start_x - end_x > threshold {
        Some(Swipe::Next)
    } else if end_x - start_x > threshold {
        Some(Swipe::Previous)
    } else {
        None
    }
}

/// Remembers where the current touch began.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f64,
    start_x: Option<f64>,
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn begin(&mut self, x: f64) {
        self.start_x = Some(x);
    }

    /// Finish the touch at `x`. A touch-end without a start yields nothing.
    pub fn finish(&mut self, x: f64) -> Option<Swipe> {
        let start = self.start_x.take()?;
        classify(start, x, self.threshold)
    }
}
