//! Declarative view updates.
//!
//! Controllers never poke individual elements. After every state change they
//! build a [`Frame`] from `(len, current)` and hand it to [`render`], which
//! sets the active flag of *every* slide, dot and thumbnail the view has. The
//! result is a pure function of state: rendering the same frame twice is a
//! no-op, and a missed update can never leave two dots lit.
//!
//! The view is a trait so the same controllers drive the live DOM (see the
//! `web` module) and the recording fakes the tests use.

use crate::types::Slide;

/// A family of per-slide elements whose active flag the renderer maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Slide,
    Dot,
    Thumbnail,
}

impl Part {
    pub const ALL: [Part; 3] = [Part::Slide, Part::Dot, Part::Thumbnail];
}

/// Desired visual state for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<'a> {
    pub current: usize,
    pub len: usize,
    /// Slide data to show in a main viewer. `None` for inline carousels,
    /// whose slides already live in the page.
    pub slide: Option<&'a Slide>,
}

impl<'a> Frame<'a> {
    pub fn new(current: usize, len: usize) -> Self {
        Self {
            current,
            len,
            slide: None,
        }
    }

    pub fn with_slide(mut self, slide: &'a Slide) -> Self {
        self.slide = Some(slide);
        self
    }

    pub fn is_active(&self, index: usize) -> bool {
        index == self.current
    }
}

/// Something that can display a gallery.
pub trait GalleryView {
    /// Number of elements of `part` the view holds; 0 when the part is absent.
    fn part_len(&self, part: Part) -> usize;

    /// Mark one element active or inactive. Must be idempotent.
    fn set_active(&mut self, part: Part, index: usize, active: bool);

    /// Show `slide` in the main viewer, if the view has one.
    fn show(&mut self, _slide: &Slide) {}
}

/// Apply `frame` to every element of `view`.
pub fn render<V: GalleryView + ?Sized>(view: &mut V, frame: Frame<'_>) {
    for part in Part::ALL {
        for index in 0..view.part_len(part) {
            view.set_active(part, index, frame.is_active(index));
        }
    }
    if let Some(slide) = frame.slide {
        view.show(slide);
    }
}

/// Check a view's dots and thumbnails line up one-to-one with `len` slides.
///
/// Absent parts (length 0) are fine; anything else must match exactly, since
/// dot and thumbnail handlers call `goto` with their own index.
pub fn mismatched_part<V: GalleryView + ?Sized>(view: &V, len: usize) -> Option<(Part, usize)> {
    [Part::Dot, Part::Thumbnail]
        .into_iter()
        .map(|part| (part, view.part_len(part)))
        .find(|&(_, n)| n != 0 && n != len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::RecordingView;

    #[test]
    fn render_marks_exactly_one_of_each_part() {
        let mut view = RecordingView::new(4, 4, 4);
        render(&mut view, Frame::new(2, 4));
        assert_eq!(view.active(Part::Slide), vec![2]);
        assert_eq!(view.active(Part::Dot), vec![2]);
        assert_eq!(view.active(Part::Thumbnail), vec![2]);
    }

    #[test]
    fn render_clears_previous_marker() {
        let mut view = RecordingView::new(3, 3, 0);
        render(&mut view, Frame::new(0, 3));
        render(&mut view, Frame::new(1, 3));
        assert_eq!(view.active(Part::Slide), vec![1]);
        assert_eq!(view.active(Part::Dot), vec![1]);
    }

    #[test]
    fn render_is_idempotent() {
        let mut view = RecordingView::new(3, 3, 3);
        render(&mut view, Frame::new(1, 3));
        let first = view.snapshot();
        render(&mut view, Frame::new(1, 3));
        assert_eq!(view.snapshot(), first);
    }

    #[test]
    fn render_skips_absent_parts() {
        let mut view = RecordingView::new(2, 2, 0);
        render(&mut view, Frame::new(0, 2));
        assert!(view.active(Part::Thumbnail).is_empty());
    }

    #[test]
    fn render_shows_slide_when_frame_carries_one() {
        let slide = Slide::new("b.jpg", "<em>B</em>");
        let mut view = RecordingView::new(0, 0, 2);
        render(&mut view, Frame::new(1, 2).with_slide(&slide));
        assert_eq!(view.shown.as_ref(), Some(&slide));
    }

    #[test]
    fn render_without_slide_leaves_main_viewer_alone() {
        let mut view = RecordingView::new(2, 2, 0);
        render(&mut view, Frame::new(1, 2));
        assert!(view.shown.is_none());
    }

    #[test]
    fn mismatch_detects_short_dot_row() {
        let view = RecordingView::new(3, 2, 0);
        assert_eq!(mismatched_part(&view, 3), Some((Part::Dot, 2)));
    }

    #[test]
    fn mismatch_accepts_absent_thumbnails() {
        let view = RecordingView::new(3, 3, 0);
        assert_eq!(mismatched_part(&view, 3), None);
    }
}
