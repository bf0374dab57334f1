//! Full-screen lightbox over every collected slide.
//!
//! [`Lightbox`] is the long-lived page manager: it holds the slide list the
//! collector produced and opens sessions on demand. A [`LightboxSession`]
//! exists only while the overlay is open. It owns everything page-wide the
//! overlay touches (the host handle, the mounted overlay, the scroll lock),
//! and gives all of it back on close. Dropping a session closes it, so no path
//! can leave the page scroll-locked.
//!
//! Input is turned into [`LightboxCommand`]s and fed to
//! [`LightboxSession::dispatch`], which consumes the session and hands it back
//! unless the command closed it:
//!
//! ```text
//! ArrowLeft / prev button ──► Previous ─┐
//! ArrowRight / next button ─► Next ─────┼─► dispatch ─► Some(session)
//! thumbnail click ──────────► Goto(i) ──┘
//! Escape / × / backdrop ────► Close ────────► dispatch ─► None (host returned via close)
//! ```
//!
//! Keys are gated on the overlay still being attached: once the overlay is
//! gone, a stray keydown listener does nothing even before it is removed.

use crate::carousel::SlideIndex;
use crate::markup::{self, OverlayMarkup};
use crate::render::{self, GalleryView};
use crate::types::Slide;
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LightboxError {
    #[error("No slides found for gallery")]
    NoSlides,
}

/// Page-side half of a lightbox session.
///
/// Also a [`GalleryView`]: thumbnails are the `Thumbnail` part and the main
/// slide + caption are updated through [`GalleryView::show`].
pub trait LightboxHost: GalleryView {
    /// Insert the overlay into the page.
    fn mount(&mut self, overlay: &OverlayMarkup);
    /// Remove the overlay node from the page.
    fn unmount(&mut self);
    /// Whether the overlay is currently attached to the document.
    fn is_mounted(&self) -> bool;
    fn lock_scroll(&mut self);
    fn restore_scroll(&mut self);
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Button,
    Backdrop,
    Escape,
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxCommand {
    Previous,
    Next,
    Goto(usize),
    Close(CloseReason),
}

impl LightboxCommand {
    /// Map a `KeyboardEvent.key` value to a command.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Previous),
            "ArrowRight" => Some(Self::Next),
            "Escape" => Some(Self::Close(CloseReason::Escape)),
            _ => None,
        }
    }
}

/// Page-wide lightbox manager.
#[derive(Debug, Clone)]
pub struct Lightbox {
    slides: Rc<[Slide]>,
}

impl Lightbox {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            slides: slides.into(),
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Open the overlay at slide 0.
    ///
    /// With no slides this logs one warning and leaves `host` untouched.
    pub fn open<H: LightboxHost>(&self, host: H) -> Result<LightboxSession<H>, LightboxError> {
        LightboxSession::open(Rc::clone(&self.slides), host)
    }
}

/// One open overlay.
pub struct LightboxSession<H: LightboxHost> {
    slides: Rc<[Slide]>,
    index: SlideIndex,
    host: Option<H>,
}

impl<H: LightboxHost> LightboxSession<H> {
    fn open(slides: Rc<[Slide]>, mut host: H) -> Result<Self, LightboxError> {
        let Some(index) = SlideIndex::for_len(slides.len()) else {
            log::warn!("{}", LightboxError::NoSlides);
            return Err(LightboxError::NoSlides);
        };
        host.mount(&markup::lightbox_overlay(&slides, index.current()));
        host.lock_scroll();
        let mut session = Self {
            slides,
            index,
            host: Some(host),
        };
        session.render();
        Ok(session)
    }

    pub fn current(&self) -> usize {
        self.index.current()
    }

    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.index.current()]
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    /// Overlay still in the document. False once closed from any path.
    pub fn is_attached(&self) -> bool {
        self.host.as_ref().is_some_and(|h| h.is_mounted())
    }

    /// Command for a keydown, or `None` if the key is unbound or the overlay
    /// has already been detached.
    pub fn key(&self, key: &str) -> Option<LightboxCommand> {
        if !self.is_attached() {
            return None;
        }
        LightboxCommand::from_key(key)
    }

    /// Command for a click on the overlay. Only a click whose target is the
    /// overlay root itself (not a descendant) closes.
    pub fn click(&self, target_is_root: bool) -> Option<LightboxCommand> {
        target_is_root.then_some(LightboxCommand::Close(CloseReason::Backdrop))
    }

    /// Apply `command`. Returns the session unless the command closed it.
    pub fn dispatch(mut self, command: LightboxCommand) -> Option<Self> {
        match command {
            LightboxCommand::Previous => {
                self.index.previous();
            }
            LightboxCommand::Next => {
                self.index.next();
            }
            LightboxCommand::Goto(i) => {
                if let Err(err) = self.index.goto(i) {
                    log::debug!("ignoring lightbox goto: {err}");
                    return Some(self);
                }
            }
            LightboxCommand::Close(reason) => {
                self.close(reason);
                return None;
            }
        }
        self.render();
        Some(self)
    }

    /// Remove the overlay, restore page scroll, and return the host.
    pub fn close(mut self, reason: CloseReason) -> Option<H> {
        self.teardown(reason)
    }

    fn render(&mut self) {
        let slide = &self.slides[self.index.current()];
        if let Some(host) = self.host.as_mut() {
            render::render(host, self.index.frame().with_slide(slide));
        }
    }

    fn teardown(&mut self, reason: CloseReason) -> Option<H> {
        let mut host = self.host.take()?;
        host.restore_scroll();
        host.unmount();
        log::debug!("lightbox closed ({reason:?}) at slide {}", self.index.current());
        Some(host)
    }
}

impl<H: LightboxHost> Drop for LightboxSession<H> {
    fn drop(&mut self) {
        self.teardown(CloseReason::Dropped);
    }
}
