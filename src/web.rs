//! Browser binding.
//!
//! Implements the crate's seams over the live DOM and wires them to events:
//!
//! | Seam | DOM implementation |
//! |------|--------------------|
//! | [`PageSource`] | [`DomPage`]: `querySelectorAll` plus inline `style` |
//! | [`GalleryView`] | `DomCarouselView`: toggles the active class |
//! | [`TimerFactory`] | `IntervalTimers`: `setInterval` via gloo, cleared on drop |
//! | [`LightboxHost`] | `DomLightboxHost`: overlay node and `body` overflow |
//!
//! Every gallery gets its own controller behind an `Rc<RefCell<..>>`. Event
//! handlers run to completion on the UI thread, so a borrow can only collide
//! with itself; colliding events are dropped with a debug log.
//!
//! Listeners are [`EventListener`]s: dropping one removes it from its target.
//! A lightbox session's listeners are released right after the handler that
//! closed it returns. Page state lives for the life of the page in a
//! thread-local.

use crate::autoplay::{Autoplay, TimerFactory};
use crate::carousel::Carousel;
use crate::collect::{self, PageSource};
use crate::config::{self, VariantConfig, WidgetConfig};
use crate::contract;
use crate::lightbox::{CloseReason, Lightbox, LightboxCommand, LightboxHost, LightboxSession};
use crate::markup::{self, OverlayMarkup};
use crate::render::{GalleryView, Part};
use crate::swipe::SwipeTracker;
use crate::types::{Slide, Variant};
use gloo::events::EventListener;
use gloo::timers::callback::{Interval, Timeout};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent, TouchEvent};

// ============================================================================
// Page source
// ============================================================================

/// A live document as a [`PageSource`].
pub struct DomPage {
    document: Document,
}

impl DomPage {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

fn node_list_elements(list: Result<web_sys::NodeList, JsValue>, class: &str) -> Vec<Element> {
    match list {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect(),
        Err(err) => {
            log::warn!("unusable class name {class:?}: {err:?}");
            Vec::new()
        }
    }
}

impl PageSource for DomPage {
    type Node<'a> = Element;

    fn select_all<'a>(&'a self, class: &str) -> Vec<Element> {
        node_list_elements(self.document.query_selector_all(&format!(".{class}")), class)
    }

    fn select_within<'a>(&'a self, node: &Element, class: &str) -> Vec<Element> {
        node_list_elements(node.query_selector_all(&format!(".{class}")), class)
    }

    fn background_image<'a>(&'a self, node: &Element) -> Option<String> {
        node.dyn_ref::<HtmlElement>()?
            .style()
            .get_property_value("background-image")
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn inner_html<'a>(&'a self, node: &Element) -> String {
        node.inner_html()
    }
}

// ============================================================================
// Carousels
// ============================================================================

struct DomCarouselView {
    slides: Vec<Element>,
    dots: Vec<Element>,
    thumbnails: Vec<Element>,
    active_class: String,
}

fn set_class(element: &Element, class: &str, on: bool) {
    let list = element.class_list();
    let result = if on {
        list.add_1(class)
    } else {
        list.remove_1(class)
    };
    if let Err(err) = result {
        log::debug!("class update failed: {err:?}");
    }
}

impl GalleryView for DomCarouselView {
    fn part_len(&self, part: Part) -> usize {
        match part {
            Part::Slide => self.slides.len(),
            Part::Dot => self.dots.len(),
            Part::Thumbnail => self.thumbnails.len(),
        }
    }

    fn set_active(&mut self, part: Part, index: usize, active: bool) {
        let elements = match part {
            Part::Slide => &self.slides,
            Part::Dot => &self.dots,
            Part::Thumbnail => &self.thumbnails,
        };
        if let Some(element) = elements.get(index) {
            set_class(element, &self.active_class, active);
        }
    }
}

/// `setInterval` timers that call back into one gallery.
struct IntervalTimers {
    on_tick: Rc<dyn Fn()>,
}

impl TimerFactory for IntervalTimers {
    type Timer = Interval;

    fn every(&mut self, interval_ms: u32) -> Interval {
        let on_tick = Rc::clone(&self.on_tick);
        Interval::new(interval_ms, move || on_tick())
    }
}

type DomCarousel = Carousel<DomCarouselView, IntervalTimers>;
type CarouselCell = Rc<RefCell<Option<DomCarousel>>>;

fn with_carousel(cell: &RefCell<Option<DomCarousel>>, f: impl FnOnce(&mut DomCarousel)) {
    match cell.try_borrow_mut() {
        Ok(mut slot) => {
            if let Some(carousel) = slot.as_mut() {
                f(carousel);
            }
        }
        Err(_) => log::debug!("gallery busy, event dropped"),
    }
}

fn touch_x(event: &Event, changed: bool) -> Option<f64> {
    let touch = event.dyn_ref::<TouchEvent>()?;
    let list = if changed {
        touch.changed_touches()
    } else {
        touch.touches()
    };
    list.item(0).map(|t| f64::from(t.client_x()))
}

/// A booted gallery: its controller and the listeners driving it.
struct GalleryHandle {
    variant: Variant,
    carousel: CarouselCell,
    _listeners: Vec<EventListener>,
}

fn on_click(
    target: &Element,
    cell: &CarouselCell,
    f: impl Fn(&mut DomCarousel) + 'static,
) -> EventListener {
    let cell = Rc::clone(cell);
    EventListener::new(target, "click", move |_| with_carousel(&cell, &f))
}

fn boot_gallery(
    page: &DomPage,
    gallery: &Element,
    variant: Variant,
    config: &WidgetConfig,
) -> Option<GalleryHandle> {
    let classes: &VariantConfig = config.variant(variant);
    let missing = contract::missing_parts(page, gallery, classes);
    if !missing.is_empty() {
        log::warn!(
            "skipping .{} gallery: missing {}",
            classes.gallery,
            missing.join(", ")
        );
        return None;
    }
    let find = |class: &str| page.find_within(gallery, class);
    let (container, dots_row, prev, next) = (
        find(classes.container.as_str())?,
        find(classes.dots.as_str())?,
        find(classes.prev.as_str())?,
        find(classes.next.as_str())?,
    );

    let slides = page.select_within(gallery, &classes.slide);
    if slides.is_empty() {
        log::debug!("skipping empty .{} gallery", classes.gallery);
        return None;
    }
    let len = slides.len();

    dots_row.set_inner_html(
        &markup::dots(len, 0, &classes.dot, &config.active_class).into_string(),
    );
    let dots = page.select_within(&dots_row, &classes.dot);

    let mut thumbnails = Vec::new();
    if let (Some(row_class), Some(thumb_class)) = (&classes.thumbnails, &classes.thumbnail) {
        let row = find(row_class.as_str())?;
        let data: Vec<Slide> = slides
            .iter()
            .map(|s| {
                collect::read_slide(page, s, &classes.caption).unwrap_or_else(|| Slide::new("", ""))
            })
            .collect();
        row.set_inner_html(
            &markup::thumbnails(&data, 0, thumb_class, &config.active_class).into_string(),
        );
        thumbnails = page.select_within(&row, thumb_class);
    }

    let view = DomCarouselView {
        slides,
        dots: dots.clone(),
        thumbnails: thumbnails.clone(),
        active_class: config.active_class.clone(),
    };

    let cell: CarouselCell = Rc::new(RefCell::new(None));
    let weak: Weak<RefCell<Option<DomCarousel>>> = Rc::downgrade(&cell);
    let timers = IntervalTimers {
        on_tick: Rc::new(move || {
            if let Some(cell) = weak.upgrade() {
                with_carousel(&cell, |c| c.tick());
            }
        }),
    };

    let swipe = SwipeTracker::new(config.gestures.swipe_threshold);
    let carousel = match Carousel::new(view, len, swipe) {
        Ok(carousel) => carousel,
        Err(err) => {
            log::warn!("skipping .{} gallery: {err}", classes.gallery);
            return None;
        }
    };
    let carousel = match classes.interval_ms {
        Some(ms) => carousel.with_autoplay(Autoplay::new(timers, ms)),
        None => carousel,
    };
    *cell.borrow_mut() = Some(carousel);

    let mut listeners = vec![
        on_click(&prev, &cell, |c| c.previous()),
        on_click(&next, &cell, |c| c.next()),
    ];
    for (i, target) in dots.iter().chain(thumbnails.iter()).enumerate() {
        let index = if i < dots.len() { i } else { i - dots.len() };
        listeners.push(on_click(target, &cell, move |c| {
            if let Err(err) = c.goto(index) {
                log::debug!("ignoring click: {err}");
            }
        }));
    }

    let touch = Rc::clone(&cell);
    listeners.push(EventListener::new(&container, "touchstart", move |event| {
        if let Some(x) = touch_x(event, false) {
            with_carousel(&touch, |c| c.touch_start(x));
        }
    }));
    let touch = Rc::clone(&cell);
    listeners.push(EventListener::new(&container, "touchend", move |event| {
        if let Some(x) = touch_x(event, true) {
            with_carousel(&touch, |c| c.touch_end(x));
        }
    }));

    let hover = Rc::clone(&cell);
    listeners.push(EventListener::new(gallery, "mouseenter", move |_| {
        with_carousel(&hover, |c| c.pointer_enter());
    }));
    let hover = Rc::clone(&cell);
    listeners.push(EventListener::new(gallery, "mouseleave", move |_| {
        with_carousel(&hover, |c| c.pointer_leave());
    }));

    log::debug!(
        "booted {} gallery: {len} slides, {} thumbnails",
        variant.label(),
        thumbnails.len()
    );
    Some(GalleryHandle {
        variant,
        carousel: cell,
        _listeners: listeners,
    })
}

// ============================================================================
// Lightbox
// ============================================================================

/// Overlay node plus the body whose scroll it locks.
pub struct DomLightboxHost {
    document: Document,
    body: HtmlElement,
    root: Option<Element>,
    main_slide: Option<HtmlElement>,
    caption: Option<Element>,
    thumbnails: Vec<Element>,
    saved_overflow: Option<String>,
}

/// Interactive elements of a mounted overlay.
struct OverlayControls {
    root: Element,
    close: Option<Element>,
    prev: Option<Element>,
    next: Option<Element>,
    thumbnails: Vec<Element>,
}

fn query(root: &Element, class: &str) -> Option<Element> {
    root.query_selector(&format!(".{class}")).ok().flatten()
}

impl DomLightboxHost {
    fn new(document: Document, body: HtmlElement) -> Self {
        Self {
            document,
            body,
            root: None,
            main_slide: None,
            caption: None,
            thumbnails: Vec::new(),
            saved_overflow: None,
        }
    }

    fn controls(&self) -> Option<OverlayControls> {
        let root = self.root.clone()?;
        Some(OverlayControls {
            close: query(&root, markup::CLOSE_CLASS),
            prev: query(&root, markup::PREV_CLASS),
            next: query(&root, markup::NEXT_CLASS),
            thumbnails: self.thumbnails.clone(),
            root,
        })
    }
}

impl GalleryView for DomLightboxHost {
    fn part_len(&self, part: Part) -> usize {
        match part {
            Part::Thumbnail => self.thumbnails.len(),
            _ => 0,
        }
    }

    fn set_active(&mut self, part: Part, index: usize, active: bool) {
        if part != Part::Thumbnail {
            return;
        }
        if let Some(thumb) = self.thumbnails.get(index) {
            set_class(thumb, markup::ACTIVE_CLASS, active);
        }
    }

    fn show(&mut self, slide: &Slide) {
        if let Some(main) = &self.main_slide {
            let background = markup::background_image(&slide.image_url);
            if let Err(err) = main.style().set_property("background-image", &background) {
                log::debug!("could not set main slide image: {err:?}");
            }
        }
        if let Some(caption) = &self.caption {
            caption.set_inner_html(&slide.caption);
        }
    }
}

impl LightboxHost for DomLightboxHost {
    fn mount(&mut self, overlay: &OverlayMarkup) {
        let root = match self.document.create_element("div") {
            Ok(root) => root,
            Err(err) => {
                log::error!("could not create lightbox overlay: {err:?}");
                return;
            }
        };
        root.set_class_name(markup::MODAL_CLASS);
        root.set_inner_html(&overlay.inner_html);
        if let Err(err) = self.body.append_child(&root) {
            log::error!("could not attach lightbox overlay: {err:?}");
            return;
        }
        self.main_slide = query(&root, markup::MAIN_SLIDE_CLASS)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        self.caption = query(&root, markup::CAPTION_CLASS);
        self.thumbnails = query(&root, markup::THUMBNAILS_CLASS)
            .map(|row| {
                node_list_elements(
                    row.query_selector_all(&format!(".{}", markup::THUMBNAIL_CLASS)),
                    markup::THUMBNAIL_CLASS,
                )
            })
            .unwrap_or_default();
        self.root = Some(root);
    }

    fn unmount(&mut self) {
        if let Some(root) = self.root.take() {
            root.remove();
        }
        self.main_slide = None;
        self.caption = None;
        self.thumbnails.clear();
    }

    fn is_mounted(&self) -> bool {
        self.root.as_ref().is_some_and(|root| root.is_connected())
    }

    fn lock_scroll(&mut self) {
        let style = self.body.style();
        self.saved_overflow = style.get_property_value("overflow").ok();
        if let Err(err) = style.set_property("overflow", "hidden") {
            log::debug!("could not lock scroll: {err:?}");
        }
    }

    fn restore_scroll(&mut self) {
        let style = self.body.style();
        let result = match self.saved_overflow.take().filter(|v| !v.is_empty()) {
            Some(value) => style.set_property("overflow", &value),
            None => style.remove_property("overflow").map(|_| ()),
        };
        if let Err(err) = result {
            log::debug!("could not restore scroll: {err:?}");
        }
    }
}

/// The open session together with the listeners that drive it.
#[derive(Default)]
struct SessionSlot {
    session: RefCell<Option<LightboxSession<DomLightboxHost>>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl SessionSlot {
    fn is_open(&self) -> bool {
        self.session
            .try_borrow()
            .is_ok_and(|s| s.as_ref().is_some_and(|s| s.is_attached()))
    }

    fn dispatch(&self, command: LightboxCommand) {
        let Ok(mut slot) = self.session.try_borrow_mut() else {
            log::debug!("lightbox busy, event dropped");
            return;
        };
        let Some(current) = slot.take() else {
            return;
        };
        *slot = current.dispatch(command);
        if slot.is_none() {
            self.release_listeners();
        }
    }

    /// Unregister the session's listeners once the running handler returns.
    fn release_listeners(&self) {
        let stale = std::mem::take(&mut *self.listeners.borrow_mut());
        if !stale.is_empty() {
            Timeout::new(0, move || drop(stale)).forget();
        }
    }
}

/// The page's lightbox: slides plus the slot of the open session.
struct LightboxWiring {
    lightbox: Lightbox,
    document: Document,
    body: HtmlElement,
    slot: Rc<SessionSlot>,
}

impl LightboxWiring {
    fn open(&self) {
        if self.slot.is_open() {
            return;
        }
        // A session whose overlay was removed behind its back
        self.slot.session.borrow_mut().take();
        self.slot.listeners.borrow_mut().clear();

        let host = DomLightboxHost::new(self.document.clone(), self.body.clone());
        let Ok(session) = self.lightbox.open(host) else {
            return;
        };
        let controls = session.host().and_then(DomLightboxHost::controls);
        *self.slot.session.borrow_mut() = Some(session);
        if let Some(controls) = controls {
            *self.slot.listeners.borrow_mut() = self.wire(controls);
        }
    }

    fn wire(&self, controls: OverlayControls) -> Vec<EventListener> {
        let command_on = |target: &Element, command: LightboxCommand| {
            let slot = Rc::downgrade(&self.slot);
            EventListener::new(target, "click", move |_| {
                if let Some(slot) = slot.upgrade() {
                    slot.dispatch(command);
                }
            })
        };

        let mut listeners = Vec::new();
        for (target, command) in [
            (&controls.close, LightboxCommand::Close(CloseReason::Button)),
            (&controls.prev, LightboxCommand::Previous),
            (&controls.next, LightboxCommand::Next),
        ] {
            if let Some(target) = target {
                listeners.push(command_on(target, command));
            }
        }
        for (i, thumb) in controls.thumbnails.iter().enumerate() {
            listeners.push(command_on(thumb, LightboxCommand::Goto(i)));
        }

        let slot = Rc::downgrade(&self.slot);
        let root = controls.root.clone();
        listeners.push(EventListener::new(&controls.root, "click", move |event| {
            let Some(slot) = slot.upgrade() else {
                return;
            };
            let target = event.target();
            let target_is_root = target.as_ref().and_then(|t| t.dyn_ref::<Element>()) == Some(&root);
            let command = slot
                .session
                .borrow()
                .as_ref()
                .and_then(|s| s.click(target_is_root));
            if let Some(command) = command {
                slot.dispatch(command);
            }
        }));

        let slot = Rc::downgrade(&self.slot);
        listeners.push(EventListener::new(&self.document, "keydown", move |event| {
            let Some(slot) = slot.upgrade() else {
                return;
            };
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|k| k.key()) else {
                return;
            };
            let command = slot.session.borrow().as_ref().and_then(|s| s.key(&key));
            if let Some(command) = command {
                slot.dispatch(command);
            }
        }));
        listeners
    }
}

// ============================================================================
// Boot
// ============================================================================

/// Every controller booted on one document.
pub struct Page {
    galleries: Vec<GalleryHandle>,
    lightbox: Option<Rc<LightboxWiring>>,
    _triggers: Vec<EventListener>,
}

impl Page {
    /// Boot every gallery of both variants and the lightbox trigger(s).
    ///
    /// Galleries with broken markup are skipped with a warning; the rest of
    /// the page still boots.
    pub fn boot(document: &Document, config: &WidgetConfig) -> Self {
        let page = DomPage::new(document.clone());
        let mut galleries = Vec::new();
        for variant in Variant::ALL {
            for gallery in page.select_all(&config.variant(variant).gallery) {
                galleries.extend(boot_gallery(&page, &gallery, variant, config));
            }
        }

        let mut triggers = Vec::new();
        let lightbox = match document.body() {
            Some(body) => {
                let slides = collect::collect(&page, &config.inline).slides();
                let wiring = Rc::new(LightboxWiring {
                    lightbox: Lightbox::new(slides),
                    document: document.clone(),
                    body,
                    slot: Rc::new(SessionSlot::default()),
                });
                for trigger in page.select_all(&config.lightbox.trigger) {
                    let wiring = Rc::clone(&wiring);
                    triggers.push(EventListener::new(&trigger, "click", move |_| wiring.open()));
                }
                Some(wiring)
            }
            None => {
                log::warn!("document has no body; lightbox disabled");
                None
            }
        };

        log::debug!(
            "booted {} galleries, {} lightbox trigger(s), {} lightbox slides",
            galleries.len(),
            triggers.len(),
            lightbox.as_ref().map_or(0, |l| l.lightbox.slides().len())
        );
        Self {
            galleries,
            lightbox,
            _triggers: triggers,
        }
    }

    pub fn gallery_count(&self, variant: Variant) -> usize {
        self.galleries.iter().filter(|g| g.variant == variant).count()
    }

    /// Current slide of the `n`-th booted gallery of `variant`.
    pub fn current(&self, variant: Variant, n: usize) -> Option<usize> {
        let gallery = self.galleries.iter().filter(|g| g.variant == variant).nth(n)?;
        let slot = gallery.carousel.try_borrow().ok()?;
        slot.as_ref().map(|c| c.current())
    }

    pub fn lightbox_slides(&self) -> usize {
        self.lightbox.as_ref().map_or(0, |l| l.lightbox.slides().len())
    }

    /// Whether a lightbox overlay is currently open.
    pub fn lightbox_open(&self) -> bool {
        self.lightbox.as_ref().is_some_and(|l| l.slot.is_open())
    }
}

thread_local! {
    static STARTED: Cell<bool> = const { Cell::new(false) };
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // A host page may have installed its own logger.
    let _ = console_log::init_with_level(log::Level::Info);
}

fn when_ready(document: Document, f: impl FnOnce(&Document) + 'static) {
    if document.ready_state() != "loading" {
        f(&document);
        return;
    }
    let target = document.clone();
    EventListener::once(&target, "DOMContentLoaded", move |_| f(&document)).forget();
}

fn launch(config: WidgetConfig) -> Result<(), JsValue> {
    if STARTED.with(|s| s.replace(true)) {
        log::warn!("dotnav-gallery already started on this page");
        return Ok(());
    }
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    when_ready(document, move |document| {
        let page = Page::boot(document, &config);
        PAGE.with(|p| *p.borrow_mut() = Some(page));
    });
    Ok(())
}

/// Boot every gallery on the page with the stock class names.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    init_logging();
    launch(WidgetConfig::default())
}

/// Boot with a sparse TOML config merged onto the stock defaults.
#[wasm_bindgen(js_name = startWithConfig)]
pub fn start_with_config(toml: &str) -> Result<(), JsValue> {
    init_logging();
    let config = config::parse_config(toml).map_err(|err| JsValue::from_str(&err.to_string()))?;
    launch(config)
}
