//! Keeping overlays in step with a rendered image.
//!
//! An [`ImageSurface`] stands in for whatever displays the image. It learns
//! the natural size when the resource finishes loading and the displayed
//! size whenever layout changes, and it tells listeners about both:
//!
//! - **ready**: fired by [`ImageSurface::load`]
//! - **resize**: fired by [`ImageSurface::resize`], only once loaded
//! - **unload**: fired by [`ImageSurface::unload`] while a resource is loaded
//!
//! Registration hands back a [`Subscription`] tied to the surface that issued
//! it. Listeners stay registered until that subscription is passed to
//! [`ImageSurface::cancel`] on the same surface; dropping it does nothing.
//!
//! [`OverlayView`] is the usual listener: it owns a box sequence, registers
//! for all three events, clears its overlays on unload and recomputes its overlays with
//! [`remap`](super::remap) each time. Recomputes are cheap and pure, so a
//! burst of resizes simply leaves the overlays matching the last one.

use super::{ImageDimensions, OverlayBox, remap};
use crate::text_layout::TextBlock;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Listeners get the current dimensions, or `None` for unload.
type Callback = Box<dyn FnMut(Option<&ImageDimensions>)>;

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Ready,
    Resize,
    Unload,
}

struct Listener {
    id: u64,
    kind: EventKind,
    callback: Callback,
}

/// Handle for a registered listener.
#[must_use = "a listener stays registered until its subscription is cancelled"]
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    surface: u64,
    id: u64,
}

/// The rendered image: natural size once loaded, current displayed size, and
/// the listeners waiting on either.
pub struct ImageSurface {
    id: u64,
    natural: Option<(u32, u32)>,
    displayed: (f64, f64),
    listeners: Vec<Listener>,
    next_listener: u64,
}

impl Default for ImageSurface {
    fn default() -> Self {
        Self::new((0.0, 0.0))
    }
}

impl ImageSurface {
    /// A surface with nothing loaded, rendered at `displayed` size.
    pub fn new(displayed: (f64, f64)) -> Self {
        Self {
            id: NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed),
            natural: None,
            displayed,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Current dimensions, or `None` while the natural size is unknown or
    /// zero.
    pub fn dimensions(&self) -> Option<ImageDimensions> {
        self.natural
            .map(|natural| ImageDimensions::new(natural, self.displayed))
            .filter(ImageDimensions::is_measurable)
    }

    pub fn is_loaded(&self) -> bool {
        self.dimensions().is_some()
    }

    /// Register a listener fired every time a resource finishes loading.
    pub fn on_ready(&mut self, callback: impl FnMut(&ImageDimensions) + 'static) -> Subscription {
        self.register(EventKind::Ready, with_dimensions(callback))
    }

    /// Register a listener fired on every displayed-size change after load.
    pub fn on_resize(&mut self, callback: impl FnMut(&ImageDimensions) + 'static) -> Subscription {
        self.register(EventKind::Resize, with_dimensions(callback))
    }

    /// Register a listener fired when a loaded resource is torn down.
    pub fn on_unload(&mut self, mut callback: impl FnMut() + 'static) -> Subscription {
        self.register(EventKind::Unload, Box::new(move |_| callback()))
    }

    /// Remove a listener. Returns `false` if it was already gone or was
    /// issued by another surface, in which case nothing is removed.
    pub fn cancel(&mut self, subscription: Subscription) -> bool {
        if subscription.surface != self.id {
            debug!(
                surface = self.id,
                issued_by = subscription.surface,
                "ignoring subscription from another surface"
            );
            return false;
        }
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != subscription.id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// A resource with the given natural size finished loading.
    ///
    /// Replaces any previous resource's size. A zero-sized resource is
    /// recorded but fires nothing.
    pub fn load(&mut self, natural_width: u32, natural_height: u32) {
        self.natural = Some((natural_width, natural_height));
        debug!(natural_width, natural_height, "image surface loaded");
        self.fire(EventKind::Ready);
    }

    /// The rendered size changed.
    pub fn resize(&mut self, displayed_width: f64, displayed_height: f64) {
        self.displayed = (displayed_width, displayed_height);
        debug!(displayed_width, displayed_height, "image surface resized");
        self.fire(EventKind::Resize);
    }

    /// Forget the current resource and tell unload listeners. Listeners stay
    /// registered.
    pub fn unload(&mut self) {
        let was_loaded = self.is_loaded();
        self.natural = None;
        if was_loaded {
            debug!("image surface unloaded");
            self.notify(EventKind::Unload, None);
        }
    }

    fn register(&mut self, kind: EventKind, callback: Callback) -> Subscription {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push(Listener { id, kind, callback });
        Subscription {
            surface: self.id,
            id,
        }
    }

    fn fire(&mut self, kind: EventKind) {
        let Some(dims) = self.dimensions() else {
            return;
        };
        self.notify(kind, Some(&dims));
    }

    fn notify(&mut self, kind: EventKind, dims: Option<&ImageDimensions>) {
        for listener in self.listeners.iter_mut().filter(|l| l.kind == kind) {
            (listener.callback)(dims);
        }
    }
}

fn with_dimensions(mut callback: impl FnMut(&ImageDimensions) + 'static) -> Callback {
    Box::new(move |dims| {
        if let Some(dims) = dims {
            callback(dims);
        }
    })
}

#[derive(Debug, Default)]
struct OverlayState {
    boxes: Vec<TextBlock>,
    overlays: Vec<OverlayBox>,
    recomputes: usize,
}

impl OverlayState {
    fn refresh(&mut self, dims: Option<&ImageDimensions>) {
        self.overlays = match dims {
            Some(dims) => remap(&self.boxes, dims),
            None => Vec::new(),
        };
        self.recomputes += 1;
    }
}

/// A box sequence bound to a surface, with overlays kept current.
#[must_use = "a view stays registered on its surface until it is detached"]
pub struct OverlayView {
    state: Rc<RefCell<OverlayState>>,
    ready: Subscription,
    resize: Subscription,
    unload: Subscription,
}

impl OverlayView {
    /// Bind `boxes` to `surface`. If the surface has already loaded, the
    /// overlays are computed straight away.
    pub fn attach(surface: &mut ImageSurface, boxes: Vec<TextBlock>) -> Self {
        let state = Rc::new(RefCell::new(OverlayState {
            boxes,
            ..OverlayState::default()
        }));

        let on_ready = Rc::clone(&state);
        let ready = surface.on_ready(move |dims| on_ready.borrow_mut().refresh(Some(dims)));
        let on_resize = Rc::clone(&state);
        let resize = surface.on_resize(move |dims| on_resize.borrow_mut().refresh(Some(dims)));
        let on_unload = Rc::clone(&state);
        let unload = surface.on_unload(move || on_unload.borrow_mut().refresh(None));

        if let Some(dims) = surface.dimensions() {
            state.borrow_mut().refresh(Some(&dims));
        }

        Self {
            state,
            ready,
            resize,
            unload,
        }
    }

    /// Replace the box sequence wholesale and recompute against the
    /// surface's current size.
    pub fn set_boxes(&mut self, surface: &ImageSurface, boxes: Vec<TextBlock>) {
        let mut state = self.state.borrow_mut();
        state.boxes = boxes;
        state.refresh(surface.dimensions().as_ref());
    }

    /// Overlays for the most recent dimensions.
    pub fn overlays(&self) -> Vec<OverlayBox> {
        self.state.borrow().overlays.clone()
    }

    /// How many times the overlays have been recomputed.
    pub fn recompute_count(&self) -> usize {
        self.state.borrow().recomputes
    }

    /// Cancel the view's subscriptions and return the last overlays.
    ///
    /// `surface` must be the one the view was attached to; any other surface
    /// is left untouched.
    pub fn detach(self, surface: &mut ImageSurface) -> Vec<OverlayBox> {
        let Self {
            state,
            ready,
            resize,
            unload,
        } = self;
        for subscription in [ready, resize, unload] {
            surface.cancel(subscription);
        }
        let overlays = state.borrow().overlays.clone();
        overlays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn block(x: u32, y: u32, width: u32, height: u32) -> TextBlock {
        TextBlock {
            text: "word".to_string(),
            x,
            y,
            width,
            height,
            confidence: 0.95,
        }
    }

    #[test]
    fn resize_before_load_fires_nothing() {
        let mut surface = ImageSurface::new((100.0, 100.0));
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = surface.on_resize(move |_| h.set(h.get() + 1));

        surface.resize(200.0, 200.0);
        assert_eq!(hits.get(), 0);

        surface.load(50, 50);
        surface.resize(300.0, 300.0);
        assert_eq!(hits.get(), 1);
        assert!(surface.cancel(sub));
    }

    #[test]
    fn zero_natural_size_defers_ready() {
        let mut surface = ImageSurface::new((100.0, 100.0));
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = surface.on_ready(move |_| h.set(h.get() + 1));

        surface.load(0, 80);
        assert_eq!(hits.get(), 0);
        assert!(!surface.is_loaded());
    }

    #[test]
    fn cancel_removes_listener_once() {
        let mut surface = ImageSurface::new((10.0, 10.0));
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = surface.on_ready(move |_| h.set(h.get() + 1));
        let (issuer, id) = (sub.surface, sub.id);

        assert!(surface.cancel(sub));
        assert!(!surface.cancel(Subscription {
            surface: issuer,
            id
        }));
        surface.load(10, 10);
        assert_eq!(hits.get(), 0);
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn view_recomputes_on_load() {
        let mut surface = ImageSurface::new((500.0, 500.0));
        let view = OverlayView::attach(&mut surface, vec![block(100, 50, 40, 20)]);
        assert!(view.overlays().is_empty());

        surface.load(1000, 500);
        let o = &view.overlays()[0];
        assert_eq!((o.x, o.y, o.width, o.height), (50.0, 50.0, 20.0, 20.0));
    }

    #[test]
    fn view_attached_after_load_computes_immediately() {
        let mut surface = ImageSurface::new((200.0, 100.0));
        surface.load(100, 100);

        let view = OverlayView::attach(&mut surface, vec![block(10, 10, 10, 10)]);
        let o = &view.overlays()[0];
        assert_eq!((o.x, o.y), (20.0, 10.0));
        assert_eq!(view.recompute_count(), 1);
    }

    #[test]
    fn last_resize_wins() {
        let mut surface = ImageSurface::new((100.0, 100.0));
        let view = OverlayView::attach(&mut surface, vec![block(10, 10, 10, 10)]);
        surface.load(100, 100);

        for (w, h) in [(300.0, 50.0), (80.0, 120.0), (50.0, 200.0)] {
            surface.resize(w, h);
        }
        let o = &view.overlays()[0];
        assert_eq!((o.x, o.y, o.width, o.height), (5.0, 20.0, 5.0, 20.0));
        assert_eq!(view.recompute_count(), 4);
    }

    #[test]
    fn set_boxes_replaces_and_recomputes() {
        let mut surface = ImageSurface::new((50.0, 50.0));
        surface.load(100, 100);
        let mut view = OverlayView::attach(&mut surface, vec![block(10, 10, 10, 10)]);

        view.set_boxes(&surface, vec![block(40, 40, 20, 20), block(0, 0, 2, 2)]);
        let overlays = view.overlays();
        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays[0].x, 20.0);

        view.set_boxes(&surface, Vec::new());
        assert!(view.overlays().is_empty());
    }

    #[test]
    fn set_boxes_before_load_leaves_no_stale_overlays() {
        let mut surface = ImageSurface::new((50.0, 50.0));
        surface.load(100, 100);
        let mut view = OverlayView::attach(&mut surface, vec![block(10, 10, 10, 10)]);
        assert_eq!(view.overlays().len(), 1);

        surface.unload();
        view.set_boxes(&surface, vec![block(1, 1, 1, 1)]);
        assert!(view.overlays().is_empty());

        surface.load(10, 10);
        assert_eq!(view.overlays()[0].x, 5.0);
    }

    #[test]
    fn detach_releases_all_listeners() {
        let mut surface = ImageSurface::new((100.0, 100.0));
        let view = OverlayView::attach(&mut surface, vec![block(10, 10, 10, 10)]);
        assert_eq!(surface.listener_count(), 3);

        surface.load(100, 100);
        let last = view.detach(&mut surface);
        assert_eq!(surface.listener_count(), 0);
        assert_eq!(last[0].x, 10.0);

        // Further events reach nobody.
        surface.resize(1.0, 1.0);
        surface.load(5, 5);
    }

    #[test]
    fn cancel_ignores_subscription_from_another_surface() {
        let mut a = ImageSurface::new((10.0, 10.0));
        let mut b = ImageSurface::new((10.0, 10.0));
        let sub_a = a.on_ready(|_| {});
        let sub_b = b.on_ready(|_| {});
        assert_eq!(sub_a.id, sub_b.id);

        assert!(!b.cancel(sub_a));
        assert_eq!(b.listener_count(), 1);
        assert!(b.cancel(sub_b));
    }

    #[test]
    fn detach_from_wrong_surface_leaves_both_untouched() {
        let mut a = ImageSurface::new((100.0, 100.0));
        let mut b = ImageSurface::new((100.0, 100.0));
        let other = OverlayView::attach(&mut b, vec![block(1, 1, 1, 1)]);

        let view = OverlayView::attach(&mut a, vec![block(10, 10, 10, 10)]);
        let _ = view.detach(&mut b);
        assert_eq!(a.listener_count(), 3);
        assert_eq!(b.listener_count(), 3);

        b.load(10, 10);
        assert_eq!(other.overlays().len(), 1);
        let _ = other.detach(&mut b);
        assert_eq!(b.listener_count(), 0);
    }

    #[test]
    fn unload_clears_view_overlays() {
        let mut surface = ImageSurface::new((50.0, 50.0));
        let view = OverlayView::attach(&mut surface, vec![block(10, 10, 10, 10)]);
        surface.load(100, 100);
        assert_eq!(view.overlays().len(), 1);

        surface.unload();
        assert!(view.overlays().is_empty());
        assert_eq!(view.recompute_count(), 2);

        // a second unload with nothing loaded is silent
        surface.unload();
        assert_eq!(view.recompute_count(), 2);

        surface.load(20, 20);
        assert_eq!(view.overlays()[0].x, 25.0);
        let _ = view.detach(&mut surface);
    }
}
