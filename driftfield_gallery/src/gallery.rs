// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gallery: the element list wired to motion, hover, and the feed.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use driftfield_feed::{
    ContentMerger, FeedError, FeedGate, GateStatus, MergeCandidate, PhaseTable, PlacementParams,
    ProgressTicker,
};
use driftfield_hover::{Effects, HoverConfig, HoverController};
use driftfield_mask::PixelMask;
use driftfield_motion::{BodyId, MotionParams, Simulator};
use driftfield_timing::DebounceTimer;
use hashbrown::HashMap;
use kurbo::{Point, Rect};
use rand::Rng;

use crate::generator::{BatchRequest, BatchResultItem, RequestToken, SessionSnapshot, SessionStore};
use crate::item::{DisplayItem, GeneratedItem, ImageData, LikedItem, ProductInfo};

impl MergeCandidate for BatchResultItem {
    fn id(&self) -> &str {
        &self.scene_id
    }

    fn aspect(&self) -> f64 {
        if self.image_size.width > 0.0 && self.image_size.height > 0.0 {
            self.image_size.width / self.image_size.height
        } else {
            1.0
        }
    }
}

/// Tuning for the assembled gallery.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryConfig {
    /// Motion tuning; the confinement bounds are overwritten from the
    /// placement field width and the content extent.
    pub motion: MotionParams,
    /// Hover show/hide timing.
    pub hover: HoverConfig,
    /// Spawn placement tuning, shared by mount seeding and batch merges.
    pub placement: PlacementParams,
    /// Pipeline phases driving synthetic progress.
    pub phases: PhaseTable,
    /// Synthetic progress tick period in milliseconds.
    pub progress_tick_ms: f64,
    /// How long a completed request shows 100 before resetting.
    pub progress_display_delay_ms: f64,
    /// Debounce delay for session writes in milliseconds.
    pub session_save_delay_ms: f64,
    /// Viewport extent in content units.
    pub viewport_extent: f64,
    /// Content extent before any item is laid out.
    pub initial_content_extent: f64,
    /// How many liked scenes are kept as request context.
    pub liked_context_limit: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            motion: MotionParams::default(),
            hover: HoverConfig::default(),
            placement: PlacementParams::default(),
            phases: PhaseTable::placement_default(),
            progress_tick_ms: 500.0,
            progress_display_delay_ms: 1_500.0,
            session_save_delay_ms: 800.0,
            viewport_extent: 800.0,
            initial_content_extent: 2_500.0,
            liked_context_limit: 10,
        }
    }
}

/// One live element: the displayed item plus the resources it owns.
#[derive(Clone, Debug)]
struct Element {
    item: DisplayItem,
    body: BodyId,
    size: kurbo::Size,
    mask: Option<PixelMask>,
}

/// Screen rectangle of an element at its body's current position.
fn rect_of(sim: &Simulator, element: &Element) -> Option<Rect> {
    let body = sim.body(element.body)?;
    Some(Rect::from_center_size(body.position, element.size))
}

/// The drift-field gallery.
///
/// Owns the element list and glues the subsystems together: every visible
/// item has exactly one simulation body, items with an embedded product own
/// a decoded [`PixelMask`], hover state is driven by mask hit tests against
/// the bodies' current rectangles, and scroll changes feed the
/// [`FeedGate`].
///
/// The host drives everything explicitly: [`Gallery::tick`] once per frame,
/// pointer and scroll events as they arrive, and the batch lifecycle as the
/// external pipeline resolves. Requests are identified by a
/// [`RequestToken`]; a token issued before [`Gallery::shutdown`] or a later
/// dispatch no longer matches and its result is dropped.
#[derive(Debug)]
pub struct Gallery {
    sim: Simulator,
    hover: HoverController<String>,
    gate: FeedGate,
    ticker: ProgressTicker,
    merger: ContentMerger,
    elements: Vec<Element>,
    ids: HashMap<String, BodyId>,
    viewport_extent: f64,
    scroll_offset: f64,
    content_extent: f64,
    user_context: String,
    products: Vec<ProductInfo>,
    liked: Vec<LikedItem>,
    liked_limit: usize,
    generation: u64,
    session_save: DebounceTimer,
    session_dirty: bool,
    last_error: Option<FeedError>,
}

impl Gallery {
    /// Creates an empty gallery.
    #[must_use]
    pub fn new(config: GalleryConfig) -> Self {
        let mut motion = config.motion;
        motion.bounds = Rect::new(
            0.0,
            0.0,
            config.placement.field_width,
            config.initial_content_extent,
        );
        Self {
            sim: Simulator::new(motion),
            hover: HoverController::new(config.hover),
            gate: FeedGate::new(),
            ticker: ProgressTicker::new(
                config.phases,
                config.progress_tick_ms,
                config.progress_display_delay_ms,
            ),
            merger: ContentMerger::new(config.placement),
            elements: Vec::new(),
            ids: HashMap::new(),
            viewport_extent: config.viewport_extent,
            scroll_offset: 0.0,
            content_extent: config.initial_content_extent,
            user_context: String::new(),
            products: Vec::new(),
            liked: Vec::new(),
            liked_limit: config.liked_context_limit,
            generation: 0,
            session_save: DebounceTimer::new(config.session_save_delay_ms),
            session_dirty: false,
            last_error: None,
        }
    }

    /// Seeds the gallery from the session store at mount time.
    ///
    /// Stored items are placed with the same randomized stacking as merged
    /// batches. `decode` turns encoded mask bytes into a [`PixelMask`]; a
    /// `None` means that element degrades to a plain image.
    pub fn mount(
        &mut self,
        store: &mut dyn SessionStore,
        mut decode: impl FnMut(&ImageData) -> Option<PixelMask>,
        now: f64,
        rng: &mut impl Rng,
    ) {
        let Some(snapshot) = store.load() else {
            return;
        };
        self.user_context = snapshot.user_context;
        let gap = self.merger.params().vertical_gap;
        let mut cursor = gap;
        let mut bottom = 0.0_f64;
        for item in snapshot.items {
            let rect = self.merger.place_one(item.aspect(), cursor, rng);
            cursor = rect.y1 + gap;
            bottom = bottom.max(rect.y1);
            let mask = item.mask_data().and_then(&mut decode);
            self.push_element(item, mask, rect, now);
        }
        if bottom > 0.0 {
            self.content_extent = self
                .content_extent
                .max(bottom + self.merger.params().extent_margin);
            self.sim.set_bounds(self.field_rect());
        }
    }

    /// Replaces the product catalog.
    ///
    /// A non-empty catalog latches feed readiness; before that, scrolling
    /// never dispatches a request.
    pub fn set_products(&mut self, products: Vec<ProductInfo>) {
        if !products.is_empty() {
            self.gate.mark_ready();
        }
        self.products = products;
    }

    /// Updates the free-form user context and schedules a session write.
    pub fn set_user_context(&mut self, context: impl Into<String>, now: f64) {
        self.user_context = context.into();
        self.touch_session(now);
    }

    /// Records a like on an element, keeping a bounded recent-likes list as
    /// context for future batch requests.
    pub fn mark_liked(&mut self, id: &str, now: f64) {
        let Some(element) = self.elements.iter().find(|e| e.item.id() == id) else {
            return;
        };
        self.liked.push(LikedItem {
            scene_id: element.item.id().to_string(),
            product_id: element.item.product().map(|p| p.id.clone()),
        });
        if self.liked.len() > self.liked_limit {
            self.liked.remove(0);
        }
        self.touch_session(now);
    }

    /// Advances one frame: steps the simulation, drops faded elements, polls
    /// synthetic progress, and fires due hover timers.
    pub fn tick(&mut self, now: f64, rng: &mut impl Rng) -> Effects<String> {
        self.sim.tick(now, rng);

        let mut effects = Effects::new();
        let sim = &self.sim;
        let ids = &mut self.ids;
        let mut dropped: Vec<String> = Vec::new();
        self.elements.retain(|element| {
            if sim.body(element.body).is_some() {
                return true;
            }
            ids.remove(element.item.id());
            dropped.push(element.item.id().to_string());
            false
        });
        if !dropped.is_empty() {
            self.touch_session(now);
            if let Some(shown) = self.hover.shown_id().cloned()
                && dropped.contains(&shown)
            {
                effects.extend(self.hover.close());
            }
        }

        self.ticker.poll(now);

        let sim = &self.sim;
        let elements = &self.elements;
        effects.extend(self.hover.advance(now, |id| {
            let element = elements.iter().find(|e| e.item.id() == id.as_str())?;
            let rect = rect_of(sim, element)?;
            element.mask.as_ref()?.active_bounds(rect)
        }));
        effects
    }

    /// Applies a scroll request.
    ///
    /// Returns the clamped offset, plus a batch request exactly when the
    /// trigger fired: the feed is ready, no request is in flight, and the
    /// visible bottom came within one viewport of the end of content.
    pub fn on_scroll(
        &mut self,
        requested: f64,
        now: f64,
    ) -> (f64, Option<(RequestToken, BatchRequest)>) {
        let clamped = self
            .gate
            .clamp_scroll(requested.max(0.0), self.viewport_extent);
        self.scroll_offset = clamped;
        let request = self
            .gate
            .on_scroll_changed(clamped, self.viewport_extent, self.content_extent)
            .then(|| self.dispatch_request(now));
        (clamped, request)
    }

    /// Updates the viewport extent, re-evaluating the trigger (a taller
    /// viewport can expose the end of content without any scrolling).
    pub fn set_viewport_extent(
        &mut self,
        extent: f64,
        now: f64,
    ) -> Option<(RequestToken, BatchRequest)> {
        self.viewport_extent = extent;
        self.gate
            .on_scroll_changed(self.scroll_offset, extent, self.content_extent)
            .then(|| self.dispatch_request(now))
    }

    /// Folds a finished batch into the gallery.
    ///
    /// Applied as one operation: survivors are deduplicated by id, placed
    /// below current content, given bodies, the extent grows, and the gate
    /// releases. `decode` turns encoded mask bytes into a [`PixelMask`]; a
    /// failed decode degrades that element to a plain image. Returns the
    /// number of items appended, or [`FeedError::StaleResult`] when the
    /// token no longer matches (result dropped, nothing changes).
    pub fn complete_batch(
        &mut self,
        token: RequestToken,
        batch: Vec<BatchResultItem>,
        mut decode: impl FnMut(&ImageData) -> Option<PixelMask>,
        now: f64,
        rng: &mut impl Rng,
    ) -> Result<usize, FeedError> {
        if token.generation != self.generation {
            #[cfg(feature = "tracing")]
            tracing::debug!(token = token.generation, "stale batch result dropped");
            return Err(FeedError::StaleResult);
        }

        let bottom = self.content_bottom();
        let outcome = self.merger.merge(
            batch,
            |id| self.ids.contains_key(id),
            bottom,
            self.content_extent,
            rng,
        );
        let appended = outcome.placed.len();
        for placed in outcome.placed {
            let BatchResultItem {
                scene_id,
                image,
                image_size,
                mask,
                product,
            } = placed.item;
            let pixels = mask.as_ref().and_then(&mut decode);
            let item = DisplayItem::Generated(GeneratedItem {
                scene_id,
                image,
                image_size,
                mask,
                product,
            });
            self.push_element(item, pixels, placed.rect, now);
        }
        self.content_extent = outcome.new_extent;
        self.sim.set_bounds(self.field_rect());
        self.gate.release();
        self.ticker.complete(now);
        self.last_error = None;
        self.touch_session(now);
        Ok(appended)
    }

    /// Records a failed batch: the gate releases so the user is never stuck,
    /// and the error is kept for an inline notice with a retry control.
    ///
    /// A stale token changes nothing and reports [`FeedError::StaleResult`].
    pub fn fail_batch(&mut self, token: RequestToken, message: String) -> FeedError {
        if token.generation != self.generation {
            return FeedError::StaleResult;
        }
        self.gate.release();
        self.ticker.cancel();
        let error = FeedError::Generation { message };
        self.last_error = Some(error.clone());
        error
    }

    /// Retries after a failure: re-gates at the current scroll offset and
    /// dispatches a fresh request, without waiting for a new scroll trigger.
    pub fn retry(&mut self, now: f64) -> Option<(RequestToken, BatchRequest)> {
        self.gate
            .regate(self.scroll_offset)
            .then(|| self.dispatch_request(now))
    }

    /// Tears the gallery down: cancels timers and invalidates outstanding
    /// request tokens, so a result arriving afterwards is dropped.
    pub fn shutdown(&mut self) {
        self.generation += 1;
        self.ticker.cancel();
        self.gate.release();
        self.session_save.cancel();
        #[cfg(feature = "tracing")]
        tracing::debug!("gallery shut down");
    }

    /// Pointer moved to this position (content coordinates).
    pub fn pointer_moved(&mut self, pointer: Point, now: f64) {
        match self.hit_test(pointer).map(ToString::to_string) {
            Some(id) => self.hover.pointer_over_active(id, now),
            None => self.hover.pointer_over_inactive(now),
        }
    }

    /// Click at this position.
    ///
    /// On an active region this toggles the overlay's click-lock (surfacing
    /// it immediately if it was not shown); anywhere else it dismisses the
    /// overlay.
    pub fn click(&mut self, pointer: Point) -> Effects<String> {
        match self.hit_test(pointer).map(ToString::to_string) {
            Some(id) => {
                let sim = &self.sim;
                let elements = &self.elements;
                self.hover.click_active(id, |id| {
                    let element = elements.iter().find(|e| e.item.id() == id.as_str())?;
                    let rect = rect_of(sim, element)?;
                    element.mask.as_ref()?.active_bounds(rect)
                })
            }
            None => self.hover.outside_click(),
        }
    }

    /// Pointer reached the overlay surface.
    pub fn overlay_enter(&mut self) {
        self.hover.overlay_enter();
    }

    /// Pointer left the overlay surface.
    pub fn overlay_leave(&mut self, now: f64) {
        self.hover.overlay_leave(now);
    }

    /// Explicit close action on the overlay.
    pub fn close_overlay(&mut self) -> Effects<String> {
        self.hover.close()
    }

    /// Fires a due session write, if any state changed since the last one.
    pub fn poll_session(&mut self, now: f64, store: &mut dyn SessionStore) {
        if self.session_save.fire(now) && self.session_dirty {
            let snapshot = SessionSnapshot {
                items: self.elements.iter().map(|e| e.item.clone()).collect(),
                user_context: self.user_context.clone(),
            };
            store.save(&snapshot);
            self.session_dirty = false;
        }
    }

    /// Topmost element whose embedded-product mask is active under the
    /// pointer. Elements without a mask are never hover-active.
    #[must_use]
    pub fn hit_test(&self, pointer: Point) -> Option<&str> {
        self.elements.iter().rev().find_map(|element| {
            let rect = rect_of(&self.sim, element)?;
            if !rect.contains(pointer) {
                return None;
            }
            let mask = element.mask.as_ref()?;
            mask.contains_point(pointer, rect).then(|| element.item.id())
        })
    }

    /// Current screen rectangle of an element.
    #[must_use]
    pub fn element_rect(&self, id: &str) -> Option<Rect> {
        let element = self.elements.iter().find(|e| e.item.id() == id)?;
        rect_of(&self.sim, element)
    }

    /// The displayed items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &DisplayItem> {
        self.elements.iter().map(|e| &e.item)
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` when no elements are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Current gate status.
    #[must_use]
    pub fn gate_status(&self) -> GateStatus {
        self.gate.status()
    }

    /// Returns `true` once the feed can dispatch requests.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    /// Current progress value in `[0, 100]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.ticker.progress()
    }

    /// Name of the pipeline phase currently displayed, while a request is in
    /// flight.
    #[must_use]
    pub fn current_phase_name(&self, now: f64) -> Option<&str> {
        self.ticker.current_phase_name(now)
    }

    /// The last batch failure, until a later batch succeeds.
    #[must_use]
    pub fn last_error(&self) -> Option<&FeedError> {
        self.last_error.as_ref()
    }

    /// Current scroll offset in content units.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Current content extent in content units.
    #[must_use]
    pub fn content_extent(&self) -> f64 {
        self.content_extent
    }

    /// Element whose overlay is currently shown, if any.
    #[must_use]
    pub fn shown_overlay(&self) -> Option<&str> {
        self.hover.shown_id().map(String::as_str)
    }

    fn dispatch_request(&mut self, now: f64) -> (RequestToken, BatchRequest) {
        self.generation += 1;
        self.ticker.start(now);
        self.last_error = None;
        #[cfg(feature = "tracing")]
        tracing::debug!(generation = self.generation, "batch request dispatched");
        (
            RequestToken {
                generation: self.generation,
            },
            BatchRequest {
                user_context: self.user_context.clone(),
                available_products: self.products.clone(),
                recently_liked: self.liked.clone(),
            },
        )
    }

    fn push_element(&mut self, item: DisplayItem, mask: Option<PixelMask>, rect: Rect, now: f64) {
        let body = self.sim.spawn(rect.center(), now);
        self.ids.insert(item.id().to_string(), body);
        self.elements.push(Element {
            item,
            body,
            size: rect.size(),
            mask,
        });
    }

    fn content_bottom(&self) -> f64 {
        self.elements
            .iter()
            .filter_map(|e| rect_of(&self.sim, e).map(|r| r.y1))
            .fold(0.0, f64::max)
    }

    fn field_rect(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.merger.params().field_width,
            self.content_extent,
        )
    }

    fn touch_session(&mut self, now: f64) {
        self.session_dirty = true;
        self.session_save.arm(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{BatchGenerator, SessionSnapshot};
    use crate::item::PreloadedItem;
    use alloc::vec;
    use driftfield_hover::HoverEffect;
    use kurbo::Size;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn product(id: &str) -> ProductInfo {
        ProductInfo {
            id: id.to_string(),
            title: "Lamp".to_string(),
            price_cents: Some(4_999),
        }
    }

    fn scene(id: &str) -> BatchResultItem {
        BatchResultItem {
            scene_id: id.to_string(),
            image: ImageData::new(vec![0], "image/png"),
            image_size: Size::new(1_024.0, 1_024.0),
            mask: None,
            product: None,
        }
    }

    fn masked_scene(id: &str) -> BatchResultItem {
        BatchResultItem {
            mask: Some(ImageData::new(vec![255], "image/png")),
            product: Some(product("p-1")),
            ..scene(id)
        }
    }

    fn gallery() -> Gallery {
        let mut gallery = Gallery::new(GalleryConfig::default());
        gallery.set_products(vec![product("p-1")]);
        gallery
    }

    fn no_decode(_: &ImageData) -> Option<PixelMask> {
        None
    }

    fn full_mask(_: &ImageData) -> Option<PixelMask> {
        PixelMask::from_brightness(1, 1, vec![255]).ok()
    }

    #[derive(Default)]
    struct FakeStore {
        snapshot: Option<SessionSnapshot>,
        saves: usize,
    }

    impl SessionStore for FakeStore {
        fn load(&mut self) -> Option<SessionSnapshot> {
            self.snapshot.clone()
        }

        fn save(&mut self, snapshot: &SessionSnapshot) {
            self.snapshot = Some(snapshot.clone());
            self.saves += 1;
        }
    }

    #[test]
    fn scroll_near_end_dispatches_exactly_one_request() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut gallery = gallery();

        // Extent 2500, viewport 800: the threshold is a visible bottom past
        // 1700, so scrolling to 700 does nothing.
        let (_, request) = gallery.on_scroll(700.0, 0.0);
        assert!(request.is_none());

        let (_, request) = gallery.on_scroll(1_800.0, 16.0);
        let (token, request) = request.expect("trigger must dispatch");
        assert_eq!(request.available_products.len(), 1);
        assert_eq!(gallery.gate_status(), GateStatus::Gated);

        // Further scrolling while gated dispatches nothing and is clamped to
        // one viewport past the gating offset.
        let (clamped, request) = gallery.on_scroll(9_999.0, 32.0);
        assert!(request.is_none());
        assert_eq!(clamped, 2_600.0);

        let appended = gallery
            .complete_batch(token, (0..5).map(|i| scene(&alloc::format!("s{i}"))).collect(), no_decode, 100.0, &mut rng)
            .expect("live token");
        assert_eq!(appended, 5);
        assert_eq!(gallery.len(), 5);
        assert_eq!(gallery.gate_status(), GateStatus::Open);
        assert!(gallery.content_extent() > 2_500.0);
        assert_eq!(gallery.progress(), 100.0);
    }

    #[test]
    fn merged_items_survive_the_next_frame() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut gallery = gallery();
        let (token, _) = gallery.on_scroll(1_800.0, 0.0).1.unwrap();
        gallery
            .complete_batch(
                token,
                (0..5).map(|i| scene(&alloc::format!("s{i}"))).collect(),
                no_decode,
                100.0,
                &mut rng,
            )
            .unwrap();
        // Merges are not frame-aligned; a tick right after the merge must
        // not sweep away the still-fading newcomers.
        gallery.tick(105.0, &mut rng);
        assert_eq!(gallery.len(), 5);
    }

    #[test]
    fn requests_ferry_through_a_batch_generator() {
        #[derive(Default)]
        struct RecordingGenerator {
            dispatched: Vec<(RequestToken, BatchRequest)>,
        }

        impl BatchGenerator for RecordingGenerator {
            fn dispatch(&mut self, token: RequestToken, request: BatchRequest) {
                self.dispatched.push((token, request));
            }
        }

        let mut rng = SmallRng::seed_from_u64(9);
        let mut gallery = gallery();
        let mut generator = RecordingGenerator::default();

        let (token, request) = gallery.on_scroll(1_800.0, 0.0).1.unwrap();
        generator.dispatch(token, request);

        // The host resolves the pipeline and reports back with the token it
        // was handed.
        let (token, request) = generator.dispatched.pop().unwrap();
        assert_eq!(request.available_products.len(), 1);
        gallery
            .complete_batch(token, vec![scene("a")], no_decode, 50.0, &mut rng)
            .unwrap();
        assert_eq!(gallery.gate_status(), GateStatus::Open);
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn not_ready_gallery_never_dispatches() {
        let mut gallery = Gallery::new(GalleryConfig::default());
        let (_, request) = gallery.on_scroll(2_400.0, 0.0);
        assert!(request.is_none());
        gallery.set_products(vec![product("p-1")]);
        assert!(gallery.on_scroll(2_400.0, 16.0).1.is_some());
    }

    #[test]
    fn merge_is_idempotent_and_still_releases_the_gate() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut gallery = gallery();

        let (token, _) = gallery.on_scroll(1_800.0, 0.0).1.unwrap();
        gallery
            .complete_batch(token, vec![scene("a"), scene("b")], no_decode, 50.0, &mut rng)
            .unwrap();

        let (token, _) = gallery
            .on_scroll(gallery.content_extent() - 900.0, 60.0)
            .1
            .expect("deep scroll re-triggers");
        let appended = gallery
            .complete_batch(token, vec![scene("b"), scene("c")], no_decode, 120.0, &mut rng)
            .unwrap();
        assert_eq!(appended, 1);
        assert_eq!(gallery.len(), 3);
        assert_eq!(gallery.gate_status(), GateStatus::Open);
    }

    #[test]
    fn result_after_shutdown_is_dropped() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut gallery = gallery();
        let (token, _) = gallery.on_scroll(1_800.0, 0.0).1.unwrap();
        gallery.shutdown();
        let result = gallery.complete_batch(token, vec![scene("a")], no_decode, 100.0, &mut rng);
        assert_eq!(result, Err(FeedError::StaleResult));
        assert!(gallery.is_empty());
    }

    #[test]
    fn failure_releases_gate_and_retry_redispatches() {
        let mut gallery = gallery();
        let (token, _) = gallery.on_scroll(1_800.0, 0.0).1.unwrap();

        let error = gallery.fail_batch(token, "pipeline exploded".to_string());
        assert!(matches!(error, FeedError::Generation { .. }));
        assert_eq!(gallery.gate_status(), GateStatus::Open);
        assert_eq!(gallery.progress(), 0.0);
        assert!(gallery.last_error().is_some());

        let (_, request) = gallery.retry(200.0).expect("retry re-gates");
        assert_eq!(request.available_products.len(), 1);
        assert_eq!(gallery.gate_status(), GateStatus::Gated);
        assert!(gallery.retry(300.0).is_none());
    }

    #[test]
    fn stale_failure_changes_nothing() {
        let mut gallery = gallery();
        let (stale, _) = gallery.on_scroll(1_800.0, 0.0).1.unwrap();
        gallery.fail_batch(stale, "first".to_string());
        let (live, _) = gallery.retry(100.0).unwrap();
        assert_eq!(gallery.fail_batch(stale, "old".to_string()), FeedError::StaleResult);
        assert_eq!(gallery.gate_status(), GateStatus::Gated);
        gallery.fail_batch(live, "second".to_string());
        assert_eq!(gallery.gate_status(), GateStatus::Open);
    }

    #[test]
    fn masked_element_drives_hover_through_tick() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut gallery = gallery();
        let (token, _) = gallery.on_scroll(1_800.0, 0.0).1.unwrap();
        gallery
            .complete_batch(token, vec![masked_scene("hit")], full_mask, 100.0, &mut rng)
            .unwrap();

        let rect = gallery.element_rect("hit").unwrap();
        gallery.pointer_moved(rect.center(), 100.0);
        let effects = gallery.tick(650.0, &mut rng);
        assert_eq!(effects.len(), 1, "show must fire after the delay");
        assert!(matches!(effects[0], HoverEffect::Show { ref id, .. } if id == "hit"));
        assert_eq!(gallery.shown_overlay(), Some("hit"));
    }

    #[test]
    fn maskless_elements_are_never_hover_active() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut gallery = gallery();
        let (token, _) = gallery.on_scroll(1_800.0, 0.0).1.unwrap();
        gallery
            .complete_batch(token, vec![scene("plain")], no_decode, 100.0, &mut rng)
            .unwrap();
        let rect = gallery.element_rect("plain").unwrap();
        assert_eq!(gallery.hit_test(rect.center()), None);
    }

    #[test]
    fn mount_seeds_items_and_session_writes_are_debounced() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut store = FakeStore::default();
        store.snapshot = Some(SessionSnapshot {
            items: vec![
                DisplayItem::Preloaded(PreloadedItem {
                    id: "seed-1".to_string(),
                    image: ImageData::new(vec![1], "image/png"),
                    image_size: Size::new(800.0, 600.0),
                    product: None,
                }),
                DisplayItem::Preloaded(PreloadedItem {
                    id: "seed-2".to_string(),
                    image: ImageData::new(vec![2], "image/png"),
                    image_size: Size::new(600.0, 800.0),
                    product: None,
                }),
            ],
            user_context: "cozy reading nook".to_string(),
        });

        let mut gallery = gallery();
        gallery.mount(&mut store, no_decode, 0.0, &mut rng);
        assert_eq!(gallery.len(), 2);
        assert!(gallery.element_rect("seed-1").is_some());

        // Mounting alone writes nothing back.
        gallery.poll_session(10_000.0, &mut store);
        assert_eq!(store.saves, 0);

        gallery.set_user_context("minimalist loft", 10_000.0);
        gallery.poll_session(10_100.0, &mut store);
        assert_eq!(store.saves, 0, "write must wait out the debounce");
        gallery.poll_session(10_800.0, &mut store);
        assert_eq!(store.saves, 1);
        assert_eq!(
            store.snapshot.as_ref().unwrap().user_context,
            "minimalist loft"
        );
        // Nothing changed since; no further writes.
        gallery.poll_session(20_000.0, &mut store);
        assert_eq!(store.saves, 1);
    }

    #[test]
    fn likes_are_bounded_and_carried_into_requests() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut gallery = gallery();
        let (token, _) = gallery.on_scroll(1_800.0, 0.0).1.unwrap();
        let batch: Vec<_> = (0..12).map(|i| scene(&alloc::format!("s{i}"))).collect();
        gallery
            .complete_batch(token, batch, no_decode, 50.0, &mut rng)
            .unwrap();
        for i in 0..12 {
            gallery.mark_liked(&alloc::format!("s{i}"), 60.0);
        }
        gallery.mark_liked("no-such-item", 61.0);

        let (_, request) = gallery.retry(200.0).unwrap();
        assert_eq!(request.recently_liked.len(), 10);
        // Oldest likes fall off the front.
        assert_eq!(request.recently_liked[0].scene_id, "s2");
    }
}
