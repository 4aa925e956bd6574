//! Featured Orbit entry point
//!
//! Hosts the carousel and page scroller in the browser. The native binary
//! runs a scripted flick/dock session against a synthetic layout.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::DVec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        AddEventListenerOptions, CustomEvent, CustomEventInit, Document, Element, EventTarget, HtmlElement,
        KeyboardEvent, MediaQueryList, NodeList, PointerEvent, WheelEvent, Window,
    };

    use featured_orbit::input::{Key, KeyAction, KeyContext, PointerDown, PointerSample, WheelInput};
    use featured_orbit::page::tilt::{FEATURED_CARD_INTENSITY, tilt_for, tilts_for_pointer};
    use featured_orbit::page::{
        PageGeometry, PageScroller, PageWheel, QuickNav, SnapEnvironment, Tilt, TiltRect, TiltTarget, WheelTarget,
        anchors, scroll_ratio,
    };
    use featured_orbit::platform::Clock;
    use featured_orbit::platform::clock::PerformanceClock;
    use featured_orbit::track::{CardId, DEFAULT_CENTER_ID, LoopedTrack, TrackGeometry, storefront_lineup};
    use featured_orbit::{CarouselController, CarouselEvent, Settings, Tuning};

    const TRACK_SELECTOR: &str = "[data-featured-track]";
    const CONTROL_SELECTOR: &str = "button, a, input, select, textarea";
    const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
    const ANCHOR_IDS: [&str; 7] = [
        anchors::HOME,
        anchors::FEATURED,
        anchors::CATALOG,
        anchors::ABOUT,
        anchors::MANUFACTURERS,
        anchors::JOURNEY,
        anchors::CONTACT,
    ];

    /// Measured strip layout
    #[derive(Debug, Clone, Default)]
    struct DomTrack {
        viewport: f64,
        content: f64,
        centers: Vec<f64>,
    }

    impl DomTrack {
        fn measure(track: &HtmlElement) -> Self {
            let centers = track
                .query_selector_all("[data-slot]")
                .map(|list| {
                    elements(&list)
                        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
                        .map(|el| el.offset_left() as f64 + el.offset_width() as f64 / 2.0)
                        .collect()
                })
                .unwrap_or_default();
            Self {
                viewport: track.client_width() as f64,
                content: track.scroll_width() as f64,
                centers,
            }
        }
    }

    impl TrackGeometry for DomTrack {
        fn viewport_width(&self) -> f64 {
            self.viewport
        }

        fn slot_count(&self) -> usize {
            self.centers.len()
        }

        fn slot_center(&self, slot: usize) -> Option<f64> {
            self.centers.get(slot).copied()
        }

        fn content_width(&self) -> f64 {
            self.content
        }
    }

    /// Page layout snapshot
    struct DomPage {
        scroll_y: f64,
        viewport_width: f64,
        viewport_height: f64,
        document_height: f64,
        tops: Vec<f64>,
        anchors: Vec<(&'static str, f64, f64)>,
    }

    impl DomPage {
        fn measure(window: &Window, document: &Document) -> Self {
            let scroll_y = window.scroll_y().unwrap_or(0.0);
            let span = |el: &Element| {
                let rect = el.get_bounding_client_rect();
                (rect.top() + scroll_y, rect.bottom() + scroll_y)
            };
            let tops = document
                .query_selector_all("main > section")
                .map(|list| elements(&list).map(|el| span(&el).0).collect())
                .unwrap_or_default();
            let anchors = ANCHOR_IDS
                .iter()
                .filter_map(|&id| {
                    let (top, bottom) = span(&document.get_element_by_id(id)?);
                    Some((id, top, bottom))
                })
                .collect();
            Self {
                scroll_y,
                viewport_width: window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
                viewport_height: window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
                document_height: document
                    .document_element()
                    .map(|el| el.scroll_height() as f64)
                    .unwrap_or(0.0),
                tops,
                anchors,
            }
        }

        fn anchor(&self, id: &str) -> Option<&(&'static str, f64, f64)> {
            self.anchors.iter().find(|(anchor, _, _)| *anchor == id)
        }
    }

    impl PageGeometry for DomPage {
        fn scroll_y(&self) -> f64 {
            self.scroll_y
        }

        fn viewport_height(&self) -> f64 {
            self.viewport_height
        }

        fn viewport_width(&self) -> f64 {
            self.viewport_width
        }

        fn document_height(&self) -> f64 {
            self.document_height
        }

        fn section_tops(&self) -> Vec<f64> {
            self.tops.clone()
        }

        fn anchor_top(&self, id: &str) -> Option<f64> {
            self.anchor(id).map(|&(_, top, _)| top)
        }

        fn anchor_bottom(&self, id: &str) -> Option<f64> {
            self.anchor(id).map(|&(_, _, bottom)| bottom)
        }
    }

    fn elements(list: &NodeList) -> impl Iterator<Item = Element> + '_ {
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
    }

    fn event_element(event: &web_sys::Event) -> Option<Element> {
        event.target().and_then(|t| t.dyn_into::<Element>().ok())
    }

    fn closest(el: &Element, selector: &str) -> Option<Element> {
        el.closest(selector).ok().flatten()
    }

    fn set_style(el: &HtmlElement, property: &str, value: &str) {
        let _ = el.style().set_property(property, value);
    }

    fn media_matches(window: &Window, query: &str) -> bool {
        window
            .match_media(query)
            .ok()
            .flatten()
            .is_some_and(|list| list.matches())
    }

    /// Custom event waiting to be dispatched once the state borrow is released
    struct Outgoing {
        target: EventTarget,
        name: &'static str,
        detail: JsValue,
        bubbles: bool,
    }

    fn dispatch_all(outbox: Vec<Outgoing>) {
        for out in outbox {
            let init = CustomEventInit::new();
            init.set_bubbles(out.bubbles);
            init.set_detail(&out.detail);
            if let Ok(event) = CustomEvent::new_with_event_init_dict(out.name, &init) {
                let _ = out.target.dispatch_event(&event);
            }
        }
    }

    /// Host state shared by every listener
    struct Storefront {
        window: Window,
        document: Document,
        track_el: HtmlElement,
        carousel: CarouselController<DomTrack>,
        page: PageScroller,
        clock: PerformanceClock,
        /// Stored preferences, before the media query is applied
        settings: Settings,
        prefers_reduced: bool,
        /// Card shown in the detail overlay
        detail_id: Option<CardId>,
        outbox: Vec<Outgoing>,
        last_written: Option<i32>,
        last_active: Option<usize>,
        last_pulse: Option<i32>,
    }

    impl Storefront {
        fn now(&self) -> f64 {
            self.clock.now_ms()
        }

        fn measure_page(&self) -> DomPage {
            DomPage::measure(&self.window, &self.document)
        }

        fn emit(&mut self, target: EventTarget, name: &'static str, detail: JsValue, bubbles: bool) {
            self.outbox.push(Outgoing {
                target,
                name,
                detail,
                bubbles,
            });
        }

        fn apply_settings(&mut self) {
            let effective = self.settings.clone().with_reduced_motion(self.prefers_reduced);
            log::info!(
                "Settings applied (reduced motion {}, section snap {})",
                effective.reduced_motion,
                effective.effective_section_snap()
            );
            self.carousel.set_settings(effective.clone());
            self.page.set_settings(effective);
            self.last_written = None;
        }

        fn toggle_setting(&mut self, name: &str) {
            let flag = match name {
                "reduced-motion" => &mut self.settings.reduced_motion,
                "section-snap" => &mut self.settings.section_snap,
                "keyboard-navigation" => &mut self.settings.keyboard_navigation,
                _ => {
                    log::warn!("Unknown setting {}", name);
                    return;
                }
            };
            *flag = !*flag;
            self.settings.save();
            self.apply_settings();
        }

        fn body_has(&self, class: &str) -> bool {
            self.document
                .body()
                .is_some_and(|body| body.class_list().contains(class))
        }

        fn frame(&mut self) {
            let now = self.now();
            self.carousel.pump(now);

            let offset = self.carousel.offset().round() as i32;
            if self.last_written != Some(offset) {
                self.track_el.set_scroll_left(offset);
                self.last_written = Some(offset);
            }

            let feedback = self.carousel.feedback();
            set_style(
                &self.track_el,
                "--plasma-power",
                &format!("{:.3}", feedback.plasma_power),
            );
            let _ = self
                .track_el
                .class_list()
                .toggle_with_force("plasma-hot", feedback.plasma_hot());
            if feedback.arrow_pulse != self.last_pulse {
                self.last_pulse = feedback.arrow_pulse;
                if let Ok(list) = self.document.query_selector_all("[data-featured-arrow]") {
                    for arrow in elements(&list) {
                        let direction = arrow
                            .get_attribute("data-featured-arrow")
                            .and_then(|v| v.parse::<i32>().ok());
                        let pulsing = direction.is_some() && direction == feedback.arrow_pulse;
                        let _ = arrow.class_list().toggle_with_force("is-pulsing", pulsing);
                    }
                }
            }

            for event in self.carousel.drain_events() {
                match event {
                    CarouselEvent::OpenCard { id, slot } => {
                        log::info!("Opening {} (slot {})", id, slot);
                        let track: EventTarget = self.track_el.clone().into();
                        self.emit(track, "featured:open", JsValue::from_str(id.as_str()), true);
                        self.detail_id = Some(id);
                    }
                }
            }

            if let Some(y) = self.page.frame(now) {
                self.window.scroll_to_with_x_and_y(0.0, y);
                self.refresh_page(now);
            }
        }

        /// Quick-nav highlight and scroll progress
        fn refresh_page(&mut self, now: f64) {
            let page = self.measure_page();
            let active = self.page.refresh_active(&page, now);
            if let Some(root) = self
                .document
                .document_element()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let ratio = scroll_ratio(page.scroll_y, page.document_height, page.viewport_height);
                set_style(&root, "--scroll-ratio", &format!("{:.4}", ratio));
            }
            if self.last_active == Some(active) {
                return;
            }
            self.last_active = Some(active);
            self.render_quick_nav(self.page.quick_nav());
        }

        fn render_quick_nav(&self, nav: &QuickNav) {
            let Some(orbit) = self
                .document
                .get_element_by_id("orbit-nav")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            set_style(&orbit, "--orbit-progress", &format!("{}px", nav.progress_height()));
            set_style(&orbit, "--orbit-focus", &format!("{}px", nav.focus_top()));
            if let Ok(list) = orbit.query_selector_all("[data-orbit-node]") {
                for (index, node) in elements(&list).enumerate() {
                    let _ = node.class_list().toggle_with_force("is-active", index == nav.active());
                }
            }
            for (selector, enabled) in [
                ("[data-orbit-shift=\"-1\"]", nav.can_shift_up()),
                ("[data-orbit-shift=\"1\"]", nav.can_shift_down()),
            ] {
                if let Ok(Some(button)) = orbit.query_selector(selector) {
                    let _ = button.class_list().toggle_with_force("is-disabled", !enabled);
                }
            }
        }

        fn pointer_down(&mut self, event: &PointerEvent) {
            let Some(target) = event_element(event) else {
                return;
            };
            let slot = closest(&target, "[data-slot]")
                .and_then(|card| card.get_attribute("data-slot"))
                .and_then(|v| v.parse::<usize>().ok());
            let down = PointerDown {
                pointer_id: event.pointer_id(),
                button: event.button(),
                position: DVec2::new(event.client_x() as f64, event.client_y() as f64),
                on_control: closest(&target, CONTROL_SELECTOR).is_some(),
                slot,
            };
            let now = self.now();
            if self.carousel.pointer_down(down, now) {
                let _ = self.track_el.set_pointer_capture(event.pointer_id());
            }
        }

        fn page_wheel(&mut self, event: &WheelEvent) {
            let Some(target) = event_element(event) else {
                return;
            };
            let wheel = PageWheel {
                delta_x: event.delta_x(),
                delta_y: event.delta_y(),
                default_prevented: event.default_prevented(),
                modifier: event.ctrl_key() || event.meta_key() || event.shift_key(),
                target: WheelTarget {
                    in_carousel: closest(&target, TRACK_SELECTOR).is_some(),
                    in_orbit_nav: closest(&target, "#orbit-nav").is_some(),
                    in_scrollable: closest(&target, "[data-scrollable]").is_some(),
                    in_catalog: closest(&target, "#catalog").is_some(),
                    in_about: closest(&target, "#about, #manufacturers").is_some(),
                },
            };
            let env = SnapEnvironment {
                fine_pointer: media_matches(&self.window, "(pointer: fine)"),
                overlay_open: self.body_has("has-overlay"),
                ..Default::default()
            };
            let page = self.measure_page();
            let now = self.now();
            if self.page.on_wheel(&wheel, env, &page, now).prevents_default() {
                event.prevent_default();
            }
        }

        fn key_down(&mut self, event: &KeyboardEvent) {
            let in_text_field = self.document.active_element().is_some_and(|el| {
                matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
            });
            let ctx = KeyContext {
                in_text_field,
                detail_open: self.body_has("detail-open"),
                other_overlay_open: self.body_has("has-overlay"),
            };
            let now = self.now();
            let document: EventTarget = self.document.clone().into();
            match self.carousel.key(Key::from_dom(&event.key()), ctx, now) {
                KeyAction::Featured(_) => {}
                KeyAction::Detail(direction) => {
                    let next = self
                        .detail_id
                        .as_ref()
                        .and_then(|current| self.carousel.adjacent_card(current.as_str(), direction))
                        .cloned();
                    let Some(next) = next else {
                        return;
                    };
                    self.emit(document, "featured:detail-step", JsValue::from_str(next.as_str()), false);
                    self.detail_id = Some(next);
                }
                KeyAction::CloseOverlay => {
                    self.detail_id = None;
                    self.emit(document, "featured:close-overlay", JsValue::NULL, false);
                }
                KeyAction::Ignore => return,
            }
            event.prevent_default();
        }

        /// Delegated clicks: featured arrows, settings toggles, orbit nodes and
        /// shifts, catalog CTA
        fn click(&mut self, event: &web_sys::Event) {
            let Some(target) = event_element(event) else {
                return;
            };
            let now = self.now();
            let attribute = |selector: &str, name: &str| {
                closest(&target, selector).and_then(|el| el.get_attribute(name))
            };
            if let Some(name) = attribute("[data-setting]", "data-setting") {
                self.toggle_setting(&name);
                return;
            }
            if let Some(direction) = attribute("[data-featured-arrow]", "data-featured-arrow") {
                if let Ok(direction) = direction.parse::<i32>() {
                    self.carousel.scroll_featured(direction, now);
                }
                return;
            }
            let page = self.measure_page();
            let started = if let Some(index) = attribute("[data-orbit-node]", "data-orbit-node") {
                index
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.page.jump_to_section(index, &page, now))
            } else if let Some(direction) = attribute("[data-orbit-shift]", "data-orbit-shift") {
                direction
                    .parse::<i32>()
                    .ok()
                    .and_then(|direction| self.page.shift_section(direction, &page, now))
            } else if closest(&target, "[data-browse-catalog]").is_some() {
                self.page.scroll_to_catalog(&page, now)
            } else {
                None
            };
            if started.is_some() {
                event.prevent_default();
                self.refresh_page(now);
            }
        }

        fn tilt(&self, event: &PointerEvent, leaving: bool) {
            if !tilts_for_pointer(&event.pointer_type()) {
                return;
            }
            let Some(el) = event_element(event)
                .and_then(|t| closest(&t, "[data-tilt]"))
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            let tilt = if leaving {
                let still_inside = event
                    .related_target()
                    .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
                    .is_some_and(|node| el.contains(Some(&node)));
                if still_inside {
                    return;
                }
                Tilt::RESET
            } else {
                let (target, intensity) = match el.get_attribute("data-tilt").as_deref() {
                    Some("button") => (TiltTarget::Button, TiltTarget::Button.intensity()),
                    Some("panel") => (TiltTarget::Panel, TiltTarget::Panel.intensity()),
                    _ => (TiltTarget::Card, FEATURED_CARD_INTENSITY),
                };
                let rect = el.get_bounding_client_rect();
                let rect = TiltRect::new(rect.left(), rect.top(), rect.width(), rect.height());
                let pointer = DVec2::new(event.client_x() as f64, event.client_y() as f64);
                match tilt_for(pointer, rect, target, intensity) {
                    Some(tilt) => tilt,
                    None => return,
                }
            };
            for (property, value) in tilt.css_properties() {
                set_style(&el, property, &value);
            }
        }
    }

    fn render_track(document: &Document, track_el: &HtmlElement, track: &LoopedTrack) {
        track_el.set_inner_html("");
        for (index, slot) in track.slots().enumerate() {
            let Ok(card) = document.create_element("article") else {
                continue;
            };
            card.set_class_name("featured-card");
            let _ = card.set_attribute("data-slot", &index.to_string());
            let _ = card.set_attribute("data-card-id", slot.id.as_str());
            let _ = card.set_attribute("data-tilt", "card");
            if let Some(label) = track.cards().get(slot.base_index).map(|c| c.label.as_str()) {
                card.set_text_content(Some(label));
            }
            let _ = track_el.append_child(&card);
        }
    }

    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("orbit-tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {}", e);
                Tuning::default()
            }
        }
    }

    fn listen(
        target: &EventTarget,
        kind: &str,
        passive: Option<bool>,
        state: &Rc<RefCell<Storefront>>,
        handler: fn(&mut Storefront, &web_sys::Event),
    ) {
        let state = state.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            // Page handlers of these events may call back into the host
            let outbox = {
                let mut s = state.borrow_mut();
                handler(&mut s, &event);
                std::mem::take(&mut s.outbox)
            };
            dispatch_all(outbox);
        });
        let callback = closure.as_ref().unchecked_ref();
        let _ = match passive {
            Some(passive) => {
                let options = AddEventListenerOptions::new();
                options.set_passive(passive);
                target.add_event_listener_with_callback_and_add_event_listener_options(kind, callback, &options)
            }
            None => target.add_event_listener_with_callback(kind, callback),
        };
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }
        log::info!("Featured Orbit starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(track_el) = document
            .query_selector(TRACK_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            log::warn!("No featured track on this page");
            return;
        };

        let tuning = load_tuning(&document);
        let stored = Settings::load();
        let prefers_reduced = media_matches(&window, REDUCED_MOTION_QUERY);
        let settings = stored.clone().with_reduced_motion(prefers_reduced);

        let track = LoopedTrack::new(storefront_lineup(), tuning.carousel.repeat);
        render_track(&document, &track_el, &track);

        let mut carousel = CarouselController::new(
            storefront_lineup(),
            DomTrack::measure(&track_el),
            tuning.carousel.clone(),
            settings.clone(),
        )
        .with_default_center(DEFAULT_CENTER_ID);
        let clock = PerformanceClock;
        carousel.start(clock.now_ms());

        let page = PageScroller::new(QuickNav::storefront(), tuning.page.clone(), settings);
        let state = Rc::new(RefCell::new(Storefront {
            window: window.clone(),
            document: document.clone(),
            track_el: track_el.clone(),
            carousel,
            page,
            clock,
            settings: stored,
            prefers_reduced,
            detail_id: None,
            outbox: Vec::new(),
            last_written: None,
            last_active: None,
            last_pulse: None,
        }));
        {
            let mut s = state.borrow_mut();
            let page = s.measure_page();
            let now = s.now();
            s.page.start(&page, now);
            s.refresh_page(now);
        }

        setup_listeners(&window, &document, &track_el, &state);
        request_animation_frame(state);

        log::info!("Featured Orbit running!");
    }

    fn setup_listeners(window: &Window, document: &Document, track_el: &HtmlElement, state: &Rc<RefCell<Storefront>>) {
        // Track gestures
        listen(track_el, "pointerdown", None, state, |s, e| {
            if let Some(e) = e.dyn_ref::<PointerEvent>() {
                s.pointer_down(e);
            }
        });
        listen(track_el, "pointermove", Some(false), state, |s, e| {
            let Some(e) = e.dyn_ref::<PointerEvent>() else {
                return;
            };
            let sample = PointerSample {
                pointer_id: e.pointer_id(),
                position: DVec2::new(e.client_x() as f64, e.client_y() as f64),
            };
            let now = s.now();
            if s.carousel.pointer_move(sample, now) {
                e.prevent_default();
            }
        });
        listen(track_el, "pointerup", None, state, |s, e| {
            let Some(e) = e.dyn_ref::<PointerEvent>() else {
                return;
            };
            let sample = PointerSample {
                pointer_id: e.pointer_id(),
                position: DVec2::new(e.client_x() as f64, e.client_y() as f64),
            };
            let now = s.now();
            s.carousel.pointer_up(sample, now);
        });
        listen(track_el, "pointercancel", None, state, |s, e| {
            if let Some(e) = e.dyn_ref::<PointerEvent>() {
                let now = s.now();
                s.carousel.pointer_cancel(e.pointer_id(), now);
            }
        });
        listen(track_el, "wheel", Some(false), state, |s, e| {
            let Some(e) = e.dyn_ref::<WheelEvent>() else {
                return;
            };
            let input = WheelInput {
                delta_x: e.delta_x(),
                delta_y: e.delta_y(),
                delta_mode: e.delta_mode(),
            };
            let page_height = s.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let now = s.now();
            if s.carousel.wheel(input, page_height, now) {
                e.prevent_default();
            }
        });
        listen(track_el, "scroll", Some(true), state, |s, _| {
            let offset = s.track_el.scroll_left() as f64;
            let now = s.now();
            if s.carousel.on_native_scroll(offset, now) {
                s.last_written = None;
            }
        });

        // Page
        listen(window, "wheel", Some(false), state, |s, e| {
            if let Some(e) = e.dyn_ref::<WheelEvent>() {
                s.page_wheel(e);
            }
        });
        listen(window, "scroll", Some(true), state, |s, _| {
            let now = s.now();
            s.refresh_page(now);
        });
        listen(window, "resize", None, state, |s, _| {
            let geometry = DomTrack::measure(&s.track_el);
            let now = s.now();
            s.carousel.set_geometry(geometry, now);
            s.last_written = None;
            s.refresh_page(now);
        });
        listen(document, "keydown", None, state, |s, e| {
            if let Some(e) = e.dyn_ref::<KeyboardEvent>() {
                s.key_down(e);
            }
        });
        listen(document, "click", None, state, |s, e| s.click(e));
        if let Ok(Some(query)) = window.match_media(REDUCED_MOTION_QUERY) {
            listen(&query, "change", None, state, |s, e| {
                let Some(list) = e.current_target().and_then(|t| t.dyn_into::<MediaQueryList>().ok()) else {
                    return;
                };
                s.prefers_reduced = list.matches();
                s.apply_settings();
            });
        }

        // Hover tilt
        listen(document, "pointermove", Some(true), state, |s, e| {
            if let Some(e) = e.dyn_ref::<PointerEvent>() {
                s.tilt(e, false);
            }
        });
        listen(document, "pointerout", Some(true), state, |s, e| {
            if let Some(e) = e.dyn_ref::<PointerEvent>() {
                s.tilt(e, true);
            }
        });
    }

    fn request_animation_frame(state: Rc<RefCell<Storefront>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame_loop(state);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(state: Rc<RefCell<Storefront>>) {
        let outbox = {
            let mut s = state.borrow_mut();
            if s.carousel.is_disposed() {
                return;
            }
            s.frame();
            std::mem::take(&mut s.outbox)
        };
        dispatch_all(outbox);
        request_animation_frame(state);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_host::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Featured Orbit (native) starting...");
    log::info!("The browser host needs a wasm32 build - run with `trunk serve` for the storefront");

    println!("\nRunning scripted carousel session...");
    demo::carousel_session();
    println!("\nRunning scripted page session...");
    demo::page_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use featured_orbit::input::{PRIMARY_BUTTON, PointerDown, PointerSample};
    use featured_orbit::page::{PageScroller, StaticPage};
    use featured_orbit::platform::{Clock, FakeClock};
    use featured_orbit::track::{DEFAULT_CENTER_ID, storefront_lineup};
    use featured_orbit::{CarouselController, CarouselTuning, Settings, UniformTrack};
    use glam::DVec2;

    const FRAME_MS: f64 = 16.0;

    fn settle(carousel: &mut CarouselController<UniformTrack>, clock: &FakeClock) -> usize {
        let mut frames = 0;
        while !carousel.is_quiet() && frames < 2000 {
            carousel.pump(clock.advance(FRAME_MS));
            frames += 1;
        }
        frames
    }

    fn centered(carousel: &CarouselController<UniformTrack>) -> String {
        carousel
            .centered_card()
            .map_or_else(|| "-".to_string(), |id| id.to_string())
    }

    pub fn carousel_session() {
        let clock = FakeClock::new(0.0);
        let geometry = UniformTrack::new(35, 300.0, 20.0, 800.0);
        let mut carousel = CarouselController::new(
            storefront_lineup(),
            geometry,
            CarouselTuning::default(),
            Settings::load(),
        )
        .with_default_center(DEFAULT_CENTER_ID);
        carousel.start(clock.now_ms());
        println!("  start: offset {:.1}, centered {}", carousel.offset(), centered(&carousel));

        let down = PointerDown {
            pointer_id: 1,
            button: PRIMARY_BUTTON,
            position: DVec2::new(600.0, 200.0),
            on_control: false,
            slot: None,
        };
        carousel.pointer_down(down, clock.now_ms());
        let mut x = 600.0;
        for _ in 0..6 {
            x -= 40.0;
            let sample = PointerSample {
                pointer_id: 1,
                position: DVec2::new(x, 200.0),
            };
            carousel.pointer_move(sample, clock.advance(FRAME_MS));
        }
        let release = PointerSample {
            pointer_id: 1,
            position: DVec2::new(x, 200.0),
        };
        carousel.pointer_up(release, clock.advance(FRAME_MS));
        println!("  flick: velocity {:.3} px/ms", carousel.velocity());

        let frames = settle(&mut carousel, &clock);
        println!(
            "  docked after {} frames: offset {:.1}, centered {}",
            frames,
            carousel.offset(),
            centered(&carousel)
        );

        for direction in [1, 1, -1] {
            if let Some(plan) = carousel.scroll_featured(direction, clock.advance(60.0)) {
                println!(
                    "  arrow {:+}: {:.1}px over {:.0}ms (boost {:.2})",
                    direction, plan.distance, plan.glide_duration_ms, plan.boost
                );
            }
        }
        settle(&mut carousel, &clock);
        println!("  ✓ resting on {}", centered(&carousel));
        carousel.dispose();
    }

    pub fn page_session() {
        let clock = FakeClock::new(0.0);
        let mut scroller = PageScroller::storefront(Settings::load());
        let mut page = StaticPage::storefront(0.0);
        scroller.start(&page, clock.now_ms());

        if scroller.jump_to_id("catalog", &page, clock.now_ms()).is_none() {
            println!("  catalog section missing");
            return;
        }
        let mut frames = 0;
        while let Some(y) = scroller.frame(clock.advance(FRAME_MS)) {
            page.scroll_y = y;
            frames += 1;
        }
        let active = scroller.refresh_active(&page, clock.now_ms());
        println!(
            "  ✓ quick-nav jump landed at {:.0} after {} frames (active section {})",
            page.scroll_y, frames, active
        );
        scroller.dispose();
    }
}
