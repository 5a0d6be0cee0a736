use motion_portfolio::{
    config::MotionConfig,
    logging::{log_event, LogLevel},
    motion::{
        Bounds, CancelToken, ElementKey, InteractionController, ObservationWindow, PointerEvent, Pose, ResourceKind,
        RevealSequencer, RevealStyle, Scope, ScrollMetrics, SectionRect, Timeline,
    },
};
use std::{
    cell::{Cell, RefCell, RefMut},
    collections::{BTreeMap, HashMap},
    rc::Rc,
};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, Element, Event, EventTarget, HtmlElement};

/// Interaction controller shared between a grid component and its cards.
#[derive(Clone)]
pub struct SharedController(Rc<RefCell<InteractionController>>);

impl PartialEq for SharedController {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl SharedController {
    pub fn new(controller: InteractionController) -> Self {
        Self(Rc::new(RefCell::new(controller)))
    }

    pub fn borrow_mut(&self) -> RefMut<'_, InteractionController> {
        self.0.borrow_mut()
    }

    pub fn perspective(&self) -> f64 {
        self.0.borrow().profile().perspective()
    }
}

struct Binding {
    node: HtmlElement,
    perspective: Option<f64>,
}

/// Page-wide animation state: the one timeline that writes element styles,
/// the DOM nodes it writes to, and the reveal latches.
pub struct Stage {
    config: MotionConfig,
    pub timeline: Timeline,
    reveals: RevealSequencer,
    nodes: HashMap<ElementKey, Binding>,
    routes: HashMap<ElementKey, SharedController>,
    reveal_targets: BTreeMap<String, HtmlElement>,
    reveal_check: bool,
    next_key: u32,
}

impl Stage {
    fn new(config: MotionConfig) -> Self {
        Self {
            config,
            timeline: Timeline::new(),
            reveals: RevealSequencer::new(),
            nodes: HashMap::new(),
            routes: HashMap::new(),
            reveal_targets: BTreeMap::new(),
            reveal_check: true,
            next_key: 0,
        }
    }

    pub fn bind(&mut self, node: HtmlElement, perspective: Option<f64>) -> ElementKey {
        self.next_key += 1;
        let key = ElementKey(self.next_key);
        self.nodes.insert(key, Binding { node, perspective });
        key
    }

    pub fn unbind(&mut self, key: ElementKey) {
        self.timeline.remove_element(key);
        self.nodes.remove(&key);
        self.routes.remove(&key);
    }

    /// Sends completions for `key` to `controller` so return tweens can hand
    /// the element back.
    pub fn route(&mut self, key: ElementKey, controller: SharedController) {
        self.routes.insert(key, controller);
    }

    pub fn pointer(&mut self, controller: &SharedController, key: Option<ElementKey>, event: PointerEvent) {
        let Some(binding) = key.and_then(|key| self.nodes.get(&key)) else {
            return;
        };
        let bounds = element_bounds(&binding.node);
        controller.borrow_mut().handle(&mut self.timeline, key, event, bounds);
    }

    pub fn prepare_reveal(
        &mut self,
        section: &str,
        node: HtmlElement,
        style: RevealStyle,
        observation: ObservationWindow,
        delay: f64,
    ) -> ElementKey {
        let key = self.bind(node.clone(), None);
        self.reveals
            .prepare(&mut self.timeline, section, Some(key), style, observation, delay);
        self.reveal_targets.insert(section.to_string(), node);
        self.reveal_check = true;
        self.flush();
        key
    }

    /// Unmount of a reveal wrapper. A newer mount of the same section may
    /// already own the target, so only this node's entries are dropped.
    pub fn release_reveal(&mut self, section: &str, key: ElementKey) {
        let released = self.nodes.get(&key).map(|binding| binding.node.clone());
        if released.is_some() && self.reveal_targets.get(section) == released.as_ref() {
            self.reveal_targets.remove(section);
        }
        self.reveals.release(section, key);
        self.unbind(key);
    }

    pub fn request_reveal_check(&mut self) {
        self.reveal_check = true;
    }

    fn check_reveals(&mut self) {
        if !self.reveal_check {
            return;
        }
        self.reveal_check = false;

        let (_, viewport_height) = viewport_size();
        let due: Vec<(String, SectionRect)> = self
            .reveals
            .pending()
            .filter_map(|section| {
                self.reveal_targets
                    .get(section)
                    .map(|node| (section.to_string(), section_rect(node)))
            })
            .collect();

        for (section, rect) in due {
            if let Some(cue) = self
                .reveals
                .observe(&mut self.timeline, &section, rect, viewport_height)
            {
                log_event(
                    &self.config.log,
                    LogLevel::Debug,
                    "reveal_fired",
                    serde_json::json!({ "section": cue.section, "delay": cue.delay }),
                );
            }
        }
    }

    /// One display frame: fire due reveals, advance tweens, hand back finished
    /// return tweens, then write every changed pose.
    pub fn frame(&mut self, dt: f64) {
        self.check_reveals();

        for completion in self.timeline.tick(dt) {
            if let Some(controller) = self.routes.get(&completion.element) {
                controller.borrow_mut().on_complete(&mut self.timeline, completion);
            }
        }
        self.flush();
    }

    pub fn flush(&mut self) {
        for (key, pose) in self.timeline.drain_dirty() {
            if let Some(binding) = self.nodes.get(&key) {
                apply_pose(&binding.node, &pose, binding.perspective);
            }
        }
    }

    pub fn teardown(&mut self) -> u64 {
        self.reveals.teardown(&mut self.timeline);
        let keys: Vec<ElementKey> = self.nodes.keys().copied().collect();
        for key in keys {
            self.unbind(key);
        }
        self.reveal_targets.clear();
        self.timeline.stats().live()
    }
}

#[derive(Clone)]
pub struct MotionContext(Rc<RefCell<Stage>>);

impl PartialEq for MotionContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl MotionContext {
    pub fn new(config: MotionConfig) -> Self {
        Self(Rc::new(RefCell::new(Stage::new(config))))
    }

    /// Runs `f` against the stage unless it is already borrowed further up
    /// the stack.
    pub fn with<R>(&self, f: impl FnOnce(&mut Stage) -> R) -> Option<R> {
        let mut stage = self.0.try_borrow_mut().ok()?;
        Some(f(&mut stage))
    }

    pub fn config(&self) -> MotionConfig {
        self.0
            .try_borrow()
            .map(|stage| stage.config.clone())
            .unwrap_or_default()
    }
}

type FrameClosure = Closure<dyn FnMut(f64)>;

/// Self-rescheduling `requestAnimationFrame` callback. The loop ends when
/// the token is cancelled, `on_frame` returns `false`, or `stop` is called.
pub struct FrameLoop {
    callback: Rc<RefCell<Option<FrameClosure>>>,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn start(token: CancelToken, mut on_frame: impl FnMut(f64) -> bool + 'static) -> Self {
        let callback: Rc<RefCell<Option<FrameClosure>>> = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let callback_for_frame = Rc::clone(&callback);
        let handle_for_frame = Rc::clone(&handle);
        let closure = Closure::wrap(Box::new(move |timestamp: f64| {
            handle_for_frame.set(None);
            if token.is_cancelled() || !on_frame(timestamp) {
                return;
            }
            if let Some(next) = callback_for_frame.borrow().as_ref() {
                handle_for_frame.set(request_frame(next));
            }
        }) as Box<dyn FnMut(f64)>);

        handle.set(request_frame(&closure));
        *callback.borrow_mut() = Some(closure);

        Self { callback, handle }
    }

    pub fn stop(&self) {
        if let (Some(id), Some(win)) = (self.handle.take(), window()) {
            let _ = win.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

fn request_frame(callback: &FrameClosure) -> Option<i32> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

/// Adds a DOM listener whose removal is owned by `scope`.
pub fn listen(scope: &mut Scope, target: &EventTarget, event: &'static str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_err()
    {
        return;
    }

    let target = target.clone();
    scope.defer(ResourceKind::Listener, move || {
        let _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    });
}

pub fn viewport_size() -> (f64, f64) {
    let Some(win) = window() else {
        return (1280.0, 720.0);
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    (width, height)
}

pub fn device_pixel_ratio() -> f64 {
    window().map(|win| win.device_pixel_ratio()).unwrap_or(1.0)
}

pub fn scroll_metrics() -> Option<ScrollMetrics> {
    let win = window()?;
    let root = win.document()?.document_element()?;
    let (_, viewport_height) = viewport_size();

    Some(ScrollMetrics {
        scroll_y: win.scroll_y().unwrap_or(0.0),
        scroll_height: f64::from(root.scroll_height()),
        viewport_height,
    })
}

pub fn element_by_id(id: &str) -> Option<Element> {
    window()?.document()?.get_element_by_id(id)
}

pub fn element_bounds(element: &Element) -> Bounds {
    let rect = element.get_bounding_client_rect();
    Bounds {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

pub fn section_rect(element: &Element) -> SectionRect {
    let rect = element.get_bounding_client_rect();
    SectionRect {
        top: rect.top(),
        bottom: rect.bottom(),
    }
}

fn apply_pose(node: &HtmlElement, pose: &Pose, perspective: Option<f64>) {
    let style = node.style();
    let _ = style.set_property("transform", &pose.css_transform(perspective));
    let _ = style.set_property("opacity", &format!("{:.3}", pose.opacity));
}
