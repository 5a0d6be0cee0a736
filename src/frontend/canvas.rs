use super::stage::{device_pixel_ratio, listen, scroll_metrics, viewport_size, FrameLoop, MotionContext};
use motion_portfolio::{
    logging::{log_event, LogLevel},
    motion::{
        CanvasSize, Easing, ElementKey, FrameDriver, ParticleBody, ParticleField, PoseTarget, Property, ResourceKind,
        Scope, Surface, TweenId, TweenSpec,
    },
};
use std::{cell::RefCell, f64::consts::TAU, rc::Rc};
use wasm_bindgen::JsCast;
use web_sys::{window, CanvasRenderingContext2d, EventTarget, HtmlCanvasElement};
use yew::prelude::*;

const PARALLAX_FACTOR: f64 = 0.05;
const PARALLAX_SECONDS: f64 = 0.4;
const BODY_FILL: &str = "rgba(148, 163, 184, 0.55)";
const BACKDROP_TOP: &str = "rgba(15, 23, 42, 0.0)";
const BACKDROP_BOTTOM: &str = "rgba(30, 41, 59, 0.35)";

struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    fn attach(canvas: HtmlCanvasElement) -> Option<Self> {
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, context })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, size: CanvasSize) {
        self.canvas.set_width(size.pixel_width());
        self.canvas.set_height(size.pixel_height());
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", size.css_width));
        let _ = style.set_property("height", &format!("{}px", size.css_height));
        let ratio = size.pixel_ratio;
        let _ = self.context.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_backdrop(&mut self, width: f64, height: f64) {
        let gradient = self.context.create_linear_gradient(0.0, 0.0, 0.0, height);
        let _ = gradient.add_color_stop(0.0, BACKDROP_TOP);
        let _ = gradient.add_color_stop(1.0, BACKDROP_BOTTOM);
        self.context.set_fill_style_canvas_gradient(&gradient);
        self.context.fill_rect(0.0, 0.0, width, height);
    }

    fn fill_body(&mut self, body: &ParticleBody) -> Result<(), &'static str> {
        self.context.begin_path();
        self.context
            .arc(body.x, body.y, body.radius, 0.0, TAU)
            .map_err(|_| "arc rejected")?;
        self.context.set_fill_style_str(BODY_FILL);
        self.context.fill();
        Ok(())
    }
}

fn current_canvas_size(max_pixel_ratio: f64) -> CanvasSize {
    let (width, height) = viewport_size();
    CanvasSize::new(width, height, device_pixel_ratio(), max_pixel_ratio)
}

/// Drifts the canvas against the scroll direction, reusing one tween for the
/// whole gesture.
fn follow_scroll(motion: &MotionContext, key: ElementKey, parallax: &RefCell<Option<TweenId>>) {
    let Some(metrics) = scroll_metrics() else {
        return;
    };
    let target = PoseTarget::new().to(Property::Y, -metrics.scroll_y * PARALLAX_FACTOR);

    motion.with(|stage| {
        let mut current = parallax.borrow_mut();
        let retargeted = current.is_some_and(|tween| stage.timeline.retarget(tween, &target));
        if !retargeted {
            let spec = TweenSpec::once(PARALLAX_SECONDS, Easing::Power2Out);
            *current = Some(stage.timeline.animate_to(key, &target, spec));
        }
    });
}

#[function_component(ParticleCanvas)]
pub fn particle_canvas() -> Html {
    let motion = use_context::<MotionContext>();
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with((), move |_| {
            let mut scope = None;

            if let (Some(motion), Some(canvas)) = (motion, canvas_ref.cast::<HtmlCanvasElement>()) {
                scope = mount_background(&motion, canvas);
            }

            move || drop(scope)
        });
    }

    html! {
        <canvas ref={canvas_ref} class="particle-canvas" aria-hidden="true" />
    }
}

fn mount_background(motion: &MotionContext, canvas: HtmlCanvasElement) -> Option<Scope> {
    let config = motion.config();
    let win = window()?;
    let mut surface = CanvasSurface::attach(canvas.clone())?;
    let mut scope = Scope::new("particle_canvas", config.log);

    let size = current_canvas_size(config.max_device_pixel_ratio);
    let field = ParticleField::seeded(config.layout_seed, config.particle_body_count, size.css_width, size.css_height);
    let driver = Rc::new(RefCell::new(FrameDriver::new(field, config.max_frame_delta_ms, scope.token())));
    driver.borrow_mut().request_resize(size);
    driver.borrow_mut().start();

    log_event(
        &config.log,
        LogLevel::Info,
        "frame_driver_start",
        serde_json::json!({
            "bodies": config.particle_body_count,
            "width": size.css_width,
            "height": size.css_height,
            "pixel_ratio": size.pixel_ratio,
        }),
    );

    let target: &EventTarget = win.unchecked_ref();
    {
        let driver = Rc::clone(&driver);
        let max_pixel_ratio = config.max_device_pixel_ratio;
        listen(&mut scope, target, "resize", move |_| {
            driver
                .borrow_mut()
                .request_resize(current_canvas_size(max_pixel_ratio));
        });
    }

    let canvas_key = motion.with(|stage| stage.bind(canvas.into(), None))?;
    let parallax = Rc::new(RefCell::new(None::<TweenId>));
    {
        let motion = motion.clone();
        let parallax = Rc::clone(&parallax);
        listen(&mut scope, target, "scroll", move |_| follow_scroll(&motion, canvas_key, &parallax));
    }
    {
        let motion = motion.clone();
        scope.defer(ResourceKind::Tween, move || {
            motion.with(|stage| stage.unbind(canvas_key));
        });
    }

    let frame_loop = {
        let driver = Rc::clone(&driver);
        FrameLoop::start(scope.token(), move |timestamp| {
            driver.borrow_mut().frame(timestamp, &mut surface).should_continue()
        })
    };
    {
        let log = config.log;
        scope.defer(ResourceKind::FrameCallback, move || {
            frame_loop.stop();
            let mut driver = driver.borrow_mut();
            driver.cancel();
            log_event(
                &log,
                LogLevel::Info,
                "frame_driver_stop",
                serde_json::json!({ "frames": driver.frames() }),
            );
        });
    }

    Some(scope)
}
