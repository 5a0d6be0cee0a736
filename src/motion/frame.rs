use super::particles::{CanvasSize, ParticleBody, ParticleField, REFERENCE_FRAME_MS};
use super::scope::CancelToken;

/// Drawing target for one background frame. The browser canvas implements it
/// in the frontend; tests record calls.
pub trait Surface {
    fn resize(&mut self, size: CanvasSize);
    fn clear(&mut self, width: f64, height: f64);
    fn fill_backdrop(&mut self, width: f64, height: f64);
    fn fill_body(&mut self, body: &ParticleBody) -> Result<(), &'static str>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Painted { bodies: usize, failed: usize },
    Stopped,
}

impl FrameOutcome {
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Painted { .. })
    }
}

/// The particle background's repaint loop as data: a run state, a
/// cancellation token, and the bodies it owns. The host calls `frame` once per
/// animation frame until it reports `Stopped`.
#[derive(Debug)]
pub struct FrameDriver {
    state: RunState,
    token: CancelToken,
    field: ParticleField,
    pending_size: Option<CanvasSize>,
    last_timestamp: Option<f64>,
    max_delta_ms: f64,
    frames: u64,
}

impl FrameDriver {
    pub fn new(field: ParticleField, max_delta_ms: f64, token: CancelToken) -> Self {
        Self {
            state: RunState::Idle,
            token,
            field,
            pending_size: None,
            last_timestamp: None,
            max_delta_ms: max_delta_ms.max(REFERENCE_FRAME_MS),
            frames: 0,
        }
    }

    pub fn state(&self) -> RunState {
        if self.token.is_cancelled() {
            RunState::Cancelled
        } else {
            self.state
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn start(&mut self) -> bool {
        if self.state() != RunState::Idle {
            return false;
        }
        self.state = RunState::Running;
        true
    }

    pub fn cancel(&mut self) {
        self.token.cancel();
        self.state = RunState::Cancelled;
    }

    /// Queues a size change. It is applied at the start of the next frame so
    /// a frame never mixes two sizes.
    pub fn request_resize(&mut self, size: CanvasSize) {
        self.pending_size = Some(size);
    }

    pub fn frame(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) -> FrameOutcome {
        if self.state() != RunState::Running {
            return FrameOutcome::Stopped;
        }

        if let Some(size) = self.pending_size.take() {
            surface.resize(size);
            self.field.resize(size.css_width, size.css_height);
        }

        let elapsed = match self.last_timestamp {
            Some(previous) => (timestamp_ms - previous).clamp(0.0, self.max_delta_ms),
            None => REFERENCE_FRAME_MS,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.field.step(elapsed);

        let (width, height) = self.field.size();
        surface.clear(width, height);
        surface.fill_backdrop(width, height);

        let mut failed = 0;
        for body in self.field.bodies() {
            if surface.fill_body(body).is_err() {
                failed += 1;
            }
        }
        self.frames += 1;

        FrameOutcome::Painted {
            bodies: self.field.bodies().len(),
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSurface {
        resizes: Vec<CanvasSize>,
        clears: usize,
        backdrops: usize,
        bodies: usize,
        fail_every: Option<usize>,
        calls: Vec<&'static str>,
    }

    impl Surface for RecordingSurface {
        fn resize(&mut self, size: CanvasSize) {
            self.resizes.push(size);
            self.calls.push("resize");
        }

        fn clear(&mut self, _width: f64, _height: f64) {
            self.clears += 1;
            self.calls.push("clear");
        }

        fn fill_backdrop(&mut self, _width: f64, _height: f64) {
            self.backdrops += 1;
            self.calls.push("backdrop");
        }

        fn fill_body(&mut self, _body: &ParticleBody) -> Result<(), &'static str> {
            self.bodies += 1;
            match self.fail_every {
                Some(every) if self.bodies % every == 0 => Err("arc failed"),
                _ => Ok(()),
            }
        }
    }

    fn driver(token: CancelToken) -> FrameDriver {
        FrameDriver::new(ParticleField::seeded(123_456, 60, 1_280.0, 720.0), 100.0, token)
    }

    #[test]
    fn frames_only_run_while_running() {
        let mut surface = RecordingSurface::default();
        let mut driver = driver(CancelToken::new());

        assert_eq!(driver.frame(0.0, &mut surface), FrameOutcome::Stopped);
        assert!(driver.start());
        assert!(!driver.start());
        assert!(driver.frame(16.0, &mut surface).should_continue());

        driver.cancel();
        assert_eq!(driver.frame(32.0, &mut surface), FrameOutcome::Stopped);
        assert_eq!(driver.state(), RunState::Cancelled);
        assert_eq!(driver.frames(), 1);
        assert_eq!(surface.clears, 1);
    }

    #[test]
    fn external_token_cancellation_stops_the_loop() {
        let token = CancelToken::new();
        let mut surface = RecordingSurface::default();
        let mut driver = driver(token.clone());
        driver.start();

        token.cancel();

        assert_eq!(driver.frame(16.0, &mut surface), FrameOutcome::Stopped);
        assert!(!driver.start());
    }

    #[test]
    fn each_frame_clears_paints_backdrop_then_bodies() {
        let mut surface = RecordingSurface::default();
        let mut driver = driver(CancelToken::new());
        driver.start();

        let outcome = driver.frame(0.0, &mut surface);

        assert_eq!(outcome, FrameOutcome::Painted { bodies: 60, failed: 0 });
        assert_eq!(surface.calls, vec!["clear", "backdrop"]);
        assert_eq!(surface.backdrops, 1);
        assert_eq!(surface.bodies, 60);
    }

    #[test]
    fn resize_is_applied_before_particle_math() {
        let mut surface = RecordingSurface::default();
        let mut driver = driver(CancelToken::new());
        driver.start();

        driver.request_resize(CanvasSize::new(320.0, 240.0, 3.0, 2.0));
        assert_eq!(driver.field().size(), (1_280.0, 720.0));
        driver.frame(0.0, &mut surface);

        assert_eq!(surface.calls.first(), Some(&"resize"));
        assert_eq!(surface.resizes[0].pixel_ratio, 2.0);
        assert_eq!(driver.field().size(), (320.0, 240.0));
        assert!(driver
            .field()
            .bodies()
            .iter()
            .all(|body| (0.0..=320.0).contains(&body.x) && (0.0..=240.0).contains(&body.y)));
    }

    #[test]
    fn one_failing_body_does_not_stop_the_rest() {
        let mut surface = RecordingSurface {
            fail_every: Some(10),
            ..RecordingSurface::default()
        };
        let mut driver = driver(CancelToken::new());
        driver.start();

        let outcome = driver.frame(0.0, &mut surface);

        assert_eq!(outcome, FrameOutcome::Painted { bodies: 60, failed: 6 });
        assert!(driver.frame(16.0, &mut surface).should_continue());
    }

    #[test]
    fn long_gaps_are_clamped() {
        let body = ParticleBody {
            x: 10.0,
            y: 10.0,
            vx: 0.3,
            vy: 0.0,
            radius: 1.0,
        };
        let mut surface = RecordingSurface::default();
        let mut driver = FrameDriver::new(
            ParticleField::from_bodies(vec![body], 10_000.0, 10_000.0),
            100.0,
            CancelToken::new(),
        );
        driver.start();

        driver.frame(0.0, &mut surface);
        let after_first = driver.field().bodies()[0].x;
        driver.frame(60_000.0, &mut surface);
        let travelled = driver.field().bodies()[0].x - after_first;

        assert!((travelled - 0.3 * 100.0 / REFERENCE_FRAME_MS).abs() < 1e-9);
    }

    #[test]
    fn unmount_releases_loop_pool_and_listeners() {
        use crate::logging::{LogConfig, LogLevel};
        use crate::motion::idle::{IdleProfile, IdleTweenPool};
        use crate::motion::scope::{ResourceKind, Scope};
        use crate::motion::timeline::Timeline;
        use crate::motion::tween::ElementKey;
        use std::cell::{Cell, RefCell};
        use std::rc::Rc;

        let timeline = Rc::new(RefCell::new(Timeline::new()));
        let mut scope = Scope::new("about", LogConfig::new(LogLevel::Info));
        let frame_driver = Rc::new(RefCell::new(driver(scope.token())));
        frame_driver.borrow_mut().start();

        let pool = Rc::new(RefCell::new(IdleTweenPool::new(IdleProfile::Drift { seed: 123_456 })));
        for index in 0..14 {
            pool.borrow_mut()
                .attach(&mut *timeline.borrow_mut(), Some(ElementKey(index as u32)), index);
        }
        {
            let (pool, timeline) = (Rc::clone(&pool), Rc::clone(&timeline));
            scope.defer(ResourceKind::Tween, move || {
                pool.borrow_mut().detach_all(&mut *timeline.borrow_mut());
            });
        }

        let listeners = Rc::new(Cell::new(0));
        for _ in ["resize", "scroll"] {
            listeners.set(listeners.get() + 1);
            let listeners = Rc::clone(&listeners);
            scope.defer(ResourceKind::Listener, move || listeners.set(listeners.get() - 1));
        }
        let frame_callbacks = Rc::new(Cell::new(1));
        {
            let frame_callbacks = Rc::clone(&frame_callbacks);
            scope.defer(ResourceKind::FrameCallback, move || frame_callbacks.set(0));
        }

        let mut surface = RecordingSurface::default();
        assert!(frame_driver.borrow_mut().frame(0.0, &mut surface).should_continue());
        timeline.borrow_mut().tick(0.5);
        assert_eq!(scope.active().total(), 4);
        assert_eq!(timeline.borrow().live_tweens(), 14);

        drop(scope);

        assert_eq!(listeners.get(), 0);
        assert_eq!(frame_callbacks.get(), 0);
        assert_eq!(timeline.borrow().live_tweens(), 0);
        assert_eq!(timeline.borrow().stats().live(), 0);
        assert_eq!(frame_driver.borrow_mut().frame(16.0, &mut surface), FrameOutcome::Stopped);
        assert_eq!(frame_driver.borrow().state(), RunState::Cancelled);
    }
}
