use std::collections::BTreeSet;

pub const PROGRESS_STIFFNESS: f64 = 100.0;
pub const PROGRESS_DAMPING: f64 = 30.0;
pub const PROGRESS_MASS: f64 = 1.0;

const SPRING_SUBSTEP: f64 = 1.0 / 240.0;
const REST_DELTA: f64 = 0.0005;
const REST_SPEED: f64 = 0.005;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// Raw progress in `[0, 1]`; a page that cannot scroll reports zero.
    pub fn progress(&self) -> f64 {
        let scrollable = self.scroll_height - self.viewport_height;
        if scrollable <= 0.0 || !scrollable.is_finite() {
            return 0.0;
        }
        (self.scroll_y / scrollable).clamp(0.0, 1.0)
    }
}

/// Damped spring following a moving target, stepped on fixed substeps so the
/// result does not depend on frame rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringSmoother {
    stiffness: f64,
    damping: f64,
    mass: f64,
    value: f64,
    velocity: f64,
    target: f64,
}

impl Default for SpringSmoother {
    fn default() -> Self {
        Self::new(PROGRESS_STIFFNESS, PROGRESS_DAMPING, PROGRESS_MASS)
    }
}

impl SpringSmoother {
    pub fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass: if mass > 0.0 { mass } else { 1.0 },
            value: 0.0,
            velocity: 0.0,
            target: 0.0,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    pub fn is_resting(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }

    pub fn step(&mut self, dt: f64) -> f64 {
        if dt <= 0.0 || self.is_resting() {
            return self.value;
        }

        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(SPRING_SUBSTEP);
            let force = -self.stiffness * (self.value - self.target) - self.damping * self.velocity;
            self.velocity += force / self.mass * h;
            self.value += self.velocity * h;
            remaining -= h;
        }

        if (self.value - self.target).abs() < REST_DELTA && self.velocity.abs() < REST_SPEED {
            self.value = self.target;
            self.velocity = 0.0;
        }
        self.value
    }
}

/// Vertical span of an element in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionRect {
    pub top: f64,
    pub bottom: f64,
}

/// The part of the viewport that counts as "seen".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObservationWindow {
    /// Excludes the given fractions of the viewport at top and bottom.
    Band { top: f64, bottom: f64 },
    /// Shrinks the viewport by a fixed pixel margin on both edges.
    Inset { px: f64 },
}

impl ObservationWindow {
    pub const NAV_BAND: ObservationWindow = ObservationWindow::Band { top: 0.40, bottom: 0.55 };
    pub const SECTION_REVEAL: ObservationWindow = ObservationWindow::Inset { px: 120.0 };
    pub const ITEM_REVEAL: ObservationWindow = ObservationWindow::Inset { px: 80.0 };

    pub fn span(&self, viewport_height: f64) -> (f64, f64) {
        match *self {
            Self::Band { top, bottom } => (viewport_height * top, viewport_height * (1.0 - bottom)),
            Self::Inset { px } => (px, viewport_height - px),
        }
    }

    pub fn intersects(&self, rect: SectionRect, viewport_height: f64) -> bool {
        let (start, end) = self.span(viewport_height);
        if end <= start {
            return false;
        }
        rect.top < end && rect.bottom > start
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossing {
    Entered,
    Exited,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionTransition {
    pub section: String,
    pub crossing: Crossing,
}

/// Tracks which sections sit inside one observation window and reports only
/// changes. Any number of sections may be inside at once.
#[derive(Clone, Debug)]
pub struct SectionObserver {
    window: ObservationWindow,
    inside: BTreeSet<String>,
}

impl SectionObserver {
    pub fn new(window: ObservationWindow) -> Self {
        Self {
            window,
            inside: BTreeSet::new(),
        }
    }

    pub fn observe(&mut self, section: &str, rect: SectionRect, viewport_height: f64) -> Option<SectionTransition> {
        let now = self.window.intersects(rect, viewport_height);
        let before = self.inside.contains(section);

        match (before, now) {
            (false, true) => {
                self.inside.insert(section.to_string());
                Some(SectionTransition {
                    section: section.to_string(),
                    crossing: Crossing::Entered,
                })
            }
            (true, false) => {
                self.inside.remove(section);
                Some(SectionTransition {
                    section: section.to_string(),
                    crossing: Crossing::Exited,
                })
            }
            _ => None,
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.inside.iter().map(String::as_str)
    }
}

/// Scroll position in, smoothed progress and nav transitions out.
#[derive(Clone, Debug)]
pub struct ScrollSignalBus {
    progress: SpringSmoother,
    nav: SectionObserver,
}

impl Default for ScrollSignalBus {
    fn default() -> Self {
        Self::new(ObservationWindow::NAV_BAND)
    }
}

impl ScrollSignalBus {
    pub fn new(nav_window: ObservationWindow) -> Self {
        Self {
            progress: SpringSmoother::default(),
            nav: SectionObserver::new(nav_window),
        }
    }

    pub fn observe(&mut self, metrics: ScrollMetrics, sections: &[(&str, SectionRect)]) -> Vec<SectionTransition> {
        self.progress.set_target(metrics.progress());
        sections
            .iter()
            .filter_map(|(section, rect)| self.nav.observe(section, *rect, metrics.viewport_height))
            .collect()
    }

    pub fn advance(&mut self, dt: f64) -> f64 {
        self.progress.step(dt).clamp(0.0, 1.0)
    }

    pub fn progress(&self) -> f64 {
        self.progress.value().clamp(0.0, 1.0)
    }

    pub fn is_settled(&self) -> bool {
        self.progress.is_resting()
    }

    pub fn nav(&self) -> &SectionObserver {
        &self.nav
    }
}
