use std::collections::BTreeMap;

use super::easing::Easing;
use super::pose::{Pose, PoseTarget, Property};
use super::scroll::{ObservationWindow, SectionRect};
use super::timeline::Animator;
use super::tween::{ElementKey, TweenId, TweenSpec};

/// Off-state and entrance timing for one kind of reveal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealStyle {
    pub hidden: Pose,
    pub duration: f64,
    pub easing: Easing,
}

impl RevealStyle {
    pub const RISE: RevealStyle = RevealStyle {
        hidden: Pose {
            y: 16.0,
            opacity: 0.0,
            ..Pose::NEUTRAL
        },
        duration: 0.55,
        easing: Easing::Power2Out,
    };

    pub const RISE_SHORT: RevealStyle = RevealStyle {
        hidden: Pose {
            y: 12.0,
            opacity: 0.0,
            ..Pose::NEUTRAL
        },
        duration: 0.5,
        easing: Easing::Power2Out,
    };

    pub const FROM_LEFT: RevealStyle = RevealStyle {
        hidden: Pose {
            x: -20.0,
            scale: 0.9,
            opacity: 0.0,
            ..Pose::NEUTRAL
        },
        duration: 0.7,
        easing: Easing::Power2Out,
    };

    pub const FROM_RIGHT: RevealStyle = RevealStyle {
        hidden: Pose {
            x: 24.0,
            opacity: 0.0,
            ..Pose::NEUTRAL
        },
        duration: 0.7,
        easing: Easing::Power2Out,
    };

    pub const FADE: RevealStyle = RevealStyle {
        hidden: Pose {
            opacity: 0.0,
            ..Pose::NEUTRAL
        },
        duration: 0.8,
        easing: Easing::Power2Out,
    };

    /// Heading underline drawn out from the left edge.
    pub const UNDERLINE: RevealStyle = RevealStyle {
        hidden: Pose {
            scale_x: 0.0,
            ..Pose::NEUTRAL
        },
        duration: 0.8,
        easing: Easing::Power2Out,
    };

    fn resting_target(&self) -> PoseTarget {
        PoseTarget::new()
            .to(Property::X, 0.0)
            .to(Property::Y, 0.0)
            .to(Property::Scale, 1.0)
            .to(Property::ScaleX, 1.0)
            .to(Property::Opacity, 1.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RevealCue {
    pub section: String,
    pub element: Option<ElementKey>,
    pub tween: Option<TweenId>,
    pub delay: f64,
}

#[derive(Clone, Debug)]
struct RevealEntry {
    element: Option<ElementKey>,
    style: RevealStyle,
    window: ObservationWindow,
    delay: f64,
    revealed: bool,
    tween: Option<TweenId>,
}

/// One-shot entrance latches keyed by section name. A latch only ever goes
/// from unrevealed to revealed.
#[derive(Debug, Default)]
pub struct RevealSequencer {
    entries: BTreeMap<String, RevealEntry>,
}

impl RevealSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a section and puts its element in the hidden pose. A section
    /// that already fired keeps its latch and only adopts the new element; an
    /// unrevealed one is rebound and hidden again.
    pub fn prepare(
        &mut self,
        animator: &mut dyn Animator,
        section: &str,
        element: Option<ElementKey>,
        style: RevealStyle,
        window: ObservationWindow,
        delay: f64,
    ) {
        if let Some(entry) = self.entries.get_mut(section) {
            if entry.revealed {
                if element.is_some() {
                    entry.element = element;
                    entry.tween = None;
                }
                return;
            }
        }
        if let Some(element) = element {
            animator.set_pose(element, style.hidden);
        }
        self.entries.insert(
            section.to_string(),
            RevealEntry {
                element,
                style,
                window,
                delay: delay.max(0.0),
                revealed: false,
                tween: None,
            },
        );
    }

    /// Unmount of `element`. An unrevealed section is forgotten so a later
    /// mount starts hidden; a revealed one keeps its latch. Returns `false`
    /// when the section is already bound to a different element.
    pub fn release(&mut self, section: &str, element: ElementKey) -> bool {
        let Some(entry) = self.entries.get_mut(section) else {
            return false;
        };
        if entry.element != Some(element) {
            return false;
        }
        if entry.revealed {
            entry.element = None;
            entry.tween = None;
        } else {
            self.entries.remove(section);
        }
        true
    }

    pub fn on_first_intersect(&mut self, animator: &mut dyn Animator, section: &str, intersecting: bool) -> Option<RevealCue> {
        let entry = self.entries.get_mut(section)?;
        if entry.revealed || !intersecting {
            return None;
        }
        entry.revealed = true;

        let tween = entry.element.map(|element| {
            let spec = TweenSpec::once(entry.style.duration, entry.style.easing).with_delay(entry.delay);
            animator.animate_to(element, &entry.style.resting_target(), spec)
        });
        entry.tween = tween;

        Some(RevealCue {
            section: section.to_string(),
            element: entry.element,
            tween,
            delay: entry.delay,
        })
    }

    /// Checks a section's rect against its own window and fires if due.
    pub fn observe(
        &mut self,
        animator: &mut dyn Animator,
        section: &str,
        rect: SectionRect,
        viewport_height: f64,
    ) -> Option<RevealCue> {
        let window = self.entries.get(section)?.window;
        self.on_first_intersect(animator, section, window.intersects(rect, viewport_height))
    }

    pub fn is_revealed(&self, section: &str) -> bool {
        self.entries.get(section).is_some_and(|entry| entry.revealed)
    }

    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.revealed)
            .map(|(section, _)| section.as_str())
    }

    pub fn teardown(&mut self, animator: &mut dyn Animator) -> usize {
        std::mem::take(&mut self.entries)
            .into_values()
            .filter_map(|entry| entry.tween)
            .filter(|tween| animator.kill(*tween))
            .count()
    }
}
