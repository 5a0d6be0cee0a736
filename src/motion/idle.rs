use std::collections::BTreeMap;

use super::easing::Easing;
use super::pose::{PoseTarget, Property};
use super::seed::DriftJitter;
use super::timeline::Animator;
use super::tween::{ElementKey, TweenId, TweenSpec};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IdleProfile {
    /// Vertical bob of the skill cards.
    FloatCard,
    /// Ambient wander of the decorative particles, seeded per index.
    Drift { seed: u32 },
    /// Slow continuous spin of the portrait halo.
    Halo,
}

impl IdleProfile {
    pub fn tween_for(self, index: usize) -> (PoseTarget, TweenSpec) {
        match self {
            Self::FloatCard => {
                let offset = (index % 5 + 1) as f64;
                let duration = 3.2 + (index % 3) as f64 * 0.6;
                (
                    PoseTarget::new().by(Property::Y, 6.0 + offset),
                    TweenSpec::yoyo(duration, Easing::SineInOut),
                )
            }
            Self::Drift { seed } => {
                let jitter = DriftJitter::at(seed, index);
                (
                    PoseTarget::new()
                        .by(Property::X, jitter.dx)
                        .by(Property::Y, jitter.dy),
                    TweenSpec::yoyo(jitter.duration, Easing::SineInOut).with_delay(jitter.delay),
                )
            }
            Self::Halo => (
                PoseTarget::new().by(Property::Rotate, 360.0),
                TweenSpec::looping(20.0, Easing::Linear),
            ),
        }
    }
}

/// One looping tween per element, scoped to the owning component: created by
/// `attach` on mount, all released by `detach_all` on teardown.
#[derive(Debug)]
pub struct IdleTweenPool {
    profile: IdleProfile,
    handles: BTreeMap<ElementKey, (usize, TweenId)>,
}

impl IdleTweenPool {
    pub fn new(profile: IdleProfile) -> Self {
        Self {
            profile,
            handles: BTreeMap::new(),
        }
    }

    /// Starts the idle tween for `element`. An element that is not mounted yet
    /// is skipped without error.
    pub fn attach(&mut self, animator: &mut dyn Animator, element: Option<ElementKey>, index: usize) -> Option<TweenId> {
        let element = element?;
        let (target, spec) = self.profile.tween_for(index);
        let id = animator.animate_to(element, &target, spec);
        self.handles.insert(element, (index, id));
        Some(id)
    }

    /// Starts a fresh tween for an element the pool already knows, with its
    /// original index. Used when an interaction hands the element back.
    pub fn reattach(&mut self, animator: &mut dyn Animator, element: ElementKey) -> Option<TweenId> {
        let index = self.index_of(element)?;
        self.attach(animator, Some(element), index)
    }

    /// Kills the element's idle tween but remembers the element so it can be
    /// reattached later.
    pub fn release(&mut self, animator: &mut dyn Animator, element: ElementKey) -> bool {
        let Some(entry) = self.handles.get(&element).copied() else {
            return false;
        };
        animator.kill(entry.1)
    }

    /// Unmount of a single element: kills its tween and forgets it.
    pub fn detach(&mut self, animator: &mut dyn Animator, element: ElementKey) -> bool {
        self.handles
            .remove(&element)
            .is_some_and(|(_, id)| animator.kill(id))
    }

    pub fn detach_all(&mut self, animator: &mut dyn Animator) -> usize {
        let handles = std::mem::take(&mut self.handles);
        handles
            .into_values()
            .filter(|(_, id)| animator.kill(*id))
            .count()
    }

    pub fn handle(&self, element: ElementKey) -> Option<TweenId> {
        self.handles.get(&element).map(|(_, id)| *id)
    }

    pub fn index_of(&self, element: ElementKey) -> Option<usize> {
        self.handles.get(&element).map(|(index, _)| *index)
    }

    pub fn contains(&self, element: ElementKey) -> bool {
        self.handles.contains_key(&element)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::timeline::Timeline;

    #[test]
    fn attach_skips_unmounted_elements() {
        let mut timeline = Timeline::new();
        let mut pool = IdleTweenPool::new(IdleProfile::FloatCard);

        assert_eq!(pool.attach(&mut timeline, None, 0), None);
        assert!(pool.is_empty());
        assert_eq!(timeline.live_tweens(), 0);
    }

    #[test]
    fn float_cards_are_phase_offset_by_index() {
        let (first_target, first_spec) = IdleProfile::FloatCard.tween_for(0);
        let (second_target, second_spec) = IdleProfile::FloatCard.tween_for(1);

        assert_ne!(first_target, second_target);
        assert_ne!(first_spec.duration, second_spec.duration);
        assert_eq!(first_spec.duration, 3.2);
        assert_eq!(IdleProfile::FloatCard.tween_for(3).1.duration, 3.2);
    }

    #[test]
    fn drift_profile_is_deterministic() {
        let profile = IdleProfile::Drift { seed: 123_456 };

        assert_eq!(profile.tween_for(4), profile.tween_for(4));
        assert_ne!(profile.tween_for(4), profile.tween_for(5));
    }

    #[test]
    fn detach_all_kills_every_tween() {
        let mut timeline = Timeline::new();
        let mut pool = IdleTweenPool::new(IdleProfile::Drift { seed: 9 });

        for index in 0..14 {
            pool.attach(&mut timeline, Some(ElementKey(index as u32)), index);
        }
        timeline.tick(0.5);

        assert_eq!(timeline.live_tweens(), 14);
        assert_eq!(pool.detach_all(&mut timeline), 14);
        assert_eq!(timeline.live_tweens(), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn release_then_reattach_creates_a_new_tween() {
        let mut timeline = Timeline::new();
        let mut pool = IdleTweenPool::new(IdleProfile::FloatCard);
        let card = ElementKey(2);
        let first = pool.attach(&mut timeline, Some(card), 2).expect("mounted card attaches");

        assert!(pool.release(&mut timeline, card));
        assert!(!timeline.is_live(first));
        assert_eq!(pool.index_of(card), Some(2));

        let second = pool.reattach(&mut timeline, card).expect("known card reattaches");
        assert_ne!(first, second);
        assert_eq!(pool.handle(card), Some(second));
        assert_eq!(timeline.owner(card), Some(second));
    }

    #[test]
    fn detach_forgets_a_single_element() {
        let mut timeline = Timeline::new();
        let mut pool = IdleTweenPool::new(IdleProfile::FloatCard);
        pool.attach(&mut timeline, Some(ElementKey(0)), 0);
        pool.attach(&mut timeline, Some(ElementKey(1)), 1);

        assert!(pool.detach(&mut timeline, ElementKey(0)));
        assert!(!pool.detach(&mut timeline, ElementKey(0)));

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.reattach(&mut timeline, ElementKey(0)), None);
        assert_eq!(timeline.live_tweens(), 1);
    }

    #[test]
    fn halo_loops_a_full_turn() {
        let (target, spec) = IdleProfile::Halo.tween_for(0);
        let mut timeline = Timeline::new();
        let halo = ElementKey(1);
        timeline.animate_to(halo, &target, spec);

        timeline.tick(10.0);
        assert!((timeline.pose(halo).rotate - 180.0).abs() < 1e-9);
        timeline.tick(15.0);
        assert!((timeline.pose(halo).rotate - 90.0).abs() < 1e-9);
    }
}
