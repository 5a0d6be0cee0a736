use std::collections::BTreeMap;

use super::easing::Easing;
use super::idle::IdleTweenPool;
use super::pose::{Pose, PoseTarget, Property};
use super::timeline::{Animator, Completion};
use super::tween::{ElementKey, TweenId, TweenSpec};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Pointer position relative to the box, each axis clamped to `[0, 1]`.
    /// A degenerate box reports its centre.
    pub fn normalize(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        fn axis(offset: f64, extent: f64) -> f64 {
            if extent <= 0.0 || !extent.is_finite() {
                return 0.5;
            }
            (offset / extent).clamp(0.0, 1.0)
        }

        (axis(client_x - self.left, self.width), axis(client_y - self.top, self.height))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Enter { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Leave,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TiltProfile {
    /// Portrait card: wide rotation range plus a lift toward the viewer.
    Wide,
    /// Project cards: narrow rotation, springy release.
    Card,
    /// Skill cards: settle the float offset and tip slightly.
    Lift,
}

impl TiltProfile {
    pub fn perspective(self) -> f64 {
        match self {
            Self::Wide => 900.0,
            Self::Card => 800.0,
            Self::Lift => 900.0,
        }
    }

    pub fn engage_target(self, rel_x: f64, rel_y: f64) -> PoseTarget {
        match self {
            Self::Wide => PoseTarget::new()
                .to(Property::RotateY, (rel_x - 0.5) * 32.0)
                .to(Property::RotateX, (0.5 - rel_y) * 24.0)
                .to(Property::Scale, 1.03)
                .to(Property::Z, 24.0),
            Self::Card => PoseTarget::new()
                .to(Property::RotateY, (rel_x - 0.5) * 16.0)
                .to(Property::RotateX, (0.5 - rel_y) * 12.0),
            Self::Lift => PoseTarget::new()
                .to(Property::Y, 0.0)
                .to(Property::RotateX, 6.0)
                .to(Property::RotateY, -4.0)
                .to(Property::Scale, 1.02),
        }
    }

    pub fn engage_spec(self) -> TweenSpec {
        match self {
            Self::Wide => TweenSpec::once(0.25, Easing::Power2Out),
            Self::Card => TweenSpec::once(0.4, Easing::Power2Out),
            Self::Lift => TweenSpec::once(0.15, Easing::Power2Out),
        }
    }

    pub fn release_spec(self) -> TweenSpec {
        match self {
            Self::Wide => TweenSpec::once(0.5, Easing::Power3Out),
            Self::Card => TweenSpec::once(0.6, Easing::ELASTIC_RETURN),
            Self::Lift => TweenSpec::once(0.18, Easing::Power2Out),
        }
    }

    /// Neutral transform; opacity belongs to reveals and is left alone.
    pub fn release_target(self) -> PoseTarget {
        Property::ALL
            .iter()
            .filter(|property| **property != Property::Opacity)
            .fold(PoseTarget::new(), |target, property| {
                target.to(*property, Pose::NEUTRAL.get(*property))
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    /// Owned by the idle pool, or by nothing for elements without one.
    Idle,
    /// Owned by the pointer-driven tween.
    Overridden(TweenId),
    /// Owned by the return-to-neutral tween; hands back on completion.
    Returning(TweenId),
}

/// Per-element hover state machine. Idle tweens are killed on engagement and
/// recreated fresh once the return tween completes.
#[derive(Debug)]
pub struct InteractionController {
    profile: TiltProfile,
    pool: Option<IdleTweenPool>,
    states: BTreeMap<ElementKey, InteractionState>,
}

impl InteractionController {
    pub fn new(profile: TiltProfile) -> Self {
        Self {
            profile,
            pool: None,
            states: BTreeMap::new(),
        }
    }

    pub fn with_idle_pool(mut self, pool: IdleTweenPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn profile(&self) -> TiltProfile {
        self.profile
    }

    pub fn pool(&self) -> Option<&IdleTweenPool> {
        self.pool.as_ref()
    }

    pub fn state(&self, element: ElementKey) -> InteractionState {
        self.states.get(&element).copied().unwrap_or(InteractionState::Idle)
    }

    pub fn attach_idle(&mut self, animator: &mut dyn Animator, element: Option<ElementKey>, index: usize) -> Option<TweenId> {
        let pool = self.pool.as_mut()?;
        let element = element?;
        self.states.insert(element, InteractionState::Idle);
        pool.attach(animator, Some(element), index)
    }

    pub fn handle(
        &mut self,
        animator: &mut dyn Animator,
        element: Option<ElementKey>,
        event: PointerEvent,
        bounds: Bounds,
    ) -> InteractionState {
        let Some(element) = element else {
            return InteractionState::Idle;
        };
        let current = self.state(element);

        let next = match (current, event) {
            (InteractionState::Idle, PointerEvent::Enter { x, y } | PointerEvent::Move { x, y }) => {
                if let Some(pool) = self.pool.as_mut() {
                    pool.release(animator, element);
                }
                InteractionState::Overridden(self.engage(animator, element, bounds, x, y))
            }
            (InteractionState::Overridden(tween), PointerEvent::Enter { x, y } | PointerEvent::Move { x, y }) => {
                let (rel_x, rel_y) = bounds.normalize(x, y);
                let target = self.profile.engage_target(rel_x, rel_y);
                if animator.retarget(tween, &target) {
                    InteractionState::Overridden(tween)
                } else {
                    InteractionState::Overridden(animator.animate_to(element, &target, self.profile.engage_spec()))
                }
            }
            (InteractionState::Returning(_), PointerEvent::Enter { x, y } | PointerEvent::Move { x, y }) => {
                InteractionState::Overridden(self.engage(animator, element, bounds, x, y))
            }
            (InteractionState::Overridden(_), PointerEvent::Leave) => InteractionState::Returning(animator.animate_to(
                element,
                &self.profile.release_target(),
                self.profile.release_spec(),
            )),
            (state, PointerEvent::Leave) => state,
        };

        self.states.insert(element, next);
        next
    }

    fn engage(&self, animator: &mut dyn Animator, element: ElementKey, bounds: Bounds, x: f64, y: f64) -> TweenId {
        let (rel_x, rel_y) = bounds.normalize(x, y);
        animator.animate_to(element, &self.profile.engage_target(rel_x, rel_y), self.profile.engage_spec())
    }

    /// Reacts to a finished tween. Only the return tween currently recorded
    /// for the element triggers the hand-back; anything else is stale.
    pub fn on_complete(&mut self, animator: &mut dyn Animator, completion: Completion) -> bool {
        match self.states.get(&completion.element).copied() {
            Some(InteractionState::Returning(tween)) if tween == completion.tween => {
                if let Some(pool) = self.pool.as_mut() {
                    pool.reattach(animator, completion.element);
                }
                self.states.insert(completion.element, InteractionState::Idle);
                true
            }
            _ => false,
        }
    }

    /// Drops one unmounted element and kills whichever tween owned it.
    pub fn forget(&mut self, animator: &mut dyn Animator, element: ElementKey) -> usize {
        let mut killed = 0;
        if let Some(InteractionState::Overridden(tween) | InteractionState::Returning(tween)) = self.states.remove(&element) {
            if animator.kill(tween) {
                killed += 1;
            }
        }
        if let Some(pool) = self.pool.as_mut() {
            if pool.detach(animator, element) {
                killed += 1;
            }
        }
        killed
    }

    /// Kills every tween this controller or its pool started.
    pub fn teardown(&mut self, animator: &mut dyn Animator) -> usize {
        let mut killed = 0;
        for state in std::mem::take(&mut self.states).into_values() {
            if let InteractionState::Overridden(tween) | InteractionState::Returning(tween) = state {
                if animator.kill(tween) {
                    killed += 1;
                }
            }
        }
        if let Some(pool) = self.pool.as_mut() {
            killed += pool.detach_all(animator);
        }
        killed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::idle::IdleProfile;
    use crate::motion::timeline::Timeline;

    const BOX: Bounds = Bounds {
        left: 100.0,
        top: 50.0,
        width: 200.0,
        height: 100.0,
    };

    fn run_until_settled(timeline: &mut Timeline, controller: &mut InteractionController, frames: usize) {
        for _ in 0..frames {
            for completion in timeline.tick(1.0 / 60.0) {
                controller.on_complete(timeline, completion);
            }
            for element in [ElementKey(0), ElementKey(1), ElementKey(2)] {
                assert!(timeline.owner_count(element) <= 1);
            }
        }
    }

    fn skill_cards(timeline: &mut Timeline) -> InteractionController {
        let mut controller =
            InteractionController::new(TiltProfile::Lift).with_idle_pool(IdleTweenPool::new(IdleProfile::FloatCard));
        for index in 0..3 {
            controller.attach_idle(timeline, Some(ElementKey(index as u32)), index);
        }
        controller
    }

    #[test]
    fn normalize_clamps_and_handles_degenerate_boxes() {
        assert_eq!(BOX.normalize(200.0, 100.0), (0.5, 0.5));
        assert_eq!(BOX.normalize(0.0, 500.0), (0.0, 1.0));

        let empty = Bounds { width: 0.0, ..BOX };
        assert_eq!(empty.normalize(10.0, 50.0), (0.5, 0.0));
    }

    #[test]
    fn tilt_ranges_are_bounded() {
        let corner = TiltProfile::Wide.engage_target(1.0, 0.0).resolve(&Pose::NEUTRAL);
        assert_eq!(corner.rotate_y, 16.0);
        assert_eq!(corner.rotate_x, 12.0);

        let card = TiltProfile::Card.engage_target(0.0, 1.0).resolve(&Pose::NEUTRAL);
        assert_eq!(card.rotate_y, -8.0);
        assert_eq!(card.rotate_x, -6.0);
    }

    #[test]
    fn hover_round_trip_returns_to_neutral_with_fresh_idle_tween() {
        let mut timeline = Timeline::new();
        let mut controller = skill_cards(&mut timeline);
        let card = ElementKey(1);
        let original_idle = controller.pool().and_then(|pool| pool.handle(card)).expect("card floats");
        run_until_settled(&mut timeline, &mut controller, 30);

        let state = controller.handle(&mut timeline, Some(card), PointerEvent::Enter { x: 150.0, y: 60.0 }, BOX);
        assert!(matches!(state, InteractionState::Overridden(_)));
        assert!(!timeline.is_live(original_idle));

        controller.handle(&mut timeline, Some(card), PointerEvent::Move { x: 280.0, y: 140.0 }, BOX);
        run_until_settled(&mut timeline, &mut controller, 5);

        let state = controller.handle(&mut timeline, Some(card), PointerEvent::Leave, BOX);
        assert!(matches!(state, InteractionState::Returning(_)));
        for _ in 0..60 {
            if controller.state(card) == InteractionState::Idle {
                break;
            }
            run_until_settled(&mut timeline, &mut controller, 1);
        }

        assert_eq!(controller.state(card), InteractionState::Idle);
        assert!(timeline.pose(card).is_neutral(1e-9));
        let fresh_idle = controller.pool().and_then(|pool| pool.handle(card)).expect("card floats again");
        assert_ne!(fresh_idle, original_idle);
        assert_eq!(timeline.owner(card), Some(fresh_idle));
    }

    #[test]
    fn moves_while_overridden_retarget_in_place() {
        let mut timeline = Timeline::new();
        let mut controller = InteractionController::new(TiltProfile::Card);
        let card = ElementKey(0);

        let InteractionState::Overridden(first) =
            controller.handle(&mut timeline, Some(card), PointerEvent::Enter { x: 110.0, y: 60.0 }, BOX)
        else {
            panic!("enter should override");
        };
        let created = timeline.stats().created;

        for step in 0..10 {
            let x = 110.0 + step as f64 * 15.0;
            let state = controller.handle(&mut timeline, Some(card), PointerEvent::Move { x, y: 90.0 }, BOX);
            assert_eq!(state, InteractionState::Overridden(first));
            timeline.tick(0.01);
        }

        assert_eq!(timeline.stats().created, created);
        assert_eq!(timeline.live_tweens(), 1);
    }

    #[test]
    fn move_after_tilt_settles_starts_one_new_tween() {
        let mut timeline = Timeline::new();
        let mut controller = InteractionController::new(TiltProfile::Card);
        let card = ElementKey(0);

        controller.handle(&mut timeline, Some(card), PointerEvent::Enter { x: 110.0, y: 60.0 }, BOX);
        run_until_settled(&mut timeline, &mut controller, 60);
        assert_eq!(timeline.live_tweens(), 0);

        controller.handle(&mut timeline, Some(card), PointerEvent::Move { x: 290.0, y: 60.0 }, BOX);
        assert_eq!(timeline.live_tweens(), 1);
        assert_eq!(timeline.owner_count(card), 1);
    }

    #[test]
    fn re_entering_during_return_cancels_hand_back() {
        let mut timeline = Timeline::new();
        let mut controller = skill_cards(&mut timeline);
        let card = ElementKey(2);

        controller.handle(&mut timeline, Some(card), PointerEvent::Enter { x: 150.0, y: 60.0 }, BOX);
        let InteractionState::Returning(returning) = controller.handle(&mut timeline, Some(card), PointerEvent::Leave, BOX)
        else {
            panic!("leave should start the return tween");
        };
        timeline.tick(0.05);

        let state = controller.handle(&mut timeline, Some(card), PointerEvent::Move { x: 200.0, y: 100.0 }, BOX);
        assert!(matches!(state, InteractionState::Overridden(_)));
        assert!(!timeline.is_live(returning));

        let stale = Completion { tween: returning, element: card };
        assert!(!controller.on_complete(&mut timeline, stale));
        assert!(matches!(controller.state(card), InteractionState::Overridden(_)));
    }

    #[test]
    fn absent_elements_are_inert() {
        let mut timeline = Timeline::new();
        let mut controller = skill_cards(&mut timeline);
        let live = timeline.live_tweens();

        let state = controller.handle(&mut timeline, None, PointerEvent::Enter { x: 0.0, y: 0.0 }, BOX);

        assert_eq!(state, InteractionState::Idle);
        assert_eq!(timeline.live_tweens(), live);
        assert_eq!(controller.attach_idle(&mut timeline, None, 7), None);
    }

    #[test]
    fn leave_without_enter_is_ignored() {
        let mut timeline = Timeline::new();
        let mut controller = skill_cards(&mut timeline);

        let state = controller.handle(&mut timeline, Some(ElementKey(0)), PointerEvent::Leave, BOX);

        assert_eq!(state, InteractionState::Idle);
        assert_eq!(timeline.live_tweens(), 3);
    }

    #[test]
    fn forgetting_a_hovered_card_leaves_the_others_floating() {
        let mut timeline = Timeline::new();
        let mut controller = skill_cards(&mut timeline);
        let card = ElementKey(1);
        controller.handle(&mut timeline, Some(card), PointerEvent::Enter { x: 150.0, y: 60.0 }, BOX);

        assert_eq!(controller.forget(&mut timeline, card), 1);

        assert_eq!(timeline.owner(card), None);
        assert_eq!(controller.state(card), InteractionState::Idle);
        assert!(controller.pool().is_some_and(|pool| !pool.contains(card) && pool.len() == 2));
        assert_eq!(timeline.live_tweens(), 2);
    }

    #[test]
    fn teardown_releases_direct_and_idle_tweens() {
        let mut timeline = Timeline::new();
        let mut controller = skill_cards(&mut timeline);
        controller.handle(&mut timeline, Some(ElementKey(0)), PointerEvent::Enter { x: 150.0, y: 60.0 }, BOX);

        controller.teardown(&mut timeline);

        assert_eq!(timeline.live_tweens(), 0);
        assert_eq!(timeline.stats().live(), 0);
    }
}
