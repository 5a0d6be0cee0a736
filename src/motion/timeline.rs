use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::pose::{Pose, PoseTarget};
use super::tween::{ElementKey, Tween, TweenId, TweenSpec, TweenStatus};

/// Tween capability used by the pool, the interaction controller and the
/// reveal sequencer. `Timeline` is the in-crate implementation.
pub trait Animator {
    /// Starts a tween from the element's current pose. Any tween already
    /// owning the element is killed first, in the same call.
    fn animate_to(&mut self, element: ElementKey, target: &PoseTarget, spec: TweenSpec) -> TweenId;

    /// Points a live tween at a new target without creating a new instance.
    fn retarget(&mut self, tween: TweenId, target: &PoseTarget) -> bool;

    fn kill(&mut self, tween: TweenId) -> bool;

    fn kill_all(&mut self, element: ElementKey) -> usize;

    fn pause(&mut self, tween: TweenId) -> bool;

    fn resume(&mut self, tween: TweenId) -> bool;

    fn is_live(&self, tween: TweenId) -> bool;

    fn owner(&self, element: ElementKey) -> Option<TweenId>;

    fn pose(&self, element: ElementKey) -> Pose;

    /// Writes a pose immediately, killing whatever owned the element.
    fn set_pose(&mut self, element: ElementKey, pose: Pose);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub tween: TweenId,
    pub element: ElementKey,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimelineStats {
    pub created: u64,
    pub killed: u64,
    pub completed: u64,
}

impl TimelineStats {
    pub fn live(&self) -> u64 {
        self.created - self.killed - self.completed
    }
}

#[derive(Debug, Default)]
pub struct Timeline {
    next_id: u64,
    tweens: BTreeMap<TweenId, Tween>,
    owners: HashMap<ElementKey, TweenId>,
    poses: HashMap<ElementKey, Pose>,
    dirty: BTreeSet<ElementKey>,
    stats: TimelineStats,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> TimelineStats {
        self.stats
    }

    pub fn live_tweens(&self) -> usize {
        self.tweens.len()
    }

    /// Number of live tweens targeting `element`; never above one.
    pub fn owner_count(&self, element: ElementKey) -> usize {
        self.tweens.values().filter(|tween| tween.element == element).count()
    }

    pub fn tween(&self, tween: TweenId) -> Option<&Tween> {
        self.tweens.get(&tween)
    }

    /// Advances every live tween by `dt` seconds, writes the sampled poses
    /// and retires finished one-shot tweens. Completions are reported after
    /// all poses for the frame are written.
    pub fn tick(&mut self, dt: f64) -> Vec<Completion> {
        let mut finished = Vec::new();

        for tween in self.tweens.values_mut() {
            if tween.status == TweenStatus::Paused {
                continue;
            }
            let pose = tween.advance(dt);
            self.poses.insert(tween.element, pose);
            self.dirty.insert(tween.element);

            if tween.is_finished() {
                finished.push(Completion {
                    tween: tween.id,
                    element: tween.element,
                });
            }
        }

        for completion in &finished {
            self.tweens.remove(&completion.tween);
            if self.owners.get(&completion.element) == Some(&completion.tween) {
                self.owners.remove(&completion.element);
            }
            self.stats.completed += 1;
        }

        finished
    }

    /// Elements whose pose changed since the last drain, in key order.
    pub fn drain_dirty(&mut self) -> Vec<(ElementKey, Pose)> {
        let dirty = std::mem::take(&mut self.dirty);
        dirty
            .into_iter()
            .map(|element| (element, self.pose(element)))
            .collect()
    }

    /// Unmount: kills the element's tween and forgets its pose.
    pub fn remove_element(&mut self, element: ElementKey) {
        self.kill_all(element);
        self.poses.remove(&element);
        self.dirty.remove(&element);
    }

    fn allocate_id(&mut self) -> TweenId {
        self.next_id += 1;
        TweenId(self.next_id)
    }
}

impl Animator for Timeline {
    fn animate_to(&mut self, element: ElementKey, target: &PoseTarget, spec: TweenSpec) -> TweenId {
        self.kill_all(element);

        let id = self.allocate_id();
        let from = self.pose(element);
        let to = target.resolve(&from);
        self.tweens.insert(id, Tween::new(id, element, from, to, spec));
        self.owners.insert(element, id);
        self.stats.created += 1;
        id
    }

    fn retarget(&mut self, tween: TweenId, target: &PoseTarget) -> bool {
        let Some(element) = self.tweens.get(&tween).map(|live| live.element) else {
            return false;
        };
        let current = self.pose(element);
        let to = target.resolve(&current);

        match self.tweens.get_mut(&tween) {
            Some(live) => {
                live.restart_toward(current, to);
                true
            }
            None => false,
        }
    }

    fn kill(&mut self, tween: TweenId) -> bool {
        let Some(removed) = self.tweens.remove(&tween) else {
            return false;
        };
        if self.owners.get(&removed.element) == Some(&tween) {
            self.owners.remove(&removed.element);
        }
        self.stats.killed += 1;
        true
    }

    fn kill_all(&mut self, element: ElementKey) -> usize {
        let doomed: Vec<TweenId> = self
            .tweens
            .values()
            .filter(|tween| tween.element == element)
            .map(|tween| tween.id)
            .collect();

        doomed.into_iter().filter(|id| self.kill(*id)).count()
    }

    fn pause(&mut self, tween: TweenId) -> bool {
        match self.tweens.get_mut(&tween) {
            Some(live) => {
                live.status = TweenStatus::Paused;
                true
            }
            None => false,
        }
    }

    fn resume(&mut self, tween: TweenId) -> bool {
        match self.tweens.get_mut(&tween) {
            Some(live) => {
                live.status = TweenStatus::Running;
                true
            }
            None => false,
        }
    }

    fn is_live(&self, tween: TweenId) -> bool {
        self.tweens.contains_key(&tween)
    }

    fn owner(&self, element: ElementKey) -> Option<TweenId> {
        self.owners.get(&element).copied()
    }

    fn pose(&self, element: ElementKey) -> Pose {
        self.poses.get(&element).copied().unwrap_or(Pose::NEUTRAL)
    }

    fn set_pose(&mut self, element: ElementKey, pose: Pose) {
        self.kill_all(element);
        self.poses.insert(element, pose);
        self.dirty.insert(element);
    }
}
