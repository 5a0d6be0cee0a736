use super::easing::Easing;
use super::pose::Pose;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Once,
    YoyoForever,
    LoopForever,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSpec {
    /// Seconds.
    pub duration: f64,
    /// Seconds before the first cycle starts.
    pub delay: f64,
    pub easing: Easing,
    pub repeat: Repeat,
}

impl TweenSpec {
    pub fn once(duration: f64, easing: Easing) -> Self {
        Self {
            duration,
            delay: 0.0,
            easing,
            repeat: Repeat::Once,
        }
    }

    pub fn yoyo(duration: f64, easing: Easing) -> Self {
        Self {
            repeat: Repeat::YoyoForever,
            ..Self::once(duration, easing)
        }
    }

    pub fn looping(duration: f64, easing: Easing) -> Self {
        Self {
            repeat: Repeat::LoopForever,
            ..Self::once(duration, easing)
        }
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay.max(0.0);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenStatus {
    Running,
    Paused,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub id: TweenId,
    pub element: ElementKey,
    pub from: Pose,
    pub to: Pose,
    pub spec: TweenSpec,
    pub elapsed: f64,
    pub status: TweenStatus,
}

impl Tween {
    pub fn new(id: TweenId, element: ElementKey, from: Pose, to: Pose, spec: TweenSpec) -> Self {
        Self {
            id,
            element,
            from,
            to,
            spec,
            elapsed: 0.0,
            status: TweenStatus::Running,
        }
    }

    /// Linear progress through the current cycle, direction already applied
    /// for yoyo playback.
    pub fn progress(&self) -> f64 {
        let local = self.elapsed - self.spec.delay;
        if local <= 0.0 {
            return 0.0;
        }

        let duration = self.spec.duration;
        if duration <= 0.0 {
            return 1.0;
        }

        match self.spec.repeat {
            Repeat::Once => (local / duration).min(1.0),
            Repeat::LoopForever => (local % duration) / duration,
            Repeat::YoyoForever => {
                let cycle = (local / duration).floor() as u64;
                let fraction = (local % duration) / duration;
                if cycle % 2 == 0 {
                    fraction
                } else {
                    1.0 - fraction
                }
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.spec.repeat == Repeat::Once && self.elapsed - self.spec.delay >= self.spec.duration
    }

    pub fn sample(&self) -> Pose {
        self.from.lerp(&self.to, self.spec.easing.apply(self.progress()))
    }

    /// Advances playback by `dt` seconds; paused tweens hold their pose.
    pub fn advance(&mut self, dt: f64) -> Pose {
        if self.status == TweenStatus::Running && dt > 0.0 {
            self.elapsed += dt;
        }
        self.sample()
    }

    /// Restarts from `current` toward `to`, keeping identity and timing spec.
    pub fn restart_toward(&mut self, current: Pose, to: Pose) {
        self.from = current;
        self.to = to;
        self.elapsed = 0.0;
        self.spec.delay = 0.0;
        self.status = TweenStatus::Running;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lift(spec: TweenSpec) -> Tween {
        let to = Pose {
            y: 10.0,
            ..Pose::NEUTRAL
        };
        Tween::new(TweenId(1), ElementKey(1), Pose::NEUTRAL, to, spec)
    }

    #[test]
    fn once_tween_finishes_on_target() {
        let mut tween = lift(TweenSpec::once(0.4, Easing::Power2Out));

        tween.advance(0.2);
        assert!(!tween.is_finished());
        let pose = tween.advance(0.3);

        assert!(tween.is_finished());
        assert_eq!(pose.y, 10.0);
    }

    #[test]
    fn delay_holds_start_pose() {
        let mut tween = lift(TweenSpec::once(1.0, Easing::Linear).with_delay(0.5));

        assert_eq!(tween.advance(0.4).y, 0.0);
        assert!((tween.advance(0.6).y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn yoyo_reverses_every_other_cycle_and_never_finishes() {
        let mut tween = lift(TweenSpec::yoyo(1.0, Easing::Linear));

        assert!((tween.advance(0.25).y - 2.5).abs() < 1e-9);
        assert!((tween.advance(1.0).y - 7.5).abs() < 1e-9);
        assert!((tween.advance(1.0).y - 2.5).abs() < 1e-9);
        tween.advance(100.0);
        assert!(!tween.is_finished());
    }

    #[test]
    fn loop_wraps_to_start() {
        let mut tween = lift(TweenSpec::looping(2.0, Easing::Linear));

        assert!((tween.advance(2.5).y - 2.5).abs() < 1e-9);
    }

    #[test]
    fn paused_tween_holds_pose() {
        let mut tween = lift(TweenSpec::once(1.0, Easing::Linear));
        tween.advance(0.5);
        tween.status = TweenStatus::Paused;

        assert!((tween.advance(10.0).y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let mut tween = lift(TweenSpec::once(0.0, Easing::Linear));

        assert_eq!(tween.advance(0.016).y, 10.0);
        assert!(tween.is_finished());
    }
}
