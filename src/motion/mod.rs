//! Animation state for the portfolio page: seeded layout, tweens and their
//! owners, pointer overrides, scroll signals, one-shot reveals and the
//! particle background loop. Nothing here touches the DOM.

pub mod easing;
pub mod frame;
pub mod idle;
pub mod interaction;
pub mod particles;
pub mod pose;
pub mod reveal;
pub mod scope;
pub mod scroll;
pub mod seed;
pub mod timeline;
pub mod tween;

pub use easing::Easing;
pub use frame::{FrameDriver, FrameOutcome, RunState, Surface};
pub use idle::{IdleProfile, IdleTweenPool};
pub use interaction::{Bounds, InteractionController, InteractionState, PointerEvent, TiltProfile};
pub use particles::{CanvasSize, ParticleBody, ParticleField};
pub use pose::{Pose, PoseTarget, Property};
pub use reveal::{RevealCue, RevealSequencer, RevealStyle};
pub use scope::{CancelToken, ResourceKind, Scope};
pub use scroll::{ObservationWindow, ScrollMetrics, ScrollSignalBus, SectionObserver, SectionRect};
pub use seed::{seed_points, ParticleSeedPoint};
pub use timeline::{Animator, Completion, Timeline};
pub use tween::{ElementKey, TweenId, TweenSpec};
