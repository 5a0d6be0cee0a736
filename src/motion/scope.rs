use std::cell::Cell;
use std::rc::Rc;

use crate::logging::{log_event, LogConfig, LogLevel};

/// Shared liveness flag. Callbacks that may outlive their component check it
/// before touching anything.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Listener,
    FrameCallback,
    Tween,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResourceCounts {
    pub listeners: usize,
    pub frame_callbacks: usize,
    pub tweens: usize,
}

impl ResourceCounts {
    fn add(&mut self, kind: ResourceKind) {
        match kind {
            ResourceKind::Listener => self.listeners += 1,
            ResourceKind::FrameCallback => self.frame_callbacks += 1,
            ResourceKind::Tween => self.tweens += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.listeners + self.frame_callbacks + self.tweens
    }
}

type Cleanup = Box<dyn FnOnce()>;

/// Everything a mounted component acquired, released together on teardown.
/// Teardown runs on an explicit call or on drop, whichever comes first.
pub struct Scope {
    label: &'static str,
    log: LogConfig,
    token: CancelToken,
    cleanups: Vec<(ResourceKind, Cleanup)>,
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("label", &self.label)
            .field("active", &self.active())
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

impl Scope {
    pub fn new(label: &'static str, log: LogConfig) -> Self {
        Self {
            label,
            log,
            token: CancelToken::new(),
            cleanups: Vec::new(),
        }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Records a release action. If the scope is already gone the action runs
    /// immediately so nothing registered late can leak.
    pub fn defer(&mut self, kind: ResourceKind, cleanup: impl FnOnce() + 'static) {
        if self.token.is_cancelled() {
            cleanup();
            return;
        }
        self.cleanups.push((kind, Box::new(cleanup)));
    }

    pub fn active(&self) -> ResourceCounts {
        let mut counts = ResourceCounts::default();
        for (kind, _) in &self.cleanups {
            counts.add(*kind);
        }
        counts
    }

    /// Cancels the token first, then releases in reverse acquisition order.
    pub fn teardown(&mut self) -> ResourceCounts {
        self.token.cancel();

        let mut released = ResourceCounts::default();
        while let Some((kind, cleanup)) = self.cleanups.pop() {
            cleanup();
            released.add(kind);
        }

        if released.total() > 0 {
            log_event(
                &self.log,
                LogLevel::Debug,
                "scope_teardown",
                serde_json::json!({
                    "scope": self.label,
                    "listeners": released.listeners,
                    "frameCallbacks": released.frame_callbacks,
                    "tweens": released.tweens,
                }),
            );
        }
        released
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn quiet() -> LogConfig {
        LogConfig::new(LogLevel::Info)
    }

    #[test]
    fn teardown_releases_everything_in_reverse_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut scope = Scope::new("about", quiet());

        for (kind, name) in [
            (ResourceKind::Listener, "resize"),
            (ResourceKind::FrameCallback, "raf"),
            (ResourceKind::Tween, "halo"),
        ] {
            let order = Rc::clone(&order);
            scope.defer(kind, move || order.borrow_mut().push(name));
        }

        assert_eq!(scope.active().total(), 3);
        let released = scope.teardown();

        assert_eq!(released.total(), 3);
        assert_eq!(scope.active(), ResourceCounts::default());
        assert_eq!(*order.borrow(), vec!["halo", "raf", "resize"]);
    }

    #[test]
    fn drop_tears_down() {
        let live = Rc::new(Cell::new(0));
        let token;
        {
            let mut scope = Scope::new("skills", quiet());
            token = scope.token();
            live.set(live.get() + 1);
            let live = Rc::clone(&live);
            scope.defer(ResourceKind::Listener, move || live.set(live.get() - 1));
        }

        assert_eq!(live.get(), 0);
        assert!(token.is_cancelled());
    }

    #[test]
    fn late_registration_after_teardown_releases_immediately() {
        let released = Rc::new(Cell::new(false));
        let mut scope = Scope::new("nav", quiet());
        scope.teardown();

        let flag = Rc::clone(&released);
        scope.defer(ResourceKind::FrameCallback, move || flag.set(true));

        assert!(released.get());
        assert_eq!(scope.active().total(), 0);
    }

    #[test]
    fn second_teardown_is_a_no_op() {
        let calls = Rc::new(Cell::new(0));
        let mut scope = Scope::new("contact", quiet());
        let counter = Rc::clone(&calls);
        scope.defer(ResourceKind::Listener, move || counter.set(counter.get() + 1));

        scope.teardown();
        scope.teardown();
        drop(scope);

        assert_eq!(calls.get(), 1);
    }
}
