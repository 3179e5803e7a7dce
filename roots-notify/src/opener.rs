use roots_core::{NavigationSurface, NotifyError, NotifyResult, OpenTarget, TriggerId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// Opens a link the way a user click would: synthesize a trigger, fire it
/// once, and tear it down after `lifetime`.
#[derive(Clone)]
pub struct AnchorOpener {
    surface: Arc<dyn NavigationSurface>,
    lifetime: Duration,
}

impl AnchorOpener {
    pub fn new(surface: Arc<dyn NavigationSurface>, lifetime: Duration) -> Self {
        Self { surface, lifetime }
    }

    /// Fails only when the surface cannot create or fire the trigger. Whether
    /// the app or page behind the link actually loads is not observable.
    pub fn open(&self, url: &str, target: OpenTarget) -> NotifyResult<()> {
        let trigger = self.surface.create_trigger(url, target)?;
        let fired = self.surface.invoke(trigger);
        self.schedule_discard(trigger);
        fired
    }

    fn schedule_discard(&self, trigger: TriggerId) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let surface = self.surface.clone();
                let lifetime = self.lifetime;
                handle.spawn(async move {
                    tokio::time::sleep(lifetime).await;
                    surface.discard(trigger);
                });
            }
            Err(_) => self.surface.discard(trigger),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEventKind {
    Created,
    Invoked,
    Discarded,
}

#[derive(Debug, Clone)]
pub struct SurfaceEvent {
    pub kind: SurfaceEventKind,
    pub url: String,
    pub target: OpenTarget,
    pub at: Instant,
}

#[derive(Default)]
struct MockState {
    triggers: HashMap<TriggerId, (String, OpenTarget)>,
    events: Vec<SurfaceEvent>,
}

/// In-memory surface that records every trigger. Links containing one of the
/// `blocked` fragments fail on invoke, like a popup blocker would.
#[derive(Default)]
pub struct MockSurface {
    blocked: Vec<String>,
    state: Mutex<MockState>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocking(fragments: &[&str]) -> Self {
        Self {
            blocked: fragments.iter().map(|f| f.to_string()).collect(),
            state: Mutex::default(),
        }
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.lock().events.clone()
    }

    /// URLs whose trigger fired successfully, in order
    pub fn opened(&self) -> Vec<(String, OpenTarget)> {
        self.events_of(SurfaceEventKind::Invoked)
            .into_iter()
            .map(|e| (e.url, e.target))
            .collect()
    }

    pub fn events_of(&self, kind: SurfaceEventKind) -> Vec<SurfaceEvent> {
        self.lock().events.iter().filter(|e| e.kind == kind).cloned().collect()
    }

    pub fn live_triggers(&self) -> usize {
        self.lock().triggers.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(state: &mut MockState, kind: SurfaceEventKind, url: String, target: OpenTarget) {
        state.events.push(SurfaceEvent { kind, url, target, at: Instant::now() });
    }
}

impl NavigationSurface for MockSurface {
    fn create_trigger(&self, url: &str, target: OpenTarget) -> NotifyResult<TriggerId> {
        let id = TriggerId::new();
        let mut state = self.lock();
        state.triggers.insert(id, (url.to_string(), target));
        Self::record(&mut state, SurfaceEventKind::Created, url.to_string(), target);
        Ok(id)
    }

    fn invoke(&self, trigger: TriggerId) -> NotifyResult<()> {
        let mut state = self.lock();
        let (url, target) = state
            .triggers
            .get(&trigger)
            .cloned()
            .ok_or_else(|| NotifyError::TriggerFailed("unknown trigger".to_string()))?;

        if self.blocked.iter().any(|fragment| url.contains(fragment.as_str())) {
            return Err(NotifyError::TriggerFailed(format!("popup blocked for {}", target.as_str())));
        }

        Self::record(&mut state, SurfaceEventKind::Invoked, url, target);
        Ok(())
    }

    fn discard(&self, trigger: TriggerId) {
        let mut state = self.lock();
        if let Some((url, target)) = state.triggers.remove(&trigger) {
            Self::record(&mut state, SurfaceEventKind::Discarded, url, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_trigger_fires_once_and_is_discarded_later() {
        let surface = Arc::new(MockSurface::new());
        let opener = AnchorOpener::new(surface.clone(), Duration::from_millis(1000));

        opener.open("https://wa.me/1?text=hi", OpenTarget::NewContext).unwrap();

        assert_eq!(surface.opened(), vec![("https://wa.me/1?text=hi".to_string(), OpenTarget::NewContext)]);
        assert_eq!(surface.live_triggers(), 1);

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(surface.live_triggers(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(surface.live_triggers(), 0);
        assert_eq!(surface.events_of(SurfaceEventKind::Discarded).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_invoke_reports_failure() {
        let surface = Arc::new(MockSurface::blocking(&["api.whatsapp.com"]));
        let opener = AnchorOpener::new(surface.clone(), Duration::from_millis(1000));

        let result = opener.open("https://api.whatsapp.com/send?phone=1", OpenTarget::NewContext);

        assert!(matches!(result, Err(NotifyError::TriggerFailed(_))));
        assert!(surface.opened().is_empty());
        assert_eq!(surface.events_of(SurfaceEventKind::Created).len(), 1);
    }

    #[test]
    fn test_without_runtime_discards_immediately() {
        let surface = Arc::new(MockSurface::new());
        let opener = AnchorOpener::new(surface.clone(), Duration::from_millis(1000));

        opener.open("whatsapp://send?phone=1", OpenTarget::SameContext).unwrap();
        assert_eq!(surface.live_triggers(), 0);
    }
}
