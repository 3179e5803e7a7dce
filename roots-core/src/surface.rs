use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::NotifyResult;

/// Browsing context a delivery link is opened in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OpenTarget {
    /// Replace the current page (`_self`)
    #[serde(rename = "_self")]
    SameContext,
    /// Open a new tab or window (`_blank`)
    #[serde(rename = "_blank")]
    NewContext,
}

impl OpenTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            OpenTarget::SameContext => "_self",
            OpenTarget::NewContext => "_blank",
        }
    }
}

/// Handle to a synthesized navigation trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(pub Uuid);

impl TriggerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TriggerId {
    fn default() -> Self {
        Self::new()
    }
}

/// The browsing environment a notifier navigates through.
///
/// Direct programmatic navigation to app-scheme links is blocked or loses the
/// query string on some platforms, while a synthesized, user-attributable
/// trigger (an anchor click) is not. Implementations create such a trigger,
/// fire it once, and tear it down on request.
pub trait NavigationSurface: Send + Sync {
    /// Synthesize a dismissible trigger pointing at `url`
    fn create_trigger(&self, url: &str, target: OpenTarget) -> NotifyResult<TriggerId>;

    /// Fire the trigger once
    fn invoke(&self, trigger: TriggerId) -> NotifyResult<()>;

    /// Remove the trigger; errors are irrelevant at this point
    fn discard(&self, trigger: TriggerId);
}
