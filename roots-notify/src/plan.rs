use roots_core::{DeviceClass, OpenTarget};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which of the three delivery links an attempt uses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Native,
    Primary,
    Fallback,
}

/// Delivery lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryState {
    Idle,
    AttemptingNative,
    AttemptingPrimaryWeb,
    AttemptingFallbackWeb,
    Delivered,
    Failed,
}

impl From<Channel> for DeliveryState {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Native => DeliveryState::AttemptingNative,
            Channel::Primary => DeliveryState::AttemptingPrimaryWeb,
            Channel::Fallback => DeliveryState::AttemptingFallbackWeb,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attempt {
    pub channel: Channel,
    pub target: OpenTarget,
}

/// Attempts tried in order until one opens. A deferred chain is scheduled
/// after `delay_ms` and runs without the caller waiting on it, even when the
/// delay is zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttemptChain {
    pub deferred: bool,
    pub delay_ms: u64,
    pub attempts: Vec<Attempt>,
    /// Running out of attempts is reported as a blocked popup
    pub fail_when_exhausted: bool,
}

impl AttemptChain {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred
    }
}

/// Order of delivery attempts for one device class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPlan {
    pub device: DeviceClass,
    pub chains: Vec<AttemptChain>,
}

impl DeliveryPlan {
    /// Mobile: native app in place, then the web links in a new tab after
    /// `fallback_delay` regardless of how the native attempt went.
    /// Desktop: web links in a new tab straight away, never the native scheme.
    pub fn for_device(device: DeviceClass, fallback_delay: Duration) -> Self {
        let web = vec![
            Attempt { channel: Channel::Primary, target: OpenTarget::NewContext },
            Attempt { channel: Channel::Fallback, target: OpenTarget::NewContext },
        ];

        let chains = match device {
            DeviceClass::Mobile => vec![
                AttemptChain {
                    deferred: false,
                    delay_ms: 0,
                    attempts: vec![Attempt { channel: Channel::Native, target: OpenTarget::SameContext }],
                    fail_when_exhausted: false,
                },
                AttemptChain {
                    deferred: true,
                    delay_ms: fallback_delay.as_millis() as u64,
                    attempts: web,
                    fail_when_exhausted: false,
                },
            ],
            DeviceClass::Desktop => vec![AttemptChain {
                deferred: false,
                delay_ms: 0,
                attempts: web,
                fail_when_exhausted: true,
            }],
        };

        Self { device, chains }
    }

    /// Chains that run before control returns to the caller
    pub fn immediate(&self) -> impl Iterator<Item = &AttemptChain> {
        self.chains.iter().filter(|c| !c.is_deferred())
    }

    pub fn deferred(&self) -> impl Iterator<Item = &AttemptChain> {
        self.chains.iter().filter(|c| c.is_deferred())
    }
}
