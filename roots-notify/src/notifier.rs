use chrono::{DateTime, Local, TimeZone};
use roots_core::{DeviceClass, NavigationSurface, NotifierConfig, NotifyError, NotifyResult};
use roots_shared::{CheckoutReview, GeoLocation, Masked, Order, UserIdentity};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::formatter::OrderMessage;
use crate::links::{normalize_destination, DeliveryLinks};
use crate::opener::AnchorOpener;
use crate::plan::{AttemptChain, DeliveryPlan, DeliveryState};

/// A rendered message with its links and the attempt order for one device
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub message: String,
    pub links: DeliveryLinks,
    pub plan: DeliveryPlan,
}

impl Notification {
    pub fn prepare<Tz>(
        config: &NotifierConfig,
        message: &OrderMessage,
        destination: &str,
        device: DeviceClass,
        placed_at: &DateTime<Tz>,
    ) -> NotifyResult<Self>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let phone = normalize_destination(destination)?;
        let text = message.render(placed_at);
        let links = DeliveryLinks::build(config, &phone, &text)?;
        let plan = DeliveryPlan::for_device(device, config.fallback_delay());

        Ok(Self { message: text, links, plan })
    }
}

/// What happened before control returned to the caller
#[derive(Debug)]
pub struct DeliveryReport {
    pub notification_id: Uuid,
    pub device: DeviceClass,
    /// Outcome of the attempts made synchronously
    pub immediate: DeliveryState,
    /// Scheduled fallbacks; dropping the handles does not cancel them
    pub deferred: Vec<DeferredAttempt>,
}

/// A fallback chain running after its delay, on the caller's runtime when
/// there is one and on a detached thread otherwise
#[derive(Debug)]
pub enum DeferredAttempt {
    Task(JoinHandle<DeliveryState>),
    Thread(std::thread::JoinHandle<DeliveryState>),
}

impl DeferredAttempt {
    /// `None` if the chain panicked or was aborted
    pub async fn outcome(self) -> Option<DeliveryState> {
        match self {
            DeferredAttempt::Task(handle) => handle.await.ok(),
            DeferredAttempt::Thread(handle) => tokio::task::spawn_blocking(move || handle.join().ok())
                .await
                .ok()
                .flatten(),
        }
    }
}

/// Sends new orders to the shop's WhatsApp number.
///
/// Delivery is best effort: both entry points log and swallow every failure so
/// the checkout success flow never depends on it.
pub struct OrderNotifier {
    config: NotifierConfig,
    opener: AnchorOpener,
    user_agent: String,
}

impl OrderNotifier {
    pub fn new(
        config: NotifierConfig,
        surface: Arc<dyn NavigationSurface>,
        user_agent: impl Into<String>,
    ) -> Self {
        let opener = AnchorOpener::new(surface, config.trigger_lifetime());
        Self {
            config,
            opener,
            user_agent: user_agent.into(),
        }
    }

    /// Notify about a pre-shaped order, to the configured number
    pub fn notify_order(&self, order: &Order) -> Option<DeliveryReport> {
        let message = OrderMessage::from_order(order);

        match self.dispatch(&message, &self.config.destination_number) {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!("Failed to open WhatsApp link: {}", e);
                None
            }
        }
    }

    /// Notify from the checkout flow, merging the stored order, the review
    /// draft and the signed-in user. `destination` overrides the configured
    /// number.
    pub async fn notify_checkout(
        &self,
        order: Option<&Order>,
        review: Option<&CheckoutReview>,
        user: Option<&UserIdentity>,
        location: Option<&GeoLocation>,
        destination: Option<&str>,
    ) -> Option<DeliveryReport> {
        let message = OrderMessage::from_checkout(order, review, user, location, &self.config.order_prefix);
        let destination = destination.unwrap_or(&self.config.destination_number);

        match self.dispatch(&message, destination) {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!("Failed to send WhatsApp message: {}", e);
                None
            }
        }
    }

    fn dispatch(&self, message: &OrderMessage, destination: &str) -> NotifyResult<DeliveryReport> {
        let notification_id = Uuid::new_v4();
        let span = tracing::info_span!("order_notification", id = %notification_id);
        let _entered = span.enter();

        let device = DeviceClass::from_user_agent(&self.user_agent);
        let notification = Notification::prepare(&self.config, message, destination, device, &Local::now())?;

        tracing::info!(
            "Dispatching order {} to {} via {:?} plan",
            message.order_id,
            Masked(destination),
            device
        );

        let mut immediate = DeliveryState::Idle;
        for chain in notification.plan.immediate() {
            immediate = run_chain(&self.opener, chain, &notification.links);
            if immediate == DeliveryState::Failed && chain.fail_when_exhausted {
                return Err(NotifyError::PopupBlocked);
            }
        }

        let mut deferred = Vec::new();
        for chain in notification.plan.deferred() {
            let opener = self.opener.clone();
            let links = notification.links.clone();
            let chain = chain.clone();

            // Synchronous callers may have no runtime; the fallback still has to run.
            let scheduled = match tokio::runtime::Handle::try_current() {
                Ok(handle) => DeferredAttempt::Task(handle.spawn(
                    async move {
                        tokio::time::sleep(chain.delay()).await;
                        run_chain(&opener, &chain, &links)
                    }
                    .instrument(span.clone()),
                )),
                Err(_) => {
                    let span = span.clone();
                    DeferredAttempt::Thread(std::thread::spawn(move || {
                        let _entered = span.enter();
                        std::thread::sleep(chain.delay());
                        run_chain(&opener, &chain, &links)
                    }))
                }
            };
            deferred.push(scheduled);
        }

        Ok(DeliveryReport {
            notification_id,
            device,
            immediate,
            deferred,
        })
    }
}

fn run_chain(opener: &AnchorOpener, chain: &AttemptChain, links: &DeliveryLinks) -> DeliveryState {
    for attempt in &chain.attempts {
        let state = DeliveryState::from(attempt.channel);
        tracing::debug!("Delivery state {:?} ({})", state, attempt.target.as_str());

        match opener.open(links.get(attempt.channel), attempt.target) {
            Ok(()) => {
                tracing::debug!("Delivery state {:?} via {:?}", DeliveryState::Delivered, attempt.channel);
                return DeliveryState::Delivered;
            }
            Err(e) => tracing::warn!("Delivery via {:?} failed: {}", attempt.channel, e),
        }
    }

    tracing::debug!("Delivery state {:?}", DeliveryState::Failed);
    DeliveryState::Failed
}
