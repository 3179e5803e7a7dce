pub mod formatter;
pub mod links;
pub mod plan;
pub mod opener;
pub mod notifier;

pub use formatter::OrderMessage;
pub use links::DeliveryLinks;
pub use plan::{Attempt, AttemptChain, Channel, DeliveryPlan, DeliveryState};
pub use opener::{AnchorOpener, MockSurface};
pub use notifier::{DeferredAttempt, DeliveryReport, Notification, OrderNotifier};
