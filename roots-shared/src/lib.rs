pub mod models;
pub mod numeric;
pub mod pii;

pub use models::{Address, CheckoutReview, CustomerInfo, GeoLocation, LineItem, Order, UserIdentity};
pub use pii::Masked;
