pub mod checkout;
pub mod order;

pub use checkout::{CheckoutReview, UserIdentity};
pub use order::{Address, CustomerInfo, GeoLocation, LineItem, Order};
