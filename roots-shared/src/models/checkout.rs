use serde::{Deserialize, Serialize};

use crate::models::order::{Address, LineItem};
use crate::numeric;

/// The in-progress checkout draft shown on the review step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReview {
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub items: Option<Vec<LineItem>>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub delivery_option: Option<String>,
    #[serde(default, deserialize_with = "numeric::decimal")]
    pub subtotal: f64,
    #[serde(default, deserialize_with = "numeric::decimal")]
    pub shipping_fee: f64,
    #[serde(default, deserialize_with = "numeric::decimal")]
    pub discount: f64,
    #[serde(default, deserialize_with = "numeric::decimal")]
    pub total: f64,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

/// Signed-in user as held by the session store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserIdentity {
    /// Either id spelling the session store may have used
    pub fn any_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.user_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_review_decodes_string_amounts() {
        let review: CheckoutReview = serde_json::from_value(json!({
            "address": { "name": "Asha", "landmark": "Near temple" },
            "subtotal": "1200.50",
            "shippingFee": 0,
            "customerId": 17
        }))
        .unwrap();

        assert_eq!(review.subtotal, 1200.5);
        assert_eq!(review.customer_id.as_deref(), Some("17"));
        assert!(review.items.is_none());
        assert_eq!(
            review.address.and_then(|a| a.landmark),
            Some("Near temple".to_string())
        );
    }

    #[test]
    fn test_user_id_falls_back_to_user_id_field() {
        let user: UserIdentity = serde_json::from_value(json!({ "userId": "u-9" })).unwrap();
        assert_eq!(user.any_id(), Some("u-9"));

        let user: UserIdentity = serde_json::from_value(json!({ "id": 3, "userId": "u-9" })).unwrap();
        assert_eq!(user.any_id(), Some("3"));
    }
}
