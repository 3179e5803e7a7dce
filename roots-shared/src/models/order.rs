use serde::{Deserialize, Serialize};

use crate::numeric;

/// A placed order as the checkout flow hands it over
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Numeric record id assigned by the backend
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Pre-shaped display id (e.g. `NN42`)
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub customer_info: Option<CustomerInfo>,
    #[serde(default)]
    pub items: Option<Vec<LineItem>>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub delivery_option: Option<String>,
    #[serde(default, deserialize_with = "numeric::decimal")]
    pub subtotal: f64,
    #[serde(default, alias = "shipping", deserialize_with = "numeric::decimal")]
    pub shipping_fee: f64,
    #[serde(default, deserialize_with = "numeric::decimal")]
    pub discount: f64,
    #[serde(default, deserialize_with = "numeric::decimal")]
    pub total: f64,
    #[serde(default)]
    pub location: Option<GeoLocation>,
}

impl Order {
    pub fn items(&self) -> &[LineItem] {
        self.items.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One product line of an order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit price in rupees
    #[serde(default, deserialize_with = "numeric::decimal")]
    pub price: f64,
    #[serde(default, deserialize_with = "numeric::count")]
    pub quantity: u32,
}

impl LineItem {
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: Some(name.into()),
            price,
            quantity,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, alias = "postalCode", deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, deserialize_with = "numeric::text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Browser-reported coordinates captured at checkout
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(default, deserialize_with = "numeric::decimal")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "numeric::decimal")]
    pub longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_decodes_storefront_payload() {
        let order: Order = serde_json::from_value(json!({
            "id": 42,
            "items": [{ "name": "Ghee", "price": 450, "quantity": 2 }],
            "subtotal": 900,
            "shippingFee": 50,
            "discount": 0,
            "total": 950
        }))
        .unwrap();

        assert_eq!(order.id.as_deref(), Some("42"));
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].line_total(), 900.0);
        assert_eq!(order.shipping_fee, 50.0);
        assert!(order.customer_info.is_none());
    }

    #[test]
    fn test_missing_numbers_default_to_zero() {
        let order: Order = serde_json::from_value(json!({
            "orderId": "NN7",
            "items": [{ "name": "Jaggery", "price": null }],
            "shipping": "40",
            "total": "not a number"
        }))
        .unwrap();

        assert_eq!(order.order_id.as_deref(), Some("NN7"));
        assert_eq!(order.items()[0].price, 0.0);
        assert_eq!(order.items()[0].quantity, 0);
        assert_eq!(order.subtotal, 0.0);
        assert_eq!(order.shipping_fee, 40.0);
        assert_eq!(order.total, 0.0);
    }

    #[test]
    fn test_null_items_are_empty() {
        let order: Order = serde_json::from_value(json!({ "items": null })).unwrap();
        assert!(order.items().is_empty());
    }

    #[test]
    fn test_numeric_pincode_is_text() {
        let address: Address = serde_json::from_value(json!({
            "city": "Mysuru",
            "pincode": 570001
        }))
        .unwrap();
        assert_eq!(address.pincode.as_deref(), Some("570001"));
    }
}
