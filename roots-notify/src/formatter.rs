use chrono::{DateTime, TimeZone};
use roots_shared::{Address, CheckoutReview, GeoLocation, LineItem, Order, UserIdentity};
use serde::Serialize;
use std::fmt;

const NOT_PROVIDED: &str = "Not provided";
const NOT_AVAILABLE: &str = "N/A";
const UNKNOWN_CUSTOMER: &str = "Unknown Customer";
const UNKNOWN_ITEM: &str = "Unknown Item";
const DEFAULT_PAYMENT: &str = "Not specified";
const DEFAULT_DELIVERY: &str = "Standard";

/// Everything the shop needs to see about an order, with placeholders already
/// resolved. Rendering is a pure function of these fields plus the timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMessage {
    pub order_id: String,
    pub customer_name: String,
    /// Only rendered when present
    pub customer_id: Option<String>,
    pub customer_phone: String,
    pub customer_email: String,
    pub items: Vec<LineItem>,
    pub address: Option<Address>,
    pub location: Option<GeoLocation>,
    pub payment_method: String,
    pub delivery_option: String,
    pub subtotal: f64,
    pub shipping_fee: f64,
    pub discount: f64,
    pub total: f64,
}

impl OrderMessage {
    /// Message for a pre-shaped order
    pub fn from_order(order: &Order) -> Self {
        let customer = order.customer_info.clone().unwrap_or_default();

        Self {
            order_id: order
                .order_id
                .clone()
                .or_else(|| order.id.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            customer_name: customer.name.unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()),
            customer_id: customer.id,
            customer_phone: customer.phone.unwrap_or_else(|| NOT_PROVIDED.to_string()),
            customer_email: customer.email.unwrap_or_else(|| NOT_PROVIDED.to_string()),
            items: order.items().to_vec(),
            address: order.shipping_address.clone(),
            location: order.location,
            payment_method: order
                .payment_method
                .clone()
                .unwrap_or_else(|| DEFAULT_PAYMENT.to_string()),
            delivery_option: order
                .delivery_option
                .clone()
                .unwrap_or_else(|| DEFAULT_DELIVERY.to_string()),
            subtotal: order.subtotal,
            shipping_fee: order.shipping_fee,
            discount: order.discount,
            total: order.total,
        }
    }

    /// Message merged from the stored order record, the review draft and the
    /// signed-in user. The draft wins for address, items and money; the user
    /// wins for identity.
    pub fn from_checkout(
        order: Option<&Order>,
        review: Option<&CheckoutReview>,
        user: Option<&UserIdentity>,
        location: Option<&GeoLocation>,
        order_prefix: &str,
    ) -> Self {
        let review_address = review.and_then(|r| r.address.as_ref());

        let customer_name = user
            .and_then(|u| u.name.clone())
            .or_else(|| review_address.and_then(|a| a.name.clone()))
            .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());
        let customer_phone = review_address
            .and_then(|a| a.phone.clone())
            .or_else(|| user.and_then(|u| u.phone.clone()))
            .unwrap_or_else(|| NOT_PROVIDED.to_string());
        let customer_email = user
            .and_then(|u| u.email.clone())
            .unwrap_or_else(|| NOT_PROVIDED.to_string());
        let customer_id = user
            .and_then(|u| u.any_id().map(str::to_string))
            .or_else(|| review.and_then(|r| r.customer_id.clone()))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let items = review
            .and_then(|r| r.items.clone())
            .or_else(|| order.and_then(|o| o.items.clone()))
            .unwrap_or_default();

        let order_id = match order.and_then(|o| o.id.as_deref()) {
            Some(id) => format!("{}{}", order_prefix, id),
            None => order
                .and_then(|o| o.order_id.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        };

        Self {
            order_id,
            customer_name,
            customer_id: Some(customer_id),
            customer_phone,
            customer_email,
            items,
            address: review_address.cloned(),
            location: location.copied(),
            payment_method: review
                .and_then(|r| r.payment_method.clone())
                .unwrap_or_else(|| DEFAULT_PAYMENT.to_string()),
            delivery_option: review
                .and_then(|r| r.delivery_option.clone())
                .unwrap_or_else(|| DEFAULT_DELIVERY.to_string()),
            subtotal: review.map(|r| r.subtotal).unwrap_or_default(),
            shipping_fee: review.map(|r| r.shipping_fee).unwrap_or_default(),
            discount: review.map(|r| r.discount).unwrap_or_default(),
            total: review.map(|r| r.total).unwrap_or_default(),
        }
    }

    /// Render the WhatsApp text, stamped with `placed_at`
    pub fn render<Tz>(&self, placed_at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut out = String::from("🛍️ *NEW ORDER RECEIVED*\n\n");

        out.push_str(&format!("📋 *Order ID:* {}\n", self.order_id));
        out.push_str(&format!("👤 *Customer:* {}\n", self.customer_name));
        if let Some(id) = &self.customer_id {
            out.push_str(&format!("🆔 *Customer ID:* {}\n", id));
        }
        out.push_str(&format!("📞 *Phone:* {}\n", self.customer_phone));
        out.push_str(&format!("📧 *Email:* {}\n\n", self.customer_email));

        out.push_str("🛒 *Items Ordered:*\n");
        out.push_str(&render_items(&self.items));
        out.push_str("\n\n");

        out.push_str("📍 *Shipping Address:*\n");
        out.push_str(&render_address(self.address.as_ref()));
        out.push_str("\n\n");

        match self.location {
            Some(loc) => out.push_str(&format!("Location: {}, {}\n\n", loc.latitude, loc.longitude)),
            None => out.push_str("Location not available\n\n"),
        }

        out.push_str(&format!("💳 *Payment Method:* {}\n", self.payment_method));
        out.push_str(&format!("🚚 *Delivery Option:* {}\n\n", self.delivery_option));

        out.push_str("💰 *Order Summary:*\n");
        out.push_str(&format!("Subtotal: {}\n", rupees(self.subtotal)));
        out.push_str(&format!("Shipping: {}\n", rupees(self.shipping_fee)));
        if self.discount > 0.0 {
            out.push_str(&format!("Discount: -{}\n", rupees(self.discount)));
        }
        out.push_str(&format!("*Total: {}*\n\n", rupees(self.total)));

        out.push_str(&format!("⏰ *Order Time:* {}\n\n", order_time(placed_at)));
        out.push_str("🎉 Thank you for your order! We'll process it shortly.");

        out
    }
}

/// Two-decimal rupee amount, e.g. `₹450.00`
pub fn rupees(amount: f64) -> String {
    // -0.0 would otherwise print as "-0.00"
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("₹{:.2}", amount)
}

/// en-IN style local timestamp: `19/10/2026, 3:04:05 pm`
pub fn order_time<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.format("%-d/%-m/%Y, %-I:%M:%S %P").to_string()
}

fn render_items(items: &[LineItem]) -> String {
    if items.is_empty() {
        return "No items found".to_string();
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!(
                "{}. {}\n   Qty: {} x {} = {}",
                index + 1,
                item.name.as_deref().unwrap_or(UNKNOWN_ITEM),
                item.quantity,
                rupees(item.price),
                rupees(item.line_total()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_address(address: Option<&Address>) -> String {
    let Some(addr) = address else {
        return "Address not available".to_string();
    };

    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    let street = match &addr.landmark {
        Some(landmark) => format!("{}, {}", field(&addr.street), landmark),
        None => field(&addr.street),
    };

    format!(
        "{}\n{}\n{}, {} - {}\nPhone: {}",
        field(&addr.name),
        street,
        field(&addr.city),
        field(&addr.state),
        field(&addr.pincode),
        field(&addr.phone),
    )
}
