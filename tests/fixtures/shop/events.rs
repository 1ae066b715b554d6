use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: Uuid,
    pub customer: Customer,
    pub lines: Vec<OrderLine>,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    #[serde(skip)]
    pub trace: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: u64,
    pub display_name: String,
    pub vip: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderLine {
    pub sku: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Placed,
    InProgress,
    #[serde(rename = "SHIPPED_OUT")]
    Shipped,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_number: String,
    pub order_id: Uuid,
    pub total: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[api_model("Payment")]
pub struct PaymentCompleted {
    pub payment_id: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentFailed {
    pub payment_id: String,
    pub reason: String,
}
