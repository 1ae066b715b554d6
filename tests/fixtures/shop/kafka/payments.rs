use crate::events::{PaymentCompleted, PaymentFailed};
use rdkafka::message::ConsumerRecord;

#[service]
#[kafka_listener(topics = ["payments"])]
pub struct PaymentListener;

impl PaymentListener {
    #[kafka_handler]
    pub fn on_completed(&self, event: PaymentCompleted) {}

    #[kafka_handler]
    pub fn on_failed(&self, record: ConsumerRecord<String, PaymentFailed>) {}
}

/// Not a component: never scanned
pub struct RefundListener;

impl RefundListener {
    #[kafka_listener(topics = "refunds")]
    pub fn on_refund(&self, event: PaymentCompleted) {}
}
