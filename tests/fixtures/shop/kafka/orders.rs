use crate::events::{Invoice, OrderCreated};
use rdkafka::producer::FutureProducer;

#[component]
pub struct OrderListener {
    producer: FutureProducer,
}

impl OrderListener {
    #[kafka_listener(topics = "orders", group_id = "billing")]
    pub async fn on_order_created(&self, event: OrderCreated) {
        let invoice = Self::invoice_for(&event);
        self.publish_invoice(invoice).await;
    }

    #[kafka_listener(topics = ["orders"], group_id = "audit")]
    pub async fn audit(&self, event: &OrderCreated) {
        log::info!("order {:?}", event.order_id);
    }

    #[kafka_producer(topic = "invoices")]
    pub async fn publish_invoice(&self, invoice: Invoice) {}

    fn invoice_for(event: &OrderCreated) -> Invoice {
        unimplemented!()
    }
}
