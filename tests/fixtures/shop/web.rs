use crate::events::OrderCreated;

#[component]
pub struct OrdersController;

impl OrdersController {
    #[kafka_listener(topics = "web-orders")]
    pub fn outside_base_package(&self, event: OrderCreated) {}
}
