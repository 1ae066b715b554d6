use kafka_docs_from_source::{
    classpath::ClassPath,
    docket::Docket,
    endpoints::KafkaEndpointsService,
    error::Error,
    generate::generate,
    listeners::{annotated::AnnotatedListenersScanner, EndpointType, KafkaEndpoint},
    models::ModelsService,
    serializer::{serialize_json, serialize_yaml},
    type_resolver::{TypeInfo, TypeResolver},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashSet;
use tempfile::TempDir;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn create_shop_project() -> TempDir {
    create_test_project(vec![
        ("src/lib.rs", include_str!("fixtures/shop/lib.rs")),
        ("src/events.rs", include_str!("fixtures/shop/events.rs")),
        // Same simple name as an event, only reachable through its own path
        ("src/legacy.rs", "pub struct OrderCreated { pub reference: String }"),
        ("src/web.rs", include_str!("fixtures/shop/web.rs")),
        ("src/kafka/mod.rs", include_str!("fixtures/shop/kafka/mod.rs")),
        ("src/kafka/orders.rs", include_str!("fixtures/shop/kafka/orders.rs")),
        ("src/kafka/payments.rs", include_str!("fixtures/shop/kafka/payments.rs")),
        // Unparseable files are skipped, the classes they declare are never found
        ("src/kafka/broken.rs", "#[component] pub struct Broken {"),
    ])
}

fn canonical(path: &str) -> TypeInfo {
    TypeInfo::parse(path).expect("Invalid type path")
}

fn shop_docket(project: &TempDir) -> Docket {
    Docket::new(project.path().join("src"))
        .base_package("crate::kafka")
        .info("Shop", "0.3.0", None)
}

#[test]
fn test_endpoint_discovery_end_to_end() {
    init_logger();
    let project = create_shop_project();
    let docket = shop_docket(&project).component("kafka::broken::Broken");

    let classpath = ClassPath::load(&docket.source_root).expect("Failed to load class path");
    let service = KafkaEndpointsService::new(&docket, &classpath, &AnnotatedListenersScanner)
        .expect("Failed to scan endpoints");

    let expected: HashSet<KafkaEndpoint> = [
        KafkaEndpoint::consumer("orders", canonical("crate::events::OrderCreated")),
        KafkaEndpoint::producer("invoices", canonical("crate::events::Invoice")),
        KafkaEndpoint::consumer("payments", canonical("crate::events::PaymentCompleted")),
        KafkaEndpoint::consumer("payments", canonical("crate::events::PaymentFailed")),
    ]
    .into_iter()
    .collect();
    assert_eq!(service.endpoints(), &expected);
}

#[test]
fn test_models_end_to_end() {
    init_logger();
    let project = create_shop_project();
    let classpath = ClassPath::load(&project.path().join("src")).expect("Failed to load class path");
    let mut models = ModelsService::new(TypeResolver::new(&classpath));

    assert_eq!(models.register("events::OrderCreated").unwrap(), "OrderCreated");
    assert_eq!(models.register("crate::events::PaymentCompleted").unwrap(), "Payment");

    let names: Vec<&String> = models.get_definitions().keys().collect();
    assert_eq!(names, vec!["Customer", "OrderCreated", "OrderLine", "Payment"]);

    assert_eq!(
        models.get_example("OrderCreated").unwrap(),
        &json!({
            "order_id": "",
            "customer": {"customerId": 0, "displayName": "", "vip": false},
            "lines": [{"sku": "", "quantity": 0, "unit_price": 0.0}],
            "status": "PLACED",
            "placed_at": ""
        })
    );

    let definitions = serde_json::to_value(models.get_definitions()).unwrap();
    assert_eq!(
        definitions["OrderCreated"]["properties"]["status"],
        json!({"type": "string", "enum": ["PLACED", "IN_PROGRESS", "SHIPPED_OUT"]})
    );
    assert_eq!(
        definitions["OrderCreated"]["properties"]["lines"],
        json!({"type": "array", "items": {"$ref": "#/definitions/OrderLine"}})
    );
    assert_eq!(
        definitions["OrderCreated"]["properties"]["order_id"],
        json!({"type": "string", "format": "uuid"})
    );
}

#[test]
fn test_generate_end_to_end() {
    init_logger();
    let project = create_shop_project();

    let doc = generate(&shop_docket(&project)).expect("Failed to generate document");

    let endpoints: Vec<(&str, EndpointType, &str)> = doc
        .endpoints
        .iter()
        .map(|e| (e.topic.as_str(), e.endpoint_type, e.payload.as_str()))
        .collect();
    assert_eq!(
        endpoints,
        vec![
            ("invoices", EndpointType::Producer, "Invoice"),
            ("orders", EndpointType::Consumer, "OrderCreated"),
            ("payments", EndpointType::Consumer, "Payment"),
            ("payments", EndpointType::Consumer, "PaymentFailed"),
        ]
    );

    let names: Vec<&String> = doc.definitions.keys().collect();
    assert_eq!(
        names,
        vec!["Customer", "Invoice", "OrderCreated", "OrderLine", "Payment", "PaymentFailed"]
    );
    assert_eq!(doc.info.title, "Shop");

    let json = serialize_json(&doc).expect("Failed to serialize to JSON");
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["endpoints"][2]["example"], json!({"payment_id": "", "amount": 0, "currency": ""}));
    assert_eq!(parsed["endpoints"][2]["schema"]["$ref"], "#/definitions/Payment");

    let yaml = serialize_yaml(&doc).expect("Failed to serialize to YAML");
    assert!(yaml.contains("topic: invoices"));
    assert!(yaml.contains("type: PRODUCER"));
}

#[test]
fn test_generate_from_yaml_docket() {
    init_logger();
    let project = create_shop_project();
    let config = format!(
        "base_package: kafka::payments\nsource_root: {}\ntitle: Payments\n",
        project.path().join("src").display()
    );

    let docket = Docket::from_yaml_str(&config).expect("Failed to parse docket");
    let doc = generate(&docket).expect("Failed to generate document");

    assert_eq!(doc.info.title, "Payments");
    assert_eq!(doc.endpoints.len(), 2);
    assert!(doc.endpoints.iter().all(|e| e.topic == "payments"));
}

#[test]
fn test_package_without_components() {
    init_logger();
    let project = create_shop_project();
    let docket = shop_docket(&project).base_package("events");

    let doc = generate(&docket).expect("Failed to generate document");

    assert!(doc.endpoints.is_empty());
    assert!(doc.definitions.is_empty());
}

#[test]
fn test_schema_name_collision_aborts_generation() {
    init_logger();
    let project = create_test_project(vec![
        (
            "src/kafka.rs",
            r#"
            #[component]
            pub struct Listener;

            impl Listener {
                #[kafka_listener(topics = "a")]
                fn on_a(&self, event: crate::v1::Event) {}

                #[kafka_listener(topics = "b")]
                fn on_b(&self, event: crate::v2::Event) {}
            }
        "#,
        ),
        ("src/v1.rs", "pub struct Event { pub id: u32 }"),
        ("src/v2.rs", "pub struct Event { pub id: String }"),
    ]);
    let docket = Docket::new(project.path().join("src")).base_package("kafka");

    let result = generate(&docket);

    assert!(matches!(
        result,
        Err(Error::SchemaNameCollision { ref name, .. }) if name == "Event"
    ));
}

#[test]
fn test_sibling_payloads_with_one_name_collide() {
    init_logger();
    let project = create_test_project(vec![
        ("src/kafka/mod.rs", "pub mod eu;\npub mod us;"),
        (
            "src/kafka/eu.rs",
            r#"
            pub struct Order { pub vat: f64 }

            #[component]
            pub struct Listener;

            impl Listener {
                #[kafka_listener(topics = "orders-eu")]
                fn on_order(&self, order: Order) {}
            }
        "#,
        ),
        (
            "src/kafka/us.rs",
            r#"
            pub struct Order { pub sales_tax: f64 }

            #[component]
            pub struct Listener;

            impl Listener {
                #[kafka_listener(topics = "orders-us")]
                fn on_order(&self, order: Order) {}
            }
        "#,
        ),
    ]);
    let docket = Docket::new(project.path().join("src")).base_package("kafka");

    let result = generate(&docket);

    match result {
        Err(Error::SchemaNameCollision { name, existing, conflicting }) => {
            assert_eq!(name, "Order");
            assert_eq!(existing, "kafka::eu::Order");
            assert_eq!(conflicting, "kafka::us::Order");
        }
        other => panic!("Expected a collision, got {:?}", other.map(|doc| doc.endpoints.len())),
    }
}
