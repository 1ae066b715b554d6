//! Attribute driven listener extraction.
//!
//! Recognized declarations, all matched by the last segment of the attribute path:
//!
//! - `#[kafka_listener(topics = ["a", "b"])]` (or `topics = "a"`, `topic = "a"`) on a
//!   method: the method consumes from each topic.
//! - `#[kafka_listener(topics = ...)]` on the struct: every `#[kafka_handler]` method
//!   consumes from each topic.
//! - `#[kafka_producer(topic = "a")]` on a method: the method publishes to the topic.
//!
//! The payload is `payload = "Type"` when given, else the parameter marked `#[payload]`,
//! else the first parameter after the receiver. Record wrappers such as
//! `ConsumerRecord<K, V>` are unwrapped to the value type.

use super::{EndpointType, KafkaEndpoint, KafkaListenersScanner};
use crate::attributes::{attr_named, find_attr, parse_string_list, skip_meta_value};
use crate::classpath::ComponentClass;
use crate::type_resolver::TypeInfo;
use log::{debug, warn};
use syn::{Attribute, FnArg, ImplItemFn, LitStr};

const LISTENER_ATTR: &str = "kafka_listener";
const HANDLER_ATTR: &str = "kafka_handler";
const PRODUCER_ATTR: &str = "kafka_producer";
const PAYLOAD_ATTR: &str = "payload";

/// Wrappers whose last type argument is the message value
const RECORD_WRAPPERS: &[&str] = &["ConsumerRecord", "ProducerRecord", "Message", "Record"];

/// Default scanner for the `kafka_listener` / `kafka_handler` / `kafka_producer` attributes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnnotatedListenersScanner;

/// Arguments of a listener or producer attribute
#[derive(Debug, Default)]
struct ListenerArgs {
    topics: Vec<String>,
    payload: Option<TypeInfo>,
}

impl KafkaListenersScanner for AnnotatedListenersScanner {
    fn kafka_endpoints_from_class(&self, class: &ComponentClass<'_>) -> Vec<KafkaEndpoint> {
        let mut endpoints = Vec::new();

        let class_listener = find_attr(&class.definition.attrs, LISTENER_ATTR)
            .and_then(|attr| parse_listener_args(attr, &class.name));

        for method in &class.methods {
            for attr in &method.attrs {
                let endpoint_type = if attr_named(attr, LISTENER_ATTR) {
                    EndpointType::Consumer
                } else if attr_named(attr, PRODUCER_ATTR) {
                    EndpointType::Producer
                } else if attr_named(attr, HANDLER_ATTR) {
                    match &class_listener {
                        Some(args) => {
                            add_endpoints(&mut endpoints, class, method, args, EndpointType::Consumer);
                        }
                        None => warn!(
                            "Handler {}::{} has no class level kafka_listener, skipping",
                            class.name, method.sig.ident
                        ),
                    }
                    continue;
                } else {
                    continue;
                };

                if let Some(args) = parse_listener_args(attr, &class.name) {
                    add_endpoints(&mut endpoints, class, method, &args, endpoint_type);
                }
            }
        }

        endpoints
    }
}

fn add_endpoints(
    endpoints: &mut Vec<KafkaEndpoint>,
    class: &ComponentClass<'_>,
    method: &ImplItemFn,
    args: &ListenerArgs,
    endpoint_type: EndpointType,
) {
    let payload = match args.payload.clone().or_else(|| payload_from_signature(method)) {
        Some(payload) => payload,
        None => {
            warn!(
                "Listener {}::{} has no payload, skipping",
                class.name, method.sig.ident
            );
            return;
        }
    };

    if args.topics.is_empty() {
        warn!("Listener {}::{} declares no topics", class.name, method.sig.ident);
    }

    for topic in &args.topics {
        let endpoint = KafkaEndpoint::new(topic.clone(), endpoint_type, payload.clone());
        debug!("Found endpoint {} in {}::{}", endpoint, class.name, method.sig.ident);
        endpoints.push(endpoint);
    }
}

fn parse_listener_args(attr: &Attribute, owner: &str) -> Option<ListenerArgs> {
    let mut args = ListenerArgs::default();

    // A bare `#[kafka_listener]` carries no arguments
    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Some(args);
    }

    let result = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("topics") || meta.path.is_ident("topic") {
            args.topics.extend(parse_string_list(&meta)?);
        } else if meta.path.is_ident("payload") {
            let lit: LitStr = meta.value()?.parse()?;
            let type_info = TypeInfo::parse(&lit.value())
                .ok_or_else(|| meta.error(format!("invalid payload type: {}", lit.value())))?;
            args.payload = Some(type_info);
        } else {
            skip_meta_value(&meta)?;
        }
        Ok(())
    });

    match result {
        Ok(()) => Some(args),
        Err(e) => {
            warn!("Ignoring malformed Kafka attribute on {}: {}", owner, e);
            None
        }
    }
}

/// The payload parameter of a listener method.
fn payload_from_signature(method: &ImplItemFn) -> Option<TypeInfo> {
    let typed: Vec<&syn::PatType> = method
        .sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(pat_type) => Some(pat_type),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let param = typed
        .iter()
        .find(|pat_type| find_attr(&pat_type.attrs, PAYLOAD_ATTR).is_some())
        .or_else(|| typed.first())?;

    Some(unwrap_record(TypeInfo::from_type(&param.ty)))
}

fn unwrap_record(type_info: TypeInfo) -> TypeInfo {
    if RECORD_WRAPPERS.contains(&type_info.name.as_str()) && !type_info.is_option {
        if let Some(value) = type_info.generic_args.last() {
            return unwrap_record(value.clone());
        }
    }
    type_info
}
