//! Model registry: converts payload types into named schema definitions and examples.
//!
//! Registration walks a struct's declared fields depth-first. A schema name is
//! reserved for the struct's qualified path *before* its fields are visited, so
//! self-referential and mutually-referential types terminate: a revisit finds the
//! reservation and returns the name immediately. Examples are built in the same
//! pass; a field whose target is still under construction has no example yet and
//! is left out of the example object.

use crate::error::{Error, Result};
use crate::type_resolver::{PrimitiveType, ResolvedType, StructDef, TypeInfo, TypeKind, TypeResolver};
use log::{debug, warn};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Prefix of schema references, Swagger 2.0 style
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Schema of a single property or payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Primitive(PrimitiveType),
    /// Reference to a named model
    Reference(String),
    Array(Box<Property>),
    /// A string restricted to the serialized values of an enum
    Enum(Vec<String>),
    /// An object with arbitrary keys and values of the given schema
    Map(Box<Property>),
    /// An object of unknown shape
    Object,
}

impl Property {
    pub fn enum_values(&self) -> Option<&[String]> {
        match self {
            Property::Enum(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Name of the referenced model, if this is a reference
    pub fn reference(&self) -> Option<&str> {
        match self {
            Property::Reference(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl Serialize for Property {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Property::Primitive(primitive) => {
                let (schema_type, format) = primitive_schema(*primitive);
                map.serialize_entry("type", schema_type)?;
                if let Some(format) = format {
                    map.serialize_entry("format", format)?;
                }
            }
            Property::Reference(name) => {
                map.serialize_entry("$ref", &format!("{}{}", DEFINITIONS_PREFIX, name))?;
            }
            Property::Array(items) => {
                map.serialize_entry("type", "array")?;
                map.serialize_entry("items", items)?;
            }
            Property::Enum(values) => {
                map.serialize_entry("type", "string")?;
                map.serialize_entry("enum", values)?;
            }
            Property::Map(values) => {
                map.serialize_entry("type", "object")?;
                map.serialize_entry("additionalProperties", values)?;
            }
            Property::Object => {
                map.serialize_entry("type", "object")?;
            }
        }
        map.end()
    }
}

/// Properties of a model in field declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(String, Property)>);

impl Properties {
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, p)| p)
    }

    /// Inserts a property, replacing an existing one of the same name in place.
    pub fn insert(&mut self, name: String, property: Property) {
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = property,
            None => self.0.push((name, property)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.0.iter().map(|(key, p)| (key.as_str(), p))
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, property) in &self.0 {
            map.serialize_entry(name, property)?;
        }
        map.end()
    }
}

/// A named schema definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub properties: Properties,
}

impl Model {
    pub fn new(name: String, properties: Properties) -> Self {
        Self {
            name,
            model_type: "object".to_string(),
            properties,
        }
    }
}

/// Registry of models built from payload types.
pub struct ModelsService {
    type_resolver: TypeResolver,
    definitions: BTreeMap<String, Model>,
    examples: HashMap<String, Value>,
    /// Schema name to the qualified path of the type owning it
    identities: HashMap<String, String>,
    /// Newtypes being unwrapped, to stop on `struct A(Box<A>)`
    unwrapping: HashSet<String>,
    /// Names reserved by the registration in progress
    reserved: Vec<String>,
}

impl ModelsService {
    pub fn new(type_resolver: TypeResolver) -> Self {
        debug!("Initializing ModelsService");
        Self {
            type_resolver,
            definitions: BTreeMap::new(),
            examples: HashMap::new(),
            identities: HashMap::new(),
            unwrapping: HashSet::new(),
            reserved: Vec::new(),
        }
    }

    /// Registers the struct at `class` (a type path such as `events::OrderCreated`)
    /// and returns its schema name.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotAModel`] if the path does not resolve to a struct with
    /// named fields, and with [`Error::SchemaNameCollision`] if its schema name is
    /// already taken by a different type.
    pub fn register(&mut self, class: &str) -> Result<String> {
        let type_info = TypeInfo::parse(class).ok_or_else(|| Error::NotAModel(class.to_string()))?;
        self.register_type(&type_info, "")
    }

    /// Registers a struct type written inside `context_module`.
    ///
    /// A failed registration leaves the registry as it was: every model it added,
    /// including models of fields that were complete, is removed again.
    pub fn register_type(&mut self, type_info: &TypeInfo, context_module: &str) -> Result<String> {
        self.atomically(|models| {
            let resolved = models
                .type_resolver
                .resolve_type(type_info, context_module)?
                .ok_or_else(|| Error::NotAModel(type_info.to_string()))?;

            match &resolved.kind {
                TypeKind::Struct(def) if def.newtype.is_none() => models.register_struct(&resolved, def),
                _ => Err(Error::NotAModel(type_info.to_string())),
            }
        })
    }

    /// Describes any type: structs are registered and referenced, everything else is inlined.
    ///
    /// Returns the property schema and an example value, if one is known. Like
    /// [`ModelsService::register_type`], a failure registers nothing.
    pub fn schema_for(&mut self, type_info: &TypeInfo) -> Result<(Property, Option<Value>)> {
        self.atomically(|models| models.describe(type_info, "", &[]))
    }

    /// The example built for a registered model
    pub fn get_example(&self, name: &str) -> Option<&Value> {
        self.examples.get(name)
    }

    /// All registered models keyed by schema name
    pub fn get_definitions(&self) -> &BTreeMap<String, Model> {
        &self.definitions
    }

    fn atomically<T>(&mut self, register: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.reserved.clear();
        let result = register(self);

        if result.is_err() {
            for name in self.reserved.drain(..) {
                debug!("Rolling back model {}", name);
                self.identities.remove(&name);
                self.definitions.remove(&name);
                self.examples.remove(&name);
            }
            self.unwrapping.clear();
        }
        result
    }

    fn register_struct(&mut self, resolved: &ResolvedType, def: &StructDef) -> Result<String> {
        let name = def.model_name.clone().unwrap_or_else(|| resolved.name.clone());

        match self.identities.get(&name) {
            Some(existing) if *existing == resolved.qualified_name => {
                debug!("Model {} already registered", name);
                return Ok(name);
            }
            Some(existing) => {
                return Err(Error::SchemaNameCollision {
                    name,
                    existing: existing.clone(),
                    conflicting: resolved.qualified_name.clone(),
                })
            }
            None => {}
        }

        debug!("Registering model {} for {}", name, resolved.qualified_name);
        self.identities.insert(name.clone(), resolved.qualified_name.clone());
        self.reserved.push(name.clone());

        let (properties, example) = self.build_model(resolved, def)?;
        self.definitions.insert(name.clone(), Model::new(name.clone(), properties));
        self.examples.insert(name.clone(), Value::Object(example));
        Ok(name)
    }

    fn build_model(&mut self, resolved: &ResolvedType, def: &StructDef) -> Result<(Properties, Map<String, Value>)> {
        let mut properties = Properties::default();
        let mut example = Map::new();

        for field in &def.fields {
            if field.serde_attrs.skip {
                debug!("Skipping excluded field {}.{}", resolved.name, field.name);
                continue;
            }

            if field.serde_attrs.flatten
                && self.flatten_into(&field.type_info, resolved, &mut properties, &mut example)?
            {
                continue;
            }

            let (property, value) = self.describe(&field.type_info, &resolved.module_path, &def.generics)?;
            if let Some(value) = value {
                example.insert(field.serialized_name.clone(), value);
            }
            properties.insert(field.serialized_name.clone(), property);
        }

        Ok((properties, example))
    }

    /// Inlines the properties of a `#[serde(flatten)]` struct field.
    ///
    /// Returns false when the field is not a struct, leaving it to be described normally.
    fn flatten_into(
        &mut self,
        type_info: &TypeInfo,
        owner: &ResolvedType,
        properties: &mut Properties,
        example: &mut Map<String, Value>,
    ) -> Result<bool> {
        let inner = if type_info.is_option {
            type_info.generic_args.first().unwrap_or(type_info)
        } else {
            type_info
        };

        let Some(resolved) = self.type_resolver.resolve_type(inner, &owner.module_path)? else {
            return Ok(false);
        };
        let TypeKind::Struct(def) = &resolved.kind else {
            return Ok(false);
        };
        if def.newtype.is_some() {
            return Ok(false);
        }

        let name = self.register_struct(&resolved, def)?;
        match (self.definitions.get(&name), self.examples.get(&name)) {
            (Some(model), Some(Value::Object(values))) => {
                for (key, property) in model.properties.iter() {
                    properties.insert(key.to_string(), property.clone());
                }
                for (key, value) in values {
                    example.insert(key.clone(), value.clone());
                }
            }
            _ => warn!("Cannot flatten {} into {}: it is still being registered", name, owner.name),
        }

        Ok(true)
    }

    fn describe(
        &mut self,
        type_info: &TypeInfo,
        context_module: &str,
        generics: &[String],
    ) -> Result<(Property, Option<Value>)> {
        if type_info.is_option {
            if let Some(inner) = type_info.generic_args.first() {
                return self.describe(inner, context_module, generics);
            }
        }

        if type_info.is_vec {
            if let Some(inner) = type_info.generic_args.first() {
                let (items, value) = self.describe(inner, context_module, generics)?;
                let example = Value::Array(value.into_iter().collect());
                return Ok((Property::Array(Box::new(items)), Some(example)));
            }
        }

        if type_info.is_map {
            if let Some(inner) = type_info.generic_args.get(1) {
                let (values, _) = self.describe(inner, context_module, generics)?;
                return Ok((Property::Map(Box::new(values)), Some(json!({}))));
            }
        }

        if type_info.qualifier.is_none() && generics.contains(&type_info.name) {
            return Ok((Property::Object, Some(json!({}))));
        }

        let Some(resolved) = self.type_resolver.resolve_type(type_info, context_module)? else {
            debug!("Unknown type: {}, using object placeholder", type_info);
            return Ok((Property::Object, Some(json!({}))));
        };

        match &resolved.kind {
            TypeKind::Primitive(primitive) => Ok((Property::Primitive(*primitive), Some(default_example(*primitive)))),
            TypeKind::Enum(def) => {
                let values = def.values();
                let example = values.first().cloned().map(Value::String);
                Ok((Property::Enum(values), example))
            }
            TypeKind::Struct(def) => match &def.newtype {
                Some(inner) => {
                    if !self.unwrapping.insert(resolved.qualified_name.clone()) {
                        return Ok((Property::Object, Some(json!({}))));
                    }
                    let described = self.describe(inner, &resolved.module_path, &def.generics);
                    self.unwrapping.remove(&resolved.qualified_name);
                    described
                }
                None => {
                    let name = self.register_struct(&resolved, def)?;
                    let example = self.examples.get(&name).cloned();
                    Ok((Property::Reference(name), example))
                }
            },
        }
    }
}

/// OpenAPI type and format of a primitive
pub fn primitive_schema(primitive: PrimitiveType) -> (&'static str, Option<&'static str>) {
    match primitive {
        PrimitiveType::String | PrimitiveType::Char => ("string", None),
        PrimitiveType::I8 | PrimitiveType::I16 | PrimitiveType::I32 => ("integer", Some("int32")),
        PrimitiveType::I64 | PrimitiveType::I128 => ("integer", Some("int64")),
        PrimitiveType::U8 | PrimitiveType::U16 | PrimitiveType::U32 => ("integer", Some("int32")),
        PrimitiveType::U64 | PrimitiveType::U128 => ("integer", Some("int64")),
        PrimitiveType::F32 => ("number", Some("float")),
        PrimitiveType::F64 => ("number", Some("double")),
        PrimitiveType::Bool => ("boolean", None),
        PrimitiveType::Uuid => ("string", Some("uuid")),
        PrimitiveType::DateTime => ("string", Some("date-time")),
        PrimitiveType::Date => ("string", Some("date")),
    }
}

/// Representative value of a primitive for examples
pub fn default_example(primitive: PrimitiveType) -> Value {
    match primitive {
        PrimitiveType::Bool => json!(false),
        PrimitiveType::F32 | PrimitiveType::F64 => json!(0.0),
        PrimitiveType::String
        | PrimitiveType::Char
        | PrimitiveType::Uuid
        | PrimitiveType::DateTime
        | PrimitiveType::Date => json!(""),
        _ => json!(0),
    }
}
