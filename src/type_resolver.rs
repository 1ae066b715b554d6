use crate::attributes::{find_attr, skip_meta_value};
use crate::classpath::{normalize_path, qualify, resolve_path, ClassPath};
use crate::error::{Error, Result};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use syn::{Attribute, GenericArgument, Item, LitStr, PathArguments, Token, UseTree};

/// Type information extracted from Rust code for schema generation.
///
/// This structure captures the essential information about a Rust type needed to
/// generate a schema, including generic arguments and wrapper types. Smart pointers
/// and references are transparent; every sequence-like collection is a `Vec`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// The base type name (e.g., "String", "OrderCreated", "i32")
    pub name: String,
    /// Module path written in front of the name, if any (e.g. "crate::events")
    pub qualifier: Option<String>,
    /// Generic type arguments (e.g., for `Vec<String>`, contains TypeInfo for String)
    pub generic_args: Vec<TypeInfo>,
    /// Whether this type is wrapped in `Option<T>`
    pub is_option: bool,
    /// Whether this type is a sequence of its single generic argument
    pub is_vec: bool,
    /// Whether this type is a map from its first to its second generic argument
    pub is_map: bool,
}

impl TypeInfo {
    /// Create a new TypeInfo for a simple type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualifier: None,
            generic_args: Vec::new(),
            is_option: false,
            is_vec: false,
            is_map: false,
        }
    }

    /// Create a TypeInfo for an `Option<T>` type
    pub fn option(inner: TypeInfo) -> Self {
        Self {
            name: inner.name.clone(),
            is_option: true,
            generic_args: vec![inner],
            ..Self::new("")
        }
    }

    /// Create a TypeInfo for a `Vec<T>` type
    pub fn vec(inner: TypeInfo) -> Self {
        Self {
            name: inner.name.clone(),
            is_vec: true,
            generic_args: vec![inner],
            ..Self::new("")
        }
    }

    /// Create a TypeInfo for a map type
    pub fn map(key: TypeInfo, value: TypeInfo) -> Self {
        Self {
            name: value.name.clone(),
            is_map: true,
            generic_args: vec![key, value],
            ..Self::new("")
        }
    }

    /// Parses a type as written in source, e.g. `crate::events::OrderCreated`.
    pub fn parse(source: &str) -> Option<Self> {
        syn::parse_str::<syn::Type>(source)
            .ok()
            .map(|ty| Self::from_type(&ty))
    }

    /// Extract TypeInfo from a syn::Type
    pub fn from_type(ty: &syn::Type) -> Self {
        match ty {
            syn::Type::Path(type_path) => Self::from_path(&type_path.path),
            syn::Type::Reference(reference) => Self::from_type(&reference.elem),
            syn::Type::Paren(paren) => Self::from_type(&paren.elem),
            syn::Type::Group(group) => Self::from_type(&group.elem),
            syn::Type::Slice(slice) => Self::vec(Self::from_type(&slice.elem)),
            syn::Type::Array(array) => Self::vec(Self::from_type(&array.elem)),
            _ => Self::new("Unknown"),
        }
    }

    fn from_path(path: &syn::Path) -> Self {
        let Some(segment) = path.segments.last() else {
            return Self::new("Unknown");
        };
        let type_name = segment.ident.to_string();

        let generic_args: Vec<TypeInfo> = match &segment.arguments {
            PathArguments::AngleBracketed(args) => args
                .args
                .iter()
                .filter_map(|arg| match arg {
                    GenericArgument::Type(inner_ty) => Some(Self::from_type(inner_ty)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        match (type_name.as_str(), generic_args.as_slice()) {
            ("Option", [inner]) => return Self::option(inner.clone()),
            ("Box" | "Rc" | "Arc" | "Cow" | "RefCell" | "Cell" | "Mutex" | "RwLock", [inner]) => {
                return inner.clone()
            }
            (
                "Vec" | "VecDeque" | "LinkedList" | "HashSet" | "BTreeSet" | "BinaryHeap" | "IndexSet",
                [inner],
            ) => return Self::vec(inner.clone()),
            ("HashMap" | "BTreeMap" | "IndexMap", [key, value]) => {
                return Self::map(key.clone(), value.clone())
            }
            _ => {}
        }

        let qualifier = if path.segments.len() > 1 {
            let prefix: Vec<String> = path
                .segments
                .iter()
                .take(path.segments.len() - 1)
                .map(|s| s.ident.to_string())
                .collect();
            Some(prefix.join("::"))
        } else {
            None
        };

        Self {
            name: type_name,
            qualifier,
            generic_args,
            ..Self::new("")
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            for (i, arg) in self.generic_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            Ok(())
        };

        if self.is_option {
            write!(f, "Option<")?;
        } else if self.is_vec {
            write!(f, "Vec<")?;
        } else if self.is_map {
            write!(f, "Map<")?;
        } else {
            if let Some(qualifier) = &self.qualifier {
                write!(f, "{}::", qualifier)?;
            }
            write!(f, "{}", self.name)?;
            if self.generic_args.is_empty() {
                return Ok(());
            }
            write!(f, "<")?;
        }
        args(f)?;
        write!(f, ">")
    }
}

/// Type resolver - indexes the struct and enum definitions of a class path
/// together with the `use` declarations of every module
pub struct TypeResolver {
    /// Definitions indexed by simple name, in class path order
    types: HashMap<String, Vec<ResolvedType>>,
    /// `use` declarations by the module they appear in
    imports: HashMap<String, Vec<Import>>,
}

/// A single name brought into scope by a `use` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Import {
    /// `use a::b::C;` or `use a::b::D as C;`, path as written
    Named { alias: String, path: String },
    /// `use a::b::*;`, module path as written
    Glob(String),
}

/// Resolved type information
#[derive(Debug, Clone)]
pub struct ResolvedType {
    /// The type name
    pub name: String,
    /// Module-qualified path, the identity of the type
    pub qualified_name: String,
    /// Module the type is declared in
    pub module_path: String,
    /// The kind of type (struct, enum, primitive)
    pub kind: TypeKind,
}

/// Type kind - represents different categories of types
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// A struct type with fields
    Struct(StructDef),
    /// An enum type with variants
    Enum(EnumDef),
    /// A primitive type (String, i32, etc.)
    Primitive(PrimitiveType),
}

/// Struct definition with fields
#[derive(Debug, Clone, Default)]
pub struct StructDef {
    /// The named fields of the struct, in declaration order
    pub fields: Vec<FieldDef>,
    /// Names of the struct's type parameters
    pub generics: Vec<String>,
    /// Schema name given with `#[api_model("...")]`
    pub model_name: Option<String>,
    /// Inner type of a single-field tuple struct, which serializes as that type
    pub newtype: Option<TypeInfo>,
}

/// Field definition in a struct
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name as declared
    pub name: String,
    /// Field name after serde renaming
    pub serialized_name: String,
    /// Type information for the field
    pub type_info: TypeInfo,
    /// Serde attributes applied to this field
    pub serde_attrs: SerdeAttributes,
}

/// Enum definition with variants
#[derive(Debug, Clone)]
pub struct EnumDef {
    /// The serialized variants of the enum, in declaration order
    pub variants: Vec<VariantDef>,
}

#[derive(Debug, Clone)]
pub struct VariantDef {
    pub name: String,
    /// Value the variant serializes to
    pub serialized_name: String,
}

impl EnumDef {
    /// Serialized values of all variants
    pub fn values(&self) -> Vec<String> {
        self.variants
            .iter()
            .map(|v| v.serialized_name.clone())
            .collect()
    }
}

/// Primitive types supported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    F32,
    F64,
    Bool,
    Char,
    Uuid,
    DateTime,
    Date,
}

/// Serde attributes for a field, variant or container
#[derive(Debug, Clone, Default)]
pub struct SerdeAttributes {
    /// Renamed field name
    pub rename: Option<String>,
    /// Renaming rule applied to all fields or variants of a container
    pub rename_all: Option<RenameRule>,
    /// Whether to skip this field during serialization
    pub skip: bool,
    /// Whether to flatten this field
    pub flatten: bool,
}

/// The case conventions accepted by `#[serde(rename_all = "...")]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    LowerCase,
    UpperCase,
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
    ScreamingKebabCase,
}

impl FromStr for RenameRule {
    type Err = String;

    fn from_str(rule: &str) -> std::result::Result<Self, Self::Err> {
        match rule {
            "lowercase" => Ok(Self::LowerCase),
            "UPPERCASE" => Ok(Self::UpperCase),
            "PascalCase" => Ok(Self::PascalCase),
            "camelCase" => Ok(Self::CamelCase),
            "snake_case" => Ok(Self::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnakeCase),
            "kebab-case" => Ok(Self::KebabCase),
            "SCREAMING-KEBAB-CASE" => Ok(Self::ScreamingKebabCase),
            _ => Err(format!("unknown rename rule: {}", rule)),
        }
    }
}

impl RenameRule {
    /// Applies the rule to a `PascalCase` variant name.
    pub fn apply_to_variant(self, variant: &str) -> String {
        match self {
            Self::PascalCase => variant.to_string(),
            Self::LowerCase => variant.to_ascii_lowercase(),
            Self::UpperCase => variant.to_ascii_uppercase(),
            Self::CamelCase => {
                let mut chars = variant.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            }
            Self::SnakeCase => {
                let mut snake = String::new();
                for (i, ch) in variant.char_indices() {
                    if i > 0 && ch.is_uppercase() {
                        snake.push('_');
                    }
                    snake.push(ch.to_ascii_lowercase());
                }
                snake
            }
            Self::ScreamingSnakeCase => Self::SnakeCase.apply_to_variant(variant).to_ascii_uppercase(),
            Self::KebabCase => Self::SnakeCase.apply_to_variant(variant).replace('_', "-"),
            Self::ScreamingKebabCase => Self::ScreamingSnakeCase
                .apply_to_variant(variant)
                .replace('_', "-"),
        }
    }

    /// Applies the rule to a `snake_case` field name.
    pub fn apply_to_field(self, field: &str) -> String {
        match self {
            Self::LowerCase | Self::SnakeCase => field.to_string(),
            Self::UpperCase | Self::ScreamingSnakeCase => field.to_ascii_uppercase(),
            Self::PascalCase => {
                let mut pascal = String::new();
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            Self::CamelCase => {
                let pascal = Self::PascalCase.apply_to_field(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            }
            Self::KebabCase => field.replace('_', "-"),
            Self::ScreamingKebabCase => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

impl TypeResolver {
    /// Index every struct and enum definition and every `use` declaration on the class path
    pub fn new(classpath: &ClassPath) -> Self {
        let mut types: HashMap<String, Vec<ResolvedType>> = HashMap::new();
        let mut imports: HashMap<String, Vec<Import>> = HashMap::new();

        for scoped in classpath.items() {
            let resolved = match &scoped.item {
                Item::Struct(item_struct) => Self::parse_struct_definition(item_struct, &scoped.module_path),
                Item::Enum(item_enum) => Self::parse_enum_definition(item_enum, &scoped.module_path),
                Item::Use(item_use) => {
                    let module_imports = imports.entry(scoped.module_path.clone()).or_default();
                    Self::flatten_use_tree(&item_use.tree, &mut Vec::new(), module_imports);
                    continue;
                }
                _ => continue,
            };
            types.entry(resolved.name.clone()).or_default().push(resolved);
        }

        debug!(
            "Initialized TypeResolver with {} type names and imports in {} modules",
            types.len(),
            imports.len()
        );
        Self { types, imports }
    }

    fn flatten_use_tree(tree: &UseTree, prefix: &mut Vec<String>, out: &mut Vec<Import>) {
        match tree {
            UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                Self::flatten_use_tree(&path.tree, prefix, out);
                prefix.pop();
            }
            UseTree::Name(name) if name.ident == "self" => {
                if let Some(last) = prefix.last() {
                    out.push(Import::Named {
                        alias: last.clone(),
                        path: prefix.join("::"),
                    });
                }
            }
            UseTree::Name(name) => out.push(Import::Named {
                alias: name.ident.to_string(),
                path: qualify(&prefix.join("::"), &name.ident.to_string()),
            }),
            UseTree::Rename(rename) if rename.rename != "_" => out.push(Import::Named {
                alias: rename.rename.to_string(),
                path: qualify(&prefix.join("::"), &rename.ident.to_string()),
            }),
            UseTree::Rename(_) => {}
            UseTree::Glob(_) => out.push(Import::Glob(prefix.join("::"))),
            UseTree::Group(group) => {
                for item in &group.items {
                    Self::flatten_use_tree(item, prefix, out);
                }
            }
        }
    }

    fn find_definitions(&self, name: &str) -> &[ResolvedType] {
        self.types.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    fn imports_of(&self, module: &str) -> &[Import] {
        self.imports.get(module).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Path a named import binds `alias` to inside `module`
    fn imported_path(&self, module: &str, alias: &str) -> Option<&str> {
        self.imports_of(module).iter().find_map(|import| match import {
            Import::Named { alias: a, path } if a == alias => Some(path.as_str()),
            _ => None,
        })
    }

    /// Resolve a type as written inside `context_module`.
    ///
    /// Primitives win over user types of the same name. An unqualified name is looked up
    /// the way the compiler would: a definition in the context module, then the module's
    /// named imports, then its glob imports. A name that is neither defined locally nor
    /// imported resolves only when a single definition carries it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousType`] when an unqualified name matches several
    /// definitions and nothing in the context module decides between them.
    pub fn resolve_type(&self, type_info: &TypeInfo, context_module: &str) -> Result<Option<ResolvedType>> {
        debug!("Resolving type: {} in '{}'", type_info, context_module);

        if let Some(primitive) = Self::parse_primitive_type(&type_info.name) {
            if !matches!(primitive, PrimitiveType::Uuid | PrimitiveType::DateTime | PrimitiveType::Date) {
                return Ok(Some(Self::primitive(type_info, primitive)));
            }
        }

        let found = match &type_info.qualifier {
            Some(qualifier) => self.resolve_qualified(qualifier, &type_info.name, context_module),
            None => self.resolve_unqualified(&type_info.name, context_module)?,
        };

        if let Some(found) = found {
            return Ok(Some(found.clone()));
        }

        // Well-known external types, unless the crate defines its own
        if let Some(primitive) = Self::parse_primitive_type(&type_info.name) {
            return Ok(Some(Self::primitive(type_info, primitive)));
        }

        debug!("Could not resolve type: {}", type_info);
        Ok(None)
    }

    /// Rewrites a type so that every user-defined type in it is crate-absolute.
    ///
    /// Two spellings of the same type written in different modules canonicalize to
    /// equal values. Types that do not resolve are kept as written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousType`] as [`TypeResolver::resolve_type`] does.
    pub fn canonicalize(&self, type_info: &TypeInfo, context_module: &str) -> Result<TypeInfo> {
        let generic_args = type_info
            .generic_args
            .iter()
            .map(|arg| self.canonicalize(arg, context_module))
            .collect::<Result<Vec<_>>>()?;

        if type_info.is_option || type_info.is_vec || type_info.is_map {
            let name = generic_args.last().map(|arg| arg.name.clone()).unwrap_or_default();
            return Ok(TypeInfo {
                name,
                generic_args,
                ..type_info.clone()
            });
        }

        let mut canonical = TypeInfo {
            generic_args,
            ..type_info.clone()
        };
        match self.resolve_type(type_info, context_module)? {
            Some(ResolvedType {
                kind: TypeKind::Primitive(_),
                ..
            }) => canonical.qualifier = None,
            Some(resolved) => {
                canonical.name = resolved.name;
                canonical.qualifier = Some(qualify("crate", &resolved.module_path));
            }
            None => {}
        }
        Ok(canonical)
    }

    fn resolve_unqualified(&self, name: &str, context_module: &str) -> Result<Option<&ResolvedType>> {
        let candidates = self.find_definitions(name);

        if let Some(local) = candidates.iter().find(|c| c.module_path == context_module) {
            return Ok(Some(local));
        }

        if let Some(path) = self.imported_path(context_module, name) {
            let (qualifier, target) = path.rsplit_once("::").unwrap_or(("", path));
            let found = self.find_qualified(self.find_definitions(target), qualifier, target, context_module);
            if found.is_none() {
                debug!("{} in '{}' is imported from outside the crate: {}", name, context_module, path);
            }
            return Ok(found);
        }

        let globbed: Vec<&ResolvedType> = self
            .imports_of(context_module)
            .iter()
            .filter_map(|import| match import {
                Import::Glob(module) => Some(module),
                _ => None,
            })
            .filter_map(|module| {
                let resolved = resolve_path(context_module, module);
                let absolute = normalize_path(module);
                candidates
                    .iter()
                    .find(|c| c.module_path == resolved || c.module_path == absolute)
            })
            .collect();

        match (globbed.as_slice(), candidates) {
            ([single], _) => Ok(Some(*single)),
            ([], [single]) => Ok(Some(single)),
            ([], []) => Ok(None),
            (_, _) => Err(Error::AmbiguousType {
                name: name.to_string(),
                context: context_module.to_string(),
                candidates: candidates.iter().map(|c| c.qualified_name.clone()).collect(),
            }),
        }
    }

    fn resolve_qualified(&self, qualifier: &str, name: &str, context_module: &str) -> Option<&ResolvedType> {
        // The first segment may itself be an imported module
        let (head, rest) = qualifier.split_once("::").unwrap_or((qualifier, ""));
        let expanded = match head {
            "crate" | "self" | "super" => None,
            _ => self
                .imported_path(context_module, head)
                .map(|path| qualify(path, rest)),
        };

        self.find_qualified(
            self.find_definitions(name),
            expanded.as_deref().unwrap_or(qualifier),
            name,
            context_module,
        )
    }

    fn find_qualified<'a>(
        &self,
        candidates: &'a [ResolvedType],
        qualifier: &str,
        name: &str,
        context_module: &str,
    ) -> Option<&'a ResolvedType> {
        if qualifier.is_empty() {
            return None;
        }

        let resolved = qualify(&resolve_path(context_module, qualifier), name);
        let absolute = qualify(&normalize_path(qualifier), name);
        let suffix = format!("::{}", absolute);

        candidates
            .iter()
            .find(|c| c.qualified_name == resolved)
            .or_else(|| candidates.iter().find(|c| c.qualified_name == absolute))
            .or_else(|| candidates.iter().find(|c| c.qualified_name.ends_with(&suffix)))
    }

    fn primitive(type_info: &TypeInfo, primitive: PrimitiveType) -> ResolvedType {
        ResolvedType {
            name: type_info.name.clone(),
            qualified_name: type_info.name.clone(),
            module_path: String::new(),
            kind: TypeKind::Primitive(primitive),
        }
    }

    /// Parse a struct definition into a ResolvedType
    fn parse_struct_definition(item_struct: &syn::ItemStruct, module_path: &str) -> ResolvedType {
        let struct_name = item_struct.ident.to_string();
        debug!("Parsing struct definition: {}", struct_name);

        let container = Self::parse_serde_attributes(&item_struct.attrs);
        let generics = item_struct
            .generics
            .type_params()
            .map(|p| p.ident.to_string())
            .collect();

        let mut def = StructDef {
            generics,
            model_name: Self::parse_model_name(&item_struct.attrs),
            ..StructDef::default()
        };

        match &item_struct.fields {
            syn::Fields::Named(named_fields) => {
                def.fields = named_fields
                    .named
                    .iter()
                    .filter_map(|field| Self::parse_field(field, container.rename_all))
                    .collect();
            }
            syn::Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
                def.newtype = Some(TypeInfo::from_type(&unnamed.unnamed[0].ty));
            }
            _ => {}
        }

        ResolvedType {
            qualified_name: qualify(module_path, &struct_name),
            name: struct_name,
            module_path: module_path.to_string(),
            kind: TypeKind::Struct(def),
        }
    }

    /// Parse an enum definition into a ResolvedType
    fn parse_enum_definition(item_enum: &syn::ItemEnum, module_path: &str) -> ResolvedType {
        let enum_name = item_enum.ident.to_string();
        debug!("Parsing enum definition: {}", enum_name);

        let container = Self::parse_serde_attributes(&item_enum.attrs);
        let variants: Vec<VariantDef> = item_enum
            .variants
            .iter()
            .filter_map(|variant| {
                let attrs = Self::parse_serde_attributes(&variant.attrs);
                if attrs.skip {
                    return None;
                }
                let name = variant.ident.to_string();
                let serialized_name = attrs
                    .rename
                    .or_else(|| container.rename_all.map(|rule| rule.apply_to_variant(&name)))
                    .unwrap_or_else(|| name.clone());
                Some(VariantDef { name, serialized_name })
            })
            .collect();

        debug!("Parsed {} variants", variants.len());

        ResolvedType {
            qualified_name: qualify(module_path, &enum_name),
            name: enum_name,
            module_path: module_path.to_string(),
            kind: TypeKind::Enum(EnumDef { variants }),
        }
    }

    /// Parse a single named field
    fn parse_field(field: &syn::Field, rename_all: Option<RenameRule>) -> Option<FieldDef> {
        let field_name = field.ident.as_ref()?.to_string();
        let field_name = field_name.strip_prefix("r#").unwrap_or(&field_name).to_string();

        let type_info = TypeInfo::from_type(&field.ty);
        let serde_attrs = Self::parse_serde_attributes(&field.attrs);
        let serialized_name = serde_attrs
            .rename
            .clone()
            .or_else(|| rename_all.map(|rule| rule.apply_to_field(&field_name)))
            .unwrap_or_else(|| field_name.clone());

        Some(FieldDef {
            name: field_name,
            serialized_name,
            type_info,
            serde_attrs,
        })
    }

    /// Parse Serde attributes from a field, variant or container
    pub fn parse_serde_attributes(attrs: &[Attribute]) -> SerdeAttributes {
        let mut serde_attrs = SerdeAttributes::default();

        for attr in attrs {
            if !attr.path().is_ident("serde") {
                continue;
            }

            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if let Some(value) = Self::parse_serialize_value(&meta)? {
                        serde_attrs.rename = Some(value);
                    }
                } else if meta.path.is_ident("rename_all") {
                    if let Some(value) = Self::parse_serialize_value(&meta)? {
                        serde_attrs.rename_all = match value.parse::<RenameRule>() {
                            Ok(rule) => Some(rule),
                            Err(e) => {
                                warn!("Ignoring serde rename_all: {}", e);
                                None
                            }
                        };
                    }
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    serde_attrs.skip = true;
                } else if meta.path.is_ident("flatten") {
                    serde_attrs.flatten = true;
                } else {
                    skip_meta_value(&meta)?;
                }
                Ok(())
            });

            if let Err(e) = result {
                debug!("Ignoring unparseable serde attribute: {}", e);
            }
        }

        serde_attrs
    }

    /// Reads `key = "value"` or `key(serialize = "value", ...)`
    fn parse_serialize_value(meta: &syn::meta::ParseNestedMeta) -> syn::Result<Option<String>> {
        if meta.input.peek(Token![=]) {
            let lit: LitStr = meta.value()?.parse()?;
            return Ok(Some(lit.value()));
        }

        let mut value = None;
        meta.parse_nested_meta(|inner| {
            let lit: LitStr = inner.value()?.parse()?;
            if inner.path.is_ident("serialize") {
                value = Some(lit.value());
            }
            Ok(())
        })?;
        Ok(value)
    }

    /// Reads the schema name override: `#[api_model("Name")]` or `#[api_model(name = "Name")]`
    fn parse_model_name(attrs: &[Attribute]) -> Option<String> {
        let attr = find_attr(attrs, "api_model")?;

        if let Ok(lit) = attr.parse_args::<LitStr>() {
            return Some(lit.value());
        }

        let mut name = None;
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") || meta.path.is_ident("value") {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
            } else {
                skip_meta_value(&meta)?;
            }
            Ok(())
        });
        if let Err(e) = result {
            warn!("Ignoring unparseable api_model attribute: {}", e);
        }
        name
    }

    /// Parse a primitive type name
    pub fn parse_primitive_type(type_name: &str) -> Option<PrimitiveType> {
        match type_name {
            "String" | "str" => Some(PrimitiveType::String),
            "i8" => Some(PrimitiveType::I8),
            "i16" => Some(PrimitiveType::I16),
            "i32" => Some(PrimitiveType::I32),
            "i64" | "isize" => Some(PrimitiveType::I64),
            "i128" => Some(PrimitiveType::I128),
            "u8" => Some(PrimitiveType::U8),
            "u16" => Some(PrimitiveType::U16),
            "u32" => Some(PrimitiveType::U32),
            "u64" | "usize" => Some(PrimitiveType::U64),
            "u128" => Some(PrimitiveType::U128),
            "f32" => Some(PrimitiveType::F32),
            "f64" => Some(PrimitiveType::F64),
            "bool" => Some(PrimitiveType::Bool),
            "char" => Some(PrimitiveType::Char),
            "Uuid" => Some(PrimitiveType::Uuid),
            "DateTime" | "NaiveDateTime" | "OffsetDateTime" | "SystemTime" => Some(PrimitiveType::DateTime),
            "NaiveDate" | "Date" => Some(PrimitiveType::Date),
            _ => None,
        }
    }
}
