//! The parsed source tree of the inspected crate.
//!
//! A [`ClassPath`] plays the role a class loader plays for reflective tools: it knows
//! every item of every loadable source file together with the module it lives in,
//! can enumerate component candidates below a base package, and can resolve a
//! qualified type path to its definition and `impl` blocks.
//!
//! The item list and its lookup tables are built once, when the class path is created.

use crate::error::{Error, Result};
use crate::parser::{AstParser, ParsedFile};
use crate::scanner::FileScanner;
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use syn::visit::{self, Visit};
use syn::{Attribute, ImplItem, ImplItemFn, Item, ItemImpl, ItemMod, ItemStruct, Type};

/// Every addressable item of a crate's successfully parsed source files.
pub struct ClassPath {
    items: Vec<ScopedItem>,
    /// Every module that has a file or an inline `mod` block
    modules: BTreeSet<String>,
    /// Qualified struct path to its index in `items`
    structs: HashMap<String, usize>,
    /// Qualified self type to the indices of its `impl` blocks
    impls: HashMap<String, Vec<usize>>,
}

/// An item together with the module path it is declared in.
#[derive(Debug, Clone)]
pub struct ScopedItem {
    pub module_path: String,
    pub item: Item,
}

/// A resolved component: its struct definition and every inherent or trait method
/// implemented for it.
#[derive(Debug)]
pub struct ComponentClass<'a> {
    pub name: String,
    pub qualified_name: String,
    pub module_path: String,
    pub definition: &'a ItemStruct,
    pub methods: Vec<&'a ImplItemFn>,
}

impl ClassPath {
    pub fn new(files: Vec<ParsedFile>) -> Self {
        let mut collector = ItemCollector {
            modules: Vec::new(),
            known_modules: BTreeSet::new(),
            items: Vec::new(),
        };

        for file in &files {
            collector.modules = split_path(&file.module_path);
            collector.known_modules.insert(file.module_path.clone());
            collector.visit_file(&file.syntax_tree);
        }

        let ItemCollector { known_modules, items, .. } = collector;

        let mut structs = HashMap::new();
        let mut impls: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, scoped) in items.iter().enumerate() {
            match &scoped.item {
                Item::Struct(item_struct) => {
                    let qualified = qualify(&scoped.module_path, &item_struct.ident.to_string());
                    if structs.insert(qualified.clone(), index).is_some() {
                        warn!("Struct {} is declared more than once", qualified);
                    }
                }
                Item::Impl(item_impl) => {
                    if let Some(target) = impl_target(item_impl, &scoped.module_path) {
                        impls.entry(target).or_default().push(index);
                    }
                }
                _ => {}
            }
        }

        debug!(
            "Indexed {} items in {} modules ({} structs)",
            items.len(),
            known_modules.len(),
            structs.len()
        );

        Self {
            items,
            modules: known_modules,
            structs,
            impls,
        }
    }

    /// Scans and parses every Rust file below `source_root`.
    ///
    /// Files that cannot be read or parsed are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the source root does not exist.
    pub fn load(source_root: &Path) -> Result<Self> {
        info!("Loading class path from {}", source_root.display());

        let scan_result = FileScanner::new(source_root.to_path_buf()).scan()?;
        if !scan_result.warnings.is_empty() {
            warn!("{} entries below {} could not be read", scan_result.warnings.len(), source_root.display());
        }

        let files: Vec<ParsedFile> = AstParser::parse_files(&scan_result.rust_files)
            .into_iter()
            .filter_map(|r| r.ok())
            .collect();

        info!(
            "Loaded {} of {} source files",
            files.len(),
            scan_result.rust_files.len()
        );

        Ok(Self::new(files))
    }

    /// Builds a class path from in-memory sources given as `(module path, code)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] naming the module whose code is not valid Rust.
    pub fn from_sources<'s, I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'s str, &'s str)>,
    {
        let mut files = Vec::new();
        for (module_path, code) in sources {
            let path = PathBuf::from(format!("<{}>", module_path));
            let syntax_tree = syn::parse_file(code).map_err(|e| Error::ParseError {
                file: path.clone(),
                message: e.to_string(),
            })?;
            files.push(ParsedFile {
                path,
                module_path: module_path.to_string(),
                syntax_tree,
            });
        }
        Ok(Self::new(files))
    }

    /// Every item of every file, including items of inline `mod` blocks.
    ///
    /// `mod` items themselves are not listed, nor are items nested in function
    /// bodies and `impl` blocks.
    pub fn items(&self) -> &[ScopedItem] {
        &self.items
    }

    /// Whether `package` or any module below it exists.
    pub fn contains_package(&self, package: &str) -> bool {
        self.modules.iter().any(|module| in_package(module, package))
    }

    /// Enumerates qualified names of structs below `base_package` carrying one of `markers`.
    pub fn find_candidate_components(&self, base_package: &str, markers: &[String]) -> Vec<String> {
        let mut candidates = Vec::new();

        for scoped in &self.items {
            if let Item::Struct(item_struct) = &scoped.item {
                if in_package(&scoped.module_path, base_package) && has_marker(&item_struct.attrs, markers) {
                    let qualified = qualify(&scoped.module_path, &item_struct.ident.to_string());
                    debug!("Found candidate class: {}", qualified);
                    candidates.push(qualified);
                }
            }
        }

        candidates
    }

    /// Resolves a qualified type path to its struct definition and methods.
    pub fn find_class(&self, qualified_name: &str) -> Option<ComponentClass<'_>> {
        let qualified_name = normalize_path(qualified_name);
        let scoped = &self.items[*self.structs.get(&qualified_name)?];
        let Item::Struct(definition) = &scoped.item else {
            return None;
        };

        let methods = self
            .impls
            .get(&qualified_name)
            .into_iter()
            .flatten()
            .filter_map(|&index| match &self.items[index].item {
                Item::Impl(item_impl) => Some(item_impl),
                _ => None,
            })
            .flat_map(|item_impl| {
                item_impl.items.iter().filter_map(|impl_item| match impl_item {
                    ImplItem::Fn(method) => Some(method),
                    _ => None,
                })
            })
            .collect();

        Some(ComponentClass {
            name: definition.ident.to_string(),
            qualified_name,
            module_path: scoped.module_path.clone(),
            definition,
            methods,
        })
    }
}

/// Joins a module path and an item name into a qualified path.
pub fn qualify(module_path: &str, name: &str) -> String {
    if module_path.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        module_path.to_string()
    } else {
        format!("{}::{}", module_path, name)
    }
}

/// Strips a leading `crate::` from a path.
pub fn normalize_path(path: &str) -> String {
    path.trim()
        .strip_prefix("crate::")
        .unwrap_or(path.trim())
        .to_string()
}

/// Resolves a path written inside `module_path` to a crate-absolute path.
///
/// `crate`, `self` and any number of leading `super` segments are honoured; any
/// other path is taken relative to `module_path`.
pub fn resolve_path(module_path: &str, path: &str) -> String {
    let mut module = split_path(module_path);
    let mut segments = path.trim().trim_start_matches("::").split("::").peekable();

    match segments.peek() {
        Some(&"crate") => {
            module.clear();
            segments.next();
        }
        Some(&"self") => {
            segments.next();
        }
        _ => {}
    }
    while segments.peek() == Some(&"super") {
        module.pop();
        segments.next();
    }

    module.extend(segments.filter(|s| !s.is_empty()).map(str::to_string));
    module.join("::")
}

/// Whether `module_path` is `package` itself or one of its submodules.
pub fn in_package(module_path: &str, package: &str) -> bool {
    package.is_empty()
        || module_path == package
        || module_path
            .strip_prefix(package)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Whether any attribute's last path segment is one of `markers`.
pub fn has_marker(attrs: &[Attribute], markers: &[String]) -> bool {
    attrs.iter().any(|attr| {
        attr.path()
            .segments
            .last()
            .is_some_and(|segment| markers.iter().any(|m| segment.ident == m))
    })
}

fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split("::").map(str::to_string).collect()
    }
}

/// Qualified path of the type an `impl` block is written for.
fn impl_target(item_impl: &ItemImpl, impl_module: &str) -> Option<String> {
    let Type::Path(type_path) = item_impl.self_ty.as_ref() else {
        return None;
    };
    let written: Vec<String> = type_path
        .path
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect();
    Some(resolve_path(impl_module, &written.join("::")))
}

struct ItemCollector {
    modules: Vec<String>,
    known_modules: BTreeSet<String>,
    items: Vec<ScopedItem>,
}

impl<'a> Visit<'a> for ItemCollector {
    fn visit_item(&mut self, node: &'a Item) {
        if !matches!(node, Item::Mod(_)) {
            self.items.push(ScopedItem {
                module_path: self.modules.join("::"),
                item: node.clone(),
            });
        }
        visit::visit_item(self, node);
    }

    fn visit_item_mod(&mut self, node: &'a ItemMod) {
        self.modules.push(node.ident.to_string());
        self.known_modules.insert(self.modules.join("::"));
        visit::visit_item_mod(self, node);
        self.modules.pop();
    }

    // Items local to function bodies, impls and traits are not addressable by path
    fn visit_item_fn(&mut self, _node: &'a syn::ItemFn) {}

    fn visit_item_impl(&mut self, _node: &'a ItemImpl) {}

    fn visit_item_trait(&mut self, _node: &'a syn::ItemTrait) {}
}
