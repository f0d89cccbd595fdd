//! The type core context
//!
//! [`Pcore`] owns the root loader, the implementation registry and the stack of loader scopes.
//! It is passed explicitly to everything that resolves names; there is no global current
//! loader. A scope is pushed for the duration of a closure and popped on every exit path.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};

use crate::error::{PcoreError, Result, TypeAssertionError, TypeResolverError};
use crate::evaluator::TypeEvaluator;
use crate::loader::{BasicLoader, LoaderRef, ParentedLoader, TypeSetLoader, TypedName};
use crate::meta;
use crate::registry::{ArgumentList, FactoryFn, ImplementationRegistry, ProjectionFn};
use crate::types::factory::*;
use crate::types::instance::assert_instance_of;
use crate::types::type_set::default_type_set;
use crate::types::{Attribute, ObjectType, Type, TypeKind};
use crate::util::config::PcoreConfig;
use crate::values::{DynamicObject, Value};

/// Names of the built-in types
fn builtin_types() -> Vec<(&'static str, Type)> {
    vec![
        ("Any", any()),
        ("Unit", unit()),
        ("Undef", undef()),
        ("Default", default_type()),
        ("Boolean", boolean()),
        ("Scalar", scalar()),
        ("ScalarData", scalar_data()),
        ("Numeric", numeric()),
        ("Integer", integer()),
        ("Float", float()),
        ("String", string()),
        ("Enum", enum_default()),
        ("Pattern", pattern_default()),
        ("Regexp", regexp()),
        ("Collection", collection_default()),
        ("Array", array_default()),
        ("Hash", hash_default()),
        ("Tuple", tuple_default()),
        ("Struct", struct_default()),
        ("Optional", optional_default()),
        ("NotUndef", not_undef_default()),
        ("Variant", variant_default()),
        ("Callable", callable_default()),
        ("Iterable", iterable_default()),
        ("Iterator", iterator_default()),
        ("Type", type_default()),
        ("Sensitive", sensitive_default()),
        ("SemVer", sem_ver()),
        ("SemVerRange", sem_ver_range()),
        ("Timespan", timespan()),
        ("TimeSpan", timespan()),
        ("Timestamp", timestamp()),
        ("Resource", resource_default()),
        ("Class", class_default()),
        ("Runtime", runtime_default()),
        ("Object", object_default()),
        ("TypeSet", default_type_set()),
        ("Data", data()),
    ]
}

/// Pops the scopes pushed after `depth` when dropped
struct ScopeGuard<'a> {
    scopes: &'a Mutex<Vec<LoaderRef>>,
    depth: usize,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        let mut scopes = self.scopes.lock();
        scopes.truncate(self.depth);
        tracing::trace!(depth = self.depth, "pop loader scope");
    }
}

/// The type core: loaders, registry and configuration
#[derive(Debug)]
pub struct Pcore {
    config: PcoreConfig,
    root: LoaderRef,
    registry: Arc<RwLock<ImplementationRegistry>>,
    scopes: Mutex<Vec<LoaderRef>>,
}

impl Pcore {
    /// A context with the default configuration and the base type system installed
    pub fn new() -> Result<Self> {
        Self::with_config(PcoreConfig::default())
    }

    pub fn with_config(config: PcoreConfig) -> Result<Self> {
        let root: LoaderRef = Arc::new(BasicLoader::with_authority(config.name_authority.clone()));
        let pcore = Self {
            config,
            root,
            registry: Arc::new(RwLock::new(ImplementationRegistry::new())),
            scopes: Mutex::new(Vec::new()),
        };
        pcore.init_base_type_system()?;
        Ok(pcore)
    }

    /// Bind the built-in types and the meta types in the root loader
    fn init_base_type_system(&self) -> Result<()> {
        let authority = self.root.name_authority().to_string();
        for (name, t) in builtin_types() {
            self.root.bind(TypedName::type_name_in(name, authority.as_str()), t)?;
        }
        meta::register_pcore_types(self)?;
        tracing::debug!(authority = %authority, "initialized base type system");
        Ok(())
    }

    pub fn config(&self) -> &PcoreConfig {
        &self.config
    }

    pub fn root_loader(&self) -> &LoaderRef {
        &self.root
    }

    pub fn registry(&self) -> &Arc<RwLock<ImplementationRegistry>> {
        &self.registry
    }

    /// The innermost loader
    pub fn loader(&self) -> LoaderRef {
        self.scopes.lock().last().cloned().unwrap_or_else(|| self.root.clone())
    }

    /// The type bound to `name` in the current loader
    pub fn load_type(
        &self,
        name: &str,
    ) -> Option<Type> {
        let loader = self.loader();
        loader.load(&TypedName::type_name_in(name, loader.name_authority()))
    }

    fn push_scope<T>(
        &self,
        make: impl FnOnce(LoaderRef) -> LoaderRef,
        f: impl FnOnce() -> T,
    ) -> T {
        let depth = {
            let mut scopes = self.scopes.lock();
            let parent = scopes.last().cloned().unwrap_or_else(|| self.root.clone());
            let depth = scopes.len();
            scopes.push(make(parent));
            depth
        };
        tracing::trace!(depth = depth + 1, "push loader scope");
        let _guard = ScopeGuard {
            scopes: &self.scopes,
            depth,
        };
        f()
    }

    /// Run `f` with a child loader whose bindings are dropped afterwards
    pub fn with_local_scope<T>(
        &self,
        f: impl FnOnce() -> T,
    ) -> T {
        self.push_scope(|parent| Arc::new(ParentedLoader::new(parent)), f)
    }

    /// Run `f` with the types of `type_set` visible by their relative names
    pub fn with_type_set_scope<T>(
        &self,
        type_set: &Type,
        f: impl FnOnce() -> T,
    ) -> T {
        let case_insensitive = self.config.case_insensitive_lookup;
        let type_set = type_set.clone();
        self.push_scope(
            move |parent| Arc::new(TypeSetLoader::new(parent, type_set, case_insensitive)),
            f,
        )
    }

    /// A context sharing the root loader and the registry, with no scopes pushed. Use one per
    /// thread.
    pub fn fork(&self) -> Pcore {
        Pcore {
            config: self.config.clone(),
            root: self.root.clone(),
            registry: self.registry.clone(),
            scopes: Mutex::new(Vec::new()),
        }
    }

    pub fn type_evaluator(&self) -> TypeEvaluator<'_> {
        TypeEvaluator::new(self)
    }

    /// Parse `source` and evaluate it to a type
    pub fn resolve_type(
        &self,
        source: &str,
    ) -> Result<Type> {
        self.type_evaluator().resolve_type(source)
    }

    /// Define an object type with a registered implementation and bind it in the current
    /// loader
    pub fn create_object_type(
        &self,
        name: &str,
        parent: Option<&str>,
        attributes: Vec<Attribute>,
        factory: FactoryFn,
        projection: ProjectionFn,
    ) -> Result<Type> {
        let mut object = ObjectType::named(name);
        if let Some(parent_name) = parent {
            let parent_type = self.load_type(parent_name).ok_or_else(|| {
                TypeResolverError::new(format!("Parent '{}' of type '{}' is not defined", parent_name, name))
            })?;
            object.parent = Some(parent_type);
        }
        object.attributes = attributes
            .into_iter()
            .map(|a| (a.name.clone(), a))
            .collect::<IndexMap<_, _>>();
        let ptype = crate::types::factory::object(object);

        let loader = self.loader();
        loader.bind(TypedName::type_name_in(name, loader.name_authority()), ptype.clone())?;
        self.registry.write().register(name, name, factory, projection)?;
        Ok(ptype)
    }

    /// Instantiate an object type from positional attribute values. A registered
    /// implementation builds the value; otherwise the values are checked against the attribute
    /// types and wrapped in a [`DynamicObject`].
    pub fn create_object(
        &self,
        ptype: &Type,
        args: Vec<Value>,
    ) -> Result<Value> {
        let resolved = ptype.resolved();
        let TypeKind::Object(object) = resolved.kind() else {
            return Err(TypeResolverError::new(format!("{} is not an Object type", ptype)).into());
        };

        let implementation = object
            .name
            .as_deref()
            .and_then(|name| self.registry.read().lookup_by_type_name(name).cloned());
        if let Some(implementation) = implementation {
            return implementation.create(&mut ArgumentList::new(ptype.clone(), args));
        }

        let attributes = object.all_attributes();
        if args.len() > attributes.len() {
            return Err(TypeAssertionError::new(
                "",
                format!("{} expects at most {} arguments, got {}", ptype, attributes.len(), args.len()),
            )
            .into());
        }
        for (index, attribute) in attributes.iter().enumerate() {
            let path = format!("{}['{}']", ptype, attribute.name);
            match args.get(index) {
                Some(value) => assert_instance_of(&path, &attribute.value_type, value)?,
                None if attribute.value.is_some() || attribute.value_type.is_instance(&Value::Undef) => {}
                None => {
                    return Err(TypeAssertionError::new(path, "expects a value").into());
                }
            }
        }
        Ok(Value::Object(DynamicObject::new(ptype.clone(), args)))
    }

    /// Attribute values of an object or a type, through its registered implementation
    pub fn project(
        &self,
        value: &Value,
    ) -> Result<Vec<Value>> {
        let type_name = match value {
            Value::Object(o) => o.ptype().name().map(str::to_string),
            Value::Type(t) => Some(meta::meta_type_name(t).to_string()),
            _ => None,
        };
        let implementation = type_name
            .as_deref()
            .and_then(|name| self.registry.read().lookup_by_type_name(name).cloned());
        match (implementation, value) {
            (Some(implementation), _) => implementation.project(value),
            (None, Value::Object(o)) => Ok(o.attributes().to_vec()),
            (None, other) => Err(PcoreError::from(TypeAssertionError::new(
                "",
                format!("expects an Object or a Type, got {}", other.kind_name()),
            ))),
        }
    }
}
