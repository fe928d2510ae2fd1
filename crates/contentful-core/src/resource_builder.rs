//! Dispatch of raw API payloads to per-type mappers.
//!
//! A [`ResourceBuilder`] owns a registry of mapper factories keyed by
//! `<namespace>/<system type>` identifiers, an instance cache so each
//! mapper is created once per builder, and optional per-type matchers
//! that can redirect a payload to an alternate mapper.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::trace;

use crate::JsonObject;
use crate::error::BuilderError;
use crate::resource::Resource;

/// A per-type strategy that converts raw decoded payload into (or onto) a
/// typed resource.
///
/// When `resource` is `None` the mapper must construct and return a new
/// instance; when it is `Some` the mapper is expected to update that
/// instance in place and return it. Mapper instances are cached for the
/// life of the builder, so they must not hold per-call mutable state.
pub trait Mapper: Send + Sync {
    /// Maps the given data to a resource.
    fn map(
        &self,
        resource: Option<Box<dyn Resource>>,
        data: &JsonObject,
    ) -> crate::Result<Box<dyn Resource>>;
}

type MapperFactory = Box<dyn Fn() -> Arc<dyn Mapper> + Send + Sync>;
type DataMatcher = Box<dyn Fn(&JsonObject) -> Option<String> + Send + Sync>;
type SystemTypeResolver = Box<dyn Fn(&JsonObject) -> Option<String> + Send + Sync>;

/// Builds typed resources out of raw decoded payloads.
pub struct ResourceBuilder {
    namespace: String,
    system_type: Option<SystemTypeResolver>,
    factories: HashMap<String, MapperFactory>,
    matchers: HashMap<String, DataMatcher>,
    mappers: Mutex<HashMap<String, Arc<dyn Mapper>>>,
}

impl ResourceBuilder {
    /// Create a builder whose default mappers live under `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            system_type: None,
            factories: HashMap::new(),
            matchers: HashMap::new(),
            mappers: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the default system-type resolution (`data.sys.type`).
    pub fn with_system_type_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&JsonObject) -> Option<String> + Send + Sync + 'static,
    {
        self.system_type = Some(Box::new(resolver));
        self
    }

    /// Register a mapper factory under the given identifier.
    ///
    /// Default identifiers follow the `<namespace>/<system type>`
    /// convention; matchers may redirect to any registered identifier.
    pub fn register_mapper<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn Mapper> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    /// Set a matcher for a system type.
    ///
    /// The matcher receives the raw payload and may return the identifier
    /// of an alternate mapper; returning `None` keeps the default, so a
    /// matcher does not have to handle every case explicitly.
    pub fn set_matcher<F>(&mut self, system_type: impl Into<String>, matcher: F) -> &mut Self
    where
        F: Fn(&JsonObject) -> Option<String> + Send + Sync + 'static,
    {
        self.matchers.insert(system_type.into(), Box::new(matcher));
        self
    }

    /// Remove the matcher for a system type.
    pub fn clear_matcher(&mut self, system_type: &str) -> &mut Self {
        self.matchers.remove(system_type);
        self
    }

    /// Creates or updates a resource from raw API data.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::MissingSystemType`] when the payload lacks
    /// recognizable type information, and [`BuilderError::UnknownMapper`]
    /// when the resolved mapper identifier was never registered.
    pub fn build(
        &self,
        data: &JsonObject,
        resource: Option<Box<dyn Resource>>,
    ) -> crate::Result<Box<dyn Resource>> {
        let name = self.mapper_name(data)?;
        trace!(mapper = %name, "building resource");

        self.mapper(&name)?.map(resource, data)
    }

    /// The mapper instance for the given identifier, created on first use
    /// and cached for the life of this builder.
    pub fn mapper(&self, name: &str) -> Result<Arc<dyn Mapper>, BuilderError> {
        let mut cache = self.mappers.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(mapper) = cache.get(name) {
            return Ok(mapper.clone());
        }

        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| BuilderError::UnknownMapper {
                name: name.to_string(),
            })?;

        let mapper = factory();
        cache.insert(name.to_string(), mapper.clone());

        Ok(mapper)
    }

    /// Resolves the mapper identifier for a payload, consulting the
    /// registered matcher for its system type.
    fn mapper_name(&self, data: &JsonObject) -> Result<String, BuilderError> {
        let system_type = self.system_type(data)?;

        if let Some(matcher) = self.matchers.get(&system_type) {
            if let Some(matched) = matcher(data).filter(|name| !name.is_empty()) {
                // A matcher pointing at an unregistered mapper is a
                // configuration fault, not a silent fallback.
                if !self.factories.contains_key(&matched) {
                    return Err(BuilderError::UnknownMapper { name: matched });
                }
                return Ok(matched);
            }
        }

        Ok(format!("{}/{}", self.namespace, system_type))
    }

    fn system_type(&self, data: &JsonObject) -> Result<String, BuilderError> {
        let system_type = match &self.system_type {
            Some(resolver) => resolver(data),
            None => data
                .get("sys")
                .and_then(|sys| sys.get("type"))
                .and_then(Value::as_str)
                .map(str::to_string),
        };

        system_type.ok_or(BuilderError::MissingSystemType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::resource::SystemProperties;

    #[derive(Debug)]
    struct EntrySys {
        id: String,
    }

    impl SystemProperties for EntrySys {
        fn id(&self) -> &str {
            &self.id
        }

        fn resource_type(&self) -> &str {
            "Entry"
        }

        fn to_json(&self) -> Value {
            json!({"id": self.id, "type": "Entry"})
        }
    }

    #[derive(Debug)]
    struct Entry {
        sys: EntrySys,
    }

    impl Resource for Entry {
        fn system_properties(&self) -> &dyn SystemProperties {
            &self.sys
        }

        fn to_json(&self) -> Value {
            json!({"sys": self.sys.to_json()})
        }

        fn into_any(self: Box<Self>) -> Box<dyn std::any::Any + Send> {
            self
        }
    }

    struct EntryMapper;

    impl Mapper for EntryMapper {
        fn map(
            &self,
            _resource: Option<Box<dyn Resource>>,
            data: &JsonObject,
        ) -> crate::Result<Box<dyn Resource>> {
            let id = data
                .get("sys")
                .and_then(|sys| sys.get("id"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            Ok(Box::new(Entry {
                sys: EntrySys { id },
            }))
        }
    }

    fn entry_payload(id: &str) -> JsonObject {
        match json!({"sys": {"id": id, "type": "Entry"}}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn builds_with_the_default_namespace_mapper() {
        let mut builder = ResourceBuilder::new("delivery");
        builder.register_mapper("delivery/Entry", || Arc::new(EntryMapper));

        let resource = builder.build(&entry_payload("nyancat"), None).unwrap();

        assert_eq!(resource.id(), "nyancat");
        assert_eq!(resource.resource_type(), "Entry");
    }

    #[test]
    fn missing_system_type_is_an_invalid_argument() {
        let builder = ResourceBuilder::new("delivery");
        let data = match json!({"fields": {}}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        assert!(matches!(
            builder.build(&data, None),
            Err(crate::Error::Builder(BuilderError::MissingSystemType))
        ));
    }

    #[test]
    fn unregistered_default_mapper_is_reported_by_name() {
        let builder = ResourceBuilder::new("delivery");

        let error = builder.build(&entry_payload("nyancat"), None).unwrap_err();

        assert!(error.to_string().contains("delivery/Entry"));
    }

    #[test]
    fn matcher_redirecting_to_unregistered_mapper_fails_fast() {
        let mut builder = ResourceBuilder::new("delivery");
        builder.register_mapper("delivery/Entry", || Arc::new(EntryMapper));
        builder.set_matcher("Entry", |_| Some("delivery/Missing".to_string()));

        let error = builder.build(&entry_payload("nyancat"), None).unwrap_err();

        assert!(error.to_string().contains("delivery/Missing"));
    }

    #[test]
    fn custom_system_type_resolver_takes_over() {
        let mut builder = ResourceBuilder::new("delivery").with_system_type_resolver(|data| {
            data.get("kind").and_then(Value::as_str).map(str::to_string)
        });
        builder.register_mapper("delivery/Special", || Arc::new(EntryMapper));

        let data = match json!({"kind": "Special", "sys": {"id": "x"}}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        assert!(builder.build(&data, None).is_ok());
    }
}
