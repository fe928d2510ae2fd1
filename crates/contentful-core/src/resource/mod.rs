//! Typed resource contracts.
//!
//! Concrete resource types live in the downstream SDKs; this module
//! defines what any of them must expose, plus the one aggregate the core
//! owns itself, [`ResourceArray`].

pub mod array;
pub mod pool;

use std::fmt;

use serde_json::{Value, json};

use crate::api::Link;

pub use array::ResourceArray;
pub use pool::{ResourcePool, sanitize};

/// Server-managed metadata attached to every resource, the `sys` object
/// in API responses.
///
/// Concrete SDKs construct their own variants from the raw `sys` mapping
/// and add subtype-specific fields (space, environment, timestamps).
pub trait SystemProperties {
    /// The resource ID.
    fn id(&self) -> &str;

    /// The resource type.
    fn resource_type(&self) -> &str;

    /// The JSON form of this `sys` object.
    fn to_json(&self) -> Value;
}

/// A typed object representing one API-managed entity.
pub trait Resource: fmt::Debug + Send + Sync {
    /// The resource's system properties.
    fn system_properties(&self) -> &dyn SystemProperties;

    /// Shortcut for the resource ID.
    fn id(&self) -> &str {
        self.system_properties().id()
    }

    /// Shortcut for the resource type.
    fn resource_type(&self) -> &str {
        self.system_properties().resource_type()
    }

    /// A [`Link`] representation of this resource.
    fn as_link(&self) -> Link {
        Link::new(self.id(), self.resource_type())
    }

    /// The JSON form of this resource.
    fn to_json(&self) -> Value;

    /// Consumes the boxed resource for downcasting to its concrete type.
    ///
    /// Mappers use this to update an existing instance in place; the
    /// implementation is always `self`.
    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any + Send>;
}

/// System properties of the synthetic collection pseudo-resource.
///
/// Collections have no identity of their own; asking for their ID is a
/// usage error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArraySystemProperties;

impl ArraySystemProperties {
    /// Create the collection `sys` object.
    pub fn new() -> Self {
        Self
    }
}

impl SystemProperties for ArraySystemProperties {
    /// # Panics
    ///
    /// Always: a resource of type `Array` does not have an ID.
    fn id(&self) -> &str {
        panic!("resource of type Array does not have an ID");
    }

    fn resource_type(&self) -> &str {
        "Array"
    }

    fn to_json(&self) -> Value {
        json!({"type": "Array"})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_system_properties_type() {
        let sys = ArraySystemProperties::new();

        assert_eq!(sys.resource_type(), "Array");
        assert_eq!(sys.to_json(), json!({"type": "Array"}));
    }

    #[test]
    #[should_panic(expected = "does not have an ID")]
    fn array_system_properties_id_is_a_usage_error() {
        let _ = ArraySystemProperties::new().id();
    }
}
