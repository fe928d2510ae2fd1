//! Link value type and resolution contract.

use async_trait::async_trait;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::resource::Resource;

/// A reference to another resource.
///
/// A Link stands in for a full resource wherever embedding it would be
/// wasteful; it carries just enough information to fetch the target.
///
/// # Example
///
/// ```
/// use contentful_core::Link;
///
/// let link = Link::new("nyancat", "Entry");
/// assert_eq!(
///     serde_json::to_value(&link).unwrap(),
///     serde_json::json!({"sys": {"type": "Link", "id": "nyancat", "linkType": "Entry"}}),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    id: String,
    link_type: String,
}

impl Link {
    /// Create a link to the resource with the given ID and type.
    pub fn new(id: impl Into<String>, link_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            link_type: link_type.into(),
        }
    }

    /// The ID of the referenced resource.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The type of the referenced resource.
    pub fn link_type(&self) -> &str {
        &self.link_type
    }
}

impl Serialize for Link {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Sys<'a> {
            #[serde(rename = "type")]
            sys_type: &'static str,
            id: &'a str,
            #[serde(rename = "linkType")]
            link_type: &'a str,
        }

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            "sys",
            &Sys {
                sys_type: "Link",
                id: &self.id,
                link_type: &self.link_type,
            },
        )?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Sys {
            #[serde(rename = "type")]
            sys_type: String,
            id: String,
            #[serde(rename = "linkType")]
            link_type: String,
        }

        #[derive(Deserialize)]
        struct Raw {
            sys: Sys,
        }

        let raw = Raw::deserialize(deserializer)?;
        if raw.sys.sys_type != "Link" {
            return Err(de::Error::custom(format!(
                "expected sys.type \"Link\", found \"{}\"",
                raw.sys.sys_type
            )));
        }

        Ok(Link::new(raw.sys.id, raw.sys.link_type))
    }
}

/// Resolution of a [`Link`] into the resource it references.
///
/// Implemented by downstream SDK clients which know how to fetch the
/// linked resource from their API.
#[async_trait]
pub trait LinkResolver: Send + Sync {
    /// Fetches the resource the link points to.
    ///
    /// `parameters` carries resolver-specific modifiers (locale, space,
    /// environment) as plain name/value pairs.
    async fn resolve_link(
        &self,
        link: &Link,
        parameters: &[(String, String)],
    ) -> crate::Result<Box<dyn Resource>>;
}
