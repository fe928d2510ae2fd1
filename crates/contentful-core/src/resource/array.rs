//! The collection pseudo-resource.

use std::ops::Index;
use std::slice;

use serde_json::{Value, json};

use crate::api::Link;
use crate::resource::{ArraySystemProperties, Resource, SystemProperties};

/// An immutable ordered collection of resources plus pagination metadata.
///
/// `total` reflects the server-side match count and need not equal the
/// number of items in the current page. The collection is read-only by
/// construction: no mutable access to the items is exposed.
#[derive(Debug)]
pub struct ResourceArray {
    sys: ArraySystemProperties,
    items: Vec<Box<dyn Resource>>,
    total: usize,
    limit: usize,
    skip: usize,
}

impl ResourceArray {
    /// Create a collection from one page of items and its pagination
    /// metadata.
    pub fn new(items: Vec<Box<dyn Resource>>, total: usize, limit: usize, skip: usize) -> Self {
        Self {
            sys: ArraySystemProperties::new(),
            items,
            total,
            limit,
            skip,
        }
    }

    /// The total amount of resources matching the filter, server-side.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The limit used when retrieving this page.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The number of resources skipped when retrieving this page.
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// The items of the current page.
    pub fn items(&self) -> &[Box<dyn Resource>] {
        &self.items
    }

    /// The number of items in the current page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the current page is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item at `index`, or `None` when out of bounds.
    pub fn get(&self, index: usize) -> Option<&dyn Resource> {
        self.items.get(index).map(Box::as_ref)
    }

    /// Iterates over the items of the current page.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.items.iter(),
        }
    }
}

impl Index<usize> for ResourceArray {
    type Output = dyn Resource;

    fn index(&self, index: usize) -> &Self::Output {
        self.items[index].as_ref()
    }
}

/// Iterator over the items of a [`ResourceArray`].
pub struct Iter<'a> {
    inner: slice::Iter<'a, Box<dyn Resource>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a dyn Resource;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Box::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a ResourceArray {
    type Item = &'a dyn Resource;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Resource for ResourceArray {
    fn system_properties(&self) -> &dyn SystemProperties {
        &self.sys
    }

    /// # Panics
    ///
    /// Always: a resource of type `Array` does not have an ID.
    fn id(&self) -> &str {
        panic!("resource of type Array does not have an ID");
    }

    fn resource_type(&self) -> &str {
        "Array"
    }

    /// # Panics
    ///
    /// Always: a resource of type `Array` cannot be represented as a
    /// [`Link`].
    fn as_link(&self) -> Link {
        panic!("resource of type Array cannot be represented as a Link");
    }

    fn to_json(&self) -> Value {
        json!({
            "sys": {"type": "Array"},
            "total": self.total,
            "limit": self.limit,
            "skip": self.skip,
            "items": self.items.iter().map(|item| item.to_json()).collect::<Vec<_>>(),
        })
    }

    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any + Send> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestSys;

    impl SystemProperties for TestSys {
        fn id(&self) -> &str {
            "nyancat"
        }

        fn resource_type(&self) -> &str {
            "Entry"
        }

        fn to_json(&self) -> Value {
            json!({"id": "nyancat", "type": "Entry"})
        }
    }

    #[derive(Debug)]
    struct TestEntry {
        sys: TestSys,
    }

    impl Resource for TestEntry {
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

    fn array() -> ResourceArray {
        let items: Vec<Box<dyn Resource>> = vec![
            Box::new(TestEntry { sys: TestSys }),
            Box::new(TestEntry { sys: TestSys }),
        ];

        ResourceArray::new(items, 100, 2, 0)
    }

    #[test]
    fn count_follows_items_not_total() {
        let array = array();

        assert_eq!(array.len(), 2);
        assert_eq!(array.total(), 100);
        assert_eq!(array.iter().count(), array.len());
    }

    #[test]
    fn indexed_access_and_iteration() {
        let array = array();

        assert_eq!(array[0].id(), "nyancat");
        assert_eq!(array.get(0).map(|r| r.resource_type()), Some("Entry"));
        assert!(array.get(5).is_none());

        let mut seen = 0;
        for item in &array {
            assert_eq!(item.resource_type(), "Entry");
            seen += 1;
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn serializes_with_pagination_metadata() {
        let value = array().to_json();

        assert_eq!(value["sys"], json!({"type": "Array"}));
        assert_eq!(value["total"], 100);
        assert_eq!(value["limit"], 2);
        assert_eq!(value["skip"], 0);
        assert_eq!(value["items"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    #[should_panic(expected = "does not have an ID")]
    fn id_is_a_usage_error() {
        let _ = array().id();
    }

    #[test]
    #[should_panic(expected = "cannot be represented as a Link")]
    fn as_link_is_a_usage_error() {
        let _ = array().as_link();
    }
}
