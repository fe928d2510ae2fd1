//! Local storage of resources keyed by type, ID, and options.

use crate::resource::Resource;

/// A pool of resources, used for local storage and to simplify
/// dependency handling between resources.
///
/// Concrete pools choose their own storage; [`generate_key`] values built
/// with [`sanitize`] are guaranteed collision-free across type, ID, and
/// option substrings.
///
/// [`generate_key`]: ResourcePool::generate_key
pub trait ResourcePool {
    /// Saves the given resource into the pool.
    ///
    /// Returns `true` if the resource was added, `false` if it was
    /// already present.
    fn save(&mut self, resource: Box<dyn Resource>) -> bool;

    /// Returns the resource stored for the given coordinates.
    fn get(
        &self,
        resource_type: &str,
        id: &str,
        options: &[(String, String)],
    ) -> Option<&dyn Resource>;

    /// Whether the pool contains the given resource.
    fn has(&self, resource_type: &str, id: &str, options: &[(String, String)]) -> bool {
        self.get(resource_type, id, options).is_some()
    }

    /// Generates a unique key for the given coordinates.
    fn generate_key(&self, resource_type: &str, id: &str, options: &[(String, String)]) -> String;
}

/// Escapes the characters `.` `-` `_` `*` so that keys concatenated from
/// type/ID/option substrings cannot collide on separator ambiguity.
///
/// Each reserved character maps to `___<code>___` with its decimal code
/// point; the mapping is deterministic and injective over the reserved
/// set.
pub fn sanitize(value: &str) -> String {
    let mut sanitized = String::with_capacity(value.len());

    for character in value.chars() {
        match character {
            '.' | '-' | '_' | '*' => {
                sanitized.push_str("___");
                sanitized.push_str(&(character as u32).to_string());
                sanitized.push_str("___");
            }
            other => sanitized.push(other),
        }
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(sanitize("en-US"), "en___45___US");
        assert_eq!(sanitize("my.entry"), "my___46___entry");
        assert_eq!(sanitize("a_b"), "a___95___b");
        assert_eq!(sanitize("*"), "___42___");
    }

    #[test]
    fn plain_input_is_untouched() {
        assert_eq!(sanitize("nyancat"), "nyancat");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn output_contains_no_reserved_characters_from_input() {
        let sanitized = sanitize("a.b-c_d*e");

        // The escape marker reintroduces underscores by design; what must
        // never survive is the original separators' ambiguity.
        assert!(!sanitized.contains('.'));
        assert!(!sanitized.contains('-'));
        assert!(!sanitized.contains('*'));
    }

    #[test]
    fn distinct_reserved_characters_never_collide() {
        let inputs = ["a.b", "a-b", "a_b", "a*b"];
        let outputs: Vec<String> = inputs.iter().map(|i| sanitize(i)).collect();

        for (i, a) in outputs.iter().enumerate() {
            for (j, b) in outputs.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn same_input_always_sanitizes_identically() {
        assert_eq!(sanitize("Entry.nyan-cat"), sanitize("Entry.nyan-cat"));
    }
}
