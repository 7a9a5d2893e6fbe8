use crate::error::VmError;
use crate::util::fast_map::{FastHashMap, fast_hash_map_with_capacity};
use crate::val::Value;

/// The single flat name table of a run.
///
/// User bindings and pre-registered primitives share it, so storing to a primitive's name
/// shadows the primitive for the rest of the run.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    bindings: FastHashMap<&'a str, Value<'a>>,
}

impl<'a> Scope<'a> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bindings: fast_hash_map_with_capacity(capacity),
        }
    }

    /// Bind `name`, replacing any earlier binding. Returns the replaced value.
    pub fn store(&mut self, name: &'a str, value: Value<'a>) -> Option<Value<'a>> {
        self.bindings.insert(name, value)
    }

    pub fn load(&self, name: &str) -> Result<Value<'a>, VmError> {
        self.bindings
            .get(name)
            .copied()
            .ok_or_else(|| VmError::UnboundName { name: name.to_string() })
    }

    pub fn get(&self, name: &str) -> Option<&Value<'a>> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = self.bindings.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
