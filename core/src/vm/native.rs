use std::fmt;

use tracing::debug;

use crate::error::VmError;
use crate::val::Value;

use super::Interpreter;

/// Keyword arguments as `(name, value)` pairs in call order.
pub type Kwargs<'a> = [(&'a str, Value<'a>)];

/// Host-side callable exposed to bytecode.
///
/// The callee gets the whole interpreter: it may read and mutate the stack and scope,
/// allocate from the arena and write to the output sink. It is responsible for pushing its
/// own result; nothing is pushed on its behalf.
pub type PrimitiveFn = for<'a> fn(&mut Interpreter<'a>, &[Value<'a>], Option<&Kwargs<'a>>) -> Result<(), VmError>;

#[derive(Clone, Copy)]
pub struct Primitive {
    pub name: &'static str,
    pub func: PrimitiveFn,
}

impl Primitive {
    pub const fn new(name: &'static str, func: PrimitiveFn) -> Self {
        Self { name, func }
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Ordered table of primitives installed into every run's scope before execution starts.
#[derive(Debug, Clone, Default)]
pub struct PrimitiveRegistry {
    primitives: Vec<Primitive>,
}

impl PrimitiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `func` under `name`. A later registration of the same name replaces the
    /// earlier one.
    pub fn register(&mut self, name: &'static str, func: PrimitiveFn) -> &mut Self {
        let primitive = Primitive::new(name, func);
        match self.primitives.iter_mut().find(|p| p.name == name) {
            Some(existing) => {
                debug!(target: "pyrite::vm::native", name, "primitive.replace");
                *existing = primitive;
            }
            None => self.primitives.push(primitive),
        }
        self
    }

    pub fn extend<I>(&mut self, primitives: I) -> &mut Self
    where
        I: IntoIterator<Item = Primitive>,
    {
        for p in primitives {
            self.register(p.name, p.func);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Primitive> {
        self.primitives.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.primitives.iter().map(|p| p.name).collect()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}
