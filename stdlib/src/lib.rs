pub mod args;
pub mod convert;
pub mod io;
pub mod list;
pub mod math;


use pyrite_core::vm::PrimitiveRegistry;
use tracing::debug;

/// Register global builtin functions, available by name without import
/// - print(*args, sep=' ', end='\n'): write args to the output sink; returns None
/// - len(x): length of a list or str
/// - abs(n), min(...), max(...), sum(list[, start]), pow(base, exp[, mod]): integer math
/// - str(x), repr(x), bool(x): conversions
pub fn register_stdlib_globals(registry: &mut PrimitiveRegistry) {
    registry
        .register("print", io::print)
        .register("len", list::len)
        .register("abs", math::abs)
        .register("min", math::min)
        .register("max", math::max)
        .register("sum", math::sum)
        .register("pow", math::pow)
        .register("str", convert::str)
        .register("repr", convert::repr)
        .register("bool", convert::bool);
    debug!(target: "pyrite::stdlib", count = registry.len(), "stdlib.register_globals");
}

/// A registry holding only the stdlib globals.
pub fn stdlib_registry() -> PrimitiveRegistry {
    let mut registry = PrimitiveRegistry::new();
    register_stdlib_globals(&mut registry);
    registry
}
