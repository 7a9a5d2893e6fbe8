use tracing::debug;

use crate::error::VmError;
use crate::val::Value;

use super::Interpreter;
use super::native::Primitive;

impl<'a> Interpreter<'a> {
    /// `CALL_FUNCTION argc`: the callee sits below its `argc` positional arguments.
    pub(super) fn call_function(&mut self, argc: usize) -> Result<(), VmError> {
        self.stack_mut().require(argc + 1)?;
        let args = self.stack_mut().pop_n(argc)?;
        let primitive = self.pop_callee()?;
        debug!(target: "pyrite::vm::call", name = primitive.name, argc, "call_function");
        (primitive.func)(self, &args, None)
    }

    /// `CALL_FUNCTION_KW argc`: like `CALL_FUNCTION`, with a list of keyword names on top.
    /// The last `names.len()` of the `argc` arguments are the keyword values.
    pub(super) fn call_function_kw(&mut self, argc: usize) -> Result<(), VmError> {
        self.stack_mut().require(argc + 2)?;
        let names = self.pop()?.as_list()?;
        if names.len() > argc {
            return Err(VmError::KeywordArity {
                names: names.len(),
                argc,
            });
        }
        let mut args = self.stack_mut().pop_n(argc)?;
        let primitive = self.pop_callee()?;
        let values = args.split_off(argc - names.len());
        let mut kwargs = Vec::with_capacity(names.len());
        for (name, value) in names.iter().zip(values) {
            kwargs.push((name.as_str()?, value));
        }
        debug!(
            target: "pyrite::vm::call",
            name = primitive.name,
            positional = args.len(),
            keywords = kwargs.len(),
            "call_function_kw"
        );
        (primitive.func)(self, &args, Some(kwargs.as_slice()))
    }

    fn pop_callee(&mut self) -> Result<&'a Primitive, VmError> {
        let callee = self.pop()?;
        match callee {
            Value::Function(primitive) => Ok(primitive),
            other => Err(VmError::NotCallable { found: other.tag() }),
        }
    }
}

