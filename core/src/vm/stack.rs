use crate::error::VmError;
use crate::val::Value;

/// LIFO operand stack.
#[derive(Debug, Default)]
pub struct Stack<'a> {
    items: Vec<Value<'a>>,
}

impl<'a> Stack<'a> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, value: Value<'a>) {
        self.items.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> Result<Value<'a>, VmError> {
        self.items.pop().ok_or(VmError::underflow(1, 0))
    }

    /// Pop exactly `n` values and return them in the order they were pushed, so index 0 is
    /// the deepest of the `n`. On underflow the stack is left untouched.
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<Value<'a>>, VmError> {
        self.require(n)?;
        let split = self.items.len() - n;
        Ok(self.items.split_off(split))
    }

    /// Fail unless at least `n` values are present.
    #[inline]
    pub fn require(&self, n: usize) -> Result<(), VmError> {
        let available = self.items.len();
        if available < n {
            return Err(VmError::underflow(n, available));
        }
        Ok(())
    }

    pub fn peek(&self) -> Option<&Value<'a>> {
        self.items.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Value<'a>] {
        &self.items
    }
}
