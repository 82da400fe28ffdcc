//! Circular dependency detection for recursive registration.

use std::ops::{Deref, DerefMut};

use crate::error::{DiError, DiResult};

/// Types currently being registered, outermost first.
///
/// The stack is owned by one top-level `register` call and passed down
/// through the recursion, so nested or failed registrations cannot leave
/// stale entries behind for the next call.
pub(crate) struct RegistrationStack {
    stack: Vec<&'static str>,
    max_depth: usize,
}

impl RegistrationStack {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            max_depth,
        }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.stack.iter().any(|&n| n == name)
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Path from the first occurrence of `name` back to `name`,
    /// e.g. `[A, B, A]`.
    pub(crate) fn cycle_to(&self, name: &'static str) -> Vec<&'static str> {
        let start = self.stack.iter().position(|&n| n == name).unwrap_or(0);
        let mut path = self.stack[start..].to_vec();
        path.push(name);
        path
    }

    /// Pushes `name` for the lifetime of the returned frame.
    pub(crate) fn enter(&mut self, name: &'static str) -> DiResult<Frame<'_>> {
        // Circular detection BEFORE pushing the new name
        if self.contains(name) {
            return Err(DiError::Circular(self.cycle_to(name)));
        }
        if self.stack.len() >= self.max_depth {
            return Err(DiError::DepthExceeded(self.stack.len()));
        }
        self.stack.push(name);
        Ok(Frame { stack: self })
    }
}

/// Guard popping its entry on drop, on success and on error alike.
pub(crate) struct Frame<'a> {
    stack: &'a mut RegistrationStack,
}

impl Deref for Frame<'_> {
    type Target = RegistrationStack;

    fn deref(&self) -> &RegistrationStack {
        self.stack
    }
}

impl DerefMut for Frame<'_> {
    fn deref_mut(&mut self) -> &mut RegistrationStack {
        self.stack
    }
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        self.stack.stack.pop();
    }
}
