//! Reserve - the idle-instance stack of one concrete type.

use std::collections::HashSet;

/// Stack of idle slot indices.
///
/// The most recently returned instance is reused first. An index is never
/// stored twice: pushing a present index is a no-op.
#[derive(Debug)]
pub(crate) struct Reserve {
    type_name: &'static str,
    stack: Vec<u32>,
    members: HashSet<u32>,
}

impl Reserve {
    pub(crate) fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            stack: Vec::new(),
            members: HashSet::new(),
        }
    }

    /// Push an idle index. Returns `false` if it was already present.
    pub(crate) fn push(&mut self, index: u32) -> bool {
        if !self.members.insert(index) {
            return false;
        }
        self.stack.push(index);
        true
    }

    /// Pop the most recently pushed index.
    pub(crate) fn pop(&mut self) -> Option<u32> {
        let index = self.stack.pop()?;
        self.members.remove(&index);
        Some(index)
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, index: u32) -> bool {
        self.members.contains(&index)
    }

    pub(crate) fn len(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }
}
