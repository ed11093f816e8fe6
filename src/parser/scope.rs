//! The scope stack that disambiguates context-dependent tags.

use std::fmt;

/// Scopes that change what an ambiguous tag means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Suite,
    Test,
    Class,
    Include,
    Exclude,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::Suite => "<suite>",
            Scope::Test => "<test>",
            Scope::Class => "<class>",
            Scope::Include => "<include>",
            Scope::Exclude => "<exclude>",
        };
        f.write_str(name)
    }
}

/// Last-in-first-out stack of [`Scope`] markers.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    pub fn pop(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    /// The innermost scope, if any.
    pub fn current(&self) -> Option<Scope> {
        self.scopes.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_current() {
        let mut stack = ScopeStack::new();
        assert_eq!(stack.current(), None);
        stack.push(Scope::Suite);
        stack.push(Scope::Test);
        stack.push(Scope::Class);
        assert_eq!(stack.current(), Some(Scope::Class));
        assert_eq!(stack.pop(), Some(Scope::Class));
        assert_eq!(stack.current(), Some(Scope::Test));
        assert_eq!(stack.depth(), 2);
        stack.pop();
        stack.pop();
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), None);
    }
}
