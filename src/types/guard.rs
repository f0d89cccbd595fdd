//! Self recursion tracking over two type graphs
//!
//! Assignability and equality walk a `this` side and a `that` side at the same time. Either side
//! may refer back to itself through aliases. The guard records the instances currently being
//! visited on each side, by identity, and reports a state that tells the caller which sides have
//! looped back.

use std::collections::HashSet;

/// No side has recursed
pub const NO_SELF_RECURSION: u8 = 0;
/// The `this` side has recursed
pub const SELF_RECURSION_IN_THIS: u8 = 1;
/// The `that` side has recursed
pub const SELF_RECURSION_IN_THAT: u8 = 2;
/// Both sides have recursed
pub const SELF_RECURSION_IN_BOTH: u8 = 3;

#[derive(Debug, Default)]
pub struct RecursionGuard {
    this_set: HashSet<usize>,
    that_set: HashSet<usize>,
    recursive_this: HashSet<usize>,
    recursive_that: HashSet<usize>,
    pairs: HashSet<(usize, usize)>,
    state: u8,
}

impl RecursionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `id` on the `this` side and run `block` with the resulting state
    pub fn with_this<R>(
        &mut self,
        id: usize,
        block: impl FnOnce(&mut Self, u8) -> R,
    ) -> R {
        if self.this_set.insert(id) {
            let state = self.state;
            let result = block(self, state);
            self.this_set.remove(&id);
            return result;
        }
        self.recursive_this.insert(id);
        if self.state & SELF_RECURSION_IN_THIS == 0 {
            self.state |= SELF_RECURSION_IN_THIS;
            let state = self.state;
            let result = block(self, state);
            self.state &= !SELF_RECURSION_IN_THIS;
            result
        } else {
            let state = self.state;
            block(self, state)
        }
    }

    /// Enter `id` on the `that` side and run `block` with the resulting state
    pub fn with_that<R>(
        &mut self,
        id: usize,
        block: impl FnOnce(&mut Self, u8) -> R,
    ) -> R {
        if self.that_set.insert(id) {
            let state = self.state;
            let result = block(self, state);
            self.that_set.remove(&id);
            return result;
        }
        self.recursive_that.insert(id);
        if self.state & SELF_RECURSION_IN_THAT == 0 {
            self.state |= SELF_RECURSION_IN_THAT;
            let state = self.state;
            let result = block(self, state);
            self.state &= !SELF_RECURSION_IN_THAT;
            result
        } else {
            let state = self.state;
            block(self, state)
        }
    }

    /// Run `block` with `(this, that)` marked as being compared
    pub fn with_pair<R>(
        &mut self,
        this: usize,
        that: usize,
        block: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let entered = self.pairs.insert((this, that));
        let result = block(self);
        if entered {
            self.pairs.remove(&(this, that));
        }
        result
    }

    /// Whether `(this, that)` is already being compared further up the walk
    pub fn is_comparing(
        &self,
        this: usize,
        that: usize,
    ) -> bool {
        self.pairs.contains(&(this, that))
    }

    /// Whether `id` ever looped back on the `this` side
    pub fn recursive_this(
        &self,
        id: usize,
    ) -> bool {
        self.recursive_this.contains(&id)
    }

    /// Whether `id` ever looped back on the `that` side
    pub fn recursive_that(
        &self,
        id: usize,
    ) -> bool {
        self.recursive_that.contains(&id)
    }

    pub fn state(&self) -> u8 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_visit_reports_no_recursion() {
        let mut guard = RecursionGuard::new();
        let state = guard.with_this(1, |_, state| state);
        assert_eq!(state, NO_SELF_RECURSION);
        assert!(!guard.recursive_this(1));
    }

    #[test]
    fn test_revisit_sets_side_bit_for_the_call() {
        let mut guard = RecursionGuard::new();
        let inner = guard.with_this(1, |g, _| g.with_this(1, |_, state| state));
        assert_eq!(inner, SELF_RECURSION_IN_THIS);
        assert!(guard.recursive_this(1));
        assert_eq!(guard.state(), NO_SELF_RECURSION);
    }

    #[test]
    fn test_pairs_are_scoped_to_the_block() {
        let mut guard = RecursionGuard::new();
        let inside = guard.with_pair(1, 2, |g| g.with_pair(1, 2, |g| g.is_comparing(1, 2)));
        assert!(inside);
        assert!(!guard.is_comparing(1, 2));
    }

    #[test]
    fn test_both_sides() {
        let mut guard = RecursionGuard::new();
        let state = guard.with_this(1, |g, _| {
            g.with_that(2, |g, _| {
                g.with_this(1, |g, _| g.with_that(2, |_, state| state))
            })
        });
        assert_eq!(state, SELF_RECURSION_IN_BOTH);
        assert!(guard.recursive_that(2));
        assert!(!guard.recursive_that(1));
    }
}
