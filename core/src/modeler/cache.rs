#![deny(missing_docs)]

//! # Identity Cache
//!
//! Memoizes "fragment identity -> produced result" for one modeling run.
//!
//! Recursive producers (schema classification) reserve a placeholder before they
//! descend, so a fragment that reaches itself again gets the placeholder back
//! instead of recursing forever. A fragment that failed stays failed.

use crate::oas::FragmentId;
use std::collections::HashMap;

/// State of one cached fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<V> {
    /// Production started; the value is a placeholder that will be completed.
    InProgress(V),
    /// Production finished.
    Done(V),
    /// Production failed.
    Failed,
}

impl<V: Copy> Entry<V> {
    /// The (possibly placeholder) value, unless the fragment failed.
    pub fn value(&self) -> Option<V> {
        match self {
            Entry::InProgress(v) | Entry::Done(v) => Some(*v),
            Entry::Failed => None,
        }
    }
}

/// Fragment identity -> result map, scoped to a single run.
#[derive(Debug, Clone)]
pub struct IdentityCache<V> {
    entries: HashMap<FragmentId, Entry<V>>,
}

impl<V> Default for IdentityCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V: Copy> IdentityCache<V> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `producer` once per fragment identity.
    ///
    /// Returns `None` for an absent fragment, the cached result for a known one
    /// (without calling `producer`), and otherwise the freshly produced result,
    /// which is cached before returning. Failures are cached as well.
    pub fn memoize<E>(
        &mut self,
        fragment: Option<FragmentId>,
        producer: impl FnOnce() -> Result<V, E>,
    ) -> Option<Result<V, Option<E>>> {
        let fragment = fragment?;
        match self.entries.get(&fragment) {
            Some(Entry::Failed) => return Some(Err(None)),
            Some(entry) => return entry.value().map(Ok),
            None => {}
        }
        let result = producer();
        match result {
            Ok(value) => {
                self.entries.insert(fragment, Entry::Done(value));
                Some(Ok(value))
            }
            Err(err) => {
                self.entries.insert(fragment, Entry::Failed);
                Some(Err(Some(err)))
            }
        }
    }

    /// The state of `fragment`, if it was seen.
    pub fn get(&self, fragment: FragmentId) -> Option<Entry<V>> {
        self.entries.get(&fragment).copied()
    }

    /// True if `fragment` was seen, whatever the outcome.
    pub fn contains(&self, fragment: FragmentId) -> bool {
        self.entries.contains_key(&fragment)
    }

    /// Marks `fragment` as in progress with `placeholder` as its future value.
    pub fn begin(&mut self, fragment: FragmentId, placeholder: V) {
        self.entries
            .insert(fragment, Entry::InProgress(placeholder));
    }

    /// Records the final value of `fragment`.
    pub fn complete(&mut self, fragment: FragmentId, value: V) {
        self.entries.insert(fragment, Entry::Done(value));
    }

    /// Records that `fragment` could not be produced.
    pub fn fail(&mut self, fragment: FragmentId) {
        self.entries.insert(fragment, Entry::Failed);
    }

    /// Marks every finished fragment whose value is in `values` as failed.
    pub fn fail_values(&mut self, values: &[V])
    where
        V: PartialEq,
    {
        for entry in self.entries.values_mut() {
            if matches!(entry, Entry::Done(v) if values.contains(v)) {
                *entry = Entry::Failed;
            }
        }
    }

    /// Number of distinct fragments seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was seen yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::Document;

    fn ids() -> (FragmentId, FragmentId) {
        let doc = Document::parse("a: {x: 1}\nb: {y: 2}\n").unwrap();
        let a = doc.resolve("#/a").unwrap().unwrap().id;
        let b = doc.resolve("#/b").unwrap().unwrap().id;
        (a, b)
    }

    #[test]
    fn test_memoize_invokes_producer_once() {
        let (a, _) = ids();
        let mut cache = IdentityCache::<u32>::new();
        let mut calls = 0;

        let first = cache.memoize(Some(a), || {
            calls += 1;
            Ok::<_, ()>(7)
        });
        let second = cache.memoize(Some(a), || {
            calls += 1;
            Ok::<_, ()>(8)
        });

        assert_eq!(first, Some(Ok(7)));
        assert_eq!(second, Some(Ok(7)));
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_absent_fragment_is_not_cached() {
        let mut cache = IdentityCache::<u32>::new();
        let result = cache.memoize(None, || Ok::<_, ()>(1));
        assert!(result.is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failures_are_sticky() {
        let (a, b) = ids();
        let mut cache = IdentityCache::<u32>::new();
        assert_eq!(cache.memoize(Some(a), || Err("boom")), Some(Err(Some("boom"))));
        assert_eq!(cache.memoize(Some(a), || Ok::<_, &str>(1)), Some(Err(None)));

        cache.begin(b, 3);
        assert_eq!(cache.get(b), Some(Entry::InProgress(3)));
        assert_eq!(cache.get(b).and_then(|e| e.value()), Some(3));
        cache.complete(b, 3);
        assert_eq!(cache.get(b), Some(Entry::Done(3)));
    }

    #[test]
    fn test_fail_values_only_touches_finished_entries() {
        let (a, b) = ids();
        let mut cache = IdentityCache::<u32>::new();
        cache.complete(a, 1);
        cache.begin(b, 2);

        cache.fail_values(&[1, 2]);

        assert_eq!(cache.get(a), Some(Entry::Failed));
        assert_eq!(cache.get(b), Some(Entry::InProgress(2)));
    }
}
