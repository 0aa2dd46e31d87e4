//! Insertion-ordered hash set with O(1) unlink
//!
//! Every key stores the keys of its neighbours, so a key can be detached
//! from the middle of the order without scanning. The front of the set is
//! the oldest key and the back is the newest.
//!
//! ```text
//!   head                                   tail
//!    │                                      │
//!    ▼                                      ▼
//!   [a] ◄──► [b] ◄──► [c] ◄──► [d]
//!   oldest                          newest
//! ```

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct Links<K> {
    prev: Option<K>,
    next: Option<K>,
}

/// Ordered set of keys supporting O(1) append, removal and move-to-back
#[derive(Debug, Clone)]
pub struct LinkedKeySet<K> {
    links: HashMap<K, Links<K>>,
    head: Option<K>,
    tail: Option<K>,
}

impl<K> Default for LinkedKeySet<K> {
    fn default() -> Self {
        Self {
            links: HashMap::new(),
            head: None,
            tail: None,
        }
    }
}

impl<K: Eq + Hash + Clone> LinkedKeySet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.links.contains_key(key)
    }

    /// Oldest key in the set
    pub fn front(&self) -> Option<&K> {
        self.head.as_ref()
    }

    /// Newest key in the set
    pub fn back(&self) -> Option<&K> {
        self.tail.as_ref()
    }

    /// Append a key at the back. Returns `false` if the key was already present.
    pub fn push_back(&mut self, key: K) -> bool {
        if self.links.contains_key(&key) {
            return false;
        }

        let links = Links {
            prev: self.tail.clone(),
            next: None,
        };

        match self.tail.as_ref() {
            Some(tail) => {
                if let Some(tail_links) = self.links.get_mut(tail) {
                    tail_links.next = Some(key.clone());
                }
            }
            None => self.head = Some(key.clone()),
        }

        self.tail = Some(key.clone());
        self.links.insert(key, links);
        true
    }

    /// Detach a key, returning the owned key if it was present
    pub fn remove(&mut self, key: &K) -> Option<K> {
        let (owned, links) = self.links.remove_entry(key)?;

        match links.prev.as_ref() {
            Some(prev) => {
                if let Some(prev_links) = self.links.get_mut(prev) {
                    prev_links.next = links.next.clone();
                }
            }
            None => self.head = links.next.clone(),
        }

        match links.next.as_ref() {
            Some(next) => {
                if let Some(next_links) = self.links.get_mut(next) {
                    next_links.prev = links.prev.clone();
                }
            }
            None => self.tail = links.prev.clone(),
        }

        Some(owned)
    }

    /// Remove and return the oldest key
    pub fn pop_front(&mut self) -> Option<K> {
        let head = self.head.clone()?;
        self.remove(&head)
    }

    /// Move an existing key to the back. Returns `false` if the key is unknown.
    pub fn move_to_back(&mut self, key: &K) -> bool {
        if self.tail.as_ref() == Some(key) {
            return true;
        }

        match self.remove(key) {
            Some(owned) => self.push_back(owned),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            set: self,
            cursor: self.head.as_ref(),
        }
    }
}

/// Iterator over a [`LinkedKeySet`] in insertion order
pub struct Iter<'a, K> {
    set: &'a LinkedKeySet<K>,
    cursor: Option<&'a K>,
}

impl<'a, K: Eq + Hash + Clone> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self
            .set
            .links
            .get(current)
            .and_then(|links| links.next.as_ref());
        Some(current)
    }
}
