/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! A self-adjusting binary search tree. Every access splays the accessed key
//! (or the neighbour where the search stopped) to the root, which gives
//! amortized `O(log n)` insert, delete and search.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use compare::{natural, Compare, Natural};
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

mod iter;

pub use iter::{IntoIter, Iter};

const LEFT: bool = false;
const RIGHT: bool = true;

type Link<K> = Option<Box<Node<K>>>;

struct Node<K> {
    // c[0] is the left child, c[1] the right one.
    c: [Link<K>; 2],
    key: K,
}

impl<K> Node<K> {
    fn new(key: K) -> Box<Node<K>> {
        Box::new(Node {
            c: [None, None],
            key,
        })
    }
}

// Promote the child of x on `side`. side == LEFT is a right rotation.
// If x has no child on `side` it is returned as is.
fn rotate<K>(mut x: Box<Node<K>>, side: bool) -> Box<Node<K>> {
    let mut y = match x.c[side as usize].take() {
        Some(y) => y,
        None => return x,
    };
    x.c[side as usize] = y.c[!side as usize].take();
    y.c[!side as usize] = Some(x);
    y
}

// Returns the new root of the subtree. If key is absent, the root will be the
// node where the descent stopped.
//
// The descent goes two levels at a time. Each step leaves behind a frame
// (x, side, y, inner): x with its child y on `side` detached, and y with its
// child on `inner` detached. The splayed grandchild subtree is then hung back
// below y on the way up, followed by the zig-zig or zig-zag relink and the
// rotation of x.
fn splay<K, C>(root: Link<K>, key: &K, cmp: &C) -> Link<K>
where
    C: Compare<K>,
{
    let mut path: Vec<(Box<Node<K>>, bool, Box<Node<K>>, bool)> = Vec::new();
    let mut next = root;
    let mut ret = loop {
        let mut x = match next {
            Some(x) => x,
            None => break None,
        };
        let side = match cmp.compare(key, &x.key) {
            Ordering::Equal => break Some(x),
            ord => ord == Ordering::Greater,
        };
        let mut y = match x.c[side as usize].take() {
            Some(y) => y,
            None => break Some(x),
        };
        let inner = match cmp.compare(key, &y.key) {
            Ordering::Equal => {
                // Zig
                x.c[side as usize] = Some(y);
                break Some(rotate(x, side));
            }
            ord => ord == Ordering::Greater,
        };
        next = y.c[inner as usize].take();
        path.push((x, side, y, inner));
    };
    while let Some((mut x, side, mut y, inner)) = path.pop() {
        y.c[inner as usize] = ret;
        if inner == side {
            // Zig-zig
            x.c[side as usize] = Some(y);
            x = rotate(x, side);
        } else {
            // Zig-zag
            if y.c[inner as usize].is_some() {
                y = rotate(y, inner);
            }
            x.c[side as usize] = Some(y);
        }
        ret = if x.c[side as usize].is_some() {
            Some(rotate(x, side))
        } else {
            Some(x)
        };
    }
    ret
}

// Frees the subtree without recursion by rotating left children up until the
// current node has none.
fn drop_subtree<K>(mut next: Link<K>) {
    while let Some(mut node) = next {
        next = if node.c[LEFT as usize].is_some() {
            Some(rotate(node, LEFT))
        } else {
            node.c[RIGHT as usize].take()
        };
    }
}

// Post-order copy driven by an explicit stack, so that path-shaped trees do
// not exhaust the call stack.
fn clone_subtree<K: Clone>(root: &Node<K>) -> Link<K> {
    let mut todo: Vec<(Option<&Node<K>>, bool)> = vec![(Some(root), false)];
    let mut done: Vec<Link<K>> = Vec::new();
    while let Some((node, children_done)) = todo.pop() {
        let node = match node {
            Some(node) => node,
            None => {
                done.push(None);
                continue;
            }
        };
        if children_done {
            let right = done.pop().flatten();
            let left = done.pop().flatten();
            done.push(Some(Box::new(Node {
                c: [left, right],
                key: node.key.clone(),
            })));
        } else {
            todo.push((Some(node), true));
            todo.push((node.c[RIGHT as usize].as_deref(), false));
            todo.push((node.c[LEFT as usize].as_deref(), false));
        }
    }
    done.pop().flatten()
}

/// An ordered set of unique keys stored in a splay tree.
///
/// The order is given by the comparator `C`, which defaults to the keys' own
/// [`Ord`] implementation.
///
/// Lookups go through [`search`](SplayTree::search), which takes `&mut self`:
/// a search restructures the tree whether it hits or misses.
pub struct SplayTree<K, C = Natural<K>> {
    root: Link<K>,
    len: usize,
    cmp: C,
}

impl<K: Ord> SplayTree<K> {
    pub fn new() -> SplayTree<K> {
        SplayTree::with_comparator(natural())
    }
}

impl<K, C> SplayTree<K, C> {
    /// Creates an empty tree ordered by `cmp`.
    ///
    /// Any `Fn(&K, &K) -> Ordering` closure is a comparator. It must define a
    /// total order; an inconsistent one leaves the tree in an unspecified
    /// (but memory safe) state.
    pub fn with_comparator(cmp: C) -> SplayTree<K, C> {
        SplayTree {
            root: None,
            len: 0,
            cmp,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The key currently at the root, i.e. the last one touched by an access.
    /// Does not restructure the tree.
    pub fn root_key(&self) -> Option<&K> {
        self.root.as_ref().map(|root| &root.key)
    }

    pub fn clear(&mut self) {
        drop_subtree(self.root.take());
        self.len = 0;
    }

    /// Visits the keys in ascending order without restructuring the tree.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self.root.as_deref(), self.len)
    }
}

impl<K, C: Compare<K>> SplayTree<K, C> {
    fn splay(&mut self, key: &K) {
        self.root = splay(self.root.take(), key, &self.cmp);
    }

    /// Inserts `key` and makes it the root.
    ///
    /// Returns `false` and keeps the stored key if an equal key is already
    /// present. The tree is splayed either way.
    pub fn insert(&mut self, key: K) -> bool {
        self.splay(&key);
        let mut root = match self.root.take() {
            Some(root) => root,
            None => {
                self.root = Some(Node::new(key));
                self.len += 1;
                return true;
            }
        };
        let side = match self.cmp.compare(&key, &root.key) {
            Ordering::Equal => {
                self.root = Some(root);
                return false;
            }
            ord => ord == Ordering::Greater,
        };
        // The old root keeps the keys on the far side of the new key.
        let mut n = Node::new(key);
        n.c[side as usize] = root.c[side as usize].take();
        n.c[!side as usize] = Some(root);
        self.root = Some(n);
        self.len += 1;
        true
    }

    /// Returns whether `key` is present.
    ///
    /// On a hit `key` becomes the root. On a miss the root is the node at
    /// which the splay stopped, which is a neighbour of `key`.
    pub fn search(&mut self, key: &K) -> bool {
        self.splay(key);
        match self.root {
            Some(ref root) => self.cmp.compare(key, &root.key) == Ordering::Equal,
            None => false,
        }
    }

    /// Removes `key` and returns the key that was stored, if any.
    pub fn take(&mut self, key: &K) -> Option<K> {
        if !self.search(key) {
            return None;
        }
        let root = self.root.take()?;
        let Node {
            c: [left, right],
            key,
        } = *root;
        self.root = match (left, right) {
            (None, right) => right,
            (left, None) => left,
            (Some(left), Some(right)) => {
                // Every key on the right is greater than `key`, so the splay
                // brings up the minimum, which has no left child.
                match splay(Some(right), &key, &self.cmp) {
                    Some(mut successor) => {
                        debug_assert!(successor.c[LEFT as usize].is_none());
                        successor.c[LEFT as usize] = Some(left);
                        Some(successor)
                    }
                    None => Some(left),
                }
            }
        };
        self.len -= 1;
        Some(key)
    }

    /// Removes `key`. Returns whether it was present.
    ///
    /// If it was absent the tree is still splayed, as by
    /// [`search`](SplayTree::search).
    pub fn delete(&mut self, key: &K) -> bool {
        self.take(key).is_some()
    }
}

// Reverse in-order walk (right, node, left) over an explicit stack.
fn write_subtree<K, W>(root: &Node<K>, w: &mut W) -> fmt::Result
where
    K: fmt::Display,
    W: fmt::Write,
{
    let mut stack: Vec<(&Node<K>, usize)> = Vec::new();
    let mut next = Some((root, 0));
    loop {
        while let Some((node, depth)) = next {
            stack.push((node, depth));
            next = node.c[RIGHT as usize].as_deref().map(|c| (c, depth + 1));
        }
        let (node, depth) = match stack.pop() {
            Some(top) => top,
            None => return Ok(()),
        };
        writeln!(w, "{:indent$}-> {}", "", node.key, indent = depth * 4)?;
        next = node.c[LEFT as usize].as_deref().map(|c| (c, depth + 1));
    }
}

impl<K: fmt::Display, C> SplayTree<K, C> {
    /// Dumps the shape of the tree, one key per line. The right subtree comes
    /// first and every level is indented by four spaces, so the output reads
    /// as the tree turned 90 degrees counter-clockwise.
    pub fn write_tree<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        match self.root {
            Some(ref root) => write_subtree(root, w),
            None => Ok(()),
        }
    }

    // Only for DEBUG
    #[cfg(feature = "std")]
    pub fn print_tree(&self) {
        let mut out = String::new();
        if self.write_tree(&mut out).is_ok() {
            print!("{}", out);
        }
    }
}

impl<K, C> Drop for SplayTree<K, C> {
    fn drop(&mut self) {
        drop_subtree(self.root.take());
    }
}

impl<K: Ord> Default for SplayTree<K> {
    fn default() -> SplayTree<K> {
        SplayTree::new()
    }
}

impl<K: Clone, C: Clone> Clone for SplayTree<K, C> {
    fn clone(&self) -> SplayTree<K, C> {
        SplayTree {
            root: self.root.as_deref().and_then(clone_subtree),
            len: self.len,
            cmp: self.cmp.clone(),
        }
    }
}

impl<K: fmt::Debug, C> fmt::Debug for SplayTree<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// Two trees are equal if they hold the same keys, whatever their shapes.
impl<K: PartialEq, C> PartialEq for SplayTree<K, C> {
    fn eq(&self, other: &SplayTree<K, C>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, C> Eq for SplayTree<K, C> {}

impl<K: Ord> FromIterator<K> for SplayTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> SplayTree<K> {
        let mut tree = SplayTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K, C: Compare<K>> Extend<K> for SplayTree<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K, C> IntoIterator for &'a SplayTree<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<K, C> IntoIterator for SplayTree<K, C> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(mut self) -> IntoIter<K> {
        let len = self.len;
        self.len = 0;
        IntoIter::new(self.root.take(), len)
    }
}

// Only the keys are serialized, in ascending order. The shape is not kept.
impl<K: Serialize, C> Serialize for SplayTree<K, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

struct KeysVisitor<K> {
    marker: PhantomData<fn() -> K>,
}

impl<'de, K> Visitor<'de> for KeysVisitor<K>
where
    K: Ord + Deserialize<'de>,
{
    type Value = SplayTree<K>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence of keys")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<SplayTree<K>, A::Error> {
        let mut tree = SplayTree::new();
        while let Some(key) = seq.next_element()? {
            tree.insert(key);
        }
        Ok(tree)
    }
}

impl<'de, K> Deserialize<'de> for SplayTree<K>
where
    K: Ord + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<SplayTree<K>, D::Error> {
        deserializer.deserialize_seq(KeysVisitor {
            marker: PhantomData,
        })
    }
}
