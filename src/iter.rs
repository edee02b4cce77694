/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::iter::FusedIterator;

use crate::{drop_subtree, rotate, Link, Node, LEFT, RIGHT};

/// Borrowing in-order iterator over the keys of a
/// [`SplayTree`](crate::SplayTree).
pub struct Iter<'a, K> {
    // The left spine of the part not visited yet. The top is the next key.
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(root: Option<&'a Node<K>>, len: usize) -> Iter<'a, K> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut next: Option<&'a Node<K>>) {
        while let Some(node) = next {
            self.stack.push(node);
            next = node.c[LEFT as usize].as_deref();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.c[RIGHT as usize].as_deref());
        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K> ExactSizeIterator for Iter<'a, K> {}

impl<'a, K> FusedIterator for Iter<'a, K> {}

impl<'a, K> Clone for Iter<'a, K> {
    fn clone(&self) -> Iter<'a, K> {
        Iter {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

/// Owning in-order iterator over the keys of a
/// [`SplayTree`](crate::SplayTree).
///
/// The tree is taken apart as the iterator advances: left children are
/// rotated up until the current node has none, then that node is yielded.
/// No extra memory is needed beyond the nodes themselves.
pub struct IntoIter<K> {
    next: Link<K>,
    remaining: usize,
}

impl<K> IntoIter<K> {
    pub(crate) fn new(root: Link<K>, len: usize) -> IntoIter<K> {
        IntoIter {
            next: root,
            remaining: len,
        }
    }
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        loop {
            let node = self.next.take()?;
            if node.c[LEFT as usize].is_some() {
                self.next = Some(rotate(node, LEFT));
                continue;
            }
            let Node {
                c: [_, right],
                key,
            } = *node;
            self.next = right;
            self.remaining -= 1;
            return Some(key);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}

impl<K> FusedIterator for IntoIter<K> {}

impl<K> Drop for IntoIter<K> {
    fn drop(&mut self) {
        drop_subtree(self.next.take());
    }
}
