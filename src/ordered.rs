//! An unbalanced BST of plain values. Nodes own their children through `Box`es and there are no
//! parent pointers, so everything here is safe Rust. Nothing is ever rebalanced: the shape of the
//! tree is entirely decided by insertion order.
//!
//! Equal values are not rejected. A value that is not less than a node's value is routed to that
//! node's right subtree, so duplicates pile up on the right and each [`Tree::remove`] takes out
//! one of them.
//!
//! # Examples
//!
//! ```
//! use search_tree::ordered::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&50));
//!
//! for value in [50, 30, 70, 20, 40] {
//!     tree.insert(value);
//! }
//! assert_eq!(tree.to_vec(), [&20, &30, &40, &50, &70]);
//! assert!(tree.contains(&40));
//! assert!(!tree.contains(&60));
//!
//! // Removing a value hands it back.
//! assert_eq!(tree.remove(&30), Some(30));
//! assert_eq!(tree.to_vec(), [&20, &40, &50, &70]);
//!
//! // Removing something that isn't there leaves the tree alone.
//! assert_eq!(tree.remove(&999), None);
//! assert_eq!(tree.to_vec(), [&20, &40, &50, &70]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

/// The slot a parent (or the tree itself) keeps a child in.
type Link<T> = Option<Box<Node<T>>>;

/// A Binary Search Tree without any balancing. This can be used for inserting, finding, and
/// removing values, and for visiting them in ascending order.
///
/// Every operation walks the tree with a loop instead of recursing, so a degenerate (list shaped)
/// tree costs time but never stack.
pub struct Tree<T> {
    root: Link<T>,
    len: usize,
}

struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
}

impl<T> Node<T> {
    fn new_boxed(value: T) -> Box<Self> {
        Box::new(Self {
            value,
            left: None,
            right: None,
        })
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        deallocate(self.root.take());
    }
}

impl<T> Clone for Tree<T>
where
    T: Clone,
{
    /// Copies the tree node for node, so the clone has exactly the same shape.
    fn clone(&self) -> Self {
        let mut root = None;
        {
            let mut pending: Vec<(&Node<T>, &mut Link<T>)> = Vec::new();
            if let Some(source) = self.root.as_deref() {
                pending.push((source, &mut root));
            }

            while let Some((source, slot)) = pending.pop() {
                let Node { left, right, .. } =
                    &mut **slot.insert(Node::new_boxed(source.value.clone()));
                if let Some(source_left) = source.left.as_deref() {
                    pending.push((source_left, left));
                }
                if let Some(source_right) = source.right.as_deref() {
                    pending.push((source_right, right));
                }
            }
        }

        Self {
            root,
            len: self.len,
        }
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Tree<T> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Inserts the value into the tree. The tree never rejects a value: if an equal value is
    /// already stored, the new one lands in that node's right subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::ordered::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("pear");
    /// tree.insert("apple");
    /// tree.insert("pear");
    ///
    /// assert_eq!(tree.len(), 3);
    /// assert_eq!(tree.to_vec(), [&"apple", &"pear", &"pear"]);
    /// ```
    pub fn insert(&mut self, value: T)
    where
        T: Ord,
    {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if value < node.value {
                &mut node.left
            } else {
                &mut node.right
            };
        }

        *slot = Some(Node::new_boxed(value));
        self.len += 1;
    }

    /// Returns whether the tree holds a value equal to the given one.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::ordered::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&42));
    /// ```
    pub fn contains(&self, value: &T) -> bool
    where
        T: Ord,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match value.cmp(&node.value) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Equal => return true,
                Ordering::Greater => node.right.as_deref(),
            };
        }

        false
    }

    /// Removes one value equal to the given one and returns it. If the tree does not hold such a
    /// value, nothing happens and `None` is returned.
    ///
    /// The first equal node met on the way down from the root is the one removed. A node with two
    /// children is not unlinked; its in-order successor (the smallest value of its right subtree)
    /// is moved into it instead, and the successor's node is unlinked.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::ordered::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(5);
    ///
    /// assert_eq!(tree.remove(&5), Some(5));
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.remove(&5), None);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<T>
    where
        T: Ord,
    {
        let slot = locate(&mut self.root, value);
        let mut node = slot.take()?;

        let removed = match (node.left.take(), node.right.take()) {
            (None, right) => {
                *slot = right;
                node.value
            }
            (Some(left), None) => {
                *slot = Some(left);
                node.value
            }
            (Some(left), Some(right)) => {
                node.left = Some(left);
                node.right = Some(right);
                // The right subtree isn't empty so there is always a successor to take.
                let removed = take_min(&mut node.right)
                    .map(|successor| std::mem::replace(&mut node.value, successor));
                *slot = Some(node);
                removed?
            }
        };

        self.len -= 1;
        Some(removed)
    }

    /// Returns an iterator over the values in ascending order.
    ///
    /// The traversal is lazy and each call starts a new one.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::ordered::Tree;
    ///
    /// let tree: Tree<_> = [3, 1, 2].into_iter().collect();
    /// let mut iter = tree.iter();
    ///
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), Some(&3));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Collects the in-order sequence of the tree.
    pub fn to_vec(&self) -> Vec<&T> {
        self.iter().collect()
    }

    /// The number of values stored, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no values at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        deallocate(self.root.take());
        self.len = 0;
    }

    /// The smallest value in the tree.
    pub fn min(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.value)
    }

    /// The largest value in the tree. With duplicates this is the one inserted last.
    pub fn max(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.value)
    }

    /// Gets the height of this tree, i.e. how many nodes are on its longest root to leaf path.
    /// An empty tree has a height of 0 and a lone root has a height of 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::ordered::Tree;
    ///
    /// // Sorted input degenerates into a list.
    /// let tree: Tree<_> = (0..10).collect();
    /// assert_eq!(tree.height(), 10);
    ///
    /// let tree: Tree<_> = [2, 1, 3].into_iter().collect();
    /// assert_eq!(tree.height(), 2);
    /// ```
    pub fn height(&self) -> usize {
        let mut level: Vec<&Node<T>> = self.root.as_deref().into_iter().collect();
        let mut height = 0;
        while !level.is_empty() {
            height += 1;
            level = level
                .into_iter()
                .flat_map(|node| node.left.as_deref().into_iter().chain(node.right.as_deref()))
                .collect();
        }

        height
    }
}

/// Walks down from `slot` the way a lookup of `value` would and returns the slot where the walk
/// stops: either the one holding an equal value or the empty one where the value would go.
fn locate<'a, T>(mut slot: &'a mut Link<T>, value: &T) -> &'a mut Link<T>
where
    T: Ord,
{
    loop {
        let ordering = slot.as_deref().map(|node| value.cmp(&node.value));
        // Moving `slot` into the match lets the `Equal` arm hand it back out while the other arms
        // keep descending.
        match (ordering, slot) {
            (Some(Ordering::Less), Some(node)) => slot = &mut node.left,
            (Some(Ordering::Greater), Some(node)) => slot = &mut node.right,
            (_, found) => return found,
        }
    }
}

/// Unlinks the left-most node below `slot`, putting its right child in its place, and returns its
/// value.
fn take_min<T>(mut slot: &mut Link<T>) -> Option<T> {
    let leftmost = loop {
        let has_left = slot.as_deref().is_some_and(|node| node.left.is_some());
        match (has_left, slot) {
            (true, Some(node)) => slot = &mut node.left,
            (_, leftmost) => break leftmost,
        }
    };

    let node = leftmost.take()?;
    let Node { value, right, .. } = *node;
    *leftmost = right;
    Some(value)
}

/// Drops a subtree one node at a time. The derived drop glue would recurse once per level.
fn deallocate<T>(link: Link<T>) {
    let mut stack: Vec<Box<Node<T>>> = link.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

/// An in-order iterator over the values of a [`Tree`], created by [`Tree::iter`].
pub struct Iter<'a, T> {
    /// Nodes whose value hasn't been yielded yet but whose left subtree is done (or queued above
    /// them).
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(root: Option<&'a Node<T>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut link: Option<&'a Node<T>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// An owning in-order iterator over the values of a [`Tree`].
pub struct IntoIter<T> {
    stack: Vec<Box<Node<T>>>,
    remaining: usize,
}

impl<T> IntoIter<T> {
    fn push_left_spine(&mut self, mut link: Link<T>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        for node in self.stack.drain(..) {
            deallocate(Some(node));
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let Node { value, right, .. } = *node;
        self.push_left_spine(right);
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for Tree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut iter = IntoIter {
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.push_left_spine(self.root.take());
        iter
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Extend<T> for Tree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, values: I) {
        for value in values {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for Tree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(values: I) -> Self {
        let mut tree = Self::new();
        tree.extend(values);
        tree
    }
}
