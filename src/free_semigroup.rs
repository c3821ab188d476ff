//! Free semigroup used to accumulate decode errors.
//!
//! [`FreeSemigroup`] is an unflattened binary tree: combining two values is a
//! constant-time allocation of a new node and never looks inside either side.
//! Consumers normalize on demand, either with [`FreeSemigroup::fold`] or by
//! enumerating the leaves left-to-right.
//!
//! There is deliberately no empty value. "No errors" is expressed by the
//! surrounding [`Validation`](stillwater::Validation) succeeding.

use stillwater::prelude::*;

/// A non-empty, associative accumulation of `A` values.
///
/// # Example
///
/// ```rust
/// use schemable::FreeSemigroup;
///
/// let left = FreeSemigroup::concat(FreeSemigroup::of(1), FreeSemigroup::of(2));
/// let all = FreeSemigroup::concat(left, FreeSemigroup::of(3));
///
/// assert_eq!(all.to_vec(), vec![1, 2, 3]);
/// assert_eq!(all.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FreeSemigroup<A> {
    /// A single value.
    Of(Box<A>),
    /// Two accumulations, left before right.
    Concat(Box<FreeSemigroup<A>>, Box<FreeSemigroup<A>>),
}

impl<A> FreeSemigroup<A> {
    /// Creates a leaf holding one value.
    pub fn of(value: A) -> Self {
        FreeSemigroup::Of(Box::new(value))
    }

    /// Joins two accumulations without inspecting them.
    pub fn concat(left: Self, right: Self) -> Self {
        FreeSemigroup::Concat(Box::new(left), Box::new(right))
    }

    /// Joins `first` and every item of `rest`, preserving leaf order.
    ///
    /// The resulting tree is balanced, so accumulating thousands of sibling
    /// failures does not produce a tree thousands of levels deep.
    pub fn concat_all(first: Self, rest: impl IntoIterator<Item = Self>) -> Self {
        let mut head = first;
        let mut tail: Vec<Self> = rest.into_iter().collect();
        while !tail.is_empty() {
            let mut items = tail.into_iter();
            let mut next = Vec::with_capacity(items.len() / 2);
            head = match items.next() {
                Some(second) => Self::concat(head, second),
                None => head,
            };
            while let Some(left) = items.next() {
                match items.next() {
                    Some(right) => next.push(Self::concat(left, right)),
                    None => next.push(left),
                }
            }
            tail = next;
        }
        head
    }

    /// Structural catamorphism: `on_of` at every leaf, `on_concat` at every node.
    pub fn fold<B>(&self, on_of: impl Fn(&A) -> B, on_concat: impl Fn(B, B) -> B) -> B {
        fn go<A, B>(
            node: &FreeSemigroup<A>,
            on_of: &dyn Fn(&A) -> B,
            on_concat: &dyn Fn(B, B) -> B,
        ) -> B {
            match node {
                FreeSemigroup::Of(value) => on_of(value),
                FreeSemigroup::Concat(left, right) => {
                    let l = go(left, on_of, on_concat);
                    let r = go(right, on_of, on_concat);
                    on_concat(l, r)
                }
            }
        }
        go(self, &on_of, &on_concat)
    }

    /// Maps every leaf, keeping the tree shape.
    pub fn map<B>(self, f: impl Fn(A) -> B) -> FreeSemigroup<B> {
        fn go<A, B>(node: FreeSemigroup<A>, f: &dyn Fn(A) -> B) -> FreeSemigroup<B> {
            match node {
                FreeSemigroup::Of(value) => FreeSemigroup::of(f(*value)),
                FreeSemigroup::Concat(left, right) => {
                    FreeSemigroup::Concat(Box::new(go(*left, f)), Box::new(go(*right, f)))
                }
            }
        }
        go(self, &f)
    }

    /// Iterates over the leaves from left to right.
    pub fn iter(&self) -> Leaves<'_, A> {
        Leaves { stack: vec![self] }
    }

    /// Returns the number of leaves.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a free semigroup holds at least one value.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the first leaf in enumeration order.
    pub fn first(&self) -> &A {
        let mut node = self;
        loop {
            match node {
                FreeSemigroup::Of(value) => return value.as_ref(),
                FreeSemigroup::Concat(left, _) => node = left,
            }
        }
    }

    /// Collects the leaves into a vector, left to right.
    pub fn to_vec(&self) -> Vec<A>
    where
        A: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Consumes the tree and returns its leaves, left to right.
    pub fn into_vec(self) -> Vec<A> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                FreeSemigroup::Of(value) => out.push(*value),
                FreeSemigroup::Concat(left, right) => {
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }
        out
    }
}

/// Left-to-right iterator over the leaves of a [`FreeSemigroup`].
#[derive(Debug)]
pub struct Leaves<'a, A> {
    stack: Vec<&'a FreeSemigroup<A>>,
}

impl<'a, A> Iterator for Leaves<'a, A> {
    type Item = &'a A;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                FreeSemigroup::Of(value) => return Some(value.as_ref()),
                FreeSemigroup::Concat(left, right) => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
            }
        }
        None
    }
}

impl<'a, A> IntoIterator for &'a FreeSemigroup<A> {
    type Item = &'a A;
    type IntoIter = Leaves<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<A: Clone> Semigroup for FreeSemigroup<A> {
    fn combine(self, other: Self) -> Self {
        FreeSemigroup::concat(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn of(n: i32) -> FreeSemigroup<i32> {
        FreeSemigroup::of(n)
    }

    #[test]
    fn test_single_leaf() {
        let fs = of(7);
        assert_eq!(fs.len(), 1);
        assert_eq!(fs.first(), &7);
        assert_eq!(fs.to_vec(), vec![7]);
    }

    #[test]
    fn test_concat_preserves_order() {
        let fs = FreeSemigroup::concat(FreeSemigroup::concat(of(1), of(2)), of(3));
        assert_eq!(fs.to_vec(), vec![1, 2, 3]);
        assert_eq!(fs.into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_concat_is_lazy_about_shape() {
        let fs = FreeSemigroup::concat(of(1), of(2));
        assert!(matches!(fs, FreeSemigroup::Concat(_, _)));
    }

    #[test]
    fn test_associativity_flattens_identically() {
        let left = FreeSemigroup::concat(FreeSemigroup::concat(of(1), of(2)), of(3));
        let right = FreeSemigroup::concat(of(1), FreeSemigroup::concat(of(2), of(3)));
        assert_ne!(left, right);
        assert_eq!(left.to_vec(), right.to_vec());
    }

    #[test]
    fn test_fold_counts_and_sums() {
        let fs = FreeSemigroup::concat(of(1), FreeSemigroup::concat(of(2), of(3)));
        assert_eq!(fs.fold(|n| *n, |a, b| a + b), 6);
        assert_eq!(fs.fold(|_| 1, |a, b| a + b), 3);
        let depth = fs.fold(|_| 0, |a: usize, b: usize| 1 + a.max(b));
        assert_eq!(depth, 2);
    }

    #[test]
    fn test_map_keeps_order() {
        let fs = FreeSemigroup::concat(of(1), of(2)).map(|n| n * 10);
        assert_eq!(fs.to_vec(), vec![10, 20]);
    }

    #[test]
    fn test_concat_all_is_balanced() {
        let fs = FreeSemigroup::concat_all(of(0), (1..1024).map(of));
        assert_eq!(fs.to_vec(), (0..1024).collect::<Vec<_>>());
        let depth = fs.fold(|_| 0, |a: usize, b: usize| 1 + a.max(b));
        assert_eq!(depth, 10);
    }

    #[test]
    fn test_concat_all_odd_length() {
        let fs = FreeSemigroup::concat_all(of(0), (1..5).map(of));
        assert_eq!(fs.to_vec(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_concat_all_single_item() {
        let fs = FreeSemigroup::concat_all(of(9), Vec::new());
        assert_eq!(fs, of(9));
    }

    #[test]
    fn test_concat_all_depth_for_three() {
        let fs = FreeSemigroup::concat_all(of(1), vec![of(2), of(3)]);
        assert_eq!(fs.to_vec(), vec![1, 2, 3]);
        let depth = fs.fold(|_| 0, |a: usize, b: usize| 1 + a.max(b));
        assert_eq!(depth, 2);
    }

    #[test]
    fn test_nested_error_tree_is_sized() {
        #[derive(Debug, Clone, PartialEq)]
        enum Node {
            Leaf(i32),
            Children(FreeSemigroup<Node>),
        }

        let inner = FreeSemigroup::concat(
            FreeSemigroup::of(Node::Leaf(1)),
            FreeSemigroup::of(Node::Leaf(2)),
        );
        let outer = FreeSemigroup::of(Node::Children(inner.clone()));
        assert_eq!(outer.first(), &Node::Children(inner));
    }

    #[test]
    fn test_semigroup_combine() {
        let fs = of(1).combine(of(2)).combine(of(3));
        assert_eq!(fs.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_first_is_leftmost() {
        let fs = FreeSemigroup::concat(FreeSemigroup::concat(of(4), of(5)), of(6));
        assert_eq!(fs.first(), &4);
    }
}
