use search_tree::Tree;

use std::collections::{BTreeMap, HashSet};

use quickcheck_macros::quickcheck;

use crate::Op;

/// Applies a set of operations to a tree and to a map of value counts.
/// This way we can ensure that after a random smattering of inserts
/// and removals we have the same values, with the same multiplicity.
fn do_ops<T>(ops: &[Op<T>], tree: &mut Tree<T>, counts: &mut BTreeMap<T, usize>)
where
    T: Ord + Clone,
{
    for op in ops {
        match op {
            Op::Insert(value) => {
                tree.insert(value.clone());
                *counts.entry(value.clone()).or_default() += 1;
            }
            Op::Remove(value) => {
                let removed = tree.remove(value).is_some();
                let present = match counts.get_mut(value) {
                    Some(count) => {
                        *count -= 1;
                        if *count == 0 {
                            counts.remove(value);
                        }
                        true
                    }
                    None => false,
                };
                assert_eq!(removed, present);
            }
        }
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut counts = BTreeMap::new();

    do_ops(&ops, &mut tree, &mut counts);
    let expected = counts
        .iter()
        .flat_map(|(value, &count)| std::iter::repeat(value).take(count));

    tree.iter().eq(expected) && counts.keys().all(|value| tree.contains(value))
}

#[quickcheck]
fn in_order_is_sorted(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let mut sorted = xs;
    sorted.sort();

    tree.len() == sorted.len() && tree.iter().eq(sorted.iter())
}

#[quickcheck]
fn text_in_order_is_sorted(xs: Vec<String>) -> bool {
    let tree: Tree<_> = xs.iter().cloned().collect();
    tree.iter().zip(tree.iter().skip(1)).all(|(a, b)| a <= b)
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();

    xs.iter().all(|x| tree.contains(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !tree.contains(x))
}

#[quickcheck]
fn with_removals(xs: Vec<i8>, removals: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    for removal in &removals {
        // We may have inserted the same value multiple times - remove each one.
        while tree.remove(removal).is_some() {}
    }

    let mut still_present = xs;
    still_present.retain(|x| !removals.contains(x));

    removals.iter().all(|x| !tree.contains(x))
        && still_present.iter().all(|x| tree.contains(x))
        && tree.len() == still_present.len()
}

#[quickcheck]
fn removing_once_drops_exactly_one_copy(xs: Vec<i8>, pick: usize) -> bool {
    if xs.is_empty() {
        return true;
    }
    let target = xs[pick % xs.len()];
    let mut tree: Tree<_> = xs.iter().copied().collect();
    let mut expected: Vec<i8> = tree.iter().copied().collect();
    let at = expected.iter().position(|&x| x == target).unwrap();
    expected.remove(at);

    tree.remove(&target) == Some(target) && tree.iter().copied().eq(expected)
}

#[quickcheck]
fn removing_absent_value_changes_nothing(xs: Vec<i8>, absent: i8) -> bool {
    if xs.contains(&absent) {
        return true;
    }
    let mut tree: Tree<_> = xs.iter().copied().collect();
    let before: Vec<i8> = tree.iter().copied().collect();
    let height = tree.height();

    tree.remove(&absent).is_none()
        && tree.iter().copied().eq(before)
        && tree.height() == height
}

#[quickcheck]
fn iterating_twice_gives_the_same_sequence(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.into_iter().collect();
    tree.iter().eq(tree.iter())
}

#[quickcheck]
fn owned_iteration_matches_borrowed(xs: Vec<i16>) -> bool {
    let tree: Tree<_> = xs.into_iter().collect();
    let borrowed: Vec<i16> = tree.iter().copied().collect();
    tree.into_iter().eq(borrowed)
}
