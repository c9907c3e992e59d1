/// A zero-based rank into the sorted order of a set.
///
/// Indexing a [`TreapSet`](crate::TreapSet) by `Rank` is equivalent to
/// calling [`choose`](crate::TreapSet::choose) at that position.
///
/// # Examples
///
/// ```
/// use treapset::{Rank, TreapSet};
///
/// let set = TreapSet::with_items(7, |a: &i32, b: &i32| a < b, [30, 10, 20]);
///
/// assert_eq!(set[Rank(0)], 10);
/// assert_eq!(set[Rank(2)], 30);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
