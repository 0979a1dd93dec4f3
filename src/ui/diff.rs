/// Minimal edit scripts between two ordered lists
///
/// The grid only ever needs insertions and removals: an item's identity is
/// its content, so there is nothing to update in place, and a moved item is
/// expressed as a removal plus an insertion.

/// One step of an edit script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    /// Remove the element currently at `index`
    Remove { index: usize },
    /// Insert `item` so that it ends up at `index`
    Insert { index: usize, item: T },
}

/// Compute the shortest insert/remove script turning `old` into `new`.
///
/// Removals come first, in descending index order, so each index still refers
/// to `old`. Insertions follow in ascending index order, each at its final
/// position in `new`. Applying the script with [`apply`] yields `new`.
pub fn diff<T: PartialEq + Clone>(old: &[T], new: &[T]) -> Vec<Edit<T>> {
    // Common prefix and suffix never need edits
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let (keep_old, keep_new) = lcs_marks(old_mid, new_mid);

    let removals = keep_old
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, keep)| !**keep)
        .map(|(i, _)| Edit::Remove { index: prefix + i });

    let insertions = keep_new
        .iter()
        .enumerate()
        .filter(|(_, keep)| !**keep)
        .map(|(j, _)| Edit::Insert {
            index: prefix + j,
            item: new_mid[j].clone(),
        });

    removals.chain(insertions).collect()
}

/// Apply a script produced by [`diff`] to a list in place.
pub fn apply<T: Clone>(list: &mut Vec<T>, script: &[Edit<T>]) {
    for edit in script {
        match edit {
            Edit::Remove { index } => {
                list.remove(*index);
            }
            Edit::Insert { index, item } => list.insert(*index, item.clone()),
        }
    }
}

/// Mark which elements of each side belong to one longest common subsequence.
fn lcs_marks<T: PartialEq>(old: &[T], new: &[T]) -> (Vec<bool>, Vec<bool>) {
    let (n, m) = (old.len(), new.len());
    let mut keep_old = vec![false; n];
    let mut keep_new = vec![false; m];
    if n == 0 || m == 0 {
        return (keep_old, keep_new);
    }

    // lengths[i][j] = LCS length of old[i..] and new[j..]
    let mut lengths = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lengths[i][j] = if old[i] == new[j] {
                lengths[i + 1][j + 1] + 1
            } else {
                lengths[i + 1][j].max(lengths[i][j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            keep_old[i] = true;
            keep_new[j] = true;
            i += 1;
            j += 1;
        } else if lengths[i + 1][j] >= lengths[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    (keep_old, keep_new)
}
