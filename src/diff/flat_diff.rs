use derive_more::IsVariant;

/// One step of an edit script between two flat sequences.
///
/// `Delete` indices refer to the old sequence and `Insert` indices to the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum FlatEdit<'a, T> {
    Delete { index: usize },
    Insert { index: usize, value: &'a T },
}

impl<T> FlatEdit<'_, T> {
    pub fn index(&self) -> usize {
        match self {
            FlatEdit::Delete { index } | FlatEdit::Insert { index, .. } => *index,
        }
    }
}

/// Computes a minimal insert/delete edit script turning `old` into `new`.
///
/// The script keeps a longest common subsequence of both inputs under `equal` and describes
/// everything else as deletions and insertions; moves and updates show up as delete/insert
/// pairs. Deletions come first in descending order, followed by insertions in ascending order,
/// so the script can be applied to `old` step by step as well as read as a batch.
///
/// When a mismatch can be resolved either way without shortening the common subsequence, the
/// element of `old` is deleted first. After the common prefix and suffix are stripped this runs
/// in O(n·m·log n) time and keeps O(m·log n) table cells alive.
pub fn flat_diff<'a, T, F>(old: &[T], new: &'a [T], mut equal: F) -> Vec<FlatEdit<'a, T>>
where
    F: FnMut(&T, &T) -> bool,
{
    let prefix = old
        .iter()
        .zip(new)
        .take_while(|&(a, b)| equal(a, b))
        .count();
    let (old_rest, new_rest) = (&old[prefix..], &new[prefix..]);

    let suffix = old_rest
        .iter()
        .rev()
        .zip(new_rest.iter().rev())
        .take_while(|&(a, b)| equal(a, b))
        .count();
    let old_mid = &old_rest[..old_rest.len() - suffix];
    let new_mid = &new_rest[..new_rest.len() - suffix];

    let mut walk = Walk {
        old: old_mid,
        new: new_mid,
        equal,
        deletes: Vec::new(),
        inserts: Vec::new(),
    };
    let mut column = 0;
    if !old_mid.is_empty() {
        let last_row = vec![0; new_mid.len() + 1];
        column = walk.rows(0, old_mid.len(), 0, &last_row);
    }
    walk.inserts.extend(column..new_mid.len());

    walk.deletes
        .into_iter()
        .rev()
        .map(|index| FlatEdit::Delete {
            index: prefix + index,
        })
        .chain(walk.inserts.into_iter().map(|index| FlatEdit::Insert {
            index: prefix + index,
            value: &new[prefix + index],
        }))
        .collect()
}

/// Greedy traversal of the common-subsequence table, one row per element of `old`.
///
/// A row holds, for every column `j`, the common subsequence length of `old[i..]` and
/// `new[j..]`. Only the rows bracketing the current position are needed to decide each step, so
/// instead of storing the whole table the walk recomputes rows from the nearest kept row below,
/// halving the row range at each level.
struct Walk<'s, T, F> {
    old: &'s [T],
    new: &'s [T],
    equal: F,
    deletes: Vec<usize>,
    inserts: Vec<usize>,
}

impl<T, F> Walk<'_, T, F>
where
    F: FnMut(&T, &T) -> bool,
{
    /// Walks rows `top..bottom` starting at `column`, given row `bottom`. Returns the column at
    /// which the walk enters row `bottom`.
    fn rows(&mut self, top: usize, bottom: usize, column: usize, bottom_row: &[usize]) -> usize {
        if bottom - top == 1 {
            let mut row = vec![0; bottom_row.len()];
            self.fill_row(top, column, bottom_row, &mut row);
            return self.walk_row(top, column, &row, bottom_row);
        }

        let middle = top + (bottom - top) / 2;
        let mut middle_row = bottom_row.to_vec();
        let mut scratch = vec![0; bottom_row.len()];
        for i in (middle..bottom).rev() {
            self.fill_row(i, column, &middle_row, &mut scratch);
            std::mem::swap(&mut middle_row, &mut scratch);
        }
        drop(scratch);

        let column = self.rows(top, middle, column, &middle_row);
        drop(middle_row);
        self.rows(middle, bottom, column, bottom_row)
    }

    /// Computes row `i` from row `i + 1`. Columns left of `from` are never visited again and
    /// are not filled.
    fn fill_row(&mut self, i: usize, from: usize, below: &[usize], row: &mut [usize]) {
        let columns = self.new.len();
        row[columns] = 0;
        for j in (from..columns).rev() {
            row[j] = if (self.equal)(&self.old[i], &self.new[j]) {
                below[j + 1] + 1
            } else {
                below[j].max(row[j + 1])
            };
        }
    }

    fn walk_row(&mut self, i: usize, mut column: usize, row: &[usize], below: &[usize]) -> usize {
        while column < self.new.len() {
            if (self.equal)(&self.old[i], &self.new[column]) {
                return column + 1;
            }
            if below[column] >= row[column + 1] {
                self.deletes.push(i);
                return column;
            }
            self.inserts.push(column);
            column += 1;
        }
        self.deletes.push(i);
        column
    }
}
