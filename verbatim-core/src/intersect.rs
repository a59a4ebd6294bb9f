//! Multi-way intersection of sorted ID lists.
//!
//! Posting lists are sorted because IDs are handed out in increasing order
//! and only ever appended, so the lists can be merged in a single pass:
//!
//! ```text
//!   list 0:  [3] 7  9  12          heads 3,3,5 → not all equal,
//!   list 1:  [3] 9  12                 advance lists at the minimum (0, 1)
//!   list 2:  [5] 9  12  20
//! ```
//!
//! A value missing from the head of one list cannot appear later in it, so
//! advancing the lists holding the minimum never skips a common value.
//! Total work is O(sum of list lengths).

use crate::types::EntryId;

/// IDs present in every list whose `mask` slot is `true`.
///
/// Slots beyond the end of `mask` count as inactive. With no active lists,
/// or an empty active list, the result is empty. Input lists must be sorted
/// ascending without duplicates; the output then is too.
pub fn intersect_sorted<L: AsRef<[EntryId]>>(lists: &[L], mask: &[bool]) -> Vec<EntryId> {
    let active: Vec<&[EntryId]> = lists
        .iter()
        .enumerate()
        .filter(|(i, _)| mask.get(*i).copied().unwrap_or(false))
        .map(|(_, list)| list.as_ref())
        .collect();

    let Some(shortest) = active.iter().map(|l| l.len()).min() else {
        return Vec::new();
    };
    if shortest == 0 {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(shortest);
    let mut heads = vec![0usize; active.len()];

    'merge: loop {
        let mut smallest = active[0][heads[0]];
        let mut all_same = true;
        for (list, &head) in active.iter().zip(&heads).skip(1) {
            let value = list[head];
            if value != smallest {
                all_same = false;
                smallest = smallest.min(value);
            }
        }

        if all_same {
            result.push(smallest);
        }

        for (list, head) in active.iter().zip(heads.iter_mut()) {
            if list[*head] == smallest {
                *head += 1;
                if *head == list.len() {
                    break 'merge;
                }
            }
        }
    }

    result
}
