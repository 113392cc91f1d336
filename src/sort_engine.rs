//! In-place comparator-driven sort over a [`LineStore`] index.

use crate::compare::LineComparator;
use crate::error::SortResult;
use crate::line_store::LineStore;

/// Work done by one [`sort`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortStats {
    pub comparisons: u64,
    pub swaps: u64,
}

/// Reorder `store` so that each position holds a `cmp`-minimal remaining line.
///
/// For every `i`, every later `j` is compared against the line currently at
/// `i`, and the two are swapped whenever `cmp` says line `i` does not precede
/// line `j`. O(n²) comparisons, no extra storage, not stable: lines the
/// comparator treats as equal still get swapped.
pub fn sort<C>(store: &mut LineStore, cmp: &C) -> SortResult<SortStats>
where
    C: LineComparator + ?Sized,
{
    let n = store.line_count();
    let mut stats = SortStats::default();

    for i in 0..n {
        for j in i + 1..n {
            let keep = cmp.precedes(store.line(i)?, store.line(j)?);
            stats.comparisons += 1;
            if !keep {
                store.swap(i, j)?;
                stats.swaps += 1;
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{LexLess, RhymeLess};
    use proptest::prelude::*;

    fn sorted(input: &[u8], cmp: &dyn LineComparator) -> Vec<u8> {
        let mut store = LineStore::load(input.to_vec());
        sort(&mut store, cmp).expect("sort");
        let mut out = Vec::new();
        store.write_to(&mut out).expect("write");
        out
    }

    #[test]
    fn test_lexicographic_sort() {
        assert_eq!(sorted(b"banana\napple\ncherry", &LexLess), b"apple\nbanana\ncherry\n");
        assert_eq!(sorted(b"b\na", &LexLess), b"a\nb\n");
    }

    #[test]
    fn test_trailing_newline_segment_sorts_first() {
        assert_eq!(
            sorted(b"banana\napple\ncherry\n", &LexLess),
            b"\napple\nbanana\ncherry\n"
        );
    }

    #[test]
    fn test_rhyme_sort() {
        let input = b"the cat\nof the night,\nwith light\nsat!\nbring";
        assert_eq!(
            sorted(input, &RhymeLess),
            b"bring\nthe cat\nsat!\nwith light\nof the night,\n"
        );
    }

    #[test]
    fn test_equal_lines_are_swapped() {
        let mut store = LineStore::load(b"dup\ndup".to_vec());
        let first = store.descriptor(0).expect("descriptor");
        let stats = sort(&mut store, &LexLess).expect("sort");
        assert_eq!(stats, SortStats { comparisons: 1, swaps: 1 });
        assert_eq!(store.descriptor(1).expect("descriptor"), first);
    }

    #[test]
    fn test_comparator_reevaluated_against_current_occupant() {
        // 3 2 1: after swapping 3 and 2, position 0 holds 2, which then loses to 1
        let mut store = LineStore::load(b"3\n2\n1".to_vec());
        let stats = sort(&mut store, &LexLess).expect("sort");
        assert_eq!(stats.comparisons, 3);
        assert_eq!(stats.swaps, 3);
        let lines: Vec<_> = store.lines().collect();
        assert_eq!(lines, vec![&b"1"[..], b"2", b"3"]);
    }

    #[test]
    fn test_single_line_needs_no_comparisons() {
        let mut store = LineStore::load(b"only".to_vec());
        assert_eq!(sort(&mut store, &LexLess).expect("sort"), SortStats::default());
    }

    #[test]
    fn test_closure_comparator_sorts_by_length() {
        let mut store = LineStore::load(b"ccc\na\nbb".to_vec());
        let shorter = |a: &[u8], b: &[u8]| a.len() < b.len();
        sort(&mut store, &shorter).expect("sort");
        let lines: Vec<_> = store.lines().collect();
        assert_eq!(lines, vec![&b"a"[..], b"bb", b"ccc"]);
    }

    #[test]
    fn test_rhyme_punctuation_breaks_transitivity() {
        // "...ab" < "cb" by letters, "cb" < "..b" and "..b" < "...ab" by byte length
        let input = b"...ab\ncb\n..b";
        let mut store = LineStore::load(input.to_vec());
        sort(&mut store, &RhymeLess).expect("sort");
        let first: Vec<_> = store.lines().map(<[u8]>::to_vec).collect();
        assert_eq!(first, vec![b"..b".to_vec(), b"...ab".to_vec(), b"cb".to_vec()]);

        sort(&mut store, &RhymeLess).expect("sort");
        let second: Vec<_> = store.lines().map(<[u8]>::to_vec).collect();
        assert_eq!(second, vec![b"cb".to_vec(), b"..b".to_vec(), b"...ab".to_vec()]);
    }

    fn joined(pattern: &'static str) -> impl Strategy<Value = Vec<u8>> {
        proptest::collection::vec(pattern, 1..12)
            .prop_map(|lines| lines.join("\n").into_bytes())
    }

    fn sort_twice(input: Vec<u8>, cmp: &dyn LineComparator) -> (Vec<Vec<u8>>, Vec<Vec<u8>>) {
        let mut store = LineStore::load(input);
        sort(&mut store, cmp).expect("sort");
        let first = store.lines().map(<[u8]>::to_vec).collect();
        sort(&mut store, cmp).expect("sort");
        let second = store.lines().map(<[u8]>::to_vec).collect();
        (first, second)
    }

    proptest! {
        #[test]
        fn prop_lex_sort_matches_byte_order(input in joined("[a-d!. ]{0,5}")) {
            let mut store = LineStore::load(input.clone());
            sort(&mut store, &LexLess).expect("sort");

            let mut expected: Vec<&[u8]> = input.split(|&b| b == b'\n').collect();
            expected.sort();
            let actual: Vec<&[u8]> = store.lines().collect();
            prop_assert_eq!(actual, expected);
            prop_assert!(store.is_ordered_by(&|a: &[u8], b: &[u8]| a <= b));
        }

        #[test]
        fn prop_lex_sort_is_idempotent(input in joined("[a-d!. ]{0,5}")) {
            let (first, second) = sort_twice(input, &LexLess);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_rhyme_sort_is_idempotent_on_words(input in joined("[a-d]{0,5}")) {
            let (first, second) = sort_twice(input, &RhymeLess);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_sort_keeps_line_multiset(input in joined("[a-d!. ]{0,5}")) {
            let mut store = LineStore::load(input.clone());
            sort(&mut store, &RhymeLess).expect("sort");

            let mut expected: Vec<&[u8]> = input.split(|&b| b == b'\n').collect();
            let mut actual: Vec<&[u8]> = store.lines().collect();
            expected.sort();
            actual.sort();
            prop_assert_eq!(actual, expected);
        }
    }
}
