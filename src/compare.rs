//! Line ordering predicates used by the sort engine.
//! Every predicate answers "does `a` sort no later than `b`" over raw line bytes.
use crate::config::SortMode;

/// Ordering capability injected into [`crate::sort_engine::sort`].
///
/// `precedes(a, b)` returning `true` asserts that `a` sorts no later than `b`.
/// It does not have to be a strict weak ordering, but it must be deterministic
/// and free of side effects. The engine swaps whenever it returns `false`,
/// including for lines the predicate considers equal.
pub trait LineComparator {
    fn precedes(&self, a: &[u8], b: &[u8]) -> bool;
}

impl<F> LineComparator for F
where
    F: Fn(&[u8], &[u8]) -> bool,
{
    #[inline]
    fn precedes(&self, a: &[u8], b: &[u8]) -> bool {
        self(a, b)
    }
}

/// Forward byte-wise ordering with a shorter-first fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexLess;

impl LineComparator for LexLess {
    #[inline]
    fn precedes(&self, a: &[u8], b: &[u8]) -> bool {
        lex_less(a, b)
    }
}

/// Backward ordering over alphabetic bytes only.
#[derive(Debug, Clone, Copy, Default)]
pub struct RhymeLess;

impl LineComparator for RhymeLess {
    #[inline]
    fn precedes(&self, a: &[u8], b: &[u8]) -> bool {
        rhyme_less(a, b)
    }
}

/// Compare from the first byte; the first differing byte decides.
/// A common prefix falls back to `a.len() < b.len()`, so identical lines yield `false`.
#[inline]
pub fn lex_less(a: &[u8], b: &[u8]) -> bool {
    match a.iter().zip(b).find(|(x, y)| x != y) {
        Some((x, y)) => x < y,
        None => a.len() < b.len(),
    }
}

/// Compare from the last byte backward, skipping non-alphabetic bytes on each
/// side independently.
///
/// An empty line precedes everything, including another empty line. When one
/// side runs out before a differing letter pair is found the shorter line
/// (by full byte length, punctuation included) wins.
pub fn rhyme_less(a: &[u8], b: &[u8]) -> bool {
    if a.is_empty() || b.is_empty() {
        return a.is_empty();
    }

    // Distance from the end of each line.
    let mut i = 0;
    let mut j = 0;
    while i < a.len() && j < b.len() {
        let x = a[a.len() - 1 - i];
        if !x.is_ascii_alphabetic() {
            i += 1;
            continue;
        }

        let y = b[b.len() - 1 - j];
        if !y.is_ascii_alphabetic() {
            j += 1;
            continue;
        }

        if x != y {
            return x < y;
        }
        i += 1;
        j += 1;
    }

    a.len() < b.len()
}

/// Comparator for a sort mode
pub fn comparator_for(mode: SortMode) -> &'static dyn LineComparator {
    match mode {
        SortMode::Lexicographic => &LexLess,
        SortMode::Rhyme => &RhymeLess,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lex_first_difference_decides() {
        assert!(lex_less(b"apple", b"banana"));
        assert!(!lex_less(b"banana", b"apple"));
        assert!(lex_less(b"abc", b"abd"));
        assert!(lex_less(b"Zebra", b"apple")); // uppercase sorts before lowercase
    }

    #[test]
    fn test_lex_prefix_sorts_first() {
        assert!(lex_less(b"app", b"apple"));
        assert!(!lex_less(b"apple", b"app"));
        assert!(lex_less(b"", b"a"));
        assert!(!lex_less(b"a", b""));
    }

    #[test]
    fn test_lex_identical_lines_do_not_precede() {
        assert!(!lex_less(b"same", b"same"));
        assert!(!lex_less(b"", b""));
    }

    #[test]
    fn test_lex_compares_unsigned_bytes() {
        assert!(lex_less(b"a", &[0xC3, 0xA9]));
        assert!(!lex_less(&[0xFF], b"z"));
    }

    #[test]
    fn test_rhyme_skips_trailing_punctuation() {
        assert!(rhyme_less(b"abc!", b"xbc"));
        assert!(!rhyme_less(b"xbc", b"abc!"));
    }

    #[test]
    fn test_rhyme_empty_lines_first() {
        assert!(rhyme_less(b"", b"a"));
        assert!(rhyme_less(b"", b""));
        assert!(!rhyme_less(b"a", b""));
        assert!(rhyme_less(b"", b"!!!"));
    }

    #[test]
    fn test_rhyme_compares_last_letters_first() {
        // "ring" ends in 'g', "cat" ends in 't'
        assert!(rhyme_less(b"ring", b"cat"));
        assert!(!rhyme_less(b"cat", b"ring"));
        // same ending, the next letter back decides
        assert!(rhyme_less(b"bat", b"cat"));
    }

    #[test]
    fn test_rhyme_skips_independently_on_each_side() {
        // "a, b." vs "ab": letters b then a on both sides
        assert!(!rhyme_less(b"a, b.", b"ab"));
        assert!(rhyme_less(b"ab", b"a, b."));
        assert!(rhyme_less(b"light!!", b"  night  "));
    }

    #[test]
    fn test_rhyme_falls_back_to_length() {
        // suffix match once punctuation is discounted
        assert!(rhyme_less(b"ight", b"night"));
        assert!(!rhyme_less(b"night", b"ight"));
        // both pure punctuation
        assert!(rhyme_less(b"..", b"..."));
        assert!(!rhyme_less(b"...", b".."));
        assert!(!rhyme_less(b"word", b"word"));
    }

    #[test]
    fn test_rhyme_is_case_sensitive() {
        assert!(rhyme_less(b"A", b"a"));
        assert!(!rhyme_less(b"a", b"A"));
    }

    #[test]
    fn test_closure_comparator() {
        let by_len = |a: &[u8], b: &[u8]| a.len() <= b.len();
        assert!(by_len.precedes(b"ab", b"abc"));
        assert!(!by_len.precedes(b"abcd", b"abc"));
    }

    #[test]
    fn test_comparator_for_mode() {
        assert!(comparator_for(SortMode::Lexicographic).precedes(b"a", b"b"));
        assert!(!comparator_for(SortMode::Rhyme).precedes(b"ab", b"ba"));
    }

    proptest! {
        #[test]
        fn prop_lex_matches_byte_order(
            a in proptest::collection::vec(any::<u8>(), 0..16),
            b in proptest::collection::vec(any::<u8>(), 0..16),
        ) {
            prop_assert_eq!(lex_less(&a, &b), a < b);
        }

        #[test]
        fn prop_rhyme_is_deterministic(
            a in "[a-zA-Z ,.!]{0,12}",
            b in "[a-zA-Z ,.!]{0,12}",
        ) {
            let first = rhyme_less(a.as_bytes(), b.as_bytes());
            prop_assert_eq!(first, rhyme_less(a.as_bytes(), b.as_bytes()));
            if a != b && !a.is_empty() && !b.is_empty() && first {
                // a strict "before" in one direction never holds in both
                let reversed = rhyme_less(b.as_bytes(), a.as_bytes());
                let letters = |s: &str| {
                    s.bytes().filter(u8::is_ascii_alphabetic).collect::<Vec<_>>()
                };
                if letters(&a) != letters(&b) {
                    prop_assert!(!reversed);
                }
            }
        }
    }
}
