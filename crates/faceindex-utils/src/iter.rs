//! Iterator helpers.

/// Zips two iterators, panicking if they don't have the same length.
///
/// Plain [`Iterator::zip`] silently truncates to the shorter iterator, which hides bugs when two
/// sequences (e.g. landmarks and their template counterparts) are supposed to always have the same
/// length. This makes the assumption explicit and catches violations immediately.
pub fn zip_exact<A, B>(a: A, b: B) -> impl Iterator<Item = (A::Item, B::Item)>
where
    A: IntoIterator,
    A::IntoIter: ExactSizeIterator,
    B: IntoIterator,
    B::IntoIter: ExactSizeIterator,
{
    let a = a.into_iter();
    let b = b.into_iter();
    assert_eq!(
        a.len(),
        b.len(),
        "zip_exact: iterators have different lengths ({} vs {})",
        a.len(),
        b.len(),
    );
    a.zip(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zips_equal_length() {
        let a = [1, 2, 3];
        let b = [4, 5, 6];
        let zipped: Vec<_> = zip_exact(a, b).collect();
        assert_eq!(zipped, [(1, 4), (2, 5), (3, 6)]);
    }

    #[test]
    #[should_panic]
    fn panics_on_mismatched_length() {
        let a = [1, 2, 3];
        let b = [4, 5];
        zip_exact(a, b).for_each(drop);
    }
}
