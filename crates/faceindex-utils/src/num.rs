//! Numeric helpers shared across the geometry and pipeline crates.

use std::cmp::Ordering;

/// Wraps an `f32` to give it a total order, so it can be used as a sort/max key.
///
/// `f32` only implements `PartialOrd` because of `NaN`. Detector scores and blur values in this
/// pipeline are never `NaN` in practice, so we panic rather than silently picking an arbitrary
/// ordering if one shows up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalF32(pub f32);

impl Eq for TotalF32 {}

impl PartialOrd for TotalF32 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TotalF32 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .partial_cmp(&other.0)
            .unwrap_or_else(|| panic!("tried to order NaN float ({} vs {})", self.0, other.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_value() {
        let mut v = [TotalF32(3.0), TotalF32(-1.0), TotalF32(2.0)];
        v.sort();
        assert_eq!(v, [TotalF32(-1.0), TotalF32(2.0), TotalF32(3.0)]);
    }

    #[test]
    #[should_panic]
    fn panics_on_nan() {
        let _ = TotalF32(f32::NAN).cmp(&TotalF32(0.0));
    }
}
