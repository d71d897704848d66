//! Interval-set arithmetic over closed `i64` intervals.
//!
//! A [`RangeList`] represents a set of integers as an ordered sequence of
//! closed intervals that never overlap and never touch. It doubles as a
//! variable domain and as the provable value-range of a sub-expression.
//!
//! All arithmetic saturates at the `i64` extremes. A saturated bound is
//! always a superset of the exact one, so saturation keeps bound reasoning
//! sound where wraparound would silently corrupt it.

use smallvec::SmallVec;
use std::fmt;

/// An ordered union of disjoint, non-adjacent closed intervals `[lo, hi]`.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct RangeList {
    ranges: SmallVec<[(i64, i64); 2]>,
}

impl RangeList {
    /// The empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single value.
    #[must_use]
    pub fn point(v: i64) -> Self {
        Self {
            ranges: SmallVec::from_slice(&[(v, v)]),
        }
    }

    /// A single closed interval `[lo, hi]`; empty when `lo > hi`.
    #[must_use]
    pub fn interval(lo: i64, hi: i64) -> Self {
        if lo > hi {
            Self::empty()
        } else {
            Self {
                ranges: SmallVec::from_slice(&[(lo, hi)]),
            }
        }
    }

    /// The `{0, 1}` domain of a boolean variable.
    #[must_use]
    pub fn bool_domain() -> Self {
        Self::interval(0, 1)
    }

    /// The full representable range.
    #[must_use]
    pub fn full() -> Self {
        Self::interval(i64::MIN, i64::MAX)
    }

    /// Build from raw interval pairs, normalizing as needed.
    #[must_use]
    pub fn from_intervals<I: IntoIterator<Item = (i64, i64)>>(intervals: I) -> Self {
        let mut v: Vec<(i64, i64)> = intervals.into_iter().filter(|&(lo, hi)| lo <= hi).collect();
        Self::normalized(&mut v)
    }

    fn normalized(v: &mut Vec<(i64, i64)>) -> Self {
        v.sort_unstable();
        let mut out: SmallVec<[(i64, i64); 2]> = SmallVec::new();
        for &(lo, hi) in v.iter() {
            match out.last_mut() {
                // Merge overlapping or adjacent intervals.
                Some(&mut (_, ref mut phi)) if lo <= phi.saturating_add(1) => {
                    if hi > *phi {
                        *phi = hi;
                    }
                }
                _ => out.push((lo, hi)),
            }
        }
        Self { ranges: out }
    }

    /// True when the set contains no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Smallest member, if any.
    #[must_use]
    pub fn lb(&self) -> Option<i64> {
        self.ranges.first().map(|&(lo, _)| lo)
    }

    /// Largest member, if any.
    #[must_use]
    pub fn ub(&self) -> Option<i64> {
        self.ranges.last().map(|&(_, hi)| hi)
    }

    /// Membership test (binary search over intervals).
    #[must_use]
    pub fn contains(&self, v: i64) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if v < lo {
                    std::cmp::Ordering::Greater
                } else if v > hi {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Number of member values, saturating at `u64::MAX`.
    #[must_use]
    pub fn size(&self) -> u64 {
        let mut total: u128 = 0;
        for &(lo, hi) in &self.ranges {
            total += (hi as i128 - lo as i128 + 1) as u128;
        }
        u64::try_from(total).unwrap_or(u64::MAX)
    }

    /// Number of maximal intervals.
    #[must_use]
    pub fn interval_count(&self) -> usize {
        self.ranges.len()
    }

    /// The intervals themselves, sorted and disjoint.
    #[must_use]
    pub fn intervals(&self) -> &[(i64, i64)] {
        &self.ranges
    }

    /// Iterate over member values in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ranges.iter().flat_map(|&(lo, hi)| lo..=hi)
    }

    /// Iterate over member values within `[lo, hi]`, ascending.
    pub fn values_between(&self, lo: i64, hi: i64) -> impl Iterator<Item = i64> + '_ {
        self.intersect(&RangeList::interval(lo, hi))
            .ranges
            .into_iter()
            .flat_map(|(a, b)| a..=b)
    }

    /// Set union.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut v: Vec<(i64, i64)> = Vec::with_capacity(self.ranges.len() + other.ranges.len());
        v.extend_from_slice(&self.ranges);
        v.extend_from_slice(&other.ranges);
        Self::normalized(&mut v)
    }

    /// Set intersection.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let mut out: Vec<(i64, i64)> = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (alo, ahi) = self.ranges[i];
            let (blo, bhi) = other.ranges[j];
            let lo = alo.max(blo);
            let hi = ahi.min(bhi);
            if lo <= hi {
                out.push((lo, hi));
            }
            if ahi <= bhi {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self::normalized(&mut out)
    }

    /// Set difference `self \ other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let mut out: Vec<(i64, i64)> = Vec::new();
        for &(lo, hi) in &self.ranges {
            let mut cur = lo;
            let mut consumed = false;
            for &(blo, bhi) in &other.ranges {
                if bhi < cur {
                    continue;
                }
                if blo > hi {
                    break;
                }
                if blo > cur {
                    out.push((cur, blo - 1));
                }
                if bhi >= hi {
                    consumed = true;
                    break;
                }
                cur = bhi + 1;
            }
            if !consumed && cur <= hi {
                out.push((cur, hi));
            }
        }
        Self::normalized(&mut out)
    }

    /// Shift every value by `k` (saturating).
    #[must_use]
    pub fn shift(&self, k: i64) -> Self {
        let mut v: Vec<(i64, i64)> = self
            .ranges
            .iter()
            .map(|&(lo, hi)| (lo.saturating_add(k), hi.saturating_add(k)))
            .collect();
        Self::normalized(&mut v)
    }

    /// Scale every value by `k` (saturating). `scale(0)` on a non-empty set
    /// collapses to `{0}`; a negative factor reverses interval order.
    ///
    /// Scaling by `|k| > 1` punches holes between consecutive multiples; the
    /// result keeps only exact multiples when the interval is small enough to
    /// enumerate, and otherwise returns the sound covering interval.
    #[must_use]
    pub fn scale(&self, k: i64) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        if k == 0 {
            return Self::point(0);
        }
        let mut v: Vec<(i64, i64)> = Vec::new();
        for &(lo, hi) in &self.ranges {
            if k == 1 {
                v.push((lo, hi));
            } else if k == -1 {
                v.push((hi.saturating_neg(), lo.saturating_neg()));
            } else if hi.saturating_sub(lo) < SCALE_ENUMERATION_LIMIT {
                for x in lo..=hi {
                    let y = x.saturating_mul(k);
                    v.push((y, y));
                }
            } else {
                let a = lo.saturating_mul(k);
                let b = hi.saturating_mul(k);
                v.push((a.min(b), a.max(b)));
            }
        }
        Self::normalized(&mut v)
    }

    /// Arithmetic negation of every value.
    #[must_use]
    pub fn negate(&self) -> Self {
        self.scale(-1)
    }

    /// Minkowski sum: `{ a + b | a ∈ self, b ∈ other }` (saturating).
    #[must_use]
    pub fn sum(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::empty();
        }
        let mut v: Vec<(i64, i64)> =
            Vec::with_capacity(self.ranges.len() * other.ranges.len());
        for &(alo, ahi) in &self.ranges {
            for &(blo, bhi) in &other.ranges {
                v.push((alo.saturating_add(blo), ahi.saturating_add(bhi)));
            }
        }
        Self::normalized(&mut v)
    }

    /// The single covering interval `[lb, ub]`. Always a superset; the
    /// coarsening used when exact interval tracking grows too large.
    #[must_use]
    pub fn hull(&self) -> Self {
        match (self.lb(), self.ub()) {
            (Some(lo), Some(hi)) => Self::interval(lo, hi),
            _ => Self::empty(),
        }
    }

    /// Largest member `<= v`, if any.
    #[must_use]
    pub fn floor_member(&self, v: i64) -> Option<i64> {
        let mut best = None;
        for &(lo, hi) in &self.ranges {
            if lo > v {
                break;
            }
            best = Some(hi.min(v));
        }
        best
    }
}

/// Intervals wider than this are not enumerated during `scale`; the covering
/// interval is used instead.
const SCALE_ENUMERATION_LIMIT: i64 = 4096;

impl FromIterator<i64> for RangeList {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut v: Vec<(i64, i64)> = iter.into_iter().map(|x| (x, x)).collect();
        Self::normalized(&mut v)
    }
}

impl fmt::Display for RangeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, &(lo, hi)) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if lo == hi {
                write!(f, "{lo}")?;
            } else {
                write!(f, "{lo}..{hi}")?;
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for RangeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_invariants(r: &RangeList) {
        let rs = r.intervals();
        for &(lo, hi) in rs {
            assert!(lo <= hi);
        }
        for w in rs.windows(2) {
            // Sorted, disjoint, non-adjacent.
            assert!(w[0].1 < w[1].0);
            assert!(w[0].1.saturating_add(1) < w[1].0);
        }
    }

    #[test]
    fn normalization_merges_overlaps_and_adjacency() {
        let r = RangeList::from_intervals([(1, 3), (4, 6), (10, 12), (11, 15)]);
        check_invariants(&r);
        assert_eq!(r.intervals(), &[(1, 6), (10, 15)]);
    }

    #[test]
    fn from_values_collects_runs() {
        let r: RangeList = [5, 1, 2, 3, 9].into_iter().collect();
        check_invariants(&r);
        assert_eq!(r.intervals(), &[(1, 3), (5, 5), (9, 9)]);
        assert_eq!(r.size(), 5);
    }

    #[test]
    fn contains_and_bounds() {
        let r = RangeList::from_intervals([(1, 3), (7, 9)]);
        assert!(r.contains(2));
        assert!(!r.contains(5));
        assert_eq!(r.lb(), Some(1));
        assert_eq!(r.ub(), Some(9));
        assert_eq!(r.floor_member(6), Some(3));
        assert_eq!(r.floor_member(8), Some(8));
        assert_eq!(r.floor_member(0), None);
    }

    #[test]
    fn union_intersect_difference_are_valid() {
        let a = RangeList::from_intervals([(0, 5), (10, 20)]);
        let b = RangeList::from_intervals([(3, 12), (18, 25)]);
        let u = a.union(&b);
        let i = a.intersect(&b);
        let d = a.difference(&b);
        check_invariants(&u);
        check_invariants(&i);
        check_invariants(&d);
        assert_eq!(u.intervals(), &[(0, 25)]);
        assert_eq!(i.intervals(), &[(3, 5), (10, 12), (18, 20)]);
        assert_eq!(d.intervals(), &[(0, 2), (13, 17)]);
    }

    #[test]
    fn difference_exhaustive_small() {
        let a = RangeList::from_intervals([(0, 9)]);
        let b = RangeList::from_intervals([(2, 3), (5, 5), (8, 20)]);
        let d = a.difference(&b);
        check_invariants(&d);
        let expect: Vec<i64> = (0..=9).filter(|v| !b.contains(*v)).collect();
        assert_eq!(d.iter().collect::<Vec<_>>(), expect);
    }

    #[test]
    fn scale_by_zero_collapses() {
        let r = RangeList::from_intervals([(2, 4), (8, 9)]);
        assert_eq!(r.scale(0), RangeList::point(0));
        assert!(RangeList::empty().scale(0).is_empty());
    }

    #[test]
    fn scale_keeps_exact_multiples() {
        let r = RangeList::interval(1, 3);
        let s = r.scale(3);
        check_invariants(&s);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![3, 6, 9]);
        let n = r.scale(-2);
        assert_eq!(n.iter().collect::<Vec<_>>(), vec![-6, -4, -2]);
    }

    #[test]
    fn sum_is_minkowski() {
        let a = RangeList::from_intervals([(0, 1), (5, 5)]);
        let b = RangeList::from_intervals([(0, 2)]);
        let s = a.sum(&b);
        check_invariants(&s);
        assert_eq!(s.intervals(), &[(0, 3), (5, 7)]);
    }

    #[test]
    fn saturates_at_extremes() {
        let r = RangeList::point(i64::MAX);
        assert_eq!(r.shift(5).ub(), Some(i64::MAX));
        assert_eq!(r.sum(&RangeList::point(i64::MAX)).ub(), Some(i64::MAX));
        let n = RangeList::point(i64::MIN);
        assert_eq!(n.negate().ub(), Some(i64::MAX));
    }

    #[test]
    fn hull_covers() {
        let r = RangeList::from_intervals([(1, 2), (9, 9)]);
        assert_eq!(r.hull().intervals(), &[(1, 9)]);
        assert_eq!(r.hull().size(), 9);
    }

    #[test]
    fn values_between_respects_holes() {
        let r = RangeList::from_intervals([(1, 3), (7, 9)]);
        assert_eq!(r.values_between(2, 8).collect::<Vec<_>>(), vec![2, 3, 7, 8]);
    }
}
