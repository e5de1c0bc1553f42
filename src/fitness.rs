//! Fitness scalars and read-only fitness views consumed by selection.

use std::cmp::Ordering;
use std::fmt::Debug;

/// Scalar fitness. Higher is better.
///
/// Implemented for `f64` and `i64`. Selection operators read both through
/// [`FitnessVector`], which compares in the native type and weighs in `f64`.
pub trait Fitness: Copy + PartialOrd + Debug + Send + Sync + 'static {
    fn to_f64(self) -> f64;

    /// Total order used for ranking and tournaments. NaN sorts lowest.
    fn fitness_cmp(&self, other: &Self) -> Ordering;
}

impl Fitness for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    fn fitness_cmp(&self, other: &Self) -> Ordering {
        match (self.is_nan(), other.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.partial_cmp(other).unwrap_or(Ordering::Equal),
        }
    }
}

impl Fitness for i64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn fitness_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

/// Read-only, index-aligned view over the fitness of a population.
///
/// The length is fixed for the duration of a selection call and valid indices
/// are `0..len()`.
pub trait FitnessVector {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fitness of individual `i` as a weight-ready `f64`.
    fn value(&self, i: usize) -> f64;

    /// Compares individuals `i` and `j` in the native fitness type.
    fn compare(&self, i: usize, j: usize) -> Ordering;
}

impl<F: Fitness> FitnessVector for Vec<F> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn value(&self, i: usize) -> f64 {
        self[i].to_f64()
    }

    #[inline]
    fn compare(&self, i: usize, j: usize) -> Ordering {
        self[i].fitness_cmp(&self[j])
    }
}

impl<F: Fitness, const N: usize> FitnessVector for [F; N] {
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn value(&self, i: usize) -> f64 {
        self[i].to_f64()
    }

    #[inline]
    fn compare(&self, i: usize, j: usize) -> Ordering {
        self[i].fitness_cmp(&self[j])
    }
}

/// View that adds a constant to every value and optionally floors the result.
///
/// Comparisons go to the inner view unchanged, so ordering-based operators see
/// the original fitness.
pub struct Adjusted<'a> {
    inner: &'a dyn FitnessVector,
    offset: f64,
    floor: Option<f64>,
}

impl<'a> Adjusted<'a> {
    /// `f' = f − min(f) + 1`, which is at least 1 for every individual.
    pub fn shifted(inner: &'a dyn FitnessVector) -> Self {
        let offset = 1.0 - min_value(inner);
        Self {
            inner,
            offset,
            floor: None,
        }
    }

    pub fn offset(inner: &'a dyn FitnessVector, offset: f64, floor: Option<f64>) -> Self {
        Self {
            inner,
            offset,
            floor,
        }
    }
}

impl FitnessVector for Adjusted<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn value(&self, i: usize) -> f64 {
        let v = self.inner.value(i) + self.offset;
        match self.floor {
            // NaN lands on the floor as well
            Some(floor) if v >= floor => v,
            Some(floor) => floor,
            None => v,
        }
    }

    fn compare(&self, i: usize, j: usize) -> Ordering {
        self.inner.compare(i, j)
    }
}

/// Smallest non-NaN value, or zero for an empty view.
pub(crate) fn min_value(fitness: &dyn FitnessVector) -> f64 {
    let min = (0..fitness.len())
        .map(|i| fitness.value(i))
        .fold(f64::INFINITY, f64::min);
    if min.is_finite() { min } else { 0.0 }
}

/// Largest non-NaN value, or zero for an empty view.
pub(crate) fn max_value(fitness: &dyn FitnessVector) -> f64 {
    let max = (0..fitness.len())
        .map(|i| fitness.value(i))
        .fold(f64::NEG_INFINITY, f64::max);
    if max.is_finite() { max } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_sorts_lowest() {
        assert_eq!(f64::NAN.fitness_cmp(&-1.0e300), Ordering::Less);
        assert_eq!(1.0.fitness_cmp(&f64::NAN), Ordering::Greater);
    }

    #[test]
    fn arrays_and_vecs_agree() {
        let a = [3_i64, -2, 7];
        let v = a.to_vec();
        assert_eq!(FitnessVector::len(&a), FitnessVector::len(&v));
        for i in 0..3 {
            assert_eq!(a.value(i), v.value(i));
        }
        assert_eq!(a.compare(0, 2), Ordering::Less);
        assert_eq!(v.compare(0, 1), Ordering::Greater);
    }

    #[test]
    fn shifted_view_is_at_least_one() {
        let v = vec![-5.0, 0.0, 3.5];
        let s = Adjusted::shifted(&v);
        assert_eq!(s.value(0), 1.0);
        assert_eq!(s.value(1), 6.0);
        assert_eq!(s.value(2), 9.5);
        assert_eq!(s.compare(0, 2), Ordering::Less);
    }

    #[test]
    fn floor_applies_below_threshold() {
        let v = vec![1_i64, 10];
        let s = Adjusted::offset(&v, -5.0, Some(0.5));
        assert_eq!(s.value(0), 0.5);
        assert_eq!(s.value(1), 5.0);
    }
}
