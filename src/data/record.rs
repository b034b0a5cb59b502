use nalgebra::DVector;
use num_traits::{Float, FromPrimitive, ToPrimitive};
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

/// Real-valued feature type accepted by datasets, trees and forests.
///
/// Widens losslessly to `f64`, the type of the generated `double *attr`.
pub trait RealNumber:
    Float
    + FromPrimitive
    + ToPrimitive
    + Into<f64>
    + FromStr
    + Debug
    + Display
    + Send
    + Sync
    + 'static
{
}

impl<T> RealNumber for T where
    T: Float
        + FromPrimitive
        + ToPrimitive
        + Into<f64>
        + FromStr
        + Debug
        + Display
        + Send
        + Sync
        + 'static
{
}

/// Binary class label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// Any negative raw label, rendered as `-1`.
    Negative,
    /// Any positive raw label, rendered as `1`.
    Positive,
}

impl Label {
    /// Maps a raw signed label onto a class. Zero is the unset sentinel and has no class.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => None,
            r if r > 0 => Some(Label::Positive),
            _ => Some(Label::Negative),
        }
    }

    /// `+1` or `-1`.
    pub fn sign(self) -> i64 {
        match self {
            Label::Positive => 1,
            Label::Negative => -1,
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}

/// One labeled sparse feature vector. Absent indices read as 0.
#[derive(Clone, PartialEq)]
pub struct Record<T: RealNumber> {
    label: Label,
    features: BTreeMap<usize, T>,
}

impl<T: RealNumber> Debug for Record<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} [ ", self.label)?;
        for (index, value) in &self.features {
            write!(f, "{}({}) ", index, value)?;
        }
        write!(f, "]")
    }
}

impl<T: RealNumber> Record<T> {
    pub fn new(label: Label, features: BTreeMap<usize, T>) -> Self {
        Self { label, features }
    }

    pub fn from_pairs(label: Label, pairs: impl IntoIterator<Item = (usize, T)>) -> Self {
        Self::new(label, pairs.into_iter().collect())
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn features(&self) -> &BTreeMap<usize, T> {
        &self.features
    }

    pub fn value(&self, index: usize) -> T {
        self.features.get(&index).copied().unwrap_or_else(T::zero)
    }

    /// Smallest and largest feature index present, if any.
    pub fn index_range(&self) -> Option<(usize, usize)> {
        let min = *self.features.keys().next()?;
        let max = *self.features.keys().next_back()?;
        Some((min, max))
    }

    /// Whether both records describe the same dense feature vector.
    pub fn same_features(&self, other: &Self) -> bool {
        self.features
            .iter()
            .all(|(&index, &value)| other.value(index) == value)
            && other
                .features
                .iter()
                .all(|(&index, &value)| self.value(index) == value)
    }
}

/// Anything that can answer "what is the value of feature `index`".
pub trait Attributes<T: RealNumber> {
    fn attribute(&self, index: usize) -> T;
}

impl<T: RealNumber> Attributes<T> for Record<T> {
    fn attribute(&self, index: usize) -> T {
        self.value(index)
    }
}

impl<T: RealNumber> Attributes<T> for [T] {
    fn attribute(&self, index: usize) -> T {
        self.get(index).copied().unwrap_or_else(T::zero)
    }
}

impl<T: RealNumber> Attributes<T> for Vec<T> {
    fn attribute(&self, index: usize) -> T {
        self.as_slice().attribute(index)
    }
}

impl<T: RealNumber> Attributes<T> for DVector<T> {
    fn attribute(&self, index: usize) -> T {
        self.as_slice().attribute(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_raw() {
        assert_eq!(Label::from_raw(1), Some(Label::Positive));
        assert_eq!(Label::from_raw(7), Some(Label::Positive));
        assert_eq!(Label::from_raw(-1), Some(Label::Negative));
        assert_eq!(Label::from_raw(0), None);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Label::Positive.to_string(), "1");
        assert_eq!(Label::Negative.to_string(), "-1");
    }

    #[test]
    fn test_record_value_defaults_to_zero() {
        let record = Record::from_pairs(Label::Positive, vec![(1, 5.0), (4, 2.5)]);
        assert_eq!(record.value(1), 5.0);
        assert_eq!(record.value(4), 2.5);
        assert_eq!(record.value(2), 0.0);
        assert_eq!(record.index_range(), Some((1, 4)));
    }

    #[test]
    fn test_record_same_features_ignores_explicit_zeros() {
        let a = Record::from_pairs(Label::Positive, vec![(1, 0.0), (2, 3.0)]);
        let b = Record::from_pairs(Label::Negative, vec![(2, 3.0)]);
        let c = Record::from_pairs(Label::Negative, vec![(2, 4.0)]);
        assert!(a.same_features(&b));
        assert!(b.same_features(&a));
        assert!(!a.same_features(&c));
    }

    #[test]
    fn test_attributes_for_dense_vectors() {
        let dense = DVector::from_vec(vec![0.0, 1.5, 2.5]);
        assert_eq!(dense.attribute(2), 2.5);
        assert_eq!(dense.attribute(10), 0.0);
        assert_eq!(vec![1.0f32, 2.0].attribute(1), 2.0);
    }

    #[test]
    fn test_record_debug() {
        let record = Record::from_pairs(Label::Negative, vec![(3, 1.0)]);
        assert_eq!(format!("{:?}", record), "-1 [ 3(1) ]");
    }
}
