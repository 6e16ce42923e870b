use super::super::Real;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter, Result};

/// A numeric value which may be missing.
///
/// Missing covers blank or unreadable export cells, saturated readings, and
/// anything derived from them. Non-finite numbers are never stored: building a
/// value from `NaN` or an infinity yields a missing value, so every stage can
/// rely on [Value::is_present] alone.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub(crate) struct Value(Option<Real>);

impl Value {
    pub(crate) const MISSING: Value = Value(None);

    pub(crate) fn new(value: Real) -> Self {
        if value.is_finite() {
            Self(Some(value))
        } else {
            Self::MISSING
        }
    }

    pub(crate) fn is_present(&self) -> bool {
        self.0.is_some()
    }

    pub(crate) fn get(&self) -> Option<Real> {
        self.0
    }

    /// Applies `f` to a present value. Missing values stay missing.
    pub(crate) fn map<F: FnOnce(Real) -> Real>(self, f: F) -> Self {
        self.0.map_or(Self::MISSING, |value| Self::new(f(value)))
    }
}

impl From<Option<Real>> for Value {
    fn from(value: Option<Real>) -> Self {
        value.map_or(Self::MISSING, Self::new)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => Ok(()),
        }
    }
}

/// Missing values serialise as `None`, i.e. an empty CSV field.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_is_missing() {
        assert!(!Value::new(Real::NAN).is_present());
        assert!(!Value::new(Real::INFINITY).is_present());
        assert!(!Value::new(Real::NEG_INFINITY).is_present());
        assert_eq!(Value::from(Some(Real::NAN)), Value::MISSING);
    }

    #[test]
    fn zero_is_present() {
        assert!(Value::new(0.0).is_present());
        assert_eq!(Value::new(0.0).get(), Some(0.0));
        assert_ne!(Value::new(0.0), Value::MISSING);
    }

    #[test]
    fn map_propagates_missing() {
        assert_eq!(Value::MISSING.map(|v| v + 1.0), Value::MISSING);
        assert_eq!(Value::new(2.0).map(|v| v * 3.0), Value::new(6.0));
        assert_eq!(Value::new(2.0).map(|v| v / 0.0), Value::MISSING);
    }

    #[test]
    fn display() {
        assert_eq!(Value::new(1.5).to_string(), "1.5");
        assert_eq!(Value::MISSING.to_string(), "");
    }
}
