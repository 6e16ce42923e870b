use super::Real;

pub(crate) trait ThresholdClass {
    fn test(value: Real, threshold: Real) -> bool;
}

/// Strictly above: a value equal to the threshold does not pass.
pub(crate) struct UpperThreshold {}
impl ThresholdClass for UpperThreshold {
    fn test(value: Real, threshold: Real) -> bool {
        value > threshold
    }
}

/// Strictly below: a value equal to the threshold does not pass.
pub(crate) struct LowerThreshold {}
impl ThresholdClass for LowerThreshold {
    fn test(value: Real, threshold: Real) -> bool {
        value < threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_exclusive() {
        assert!(UpperThreshold::test(2.0, 1.0));
        assert!(!UpperThreshold::test(1.0, 1.0));
        assert!(LowerThreshold::test(0.0, 1.0));
        assert!(!LowerThreshold::test(1.0, 1.0));
    }
}
