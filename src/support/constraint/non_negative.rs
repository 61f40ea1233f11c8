use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is non-negative (zero or greater).
///
/// A static test stand runs at a freestream Mach number of zero, so Mach is
/// constrained to be non-negative rather than strictly positive.
///
/// # Examples
///
/// ```
/// use twine_nozzle::support::constraint::NonNegative;
///
/// assert!(NonNegative::new(0.0).is_ok());
/// assert!(NonNegative::new(0.9).is_ok());
/// assert!(NonNegative::new(-0.1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl NonNegative {
    /// Constructs a [`Constrained<T, NonNegative>`] if the value is non-negative.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, NonNegative>, ConstraintError> {
        Constrained::<T, NonNegative>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for NonNegative {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater | Ordering::Equal) => Ok(()),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mach_numbers() {
        assert_eq!(NonNegative::new(0.0).unwrap().into_inner(), 0.0);
        assert_eq!(
            Constrained::<f64, NonNegative>::new(0.511).unwrap().into_inner(),
            0.511
        );
        assert_eq!(
            NonNegative::new(-0.2).unwrap_err(),
            ConstraintError::Negative
        );
        assert_eq!(
            NonNegative::new(f64::NAN).unwrap_err(),
            ConstraintError::NotANumber
        );
    }

    #[test]
    fn integers() {
        assert!(NonNegative::new(0_i32).is_ok());
        assert!(NonNegative::new(-3_i32).is_err());
    }
}
