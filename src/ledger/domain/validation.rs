//! Range validators for decimal entry fields.
//!
//! The web layer rejects values that fail to parse as exact decimals at
//! deserialization time, so these validators only have to enforce ranges.
//! Each returns a distinct error code so clients can tell which rule a field
//! broke.

use rust_decimal::Decimal;
use validator::ValidationError;

/// The value must be strictly greater than zero.
pub fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("positive"))
    }
}

/// The value must be zero or greater.
pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("non_negative"))
    }
}

/// The value must be a percentage between 0 and 100 inclusive.
pub fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO && *value <= Decimal::ONE_HUNDRED {
        Ok(())
    } else {
        Err(ValidationError::new("percentage"))
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn positive_rejects_zero_and_negative() {
        positive(&dec!(1)).expect("positive value should pass");
        positive(&dec!(0.001)).expect("small positive value should pass");

        let error = positive(&dec!(0)).expect_err("zero should fail");
        assert_eq!("positive", error.code);

        positive(&dec!(-3)).expect_err("negative value should fail");
    }

    #[test]
    fn non_negative_allows_zero() {
        non_negative(&dec!(0)).expect("zero should pass");
        non_negative(&dec!(12.5)).expect("positive value should pass");

        let error = non_negative(&dec!(-0.01)).expect_err("negative value should fail");
        assert_eq!("non_negative", error.code);
    }

    #[test]
    fn percentage_bounds_are_inclusive() {
        percentage(&dec!(0)).expect("zero percent should pass");
        percentage(&dec!(100)).expect("one hundred percent should pass");

        let error = percentage(&dec!(100.5)).expect_err("over one hundred should fail");
        assert_eq!("percentage", error.code);

        percentage(&dec!(-1)).expect_err("negative percentage should fail");
    }
}
