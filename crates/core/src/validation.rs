//! Shared validation helpers for request DTOs.

use rust_decimal::Decimal;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::types::Date;

/// Run `validator` derive checks and convert failures into a
/// [`CoreError::Validation`] with a stable, readable message.
pub fn validate_dto<T: Validate>(dto: &T) -> Result<(), CoreError> {
    dto.validate()
        .map_err(|errors| CoreError::Validation(flatten_errors(&errors)))
}

/// Render field errors as `field: message; field: message`, sorted by field.
pub fn flatten_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{field}: {}", messages.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Decimal places a stored monetary amount may carry.
pub const MONEY_DECIMALS: u32 = 2;

/// Amounts are stored as `NUMERIC(14, 2)`, so they must stay below 10^12.
fn money_limit() -> Decimal {
    Decimal::new(1_000_000_000_000, 0)
}

/// Require an amount that a money column stores exactly: below 10^12 in
/// magnitude and with no more than two decimal places.
pub fn require_money(amount: Decimal, field: &str) -> Result<(), CoreError> {
    if amount.abs() >= money_limit() {
        return Err(CoreError::Validation(format!(
            "{field} must be less than 1000000000000"
        )));
    }
    if amount.normalize().scale() > MONEY_DECIMALS {
        return Err(CoreError::Validation(format!(
            "{field} must have at most {MONEY_DECIMALS} decimal places"
        )));
    }
    Ok(())
}

/// Require a strictly positive monetary amount.
pub fn require_positive(amount: Decimal, field: &str) -> Result<(), CoreError> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "{field} must be greater than zero"
        )));
    }
    require_money(amount, field)
}

/// Require a monetary amount that is zero or more.
pub fn require_non_negative(amount: Decimal, field: &str) -> Result<(), CoreError> {
    if amount < Decimal::ZERO {
        return Err(CoreError::Validation(format!("{field} must not be negative")));
    }
    require_money(amount, field)
}

/// Validate an optional `[from, to]` date filter.
pub fn validate_date_range(from: Option<Date>, to: Option<Date>) -> Result<(), CoreError> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(CoreError::Validation(format!(
                "from ({from}) must not be after to ({to})"
            )));
        }
    }
    Ok(())
}

/// Lowercase and trim an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn flattens_errors_sorted_by_field() {
        let sample = Sample {
            name: String::new(),
            email: "not-an-email".into(),
        };
        let err = validate_dto(&sample).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: email: email; name: must not be empty"
        );
    }

    #[test]
    fn valid_dto_passes() {
        let sample = Sample {
            name: "Grace".into(),
            email: "grace@example.org".into(),
        };
        assert!(validate_dto(&sample).is_ok());
    }

    #[test]
    fn positive_amounts() {
        assert!(require_positive(dec!(0.01), "amount").is_ok());
        assert!(require_positive(dec!(0), "amount").is_err());
        assert!(require_positive(dec!(-3), "amount").is_err());
    }

    #[test]
    fn non_negative_amounts() {
        assert!(require_non_negative(dec!(0), "allowance").is_ok());
        assert!(require_non_negative(dec!(12.50), "allowance").is_ok());
        assert!(require_non_negative(dec!(-0.01), "allowance").is_err());
    }

    #[test]
    fn money_must_fit_the_column() {
        assert!(require_money(dec!(999999999999.99), "amount").is_ok());
        assert!(require_money(dec!(1000000000000), "amount").is_err());
        assert!(require_positive(Decimal::MAX, "amount").is_err());
    }

    #[test]
    fn money_rejects_sub_cent_precision() {
        assert!(require_money(dec!(100.50), "amount").is_ok());
        assert!(require_money(dec!(100.500), "amount").is_ok());
        let err = require_non_negative(dec!(100.005), "basic_salary").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: basic_salary must have at most 2 decimal places"
        );
    }

    #[test]
    fn date_range_order() {
        let jan = Date::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = Date::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(validate_date_range(Some(jan), Some(feb)).is_ok());
        assert!(validate_date_range(Some(feb), Some(jan)).is_err());
        assert!(validate_date_range(None, Some(jan)).is_ok());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email("  Pastor@Church.ORG "), "pastor@church.org");
    }
}
