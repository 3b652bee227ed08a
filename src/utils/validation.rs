use std::collections::BTreeMap;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::AppError;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(AppError::from)
}

/// Flattens field errors into `{ camelCaseField: message }`, keeping the
/// first message reported for each field.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", err.code));
                (to_camel_case(field), message)
            })
        })
        .collect()
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// An optional leading `+` followed by 10 to 15 digits.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        return Ok(());
    }
    let mut err = ValidationError::new("phone_number");
    err.message = Some("Phone number must be 10 to 15 digits".into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_cases_snake_names() {
        assert_eq!(to_camel_case("first_name"), "firstName");
        assert_eq!(to_camel_case("hire_date"), "hireDate");
        assert_eq!(to_camel_case("email"), "email");
    }

    #[test]
    fn blank_values() {
        assert!(validate_not_blank("Ann").is_ok());
        assert!(validate_not_blank(" Ann ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \t").is_err());
    }

    #[test]
    fn phone_numbers() {
        assert!(validate_phone_number("5551234567").is_ok());
        assert!(validate_phone_number("+445551234567").is_ok());
        assert!(validate_phone_number("555-123-4567").is_err());
        assert!(validate_phone_number("12345").is_err());
        assert!(validate_phone_number("+").is_err());
    }
}
