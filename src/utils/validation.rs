use crate::utils::error::{DoseError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(DoseError::InvalidPhysicalParameter {
            field: field_name.to_string(),
            value,
            reason: "Value must be a finite number".to_string(),
        });
    }

    if value <= 0.0 {
        return Err(DoseError::InvalidPhysicalParameter {
            field: field_name.to_string(),
            value,
            reason: "Value must be strictly positive".to_string(),
        });
    }
    Ok(())
}

/// Transmission fractions live in the open interval (0, 1).
pub fn validate_fraction(field_name: &str, value: f64) -> Result<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(DoseError::InvalidPhysicalParameter {
            field: field_name.to_string(),
            value,
            reason: "Value must be between 0 and 1 (exclusive)".to_string(),
        });
    }
    Ok(())
}

pub fn validate_all_positive(field_name: &str, values: &[f64]) -> Result<()> {
    for (i, value) in values.iter().enumerate() {
        validate_positive(&format!("{}[{}]", field_name, i), *value)?;
    }
    Ok(())
}

pub fn validate_count(
    origin: &str,
    field_name: &str,
    values: &[f64],
    min: usize,
    max: Option<usize>,
) -> Result<()> {
    let count = values.len();
    let too_many = max.is_some_and(|max| count > max);

    if count < min || too_many {
        let expected = match max {
            Some(max) if max == min => format!("exactly {}", min),
            Some(max) => format!("between {} and {}", min, max),
            None => format!("at least {}", min),
        };
        return Err(DoseError::input_format(
            origin,
            format!("{} expects {} value(s), found {}", field_name, expected, count),
        ));
    }
    Ok(())
}
