use crate::domain::model::{EmployeeCreationRequest, FieldBag, FieldValue};
use crate::utils::error::ValidationFailure;

pub const MIN_AGE: i32 = 16;
pub const MAX_AGE: i32 = 75;
pub const MIN_SALARY: i32 = 0;

/// 將未型別化的輸入轉為建立請求。規則依序檢查，第一個違反的規則即回傳
pub fn validate_creation_input(
    fields: &FieldBag,
) -> std::result::Result<EmployeeCreationRequest, ValidationFailure> {
    tracing::debug!("Validation started for create employee request body");

    let name = required_text(fields, "name").ok_or(ValidationFailure::MissingOrInvalidName)?;

    let salary =
        required_integer(fields, "salary").ok_or(ValidationFailure::MissingOrInvalidSalary)?;
    if salary < MIN_SALARY {
        return Err(ValidationFailure::SalaryBelowMinimum);
    }

    let age = required_integer(fields, "age").ok_or(ValidationFailure::MissingOrInvalidAge)?;
    if age < MIN_AGE {
        return Err(ValidationFailure::AgeBelowMinimum);
    } else if age > MAX_AGE {
        return Err(ValidationFailure::AgeAboveMaximum);
    }

    let title = required_text(fields, "title").ok_or(ValidationFailure::MissingOrInvalidTitle)?;

    tracing::debug!("Validation successful for create employee input");

    Ok(EmployeeCreationRequest {
        name: name.to_string(),
        salary,
        age,
        title: title.to_string(),
    })
}

// 空白字串視同缺少
fn required_text<'a>(fields: &'a FieldBag, key: &str) -> Option<&'a str> {
    match fields.get(key) {
        Some(FieldValue::Text(text)) if !text.trim().is_empty() => Some(text.as_str()),
        _ => None,
    }
}

fn required_integer(fields: &FieldBag, key: &str) -> Option<i32> {
    match fields.get(key) {
        Some(FieldValue::Integer(value)) => Some(*value),
        _ => None,
    }
}
