use crate::constants::pagination;

use super::ApiError;

pub fn validate_employee_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid employee ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_record_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid record ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_username(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Username cannot be empty"));
    }

    if trimmed.len() > 50 {
        return Err(ApiError::validation(
            "Username must be 50 characters or less",
        ));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, dots, hyphens, and underscores",
        ));
    }

    Ok(trimmed)
}

/// Clamps an optional page number to 1-based, defaulting to the first page.
pub fn normalize_page(page: Option<u64>) -> u64 {
    page.filter(|p| *p > 0).unwrap_or(1)
}

/// Clamps an optional page size into the allowed window.
pub fn normalize_page_size(page_size: Option<u64>) -> u64 {
    page_size
        .filter(|s| *s > 0)
        .unwrap_or(pagination::DEFAULT_PAGE_SIZE)
        .min(pagination::MAX_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_employee_id() {
        assert!(validate_employee_id(1).is_ok());
        assert!(validate_employee_id(12345).is_ok());
        assert!(validate_employee_id(0).is_err());
        assert!(validate_employee_id(-1).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("jdoe").is_ok());
        assert!(validate_username("maria.santos").is_ok());
        assert!(validate_username("build-bot_2").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("a".repeat(51).as_str()).is_err());
        assert!(validate_username("no spaces").is_err());
        assert!(validate_username("bad@name").is_err());
    }

    #[test]
    fn test_normalize_page() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some(0)), 1);
        assert_eq!(normalize_page(Some(7)), 7);
    }

    #[test]
    fn test_normalize_page_size() {
        assert_eq!(normalize_page_size(None), pagination::DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_page_size(Some(0)), pagination::DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_page_size(Some(25)), 25);
        assert_eq!(normalize_page_size(Some(10_000)), pagination::MAX_PAGE_SIZE);
    }
}
