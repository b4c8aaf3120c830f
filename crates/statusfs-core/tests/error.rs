//! Tests for error handling

use statusfs_core::error::{StatusError, StatusResult};

#[test]
fn test_status_error_not_found_display()
{
    let error = StatusError::NotFound("config_bogus".to_string());
    let message = format!("{}", error);
    assert!(message.contains("not found"));
    assert!(message.contains("config_bogus"));
}

#[test]
fn test_status_error_invalid_display()
{
    let error = StatusError::Invalid("boolean write at offset 3".to_string());
    let message = format!("{}", error);
    assert!(message.contains("invalid"));
    assert!(message.contains("offset 3"));
}

#[test]
fn test_status_error_hook_failed_display()
{
    let error = StatusError::HookFailed("receiver dropped".to_string());
    let message = format!("{}", error);
    assert!(message.contains("Hook failed"));
    assert!(message.contains("receiver dropped"));
}

#[test]
fn test_status_error_classes()
{
    assert!(StatusError::NotFound(String::new()).is_not_found());
    assert!(!StatusError::NotFound(String::new()).is_invalid());
    assert!(StatusError::Invalid(String::new()).is_invalid());
    assert!(!StatusError::HookFailed(String::new()).is_not_found());
}

#[test]
fn test_result_type()
{
    // Test that Result type is properly aliased
    let _result: StatusResult<usize> = Ok(1);
    let _error_result: StatusResult<usize> = Err(StatusError::NotFound("statistics".to_string()));
}
