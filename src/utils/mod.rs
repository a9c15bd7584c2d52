// Utility modules for Gatehouse

pub mod audit_logger;
pub mod auth_errors;
pub mod password;
pub mod validation;

pub use audit_logger::{AuditAction, AuditLogger};
pub use auth_errors::{log_auth_failure, AuthError, AuthErrorResponse};
pub use password::{hash_password, verify_password, PasswordError};
pub use validation::{normalize_email, trim_and_validate_field};
