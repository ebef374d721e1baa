// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

pub const ROLE_TEACHER: &str = "TEACHER";
pub const ROLE_STUDENT: &str = "STUDENT";

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    pub name: String,

    /// Unique email address, used as the login identifier.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'TEACHER' or 'STUDENT'.
    pub role: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A student enrolled with a teacher, joined from `teacher_students`.
#[derive(Debug, Serialize, FromRow)]
pub struct EnrolledStudent {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 2,
        max = 100,
        message = "Name length must be between 2 and 100 characters."
    ))]
    pub name: String,
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password length must be between 6 and 128 characters."
    ))]
    pub password: String,
    #[validate(custom(function = validate_role))]
    pub role: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// DTO for enrolling a student by email.
#[derive(Debug, Deserialize, Validate)]
pub struct EnrollStudentRequest {
    #[validate(email)]
    pub email: String,
}

fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    if role != ROLE_TEACHER && role != ROLE_STUDENT {
        return Err(validator::ValidationError::new("invalid_role"));
    }
    Ok(())
}
