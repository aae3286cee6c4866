use super::models::{ConfirmSignUpRequest, LoginRequest, RegisterRequest};
use crate::common::validation::check_email;
use crate::common::{ValidationResult, Validator};

impl Validator<RegisterRequest> for RegisterRequest {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        check_email(&mut result, "email", &data.email);

        // Strength rules belong to the provider's password policy
        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }

        if let Some(name) = &data.name {
            if name.chars().count() > 255 {
                result.add_error("name", "Name must not exceed 255 characters");
            }
        }

        result
    }
}

impl Validator<ConfirmSignUpRequest> for ConfirmSignUpRequest {
    fn validate(&self, data: &ConfirmSignUpRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        check_email(&mut result, "email", &data.email);

        if data.confirmation_code.trim().is_empty() {
            result.add_error("confirmationCode", "Confirmation code is required");
        }

        result
    }
}

impl Validator<LoginRequest> for LoginRequest {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        check_email(&mut result, "email", &data.email);

        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }

        result
    }
}
