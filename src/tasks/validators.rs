use super::models::{CreateTaskRequest, UpdateTaskRequest};
use crate::common::{ValidationResult, Validator};

const MAX_TITLE_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 2000;

fn check_title(result: &mut ValidationResult, title: &str) {
    if title.trim().is_empty() {
        result.add_error("title", "Title is required");
    } else if title.trim().chars().count() > MAX_TITLE_LEN {
        result.add_error("title", "Title must not exceed 255 characters");
    }
}

fn check_description(result: &mut ValidationResult, description: Option<&str>) {
    if description.map_or(false, |d| d.chars().count() > MAX_DESCRIPTION_LEN) {
        result.add_error("description", "Description must not exceed 2000 characters");
    }
}

impl Validator<CreateTaskRequest> for CreateTaskRequest {
    fn validate(&self, data: &CreateTaskRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        check_title(&mut result, &data.title);
        check_description(&mut result, data.description.as_deref());

        result
    }
}

impl Validator<UpdateTaskRequest> for UpdateTaskRequest {
    fn validate(&self, data: &UpdateTaskRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(title) = &data.title {
            check_title(&mut result, title);
        }
        check_description(&mut result, data.description.as_ref().and_then(|d| d.as_deref()));

        result
    }
}
