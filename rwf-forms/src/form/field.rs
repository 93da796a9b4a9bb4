//! Single-input forms, used as building blocks for larger forms.
use std::path::PathBuf;

use super::{Env, FieldError, FieldPath, Form, FormEncType};

/// A text input.
///
/// When nothing is submitted, the field falls back to its default value,
/// or fails if it's required.
#[derive(Debug, Clone)]
pub struct TextField {
    name: String,
    default: String,
    required: bool,
}

impl TextField {
    pub fn new(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            default: String::new(),
            required: false,
        }
    }

    /// Fail validation if the input is missing or empty.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value used when the input is missing.
    pub fn default_value(mut self, value: impl ToString) -> Self {
        self.default = value.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Form for TextField {
    type Output = String;

    fn bind(&self, path: &FieldPath, env: &dyn Env) -> Result<String, Vec<FieldError>> {
        let path = path.child(&self.name);
        let value = env
            .lookup(&path)
            .into_iter()
            .find_map(|input| input.text().map(|text| text.to_string()));

        match value {
            Some(value) if !(self.required && value.is_empty()) => Ok(value),
            _ if self.required => Err(vec![FieldError::new(path, "is required")]),
            _ => Ok(self.default.clone()),
        }
    }
}

/// A file input. Binds to the path of the first uploaded file, if any.
#[derive(Debug, Clone)]
pub struct FileField {
    name: String,
}

impl FileField {
    pub fn new(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Form for FileField {
    type Output = Option<PathBuf>;

    fn enc_type(&self) -> FormEncType {
        FormEncType::Multipart
    }

    fn bind(&self, path: &FieldPath, env: &dyn Env) -> Result<Option<PathBuf>, Vec<FieldError>> {
        Ok(env
            .lookup(&path.child(&self.name))
            .into_iter()
            .find_map(|input| input.file().cloned()))
    }
}
