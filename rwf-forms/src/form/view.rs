//! What's needed to render a form: its inputs and errors.
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;

use super::{Env, FieldPath, FormEncType, FormInput};

/// Validation error for a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub path: FieldPath,
    pub message: String,
}

impl FieldError {
    pub fn new(path: FieldPath, message: impl ToString) -> Self {
        Self {
            path,
            message: message.to_string(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A form ready to be rendered.
///
/// Field names passed to the accessors are relative to the form, e.g. `email` for the
/// input submitted as `signup.email`.
#[derive(Debug, Clone)]
pub struct View {
    name: String,
    enc_type: FormEncType,
    inputs: HashMap<FieldPath, Vec<FormInput>>,
    errors: Vec<FieldError>,
}

impl View {
    pub(crate) fn new(name: &str, enc_type: FormEncType) -> Self {
        Self {
            name: name.to_string(),
            enc_type,
            inputs: HashMap::new(),
            errors: vec![],
        }
    }

    pub(crate) fn with_inputs(mut self, inputs: HashMap<FieldPath, Vec<FormInput>>) -> Self {
        self.inputs = inputs;
        self
    }

    pub(crate) fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    /// Name of the form.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enc_type(&self) -> FormEncType {
        self.enc_type
    }

    /// Full input name of a field, to be used in the `name` attribute.
    pub fn input_name(&self, field: &str) -> String {
        self.path(field).name()
    }

    /// Inputs submitted for the field. Empty when the form wasn't submitted.
    pub fn input(&self, field: &str) -> &[FormInput] {
        match self.inputs.get(&self.path(field)) {
            Some(inputs) => inputs,
            None => &[],
        }
    }

    /// First text input submitted for the field.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.input(field).iter().find_map(|input| input.text())
    }

    /// All validation errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Validation errors of a single field.
    pub fn errors_for(&self, field: &str) -> Vec<&FieldError> {
        let path = self.path(field);
        self.errors
            .iter()
            .filter(|error| error.path == path)
            .collect()
    }

    fn path(&self, field: &str) -> FieldPath {
        let mut path = FieldPath::new(&self.name);
        for component in field.split('.').filter(|c| !c.is_empty()) {
            path = path.child(component);
        }
        path
    }
}

/// Remembers everything a form looked up, so it can be shown again.
pub(crate) struct Recorder<'a> {
    env: &'a dyn Env,
    inputs: RefCell<HashMap<FieldPath, Vec<FormInput>>>,
}

impl<'a> Recorder<'a> {
    pub(crate) fn new(env: &'a dyn Env) -> Self {
        Self {
            env,
            inputs: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn into_inputs(self) -> HashMap<FieldPath, Vec<FormInput>> {
        self.inputs.into_inner()
    }
}

impl Env for Recorder<'_> {
    fn lookup(&self, path: &FieldPath) -> Vec<FormInput> {
        let inputs = self.env.lookup(path);
        self.inputs
            .borrow_mut()
            .insert(path.clone(), inputs.clone());
        inputs
    }
}
