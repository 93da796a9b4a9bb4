//! Generic form handling.
//!
//! A [`Form`] reads its inputs from an [`Env`], which maps field paths to the values
//! submitted for them. Forms don't know where their inputs come from: [`get_form`]
//! renders a form without any input, and [`post_form`] asks the caller for an
//! environment matching the form's [`FormEncType`] and binds the form to it.
//!
//! ```
//! use rwf_forms::form::{get_form, FieldPath, Form, TextField};
//!
//! let form = TextField::new("email").required();
//! let view = get_form("signup", &form);
//!
//! assert_eq!(view.name(), "signup");
//! assert!(view.errors().is_empty());
//! ```
use std::fmt::Display;
use std::future::Future;
use std::path::PathBuf;

pub mod field;
pub mod view;

pub use field::{FileField, TextField};
pub use view::{FieldError, View};

use crate::Error;
use view::Recorder;

/// Path to a field inside a form, e.g. `signup.address.city`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    components: Vec<String>,
}

impl FieldPath {
    /// Path with a single component, typically the form's name.
    pub fn new(name: impl ToString) -> Self {
        Self {
            components: vec![name.to_string()],
        }
    }

    /// Path to a field nested in this one.
    pub fn child(&self, name: impl ToString) -> Self {
        let mut components = self.components.clone();
        components.push(name.to_string());
        Self { components }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// The input name this path is submitted under. Components are joined with `.`.
    pub fn name(&self) -> String {
        self.components.join(".")
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self {
            components: path
                .split('.')
                .filter(|c| !c.is_empty())
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// A value submitted for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormInput {
    /// Text input.
    Text(String),
    /// Uploaded file, stored at this path.
    File(PathBuf),
}

impl FormInput {
    pub fn text(&self) -> Option<&str> {
        match self {
            FormInput::Text(text) => Some(text),
            FormInput::File(_) => None,
        }
    }

    pub fn file(&self) -> Option<&PathBuf> {
        match self {
            FormInput::File(path) => Some(path),
            FormInput::Text(_) => None,
        }
    }
}

/// Source of submitted form inputs.
pub trait Env {
    /// All inputs submitted for the field, in the order they were received.
    fn lookup(&self, path: &FieldPath) -> Vec<FormInput>;
}

impl<F> Env for F
where
    F: Fn(&FieldPath) -> Vec<FormInput>,
{
    fn lookup(&self, path: &FieldPath) -> Vec<FormInput> {
        self(path)
    }
}

/// How the browser encodes the form when it's submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormEncType {
    /// `application/x-www-form-urlencoded`
    #[default]
    UrlEncoded,
    /// `multipart/form-data`, required for file uploads.
    Multipart,
}

impl FormEncType {
    /// Value of the `enctype` attribute of the HTML form.
    pub fn content_type(&self) -> &'static str {
        match self {
            FormEncType::UrlEncoded => "application/x-www-form-urlencoded",
            FormEncType::Multipart => "multipart/form-data",
        }
    }
}

impl Display for FormEncType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content_type())
    }
}

/// A form that can be bound to submitted inputs.
pub trait Form: Send + Sync {
    type Output;

    /// Encoding the form must be submitted with.
    fn enc_type(&self) -> FormEncType {
        FormEncType::UrlEncoded
    }

    /// Read and validate the form's fields. Fields live under `path`.
    fn bind(&self, path: &FieldPath, env: &dyn Env) -> Result<Self::Output, Vec<FieldError>>;
}

/// Render the form without any input.
pub fn get_form<F: Form>(name: &str, form: &F) -> View {
    View::new(name, form.enc_type())
}

/// Bind the form to submitted inputs.
///
/// `make_env` receives the form's encoding type and returns the environment to read
/// the inputs from. The output is returned only if all fields are valid; the view
/// contains the submitted inputs and any errors either way.
pub async fn post_form<F, M, Fut, E>(
    name: &str,
    form: &F,
    make_env: M,
) -> Result<(View, Option<F::Output>), Error>
where
    F: Form,
    M: FnOnce(FormEncType) -> Fut,
    Fut: Future<Output = Result<E, Error>>,
    E: Env,
{
    let env = make_env(form.enc_type()).await?;
    let recorder = Recorder::new(&env);

    let result = form.bind(&FieldPath::new(name), &recorder);
    let mut view = View::new(name, form.enc_type()).with_inputs(recorder.into_inputs());

    match result {
        Ok(output) => Ok((view, Some(output))),
        Err(errors) => {
            view = view.with_errors(errors);
            Ok((view, None))
        }
    }
}
