//! Types and functions needed to bind forms, all in one import:
//!
//! ```
//! use rwf_forms::prelude::*;
//! ```
pub use crate::binding::{run_form, run_form_with, FormConfig, FormMethod, UploadedFile};
pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::form::{
    Env, FieldError, FieldPath, FileField, Form, FormEncType, FormInput, TextField, View,
};
pub use crate::http::{Method, PartInfo, PartUploadPolicy, Request, UploadPolicy};
pub use crate::logging::Logger;

/// A macro to easily implement async traits methods.
pub use async_trait::async_trait;
pub use tokio;
