//! Bind HTML forms, including file uploads, to Rwf HTTP requests.
//!
//! Forms are described with the [`form::Form`] trait and don't know anything about HTTP.
//! This crate reads the request, decides whether the form is being rendered or submitted,
//! and hands the form its inputs:
//!
//! - `GET` requests render the form empty,
//! - other requests bind it to the query and body parameters,
//! - `multipart/form-data` forms also get the uploaded files, copied to a temp directory.
//!
//! # Example
//!
//! ```rust
//! use rwf_forms::prelude::*;
//!
//! struct Avatar;
//!
//! impl Form for Avatar {
//!     type Output = (String, Option<std::path::PathBuf>);
//!
//!     fn enc_type(&self) -> FormEncType {
//!         FormEncType::Multipart
//!     }
//!
//!     fn bind(&self, path: &FieldPath, env: &dyn Env) -> Result<Self::Output, Vec<FieldError>> {
//!         let name = TextField::new("name").required().bind(path, env)?;
//!         let file = FileField::new("file").bind(path, env)?;
//!
//!         Ok((name, file))
//!     }
//! }
//!
//! async fn upload(request: &Request) -> Result<String, Error> {
//!     let (view, result) = run_form("avatar", &Avatar, request).await?;
//!
//!     Ok(match result {
//!         Some((name, Some(file))) => format!("{} uploaded {}", name, file.display()),
//!         _ => format!("{} errors", view.errors().len()),
//!     })
//! }
//! ```
pub mod binding;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod logging;
pub mod prelude;

/// Wrapper around async traits to make them easy to use.
pub use async_trait::async_trait;
pub use error::Error;
/// Tokio is an asynchronous runtime for Rust.
pub use tokio;
