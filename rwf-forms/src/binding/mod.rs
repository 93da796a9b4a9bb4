//! Bind forms to HTTP requests.
//!
//! [`run_form`] looks at the request method: `GET` requests render the form without
//! any input, everything else binds the form to the request's parameters and, for
//! `multipart/form-data` forms, to the uploaded files.
//!
//! ```rust,ignore
//! use rwf_forms::binding::run_form;
//! use rwf_forms::form::TextField;
//!
//! let (view, email) = run_form("newsletter", &TextField::new("email").required(), &request).await?;
//!
//! if let Some(email) = email {
//!     // subscribe
//! }
//! ```
use tracing::debug;

pub mod config;
pub mod env;
pub mod files;

pub use config::{FormConfig, PartPolicy};
pub use env::RequestEnv;
pub use files::{upload_files, UploadedFile};

use crate::form::{get_form, post_form, Form, FormEncType, View};
use crate::http::{Method, Request};
use crate::Error;

/// How the form is handled: rendered empty, or bound to the submitted inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

impl FormMethod {
    /// The override if one is set, otherwise `Get` for `GET` requests and `Post` for
    /// everything else.
    pub fn resolve(method_override: Option<FormMethod>, method: &Method) -> Self {
        match method_override {
            Some(method) => method,
            None if method == &Method::Get => FormMethod::Get,
            None => FormMethod::Post,
        }
    }
}

/// Run the form against the request with the default [`FormConfig`].
pub async fn run_form<F: Form>(
    name: &str,
    form: &F,
    request: &Request,
) -> Result<(View, Option<F::Output>), Error> {
    run_form_with(name, form, request, &FormConfig::default()).await
}

/// Run the form against the request.
///
/// The output is only returned when the form was submitted and all its fields are valid.
pub async fn run_form_with<F: Form>(
    name: &str,
    form: &F,
    request: &Request,
    config: &FormConfig,
) -> Result<(View, Option<F::Output>), Error> {
    let method = FormMethod::resolve(config.method, request.method());

    debug!(
        "form \"{}\": {} {} handled as {:?}",
        name,
        request.method(),
        request.path(),
        method
    );

    match method {
        FormMethod::Get => Ok((get_form(name, form), None)),

        FormMethod::Post => {
            post_form(name, form, |enc_type| request_env(request, config, enc_type)).await
        }
    }
}

/// Inputs of a submitted form, read the way the form was encoded.
async fn request_env(
    request: &Request,
    config: &FormConfig,
    enc_type: FormEncType,
) -> Result<RequestEnv, Error> {
    match enc_type {
        FormEncType::UrlEncoded => Ok(RequestEnv::from_request(request, vec![])),

        FormEncType::Multipart => {
            let uploads = upload_files(request, config).await?;
            let params = request.params().clone().merge(uploads.inputs);

            Ok(RequestEnv::new(params, uploads.files))
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::*;
    use crate::form::{Env, FieldError, FieldPath, FileField, FormInput, TextField};
    use crate::http::multipart::test::multipart_body;
    use crate::http::request::test::request;
    use crate::http::PartUploadPolicy;
    use tempdir::TempDir;

    /// Profile form with a required name and an optional avatar.
    struct Profile {
        enc_type: FormEncType,
    }

    impl Form for Profile {
        type Output = (String, Option<PathBuf>);

        fn enc_type(&self) -> FormEncType {
            self.enc_type
        }

        fn bind(&self, path: &FieldPath, env: &dyn Env) -> Result<Self::Output, Vec<FieldError>> {
            let name = TextField::new("name").required().bind(path, env)?;
            let avatar = FileField::new("avatar").bind(path, env)?;

            Ok((name, avatar))
        }
    }

    const MULTIPART: Profile = Profile {
        enc_type: FormEncType::Multipart,
    };

    const URL_ENCODED: Profile = Profile {
        enc_type: FormEncType::UrlEncoded,
    };

    fn multipart_request_body() -> String {
        multipart_body(
            r#"--b
Content-Disposition: form-data; name="profile.name"

Alice
--b
Content-Disposition: form-data; name="profile.avatar"; filename="me.png"
Content-Type: image/png

PNGDATA
--b
Content-Disposition: form-data; name="profile.backup"; filename="big.png"
Content-Type: image/png

0123456789
--b--"#,
        )
    }

    fn config(dir: &TempDir) -> FormConfig {
        FormConfig::default().tmp_dir(dir.path())
    }

    #[test]
    fn test_resolve_method() {
        assert_eq!(FormMethod::resolve(None, &Method::Get), FormMethod::Get);
        assert_eq!(FormMethod::resolve(None, &Method::Post), FormMethod::Post);
        assert_eq!(FormMethod::resolve(None, &Method::Put), FormMethod::Post);
        assert_eq!(
            FormMethod::resolve(None, &Method::Other("PROPFIND".into())),
            FormMethod::Post
        );
        assert_eq!(
            FormMethod::resolve(Some(FormMethod::Post), &Method::Get),
            FormMethod::Post
        );
        assert_eq!(
            FormMethod::resolve(Some(FormMethod::Get), &Method::Post),
            FormMethod::Get
        );
    }

    #[tokio::test]
    async fn test_get_has_no_result() {
        let dir = TempDir::new("rwf-forms-dispatch").unwrap();
        let request = request("GET /profile?profile.name=Alice HTTP/1.1", "").await;

        let (view, result) = run_form_with("profile", &URL_ENCODED, &request, &config(&dir))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(view.input("name").is_empty());
        assert!(view.errors().is_empty());
    }

    #[tokio::test]
    async fn test_get_override_ignores_multipart_body() {
        let dir = TempDir::new("rwf-forms-dispatch").unwrap();
        let request = request(
            "POST /profile HTTP/1.1\r\nContent-Type: multipart/form-data; boundary=b",
            &multipart_request_body(),
        )
        .await;
        let config = config(&dir).method(FormMethod::Get);

        let (_, result) = run_form_with("profile", &MULTIPART, &request, &config)
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_post_url_encoded() {
        let dir = TempDir::new("rwf-forms-dispatch").unwrap();
        let request = request(
            "POST /profile HTTP/1.1\r\nContent-Type: application/x-www-form-urlencoded",
            "profile.name=Alice&profile.avatar=%2Fetc%2Fpasswd",
        )
        .await;

        let (view, result) = run_form_with("profile", &URL_ENCODED, &request, &config(&dir))
            .await
            .unwrap();

        // Text can't pose as a file.
        assert_eq!(result, Some(("Alice".to_string(), None)));
        assert_eq!(
            view.input("avatar"),
            &[FormInput::Text("/etc/passwd".into())]
        );
        assert!(view
            .input("name")
            .iter()
            .chain(view.input("avatar"))
            .all(|input| input.file().is_none()));
    }

    #[tokio::test]
    async fn test_post_errors() {
        let dir = TempDir::new("rwf-forms-dispatch").unwrap();
        let request = request(
            "POST /profile HTTP/1.1\r\nContent-Type: application/x-www-form-urlencoded",
            "profile.name=",
        )
        .await;

        let (view, result) = run_form_with("profile", &URL_ENCODED, &request, &config(&dir))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(view.errors_for("name").len(), 1);
        assert_eq!(view.text("name"), Some(""));
    }

    #[tokio::test]
    async fn test_post_multipart() {
        let dir = TempDir::new("rwf-forms-dispatch").unwrap();
        let request = request(
            "POST /profile HTTP/1.1\r\nContent-Type: multipart/form-data; boundary=b",
            &multipart_request_body(),
        )
        .await;
        let config = config(&dir).part_policy(|part| {
            if part.field_name == "profile.backup" {
                PartUploadPolicy::Disallow
            } else {
                PartUploadPolicy::allow_with_maximum_size(1024)
            }
        });

        let (view, result) = run_form_with("profile", &MULTIPART, &request, &config)
            .await
            .unwrap();

        let (name, avatar) = result.unwrap();
        assert_eq!(name, "Alice");

        let avatar = avatar.unwrap();
        assert_eq!(view.input("avatar"), &[FormInput::File(avatar.clone())]);
        assert!(avatar.starts_with(dir.path()));
        assert_eq!(std::fs::read(&avatar).unwrap(), b"PNGDATA");

        // The rejected part left nothing behind.
        assert!(view.input("backup").is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_post_multipart_missing_tmp_dir() {
        let dir = TempDir::new("rwf-forms-dispatch").unwrap();
        let request = request(
            "POST /profile HTTP/1.1\r\nContent-Type: multipart/form-data; boundary=b",
            &multipart_request_body(),
        )
        .await;
        let config = FormConfig::default().tmp_dir(dir.path().join("missing"));

        let (view, result) = run_form_with("profile", &MULTIPART, &request, &config)
            .await
            .unwrap();

        // Files that can't be stored are dropped, the rest of the form still binds.
        assert_eq!(result, Some(("Alice".to_string(), None)));
        assert!(view.input("avatar").is_empty());
        assert!(view.errors().is_empty());
    }

    #[tokio::test]
    async fn test_post_override_on_get() {
        let dir = TempDir::new("rwf-forms-dispatch").unwrap();
        let request = request("GET /profile?profile.name=Bob HTTP/1.1", "").await;
        let config = config(&dir).method(FormMethod::Post);

        let (_, result) = run_form_with("profile", &URL_ENCODED, &request, &config)
            .await
            .unwrap();

        assert_eq!(result, Some(("Bob".to_string(), None)));
    }

    #[tokio::test]
    async fn test_run_form_defaults() {
        let request = request("GET /profile HTTP/1.1", "").await;
        let (view, result) = run_form("profile", &MULTIPART, &request).await.unwrap();

        assert!(result.is_none());
        assert_eq!(view.enc_type(), FormEncType::Multipart);
    }

    #[tokio::test]
    async fn test_post_multipart_malformed() {
        let dir = TempDir::new("rwf-forms-dispatch").unwrap();
        let request = request(
            "POST /profile HTTP/1.1\r\nContent-Type: multipart/form-data",
            "garbage",
        )
        .await;

        let result = run_form_with("profile", &MULTIPART, &request, &config(&dir)).await;
        assert!(matches!(result, Err(Error::Http(_))));
    }
}
