//! Form inputs read from a request.
use super::UploadedFile;
use crate::form::{Env, FieldPath, FormInput};
use crate::http::{Params, Request};

/// Request parameters and uploaded files, looked up by input name.
///
/// Text inputs come first, followed by files uploaded under the same name.
#[derive(Debug, Clone, Default)]
pub struct RequestEnv {
    params: Params,
    files: Vec<UploadedFile>,
}

impl RequestEnv {
    pub fn new(params: Params, files: Vec<UploadedFile>) -> Self {
        Self { params, files }
    }

    /// Environment with the request's parameters and the given uploads.
    pub fn from_request(request: &Request, files: Vec<UploadedFile>) -> Self {
        Self::new(request.params().clone(), files)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }
}

impl Env for RequestEnv {
    fn lookup(&self, path: &FieldPath) -> Vec<FormInput> {
        let name = path.name();

        let text = self
            .params
            .all(&name)
            .iter()
            .map(|value| FormInput::Text(value.clone()));

        let files = self
            .files
            .iter()
            .filter(|file| file.field_name == name)
            .map(|file| FormInput::File(file.path.clone()));

        text.chain(files).collect()
    }
}
