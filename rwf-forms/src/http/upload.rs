//! File uploads sent with `multipart/form-data` forms.
//!
//! Every file part is checked against an [`UploadPolicy`] and a per-part policy. Parts
//! that pass are written to a temporary file, and a [`PartHandler`] decides what to do with
//! it. The temporary file is removed as soon as the handler returns, so handlers that
//! want to keep the upload must copy or move it somewhere else.
//!
//! Non-file inputs in the same body are returned as [`Params`], subject to the same
//! [`UploadPolicy`].
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs::{remove_file, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Error, Params, Request};
use crate::config::get_config;

/// Limits applied to the whole `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPolicy {
    /// Include non-file inputs in the returned parameters.
    pub process_form_inputs: bool,
    /// Non-file inputs larger than this are dropped.
    pub max_form_input_size: usize,
    /// Non-file inputs past this count are dropped.
    pub max_form_inputs: usize,
}

impl Default for UploadPolicy {
    /// Limits from the `[forms]` section of the configuration.
    fn default() -> Self {
        let forms = &get_config().forms;

        Self {
            process_form_inputs: forms.process_form_inputs,
            max_form_input_size: forms.max_form_input_size,
            max_form_inputs: forms.max_form_inputs,
        }
    }
}

/// Decision about a single file part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartUploadPolicy {
    /// Reject the part.
    Disallow,
    /// Accept the part if it's no larger than `max_size` bytes.
    Allow { max_size: usize },
}

impl PartUploadPolicy {
    pub fn allow_with_maximum_size(max_size: usize) -> Self {
        Self::Allow { max_size }
    }
}

/// Why a file part was not stored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PartError {
    #[error("file upload is not allowed")]
    Disallowed,

    #[error("file is {size} bytes, the maximum is {max_size}")]
    TooLarge { size: usize, max_size: usize },

    #[error("file could not be stored: {0}")]
    Storage(String),
}

/// Metadata of a file part, as sent by the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct PartInfo {
    /// Name of the form input.
    pub field_name: String,
    /// File name chosen by the user, if any.
    pub file_name: Option<String>,
    /// `Content-Type` of the part. Defaults to `application/octet-stream`.
    pub content_type: String,
}

/// Handles file parts one at a time.
#[async_trait]
pub trait PartHandler: Send {
    type Output: Send;

    /// Called for every file part, with the path to the stored upload or the reason it
    /// wasn't stored, including failures to write it to disk. Returning `None` leaves the part out of the results.
    async fn handle_part(
        &mut self,
        part: &PartInfo,
        upload: Result<&Path, PartError>,
    ) -> Result<Option<Self::Output>, Error>;
}

/// Result of processing a `multipart/form-data` body.
#[derive(Debug)]
pub struct FileUploads<T> {
    /// Non-file inputs allowed by the [`UploadPolicy`].
    pub inputs: Params,
    /// Values returned by the [`PartHandler`], in the order the parts were sent.
    pub files: Vec<T>,
}

impl Request {
    /// Process all parts of a `multipart/form-data` body.
    ///
    /// Admitted file parts are written to `tmp_dir`, passed to `handler`, and deleted
    /// once `handler` returns. A part that can't be written is passed to `handler` as
    /// [`PartError::Storage`] and the remaining parts are still processed.
    pub async fn handle_file_uploads<H: PartHandler>(
        &self,
        tmp_dir: &Path,
        upload_policy: &UploadPolicy,
        part_policy: &(dyn Fn(&PartInfo) -> PartUploadPolicy + Send + Sync),
        handler: &mut H,
    ) -> Result<FileUploads<H::Output>, Error> {
        let multipart = self.multipart_body()?;
        let mut inputs = Params::new();
        let mut files = vec![];
        let mut form_inputs = 0;

        for part in multipart.parts() {
            if !part.is_file() {
                if !upload_policy.process_form_inputs {
                    continue;
                }

                form_inputs += 1;

                if form_inputs > upload_policy.max_form_inputs {
                    debug!("dropping form input \"{}\": too many inputs", part.name());
                } else if part.as_bytes().len() > upload_policy.max_form_input_size {
                    debug!("dropping form input \"{}\": too large", part.name());
                } else {
                    inputs.insert(part.name(), String::from_utf8_lossy(part.as_bytes()));
                }

                continue;
            }

            let info = PartInfo {
                field_name: part.name().to_string(),
                file_name: part.filename().map(|name| name.to_string()),
                content_type: part
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string(),
            };

            let admission = match part_policy(&info) {
                PartUploadPolicy::Disallow => Err(PartError::Disallowed),
                PartUploadPolicy::Allow { max_size } if part.as_bytes().len() > max_size => {
                    Err(PartError::TooLarge {
                        size: part.as_bytes().len(),
                        max_size,
                    })
                }
                PartUploadPolicy::Allow { .. } => Ok(()),
            };

            let result = match admission {
                Ok(()) => {
                    let path = tmp_dir.join(format!("rwf-upload-{}", Uuid::new_v4()));

                    match write_upload(&path, part.as_bytes()).await {
                        Ok(()) => {
                            let result = handler.handle_part(&info, Ok(path.as_path())).await;

                            if let Err(err) = remove_file(&path).await {
                                warn!("failed to remove \"{}\": {}", path.display(), err);
                            }

                            result?
                        }

                        Err(err) => {
                            debug!(
                                "failed to write upload \"{}\" to \"{}\": {}",
                                info.field_name,
                                path.display(),
                                err
                            );

                            // The file may have been created before the write failed.
                            let _ = remove_file(&path).await;

                            handler
                                .handle_part(&info, Err(PartError::Storage(err.to_string())))
                                .await?
                        }
                    }
                }

                Err(err) => handler.handle_part(&info, Err(err)).await?,
            };

            if let Some(result) = result {
                files.push(result);
            }
        }

        Ok(FileUploads { inputs, files })
    }
}

async fn write_upload(path: &Path, data: &[u8]) -> Result<(), std::io::Error> {
    let mut file = File::create(path).await?;
    file.write_all(data).await?;
    file.flush().await
}

/// Directory used for uploads when none is configured.
pub fn default_tmp_dir() -> PathBuf {
    match get_config().forms.tmp_dir {
        Some(ref tmp_dir) => tmp_dir.clone(),
        None => std::env::temp_dir(),
    }
}
