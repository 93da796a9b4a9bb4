//! Keep uploaded files around after the request is handled.
//!
//! The request removes its temporary upload files as soon as each part is handled,
//! so every accepted file is copied to `_<temp file name><file name>` in the temp
//! directory first. Removing the copies is up to the application.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::copy;
use tracing::debug;

use super::FormConfig;
use crate::http::{self, FileUploads, PartError, PartHandler, PartInfo, Request};
use crate::Error;

/// A file uploaded with a form, copied out of the request's temp storage.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// Input name the file was uploaded with.
    pub field_name: String,
    /// Where the copy is stored.
    pub path: PathBuf,
}

impl UploadedFile {
    pub fn new(field_name: impl ToString, path: impl Into<PathBuf>) -> Self {
        Self {
            field_name: field_name.to_string(),
            path: path.into(),
        }
    }
}

/// Copies accepted uploads into the temp directory.
struct StoreFile {
    tmp_dir: PathBuf,
}

impl StoreFile {
    fn destination(&self, upload: &Path, part: &PartInfo) -> PathBuf {
        let upload_name = upload
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        // Browsers send just the name, but don't let a crafted one escape the directory.
        let file_name = part
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit(['/', '\\']).next())
            .unwrap_or("");

        self.tmp_dir.join(format!("_{}{}", upload_name, file_name))
    }
}

#[async_trait]
impl PartHandler for StoreFile {
    type Output = UploadedFile;

    async fn handle_part(
        &mut self,
        part: &PartInfo,
        upload: Result<&Path, PartError>,
    ) -> Result<Option<UploadedFile>, http::Error> {
        let upload = match upload {
            Ok(upload) => upload,
            Err(err) => {
                debug!("skipping upload \"{}\": {}", part.field_name, err);
                return Ok(None);
            }
        };

        let destination = self.destination(upload, part);

        if let Err(err) = copy(upload, &destination).await {
            debug!(
                "skipping upload \"{}\": copy to \"{}\" failed: {}",
                part.field_name,
                destination.display(),
                err
            );
            return Ok(None);
        }

        debug!(
            "stored upload \"{}\" at \"{}\"",
            part.field_name,
            destination.display()
        );

        Ok(Some(UploadedFile::new(&part.field_name, destination)))
    }
}

/// Store every accepted file of a `multipart/form-data` request.
///
/// Files rejected by the part policy, or that couldn't be stored, are left out. Non-file inputs are returned
/// alongside the files.
pub async fn upload_files(
    request: &Request,
    config: &FormConfig,
) -> Result<FileUploads<UploadedFile>, Error> {
    let tmp_dir = config.resolve_tmp_dir();
    let mut store = StoreFile {
        tmp_dir: tmp_dir.clone(),
    };

    let uploads = request
        .handle_file_uploads(
            &tmp_dir,
            &config.upload_policy,
            config.part_policy.as_ref(),
            &mut store,
        )
        .await?;

    Ok(uploads)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::http::multipart::test::multipart_body;
    use crate::http::request::test::request;
    use crate::http::PartUploadPolicy;
    use tempdir::TempDir;

    fn part(file_name: Option<&str>) -> PartInfo {
        PartInfo {
            field_name: "avatar".into(),
            file_name: file_name.map(|name| name.to_string()),
            content_type: "image/png".into(),
        }
    }

    #[test]
    fn test_destination() {
        let store = StoreFile {
            tmp_dir: PathBuf::from("/tmp/uploads"),
        };
        let upload = Path::new("/tmp/uploads/rwf-upload-1234");

        assert_eq!(
            store.destination(upload, &part(Some("me.png"))),
            PathBuf::from("/tmp/uploads/_rwf-upload-1234me.png")
        );
        assert_eq!(
            store.destination(upload, &part(None)),
            PathBuf::from("/tmp/uploads/_rwf-upload-1234")
        );
        assert_eq!(
            store.destination(upload, &part(Some("../../etc/passwd"))),
            PathBuf::from("/tmp/uploads/_rwf-upload-1234passwd")
        );
    }

    #[tokio::test]
    async fn test_upload_files() {
        let dir = TempDir::new("rwf-forms-files").unwrap();
        let body = multipart_body(
            r#"--b
Content-Disposition: form-data; name="caption"

Me at the beach
--b
Content-Disposition: form-data; name="avatar"; filename="me.png"
Content-Type: image/png

PNGDATA
--b
Content-Disposition: form-data; name="resume"; filename="cv.exe"
Content-Type: application/octet-stream

MZ
--b
Content-Disposition: form-data; name="banner"; filename="banner.png"
Content-Type: image/png

MOREPNGDATA
--b--"#,
        );
        let request = request(
            "POST /profile HTTP/1.1\r\nContent-Type: multipart/form-data; boundary=b",
            &body,
        )
        .await;

        let config = FormConfig::default()
            .tmp_dir(dir.path())
            .part_policy(|part| {
                if part.content_type.starts_with("image/") {
                    PartUploadPolicy::allow_with_maximum_size(1024)
                } else {
                    PartUploadPolicy::Disallow
                }
            });

        let uploads = upload_files(&request, &config).await.unwrap();

        assert_eq!(uploads.inputs.all("caption"), &["Me at the beach"]);
        assert_eq!(uploads.files.len(), 2);
        assert_eq!(uploads.files[0].field_name, "avatar");
        assert_eq!(uploads.files[1].field_name, "banner");

        let avatar = &uploads.files[0].path;
        assert!(avatar.starts_with(dir.path()));
        assert!(avatar
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("_rwf-upload-"));
        assert!(avatar.to_string_lossy().ends_with("me.png"));
        assert_eq!(std::fs::read(avatar).unwrap(), b"PNGDATA");

        // Only the copies are left behind.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[tokio::test]
    async fn test_copy_failure_skips_part() {
        let dir = TempDir::new("rwf-forms-files").unwrap();
        let upload = dir.path().join("rwf-upload-1234");
        std::fs::write(&upload, b"PNGDATA").unwrap();

        let mut store = StoreFile {
            tmp_dir: dir.path().join("missing"),
        };

        let stored = store
            .handle_part(&part(Some("me.png")), Ok(upload.as_path()))
            .await
            .unwrap();
        assert!(stored.is_none());

        let rejected = store
            .handle_part(&part(Some("me.png")), Err(PartError::Disallowed))
            .await
            .unwrap();
        assert!(rejected.is_none());
    }
}
