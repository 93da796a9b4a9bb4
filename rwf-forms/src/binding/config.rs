//! How forms are bound to requests.
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

use super::FormMethod;
use crate::config::get_config;
use crate::http::{default_tmp_dir, PartInfo, PartUploadPolicy, UploadPolicy};

/// Decides whether a file part is accepted, and how large it can be.
pub type PartPolicy = Arc<dyn Fn(&PartInfo) -> PartUploadPolicy + Send + Sync>;

/// Form binding configuration.
///
/// The default configuration detects the method from the request, stores uploads in the
/// configured (or OS) temp directory, and accepts file parts up to 128 KiB.
#[derive(Clone)]
pub struct FormConfig {
    /// Handle the request as this method, regardless of the method it was sent with.
    pub method: Option<FormMethod>,
    /// Where uploaded files are copied to.
    pub tmp_dir: Option<PathBuf>,
    pub upload_policy: UploadPolicy,
    pub part_policy: PartPolicy,
}

impl FormConfig {
    pub fn method(mut self, method: FormMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn tmp_dir(mut self, tmp_dir: impl Into<PathBuf>) -> Self {
        self.tmp_dir = Some(tmp_dir.into());
        self
    }

    pub fn upload_policy(mut self, upload_policy: UploadPolicy) -> Self {
        self.upload_policy = upload_policy;
        self
    }

    pub fn part_policy(
        mut self,
        part_policy: impl Fn(&PartInfo) -> PartUploadPolicy + Send + Sync + 'static,
    ) -> Self {
        self.part_policy = Arc::new(part_policy);
        self
    }

    /// Directory uploads are copied to.
    pub fn resolve_tmp_dir(&self) -> PathBuf {
        match self.tmp_dir {
            Some(ref tmp_dir) => tmp_dir.clone(),
            None => default_tmp_dir(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        let max_size = get_config().forms.max_file_size;

        Self {
            method: None,
            tmp_dir: None,
            upload_policy: UploadPolicy::default(),
            part_policy: Arc::new(move |_: &PartInfo| {
                PartUploadPolicy::allow_with_maximum_size(max_size)
            }),
        }
    }
}

impl Debug for FormConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormConfig")
            .field("method", &self.method)
            .field("tmp_dir", &self.tmp_dir)
            .field("upload_policy", &self.upload_policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn part(content_type: &str) -> PartInfo {
        PartInfo {
            field_name: "avatar".into(),
            file_name: Some("me.png".into()),
            content_type: content_type.into(),
        }
    }

    #[test]
    fn test_defaults() {
        let config = FormConfig::default();
        assert!(config.method.is_none());
        assert!(config.tmp_dir.is_none());
        assert_eq!(config.upload_policy, UploadPolicy::default());
        assert_eq!(
            (config.part_policy)(&part("image/png")),
            PartUploadPolicy::Allow {
                max_size: 128 * 1024
            }
        );
        assert_eq!(config.resolve_tmp_dir(), default_tmp_dir());
    }

    #[test]
    fn test_builder() {
        let config = FormConfig::default()
            .method(FormMethod::Post)
            .tmp_dir("/var/tmp/uploads")
            .part_policy(|part| {
                if part.content_type.starts_with("image/") {
                    PartUploadPolicy::allow_with_maximum_size(1024)
                } else {
                    PartUploadPolicy::Disallow
                }
            });

        assert_eq!(config.method, Some(FormMethod::Post));
        assert_eq!(config.resolve_tmp_dir(), PathBuf::from("/var/tmp/uploads"));
        assert_eq!(
            (config.part_policy)(&part("image/png")),
            PartUploadPolicy::Allow { max_size: 1024 }
        );
        assert_eq!(
            (config.part_policy)(&part("text/html")),
            PartUploadPolicy::Disallow
        );
        assert!(format!("{:?}", config).contains("FormConfig"));
    }
}
