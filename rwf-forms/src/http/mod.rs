//! The HTTP request model forms are read from.
pub mod error;
pub mod head;
pub mod headers;
pub mod multipart;
pub mod params;
pub mod request;
pub mod upload;
pub mod url;

pub use error::Error;
pub use head::{Head, Method, Version};
pub use headers::Headers;
pub use multipart::{ContentDisposition, Multipart, Part};
pub use params::Params;
pub use request::Request;
pub use upload::{
    default_tmp_dir, FileUploads, PartHandler, PartInfo, PartUploadPolicy, PartError,
    UploadPolicy,
};
pub use url::urldecode;
