//! HTTP request.

use std::fmt::Debug;
use std::marker::Unpin;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};

use super::{Error, Head, Multipart, Params};
use crate::config::get_config;

/// HTTP request.
///
/// The request is fully loaded into memory. It's safe to clone
/// since the contents are behind an [`std::sync::Arc`].
#[derive(Debug, Clone, Default)]
pub struct Request {
    head: Head,
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    body: Vec<u8>,
    params: Params,
    peer: Option<SocketAddr>,
}

impl Request {
    /// Read the request in its entirety from a stream.
    ///
    /// Query parameters and `application/x-www-form-urlencoded` body parameters are parsed
    /// right away. Multipart bodies are kept as-is until [`Request::handle_file_uploads`]
    /// processes them. Bodies larger than `body_max_size` are rejected without being read.
    pub async fn read(peer: SocketAddr, mut stream: impl AsyncRead + Unpin) -> Result<Self, Error> {
        let head = Head::read(&mut stream).await?;
        let content_length = head.content_length().unwrap_or(0);

        if content_length > get_config().http.body_max_size {
            return Err(Error::MalformedRequest("body too large"));
        }

        let mut body = vec![0u8; content_length];
        stream
            .read_exact(&mut body)
            .await
            .map_err(|_| Error::MalformedRequest("incorrect content length"))?;

        let mut params = head.query().clone();

        if head
            .content_type()
            .map(|ct| ct.contains("application/x-www-form-urlencoded"))
            .unwrap_or(false)
        {
            params = params.merge(Params::parse(&String::from_utf8_lossy(&body)));
        }

        Ok(Request {
            head,
            inner: Arc::new(Inner {
                body,
                params,
                peer: Some(peer),
            }),
        })
    }

    /// Get the request's source IP address, if known.
    pub fn peer(&self) -> Option<&SocketAddr> {
        self.inner.peer.as_ref()
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    /// Request's body as bytes.
    ///
    /// It's the job of the caller to handle encoding if any.
    pub fn body(&self) -> &[u8] {
        &self.inner.body
    }

    /// Request parameters: the query string followed by the
    /// `application/x-www-form-urlencoded` body, if any.
    pub fn params(&self) -> &Params {
        &self.inner.params
    }

    /// Is the body encoded with `multipart/form-data`?
    pub fn multipart(&self) -> bool {
        self.content_type()
            .map(|ct| ct.contains("multipart/form-data"))
            .unwrap_or(false)
    }

    /// Split the `multipart/form-data` body into parts.
    pub fn multipart_body(&self) -> Result<Multipart<'_>, Error> {
        let content_type = self
            .content_type()
            .ok_or(Error::MalformedRequest("content-type header is required"))?;

        if !self.multipart() {
            return Err(Error::MalformedRequest(
                "only \"multipart/form-data\" bodies contain file uploads",
            ));
        }

        Multipart::read(self.body(), Multipart::boundary(content_type)?)
    }
}

impl Deref for Request {
    type Target = Head;

    fn deref(&self) -> &Self::Target {
        &self.head
    }
}
