//! Request head, including HTTP version, path and headers.

use std::marker::Unpin;

use tokio::io::{AsyncRead, AsyncReadExt};

use super::{Error, Headers, Params};
use crate::config::get_config;

/// HTTP method, e.g. GET, POST, etc.
#[derive(PartialEq, Clone, Debug, Default)]
pub enum Method {
    /// `GET` request.
    #[default]
    Get,
    /// `POST` request.
    Post,
    /// `PUT` request.
    Put,
    /// `DELETE` request.
    Delete,
    /// `HEAD` request.
    Head,
    /// `PATCH` request.
    Patch,
    /// Some other request we don't have a name for.
    Other(String),
}

impl From<&str> for Method {
    fn from(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "HEAD" => Method::Head,
            "PATCH" => Method::Patch,
            _ => Method::Other(value.to_string()),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Method::*;

        let name = match self {
            Get => "GET",
            Post => "POST",
            Put => "PUT",
            Delete => "DELETE",
            Head => "HEAD",
            Patch => "PATCH",
            Other(other) => other.as_str(),
        };

        write!(f, "{}", name)
    }
}

/// HTTP version, e.g. HTTP/1.1 or HTTP/2.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Version {
    /// HTTP/1.1.
    #[default]
    Http1,
    /// HTTP/2.
    Http2,
    /// Some other HTTP version we haven't even thought about.
    Unknown,
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        match value {
            "HTTP/1.1" => Version::Http1,
            "HTTP/2" => Version::Http2,
            _ => Version::Unknown,
        }
    }
}

/// Request HTTP method, path, query, HTTP version and headers.
#[derive(Debug, Clone, Default)]
pub struct Head {
    method: Method,
    path: String,
    query: Params,
    version: Version,
    headers: Headers,
}

impl Head {
    /// Read request head from a stream.
    pub async fn read(mut stream: impl AsyncRead + Unpin) -> Result<Self, Error> {
        let mut bytes_remaining = get_config().http.header_max_size; // avoid DDoS

        let line = Self::read_line(&mut stream, &mut bytes_remaining).await?;
        let mut request = line.split(' ');

        let method = request.next().ok_or(Error::MalformedRequest("method"))?;
        if method.is_empty() {
            return Err(Error::MalformedRequest("method"));
        }
        let method = Method::from(method);

        let target = request.next().ok_or(Error::MalformedRequest("path"))?;
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), Params::parse(query)),
            None => (target.to_string(), Params::new()),
        };

        let version = request.next().ok_or(Error::MalformedRequest("version"))?;
        let version = Version::from(version);

        let mut headers = Headers::new();

        loop {
            let header = Self::read_line(&mut stream, &mut bytes_remaining).await?;
            if header.is_empty() {
                break;
            }

            // Header values can contain colons, e.g. `Host: localhost:8000`.
            let (name, value) = header
                .split_once(':')
                .ok_or(Error::MalformedRequest("header value"))?;
            headers.insert(name.trim(), value.trim());
        }

        Ok(Head {
            method,
            path,
            query,
            version,
            headers,
        })
    }

    /// Request method, e.g. `GET`, `POST`, etc.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Is this a POST request?
    pub fn post(&self) -> bool {
        self.method() == &Method::Post
    }

    /// Is this a GET request?
    pub fn get(&self) -> bool {
        self.method() == &Method::Get
    }

    /// Request path without the query, e.g. `/users`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parsed query string parameters.
    pub fn query(&self) -> &Params {
        &self.query
    }

    /// Is this a HTTP/1.1 request?
    pub fn http1(&self) -> bool {
        self.version == Version::Http1
    }

    /// The size of the request body in bytes. This is provided by the `Content-Length` header.
    pub fn content_length(&self) -> Option<usize> {
        self.header("content-length")
            .and_then(|cl| cl.trim().parse::<usize>().ok())
    }

    /// The `Content-Type` header, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type").map(|ct| ct.as_str())
    }

    /// Get all request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get a header value by name, if it exists.
    ///
    /// Case insensitive.
    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(name)
    }

    /// Read a line from the stream, parsing out \r\n.
    async fn read_line(
        mut stream: impl AsyncRead + Unpin,
        bytes_remaining: &mut usize,
    ) -> Result<String, Error> {
        let mut buf = Vec::new();
        let (mut cr, mut lf) = (false, false);

        while !(cr && lf) {
            if *bytes_remaining == 0 {
                return Err(Error::MalformedRequest("header too large"));
            }

            // `stream` should be buffered.
            let b = stream.read_u8().await?;
            *bytes_remaining -= 1;

            match b {
                b'\r' => {
                    cr = true;
                    if lf {
                        return Err(Error::MalformedRequest("nl before cr"));
                    }
                }
                b'\n' => lf = true,
                b => buf.push(b),
            }
        }

        Ok(String::from_utf8_lossy(&buf).to_string())
    }
}
