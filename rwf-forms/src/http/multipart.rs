//! Handle parsing `multipart/form-data` bodies.
//!
//! The body is already loaded into memory, so parts borrow their data from it.
use super::Error;

/// A `multipart/form-data` body split into its parts.
#[derive(Debug, Clone)]
pub struct Multipart<'a> {
    parts: Vec<Part<'a>>,
}

/// Multipart form submission entry.
#[derive(Debug, Clone)]
pub struct Part<'a> {
    data: &'a [u8],
    content_disposition: ContentDisposition,
    content_type: Option<String>,
}

impl Part<'_> {
    /// Name of the form input.
    pub fn name(&self) -> &str {
        &self.content_disposition.name
    }

    /// File name provided by the browser, if this part is a file upload.
    pub fn filename(&self) -> Option<&str> {
        self.content_disposition.filename.as_deref()
    }

    /// Is this part a file upload?
    pub fn is_file(&self) -> bool {
        self.content_disposition.filename.is_some()
    }

    /// Get the multipart entry as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.data
    }

    /// Get the `Content-Type` header passed in the multipart form
    /// for this entry.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

impl<'a> Multipart<'a> {
    /// Extract the multipart boundary from the `Content-Type` header value.
    pub fn boundary(content_type: &str) -> Result<&str, Error> {
        content_type
            .split(';')
            .map(|param| param.trim())
            .find_map(|param| param.strip_prefix("boundary="))
            .map(|boundary| boundary.trim_matches('"'))
            .filter(|boundary| !boundary.is_empty())
            .ok_or(Error::MalformedRequest("multipart missing boundary"))
    }

    /// Read multi-part body from request's body.
    pub fn read(body: &'a [u8], boundary: &str) -> Result<Self, Error> {
        let delimiter = format!("--{}", boundary).into_bytes();
        let mut parts = vec![];

        let mut pos = find(body, &delimiter, 0)
            .ok_or(Error::MalformedRequest("multipart missing boundary"))?
            + delimiter.len();

        loop {
            // Closing delimiter, e.g. `--boundary--`.
            if body[pos..].starts_with(b"--") {
                break;
            }

            pos = skip_crlf(body, pos);

            let headers_end = find(body, b"\r\n\r\n", pos)
                .ok_or(Error::MalformedRequest("multipart part missing headers"))?;

            let mut content_disposition = None;
            let mut content_type = None;

            for line in body[pos..headers_end].split(|b| *b == b'\n') {
                let line = String::from_utf8_lossy(line);
                let line = line.trim();

                let Some((name, value)) = line.split_once(':') else {
                    continue;
                };

                match name.trim().to_lowercase().as_str() {
                    "content-disposition" => {
                        content_disposition = Some(ContentDisposition::parse(value)?)
                    }
                    "content-type" => content_type = Some(value.trim().to_string()),
                    _ => (),
                }
            }

            let data_start = headers_end + 4;
            let mut next_delimiter = b"\r\n".to_vec();
            next_delimiter.extend(&delimiter);

            let data_end = find(body, &next_delimiter, data_start)
                .ok_or(Error::MalformedRequest("multipart missing closing boundary"))?;

            let content_disposition = content_disposition.ok_or(Error::MalformedRequest(
                "content-disposition header is missing",
            ))?;

            parts.push(Part {
                data: &body[data_start..data_end],
                content_disposition,
                content_type,
            });

            pos = data_end + next_delimiter.len();
        }

        Ok(Multipart { parts })
    }

    /// All parts, in the order they were sent.
    pub fn parts(&self) -> &[Part<'a>] {
        &self.parts
    }

    /// Get the first part with this input name, if it exists.
    pub fn get(&self, name: &str) -> Option<&Part<'a>> {
        self.parts.iter().find(|part| part.name() == name)
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }

    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|position| position + from)
}

fn skip_crlf(body: &[u8], pos: usize) -> usize {
    if body[pos..].starts_with(b"\r\n") {
        pos + 2
    } else {
        pos
    }
}

/// HTTP `Content-Disposition` header.
#[derive(Debug, Clone)]
pub struct ContentDisposition {
    /// The name of the input.
    pub name: String,
    /// File name of the input, if it's a file upload.
    pub filename: Option<String>,
}

impl ContentDisposition {
    // Parse the Content-Disposition header value, e.g. `form-data; name="file"; filename="a.txt"`.
    fn parse(value: &str) -> Result<ContentDisposition, Error> {
        let mut params = value.split(';').map(|s| s.trim());
        let _form_data = params.next();

        let mut content_name: Option<String> = None;
        let mut filename: Option<String> = None;

        for param in params {
            let Some((name, value)) = param.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').to_string();

            match name.trim() {
                "name" => content_name = Some(value),
                "filename" => filename = Some(value),
                _ => (),
            }
        }

        match content_name {
            Some(name) => Ok(ContentDisposition { name, filename }),
            None => Err(Error::MalformedRequest("multipart/form-data is malformed")),
        }
    }
}
