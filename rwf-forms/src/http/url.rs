//! URL handling helpers.
//!
//! # Example
//!
//! ```
//! use rwf_forms::http::urldecode;
//!
//! assert_eq!(urldecode("hello+world%21"), "hello world!");
//! assert_eq!(urldecode("caf%C3%A9"), "café");
//! ```

/// Decode a string encoded with percent-encoding, also known as URL encoding.
///
/// `+` is decoded as a space, as browsers encode forms that way. Escapes that aren't
/// followed by two hex digits are kept as-is. Invalid UTF-8 is replaced with
/// `U+FFFD`.
pub fn urldecode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => match (hex(bytes.get(i + 1)), hex(bytes.get(i + 2))) {
                (Some(high), Some(low)) => {
                    result.push(high << 4 | low);
                    i += 3;
                    continue;
                }
                _ => result.push(b'%'),
            },

            b'+' => result.push(b' '),

            b => result.push(b),
        }

        i += 1;
    }

    String::from_utf8_lossy(&result).to_string()
}

fn hex(c: Option<&u8>) -> Option<u8> {
    match c? {
        c @ b'0'..=b'9' => Some(c - b'0'),
        c @ b'a'..=b'f' => Some(c - b'a' + 10),
        c @ b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
