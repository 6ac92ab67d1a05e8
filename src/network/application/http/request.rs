//! Request description and its HTTP/1.1 wire form.

use super::error::Error;
use core::fmt::Write as _;
use heapless::{String, Vec};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("pollhttp/", env!("CARGO_PKG_VERSION"));

/// Content type used for POST requests that do not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Method {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.as_str())
    }
}

/// A request description.
///
/// `headers` holds raw extra header lines, e.g. `"Authorization: Bearer x\r\n"`.
/// A final line without a terminator is tolerated. `path` must already include
/// any query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: Method,
    pub host: &'a str,
    pub port: u16,
    pub path: &'a str,
    pub headers: &'a str,
    pub body: &'a [u8],
    pub content_type: &'a str,
}

impl<'a> Request<'a> {
    pub fn get(host: &'a str, port: u16, path: &'a str) -> Self {
        Self {
            method: Method::Get,
            host,
            port,
            path,
            headers: "",
            body: &[],
            content_type: "",
        }
    }

    pub fn post(host: &'a str, port: u16, path: &'a str, body: &'a [u8]) -> Self {
        Self {
            method: Method::Post,
            host,
            port,
            path,
            headers: "",
            body,
            content_type: DEFAULT_CONTENT_TYPE,
        }
    }

    pub fn with_headers(mut self, headers: &'a str) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = content_type;
        self
    }

    /// Serialise the request into `buf`, replacing its contents.
    ///
    /// Fails with [`Error::RequestTooLarge`] if the request does not fit.
    pub fn write_to<const N: usize>(&self, buf: &mut Vec<u8, N>) -> Result<(), Error> {
        buf.clear();

        // Request line
        push(buf, self.method.as_str().as_bytes())?;
        push(buf, b" ")?;
        push(buf, self.path.as_bytes())?;
        push(buf, b" HTTP/1.1\r\nHost: ")?;
        push(buf, self.host.as_bytes())?;
        push(buf, b"\r\nUser-Agent: ")?;
        push(buf, USER_AGENT.as_bytes())?;
        push(buf, b"\r\nAccept: */*\r\nConnection: close\r\n")?;

        if !self.headers.is_empty() {
            push(buf, self.headers.as_bytes())?;
            if !self.headers.ends_with("\r\n") {
                push(buf, b"\r\n")?;
            }
        }

        match self.method {
            Method::Post => {
                let content_type = if self.content_type.is_empty() {
                    DEFAULT_CONTENT_TYPE
                } else {
                    self.content_type
                };
                let mut len_str: String<20> = String::new();
                write!(len_str, "{}", self.body.len()).map_err(|_| Error::RequestTooLarge)?;

                push(buf, b"Content-Type: ")?;
                push(buf, content_type.as_bytes())?;
                push(buf, b"\r\nContent-Length: ")?;
                push(buf, len_str.as_bytes())?;
                push(buf, b"\r\n\r\n")?;
                push(buf, self.body)?;
            }
            Method::Get => push(buf, b"\r\n")?,
        }

        Ok(())
    }
}

fn push<const N: usize>(buf: &mut Vec<u8, N>, bytes: &[u8]) -> Result<(), Error> {
    buf.extend_from_slice(bytes).map_err(|_| Error::RequestTooLarge)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<const N: usize>(request: &Request) -> Result<Vec<u8, N>, Error> {
        let mut buf = Vec::new();
        request.write_to(&mut buf)?;
        Ok(buf)
    }

    #[test]
    fn get_request_layout() {
        let buf = render::<512>(&Request::get("api.example.com", 443, "/v1/ping?x=1")).unwrap();
        let expected = concat!(
            "GET /v1/ping?x=1 HTTP/1.1\r\n",
            "Host: api.example.com\r\n",
            "User-Agent: pollhttp/",
            env!("CARGO_PKG_VERSION"),
            "\r\n",
            "Accept: */*\r\n",
            "Connection: close\r\n",
            "\r\n"
        );
        assert_eq!(core::str::from_utf8(&buf).unwrap(), expected);
    }

    #[test]
    fn post_has_exact_content_length() {
        let body = "{\"temp\":23.5}";
        let request =
            Request::post("h", 443, "/t", body.as_bytes()).with_content_type("text/plain");
        let buf = render::<512>(&request).unwrap();
        let text = core::str::from_utf8(&buf).unwrap();

        assert!(text.starts_with("POST /t HTTP/1.1\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.contains("Content-Length: 13\r\n\r\n"));
        assert!(text.ends_with(body));
    }

    #[test]
    fn post_without_content_type_uses_json() {
        let request = Request::post("h", 443, "/", b"{}").with_content_type("");
        let buf = render::<512>(&request).unwrap();
        let text = core::str::from_utf8(&buf).unwrap();
        assert!(text.contains("Content-Type: application/json\r\n"));
    }

    #[test]
    fn extra_headers_get_terminated() {
        let request = Request::get("h", 443, "/").with_headers("Authorization: Bearer abc");
        let buf = render::<512>(&request).unwrap();
        let text = core::str::from_utf8(&buf).unwrap();
        assert!(text.contains("Connection: close\r\nAuthorization: Bearer abc\r\n\r\n"));

        let request = Request::get("h", 443, "/").with_headers("X-A: 1\r\nX-B: 2\r\n");
        let buf = render::<512>(&request).unwrap();
        let text = core::str::from_utf8(&buf).unwrap();
        assert!(text.ends_with("X-A: 1\r\nX-B: 2\r\n\r\n"));
    }

    #[test]
    fn get_ignores_body() {
        let mut request = Request::get("h", 443, "/");
        request.body = b"ignored";
        let buf = render::<512>(&request).unwrap();
        assert!(buf.ends_with(b"Connection: close\r\n\r\n"));
    }

    #[test]
    fn overflow_is_reported() {
        let body = [b'x'; 128];
        let request = Request::post("h", 443, "/", &body);
        assert_eq!(render::<64>(&request).unwrap_err(), Error::RequestTooLarge);
    }
}
