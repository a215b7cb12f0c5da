use std::io::{BufRead, BufReader, ErrorKind, Read, Take};

use bytes::Bytes;
use percent_encoding::percent_decode_str;
use thiserror::Error;
use tracing::debug;

use crate::{headers::Headers, params::Params};

const REQUEST_LINE_LIMIT: u64 = 1024;
const HEADERS_LIMIT: u64 = 8 * 1024;
const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug)]
pub struct Request {
    http_method: String,
    raw_path: String,
    path: String,
    raw_query: String,
    http_version: String,
    headers: Headers,
    body: Option<Bytes>,
}

impl Request {
    pub fn new(http_method: impl Into<String>, request_target: &str) -> Self {
        let (path, raw_query) = request_target
            .split_once('?')
            .unwrap_or((request_target, ""));
        Self {
            http_method: http_method.into(),
            raw_path: path.to_owned(),
            path: percent_decode_str(path).decode_utf8_lossy().into_owned(),
            raw_query: raw_query.to_owned(),
            http_version: "HTTP/1.1".to_owned(),
            headers: Headers::new_empty(),
            body: None,
        }
    }

    pub fn get_http_method(&self) -> &str {
        &self.http_method
    }

    /// Percent-decoded path component of the request target, without the
    /// query. This is what routes match against.
    pub fn get_path(&self) -> &str {
        &self.path
    }

    pub fn get_raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn set_raw_query(&mut self, raw_query: String) {
        self.raw_query = raw_query;
    }

    /// Parsed query, including any parameters merged in by the router.
    pub fn query(&self) -> Params {
        Params::parse(&self.raw_query)
    }

    /// Request target as sent on the wire.
    pub fn get_request_target(&self) -> String {
        if self.raw_query.is_empty() {
            return self.raw_path.clone();
        }
        format!("{}?{}", self.raw_path, self.raw_query)
    }

    pub fn get_http_version(&self) -> &str {
        &self.http_version
    }

    pub fn get_headers(&self) -> &Headers {
        &self.headers
    }

    pub fn get_headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn get_body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = Some(body.into());
    }
}

#[derive(Error, Debug)]
#[error("end of file")]
pub struct EndOfFile;

#[derive(Error, Debug)]
#[error("invalid request: {0}")]
pub struct InvalidRequest(&'static str);

#[derive(Error, Debug)]
#[error("body of {0} bytes exceeds the limit")]
pub struct BodyTooLarge(pub usize);

pub struct RequestReader<R> {
    buf_reader: Take<BufReader<R>>,
}

impl<R: Read> RequestReader<R> {
    pub fn new(r: R) -> Self {
        Self {
            buf_reader: BufReader::new(r).take(u64::MAX),
        }
    }

    fn read_crlf_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        if self.buf_reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line
            .strip_suffix("\r\n")
            .ok_or(InvalidRequest("missing CRLF"))?;
        Ok(Some(line.to_owned()))
    }

    pub fn read(&mut self) -> anyhow::Result<Request> {
        self.buf_reader.set_limit(REQUEST_LINE_LIMIT);
        let Some(request_line) = self.read_crlf_line()? else {
            return Err(EndOfFile.into());
        };
        debug!(?request_line);

        let mut parts = request_line.split(' ');
        let (Some(http_method), Some(request_target), Some(http_version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(InvalidRequest("malformed request line").into());
        };
        if !request_target.starts_with('/') {
            Err(InvalidRequest("request target is not a path"))?
        }

        let mut r = Request::new(http_method, request_target);
        r.http_version = http_version.to_owned();

        self.buf_reader.set_limit(HEADERS_LIMIT);
        loop {
            let line = self
                .read_crlf_line()?
                .ok_or(InvalidRequest("missing end of headers"))?;
            if line.is_empty() {
                break;
            }
            let (k, v) = line
                .split_once(':')
                .ok_or(InvalidRequest("header without colon"))?;
            r.headers.insert(k.trim(), v.trim());
        }

        let content_length = r
            .headers
            .get_content_length()
            .map_err(|_| InvalidRequest("bad content-length"))?;
        if let Some(content_length) = content_length {
            if content_length > BODY_LIMIT {
                Err(BodyTooLarge(content_length))?
            }
            self.buf_reader.set_limit(content_length as u64);
            let mut buf = vec![0; content_length];
            if let Err(err) = self.buf_reader.read_exact(&mut buf) {
                if err.kind() == ErrorKind::UnexpectedEof {
                    Err(InvalidRequest("truncated body"))?
                } else {
                    Err(err)?
                }
            }
            r.body = Some(Bytes::from(buf));
        }

        Ok(r)
    }
}
