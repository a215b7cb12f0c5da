use crate::status::StatusCode;

#[derive(Debug)]
pub struct ResponseWriter {
    status_code: Option<u16>,
    reason_phrase: Option<String>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseWriter {
    pub fn new_empty() -> Self {
        Self {
            status_code: None,
            reason_phrase: None,
            headers: vec![],
            body: vec![],
        }
    }

    pub fn get_status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status_code = Some(status.as_u16());
        self.reason_phrase = Some(status.to_string());
    }

    /// Sets `k`, replacing an existing header of the same name.
    pub fn set_header(&mut self, k: &str, v: impl Into<String>) {
        let v = v.into();
        if let Some(entry) = self
            .headers
            .iter_mut()
            .find(|entry| entry.0.eq_ignore_ascii_case(k))
        {
            entry.1 = v;
        } else {
            self.headers.push((k.to_owned(), v));
        }
    }

    pub fn get_header(&self, k: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|entry| entry.0.eq_ignore_ascii_case(k))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_allow_header<S: AsRef<str>>(&mut self, http_methods: &[S]) {
        let http_methods = http_methods
            .iter()
            .map(|m| m.as_ref())
            .collect::<Vec<&str>>()
            .join(", ");
        self.set_header("Allow", http_methods);
    }

    pub fn get_body(&self) -> &[u8] {
        &self.body
    }

    pub fn set_body(&mut self, body: Vec<u8>, content_type: &str) {
        let content_length = body.len();
        self.body = body;
        self.set_header("Content-Type", content_type);
        self.set_header("Content-Length", content_length.to_string());
    }

    pub fn set_body_str(&mut self, body: &str) {
        self.set_body(body.bytes().collect(), "text/plain; charset=utf-8");
    }

    /// Status with a plain text body, the way error responses are written.
    pub fn error(&mut self, status: StatusCode, body: &str) {
        self.set_status(status);
        self.set_body_str(body);
    }

    /// Serializes the response. `include_body` is false for HEAD requests;
    /// headers, including `Content-Length`, are still sent.
    pub fn write(self, include_body: bool) -> Vec<u8> {
        let (status_code, reason_phrase) = match self.status_code {
            Some(status_code) => (status_code, self.reason_phrase),
            None => (StatusCode::Ok.as_u16(), Some(StatusCode::Ok.to_string())),
        };
        let mut status_line = format!("HTTP/1.1 {}", status_code);
        if let Some(reason_phrase) = reason_phrase {
            status_line = format!("{} {}", status_line, reason_phrase);
        }
        status_line.push_str("\r\n");

        let has_content_length = self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-length"));
        let mut headers = self
            .headers
            .into_iter()
            .map(|(k, v)| format!("{}: {}\r\n", k, v))
            .collect::<String>();
        if !has_content_length {
            headers.push_str("Content-Length: 0\r\n");
        }
        headers.push_str("\r\n");

        let mut resp = vec![];
        resp.extend(status_line.bytes());
        resp.extend(headers.bytes());
        if include_body {
            resp.extend(self.body);
        }
        resp
    }
}
