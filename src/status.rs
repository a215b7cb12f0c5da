use strum_macros::{Display, IntoStaticStr};

// https://www.iana.org/assignments/http-status-codes/http-status-codes.xhtml

/// Status codes this server emits. Displays as the reason phrase.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, IntoStaticStr)]
#[repr(u16)]
pub enum StatusCode {
    #[strum(serialize = "OK")]
    Ok = 200,
    #[strum(serialize = "Bad Request")]
    BadRequest = 400,
    #[strum(serialize = "Not Found")]
    NotFound = 404,
    #[strum(serialize = "Method Not Allowed")]
    MethodNotAllowed = 405,
    #[strum(serialize = "Request Timeout")]
    RequestTimeout = 408,
    #[strum(serialize = "Content Too Large")]
    ContentTooLarge = 413,
}

impl StatusCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn reason_phrase(self) -> &'static str {
        self.into()
    }
}
