use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Verbs with a dedicated registration shorthand on [`crate::Router`].
///
/// Routing itself is keyed by the method string, so any other token
/// (`PATCH`, `PROPFIND`, ...) can still be registered through `Router::add`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, IntoStaticStr, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
