use crate::multi_map::MultiMap;

/// Request headers. Keys are stored lower-cased.
#[derive(Debug, Default)]
pub struct Headers(MultiMap<String, String>);

impl Headers {
    pub fn new_empty() -> Self {
        Self(MultiMap::new_empty())
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_lowercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key.to_lowercase().as_str()).map(|s| s.as_str())
    }

    /// All values for `key`, with comma separated lists split apart.
    pub fn get_iter(&self, key: &str) -> impl Iterator<Item = &str> + '_ {
        self.0
            .get_all(key.to_lowercase().as_str())
            .iter()
            .flat_map(|v| v.split(','))
            .map(str::trim)
    }

    pub fn get_connection(&self) -> impl Iterator<Item = &str> + '_ {
        self.get_iter("connection")
    }

    pub fn get_content_length(&self) -> anyhow::Result<Option<usize>> {
        match self.get("content-length").map(|length| length.parse::<usize>()) {
            Some(Ok(length)) => Ok(Some(length)),
            Some(Err(err)) => Err(err)?,
            None => Ok(None),
        }
    }

    pub fn get_user_agent(&self) -> Option<&str> {
        self.get("user-agent")
    }
}
