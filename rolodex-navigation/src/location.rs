use std::fmt::Display;

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::error::NavigationError;

const RELATIVE_BASE: &str = "http://localhost/";

/// Path and query of a history record, the source of truth for the route.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    pub query: Option<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            query: None,
        }
    }
}

impl Location {
    pub fn parse(value: &str) -> Result<Self, NavigationError> {
        let base = Url::parse(RELATIVE_BASE)?;
        Ok(Self::from_url(&base.join(value)?))
    }

    pub fn from_url(url: &Url) -> Self {
        Self {
            path: url.path().to_string(),
            query: url
                .query()
                .filter(|query| !query.is_empty())
                .map(|query| query.to_string()),
        }
    }

    pub fn query_value(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
    }

    /// Copy with `key` set, or removed when `value` is `None` or empty.
    pub fn with_query_value(&self, key: &str, value: Option<&str>) -> Self {
        let mut pairs: Vec<(String, String)> = match &self.query {
            Some(query) => form_urlencoded::parse(query.as_bytes())
                .filter(|(name, _)| name != key)
                .map(|(name, value)| (name.into_owned(), value.into_owned()))
                .collect(),
            None => Vec::new(),
        };

        if let Some(value) = value.filter(|value| !value.is_empty()) {
            pairs.push((key.to_string(), value.to_string()));
        }

        let query = if pairs.is_empty() {
            None
        } else {
            Some(
                form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish(),
            )
        };

        Self {
            path: self.path.clone(),
            query,
        }
    }

    pub fn with_path(&self, path: &str) -> Self {
        Self {
            path: path.to_string(),
            query: self.query.clone(),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{}", self.path, query),
            None => write!(f, "{}", self.path),
        }
    }
}
