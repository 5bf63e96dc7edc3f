use std::fmt;

use serde::Serialize;

/// Cache key: endpoint name plus canonical JSON of the arguments.
///
/// `serde_json` maps are ordered by key, so two argument values that
/// serialize to the same members produce the same key regardless of field
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    endpoint: String,
    args: String,
}

impl CacheKey {
    pub fn new<A: Serialize>(endpoint: &str, args: &A) -> Result<Self, serde_json::Error> {
        let canonical = serde_json::to_value(args)?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            args: canonical.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn args(&self) -> &str {
        &self.args
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.endpoint, self.args)
    }
}
