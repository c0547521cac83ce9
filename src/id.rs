//! Resource identifiers
//!
//! Every ingested resource gets a random UUID v4. The 122 random bits make a
//! collision within the lifetime of a deployment negligible, so no lookup
//! against existing entries is made.

use serde::Serialize;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier of a stored resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Draw a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_is_uuid_v4() {
        let id = ResourceId::generate();
        let parsed = Uuid::parse_str(id.as_str()).expect("generated id must parse");
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_generate_unique() {
        let ids: HashSet<_> = (0..10_000).map(|_| ResourceId::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ResourceId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc""#);
    }
}
