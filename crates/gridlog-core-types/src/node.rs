//! Node identity
//!
//! A `NodeId` is assigned at runtime, typically by a cluster membership
//! component after the node joins. File outputs embed its short form in
//! their file names once it becomes known.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Runtime identity of the node this process runs as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generate a new random NodeId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The nil UUID stands in for an absent identity
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// First eight hex characters of the hyphenated form, used in file names
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for NodeId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for NodeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_generation() {
        let id1 = NodeId::new();
        let id2 = NodeId::new();

        assert_ne!(id1, id2);
        assert!(!id1.is_nil());
    }

    #[test]
    fn test_short_form() {
        let id: NodeId = "3f2504e0-4f89-11d3-9a0c-0305e82c3301".parse().unwrap();
        assert_eq!(id.short(), "3f2504e0");
    }

    #[test]
    fn test_nil_detection() {
        assert!(NodeId::from_uuid(Uuid::nil()).is_nil());
    }

    #[test]
    fn test_display_matches_uuid() {
        let uuid = Uuid::now_v7();
        assert_eq!(NodeId::from(uuid).to_string(), uuid.to_string());
    }

    #[test]
    fn test_serialization() {
        let id = NodeId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
