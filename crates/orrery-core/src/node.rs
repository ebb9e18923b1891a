use crate::geometry::FULL_TURN;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct NodeId(String);

crate::impl_string_newtype!(NodeId);

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One orbiting item. The angle is assigned once, from the node's position in the ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub base_angle: f64,
}

impl Node {
    pub fn angle_step(count: usize) -> f64 {
        FULL_TURN / count.max(1) as f64
    }

    /// Spaces the given ids evenly around the ring, starting at 0°.
    pub fn ring(ids: impl IntoIterator<Item = NodeId>) -> Vec<Node> {
        let ids: Vec<NodeId> = ids.into_iter().collect();
        let step = Self::angle_step(ids.len());
        ids.into_iter()
            .enumerate()
            .map(|(i, id)| Node {
                id,
                base_angle: i as f64 * step,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_angles_are_evenly_spaced() {
        let nodes = Node::ring(["a", "b", "c", "d", "e", "f"].map(NodeId::from));
        let angles: Vec<f64> = nodes.iter().map(|n| n.base_angle).collect();
        assert_eq!(angles, vec![0.0, 60.0, 120.0, 180.0, 240.0, 300.0]);
        assert_eq!(nodes[3].id.as_str(), "d");
    }

    #[test]
    fn test_node_id_is_transparent_in_json() {
        let id: NodeId = serde_json::from_str("\"vision\"").unwrap();
        assert_eq!(id, NodeId::new("vision"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"vision\"");
    }
}
