use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Gateway,
    Switch,
    Subnet,
    #[serde(other)]
    Device,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Gateway,
        NodeKind::Switch,
        NodeKind::Device,
        NodeKind::Subnet,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::Switch => "switch",
            Self::Device => "device",
            Self::Subnet => "subnet",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Gateway,
    Switch,
    Subnet,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default = "default_node_size")]
    pub size: f32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub subnet: Option<String>,
    #[serde(default)]
    pub switch_port: Option<String>,
    #[serde(default)]
    pub open_ports: Vec<u16>,
    #[serde(default)]
    pub bigr_category: String,
    #[serde(default)]
    pub confidence: f32,
}

fn default_node_size() -> f32 {
    10.0
}

impl NodeRecord {
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub kind: EdgeKind,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TopologySnapshot {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl TopologySnapshot {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn kind_counts(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for node in &self.nodes {
            let slot = NodeKind::ALL
                .iter()
                .position(|kind| *kind == node.kind)
                .unwrap_or(2);
            counts[slot] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_node_type_falls_back_to_device() {
        let raw = r#"{"id": "n1", "label": "printer", "type": "printer"}"#;
        let node: NodeRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(node.kind, NodeKind::Device);
    }

    #[test]
    fn unknown_edge_type_falls_back_to_other() {
        let raw = r#"{"source": "a", "target": "b", "type": "vpn"}"#;
        let edge: EdgeRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(edge.kind, EdgeKind::Other);
    }

    #[test]
    fn kind_counts_track_each_kind() {
        let raw = r#"{
            "nodes": [
                {"id": "g", "type": "gateway"},
                {"id": "s", "type": "switch"},
                {"id": "d1", "type": "device"},
                {"id": "d2", "type": "device"},
                {"id": "n", "type": "subnet"}
            ],
            "edges": []
        }"#;
        let snapshot: TopologySnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.kind_counts(), [1, 1, 2, 1]);
    }
}
