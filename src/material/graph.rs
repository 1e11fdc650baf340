use std::collections::BTreeMap;
use std::path::PathBuf;

use glam::Vec2;
use serde::Serialize;

/// Index into [`ShaderGraph::nodes`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ColorSpace {
    Srgb,
    NonColor,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum MixBlend {
    Multiply,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    MaterialOutput,
    PrincipledBsdf,
    TransparentBsdf,
    Emission,
    ImageTexture { image: PathBuf, color_space: ColorSpace },
    MixRgb { blend: MixBlend },
    SeparateColor,
    CombineColor,
    Invert,
    NormalMap,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum SocketValue {
    Float(f32),
    Color([f32; 4]),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShaderNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Editor position, purely cosmetic
    pub location: Vec2,
    /// Unconnected input sockets with a non default value
    pub inputs: BTreeMap<String, SocketValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeLink {
    pub from: NodeId,
    pub from_socket: String,
    pub to: NodeId,
    pub to_socket: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShaderGraph {
    pub nodes: Vec<ShaderNode>,
    pub links: Vec<NodeLink>,
}

impl ShaderGraph {
    pub fn add_node(&mut self, kind: NodeKind, location: Vec2) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ShaderNode {
            id,
            kind,
            location,
            inputs: BTreeMap::new(),
        });
        id
    }

    pub fn set_input(&mut self, node: NodeId, socket: &str, value: SocketValue) {
        if let Some(node) = self.nodes.get_mut(node.0) {
            node.inputs.insert(socket.to_string(), value);
        }
    }

    pub fn link(&mut self, from: NodeId, from_socket: &str, to: NodeId, to_socket: &str) {
        self.links.push(NodeLink {
            from,
            from_socket: from_socket.to_string(),
            to,
            to_socket: to_socket.to_string(),
        });
    }

    pub fn node(&self, id: NodeId) -> Option<&ShaderNode> {
        self.nodes.get(id.0)
    }

    pub fn find(&self, predicate: impl Fn(&NodeKind) -> bool) -> Option<&ShaderNode> {
        self.nodes.iter().find(|node| predicate(&node.kind))
    }

    pub fn count(&self, predicate: impl Fn(&NodeKind) -> bool) -> usize {
        self.nodes.iter().filter(|node| predicate(&node.kind)).count()
    }

    /// The link that feeds `socket` of `node`, an input can only have one.
    pub fn link_into(&self, node: NodeId, socket: &str) -> Option<&NodeLink> {
        self.links
            .iter()
            .find(|link| link.to == node && link.to_socket == socket)
    }

    pub fn input_value(&self, node: NodeId, socket: &str) -> Option<SocketValue> {
        self.node(node)
            .and_then(|node| node.inputs.get(socket))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn building_a_graph() {
        let mut graph = ShaderGraph::default();
        let output = graph.add_node(NodeKind::MaterialOutput, Vec2::new(600.0, 0.0));
        let emission = graph.add_node(NodeKind::Emission, Vec2::new(300.0, 0.0));
        graph.set_input(emission, "Strength", SocketValue::Float(4.0));
        graph.link(emission, "Emission", output, "Surface");

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.input_value(emission, "Strength"), Some(SocketValue::Float(4.0)));
        assert_eq!(graph.input_value(output, "Strength"), None);
        assert_eq!(
            graph.link_into(output, "Surface").map(|link| link.from),
            Some(emission)
        );
        assert!(graph.link_into(emission, "Color").is_none());
        assert_eq!(graph.count(|kind| matches!(kind, NodeKind::Emission)), 1);
    }
}
