use std::path::{Path, PathBuf};

use glam::Vec2;
use umap_files::props::types::{BlendMode, MaterialProperties};

use crate::material::graph::{ColorSpace, MixBlend, NodeId, NodeKind, ShaderGraph, SocketValue};

// Node layout, the graph flows from left (textures) to right (output).
const OUTPUT_X: f32 = 600.0;
const SHADER_X: f32 = 300.0;
const MULTIPLY_X: f32 = 100.0;
const NORMAL_MAP_X: f32 = 0.0;
const COMBINE_X: f32 = -200.0;
const INVERT_X: f32 = -200.0;
const SEPARATE_X: f32 = -400.0;
const TEXTURE_X: f32 = -700.0;

const DIFFUSE_Y: f32 = 500.0;
const NORMAL_Y: f32 = 150.0;
const SPEC_Y: f32 = -250.0;
const ROUGH_Y: f32 = -600.0;

const DECAL_MARKER: &str = "Decals";
const SPECULAR_SOCKET: &str = "Specular IOR Level";

/// The texture files of a material, already resolved to disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTextures {
    pub diffuse: Option<PathBuf>,
    pub normal: Option<PathBuf>,
    pub spec: Option<PathBuf>,
    pub roughness: Option<PathBuf>,
    pub normal_alpha_roughness: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Topology {
    Decal,
    Additive,
    Principled,
}

impl Topology {
    pub fn select(material_name: &str, props: Option<&MaterialProperties>) -> Self {
        if material_name.contains(DECAL_MARKER) {
            Topology::Decal
        } else if props.is_some_and(|props| props.blend_mode == BlendMode::Additive) {
            Topology::Additive
        } else {
            Topology::Principled
        }
    }
}

/// A node tree holding nothing but the material output.
pub fn cleared_graph() -> ShaderGraph {
    let mut graph = ShaderGraph::default();
    graph.add_node(NodeKind::MaterialOutput, Vec2::new(OUTPUT_X, 0.0));
    graph
}

/// Builds the node tree for a material. The same inputs always produce the same graph.
pub fn synthesize(
    material_name: &str,
    textures: &ResolvedTextures,
    props: Option<&MaterialProperties>,
) -> ShaderGraph {
    let mut graph = cleared_graph();
    let output = NodeId(0);

    match Topology::select(material_name, props) {
        Topology::Decal => {
            let shader = graph.add_node(NodeKind::TransparentBsdf, Vec2::new(SHADER_X, 0.0));
            if let Some(diffuse) = add_diffuse(&mut graph, textures) {
                graph.link(diffuse, "Color", shader, "Color");
            }
            graph.link(shader, "BSDF", output, "Surface");
        }
        Topology::Additive => {
            let shader = graph.add_node(NodeKind::Emission, Vec2::new(SHADER_X, 0.0));
            let strength = props
                .and_then(|props| props.scalar("EmissivePower"))
                .unwrap_or(1.0);
            graph.set_input(shader, "Strength", SocketValue::Float(strength));

            if let Some(diffuse) = add_diffuse(&mut graph, textures) {
                graph.link(diffuse, "Color", shader, "Color");
            }
            graph.link(shader, "Emission", output, "Surface");
        }
        Topology::Principled => {
            let shader = graph.add_node(NodeKind::PrincipledBsdf, Vec2::new(SHADER_X, 0.0));
            build_principled(&mut graph, shader, textures, props);
            graph.link(shader, "BSDF", output, "Surface");
        }
    }

    graph
}

fn add_image(graph: &mut ShaderGraph, image: &Path, color_space: ColorSpace, y: f32) -> NodeId {
    graph.add_node(
        NodeKind::ImageTexture {
            image: image.to_path_buf(),
            color_space,
        },
        Vec2::new(TEXTURE_X, y),
    )
}

fn add_diffuse(graph: &mut ShaderGraph, textures: &ResolvedTextures) -> Option<NodeId> {
    textures
        .diffuse
        .as_ref()
        .map(|diffuse| add_image(graph, diffuse, ColorSpace::Srgb, DIFFUSE_Y))
}

fn build_principled(
    graph: &mut ShaderGraph,
    shader: NodeId,
    textures: &ResolvedTextures,
    props: Option<&MaterialProperties>,
) {
    let scalar = |name: &str| props.and_then(|props| props.scalar(name));
    let brightness = scalar("BrightnessMult").unwrap_or(1.0);
    let roughness = scalar("Roughness").or_else(|| scalar("RoughnessValue1"));
    let specular = scalar("Spec").or_else(|| scalar("Specular"));

    if let Some(roughness) = roughness
        && textures.roughness.is_none()
        && !textures.normal_alpha_roughness
    {
        graph.set_input(shader, "Roughness", SocketValue::Float(roughness));
    }

    if let Some(specular) = specular
        && textures.spec.is_none()
    {
        graph.set_input(shader, SPECULAR_SOCKET, SocketValue::Float(specular));
    }

    if let Some(diffuse) = add_diffuse(graph, textures) {
        if brightness != 1.0 {
            let multiply = graph.add_node(
                NodeKind::MixRgb {
                    blend: MixBlend::Multiply,
                },
                Vec2::new(MULTIPLY_X, DIFFUSE_Y),
            );
            graph.set_input(multiply, "Factor", SocketValue::Float(1.0));
            graph.set_input(
                multiply,
                "B",
                SocketValue::Color([brightness, brightness, brightness, 1.0]),
            );
            graph.link(diffuse, "Color", multiply, "A");
            graph.link(multiply, "Result", shader, "Base Color");
        } else {
            graph.link(diffuse, "Color", shader, "Base Color");
        }

        graph.link(diffuse, "Alpha", shader, "Alpha");
    }

    if let Some(normal) = &textures.normal {
        let image = add_image(graph, normal, ColorSpace::NonColor, NORMAL_Y);
        let normal_map = graph.add_node(NodeKind::NormalMap, Vec2::new(NORMAL_MAP_X, NORMAL_Y));
        graph.set_input(normal_map, "Strength", SocketValue::Float(1.0));

        // The engine's normal maps are DirectX style, the green channel has to be flipped.
        let separate = graph.add_node(NodeKind::SeparateColor, Vec2::new(SEPARATE_X, NORMAL_Y));
        let invert = graph.add_node(NodeKind::Invert, Vec2::new(INVERT_X, NORMAL_Y - 150.0));
        let combine = graph.add_node(NodeKind::CombineColor, Vec2::new(COMBINE_X, NORMAL_Y + 150.0));

        graph.link(image, "Color", separate, "Color");
        graph.link(separate, "Green", invert, "Color");
        graph.link(separate, "Red", combine, "Red");
        graph.link(invert, "Color", combine, "Green");
        graph.link(separate, "Blue", combine, "Blue");
        graph.link(combine, "Color", normal_map, "Color");
        graph.link(normal_map, "Normal", shader, "Normal");

        if textures.normal_alpha_roughness {
            graph.link(image, "Alpha", shader, "Roughness");
        }
    }

    if let Some(spec) = &textures.spec {
        let image = add_image(graph, spec, ColorSpace::NonColor, SPEC_Y);
        graph.link(image, "Color", shader, SPECULAR_SOCKET);
    }

    if let Some(roughness) = &textures.roughness
        && !textures.normal_alpha_roughness
    {
        let image = add_image(graph, roughness, ColorSpace::NonColor, ROUGH_Y);
        graph.link(image, "Color", shader, "Roughness");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textures() -> ResolvedTextures {
        ResolvedTextures {
            diffuse: Some(PathBuf::from("/tex/T_Wall_D.tga")),
            normal: Some(PathBuf::from("/tex/T_Wall_N.tga")),
            spec: None,
            roughness: Some(PathBuf::from("/tex/T_Wall_R.tga")),
            normal_alpha_roughness: false,
        }
    }

    fn shader_of(graph: &ShaderGraph) -> NodeId {
        let output = graph
            .find(|kind| matches!(kind, NodeKind::MaterialOutput))
            .expect("output node");
        graph.link_into(output.id, "Surface").expect("surface link").from
    }

    fn image_of(graph: &ShaderGraph, node: NodeId) -> Option<&PathBuf> {
        match &graph.node(node)?.kind {
            NodeKind::ImageTexture { image, .. } => Some(image),
            _ => None,
        }
    }

    #[test]
    fn decal() {
        let graph = synthesize("M_Decals_Graffiti", &textures(), None);
        let shader = shader_of(&graph);

        assert_eq!(graph.node(shader).map(|n| &n.kind), Some(&NodeKind::TransparentBsdf));
        let color = graph.link_into(shader, "Color").expect("color link");
        assert_eq!(
            image_of(&graph, color.from),
            Some(&PathBuf::from("/tex/T_Wall_D.tga"))
        );
        assert_eq!(graph.count(|kind| matches!(kind, NodeKind::ImageTexture { .. })), 1);
    }

    #[test]
    fn additive_emission() {
        let mut props = MaterialProperties::default();
        props.blend_mode = BlendMode::Additive;
        props.scalar_params.insert("EmissivePower".into(), 4.0);

        let graph = synthesize("M_Lamp_Glow", &textures(), Some(&props));
        let shader = shader_of(&graph);
        let output = graph.find(|kind| matches!(kind, NodeKind::MaterialOutput)).unwrap().id;

        assert_eq!(graph.node(shader).map(|n| &n.kind), Some(&NodeKind::Emission));
        assert_eq!(graph.input_value(shader, "Strength"), Some(SocketValue::Float(4.0)));
        assert_eq!(graph.link_into(output, "Surface").unwrap().from_socket, "Emission");
        assert!(graph.link_into(shader, "Color").is_some());

        props.scalar_params.clear();
        let graph = synthesize("M_Lamp_Glow", &ResolvedTextures::default(), Some(&props));
        let shader = shader_of(&graph);
        assert_eq!(graph.input_value(shader, "Strength"), Some(SocketValue::Float(1.0)));
        assert!(graph.link_into(shader, "Color").is_none());
    }

    #[test]
    fn principled_with_green_inversion() {
        let graph = synthesize("M_Wall", &textures(), None);
        let shader = shader_of(&graph);

        assert_eq!(graph.node(shader).map(|n| &n.kind), Some(&NodeKind::PrincipledBsdf));

        let base_color = graph.link_into(shader, "Base Color").unwrap();
        assert_eq!(image_of(&graph, base_color.from), Some(&PathBuf::from("/tex/T_Wall_D.tga")));
        assert_eq!(graph.link_into(shader, "Alpha").unwrap().from_socket, "Alpha");

        // Normal <- NormalMap <- CombineColor(Green <- Invert <- SeparateColor.Green) <- image
        let normal_map = graph.link_into(shader, "Normal").unwrap().from;
        assert_eq!(graph.input_value(normal_map, "Strength"), Some(SocketValue::Float(1.0)));
        let combine = graph.link_into(normal_map, "Color").unwrap().from;
        let invert = graph.link_into(combine, "Green").unwrap();
        assert_eq!(graph.node(invert.from).map(|n| &n.kind), Some(&NodeKind::Invert));
        let separate = graph.link_into(invert.from, "Color").unwrap();
        assert_eq!(separate.from_socket, "Green");
        assert_eq!(graph.link_into(combine, "Red").unwrap().from, separate.from);
        assert_eq!(graph.link_into(combine, "Blue").unwrap().from, separate.from);
        let normal_image = graph.link_into(separate.from, "Color").unwrap().from;
        assert!(matches!(
            graph.node(normal_image).map(|n| &n.kind),
            Some(NodeKind::ImageTexture { color_space: ColorSpace::NonColor, .. })
        ));

        let roughness = graph.link_into(shader, "Roughness").unwrap();
        assert_eq!(image_of(&graph, roughness.from), Some(&PathBuf::from("/tex/T_Wall_R.tga")));
        assert!(graph.link_into(shader, SPECULAR_SOCKET).is_none());
    }

    #[test]
    fn normal_alpha_roughness() {
        let mut textures = textures();
        textures.normal_alpha_roughness = true;
        textures.roughness = None;

        let graph = synthesize("M_Wall", &textures, None);
        let shader = shader_of(&graph);

        let roughness = graph.link_into(shader, "Roughness").unwrap();
        assert_eq!(roughness.from_socket, "Alpha");
        assert_eq!(image_of(&graph, roughness.from), Some(&PathBuf::from("/tex/T_Wall_N.tga")));
    }

    #[test]
    fn scalars_only_without_textures() {
        let mut props = MaterialProperties::default();
        props.scalar_params.insert("RoughnessValue1".into(), 0.8);
        props.scalar_params.insert("Specular".into(), 0.2);
        props.scalar_params.insert("BrightnessMult".into(), 2.0);

        let mut textures = textures();
        textures.roughness = None;

        let graph = synthesize("M_Wall", &textures, Some(&props));
        let shader = shader_of(&graph);
        assert_eq!(graph.input_value(shader, "Roughness"), Some(SocketValue::Float(0.8)));
        assert_eq!(graph.input_value(shader, SPECULAR_SOCKET), Some(SocketValue::Float(0.2)));

        let multiply = graph.link_into(shader, "Base Color").unwrap();
        assert_eq!(multiply.from_socket, "Result");
        assert_eq!(
            graph.input_value(multiply.from, "B"),
            Some(SocketValue::Color([2.0, 2.0, 2.0, 1.0]))
        );
        assert_eq!(graph.input_value(multiply.from, "Factor"), Some(SocketValue::Float(1.0)));

        textures.spec = Some(PathBuf::from("/tex/T_Wall_S.tga"));
        textures.roughness = Some(PathBuf::from("/tex/T_Wall_R.tga"));
        let graph = synthesize("M_Wall", &textures, Some(&props));
        let shader = shader_of(&graph);
        assert_eq!(graph.input_value(shader, "Roughness"), None);
        assert_eq!(graph.input_value(shader, SPECULAR_SOCKET), None);
        assert!(graph.link_into(shader, SPECULAR_SOCKET).is_some());
    }

    #[test]
    fn deterministic() {
        assert_eq!(
            synthesize("M_Wall", &textures(), None),
            synthesize("M_Wall", &textures(), None)
        );
    }
}
