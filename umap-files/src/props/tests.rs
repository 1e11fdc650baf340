use std::path::Path;

use crate::props::reader::PropsReader;
use crate::props::types::{BlendMode, LinearColor, MaterialProperties};

const CHAIR_PROPS: &str = r#"
BlendMode = BLEND_Masked (1)
TwoSided = True
OpacityMaskClipValue = 0.3333
ScalarParameterValues[3] =
{
    ScalarParameterValues[0] =
    {
        ParameterInfo = { Name=Roughness }
        ParameterValue = 0.65
        ExpressionGUID = 00000000000000000000000000000000
    }
    ScalarParameterValues[1] =
    {
        ParameterInfo = { Name=BrightnessMult }
        ParameterValue = 1.5
    }
    ScalarParameterValues[2] =
    {
        ParameterInfo = { Name=Broken }
        ParameterValue = 1.2.3
    }
}
VectorParameterValues[1] =
{
    VectorParameterValues[0] =
    {
        ParameterInfo = { Name=Tint }
        ParameterValue = { R=1, G=0.5, B=-0.25, A=1 }
    }
}
TextureParameterValues[2] =
{
    TextureParameterValues[0] =
    {
        ParameterInfo = { Name=NormalMap+Roughness }
        ParameterValue = Texture2D'/Game/Textures/Props/T_Chair_N.T_Chair_N'
    }
    TextureParameterValues[1] =
    {
        ParameterInfo = { Name=Diffuse }
        ParameterValue = Texture2D'/Game/Textures/Props/T_Chair_D.T_Chair_D'
    }
}
"#;

#[test]
fn parse_masked_material() {
    let props = PropsReader::parse_str(CHAIR_PROPS);

    assert_eq!(props.blend_mode, BlendMode::Masked);
    assert!(props.two_sided);
    assert_eq!(props.opacity_clip, 0.3333);

    assert_eq!(props.scalar("Roughness"), Some(0.65));
    assert_eq!(props.scalar("BrightnessMult"), Some(1.5));
    assert_eq!(props.scalar("Broken"), None);
    assert_eq!(props.scalar_params.len(), 2);

    assert_eq!(
        props.vector_params.get("Tint"),
        Some(&LinearColor {
            r: 1.0,
            g: 0.5,
            b: -0.25,
            a: 1.0
        })
    );

    assert_eq!(props.texture("NormalMap+Roughness"), Some("T_Chair_N"));
    assert_eq!(props.texture("Diffuse"), Some("T_Chair_D"));
}

#[test]
fn fields_are_independent() {
    let props = PropsReader::parse_str("BlendMode = BLEND_Additive (3)\nTwoSided = false\n");
    assert_eq!(props.blend_mode, BlendMode::Additive);
    assert!(!props.two_sided);
    assert_eq!(props.opacity_clip, 0.5);
    assert!(props.scalar_params.is_empty());

    let props = PropsReader::parse_str("BlendMode = BLEND_Whatever (9)");
    assert_eq!(props.blend_mode, BlendMode::Opaque);
}

#[test]
fn color_before_name() {
    let props = PropsReader::parse_str("Value = { R=0.1, G=0.2, B=0.3, A=0.4 }\n  Name = Glow\n");
    let glow = props.vector_params.get("Glow").copied();
    assert_eq!(glow.map(|color| color.b), Some(0.3));
}

#[test]
fn unreadable_file_gives_defaults() {
    let props = PropsReader::parse_file(Path::new("does/not/exist.props.txt"));
    assert_eq!(props, MaterialProperties::default());
    assert_eq!(props.opacity_clip, 0.5);
}
