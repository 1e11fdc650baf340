use std::io::Write;

use crate::mat::reader::MatReader;
use crate::mat::types::LegacyMaterial;

#[test]
fn explicit_roughness() {
    let material = MatReader::parse_str(
        "Diffuse=T_Chair_D\nNormal=T_Chair_N\nSpecPower=T_Chair_S\nOther[0]=T_Chair_M\nOther[1]=T_Chair_R\n",
    );

    assert_eq!(
        material,
        LegacyMaterial {
            diffuse: "T_Chair_D".into(),
            normal: "T_Chair_N".into(),
            spec: "T_Chair_S".into(),
            roughness: "T_Chair_R".into(),
        }
    );
}

#[test]
fn roughness_derived_from_diffuse() {
    let material = MatReader::parse_str("Diffuse=Foo_D\nNormal=Foo_N\n");
    assert_eq!(material.roughness, "Foo_R");

    let material = MatReader::parse_str("Diffuse=Foo_D\nOther[0]=Foo_M\n");
    assert_eq!(material.roughness, "Foo_R");
}

#[test]
fn irrelevant_lines_are_ignored() {
    // `Normal ` with a trailing space is a different key
    let material = MatReader::parse_str("Emissive=Foo_E\nDiffuse\nNormal = Bar_N \r\n");
    assert_eq!(material.diffuse, "");
    assert_eq!(material.normal, "");
    assert_eq!(material.roughness, "");
    assert!(!material.has_surface());

    let material = MatReader::parse_str("Normal=Bar_N\r\n");
    assert_eq!(material.normal, "Bar_N");
    assert!(material.has_surface());
}

#[test]
fn parse_from_disk() -> Result<(), anyhow::Error> {
    let path = std::env::temp_dir().join(format!("umap-files-mat-{}.mat", std::process::id()));
    let mut file = std::fs::File::create(&path)?;
    file.write_all(b"Diffuse=Caf\xE9_D\n")?;
    drop(file);

    let material = MatReader::parse_file(&path)?;
    std::fs::remove_file(&path)?;

    assert_eq!(material.diffuse, "Caf\u{e9}_D");
    assert_eq!(material.roughness, "Caf\u{e9}_R");
    Ok(())
}
