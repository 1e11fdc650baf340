use crate::common::object_path::{
    actor_short_name, quoted_reference, short_object_name, split_object_path, strip_export_index,
};
use crate::common::text::{decode_text, TextEncoding};

#[test]
fn object_path_splitting() {
    assert_eq!(
        split_object_path("LiS/Content/Meshes/SM_Chair.0"),
        "LiS/Content/Meshes/SM_Chair"
    );
    assert_eq!(split_object_path("NoIndex"), "NoIndex");
    assert_eq!(split_object_path("A/B.C/D.0"), "A/B");
    assert_eq!(strip_export_index("A/B.C/D.0"), "A/B.C/D");
}

#[test]
fn short_names() {
    assert_eq!(
        short_object_name("LiS/Content/WwiseAudio/Events/Play_A_BlowTrees.0"),
        "Play_A_BlowTrees"
    );
    assert_eq!(short_object_name("Play_A_Rain"), "Play_A_Rain");
}

#[test]
fn typed_references() {
    assert_eq!(
        quoted_reference("SkeletalMesh'CH_L_Hayden01'", "SkeletalMesh"),
        Some("CH_L_Hayden01")
    );
    assert_eq!(
        quoted_reference("AnimSequence'A_E1_2A_ArtClass_Alyssa_Loop'", "AnimSequence"),
        Some("A_E1_2A_ArtClass_Alyssa_Loop")
    );
    assert_eq!(quoted_reference("StaticMesh'Foo'", "SkeletalMesh"), None);
    assert_eq!(quoted_reference("SkeletalMesh''", "SkeletalMesh"), None);
    assert_eq!(quoted_reference("SkeletalMesh'Unterminated", "SkeletalMesh"), None);
}

#[test]
fn actor_names() {
    assert_eq!(
        actor_short_name("SkeletalMeshActorMAT'E1_2A:PersistentLevel.SkeletalMeshActorMAT_9'"),
        Some("SkeletalMeshActorMAT_9")
    );
    assert_eq!(actor_short_name("SkeletalMeshActorMAT_9"), None);
}

#[test]
fn decoding_falls_back_to_latin1() {
    let (text, encoding) = decode_text("Caf\u{e9}".as_bytes()).unwrap();
    assert_eq!(encoding, TextEncoding::Utf8);
    assert_eq!(text, "Caf\u{e9}");

    let (text, encoding) = decode_text(&[b'C', b'a', b'f', 0xE9]).unwrap();
    assert_eq!(encoding, TextEncoding::Latin1);
    assert_eq!(text, "Caf\u{e9}");
}
