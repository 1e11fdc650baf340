use std::io::Write;

use crate::audio::reader::TranslationTableReader;
use crate::audio::types::is_wwise_id;

const SOUNDBANK: &str = "Event\tID\tName\tWwise Object Path\tNotes\n\
\t123\tPlay_A_Rain\t\\Default Work Unit\\Play_A_Rain\t\n\
In Memory Audio\tID\tName\tAudio source file\tWwise Object Path\tNotes\tData Size\n\
\t364785238\tA_E1_S02_ClassArt_NextDoor_Skate_01\tSFX\\Skate.wav\t\\Actor-Mixer\t\t2048\n\
\t99\t\t\n\
\tnot-an-id\tA_Wind\t\n\
\t402615791\tA_BlowTrees\r\n\
State Group\tID\tName\n\
\t77\tA_ShouldNotAppear\t\n";

#[test]
fn only_in_memory_audio_is_read() {
    let table = TranslationTableReader::parse_str(SOUNDBANK);

    assert_eq!(table.len(), 2);
    assert_eq!(
        table.name_of("364785238"),
        Some("A_E1_S02_ClassArt_NextDoor_Skate_01")
    );
    assert_eq!(table.name_of("402615791"), Some("A_BlowTrees"));
    assert_eq!(table.name_of("123"), None);
    assert_eq!(table.name_of("77"), None);
}

#[test]
fn table_without_section() {
    let table = TranslationTableReader::parse_str("Event\tID\n\t1\tPlay_A\n");
    assert!(table.is_empty());
}

#[test]
fn latin1_table_from_disk() -> Result<(), anyhow::Error> {
    let path = std::env::temp_dir().join(format!("umap-files-bank-{}.txt", std::process::id()));
    let mut file = std::fs::File::create(&path)?;
    file.write_all(b"In Memory Audio\tID\tName\n\t42\tA_Caf\xE9\n")?;
    drop(file);

    let table = TranslationTableReader::parse_file(&path)?;
    std::fs::remove_file(&path)?;

    assert_eq!(table.name_of("42"), Some("A_Caf\u{e9}"));
    Ok(())
}

#[test]
fn wwise_ids() {
    assert!(is_wwise_id("364785238"));
    assert!(!is_wwise_id(""));
    assert!(!is_wwise_id("12a"));
}
