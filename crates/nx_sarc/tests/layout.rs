use nx_sarc::{
    error::Result, hash, pack, sniff, types::DEFAULT_HASH_KEY, unpack, ArchiveData, SarcArchive,
};
use tracing_test::traced_test;

fn flim(alignment: u16) -> Vec<u8> {
    let mut data = vec![0u8; 0x28];
    data[..4].copy_from_slice(b"FLIM");
    data[4..6].copy_from_slice(&[0xFF, 0xFE]);
    data[0x20..0x22].copy_from_slice(&alignment.to_le_bytes());
    data
}

fn typed_files() -> ArchiveData {
    let nested = pack(
        &ArchiveData::from_iter([("inner.byml", b"BY\x00\x02".to_vec())]),
        None,
    )
    .unwrap()
    .buffer;

    ArchiveData::from_iter([
        ("Model/Link.bfres", b"FRES    ".to_vec()),
        ("Layout/Title.bflim", flim(0x200)),
        ("Pack/Nested.sarc", nested),
        ("Message/Title.msbt", b"MsgStdBn".to_vec()),
        ("Param/Link.bgparamlist", b"AAMP\x02\x00\x00\x00".to_vec()),
        ("Texture/Link.bntx", b"BNTX".to_vec()),
        ("readme.txt", b"plain text".to_vec()),
    ])
}

#[traced_test]
#[test]
fn entries_start_on_their_alignment() -> Result<()> {
    let data = typed_files();
    let packed = pack(&data, None)?;
    assert_eq!(packed.alignment, 0x2000);

    let sarc = SarcArchive::new(&packed.buffer)?;
    assert_eq!(sarc.len(), data.len());

    let mut previous: Option<(u32, u32)> = None;
    for i in 0..sarc.len() {
        let file = sarc.by_index(i)?;
        let (expected_name, expected_data) = data.get_index(i).unwrap();

        assert_eq!(file.name(), expected_name);
        assert_eq!(file.data(), expected_data);
        assert_eq!(file.name_hash(), hash(expected_name, DEFAULT_HASH_KEY));
        assert_eq!(file.data_end() - file.data_start(), expected_data.len() as u32);

        if let Some((end, alignment)) = previous {
            assert_eq!(file.data_start(), end.next_multiple_of(alignment));
        }
        previous = Some((file.data_end(), sniff(file.data()).alignment));
    }

    // The last entry is never padded
    let last = sarc.by_index(sarc.len() - 1)?;
    let data_start = u32::from_le_bytes(packed.buffer[0x0C..0x10].try_into().unwrap());
    assert_eq!(packed.buffer.len() as u32, data_start + last.data_end());

    Ok(())
}

#[test]
fn sniffed_types_survive_packing() -> Result<()> {
    let data = typed_files();
    let restored = unpack(&pack(&data, None)?.buffer)?;

    let extensions = restored
        .iter()
        .map(|(_, file)| sniff(file).extension)
        .collect::<Vec<_>>();
    assert_eq!(
        extensions,
        [".bfres", ".bclim", ".sarc", ".msbt", ".aamp", ".bntx", ".bin"]
    );

    let nested = unpack(restored.get("Pack/Nested.sarc").unwrap())?;
    assert_eq!(nested.get("inner.byml"), Some(&b"BY\x00\x02"[..]));

    Ok(())
}

#[test]
fn alignment_override_keeps_layout() -> Result<()> {
    let data = typed_files();
    let guessed = pack(&data, None)?;
    let overridden = pack(&data, Some(0x80))?;

    assert_eq!(overridden.alignment, 0x80);
    assert_eq!(overridden.buffer, guessed.buffer);

    Ok(())
}

#[test]
fn order_is_preserved() -> Result<()> {
    let names = ["z.bin", "a.bin", "m.bin", "b.bin"];
    let data = names
        .iter()
        .map(|name| (*name, name.as_bytes().to_vec()))
        .collect::<ArchiveData>();

    let restored = unpack(&pack(&data, None)?.buffer)?;
    assert_eq!(restored.names().collect::<Vec<_>>(), names);

    Ok(())
}
