//! Container loading and lookup tests

mod common;

use common::IffBuilder;
use pretty_assertions::assert_eq;
use sims_iff::objd::field;
use sims_iff::strings::DEFAULT_LANGUAGE;
use sims_iff::{ChunkKind, Direction, Iff, IffError, LoadOptions};

fn master(chunk_id_fields: &[(usize, u16)]) -> Vec<u8> {
    common::object_definition(chunk_id_fields)
}

#[test_log::test]
fn every_decoded_id_is_retrievable() {
    let data = IffBuilder::new()
        .chunk(b"PALT", 10, "palette", &common::palette(&[[1, 2, 3]]))
        .chunk(b"STR#", 20, "strings", &common::string_table(&["Chair", "Sit"]))
        .chunk(b"CTSS", 21, "catalog", &common::string_table(&["A chair"]))
        .chunk(b"OBJD", 30, "object", &master(&[(field::PRICE, 250)]))
        .chunk(b"BCON", 40, "constants", &[1, 0, 7, 0])
        .chunk(b"GLOB", 50, "semiglobal", b"\x0cChairGlobals")
        .chunk(b"BHAV", 60, "main", &[0x02, 0x80, 0, 0])
        .chunk(b"TTAB", 70, "tree", &[1, 2, 3])
        .chunk(b"XXXX", 71, "", &[])
        .build();

    let iff = Iff::load(&data).unwrap();
    assert_eq!(iff.chunks().len(), 9);
    assert_eq!(iff.palette(10).unwrap().len(), 1);
    assert_eq!(
        iff.string_table(20).unwrap().get(DEFAULT_LANGUAGE, 1),
        Some("Sit")
    );
    assert_eq!(iff.string_table(21).unwrap().kind, ChunkKind::Ctss);
    assert_eq!(iff.object_definition(30).unwrap().price(), 250);
    assert_eq!(iff.constants(40).unwrap().get(0), Some(7));
    assert_eq!(
        iff.name_reference(ChunkKind::Glob, 50).unwrap().name,
        "ChairGlobals"
    );
    assert_eq!(iff.behavior(60).unwrap().signature, 0x8002);
    assert_eq!(iff.opaque(ChunkKind::Ttab, 70).unwrap().data, vec![1, 2, 3]);
    assert!(iff.opaque(ChunkKind::Filler, 71).unwrap().data.is_empty());

    let summary = &iff.chunks()[1];
    assert_eq!(summary.kind, ChunkKind::Str);
    assert_eq!(summary.id, 20);
    assert_eq!(summary.label, "strings");
}

#[test]
fn missing_ids_are_lookup_errors() {
    let data = IffBuilder::new()
        .chunk(b"PALT", 1, "", &common::palette(&[]))
        .build();
    let iff = Iff::load(&data).unwrap();

    match iff.palette(2) {
        Err(IffError::LookupNotFound { kind, id }) => {
            assert_eq!(kind, ChunkKind::Palt);
            assert_eq!(id, 2);
        }
        other => panic!("expected lookup miss, got {other:?}"),
    }
    assert!(iff.string_table(1).unwrap_err().is_not_found());
    assert!(iff.sprite(1).unwrap_err().is_not_found());
    assert!(iff.drawing_group(1).unwrap_err().is_not_found());
    assert!(iff.object_definition(1).unwrap_err().is_not_found());
}

#[test]
fn unknown_tag_aborts_the_load() {
    let data = IffBuilder::new()
        .chunk(b"PALT", 1, "", &common::palette(&[]))
        .chunk(b"NOPE", 2, "", &[])
        .build();
    assert!(matches!(
        Iff::load(&data),
        Err(IffError::UnknownChunkType { ref tag, .. }) if tag == "NOPE"
    ));
}

#[test]
fn truncated_record_aborts_the_load() {
    let mut data = IffBuilder::new()
        .chunk(b"PALT", 1, "", &common::palette(&[[1, 1, 1], [2, 2, 2]]))
        .build();
    data.truncate(data.len() - 4);
    // The declared size now runs past the end of the file
    assert!(matches!(Iff::load(&data), Err(IffError::Truncated { .. })));
}

#[test]
fn short_trailing_bytes_are_ignored() {
    let data = IffBuilder::new()
        .chunk(b"PALT", 1, "", &common::palette(&[]))
        .trailing(&[0xAB; 75])
        .build();
    let iff = Iff::load(&data).unwrap();
    assert_eq!(iff.chunks().len(), 1);
}

#[test]
fn bad_magic_strictness_is_caller_controlled() {
    let mut data = IffBuilder::new().build();
    data[0] = b'J';

    assert!(matches!(
        Iff::load(&data),
        Err(IffError::InvalidContainer { .. })
    ));
    let lenient = LoadOptions::default().strict_magic(false);
    assert!(Iff::load_with(&data, &lenient).unwrap().is_none());

    // A valid file still loads with lenient options
    let good = IffBuilder::new().build();
    assert!(Iff::load_with(&good, &lenient).unwrap().is_some());
}

#[test_log::test]
fn duplicate_ids_keep_the_last_record() {
    let data = IffBuilder::new()
        .chunk(b"PALT", 5, "first", &common::palette(&[[1, 1, 1]]))
        .chunk(b"PALT", 5, "second", &common::palette(&[[2, 2, 2], [3, 3, 3]]))
        .chunk(b"OBJD", 9, "a", &master(&[(field::PRICE, 1)]))
        .chunk(b"OBJD", 9, "b", &master(&[(field::PRICE, 2)]))
        .build();
    let iff = Iff::load(&data).unwrap();
    assert_eq!(iff.palette(5).unwrap().len(), 2);
    assert_eq!(iff.objects().len(), 1);
    assert_eq!(iff.object_definition(9).unwrap().price(), 2);
    assert_eq!(iff.chunks().len(), 4);
}

#[test]
fn single_tile_object_is_its_own_master() {
    let data = IffBuilder::new()
        .chunk(b"OBJD", 1, "lamp", &master(&[(field::SUB_INDEX, 0)]))
        .build();
    let iff = Iff::load(&data).unwrap();
    assert!(!iff.is_multi_tile());
    assert_eq!(iff.master_object().map(|o| o.chunk_id), Some(1));
}

#[test]
fn multi_tile_master_is_found() {
    let data = IffBuilder::new()
        .chunk(
            b"OBJD",
            1,
            "left",
            &master(&[(field::MASTER_ID, 77), (field::SUB_INDEX, 0)]),
        )
        .chunk(
            b"OBJD",
            2,
            "master",
            &master(&[(field::MASTER_ID, 77), (field::SUB_INDEX, 0xFFFF)]),
        )
        .chunk(
            b"OBJD",
            3,
            "right",
            &master(&[(field::MASTER_ID, 77), (field::SUB_INDEX, 1)]),
        )
        .build();
    let iff = Iff::load(&data).unwrap();
    assert!(iff.is_multi_tile());
    let master = iff.master_object().unwrap();
    assert_eq!(master.chunk_id, 2);
    assert!(master.is_master());
    assert_eq!(
        iff.objects().iter().map(|o| o.chunk_id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn master_without_multi_tile_reference_is_not_multi_tile() {
    let data = IffBuilder::new()
        .chunk(b"OBJD", 1, "", &master(&[(field::SUB_INDEX, 0xFFFF)]))
        .chunk(b"OBJD", 2, "", &master(&[(field::MASTER_ID, 3)]))
        .build();
    let iff = Iff::load(&data).unwrap();
    assert!(!iff.is_multi_tile());
    assert_eq!(iff.master_object().map(|o| o.chunk_id), Some(1));
}

#[test]
fn drawing_group_frames_resolve_sprites_and_palette() {
    let mut dgrp = 20003u16.to_le_bytes().to_vec();
    dgrp.extend_from_slice(&1u32.to_le_bytes());
    dgrp.extend_from_slice(&Direction::LEFT_BACK.bits().to_le_bytes());
    dgrp.extend_from_slice(&3u32.to_le_bytes());
    dgrp.extend_from_slice(&1u32.to_le_bytes());
    dgrp.extend_from_slice(&200u32.to_le_bytes()); // sprite id
    dgrp.extend_from_slice(&0u32.to_le_bytes()); // frame
    dgrp.extend_from_slice(&3i32.to_le_bytes());
    dgrp.extend_from_slice(&(-3i32).to_le_bytes());
    dgrp.extend_from_slice(&0f32.to_le_bytes());
    dgrp.extend_from_slice(&0u32.to_le_bytes());

    let sprite = common::legacy_sprite(false, 4, 2, 1, &[0x04, 1, 0x03, 2, 1, 0]);

    let data = IffBuilder::new()
        .chunk(b"PALT", 4, "", &common::palette(&[[9, 9, 9], [200, 100, 50]]))
        .chunk(b"SPR#", 200, "", &sprite)
        .chunk(b"DGRP", 1, "", &dgrp)
        .build();
    let iff = Iff::load(&data).unwrap();

    let placed = iff
        .drawing_group_frames(1, Direction::LEFT_BACK, 3)
        .unwrap();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].reference.x, 3);
    assert_eq!(placed[0].reference.y, -3);
    assert_eq!(placed[0].frame.pixel(0, 0).map(|p| p.0), Some([200, 100, 50, 255]));
    assert_eq!(placed[0].frame.pixel(1, 0).map(|p| p.0), Some([9, 9, 9, 255]));

    assert!(
        iff.drawing_group_frames(1, Direction::RIGHT_FRONT, 3)
            .unwrap_err()
            .is_not_found()
    );
}

#[test]
fn open_reads_from_disk() {
    let data = IffBuilder::new()
        .chunk(b"PALT", 1, "", &common::palette(&[[1, 2, 3]]))
        .build();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.iff");
    std::fs::write(&path, &data).unwrap();

    let iff = Iff::open(&path).unwrap();
    assert_eq!(iff.palette(1).unwrap().len(), 1);

    assert!(matches!(
        Iff::open(dir.path().join("missing.iff")),
        Err(IffError::Io(_))
    ));
}
