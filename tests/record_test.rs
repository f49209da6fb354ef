//! Record integration tests
//!
//! Usage:
//!   cargo test --test record_test

use std::sync::Arc;

use kemas::{
    DefinitionError, Endian, Error, FieldDef, FieldType, Layout, Record, RecordType, Value,
};

kemas::record_type! {
    /// Sample record dari contoh layout (9 bytes)
    pub struct Packet {
        id: U32,
        flag: Bool,
        name: U8[4],
    }
}

kemas::record_type! {
    struct Telemetry {
        seq: U64,
        temp: F32,
        ratio: F64,
        deltas: I16[3],
        counters: U16[2],
        mode: I8,
        raw: U8,
        alive: Bool,
    }
}

#[test]
fn test_sample_record_bytes() {
    let mut rec = Record::of::<Packet>(Endian::Little).unwrap();
    rec.set("id", 7u32).unwrap();
    rec.set("flag", true).unwrap();
    rec.set("name", b"abcd").unwrap();

    assert_eq!(rec.size(), 9);
    assert_eq!(
        rec.to_bytes(),
        vec![0x07, 0x00, 0x00, 0x00, 0x01, 0x61, 0x62, 0x63, 0x64]
    );
}

#[test]
fn test_offsets_follow_declaration_order() {
    let layout = Telemetry::layout().unwrap();
    let mut expected = 0;
    for (def, (name, field)) in Telemetry::fields().iter().zip(layout.iter()) {
        assert_eq!(def.name, name);
        assert_eq!(field.offset, expected);
        expected += def.byte_len();
    }
    assert_eq!(layout.size(), expected);
    assert_eq!(layout.size(), 8 + 4 + 8 + 6 + 4 + 1 + 1 + 1);
}

#[test]
fn test_layout_shared_between_instances() {
    let a = Record::of::<Packet>(Endian::Little).unwrap();
    let b = Record::of::<Packet>(Endian::Big).unwrap();
    assert!(Arc::ptr_eq(a.layout(), b.layout()));
}

#[test]
fn test_instances_do_not_share_buffers() {
    let mut a = Record::of::<Packet>(Endian::Little).unwrap();
    let b = Record::of::<Packet>(Endian::Little).unwrap();
    a.set("id", 99u32).unwrap();
    assert_eq!(b.get("id").unwrap(), Value::UInt(0));
}

#[test]
fn test_scalar_roundtrip_all_types() {
    for endian in [Endian::Little, Endian::Big] {
        let mut rec = Record::of::<Telemetry>(endian).unwrap();
        rec.set("seq", u64::MAX).unwrap();
        rec.set("temp", -12.5f32).unwrap();
        rec.set("ratio", std::f64::consts::PI).unwrap();
        rec.set("mode", i8::MIN).unwrap();
        rec.set("raw", 0xffu8).unwrap();
        rec.set("alive", true).unwrap();

        assert_eq!(rec.get("seq").unwrap(), Value::UInt(u64::MAX));
        assert_eq!(rec.get("temp").unwrap(), Value::Float(-12.5));
        assert_eq!(rec.get("ratio").unwrap(), Value::Float(std::f64::consts::PI));
        assert_eq!(rec.get("mode").unwrap(), Value::Int(-128));
        assert_eq!(rec.get("raw").unwrap(), Value::UInt(255));
        assert_eq!(rec.get("alive").unwrap(), Value::Bool(true));
    }
}

#[test]
fn test_out_of_range_is_rejected() {
    let mut rec = Record::of::<Telemetry>(Endian::Little).unwrap();
    rec.set("mode", 5i8).unwrap();

    let err = rec.set("mode", 200u32).unwrap_err();
    assert!(matches!(err, Error::Range { .. }), "{:?}", err);
    assert!(matches!(rec.set("raw", -1i32), Err(Error::Range { .. })));
    assert!(matches!(rec.set("temp", 1e300f64), Err(Error::Range { .. })));

    // nilai lama tetap
    assert_eq!(rec.get("mode").unwrap(), Value::Int(5));
}

#[test]
fn test_f32_near_max_is_rounded() {
    let mut rec = Record::of::<Telemetry>(Endian::Little).unwrap();

    rec.set("temp", f32::MAX as f64 * (1.0 + 1e-9)).unwrap();
    assert_eq!(rec.get("temp").unwrap(), Value::Float(f32::MAX as f64));

    rec.set("temp", true).unwrap();
    assert_eq!(rec.get("temp").unwrap(), Value::Float(1.0));
}

#[test]
fn test_scalar_array_roundtrip() {
    let mut rec = Record::of::<Telemetry>(Endian::Big).unwrap();
    rec.set("deltas", [-1i16, 0, 300]).unwrap();
    rec.set("counters", [1u16, 0xbeef]).unwrap();

    assert_eq!(
        rec.get("deltas").unwrap(),
        Value::List(vec![Value::Int(-1), Value::Int(0), Value::Int(300)])
    );
    assert_eq!(
        rec.get("counters").unwrap().as_list().unwrap(),
        &[Value::UInt(1), Value::UInt(0xbeef)]
    );

    let offset = rec.layout().get("counters").unwrap().offset;
    assert_eq!(&rec.as_bytes()[offset..offset + 4], &[0x00, 0x01, 0xbe, 0xef]);
}

#[test]
fn test_scalar_array_length_mismatch() {
    let mut rec = Record::of::<Telemetry>(Endian::Little).unwrap();
    assert_eq!(
        rec.set("deltas", [1i16, 2]),
        Err(Error::SizeMismatch {
            expected: 3,
            actual: 2
        })
    );
    assert_eq!(
        rec.set("deltas", 1i16),
        Err(Error::SizeMismatch {
            expected: 3,
            actual: 1
        })
    );
}

#[test]
fn test_failed_array_set_leaves_buffer_untouched() {
    let mut rec = Record::of::<Telemetry>(Endian::Little).unwrap();
    rec.set("deltas", [1i16, 2, 3]).unwrap();
    let before = rec.to_bytes();

    let err = rec.set("deltas", [4i32, 5, 70_000]).unwrap_err();
    assert!(matches!(err, Error::Range { .. }));
    assert_eq!(rec.to_bytes(), before);
}

#[test]
fn test_opaque_bytes_are_not_integers() {
    let mut rec = Record::of::<Packet>(Endian::Little).unwrap();
    rec.set("name", b"\x00\xffab").unwrap();

    let value = rec.get("name").unwrap();
    assert_eq!(value.as_bytes(), Some(&b"\x00\xffab"[..]));
    assert!(value.as_list().is_none());
}

#[test]
fn test_endianness_reverses_slots() {
    let mut le = Record::of::<Telemetry>(Endian::Little).unwrap();
    let mut be = Record::of::<Telemetry>(Endian::Big).unwrap();
    for rec in [&mut le, &mut be] {
        rec.set("seq", 0x0102_0304_0506_0708u64).unwrap();
        rec.set("ratio", -3.75f64).unwrap();
    }

    for name in ["seq", "ratio"] {
        let field = *le.layout().get(name).unwrap();
        let mut reversed = be.as_bytes()[field.range()].to_vec();
        reversed.reverse();
        assert_eq!(&le.as_bytes()[field.range()], reversed.as_slice(), "{}", name);
    }
}

#[test]
fn test_reencode_switches_byte_order() {
    let mut le = Record::of::<Telemetry>(Endian::Little).unwrap();
    le.set("seq", 42u64).unwrap();
    le.set("deltas", [-3i16, 2, 1]).unwrap();

    let be = le.reencode(Endian::Big).unwrap();
    assert_eq!(be.endian(), Endian::Big);
    assert_eq!(be.entries(), le.entries());
    assert_ne!(be.to_bytes(), le.to_bytes());
}

#[test]
fn test_load_roundtrip_is_noop() {
    let mut rec = Record::of::<Telemetry>(Endian::Little).unwrap();
    rec.set("seq", 12345u64).unwrap();
    rec.set("alive", true).unwrap();

    let before = rec.to_bytes();
    rec.load_buffer(&rec.to_bytes()).unwrap();
    assert_eq!(rec.to_bytes(), before);
}

#[test]
fn test_create_rejects_wrong_length() {
    for len in [0, 8, 10] {
        let data = vec![0u8; len];
        assert_eq!(
            Record::create::<Packet>(&data, Endian::Little).unwrap_err(),
            Error::SizeMismatch {
                expected: 9,
                actual: len
            }
        );
    }

    let rec = Record::create::<Packet>(&[1, 0, 0, 0, 0, b'x', b'y', b'z', b'w'], Endian::Little)
        .unwrap();
    assert_eq!(rec.get("id").unwrap(), Value::UInt(1));
}

#[test]
fn test_unknown_field() {
    let mut rec = Record::of::<Packet>(Endian::Little).unwrap();
    assert_eq!(rec.get("size"), Err(Error::UnknownField("size".into())));
    assert_eq!(
        rec.set("size", 1u8),
        Err(Error::UnknownField("size".into()))
    );
}

#[test]
fn test_copy_into_bounds() {
    let mut rec = Record::of::<Packet>(Endian::Little).unwrap();
    rec.copy_into(&[0xaa, 0xbb], 3).unwrap();
    assert_eq!(rec.to_bytes()[3..5], [0xaa, 0xbb]);

    assert!(matches!(
        rec.copy_into(&[0; 2], 8),
        Err(Error::OutOfRange { offset: 8, len: 2, size: 9 })
    ));
}

#[test]
fn test_text_schema_definition_errors() {
    assert!(matches!(
        Layout::parse("id\n"),
        Err(DefinitionError::Line { line: 1, .. })
    ));
    assert!(Layout::parse("id u32 1 2\n").is_err());
    assert!(Layout::parse("id u24\n").is_err());
    assert!(Layout::parse("id 11\n").is_err());
    assert!(Layout::parse("id u8 0\n").is_err());

    let layout = Layout::parse("id 2\nflag 10\nname 0 4\n").unwrap();
    assert_eq!(layout, *Packet::layout().unwrap());
}

#[test]
fn test_schema_from_ron() {
    let defs: Vec<FieldDef> = ron::from_str(
        r#"[
            (name: "id", type: u32),
            (name: "flag", type: bool),
            (name: "name", type: u8, count: 4),
        ]"#,
    )
    .unwrap();

    assert_eq!(defs, Packet::fields());
    assert_eq!(defs[2], FieldDef::array("name", FieldType::U8, 4));

    let rec = Record::new(Layout::compute(&defs).unwrap(), Endian::Little);
    assert_eq!(rec.size(), 9);
}

#[test]
fn test_scope_guard_resets_metadata() {
    let mut rec = Record::of::<Packet>(Endian::Big).unwrap();
    {
        let mut scope = rec.scope();
        scope.set("id", 1u32).unwrap();
        assert_eq!(scope.size(), 9);
    }
    assert_eq!(rec.size(), 0);
    assert!(rec.to_bytes().is_empty());
    assert_eq!(rec.endian(), Endian::Little);
    assert!(rec.entries().is_empty());
}
