use std::io::Cursor;

use hprof_stream::{DecoderBuilder, Error, Visitor};

#[derive(Default)]
struct RecordingVisitor {
    header: Option<(String, usize, u64)>,
    strings: Vec<(u64, String)>,
    load_classes: Vec<(u32, u64, u32, u64)>,
    stack_traces: Vec<(u32, u32, Vec<u64>)>,
    int_arrays: Vec<(u64, u32, Vec<i32>)>,
    byte_arrays: Vec<(u64, u32, Vec<i8>)>,
    class_constant_bytes: Vec<(u16, i8)>,
    class_static_bytes: Vec<(u64, i8)>,
    call_count: usize,
}

impl Visitor for RecordingVisitor {
    type Error = std::convert::Infallible;

    fn visit_header(
        &mut self,
        version: &str,
        id_size_bytes: usize,
        timestamp_millis: u64,
    ) -> std::result::Result<(), Self::Error> {
        self.call_count += 1;
        self.header = Some((version.to_string(), id_size_bytes, timestamp_millis));
        Ok(())
    }

    fn visit_string(&mut self, id: u64, text: &str) -> std::result::Result<(), Self::Error> {
        self.call_count += 1;
        self.strings.push((id, text.to_string()));
        Ok(())
    }

    fn visit_load_class(
        &mut self,
        class_serial: u32,
        class_object_id: u64,
        stack_trace_serial: u32,
        class_name_id: u64,
    ) -> std::result::Result<(), Self::Error> {
        self.call_count += 1;
        self.load_classes
            .push((class_serial, class_object_id, stack_trace_serial, class_name_id));
        Ok(())
    }

    fn visit_stack_trace(
        &mut self,
        stack_trace_serial: u32,
        thread_serial: u32,
        frame_ids: &[u64],
    ) -> std::result::Result<(), Self::Error> {
        self.call_count += 1;
        self.stack_traces
            .push((stack_trace_serial, thread_serial, frame_ids.to_vec()));
        Ok(())
    }

    fn visit_int_array(
        &mut self,
        array_object_id: u64,
        stack_trace_serial: u32,
        elements: &[i32],
    ) -> std::result::Result<(), Self::Error> {
        self.call_count += 1;
        self.int_arrays
            .push((array_object_id, stack_trace_serial, elements.to_vec()));
        Ok(())
    }

    fn visit_byte_array(
        &mut self,
        array_object_id: u64,
        stack_trace_serial: u32,
        elements: &[i8],
    ) -> std::result::Result<(), Self::Error> {
        self.call_count += 1;
        self.byte_arrays
            .push((array_object_id, stack_trace_serial, elements.to_vec()));
        Ok(())
    }

    fn visit_class_constant_byte(&mut self, pool_index: u16, value: i8) -> std::result::Result<(), Self::Error> {
        self.call_count += 1;
        self.class_constant_bytes.push((pool_index, value));
        Ok(())
    }

    fn visit_class_static_byte(&mut self, name_id: u64, value: i8) -> std::result::Result<(), Self::Error> {
        self.call_count += 1;
        self.class_static_bytes.push((name_id, value));
        Ok(())
    }
}

fn header(id_size: u32, timestamp: u64) -> Vec<u8> {
    let mut buf = b"JAVA PROFILE 1.0.2\0".to_vec();
    buf.extend_from_slice(&id_size.to_be_bytes());
    buf.extend_from_slice(&timestamp.to_be_bytes());
    buf
}

/// Scenario 1: empty dump happy path.
#[test]
fn empty_dump_happy_path() {
    let bytes = header(4, 0);
    let mut decoder = DecoderBuilder::new().build();
    let mut visitor = RecordingVisitor::default();
    decoder.read(Cursor::new(bytes), &mut visitor).unwrap();

    assert_eq!(visitor.header, Some(("JAVA PROFILE 1.0.2".to_string(), 4, 0)));
    assert_eq!(visitor.call_count, 1);
}

/// Scenario 2: one string.
#[test]
fn one_string_record() {
    let mut bytes = header(4, 0);
    bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x2A]);
    bytes.extend_from_slice(b"ABC");

    let mut decoder = DecoderBuilder::new().build();
    let mut visitor = RecordingVisitor::default();
    decoder.read(Cursor::new(bytes), &mut visitor).unwrap();

    assert_eq!(visitor.strings, vec![(0x2A, "ABC".to_string())]);
}

/// Scenario 3: load-class with 8-byte identifiers.
#[test]
fn load_class_with_eight_byte_ids() {
    let bytes: Vec<u8> = [
        header(8, 0),
        vec![
            0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20,
        ],
    ]
    .concat();

    let mut decoder = DecoderBuilder::new().build();
    let mut visitor = RecordingVisitor::default();
    decoder.read(Cursor::new(bytes), &mut visitor).unwrap();

    assert_eq!(visitor.load_classes, vec![(1, 0x10, 2, 0x20)]);
}

/// Scenario 4: stack trace with two frames.
#[test]
fn stack_trace_with_two_frames() {
    let bytes: Vec<u8> = [
        header(4, 0),
        vec![
            0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x03,
            0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0xAA, 0x00, 0x00, 0x00, 0xBB,
        ],
    ]
    .concat();

    let mut decoder = DecoderBuilder::new().build();
    let mut visitor = RecordingVisitor::default();
    decoder.read(Cursor::new(bytes), &mut visitor).unwrap();

    assert_eq!(visitor.stack_traces, vec![(7, 3, vec![0xAA, 0xBB])]);
}

/// Scenario 5: a primitive int array inside a heap-dump section.
#[test]
fn primitive_int_array_inside_heap_dump() {
    let mut bytes = header(4, 0);

    let inner: Vec<u8> = {
        let mut inner = vec![0x23]; // PrimitiveArrayDump
        inner.extend_from_slice(&5u32.to_be_bytes()); // array_object_id
        inner.extend_from_slice(&0u32.to_be_bytes()); // stack_trace_serial
        inner.extend_from_slice(&2u32.to_be_bytes()); // length
        inner.push(10); // BasicType::Int
        inner.extend_from_slice(&1i32.to_be_bytes());
        inner.extend_from_slice(&2i32.to_be_bytes());
        inner
    };
    bytes.push(0x1C); // HEAP_DUMP
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&(inner.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&inner);
    bytes.push(0x2C); // HEAP_DUMP_END
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());

    let mut decoder = DecoderBuilder::new().build();
    let mut visitor = RecordingVisitor::default();
    decoder.read(Cursor::new(bytes), &mut visitor).unwrap();

    assert_eq!(visitor.int_arrays, vec![(5, 0, vec![1, 2])]);
}

/// Byte-signedness property: a primitive byte array reports elements as `i8`, so `0xFF`
/// round-trips as `-1`, not `255`.
#[test]
fn primitive_byte_array_is_signed() {
    let mut bytes = header(4, 0);

    let inner: Vec<u8> = {
        let mut inner = vec![0x23]; // PrimitiveArrayDump
        inner.extend_from_slice(&9u32.to_be_bytes()); // array_object_id
        inner.extend_from_slice(&0u32.to_be_bytes()); // stack_trace_serial
        inner.extend_from_slice(&2u32.to_be_bytes()); // length
        inner.push(8); // BasicType::Byte
        inner.push(0xFF);
        inner.push(0x01);
        inner
    };
    bytes.push(0x1C); // HEAP_DUMP
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&(inner.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&inner);
    bytes.push(0x2C); // HEAP_DUMP_END
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());

    let mut decoder = DecoderBuilder::new().build();
    let mut visitor = RecordingVisitor::default();
    decoder.read(Cursor::new(bytes), &mut visitor).unwrap();

    assert_eq!(visitor.byte_arrays, vec![(9, 0, vec![-1, 1])]);
}

/// Byte-signedness property: class-dump constant and static byte values are also reported
/// as `i8`.
#[test]
fn class_dump_byte_constant_and_static_are_signed() {
    let mut bytes = header(4, 0);

    let inner: Vec<u8> = {
        let mut inner = vec![0x20]; // ClassDump
        inner.extend_from_slice(&1u32.to_be_bytes()); // class_object_id
        inner.extend_from_slice(&0u32.to_be_bytes()); // stack_trace_serial
        inner.extend_from_slice(&0u32.to_be_bytes()); // super_class_object_id
        inner.extend_from_slice(&0u32.to_be_bytes()); // class_loader_object_id
        inner.extend_from_slice(&0u32.to_be_bytes()); // signers_object_id
        inner.extend_from_slice(&0u32.to_be_bytes()); // protection_domain_object_id
        inner.extend_from_slice(&0u32.to_be_bytes()); // reserved1
        inner.extend_from_slice(&0u32.to_be_bytes()); // reserved2
        inner.extend_from_slice(&0u32.to_be_bytes()); // instance_size
        inner.extend_from_slice(&1u16.to_be_bytes()); // constant_count
        inner.extend_from_slice(&1u16.to_be_bytes()); // pool_index
        inner.push(8); // BasicType::Byte
        inner.push(0xFF); // value = -1
        inner.extend_from_slice(&1u16.to_be_bytes()); // static_count
        inner.extend_from_slice(&0x50u32.to_be_bytes()); // name_id
        inner.push(8); // BasicType::Byte
        inner.push(0xFF); // value = -1
        inner.extend_from_slice(&0u16.to_be_bytes()); // field_count
        inner
    };
    bytes.push(0x1C); // HEAP_DUMP
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&(inner.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&inner);
    bytes.push(0x2C); // HEAP_DUMP_END
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());

    let mut decoder = DecoderBuilder::new().build();
    let mut visitor = RecordingVisitor::default();
    decoder.read(Cursor::new(bytes), &mut visitor).unwrap();

    assert_eq!(visitor.class_constant_bytes, vec![(1, -1)]);
    assert_eq!(visitor.class_static_bytes, vec![(0x50, -1)]);
}

/// Scenario 6: rejects an illegal id_size before any record is parsed.
#[test]
fn rejects_illegal_id_size() {
    let bytes = header(2, 0);
    let mut decoder = DecoderBuilder::new().build();
    let mut visitor = RecordingVisitor::default();
    let err = decoder.read(Cursor::new(bytes), &mut visitor).unwrap_err();

    assert!(matches!(
        err,
        Error::Header(hprof_stream::HeaderError::InvalidIdentifierSize(2))
    ));
    assert!(visitor.header.is_none());
}

/// Endianness property: the same logical values decoded under both byte orders agree.
#[test]
fn endianness_is_honored_in_both_directions() {
    let mut big = b"JAVA PROFILE 1.0.2\0".to_vec();
    big.extend_from_slice(&4u32.to_be_bytes());
    big.extend_from_slice(&0xABCDu64.to_be_bytes());
    big.push(0x01);
    big.extend_from_slice(&0u32.to_be_bytes());
    big.extend_from_slice(&5u32.to_be_bytes());
    big.extend_from_slice(&9u32.to_be_bytes());
    big.extend_from_slice(b"Z");

    let mut little = b"JAVA PROFILE 1.0.2\0".to_vec();
    little.extend_from_slice(&4u32.to_le_bytes());
    little.extend_from_slice(&0xABCDu64.to_le_bytes());
    little.push(0x01);
    little.extend_from_slice(&0u32.to_le_bytes());
    little.extend_from_slice(&5u32.to_le_bytes());
    little.extend_from_slice(&9u32.to_le_bytes());
    little.extend_from_slice(b"Z");

    let mut big_decoder = DecoderBuilder::new().byte_order(hprof_stream::ByteOrder::Big).build();
    let mut big_visitor = RecordingVisitor::default();
    big_decoder.read(Cursor::new(big), &mut big_visitor).unwrap();

    let mut little_decoder = DecoderBuilder::new()
        .byte_order(hprof_stream::ByteOrder::Little)
        .build();
    let mut little_visitor = RecordingVisitor::default();
    little_decoder.read(Cursor::new(little), &mut little_visitor).unwrap();

    assert_eq!(big_visitor.header.as_ref().unwrap().2, 0xABCD);
    assert_eq!(little_visitor.header.as_ref().unwrap().2, 0xABCD);
    assert_eq!(big_visitor.strings, little_visitor.strings);
}

/// Identifier-width property: a 4-byte identifier is zero-extended to u64 the same way an
/// equal-valued 8-byte identifier is reported.
#[test]
fn identifier_width_is_zero_extended() {
    let mut small = header(4, 0);
    small.extend_from_slice(&[0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x07]);
    small.extend_from_slice(b"Q");

    let mut wide = header(8, 0);
    wide.extend_from_slice(&[0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x09]);
    wide.extend_from_slice(&7u64.to_be_bytes());
    wide.extend_from_slice(b"Q");

    let mut small_decoder = DecoderBuilder::new().build();
    let mut small_visitor = RecordingVisitor::default();
    small_decoder.read(Cursor::new(small), &mut small_visitor).unwrap();

    let mut wide_decoder = DecoderBuilder::new().build();
    let mut wide_visitor = RecordingVisitor::default();
    wide_decoder.read(Cursor::new(wide), &mut wide_visitor).unwrap();

    assert_eq!(small_visitor.strings[0].0, 7);
    assert_eq!(wide_visitor.strings[0].0, 7);
}

/// Buffer-bound property: a string longer than the configured maximum raises a resource error.
#[test]
fn buffer_bound_is_enforced() {
    let text = vec![b'x'; 64];
    let mut bytes = header(4, 0);
    let length = 4 + text.len() as u32;
    bytes.push(0x01);
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&length.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&text);

    let mut decoder = DecoderBuilder::new().max_string_buffer_capacity(16).build();
    let mut visitor = RecordingVisitor::default();
    let err = decoder.read(Cursor::new(bytes), &mut visitor).unwrap_err();

    assert!(matches!(
        err,
        Error::Resource(hprof_stream::ResourceError::BufferCapacityExceeded { buffer: "string", .. })
    ));
}

/// No-overflow-on-preallocation property: an absurd declared array length is rejected without
/// attempting to allocate it, because it cannot possibly fit in the enclosing frame.
#[test]
fn array_length_exceeding_frame_is_rejected_without_allocating() {
    let inner: Vec<u8> = {
        let mut inner = vec![0x23];
        inner.extend_from_slice(&1u32.to_be_bytes());
        inner.extend_from_slice(&0u32.to_be_bytes());
        inner.extend_from_slice(&u32::MAX.to_be_bytes());
        inner.push(10); // BasicType::Int
        inner
    };
    let mut bytes = header(4, 0);
    bytes.push(0x1C);
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&(inner.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&inner);

    let mut decoder = DecoderBuilder::new().build();
    let mut visitor = RecordingVisitor::default();
    let err = decoder.read(Cursor::new(bytes), &mut visitor).unwrap_err();

    assert!(matches!(err, Error::Decode(hprof_stream::DecodeError::ArrayTooLarge { .. })));
}

/// At-most-one-callback property: truncating a stream mid-record stops decoding with an error
/// and no additional callback beyond the header fires.
#[test]
fn truncated_record_stops_after_header_callback() {
    let mut bytes = header(4, 0);
    bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, 0x00]);

    let mut decoder = DecoderBuilder::new().build();
    let mut visitor = RecordingVisitor::default();
    let err = decoder.read(Cursor::new(bytes), &mut visitor).unwrap_err();

    assert!(matches!(err, Error::Decode(hprof_stream::DecodeError::Truncated { .. })));
    assert_eq!(visitor.call_count, 1);
    assert!(visitor.strings.is_empty());
}
