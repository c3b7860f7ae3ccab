use std::io::Cursor;

use hprof_stream::{Decoder, Visitor};

/// Collects a handful of summary counts instead of acting on every callback.
#[derive(Default)]
struct SummaryVisitor {
    string_count: usize,
    class_count: usize,
    instance_count: usize,
}

impl Visitor for SummaryVisitor {
    type Error = std::convert::Infallible;

    fn visit_header(&mut self, version: &str, id_size_bytes: usize, timestamp_millis: u64) -> Result<(), Self::Error> {
        println!("header: {version} (id_size={id_size_bytes}, timestamp={timestamp_millis})");
        Ok(())
    }

    fn visit_string(&mut self, _id: u64, _text: &str) -> Result<(), Self::Error> {
        self.string_count += 1;
        Ok(())
    }

    fn visit_load_class(&mut self, _class_serial: u32, _class_object_id: u64, _stack_trace_serial: u32, _class_name_id: u64) -> Result<(), Self::Error> {
        self.class_count += 1;
        Ok(())
    }

    fn visit_instance(&mut self, _object_id: u64, _stack_trace_serial: u32, _class_object_id: u64, _field_bytes: &[u8]) -> Result<(), Self::Error> {
        self.instance_count += 1;
        Ok(())
    }
}

fn build_sample_dump() -> Vec<u8> {
    let mut bytes = b"JAVA PROFILE 1.0.2\0".to_vec();
    bytes.extend_from_slice(&4u32.to_be_bytes()); // id_size
    bytes.extend_from_slice(&0u64.to_be_bytes()); // timestamp

    // one STRING record: id=0x2A, text="ABC"
    bytes.push(0x01);
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&7u32.to_be_bytes());
    bytes.extend_from_slice(&0x2Au32.to_be_bytes());
    bytes.extend_from_slice(b"ABC");

    // HEAP_DUMP_END
    bytes.push(0x2C);
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());

    bytes
}

fn main() -> hprof_stream::Result<()> {
    let dump = build_sample_dump();
    let mut decoder = Decoder::builder().build();
    let mut visitor = SummaryVisitor::default();

    decoder.read(Cursor::new(dump), &mut visitor)?;

    println!(
        "strings={} classes={} instances={}",
        visitor.string_count, visitor.class_count, visitor.instance_count
    );
    Ok(())
}
