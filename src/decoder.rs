//! The public façade: header parsing, the outer record loop, and the inner
//! heap-dump sub-record decoder.
//!
//! The outer loop and per-tag handling follow `binseq::reader::single::SingleReader`'s
//! header-then-loop shape: parse the header once, then repeatedly read a
//! fixed-size record prefix and dispatch on it, terminating cleanly at a
//! clean end-of-stream and hard-erroring on a short read mid-record.

use crate::buffer::{ScratchBuffer, SmallBufferPool};
use crate::channel::{Channel, LengthFramed, PrependBuffered};
use crate::config::{ByteOrder, DecoderBuilder, DecoderOptions, INITIAL_BUFFER_CAPACITY};
use crate::error::{DecodeError, Error, Result};
use crate::header::Header;
use crate::id::IdSize;
use crate::stream::DataStream;
use crate::tags::{BasicType, HeapTag, OuterTag};
use crate::visitor::Visitor;

/// A streaming hprof decoder: owns its scratch buffers and drives one [`Visitor`] per call to
/// [`Decoder::read`]. Not safe to share between threads decoding different streams concurrently;
/// build one per stream.
pub struct Decoder {
    options: DecoderOptions,
    stack_buffer: ScratchBuffer,
    string_buffer: ScratchBuffer,
    instance_buffer: ScratchBuffer,
    small_pool: SmallBufferPool,
}

impl Decoder {
    /// Starts building a [`Decoder`] with default options.
    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::new()
    }

    pub(crate) fn from_options(options: DecoderOptions) -> Self {
        Self {
            stack_buffer: ScratchBuffer::new(
                "stack",
                INITIAL_BUFFER_CAPACITY,
                options.max_stack_buffer_capacity,
            ),
            string_buffer: ScratchBuffer::new(
                "string",
                INITIAL_BUFFER_CAPACITY,
                options.max_string_buffer_capacity,
            ),
            instance_buffer: ScratchBuffer::new(
                "instance",
                INITIAL_BUFFER_CAPACITY,
                options.max_instance_buffer_capacity,
            ),
            small_pool: SmallBufferPool::new(),
            options,
        }
    }

    /// The options this decoder was built with.
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decodes one complete hprof stream from `channel`, invoking `visitor` once per logical
    /// record in stream order. Returns once `HEAP_DUMP_END` is seen or the channel reaches a
    /// clean end-of-stream at a record boundary.
    pub fn read<C, V>(&mut self, channel: C, visitor: &mut V) -> Result<()>
    where
        C: Channel,
        V: Visitor,
    {
        let byte_order = self.options.byte_order;
        let mut channel = channel;

        let mut probe = self.small_pool.acquire();
        let mut filled = 0;
        loop {
            let read = channel.read(&mut probe[filled..])?;
            if read == 0 {
                break;
            }
            filled += read;
            if filled == probe.len() {
                break;
            }
        }

        let (header, consumed) = match Header::parse(&probe[..filled], byte_order) {
            Ok(ok) => ok,
            Err(err) => {
                self.small_pool.release(probe);
                return Err(err);
            }
        };
        visitor
            .visit_header(&header.version, header.id_size.byte_len(), header.timestamp_millis)
            .map_err(Error::from_visitor)?;

        let prefix = probe[consumed..filled].to_vec();
        self.small_pool.release(probe);

        let prepended = PrependBuffered::new(prefix, 0, &mut channel);
        let mut stream = DataStream::new(prepended, byte_order);

        loop {
            if !stream.has_remaining()? {
                return Ok(());
            }
            let tag = stream.read_u8()?;
            let _time_delta = stream.read_u32()?;
            let length = stream.read_u32()?;

            let outer_tag = OuterTag::try_from(tag)?;
            match outer_tag {
                OuterTag::String => {
                    self.decode_string(&mut stream, header.id_size, length, visitor)?;
                }
                OuterTag::LoadClass => {
                    self.decode_load_class(&mut stream, header.id_size, byte_order, visitor)?;
                }
                OuterTag::StackFrame => {
                    self.decode_stack_frame(&mut stream, header.id_size, byte_order, visitor)?;
                }
                OuterTag::StackTrace => {
                    self.decode_stack_trace(&mut stream, header.id_size, byte_order, visitor)?;
                }
                OuterTag::HeapDump => {
                    let framed = LengthFramed::new(stream.channel_mut(), u64::from(length));
                    let mut inner = DataStream::new(framed, byte_order);
                    self.decode_heap_dump(&mut inner, header.id_size, visitor)?;
                    let remaining = inner.frame_remaining();
                    if remaining > 0 {
                        return Err(DecodeError::FrameNotDrained { remaining }.into());
                    }
                }
                OuterTag::HeapDumpEnd => {
                    return Ok(());
                }
            }
        }
    }

    fn decode_string<C: Channel, V: Visitor>(
        &mut self,
        stream: &mut DataStream<PrependBuffered<'_, C>>,
        id_size: IdSize,
        length: u32,
        visitor: &mut V,
    ) -> Result<()> {
        let id_byte_len = id_size.byte_len();
        let text_len = (length as usize).checked_sub(id_byte_len).ok_or(
            DecodeError::RecordShorterThanIdentifier {
                length,
                id_size: id_byte_len,
            },
        )?;

        let id = stream.read_id(id_size)?;
        let text_buf = self.string_buffer.ensure_capacity(text_len)?;
        stream.read_exact_into(text_buf)?;
        let text =
            std::str::from_utf8(text_buf).map_err(|_| DecodeError::InvalidStringEncoding)?;
        visitor.visit_string(id, text).map_err(Error::from_visitor)
    }

    fn decode_load_class<C: Channel, V: Visitor>(
        &mut self,
        stream: &mut DataStream<PrependBuffered<'_, C>>,
        id_size: IdSize,
        byte_order: ByteOrder,
        visitor: &mut V,
    ) -> Result<()> {
        let n = 2 * id_size.byte_len() + 8;
        let mut pooled = self.small_pool.acquire();
        stream.read_exact_into(&mut pooled[..n])?;
        let buf = &pooled[..n];

        let mut pos = 0;
        let class_serial = byte_order.read_u32(&buf[pos..pos + 4]);
        pos += 4;
        let class_object_id = read_id_from(&buf[pos..], id_size, byte_order);
        pos += id_size.byte_len();
        let stack_trace_serial = byte_order.read_u32(&buf[pos..pos + 4]);
        pos += 4;
        let class_name_id = read_id_from(&buf[pos..], id_size, byte_order);

        self.small_pool.release(pooled);
        visitor
            .visit_load_class(class_serial, class_object_id, stack_trace_serial, class_name_id)
            .map_err(Error::from_visitor)
    }

    fn decode_stack_frame<C: Channel, V: Visitor>(
        &mut self,
        stream: &mut DataStream<PrependBuffered<'_, C>>,
        id_size: IdSize,
        byte_order: ByteOrder,
        visitor: &mut V,
    ) -> Result<()> {
        let n = 4 * id_size.byte_len() + 8;
        let mut pooled = self.small_pool.acquire();
        stream.read_exact_into(&mut pooled[..n])?;
        let buf = &pooled[..n];

        let mut pos = 0;
        let frame_id = read_id_from(&buf[pos..], id_size, byte_order);
        pos += id_size.byte_len();
        let method_name_id = read_id_from(&buf[pos..], id_size, byte_order);
        pos += id_size.byte_len();
        let method_signature_id = read_id_from(&buf[pos..], id_size, byte_order);
        pos += id_size.byte_len();
        let source_file_name_id = read_id_from(&buf[pos..], id_size, byte_order);
        pos += id_size.byte_len();
        let class_serial = byte_order.read_u32(&buf[pos..pos + 4]);
        pos += 4;
        let line_number = byte_order.read_i32(&buf[pos..pos + 4]);

        self.small_pool.release(pooled);
        visitor
            .visit_stack_frame(
                frame_id,
                method_name_id,
                method_signature_id,
                source_file_name_id,
                class_serial,
                line_number,
            )
            .map_err(Error::from_visitor)
    }

    fn decode_stack_trace<C: Channel, V: Visitor>(
        &mut self,
        stream: &mut DataStream<PrependBuffered<'_, C>>,
        id_size: IdSize,
        byte_order: ByteOrder,
        visitor: &mut V,
    ) -> Result<()> {
        let mut pooled = self.small_pool.acquire();
        stream.read_exact_into(&mut pooled[..12])?;
        let stack_trace_serial = byte_order.read_u32(&pooled[0..4]);
        let thread_serial = byte_order.read_u32(&pooled[4..8]);
        let frame_count = byte_order.read_u32(&pooled[8..12]) as usize;
        self.small_pool.release(pooled);

        let id_byte_len = id_size.byte_len();
        let ids_buf = self.stack_buffer.ensure_capacity(frame_count * id_byte_len)?;
        stream.read_exact_into(ids_buf)?;
        let frame_ids: Vec<u64> = ids_buf
            .chunks_exact(id_byte_len)
            .map(|chunk| read_id_from(chunk, id_size, byte_order))
            .collect();

        visitor
            .visit_stack_trace(stack_trace_serial, thread_serial, &frame_ids)
            .map_err(Error::from_visitor)
    }

    fn decode_heap_dump<C: Channel, V: Visitor>(
        &mut self,
        stream: &mut DataStream<LengthFramed<'_, C>>,
        id_size: IdSize,
        visitor: &mut V,
    ) -> Result<()> {
        while stream.has_remaining()? {
            let tag = stream.read_u8()?;
            let heap_tag = HeapTag::try_from(tag)?;
            match heap_tag {
                HeapTag::RootUnknown => {
                    let oid = stream.read_id(id_size)?;
                    visitor.visit_root_unknown(oid).map_err(Error::from_visitor)?;
                }
                HeapTag::RootJniGlobal => {
                    let oid = stream.read_id(id_size)?;
                    let jni_global_ref_id = stream.read_id(id_size)?;
                    visitor
                        .visit_root_jni_global(oid, jni_global_ref_id)
                        .map_err(Error::from_visitor)?;
                }
                HeapTag::RootJniLocal => {
                    let oid = stream.read_id(id_size)?;
                    let thread_serial = stream.read_u32()?;
                    let frame_number = stream.read_u32()?;
                    visitor
                        .visit_root_jni_local(oid, thread_serial, frame_number)
                        .map_err(Error::from_visitor)?;
                }
                HeapTag::RootJavaFrame => {
                    let oid = stream.read_id(id_size)?;
                    let thread_serial = stream.read_u32()?;
                    let frame_number = stream.read_u32()?;
                    visitor
                        .visit_root_java_frame(oid, thread_serial, frame_number)
                        .map_err(Error::from_visitor)?;
                }
                HeapTag::RootNativeStack => {
                    let oid = stream.read_id(id_size)?;
                    let thread_serial = stream.read_u32()?;
                    visitor
                        .visit_root_native_stack(oid, thread_serial)
                        .map_err(Error::from_visitor)?;
                }
                HeapTag::RootStickyClass => {
                    let oid = stream.read_id(id_size)?;
                    visitor
                        .visit_root_sticky_class(oid)
                        .map_err(Error::from_visitor)?;
                }
                HeapTag::RootThreadBlock => {
                    let oid = stream.read_id(id_size)?;
                    let thread_serial = stream.read_u32()?;
                    visitor
                        .visit_root_thread_block(oid, thread_serial)
                        .map_err(Error::from_visitor)?;
                }
                HeapTag::RootMonitorUsed => {
                    let oid = stream.read_id(id_size)?;
                    visitor
                        .visit_root_monitor_used(oid)
                        .map_err(Error::from_visitor)?;
                }
                HeapTag::RootThreadObject => {
                    let thread_object_id = stream.read_id(id_size)?;
                    let thread_serial = stream.read_u32()?;
                    let stack_trace_serial = stream.read_u32()?;
                    visitor
                        .visit_root_thread_object(thread_object_id, thread_serial, stack_trace_serial)
                        .map_err(Error::from_visitor)?;
                }
                HeapTag::ClassDump => {
                    self.decode_class_dump(stream, id_size, visitor)?;
                }
                HeapTag::InstanceDump => {
                    let object_id = stream.read_id(id_size)?;
                    let stack_trace_serial = stream.read_u32()?;
                    let class_object_id = stream.read_id(id_size)?;
                    let size = stream.read_u32()? as usize;
                    let field_bytes = self.instance_buffer.ensure_capacity(size)?;
                    stream.read_exact_into(field_bytes)?;
                    visitor
                        .visit_instance(object_id, stack_trace_serial, class_object_id, field_bytes)
                        .map_err(Error::from_visitor)?;
                }
                HeapTag::ObjectArrayDump => {
                    let array_object_id = stream.read_id(id_size)?;
                    let stack_trace_serial = stream.read_u32()?;
                    let length = u64::from(stream.read_u32()?);
                    let element_class_object_id = stream.read_id(id_size)?;

                    let element_size = id_size.byte_len() as u64;
                    check_array_fits(length, element_size, stream.frame_remaining())?;

                    let mut elements = Vec::with_capacity(length as usize);
                    for _ in 0..length {
                        elements.push(stream.read_id(id_size)?);
                    }
                    visitor
                        .visit_object_array(array_object_id, stack_trace_serial, element_class_object_id, &elements)
                        .map_err(Error::from_visitor)?;
                }
                HeapTag::PrimitiveArrayDump => {
                    self.decode_primitive_array(stream, id_size, visitor)?;
                }
            }
        }
        Ok(())
    }

    fn decode_class_dump<C: Channel, V: Visitor>(
        &mut self,
        stream: &mut DataStream<LengthFramed<'_, C>>,
        id_size: IdSize,
        visitor: &mut V,
    ) -> Result<()> {
        let class_object_id = stream.read_id(id_size)?;
        let stack_trace_serial = stream.read_u32()?;
        let super_class_object_id = stream.read_id(id_size)?;
        let class_loader_object_id = stream.read_id(id_size)?;
        let signers_object_id = stream.read_id(id_size)?;
        let protection_domain_object_id = stream.read_id(id_size)?;
        let _reserved1 = stream.read_id(id_size)?;
        let _reserved2 = stream.read_id(id_size)?;
        let instance_size = stream.read_u32()?;

        visitor
            .visit_class_header(
                class_object_id,
                stack_trace_serial,
                super_class_object_id,
                class_loader_object_id,
                signers_object_id,
                protection_domain_object_id,
                instance_size,
            )
            .map_err(Error::from_visitor)?;

        let constant_count = stream.read_u16()?;
        for _ in 0..constant_count {
            let pool_index = stream.read_u16()?;
            let ty = BasicType::try_from(stream.read_u8()?)?;
            match ty {
                BasicType::Object => {
                    let v = stream.read_id(id_size)?;
                    visitor.visit_class_constant_object(pool_index, v)
                }
                BasicType::Boolean => {
                    let v = stream.read_bool()?;
                    visitor.visit_class_constant_bool(pool_index, v)
                }
                BasicType::Char => {
                    let v = stream.read_char()?;
                    visitor.visit_class_constant_char(pool_index, v)
                }
                BasicType::Float => {
                    let v = stream.read_f32()?;
                    visitor.visit_class_constant_float(pool_index, v)
                }
                BasicType::Double => {
                    let v = stream.read_f64()?;
                    visitor.visit_class_constant_double(pool_index, v)
                }
                BasicType::Byte => {
                    let v = stream.read_u8()? as i8;
                    visitor.visit_class_constant_byte(pool_index, v)
                }
                BasicType::Short => {
                    let v = stream.read_u16()? as i16;
                    visitor.visit_class_constant_short(pool_index, v)
                }
                BasicType::Int => {
                    let v = stream.read_i32()?;
                    visitor.visit_class_constant_int(pool_index, v)
                }
                BasicType::Long => {
                    let v = stream.read_u64()? as i64;
                    visitor.visit_class_constant_long(pool_index, v)
                }
            }
            .map_err(Error::from_visitor)?;
        }

        let static_count = stream.read_u16()?;
        for _ in 0..static_count {
            let name_id = stream.read_id(id_size)?;
            let ty = BasicType::try_from(stream.read_u8()?)?;
            match ty {
                BasicType::Object => {
                    let v = stream.read_id(id_size)?;
                    visitor.visit_class_static_object(name_id, v)
                }
                BasicType::Boolean => {
                    let v = stream.read_bool()?;
                    visitor.visit_class_static_bool(name_id, v)
                }
                BasicType::Char => {
                    let v = stream.read_char()?;
                    visitor.visit_class_static_char(name_id, v)
                }
                BasicType::Float => {
                    let v = stream.read_f32()?;
                    visitor.visit_class_static_float(name_id, v)
                }
                BasicType::Double => {
                    let v = stream.read_f64()?;
                    visitor.visit_class_static_double(name_id, v)
                }
                BasicType::Byte => {
                    let v = stream.read_u8()? as i8;
                    visitor.visit_class_static_byte(name_id, v)
                }
                BasicType::Short => {
                    let v = stream.read_u16()? as i16;
                    visitor.visit_class_static_short(name_id, v)
                }
                BasicType::Int => {
                    let v = stream.read_i32()?;
                    visitor.visit_class_static_int(name_id, v)
                }
                BasicType::Long => {
                    let v = stream.read_u64()? as i64;
                    visitor.visit_class_static_long(name_id, v)
                }
            }
            .map_err(Error::from_visitor)?;
        }

        let field_count = stream.read_u16()?;
        for _ in 0..field_count {
            let name_id = stream.read_id(id_size)?;
            let ty = BasicType::try_from(stream.read_u8()?)?;
            match ty {
                BasicType::Object => visitor.visit_class_field_object(name_id),
                BasicType::Boolean => visitor.visit_class_field_bool(name_id),
                BasicType::Char => visitor.visit_class_field_char(name_id),
                BasicType::Float => visitor.visit_class_field_float(name_id),
                BasicType::Double => visitor.visit_class_field_double(name_id),
                BasicType::Byte => visitor.visit_class_field_byte(name_id),
                BasicType::Short => visitor.visit_class_field_short(name_id),
                BasicType::Int => visitor.visit_class_field_int(name_id),
                BasicType::Long => visitor.visit_class_field_long(name_id),
            }
            .map_err(Error::from_visitor)?;
        }

        Ok(())
    }

    fn decode_primitive_array<C: Channel, V: Visitor>(
        &mut self,
        stream: &mut DataStream<LengthFramed<'_, C>>,
        id_size: IdSize,
        visitor: &mut V,
    ) -> Result<()> {
        let array_object_id = stream.read_id(id_size)?;
        let stack_trace_serial = stream.read_u32()?;
        let length = u64::from(stream.read_u32()?);
        let ty_byte = stream.read_u8()?;
        let ty = BasicType::try_from(ty_byte)?;
        if ty == BasicType::Object {
            return Err(DecodeError::ObjectInPrimitiveArray.into());
        }

        let element_size = ty.size_of(id_size.byte_len()) as u64;
        check_array_fits(length, element_size, stream.frame_remaining())?;
        let length = length as usize;

        match ty {
            BasicType::Object => unreachable!("checked above"),
            BasicType::Boolean => {
                let mut elements = Vec::with_capacity(length);
                for _ in 0..length {
                    elements.push(stream.read_bool()?);
                }
                visitor
                    .visit_bool_array(array_object_id, stack_trace_serial, &elements)
                    .map_err(Error::from_visitor)
            }
            BasicType::Char => {
                let mut elements = Vec::with_capacity(length);
                for _ in 0..length {
                    elements.push(stream.read_char()?);
                }
                visitor
                    .visit_char_array(array_object_id, stack_trace_serial, &elements)
                    .map_err(Error::from_visitor)
            }
            BasicType::Float => {
                let mut elements = Vec::with_capacity(length);
                for _ in 0..length {
                    elements.push(stream.read_f32()?);
                }
                visitor
                    .visit_float_array(array_object_id, stack_trace_serial, &elements)
                    .map_err(Error::from_visitor)
            }
            BasicType::Double => {
                let mut elements = Vec::with_capacity(length);
                for _ in 0..length {
                    elements.push(stream.read_f64()?);
                }
                visitor
                    .visit_double_array(array_object_id, stack_trace_serial, &elements)
                    .map_err(Error::from_visitor)
            }
            BasicType::Byte => {
                let mut raw = vec![0u8; length];
                stream.read_exact_into(&mut raw)?;
                let elements: Vec<i8> = raw.into_iter().map(|b| b as i8).collect();
                visitor
                    .visit_byte_array(array_object_id, stack_trace_serial, &elements)
                    .map_err(Error::from_visitor)
            }
            BasicType::Short => {
                let mut elements = Vec::with_capacity(length);
                for _ in 0..length {
                    elements.push(stream.read_u16()? as i16);
                }
                visitor
                    .visit_short_array(array_object_id, stack_trace_serial, &elements)
                    .map_err(Error::from_visitor)
            }
            BasicType::Int => {
                let mut elements = Vec::with_capacity(length);
                for _ in 0..length {
                    elements.push(stream.read_i32()?);
                }
                visitor
                    .visit_int_array(array_object_id, stack_trace_serial, &elements)
                    .map_err(Error::from_visitor)
            }
            BasicType::Long => {
                let mut elements = Vec::with_capacity(length);
                for _ in 0..length {
                    elements.push(stream.read_u64()? as i64);
                }
                visitor
                    .visit_long_array(array_object_id, stack_trace_serial, &elements)
                    .map_err(Error::from_visitor)
            }
        }
    }
}

/// Decodes one identifier out of a raw byte slice at the front, given the frozen width.
fn read_id_from(buf: &[u8], id_size: IdSize, byte_order: ByteOrder) -> u64 {
    match id_size {
        IdSize::U4 => u64::from(byte_order.read_u32(&buf[..4])),
        IdSize::U8 => byte_order.read_u64(&buf[..8]),
    }
}

/// Rejects an array/section whose declared length would overrun the bytes left in its frame,
/// before any allocation proportional to `length` happens.
fn check_array_fits(length: u64, element_size: u64, frame_remaining: u64) -> Result<()> {
    let needed = length
        .checked_mul(element_size)
        .ok_or(DecodeError::ArrayTooLarge {
            length,
            element_size: element_size as usize,
            frame_remaining,
        })?;
    if needed > frame_remaining {
        return Err(DecodeError::ArrayTooLarge {
            length,
            element_size: element_size as usize,
            frame_remaining,
        }
        .into());
    }
    Ok(())
}
