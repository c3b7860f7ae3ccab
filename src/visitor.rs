//! The callback interface consumers implement to receive decoded records.
//!
//! Grounded on the `BinseqRead`/`PairedRead` trait shape in
//! `binseq::reader::read`: plain fallible methods taking primitive
//! arguments plus borrowed slices, parameterised by an associated error
//! type so a visitor can report failures in its own vocabulary instead of
//! being forced into this crate's error type.

/// Receives one callback per decoded record or field.
///
/// Every method defaults to doing nothing and returning `Ok(())`, so a
/// visitor only needs to override the events it cares about. All object,
/// class, thread, and stack-frame identifiers are passed as `u64`,
/// zero-extended from the stream's configured identifier width. Slices
/// passed to `visit_instance` and the array methods borrow directly from
/// this crate's scratch buffers and are only valid for the duration of the
/// call.
pub trait Visitor {
    /// The error type returned by callbacks, wrapped unchanged into
    /// [`crate::Error::Visitor`] by the decoder.
    type Error: std::error::Error + Send + Sync + 'static;

    fn visit_header(&mut self, _version: &str, _id_size_bytes: usize, _timestamp_millis: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_string(&mut self, _id: u64, _text: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_load_class(
        &mut self,
        _class_serial: u32,
        _class_object_id: u64,
        _stack_trace_serial: u32,
        _class_name_id: u64,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_stack_frame(
        &mut self,
        _frame_id: u64,
        _method_name_id: u64,
        _method_signature_id: u64,
        _source_file_name_id: u64,
        _class_serial: u32,
        _line_number: i32,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_stack_trace(
        &mut self,
        _stack_trace_serial: u32,
        _thread_serial: u32,
        _frame_ids: &[u64],
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_root_unknown(&mut self, _object_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_root_jni_global(&mut self, _object_id: u64, _jni_global_ref_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_root_jni_local(&mut self, _object_id: u64, _thread_serial: u32, _frame_number: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_root_java_frame(&mut self, _object_id: u64, _thread_serial: u32, _frame_number: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_root_native_stack(&mut self, _object_id: u64, _thread_serial: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_root_sticky_class(&mut self, _object_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_root_thread_block(&mut self, _object_id: u64, _thread_serial: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_root_monitor_used(&mut self, _object_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_root_thread_object(
        &mut self,
        _thread_object_id: u64,
        _thread_serial: u32,
        _stack_trace_serial: u32,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn visit_class_header(
        &mut self,
        _class_object_id: u64,
        _stack_trace_serial: u32,
        _super_class_object_id: u64,
        _class_loader_object_id: u64,
        _signers_object_id: u64,
        _protection_domain_object_id: u64,
        _instance_size: u32,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_constant_object(&mut self, _pool_index: u16, _value: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_constant_bool(&mut self, _pool_index: u16, _value: bool) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_constant_char(&mut self, _pool_index: u16, _value: u16) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_constant_float(&mut self, _pool_index: u16, _value: f32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_constant_double(&mut self, _pool_index: u16, _value: f64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_constant_byte(&mut self, _pool_index: u16, _value: i8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_constant_short(&mut self, _pool_index: u16, _value: i16) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_constant_int(&mut self, _pool_index: u16, _value: i32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_constant_long(&mut self, _pool_index: u16, _value: i64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_static_object(&mut self, _name_id: u64, _value: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_static_bool(&mut self, _name_id: u64, _value: bool) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_static_char(&mut self, _name_id: u64, _value: u16) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_static_float(&mut self, _name_id: u64, _value: f32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_static_double(&mut self, _name_id: u64, _value: f64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_static_byte(&mut self, _name_id: u64, _value: i8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_static_short(&mut self, _name_id: u64, _value: i16) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_static_int(&mut self, _name_id: u64, _value: i32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_static_long(&mut self, _name_id: u64, _value: i64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_field_object(&mut self, _name_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_field_bool(&mut self, _name_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_field_char(&mut self, _name_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_field_float(&mut self, _name_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_field_double(&mut self, _name_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_field_byte(&mut self, _name_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_field_short(&mut self, _name_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_field_int(&mut self, _name_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_class_field_long(&mut self, _name_id: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_instance(
        &mut self,
        _object_id: u64,
        _stack_trace_serial: u32,
        _class_object_id: u64,
        _field_bytes: &[u8],
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_object_array(
        &mut self,
        _array_object_id: u64,
        _stack_trace_serial: u32,
        _element_class_object_id: u64,
        _elements: &[u64],
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_bool_array(&mut self, _array_object_id: u64, _stack_trace_serial: u32, _elements: &[bool]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_char_array(&mut self, _array_object_id: u64, _stack_trace_serial: u32, _elements: &[u16]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_float_array(&mut self, _array_object_id: u64, _stack_trace_serial: u32, _elements: &[f32]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_double_array(&mut self, _array_object_id: u64, _stack_trace_serial: u32, _elements: &[f64]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_byte_array(&mut self, _array_object_id: u64, _stack_trace_serial: u32, _elements: &[i8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_short_array(&mut self, _array_object_id: u64, _stack_trace_serial: u32, _elements: &[i16]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_int_array(&mut self, _array_object_id: u64, _stack_trace_serial: u32, _elements: &[i32]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_long_array(&mut self, _array_object_id: u64, _stack_trace_serial: u32, _elements: &[i64]) -> Result<(), Self::Error> {
        Ok(())
    }
}
