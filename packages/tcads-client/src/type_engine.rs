//! The type engine (C7): recursive buffer <-> value conversion driven by
//! [`AdsDataType`] metadata. This is the only place in the crate that performs
//! bit arithmetic on struct members (§4.1's bit codec, centralized here).

use crate::error::{ClientError, Result};
use crate::symbols::{AdsDataType, SymbolCache};
use indexmap::IndexMap;

/// The primitive leaf values the engine can decode. Maps to ADST_* primitive
/// tags other than BIGTYPE/VOID.
#[derive(Debug, Clone, PartialEq)]
pub enum PlcPrimitive {
    Bool(bool),
    Byte(u8),
    SByte(i8),
    Word(u16),
    Int(i16),
    DWord(u32),
    DInt(i32),
    LWord(u64),
    LInt(i64),
    Real(f32),
    LReal(f64),
    String(String),
}

/// The host-side value representation. Mirrors the recursive shape of
/// [`AdsDataType`] itself: a struct decodes to `Struct`, a union to `Struct`
/// as well (all members read from the same bytes), an array to `Array`, an
/// enum-carrying primitive to `Enum`, and a pointer/reference/interface-sized
/// leaf to `Pointer`.
#[derive(Debug, Clone, PartialEq)]
pub enum PlcValue {
    Primitive(PlcPrimitive),
    Enum { name: String, value: i64 },
    Array(Vec<PlcValue>),
    Struct(IndexMap<String, PlcValue>),
    Pointer(u64),
}

/// Behavior toggles the type engine needs from [`crate::config::ClientSettings`].
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub objectify_enumerations: bool,
    pub pointer_width: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            objectify_enumerations: true,
            pointer_width: 8,
        }
    }
}

/// ADST_* primitive type tags (subset used by the engine's primitive decode table).
mod ads_data_type_tag {
    pub const VOID: u32 = 0;
    pub const INT16: u32 = 2;
    pub const INT32: u32 = 3;
    pub const REAL32: u32 = 4;
    pub const REAL64: u32 = 5;
    pub const INT8: u32 = 16;
    pub const UINT8: u32 = 17;
    pub const UINT16: u32 = 18;
    pub const UINT32: u32 = 19;
    pub const INT64: u32 = 20;
    pub const UINT64: u32 = 21;
    pub const STRING: u32 = 30;
    pub const WSTRING: u32 = 31;
    pub const BIT: u32 = 33;
    pub const BIGTYPE: u32 = 65;
}

/// Decodes `bytes` according to `node`, resolving cross-references (sub-items'
/// own nested types are already inlined by the cache parser) via `cache`.
pub fn decode(node: &AdsDataType, bytes: &[u8], cache: &SymbolCache, opts: EngineOptions) -> Result<PlcValue> {
    if bytes.len() < node.size as usize {
        return Err(ClientError::validation(format!(
            "buffer too small for `{}`: need {} bytes, got {}",
            node.name,
            node.size,
            bytes.len()
        )));
    }

    if node.array_dimension() > 0 {
        return decode_array(node, bytes, cache, opts);
    }

    if !node.enum_infos.is_empty() {
        let raw = decode_integer_as_i64(node, bytes)?;
        return Ok(enum_value(node, raw, opts));
    }

    if node.is_pointer_like() || node.is_interface_like(opts.pointer_width) {
        return Ok(PlcValue::Pointer(decode_pointer(bytes, node.size as usize)));
    }

    if !node.sub_items.is_empty() {
        return decode_struct(node, bytes, cache, opts);
    }

    decode_primitive(node, bytes)
}

/// Decodes one dimension at a time: the leftmost `array_info` entry is the
/// outermost dimension, so each outer index yields a nested `PlcValue::Array`
/// built from the remaining dimensions rather than one flattened sequence.
fn decode_array(node: &AdsDataType, bytes: &[u8], cache: &SymbolCache, opts: EngineOptions) -> Result<PlcValue> {
    let (outer, rest) = node
        .array_info
        .split_first()
        .expect("decode_array is only called when array_dimension() > 0");
    let outer_len = outer.length as u64;
    let element_size = if outer_len == 0 { 0 } else { node.size as u64 / outer_len } as usize;

    let mut element = node.clone();
    element.array_info = rest.to_vec();
    element.size = element_size as u32;

    let mut values = Vec::with_capacity(outer_len as usize);
    let mut offset = 0usize;
    for _ in 0..outer_len {
        let slice = &bytes[offset..offset + element_size];
        values.push(decode(&element, slice, cache, opts)?);
        offset += element_size;
    }
    Ok(PlcValue::Array(values))
}

fn decode_struct(node: &AdsDataType, bytes: &[u8], cache: &SymbolCache, opts: EngineOptions) -> Result<PlcValue> {
    let mut out = IndexMap::with_capacity(node.sub_items.len());
    for member in &node.sub_items {
        let value = if node.is_union() || member.is_bit_values() {
            decode_member_in_place(member, bytes)?
        } else {
            let start = member.offset as usize;
            let end = start + member.size as usize;
            if end > bytes.len() {
                return Err(ClientError::validation(format!(
                    "member `{}` extends past buffer ({} > {})",
                    member.name,
                    end,
                    bytes.len()
                )));
            }
            decode(member, &bytes[start..end], cache, opts)?
        };
        out.insert(member.name.clone(), value);
    }
    Ok(PlcValue::Struct(out))
}

/// Decodes a member whose offset is measured from the start of the containing
/// struct's buffer rather than being pre-sliced — used for union members
/// (offset 0, shared bytes) and bit-field members (bit offset within a byte).
fn decode_member_in_place(member: &AdsDataType, container: &[u8]) -> Result<PlcValue> {
    if member.is_bit_values() {
        let byte_index = (member.offset / 8) as usize;
        let bit = (member.offset % 8) as u8;
        let byte = *container.get(byte_index).ok_or_else(|| {
            ClientError::validation(format!("bit-field member `{}` out of range", member.name))
        })?;
        let value = read_bit(byte, bit);
        return Ok(PlcValue::Primitive(PlcPrimitive::Bool(value)));
    }
    let start = member.offset as usize;
    let end = start + member.size as usize;
    let slice = container
        .get(start..end)
        .ok_or_else(|| ClientError::validation(format!("member `{}` out of range", member.name)))?;
    decode_primitive(member, slice)
}

/// Reads bit `b` of `byte` (§4.1's bit codec: `(byte >> b) & 1`).
pub fn read_bit(byte: u8, b: u8) -> bool {
    (byte >> b) & 1 == 1
}

/// Read-modify-writes bit `b` of `byte` without touching any other bit.
pub fn write_bit(byte: &mut u8, b: u8, value: bool) {
    if value {
        *byte |= 1 << b;
    } else {
        *byte &= !(1 << b);
    }
}

fn decode_pointer(bytes: &[u8], size: usize) -> u64 {
    let mut buf = [0u8; 8];
    let n = size.min(8);
    buf[..n].copy_from_slice(&bytes[..n]);
    u64::from_le_bytes(buf)
}

fn decode_integer_as_i64(node: &AdsDataType, bytes: &[u8]) -> Result<i64> {
    Ok(match node.ads_data_type {
        ads_data_type_tag::INT8 => bytes[0] as i8 as i64,
        ads_data_type_tag::UINT8 => bytes[0] as i64,
        ads_data_type_tag::INT16 => i16::from_le_bytes([bytes[0], bytes[1]]) as i64,
        ads_data_type_tag::UINT16 => u16::from_le_bytes([bytes[0], bytes[1]]) as i64,
        ads_data_type_tag::INT32 => i32::from_le_bytes(bytes[..4].try_into().unwrap()) as i64,
        ads_data_type_tag::UINT32 => u32::from_le_bytes(bytes[..4].try_into().unwrap()) as i64,
        ads_data_type_tag::INT64 => i64::from_le_bytes(bytes[..8].try_into().unwrap()),
        ads_data_type_tag::UINT64 => u64::from_le_bytes(bytes[..8].try_into().unwrap()) as i64,
        other => {
            return Err(ClientError::validation(format!(
                "enum base type tag {other} is not an integer primitive"
            )));
        }
    })
}

fn enum_value(node: &AdsDataType, raw: i64, opts: EngineOptions) -> PlcValue {
    if !opts.objectify_enumerations {
        return match node.ads_data_type {
            ads_data_type_tag::INT8 => PlcValue::Primitive(PlcPrimitive::SByte(raw as i8)),
            ads_data_type_tag::UINT8 => PlcValue::Primitive(PlcPrimitive::Byte(raw as u8)),
            ads_data_type_tag::INT16 => PlcValue::Primitive(PlcPrimitive::Int(raw as i16)),
            ads_data_type_tag::UINT32 => PlcValue::Primitive(PlcPrimitive::DWord(raw as u32)),
            _ => PlcValue::Primitive(PlcPrimitive::DInt(raw as i32)),
        };
    }
    let name = node
        .enum_infos
        .iter()
        .find(|info| info.value == raw)
        .map(|info| info.name.clone())
        .unwrap_or_default();
    PlcValue::Enum { name, value: raw }
}

fn decode_primitive(node: &AdsDataType, bytes: &[u8]) -> Result<PlcValue> {
    use ads_data_type_tag::*;
    let primitive = match node.ads_data_type {
        BIT => PlcPrimitive::Bool(bytes[0] != 0),
        INT8 => PlcPrimitive::SByte(bytes[0] as i8),
        UINT8 => PlcPrimitive::Byte(bytes[0]),
        INT16 => PlcPrimitive::Int(i16::from_le_bytes(bytes[..2].try_into().unwrap())),
        UINT16 => PlcPrimitive::Word(u16::from_le_bytes(bytes[..2].try_into().unwrap())),
        INT32 => PlcPrimitive::DInt(i32::from_le_bytes(bytes[..4].try_into().unwrap())),
        UINT32 => PlcPrimitive::DWord(u32::from_le_bytes(bytes[..4].try_into().unwrap())),
        INT64 => PlcPrimitive::LInt(i64::from_le_bytes(bytes[..8].try_into().unwrap())),
        UINT64 => PlcPrimitive::LWord(u64::from_le_bytes(bytes[..8].try_into().unwrap())),
        REAL32 => PlcPrimitive::Real(f32::from_le_bytes(bytes[..4].try_into().unwrap())),
        REAL64 => PlcPrimitive::LReal(f64::from_le_bytes(bytes[..8].try_into().unwrap())),
        STRING => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(nul_terminated(bytes));
            PlcPrimitive::String(decoded.into_owned())
        }
        WSTRING => {
            let units: Vec<u16> = nul_terminated_u16(bytes)
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect();
            PlcPrimitive::String(String::from_utf16_lossy(&units))
        }
        VOID | BIGTYPE => {
            return Err(ClientError::validation(format!(
                "node `{}` has no sub-items but is not a recognized primitive (tag {})",
                node.name, node.ads_data_type
            )));
        }
        other => {
            return Err(ClientError::validation(format!(
                "unrecognized primitive type tag {other} for `{}`",
                node.name
            )));
        }
    };
    Ok(PlcValue::Primitive(primitive))
}

fn nul_terminated(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

fn nul_terminated_u16(bytes: &[u8]) -> &[u8] {
    let pairs = bytes.chunks_exact(2);
    let mut end = bytes.len();
    for (i, pair) in pairs.enumerate() {
        if pair == [0, 0] {
            end = i * 2;
            break;
        }
    }
    &bytes[..end]
}

/// Encodes `value` back into `node.size` bytes. When `auto_fill` is set,
/// missing struct members are zero-filled; otherwise a missing member is an
/// error carrying the member path.
pub fn encode(value: &PlcValue, node: &AdsDataType, auto_fill: bool) -> Result<Vec<u8>> {
    let mut out = vec![0u8; node.size as usize];
    encode_into(value, node, auto_fill, &mut out, "")?;
    Ok(out)
}

fn encode_into(value: &PlcValue, node: &AdsDataType, auto_fill: bool, out: &mut [u8], path: &str) -> Result<()> {
    match value {
        PlcValue::Array(items) => {
            let (outer, rest) = node.array_info.split_first().ok_or_else(|| {
                ClientError::validation(format!("`{path}` is an array value but `{}` has no array dimensions", node.name))
            })?;
            let outer_len = outer.length as usize;
            if items.len() != outer_len {
                return Err(ClientError::validation(format!(
                    "`{path}` has {} elements but `{}` declares {outer_len}",
                    items.len(),
                    node.name
                )));
            }
            let element_size = if outer_len == 0 { 0 } else { node.size as usize / outer_len };
            let mut element = node.clone();
            element.array_info = rest.to_vec();
            element.size = element_size as u32;
            for (i, item) in items.iter().enumerate() {
                let start = i * element_size;
                encode_into(
                    item,
                    &element,
                    auto_fill,
                    &mut out[start..start + element_size],
                    &format!("{path}[{i}]"),
                )?;
            }
            Ok(())
        }
        PlcValue::Struct(fields) => {
            for member in &node.sub_items {
                let member_path = if path.is_empty() {
                    member.name.clone()
                } else {
                    format!("{path}.{}", member.name)
                };
                match fields.get(&member.name) {
                    Some(field_value) => {
                        if member.is_bit_values() {
                            let byte_index = (member.offset / 8) as usize;
                            let bit = (member.offset % 8) as u8;
                            let bool_value = matches!(
                                field_value,
                                PlcValue::Primitive(PlcPrimitive::Bool(true))
                            );
                            write_bit(&mut out[byte_index], bit, bool_value);
                        } else {
                            let start = member.offset as usize;
                            let end = start + member.size as usize;
                            encode_into(field_value, member, auto_fill, &mut out[start..end], &member_path)?;
                        }
                    }
                    None if auto_fill => {}
                    None => {
                        return Err(ClientError::validation(format!(
                            "missing member `{member_path}` and autoFill is not set"
                        )));
                    }
                }
            }
            Ok(())
        }
        PlcValue::Enum { value: raw, .. } => {
            encode_integer(*raw, node, out)
        }
        PlcValue::Pointer(addr) => {
            let bytes = addr.to_le_bytes();
            let n = out.len().min(8);
            out[..n].copy_from_slice(&bytes[..n]);
            Ok(())
        }
        PlcValue::Primitive(p) => encode_primitive(p, out),
    }
}

fn encode_integer(raw: i64, node: &AdsDataType, out: &mut [u8]) -> Result<()> {
    use ads_data_type_tag::*;
    match node.ads_data_type {
        INT8 | UINT8 => out[0] = raw as u8,
        INT16 | UINT16 => out[..2].copy_from_slice(&(raw as u16).to_le_bytes()),
        INT32 | UINT32 => out[..4].copy_from_slice(&(raw as u32).to_le_bytes()),
        INT64 | UINT64 => out[..8].copy_from_slice(&(raw as u64).to_le_bytes()),
        other => {
            return Err(ClientError::validation(format!(
                "enum base type tag {other} is not an integer primitive"
            )));
        }
    }
    Ok(())
}

fn encode_primitive(value: &PlcPrimitive, out: &mut [u8]) -> Result<()> {
    match value {
        PlcPrimitive::Bool(v) => out[0] = *v as u8,
        PlcPrimitive::Byte(v) => out[0] = *v,
        PlcPrimitive::SByte(v) => out[0] = *v as u8,
        PlcPrimitive::Word(v) => out[..2].copy_from_slice(&v.to_le_bytes()),
        PlcPrimitive::Int(v) => out[..2].copy_from_slice(&v.to_le_bytes()),
        PlcPrimitive::DWord(v) => out[..4].copy_from_slice(&v.to_le_bytes()),
        PlcPrimitive::DInt(v) => out[..4].copy_from_slice(&v.to_le_bytes()),
        PlcPrimitive::LWord(v) => out[..8].copy_from_slice(&v.to_le_bytes()),
        PlcPrimitive::LInt(v) => out[..8].copy_from_slice(&v.to_le_bytes()),
        PlcPrimitive::Real(v) => out[..4].copy_from_slice(&v.to_le_bytes()),
        PlcPrimitive::LReal(v) => out[..8].copy_from_slice(&v.to_le_bytes()),
        PlcPrimitive::String(s) => {
            let (encoded, _, _) = encoding_rs::WINDOWS_1252.encode(s);
            let n = encoded.len().min(out.len().saturating_sub(1));
            out[..n].copy_from_slice(&encoded[..n]);
            out[n] = 0;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{ArrayInfo, EnumInfo};

    fn int_node(name: &str) -> AdsDataType {
        AdsDataType {
            version: 1,
            size: 2,
            offset: 0,
            ads_data_type: ads_data_type_tag::INT16,
            flags: Default::default(),
            array_info: Vec::new(),
            name: name.to_string(),
            type_name: "INT".to_string(),
            comment: String::new(),
            sub_items: Vec::new(),
            type_guid: None,
            enum_infos: Vec::new(),
            rpc_methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    #[test]
    fn decodes_int16_primitive() {
        let cache = SymbolCache::new();
        let node = int_node("");
        let value = decode(&node, &[0xFF, 0x7F], &cache, EngineOptions::default()).unwrap();
        assert_eq!(value, PlcValue::Primitive(PlcPrimitive::Int(32767)));
    }

    #[test]
    fn primitive_roundtrips_through_encode() {
        let node = int_node("");
        let cache = SymbolCache::new();
        let original = [0xFF, 0x7F];
        let value = decode(&node, &original, &cache, EngineOptions::default()).unwrap();
        let encoded = encode(&value, &node, false).unwrap();
        assert_eq!(encoded, original);
    }

    #[test]
    fn objectifies_enum_member() {
        let mut node = int_node("");
        node.enum_infos.push(EnumInfo { name: "Running".to_string(), value: 100 });
        let cache = SymbolCache::new();
        let value = decode(&node, &100i16.to_le_bytes(), &cache, EngineOptions::default()).unwrap();
        assert_eq!(
            value,
            PlcValue::Enum { name: "Running".to_string(), value: 100 }
        );
    }

    #[test]
    fn raw_enum_when_objectify_disabled() {
        let mut node = int_node("");
        node.enum_infos.push(EnumInfo { name: "Running".to_string(), value: 100 });
        let cache = SymbolCache::new();
        let opts = EngineOptions { objectify_enumerations: false, ..Default::default() };
        let value = decode(&node, &100i16.to_le_bytes(), &cache, opts).unwrap();
        assert_eq!(value, PlcValue::Primitive(PlcPrimitive::Int(100)));
    }

    #[test]
    fn decodes_array_of_ints() {
        let mut node = int_node("");
        node.array_info.push(ArrayInfo { start: 0, length: 3 });
        node.size = 6;
        let cache = SymbolCache::new();
        let bytes = [1, 0, 2, 0, 3, 0];
        let value = decode(&node, &bytes, &cache, EngineOptions::default()).unwrap();
        match value {
            PlcValue::Array(items) => assert_eq!(items.len(), 3),
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn decodes_nested_two_dimensional_array() {
        // ARRAY[0..1, 0..2] OF INT: 2 outer rows of 3 inner INTs each.
        let mut node = int_node("");
        node.array_info.push(ArrayInfo { start: 0, length: 2 });
        node.array_info.push(ArrayInfo { start: 0, length: 3 });
        node.size = 12;
        let cache = SymbolCache::new();
        let bytes: Vec<u8> = (1i16..=6).flat_map(|v| v.to_le_bytes()).collect();
        let value = decode(&node, &bytes, &cache, EngineOptions::default()).unwrap();
        match value {
            PlcValue::Array(rows) => {
                assert_eq!(rows.len(), 2);
                for row in &rows {
                    match row {
                        PlcValue::Array(cols) => assert_eq!(cols.len(), 3),
                        other => panic!("expected nested array, got {other:?}"),
                    }
                }
                assert_eq!(
                    rows[0],
                    PlcValue::Array(vec![
                        PlcValue::Primitive(PlcPrimitive::Int(1)),
                        PlcValue::Primitive(PlcPrimitive::Int(2)),
                        PlcValue::Primitive(PlcPrimitive::Int(3)),
                    ])
                );
                assert_eq!(
                    rows[1],
                    PlcValue::Array(vec![
                        PlcValue::Primitive(PlcPrimitive::Int(4)),
                        PlcValue::Primitive(PlcPrimitive::Int(5)),
                        PlcValue::Primitive(PlcPrimitive::Int(6)),
                    ])
                );
            }
            other => panic!("expected array, got {other:?}"),
        }
        let encoded = encode(&value, &node, false).unwrap();
        assert_eq!(encoded, bytes);
    }

    #[test]
    fn bit_read_write_round_trip() {
        let mut byte = 0b0000_0000u8;
        write_bit(&mut byte, 3, true);
        assert!(read_bit(byte, 3));
        assert!(!read_bit(byte, 2));
        write_bit(&mut byte, 3, false);
        assert_eq!(byte, 0);
    }

    #[test]
    fn struct_member_missing_without_autofill_is_an_error() {
        let mut struct_node = int_node("Outer");
        struct_node.size = 2;
        struct_node.ads_data_type = ads_data_type_tag::VOID;
        struct_node.sub_items.push(int_node("Field"));
        let fields = IndexMap::new();
        let err = encode(&PlcValue::Struct(fields), &struct_node, false).unwrap_err();
        assert!(err.to_string().contains("Field"));
    }

    #[test]
    fn struct_member_missing_with_autofill_is_zero() {
        let mut struct_node = int_node("Outer");
        struct_node.size = 2;
        struct_node.ads_data_type = ads_data_type_tag::VOID;
        struct_node.sub_items.push(int_node("Field"));
        let fields = IndexMap::new();
        let bytes = encode(&PlcValue::Struct(fields), &struct_node, true).unwrap();
        assert_eq!(bytes, vec![0, 0]);
    }
}
