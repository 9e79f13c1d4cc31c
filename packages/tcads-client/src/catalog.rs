//! Symbol/data-type catalog fetch and wire parsing (C6's network half).
//!
//! [`crate::symbols`] holds the cache's data model; this module fills it by
//! reading `SymbolUploadInfo`/`SymbolUpload`/`SymbolDataTypeUpload` in bulk,
//! or `SymbolInfoByNameEx`/`DataDataTypeInfoByNameEx` for a single name, and
//! decoding the binary `AdsSymbolEntry`/`AdsDatatypeEntry` catalog format
//! TwinCAT publishes for those commands.

use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::symbols::{ArrayInfo, Attribute, DataTypeFlags, AdsDataType, AdsSymbol, UploadInfo};
use tcads_core::ads::{AdsCommand, IndexGroup};
use tcads_core::ams::AmsAddr;
use tcads_core::protocol::index_groups;
use tcads_core::protocol::{AdsReadRequest, AdsReadResponse, AdsReadWriteRequest};

const UPLOAD_INFO_LENGTH: u32 = 24;

pub async fn read_upload_info(connection: &Connection, target: AmsAddr) -> Result<UploadInfo> {
    let request = AdsReadRequest::new(index_groups::SYM_UPLOADINFO, 0, UPLOAD_INFO_LENGTH);
    let mut payload = Vec::new();
    request.write_to(&mut payload)?;
    let response = connection.send(AdsCommand::AdsRead, target, payload).await?;
    let parsed = AdsReadResponse::read_from(&mut &response.payload[..])?;
    if !parsed.result().is_success() {
        return Err(ClientError::ads(parsed.result()));
    }
    let data = parsed.data();
    if data.len() < UPLOAD_INFO_LENGTH as usize {
        return Err(ClientError::protocol("upload-info response shorter than 24 bytes"));
    }
    let mut cursor = Cursor::new(data);
    Ok(UploadInfo {
        symbol_count: cursor.u32()?,
        symbol_length: cursor.u32()?,
        data_type_count: cursor.u32()?,
        data_type_length: cursor.u32()?,
        extra_count: cursor.u32()?,
        extra_length: cursor.u32()?,
    })
}

pub async fn read_all_symbols(connection: &Connection, target: AmsAddr, info: &UploadInfo) -> Result<Vec<AdsSymbol>> {
    let bytes = read_bulk(connection, target, index_groups::SYM_UPLOAD, info.symbol_length).await?;
    parse_symbols(&bytes)
}

pub async fn read_all_data_types(connection: &Connection, target: AmsAddr, info: &UploadInfo) -> Result<Vec<AdsDataType>> {
    let bytes = read_bulk(connection, target, index_groups::SYM_DT_UPLOAD, info.data_type_length).await?;
    parse_data_types(&bytes)
}

async fn read_bulk(connection: &Connection, target: AmsAddr, index_group: IndexGroup, length: u32) -> Result<Vec<u8>> {
    if length == 0 {
        return Ok(Vec::new());
    }
    let request = AdsReadRequest::new(index_group, 0, length);
    let mut payload = Vec::new();
    request.write_to(&mut payload)?;
    let response = connection.send(AdsCommand::AdsRead, target, payload).await?;
    let parsed = AdsReadResponse::read_from(&mut &response.payload[..])?;
    if !parsed.result().is_success() {
        return Err(ClientError::ads(parsed.result()));
    }
    Ok(parsed.data().to_vec())
}

/// Fetches and parses a single symbol's metadata by name via `SymbolInfoByNameEx`.
pub async fn read_symbol_by_name(connection: &Connection, target: AmsAddr, path: &str) -> Result<AdsSymbol> {
    let (encoded, _, had_errors) = encoding_rs::WINDOWS_1252.encode(path);
    if had_errors {
        return Err(ClientError::validation(format!(
            "path '{path}' is not representable in Windows-1252"
        )));
    }
    let request = AdsReadWriteRequest::new(index_groups::SYM_INFOBYNAMEEX, 0, 4096, encoded.into_owned());
    let mut payload = Vec::new();
    request.write_to(&mut payload)?;
    let response = connection.send(AdsCommand::AdsReadWrite, target, payload).await?;
    let parsed = AdsReadResponse::read_from(&mut &response.payload[..])?;
    if !parsed.result().is_success() {
        return Err(ClientError::ads(parsed.result()));
    }
    let mut cursor = Cursor::new(parsed.data());
    parse_symbol_entry(&mut cursor)
}

// There is no dedicated by-name lookup for a single data type on the wire;
// unlike `SymbolInfoByNameEx`, TwinCAT only exposes data types through the
// bulk `SymbolDataTypeUpload`. `client.rs` serves single-name lookups out of
// the cache `read_all_data_types` populates, fetching the whole catalog on
// first use rather than guessing at a nonexistent per-name command.

pub fn parse_symbols(bytes: &[u8]) -> Result<Vec<AdsSymbol>> {
    let mut cursor = Cursor::new(bytes);
    let mut symbols = Vec::new();
    while cursor.remaining() >= 4 {
        symbols.push(parse_symbol_entry(&mut cursor)?);
    }
    Ok(symbols)
}

pub fn parse_data_types(bytes: &[u8]) -> Result<Vec<AdsDataType>> {
    let mut cursor = Cursor::new(bytes);
    let mut data_types = Vec::new();
    while cursor.remaining() >= 4 {
        data_types.push(parse_data_type_entry(&mut cursor)?);
    }
    Ok(data_types)
}

fn parse_symbol_entry(cursor: &mut Cursor) -> Result<AdsSymbol> {
    let entry_start = cursor.pos;
    let entry_length = cursor.u32()? as usize;
    let index_group = cursor.u32()?;
    let index_offset = cursor.u32()?;
    let size = cursor.u32()?;
    let ads_data_type = cursor.u32()?;
    let flags = DataTypeFlags(cursor.u32()?);
    let name_len = cursor.u16()? as usize;
    let type_len = cursor.u16()? as usize;
    let comment_len = cursor.u16()? as usize;
    let array_dim = cursor.u16()? as usize;
    let name = cursor.nul_string(name_len)?;
    let type_name = cursor.nul_string(type_len)?;
    let comment = cursor.nul_string(comment_len)?;

    let mut array_info = Vec::with_capacity(array_dim);
    for _ in 0..array_dim {
        let start = cursor.i32()?;
        let length = cursor.u32()?;
        array_info.push(ArrayInfo { start, length });
    }

    let type_guid = if flags.contains(DataTypeFlags::TYPE_GUID) {
        let raw = cursor.take(16)?;
        Some(raw.try_into().unwrap())
    } else {
        None
    };

    let attributes = if flags.contains(DataTypeFlags::ATTRIBUTES) {
        let count = cursor.u16()? as usize;
        let mut attrs = Vec::with_capacity(count);
        for _ in 0..count {
            let attr_name_len = cursor.take(1)?[0] as usize;
            let attr_value_len = cursor.take(1)?[0] as usize;
            let attr_name = cursor.nul_string(attr_name_len)?;
            let attr_value = cursor.nul_string(attr_value_len)?;
            attrs.push(Attribute { name: attr_name, value: attr_value });
        }
        attrs
    } else {
        Vec::new()
    };

    cursor.seek_to(entry_start, entry_length)?;
    Ok(AdsSymbol {
        index_group,
        index_offset,
        size,
        ads_data_type,
        flags,
        array_info,
        name,
        type_name,
        comment,
        type_guid,
        attributes,
    })
}

fn parse_data_type_entry(cursor: &mut Cursor) -> Result<AdsDataType> {
    let entry_start = cursor.pos;
    let entry_length = cursor.u32()? as usize;
    let version = cursor.u32()?;
    let _hash_value = cursor.u32()?;
    let _type_hash_value = cursor.u32()?;
    let size = cursor.u32()?;
    let offset = cursor.u32()?;
    let ads_data_type = cursor.u32()?;
    let flags = DataTypeFlags(cursor.u32()?);
    let name_len = cursor.u16()? as usize;
    let type_len = cursor.u16()? as usize;
    let comment_len = cursor.u16()? as usize;
    let array_dim = cursor.u16()? as usize;
    let sub_item_count = cursor.u16()? as usize;
    let name = cursor.nul_string(name_len)?;
    let type_name = cursor.nul_string(type_len)?;
    let comment = cursor.nul_string(comment_len)?;

    let mut array_info = Vec::with_capacity(array_dim);
    for _ in 0..array_dim {
        let start = cursor.i32()?;
        let length = cursor.u32()?;
        array_info.push(ArrayInfo { start, length });
    }

    let mut sub_items = Vec::with_capacity(sub_item_count);
    for _ in 0..sub_item_count {
        sub_items.push(parse_data_type_entry(cursor)?);
    }

    let type_guid = if flags.contains(DataTypeFlags::TYPE_GUID) {
        let raw = cursor.take(16)?;
        Some(raw.try_into().unwrap())
    } else {
        None
    };

    let enum_infos = if flags.contains(DataTypeFlags::ENUM_INFOS) {
        let count = cursor.u16()? as usize;
        let mut infos = Vec::with_capacity(count);
        for _ in 0..count {
            let entry_name_len = cursor.u16()? as usize;
            let raw_value = cursor.take(size as usize)?;
            let value = integer_from_le_bytes(raw_value);
            let entry_name = cursor.nul_string(entry_name_len)?;
            infos.push(crate::symbols::EnumInfo { name: entry_name, value });
        }
        infos
    } else {
        Vec::new()
    };

    let attributes = if flags.contains(DataTypeFlags::ATTRIBUTES) {
        let count = cursor.u16()? as usize;
        let mut attrs = Vec::with_capacity(count);
        for _ in 0..count {
            let attr_name_len = cursor.take(1)?[0] as usize;
            let attr_value_len = cursor.take(1)?[0] as usize;
            let attr_name = cursor.nul_string(attr_name_len)?;
            let attr_value = cursor.nul_string(attr_value_len)?;
            attrs.push(Attribute { name: attr_name, value: attr_value });
        }
        attrs
    } else {
        Vec::new()
    };

    cursor.seek_to(entry_start, entry_length)?;

    Ok(AdsDataType {
        version,
        size,
        offset,
        ads_data_type,
        flags,
        array_info,
        name,
        type_name,
        comment,
        sub_items,
        type_guid,
        enum_infos,
        rpc_methods: Vec::new(),
        attributes,
    })
}

fn integer_from_le_bytes(bytes: &[u8]) -> i64 {
    let mut buf = [0u8; 8];
    let n = bytes.len().min(8);
    buf[..n].copy_from_slice(&bytes[..n]);
    i64::from_le_bytes(buf)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(ClientError::protocol("catalog entry truncated"));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    /// Reads `len` bytes plus the null terminator TwinCAT always appends to
    /// catalog strings, decoding the `len` content bytes as Windows-1252.
    fn nul_string(&mut self, len: usize) -> Result<String> {
        let raw = self.take(len + 1)?;
        let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&raw[..len]);
        Ok(decoded.into_owned())
    }

    /// Catalog entries carry their own `entryLength`; anything this parser
    /// doesn't understand (future TwinCAT versions may add trailing fields)
    /// is skipped rather than rejected, by seeking to the entry's declared end.
    fn seek_to(&mut self, entry_start: usize, entry_length: usize) -> Result<()> {
        let end = entry_start + entry_length;
        if end < self.pos || end > self.bytes.len() {
            return Err(ClientError::protocol("catalog entry length out of range"));
        }
        self.pos = end;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol_entry_bytes(name: &str, type_name: &str, comment: &str) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&0x4020u32.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());
        body.extend_from_slice(&2u32.to_le_bytes());
        body.extend_from_slice(&2u32.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());
        body.extend_from_slice(&(name.len() as u16).to_le_bytes());
        body.extend_from_slice(&(type_name.len() as u16).to_le_bytes());
        body.extend_from_slice(&(comment.len() as u16).to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(name.as_bytes());
        body.push(0);
        body.extend_from_slice(type_name.as_bytes());
        body.push(0);
        body.extend_from_slice(comment.as_bytes());
        body.push(0);
        let entry_length = (body.len() + 4) as u32;
        let mut entry = entry_length.to_le_bytes().to_vec();
        entry.extend_from_slice(&body);
        entry
    }

    #[test]
    fn parses_single_symbol_entry() {
        let bytes = symbol_entry_bytes("GVL.Counter", "INT", "a counter");
        let symbols = parse_symbols(&bytes).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "GVL.Counter");
        assert_eq!(symbols[0].type_name, "INT");
        assert_eq!(symbols[0].index_group, 0x4020);
        assert_eq!(symbols[0].size, 2);
    }

    #[test]
    fn parses_back_to_back_symbol_entries() {
        let mut bytes = symbol_entry_bytes("GVL.A", "INT", "");
        bytes.extend(symbol_entry_bytes("GVL.B", "BOOL", ""));
        let symbols = parse_symbols(&bytes).unwrap();
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[1].name, "GVL.B");
    }

    #[test]
    fn parses_symbol_entry_array_dimensions() {
        let mut body = Vec::new();
        body.extend_from_slice(&0x4020u32.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());
        body.extend_from_slice(&6u32.to_le_bytes());
        body.extend_from_slice(&2u32.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());
        let name = "GVL.Arr";
        let type_name = "INT";
        body.extend_from_slice(&(name.len() as u16).to_le_bytes());
        body.extend_from_slice(&(type_name.len() as u16).to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&1u16.to_le_bytes());
        body.extend_from_slice(name.as_bytes());
        body.push(0);
        body.extend_from_slice(type_name.as_bytes());
        body.push(0);
        body.push(0);
        body.extend_from_slice(&0i32.to_le_bytes());
        body.extend_from_slice(&3u32.to_le_bytes());
        let entry_length = (body.len() + 4) as u32;
        let mut bytes = entry_length.to_le_bytes().to_vec();
        bytes.extend_from_slice(&body);

        let symbols = parse_symbols(&bytes).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].array_info, vec![ArrayInfo { start: 0, length: 3 }]);
    }

    #[test]
    fn truncated_entry_is_a_protocol_error() {
        let err = parse_symbols(&[1, 0, 0, 0]).unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::Protocol(_)));
    }
}
