//! Variable-handle & sum-command layer (C8).
//!
//! Handle creation/release plus the multi-operation (sum-command) codecs that
//! batch a list of independent sub-commands into one round trip. Every
//! function here takes a [`Connection`] and a target address rather than
//! holding one itself — the client (C10) owns the connection and calls
//! through this module as a stateless set of helpers.

use crate::connection::Connection;
use crate::error::{ClientError, Result};
use encoding_rs::WINDOWS_1252;
use tcads_core::ads::{AdsCommand, AdsReturnCode, IndexGroup, IndexOffset};
use tcads_core::ams::AmsAddr;
use tcads_core::protocol::index_groups;
use tcads_core::protocol::{AdsReadResponse, AdsReadWriteRequest, AdsWriteRequest, AdsWriteResponse};

/// A sub-command for [`read_raw_multi`].
#[derive(Debug, Clone, Copy)]
pub struct ReadItem {
    pub index_group: IndexGroup,
    pub index_offset: IndexOffset,
    pub length: u32,
}

/// A sub-command for [`write_raw_multi`].
#[derive(Debug, Clone)]
pub struct WriteItem {
    pub index_group: IndexGroup,
    pub index_offset: IndexOffset,
    pub data: Vec<u8>,
}

/// A sub-command for [`read_write_raw_multi`].
#[derive(Debug, Clone)]
pub struct ReadWriteItem {
    pub index_group: IndexGroup,
    pub index_offset: IndexOffset,
    pub read_length: u32,
    pub write_data: Vec<u8>,
}

/// Result of one sub-command: the per-item ADS return code independent of
/// the outer command's own (always-OK, if the round trip succeeded) status.
pub type ItemResult<T> = std::result::Result<T, AdsReturnCode>;

fn encode_path(path: &str) -> Result<Vec<u8>> {
    let (encoded, _, had_errors) = WINDOWS_1252.encode(path);
    if had_errors {
        return Err(ClientError::validation(format!(
            "path '{path}' is not representable in Windows-1252"
        )));
    }
    Ok(encoded.into_owned())
}

/// Resolves a symbol path to a variable handle via `ReadWrite` against
/// `SymbolHandleByName`.
pub async fn create_variable_handle(connection: &Connection, target: AmsAddr, path: &str) -> Result<u32> {
    let write_data = encode_path(path)?;
    let request = AdsReadWriteRequest::new(index_groups::SYM_HNDBYNAME, 0, 4, write_data);
    let mut payload = Vec::new();
    request.write_to(&mut payload)?;
    let response = connection.send(AdsCommand::AdsReadWrite, target, payload).await?;
    let parsed = AdsReadResponse::read_from(&mut &response.payload[..])?;
    if !parsed.result().is_success() {
        return Err(ClientError::ads(parsed.result()));
    }
    read_handle(parsed.data())
}

/// Releases a variable handle via `Write` against `SymbolReleaseHandle`.
pub async fn delete_variable_handle(connection: &Connection, target: AmsAddr, handle: u32) -> Result<()> {
    let request = AdsWriteRequest::new(index_groups::SYM_RELEASEHND, 0, handle.to_le_bytes().to_vec());
    let mut payload = Vec::new();
    request.write_to(&mut payload)?;
    let response = connection.send(AdsCommand::AdsWrite, target, payload).await?;
    let parsed = AdsWriteResponse::read_from(&mut &response.payload[..])?;
    if !parsed.result().is_success() {
        return Err(ClientError::ads(parsed.result()));
    }
    Ok(())
}

fn read_handle(data: &[u8]) -> Result<u32> {
    if data.len() < 4 {
        return Err(ClientError::protocol("handle response shorter than 4 bytes"));
    }
    Ok(u32::from_le_bytes(data[0..4].try_into().unwrap()))
}

/// Batches N reads into a single `SumCommandRead`. Each item's result is
/// independent; a bad item never fails the others.
pub async fn read_raw_multi(
    connection: &Connection,
    target: AmsAddr,
    items: &[ReadItem],
) -> Result<Vec<ItemResult<Vec<u8>>>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let mut write_data = Vec::with_capacity(items.len() * 12);
    for item in items {
        write_data.extend_from_slice(&item.index_group.to_le_bytes());
        write_data.extend_from_slice(&item.index_offset.to_le_bytes());
        write_data.extend_from_slice(&item.length.to_le_bytes());
    }
    let read_length = items.len() as u32 * 4 + items.iter().map(|i| i.length).sum::<u32>();
    let request = AdsReadWriteRequest::new(index_groups::SUMUP_READ, items.len() as u32, read_length, write_data);
    let mut payload = Vec::new();
    request.write_to(&mut payload)?;
    let response = connection.send(AdsCommand::AdsReadWrite, target, payload).await?;
    let parsed = AdsReadResponse::read_from(&mut &response.payload[..])?;
    if !parsed.result().is_success() {
        return Err(ClientError::ads(parsed.result()));
    }
    let data = parsed.data();
    let mut cursor = items.len() * 4;
    if cursor > data.len() {
        return Err(ClientError::protocol("sum-read reply truncated before error codes"));
    }
    let mut results = Vec::with_capacity(items.len());
    let mut offset = 0usize;
    for item in items {
        let code = AdsReturnCode::from_bytes(data[offset..offset + 4].try_into().unwrap());
        offset += 4;
        let len = item.length as usize;
        if cursor + len > data.len() {
            return Err(ClientError::protocol("sum-read reply truncated before data blob"));
        }
        let blob = data[cursor..cursor + len].to_vec();
        cursor += len;
        results.push(if code.is_success() { Ok(blob) } else { Err(code) });
    }
    Ok(results)
}

/// Batches N writes into a single `SumCommandWrite`.
pub async fn write_raw_multi(
    connection: &Connection,
    target: AmsAddr,
    items: &[WriteItem],
) -> Result<Vec<ItemResult<()>>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let mut write_data = Vec::with_capacity(items.len() * 12);
    for item in items {
        write_data.extend_from_slice(&item.index_group.to_le_bytes());
        write_data.extend_from_slice(&item.index_offset.to_le_bytes());
        write_data.extend_from_slice(&(item.data.len() as u32).to_le_bytes());
    }
    for item in items {
        write_data.extend_from_slice(&item.data);
    }
    let read_length = items.len() as u32 * 4;
    let request = AdsReadWriteRequest::new(index_groups::SUMUP_WRITE, items.len() as u32, read_length, write_data);
    let mut payload = Vec::new();
    request.write_to(&mut payload)?;
    let response = connection.send(AdsCommand::AdsReadWrite, target, payload).await?;
    let parsed = AdsReadResponse::read_from(&mut &response.payload[..])?;
    if !parsed.result().is_success() {
        return Err(ClientError::ads(parsed.result()));
    }
    let data = parsed.data();
    if data.len() < items.len() * 4 {
        return Err(ClientError::protocol("sum-write reply truncated"));
    }
    let mut results = Vec::with_capacity(items.len());
    for i in 0..items.len() {
        let code = AdsReturnCode::from_bytes(data[i * 4..i * 4 + 4].try_into().unwrap());
        results.push(if code.is_success() { Ok(()) } else { Err(code) });
    }
    Ok(results)
}

/// Batches N read-writes into a single `SumCommandReadWrite`.
pub async fn read_write_raw_multi(
    connection: &Connection,
    target: AmsAddr,
    items: &[ReadWriteItem],
) -> Result<Vec<ItemResult<Vec<u8>>>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let mut write_data = Vec::with_capacity(items.len() * 16);
    for item in items {
        write_data.extend_from_slice(&item.index_group.to_le_bytes());
        write_data.extend_from_slice(&item.index_offset.to_le_bytes());
        write_data.extend_from_slice(&item.read_length.to_le_bytes());
        write_data.extend_from_slice(&(item.write_data.len() as u32).to_le_bytes());
    }
    for item in items {
        write_data.extend_from_slice(&item.write_data);
    }
    let read_length = items.len() as u32 * 8 + items.iter().map(|i| i.read_length).sum::<u32>();
    let request = AdsReadWriteRequest::new(index_groups::SUMUP_READWRITE, items.len() as u32, read_length, write_data);
    let mut payload = Vec::new();
    request.write_to(&mut payload)?;
    let response = connection.send(AdsCommand::AdsReadWrite, target, payload).await?;
    let parsed = AdsReadResponse::read_from(&mut &response.payload[..])?;
    if !parsed.result().is_success() {
        return Err(ClientError::ads(parsed.result()));
    }
    let data = parsed.data();
    let mut headers = Vec::with_capacity(items.len());
    let mut cursor = 0usize;
    for _ in items {
        if cursor + 8 > data.len() {
            return Err(ClientError::protocol("sum-readwrite reply truncated before item header"));
        }
        let code = AdsReturnCode::from_bytes(data[cursor..cursor + 4].try_into().unwrap());
        let len = u32::from_le_bytes(data[cursor + 4..cursor + 8].try_into().unwrap()) as usize;
        headers.push((code, len));
        cursor += 8;
    }
    let mut results = Vec::with_capacity(items.len());
    for (code, len) in headers {
        if cursor + len > data.len() {
            return Err(ClientError::protocol("sum-readwrite reply truncated before data blob"));
        }
        let blob = data[cursor..cursor + len].to_vec();
        cursor += len;
        results.push(if code.is_success() { Ok(blob) } else { Err(code) });
    }
    Ok(results)
}

/// Batches N `createVariableHandle` calls into one `SumCommandReadWrite`.
pub async fn create_variable_handles_multi(
    connection: &Connection,
    target: AmsAddr,
    paths: &[&str],
) -> Result<Vec<ItemResult<u32>>> {
    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        items.push(ReadWriteItem {
            index_group: index_groups::SYM_HNDBYNAME,
            index_offset: 0,
            read_length: 4,
            write_data: encode_path(path)?,
        });
    }
    let results = read_write_raw_multi(connection, target, &items).await?;
    Ok(results
        .into_iter()
        .map(|r| r.and_then(|bytes| if bytes.len() >= 4 {
            Ok(u32::from_le_bytes(bytes[0..4].try_into().unwrap()))
        } else {
            Err(AdsReturnCode::AdsErrDeviceInvalidSize)
        }))
        .collect())
}

/// Batches N `deleteVariableHandle` calls into one `SumCommandWrite`.
pub async fn delete_variable_handles_multi(
    connection: &Connection,
    target: AmsAddr,
    handles: &[u32],
) -> Result<Vec<ItemResult<()>>> {
    let items: Vec<WriteItem> = handles
        .iter()
        .map(|h| WriteItem {
            index_group: index_groups::SYM_RELEASEHND,
            index_offset: 0,
            data: h.to_le_bytes().to_vec(),
        })
        .collect();
    write_raw_multi(connection, target, &items).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_path_rejects_non_cp1252_text() {
        let err = encode_path("日本語").unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::Validation(_)));
    }

    #[test]
    fn encode_path_accepts_latin1_path() {
        let bytes = encode_path("GVL.Café").unwrap();
        assert_eq!(bytes, WINDOWS_1252.encode("GVL.Café").0.into_owned());
    }

    #[test]
    fn read_handle_rejects_short_payload() {
        assert!(read_handle(&[1, 2, 3]).is_err());
    }

    #[test]
    fn read_handle_parses_little_endian_u32() {
        assert_eq!(read_handle(&[0x2A, 0, 0, 0]).unwrap(), 42);
    }
}
