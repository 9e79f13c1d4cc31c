//! Symbol and data-type catalog (C6): the PLC's variable/type metadata, fetched
//! either in bulk (`SymbolUpload`/`SymbolDataTypeUpload`) or on demand
//! (`SymbolInfoByNameEx`/`DataDataTypeInfoByNameEx`), and cached by lowercase key.

use std::collections::HashMap;
use tcads_core::ads::IndexGroup;

/// One dimension of an array-typed symbol or data-type member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayInfo {
    pub start: i32,
    pub length: u32,
}

/// A named `{name, value}` attribute attached to a symbol or data-type node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// One member of an enum's value table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumInfo {
    pub name: String,
    pub value: i64,
}

/// An RPC method descriptor attached to a function-block data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcMethod {
    pub name: String,
    pub return_type_name: String,
    pub return_size: u32,
    pub parameters: Vec<RpcParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcParameter {
    pub name: String,
    pub type_name: String,
    pub size: u32,
    pub is_output: bool,
}

/// Data-type flag bits as reported by `SymbolDataTypeUpload`/`DataDataTypeInfoByNameEx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataTypeFlags(pub u32);

impl DataTypeFlags {
    pub const DATATYPE: u32 = 0x0000_0001;
    pub const IGNORE_GET: u32 = 0x0000_0010;
    pub const IGNORE_SET: u32 = 0x0000_0020;
    pub const BIT_VALUES: u32 = 0x0000_0080;
    pub const UNION: u32 = 0x0000_0800;
    pub const PERSISTENT: u32 = 0x0000_1000;
    pub const TYPE_GUID: u32 = 0x0001_0000;
    pub const ATTRIBUTES: u32 = 0x0004_0000;
    pub const ENUM_INFOS: u32 = 0x0008_0000;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(&self, bit: u32) -> bool {
        self.0 & bit == bit
    }
}

/// Identifies a named PLC variable and the raw memory it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdsSymbol {
    pub index_group: IndexGroup,
    pub index_offset: u32,
    pub size: u32,
    pub ads_data_type: u32,
    pub flags: DataTypeFlags,
    pub array_info: Vec<ArrayInfo>,
    pub name: String,
    pub type_name: String,
    pub comment: String,
    pub type_guid: Option<[u8; 16]>,
    pub attributes: Vec<Attribute>,
}

impl AdsSymbol {
    /// True if the type name begins with a pointer/reference keyword (§9 open question a).
    pub fn is_pointer_like(&self) -> bool {
        type_name_is_pointer_like(&self.type_name)
    }
}

/// A node in the recursive tree describing structs, unions, arrays, enums,
/// aliases and bit-fields. The root of a named type has an empty `name`;
/// members have a `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdsDataType {
    pub version: u32,
    pub size: u32,
    pub offset: u32,
    pub ads_data_type: u32,
    pub flags: DataTypeFlags,
    pub array_info: Vec<ArrayInfo>,
    pub name: String,
    pub type_name: String,
    pub comment: String,
    pub sub_items: Vec<AdsDataType>,
    pub type_guid: Option<[u8; 16]>,
    pub enum_infos: Vec<EnumInfo>,
    pub rpc_methods: Vec<RpcMethod>,
    pub attributes: Vec<Attribute>,
}

impl AdsDataType {
    pub fn array_dimension(&self) -> usize {
        self.array_info.len()
    }

    pub fn is_union(&self) -> bool {
        self.flags.contains(DataTypeFlags::UNION)
    }

    pub fn is_bit_values(&self) -> bool {
        self.flags.contains(DataTypeFlags::BIT_VALUES)
    }

    pub fn is_pointer_like(&self) -> bool {
        type_name_is_pointer_like(&self.type_name)
    }

    /// True when this node's size equals pointer width, so it should be
    /// treated as an integer even for system-addressable types such as
    /// interface pointers (§9 open question b) — even if sub-items exist,
    /// since TwinCAT reports interface references with a (typically empty)
    /// sub-item list of their own.
    pub fn is_interface_like(&self, pointer_width: u32) -> bool {
        self.size == pointer_width
    }
}

fn type_name_is_pointer_like(type_name: &str) -> bool {
    let upper = type_name.trim_start();
    upper.starts_with("POINTER TO ")
        || upper.starts_with("REFERENCE TO ")
        || upper.starts_with("pointer to ")
        || upper.starts_with("reference to ")
}

/// Upload-info header (`SymbolUploadInfo`): sizes of the bulk catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadInfo {
    pub symbol_count: u32,
    pub symbol_length: u32,
    pub data_type_count: u32,
    pub data_type_length: u32,
    pub extra_count: u32,
    pub extra_length: u32,
}

/// Case-insensitive (keys stored lowercased) catalog of symbols and data types,
/// invalidated wholesale on a PLC symbol-version change.
#[derive(Debug, Default)]
pub struct SymbolCache {
    symbols: HashMap<String, AdsSymbol>,
    data_types: HashMap<String, AdsDataType>,
    symbols_fully_cached: bool,
    data_types_fully_cached: bool,
}

impl SymbolCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_symbol(&self, path: &str) -> Option<&AdsSymbol> {
        self.symbols.get(&path.to_ascii_lowercase())
    }

    pub fn insert_symbol(&mut self, symbol: AdsSymbol) {
        self.symbols.insert(symbol.name.to_ascii_lowercase(), symbol);
    }

    pub fn symbols(&self) -> impl Iterator<Item = &AdsSymbol> {
        self.symbols.values()
    }

    pub fn get_data_type(&self, name: &str) -> Option<&AdsDataType> {
        self.data_types.get(&name.to_ascii_lowercase())
    }

    pub fn insert_data_type(&mut self, data_type: AdsDataType) {
        self.data_types
            .insert(data_type.name.to_ascii_lowercase(), data_type);
    }

    pub fn data_types(&self) -> impl Iterator<Item = &AdsDataType> {
        self.data_types.values()
    }

    pub fn mark_symbols_fully_cached(&mut self) {
        self.symbols_fully_cached = true;
    }

    pub fn mark_data_types_fully_cached(&mut self) {
        self.data_types_fully_cached = true;
    }

    pub fn symbols_fully_cached(&self) -> bool {
        self.symbols_fully_cached
    }

    pub fn data_types_fully_cached(&self) -> bool {
        self.data_types_fully_cached
    }

    /// Clears both catalogs on a symbol-version change. The caller (C9) decides
    /// whether to refetch based on what `symbols_fully_cached`/`data_types_fully_cached`
    /// reported *before* this call.
    pub fn invalidate(&mut self) {
        self.symbols.clear();
        self.data_types.clear();
        self.symbols_fully_cached = false;
        self.data_types_fully_cached = false;
    }

    /// Resolves a type name through alias/pointer indirection to the underlying
    /// node, following pointer/reference prefixes by stripping the keyword and
    /// looking up the remainder. Returns `None` if any hop in the chain is unresolved.
    pub fn resolve_effective_type(&self, type_name: &str) -> Option<&AdsDataType> {
        let mut current = type_name.trim().to_string();
        for _ in 0..Self::MAX_ALIAS_HOPS {
            if type_name_is_pointer_like(&current) {
                let stripped = {
                    let after_to = current
                        .splitn(2, "TO ")
                        .nth(1)
                        .or_else(|| current.splitn(2, "to ").nth(1));
                    after_to.unwrap_or(current.as_str()).trim().to_string()
                };
                current = stripped;
                continue;
            }
            return self.get_data_type(&current);
        }
        None
    }

    const MAX_ALIAS_HOPS: usize = 16;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_symbol(name: &str) -> AdsSymbol {
        AdsSymbol {
            index_group: 0x4020,
            index_offset: 0,
            size: 2,
            ads_data_type: 2,
            flags: DataTypeFlags::empty(),
            array_info: Vec::new(),
            name: name.to_string(),
            type_name: "INT".to_string(),
            comment: String::new(),
            type_guid: None,
            attributes: Vec::new(),
        }
    }

    #[test]
    fn symbol_lookup_is_case_insensitive() {
        let mut cache = SymbolCache::new();
        cache.insert_symbol(sample_symbol("GVL_Read.StandardTypes.INT_"));
        assert!(cache.get_symbol("gvl_read.standardtypes.int_").is_some());
    }

    #[test]
    fn invalidate_clears_both_catalogs_and_fully_cached_flags() {
        let mut cache = SymbolCache::new();
        cache.insert_symbol(sample_symbol("X"));
        cache.mark_symbols_fully_cached();
        cache.invalidate();
        assert!(cache.get_symbol("X").is_none());
        assert!(!cache.symbols_fully_cached());
    }

    #[test]
    fn pointer_like_type_name_detected() {
        let mut symbol = sample_symbol("P");
        symbol.type_name = "POINTER TO INT".to_string();
        assert!(symbol.is_pointer_like());
    }

    #[test]
    fn resolve_effective_type_strips_pointer_prefix() {
        let mut cache = SymbolCache::new();
        cache.insert_data_type(AdsDataType {
            version: 1,
            size: 2,
            offset: 0,
            ads_data_type: 2,
            flags: DataTypeFlags::empty(),
            array_info: Vec::new(),
            name: "INT".to_string(),
            type_name: "INT".to_string(),
            comment: String::new(),
            sub_items: Vec::new(),
            type_guid: None,
            enum_infos: Vec::new(),
            rpc_methods: Vec::new(),
            attributes: Vec::new(),
        });
        let resolved = cache.resolve_effective_type("POINTER TO INT").unwrap();
        assert_eq!(resolved.name, "INT");
    }

    #[test]
    fn interface_like_data_type_sized_as_pointer_width() {
        let node = AdsDataType {
            version: 1,
            size: 8,
            offset: 0,
            ads_data_type: 0,
            flags: DataTypeFlags::empty(),
            array_info: Vec::new(),
            name: "ITF".to_string(),
            type_name: "ISomething".to_string(),
            comment: String::new(),
            sub_items: Vec::new(),
            type_guid: None,
            enum_infos: Vec::new(),
            rpc_methods: Vec::new(),
            attributes: Vec::new(),
        };
        assert!(node.is_interface_like(8));
    }
}
