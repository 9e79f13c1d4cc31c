//! Reserved ADS index groups used by the symbol/data-type cache, the variable-handle
//! layer and the sum-command layer.
//!
//! These are the well-known constants published in Beckhoff's ADS reserved index group
//! table (`TcAdsDef.h`). They never change between PLC projects, unlike the index groups
//! of user-defined symbols which are assigned by the compiler at build time.

use crate::ads::IndexGroup;

/// Symbol table (raw).
pub const SYMTAB: IndexGroup = 0xF000;
/// Symbol names (raw).
pub const SYMNAME: IndexGroup = 0xF001;
/// Symbol values (raw).
pub const SYMVAL: IndexGroup = 0xF002;
/// `ReadWrite`: resolve a variable handle from a symbol path.
pub const SYM_HNDBYNAME: IndexGroup = 0xF003;
/// `ReadWrite`: read a symbol's value by name directly.
pub const SYM_VALBYNAME: IndexGroup = 0xF004;
/// `Read`: read a symbol's value by a previously created handle.
pub const SYM_VALBYHND: IndexGroup = 0xF005;
/// `Write`: release a variable handle.
pub const SYM_RELEASEHND: IndexGroup = 0xF006;
/// `ReadWrite`: fetch a single symbol's metadata by name.
pub const SYM_INFOBYNAME: IndexGroup = 0xF007;
/// `Read`: the PLC's current symbol version (a `u32` that increments on redeploy).
pub const SYM_VERSION: IndexGroup = 0xF008;
/// `ReadWrite`: fetch a single symbol's extended metadata by name.
pub const SYM_INFOBYNAMEEX: IndexGroup = 0xF009;
/// `Read`: upload-info header describing the sizes of the bulk catalogs below.
pub const SYM_UPLOADINFO: IndexGroup = 0xF00C;
/// `Read`: the bulk symbol catalog.
pub const SYM_UPLOAD: IndexGroup = 0xF00B;
/// `Read`: the bulk data-type catalog.
pub const SYM_DT_UPLOAD: IndexGroup = 0xF00E;
/// `ReadWrite`: register a subscription for change notifications on the symbol version.
pub const SYMNOTE: IndexGroup = 0xF010;

/// `ReadWrite`: batched `Read` sub-commands (sum command).
pub const SUMUP_READ: IndexGroup = 0xF080;
/// `ReadWrite`: batched `Write` sub-commands (sum command).
pub const SUMUP_WRITE: IndexGroup = 0xF081;
/// `ReadWrite`: batched `ReadWrite` sub-commands (sum command).
pub const SUMUP_READWRITE: IndexGroup = 0xF082;
/// `ReadWrite`: batched `AddDeviceNotification` sub-commands (sum command).
pub const SUMUP_ADDDEVNOTE: IndexGroup = 0xF085;
/// `ReadWrite`: batched `DeleteDeviceNotification` sub-commands (sum command).
pub const SUMUP_DELDEVNOTE: IndexGroup = 0xF086;
