//! AFP wire constants: command codes, bitmap bits, attribute flags.
//!
//! Values come from the AFP 2.1/2.2 and AFP 3.0 references. Bit order inside
//! each bitmap group is also the on-the-wire field order.

pub const COMMAND_OFFSET: usize = 0;
pub const PAD_LEN: usize = 1;

// Command codes.
pub const AFP_BYTELOCK: u8 = 1;
pub const AFP_CLOSEVOL: u8 = 2;
pub const AFP_CLOSEDIR: u8 = 3;
pub const AFP_CLOSEFORK: u8 = 4;
pub const AFP_COPYFILE: u8 = 5;
pub const AFP_CREATEDIR: u8 = 6;
pub const AFP_CREATEFILE: u8 = 7;
pub const AFP_DELETE: u8 = 8;
pub const AFP_ENUMERATE: u8 = 9;
pub const AFP_FLUSH: u8 = 10;
pub const AFP_FLUSHFORK: u8 = 11;
pub const AFP_GETFORKPARAM: u8 = 14;
pub const AFP_GETSRVINFO: u8 = 15;
pub const AFP_GETSRVPARAM: u8 = 16;
pub const AFP_GETVOLPARAM: u8 = 17;
pub const AFP_LOGIN: u8 = 18;
pub const AFP_LOGINCONT: u8 = 19;
pub const AFP_LOGOUT: u8 = 20;
pub const AFP_MAPID: u8 = 21;
pub const AFP_MAPNAME: u8 = 22;
pub const AFP_MOVE: u8 = 23;
pub const AFP_OPENVOL: u8 = 24;
pub const AFP_OPENDIR: u8 = 25;
pub const AFP_OPENFORK: u8 = 26;
pub const AFP_READ: u8 = 27;
pub const AFP_RENAME: u8 = 28;
pub const AFP_SETDIRPARAM: u8 = 29;
pub const AFP_SETFILEPARAM: u8 = 30;
pub const AFP_SETFORKPARAM: u8 = 31;
pub const AFP_SETVOLPARAM: u8 = 32;
pub const AFP_WRITE: u8 = 33;
pub const AFP_GETFLDRPARAM: u8 = 34;
pub const AFP_SETFLDRPARAM: u8 = 35;
pub const AFP_CHANGEPW: u8 = 36;
pub const AFP_GETSRVRMSG: u8 = 38;
pub const AFP_CREATEID: u8 = 39;
pub const AFP_DELETEID: u8 = 40;
pub const AFP_RESOLVEID: u8 = 41;
pub const AFP_EXCHANGEFILE: u8 = 42;
pub const AFP_CATSEARCH: u8 = 43;
pub const AFP_OPENDT: u8 = 48;
pub const AFP_CLOSEDT: u8 = 49;
pub const AFP_GETICON: u8 = 51;
pub const AFP_GTICNINFO: u8 = 52;
pub const AFP_ADDAPPL: u8 = 53;
pub const AFP_RMVAPPL: u8 = 54;
pub const AFP_GETAPPL: u8 = 55;
pub const AFP_ADDCMT: u8 = 56;
pub const AFP_RMVCMT: u8 = 57;
pub const AFP_GETCMT: u8 = 58;
pub const AFP_ADDICON: u8 = 192;

// Volume bitmap.
pub const VOL_ATTRIBUTE_BIT: u16 = 1 << 0;
pub const VOL_SIGNATURE_BIT: u16 = 1 << 1;
pub const VOL_CREATE_DATE_BIT: u16 = 1 << 2;
pub const VOL_MOD_DATE_BIT: u16 = 1 << 3;
pub const VOL_BACKUP_DATE_BIT: u16 = 1 << 4;
pub const VOL_ID_BIT: u16 = 1 << 5;
pub const VOL_BYTES_FREE_BIT: u16 = 1 << 6;
pub const VOL_BYTES_TOTAL_BIT: u16 = 1 << 7;
pub const VOL_NAME_BIT: u16 = 1 << 8;
pub const VOL_EXT_BYTES_FREE_BIT: u16 = 1 << 9;
pub const VOL_EXT_BYTES_TOTAL_BIT: u16 = 1 << 10;
pub const VOL_BLOCK_SIZE_BIT: u16 = 1 << 11;

// Volume attributes.
pub const VOL_READ_ONLY: u16 = 1 << 0;
pub const VOL_HAS_PASSWORD: u16 = 1 << 1;
pub const VOL_SUPPORTS_FILE_IDS: u16 = 1 << 2;
pub const VOL_SUPPORTS_CAT_SEARCH: u16 = 1 << 3;
pub const VOL_SUPPORTS_BLANK_PRIVS: u16 = 1 << 4;
pub const VOL_SUPPORTS_UNIX_PRIVS: u16 = 1 << 5;
pub const VOL_SUPPORTS_UTF8_NAMES: u16 = 1 << 6;

// File and directory bitmaps share bits 0..=8 and 13.
pub const ATTRIBUTE_BIT: u16 = 1 << 0;
pub const PARENT_DIR_ID_BIT: u16 = 1 << 1;
pub const CREATE_DATE_BIT: u16 = 1 << 2;
pub const MOD_DATE_BIT: u16 = 1 << 3;
pub const BACKUP_DATE_BIT: u16 = 1 << 4;
pub const FINDER_INFO_BIT: u16 = 1 << 5;
pub const LONG_NAME_BIT: u16 = 1 << 6;
pub const SHORT_NAME_BIT: u16 = 1 << 7;
pub const NODE_ID_BIT: u16 = 1 << 8;
pub const UTF8_NAME_BIT: u16 = 1 << 13;

// Directory-only bits.
pub const OFFSPRING_COUNT_BIT: u16 = 1 << 9;
pub const OWNER_ID_BIT: u16 = 1 << 10;
pub const GROUP_ID_BIT: u16 = 1 << 11;
pub const ACCESS_RIGHTS_BIT: u16 = 1 << 12;
pub const DIR_UNIX_PRIVS_BIT: u16 = 1 << 14;

// File-only bits.
pub const DATA_FORK_LEN_BIT: u16 = 1 << 9;
pub const RSRC_FORK_LEN_BIT: u16 = 1 << 10;
pub const EXT_DATA_FORK_LEN_BIT: u16 = 1 << 11;
pub const LAUNCH_LIMIT_BIT: u16 = 1 << 12;
pub const EXT_RSRC_FORK_LEN_BIT: u16 = 1 << 14;
pub const FILE_UNIX_PRIVS_BIT: u16 = 1 << 15;

// File attributes; directory attributes reuse the same positions.
pub const INVISIBLE_BIT: u16 = 1 << 0;
pub const MULTI_USER_BIT: u16 = 1 << 1;
pub const SYSTEM_BIT: u16 = 1 << 2;
pub const DATA_ALREADY_OPEN_BIT: u16 = 1 << 3;
pub const RSRC_ALREADY_OPEN_BIT: u16 = 1 << 4;
pub const WRITE_INHIBIT_BIT: u16 = 1 << 5;
pub const BACKUP_NEEDED_BIT: u16 = 1 << 6;
pub const RENAME_INHIBIT_BIT: u16 = 1 << 7;
pub const DELETE_INHIBIT_BIT: u16 = 1 << 8;
pub const COPY_PROTECT_BIT: u16 = 1 << 10;
pub const SET_CLEAR_BIT: u16 = 1 << 15;

// Directory access rights.
pub const AR_OWNER_SEARCH: u32 = 1 << 0;
pub const AR_OWNER_READ: u32 = 1 << 1;
pub const AR_OWNER_WRITE: u32 = 1 << 2;
pub const AR_GROUP_SEARCH: u32 = 1 << 8;
pub const AR_GROUP_READ: u32 = 1 << 9;
pub const AR_GROUP_WRITE: u32 = 1 << 10;
pub const AR_EVERYONE_SEARCH: u32 = 1 << 16;
pub const AR_EVERYONE_READ: u32 = 1 << 17;
pub const AR_EVERYONE_WRITE: u32 = 1 << 18;
pub const AR_USER_SEARCH: u32 = 1 << 24;
pub const AR_USER_READ: u32 = 1 << 25;
pub const AR_USER_WRITE: u32 = 1 << 26;
pub const AR_BLANK: u32 = 1 << 28;
pub const AR_USER_IS_OWNER: u32 = 1 << 31;

// Fork access mode.
pub const ACCESS_READ: u16 = 1 << 0;
pub const ACCESS_WRITE: u16 = 1 << 1;
pub const ACCESS_DENY_READ: u16 = 1 << 4;
pub const ACCESS_DENY_WRITE: u16 = 1 << 5;

// Single-byte flags.
pub const DIR_FLAG: u8 = 0x80;
pub const HARD_CREATE_FLAG: u8 = 0x80;
pub const RESOURCE_FORK_FLAG: u8 = 0x80;
pub const FROM_END_FLAG: u8 = 0x80;
pub const UNLOCK_FLAG: u8 = 0x01;

// Path name types.
pub const PATH_SHORT_NAMES: u8 = 1;
pub const PATH_LONG_NAMES: u8 = 2;
pub const PATH_UNICODE_NAMES: u8 = 3;
pub const NAME_NUL_PLACEHOLDER: char = ':';
pub const UNICODE_NAME_PLACEHOLDER: &str = "<unicode name not decoded>";

// Dates: seconds since 2000-01-01T00:00:00Z.
pub const DATE_NOT_SET: u32 = 0x8000_0000;
pub const DATE_DELTA: i64 = 946_684_800;

// User authentication methods.
pub const UAM_CLEARTEXT: &[u8] = b"Cleartxt passwrd";
pub const UAM_NO_USER_AUTHENT: &[u8] = b"No User Authent";
pub const UAM_RANDNUM: &[u8] = b"Randnum exchange";
pub const UAM_TWO_WAY_RANDNUM: &[u8] = b"2-Way Randnum exchange";

pub const OPEN_VOL_PASSWORD_LEN: usize = 8;
pub const FINDER_INFO_LEN: usize = 32;
