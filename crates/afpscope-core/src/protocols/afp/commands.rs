//! Per-command request and reply layouts.
//!
//! Request decoders start just past the command byte; reply decoders start
//! at offset 0. Every decoder returns the offset where it stopped, anything
//! beyond is reported as trailing data by the dispatcher.

use super::bitmap::{
    self, ACCESS_MODE, BitmapContext, DIR_FIELDS, FILE_FIELDS, LOCK_FLAGS, VOL_FIELDS,
};
use super::enumerate::decode_enumerate_records;
use super::error::AfpError;
use super::fields::{self, Field};
use super::layout;
use super::name;
use super::reader::{AfpReader, bytes_to_text};
use super::tree::{FieldSink, FieldValue};

/// Everything a command decoder writes to.
pub struct DecodeCtx<'a> {
    pub sink: &'a mut dyn FieldSink,
    pub reader: AfpReader<'a>,
    pub summary: &'a mut String,
}

pub type Decoder = fn(&mut DecodeCtx<'_>, usize) -> Result<usize, AfpError>;

/// One row of the command table.
pub struct CommandEntry {
    pub code: u8,
    pub name: &'static str,
    pub request: Option<Decoder>,
    pub reply: Option<Decoder>,
}

macro_rules! command {
    ($code:path, $name:literal) => {
        CommandEntry { code: $code, name: $name, request: None, reply: None }
    };
    ($code:path, $name:literal, $request:expr) => {
        CommandEntry { code: $code, name: $name, request: Some($request), reply: None }
    };
    ($code:path, $name:literal, $request:expr, $reply:expr) => {
        CommandEntry { code: $code, name: $name, request: $request, reply: Some($reply) }
    };
}

pub static COMMANDS: &[CommandEntry] = &[
    command!(layout::AFP_BYTELOCK, "FPByteRangeLock", Some(request_byte_lock), reply_byte_lock),
    command!(layout::AFP_CLOSEVOL, "FPCloseVol", request_with_vol_id),
    command!(layout::AFP_CLOSEDIR, "FPCloseDir"),
    command!(layout::AFP_CLOSEFORK, "FPCloseFork", request_with_fork),
    // Body left undecoded: it is reported as trailing bytes, not read with
    // the FPCreateFile layout.
    command!(layout::AFP_COPYFILE, "FPCopyFile"),
    command!(layout::AFP_CREATEDIR, "FPCreateDir", Some(request_vol_did_name), reply_create_dir),
    command!(layout::AFP_CREATEFILE, "FPCreateFile", request_create_file),
    command!(layout::AFP_DELETE, "FPDelete", request_vol_did_name),
    command!(layout::AFP_ENUMERATE, "FPEnumerate", Some(request_enumerate), reply_enumerate),
    command!(layout::AFP_FLUSH, "FPFlush", request_with_vol_id),
    command!(layout::AFP_FLUSHFORK, "FPFlushFork", request_with_fork),
    command!(layout::AFP_GETFORKPARAM, "FPGetForkParms", Some(request_get_fork_param), reply_file_params),
    command!(layout::AFP_GETSRVINFO, "FPGetSrvrInfo"),
    command!(layout::AFP_GETSRVPARAM, "FPGetSrvrParms"),
    command!(layout::AFP_GETVOLPARAM, "FPGetVolParms", Some(request_get_vol_param), reply_vol_params),
    command!(layout::AFP_LOGIN, "FPLogin", request_login),
    command!(layout::AFP_LOGINCONT, "FPLoginCont"),
    command!(layout::AFP_LOGOUT, "FPLogout"),
    command!(layout::AFP_MAPID, "FPMapID"),
    command!(layout::AFP_MAPNAME, "FPMapName"),
    command!(layout::AFP_MOVE, "FPMoveAndRename", Some(request_move), reply_file_id),
    command!(layout::AFP_OPENVOL, "FPOpenVol", Some(request_open_vol), reply_vol_params),
    command!(layout::AFP_OPENDIR, "FPOpenDir"),
    command!(layout::AFP_OPENFORK, "FPOpenFork", Some(request_open_fork), reply_open_fork),
    command!(layout::AFP_READ, "FPRead", request_read),
    command!(layout::AFP_RENAME, "FPRename", request_rename),
    command!(layout::AFP_SETDIRPARAM, "FPSetDirParms", request_set_dir_param),
    command!(layout::AFP_SETFILEPARAM, "FPSetFileParms", request_set_file_param),
    command!(layout::AFP_SETFORKPARAM, "FPSetForkParms", request_set_fork_param),
    command!(layout::AFP_SETVOLPARAM, "FPSetVolParms", request_set_vol_param),
    command!(layout::AFP_WRITE, "FPWrite", Some(request_write), reply_write),
    command!(layout::AFP_GETFLDRPARAM, "FPGetFileDirParms", Some(request_get_fldr_param), reply_get_fldr_param),
    command!(layout::AFP_SETFLDRPARAM, "FPSetFileDirParms", request_set_fldr_param),
    command!(layout::AFP_CHANGEPW, "FPChangePassword"),
    command!(layout::AFP_GETSRVRMSG, "FPGetSrvrMsg"),
    command!(layout::AFP_CREATEID, "FPCreateID", Some(request_vol_did_name), reply_file_id),
    command!(layout::AFP_DELETEID, "FPDeleteID", request_delete_id),
    command!(layout::AFP_RESOLVEID, "FPResolveID", Some(request_resolve_id), reply_file_params),
    command!(layout::AFP_EXCHANGEFILE, "FPExchangeFiles"),
    command!(layout::AFP_CATSEARCH, "FPCatSearch"),
    command!(layout::AFP_OPENDT, "FPOpenDT", Some(request_with_vol_id), reply_open_dt),
    command!(layout::AFP_CLOSEDT, "FPCloseDT", request_close_dt),
    command!(layout::AFP_GETICON, "FPGetIcon", Some(request_get_icon), reply_nothing),
    command!(layout::AFP_GTICNINFO, "FPGetIconInfo", Some(request_get_icon_info), reply_get_icon_info),
    command!(layout::AFP_ADDAPPL, "FPAddAPPL", request_add_appl),
    command!(layout::AFP_RMVAPPL, "FPRemoveAPPL", request_rmv_appl),
    command!(layout::AFP_GETAPPL, "FPGetAPPL", Some(request_get_appl), reply_get_appl),
    command!(layout::AFP_ADDCMT, "FPAddComment", request_add_comment),
    command!(layout::AFP_RMVCMT, "FPRemoveComment", request_get_comment),
    command!(layout::AFP_GETCMT, "FPGetComment", Some(request_get_comment), reply_get_comment),
    command!(layout::AFP_ADDICON, "FPAddIcon", request_add_icon),
];

pub fn command_entry(code: u8) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|entry| entry.code == code)
}

/// Display name of a command code, `Unknown command (0xNN)` when unmapped.
pub fn command_name(code: u8) -> String {
    match command_entry(code) {
        Some(entry) => entry.name.to_string(),
        None => format!("Unknown command (0x{code:02x})"),
    }
}

impl DecodeCtx<'_> {
    fn pad(&mut self, offset: usize) -> Result<usize, AfpError> {
        let end = offset + layout::PAD_LEN;
        self.reader.read_slice(offset..end)?;
        self.sink.add(&fields::PAD, offset..end, FieldValue::None);
        Ok(end)
    }

    /// Realign to an even offset.
    fn even_pad(&mut self, offset: usize) -> Result<usize, AfpError> {
        if offset % 2 == 1 {
            return self.pad(offset);
        }
        Ok(offset)
    }

    fn uint(&mut self, field: &'static Field, offset: usize, width: usize) -> Result<usize, AfpError> {
        let value = bitmap::read_uint(&self.reader, offset, width)?;
        self.sink.add(field, offset..offset + width, FieldValue::Uint(value));
        Ok(offset + width)
    }

    fn int32(&mut self, field: &'static Field, offset: usize) -> Result<usize, AfpError> {
        let value = self.reader.read_i32_be(offset)?;
        self.sink.add(field, offset..offset + 4, FieldValue::Int(i64::from(value)));
        Ok(offset + 4)
    }

    /// A one-byte flag whose meaning is a single bit.
    fn flag(&mut self, field: &'static Field, offset: usize, mask: u8) -> Result<(bool, usize), AfpError> {
        let set = self.reader.read_u8(offset)? & mask != 0;
        self.sink.add(field, offset..offset + 1, FieldValue::Bool(set));
        Ok((set, offset + 1))
    }

    /// Four-character code (creator, type).
    fn ostype(&mut self, field: &'static Field, offset: usize) -> Result<usize, AfpError> {
        let bytes = self.reader.read_slice(offset..offset + 4)?;
        let text = bytes_to_text(bytes, layout::NAME_NUL_PLACEHOLDER);
        self.sink.add(field, offset..offset + 4, FieldValue::Text(text));
        Ok(offset + 4)
    }

    fn pstring(&mut self, field: &'static Field, offset: usize) -> Result<(String, usize), AfpError> {
        let bytes = self.reader.read_pascal(offset)?;
        let end = offset + 1 + bytes.len();
        let text = bytes_to_text(bytes, layout::NAME_NUL_PLACEHOLDER);
        self.sink.add(field, offset..end, FieldValue::Text(text.clone()));
        Ok((text, end))
    }

    fn vol_did(&mut self, offset: usize) -> Result<usize, AfpError> {
        let offset = self.uint(&fields::VOL_ID, offset, 2)?;
        self.uint(&fields::DID, offset, 4)
    }

    fn name(&mut self, offset: usize) -> Result<usize, AfpError> {
        name::decode_name(&mut *self.sink, &mut *self.summary, &self.reader, offset)
    }

    /// Named path; only summarized names reach the summary line.
    fn name_label(&mut self, offset: usize, label: &str, summarize: bool) -> Result<usize, AfpError> {
        if summarize {
            return name::decode_name_label(&mut *self.sink, &mut *self.summary, &self.reader, offset, label);
        }
        let mut scratch = String::new();
        name::decode_name_label(&mut *self.sink, &mut scratch, &self.reader, offset, label)
    }

    fn file_bitmap(&mut self, offset: usize) -> Result<(u16, usize), AfpError> {
        let bitmap = bitmap::decode_file_bitmap(&mut *self.sink, &self.reader, offset)?;
        Ok((bitmap, offset + 2))
    }

    fn dir_bitmap(&mut self, offset: usize) -> Result<(u16, usize), AfpError> {
        let bitmap = bitmap::decode_dir_bitmap(&mut *self.sink, &self.reader, offset)?;
        Ok((bitmap, offset + 2))
    }

    fn vol_bitmap(&mut self, offset: usize) -> Result<(u16, usize), AfpError> {
        let bitmap = bitmap::decode_vol_bitmap(&mut *self.sink, &self.reader, offset)?;
        Ok((bitmap, offset + 2))
    }

    fn parse(
        &mut self,
        offset: usize,
        bitmap: u16,
        table: &'static bitmap::BitmapTable,
        ctx: BitmapContext,
    ) -> Result<usize, AfpError> {
        bitmap::parse_bitmap(&mut *self.sink, &self.reader, offset, bitmap, table, ctx)
    }
}

// Requests.

fn request_byte_lock(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    bitmap::decode_flags(&mut *ctx.sink, &ctx.reader, offset, 1, &LOCK_FLAGS)?;
    let offset = ctx.uint(&fields::OFORK, offset + 1, 2)?;
    let offset = ctx.int32(&fields::LOCK_OFFSET, offset)?;
    ctx.int32(&fields::LOCK_LEN, offset)
}

/// CloseVol, Flush and OpenDT.
fn request_with_vol_id(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    ctx.uint(&fields::VOL_ID, offset, 2)
}

fn request_close_dt(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    ctx.uint(&fields::DT_REF, offset, 2)
}

/// CloseFork and FlushFork.
fn request_with_fork(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    ctx.uint(&fields::OFORK, offset, 2)
}

fn request_create_file(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let (_, offset) = ctx.flag(&fields::CREATE_FLAG, offset, layout::HARD_CREATE_FLAG)?;
    let offset = ctx.vol_did(offset)?;
    ctx.name(offset)
}

/// Delete, CreateDir and CreateID.
fn request_vol_did_name(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.vol_did(offset)?;
    ctx.name(offset)
}

fn request_enumerate(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.vol_did(offset)?;
    let (_, offset) = ctx.file_bitmap(offset)?;
    let (_, offset) = ctx.dir_bitmap(offset)?;
    let offset = ctx.uint(&fields::REQ_COUNT, offset, 2)?;
    let offset = ctx.uint(&fields::START_INDEX, offset, 2)?;
    let offset = ctx.uint(&fields::MAX_REPLY_SIZE, offset, 2)?;
    ctx.name(offset)
}

fn request_get_fork_param(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::OFORK, offset, 2)?;
    let (_, offset) = ctx.file_bitmap(offset)?;
    Ok(offset)
}

fn request_get_vol_param(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::VOL_ID, offset, 2)?;
    let (_, offset) = ctx.vol_bitmap(offset)?;
    Ok(offset)
}

fn request_set_vol_param(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::VOL_ID, offset, 2)?;
    let (bitmap, offset) = ctx.vol_bitmap(offset)?;
    ctx.parse(offset, bitmap, &VOL_FIELDS, BitmapContext::default())
}

fn request_login(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let (_, offset) = ctx.pstring(&fields::AFP_VERSION, offset)?;
    let uam = ctx.reader.read_pascal(offset)?;
    let (_, offset) = ctx.pstring(&fields::UAM, offset)?;

    match uam {
        layout::UAM_CLEARTEXT => {
            let (_, offset) = ctx.pstring(&fields::USER, offset)?;
            let passwd = ctx.reader.read_cstring(offset)?;
            let end = offset + passwd.len();
            let text = bytes_to_text(&passwd[..passwd.len() - 1], layout::NAME_NUL_PLACEHOLDER);
            ctx.sink.add(&fields::PASSWD, offset..end, FieldValue::Text(text));
            Ok(end)
        }
        layout::UAM_RANDNUM | layout::UAM_TWO_WAY_RANDNUM => {
            let (_, offset) = ctx.pstring(&fields::USER, offset)?;
            let end = ctx.reader.len().max(offset);
            if end > offset {
                ctx.sink.add(&fields::AUTH_DATA, offset..end, FieldValue::None);
            }
            Ok(end)
        }
        _ => Ok(offset),
    }
}

fn request_move(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.vol_did(offset)?;
    let offset = ctx.uint(&fields::DEST_DID, offset, 4)?;
    let offset = ctx.name_label(offset, "Source path", true)?;
    let offset = ctx.name_label(offset, "Dest dir", false)?;
    ctx.name_label(offset, "New name", true)
}

fn request_open_vol(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let (_, offset) = ctx.vol_bitmap(offset)?;
    let (volume, offset) = ctx.pstring(&fields::VOL_NAME, offset)?;
    ctx.summary.push_str(": ");
    ctx.summary.push_str(&volume);

    if ctx.reader.remaining(offset) < layout::OPEN_VOL_PASSWORD_LEN {
        return Ok(offset);
    }
    let end = offset + layout::OPEN_VOL_PASSWORD_LEN;
    let bytes = ctx.reader.read_slice(offset..end)?;
    let passwd = bytes.split(|b| *b == 0).next().unwrap_or_default();
    ctx.sink.add(
        &fields::PASSWD,
        offset..end,
        FieldValue::Text(bytes_to_text(passwd, layout::NAME_NUL_PLACEHOLDER)),
    );
    Ok(end)
}

fn request_open_fork(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let (_, offset) = ctx.flag(&fields::FORK_TYPE, offset, layout::RESOURCE_FORK_FLAG)?;
    let offset = ctx.vol_did(offset)?;
    let (_, offset) = ctx.file_bitmap(offset)?;
    bitmap::decode_flags(&mut *ctx.sink, &ctx.reader, offset, 2, &ACCESS_MODE)?;
    ctx.name(offset + 2)
}

fn request_read(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::OFORK, offset, 2)?;
    let offset = ctx.int32(&fields::OFFSET, offset)?;
    let offset = ctx.int32(&fields::RW_COUNT, offset)?;
    let offset = ctx.uint(&fields::NEWLINE_MASK, offset, 1)?;
    ctx.uint(&fields::NEWLINE_CHAR, offset, 1)
}

fn request_rename(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.vol_did(offset)?;
    let offset = ctx.name_label(offset, "Old name", true)?;
    ctx.name_label(offset, "New name", true)
}

fn request_set_dir_param(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.vol_did(offset)?;
    let (bitmap, offset) = ctx.dir_bitmap(offset)?;
    let offset = ctx.name(offset)?;
    let offset = ctx.even_pad(offset)?;
    ctx.parse(offset, bitmap, &DIR_FIELDS, BitmapContext::default())
}

fn set_file_params(ctx: &mut DecodeCtx<'_>, offset: usize, shared: bool) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.vol_did(offset)?;
    let (bitmap, offset) = ctx.file_bitmap(offset)?;
    let offset = ctx.name(offset)?;
    let offset = ctx.even_pad(offset)?;
    ctx.parse(offset, bitmap, &FILE_FIELDS, BitmapContext { shared })
}

fn request_set_file_param(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    set_file_params(ctx, offset, false)
}

/// The target may be a file or a directory; only the bits both kinds share
/// are meaningful.
fn request_set_fldr_param(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    set_file_params(ctx, offset, true)
}

fn request_set_fork_param(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::OFORK, offset, 2)?;
    let (_, offset) = ctx.file_bitmap(offset)?;
    ctx.int32(&fields::OFORK_LEN, offset)
}

fn request_write(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let (_, offset) = ctx.flag(&fields::FROM_FLAG, offset, layout::FROM_END_FLAG)?;
    let offset = ctx.uint(&fields::OFORK, offset, 2)?;
    let offset = ctx.int32(&fields::OFFSET, offset)?;
    ctx.int32(&fields::RW_COUNT, offset)
}

fn request_get_fldr_param(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.vol_did(offset)?;
    let (_, offset) = ctx.file_bitmap(offset)?;
    let (_, offset) = ctx.dir_bitmap(offset)?;
    ctx.name(offset)
}

fn request_delete_id(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::VOL_ID, offset, 2)?;
    ctx.uint(&fields::FILE_ID, offset, 4)
}

fn request_resolve_id(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = request_delete_id(ctx, offset)?;
    let (_, offset) = ctx.file_bitmap(offset)?;
    Ok(offset)
}

fn request_get_icon(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::DT_REF, offset, 2)?;
    let offset = ctx.ostype(&fields::FILE_CREATOR, offset)?;
    let offset = ctx.ostype(&fields::FILE_TYPE, offset)?;
    let offset = ctx.uint(&fields::ICON_TYPE, offset, 1)?;
    let offset = ctx.pad(offset)?;
    ctx.uint(&fields::ICON_LENGTH, offset, 2)
}

fn request_get_icon_info(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::DT_REF, offset, 2)?;
    let offset = ctx.ostype(&fields::FILE_CREATOR, offset)?;
    ctx.uint(&fields::ICON_INDEX, offset, 2)
}

fn request_add_icon(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::DT_REF, offset, 2)?;
    let offset = ctx.ostype(&fields::FILE_CREATOR, offset)?;
    let offset = ctx.ostype(&fields::FILE_TYPE, offset)?;
    let offset = ctx.uint(&fields::ICON_TYPE, offset, 1)?;
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::ICON_TAG, offset, 4)?;
    ctx.uint(&fields::ICON_LENGTH, offset, 2)
}

fn request_add_appl(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::DT_REF, offset, 2)?;
    let offset = ctx.uint(&fields::DID, offset, 4)?;
    let offset = ctx.ostype(&fields::FILE_CREATOR, offset)?;
    let offset = ctx.uint(&fields::APPL_TAG, offset, 4)?;
    ctx.name(offset)
}

fn request_rmv_appl(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::DT_REF, offset, 2)?;
    let offset = ctx.uint(&fields::DID, offset, 4)?;
    let offset = ctx.ostype(&fields::FILE_CREATOR, offset)?;
    ctx.name(offset)
}

fn request_get_appl(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::DT_REF, offset, 2)?;
    let offset = ctx.ostype(&fields::FILE_CREATOR, offset)?;
    let offset = ctx.uint(&fields::APPL_INDEX, offset, 2)?;
    let (_, offset) = ctx.file_bitmap(offset)?;
    Ok(offset)
}

fn request_add_comment(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = request_get_comment(ctx, offset)?;
    let offset = ctx.even_pad(offset)?;
    let (_, offset) = ctx.pstring(&fields::COMMENT, offset)?;
    Ok(offset)
}

/// GetComment and RemoveComment.
fn request_get_comment(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.pad(offset)?;
    let offset = ctx.uint(&fields::DT_REF, offset, 2)?;
    let offset = ctx.uint(&fields::DID, offset, 4)?;
    ctx.name(offset)
}

// Replies.

fn reply_byte_lock(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    ctx.int32(&fields::LOCK_RANGE_START, offset)
}

fn reply_enumerate(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let (file_bitmap, offset) = ctx.file_bitmap(offset)?;
    let (dir_bitmap, offset) = ctx.dir_bitmap(offset)?;
    let count = ctx.reader.read_u16_be(offset)?;
    let records_start = offset + 2;
    ctx.sink.open(
        &fields::REQ_COUNT,
        offset..records_start,
        FieldValue::Uint(u64::from(count)),
        None,
    );
    let end = decode_enumerate_records(
        &mut *ctx.sink,
        &ctx.reader,
        records_start,
        file_bitmap,
        dir_bitmap,
        count,
    )?;
    ctx.sink.close();
    Ok(end)
}

/// OpenVol and GetVolParms.
fn reply_vol_params(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let (bitmap, offset) = ctx.vol_bitmap(offset)?;
    ctx.parse(offset, bitmap, &VOL_FIELDS, BitmapContext::default())
}

fn reply_open_fork(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let (bitmap, offset) = ctx.file_bitmap(offset)?;
    let offset = ctx.uint(&fields::OFORK, offset, 2)?;
    ctx.parse(offset, bitmap, &FILE_FIELDS, BitmapContext::default())
}

/// GetForkParms and ResolveID.
fn reply_file_params(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let (bitmap, offset) = ctx.file_bitmap(offset)?;
    ctx.parse(offset, bitmap, &FILE_FIELDS, BitmapContext::default())
}

fn reply_create_dir(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    ctx.uint(&fields::DID, offset, 4)
}

/// CreateID and MoveAndRename.
fn reply_file_id(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    ctx.uint(&fields::FILE_ID, offset, 4)
}

fn reply_get_fldr_param(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let (file_bitmap, offset) = ctx.file_bitmap(offset)?;
    let (dir_bitmap, offset) = ctx.dir_bitmap(offset)?;
    let (is_dir, offset) = ctx.flag(&fields::FILE_FLAG, offset, layout::DIR_FLAG)?;
    let offset = ctx.pad(offset)?;
    if is_dir {
        ctx.parse(offset, dir_bitmap, &DIR_FIELDS, BitmapContext::default())
    } else {
        ctx.parse(offset, file_bitmap, &FILE_FIELDS, BitmapContext::default())
    }
}

fn reply_open_dt(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    ctx.uint(&fields::DT_REF, offset, 2)
}

/// The icon bitmap is left as trailing data.
fn reply_nothing(_ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    Ok(offset)
}

fn reply_get_icon_info(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let offset = ctx.uint(&fields::ICON_TAG, offset, 4)?;
    let offset = ctx.ostype(&fields::FILE_TYPE, offset)?;
    let offset = ctx.uint(&fields::ICON_TYPE, offset, 1)?;
    let offset = ctx.pad(offset)?;
    ctx.uint(&fields::ICON_LENGTH, offset, 2)
}

fn reply_get_appl(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    ctx.uint(&fields::APPL_TAG, offset, 4)
}

fn reply_get_comment(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    let (_, offset) = ctx.pstring(&fields::COMMENT, offset)?;
    Ok(offset)
}

fn reply_write(ctx: &mut DecodeCtx<'_>, offset: usize) -> Result<usize, AfpError> {
    ctx.uint(&fields::LAST_WRITTEN, offset, 4)
}

#[cfg(test)]
mod tests {
    use super::{COMMANDS, DecodeCtx, command_entry, command_name};
    use crate::protocols::afp::error::AfpError;
    use crate::protocols::afp::layout;
    use crate::protocols::afp::reader::AfpReader;
    use crate::protocols::afp::tree::{FieldNode, FieldTree, FieldValue, find_all, find_field};

    struct Decoded {
        end: Result<usize, AfpError>,
        summary: String,
        nodes: Vec<FieldNode>,
    }

    fn request(payload: &[u8]) -> Decoded {
        let entry = command_entry(payload[0]).unwrap();
        run(payload, 1, entry.request.unwrap())
    }

    fn reply(code: u8, payload: &[u8]) -> Decoded {
        let entry = command_entry(code).unwrap();
        run(payload, 0, entry.reply.unwrap())
    }

    fn run(payload: &[u8], offset: usize, decoder: super::Decoder) -> Decoded {
        let mut tree = FieldTree::new();
        let mut summary = String::new();
        let end = {
            let mut ctx = DecodeCtx {
                sink: &mut tree,
                reader: AfpReader::new(payload),
                summary: &mut summary,
            };
            decoder(&mut ctx, offset)
        };
        Decoded {
            end,
            summary,
            nodes: tree.finish(),
        }
    }

    fn login(uam: &[u8], tail: &[u8]) -> Vec<u8> {
        let version = b"AFPVersion 2.1";
        let mut payload = vec![layout::AFP_LOGIN, version.len() as u8];
        payload.extend_from_slice(version);
        payload.push(uam.len() as u8);
        payload.extend_from_slice(uam);
        payload.extend_from_slice(tail);
        payload
    }

    #[test]
    fn table_codes_are_unique() {
        for (index, entry) in COMMANDS.iter().enumerate() {
            assert!(
                COMMANDS[index + 1..].iter().all(|other| other.code != entry.code),
                "duplicate {}",
                entry.name
            );
        }
        assert_eq!(command_name(layout::AFP_LOGIN), "FPLogin");
        assert_eq!(command_name(0x7f), "Unknown command (0x7f)");
    }

    #[test]
    fn login_without_authentication_stops_after_uam() {
        let payload = login(layout::UAM_NO_USER_AUTHENT, &[0xde, 0xad]);
        let decoded = request(&payload);
        assert_eq!(decoded.end.unwrap(), payload.len() - 2);
        assert!(find_field(&decoded.nodes, "afp.user").is_none());
        assert_eq!(
            find_field(&decoded.nodes, "afp.UAM").unwrap().value,
            FieldValue::Text("No User Authent".into())
        );
    }

    #[test]
    fn cleartext_login_consumes_user_and_password() {
        let payload = login(layout::UAM_CLEARTEXT, b"\x05alicesecret\0");
        let decoded = request(&payload);
        assert_eq!(decoded.end.unwrap(), payload.len());
        assert_eq!(
            find_field(&decoded.nodes, "afp.user").unwrap().value,
            FieldValue::Text("alice".into())
        );
        let passwd = find_field(&decoded.nodes, "afp.passwd").unwrap();
        assert_eq!(passwd.value, FieldValue::Text("secret".into()));
        assert_eq!(passwd.len, 7);
    }

    #[test]
    fn cleartext_login_without_terminator_fails() {
        let payload = login(layout::UAM_CLEARTEXT, b"\x03bobpw");
        let decoded = request(&payload);
        assert!(matches!(decoded.end, Err(AfpError::MissingTerminator { .. })));
        assert!(find_field(&decoded.nodes, "afp.user").is_some());
    }

    #[test]
    fn randnum_login_marks_auth_data_extent() {
        let payload = login(layout::UAM_RANDNUM, b"\x03bob\x01\x02\x03\x04");
        let decoded = request(&payload);
        assert_eq!(decoded.end.unwrap(), payload.len());
        let auth = find_field(&decoded.nodes, "afp.auth_data").unwrap();
        assert_eq!(auth.len, 4);
        assert_eq!(auth.value, FieldValue::None);
    }

    #[test]
    fn rename_summarizes_both_names() {
        let payload = [
            layout::AFP_RENAME, 0, 0, 1, 0, 0, 0, 2, 2, 3, b'o', b'l', b'd', 2, 3, b'n', b'e',
            b'w',
        ];
        let decoded = request(&payload);
        assert_eq!(decoded.end.unwrap(), payload.len());
        assert_eq!(decoded.summary, ": old: new");
        let paths = find_all(&decoded.nodes, "afp.path");
        assert_eq!(paths[0].label.as_deref(), Some("Old name: old"));
        assert_eq!(paths[1].label.as_deref(), Some("New name: new"));
    }

    #[test]
    fn move_skips_destination_in_summary() {
        let mut payload = vec![layout::AFP_MOVE, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 9];
        payload.extend_from_slice(&[2, 1, b'a', 2, 1, b'd', 2, 1, b'b']);
        let decoded = request(&payload);
        assert_eq!(decoded.end.unwrap(), payload.len());
        assert_eq!(decoded.summary, ": a: b");
        assert_eq!(find_all(&decoded.nodes, "afp.path").len(), 3);
        assert_eq!(
            find_field(&decoded.nodes, "afp.dest_did").unwrap().value,
            FieldValue::Uint(9)
        );
    }

    #[test]
    fn open_vol_reads_optional_password() {
        let mut payload = vec![layout::AFP_OPENVOL, 0, 0x01, 0x20, 4, b'H', b'o', b'm', b'e'];
        let decoded = request(&payload);
        assert_eq!(decoded.end.unwrap(), payload.len());
        assert_eq!(decoded.summary, ": Home");
        assert!(find_field(&decoded.nodes, "afp.passwd").is_none());

        payload.extend_from_slice(b"pw\0\0\0\0\0\0");
        let decoded = request(&payload);
        assert_eq!(decoded.end.unwrap(), payload.len());
        assert_eq!(
            find_field(&decoded.nodes, "afp.passwd").unwrap().value,
            FieldValue::Text("pw".into())
        );
    }

    #[test]
    fn set_file_params_realigns_before_record() {
        let mut payload = vec![layout::AFP_SETFILEPARAM, 0, 0, 1, 0, 0, 0, 2];
        payload.extend_from_slice(&layout::ATTRIBUTE_BIT.to_be_bytes());
        // name "ab" ends at offset 14; even already, no pad.
        payload.extend_from_slice(&[2, 2, b'a', b'b']);
        payload.extend_from_slice(&0x0001u16.to_be_bytes());
        let decoded = request(&payload);
        assert_eq!(decoded.end.unwrap(), payload.len());
        assert!(find_field(&decoded.nodes, "afp.pad").unwrap().offset == 1);
        assert_eq!(find_all(&decoded.nodes, "afp.pad").len(), 1);

        let mut odd = vec![layout::AFP_SETFILEPARAM, 0, 0, 1, 0, 0, 0, 2];
        odd.extend_from_slice(&layout::ATTRIBUTE_BIT.to_be_bytes());
        odd.extend_from_slice(&[2, 1, b'a', 0]);
        odd.extend_from_slice(&0x0001u16.to_be_bytes());
        let decoded = request(&odd);
        assert_eq!(decoded.end.unwrap(), odd.len());
        assert_eq!(find_all(&decoded.nodes, "afp.pad")[1].offset, 13);
    }

    #[test]
    fn set_file_dir_params_use_shared_attributes() {
        let mut payload = vec![layout::AFP_SETFLDRPARAM, 0, 0, 1, 0, 0, 0, 2];
        payload.extend_from_slice(&layout::ATTRIBUTE_BIT.to_be_bytes());
        payload.extend_from_slice(&[2, 2, b'a', b'b']);
        payload.extend_from_slice(&0xffffu16.to_be_bytes());
        let decoded = request(&payload);
        let attrs = find_field(&decoded.nodes, "afp.file_attribute").unwrap();
        assert_eq!(attrs.children.len(), 6);
    }

    #[test]
    fn byte_lock_breaks_down_flags() {
        let mut payload = vec![layout::AFP_BYTELOCK, 0x81, 0, 3];
        payload.extend_from_slice(&(-1i32).to_be_bytes());
        payload.extend_from_slice(&16i32.to_be_bytes());
        let decoded = request(&payload);
        assert_eq!(decoded.end.unwrap(), payload.len());
        assert_eq!(
            find_field(&decoded.nodes, "afp.lock_op").unwrap().value,
            FieldValue::Bool(true)
        );
        assert_eq!(
            find_field(&decoded.nodes, "afp.lock_from").unwrap().value,
            FieldValue::Bool(true)
        );
        assert_eq!(
            find_field(&decoded.nodes, "afp.lock_offset").unwrap().value,
            FieldValue::Int(-1)
        );
    }

    #[test]
    fn file_dir_params_reply_follows_flag() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&layout::NODE_ID_BIT.to_be_bytes());
        payload.extend_from_slice(&layout::OFFSPRING_COUNT_BIT.to_be_bytes());
        payload.extend_from_slice(&[0x80, 0x00]);
        payload.extend_from_slice(&12u16.to_be_bytes());
        let decoded = reply(layout::AFP_GETFLDRPARAM, &payload);
        assert_eq!(decoded.end.unwrap(), payload.len());
        assert_eq!(
            find_field(&decoded.nodes, "afp.dir_offspring").unwrap().value,
            FieldValue::Uint(12)
        );
        assert!(find_field(&decoded.nodes, "afp.file_id").is_none());
    }

    #[test]
    fn enumerate_reply_groups_records_under_count() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&layout::NODE_ID_BIT.to_be_bytes());
        payload.extend_from_slice(&0u16.to_be_bytes());
        payload.extend_from_slice(&1u16.to_be_bytes());
        payload.extend_from_slice(&[6, 0, 0, 0, 0, 5]);
        let decoded = reply(layout::AFP_ENUMERATE, &payload);
        assert_eq!(decoded.end.unwrap(), payload.len());
        let count = find_field(&decoded.nodes, "afp.req_count").unwrap();
        assert_eq!(count.children.len(), 1);
        assert_eq!(count.children[0].id, "afp.enumerate_record");
    }

    #[test]
    fn read_request_includes_newline_fields() {
        let mut payload = vec![layout::AFP_READ, 0, 0, 1];
        payload.extend_from_slice(&0i32.to_be_bytes());
        payload.extend_from_slice(&512i32.to_be_bytes());
        payload.extend_from_slice(&[0xff, b'\r']);
        let decoded = request(&payload);
        assert_eq!(decoded.end.unwrap(), payload.len());
        assert_eq!(
            find_field(&decoded.nodes, "afp.newline_char").unwrap().value,
            FieldValue::Uint(u64::from(b'\r'))
        );
    }
}
