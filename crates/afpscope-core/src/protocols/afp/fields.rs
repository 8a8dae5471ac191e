//! Static field catalog.
//!
//! Every node in a decoded tree points at one of these descriptors; the `id`
//! is the stable filter name and `name` the display label.

/// A field descriptor: stable identifier plus display name.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Field {
    pub id: &'static str,
    pub name: &'static str,
}

macro_rules! fields {
    ($($ident:ident => $id:literal, $name:literal;)*) => {
        $(pub static $ident: Field = Field { id: $id, name: $name };)*
    };
}

fields! {
    COMMAND => "afp.command", "Command";
    PAD => "afp.pad", "Pad";
    AFP_VERSION => "afp.AFPVersion", "AFP Version";
    UAM => "afp.UAM", "UAM";
    USER => "afp.user", "User";
    PASSWD => "afp.passwd", "Password";
    AUTH_DATA => "afp.auth_data", "Authentication data";

    VOL_BITMAP => "afp.vol_bitmap", "Bitmap";
    VOL_BITMAP_ATTRIBUTES => "afp.vol_bitmap.attributes", "Attributes";
    VOL_BITMAP_SIGNATURE => "afp.vol_bitmap.signature", "Signature";
    VOL_BITMAP_CREATE_DATE => "afp.vol_bitmap.create_date", "Creation date";
    VOL_BITMAP_MOD_DATE => "afp.vol_bitmap.mod_date", "Modification date";
    VOL_BITMAP_BACKUP_DATE => "afp.vol_bitmap.backup_date", "Backup date";
    VOL_BITMAP_ID => "afp.vol_bitmap.id", "ID";
    VOL_BITMAP_BYTES_FREE => "afp.vol_bitmap.bytes_free", "Bytes free";
    VOL_BITMAP_BYTES_TOTAL => "afp.vol_bitmap.bytes_total", "Bytes total";
    VOL_BITMAP_NAME => "afp.vol_bitmap.name", "Name";
    VOL_BITMAP_EXT_BYTES_FREE => "afp.vol_bitmap.ex_bytes_free", "Extended bytes free";
    VOL_BITMAP_EXT_BYTES_TOTAL => "afp.vol_bitmap.ex_bytes_total", "Extended bytes total";
    VOL_BITMAP_BLOCK_SIZE => "afp.vol_bitmap.block_size", "Block size";

    VOL_ATTRIBUTE => "afp.vol_attributes", "Attributes";
    VOL_ATTRIBUTE_READ_ONLY => "afp.vol_attribute.read_only", "Read only";
    VOL_ATTRIBUTE_PASSWD => "afp.vol_attribute.passwd", "Volume password";
    VOL_ATTRIBUTE_FILE_IDS => "afp.vol_attribute.fileIDs", "File IDs";
    VOL_ATTRIBUTE_CAT_SEARCH => "afp.vol_attribute.cat_search", "Catalog search";
    VOL_ATTRIBUTE_BLANK_PRIVS => "afp.vol_attribute.blank_access_privs", "Blank access privileges";
    VOL_ATTRIBUTE_UNIX_PRIVS => "afp.vol_attribute.unix_privs", "UNIX access privileges";
    VOL_ATTRIBUTE_UTF8_NAMES => "afp.vol_attribute.utf8_names", "UTF-8 names";

    VOL_NAME => "afp.vol_name", "Volume";
    VOL_ID => "afp.vol_id", "Volume id";
    VOL_SIGNATURE => "afp.vol_signature", "Signature";
    BITMAP_OFFSET => "afp.bitmap_offset", "Offset";
    VOL_CREATION_DATE => "afp.vol_creation_date", "Creation date";
    VOL_MODIFICATION_DATE => "afp.vol_modification_date", "Modification date";
    VOL_BACKUP_DATE => "afp.vol_backup_date", "Backup date";
    VOL_BYTES_FREE => "afp.vol_bytes_free", "Bytes free";
    VOL_BYTES_TOTAL => "afp.vol_bytes_total", "Bytes total";
    VOL_EXT_BYTES_FREE => "afp.vol_ex_bytes_free", "Extended bytes free";
    VOL_EXT_BYTES_TOTAL => "afp.vol_ex_bytes_total", "Extended bytes total";
    VOL_BLOCK_SIZE => "afp.vol_block_size", "Block size";

    DIR_BITMAP => "afp.dir_bitmap", "Directory bitmap";
    DIR_BITMAP_ATTRIBUTES => "afp.dir_bitmap.attributes", "Attributes";
    DIR_BITMAP_DID => "afp.dir_bitmap.did", "DID";
    DIR_BITMAP_CREATE_DATE => "afp.dir_bitmap.create_date", "Creation date";
    DIR_BITMAP_MOD_DATE => "afp.dir_bitmap.mod_date", "Modification date";
    DIR_BITMAP_BACKUP_DATE => "afp.dir_bitmap.backup_date", "Backup date";
    DIR_BITMAP_FINDER_INFO => "afp.dir_bitmap.finder_info", "Finder info";
    DIR_BITMAP_LONG_NAME => "afp.dir_bitmap.long_name", "Long name";
    DIR_BITMAP_SHORT_NAME => "afp.dir_bitmap.short_name", "Short name";
    DIR_BITMAP_FID => "afp.dir_bitmap.fid", "File ID";
    DIR_BITMAP_OFFSPRING => "afp.dir_bitmap.offspring_count", "Offspring count";
    DIR_BITMAP_OWNER_ID => "afp.dir_bitmap.owner_id", "Owner id";
    DIR_BITMAP_GROUP_ID => "afp.dir_bitmap.group_id", "Group id";
    DIR_BITMAP_ACCESS_RIGHTS => "afp.dir_bitmap.access_rights", "Access rights";
    DIR_BITMAP_UTF8_NAME => "afp.dir_bitmap.UTF8_name", "UTF-8 name";
    DIR_BITMAP_UNIX_PRIVS => "afp.dir_bitmap.unix_privs", "UNIX privileges";

    DIR_ATTRIBUTE => "afp.dir_attribute", "Directory Attributes";
    DIR_ATTRIBUTE_INVISIBLE => "afp.dir_attribute.invisible", "Invisible";
    DIR_ATTRIBUTE_SHARE => "afp.dir_attribute.share", "Share point";
    DIR_ATTRIBUTE_SYSTEM => "afp.dir_attribute.system", "System";
    DIR_ATTRIBUTE_MOUNTED => "afp.dir_attribute.mounted", "Mounted";
    DIR_ATTRIBUTE_IN_EXPORTED => "afp.dir_attribute.in_exported_folder", "Shared area";
    DIR_ATTRIBUTE_BACKUP_NEEDED => "afp.dir_attribute.backup_needed", "Backup needed";
    DIR_ATTRIBUTE_RENAME_INHIBIT => "afp.dir_attribute.rename_inhibit", "Rename inhibit";
    DIR_ATTRIBUTE_DELETE_INHIBIT => "afp.dir_attribute.delete_inhibit", "Delete inhibit";
    DIR_ATTRIBUTE_SET_CLEAR => "afp.dir_attribute.set_clear", "Set";

    FILE_BITMAP => "afp.file_bitmap", "File bitmap";
    FILE_BITMAP_ATTRIBUTES => "afp.file_bitmap.attributes", "Attributes";
    FILE_BITMAP_DID => "afp.file_bitmap.did", "DID";
    FILE_BITMAP_CREATE_DATE => "afp.file_bitmap.create_date", "Creation date";
    FILE_BITMAP_MOD_DATE => "afp.file_bitmap.mod_date", "Modification date";
    FILE_BITMAP_BACKUP_DATE => "afp.file_bitmap.backup_date", "Backup date";
    FILE_BITMAP_FINDER_INFO => "afp.file_bitmap.finder_info", "Finder info";
    FILE_BITMAP_LONG_NAME => "afp.file_bitmap.long_name", "Long name";
    FILE_BITMAP_SHORT_NAME => "afp.file_bitmap.short_name", "Short name";
    FILE_BITMAP_FID => "afp.file_bitmap.fid", "File ID";
    FILE_BITMAP_DATA_FORK_LEN => "afp.file_bitmap.data_fork_len", "Data fork size";
    FILE_BITMAP_RSRC_FORK_LEN => "afp.file_bitmap.resource_fork_len", "Resource fork size";
    FILE_BITMAP_EXT_DATA_FORK_LEN => "afp.file_bitmap.ex_data_fork_len", "Extended data fork size";
    FILE_BITMAP_LAUNCH_LIMIT => "afp.file_bitmap.launch_limit", "Launch limit";
    FILE_BITMAP_UTF8_NAME => "afp.file_bitmap.UTF8_name", "UTF-8 name";
    FILE_BITMAP_EXT_RSRC_FORK_LEN => "afp.file_bitmap.ex_resource_fork_len", "Extended resource fork size";
    FILE_BITMAP_UNIX_PRIVS => "afp.file_bitmap.unix_privs", "UNIX privileges";

    FILE_ATTRIBUTE => "afp.file_attribute", "File Attributes";
    FILE_ATTRIBUTE_INVISIBLE => "afp.file_attribute.invisible", "Invisible";
    FILE_ATTRIBUTE_MULTI_USER => "afp.file_attribute.multi_user", "Multi user";
    FILE_ATTRIBUTE_SYSTEM => "afp.file_attribute.system", "System";
    FILE_ATTRIBUTE_DF_OPEN => "afp.file_attribute.df_open", "Data fork open";
    FILE_ATTRIBUTE_RF_OPEN => "afp.file_attribute.rf_open", "Resource fork open";
    FILE_ATTRIBUTE_WRITE_INHIBIT => "afp.file_attribute.write_inhibit", "Write inhibit";
    FILE_ATTRIBUTE_BACKUP_NEEDED => "afp.file_attribute.backup_needed", "Backup needed";
    FILE_ATTRIBUTE_RENAME_INHIBIT => "afp.file_attribute.rename_inhibit", "Rename inhibit";
    FILE_ATTRIBUTE_DELETE_INHIBIT => "afp.file_attribute.delete_inhibit", "Delete inhibit";
    FILE_ATTRIBUTE_COPY_PROTECT => "afp.file_attribute.copy_protect", "Copy protect";
    FILE_ATTRIBUTE_SET_CLEAR => "afp.file_attribute.set_clear", "Set";

    DID => "afp.did", "DID";
    DEST_DID => "afp.dest_did", "Destination DID";
    FILE_ID => "afp.file_id", "File ID";
    DIR_OFFSPRING => "afp.dir_offspring", "Offspring";
    DIR_OWNER_ID => "afp.dir_owner_id", "Owner ID";
    DIR_GROUP_ID => "afp.dir_group_id", "Group ID";
    CREATION_DATE => "afp.creation_date", "Creation date";
    MODIFICATION_DATE => "afp.modification_date", "Modification date";
    BACKUP_DATE => "afp.backup_date", "Backup date";
    FINDER_INFO => "afp.finder_info", "Finder info";
    DATA_FORK_LEN => "afp.data_fork_len", "Data fork size";
    RSRC_FORK_LEN => "afp.resource_fork_len", "Resource fork size";
    EXT_DATA_FORK_LEN => "afp.ext_data_fork_len", "Extended data fork size";
    EXT_RSRC_FORK_LEN => "afp.ext_resource_fork_len", "Extended resource fork size";
    UNIX_PRIVS => "afp.unix_privs", "UNIX privileges";
    RESERVED => "afp.reserved", "Reserved";

    DIR_AR => "afp.dir_ar", "Access rights";
    DIR_AR_O_SEARCH => "afp.dir_ar.o_search", "Owner has search access";
    DIR_AR_O_READ => "afp.dir_ar.o_read", "Owner has read access";
    DIR_AR_O_WRITE => "afp.dir_ar.o_write", "Owner has write access";
    DIR_AR_G_SEARCH => "afp.dir_ar.g_search", "Group has search access";
    DIR_AR_G_READ => "afp.dir_ar.g_read", "Group has read access";
    DIR_AR_G_WRITE => "afp.dir_ar.g_write", "Group has write access";
    DIR_AR_E_SEARCH => "afp.dir_ar.e_search", "Everyone has search access";
    DIR_AR_E_READ => "afp.dir_ar.e_read", "Everyone has read access";
    DIR_AR_E_WRITE => "afp.dir_ar.e_write", "Everyone has write access";
    DIR_AR_U_SEARCH => "afp.dir_ar.u_search", "User has search access";
    DIR_AR_U_READ => "afp.dir_ar.u_read", "User has read access";
    DIR_AR_U_WRITE => "afp.dir_ar.u_write", "User has write access";
    DIR_AR_BLANK => "afp.dir_ar.blank", "Blank access right";
    DIR_AR_U_OWN => "afp.dir_ar.u_owner", "User is the owner";

    REQ_COUNT => "afp.req_count", "Req count";
    START_INDEX => "afp.start_index", "Start index";
    MAX_REPLY_SIZE => "afp.reply_size", "Reply size";
    ENUMERATE_RECORD => "afp.enumerate_record", "Record";
    FILE_FLAG => "afp.file_flag", "Dir";
    CREATE_FLAG => "afp.create_flag", "Hard create";
    STRUCT_SIZE => "afp.struct_size", "Struct size";

    PATH => "afp.path", "Path";
    PATH_TYPE => "afp.path_type", "Type";
    PATH_LEN => "afp.path_len", "Len";
    PATH_NAME => "afp.path_name", "Name";

    FROM_FLAG => "afp.flag", "From";
    DT_REF => "afp.dt_ref", "DT ref";
    OFORK => "afp.ofork", "Fork";
    OFORK_LEN => "afp.ofork_len", "New length";
    OFFSET => "afp.offset", "Offset";
    RW_COUNT => "afp.rw_count", "Count";
    NEWLINE_MASK => "afp.newline_mask", "Newline mask";
    NEWLINE_CHAR => "afp.newline_char", "Newline char";
    LAST_WRITTEN => "afp.last_written", "Last written";

    FORK_TYPE => "afp.fork_type", "Resource fork";
    ACCESS_MODE => "afp.access", "Access mode";
    ACCESS_READ => "afp.access.read", "Read";
    ACCESS_WRITE => "afp.access.write", "Write";
    ACCESS_DENY_READ => "afp.access.deny_read", "Deny read";
    ACCESS_DENY_WRITE => "afp.access.deny_write", "Deny write";

    COMMENT => "afp.comment", "Comment";
    FILE_CREATOR => "afp.file_creator", "File creator";
    FILE_TYPE => "afp.file_type", "File type";
    ICON_TYPE => "afp.icon_type", "Icon type";
    ICON_LENGTH => "afp.icon_length", "Size";
    ICON_INDEX => "afp.icon_index", "Index";
    ICON_TAG => "afp.icon_tag", "Tag";
    APPL_INDEX => "afp.appl_index", "Index";
    APPL_TAG => "afp.appl_tag", "Tag";

    LOCK_FLAGS => "afp.lock_flags", "Flags";
    LOCK_OP => "afp.lock_op", "unlock";
    LOCK_FROM => "afp.lock_from", "End";
    LOCK_OFFSET => "afp.lock_offset", "Offset";
    LOCK_LEN => "afp.lock_len", "Length";
    LOCK_RANGE_START => "afp.lock_range_start", "Start";
}
