use std::io::{Read, Seek};

use bytefield::{Endian, NullTerminatedString, Uuid};

use crate::{
    read_at,
    types::{FieldValue, FsKind},
    SuperblockError,
};

/// The ext superblock starts 1024 bytes into the device.
const SUPERBLOCK_OFFSET: u64 = 1024;

/// Magic number at offset 56 within the superblock.
const EXT_MAGIC: u16 = 0xEF53;

/// Revision 0 superblocks do not store an inode size; every inode is 128 bytes.
const GOOD_OLD_INODE_SIZE: u16 = 128;

/// Has a journal. Introduced in ext3.
const COMPAT_HAS_JOURNAL: u32 = 0x0004;
/// Has indexed directories. Introduced in ext3.
const COMPAT_DIR_INDEX: u32 = 0x0020;

/// Files use extents.
const INCOMPAT_EXTENTS: u32 = 0x0040;
/// Filesystem size over 2^32 blocks.
const INCOMPAT_64BIT: u32 = 0x0080;
/// Multiple mount protection.
const INCOMPAT_MMP: u32 = 0x0100;
/// Flexible block groups.
const INCOMPAT_FLEX_BG: u32 = 0x0200;
/// Meta block groups.
const INCOMPAT_META_BG: u32 = 0x0010;

/// Files whose space usage is stored in filesystem blocks, not 512-byte sectors.
const RO_COMPAT_HUGE_FILE: u32 = 0x0008;
/// Group descriptors have checksums.
const RO_COMPAT_GDT_CSUM: u32 = 0x0010;
/// The old ext3 32,000 subdirectory limit no longer applies.
const RO_COMPAT_DIR_NLINK: u32 = 0x0020;
/// Large inodes with extra fields exist on this filesystem.
const RO_COMPAT_EXTRA_ISIZE: u32 = 0x0040;
/// Block allocation bitmaps are tracked in units of clusters.
const RO_COMPAT_BIGALLOC: u32 = 0x0200;

/// The default mount option bits, in ascending bit order.
const MOUNT_OPT_NAMES: [(u32, &str); 11] = [
    (0x0001, "debug"),
    (0x0002, "bsdgroups"),
    (0x0004, "user_xattr"),
    (0x0008, "acl"),
    (0x0010, "uid16"),
    (0x0020, "journal_data"),
    (0x0040, "journal_data_ordered"),
    (0x0100, "nobarrier"),
    (0x0200, "block_validity"),
    (0x0400, "discard"),
    (0x0800, "nodelalloc"),
];

/// The 2 bit journal mode sub-field of the mount option word. Both bits set
/// means writeback mode.
const JMODE_MASK: u32 = 0x0060;

/// Decodes a default-mount-options flag word into symbolic option names,
/// ordered by ascending bit position. The journal mode sub-field is handled
/// first: when both of its bits are set, `journal_data_writeback` is emitted
/// and the two bits are withheld from the single-bit scan, so the word never
/// reports writeback and the single-bit journal modes together. A lone
/// `journal_data` or `journal_data_ordered` bit still comes out of the scan.
/// Bits with no table entry are skipped.
pub fn decode_mount_opts(word: u32) -> Vec<&'static str> {
    let mut opts = Vec::new();
    let mut word = word;

    if word & JMODE_MASK == JMODE_MASK {
        opts.push("journal_data_writeback");
        word &= !JMODE_MASK;
    }

    for bit in 0..32 {
        let mask = 1u32 << bit;
        if word & mask == 0 {
            continue;
        }

        if let Some(&(_, name)) = MOUNT_OPT_NAMES.iter().find(|(m, _)| *m == mask) {
            opts.push(name);
        }
    }

    opts
}

/// The fields of an ext2/3/4 superblock needed to recreate the filesystem
/// with matching geometry and identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtSuperblock {
    /// The allocation unit size in bytes.
    pub block_size: u64,
    /// Mounts between forced checks. Negative means never.
    pub max_mnt_count: i16,
    /// Seconds between forced checks.
    pub checkinterval: u32,
    pub rev_level: u32,
    pub inode_size: u16,
    pub uuid: Uuid,
    pub label: String,
    pub default_mount_opts: Vec<&'static str>,
    /// RAID geometry hints, decoded as-is with no revision checks.
    pub raid_stride: u16,
    pub raid_stripe_width: u32,
}

impl ExtSuperblock {
    /// Decodes the superblock from a byte source addressed with absolute
    /// offsets. Every field gets its own seek and read; all ext fields are
    /// little endian. Any short read fails the whole decode.
    pub fn read_from<F: Read + Seek>(source: &mut F) -> Result<Self, SuperblockError> {
        let log_block_size: u32 = read_at(source, SUPERBLOCK_OFFSET + 24, Endian::Little)?;
        let max_mnt_count: i16 = read_at(source, SUPERBLOCK_OFFSET + 54, Endian::Little)?;
        let checkinterval: u32 = read_at(source, SUPERBLOCK_OFFSET + 68, Endian::Little)?;
        let rev_level: u32 = read_at(source, SUPERBLOCK_OFFSET + 76, Endian::Little)?;

        // Revision 0 predates the inode size field, so the bytes at that
        // offset are not read at all.
        let inode_size = if rev_level >= 1 {
            read_at(source, SUPERBLOCK_OFFSET + 88, Endian::Little)?
        } else {
            GOOD_OLD_INODE_SIZE
        };

        let uuid: Uuid = read_at(source, SUPERBLOCK_OFFSET + 104, Endian::Little)?;
        let label: NullTerminatedString<16> = read_at(source, SUPERBLOCK_OFFSET + 120, Endian::Little)?;
        let mount_opts: u32 = read_at(source, SUPERBLOCK_OFFSET + 256, Endian::Little)?;
        let raid_stride: u16 = read_at(source, SUPERBLOCK_OFFSET + 356, Endian::Little)?;
        let raid_stripe_width: u32 = read_at(source, SUPERBLOCK_OFFSET + 368, Endian::Little)?;

        Ok(Self {
            // The log2 field comes straight off the disk and is not validated,
            // so the shift has to tolerate garbage instead of overflowing.
            block_size: 1024u64.checked_shl(log_block_size).unwrap_or(0),
            max_mnt_count,
            checkinterval,
            rev_level,
            inode_size,
            uuid,
            label: label.0,
            default_mount_opts: decode_mount_opts(mount_opts),
            raid_stride,
            raid_stripe_width,
        })
    }

    /// The decoded record as ordered name/value pairs. The filesystem type tag
    /// is not included; the caller merges it in.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("block_size", FieldValue::Int(self.block_size as i64)),
            ("max_mnt_count", FieldValue::Int(self.max_mnt_count as i64)),
            ("checkinterval", FieldValue::Int(self.checkinterval as i64)),
            ("rev_level", FieldValue::Int(self.rev_level as i64)),
            ("inode_size", FieldValue::Int(self.inode_size as i64)),
            ("uuid", FieldValue::Text(self.uuid.to_string())),
            ("label", FieldValue::Text(self.label.clone())),
            ("default_mount_opts", FieldValue::Text(self.default_mount_opts.join(","))),
            ("raid_stride", FieldValue::Int(self.raid_stride as i64)),
            ("raid_stripe_width", FieldValue::Int(self.raid_stripe_width as i64)),
        ]
    }
}

/// Checks the device for the ext magic and classifies the filesystem.
/// EXT2/3/4 are basically the same filesystem with different features, so the
/// feature words decide: anything introduced by a later generation implies
/// that generation.
pub(crate) fn probe<F: Read + Seek>(source: &mut F) -> Result<Option<FsKind>, SuperblockError> {
    let magic: u16 = match read_at(source, SUPERBLOCK_OFFSET + 56, Endian::Little) {
        Ok(magic) => magic,
        Err(SuperblockError::TruncatedRead { .. }) => return Ok(None),
        Err(err) => return Err(err),
    };

    if magic != EXT_MAGIC {
        return Ok(None);
    }

    let feature_compat: u32 = read_at(source, SUPERBLOCK_OFFSET + 92, Endian::Little)?;
    let feature_incompat: u32 = read_at(source, SUPERBLOCK_OFFSET + 96, Endian::Little)?;
    let feature_ro_compat: u32 = read_at(source, SUPERBLOCK_OFFSET + 100, Endian::Little)?;

    let ext4_ro_features = [
        RO_COMPAT_HUGE_FILE,
        RO_COMPAT_GDT_CSUM,
        RO_COMPAT_DIR_NLINK,
        RO_COMPAT_EXTRA_ISIZE,
        RO_COMPAT_BIGALLOC,
    ];
    let ext4_incompat_features = [
        INCOMPAT_EXTENTS,
        INCOMPAT_64BIT,
        INCOMPAT_MMP,
        INCOMPAT_FLEX_BG,
        INCOMPAT_META_BG,
    ];
    let ext3_compat_features = [COMPAT_HAS_JOURNAL, COMPAT_DIR_INDEX];

    if has_any(feature_ro_compat, &ext4_ro_features) || has_any(feature_incompat, &ext4_incompat_features) {
        Ok(Some(FsKind::Ext4))
    } else if has_any(feature_compat, &ext3_compat_features) {
        Ok(Some(FsKind::Ext3))
    } else {
        Ok(Some(FsKind::Ext2))
    }
}

/// Returns true if val has any of the features in features.
fn has_any(val: u32, features: &[u32]) -> bool {
    features.iter().any(|feature| val & feature != 0)
}
