use std::io::{Read, Seek};

use bytefield::{Endian, NullTerminatedString, Uuid};

use crate::{
    read_at,
    types::{FieldValue, FsKind},
    SuperblockError,
};

/// XFS magic "XFSB", at the very start of the device.
const XFS_MAGIC: u32 = 0x5846_5342;

/// The fields of an XFS superblock needed to recreate the filesystem.
#[derive(Debug, Clone, PartialEq)]
pub struct XfsSuperblock {
    pub block_size: u32,
    pub uuid: Uuid,
    pub label: String,
}

impl XfsSuperblock {
    /// Decodes the XFS superblock, which sits at offset 0. In contrast to the
    /// ext layout, every XFS integer field is big endian.
    pub fn read_from<F: Read + Seek>(source: &mut F) -> Result<Self, SuperblockError> {
        let block_size: u32 = read_at(source, 4, Endian::Big)?;
        let uuid: Uuid = read_at(source, 32, Endian::Big)?;
        let label: NullTerminatedString<12> = read_at(source, 108, Endian::Big)?;

        Ok(Self {
            block_size,
            uuid,
            label: label.0,
        })
    }

    /// The decoded record as ordered name/value pairs. The filesystem type tag
    /// is not included; the caller merges it in.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("block_size", FieldValue::Int(self.block_size as i64)),
            ("uuid", FieldValue::Text(self.uuid.to_string())),
            ("label", FieldValue::Text(self.label.clone())),
        ]
    }
}

/// Checks the device for the XFS magic.
pub(crate) fn probe<F: Read + Seek>(source: &mut F) -> Result<Option<FsKind>, SuperblockError> {
    let magic: u32 = match read_at(source, 0, Endian::Big) {
        Ok(magic) => magic,
        Err(SuperblockError::TruncatedRead { .. }) => return Ok(None),
        Err(err) => return Err(err),
    };

    Ok((magic == XFS_MAGIC).then_some(FsKind::Xfs))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn xfs_image() -> Vec<u8> {
        let mut image = vec![0u8; 512];
        image[..4].copy_from_slice(b"XFSB");
        image[4..8].copy_from_slice(&[0x00, 0x00, 0x10, 0x00]);
        image[32..48].copy_from_slice(&[
            0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,
        ]);
        image[108..113].copy_from_slice(b"data\0");
        image
    }

    #[test]
    fn test_decode_superblock() {
        let superblock = XfsSuperblock::read_from(&mut Cursor::new(xfs_image())).unwrap();

        assert_eq!(superblock.block_size, 4096);
        assert_eq!(superblock.uuid.to_string(), "00010203-0405-0607-0809-0a0b0c0d0e0f");
        assert_eq!(superblock.label, "data");
    }

    #[test]
    fn test_block_size_is_big_endian() {
        let mut image = xfs_image();
        image[4..8].copy_from_slice(&[0x00, 0x00, 0x02, 0x00]);

        let superblock = XfsSuperblock::read_from(&mut Cursor::new(image)).unwrap();
        assert_eq!(superblock.block_size, 512);
    }

    #[test]
    fn test_label_without_nul_keeps_full_width() {
        let mut image = xfs_image();
        image[108..120].copy_from_slice(b"exactly12chr");

        let superblock = XfsSuperblock::read_from(&mut Cursor::new(image)).unwrap();
        assert_eq!(superblock.label, "exactly12chr");
    }

    #[test]
    fn test_short_image_fails() {
        let image = xfs_image();
        let err = XfsSuperblock::read_from(&mut Cursor::new(&image[..64])).unwrap_err();
        assert!(matches!(err, SuperblockError::TruncatedRead { offset: 108 }));
    }

    #[test]
    fn test_probe() {
        assert_eq!(probe(&mut Cursor::new(xfs_image())).unwrap(), Some(FsKind::Xfs));
        assert_eq!(probe(&mut Cursor::new(vec![0u8; 512])).unwrap(), None);
    }
}
