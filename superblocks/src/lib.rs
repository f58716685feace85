mod ext;
mod types;
mod xfs;

use std::{
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use bytefield::{Endian, ReadFromWithEndian};
use thiserror::Error;

pub use bytefield::Uuid;
pub use ext::{decode_mount_opts, ExtSuperblock};
pub use types::{FieldValue, FsKind};
pub use xfs::XfsSuperblock;

#[derive(Debug, Error)]
pub enum SuperblockError {
    /// The byte window at the given offset could not be fully read. The device
    /// is shorter than the superblock layout requires.
    #[error("truncated read at offset {offset}")]
    TruncatedRead { offset: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Seeks to an absolute offset and decodes one field with the given byte order.
/// A short read becomes `TruncatedRead`; any other failure stays an I/O error.
pub(crate) fn read_at<F, T>(source: &mut F, offset: u64, endian: Endian) -> Result<T, SuperblockError>
where
    F: Read + Seek,
    T: ReadFromWithEndian,
{
    source.seek(SeekFrom::Start(offset))?;
    T::read_from_with_endian(source, endian).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => SuperblockError::TruncatedRead { offset },
        _ => SuperblockError::Io(err),
    })
}

/// A device that may contain a filesystem.
pub struct Device {
    /// The absolute path to the device.
    path: PathBuf,
}

impl Device {
    /// Creates a new device from the given path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Trys to probe the device to work out what type of filesystem it contains,
    /// by checking the magic number of each supported family in turn. A device
    /// too short to hold a family's magic is simply not that family.
    pub fn probe(&self) -> Result<Option<FsKind>, SuperblockError> {
        let mut file = File::open(&self.path)?;

        if let Some(kind) = ext::probe(&mut file)? {
            Ok(Some(kind))
        } else if let Some(kind) = xfs::probe(&mut file)? {
            Ok(Some(kind))
        } else {
            Ok(None)
        }
    }

    /// Decodes the ext2/3/4 superblock on the device. The file is open only for
    /// the duration of this call.
    pub fn read_ext(&self) -> Result<ExtSuperblock, SuperblockError> {
        let mut file = File::open(&self.path)?;
        ExtSuperblock::read_from(&mut file)
    }

    /// Decodes the XFS superblock on the device.
    pub fn read_xfs(&self) -> Result<XfsSuperblock, SuperblockError> {
        let mut file = File::open(&self.path)?;
        XfsSuperblock::read_from(&mut file)
    }
}
