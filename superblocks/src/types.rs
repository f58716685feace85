use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// A filesystem family whose superblock can be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsKind {
    Ext2,
    Ext3,
    Ext4,
    Xfs,
}

impl FsKind {
    /// The name of the filesystem as mkfs knows it (e.g. "ext4").
    pub fn name(&self) -> &'static str {
        match self {
            FsKind::Ext2 => "ext2",
            FsKind::Ext3 => "ext3",
            FsKind::Ext4 => "ext4",
            FsKind::Xfs => "xfs",
        }
    }

    /// Returns true for the ext2/3/4 family.
    pub fn is_ext(&self) -> bool {
        !matches!(self, FsKind::Xfs)
    }
}

impl Display for FsKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FsKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ext2" => Ok(FsKind::Ext2),
            "ext3" => Ok(FsKind::Ext3),
            "ext4" => Ok(FsKind::Ext4),
            "xfs" => Ok(FsKind::Xfs),
            _ => Err(format!("{} is not a supported filesystem type", s)),
        }
    }
}

/// A single decoded superblock field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(value) => write!(f, "{}", value),
            FieldValue::Text(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in [FsKind::Ext2, FsKind::Ext3, FsKind::Ext4, FsKind::Xfs] {
            assert_eq!(kind.name().parse::<FsKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        assert!("btrfs".parse::<FsKind>().is_err());
    }
}
