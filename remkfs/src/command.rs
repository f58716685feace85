use superblocks::{ExtSuperblock, FsKind, XfsSuperblock};

/// The number of seconds in a day, for presenting the check interval the way
/// tune2fs -i takes it.
const SECONDS_PER_DAY: u32 = 86400;

/// Builds the mkfs invocation that recreates the geometry of an ext2/3/4
/// filesystem: type, revision, label, block size, inode size and RAID hints.
pub fn ext_mkfs_command(cmdname: &str, devname: &str, kind: FsKind, sb: &ExtSuperblock) -> String {
    format!(
        "{} -t {} -q -r {} -L \"{}\" -b {} -I {} -E stride={} -E stripe-width={} {}",
        cmdname,
        kind.name(),
        sb.rev_level,
        sb.label,
        sb.block_size,
        sb.inode_size,
        sb.raid_stride,
        sb.raid_stripe_width,
        devname,
    )
}

/// Builds the tune2fs invocation for the identity settings mkfs does not take:
/// UUID, default mount options, max mount count and check interval.
pub fn ext_tune_command(cmdname: &str, devname: &str, sb: &ExtSuperblock) -> String {
    let mut cmd = format!("{} -U {}", cmdname, sb.uuid);

    let opts = sb.default_mount_opts.join(",");
    if !opts.is_empty() {
        cmd.push_str(&format!(" -o {}", opts));
    }

    cmd.push_str(&format!(" -c {}", sb.max_mnt_count));
    cmd.push_str(&format!(" -i {}", sb.checkinterval / SECONDS_PER_DAY));
    cmd.push(' ');
    cmd.push_str(devname);
    cmd
}

/// Builds the mkfs invocation for an XFS filesystem. Setting the UUID at mkfs
/// time requires xfsprogs 4.3.0 or newer.
pub fn xfs_mkfs_command(cmdname: &str, devname: &str, sb: &XfsSuperblock) -> String {
    format!(
        "{} -t xfs -m uuid={} -f -L \"{}\" -b size={} {}",
        cmdname, sb.uuid, sb.label, sb.block_size, devname,
    )
}
