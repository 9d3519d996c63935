//! Mounted filesystem usage.

use sysinfo::Disks;
use tm_core::state::DiskSnapshot;

/// Filesystems that never back a real disk.
pub const PSEUDO_FILESYSTEMS: [&str; 3] = ["squashfs", "tmpfs", "devtmpfs"];

pub fn is_pseudo_fs(fs_type: &str) -> bool {
    PSEUDO_FILESYSTEMS.contains(&fs_type)
}

/// Enumerate mounted partitions, excluding pseudo filesystems.
pub fn read_partitions() -> Vec<DiskSnapshot> {
    let disks = Disks::new_with_refreshed_list();
    let snapshots: Vec<DiskSnapshot> = disks
        .iter()
        .map(|d| {
            DiskSnapshot::new(
                d.name().to_string_lossy().into_owned(),
                d.mount_point().to_string_lossy().into_owned(),
                d.file_system().to_string_lossy().into_owned(),
                d.total_space(),
                d.available_space(),
            )
        })
        .collect();
    keep_real(snapshots)
}

/// Drop pseudo filesystems, preserving enumeration order.
pub fn keep_real(partitions: Vec<DiskSnapshot>) -> Vec<DiskSnapshot> {
    partitions
        .into_iter()
        .filter(|d| !is_pseudo_fs(&d.fs_type))
        .collect()
}
