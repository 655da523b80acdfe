//! Integration tests for the disk manager

use std::fs;

use pagedb::common::{PageId, PAGE_SIZE};
use pagedb::storage::disk::DiskManager;
use tempfile::NamedTempFile;

#[test]
fn test_disk_manager_create_file() {
    let temp_file = NamedTempFile::new().unwrap();
    let dm = DiskManager::new(temp_file.path()).unwrap();

    assert_eq!(dm.get_num_pages(), 0);
    assert_eq!(dm.get_num_reads(), 0);
    assert_eq!(dm.get_num_writes(), 0);
    assert_eq!(dm.get_db_path(), temp_file.path());
}

#[test]
fn test_disk_manager_read_write_page() {
    let temp_file = NamedTempFile::new().unwrap();
    let dm = DiskManager::new(temp_file.path()).unwrap();

    // Write pattern
    let mut write_data = [0u8; PAGE_SIZE];
    for (i, byte) in write_data.iter_mut().enumerate() {
        *byte = (i % 256) as u8;
    }
    dm.write_page(PageId::new(0), &write_data).unwrap();

    // Read back
    let mut read_data = [0u8; PAGE_SIZE];
    dm.read_page(PageId::new(0), &mut read_data).unwrap();

    assert_eq!(write_data, read_data);
    assert_eq!(dm.get_num_writes(), 1);
    assert_eq!(dm.get_num_reads(), 1);
}

#[test]
fn test_disk_manager_pages_at_fixed_offsets() {
    let temp_file = NamedTempFile::new().unwrap();
    let dm = DiskManager::new(temp_file.path()).unwrap();

    // Write pages out of order
    for i in [3u32, 0, 2, 1] {
        let data = [i as u8 + 1; PAGE_SIZE];
        dm.write_page(PageId::new(i), &data).unwrap();
    }
    dm.sync().unwrap();

    let bytes = fs::read(temp_file.path()).unwrap();
    assert_eq!(bytes.len(), 4 * PAGE_SIZE);
    for i in 0..4 {
        assert!(bytes[i * PAGE_SIZE..(i + 1) * PAGE_SIZE]
            .iter()
            .all(|&b| b == i as u8 + 1));
    }
}

#[test]
fn test_disk_manager_reopen_counts_pages() {
    let temp_file = NamedTempFile::new().unwrap();

    {
        let dm = DiskManager::new(temp_file.path()).unwrap();
        dm.write_page(PageId::new(4), &[9u8; PAGE_SIZE]).unwrap();
    }

    let dm = DiskManager::new(temp_file.path()).unwrap();
    assert_eq!(dm.get_num_pages(), 5);

    // The hole left before page 4 reads back as zeros
    let mut data = [0xFFu8; PAGE_SIZE];
    dm.read_page(PageId::new(2), &mut data).unwrap();
    assert!(data.iter().all(|&b| b == 0));

    dm.read_page(PageId::new(4), &mut data).unwrap();
    assert!(data.iter().all(|&b| b == 9));
}

#[test]
fn test_disk_manager_partial_trailing_page() {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(temp_file.path(), vec![7u8; PAGE_SIZE + 100]).unwrap();

    let dm = DiskManager::new(temp_file.path()).unwrap();
    assert_eq!(dm.get_num_pages(), 2);

    let mut data = [0u8; PAGE_SIZE];
    dm.read_page(PageId::new(1), &mut data).unwrap();
    assert!(data[..100].iter().all(|&b| b == 7));
    assert!(data[100..].iter().all(|&b| b == 0));
}
