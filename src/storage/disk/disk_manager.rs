use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use crate::common::{PageId, Result, PAGE_SIZE};

/// DiskManager is responsible for reading and writing pages to/from disk.
/// It manages a single table file; page `n` lives at byte offset
/// `n * PAGE_SIZE` and there is no file header.
pub struct DiskManager {
    /// The table file
    db_file: Mutex<File>,
    /// Path to the table file
    db_path: PathBuf,
    /// Number of pages the file spanned when it was opened, counting a
    /// partial trailing page as a whole one
    num_pages: u32,
    /// Number of disk reads performed
    num_reads: AtomicU32,
    /// Number of disk writes performed
    num_writes: AtomicU32,
}

impl DiskManager {
    /// Opens the table file at the given path, creating it if it doesn't exist.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&db_path)?;

        let file_size = file.metadata()?.len();
        let num_pages = file_size.div_ceil(PAGE_SIZE as u64) as u32;

        Ok(Self {
            db_file: Mutex::new(file),
            db_path: db_path.as_ref().to_path_buf(),
            num_pages,
            num_reads: AtomicU32::new(0),
            num_writes: AtomicU32::new(0),
        })
    }

    /// Reads a page from disk into the provided buffer.
    /// The buffer must be exactly PAGE_SIZE bytes. Bytes past the end of
    /// the file read as zero.
    pub fn read_page(&self, page_id: PageId, data: &mut [u8]) -> Result<()> {
        assert_eq!(data.len(), PAGE_SIZE, "Buffer must be PAGE_SIZE bytes");

        let mut file = self.db_file.lock();
        file.seek(SeekFrom::Start(page_id.file_offset()))?;

        let mut filled = 0;
        while filled < PAGE_SIZE {
            match file.read(&mut data[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        data[filled..].fill(0);

        self.num_reads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Writes a page to disk from the provided buffer, extending the file
    /// if the page lies past its current end.
    pub fn write_page(&self, page_id: PageId, data: &[u8]) -> Result<()> {
        assert_eq!(data.len(), PAGE_SIZE, "Buffer must be PAGE_SIZE bytes");

        let mut file = self.db_file.lock();
        file.seek(SeekFrom::Start(page_id.file_offset()))?;
        file.write_all(data)?;
        file.flush()?;

        self.num_writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Returns the number of pages the file held when it was opened.
    pub fn get_num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Returns the number of disk reads performed.
    pub fn get_num_reads(&self) -> u32 {
        self.num_reads.load(Ordering::Relaxed)
    }

    /// Returns the number of disk writes performed.
    pub fn get_num_writes(&self) -> u32 {
        self.num_writes.load(Ordering::Relaxed)
    }

    /// Returns the path to the table file.
    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Forces written pages down to the storage device.
    pub fn sync(&self) -> Result<()> {
        let file = self.db_file.lock();
        file.sync_all()?;
        Ok(())
    }
}

impl Drop for DiskManager {
    fn drop(&mut self) {
        let file = self.db_file.get_mut();
        let _ = file.sync_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_disk_manager_new() {
        let temp_file = NamedTempFile::new().unwrap();
        let dm = DiskManager::new(temp_file.path()).unwrap();
        assert_eq!(dm.get_num_pages(), 0);
        assert_eq!(dm.get_db_path(), temp_file.path());
    }

    #[test]
    fn test_disk_manager_read_write() {
        let temp_file = NamedTempFile::new().unwrap();
        let dm = DiskManager::new(temp_file.path()).unwrap();

        let mut write_data = [0u8; PAGE_SIZE];
        write_data[0] = 42;
        write_data[100] = 255;
        write_data[PAGE_SIZE - 1] = 128;
        dm.write_page(PageId::new(0), &write_data).unwrap();

        let mut read_data = [0u8; PAGE_SIZE];
        dm.read_page(PageId::new(0), &mut read_data).unwrap();

        assert_eq!(read_data[0], 42);
        assert_eq!(read_data[100], 255);
        assert_eq!(read_data[PAGE_SIZE - 1], 128);
        assert_eq!(dm.get_num_reads(), 1);
        assert_eq!(dm.get_num_writes(), 1);
    }

    #[test]
    fn test_disk_manager_counts_partial_trailing_page() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), vec![7u8; PAGE_SIZE + 10]).unwrap();

        let dm = DiskManager::new(temp_file.path()).unwrap();
        assert_eq!(dm.get_num_pages(), 2);

        let mut data = [0xAAu8; PAGE_SIZE];
        dm.read_page(PageId::new(1), &mut data).unwrap();
        assert!(data[..10].iter().all(|&b| b == 7));
        assert!(data[10..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_disk_manager_read_past_end_is_zeroed() {
        let temp_file = NamedTempFile::new().unwrap();
        let dm = DiskManager::new(temp_file.path()).unwrap();

        let mut data = [0xFFu8; PAGE_SIZE];
        dm.read_page(PageId::new(3), &mut data).unwrap();
        assert!(data.iter().all(|&b| b == 0));
    }
}
