use std::path::Path;

use tracing::{debug, trace, warn};

use crate::common::{DbError, PageId, Result};
use crate::storage::disk::DiskManager;

use super::Frame;

/// Pager maps the table file into fixed-size pages and caches them in
/// memory. Every page number below `max_pages` has one cache slot, so a page
/// loaded once stays resident until the pager is closed; there is never
/// more than one in-memory copy of a page.
///
/// Pages are loaded lazily on first access and written back only by
/// [`Pager::flush_page`], [`Pager::flush_all_pages`] or [`Pager::close`].
pub struct Pager {
    /// Backing file; `None` once the pager has been closed
    disk_manager: Option<DiskManager>,
    /// Cache slots indexed by page number
    frames: Vec<Option<Frame>>,
    /// One past the highest page number ever referenced
    num_pages: u32,
    /// Hard ceiling on the number of pages
    max_pages: usize,
}

impl Pager {
    /// Opens (or creates) the table file at `path`.
    pub fn open<P: AsRef<Path>>(path: P, max_pages: usize) -> Result<Self> {
        Self::new(DiskManager::new(path)?, max_pages)
    }

    /// Creates a pager on top of an already opened disk manager.
    pub fn new(disk_manager: DiskManager, max_pages: usize) -> Result<Self> {
        let num_pages = disk_manager.get_num_pages();
        if num_pages as usize > max_pages {
            return Err(DbError::CapacityExceeded { max_pages });
        }

        let mut frames = Vec::with_capacity(max_pages);
        frames.resize_with(max_pages, || None);

        debug!(
            path = %disk_manager.get_db_path().display(),
            num_pages,
            max_pages,
            "opened pager"
        );

        Ok(Self {
            disk_manager: Some(disk_manager),
            frames,
            num_pages,
            max_pages,
        })
    }

    /// Returns one past the highest page number ever referenced.
    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Returns the page ceiling.
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Returns how many more pages [`Pager::allocate_page`] can hand out.
    pub fn free_page_count(&self) -> usize {
        self.max_pages.saturating_sub(self.num_pages as usize)
    }

    /// Returns the number of pages currently held in the cache.
    pub fn resident_page_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_some()).count()
    }

    /// Returns whether a resident page has unflushed changes, or `None` if
    /// the page is not resident.
    pub fn is_dirty(&self, page_id: PageId) -> Option<bool> {
        self.frames
            .get(page_id.as_usize())
            .and_then(|slot| slot.as_ref())
            .map(Frame::is_dirty)
    }

    /// Number of pages read from the file since it was opened, or 0 once
    /// the pager is closed.
    pub fn disk_reads(&self) -> u32 {
        self.disk_manager
            .as_ref()
            .map_or(0, DiskManager::get_num_reads)
    }

    /// Number of pages written to the file since it was opened, or 0 once
    /// the pager is closed.
    pub fn disk_writes(&self) -> u32 {
        self.disk_manager
            .as_ref()
            .map_or(0, DiskManager::get_num_writes)
    }

    pub fn is_closed(&self) -> bool {
        self.disk_manager.is_none()
    }

    /// Returns the bytes of a page, loading it from disk if needed.
    pub fn page(&mut self, page_id: PageId) -> Result<&[u8]> {
        Ok(self.fetch(page_id)?.data())
    }

    /// Returns the bytes of a page for modification, loading it from disk if
    /// needed. The page is marked dirty.
    pub fn page_mut(&mut self, page_id: PageId) -> Result<&mut [u8]> {
        Ok(self.fetch(page_id)?.data_mut())
    }

    /// Reserves the next unused page number and returns it. The page starts
    /// zeroed and is not written to disk until it is flushed.
    pub fn allocate_page(&mut self) -> Result<PageId> {
        if self.num_pages as usize >= self.max_pages {
            return Err(DbError::CapacityExceeded {
                max_pages: self.max_pages,
            });
        }

        let page_id = PageId::new(self.num_pages);
        self.fetch(page_id)?.set_dirty(true);
        trace!(page = page_id.as_u32(), "allocated page");

        Ok(page_id)
    }

    /// Writes a resident page to its offset in the file.
    /// Returns false if the page is not resident.
    pub fn flush_page(&mut self, page_id: PageId) -> Result<bool> {
        let disk = self.disk_manager.as_ref().ok_or(DbError::Closed)?;

        match self
            .frames
            .get_mut(page_id.as_usize())
            .and_then(|slot| slot.as_mut())
        {
            Some(frame) => {
                disk.write_page(page_id, frame.data())?;
                frame.set_dirty(false);
                trace!(page = page_id.as_u32(), "flushed page");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Writes every dirty page back to the file and returns how many were
    /// written.
    pub fn flush_all_pages(&mut self) -> Result<usize> {
        let disk = self.disk_manager.as_ref().ok_or(DbError::Closed)?;

        let mut flushed = 0;
        for frame in self.frames.iter_mut().flatten() {
            if frame.is_dirty() {
                disk.write_page(frame.page_id(), frame.data())?;
                frame.set_dirty(false);
                flushed += 1;
            }
        }

        Ok(flushed)
    }

    /// Flushes every dirty page, syncs the file and releases it. Calling
    /// close on an already closed pager does nothing.
    ///
    /// The file handle is released even if flushing fails so that no later
    /// call can write a half-updated node image.
    pub fn close(&mut self) -> Result<()> {
        if self.disk_manager.is_none() {
            return Ok(());
        }

        let flushed = self.flush_all_pages().and_then(|flushed| {
            if let Some(disk) = self.disk_manager.as_ref() {
                disk.sync()?;
            }
            Ok(flushed)
        });

        let disk_reads = self.disk_reads();
        let disk_writes = self.disk_writes();
        self.disk_manager = None;
        self.frames.iter_mut().for_each(|slot| *slot = None);

        let flushed = flushed?;
        debug!(
            flushed,
            num_pages = self.num_pages,
            disk_reads,
            disk_writes,
            "closed pager"
        );
        Ok(())
    }

    fn fetch(&mut self, page_id: PageId) -> Result<&mut Frame> {
        let index = page_id.as_usize();
        if index >= self.max_pages {
            return Err(DbError::PageOutOfBounds(page_id));
        }

        let disk = self.disk_manager.as_ref().ok_or(DbError::Closed)?;
        let slot = &mut self.frames[index];

        if slot.is_none() {
            let mut frame = Frame::new(page_id);
            if page_id.as_u32() < disk.get_num_pages() {
                disk.read_page(page_id, frame.load_buffer())?;
                trace!(page = page_id.as_u32(), "loaded page from disk");
            }
            *slot = Some(frame);

            if page_id.as_u32() >= self.num_pages {
                self.num_pages = page_id.as_u32() + 1;
            }
        }

        slot.as_mut().ok_or(DbError::PageOutOfBounds(page_id))
    }
}

impl Drop for Pager {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "failed to flush pages while dropping pager");
        }
    }
}
