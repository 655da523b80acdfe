use crate::common::{PageId, PAGE_SIZE};

/// Frame holds one resident page of the pager's cache together with the
/// bookkeeping needed to decide whether it must be written back.
pub struct Frame {
    /// The page held by this frame
    page_id: PageId,
    /// Whether the page has been modified since being read from disk
    is_dirty: bool,
    /// The page bytes
    data: Box<[u8; PAGE_SIZE]>,
}

impl Frame {
    /// Creates a zero-filled frame for the given page.
    pub fn new(page_id: PageId) -> Self {
        Self {
            page_id,
            is_dirty: false,
            data: Box::new([0u8; PAGE_SIZE]),
        }
    }

    /// Returns the page ID stored in this frame.
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Returns whether the page is dirty.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Sets the dirty flag.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.is_dirty = dirty;
    }

    /// Read-only view of the page bytes.
    pub fn data(&self) -> &[u8] {
        &self.data[..]
    }

    /// Mutable view of the page bytes. Marks the frame dirty.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.is_dirty = true;
        &mut self.data[..]
    }

    /// Mutable view of the page bytes for filling from disk; does not
    /// mark the frame dirty.
    pub(crate) fn load_buffer(&mut self) -> &mut [u8] {
        &mut self.data[..]
    }
}
