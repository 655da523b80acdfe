use std::fmt;

/// Page identifier type - uniquely identifies a page in the table file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// The page that always holds the root node.
    pub const ROOT: PageId = PageId(0);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Byte offset of this page within the table file.
    pub fn file_offset(&self) -> u64 {
        (self.0 as u64) * (super::PAGE_SIZE as u64)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageId({})", self.0)
    }
}

/// Sentinel stored in on-disk page pointers that point nowhere
pub const INVALID_PAGE_ID: PageId = PageId(u32::MAX);
