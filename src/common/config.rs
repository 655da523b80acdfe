use super::error::{DbError, Result};

/// Size of a page in bytes (4 KB)
pub const PAGE_SIZE: usize = 4096;

/// Default ceiling on the number of pages a table file may hold
pub const TABLE_MAX_PAGES: usize = 100;

/// Maximum number of bytes in the `username` column
pub const COLUMN_USERNAME_SIZE: usize = 32;

/// Maximum number of bytes in the `email` column
pub const COLUMN_EMAIL_SIZE: usize = 255;

/// Runtime knobs for an open table.
///
/// The defaults reproduce the on-disk format exactly; shrinking
/// `internal_max_keys` only changes when internal nodes split, never how
/// they are laid out, so files stay readable across configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Hard ceiling on the number of pages the pager will hand out.
    pub max_pages: usize,
    /// Number of keys an internal node holds before it splits.
    pub internal_max_keys: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_pages: TABLE_MAX_PAGES,
            internal_max_keys: crate::index::INTERNAL_NODE_MAX_CELLS,
        }
    }
}

impl TableConfig {
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_internal_max_keys(mut self, internal_max_keys: usize) -> Self {
        self.internal_max_keys = internal_max_keys;
        self
    }

    /// Checks that the configuration describes a usable table.
    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 || self.max_pages > u32::MAX as usize {
            return Err(DbError::InvalidConfig(format!(
                "max_pages must be between 1 and {}, got {}",
                u32::MAX,
                self.max_pages
            )));
        }

        let limit = crate::index::INTERNAL_NODE_MAX_CELLS;
        if !(2..=limit).contains(&self.internal_max_keys) {
            return Err(DbError::InvalidConfig(format!(
                "internal_max_keys must be between 2 and {}, got {}",
                limit, self.internal_max_keys
            )));
        }

        Ok(())
    }
}
