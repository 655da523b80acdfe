use std::path::Path;

use tracing::debug;

use crate::buffer::Pager;
use crate::common::{Result, TableConfig};
use crate::index::{BTreeIndex, BTreeIterator};
use crate::tuple::Row;

/// An open table file.
///
/// `Table` owns the whole engine state for one file; every operation goes
/// through `&mut self`, so there is exactly one writer. Dropping the handle
/// closes it, but call [`Table::close`] to see flush errors.
pub struct Table {
    index: BTreeIndex,
    config: TableConfig,
}

impl Table {
    /// Opens the table stored at `path` with the default configuration,
    /// creating an empty table if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, TableConfig::default())
    }

    pub fn open_with_config<P: AsRef<Path>>(path: P, config: TableConfig) -> Result<Self> {
        config.validate()?;

        let pager = Pager::open(path.as_ref(), config.max_pages)?;
        let index = BTreeIndex::open(pager, &config)?;
        debug!(
            path = %path.as_ref().display(),
            num_pages = index.pager().num_pages(),
            "opened table"
        );

        Ok(Self { index, config })
    }

    /// Validates and inserts a row. Invalid values are rejected before the
    /// table is touched.
    pub fn insert_values(&mut self, id: i64, username: &str, email: &str) -> Result<()> {
        let row = Row::new(id, username, email)?;
        self.insert(&row)
    }

    /// Inserts an already validated row.
    pub fn insert(&mut self, row: &Row) -> Result<()> {
        self.index.insert(row)
    }

    /// Looks up a single row by id.
    pub fn find(&mut self, id: u32) -> Result<Option<Row>> {
        self.index.get(id)
    }

    /// Returns every row in ascending id order.
    pub fn select_all(&mut self) -> Result<BTreeIterator<'_>> {
        self.index.iter()
    }

    /// Renders the B-tree for diagnostics.
    pub fn render_tree(&mut self) -> Result<String> {
        self.index.render_tree()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Number of pages the table file spans, counting pages not yet flushed.
    pub fn num_pages(&self) -> u32 {
        self.index.pager().num_pages()
    }

    pub fn is_closed(&self) -> bool {
        self.index.pager().is_closed()
    }

    /// Flushes every modified page and releases the file. Closing twice is a
    /// no-op; any other operation on a closed table fails with
    /// [`crate::DbError::Closed`].
    pub fn close(&mut self) -> Result<()> {
        self.index.close()
    }
}
