use crate::common::{DbError, PageId, Result};
use crate::tuple::Row;

use super::btree_index::BTreeIndex;
use super::btree_page::{node_type, LeafNode, NodeType};

/// A position in the tree: a cell of a leaf page.
///
/// A cursor is only meaningful for the tree it was created on and only until
/// the next insert; splits move cells between pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    page_id: PageId,
    cell_index: usize,
    end_of_table: bool,
}

impl Cursor {
    /// Positions a cursor on the first cell of the leftmost leaf.
    pub fn table_start(index: &mut BTreeIndex) -> Result<Self> {
        let page_id = index.leftmost_leaf(index.root_page_id())?;
        let num_cells = leaf_at(index, page_id)?.num_cells();

        Ok(Self {
            page_id,
            cell_index: 0,
            end_of_table: num_cells == 0,
        })
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn cell_index(&self) -> usize {
        self.cell_index
    }

    pub fn is_end(&self) -> bool {
        self.end_of_table
    }

    /// Decodes the row under the cursor.
    pub fn row(&self, index: &mut BTreeIndex) -> Result<Row> {
        let leaf = leaf_at(index, self.page_id)?;
        if self.end_of_table || self.cell_index >= leaf.num_cells() {
            return Err(DbError::Corrupted(format!(
                "cursor at cell {} of {} is past the last row",
                self.cell_index, self.page_id
            )));
        }
        Row::decode(leaf.value(self.cell_index))
    }

    /// Moves to the next cell, crossing into the next leaf when this one is
    /// exhausted. Sets the end-of-table flag after the last cell of the last
    /// leaf.
    pub fn advance(&mut self, index: &mut BTreeIndex) -> Result<()> {
        if self.end_of_table {
            return Ok(());
        }

        self.cell_index += 1;
        loop {
            if self.cell_index < leaf_at(index, self.page_id)?.num_cells() {
                return Ok(());
            }

            match index.next_leaf(self.page_id)? {
                Some(next) => {
                    self.page_id = next;
                    self.cell_index = 0;
                }
                None => {
                    self.end_of_table = true;
                    return Ok(());
                }
            }
        }
    }
}

fn leaf_at(index: &mut BTreeIndex, page_id: PageId) -> Result<LeafNode<&[u8]>> {
    let data = index.pager_mut().page(page_id)?;
    match node_type(data)? {
        NodeType::Leaf => Ok(LeafNode::new(data)),
        NodeType::Internal => Err(DbError::Corrupted(format!(
            "cursor expected {page_id} to be a leaf"
        ))),
    }
}

/// Iterator over every row of the tree in ascending key order.
///
/// The sequence is consumed as it is read; start a new iterator to scan
/// again. An error ends the iteration after it is yielded.
pub struct BTreeIterator<'a> {
    index: &'a mut BTreeIndex,
    cursor: Cursor,
}

impl<'a> BTreeIterator<'a> {
    pub fn new(index: &'a mut BTreeIndex, cursor: Cursor) -> Self {
        Self { index, cursor }
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        if self.cursor.is_end() {
            return Ok(None);
        }

        let row = self.cursor.row(self.index)?;
        self.cursor.advance(self.index)?;
        Ok(Some(row))
    }
}

impl Iterator for BTreeIterator<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(e) => {
                self.cursor.end_of_table = true;
                Some(Err(e))
            }
        }
    }
}
