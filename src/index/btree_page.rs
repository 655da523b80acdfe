//! Typed views over B-tree node pages.
//!
//! A view borrows a page buffer for the duration of one operation. Read
//! accessors work on any `B: AsRef<[u8]>`, mutators additionally need
//! `B: AsMut<[u8]>`, so `LeafNode<&[u8]>` is read-only and
//! `LeafNode<&mut [u8]>` can write.
//!
//! ## Node Layout
//!
//! ```text
//! common header (6 bytes)
//! +-----------+-----------+----------------+
//! | node_type | is_root   | parent_pointer |
//! | u8        | u8        | u32            |
//! +-----------+-----------+----------------+
//!
//! leaf:      header + num_cells u32                 = 10 bytes
//!            cells { key u32, row [u8; ROW_SIZE] }  = 297 bytes each
//!
//! internal:  header + num_keys u32 + right_child u32 = 14 bytes
//!            cells { child u32, key u32 }           = 8 bytes each
//! ```
//!
//! All integers are little-endian. In an internal node key `i` is the
//! largest key in the subtree under child `i`; larger keys live under the
//! right child.

use std::fmt;

use crate::common::{DbError, PageId, Result, INVALID_PAGE_ID, PAGE_SIZE};
use crate::tuple::ROW_SIZE;

const NODE_TYPE_SIZE: usize = 1;
const NODE_TYPE_OFFSET: usize = 0;
const IS_ROOT_SIZE: usize = 1;
const IS_ROOT_OFFSET: usize = NODE_TYPE_OFFSET + NODE_TYPE_SIZE;
const PARENT_POINTER_SIZE: usize = 4;
const PARENT_POINTER_OFFSET: usize = IS_ROOT_OFFSET + IS_ROOT_SIZE;
pub const COMMON_NODE_HEADER_SIZE: usize = NODE_TYPE_SIZE + IS_ROOT_SIZE + PARENT_POINTER_SIZE;

const LEAF_NODE_NUM_CELLS_SIZE: usize = 4;
const LEAF_NODE_NUM_CELLS_OFFSET: usize = COMMON_NODE_HEADER_SIZE;
pub const LEAF_NODE_HEADER_SIZE: usize = COMMON_NODE_HEADER_SIZE + LEAF_NODE_NUM_CELLS_SIZE;

pub const LEAF_NODE_KEY_SIZE: usize = 4;
pub const LEAF_NODE_VALUE_SIZE: usize = ROW_SIZE;
pub const LEAF_NODE_CELL_SIZE: usize = LEAF_NODE_KEY_SIZE + LEAF_NODE_VALUE_SIZE;
pub const LEAF_NODE_SPACE_FOR_CELLS: usize = PAGE_SIZE - LEAF_NODE_HEADER_SIZE;
pub const LEAF_NODE_MAX_CELLS: usize = LEAF_NODE_SPACE_FOR_CELLS / LEAF_NODE_CELL_SIZE;

const INTERNAL_NODE_NUM_KEYS_SIZE: usize = 4;
const INTERNAL_NODE_NUM_KEYS_OFFSET: usize = COMMON_NODE_HEADER_SIZE;
const INTERNAL_NODE_RIGHT_CHILD_SIZE: usize = 4;
const INTERNAL_NODE_RIGHT_CHILD_OFFSET: usize =
    INTERNAL_NODE_NUM_KEYS_OFFSET + INTERNAL_NODE_NUM_KEYS_SIZE;
pub const INTERNAL_NODE_HEADER_SIZE: usize =
    COMMON_NODE_HEADER_SIZE + INTERNAL_NODE_NUM_KEYS_SIZE + INTERNAL_NODE_RIGHT_CHILD_SIZE;

const INTERNAL_NODE_CHILD_SIZE: usize = 4;
const INTERNAL_NODE_KEY_SIZE: usize = 4;
pub const INTERNAL_NODE_CELL_SIZE: usize = INTERNAL_NODE_CHILD_SIZE + INTERNAL_NODE_KEY_SIZE;
pub const INTERNAL_NODE_MAX_CELLS: usize =
    (PAGE_SIZE - INTERNAL_NODE_HEADER_SIZE) / INTERNAL_NODE_CELL_SIZE;

fn read_u32(data: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

fn write_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Internal = 0,
    Leaf = 1,
}

impl TryFrom<u8> for NodeType {
    type Error = DbError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(NodeType::Internal),
            1 => Ok(NodeType::Leaf),
            other => Err(DbError::Corrupted(format!("unknown node type {other}"))),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Internal => write!(f, "internal"),
            NodeType::Leaf => write!(f, "leaf"),
        }
    }
}

/// View of the header fields every node shares.
pub struct NodeHeader<B> {
    data: B,
}

impl<B: AsRef<[u8]>> NodeHeader<B> {
    pub fn new(data: B) -> Self {
        assert_eq!(data.as_ref().len(), PAGE_SIZE);
        Self { data }
    }

    pub fn node_type(&self) -> Result<NodeType> {
        NodeType::try_from(self.data.as_ref()[NODE_TYPE_OFFSET])
    }

    pub fn is_root(&self) -> bool {
        self.data.as_ref()[IS_ROOT_OFFSET] == 1
    }

    pub fn parent(&self) -> Option<PageId> {
        let value = read_u32(self.data.as_ref(), PARENT_POINTER_OFFSET);
        (value != INVALID_PAGE_ID.as_u32()).then_some(PageId::new(value))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> NodeHeader<B> {
    pub fn set_node_type(&mut self, node_type: NodeType) {
        self.data.as_mut()[NODE_TYPE_OFFSET] = node_type as u8;
    }

    pub fn set_root(&mut self, is_root: bool) {
        self.data.as_mut()[IS_ROOT_OFFSET] = u8::from(is_root);
    }

    pub fn set_parent(&mut self, parent: Option<PageId>) {
        let value = parent.unwrap_or(INVALID_PAGE_ID).as_u32();
        write_u32(self.data.as_mut(), PARENT_POINTER_OFFSET, value);
    }
}

/// One `(key, row bytes)` entry of a leaf node.
#[derive(Clone)]
pub struct LeafCell {
    pub key: u32,
    pub value: [u8; ROW_SIZE],
}

impl LeafCell {
    pub fn new(key: u32, value: &[u8]) -> Self {
        let mut bytes = [0u8; ROW_SIZE];
        bytes.copy_from_slice(&value[..ROW_SIZE]);
        Self { key, value: bytes }
    }
}

impl fmt::Debug for LeafCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafCell").field("key", &self.key).finish()
    }
}

pub struct LeafNode<B> {
    data: B,
}

impl<B: AsRef<[u8]>> LeafNode<B> {
    pub fn new(data: B) -> Self {
        assert_eq!(data.as_ref().len(), PAGE_SIZE);
        Self { data }
    }

    pub fn header(&self) -> NodeHeader<&[u8]> {
        NodeHeader::new(self.data.as_ref())
    }

    pub fn num_cells(&self) -> usize {
        read_u32(self.data.as_ref(), LEAF_NODE_NUM_CELLS_OFFSET) as usize
    }

    pub fn is_full(&self) -> bool {
        self.num_cells() >= LEAF_NODE_MAX_CELLS
    }

    pub fn key(&self, index: usize) -> u32 {
        read_u32(self.data.as_ref(), Self::cell_offset(index))
    }

    /// Serialized row stored in cell `index`.
    pub fn value(&self, index: usize) -> &[u8] {
        let offset = Self::cell_offset(index) + LEAF_NODE_KEY_SIZE;
        &self.data.as_ref()[offset..offset + LEAF_NODE_VALUE_SIZE]
    }

    pub fn cell(&self, index: usize) -> LeafCell {
        LeafCell::new(self.key(index), self.value(index))
    }

    pub fn cells(&self) -> Vec<LeafCell> {
        (0..self.num_cells()).map(|i| self.cell(i)).collect()
    }

    /// Binary search for `key`. Returns the index of the cell holding it, or
    /// the index it would have to be inserted at to keep the cells sorted.
    pub fn find_key_position(&self, key: u32) -> usize {
        let mut left = 0;
        let mut right = self.num_cells();

        while left < right {
            let mid = left + (right - left) / 2;
            let mid_key = self.key(mid);

            if mid_key == key {
                return mid;
            }
            if mid_key < key {
                left = mid + 1;
            } else {
                right = mid;
            }
        }

        left
    }

    fn cell_offset(index: usize) -> usize {
        LEAF_NODE_HEADER_SIZE + index * LEAF_NODE_CELL_SIZE
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> LeafNode<B> {
    /// Formats the page as an empty leaf.
    pub fn init(&mut self, is_root: bool, parent: Option<PageId>) {
        self.data.as_mut().fill(0);
        let mut header = self.header_mut();
        header.set_node_type(NodeType::Leaf);
        header.set_root(is_root);
        header.set_parent(parent);
        self.set_num_cells(0);
    }

    pub fn header_mut(&mut self) -> NodeHeader<&mut [u8]> {
        NodeHeader::new(self.data.as_mut())
    }

    pub fn set_num_cells(&mut self, num_cells: usize) {
        write_u32(self.data.as_mut(), LEAF_NODE_NUM_CELLS_OFFSET, num_cells as u32);
    }

    /// Overwrites cell `index` without touching the cell count.
    pub fn set_cell(&mut self, index: usize, key: u32, value: &[u8]) {
        let offset = Self::cell_offset(index);
        let data = self.data.as_mut();
        write_u32(data, offset, key);
        let value_offset = offset + LEAF_NODE_KEY_SIZE;
        data[value_offset..value_offset + LEAF_NODE_VALUE_SIZE]
            .copy_from_slice(&value[..LEAF_NODE_VALUE_SIZE]);
    }

    /// Inserts a cell at `index`, shifting later cells right by one.
    ///
    /// # Panics
    /// Panics if the node is full or `index` is past the last cell.
    pub fn insert_cell(&mut self, index: usize, key: u32, value: &[u8]) {
        let num_cells = self.num_cells();
        assert!(num_cells < LEAF_NODE_MAX_CELLS, "leaf node is full");
        assert!(index <= num_cells, "cell index {index} out of range");

        let start = Self::cell_offset(index);
        let end = Self::cell_offset(num_cells);
        self.data
            .as_mut()
            .copy_within(start..end, start + LEAF_NODE_CELL_SIZE);

        self.set_cell(index, key, value);
        self.set_num_cells(num_cells + 1);
    }

    /// Removes the cell at `index`, shifting later cells left by one.
    ///
    /// # Panics
    /// Panics if `index` is not a cell of this node.
    pub fn remove_cell(&mut self, index: usize) -> LeafCell {
        let num_cells = self.num_cells();
        assert!(index < num_cells, "cell index {index} out of range");

        let removed = self.cell(index);
        let start = Self::cell_offset(index + 1);
        let end = Self::cell_offset(num_cells);
        self.data
            .as_mut()
            .copy_within(start..end, start - LEAF_NODE_CELL_SIZE);
        self.set_num_cells(num_cells - 1);

        removed
    }

    /// Replaces the node's cells with `cells`.
    pub fn write_cells(&mut self, cells: &[LeafCell]) {
        assert!(cells.len() <= LEAF_NODE_MAX_CELLS, "too many cells for a leaf");
        for (i, cell) in cells.iter().enumerate() {
            self.set_cell(i, cell.key, &cell.value);
        }
        self.set_num_cells(cells.len());
    }
}

pub struct InternalNode<B> {
    data: B,
}

impl<B: AsRef<[u8]>> InternalNode<B> {
    pub fn new(data: B) -> Self {
        assert_eq!(data.as_ref().len(), PAGE_SIZE);
        Self { data }
    }

    pub fn header(&self) -> NodeHeader<&[u8]> {
        NodeHeader::new(self.data.as_ref())
    }

    pub fn num_keys(&self) -> usize {
        read_u32(self.data.as_ref(), INTERNAL_NODE_NUM_KEYS_OFFSET) as usize
    }

    pub fn right_child(&self) -> PageId {
        PageId::new(read_u32(
            self.data.as_ref(),
            INTERNAL_NODE_RIGHT_CHILD_OFFSET,
        ))
    }

    pub fn key(&self, index: usize) -> u32 {
        read_u32(
            self.data.as_ref(),
            Self::cell_offset(index) + INTERNAL_NODE_CHILD_SIZE,
        )
    }

    /// Child `index`, where `index == num_keys()` names the right child.
    pub fn child(&self, index: usize) -> PageId {
        if index == self.num_keys() {
            self.right_child()
        } else {
            PageId::new(read_u32(self.data.as_ref(), Self::cell_offset(index)))
        }
    }

    /// All `num_keys() + 1` children, right child last.
    pub fn children(&self) -> Vec<PageId> {
        (0..=self.num_keys()).map(|i| self.child(i)).collect()
    }

    pub fn keys(&self) -> Vec<u32> {
        (0..self.num_keys()).map(|i| self.key(i)).collect()
    }

    /// Index of the child whose subtree may contain `key`: the first child
    /// whose key is `>= key`, or the right child if there is none.
    pub fn find_child_index(&self, key: u32) -> usize {
        let mut left = 0;
        let mut right = self.num_keys();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.key(mid) >= key {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        left
    }

    pub fn find_child_for_key(&self, key: u32) -> PageId {
        self.child(self.find_child_index(key))
    }

    /// Position of `child` among this node's children.
    pub fn child_index_of(&self, child: PageId) -> Option<usize> {
        (0..=self.num_keys()).find(|&i| self.child(i) == child)
    }

    fn cell_offset(index: usize) -> usize {
        INTERNAL_NODE_HEADER_SIZE + index * INTERNAL_NODE_CELL_SIZE
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> InternalNode<B> {
    /// Formats the page as an internal node with no keys.
    pub fn init(&mut self, is_root: bool, parent: Option<PageId>, right_child: PageId) {
        self.data.as_mut().fill(0);
        let mut header = self.header_mut();
        header.set_node_type(NodeType::Internal);
        header.set_root(is_root);
        header.set_parent(parent);
        self.set_num_keys(0);
        self.set_right_child(right_child);
    }

    pub fn header_mut(&mut self) -> NodeHeader<&mut [u8]> {
        NodeHeader::new(self.data.as_mut())
    }

    pub fn set_num_keys(&mut self, num_keys: usize) {
        write_u32(
            self.data.as_mut(),
            INTERNAL_NODE_NUM_KEYS_OFFSET,
            num_keys as u32,
        );
    }

    pub fn set_right_child(&mut self, child: PageId) {
        write_u32(
            self.data.as_mut(),
            INTERNAL_NODE_RIGHT_CHILD_OFFSET,
            child.as_u32(),
        );
    }

    pub fn set_key(&mut self, index: usize, key: u32) {
        write_u32(
            self.data.as_mut(),
            Self::cell_offset(index) + INTERNAL_NODE_CHILD_SIZE,
            key,
        );
    }

    /// Sets child `index`, where `index == num_keys()` names the right child.
    pub fn set_child(&mut self, index: usize, child: PageId) {
        if index == self.num_keys() {
            self.set_right_child(child);
        } else {
            write_u32(self.data.as_mut(), Self::cell_offset(index), child.as_u32());
        }
    }

    /// Inserts a `(child, key)` cell at `index`, shifting later cells right.
    ///
    /// # Panics
    /// Panics if the page has no room for another cell or `index` is past
    /// the last cell.
    pub fn insert_cell(&mut self, index: usize, child: PageId, key: u32) {
        let num_keys = self.num_keys();
        assert!(num_keys < INTERNAL_NODE_MAX_CELLS, "internal node is full");
        assert!(index <= num_keys, "cell index {index} out of range");

        let start = Self::cell_offset(index);
        let end = Self::cell_offset(num_keys);
        self.data
            .as_mut()
            .copy_within(start..end, start + INTERNAL_NODE_CELL_SIZE);

        write_u32(self.data.as_mut(), start, child.as_u32());
        self.set_key(index, key);
        self.set_num_keys(num_keys + 1);
    }

    /// Removes child `index` together with one key, shifting later cells
    /// left, and returns the removed child.
    ///
    /// For `index < num_keys()` the cell `(child, key)` at `index` goes. For
    /// `index == num_keys()` the right child goes: the last cell's child
    /// becomes the right child and the last key is dropped.
    ///
    /// # Panics
    /// Panics if the node has no keys or `index` is past the right child.
    pub fn remove_cell(&mut self, index: usize) -> PageId {
        let num_keys = self.num_keys();
        assert!(num_keys > 0, "internal node has no cell to remove");
        assert!(index <= num_keys, "child index {index} out of range");

        let removed = self.child(index);
        if index == num_keys {
            let last_child = self.child(num_keys - 1);
            self.set_right_child(last_child);
        } else {
            let start = Self::cell_offset(index + 1);
            let end = Self::cell_offset(num_keys);
            self.data
                .as_mut()
                .copy_within(start..end, start - INTERNAL_NODE_CELL_SIZE);
        }
        self.set_num_keys(num_keys - 1);

        removed
    }

    /// Replaces the node's contents with `keys` and `children`, where
    /// `children` has one more entry than `keys` and ends with the right
    /// child.
    pub fn write_entries(&mut self, keys: &[u32], children: &[PageId]) {
        assert_eq!(children.len(), keys.len() + 1);
        assert!(keys.len() <= INTERNAL_NODE_MAX_CELLS, "too many keys");

        self.set_num_keys(keys.len());
        for (i, (&key, &child)) in keys.iter().zip(children).enumerate() {
            write_u32(self.data.as_mut(), Self::cell_offset(i), child.as_u32());
            self.set_key(i, key);
        }
        self.set_right_child(children[keys.len()]);
    }
}

/// Reads the node type of a page and checks that its cell count fits in
/// the page.
pub fn node_type(data: &[u8]) -> Result<NodeType> {
    let node_type = NodeHeader::new(data).node_type()?;
    let (count, max) = match node_type {
        NodeType::Leaf => (LeafNode::new(data).num_cells(), LEAF_NODE_MAX_CELLS),
        NodeType::Internal => (InternalNode::new(data).num_keys(), INTERNAL_NODE_MAX_CELLS),
    };

    if count > max {
        return Err(DbError::Corrupted(format!(
            "{node_type} node holds {count} cells, at most {max} fit"
        )));
    }
    Ok(node_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_bytes(fill: u8) -> [u8; ROW_SIZE] {
        [fill; ROW_SIZE]
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(COMMON_NODE_HEADER_SIZE, 6);
        assert_eq!(LEAF_NODE_HEADER_SIZE, 10);
        assert_eq!(LEAF_NODE_CELL_SIZE, 297);
        assert_eq!(LEAF_NODE_SPACE_FOR_CELLS, 4086);
        assert_eq!(LEAF_NODE_MAX_CELLS, 13);
        assert_eq!(INTERNAL_NODE_HEADER_SIZE, 14);
        assert_eq!(INTERNAL_NODE_MAX_CELLS, 510);
    }

    #[test]
    fn test_node_header_fields() {
        let mut data = [0u8; PAGE_SIZE];
        let mut leaf = LeafNode::new(&mut data[..]);
        leaf.init(true, None);

        assert_eq!(leaf.header().node_type().unwrap(), NodeType::Leaf);
        assert!(leaf.header().is_root());
        assert_eq!(leaf.header().parent(), None);

        leaf.header_mut().set_root(false);
        leaf.header_mut().set_parent(Some(PageId::new(4)));
        assert!(!leaf.header().is_root());
        assert_eq!(leaf.header().parent(), Some(PageId::new(4)));
    }

    #[test]
    fn test_unknown_node_type_is_corruption() {
        let mut data = [0u8; PAGE_SIZE];
        data[0] = 9;
        assert!(matches!(node_type(&data), Err(DbError::Corrupted(_))));
    }

    #[test]
    fn test_oversized_cell_count_is_corruption() {
        let mut data = [0u8; PAGE_SIZE];
        LeafNode::new(&mut data[..]).init(true, None);
        assert_eq!(node_type(&data).unwrap(), NodeType::Leaf);

        LeafNode::new(&mut data[..]).set_num_cells(LEAF_NODE_MAX_CELLS + 1);
        assert!(matches!(node_type(&data), Err(DbError::Corrupted(_))));
    }

    #[test]
    fn test_leaf_insert_keeps_cells_sorted() {
        let mut data = [0u8; PAGE_SIZE];
        let mut leaf = LeafNode::new(&mut data[..]);
        leaf.init(true, None);

        for (fill, key) in [(3u8, 30u32), (1, 10), (2, 20)] {
            let pos = leaf.find_key_position(key);
            leaf.insert_cell(pos, key, &row_bytes(fill));
        }

        assert_eq!(leaf.num_cells(), 3);
        assert_eq!(leaf.cells().iter().map(|c| c.key).collect::<Vec<_>>(), vec![10, 20, 30]);
        assert!(leaf.value(0).iter().all(|&b| b == 1));
        assert!(leaf.value(2).iter().all(|&b| b == 3));
    }

    #[test]
    fn test_leaf_remove_cell_shifts_left() {
        let mut data = [0u8; PAGE_SIZE];
        let mut leaf = LeafNode::new(&mut data[..]);
        leaf.init(true, None);

        for (i, key) in [1u32, 2, 3, 4].into_iter().enumerate() {
            leaf.insert_cell(i, key, &row_bytes(key as u8));
        }

        let removed = leaf.remove_cell(1);
        assert_eq!(removed.key, 2);
        assert!(removed.value.iter().all(|&b| b == 2));
        assert_eq!(leaf.cells().iter().map(|c| c.key).collect::<Vec<_>>(), vec![1, 3, 4]);
        assert!(leaf.value(1).iter().all(|&b| b == 3));
        assert!(leaf.value(2).iter().all(|&b| b == 4));

        // last and only cells
        assert_eq!(leaf.remove_cell(2).key, 4);
        assert_eq!(leaf.remove_cell(0).key, 1);
        assert_eq!(leaf.remove_cell(0).key, 3);
        assert_eq!(leaf.num_cells(), 0);
        assert_eq!(leaf.find_key_position(3), 0);
    }

    #[test]
    fn test_leaf_find_key_position() {
        let mut data = [0u8; PAGE_SIZE];
        let mut leaf = LeafNode::new(&mut data[..]);
        leaf.init(true, None);
        assert_eq!(leaf.find_key_position(5), 0);

        for (i, key) in [10u32, 20, 30].into_iter().enumerate() {
            leaf.insert_cell(i, key, &row_bytes(0));
        }

        assert_eq!(leaf.find_key_position(5), 0);
        assert_eq!(leaf.find_key_position(20), 1);
        assert_eq!(leaf.find_key_position(25), 2);
        assert_eq!(leaf.find_key_position(31), 3);
    }

    #[test]
    fn test_leaf_is_full() {
        let mut data = [0u8; PAGE_SIZE];
        let mut leaf = LeafNode::new(&mut data[..]);
        leaf.init(true, None);

        for i in 0..LEAF_NODE_MAX_CELLS {
            assert!(!leaf.is_full());
            leaf.insert_cell(i, i as u32, &row_bytes(0));
        }
        assert!(leaf.is_full());
    }

    #[test]
    fn test_internal_find_child() {
        let mut data = [0u8; PAGE_SIZE];
        let mut node = InternalNode::new(&mut data[..]);
        node.init(true, None, PageId::new(9));
        node.write_entries(&[10, 20], &[PageId::new(1), PageId::new(2), PageId::new(3)]);

        assert_eq!(node.find_child_for_key(5), PageId::new(1));
        assert_eq!(node.find_child_for_key(10), PageId::new(1));
        assert_eq!(node.find_child_for_key(11), PageId::new(2));
        assert_eq!(node.find_child_for_key(20), PageId::new(2));
        assert_eq!(node.find_child_for_key(21), PageId::new(3));
        assert_eq!(node.child_index_of(PageId::new(3)), Some(2));
        assert_eq!(node.child_index_of(PageId::new(7)), None);
    }

    #[test]
    fn test_internal_insert_cell() {
        let mut data = [0u8; PAGE_SIZE];
        let mut node = InternalNode::new(&mut data[..]);
        node.init(false, Some(PageId::new(0)), PageId::new(3));
        node.insert_cell(0, PageId::new(1), 10);
        node.insert_cell(1, PageId::new(2), 20);
        node.insert_cell(1, PageId::new(5), 15);

        assert_eq!(node.keys(), vec![10, 15, 20]);
        assert_eq!(
            node.children(),
            vec![PageId::new(1), PageId::new(5), PageId::new(2), PageId::new(3)]
        );

        node.set_child(3, PageId::new(8));
        assert_eq!(node.right_child(), PageId::new(8));
        assert_eq!(node.child(1), PageId::new(5));
    }

    #[test]
    fn test_internal_remove_cell() {
        let mut data = [0u8; PAGE_SIZE];
        let mut node = InternalNode::new(&mut data[..]);
        node.init(true, None, PageId::new(9));
        node.write_entries(
            &[10, 20, 30],
            &[PageId::new(1), PageId::new(2), PageId::new(3), PageId::new(9)],
        );

        assert_eq!(node.remove_cell(1), PageId::new(2));
        assert_eq!(node.keys(), vec![10, 30]);
        assert_eq!(
            node.children(),
            vec![PageId::new(1), PageId::new(3), PageId::new(9)]
        );

        // Removing the right child promotes the last cell's child
        assert_eq!(node.remove_cell(2), PageId::new(9));
        assert_eq!(node.keys(), vec![10]);
        assert_eq!(node.right_child(), PageId::new(3));
        assert_eq!(node.find_child_for_key(25), PageId::new(3));

        assert_eq!(node.remove_cell(0), PageId::new(1));
        assert_eq!(node.num_keys(), 0);
        assert_eq!(node.children(), vec![PageId::new(3)]);
    }
}
