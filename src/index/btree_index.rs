use tracing::debug;

use crate::buffer::Pager;
use crate::common::{DbError, PageId, Result, TableConfig};
use crate::tuple::Row;

use super::btree_iterator::{BTreeIterator, Cursor};
use super::btree_page::{node_type, InternalNode, LeafCell, LeafNode, NodeHeader, NodeType};

/// Where a key lives, or would be inserted, in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub page_id: PageId,
    pub cell_index: usize,
    pub found: bool,
}

/// Contents of a node being rewritten during a split.
enum NodeEntries {
    Leaf(Vec<LeafCell>),
    Internal { keys: Vec<u32>, children: Vec<PageId> },
}

impl NodeEntries {
    /// Splits the entries into a lower and an upper half and returns the
    /// separator: the largest key of the lower half.
    fn split(self) -> (NodeEntries, u32, NodeEntries) {
        match self {
            NodeEntries::Leaf(mut cells) => {
                let right = cells.split_off(cells.len() - cells.len() / 2);
                let separator = cells.last().map_or(0, |cell| cell.key);
                (NodeEntries::Leaf(cells), separator, NodeEntries::Leaf(right))
            }
            NodeEntries::Internal {
                mut keys,
                mut children,
            } => {
                let mid = keys.len() / 2;
                let right_keys = keys.split_off(mid + 1);
                let right_children = children.split_off(mid + 1);
                let separator = keys.pop().unwrap_or_default();
                (
                    NodeEntries::Internal { keys, children },
                    separator,
                    NodeEntries::Internal {
                        keys: right_keys,
                        children: right_children,
                    },
                )
            }
        }
    }
}

/// A split that still has to be recorded in `parent`: `left` now holds keys
/// up to `key` and `right` is its new upper sibling.
struct Promotion {
    parent: PageId,
    left: PageId,
    key: u32,
    right: PageId,
}

/// B-tree keyed by row id, stored in the pages of a [`Pager`].
///
/// The root always lives in page 0. When the root splits, both halves move
/// to freshly allocated pages and page 0 is rewritten as an internal node
/// above them, so the tree grows in height only at the root and all leaves
/// stay at the same depth.
pub struct BTreeIndex {
    pager: Pager,
    root_page_id: PageId,
    internal_max_keys: usize,
}

impl BTreeIndex {
    /// Opens the tree stored in `pager`, formatting page 0 as an empty root
    /// leaf if the file is new.
    pub fn open(mut pager: Pager, config: &TableConfig) -> Result<Self> {
        let root_page_id = PageId::ROOT;

        if pager.num_pages() == 0 {
            let page_id = pager.allocate_page()?;
            debug_assert_eq!(page_id, root_page_id);
            LeafNode::new(pager.page_mut(root_page_id)?).init(true, None);
            debug!("initialized empty root leaf");
        } else {
            let data = pager.page(root_page_id)?;
            node_type(data)?;
            if !NodeHeader::new(data).is_root() {
                return Err(DbError::Corrupted(format!(
                    "{root_page_id} is not marked as the root"
                )));
            }
        }

        Ok(Self {
            pager,
            root_page_id,
            internal_max_keys: config.internal_max_keys,
        })
    }

    pub fn root_page_id(&self) -> PageId {
        self.root_page_id
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub(crate) fn pager_mut(&mut self) -> &mut Pager {
        &mut self.pager
    }

    /// Descends from the root to the leaf responsible for `key` and binary
    /// searches it.
    pub fn search(&mut self, key: u32) -> Result<SearchResult> {
        let mut page_id = self.root_page_id;

        for _ in 0..=self.pager.max_pages() {
            let data = self.pager.page(page_id)?;
            match node_type(data)? {
                NodeType::Leaf => {
                    let leaf = LeafNode::new(data);
                    let cell_index = leaf.find_key_position(key);
                    let found = cell_index < leaf.num_cells() && leaf.key(cell_index) == key;
                    return Ok(SearchResult {
                        page_id,
                        cell_index,
                        found,
                    });
                }
                NodeType::Internal => page_id = InternalNode::new(data).find_child_for_key(key),
            }
        }

        Err(self.cycle_error())
    }

    /// Point lookup by key.
    pub fn get(&mut self, key: u32) -> Result<Option<Row>> {
        let position = self.search(key)?;
        if !position.found {
            return Ok(None);
        }

        let leaf = LeafNode::new(self.pager.page(position.page_id)?);
        Row::decode(leaf.value(position.cell_index)).map(Some)
    }

    /// Inserts a row keyed by its id.
    ///
    /// Either the row is inserted or nothing changes: duplicates are rejected
    /// before any page is touched, and the pages a split will need are
    /// counted up front so that running out of pages fails with
    /// [`DbError::TableFull`] before any cell moves.
    pub fn insert(&mut self, row: &Row) -> Result<()> {
        let key = row.id();
        let position = self.search(key)?;
        if position.found {
            return Err(DbError::DuplicateKey(key));
        }

        let is_full = LeafNode::new(self.pager.page(position.page_id)?).is_full();
        if !is_full {
            let mut leaf = LeafNode::new(self.pager.page_mut(position.page_id)?);
            leaf.insert_cell(position.cell_index, key, &row.encode());
            return Ok(());
        }

        let needed = self.pages_needed_for_split(position.page_id)?;
        if needed > self.pager.free_page_count() {
            debug!(
                key,
                needed,
                free = self.pager.free_page_count(),
                "not enough pages left to split"
            );
            return Err(DbError::TableFull);
        }

        self.split_leaf_and_insert(position, key, row).map_err(|e| match e {
            DbError::CapacityExceeded { .. } => DbError::TableFull,
            other => other,
        })
    }

    /// Returns an iterator over every row in ascending key order.
    pub fn iter(&mut self) -> Result<BTreeIterator<'_>> {
        let cursor = Cursor::table_start(self)?;
        Ok(BTreeIterator::new(self, cursor))
    }

    /// Renders the tree depth first, one line per node and per key, each
    /// level indented by two more spaces.
    pub fn render_tree(&mut self) -> Result<String> {
        let mut out = String::new();
        self.render_node(self.root_page_id, 0, &mut out)?;
        Ok(out)
    }

    /// Flushes every page and releases the file.
    pub fn close(&mut self) -> Result<()> {
        self.pager.close()
    }

    /// Follows first children from `page_id` down to a leaf.
    pub(crate) fn leftmost_leaf(&mut self, mut page_id: PageId) -> Result<PageId> {
        for _ in 0..=self.pager.max_pages() {
            let data = self.pager.page(page_id)?;
            match node_type(data)? {
                NodeType::Leaf => return Ok(page_id),
                NodeType::Internal => page_id = InternalNode::new(data).child(0),
            }
        }

        Err(self.cycle_error())
    }

    /// Finds the leaf that follows `leaf_id` in key order by climbing to the
    /// first ancestor with a child further right.
    pub(crate) fn next_leaf(&mut self, leaf_id: PageId) -> Result<Option<PageId>> {
        let mut page_id = leaf_id;

        for _ in 0..=self.pager.max_pages() {
            let header = NodeHeader::new(self.pager.page(page_id)?);
            if header.is_root() {
                return Ok(None);
            }
            let parent_id = self.parent_of(page_id)?;

            let parent = self.internal(parent_id)?;
            let index = parent.child_index_of(page_id).ok_or_else(|| {
                DbError::Corrupted(format!("{parent_id} does not list child {page_id}"))
            })?;

            if index < parent.num_keys() {
                let sibling = parent.child(index + 1);
                return self.leftmost_leaf(sibling).map(Some);
            }
            page_id = parent_id;
        }

        Err(self.cycle_error())
    }

    fn internal(&mut self, page_id: PageId) -> Result<InternalNode<&[u8]>> {
        let data = self.pager.page(page_id)?;
        match node_type(data)? {
            NodeType::Internal => Ok(InternalNode::new(data)),
            NodeType::Leaf => Err(DbError::Corrupted(format!(
                "{page_id} is a leaf but is referenced as a parent"
            ))),
        }
    }

    fn parent_of(&mut self, page_id: PageId) -> Result<PageId> {
        NodeHeader::new(self.pager.page(page_id)?)
            .parent()
            .ok_or_else(|| DbError::Corrupted(format!("non-root {page_id} has no parent")))
    }

    /// Counts the pages a split starting at `leaf_id` will allocate: one per
    /// full non-root node on the way up, two if the split reaches the root.
    fn pages_needed_for_split(&mut self, leaf_id: PageId) -> Result<usize> {
        let internal_max_keys = self.internal_max_keys;
        let mut needed = 0;
        let mut page_id = leaf_id;

        for _ in 0..=self.pager.max_pages() {
            let data = self.pager.page(page_id)?;
            let header = NodeHeader::new(data);
            let is_full = match node_type(data)? {
                NodeType::Leaf => LeafNode::new(data).is_full(),
                NodeType::Internal => InternalNode::new(data).num_keys() >= internal_max_keys,
            };

            if !is_full {
                return Ok(needed);
            }
            if header.is_root() {
                return Ok(needed + 2);
            }
            needed += 1;
            page_id = self.parent_of(page_id)?;
        }

        Err(self.cycle_error())
    }

    fn split_leaf_and_insert(
        &mut self,
        position: SearchResult,
        key: u32,
        row: &Row,
    ) -> Result<()> {
        let internal_max_keys = self.internal_max_keys;
        let mut cells = LeafNode::new(self.pager.page(position.page_id)?).cells();
        cells.insert(position.cell_index, LeafCell::new(key, &row.encode()));

        let mut pending = self.split(position.page_id, NodeEntries::Leaf(cells))?;

        while let Some(Promotion {
            parent,
            left,
            key,
            right,
        }) = pending
        {
            let node = self.internal(parent)?;
            let index = node.child_index_of(left).ok_or_else(|| {
                DbError::Corrupted(format!("{parent} does not list child {left}"))
            })?;

            if node.num_keys() < internal_max_keys {
                let mut node = InternalNode::new(self.pager.page_mut(parent)?);
                node.insert_cell(index, left, key);
                node.set_child(index + 1, right);
                return Ok(());
            }

            let mut keys = node.keys();
            let mut children = node.children();
            keys.insert(index, key);
            children.insert(index + 1, right);

            pending = self.split(parent, NodeEntries::Internal { keys, children })?;
        }

        Ok(())
    }

    /// Distributes `entries` (one more than the node at `page_id` can hold)
    /// over two nodes. Returns the promotion the parent still has to absorb,
    /// or `None` if the split grew a new root.
    fn split(&mut self, page_id: PageId, entries: NodeEntries) -> Result<Option<Promotion>> {
        let header = NodeHeader::new(self.pager.page(page_id)?);
        let is_root = header.is_root();
        let parent = header.parent();

        let (left, separator, right) = entries.split();

        if is_root {
            let left_id = self.pager.allocate_page()?;
            let right_id = self.pager.allocate_page()?;
            self.write_node(left_id, Some(page_id), &left)?;
            self.write_node(right_id, Some(page_id), &right)?;

            let mut root = InternalNode::new(self.pager.page_mut(page_id)?);
            root.init(true, None, right_id);
            root.insert_cell(0, left_id, separator);

            debug!(
                left = left_id.as_u32(),
                right = right_id.as_u32(),
                separator,
                "split root"
            );
            return Ok(None);
        }

        let parent = parent
            .ok_or_else(|| DbError::Corrupted(format!("non-root {page_id} has no parent")))?;
        let right_id = self.pager.allocate_page()?;
        self.write_node(right_id, Some(parent), &right)?;
        self.write_node(page_id, Some(parent), &left)?;

        debug!(
            left = page_id.as_u32(),
            right = right_id.as_u32(),
            separator,
            leaf = matches!(left, NodeEntries::Leaf(_)),
            "split node"
        );

        Ok(Some(Promotion {
            parent,
            left: page_id,
            key: separator,
            right: right_id,
        }))
    }

    /// Formats `page_id` as a non-root node holding `entries` and points the
    /// parent link of every child it now owns back at it.
    fn write_node(
        &mut self,
        page_id: PageId,
        parent: Option<PageId>,
        entries: &NodeEntries,
    ) -> Result<()> {
        match entries {
            NodeEntries::Leaf(cells) => {
                let mut leaf = LeafNode::new(self.pager.page_mut(page_id)?);
                leaf.init(false, parent);
                leaf.write_cells(cells);
            }
            NodeEntries::Internal { keys, children } => {
                let right_child = children[children.len() - 1];
                let mut node = InternalNode::new(self.pager.page_mut(page_id)?);
                node.init(false, parent, right_child);
                node.write_entries(keys, children);

                for &child in children {
                    NodeHeader::new(self.pager.page_mut(child)?).set_parent(Some(page_id));
                }
            }
        }
        Ok(())
    }

    fn render_node(&mut self, page_id: PageId, level: usize, out: &mut String) -> Result<()> {
        if level > self.pager.max_pages() {
            return Err(self.cycle_error());
        }

        let indent = "  ".repeat(level);
        let data = self.pager.page(page_id)?;

        match node_type(data)? {
            NodeType::Leaf => {
                let leaf = LeafNode::new(data);
                out.push_str(&format!("{indent}leaf(size {})\n", leaf.num_cells()));
                for i in 0..leaf.num_cells() {
                    out.push_str(&format!("{indent} - {i} : {}\n", leaf.key(i)));
                }
            }
            NodeType::Internal => {
                let node = InternalNode::new(data);
                let keys = node.keys();
                let children = node.children();

                out.push_str(&format!("{indent}internal(size {})\n", keys.len()));
                for (&child, key) in children.iter().zip(keys) {
                    self.render_node(child, level + 1, out)?;
                    out.push_str(&format!("{indent} - key {key}\n"));
                }
                self.render_node(children[children.len() - 1], level + 1, out)?;
            }
        }

        Ok(())
    }

    fn cycle_error(&self) -> DbError {
        DbError::Corrupted("node links form a cycle".to_string())
    }
}
