pub mod btree_index;
pub mod btree_iterator;
pub mod btree_page;

pub use btree_index::{BTreeIndex, SearchResult};
pub use btree_iterator::{BTreeIterator, Cursor};
pub use btree_page::{
    InternalNode, LeafCell, LeafNode, NodeHeader, NodeType, COMMON_NODE_HEADER_SIZE,
    INTERNAL_NODE_CELL_SIZE, INTERNAL_NODE_HEADER_SIZE, INTERNAL_NODE_MAX_CELLS,
    LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE, LEAF_NODE_MAX_CELLS, LEAF_NODE_SPACE_FOR_CELLS,
};
