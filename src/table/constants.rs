use std::fmt;

use crate::index::{
    COMMON_NODE_HEADER_SIZE, LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE, LEAF_NODE_MAX_CELLS,
    LEAF_NODE_SPACE_FOR_CELLS,
};
use crate::tuple::ROW_SIZE;

/// The fixed on-disk layout sizes, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConstants {
    pub row_size: usize,
    pub common_node_header_size: usize,
    pub leaf_node_header_size: usize,
    pub leaf_node_cell_size: usize,
    pub leaf_node_space_for_cells: usize,
    pub leaf_node_max_cells: usize,
}

pub fn layout_constants() -> LayoutConstants {
    LayoutConstants {
        row_size: ROW_SIZE,
        common_node_header_size: COMMON_NODE_HEADER_SIZE,
        leaf_node_header_size: LEAF_NODE_HEADER_SIZE,
        leaf_node_cell_size: LEAF_NODE_CELL_SIZE,
        leaf_node_space_for_cells: LEAF_NODE_SPACE_FOR_CELLS,
        leaf_node_max_cells: LEAF_NODE_MAX_CELLS,
    }
}

impl fmt::Display for LayoutConstants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ROW_SIZE: {}", self.row_size)?;
        writeln!(f, "COMMON_NODE_HEADER_SIZE: {}", self.common_node_header_size)?;
        writeln!(f, "LEAF_NODE_HEADER_SIZE: {}", self.leaf_node_header_size)?;
        writeln!(f, "LEAF_NODE_CELL_SIZE: {}", self.leaf_node_cell_size)?;
        writeln!(f, "LEAF_NODE_SPACE_FOR_CELLS: {}", self.leaf_node_space_for_cells)?;
        writeln!(f, "LEAF_NODE_MAX_CELLS: {}", self.leaf_node_max_cells)
    }
}
