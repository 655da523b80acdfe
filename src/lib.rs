//! Pagedb - A single-table, disk-resident B-tree row store
//!
//! Rows of `(id, username, email)` are kept in a B-tree keyed by `id` and
//! stored in fixed-size 4096-byte pages of a single file. Pages are cached in
//! memory by a pager and written back only when the table is closed.
//!
//! # Architecture
//!
//! - **Storage Layer** (`storage`): Page-granular file I/O
//!   - `DiskManager`: Reads and writes pages to/from disk
//!
//! - **Buffer** (`buffer`): In-memory page cache
//!   - `Pager`: Loads pages on demand, allocates new ones, flushes dirty pages
//!   - `Frame`: One cached page plus its dirty flag
//!
//! - **Tuple** (`tuple`): The fixed-width row codec
//!
//! - **Index** (`index`): The B-tree
//!   - `LeafNode`/`InternalNode`: Typed views over raw page bytes
//!   - `BTreeIndex`: Search, insert and node splitting
//!   - `Cursor`/`BTreeIterator`: Ordered traversal
//!
//! - **Table** (`table`): The public handle tying the layers together
//!
//! - **Frontend** (`frontend`): The `db > ` shell
//!
//! # Example
//!
//! ```rust,no_run
//! use pagedb::Table;
//!
//! let mut table = Table::open("users.db").unwrap();
//! table.insert_values(1, "alice", "alice@example.com").unwrap();
//!
//! for row in table.select_all().unwrap() {
//!     println!("{}", row.unwrap());
//! }
//!
//! table.close().unwrap();
//! ```

pub mod buffer;
pub mod common;
pub mod frontend;
pub mod index;
pub mod storage;
pub mod table;
pub mod tuple;

// Re-export commonly used types at the crate root
pub use common::{DbError, PageId, Result, TableConfig, ValidationError};
pub use table::{layout_constants, Table};
pub use tuple::Row;
