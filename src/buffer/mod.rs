mod frame;
mod pager;

pub use frame::*;
pub use pager::*;
