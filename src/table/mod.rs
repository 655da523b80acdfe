mod constants;
mod handle;

pub use constants::*;
pub use handle::*;
