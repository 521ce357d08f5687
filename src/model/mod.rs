pub mod flat;
pub mod layout;
pub mod task;

pub use flat::*;
pub use layout::*;
pub use task::*;
