pub mod drag;
pub mod flatten;
pub mod resolve;
pub mod task_ops;

pub use drag::*;
pub use flatten::*;
pub use resolve::*;
pub use task_ops::*;
