pub mod mapper;
pub mod scheduler;

pub use mapper::*;
pub use scheduler::*;
