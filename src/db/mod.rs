pub mod pool;
pub mod reflections;

pub use pool::create_pool;
