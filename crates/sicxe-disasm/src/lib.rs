pub mod model;

// Re-export commonly used types/functions for consumers
pub use model::{load_program, Program};
