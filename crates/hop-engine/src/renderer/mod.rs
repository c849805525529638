pub mod traits;

pub use traits::{NullProxy, VisualProxy};
