//! Tool interface, registry, and control tools.

pub mod control;
pub mod registry;
pub mod traits;

pub use control::{AbortWorkTool, CompleteWorkTool};
pub use registry::ToolRegistry;
pub use traits::Tool;
