//! Service module that exports interfaces to external applications, renderers, etc.

pub mod plotting;

// rexport some traits and utilty functions
pub use plotting::{new_plotting_visualization_handler, DataPlottingService};
