//! Edit actions: stream metadata rewrite and attachment injection, both
//! committed through the shared remux executor.

mod attachment;
mod execute;
mod metadata;

pub use attachment::add_attachment;
pub use execute::execute_plan;
pub use metadata::{change_metadata, plan_metadata, EditOutcome};
