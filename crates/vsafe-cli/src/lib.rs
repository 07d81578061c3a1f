//! Report layer and command support for the `vsafe` binary.

pub mod logging;
pub mod report;
pub mod summary;
