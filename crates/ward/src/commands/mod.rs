//! CLI command implementations.

pub(crate) mod scan;
pub(crate) mod serve;

pub(crate) use scan::ScanArgs;
pub(crate) use serve::ServeArgs;
