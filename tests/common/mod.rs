pub mod site;
pub mod tracing;
