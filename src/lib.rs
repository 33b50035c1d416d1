pub mod arg_parser;
pub mod collector;
pub mod enricher;
pub mod logger;
pub mod record;
pub mod sysfs;
