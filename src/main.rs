use anyhow::Result;

use amdgpu_scan::{arg_parser, collector::GpuCollector, logger};

fn main() -> Result<()> {
    logger::init_logging();

    // Parse the command line arguments
    arg_parser::parse_args();

    let report = GpuCollector::new().collect();

    println!("{}", serde_json::to_string(&report)?);

    Ok(())
}
