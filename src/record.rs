use serde::Serialize;

// A single detected GPU. The serialized field names are the output
// contract consumed by the widgets, hence the explicit camelCase renames.
#[derive(Debug, Clone, Serialize)]
pub struct GpuRecord {
    // Zero-based position of the record in the report
    pub index: usize,

    // All three name fields carry the same resolved model string
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "fullName")]
    pub full_name: String,

    // "vendorId:deviceId", or the card directory name when the
    // device id could not be read
    #[serde(rename = "pciId")]
    pub pci_id: String,

    // Degrees Celsius, 0 when no valid sensor reading was found
    pub temperature: f64,

    // Raw byte counts and their truncated MiB conversions
    #[serde(rename = "memoryUsed")]
    pub memory_used: u64,
    #[serde(rename = "memoryTotal")]
    pub memory_total: u64,
    #[serde(rename = "memoryUsedMB")]
    pub memory_used_mb: u64,
    #[serde(rename = "memoryTotalMB")]
    pub memory_total_mb: u64,

    pub vendor: &'static str,
    pub driver: &'static str,
}

// The whole program output: one object with a single "gpus" key
#[derive(Debug, Default, Serialize)]
pub struct GpuReport {
    pub gpus: Vec<GpuRecord>,
}
