use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::{
    enricher::{IdentityEnricher, LspciEnricher},
    record::{GpuRecord, GpuReport},
    sysfs,
};

const DRM_ROOT: &str = "/sys/class/drm";

// PCI vendor code of AMD, with and without the hex prefix sysfs uses
const AMD_VENDOR_HEX: &str = "0x1002";
const AMD_VENDOR_BARE: &str = "1002";
// lspci "-d" filter matching any AMD device
const AMD_LSPCI_FILTER: &str = "1002:";

const GENERIC_NAME: &str = "AMD GPU";
const VENDOR_LABEL: &str = "AMD";
const DRIVER_NAME: &str = "amdgpu";

const MIB: u64 = 1024 * 1024;

// Scans the DRM class tree for AMD cards and assembles one record per
// device. Every per-device failure degrades the affected field to its
// default, the scan itself never fails.
pub struct GpuCollector<E> {
    drm_root: PathBuf,
    enricher: E,
}

impl GpuCollector<LspciEnricher> {
    pub fn new() -> Self {
        Self::with_parts(DRM_ROOT, LspciEnricher)
    }
}

impl Default for GpuCollector<LspciEnricher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: IdentityEnricher> GpuCollector<E> {
    // Root and enricher are injectable so the scan can run against a
    // fake device tree
    pub fn with_parts(drm_root: impl Into<PathBuf>, enricher: E) -> Self {
        Self {
            drm_root: drm_root.into(),
            enricher,
        }
    }

    pub fn collect(&self) -> GpuReport {
        let mut gpus = Vec::new();

        // Card directories come back sorted by name, so index
        // assignment is deterministic across runs
        for card in sysfs::subdirs_with_prefix(&self.drm_root, "card") {
            let device = card.join("device");
            if !device.exists() {
                trace!("Skipping {}: no device node", card.display());
                continue;
            }

            let vendor_id = sysfs::read_trimmed(&device.join("vendor"));
            if !vendor_id.as_deref().is_some_and(is_amd_vendor) {
                trace!("Skipping {}: not an AMD device", card.display());
                continue;
            }
            let vendor_id = vendor_id.unwrap_or_default();

            let card_name = card
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();

            let display_name = self.display_name(&device);
            let temperature = max_temperature(&device);
            let (memory_used, memory_total) = memory_counters(&device);
            let pci_id = pci_id(&device, &vendor_id, &card_name);

            debug!(
                "Found {card_name}: {display_name} ({pci_id}), \
                 {temperature} C, {memory_used}/{memory_total} bytes"
            );

            gpus.push(GpuRecord {
                index: gpus.len(),
                name: display_name.clone(),
                display_name: display_name.clone(),
                full_name: display_name,
                pci_id,
                temperature,
                memory_used,
                memory_total,
                memory_used_mb: memory_used / MIB,
                memory_total_mb: memory_total / MIB,
                vendor: VENDOR_LABEL,
                driver: DRIVER_NAME,
            });
        }

        GpuReport { gpus }
    }

    // Resolve the model name through the enricher, falling back to the
    // generic label on any failure along the way
    fn display_name(&self, device: &Path) -> String {
        pci_slot(device)
            .and_then(|slot| self.enricher.lookup(&slot, AMD_LSPCI_FILTER))
            .unwrap_or_else(|| GENERIC_NAME.to_string())
    }
}

fn is_amd_vendor(raw: &str) -> bool {
    let id = raw.to_ascii_lowercase();
    id == AMD_VENDOR_HEX || id == AMD_VENDOR_BARE
}

// The PCI bus address lives in the uevent key/value pairs
fn pci_slot(device: &Path) -> Option<String> {
    let uevent = sysfs::read_trimmed(&device.join("uevent"))?;

    uevent
        .lines()
        .find_map(|line| line.strip_prefix("PCI_SLOT_NAME="))
        .map(str::to_string)
}

// Hottest valid reading across every hwmon temp sensor under the
// device. Values are millidegrees Celsius, anything outside (0, 150)
// degrees is sensor noise and gets dropped.
fn max_temperature(device: &Path) -> f64 {
    let mut max = 0.0_f64;

    for hwmon in sysfs::subdirs_with_prefix(&device.join("hwmon"), "hwmon") {
        for input in sysfs::files_matching(&hwmon, "temp", "_input") {
            let Some(raw) = sysfs::read_u64(&input) else {
                continue;
            };

            let celsius = raw as f64 / 1000.0;
            if celsius > 0.0 && celsius < 150.0 {
                max = max.max(celsius);
            } else {
                trace!("Discarding reading {celsius} C from {}", input.display());
            }
        }
    }

    max
}

// (used, total) in bytes. The dedicated VRAM counters are preferred,
// the visible-VRAM pair (reported in KiB) covers APUs and older
// kernels that expose no totals.
fn memory_counters(device: &Path) -> (u64, u64) {
    let mut used = sysfs::read_u64(&device.join("mem_info_vram_used")).unwrap_or(0);
    let mut total = sysfs::read_u64(&device.join("mem_info_vram_total")).unwrap_or(0);

    if total == 0 {
        if let Some(kib) = sysfs::read_u64(&device.join("mem_info_vis_vram_used")) {
            used = kib * 1024;
        }
        if let Some(kib) = sysfs::read_u64(&device.join("mem_info_vis_vram_total")) {
            total = kib * 1024;
        }
    }

    (used, total)
}

fn pci_id(device: &Path, vendor_id: &str, card_name: &str) -> String {
    match sysfs::read_trimmed(&device.join("device")) {
        Some(device_id) => format!("{vendor_id}:{device_id}"),
        None => card_name.to_string(),
    }
}
