use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("failed to run lspci: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("lspci exited with {0}")]
    Status(ExitStatus),
    #[error("no usable device line in lspci output")]
    Malformed,
}

// Best-effort device name resolution. The production implementation
// shells out to lspci, tests substitute a canned one.
pub trait IdentityEnricher {
    // Resolve the model name of the device at `slot`, restricted to
    // `vendor_filter` (an lspci "-d" vendor:device pattern).
    // Absence covers every failure mode, the caller falls back to a
    // generic label.
    fn lookup(&self, slot: &str, vendor_filter: &str) -> Option<String>;
}

pub struct LspciEnricher;

impl IdentityEnricher for LspciEnricher {
    fn lookup(&self, slot: &str, vendor_filter: &str) -> Option<String> {
        match run_lspci(slot, vendor_filter) {
            Ok(name) => Some(name),
            Err(err) => {
                debug!("Device name lookup failed for {slot}: {err}");
                None
            }
        }
    }
}

fn run_lspci(slot: &str, vendor_filter: &str) -> Result<String, LookupError> {
    let output = Command::new("lspci")
        .args(["-s", slot, "-d", vendor_filter])
        .output()?;

    if !output.status.success() {
        return Err(LookupError::Status(output.status));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or(LookupError::Malformed)?;

    parse_device_line(line).ok_or(LookupError::Malformed)
}

// Extract the model name from an lspci device line such as
// `03:00.0 VGA compatible controller: Advanced Micro Devices, Inc.
// [AMD/ATI] Navi 31 [Radeon RX 7900 XT] (rev c1)`.
pub(crate) fn parse_device_line(line: &str) -> Option<String> {
    // The slot colons are never followed by a space, so the first ": "
    // separates the class from the vendor/model description
    let (_, description) = line.split_once(": ")?;
    model_from_description(description)
}

fn model_from_description(description: &str) -> Option<String> {
    let description = description.trim();

    // lspci brackets the vendor tag before the model name and appends
    // bracketed id/marketing annotations after it. Skip past the vendor
    // tag when real text follows it, otherwise keep the leading text.
    let body = match (description.find('['), description.find(']')) {
        (Some(open), Some(close)) if open < close => {
            let tail = description[close + 1..].trim();
            if tail.is_empty() || tail.starts_with('(') {
                &description[..open]
            } else {
                &description[close + 1..]
            }
        }
        _ => description,
    };

    let name = body.split('[').next().unwrap_or(body).trim();
    (!name.is_empty()).then(|| name.to_string())
}
