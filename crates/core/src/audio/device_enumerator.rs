use cpal::traits::{DeviceTrait, HostTrait};
use serde::{Deserialize, Serialize};

use super::backend::AudioError;

/// An audio output that playlist audio can be routed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioDeviceInfo {
    pub name: String,
    pub is_default: bool,
}

/// List the host's output devices, default first.
///
/// A host without named outputs still reports a single "Default" entry so the
/// configured device always has something to match.
pub fn enumerate_audio_devices() -> Result<Vec<AudioDeviceInfo>, AudioError> {
    let host = cpal::default_host();
    let default_device_name = host.default_output_device().and_then(|d| d.name().ok());

    let devices = host
        .output_devices()
        .map_err(|e| AudioError::Output(format!("Failed to enumerate audio devices: {e}")))?;

    let mut device_list: Vec<AudioDeviceInfo> = devices
        .filter_map(|device| device.name().ok())
        .map(|name| AudioDeviceInfo {
            is_default: default_device_name.as_ref() == Some(&name),
            name,
        })
        .collect();

    if device_list.is_empty() {
        device_list.push(AudioDeviceInfo {
            name: "Default".to_string(),
            is_default: true,
        });
    }

    device_list.sort_by_key(|d| !d.is_default);
    log::debug!("Found {} audio output device(s)", device_list.len());
    Ok(device_list)
}
