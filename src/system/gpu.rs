//! NVML-backed GPU inventory. Absence of a driver or of any device is
//! not an error; the reader just reports nothing and the GPU panel shows
//! its placeholder.

use std::collections::HashMap;

use super::snapshot::{GpuDevice, GpuProcess};

/// Attached processes kept per device.
#[cfg(not(target_os = "macos"))]
const PROCS_PER_DEVICE: usize = 8;

#[cfg(not(target_os = "macos"))]
pub use nvml::GpuReader;

#[cfg(target_os = "macos")]
pub use stub::GpuReader;

#[cfg(not(target_os = "macos"))]
mod nvml {
    use nvml_wrapper::Nvml;
    use nvml_wrapper::bitmasks::device::ThrottleReasons;
    use nvml_wrapper::enum_wrappers::device::{Clock, TemperatureSensor};
    use nvml_wrapper::enums::device::UsedGpuMemory;
    use sysinfo::{Pid, System};

    use super::*;

    pub struct GpuReader {
        nvml: Option<Nvml>,
    }

    impl GpuReader {
        pub fn new() -> Self {
            Self {
                nvml: Nvml::init().ok(),
            }
        }

        /// Query every visible device. Each field degrades to zero on its
        /// own; a device that cannot be opened at all is skipped.
        pub fn read(&self, sys: &System) -> (Vec<GpuDevice>, HashMap<u32, Vec<GpuProcess>>) {
            let Some(ref nvml) = self.nvml else {
                return (Vec::new(), HashMap::new());
            };
            let Ok(count) = nvml.device_count() else {
                return (Vec::new(), HashMap::new());
            };

            let driver = nvml.sys_driver_version().unwrap_or_else(|_| "unknown".into());
            let mut devices = Vec::new();
            let mut attached = HashMap::new();

            for index in 0..count {
                let Ok(device) = nvml.device_by_index(index) else {
                    continue;
                };

                let utilization = device
                    .utilization_rates()
                    .map(|u| (u.gpu, u.memory))
                    .unwrap_or((0, 0));
                let memory = device
                    .memory_info()
                    .map(|m| (m.used, m.total))
                    .unwrap_or((0, 0));

                devices.push(GpuDevice {
                    index,
                    name: device.name().unwrap_or_else(|_| "unknown GPU".into()),
                    driver: driver.clone(),
                    utilization: utilization.0,
                    mem_utilization: utilization.1,
                    memory_used: memory.0,
                    memory_total: memory.1,
                    temperature: device.temperature(TemperatureSensor::Gpu).unwrap_or(0),
                    power_usage_w: device.power_usage().unwrap_or(0) / 1000,
                    power_limit_w: device.power_management_limit().unwrap_or(0) / 1000,
                    fan_percent: device.fan_speed(0).unwrap_or(0),
                    graphics_clock_mhz: device.clock_info(Clock::Graphics).unwrap_or(0),
                    memory_clock_mhz: device.clock_info(Clock::Memory).unwrap_or(0),
                    sm_clock_mhz: device.clock_info(Clock::SM).unwrap_or(0),
                    pstate: device
                        .performance_state()
                        .map(|p| format!("{p:?}"))
                        .unwrap_or_else(|_| "?".into()),
                    throttle: throttle_labels(
                        device
                            .current_throttle_reasons()
                            .unwrap_or(ThrottleReasons::empty()),
                    ),
                });

                if let Ok(procs) = device.running_compute_processes() {
                    let mut list: Vec<GpuProcess> = procs
                        .into_iter()
                        .take(PROCS_PER_DEVICE)
                        .map(|p| GpuProcess {
                            pid: p.pid,
                            name: process_name(sys, p.pid),
                            memory_bytes: match p.used_gpu_memory {
                                UsedGpuMemory::Used(bytes) => bytes,
                                UsedGpuMemory::Unavailable => 0,
                            },
                        })
                        .collect();
                    list.sort_unstable_by(|a, b| b.memory_bytes.cmp(&a.memory_bytes));
                    if !list.is_empty() {
                        attached.insert(index, list);
                    }
                }
            }

            (devices, attached)
        }
    }

    fn process_name(sys: &System, pid: u32) -> String {
        sys.process(Pid::from_u32(pid))
            .map(|p| p.name().to_string_lossy().to_string())
            .unwrap_or_else(|| "?".into())
    }

    fn throttle_labels(reasons: ThrottleReasons) -> Vec<String> {
        if reasons.is_empty() {
            return vec!["None".into()];
        }

        let table = [
            (ThrottleReasons::GPU_IDLE, "GPU Idle"),
            (ThrottleReasons::APPLICATIONS_CLOCKS_SETTING, "App Clocks"),
            (ThrottleReasons::SW_POWER_CAP, "SW Power Cap"),
            (ThrottleReasons::HW_SLOWDOWN, "HW Slowdown"),
            (ThrottleReasons::SYNC_BOOST, "Sync Boost"),
            (ThrottleReasons::SW_THERMAL_SLOWDOWN, "SW Thermal"),
            (ThrottleReasons::HW_THERMAL_SLOWDOWN, "HW Thermal"),
            (ThrottleReasons::HW_POWER_BRAKE_SLOWDOWN, "HW Power Brake"),
            (ThrottleReasons::DISPLAY_CLOCK_SETTING, "Display Clock"),
        ];

        let labels: Vec<String> = table
            .iter()
            .filter(|(flag, _)| reasons.contains(*flag))
            .map(|(_, label)| (*label).to_string())
            .collect();

        if labels.is_empty() {
            vec!["Unknown".into()]
        } else {
            labels
        }
    }
}

#[cfg(target_os = "macos")]
mod stub {
    use sysinfo::System;

    use super::*;

    pub struct GpuReader;

    impl GpuReader {
        pub fn new() -> Self {
            Self
        }

        pub fn read(&self, _sys: &System) -> (Vec<GpuDevice>, HashMap<u32, Vec<GpuProcess>>) {
            (Vec::new(), HashMap::new())
        }
    }
}
