//! Host health readout for the SYSTEM STATUS screen
//!
//! Best effort only: anything that cannot be read shows as "N/A".

use std::time::Duration;

const LOADAVG_PATH: &str = "/proc/loadavg";
const THERMAL_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Snapshot of host health
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemStatus {
    pub uptime: Duration,
    /// 1/5/15 minute load averages
    pub load: Option<[f32; 3]>,
    /// CPU temperature in °C
    pub cpu_temp: Option<f32>,
}

impl SystemStatus {
    pub fn with_uptime(uptime: Duration) -> Self {
        Self {
            uptime,
            ..Default::default()
        }
    }

    /// Read load average and CPU temperature from the host
    pub fn sample(uptime: Duration) -> Self {
        let load = std::fs::read_to_string(LOADAVG_PATH)
            .ok()
            .and_then(|s| parse_loadavg(&s));
        let cpu_temp = std::fs::read_to_string(THERMAL_PATH)
            .ok()
            .and_then(|s| parse_thermal(&s));
        Self {
            uptime,
            load,
            cpu_temp,
        }
    }

    pub fn temp_text(&self) -> String {
        match self.cpu_temp {
            Some(t) => format!("CPU Temp: {t:.1} C"),
            None => "CPU Temp: N/A".to_string(),
        }
    }

    pub fn load_text(&self) -> String {
        match self.load {
            Some([l1, l5, l15]) => format!("Load avg (1/5/15): {l1:.2}, {l5:.2}, {l15:.2}"),
            None => "Load avg: N/A".to_string(),
        }
    }

    pub fn uptime_text(&self) -> String {
        format!("Uptime: {}", format_uptime(self.uptime))
    }
}

/// HH:MM:SS
pub fn format_uptime(uptime: Duration) -> String {
    let seconds = uptime.as_secs();
    let (mins, secs) = (seconds / 60, seconds % 60);
    let (hours, mins) = (mins / 60, mins % 60);
    format!("{hours:02}:{mins:02}:{secs:02}")
}

/// First three fields of /proc/loadavg
fn parse_loadavg(text: &str) -> Option<[f32; 3]> {
    let mut fields = text.split_whitespace().map(|f| f.parse::<f32>().ok());
    Some([fields.next()??, fields.next()??, fields.next()??])
}

/// Millidegrees Celsius
fn parse_thermal(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().map(|milli| milli / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(3723)), "01:02:03");
        assert_eq!(format_uptime(Duration::from_secs(100 * 3600)), "100:00:00");
    }

    #[test]
    fn test_parse_loadavg() {
        assert_eq!(parse_loadavg("0.52 0.58 0.59 1/391 12345\n"), Some([0.52, 0.58, 0.59]));
        assert_eq!(parse_loadavg("0.52 nope"), None);
        assert_eq!(parse_loadavg(""), None);
    }

    #[test]
    fn test_parse_thermal() {
        assert_eq!(parse_thermal("47800\n"), Some(47.8));
        assert_eq!(parse_thermal("hot"), None);
    }

    #[test]
    fn test_missing_readings_show_na() {
        let status = SystemStatus::with_uptime(Duration::from_secs(61));
        assert_eq!(status.temp_text(), "CPU Temp: N/A");
        assert_eq!(status.load_text(), "Load avg: N/A");
        assert_eq!(status.uptime_text(), "Uptime: 00:01:01");
    }
}
