// src/types.rs

/// One parsed `voltage,current,power` record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
}

impl Sample {
    pub fn new(voltage: f64, current: f64, power: f64) -> Self {
        Self {
            voltage,
            current,
            power,
        }
    }
}

// 三条曲线
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    Voltage,
    Current,
    Power,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 3] = [SeriesKind::Voltage, SeriesKind::Current, SeriesKind::Power];

    /// Name used when handing the series to a renderer.
    pub fn name(self) -> &'static str {
        match self {
            SeriesKind::Voltage => "voltage",
            SeriesKind::Current => "current",
            SeriesKind::Power => "power",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SeriesKind::Voltage => "Voltage (V)",
            SeriesKind::Current => "Current (mA)",
            SeriesKind::Power => "Power (mW)",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            SeriesKind::Voltage => (220, 40, 40),
            SeriesKind::Current => (30, 160, 60),
            SeriesKind::Power => (40, 80, 220),
        }
    }
}

// 时间轴单位：没有加密时间标记时为采样序号，有标记后为毫秒
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AxisUnit {
    #[default]
    Samples,
    Milliseconds,
}

impl AxisUnit {
    pub fn label(self) -> &'static str {
        match self {
            AxisUnit::Samples => "Sample",
            AxisUnit::Milliseconds => "Time (ms)",
        }
    }
}
