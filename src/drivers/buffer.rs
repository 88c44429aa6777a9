use std::collections::VecDeque;
use crate::drivers::TelemetryError;
use crate::types::{AxisUnit, Sample, SeriesKind};

/// Read-only copy of the three series and their shared time axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesFrame {
    pub time_axis: Vec<f64>,
    pub voltage: Vec<f64>,
    pub current: Vec<f64>,
    pub power: Vec<f64>,
    pub unit: AxisUnit,
}
impl SeriesFrame {
    pub fn values(&self, kind: SeriesKind) -> &[f64] {
        match kind {
            SeriesKind::Voltage => &self.voltage,
            SeriesKind::Current => &self.current,
            SeriesKind::Power => &self.power,
        }
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capacity {
    /// Keep at most this many samples, dropping the oldest first.
    Bounded(usize),
    Unbounded,
}
/// Three parallel sample queues that always have the same length.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSeries {
    voltage: VecDeque<f64>,
    current: VecDeque<f64>,
    power: VecDeque<f64>,
    capacity: Capacity,
}
impl SampleSeries {
    pub fn new(capacity: Capacity) -> Result<Self, TelemetryError> {
        let reserve = match capacity {
            Capacity::Bounded(0) => return Err(TelemetryError::InvalidCapacity),
            Capacity::Bounded(n) => n,
            Capacity::Unbounded => 0,
        };
        Ok(Self {
            voltage: VecDeque::with_capacity(reserve),
            current: VecDeque::with_capacity(reserve),
            power: VecDeque::with_capacity(reserve),
            capacity,
        })
    }
    pub fn len(&self) -> usize {
        self.voltage.len()
    }
    pub fn is_empty(&self) -> bool {
        self.voltage.is_empty()
    }
    /// Appends one sample; returns `true` when the oldest sample was evicted.
    pub fn push(&mut self, sample: Sample) -> bool {
        let evict = matches!(self.capacity, Capacity::Bounded(n) if self.len() == n);
        if evict {
            self.voltage.pop_front();
            self.current.pop_front();
            self.power.pop_front();
        }
        self.voltage.push_back(sample.voltage);
        self.current.push_back(sample.current);
        self.power.push_back(sample.power);
        evict
    }
    pub fn frame(&self, time_axis: &[f64], unit: AxisUnit) -> SeriesFrame {
        SeriesFrame {
            time_axis: time_axis.to_vec(),
            voltage: self.voltage.iter().copied().collect(),
            current: self.current.iter().copied().collect(),
            power: self.power.iter().copied().collect(),
            unit,
        }
    }
}
