//! The sample state machine: owns the buffers, the time axis and the
//! encryption marker, and turns classified lines into render updates.
use crate::drivers::axis::{axis_unit, rebuild_time_axis, AxisRange};
use crate::drivers::buffer::{Capacity, SampleSeries, SeriesFrame};
use crate::drivers::parser::{classify, LineKind};
use crate::drivers::TelemetryError;
use crate::types::Sample;

/// One render update: the full series plus, when the marker changed, the new x range.
#[derive(Clone, Debug, PartialEq)]
pub struct Emission {
    pub frame: SeriesFrame,
    pub axis: Option<AxisRange>,
}

/// How many lines of each kind have been seen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineStats {
    pub data: u64,
    pub markers: u64,
    pub headers: u64,
    pub malformed: u64,
    pub evicted: u64,
}

impl LineStats {
    pub fn total(&self) -> u64 {
        self.data + self.markers + self.headers + self.malformed
    }
}

pub struct SampleStateMachine {
    series: SampleSeries,
    time_axis: Vec<f64>,
    marker_ms: Option<f64>,
    stats: LineStats,
}

impl SampleStateMachine {
    pub fn new(capacity: Capacity) -> Result<Self, TelemetryError> {
        Ok(Self {
            series: SampleSeries::new(capacity)?,
            time_axis: Vec::new(),
            marker_ms: None,
            stats: LineStats::default(),
        })
    }

    /// Classifies `line` and applies it. Lines that cannot be used leave the
    /// buffers and marker untouched and produce no emission.
    pub fn process(&mut self, line: &str) -> Option<Emission> {
        match classify(line) {
            LineKind::Marker(ms) => self.apply_marker(ms),
            LineKind::Data(sample) => Some(self.apply_sample(sample)),
            LineKind::Header => {
                self.stats.headers += 1;
                log::debug!("skipping header line: {line}");
                None
            }
            LineKind::Malformed => {
                self.stats.malformed += 1;
                log::debug!("discarding line: {line}");
                None
            }
        }
    }

    /// Replaces the marker and rescales the existing samples onto `[0, ms]`.
    pub fn apply_marker(&mut self, ms: f64) -> Option<Emission> {
        self.stats.markers += 1;
        self.marker_ms = Some(ms);
        log::info!("[Parsed encryption time] {ms} ms");
        self.rebuild_axis();
        if self.series.is_empty() {
            return None;
        }
        Some(Emission {
            frame: self.snapshot(),
            axis: Some(AxisRange::encryption_window(ms)),
        })
    }

    pub fn apply_sample(&mut self, sample: Sample) -> Emission {
        self.stats.data += 1;
        if self.series.push(sample) {
            self.stats.evicted += 1;
        }
        self.rebuild_axis();
        Emission {
            frame: self.snapshot(),
            axis: None,
        }
    }

    /// Final render on shutdown: current buffers with the latest marker applied.
    pub fn flush(&mut self) -> Option<Emission> {
        if self.series.is_empty() {
            return None;
        }
        self.rebuild_axis();
        Some(Emission {
            frame: self.snapshot(),
            axis: self.marker_ms.map(AxisRange::encryption_window),
        })
    }

    pub fn snapshot(&self) -> SeriesFrame {
        self.series
            .frame(&self.time_axis, axis_unit(self.marker_ms))
    }

    pub fn marker_ms(&self) -> Option<f64> {
        self.marker_ms
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn stats(&self) -> LineStats {
        self.stats
    }

    fn rebuild_axis(&mut self) {
        self.time_axis = rebuild_time_axis(self.series.len(), self.marker_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AxisUnit;

    fn machine() -> SampleStateMachine {
        SampleStateMachine::new(Capacity::Unbounded).unwrap()
    }

    fn assert_consistent(m: &SampleStateMachine) {
        let frame = m.snapshot();
        assert_eq!(frame.time_axis.len(), frame.voltage.len());
        assert_eq!(frame.voltage.len(), frame.current.len());
        assert_eq!(frame.current.len(), frame.power.len());
        assert!(frame.time_axis.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn data_line_appends_one_sample_to_each_series() {
        let mut m = machine();
        for (i, line) in ["1.5,2.5,3.75", " -0.25, 7 ,1e3 ", "4,5,6,7,8"].iter().enumerate() {
            let emission = m.process(line).expect("data lines emit");
            assert_eq!(emission.frame.time_axis.len(), i + 1);
            assert!(emission.axis.is_none());
            assert_consistent(&m);
        }
        let frame = m.snapshot();
        assert_eq!(frame.voltage, vec![1.5, -0.25, 4.0]);
        assert_eq!(frame.current, vec![2.5, 7.0, 5.0]);
        assert_eq!(frame.power, vec![3.75, 1000.0, 6.0]);
        assert_eq!(m.stats().data, 3);
    }

    #[test]
    fn header_lines_change_nothing() {
        let mut m = machine();
        m.process("1,2,3");
        m.process("Time to encrypt: 10 ms");
        let before = (m.snapshot(), m.marker_ms());
        for line in ["Voltage,Current,Power", "Power: 3mW", "Current,1,2,3"] {
            assert!(m.process(line).is_none());
        }
        assert_eq!((m.snapshot(), m.marker_ms()), before);
        assert_eq!(m.stats().headers, 3);
    }

    #[test]
    fn malformed_lines_leave_state_identical() {
        let mut m = machine();
        m.process("1,2,3");
        m.process("4,5,6");
        let before = (m.snapshot(), m.marker_ms());
        for line in ["abc,def,ghi", "1,2", "1,2,zz", "garbage", "Time to encrypt: 1..2 ms"] {
            assert!(m.process(line).is_none(), "line {line:?}");
            assert_eq!((m.snapshot(), m.marker_ms()), before, "line {line:?}");
        }
        assert_eq!(m.stats().malformed, 5);
    }

    #[test]
    fn unparseable_line_on_empty_machine_emits_nothing() {
        let mut m = machine();
        assert!(m.process("abc,def,ghi").is_none());
        assert!(m.is_empty());
        assert!(m.snapshot().time_axis.is_empty());
    }

    #[test]
    fn marker_is_overwritten_not_accumulated() {
        let mut m = machine();
        m.process("Time to encrypt: 40 ms");
        m.process("Time to encrypt: 15.5 ms");
        assert_eq!(m.marker_ms(), Some(15.5));
        assert_eq!(m.stats().markers, 2);
    }

    #[test]
    fn marker_rescales_existing_samples() {
        let mut m = machine();
        m.process("1.0,2.0,3.0");
        m.process("4.0,5.0,6.0");
        let emission = m.process("Time to encrypt: 100.0 ms").unwrap();
        assert_eq!(m.marker_ms(), Some(100.0));
        assert_eq!(m.snapshot().time_axis, vec![0.0, 100.0]);
        assert_eq!(emission.frame.voltage, vec![1.0, 4.0]);
        assert_eq!(emission.frame.unit, AxisUnit::Milliseconds);
        assert_eq!(emission.axis, Some(AxisRange::encryption_window(100.0)));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn marker_before_any_sample_is_stored_without_emission() {
        let mut m = machine();
        assert!(m.process("Time to encrypt: 30 ms").is_none());
        m.process("1,1,1");
        assert_eq!(m.snapshot().time_axis, vec![0.0]);
        m.process("2,2,2");
        m.process("3,3,3");
        assert_eq!(m.snapshot().time_axis, vec![0.0, 15.0, 30.0]);
    }

    #[test]
    fn bounded_machine_evicts_oldest() {
        let mut m = SampleStateMachine::new(Capacity::Bounded(2)).unwrap();
        for line in ["1,1,1", "2,2,2", "3,3,3"] {
            m.process(line);
            assert_consistent(&m);
        }
        assert_eq!(m.snapshot().voltage, vec![2.0, 3.0]);
        assert_eq!(m.snapshot().time_axis, vec![0.0, 1.0]);
        assert_eq!(m.stats().evicted, 1);
    }

    #[test]
    fn single_sample_without_marker_uses_index_axis() {
        let mut m = machine();
        let emission = m.process("0.5,0.5,0.25").unwrap();
        assert_eq!(emission.frame.time_axis, vec![0.0]);
        assert_eq!(emission.frame.unit, AxisUnit::Samples);
    }

    #[test]
    fn flush_reapplies_latest_marker() {
        let mut m = machine();
        assert!(m.flush().is_none());
        m.process("1,1,1");
        m.process("2,2,2");
        let plain = m.flush().unwrap();
        assert!(plain.axis.is_none());
        m.process("Time to encrypt: 8 ms");
        let flushed = m.flush().unwrap();
        assert_eq!(flushed.frame.time_axis, vec![0.0, 8.0]);
        assert_eq!(flushed.axis, Some(AxisRange::encryption_window(8.0)));
    }

    #[test]
    fn mixed_stream_keeps_invariants() {
        let mut m = SampleStateMachine::new(Capacity::Bounded(16)).unwrap();
        let lines = [
            "Voltage,Current,Power",
            "3.30,12.1,39.9",
            "3.31,12.0,39.7",
            "",
            "3.2\u{FFFD}9,11.9,38.5",
            "Time to encrypt : 534.894 ms",
            "3.29,11.8,38.8",
            "1,2",
        ];
        for _ in 0..10 {
            for line in lines {
                m.process(line);
                assert_consistent(&m);
            }
        }
        assert_eq!(m.len(), 16);
        let last = m.snapshot().time_axis.last().copied().unwrap_or_default();
        assert!((last - 534.894).abs() < 1e-9);
        let stats = m.stats();
        assert_eq!(stats.data, 30);
        assert_eq!(stats.markers, 10);
        assert_eq!(stats.headers, 10);
        assert_eq!(stats.malformed, 30);
        assert_eq!(stats.total(), 80);
    }
}
