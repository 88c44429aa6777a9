use crate::drivers::render::Renderer;
use crate::drivers::source::LineSource;
use crate::drivers::state::{Emission, LineStats, SampleStateMachine};
use crate::types::SeriesKind;
/// High level pipeline: one read, one classify-and-update, one render per pump.
pub struct TelemetryPipeline<S: LineSource> {
    source: S,
    machine: SampleStateMachine,
    echo: bool,
    shut_down: bool,
}
impl<S: LineSource> TelemetryPipeline<S> {
    pub fn new(source: S, machine: SampleStateMachine) -> Self {
        Self {
            source,
            machine,
            echo: false,
            shut_down: false,
        }
    }
    /// Print every raw line to stdout before it is classified.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
    /// Reads at most one line and renders the result. Returns `true` if the renderer was updated.
    pub fn pump_once<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> bool {
        if self.shut_down {
            return false;
        }
        let Some(line) = self.source.read_line() else {
            return false;
        };
        if self.echo {
            println!("{line}");
        }
        match self.machine.process(&line) {
            Some(emission) => {
                render(&emission, renderer);
                true
            }
            None => false,
        }
    }
    /// Final flush followed by closing the source. Only the first call does anything.
    pub fn shutdown<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if let Some(emission) = self.machine.flush() {
            render(&emission, renderer);
        }
        self.source.close();
        let stats = self.machine.stats();
        log::info!(
            "shutdown: {} samples buffered ({} evicted), {} lines ({} data, {} markers, {} headers, {} discarded)",
            self.machine.len(),
            stats.evicted,
            stats.total(),
            stats.data,
            stats.markers,
            stats.headers,
            stats.malformed
        );
    }
    pub fn is_exhausted(&self) -> bool {
        self.shut_down || self.source.is_exhausted()
    }
    pub fn machine(&self) -> &SampleStateMachine {
        &self.machine
    }
    pub fn stats(&self) -> LineStats {
        self.machine.stats()
    }
}
/// Fans one emission out to the renderer: the three series, then the axis if it changed.
pub fn render<R: Renderer + ?Sized>(emission: &Emission, renderer: &mut R) {
    let frame = &emission.frame;
    for kind in SeriesKind::ALL {
        renderer.set_series(kind.name(), &frame.time_axis, frame.values(kind));
    }
    if let Some(axis) = emission.axis {
        renderer.set_axis_label_and_range(axis.low, axis.high, axis.unit);
    }
}
