use std::io::{BufRead, BufReader, ErrorKind, Read};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Records longer than this without a newline are dropped.
pub const MAX_LINE_BYTES: usize = 4096;
/// Something that yields one trimmed text line per call.
///
/// `read_line` never fails: timeouts, empty reads and I/O faults all come back
/// as `None` so the polling loop keeps running.
pub trait LineSource {
    fn read_line(&mut self) -> Option<String>;
    /// `true` once no further lines can arrive (end of a file or in-memory queue).
    fn is_exhausted(&self) -> bool {
        false
    }
    /// Releases the underlying connection. Safe to call more than once.
    fn close(&mut self) {}
}
impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn read_line(&mut self) -> Option<String> {
        (**self).read_line()
    }
    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
    fn close(&mut self) {
        (**self).close()
    }
}
/// Lossy UTF-8 decode plus trim. Blank records yield `None`.
pub fn decode_line(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
/// Newline-delimited reader over any byte stream (serial port, file, cursor).
///
/// Bytes that arrive before a read timeout stay in `pending` and are
/// completed by a later call, so a record split across polls is not lost.
pub struct LineReader<R: Read> {
    reader: BufReader<R>,
    pending: Vec<u8>,
    exhausted: bool,
    overflowed: bool,
}
impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            pending: Vec::new(),
            exhausted: false,
            overflowed: false,
        }
    }
    pub fn get_mut(&mut self) -> &mut R {
        self.reader.get_mut()
    }
    fn take_record(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.pending);
        if self.overflowed {
            // tail of an oversized record; resync from here
            self.overflowed = false;
            return None;
        }
        decode_line(&raw)
    }
}
impl<R: Read> LineSource for LineReader<R> {
    fn read_line(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        loop {
            let (used, newline) = {
                let available = match self.reader.fill_buf() {
                    Ok(buf) => buf,
                    Err(err) => {
                        match err.kind() {
                            ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted => {}
                            _ => log::debug!("serial read failed: {err}"),
                        }
                        return None;
                    }
                };
                if available.is_empty() {
                    self.exhausted = true;
                    return self.take_record();
                }
                let (chunk, newline) = match available.iter().position(|&b| b == b'\n') {
                    Some(idx) => (&available[..idx], true),
                    None => (available, false),
                };
                // 溢出后直到下一个换行符之前的字节全部丢弃
                if !self.overflowed {
                    self.pending.extend_from_slice(chunk);
                }
                (chunk.len() + usize::from(newline), newline)
            };
            self.reader.consume(used);
            if self.pending.len() > MAX_LINE_BYTES {
                log::warn!(
                    "dropping {} bytes without a newline (limit {MAX_LINE_BYTES})",
                    self.pending.len()
                );
                self.pending.clear();
                self.overflowed = true;
            }
            if newline {
                return self.take_record();
            }
        }
    }
    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
/// In-memory source for tests.
#[cfg(test)]
pub struct ManualSource {
    queue: std::collections::VecDeque<Vec<u8>>,
}
#[cfg(test)]
impl ManualSource {
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        Self {
            queue: lines.into_iter().map(Into::into).collect(),
        }
    }
}
#[cfg(test)]
impl LineSource for ManualSource {
    fn read_line(&mut self) -> Option<String> {
        self.queue.pop_front().and_then(|raw| decode_line(&raw))
    }
    fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }
}
/// Synthetic INA219-style device: a CSV header, noisy rows, and a
/// `Time to encrypt` summary after every `rows_per_run` rows.
pub struct SimulatedSource {
    rng: StdRng,
    rows_per_run: usize,
    row: usize,
    header_sent: bool,
}
impl SimulatedSource {
    pub fn new(seed: u64, rows_per_run: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            rows_per_run: rows_per_run.max(1),
            row: 0,
            header_sent: false,
        }
    }
}
impl LineSource for SimulatedSource {
    fn read_line(&mut self) -> Option<String> {
        if !self.header_sent {
            self.header_sent = true;
            return Some("Voltage(V),Current(mA),Power(mW)".to_owned());
        }
        if self.row == self.rows_per_run {
            self.row = 0;
            let ms = self.rng.gen_range(400.0..650.0);
            return Some(format!("Time to encrypt : {ms:.3} ms"));
        }
        self.row += 1;
        // current rises while the cipher runs
        let load = (self.row as f64 / self.rows_per_run as f64 * std::f64::consts::PI).sin();
        let voltage = 3.3 - 0.05 * load + self.rng.gen_range(-0.01..0.01);
        let current = 20.0 + 35.0 * load + self.rng.gen_range(-1.5..1.5);
        let power = voltage * current;
        Some(format!("{voltage:.3},{current:.2},{power:.2}"))
    }
}
