use serialport::SerialPort;
use std::time::Duration;

use crate::drivers::source::{LineReader, LineSource};
use crate::drivers::TelemetryError;

/// Serial connection to the measurement board.
///
/// The board prints newline-terminated text with no handshake, so the
/// session only ever reads. `close` drops the port exactly once; later calls
/// and the `Drop` impl are no-ops.
pub struct SerialSession {
    port_name: String,
    reader: Option<LineReader<Box<dyn SerialPort>>>,
}

impl SerialSession {
    /// Opens `port_name` at `baud`. Reads wait at most `timeout`.
    pub fn connect(port_name: &str, baud: u32, timeout: Duration) -> Result<Self, TelemetryError> {
        let port = serialport::new(port_name, baud)
            .timeout(timeout)
            .open()
            .map_err(|source| TelemetryError::PortOpen {
                port: port_name.to_string(),
                baud,
                source,
            })?;
        log::info!("opened {port_name} @ {baud} baud (read timeout {timeout:?})");

        Ok(Self {
            port_name: port_name.to_string(),
            reader: Some(LineReader::new(port)),
        })
    }
}

impl LineSource for SerialSession {
    fn read_line(&mut self) -> Option<String> {
        self.reader.as_mut()?.read_line()
    }

    fn close(&mut self) {
        if let Some(mut reader) = self.reader.take() {
            if let Err(err) = reader.get_mut().clear(serialport::ClearBuffer::Input) {
                log::debug!("could not clear input buffer of {}: {err}", self.port_name);
            }
            drop(reader);
            log::info!("closed {}", self.port_name);
        }
    }
}

impl Drop for SerialSession {
    fn drop(&mut self) {
        self.close();
    }
}
