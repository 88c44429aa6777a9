use thiserror::Error;
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to open serial port {port} @ {baud}: {source}")]
    PortOpen {
        port: String,
        baud: u32,
        #[source]
        source: serialport::Error,
    },
    #[error("sample capacity must be greater than zero")]
    InvalidCapacity,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for TelemetryError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        TelemetryError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for TelemetryError {
    fn from(value: image::ImageError) -> Self {
        TelemetryError::Plot(value.to_string())
    }
}
