use std::io::Cursor;
use std::path::Path;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::drivers::render::ChartBoard;
use crate::drivers::TelemetryError;
use crate::types::SeriesKind;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub foreground: RGBColor,
}
impl Default for PlotStyle {
    fn default() -> Self {
        // white background, black axes
        Self {
            width: 900,
            height: 700,
            background: WHITE,
            foreground: BLACK,
        }
    }
}
/// Pads a degenerate range so plotters always gets a non-empty span.
pub fn padded_range(bounds: Option<(f64, f64)>, fallback: (f64, f64)) -> (f64, f64) {
    match bounds {
        Some((lo, hi)) if (hi - lo).abs() > f64::EPSILON => {
            let pad = (hi - lo) * 0.02;
            (lo - pad, hi + pad)
        }
        Some((lo, _)) => (lo - 1.0, lo + 1.0),
        None => fallback,
    }
}
/// Renders the three charts stacked vertically, like the live window.
pub fn render_board_png(board: &ChartBoard, style: &PlotStyle) -> Result<Vec<u8>, TelemetryError> {
    if board.is_empty() {
        return Err(TelemetryError::Plot("chart board has no samples".into()));
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let (x_lo, x_hi) = padded_range(board.x_bounds(), (0.0, 1.0));
        let areas = root.split_evenly((SeriesKind::ALL.len(), 1));
        for (area, kind) in areas.iter().zip(SeriesKind::ALL) {
            let (y_lo, y_hi) = padded_range(board.y_bounds(kind.name()), (-1.0, 1.0));
            let (r, g, b) = kind.rgb();
            let color = RGBColor(r, g, b);
            let mut chart = ChartBuilder::on(area)
                .margin(10)
                .caption(kind.title(), ("sans-serif", 18).into_font().color(&style.foreground))
                .set_label_area_size(LabelAreaPosition::Left, 55)
                .set_label_area_size(LabelAreaPosition::Bottom, 35)
                .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
            chart
                .configure_mesh()
                .x_desc(board.axis_label())
                .light_line_style(&style.foreground.mix(0.1))
                .draw()?;
            let series = board.kind_points(kind).iter().map(|p| (p[0], p[1]));
            chart
                .draw_series(LineSeries::new(series, color.stroke_width(2)))?
                .label(kind.name())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
            chart
                .configure_series_labels()
                .border_style(&style.foreground.mix(0.2))
                .background_style(&style.background)
                .draw()?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// Renders the board and writes it to `path`.
pub fn write_snapshot(board: &ChartBoard, path: &Path) -> Result<(), TelemetryError> {
    let png = render_board_png(board, &PlotStyle::default())?;
    std::fs::write(path, png)?;
    Ok(())
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, TelemetryError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| TelemetryError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
