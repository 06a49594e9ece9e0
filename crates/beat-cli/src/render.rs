use anyhow::Result;
use beat_lib::plot::{self, Figure, PlotBackend, SeriesKind};
use plotters::prelude::*;
use std::path::PathBuf;

/// Writes a figure to a PNG file.
pub struct PngBackend {
    pub path: PathBuf,
    pub size: (u32, u32),
}

impl PngBackend {
    pub fn new(path: PathBuf, size: (u32, u32)) -> Self {
        Self { path, size }
    }
}

fn rgb(color: plot::Color) -> RGBColor {
    let (r, g, b) = color.rgb();
    RGBColor(r, g, b)
}

/// Keep plotters happy when a series is flat or a single point.
fn widen(min: f64, max: f64) -> (f64, f64) {
    if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    }
}

impl PlotBackend for PngBackend {
    fn draw(&mut self, fig: &Figure) -> Result<()> {
        let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let (x_min, x_max, y_min, y_max) = fig.bounds().unwrap_or((0.0, 1.0, 0.0, 1.0));
        let (x_min, x_max) = widen(x_min, x_max);
        let (y_min, y_max) = widen(y_min, y_max);
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&fig.title, ("sans-serif", 24))
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        let mut mesh = chart.configure_mesh();
        if let Some(label) = &fig.x_label {
            mesh.x_desc(label.clone());
        }
        mesh.draw()?;

        for series in &fig.series {
            let color = rgb(series.stroke.color);
            let width = series.stroke.width.round().max(1.0);
            match series.kind {
                SeriesKind::Line => {
                    chart.draw_series(LineSeries::new(
                        series.points.iter().map(|p| (p[0], p[1])),
                        color.stroke_width(width as u32),
                    ))?;
                }
                SeriesKind::Markers => {
                    chart.draw_series(
                        series
                            .points
                            .iter()
                            .map(|p| Circle::new((p[0], p[1]), width as i32, color.filled())),
                    )?;
                }
            }
        }
        root.present()?;
        log::info!("wrote {}", self.path.display());
        Ok(())
    }
}
