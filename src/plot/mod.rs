//! Ramachandran plot composition
//!
//! Draws the log-scaled reference density as a colormapped raster, overlays
//! contour lines at exponential density levels, then scatters the extracted
//! (phi, psi) pairs of each input structure. Figures are rendered with the
//! SVG backend to avoid system font dependencies.

pub mod contour;
pub mod density;

use crate::error::{Result, TorsionError};
use crate::torsions::{phi_psi, Extraction};
use contour::contour_segments;
use density::{DensityGrid, GRID_SIZE};

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters_svg::SVGBackend;
use std::path::{Path, PathBuf};

/// Colormap for the density background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Dark purple through orange to pale yellow
    #[default]
    Magma,
    /// Dark blue through green to yellow
    Viridis,
}

impl Colormap {
    /// Color at normalized position `t` in [0, 1]
    pub fn color_at(&self, t: f64) -> RGBColor {
        const MAGMA: [(u8, u8, u8); 9] = [
            (0, 0, 4),
            (28, 16, 68),
            (79, 18, 123),
            (129, 37, 129),
            (181, 54, 122),
            (229, 80, 100),
            (251, 135, 97),
            (254, 194, 135),
            (252, 253, 191),
        ];
        const VIRIDIS: [(u8, u8, u8); 9] = [
            (68, 1, 84),
            (72, 40, 120),
            (62, 74, 137),
            (49, 104, 142),
            (38, 130, 142),
            (31, 158, 137),
            (53, 183, 121),
            (109, 205, 89),
            (253, 231, 37),
        ];

        let anchors: &[(u8, u8, u8)] = match self {
            Colormap::Magma => &MAGMA,
            Colormap::Viridis => &VIRIDIS,
        };

        let t = t.clamp(0.0, 1.0);
        let scaled = t * (anchors.len() - 1) as f64;
        let idx = (scaled.floor() as usize).min(anchors.len() - 2);
        let frac = scaled - idx as f64;

        let (r0, g0, b0) = anchors[idx];
        let (r1, g1, b1) = anchors[idx + 1];
        let lerp = |a: u8, b: u8| -> u8 { (a as f64 + (b as f64 - a as f64) * frac).round() as u8 };
        RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
    }
}

/// Scatter colors used in batch mode, one per input file
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<RGBColor>,
}

impl Default for Palette {
    /// The eight named base colors: blue, green, red, cyan, magenta,
    /// yellow, black, white
    fn default() -> Self {
        Self {
            colors: vec![BLUE, GREEN, RED, CYAN, MAGENTA, YELLOW, BLACK, WHITE],
        }
    }
}

impl Palette {
    pub fn with_colors(colors: Vec<RGBColor>) -> Self {
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, idx: usize) -> RGBColor {
        self.colors[idx]
    }
}

/// Plot appearance and output options
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub colormap: Colormap,
    /// Opacity of the density raster
    pub alpha: f64,
    /// Pixels per inch; the figure is 5.5 x 5 inches (8.5 x 5 in batch mode)
    pub dpi: u32,
    /// Whether to write the figure to `out`
    pub save: bool,
    /// Output path; a `.png` extension is rendered as `.svg`
    pub out: PathBuf,
    pub palette: Palette,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            colormap: Colormap::default(),
            alpha: 0.75,
            dpi: 100,
            save: true,
            out: PathBuf::from("plot.png"),
            palette: Palette::default(),
        }
    }
}

/// What a plot call produced
#[derive(Debug)]
pub struct PlotOutput {
    /// Path the figure was written to, when saving was enabled
    pub path: Option<PathBuf>,
    /// Extraction results per input file, in input order
    pub data: Vec<(PathBuf, Extraction)>,
}

/// Render a single structure: black scatter points, titled with the path
pub fn plot<P: AsRef<Path>>(file: P, config: &PlotConfig) -> Result<PlotOutput> {
    render(&[file.as_ref()], false, config)
}

/// Render several structures into one figure: a palette color per file and
/// a legend keyed by file path, titled "Batch"
pub fn plot_batch<P: AsRef<Path>>(files: &[P], config: &PlotConfig) -> Result<PlotOutput> {
    let refs: Vec<&Path> = files.iter().map(|p| p.as_ref()).collect();
    render(&refs, true, config)
}

const CONTOUR_LEVELS: [f64; 7] = [1e-7, 1e-6, 1e-5, 1e-4, 1e-3, 1e-2, 1e-1];

fn render(files: &[&Path], batch_mode: bool, config: &PlotConfig) -> Result<PlotOutput> {
    // All preconditions are checked before the backend is opened so a
    // failing call never leaves a partial output file behind.
    for file in files {
        if !file.exists() {
            return Err(TorsionError::MissingFile(file.to_path_buf()));
        }
    }
    if batch_mode && files.len() > config.palette.len() {
        return Err(TorsionError::PaletteExhausted {
            requested: files.len(),
            available: config.palette.len(),
        });
    }

    let grid = DensityGrid::reference()?;

    let mut data = Vec::with_capacity(files.len());
    for file in files {
        data.push((file.to_path_buf(), phi_psi(file)?));
    }

    if !config.save {
        return Ok(PlotOutput { path: None, data });
    }

    let svg_path = if config.out.extension().map(|e| e == "png").unwrap_or(false) {
        config.out.with_extension("svg")
    } else {
        config.out.clone()
    };

    let inches = if batch_mode { (8.5, 5.0) } else { (5.5, 5.0) };
    let size = (
        (inches.0 * config.dpi as f64) as u32,
        (inches.1 * config.dpi as f64) as u32,
    );

    let title = if batch_mode {
        "Batch".to_string()
    } else {
        files[0].display().to_string()
    };

    // Scoped so the backend releases its borrow of the path (and flushes)
    // before the output value is assembled.
    {
        let root = SVGBackend::new(&svg_path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-180.0f64..180.0, -180.0f64..180.0)?;

        chart
            .configure_mesh()
            .x_desc("\u{03C6}")
            .y_desc("\u{03C8}")
            .x_labels(9)
            .y_labels(9)
            .x_label_formatter(&|v| format!("{:.0}", v))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .bold_line_style(&BLACK.mix(0.2))
            .light_line_style(&TRANSPARENT)
            .draw()?;

        draw_density(&mut chart, &grid, config)?;
        draw_contours(&mut chart, &grid)?;

        // Zero-reference axis lines
        chart.draw_series(LineSeries::new(
            [(-180.0, 0.0), (180.0, 0.0)],
            BLACK.stroke_width(1),
        ))?;
        chart.draw_series(LineSeries::new(
            [(0.0, -180.0), (0.0, 180.0)],
            BLACK.stroke_width(1),
        ))?;

        for (idx, (file, extraction)) in data.iter().enumerate() {
            let color = if batch_mode {
                config.palette.color(idx)
            } else {
                BLACK
            };
            let series = chart.draw_series(
                extraction
                    .degrees
                    .phi
                    .iter()
                    .zip(extraction.degrees.psi.iter())
                    .map(|(&x, &y)| Circle::new((x, y), 2, color.filled())),
            )?;
            if batch_mode {
                series
                    .label(file.display().to_string())
                    .legend(move |(x, y)| Circle::new((x, y), 3, color.filled()));
            }
        }

        if batch_mode {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }

        root.present()?;
    }
    log::debug!("Wrote Ramachandran plot to {}", svg_path.display());

    Ok(PlotOutput {
        path: Some(svg_path),
        data,
    })
}

type RamaChart<'a, 'b> =
    ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Log-scaled density raster over the full angle range
fn draw_density(chart: &mut RamaChart, grid: &DensityGrid, config: &PlotConfig) -> Result<()> {
    let Some((log_min, log_max)) = grid.log_range() else {
        return Ok(());
    };
    let span = log_max - log_min;
    let cell = 360.0 / GRID_SIZE as f64;

    for i in 0..GRID_SIZE {
        for j in 0..GRID_SIZE {
            let value = grid.value(i, j);
            if value <= 0.0 {
                continue;
            }
            let t = if span > 0.0 {
                (value.ln() - log_min) / span
            } else {
                0.0
            };
            let color = config.colormap.color_at(t);

            let x0 = -180.0 + cell * i as f64;
            let y0 = -180.0 + cell * j as f64;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x0, y0), (x0 + cell, y0 + cell)],
                color.mix(config.alpha).filled(),
            )))?;
        }
    }
    Ok(())
}

/// Contour lines at exponential density levels
fn draw_contours(chart: &mut RamaChart, grid: &DensityGrid) -> Result<()> {
    let style = BLACK.mix(0.65).stroke_width(1);
    for level in CONTOUR_LEVELS {
        for segment in contour_segments(grid, level) {
            chart.draw_series(std::iter::once(PathElement::new(
                segment.to_vec(),
                style,
            )))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::helical_pdb;
    use std::fs;
    use std::io::Write as _;

    fn write_pdb(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(helical_pdb(5).as_bytes()).unwrap();
        path
    }

    fn config_with_out(out: PathBuf) -> PlotConfig {
        PlotConfig {
            out,
            ..PlotConfig::default()
        }
    }

    #[test]
    fn test_single_plot_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let pdb = write_pdb(dir.path(), "helix.pdb");
        let out = dir.path().join("rama.svg");

        let output = plot(&pdb, &config_with_out(out.clone())).unwrap();
        assert_eq!(output.path.as_deref(), Some(out.as_path()));
        assert!(out.exists());
        assert!(fs::metadata(&out).unwrap().len() > 0);
        assert_eq!(output.data.len(), 1);
        assert_eq!(output.data[0].1.degrees.len(), 3);
    }

    #[test]
    fn test_png_extension_becomes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let pdb = write_pdb(dir.path(), "helix.pdb");

        let output = plot(&pdb, &config_with_out(dir.path().join("plot.png"))).unwrap();
        let written = output.path.unwrap();
        assert_eq!(written.extension().unwrap(), "svg");
        assert!(written.exists());
    }

    #[test]
    fn test_batch_plot_with_default_palette() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = (0..4)
            .map(|i| write_pdb(dir.path(), &format!("s{}.pdb", i)))
            .collect();
        let out = dir.path().join("batch.svg");

        let output = plot_batch(&files, &config_with_out(out.clone())).unwrap();
        assert!(out.exists());
        assert_eq!(output.data.len(), 4);
    }

    #[test]
    fn test_missing_file_fails_before_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("rama.svg");

        let err = plot(dir.path().join("missing.pdb"), &config_with_out(out.clone())).unwrap_err();
        match &err {
            TorsionError::MissingFile(path) => {
                assert!(path.to_string_lossy().contains("missing.pdb"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(err.to_string().contains("missing.pdb"));
        assert!(!out.exists());
    }

    #[test]
    fn test_palette_exhaustion() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = (0..4)
            .map(|i| write_pdb(dir.path(), &format!("s{}.pdb", i)))
            .collect();
        let out = dir.path().join("batch.svg");

        let mut config = config_with_out(out.clone());
        config.palette = Palette::with_colors(vec![BLUE, GREEN, RED]);

        let err = plot_batch(&files, &config).unwrap_err();
        assert!(matches!(
            err,
            TorsionError::PaletteExhausted {
                requested: 4,
                available: 3
            }
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_save_disabled_returns_data_only() {
        let dir = tempfile::tempdir().unwrap();
        let pdb = write_pdb(dir.path(), "helix.pdb");
        let out = dir.path().join("rama.svg");

        let mut config = config_with_out(out.clone());
        config.save = false;

        let output = plot(&pdb, &config).unwrap();
        assert!(output.path.is_none());
        assert!(!out.exists());
        assert_eq!(output.data.len(), 1);
    }

    #[test]
    fn test_colormap_endpoints_differ() {
        let low = Colormap::Magma.color_at(0.0);
        let high = Colormap::Magma.color_at(1.0);
        assert_ne!(low, high);
        assert_eq!(low, RGBColor(0, 0, 4));
        assert_eq!(high, RGBColor(252, 253, 191));
    }

    #[test]
    fn test_default_palette_has_eight_distinct_colors() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 8);
        for i in 0..palette.len() {
            for j in i + 1..palette.len() {
                assert_ne!(palette.color(i), palette.color(j));
            }
        }
    }
}
