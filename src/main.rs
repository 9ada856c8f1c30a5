use anyhow::{Context, Result};
use bubbleplot::config::BubbleConfig;
use bubbleplot::data::PlotData;
use bubbleplot::ir::{ColumnRoles, RangeOverride};
use bubbleplot::parser::{parse_fig_size, parse_ranges};
use bubbleplot::{runtime, OutputFormat};
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bubbleplot")]
#[command(about = "Render bubble plots from CSV data", long_about = None)]
struct Args {
    /// Input CSV file (`-` for stdin, `*.json` for an array of objects)
    input_file: PathBuf,

    /// Column for the x axis
    x: String,

    /// Column for the y axis
    y: String,

    /// Column encoding marker size
    z: Option<String>,

    /// Column encoding marker color
    #[arg(short = 'c', long)]
    category: Option<String>,

    /// Column splitting rows into sub-plots
    #[arg(short = 'g', long)]
    group: Option<String>,

    /// Column with per-point text
    #[arg(short = 'l', long)]
    label: Option<String>,

    /// Treat Z as a radius instead of an area
    #[arg(long)]
    z_is_radius: bool,

    /// Size transform, e.g. 'mul(2) | add(3)' (repeatable)
    #[arg(short = 't', long = "transform")]
    transforms: Vec<String>,

    /// Axis overrides as xmin,xmax,ymin,ymax with `_` for computed bounds
    #[arg(long, allow_hyphen_values = true)]
    ranges: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    xmin: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    xmax: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    ymin: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    ymax: Option<f64>,

    /// Marker opacity in (0, 1]
    #[arg(long)]
    alpha: Option<f64>,

    /// Figure margin as a fraction of each side
    #[arg(long)]
    margin: Option<f64>,

    /// Fraction of the figure width used by the legend
    #[arg(long)]
    legend_ratio: Option<f64>,

    #[arg(long)]
    legend_top_padding: Option<f64>,

    #[arg(long)]
    legend_left_padding: Option<f64>,

    /// Figure size in inches as width,height
    #[arg(long)]
    figsize: Option<String>,

    #[arg(long)]
    dpi: Option<u32>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    #[arg(long)]
    hide_x_labels: bool,

    #[arg(long)]
    hide_y_labels: bool,

    /// Output path (`-` for stdout); defaults to a timestamped file name
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// JSON file with layout options; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    fn roles(&self) -> ColumnRoles {
        ColumnRoles {
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
            category: self.category.clone(),
            group: self.group.clone(),
            label: self.label.clone(),
        }
    }

    /// Config file first, then every flag that was given
    fn config(&self) -> Result<BubbleConfig> {
        let mut config = match &self.config {
            Some(path) => BubbleConfig::from_json_file(path)?,
            None => BubbleConfig::default(),
        };

        if let Some(v) = self.alpha {
            config.alpha = v;
        }
        if let Some(v) = self.margin {
            config.margin = v;
        }
        if let Some(v) = self.legend_ratio {
            config.legend_ratio = v;
        }
        if let Some(v) = self.legend_top_padding {
            config.legend_top_padding = v;
        }
        if let Some(v) = self.legend_left_padding {
            config.legend_left_padding = v;
        }
        if let Some(size) = &self.figsize {
            config.fig_size = parse_fig_size(size)?;
        }
        if let Some(v) = self.dpi {
            config.dpi = v;
        }
        match (self.format, self.output.as_deref().and_then(format_from_path)) {
            (Some(format), _) | (None, Some(format)) => config.format = format,
            (None, None) => {}
        }
        if self.hide_x_labels {
            config.show_x_labels = false;
        }
        if self.hide_y_labels {
            config.show_y_labels = false;
        }
        if self.z_is_radius {
            config.z_is_radius = true;
        }
        config.transforms.extend(self.transforms.iter().cloned());

        if let Some(ranges) = &self.ranges {
            config.ranges = config.ranges.merge(parse_ranges(ranges)?);
        }
        config.ranges = config.ranges.merge(RangeOverride {
            xmin: self.xmin,
            xmax: self.xmax,
            ymin: self.ymin,
            ymax: self.ymax,
        });

        Ok(config)
    }
}

fn format_from_path(path: &Path) -> Option<OutputFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some(OutputFormat::Png),
        "svg" => Some(OutputFormat::Svg),
        _ => None,
    }
}

fn default_output(format: OutputFormat) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("bubble_{}.{}", stamp, format.extension()))
}

fn run(args: Args) -> Result<()> {
    let config = args.config()?;
    let data = PlotData::load(&args.input_file)
        .with_context(|| format!("Failed to load '{}'", args.input_file.display()))?;
    info!(
        columns = data.headers.len(),
        rows = data.len(),
        "Loaded {}",
        args.input_file.display()
    );

    // Rendered fully in memory so a failed run never leaves a file behind
    let bytes = runtime::render_plot(&args.roles(), &config, &data)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(config.format));
    if output.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(&bytes)
            .context("Failed to write image to stdout")?;
        handle.flush().context("Failed to flush stdout")?;
    } else {
        std::fs::write(&output, &bytes)
            .with_context(|| format!("Failed to write '{}'", output.display()))?;
        info!("Wrote {}", output.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
