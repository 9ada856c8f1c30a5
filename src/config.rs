use crate::error::{BubbleError, Result};
use crate::ir::RangeOverride;
use crate::parser::parse_transform_spec;
use crate::transform::TransformPipeline;
use crate::{OutputFormat, RenderOptions};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Largest rendered width or height, in pixels
pub const MAX_DIMENSION_PX: f64 = 20_000.0;

/// Layout and appearance options.
///
/// Every field has a default, so a JSON config file only needs the keys it
/// changes. Command-line flags are layered on top by the binary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BubbleConfig {
    /// Marker opacity, in (0, 1]
    pub alpha: f64,
    /// Figure margin as a fraction of each dimension
    pub margin: f64,
    /// Fraction of figure width given to the legend
    pub legend_ratio: f64,
    pub legend_top_padding: f64,
    pub legend_left_padding: f64,
    /// Figure (width, height) in inches
    pub fig_size: (f64, f64),
    pub dpi: u32,
    pub format: OutputFormat,
    pub show_x_labels: bool,
    pub show_y_labels: bool,
    pub z_is_radius: bool,
    /// Transform specs such as "mul(2) | add(3)", applied in order
    pub transforms: Vec<String>,
    pub ranges: RangeOverride,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            alpha: 0.6,
            margin: 0.05,
            legend_ratio: 0.1,
            legend_top_padding: 0.0,
            legend_left_padding: 0.0,
            fig_size: (8.0, 6.0),
            dpi: 100,
            format: OutputFormat::Png,
            show_x_labels: true,
            show_y_labels: true,
            z_is_radius: false,
            transforms: Vec::new(),
            ranges: RangeOverride::default(),
        }
    }
}

impl BubbleConfig {
    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("Invalid configuration JSON")
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))
    }

    /// Check every option before any data is touched
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(BubbleError::invalid_option(
                "alpha",
                format!("{} (must be in (0, 1])", self.alpha),
            ));
        }
        if !(0.0..0.5).contains(&self.margin) {
            return Err(BubbleError::invalid_option(
                "margin",
                format!("{} (must be in [0, 0.5))", self.margin),
            ));
        }
        if !(0.0..1.0).contains(&self.legend_ratio) {
            return Err(BubbleError::invalid_option(
                "legend ratio",
                format!("{} (must be in [0, 1))", self.legend_ratio),
            ));
        }
        if self.legend_ratio + 2.0 * self.margin >= 1.0 {
            return Err(BubbleError::invalid_option(
                "legend ratio",
                "legend and margins leave no room for plots",
            ));
        }
        if !self.legend_top_padding.is_finite() || !self.legend_left_padding.is_finite() {
            return Err(BubbleError::invalid_option("legend padding", "must be finite"));
        }

        let (w, h) = self.fig_size;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(BubbleError::invalid_option(
                "figure size",
                format!("{},{} (width and height must be positive)", w, h),
            ));
        }
        if self.dpi == 0 {
            return Err(BubbleError::invalid_option("dpi", "must be positive"));
        }
        let dpi = self.dpi as f64;
        if (w * dpi).round() > MAX_DIMENSION_PX || (h * dpi).round() > MAX_DIMENSION_PX {
            return Err(BubbleError::invalid_option(
                "figure size",
                format!(
                    "{},{} at {} dpi exceeds {} pixels per side",
                    w, h, self.dpi, MAX_DIMENSION_PX
                ),
            ));
        }

        validate_axis("x", self.ranges.xmin, self.ranges.xmax)?;
        validate_axis("y", self.ranges.ymin, self.ranges.ymax)?;
        Ok(())
    }

    /// Parse and compose every transform spec, in order
    pub fn transform_pipeline(&self) -> Result<TransformPipeline> {
        let mut pairs = Vec::new();
        for spec in &self.transforms {
            pairs.extend(parse_transform_spec(spec)?);
        }
        TransformPipeline::build(&pairs)
    }

    pub fn render_options(&self) -> RenderOptions {
        let dpi = self.dpi as f64;
        RenderOptions {
            width: (self.fig_size.0 * dpi).round().max(1.0) as u32,
            height: (self.fig_size.1 * dpi).round().max(1.0) as u32,
            format: self.format,
        }
    }

    /// Pixels per typographic point
    pub fn px_per_pt(&self) -> f64 {
        self.dpi as f64 / 72.0
    }
}

fn validate_axis(axis: &str, min: Option<f64>, max: Option<f64>) -> Result<()> {
    for bound in [min, max].into_iter().flatten() {
        if !bound.is_finite() {
            return Err(BubbleError::invalid_option(
                "ranges",
                format!("{} bound {} is not finite", axis, bound),
            ));
        }
    }
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo >= hi {
            return Err(BubbleError::invalid_option(
                "ranges",
                format!("{}min {} must be less than {}max {}", axis, lo, axis, hi),
            ));
        }
    }
    Ok(())
}
