// Runtime executor for the bubble plot pipeline
//
// Stages run strictly in order; every configuration check finishes before
// the first row is ingested, and any failure stops the run with no output.

use crate::binning;
use crate::compiler;
use crate::config::BubbleConfig;
use crate::data::PlotData;
use crate::error::{BubbleError, Result};
use crate::graph;
use crate::ir::{AxisRange, BinnedData, ColumnRoles, LegendContent, ResolvedColumns, SceneGraph};
use crate::layout::FigureLayout;
use crate::legend;
use crate::resolve;
use crate::scale::RangeUnifier;
use crate::transform::TransformPipeline;
use crate::OutputFormat;
use anyhow::Context;
use tracing::{debug, info};

/// Everything computed before drawing starts
#[derive(Debug, Clone)]
pub struct PreparedPlot {
    pub columns: ResolvedColumns,
    pub pipeline: TransformPipeline,
    pub binned: BinnedData,
    pub layout: FigureLayout,
    pub range: AxisRange,
    pub legend: Option<LegendContent>,
}

impl PreparedPlot {
    pub fn compile(&self, config: &BubbleConfig) -> SceneGraph {
        compiler::compile_scene(
            &self.binned,
            &self.columns,
            &self.layout,
            &self.range,
            self.legend.as_ref(),
            config,
        )
    }
}

/// Validate, ingest, lay out and build the legend
pub fn prepare_plot(
    roles: &ColumnRoles,
    config: &BubbleConfig,
    data: &PlotData,
) -> Result<PreparedPlot> {
    // Unconfigured -> ColumnsValidated
    config.validate()?;
    let columns = resolve::resolve_columns(roles, data)?;
    let pipeline = config.transform_pipeline()?;
    debug!(roles = ?roles.bound(), "Columns validated");
    if !pipeline.is_identity() {
        debug!(steps = pipeline.steps().len(), "Size transform ready");
    }

    if data.is_empty() {
        return Err(BubbleError::EmptyData);
    }

    // Ingesting -> GroupsComplete
    let binned = binning::bin_rows(data, &columns, &pipeline, config.z_is_radius)?;
    info!(
        rows = data.len(),
        groups = binned.groups.len(),
        categories = binned.categories.len(),
        "Rows ingested"
    );

    let has_legend = columns.category.is_some() || columns.z.is_some();
    let layout = FigureLayout::new(
        binned.groups.len(),
        config.margin,
        has_legend.then_some(config.legend_ratio),
    );
    debug!(rows = layout.rows, cols = layout.cols, "Grid chosen");

    let mut unifier = RangeUnifier::new();
    for bounds in binned.groups.iter().filter_map(|g| g.bounds()) {
        unifier.report(bounds);
    }
    let range = unifier.finish(&config.ranges);
    debug!(x = ?range.x, y = ?range.y, "Shared range computed");

    // LegendBuilt
    let legend = legend::build_legend(&binned, &columns, &pipeline);
    if let Some(content) = &legend {
        debug!(
            swatches = content.swatches.len(),
            bubble = content.size.is_some(),
            "Legend built"
        );
    }

    Ok(PreparedPlot { columns, pipeline, binned, layout, range, legend })
}

/// Run the whole pipeline and return the encoded image
pub fn render_plot(
    roles: &ColumnRoles,
    config: &BubbleConfig,
    data: &PlotData,
) -> anyhow::Result<Vec<u8>> {
    let prepared = prepare_plot(roles, config, data)?;
    let scene = prepared.compile(config);

    let bytes = match config.format {
        OutputFormat::Png => graph::render_png(&scene).context("Failed to render PNG")?,
        OutputFormat::Svg => graph::render_svg(&scene).context("Failed to render SVG")?,
    };
    info!(
        width = scene.width,
        height = scene.height,
        bytes = bytes.len(),
        "Rendered"
    );
    Ok(bytes)
}
