use crate::config::BubbleConfig;
use crate::ir::{
    AxisRange, BinnedData, GroupData, LegendContent, LegendEntry, LegendScene, Marker,
    PanelScene, PointLabel, ResolvedColumns, SceneGraph,
};
use crate::layout::FigureLayout;
use crate::palette::DEFAULT_MARKER_COLOR;

/// Marker area in points² when no Z column is bound
pub const DEFAULT_MARKER_AREA: f64 = 36.0;

/// Legend swatch diameter in points
pub const SWATCH_DIAMETER_PT: f64 = 10.0;

/// Pixel radius of a marker whose area is `area` points², at most `max_radius`
pub fn marker_radius(area: f64, px_per_pt: f64, max_radius: f64) -> f64 {
    if !area.is_finite() || area <= 0.0 {
        return 0.0;
    }
    ((area / std::f64::consts::PI).sqrt() * px_per_pt).min(max_radius)
}

/// Compile binned groups, the shared range and the legend into a SceneGraph
pub fn compile_scene(
    data: &BinnedData,
    columns: &ResolvedColumns,
    layout: &FigureLayout,
    range: &AxisRange,
    legend: Option<&LegendContent>,
    config: &BubbleConfig,
) -> SceneGraph {
    let options = config.render_options();
    let px_per_pt = config.px_per_pt();
    // No marker needs to be larger than the figure diagonal
    let max_radius = (options.width as f64).hypot(options.height as f64);
    let radius = |area: f64| marker_radius(area, px_per_pt, max_radius);
    let titled = data.groups.len() > 1;

    let panels = data
        .groups
        .iter()
        .enumerate()
        .map(|(k, group)| {
            let (row, col) = layout.grid_position(k);
            let show_x_ticks = row == 0 && config.show_x_labels;
            let show_y_ticks = col == 0 && config.show_y_labels;

            PanelScene {
                rect: layout.cell(k).to_pixels(options.width, options.height),
                title: titled.then(|| group.key.clone()),
                range: *range,
                show_x_ticks,
                show_y_ticks,
                x_desc: show_x_ticks.then(|| columns.x.name.clone()),
                y_desc: show_y_ticks.then(|| columns.y.name.clone()),
                markers: compile_markers(group, &radius),
                labels: compile_labels(group),
            }
        })
        .collect();

    let legend = match (legend, layout.legend_rect()) {
        (Some(content), Some(frac)) => {
            let rect = frac.to_pixels(options.width, options.height);
            let anchor = (
                rect.left + (config.legend_left_padding * rect.width as f64).round() as i32,
                rect.top + (config.legend_top_padding * rect.height as f64).round() as i32,
            );
            let bubble = content.size.as_ref().map(|size| LegendEntry {
                radius: radius(size.size),
                color: DEFAULT_MARKER_COLOR.to_rgb(),
                text: size.text.clone(),
            });
            let swatches = content
                .swatches
                .iter()
                .map(|swatch| LegendEntry {
                    radius: SWATCH_DIAMETER_PT / 2.0 * px_per_pt,
                    color: swatch.color.to_rgb(),
                    text: swatch.label.clone(),
                })
                .collect();
            Some(LegendScene { rect, anchor, bubble, swatches })
        }
        _ => None,
    };

    SceneGraph {
        width: options.width,
        height: options.height,
        alpha: config.alpha,
        px_per_pt,
        panels,
        legend,
    }
}

/// Unbound channels fall back to the default area and color; a bound but
/// short channel also falls back instead of dropping points.
fn compile_markers(group: &GroupData, radius: &impl Fn(f64) -> f64) -> Vec<Marker> {
    let mut sizes = group.sizes.iter().flatten();
    let mut colors = group.colors.iter().flatten();
    group
        .x
        .iter()
        .zip(&group.y)
        .map(|(&x, &y)| {
            let area = sizes.next().copied().unwrap_or(DEFAULT_MARKER_AREA);
            let color = colors.next().copied().unwrap_or(DEFAULT_MARKER_COLOR);
            Marker {
                x,
                y,
                radius: radius(area),
                color: color.to_rgb(),
            }
        })
        .collect()
}

fn compile_labels(group: &GroupData) -> Vec<PointLabel> {
    match &group.labels {
        Some(labels) => group
            .x
            .iter()
            .zip(&group.y)
            .zip(labels)
            .map(|((&x, &y), text)| PointLabel { x, y, text: text.clone() })
            .collect(),
        None => Vec::new(),
    }
}
