use crate::ir::{LegendScene, PanelScene, SceneGraph};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const FONT_FAMILY: &str = "sans-serif";
const LABEL_FONT_PT: f64 = 11.0;
const TITLE_FONT_PT: f64 = 16.0;
const TICK_FONT_PT: f64 = 10.0;
const LEGEND_FONT_PT: f64 = 11.0;

/// Gap between legend entries and between a marker and its text, in points
const LEGEND_GAP_PT: f64 = 6.0;

/// Draw a complete scene onto a backend
pub fn draw_scene<DB>(root: &DrawingArea<DB, Shift>, scene: &SceneGraph) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    for panel in &scene.panels {
        draw_panel(root, panel, scene)?;
    }
    if let Some(legend) = &scene.legend {
        draw_legend(root, legend, scene)?;
    }

    Ok(())
}

fn font_px(pt: f64, scene: &SceneGraph) -> f64 {
    (pt * scene.px_per_pt).max(1.0)
}

fn draw_panel<DB>(root: &DrawingArea<DB, Shift>, panel: &PanelScene, scene: &SceneGraph) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let rect = panel.rect;
    let area = root.clone().shrink((rect.left, rect.top), (rect.width, rect.height));

    let tick_px = font_px(TICK_FONT_PT, scene);
    let x_area = if panel.show_x_ticks { (tick_px * 3.5) as u32 } else { 0 };
    let y_area = if panel.show_y_ticks { (tick_px * 5.0) as u32 } else { 0 };

    let (x0, x1) = panel.range.x;
    let (y0, y1) = panel.range.y;
    let mut chart = ChartBuilder::on(&area)
        .x_label_area_size(x_area)
        .y_label_area_size(y_area)
        .build_cartesian_2d(x0..x1, y0..y1)
        .context("Failed to build chart")?;

    let show_x = panel.show_x_ticks;
    let show_y = panel.show_y_ticks;
    let x_fmt = move |v: &f64| if show_x { tick_format(*v) } else { String::new() };
    let y_fmt = move |v: &f64| if show_y { tick_format(*v) } else { String::new() };

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .label_style((FONT_FAMILY, tick_px))
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt);
    if let Some(desc) = &panel.x_desc {
        mesh.x_desc(desc.as_str());
    }
    if let Some(desc) = &panel.y_desc {
        mesh.y_desc(desc.as_str());
    }
    mesh.draw().context("Failed to draw axes")?;

    chart
        .draw_series(panel.markers.iter().map(|m| {
            Circle::new((m.x, m.y), m.radius.round() as i32, m.color.mix(scene.alpha).filled())
        }))
        .context("Failed to draw markers")?;

    if !panel.labels.is_empty() {
        let style = TextStyle::from((FONT_FAMILY, font_px(LABEL_FONT_PT, scene)).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart
            .draw_series(
                panel
                    .labels
                    .iter()
                    .map(|l| Text::new(l.text.clone(), (l.x, l.y), style.clone())),
            )
            .context("Failed to draw point labels")?;
    }

    if let Some(title) = &panel.title {
        // Upper-left corner of the axes, inset by 5%
        let (px, py) = chart.plotting_area().get_pixel_range();
        let x = px.start + ((px.end - px.start) as f64 * 0.05) as i32;
        let y = py.start + ((py.end - py.start) as f64 * 0.05) as i32;
        let style = TextStyle::from((FONT_FAMILY, font_px(TITLE_FONT_PT, scene)).into_font())
            .pos(Pos::new(HPos::Left, VPos::Top));
        root.draw(&Text::new(title.as_str(), (x, y), style))
            .context("Failed to draw group title")?;
    }

    Ok(())
}

fn draw_legend<DB>(root: &DrawingArea<DB, Shift>, legend: &LegendScene, scene: &SceneGraph) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let font = font_px(LEGEND_FONT_PT, scene);
    let gap = LEGEND_GAP_PT * scene.px_per_pt;
    let style = TextStyle::from((FONT_FAMILY, font).into_font())
        .pos(Pos::new(HPos::Left, VPos::Center));

    let (left, mut top) = (legend.anchor.0 as f64, legend.anchor.1 as f64);
    let entries = legend.bubble.iter().chain(legend.swatches.iter());
    for entry in entries {
        let line = (2.0 * entry.radius).max(font);
        let cy = (top + line / 2.0).round() as i32;
        let cx = (left + entry.radius).round() as i32;

        root.draw(&Circle::new(
            (cx, cy),
            entry.radius.round() as i32,
            entry.color.mix(scene.alpha).filled(),
        ))
        .context("Failed to draw legend marker")?;

        let tx = (left + 2.0 * entry.radius + gap).round() as i32;
        root.draw(&Text::new(entry.text.as_str(), (tx, cy), style.clone()))
            .context("Failed to draw legend text")?;

        top += line + gap;
    }

    Ok(())
}

/// Tick label text: up to four decimals, trailing zeros dropped
pub fn tick_format(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

/// Render the scene to PNG bytes
pub fn render_png(scene: &SceneGraph) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; scene.width as usize * scene.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (scene.width, scene.height))
            .into_drawing_area();
        draw_scene(&root, scene)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, scene.width, scene.height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

/// Render the scene to an SVG document
pub fn render_svg(scene: &SceneGraph) -> Result<Vec<u8>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (scene.width, scene.height))
            .into_drawing_area();
        draw_scene(&root, scene)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg.into_bytes())
}
