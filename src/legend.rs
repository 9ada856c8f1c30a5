use crate::ir::{BinnedData, LegendContent, ResolvedColumns, SizeLegend, Swatch};
use crate::transform::TransformPipeline;

/// Build legend content, or `None` when neither Category nor Z is bound
pub fn build_legend(
    binned: &BinnedData,
    columns: &ResolvedColumns,
    pipeline: &TransformPipeline,
) -> Option<LegendContent> {
    if columns.category.is_none() && columns.z.is_none() {
        return None;
    }

    let size = columns.z.as_ref().and_then(|z| {
        representative_size(&binned.observed_sizes).map(|size| SizeLegend {
            size,
            text: format!("{} = {}", pipeline.label(&z.name), format_size(size)),
        })
    });

    let swatches = if columns.category.is_some() {
        binned
            .categories
            .iter()
            .map(|(label, color)| Swatch {
                color: *color,
                label: label.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    Some(LegendContent { size, swatches })
}

/// Element at index `n / 2` of the sorted pool (no even-length averaging)
pub fn representative_size(pool: &[f64]) -> Option<f64> {
    if pool.is_empty() {
        return None;
    }
    let mut sorted = pool.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted[sorted.len() / 2])
}

/// Values above 10 are shown as integers (truncated); others as-is
pub fn format_size(value: f64) -> String {
    if value > 10.0 {
        format!("{:.0}", value.trunc())
    } else {
        format!("{}", value)
    }
}
