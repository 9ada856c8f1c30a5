use crate::palette::PaletteColor;
use plotters::style::RGBColor;
use std::fmt;

// =============================================================================
// Phase 1: Resolution
// =============================================================================

/// The role a column plays in the plot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    X,
    Y,
    Z,
    Category,
    Group,
    Label,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnRole::X => "x",
            ColumnRole::Y => "y",
            ColumnRole::Z => "z",
            ColumnRole::Category => "category",
            ColumnRole::Group => "group",
            ColumnRole::Label => "label",
        };
        f.write_str(name)
    }
}

/// Column names requested for each role (not yet checked against the header)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnRoles {
    pub x: String,
    pub y: String,
    pub z: Option<String>,
    pub category: Option<String>,
    pub group: Option<String>,
    pub label: Option<String>,
}

impl ColumnRoles {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            ..Default::default()
        }
    }

    /// Every bound role paired with its column name, in role order
    pub fn bound(&self) -> Vec<(ColumnRole, &str)> {
        let mut out = vec![(ColumnRole::X, self.x.as_str()), (ColumnRole::Y, self.y.as_str())];
        let optional = [
            (ColumnRole::Z, &self.z),
            (ColumnRole::Category, &self.category),
            (ColumnRole::Group, &self.group),
            (ColumnRole::Label, &self.label),
        ];
        for (role, name) in optional {
            if let Some(name) = name {
                out.push((role, name.as_str()));
            }
        }
        out
    }
}

/// A role bound to a column that exists in the header
#[derive(Debug, Clone, PartialEq)]
pub struct BoundColumn {
    pub name: String,
    pub index: usize,
}

/// Result of validating [`ColumnRoles`] against the header
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumns {
    pub x: BoundColumn,
    pub y: BoundColumn,
    pub z: Option<BoundColumn>,
    pub category: Option<BoundColumn>,
    pub group: Option<BoundColumn>,
    pub label: Option<BoundColumn>,
}

// =============================================================================
// Phase 2: Binning
// =============================================================================

/// Group id used for every row when no Group column is bound
pub const IMPLICIT_GROUP: &str = "1";

/// Everything needed to draw one sub-plot.
///
/// Optional channels are `Some` exactly when the matching role is bound,
/// and then hold one entry per point.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupData {
    pub key: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub sizes: Option<Vec<f64>>, // post-transform
    pub colors: Option<Vec<PaletteColor>>,
    pub labels: Option<Vec<String>>,
}

impl GroupData {
    pub fn new(key: impl Into<String>, columns: &ResolvedColumns) -> Self {
        Self {
            key: key.into(),
            x: Vec::new(),
            y: Vec::new(),
            sizes: columns.z.as_ref().map(|_| Vec::new()),
            colors: columns.category.as_ref().map(|_| Vec::new()),
            labels: columns.label.as_ref().map(|_| Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Raw data bounds of this group, `None` if it holds no points
    pub fn bounds(&self) -> Option<Bounds> {
        if self.is_empty() {
            return None;
        }
        Some(Bounds {
            x: min_max(&self.x),
            y: min_max(&self.y),
        })
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Output of ingestion: groups in first-seen order plus the run-scoped pools
#[derive(Debug, Clone)]
pub struct BinnedData {
    pub groups: Vec<GroupData>,
    /// Category registry, read-only once ingestion finishes
    pub categories: Vec<(String, PaletteColor)>,
    /// Every transformed Z value across all groups, in ingestion order
    pub observed_sizes: Vec<f64>,
}

// =============================================================================
// Phase 3: Scaling
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Bounds {
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            x: (self.x.0.min(other.x.0), self.x.1.max(other.x.1)),
            y: (self.y.0.min(other.y.0), self.y.1.max(other.y.1)),
        }
    }
}

/// Explicit per-bound overrides; each bound is independent
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct RangeOverride {
    pub xmin: Option<f64>,
    pub xmax: Option<f64>,
    pub ymin: Option<f64>,
    pub ymax: Option<f64>,
}

impl RangeOverride {
    /// Overlay `other` on top of `self`; bounds set in `other` win
    pub fn merge(self, other: RangeOverride) -> RangeOverride {
        RangeOverride {
            xmin: other.xmin.or(self.xmin),
            xmax: other.xmax.or(self.xmax),
            ymin: other.ymin.or(self.ymin),
            ymax: other.ymax.or(self.ymax),
        }
    }
}

/// The single axis window shared by every sub-plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

// =============================================================================
// Phase 4: Legend
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LegendContent {
    pub size: Option<SizeLegend>,
    pub swatches: Vec<Swatch>,
}

/// The representative bubble
#[derive(Debug, Clone, PartialEq)]
pub struct SizeLegend {
    pub size: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Swatch {
    pub color: PaletteColor,
    pub label: String,
}

// =============================================================================
// Phase 5: Compilation (Scene Graph)
// =============================================================================

/// Pixel-space figure ready for a drawing backend
#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub width: u32,
    pub height: u32,
    pub alpha: f64,
    /// Pixels per typographic point, for font sizes
    pub px_per_pt: f64,
    pub panels: Vec<PanelScene>,
    pub legend: Option<LegendScene>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct PanelScene {
    pub rect: PixelRect,
    pub title: Option<String>,
    pub range: AxisRange,
    pub show_x_ticks: bool,
    pub show_y_ticks: bool,
    pub x_desc: Option<String>,
    pub y_desc: Option<String>,
    pub markers: Vec<Marker>,
    pub labels: Vec<PointLabel>,
}

/// A filled circle in data coordinates with a pixel radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct LegendScene {
    pub rect: PixelRect,
    /// Upper-left corner of the legend content
    pub anchor: (i32, i32),
    pub bubble: Option<LegendEntry>,
    pub swatches: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub radius: f64,
    pub color: RGBColor,
    pub text: String,
}
