use crate::data::PlotData;
use crate::error::{BubbleError, Result};
use crate::ir::{BinnedData, BoundColumn, GroupData, ResolvedColumns, IMPLICIT_GROUP};
use crate::palette::ColorPalette;
use crate::transform::TransformPipeline;
use std::collections::HashMap;
use std::f64::consts::PI;
use tracing::debug;

/// Partitions rows into groups and collects the per-point channels.
///
/// Owns the run-scoped category registry and observed-size pool while
/// rows are being ingested; [`finish`](Self::finish) hands them over
/// read-only inside [`BinnedData`].
pub struct GroupBinner<'a> {
    columns: &'a ResolvedColumns,
    pipeline: &'a TransformPipeline,
    z_is_radius: bool,
    palette: ColorPalette,
    groups: Vec<GroupData>,
    group_index: HashMap<String, usize>,
    observed_sizes: Vec<f64>,
    rows_seen: usize,
}

impl<'a> GroupBinner<'a> {
    pub fn new(columns: &'a ResolvedColumns, pipeline: &'a TransformPipeline) -> Self {
        Self {
            columns,
            pipeline,
            z_is_radius: false,
            palette: ColorPalette::default(),
            groups: Vec::new(),
            group_index: HashMap::new(),
            observed_sizes: Vec::new(),
            rows_seen: 0,
        }
    }

    /// Treat raw Z values as radii and convert them to areas before transforming
    pub fn z_is_radius(mut self, yes: bool) -> Self {
        self.z_is_radius = yes;
        self
    }

    pub fn with_palette(mut self, palette: ColorPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Ingest one row. Rows must be pushed in input order.
    pub fn push_row(&mut self, row: &[String]) -> Result<()> {
        self.rows_seen += 1;
        let row_no = self.rows_seen;
        let cols = self.columns;

        let key = match &cols.group {
            Some(g) => field(row, g).to_string(),
            None => IMPLICIT_GROUP.to_string(),
        };

        // Parse and resolve everything before touching the group so a failing
        // row leaves no partial point behind.
        let x = parse_numeric(row_no, row, &cols.x)?;
        let y = parse_numeric(row_no, row, &cols.y)?;
        let size = match &cols.z {
            Some(z) => {
                let raw = parse_numeric(row_no, row, z)?;
                let area = if self.z_is_radius { PI * raw * raw } else { raw };
                Some(self.pipeline.apply(area))
            }
            None => None,
        };
        let color = match &cols.category {
            Some(c) => Some(self.palette.color_for(field(row, c))?),
            None => None,
        };
        let label = cols.label.as_ref().map(|l| field(row, l).to_string());

        let idx = match self.group_index.get(&key) {
            Some(&idx) => idx,
            None => {
                debug!(group = %key, row = row_no, "new group");
                let idx = self.groups.len();
                self.groups.push(GroupData::new(key.clone(), cols));
                self.group_index.insert(key, idx);
                idx
            }
        };
        let group = &mut self.groups[idx];

        group.x.push(x);
        group.y.push(y);
        if let (Some(sizes), Some(size)) = (group.sizes.as_mut(), size) {
            sizes.push(size);
            self.observed_sizes.push(size);
        }
        if let (Some(colors), Some(color)) = (group.colors.as_mut(), color) {
            colors.push(color);
        }
        if let (Some(labels), Some(label)) = (group.labels.as_mut(), label) {
            labels.push(label);
        }

        Ok(())
    }

    pub fn finish(self) -> BinnedData {
        BinnedData {
            groups: self.groups,
            categories: self.palette.into_registry(),
            observed_sizes: self.observed_sizes,
        }
    }
}

/// Bin every row of `data`, stopping at the first bad row
pub fn bin_rows(
    data: &PlotData,
    columns: &ResolvedColumns,
    pipeline: &TransformPipeline,
    z_is_radius: bool,
) -> Result<BinnedData> {
    let mut binner = GroupBinner::new(columns, pipeline).z_is_radius(z_is_radius);
    for row in &data.rows {
        binner.push_row(row)?;
    }
    Ok(binner.finish())
}

fn field<'r>(row: &'r [String], col: &BoundColumn) -> &'r str {
    row.get(col.index).map(String::as_str).unwrap_or("")
}

fn parse_numeric(row_no: usize, row: &[String], col: &BoundColumn) -> Result<f64> {
    let raw = field(row, col);
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| BubbleError::NonNumeric {
            row: row_no,
            column: col.name.clone(),
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::ir::ColumnRoles;
    use crate::palette::{PaletteColor, KELLY_COLORS};
    use crate::resolve::resolve_columns;

    fn make_data(headers: &[&str], rows: &[&[&str]]) -> PlotData {
        PlotData::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn sample() -> PlotData {
        make_data(
            &["x", "y", "z", "cat", "grp", "name"],
            &[
                &["1", "10", "4", "A", "north", "p1"],
                &["2", "20", "9", "B", "south", "p2"],
                &["3", "30", "16", "A", "north", "p3"],
                &["4", "40", "25", "C", "east", "p4"],
            ],
        )
    }

    fn roles_all() -> ColumnRoles {
        ColumnRoles {
            x: "x".to_string(),
            y: "y".to_string(),
            z: Some("z".to_string()),
            category: Some("cat".to_string()),
            group: Some("grp".to_string()),
            label: Some("name".to_string()),
        }
    }

    #[test]
    fn test_single_implicit_group() {
        let data = sample();
        let cols = resolve_columns(&ColumnRoles::new("x", "y"), &data).unwrap();
        let binned = bin_rows(&data, &cols, &TransformPipeline::identity(), false).unwrap();

        assert_eq!(binned.groups.len(), 1);
        let g = &binned.groups[0];
        assert_eq!(g.key, IMPLICIT_GROUP);
        assert_eq!(g.x, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(g.y, vec![10.0, 20.0, 30.0, 40.0]);
        assert!(g.sizes.is_none());
        assert!(g.colors.is_none());
        assert!(g.labels.is_none());
        assert!(binned.observed_sizes.is_empty());
        assert!(binned.categories.is_empty());
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let data = sample();
        let cols = resolve_columns(&roles_all(), &data).unwrap();
        let binned = bin_rows(&data, &cols, &TransformPipeline::identity(), false).unwrap();

        let keys: Vec<&str> = binned.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["north", "south", "east"]);

        let north = &binned.groups[0];
        assert_eq!(north.x, vec![1.0, 3.0]);
        assert_eq!(north.sizes, Some(vec![4.0, 16.0]));
        assert_eq!(north.labels, Some(vec!["p1".to_string(), "p3".to_string()]));
        assert_eq!(north.colors, Some(vec![KELLY_COLORS[0], KELLY_COLORS[0]]));
    }

    #[test]
    fn test_categories_colored_across_groups() {
        let data = sample();
        let cols = resolve_columns(&roles_all(), &data).unwrap();
        let binned = bin_rows(&data, &cols, &TransformPipeline::identity(), false).unwrap();

        let cats: Vec<&str> = binned.categories.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(cats, vec!["A", "B", "C"]);
        let south = &binned.groups[1];
        assert_eq!(south.colors, Some(vec![KELLY_COLORS[1]]));
        let east = &binned.groups[2];
        assert_eq!(east.colors, Some(vec![KELLY_COLORS[2]]));
    }

    #[test]
    fn test_sizes_are_transformed_and_pooled() {
        let data = sample();
        let mut roles = ColumnRoles::new("x", "y");
        roles.z = Some("z".to_string());
        roles.group = Some("grp".to_string());
        let cols = resolve_columns(&roles, &data).unwrap();
        let pipeline = TransformPipeline::build(&[("mul", "2"), ("add", "1")]).unwrap();
        let binned = bin_rows(&data, &cols, &pipeline, false).unwrap();

        assert_eq!(binned.observed_sizes, vec![9.0, 19.0, 33.0, 51.0]);
        assert_eq!(binned.groups[0].sizes, Some(vec![9.0, 33.0]));
    }

    #[test]
    fn test_z_is_radius() {
        let data = make_data(&["x", "y", "r"], &[&["0", "0", "2"]]);
        let mut roles = ColumnRoles::new("x", "y");
        roles.z = Some("r".to_string());
        let cols = resolve_columns(&roles, &data).unwrap();
        let binned = bin_rows(&data, &cols, &TransformPipeline::identity(), true).unwrap();
        let size = binned.observed_sizes[0];
        assert!((size - 4.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_non_numeric_identifies_row_and_column() {
        let data = make_data(
            &["x", "y"],
            &[&["1", "2"], &["3", "4"], &["five", "6"]],
        );
        let cols = resolve_columns(&ColumnRoles::new("x", "y"), &data).unwrap();
        let err = bin_rows(&data, &cols, &TransformPipeline::identity(), false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
        assert_eq!(
            err,
            BubbleError::NonNumeric {
                row: 3,
                column: "x".to_string(),
                value: "five".to_string()
            }
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let data = make_data(&["x", "y", "z"], &[&["1", "2", "NaN"]]);
        let mut roles = ColumnRoles::new("x", "y");
        roles.z = Some("z".to_string());
        let cols = resolve_columns(&roles, &data).unwrap();
        let err = bin_rows(&data, &cols, &TransformPipeline::identity(), false).unwrap_err();
        assert!(matches!(err, BubbleError::NonNumeric { ref column, .. } if column == "z"));
    }

    #[test]
    fn test_too_many_categories() {
        static TWO: [PaletteColor; 2] = [
            PaletteColor::new(0x111111, "one"),
            PaletteColor::new(0x222222, "two"),
        ];
        let data = make_data(
            &["x", "y", "c"],
            &[&["1", "1", "a"], &["2", "2", "b"], &["3", "3", "c"]],
        );
        let mut roles = ColumnRoles::new("x", "y");
        roles.category = Some("c".to_string());
        let cols = resolve_columns(&roles, &data).unwrap();
        let pipeline = TransformPipeline::identity();
        let mut binner = GroupBinner::new(&cols, &pipeline).with_palette(ColorPalette::new(&TWO));

        binner.push_row(&data.rows[0]).unwrap();
        binner.push_row(&data.rows[1]).unwrap();
        let err = binner.push_row(&data.rows[2]).unwrap_err();
        assert_eq!(err, BubbleError::TooManyCategories { max: 2 });
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_labels_kept_verbatim() {
        let data = make_data(&["x", "y", "who"], &[&["1", "2", "Ada Lovelace"], &["3", "4", ""]]);
        let mut roles = ColumnRoles::new("x", "y");
        roles.label = Some("who".to_string());
        let cols = resolve_columns(&roles, &data).unwrap();
        let binned = bin_rows(&data, &cols, &TransformPipeline::identity(), false).unwrap();
        assert_eq!(
            binned.groups[0].labels,
            Some(vec!["Ada Lovelace".to_string(), String::new()])
        );
    }
}
