use crate::data::PlotData;
use crate::error::{BubbleError, Result};
use crate::ir::{BoundColumn, ColumnRole, ColumnRoles, ResolvedColumns};

/// Check every bound role against the header and record column positions.
///
/// Runs once, before any row is read; the first unknown name fails the run.
pub fn resolve_columns(roles: &ColumnRoles, data: &PlotData) -> Result<ResolvedColumns> {
    let bind = |role: ColumnRole, name: &str| -> Result<BoundColumn> {
        data.column_index(name)
            .map(|index| BoundColumn {
                name: name.to_string(),
                index,
            })
            .ok_or_else(|| BubbleError::UnknownColumn {
                role,
                column: name.to_string(),
            })
    };

    let bind_opt = |role: ColumnRole, name: &Option<String>| -> Result<Option<BoundColumn>> {
        name.as_deref().map(|n| bind(role, n)).transpose()
    };

    Ok(ResolvedColumns {
        x: bind(ColumnRole::X, &roles.x)?,
        y: bind(ColumnRole::Y, &roles.y)?,
        z: bind_opt(ColumnRole::Z, &roles.z)?,
        category: bind_opt(ColumnRole::Category, &roles.category)?,
        group: bind_opt(ColumnRole::Group, &roles.group)?,
        label: bind_opt(ColumnRole::Label, &roles.label)?,
    })
}
