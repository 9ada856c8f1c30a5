use crate::ir::{AxisRange, Bounds, RangeOverride};

/// Fraction of the unified span added on each side of an axis
pub const PADDING_RATIO: f64 = 0.2;

/// Running union of per-group bounds, resolved into one shared axis range.
#[derive(Debug, Clone, Default)]
pub struct RangeUnifier {
    union: Option<Bounds>,
}

impl RangeUnifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one group's drawn bounds into the union
    pub fn report(&mut self, bounds: Bounds) {
        self.union = Some(match self.union {
            Some(current) => current.union(bounds),
            None => bounds,
        });
    }

    /// Pad the union and apply any explicit per-bound overrides
    pub fn finish(&self, overrides: &RangeOverride) -> AxisRange {
        let (x, y) = match self.union {
            Some(b) => (pad_range(b.x), pad_range(b.y)),
            None => ((0.0, 1.0), (0.0, 1.0)),
        };

        AxisRange {
            x: (overrides.xmin.unwrap_or(x.0), overrides.xmax.unwrap_or(x.1)),
            y: (overrides.ymin.unwrap_or(y.0), overrides.ymax.unwrap_or(y.1)),
        }
    }
}

/// Unify a whole set of bounds in one call
pub fn unify<I>(bounds: I, overrides: &RangeOverride) -> AxisRange
where
    I: IntoIterator<Item = Bounds>,
{
    let mut unifier = RangeUnifier::new();
    for b in bounds {
        unifier.report(b);
    }
    unifier.finish(overrides)
}

fn pad_range((min, max): (f64, f64)) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * PADDING_RATIO;
        (min - padding, max + padding)
    }
}
