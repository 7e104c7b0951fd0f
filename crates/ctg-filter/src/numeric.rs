//! Nominal-voltage conditions.

use crate::condition::{side_assignments, Condition, MeasurePoint};
use crate::router::{MeasurePoints, TopologyShape};
use crate::spec::{Comparison, NumericFilter};

pub struct NumericRangeCompiler;

impl NumericRangeCompiler {
    /// Compile up to two voltage filters for an equipment shape.
    ///
    /// Single-terminal shapes only read `filter1`. Dual-terminal shapes try
    /// every terminal assignment (see [`side_assignments`]). `None` means the
    /// condition is universal and must be left out.
    pub fn compile(
        shape: TopologyShape,
        filter1: Option<&NumericFilter>,
        filter2: Option<&NumericFilter>,
    ) -> Option<Condition> {
        match shape.measure_points() {
            MeasurePoints::Single(point) => filter1.map(|f| Self::condition_at(f, point)),
            MeasurePoints::Dual(p1, p2) => {
                side_assignments(filter1, filter2, (p1, p2), Self::condition_at)
            }
        }
    }

    /// One filter at one point; RANGE expands to a two-sided conjunction.
    pub fn condition_at(filter: &NumericFilter, point: MeasurePoint) -> Condition {
        match *filter {
            NumericFilter::Compare { comparison, bound } => {
                Condition::nominal_voltage(point, comparison, bound)
            }
            NumericFilter::Range { min, max } => Condition::All(vec![
                Condition::nominal_voltage(point, Comparison::GreaterOrEqual, min),
                Condition::nominal_voltage(point, Comparison::LessOrEqual, max),
            ]),
        }
    }
}
