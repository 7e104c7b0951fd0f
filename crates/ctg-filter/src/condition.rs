//! Boolean condition tree shared by predicate evaluation and script output.
//!
//! Every node can both evaluate itself against one element of a [`Network`]
//! and render itself in the legacy script grammar. Universal-true is never a
//! node: compilers return `None` instead, and the orchestrator drops it.

use crate::script::{country_list, format_bound, quote};
use crate::spec::Comparison;
use crate::topology::GlobPattern;
use ctg_core::{CountrySet, Equipment, Kilovolts, Network, NodeIndex, Side, Terminal};

/// Where a quantity is measured on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurePoint {
    /// The terminals of a single-terminal element
    Terminal,
    Terminal1,
    Terminal2,
    ConverterStation1,
    ConverterStation2,
}

impl MeasurePoint {
    /// Script expression for the terminal at this point.
    pub fn script_path(&self) -> &'static str {
        match self {
            MeasurePoint::Terminal => "equipment.terminal",
            MeasurePoint::Terminal1 => "equipment.terminal1",
            MeasurePoint::Terminal2 => "equipment.terminal2",
            MeasurePoint::ConverterStation1 => "equipment.converterStation1.terminal",
            MeasurePoint::ConverterStation2 => "equipment.converterStation2.terminal",
        }
    }

    /// Terminals reachable from `node` at this point.
    pub fn terminals(&self, network: &Network, node: NodeIndex) -> Vec<Terminal> {
        match self {
            MeasurePoint::Terminal => network.terminals(node),
            MeasurePoint::Terminal1 => network.terminal(node, Side::One).into_iter().collect(),
            MeasurePoint::Terminal2 => network.terminal(node, Side::Two).into_iter().collect(),
            MeasurePoint::ConverterStation1 => network
                .converter_station(node, Side::One)
                .map(|station| network.terminals(station))
                .unwrap_or_default(),
            MeasurePoint::ConverterStation2 => network
                .converter_station(node, Side::Two)
                .map(|station| network.terminals(station))
                .unwrap_or_default(),
        }
    }
}

/// One element being tested.
#[derive(Debug, Clone, Copy)]
pub struct ElementContext<'a> {
    pub network: &'a Network,
    pub node: NodeIndex,
    pub equipment: &'a Equipment,
}

/// Country helper call as it appears in scripts, e.g.
/// `lineMatch(equipment, ['FR'], ['BE'])`.
#[derive(Debug, Clone, PartialEq)]
pub struct HelperCall {
    pub function: &'static str,
    pub countries1: CountrySet,
    pub countries2: CountrySet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    NominalVoltage {
        point: MeasurePoint,
        comparison: Comparison,
        bound: Kilovolts,
    },
    IdMatches(GlobPattern),
    NameMatches(GlobPattern),
    LocatedIn {
        point: MeasurePoint,
        countries: CountrySet,
    },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    /// Rendered as `call`, evaluated through `body`
    Helper {
        call: HelperCall,
        body: Box<Condition>,
    },
}

impl Condition {
    pub fn nominal_voltage(point: MeasurePoint, comparison: Comparison, bound: f64) -> Self {
        Condition::NominalVoltage {
            point,
            comparison,
            bound: Kilovolts(bound),
        }
    }

    pub fn matches(&self, ctx: &ElementContext<'_>) -> bool {
        match self {
            Condition::NominalVoltage {
                point,
                comparison,
                bound,
            } => point.terminals(ctx.network, ctx.node).iter().any(|t| {
                ctx.network
                    .nominal_voltage_of(t)
                    .is_some_and(|v| comparison.holds(v, *bound))
            }),
            Condition::IdMatches(pattern) => pattern.matches(&ctx.equipment.id),
            Condition::NameMatches(pattern) => ctx
                .equipment
                .name
                .as_deref()
                .is_some_and(|name| pattern.matches(name)),
            Condition::LocatedIn { point, countries } => {
                point.terminals(ctx.network, ctx.node).iter().any(|t| {
                    ctx.network
                        .country_of(t)
                        .is_some_and(|c| countries.contains(c))
                })
            }
            Condition::All(parts) => parts.iter().all(|c| c.matches(ctx)),
            Condition::Any(parts) => parts.iter().any(|c| c.matches(ctx)),
            Condition::Helper { body, .. } => body.matches(ctx),
        }
    }

    /// Script text. Compound nodes are parenthesised so the result can be
    /// `&&`-joined with sibling clauses without changing precedence.
    pub fn render(&self) -> String {
        match self {
            Condition::NominalVoltage {
                point,
                comparison,
                bound,
            } => format!(
                "{}.voltageLevel.nominalV {} {}",
                point.script_path(),
                comparison.symbol(),
                format_bound(bound.value())
            ),
            Condition::IdMatches(pattern) => {
                format!("matchID({}, equipment)", quote(pattern.pattern()))
            }
            Condition::NameMatches(pattern) => {
                format!("matchName({}, equipment)", quote(pattern.pattern()))
            }
            Condition::LocatedIn { point, countries } => {
                let target = match point {
                    MeasurePoint::Terminal => "equipment",
                    other => other.script_path(),
                };
                format!("isLocatedIn({}, {target})", country_list(countries))
            }
            Condition::All(parts) => render_joined(parts, " && "),
            Condition::Any(parts) => render_joined(parts, " || "),
            Condition::Helper { call, .. } => format!(
                "{}(equipment, {}, {})",
                call.function,
                country_list(&call.countries1),
                country_list(&call.countries2)
            ),
        }
    }
}

fn render_joined(parts: &[Condition], separator: &str) -> String {
    match parts {
        [single] => single.render(),
        _ => {
            let inner: Vec<String> = parts.iter().map(Condition::render).collect();
            format!("({})", inner.join(separator))
        }
    }
}

/// Enumerate terminal assignments for a dual-point element.
///
/// With one constraint it may hold on either side. With two different
/// constraints both assignments are tried, since the caller cannot know
/// which physical side is numbered 1.
pub fn side_assignments<T: PartialEq>(
    first: Option<&T>,
    second: Option<&T>,
    (p1, p2): (MeasurePoint, MeasurePoint),
    at: impl Fn(&T, MeasurePoint) -> Condition,
) -> Option<Condition> {
    match (first, second) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => {
            Some(Condition::Any(vec![at(only, p1), at(only, p2)]))
        }
        (Some(a), Some(b)) if a == b => Some(Condition::Any(vec![at(a, p1), at(a, p2)])),
        (Some(a), Some(b)) => Some(Condition::Any(vec![
            Condition::All(vec![at(a, p1), at(b, p2)]),
            Condition::All(vec![at(b, p1), at(a, p2)]),
        ])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctg_core::{country_set, EquipmentKind, Substation, VoltageLevel};

    fn network_with_line() -> (Network, NodeIndex) {
        let mut network = Network::new();
        network
            .add_substation(Substation::new("S1").with_country("FR".parse().unwrap()))
            .unwrap();
        network
            .add_voltage_level("S1", VoltageLevel::new("VL400", Kilovolts(400.0)))
            .unwrap();
        network
            .add_voltage_level("S1", VoltageLevel::new("VL225", Kilovolts(225.0)))
            .unwrap();
        let idx = network
            .add_equipment(
                Equipment::new("L1", EquipmentKind::Line),
                &["VL400", "VL225"],
            )
            .unwrap();
        (network, idx)
    }

    #[test]
    fn test_voltage_condition_per_terminal() {
        let (network, node) = network_with_line();
        let equipment = network.equipment_at(node).unwrap();
        let ctx = ElementContext {
            network: &network,
            node,
            equipment,
        };
        let t1 = Condition::nominal_voltage(MeasurePoint::Terminal1, Comparison::Equal, 400.0);
        let t2 = Condition::nominal_voltage(MeasurePoint::Terminal2, Comparison::Equal, 400.0);
        assert!(t1.matches(&ctx));
        assert!(!t2.matches(&ctx));
    }

    #[test]
    fn test_missing_point_never_matches() {
        let (network, node) = network_with_line();
        let equipment = network.equipment_at(node).unwrap();
        let ctx = ElementContext {
            network: &network,
            node,
            equipment,
        };
        let cond = Condition::nominal_voltage(
            MeasurePoint::ConverterStation1,
            Comparison::GreaterThan,
            0.0,
        );
        assert!(!cond.matches(&ctx));
    }

    #[test]
    fn test_render_nesting() {
        let cond = Condition::Any(vec![
            Condition::All(vec![
                Condition::nominal_voltage(MeasurePoint::Terminal1, Comparison::LessThan, 400.0),
                Condition::nominal_voltage(
                    MeasurePoint::Terminal2,
                    Comparison::GreaterOrEqual,
                    225.0,
                ),
            ]),
            Condition::LocatedIn {
                point: MeasurePoint::Terminal,
                countries: country_set(["FR"]).unwrap(),
            },
        ]);
        assert_eq!(
            cond.render(),
            "((equipment.terminal1.voltageLevel.nominalV < 400.0 && \
             equipment.terminal2.voltageLevel.nominalV >= 225.0) || \
             isLocatedIn(['FR'], equipment))"
        );
    }

    #[test]
    fn test_identical_constraints_collapse() {
        let points = (MeasurePoint::Terminal1, MeasurePoint::Terminal2);
        let at = |b: &f64, p| Condition::nominal_voltage(p, Comparison::Equal, *b);
        let same = side_assignments(Some(&1.0), Some(&1.0), points, at).unwrap();
        let single = side_assignments(Some(&1.0), None, points, at).unwrap();
        assert_eq!(same, single);
        assert!(side_assignments::<f64>(None, None, points, at).is_none());
    }
}
