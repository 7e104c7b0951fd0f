//! Equipment type → topology shape and script template.
//!
//! The table is static data; every lookup is an exhaustive match so a new
//! [`EquipmentType`] variant does not compile until it is routed here.

use crate::condition::MeasurePoint;
use ctg_core::EquipmentType;

/// How many independent measurement points a filter may constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyRole {
    SingleTerminal,
    DualTerminal,
}

/// Physical shape of an equipment class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyShape {
    /// One terminal
    Injection,
    /// Two (or three) terminals; filters look at terminal 1 and 2
    Branch,
    /// Two converter stations, each with its own terminal
    HvdcLine,
}

/// Points a compiled condition can be evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurePoints {
    Single(MeasurePoint),
    Dual(MeasurePoint, MeasurePoint),
}

impl TopologyShape {
    pub fn role(&self) -> TopologyRole {
        match self.measure_points() {
            MeasurePoints::Single(_) => TopologyRole::SingleTerminal,
            MeasurePoints::Dual(..) => TopologyRole::DualTerminal,
        }
    }

    pub fn measure_points(&self) -> MeasurePoints {
        match self {
            TopologyShape::Injection => MeasurePoints::Single(MeasurePoint::Terminal),
            TopologyShape::Branch => {
                MeasurePoints::Dual(MeasurePoint::Terminal1, MeasurePoint::Terminal2)
            }
            TopologyShape::HvdcLine => MeasurePoints::Dual(
                MeasurePoint::ConverterStation1,
                MeasurePoint::ConverterStation2,
            ),
        }
    }
}

/// Script helper used to render the country condition of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryHelper {
    IsLocatedIn,
    LineMatch,
    TransfoMatch,
    HvdcLineMatch,
}

impl CountryHelper {
    pub fn function_name(&self) -> &'static str {
        match self {
            CountryHelper::IsLocatedIn => "isLocatedIn",
            CountryHelper::LineMatch => "lineMatch",
            CountryHelper::TransfoMatch => "transfoMatch",
            CountryHelper::HvdcLineMatch => "hvdcLineMatch",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct EquipmentRoute {
    pub equipment_type: EquipmentType,
    pub shape: TopologyShape,
    /// Network collection iterated by the generated script
    pub collection: &'static str,
    pub country_helper: CountryHelper,
}

impl EquipmentRoute {
    const fn new(
        equipment_type: EquipmentType,
        shape: TopologyShape,
        collection: &'static str,
        country_helper: CountryHelper,
    ) -> Self {
        Self {
            equipment_type,
            shape,
            collection,
            country_helper,
        }
    }

    pub fn role(&self) -> TopologyRole {
        self.shape.role()
    }
}

static GENERATOR: EquipmentRoute = EquipmentRoute::new(
    EquipmentType::Generator,
    TopologyShape::Injection,
    "generators",
    CountryHelper::IsLocatedIn,
);
static LOAD: EquipmentRoute = EquipmentRoute::new(
    EquipmentType::Load,
    TopologyShape::Injection,
    "loads",
    CountryHelper::IsLocatedIn,
);
static BATTERY: EquipmentRoute = EquipmentRoute::new(
    EquipmentType::Battery,
    TopologyShape::Injection,
    "batteries",
    CountryHelper::IsLocatedIn,
);
static SHUNT_COMPENSATOR: EquipmentRoute = EquipmentRoute::new(
    EquipmentType::ShuntCompensator,
    TopologyShape::Injection,
    "shuntCompensators",
    CountryHelper::IsLocatedIn,
);
static STATIC_VAR_COMPENSATOR: EquipmentRoute = EquipmentRoute::new(
    EquipmentType::StaticVarCompensator,
    TopologyShape::Injection,
    "staticVarCompensators",
    CountryHelper::IsLocatedIn,
);
static BUSBAR_SECTION: EquipmentRoute = EquipmentRoute::new(
    EquipmentType::BusbarSection,
    TopologyShape::Injection,
    "busbarSections",
    CountryHelper::IsLocatedIn,
);
static DANGLING_LINE: EquipmentRoute = EquipmentRoute::new(
    EquipmentType::DanglingLine,
    TopologyShape::Injection,
    "danglingLines",
    CountryHelper::IsLocatedIn,
);
static HVDC_LINE: EquipmentRoute = EquipmentRoute::new(
    EquipmentType::HvdcLine,
    TopologyShape::HvdcLine,
    "hvdcLines",
    CountryHelper::HvdcLineMatch,
);
static LINE: EquipmentRoute = EquipmentRoute::new(
    EquipmentType::Line,
    TopologyShape::Branch,
    "lines",
    CountryHelper::LineMatch,
);
static TWO_WINDINGS_TRANSFORMER: EquipmentRoute = EquipmentRoute::new(
    EquipmentType::TwoWindingsTransformer,
    TopologyShape::Branch,
    "twoWindingsTransformers",
    CountryHelper::TransfoMatch,
);
static THREE_WINDINGS_TRANSFORMER: EquipmentRoute = EquipmentRoute::new(
    EquipmentType::ThreeWindingsTransformer,
    TopologyShape::Branch,
    "threeWindingsTransformers",
    CountryHelper::TransfoMatch,
);

pub struct EquipmentClassRouter;

impl EquipmentClassRouter {
    pub fn route(equipment_type: EquipmentType) -> &'static EquipmentRoute {
        match equipment_type {
            EquipmentType::Generator => &GENERATOR,
            EquipmentType::Load => &LOAD,
            EquipmentType::Battery => &BATTERY,
            EquipmentType::ShuntCompensator => &SHUNT_COMPENSATOR,
            EquipmentType::StaticVarCompensator => &STATIC_VAR_COMPENSATOR,
            EquipmentType::BusbarSection => &BUSBAR_SECTION,
            EquipmentType::DanglingLine => &DANGLING_LINE,
            EquipmentType::HvdcLine => &HVDC_LINE,
            EquipmentType::Line => &LINE,
            EquipmentType::TwoWindingsTransformer => &TWO_WINDINGS_TRANSFORMER,
            EquipmentType::ThreeWindingsTransformer => &THREE_WINDINGS_TRANSFORMER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_routes_to_itself() {
        for t in EquipmentType::ALL {
            assert_eq!(EquipmentClassRouter::route(t).equipment_type, t);
        }
    }

    #[test]
    fn test_roles() {
        let single = [
            EquipmentType::Generator,
            EquipmentType::Load,
            EquipmentType::Battery,
            EquipmentType::ShuntCompensator,
            EquipmentType::StaticVarCompensator,
            EquipmentType::BusbarSection,
            EquipmentType::DanglingLine,
        ];
        for t in EquipmentType::ALL {
            let expected = if single.contains(&t) {
                TopologyRole::SingleTerminal
            } else {
                TopologyRole::DualTerminal
            };
            assert_eq!(EquipmentClassRouter::route(t).role(), expected, "{t}");
        }
    }

    #[test]
    fn test_hvdc_measures_converter_stations() {
        let route = EquipmentClassRouter::route(EquipmentType::HvdcLine);
        assert_eq!(
            route.shape.measure_points(),
            MeasurePoints::Dual(
                MeasurePoint::ConverterStation1,
                MeasurePoint::ConverterStation2
            )
        );
        assert_eq!(route.country_helper.function_name(), "hvdcLineMatch");
    }
}
