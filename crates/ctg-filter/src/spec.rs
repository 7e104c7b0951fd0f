//! Declarative filter descriptions.
//!
//! Records are validated while they are deserialized, so an
//! [`EquipmentFilterSpec`] that exists is already accepted: unknown equipment
//! types, malformed country codes and inconsistent RANGE bounds are rejected
//! here and never reach the matching loop.

use ctg_core::loader::parse_document;
use ctg_core::{country_set, CountrySet, CtgError, CtgResult, EquipmentType, Kilovolts};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Operator of a numeric filter as stored in filter records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumericOperator {
    Equal,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Range,
}

impl NumericOperator {
    /// Script token; RANGE has none because it expands to two comparisons.
    pub fn symbol(&self) -> &'static str {
        match self.comparison() {
            Some(cmp) => cmp.symbol(),
            None => "",
        }
    }

    pub fn comparison(&self) -> Option<Comparison> {
        match self {
            NumericOperator::Equal => Some(Comparison::Equal),
            NumericOperator::GreaterThan => Some(Comparison::GreaterThan),
            NumericOperator::GreaterOrEqual => Some(Comparison::GreaterOrEqual),
            NumericOperator::LessThan => Some(Comparison::LessThan),
            NumericOperator::LessOrEqual => Some(Comparison::LessOrEqual),
            NumericOperator::Range => None,
        }
    }
}

/// Single-symbol comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equal,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::GreaterThan => ">",
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessThan => "<",
            Comparison::LessOrEqual => "<=",
        }
    }

    pub fn operator(&self) -> NumericOperator {
        match self {
            Comparison::Equal => NumericOperator::Equal,
            Comparison::GreaterThan => NumericOperator::GreaterThan,
            Comparison::GreaterOrEqual => NumericOperator::GreaterOrEqual,
            Comparison::LessThan => NumericOperator::LessThan,
            Comparison::LessOrEqual => NumericOperator::LessOrEqual,
        }
    }

    pub fn holds(&self, value: Kilovolts, bound: Kilovolts) -> bool {
        match self {
            Comparison::Equal => value.approx_eq(bound),
            Comparison::GreaterThan => value > bound,
            Comparison::GreaterOrEqual => value >= bound,
            Comparison::LessThan => value < bound,
            Comparison::LessOrEqual => value <= bound,
        }
    }
}

/// Numeric constraint on a nominal voltage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NumericFilterRecord", into = "NumericFilterRecord")]
pub enum NumericFilter {
    Compare { comparison: Comparison, bound: f64 },
    /// Inclusive on both ends
    Range { min: f64, max: f64 },
}

/// Wire form: `{operator, bound1, bound2?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericFilterRecord {
    pub operator: NumericOperator,
    pub bound1: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound2: Option<f64>,
}

impl NumericFilter {
    /// Build a filter from its record fields. `bound2` is only read for RANGE.
    pub fn new(operator: NumericOperator, bound1: f64, bound2: Option<f64>) -> CtgResult<Self> {
        let filter = match (operator.comparison(), bound2) {
            (Some(comparison), _) => NumericFilter::Compare {
                comparison,
                bound: bound1,
            },
            (None, Some(max)) => NumericFilter::Range { min: bound1, max },
            (None, None) => {
                return Err(CtgError::Configuration(
                    "RANGE filter requires a second bound".into(),
                ))
            }
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn compare(comparison: Comparison, bound: f64) -> CtgResult<Self> {
        Self::new(comparison.operator(), bound, None)
    }

    pub fn range(min: f64, max: f64) -> CtgResult<Self> {
        Self::new(NumericOperator::Range, min, Some(max))
    }

    pub fn validate(&self) -> CtgResult<()> {
        match *self {
            NumericFilter::Compare { bound, .. } if !bound.is_finite() => Err(
                CtgError::Configuration(format!("numeric bound {bound} is not finite")),
            ),
            NumericFilter::Range { min, max } if !min.is_finite() || !max.is_finite() => Err(
                CtgError::Configuration(format!("range [{min}, {max}] is not finite")),
            ),
            NumericFilter::Range { min, max } if min > max => Err(CtgError::Configuration(
                format!("range lower bound {min} exceeds upper bound {max}"),
            )),
            _ => Ok(()),
        }
    }

    pub fn operator(&self) -> NumericOperator {
        match self {
            NumericFilter::Compare { comparison, .. } => comparison.operator(),
            NumericFilter::Range { .. } => NumericOperator::Range,
        }
    }

    pub fn bound1(&self) -> f64 {
        match *self {
            NumericFilter::Compare { bound, .. } => bound,
            NumericFilter::Range { min, .. } => min,
        }
    }

    pub fn bound2(&self) -> Option<f64> {
        match *self {
            NumericFilter::Compare { .. } => None,
            NumericFilter::Range { max, .. } => Some(max),
        }
    }
}

impl TryFrom<NumericFilterRecord> for NumericFilter {
    type Error = CtgError;

    fn try_from(record: NumericFilterRecord) -> Result<Self, Self::Error> {
        NumericFilter::new(record.operator, record.bound1, record.bound2)
    }
}

impl From<NumericFilter> for NumericFilterRecord {
    fn from(filter: NumericFilter) -> Self {
        Self {
            operator: filter.operator(),
            bound1: filter.bound1(),
            bound2: filter.bound2(),
        }
    }
}

/// Bound value that legacy single-filter records use for "no constraint".
pub const LEGACY_UNSET_BOUND: f64 = -1.0;

/// Pre-RANGE record form: one voltage and one operator, `-1` meaning unset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyVoltageFilter {
    pub nominal_voltage: f64,
    pub nominal_voltage_operator: NumericOperator,
}

impl LegacyVoltageFilter {
    /// The sentinel is translated here and nowhere else.
    pub fn into_filter(self) -> CtgResult<Option<NumericFilter>> {
        if self.nominal_voltage == LEGACY_UNSET_BOUND {
            return Ok(None);
        }
        match self.nominal_voltage_operator.comparison() {
            Some(cmp) => NumericFilter::compare(cmp, self.nominal_voltage).map(Some),
            None => Err(CtgError::Configuration(
                "legacy voltage filters cannot use RANGE".into(),
            )),
        }
    }
}

/// Accepted filter description for one equipment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EquipmentFilterRecord")]
pub struct EquipmentFilterSpec {
    pub equipment_type: EquipmentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage_filter1: Option<NumericFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage_filter2: Option<NumericFilter>,
    #[serde(skip_serializing_if = "CountrySet::is_empty")]
    pub countries1: CountrySet,
    #[serde(skip_serializing_if = "CountrySet::is_empty")]
    pub countries2: CountrySet,
}

/// Raw persisted record, including the legacy single-voltage fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentFilterRecord {
    pub equipment_type: String,
    #[serde(default)]
    pub id_pattern: Option<String>,
    #[serde(default)]
    pub name_pattern: Option<String>,
    #[serde(default)]
    pub voltage_filter1: Option<NumericFilterRecord>,
    #[serde(default)]
    pub voltage_filter2: Option<NumericFilterRecord>,
    #[serde(default)]
    pub nominal_voltage: Option<f64>,
    #[serde(default)]
    pub nominal_voltage_operator: Option<NumericOperator>,
    #[serde(default)]
    pub countries1: Vec<String>,
    #[serde(default)]
    pub countries2: Vec<String>,
}

impl TryFrom<EquipmentFilterRecord> for EquipmentFilterSpec {
    type Error = CtgError;

    fn try_from(record: EquipmentFilterRecord) -> Result<Self, Self::Error> {
        let equipment_type: EquipmentType = record.equipment_type.parse()?;
        let legacy = match (record.nominal_voltage, record.nominal_voltage_operator) {
            (Some(nominal_voltage), Some(nominal_voltage_operator)) => LegacyVoltageFilter {
                nominal_voltage,
                nominal_voltage_operator,
            }
            .into_filter()?,
            (Some(v), None) if v != LEGACY_UNSET_BOUND => {
                return Err(CtgError::Configuration(
                    "nominalVoltage requires nominalVoltageOperator".into(),
                ))
            }
            _ => None,
        };
        let voltage_filter1 = match record.voltage_filter1 {
            Some(r) => Some(NumericFilter::try_from(r)?),
            None => legacy,
        };
        let voltage_filter2 = record
            .voltage_filter2
            .map(NumericFilter::try_from)
            .transpose()?;
        let spec = EquipmentFilterSpec {
            equipment_type,
            id_pattern: normalize_pattern(record.id_pattern),
            name_pattern: normalize_pattern(record.name_pattern),
            voltage_filter1,
            voltage_filter2,
            countries1: country_set(&record.countries1)?,
            countries2: country_set(&record.countries2)?,
        };
        spec.validate()?;
        Ok(spec)
    }
}

fn normalize_pattern(pattern: Option<String>) -> Option<String> {
    pattern.filter(|p| !p.trim().is_empty())
}

impl EquipmentFilterSpec {
    /// Filter with only an equipment type: matches every element of it.
    pub fn new(equipment_type: EquipmentType) -> Self {
        Self {
            equipment_type,
            id_pattern: None,
            name_pattern: None,
            voltage_filter1: None,
            voltage_filter2: None,
            countries1: CountrySet::new(),
            countries2: CountrySet::new(),
        }
    }

    pub fn with_id_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.id_pattern = normalize_pattern(Some(pattern.into()));
        self
    }

    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = normalize_pattern(Some(pattern.into()));
        self
    }

    pub fn with_voltage_filter1(mut self, filter: NumericFilter) -> Self {
        self.voltage_filter1 = Some(filter);
        self
    }

    pub fn with_voltage_filter2(mut self, filter: NumericFilter) -> Self {
        self.voltage_filter2 = Some(filter);
        self
    }

    pub fn with_countries1(mut self, countries: CountrySet) -> Self {
        self.countries1 = countries;
        self
    }

    pub fn with_countries2(mut self, countries: CountrySet) -> Self {
        self.countries2 = countries;
        self
    }

    /// Re-check invariants that struct literals could bypass.
    pub fn validate(&self) -> CtgResult<()> {
        for filter in [&self.voltage_filter1, &self.voltage_filter2]
            .into_iter()
            .flatten()
        {
            filter.validate()?;
        }
        Ok(())
    }

    /// Parse and accept a JSON record.
    pub fn from_json(data: &str) -> CtgResult<Self> {
        serde_json::from_str(data).map_err(|err| CtgError::Configuration(err.to_string()))
    }

    /// Parse and accept a YAML record.
    pub fn from_yaml(data: &str) -> CtgResult<Self> {
        serde_yaml::from_str(data).map_err(|err| CtgError::Configuration(err.to_string()))
    }
}

pub fn load_filter_spec_from_path(path: &Path) -> CtgResult<EquipmentFilterSpec> {
    let data = fs::read_to_string(path)?;
    parse_document(path, &data)
        .map_err(|err| CtgError::Configuration(format!("{}: {err:#}", path.display())))
}
