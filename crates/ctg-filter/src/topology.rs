//! Identity (ID/name glob) and country conditions.

use crate::condition::{side_assignments, Condition, HelperCall, MeasurePoint};
use crate::router::{EquipmentRoute, MeasurePoints};
use ctg_core::{CountrySet, Equipment};
use regex::Regex;

/// Ant-style glob: `*` matches any sequence, `?` one character, everything
/// else is literal. Construction never fails.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    original: String,
    matcher: Option<Regex>,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Self {
        let mut source = String::with_capacity(pattern.len() + 8);
        source.push_str("(?s)^");
        let mut buf = [0u8; 4];
        for c in pattern.chars() {
            match c {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                other => source.push_str(&regex::escape(other.encode_utf8(&mut buf))),
            }
        }
        source.push('$');
        Self {
            original: pattern.to_string(),
            // only fails past the regex size limit
            matcher: Regex::new(&source).ok(),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match &self.matcher {
            Some(re) => re.is_match(value),
            None => self.original == value,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.original
    }

    /// True for `*`, `**`, ...: every string matches.
    pub fn matches_everything(&self) -> bool {
        !self.original.is_empty() && self.original.chars().all(|c| c == '*')
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.original == other.original
    }
}

/// `matchID(pattern, equipment)`
pub fn match_id(pattern: &str, equipment: &Equipment) -> bool {
    GlobPattern::new(pattern).matches(&equipment.id)
}

/// `matchName(pattern, equipment)`; unnamed equipment never matches.
pub fn match_name(pattern: &str, equipment: &Equipment) -> bool {
    equipment
        .name
        .as_deref()
        .is_some_and(|name| GlobPattern::new(pattern).matches(name))
}

/// Pattern used when a filter leaves the ID or name pattern out.
pub const MATCH_ALL: &str = "*";

pub struct TopologyPredicateCompiler;

impl TopologyPredicateCompiler {
    /// `matchID(id) || matchName(name)`, an absent pattern standing for
    /// [`MATCH_ALL`]. Every element has an ID, so a match-all ID pattern
    /// makes the whole condition universal.
    pub fn compile_identity(
        id_pattern: Option<&str>,
        name_pattern: Option<&str>,
    ) -> Option<Condition> {
        let id = GlobPattern::new(id_pattern.unwrap_or(MATCH_ALL));
        if id.matches_everything() {
            return None;
        }
        let name = GlobPattern::new(name_pattern.unwrap_or(MATCH_ALL));
        Some(Condition::Any(vec![
            Condition::IdMatches(id),
            Condition::NameMatches(name),
        ]))
    }

    /// Country condition for the route's shape. Empty sets are unconstrained;
    /// `countries2` is only read for dual-point equipment.
    pub fn compile_country(
        route: &EquipmentRoute,
        countries1: &CountrySet,
        countries2: &CountrySet,
    ) -> Option<Condition> {
        let non_empty = |set: &CountrySet| (!set.is_empty()).then(|| set.clone());
        match route.shape.measure_points() {
            MeasurePoints::Single(point) => {
                non_empty(countries1).map(|countries| Condition::LocatedIn { point, countries })
            }
            MeasurePoints::Dual(p1, p2) => {
                let first = non_empty(countries1);
                let second = non_empty(countries2);
                let body = side_assignments(
                    first.as_ref(),
                    second.as_ref(),
                    (p1, p2),
                    Self::located_in,
                )?;
                Some(Condition::Helper {
                    call: HelperCall {
                        function: route.country_helper.function_name(),
                        countries1: countries1.clone(),
                        countries2: countries2.clone(),
                    },
                    body: Box::new(body),
                })
            }
        }
    }

    pub fn located_in(countries: &CountrySet, point: MeasurePoint) -> Condition {
        Condition::LocatedIn {
            point,
            countries: countries.clone(),
        }
    }
}
