//! Legacy contingency script output.
//!
//! Stored scripts are compared textually, so layout, quoting and number
//! formatting here are part of the format:
//!
//! ```text
//! for (equipment in network.generators) {
//!     if (equipment.terminal.voltageLevel.nominalV == 90.0 && isLocatedIn(['FR','BE'], equipment)) {
//!         contingency(equipment.id) { equipments equipment.id }
//!     }
//! }
//! ```

use crate::condition::Condition;
use ctg_core::CountrySet;

/// Render a full script iterating `collection` and guarding on the
/// `&&`-joined conditions (blank when there are none).
pub fn render_script<'a>(
    collection: &str,
    conditions: impl IntoIterator<Item = &'a Condition>,
) -> String {
    let guard = conditions
        .into_iter()
        .map(Condition::render)
        .collect::<Vec<_>>()
        .join(" && ");
    format!(
        "for (equipment in network.{collection}) {{\n    if ({guard}) {{\n        contingency(equipment.id) {{ equipments equipment.id }}\n    }}\n}}\n"
    )
}

/// Doubles always carry a fractional part (`90` renders as `90.0`).
pub fn format_bound(value: f64) -> String {
    format!("{value:?}")
}

/// Single-quoted script literal.
pub fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// `['FR','BE']`, in insertion order, no spaces.
pub fn country_list(countries: &CountrySet) -> String {
    let items: Vec<String> = countries.iter().map(|c| quote(c.code())).collect();
    format!("[{}]", items.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctg_core::country_set;

    #[test]
    fn test_format_bound() {
        assert_eq!(format_bound(90.0), "90.0");
        assert_eq!(format_bound(225.5), "225.5");
        assert_eq!(format_bound(-1.0), "-1.0");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("BRESS*"), "'BRESS*'");
        assert_eq!(quote("O'Neil"), "'O\\'Neil'");
    }

    #[test]
    fn test_country_list() {
        assert_eq!(country_list(&country_set(["FR", "BE"]).unwrap()), "['FR','BE']");
        assert_eq!(country_list(&CountrySet::new()), "[]");
    }

    #[test]
    fn test_blank_guard() {
        let script = render_script("loads", std::iter::empty());
        assert_eq!(
            script,
            "for (equipment in network.loads) {\n    if () {\n        contingency(equipment.id) { equipments equipment.id }\n    }\n}\n"
        );
    }
}
