//! Category display metadata normalization.
//!
//! Colors arrive as palette tokens (`bg-green-500`), legacy hex codes, or
//! nothing at all. They are collapsed to a palette token once, at ingest.

use crate::ledger::types::Category;

/// Color used when none is given or it cannot be mapped.
pub const DEFAULT_COLOR: &str = "bg-slate-500";

/// Icon used when none is given.
pub const DEFAULT_ICON: &str = "QuestionMarkCircleIcon";

const HEX_PALETTE: &[(&str, &str)] = &[
    ("#22c55e", "bg-green-500"),
    ("#3b82f6", "bg-blue-500"),
    ("#eab308", "bg-yellow-500"),
    ("#f97316", "bg-orange-500"),
    ("#0ea5e9", "bg-sky-500"),
    ("#a855f7", "bg-purple-500"),
    ("#ef4444", "bg-red-500"),
];

/// Maps any incoming color to a palette token.
#[must_use]
pub fn normalize_color(color: Option<&str>) -> String {
    let Some(color) = color.map(str::trim).filter(|c| !c.is_empty()) else {
        return DEFAULT_COLOR.to_string();
    };

    if color.starts_with('#') {
        let lowered = color.to_lowercase();
        return HEX_PALETTE
            .iter()
            .find(|(hex, _)| *hex == lowered)
            .map_or(DEFAULT_COLOR, |(_, token)| token)
            .to_string();
    }

    if color.starts_with("bg-") {
        color.to_string()
    } else {
        DEFAULT_COLOR.to_string()
    }
}

/// Returns the icon, or the default when blank.
#[must_use]
pub fn normalize_icon(icon: Option<&str>) -> String {
    icon.map(str::trim)
        .filter(|i| !i.is_empty())
        .unwrap_or(DEFAULT_ICON)
        .to_string()
}

/// Brings a stored category into canonical form.
#[must_use]
pub fn canonicalize(mut category: Category) -> Category {
    category.name = category.name.trim().to_string();
    category.color = normalize_color(Some(&category.color));
    category.icon = normalize_icon(Some(&category.icon));
    category
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::TransactionType;
    use coinkeeper_shared::types::CategoryId;
    use rstest::rstest;

    #[rstest]
    #[case(None, "bg-slate-500")]
    #[case(Some(""), "bg-slate-500")]
    #[case(Some("#22C55E"), "bg-green-500")]
    #[case(Some("#ef4444"), "bg-red-500")]
    #[case(Some("#123456"), "bg-slate-500")]
    #[case(Some("bg-pink-400"), "bg-pink-400")]
    #[case(Some("teal"), "bg-slate-500")]
    fn test_normalize_color(#[case] input: Option<&str>, #[case] expected: &str) {
        assert_eq!(normalize_color(input), expected);
    }

    #[rstest]
    #[case(None, DEFAULT_ICON)]
    #[case(Some("  "), DEFAULT_ICON)]
    #[case(Some("ShoppingCartIcon"), "ShoppingCartIcon")]
    fn test_normalize_icon(#[case] input: Option<&str>, #[case] expected: &str) {
        assert_eq!(normalize_icon(input), expected);
    }

    #[test]
    fn test_canonicalize_legacy_category() {
        let legacy = Category {
            id: CategoryId::new(),
            kind: TransactionType::Income,
            name: " Salary ".to_string(),
            color: "#3b82f6".to_string(),
            icon: String::new(),
        };

        let category = canonicalize(legacy);
        assert_eq!(category.name, "Salary");
        assert_eq!(category.color, "bg-blue-500");
        assert_eq!(category.icon, DEFAULT_ICON);
    }
}
