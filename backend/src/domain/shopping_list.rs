//! Shopping list aggregation and rendering.
//!
//! The grouping and summation are performed here, explicitly, over flat rows
//! handed out by the persistence layer. The report is plain line-oriented
//! UTF-8 for humans; only its structure is stable, not the exact wording.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// One cart line as read from storage: a single recipe's demand for one
/// ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub ingredient_name: String,
    pub measurement_unit: String,
    pub quantity: i64,
}

/// A recipe present in the cart, with enough author detail for the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRecipe {
    pub title: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_username: String,
}

/// Result of building a shopping list.
///
/// An empty cart is an explicit status, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShoppingListReport {
    Empty,
    Rendered(String),
}

/// Sum quantities per (name, unit) group, name-ascending.
///
/// The `BTreeMap` key order is the report order, so identical carts always
/// aggregate to identical sequences.
pub fn aggregate(lines: &[CartLine]) -> Vec<(String, String, i64)> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for line in lines {
        let key = (line.ingredient_name.clone(), line.measurement_unit.clone());
        let total = totals.entry(key).or_insert(0);
        *total = total.saturating_add(line.quantity);
    }
    totals
        .into_iter()
        .map(|((name, unit), total)| (name, unit, total))
        .collect()
}

/// Render the full report. Identical cart contents produce byte-identical
/// output apart from the date line.
pub fn render(
    generated_at: DateTime<Utc>,
    lines: &[CartLine],
    recipes: &[CartRecipe],
) -> ShoppingListReport {
    if lines.is_empty() && recipes.is_empty() {
        return ShoppingListReport::Empty;
    }

    let mut sorted_recipes: Vec<&CartRecipe> = recipes.iter().collect();
    sorted_recipes.sort_by(|a, b| a.title.cmp(&b.title));

    let mut out = Vec::new();
    out.push(format!(
        "Shopping list for {}",
        generated_at.format("%d.%m.%Y")
    ));
    out.push(String::new());
    out.push("PRODUCTS:".to_owned());
    for (index, (name, unit, total)) in aggregate(lines).into_iter().enumerate() {
        out.push(format!("{}. {name} - {total} {unit}", index + 1));
    }
    out.push(String::new());
    out.push("RECIPES:".to_owned());
    for recipe in sorted_recipes {
        out.push(format!(
            "\u{2022} {} (by {} {} @{})",
            recipe.title,
            recipe.author_first_name,
            recipe.author_last_name,
            recipe.author_username
        ));
    }
    ShoppingListReport::Rendered(out.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn line(name: &str, unit: &str, quantity: i64) -> CartLine {
        CartLine {
            ingredient_name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            quantity,
        }
    }

    fn recipe(title: &str, first: &str, last: &str, username: &str) -> CartRecipe {
        CartRecipe {
            title: title.to_owned(),
            author_first_name: first.to_owned(),
            author_last_name: last.to_owned(),
            author_username: username.to_owned(),
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).single().expect("valid timestamp")
    }

    // Recipe A: flour 200 g + egg 2 pcs; recipe B: flour 100 g.
    #[rstest]
    fn sums_quantities_per_ingredient_across_recipes() {
        let lines = [
            line("flour", "g", 200),
            line("egg", "pcs", 2),
            line("flour", "g", 100),
        ];
        assert_eq!(
            aggregate(&lines),
            vec![
                ("egg".to_owned(), "pcs".to_owned(), 2),
                ("flour".to_owned(), "g".to_owned(), 300),
            ]
        );
    }

    #[rstest]
    fn same_name_different_unit_stays_separate() {
        let lines = [line("sugar", "g", 50), line("sugar", "tbsp", 2)];
        assert_eq!(aggregate(&lines).len(), 2);
    }

    #[rstest]
    fn empty_cart_yields_explicit_empty_report() {
        assert_eq!(render(fixed_now(), &[], &[]), ShoppingListReport::Empty);
    }

    #[rstest]
    fn renders_numbered_products_and_bulleted_recipes() {
        let lines = [line("flour", "g", 200), line("flour", "g", 100)];
        let recipes = [recipe("Pancakes", "Ada", "Lovelace", "ada")];

        let ShoppingListReport::Rendered(text) = render(fixed_now(), &lines, &recipes) else {
            panic!("expected a rendered report");
        };
        let expected = "Shopping list for 17.05.2024\n\
                        \n\
                        PRODUCTS:\n\
                        1. flour - 300 g\n\
                        \n\
                        RECIPES:\n\
                        \u{2022} Pancakes (by Ada Lovelace @ada)";
        assert_eq!(text, expected);
    }

    #[rstest]
    fn identical_carts_render_identically() {
        let lines = [
            line("beetroot", "g", 40),
            line("apple", "pcs", 3),
            line("beetroot", "g", 10),
        ];
        let recipes = [
            recipe("Borscht", "Ada", "Lovelace", "ada"),
            recipe("Apple pie", "Charles", "Babbage", "cb"),
        ];
        let first = render(fixed_now(), &lines, &recipes);
        let second = render(fixed_now(), &lines, &recipes);
        assert_eq!(first, second);
    }

    #[rstest]
    fn recipes_section_is_sorted_by_title() {
        let lines = [line("salt", "g", 1)];
        let recipes = [
            recipe("Zebra cake", "A", "B", "ab"),
            recipe("Apple pie", "C", "D", "cd"),
        ];
        let ShoppingListReport::Rendered(text) = render(fixed_now(), &lines, &recipes) else {
            panic!("expected a rendered report");
        };
        let apple = text.find("Apple pie").expect("apple listed");
        let zebra = text.find("Zebra cake").expect("zebra listed");
        assert!(apple < zebra);
    }
}
