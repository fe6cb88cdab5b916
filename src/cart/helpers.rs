//! Shopping Cart Business Logic Helpers
//!
//! Pure functions over cart lines: summary aggregation and formatting.

use super::models::{CartLine, CartSummary};

/// Recomputes the cart summary from scratch.
///
/// * Counts are saturating sums of quantities, not numbers of lines.
/// * The original subtotal only includes selected lines that carry an
///   original price, and is dropped when it is not positive.
/// * A discount is reported only when the original subtotal is strictly
///   greater than the subtotal.
pub fn summarize(lines: &[CartLine]) -> CartSummary {
    let selected = || lines.iter().filter(|line| line.selected);

    let total_line_count = lines
        .iter()
        .fold(0u32, |acc, line| acc.saturating_add(line.quantity));
    let selected_line_count = selected().fold(0u32, |acc, line| acc.saturating_add(line.quantity));
    let selected_subtotal: f64 = selected().map(CartLine::subtotal).sum();

    let original: f64 = selected().filter_map(CartLine::original_subtotal).sum();
    let selected_original_subtotal = (original > 0.0).then_some(original);
    let discount = selected_original_subtotal
        .filter(|original| *original > selected_subtotal)
        .map(|original| original - selected_subtotal);

    CartSummary {
        total_line_count,
        selected_line_count,
        selected_subtotal,
        selected_original_subtotal,
        discount,
        all_selected: !lines.is_empty() && lines.iter().all(|line| line.selected),
        is_empty: lines.is_empty(),
    }
}

/// Produces a human-readable one-line summary for a list of cart lines.
///
/// Example output: `"2x Dog food, 1x Cat toy"`.
pub fn format_line_summary(lines: &[CartLine]) -> String {
    lines
        .iter()
        .map(|line| {
            let name = line
                .product
                .as_ref()
                .map_or_else(|| format!("product #{}", line.product_id), |p| p.name.clone());
            format!("{}x {}", line.quantity, name)
        })
        .collect::<Vec<_>>()
        .join(", ")
}
