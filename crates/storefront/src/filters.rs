//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Shortens an order ID to its last eight characters for display in lists.
///
/// Usage in templates: `{{ order.id|short_id }}`
#[askama::filter_fn]
pub fn short_id(id: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(shorten(&id.to_string()).to_owned())
}

fn shorten(id: &str) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(7)
        .map_or(0, |(index, _)| index);
    id.get(start..).unwrap_or(id)
}
