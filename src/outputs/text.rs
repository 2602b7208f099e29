//! Plain-text listing for terminals and logs.

use crate::models::FrontPage;
use std::fmt::Write;

/// Shown instead of a listing when no source produced anything.
pub const NO_NEWS: &str = "No news available right now. Try again later.";

/// Render one block per item:
///
/// ```text
/// [14:30] DN: Regeringen presenterar budgeten
///     https://www.dn.se/sverige/budget/
///     Finansministern är nöjd.
/// ```
///
/// Times are UTC; an estimated date is marked with `~`.
pub fn render(front_page: &FrontPage) -> String {
    if front_page.is_empty() {
        return format!("{NO_NEWS}\n");
    }

    let mut out = String::new();
    for item in &front_page.items {
        let marker = if item.date_estimated { "~" } else { "" };
        let _ = writeln!(
            out,
            "[{marker}{}] {}: {}",
            item.published_at.format("%H:%M"),
            item.source,
            item.title
        );
        let _ = writeln!(out, "    {}", item.link);
        if !item.description.is_empty() {
            let _ = writeln!(out, "    {}", item.description.replace('\n', " "));
        }
        out.push('\n');
    }
    out
}
