//! JSON output for the rendering layer.
//!
//! The document mirrors [`FrontPage`]:
//!
//! ```json
//! {
//!   "generated_at": "2025-05-06T20:30:00Z",
//!   "item_count": 1,
//!   "items": [
//!     {
//!       "title": "Regeringen presenterar budgeten",
//!       "description": "Finansministern är nöjd.",
//!       "link": "https://www.dn.se/sverige/budget/",
//!       "published_at": "2025-05-06T12:30:00Z",
//!       "date_estimated": false,
//!       "source": "DN"
//!     }
//!   ]
//! }
//! ```
//!
//! Text fields are raw; consumers escape them for their own medium.

use crate::models::FrontPage;
use std::error::Error;

/// Serialize a [`FrontPage`] as pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(front_page: &FrontPage) -> Result<String, Box<dyn Error>> {
    let mut json = serde_json::to_string_pretty(front_page)?;
    json.push('\n');
    Ok(json)
}
