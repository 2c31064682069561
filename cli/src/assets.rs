//! Embedded assets: the wizard page compiled into the installer binary.
//!
//! At compile time, `include_dir!` embeds everything under `cli/assets/`:
//!   - `wizard.html`: the page served on `GET /`, driving the four phases

use anyhow::Result;
use include_dir::{Dir, include_dir};

static EMBEDDED_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Name of the wizard page asset.
pub const WIZARD_PAGE: &str = "wizard.html";

/// Return the raw bytes of a single embedded asset.
///
/// # Errors
///
/// Returns an error if no asset with the given `name` exists.
pub fn get_asset(name: &str) -> Result<&'static [u8]> {
    EMBEDDED_ASSETS
        .get_file(name)
        .map(|f| f.contents())
        .ok_or_else(|| anyhow::anyhow!("embedded asset not found: {name}"))
}

/// The wizard page as text.
///
/// # Errors
///
/// Returns an error if the page is missing or not valid UTF-8.
pub fn wizard_page() -> Result<&'static str> {
    let bytes = get_asset(WIZARD_PAGE)?;
    std::str::from_utf8(bytes).map_err(|e| anyhow::anyhow!("{WIZARD_PAGE} is not UTF-8: {e}"))
}
