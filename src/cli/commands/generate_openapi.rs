//! generate-openapi command - Print an OpenAPI document for a domain's events

use anyhow::Result;

use super::require_token;
use crate::catalog::http::HttpCatalog;
use crate::engine::{self, Context, EventFilter};
use crate::ui::output;

/// Rebuild the OpenAPI document of `domain_name` and print it.
pub fn generate_openapi(
    ctx: &Context,
    domain_name: &str,
    external_only: bool,
    token: &str,
) -> Result<()> {
    require_token(token)?;
    let store = HttpCatalog::new(token, ctx.catalog_url());

    let rt = tokio::runtime::Runtime::new()?;
    let document = rt.block_on(engine::regenerate_openapi(
        domain_name,
        EventFilter::from_external_only(external_only),
        ctx.config.page_size(),
        &store,
    ))?;

    output::print_document(&document)?;
    Ok(())
}
