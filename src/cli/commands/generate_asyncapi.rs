//! generate-asyncapi command - Print the AsyncAPI document of an application

use anyhow::Result;

use super::require_token;
use crate::catalog::http::HttpCatalog;
use crate::engine::{self, Context};
use crate::ui::output;

/// Ask the catalog for the AsyncAPI document of `application` and print it.
pub fn generate_asyncapi(
    ctx: &Context,
    application: &str,
    asyncapi_version: &str,
    token: &str,
) -> Result<()> {
    require_token(token)?;
    let store = HttpCatalog::new(token, ctx.catalog_url());

    let rt = tokio::runtime::Runtime::new()?;
    let document = rt.block_on(engine::generate_asyncapi(
        application,
        asyncapi_version,
        &store,
    ))?;

    output::print_document(&document)?;
    Ok(())
}
