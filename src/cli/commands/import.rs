//! import-openapi command - Import an OpenAPI document into the catalog

use std::path::Path;

use anyhow::Result;

use super::{read_document, require_token};
use crate::catalog::http::HttpCatalog;
use crate::core::model::Role;
use crate::engine::{self, Context};

/// Import the document at `spec_file` into the named domain and application.
pub fn import_openapi(
    ctx: &Context,
    spec_file: &Path,
    domain: Option<&str>,
    application: Option<&str>,
    publish: bool,
    token: &str,
) -> Result<()> {
    require_token(token)?;
    let document = read_document(spec_file)?;

    let domain = domain.unwrap_or_else(|| ctx.config.import_domain());
    let application = application.unwrap_or_else(|| ctx.config.import_application());
    let store = HttpCatalog::new(token, ctx.catalog_url());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(engine::import_openapi(
        &document,
        domain,
        application,
        Role::from_pub_flag(publish),
        &store,
    ))?;
    Ok(())
}
