//! create-queue command - Provision a broker queue for an OpenAPI document

use std::path::Path;

use anyhow::Result;

use super::read_document;
use crate::broker::semp::SempClient;
use crate::engine::{self, Context};

/// Broker connection options; unset values come from the config file.
#[derive(Debug, Clone, Copy)]
pub struct BrokerOptions<'a> {
    pub admin_user: Option<&'a str>,
    pub admin_password: &'a str,
    pub host: Option<&'a str>,
    pub vpn: Option<&'a str>,
}

/// Create `queue` and subscribe it to every operation of `spec_file`.
pub fn create_queue(
    ctx: &Context,
    spec_file: &Path,
    options: BrokerOptions<'_>,
    queue: &str,
) -> Result<()> {
    let document = read_document(spec_file)?;

    let broker = SempClient::new(
        options.host.unwrap_or_else(|| ctx.config.broker_host()),
        options.vpn.unwrap_or_else(|| ctx.config.broker_vpn()),
        options
            .admin_user
            .unwrap_or_else(|| ctx.config.broker_admin_user()),
        options.admin_password,
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(engine::create_queue(&document, queue, &broker))?;
    Ok(())
}
