use std::sync::Arc;

use ideate_api::protocol::ServerInfo;
use ideate_api::{RpcServer, ToolRegistry};
use tokio::io::BufReader;

use crate::context::AppContext;

/// Handle `ideate serve`: line-delimited JSON-RPC on stdin/stdout until EOF.
pub async fn handle(ctx: &AppContext) -> anyhow::Result<()> {
    let tools = ToolRegistry::new(Arc::clone(&ctx.api));
    let info = ServerInfo {
        name: format!("ideate-{}", ctx.api.describe().domain),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let mut server = RpcServer::new(tools, info);
    server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
