mod protocol;
mod server;

use crate::error::Result;
use std::io;

pub use protocol::{FunctionContextArgs, Message, MessageContent, PostProcessArgs};
pub use server::ShaderDebugServer;

/// Serves editor requests on stdin/stdout until `disconnect` or EOF.
pub fn run_server_mode() -> Result<()> {
    log::info!("debug server starting");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut server = ShaderDebugServer::new(stdin.lock(), stdout.lock());
    server.run()?;
    log::info!("debug server exiting");
    Ok(())
}
