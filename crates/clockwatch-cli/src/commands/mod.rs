pub mod auth;
pub mod config;
pub mod status;
pub mod watch;

/// Commands that touch the network run on a local single-thread runtime.
pub(crate) fn block_on<F: std::future::Future>(fut: F) -> Result<F::Output, Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(rt.block_on(fut))
}
