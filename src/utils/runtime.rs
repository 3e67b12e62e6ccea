use anyhow::Result;

/// Every command does its file work sequentially, so a single thread is all that's needed.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
