use tokio::runtime::Runtime;

/// Creates a lightweight single-threaded Tokio runtime
///
/// Uses current_thread scheduler so each background thread (playlist fetch,
/// stream download) owns exactly one runtime thread instead of a worker pool.
///
/// Returns `Ok(Runtime)` if successful, or `Err(String)` with error message
pub fn create_runtime() -> Result<Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to create runtime: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_runs_futures() {
        let rt = create_runtime().expect("expected a runtime");

        assert_eq!(7, rt.block_on(async { 3 + 4 }));
    }
}
