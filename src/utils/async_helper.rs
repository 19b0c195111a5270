use std::future::Future;
use std::pin::Pin;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

/// Type alias for async task results
pub type AsyncTaskResult<T> = Result<T, String>;

/// Type alias for boxed async tasks
pub type AsyncTask<T> = Pin<Box<dyn Future<Output = AsyncTaskResult<T>> + Send + 'static>>;

/// Spawns a background thread that runs an async task and sends the result via a channel
///
/// The thread builds its own current-thread Tokio runtime, runs the task to
/// completion and exits after sending. The UI thread is expected to poll the
/// receiving end with `try_recv` so results are only applied on that thread.
///
/// # Example
/// ```ignore
/// let (tx, rx) = std::sync::mpsc::channel();
/// spawn_and_send(
///     move || Box::pin(async move {
///         api::fetch_playlist(&url).await.map_err(|e| e.to_string())
///     }),
///     tx,
/// );
/// // Later, on the UI thread: rx.try_recv()
/// ```
pub fn spawn_and_send<F, T>(task_factory: F, tx: Sender<AsyncTaskResult<T>>) -> JoinHandle<()>
where
    F: FnOnce() -> AsyncTask<T> + Send + 'static,
    T: Send + 'static,
{
    std::thread::spawn(move || {
        let rt = match crate::utils::error_handling::create_runtime() {
            Ok(r) => r,
            Err(e) => {
                log::error!("[AsyncHelper] Failed to create runtime: {}", e);
                let _ = tx.send(Err(e));
                return;
            }
        };

        let result = rt.block_on(task_factory());
        if tx.send(result).is_err() {
            log::debug!("[AsyncHelper] Receiver dropped before result was delivered");
        }
    })
}
