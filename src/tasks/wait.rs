/*!
 * Synchronous Waiting
 * Block the calling thread on a future without deadlocking the runtime
 */

use crate::core::errors::{FicheError, Result};
use std::future::Future;
use tokio::runtime::{Builder, Handle, RuntimeFlavor};
use tracing::{debug, warn};

/// Drive `future` to completion from synchronous code
///
/// - inside a multi-threaded runtime the worker is handed over with
///   `block_in_place` before blocking
/// - inside a current-thread runtime blocking would deadlock, so this fails
///   with `InvalidOperation`
/// - outside any runtime a temporary current-thread runtime is built
pub fn wait_sync<F: Future>(future: F) -> Result<F::Output> {
    match Handle::try_current() {
        Ok(handle) => match handle.runtime_flavor() {
            RuntimeFlavor::MultiThread => {
                debug!("blocking in place on the multi-threaded runtime");
                Ok(tokio::task::block_in_place(|| handle.block_on(future)))
            }
            flavor => {
                warn!(?flavor, "refusing to block on a single-threaded runtime");
                Err(FicheError::invalid_operation(
                    "cannot wait synchronously on a current-thread runtime",
                ))
            }
        },
        Err(_) => {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| {
                    FicheError::invalid_operation(format!("failed to build a runtime: {}", e))
                })?;
            Ok(runtime.block_on(future))
        }
    }
}
