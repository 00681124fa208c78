/*!
 * Tasks
 *
 * Async coordination helpers on top of tokio:
 * - `CachableTask`: one in-flight run shared by concurrent callers
 * - `wait_sync`: block synchronous code on a future
 */

mod cachable;
mod wait;

pub use cachable::{CachableTask, SharedTask};
pub use wait::wait_sync;
