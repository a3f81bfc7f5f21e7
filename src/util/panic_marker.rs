//! Marks code whose panics are caught and reported instead of ending the app.
//!
//! A panic hook runs before unwinding starts, so it cannot know whether a
//! `catch_unwind` further up will stop the panic. Code wrapped here sets a
//! task-local marker the hook can check.

use std::future::Future;

tokio::task_local! {
    static PANIC_IS_CAUGHT: ();
}

/// True when a panic raised at this point will be caught by a caller.
pub fn panic_is_caught() -> bool {
    PANIC_IS_CAUGHT.try_with(|_| ()).is_ok()
}

/// Run `future` with the marker set on every poll.
pub fn caught<F: Future>(future: F) -> impl Future<Output = F::Output> {
    PANIC_IS_CAUGHT.scope((), future)
}

/// Run `f` with the marker set, for closures handed to `spawn_blocking`.
pub fn caught_sync<R>(f: impl FnOnce() -> R) -> R {
    PANIC_IS_CAUGHT.sync_scope((), f)
}
