//! `setTimeout` timer and the `spawn_local` executor handle.

use futures::{
    channel::oneshot,
    task::{LocalFutureObj, LocalSpawn, SpawnError},
};
use install_sdk_host::{Timer, TimerFuture};

#[derive(Debug, Clone, Copy, Default)]
/// Timer backed by `window.setTimeout`. Resolves immediately when no window is available.
pub struct WebTimer;

impl Timer for WebTimer {
    fn sleep(&self, duration_ms: u32) -> TimerFuture {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::{closure::Closure, JsCast};

            let Some(window) = web_sys::window() else {
                return wait_for(None);
            };
            let (tx, rx) = oneshot::channel::<()>();
            let callback = Closure::once(move || {
                let _ = tx.send(());
            });
            match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                i32::try_from(duration_ms).unwrap_or(i32::MAX),
            ) {
                Ok(_) => {
                    callback.forget();
                    wait_for(Some(rx))
                }
                Err(err) => {
                    leptos::logging::warn!(
                        "setTimeout failed: {}",
                        crate::bridge::js_error_to_string(err)
                    );
                    wait_for(None)
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = duration_ms;
            wait_for(None)
        }
    }
}

// Without a scheduled callback the sleep resolves at once.
fn wait_for(scheduled: Option<oneshot::Receiver<()>>) -> TimerFuture {
    match scheduled {
        Some(rx) => Box::pin(async move {
            let _ = rx.await;
        }),
        None => Box::pin(futures::future::ready(())),
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Spawns onto the browser microtask queue via `wasm_bindgen_futures::spawn_local`.
pub struct WebSpawner;

impl LocalSpawn for WebSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(future);
            Ok(())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            drop(future);
            Err(SpawnError::shutdown())
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::{executor::block_on, task::LocalSpawnExt, FutureExt};

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn timer_and_spawner_non_wasm_parity() {
        block_on(WebTimer.sleep(2_000));
        let spawned = WebSpawner.spawn_local(async {});
        assert!(spawned.is_err_and(|err| err.is_shutdown()));
    }

    #[test]
    fn unscheduled_sleep_resolves_immediately() {
        block_on(wait_for(None));

        let (tx, rx) = oneshot::channel::<()>();
        drop(tx);
        block_on(wait_for(Some(rx)));
    }

    #[test]
    fn scheduled_sleep_waits_for_the_callback() {
        let (tx, rx) = oneshot::channel::<()>();
        let mut sleep = wait_for(Some(rx));
        assert!((&mut sleep).now_or_never().is_none());
        tx.send(()).expect("receiver alive");
        block_on(sleep);
    }
}
