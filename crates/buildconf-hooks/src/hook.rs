//! Uniformly awaitable hook callbacks.

use futures::future::{self, AbortHandle, Abortable, BoxFuture};
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use crate::error::HookError;
use crate::payload::{HookParams, HookPayload, PublishPayload};
use crate::point::HookSignature;

/// Result every hook resolves to.
pub type HookResult = Result<(), HookError>;

type ParamsFn = dyn Fn(HookParams) -> BoxFuture<'static, HookResult> + Send + Sync;
type PublishFn = dyn Fn(PublishPayload) -> BoxFuture<'static, HookResult> + Send + Sync;

#[derive(Clone)]
enum HookFn {
    Params(Arc<ParamsFn>),
    Publish(Arc<PublishFn>),
}

/// A user-supplied lifecycle callback.
///
/// Cloning is cheap and clones compare equal: equality is identity of the
/// underlying closure.
#[derive(Clone)]
pub struct Hook {
    inner: HookFn,
}

impl Hook {
    /// Hook receiving [`HookParams`] and completing asynchronously.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(HookParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        Self {
            inner: HookFn::Params(Arc::new(move |params| f(params).boxed())),
        }
    }

    /// Hook receiving [`HookParams`] and completing immediately.
    pub fn from_sync<F>(f: F) -> Self
    where
        F: Fn(HookParams) -> HookResult + Send + Sync + 'static,
    {
        Self {
            inner: HookFn::Params(Arc::new(move |params| future::ready(f(params)).boxed())),
        }
    }

    /// Publish hook completing asynchronously.
    pub fn publish_async<F, Fut>(f: F) -> Self
    where
        F: Fn(PublishPayload) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        Self {
            inner: HookFn::Publish(Arc::new(move |payload| f(payload).boxed())),
        }
    }

    /// Publish hook completing immediately.
    pub fn publish_sync<F>(f: F) -> Self
    where
        F: Fn(PublishPayload) -> HookResult + Send + Sync + 'static,
    {
        Self {
            inner: HookFn::Publish(Arc::new(move |payload| future::ready(f(payload)).boxed())),
        }
    }

    pub fn signature(&self) -> HookSignature {
        match self.inner {
            HookFn::Params(_) => HookSignature::Params,
            HookFn::Publish(_) => HookSignature::Publish,
        }
    }

    /// Whether both handles point at the same closure.
    pub fn same_as(&self, other: &Hook) -> bool {
        match (&self.inner, &other.inner) {
            (HookFn::Params(a), HookFn::Params(b)) => Arc::ptr_eq(a, b),
            (HookFn::Publish(a), HookFn::Publish(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Start the hook with `payload`.
    ///
    /// The returned call must be awaited for the hook body to make progress.
    /// A payload that does not match [`signature`](Self::signature) resolves
    /// to [`HookError::PayloadMismatch`] without running the hook.
    pub fn call(&self, payload: impl Into<HookPayload>) -> HookCall {
        let payload = payload.into();
        tracing::trace!(signature = %self.signature(), "starting hook");

        let body: BoxFuture<'static, HookResult> = match (&self.inner, payload) {
            (HookFn::Params(f), HookPayload::Params(params)) => f(params),
            (HookFn::Publish(f), HookPayload::Publish(publish)) => f(publish),
            (_, payload) => future::ready(Err(HookError::PayloadMismatch {
                expected: self.signature(),
                actual: payload.signature(),
            }))
            .boxed(),
        };

        let (abort, registration) = AbortHandle::new_pair();
        let future = Abortable::new(body, registration)
            .map(|outcome| outcome.unwrap_or(Err(HookError::Aborted)))
            .boxed();

        HookCall { abort, future }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("signature", &self.signature())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Hook {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

/// An in-flight hook invocation.
pub struct HookCall {
    abort: AbortHandle,
    future: BoxFuture<'static, HookResult>,
}

impl HookCall {
    /// Handle that cancels this call; the call then resolves to
    /// [`HookError::Aborted`].
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }
}

impl Future for HookCall {
    type Output = HookResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().future.poll_unpin(cx)
    }
}

impl fmt::Debug for HookCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookCall")
            .field("aborted", &self.abort.is_aborted())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn params() -> HookParams {
        HookParams {
            mode: "spa".to_string(),
            dev: false,
            config: serde_json::json!({"distDir": "dist/spa"}),
        }
    }

    #[test]
    fn test_sync_hook_is_awaitable() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let hook = Hook::from_sync(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert_eq!(block_on(hook.call(params())), Ok(()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_async_hook_receives_params() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let hook = Hook::from_async(move |p: HookParams| {
            let sink = Arc::clone(&sink);
            async move {
                *sink.lock().unwrap() = Some(p.mode);
                Ok(())
            }
        });

        block_on(hook.call(params())).unwrap();
        assert_eq!(seen.lock().unwrap().as_deref(), Some("spa"));
    }

    #[test]
    fn test_publish_hook_receives_dist_dir() {
        let seen = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&seen);
        let hook = Hook::publish_sync(move |p| {
            *sink.lock().unwrap() = format!("{}:{}", p.arg, p.dist_dir);
            Ok(())
        });

        let payload = PublishPayload {
            arg: "s3".to_string(),
            dist_dir: "dist/spa".to_string(),
        };
        block_on(hook.call(payload)).unwrap();
        assert_eq!(*seen.lock().unwrap(), "s3:dist/spa");
    }

    #[test]
    fn test_payload_mismatch_does_not_run_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let hook = Hook::from_sync(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let payload = PublishPayload {
            arg: String::new(),
            dist_dir: "dist".to_string(),
        };
        let result = block_on(hook.call(payload));
        assert_eq!(
            result,
            Err(HookError::PayloadMismatch {
                expected: HookSignature::Params,
                actual: HookSignature::Publish,
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_aborted_call_resolves_to_aborted() {
        let hook = Hook::from_async(|_| futures::future::pending::<HookResult>());
        let call = hook.call(params());
        call.abort_handle().abort();

        assert_eq!(block_on(call), Err(HookError::Aborted));
    }

    #[test]
    fn test_failure_is_propagated() {
        let hook = Hook::from_sync(|_| Err(HookError::failed("lint errors")));
        let err = block_on(hook.call(params())).unwrap_err();
        assert_eq!(err.to_string(), "hook failed: lint errors");
    }

    #[test]
    fn test_equality_is_identity() {
        let a = Hook::from_sync(|_| Ok(()));
        let b = Hook::from_sync(|_| Ok(()));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
