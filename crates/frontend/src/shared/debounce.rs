//! Trailing-edge debounce for async calls
//!
//! A burst of calls within `wait` collapses into one invocation with the
//! arguments of the last call. Every caller of the burst awaits the same
//! shared future and receives that single result, even if it passed
//! different arguments. [`KeyedDebounce`] keeps a separate window per key so
//! callers only coalesce with calls for the same key.

use futures_util::future::{LocalBoxFuture, Shared};
use futures_util::FutureExt;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::rc::Rc;
use std::time::Duration;

pub const DEFAULT_WAIT: Duration = Duration::from_millis(100);

/// Timer used to wait out the debounce window
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Browser timer (`setTimeout`)
pub struct GlooSleeper;

impl Sleeper for GlooSleeper {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::future::TimeoutFuture::new(millis).boxed_local()
    }
}

pub type DebouncedFuture<T> = Shared<LocalBoxFuture<'static, T>>;

type Call<A, T> = Rc<dyn Fn(A) -> LocalBoxFuture<'static, T>>;

struct Window<A, T: Clone> {
    generation: u64,
    args: Option<A>,
    pending: Option<DebouncedFuture<T>>,
}

pub struct Debounce<A, T: Clone> {
    call: Call<A, T>,
    wait: Duration,
    sleeper: Rc<dyn Sleeper>,
    window: Rc<RefCell<Window<A, T>>>,
}

impl<A, T: Clone> Clone for Debounce<A, T> {
    fn clone(&self) -> Self {
        Self {
            call: self.call.clone(),
            wait: self.wait,
            sleeper: self.sleeper.clone(),
            window: self.window.clone(),
        }
    }
}

impl<A: 'static, T: Clone + 'static> Debounce<A, T> {
    pub fn new<F, Fut>(func: F, wait: Duration, sleeper: Rc<dyn Sleeper>) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = T> + 'static,
    {
        let call: Call<A, T> = Rc::new(move |args| func(args).boxed_local());
        Self::from_call(call, wait, sleeper)
    }

    /// Debounce a synchronous function; it runs once at the trailing edge
    pub fn from_sync<F>(func: F, wait: Duration, sleeper: Rc<dyn Sleeper>) -> Self
    where
        F: Fn(A) -> T + 'static,
    {
        Self::new(move |args| std::future::ready(func(args)), wait, sleeper)
    }

    fn from_call(call: Call<A, T>, wait: Duration, sleeper: Rc<dyn Sleeper>) -> Self {
        Self {
            call,
            wait,
            sleeper,
            window: Rc::new(RefCell::new(Window {
                generation: 0,
                args: None,
                pending: None,
            })),
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// No window is open; the next call starts a new one
    fn is_idle(&self) -> bool {
        self.window.borrow().pending.is_none()
    }

    fn same_window(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.window, &other.window)
    }

    /// Queue a call; resolves with the result of the burst's trailing invocation
    pub fn call(&self, args: A) -> DebouncedFuture<T> {
        let mut window = self.window.borrow_mut();
        window.generation += 1;
        window.args = Some(args);
        if let Some(pending) = &window.pending {
            return pending.clone();
        }

        let fut = trailing(
            self.call.clone(),
            self.wait,
            self.sleeper.clone(),
            self.window.clone(),
        )
        .boxed_local()
        .shared();
        window.pending = Some(fut.clone());
        fut
    }
}

async fn trailing<A, T: Clone>(
    call: Call<A, T>,
    wait: Duration,
    sleeper: Rc<dyn Sleeper>,
    window: Rc<RefCell<Window<A, T>>>,
) -> T {
    loop {
        let seen = window.borrow().generation;
        sleeper.sleep(wait).await;

        let args = {
            let mut window = window.borrow_mut();
            if window.generation != seen {
                // a newer call restarted the window
                continue;
            }
            // Calls from here on open a new window
            window.pending = None;
            window.args.take()
        };
        if let Some(args) = args {
            return call(args).await;
        }
    }
}

/// One debounce window per key; a key's entry is dropped once its window has fired
/// and no newer call reopened it
pub struct KeyedDebounce<K, T: Clone> {
    call: Call<K, T>,
    wait: Duration,
    sleeper: Rc<dyn Sleeper>,
    windows: Rc<RefCell<HashMap<K, Debounce<K, T>>>>,
}

impl<K, T: Clone> Clone for KeyedDebounce<K, T> {
    fn clone(&self) -> Self {
        Self {
            call: self.call.clone(),
            wait: self.wait,
            sleeper: self.sleeper.clone(),
            windows: self.windows.clone(),
        }
    }
}

impl<K, T> KeyedDebounce<K, T>
where
    K: Clone + Eq + Hash + 'static,
    T: Clone + 'static,
{
    pub fn new<F, Fut>(func: F, wait: Duration, sleeper: Rc<dyn Sleeper>) -> Self
    where
        F: Fn(K) -> Fut + 'static,
        Fut: Future<Output = T> + 'static,
    {
        Self {
            call: Rc::new(move |key| func(key).boxed_local()),
            wait,
            sleeper,
            windows: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn call(&self, key: K) -> DebouncedFuture<T> {
        let debounce = self
            .windows
            .borrow_mut()
            .entry(key.clone())
            .or_insert_with(|| {
                Debounce::from_call(self.call.clone(), self.wait, self.sleeper.clone())
            })
            .clone();
        let pending = debounce.call(key.clone());
        let windows = self.windows.clone();
        async move {
            let out = pending.await;
            let mut windows = windows.borrow_mut();
            let evict = windows
                .get(&key)
                .is_some_and(|current| current.same_window(&debounce) && debounce.is_idle());
            if evict {
                windows.remove(&key);
            }
            out
        }
        .boxed_local()
        .shared()
    }

    #[cfg(test)]
    fn open_windows(&self) -> usize {
        self.windows.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::testing::TokioSleeper;
    use futures_util::future::join_all;
    use std::cell::Cell;

    fn sleeper() -> Rc<dyn Sleeper> {
        Rc::new(TokioSleeper)
    }

    #[tokio::test]
    async fn test_burst_invokes_once_and_fans_out() {
        let invocations = Rc::new(Cell::new(0u32));
        let counter = invocations.clone();
        let debounce = Debounce::new(
            move |n: u32| {
                counter.set(counter.get() + 1);
                async move { n * 10 }
            },
            Duration::from_millis(50),
            sleeper(),
        );

        let calls: Vec<_> = (1..=5).map(|n| debounce.call(n)).collect();
        let results = join_all(calls).await;

        assert_eq!(invocations.get(), 1);
        // Last call wins: every caller sees the result for argument 5
        assert_eq!(results, vec![50; 5]);
    }

    #[tokio::test]
    async fn test_separate_windows_invoke_separately() {
        let invocations = Rc::new(Cell::new(0u32));
        let counter = invocations.clone();
        let debounce = Debounce::from_sync(
            move |n: u32| {
                counter.set(counter.get() + 1);
                n
            },
            Duration::from_millis(10),
            sleeper(),
        );

        assert_eq!(debounce.call(1).await, 1);
        assert_eq!(debounce.call(2).await, 2);
        assert_eq!(invocations.get(), 2);
    }

    #[tokio::test]
    async fn test_call_during_wait_restarts_window() {
        let invocations = Rc::new(Cell::new(0u32));
        let counter = invocations.clone();
        let debounce = Debounce::new(
            move |s: &'static str| {
                counter.set(counter.get() + 1);
                async move { s }
            },
            Duration::from_millis(40),
            sleeper(),
        );

        let first = debounce.call("first");
        let late = {
            let debounce = debounce.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                debounce.call("second").await
            }
        };
        let (a, b) = futures_util::join!(first, late);

        assert_eq!((a, b), ("second", "second"));
        assert_eq!(invocations.get(), 1);
    }

    #[tokio::test]
    async fn test_keyed_debounce_keeps_arguments_apart() {
        let invocations = Rc::new(Cell::new(0u32));
        let counter = invocations.clone();
        let debounce = KeyedDebounce::new(
            move |id: String| {
                counter.set(counter.get() + 1);
                async move { format!("spider {id}") }
            },
            Duration::from_millis(20),
            sleeper(),
        );

        let results = join_all(vec![
            debounce.call("a".to_string()),
            debounce.call("b".to_string()),
            debounce.call("a".to_string()),
        ])
        .await;

        assert_eq!(results, vec!["spider a", "spider b", "spider a"]);
        assert_eq!(invocations.get(), 2);
    }

    #[tokio::test]
    async fn test_keyed_debounce_drops_fired_windows() {
        let debounce = KeyedDebounce::new(
            |id: u32| async move { id },
            Duration::from_millis(10),
            sleeper(),
        );

        for id in 0..50 {
            assert_eq!(debounce.call(id).await, id);
        }
        assert_eq!(debounce.open_windows(), 0);

        let pending = debounce.call(7);
        assert_eq!(debounce.open_windows(), 1);
        assert_eq!(pending.await, 7);
        assert_eq!(debounce.open_windows(), 0);
    }

    #[tokio::test]
    async fn test_keyed_window_reopened_during_call_is_dropped_later() {
        let debounce = KeyedDebounce::new(
            |id: u32| async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                id
            },
            Duration::from_millis(10),
            sleeper(),
        );

        let first = debounce.call(1);
        let second = {
            let debounce = debounce.clone();
            async move {
                // the first window has fired and its call is still running
                tokio::time::sleep(Duration::from_millis(20)).await;
                let pending = debounce.call(1);
                (debounce.open_windows(), pending.await)
            }
        };
        let (a, (open_while_running, b)) = futures_util::join!(first, second);

        assert_eq!((a, b), (1, 1));
        assert_eq!(open_while_running, 1);
        assert_eq!(debounce.open_windows(), 0);
    }
}
