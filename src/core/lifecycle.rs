//! future 與 stream 的生命週期掛勾。
//!
//! 第一次 poll 視為訂閱；在終止訊號之前被 drop 視為取消。
//! `traced` 透過 `tracing` 記錄訊號，`on_signal` 交給任意 callback。

use futures::Stream;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Subscribe,
    Next,
    Success,
    Error,
    Complete,
    Cancel,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Signal::Subscribe => "subscribed",
            Signal::Next => "next",
            Signal::Success => "success",
            Signal::Error => "error",
            Signal::Complete => "completed",
            Signal::Cancel => "cancel",
        };
        f.write_str(label)
    }
}

pub type SignalHook = Box<dyn FnMut(Signal) + Send>;

/// 以 `tracing` 輸出 `"{name} subscribed"` 這類訊息的 hook
pub fn log_signal(name: &str) -> impl FnMut(Signal) + Send + 'static {
    let name = name.to_string();
    move |signal| match signal {
        Signal::Next => tracing::debug!("{} {}", name, signal),
        _ => tracing::info!("{} {}", name, signal),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Done,
}

pub struct SignalFuture<F> {
    inner: Pin<Box<F>>,
    hook: SignalHook,
    phase: Phase,
}

impl<F> SignalFuture<F> {
    pub fn new<H>(inner: F, hook: H) -> Self
    where
        H: FnMut(Signal) + Send + 'static,
    {
        Self {
            inner: Box::pin(inner),
            hook: Box::new(hook),
            phase: Phase::Idle,
        }
    }
}

impl<F, T, E> Future for SignalFuture<F>
where
    F: Future<Output = Result<T, E>>,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.phase == Phase::Idle {
            this.phase = Phase::Running;
            (this.hook)(Signal::Subscribe);
        }

        match this.inner.as_mut().poll(cx) {
            Poll::Ready(result) => {
                this.phase = Phase::Done;
                (this.hook)(if result.is_ok() {
                    Signal::Success
                } else {
                    Signal::Error
                });
                Poll::Ready(result)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<F> Drop for SignalFuture<F> {
    fn drop(&mut self) {
        if self.phase == Phase::Running {
            (self.hook)(Signal::Cancel);
        }
    }
}

pub struct SignalStream<S> {
    inner: Pin<Box<S>>,
    hook: SignalHook,
    phase: Phase,
}

impl<S> SignalStream<S> {
    pub fn new<H>(inner: S, hook: H) -> Self
    where
        H: FnMut(Signal) + Send + 'static,
    {
        Self {
            inner: Box::pin(inner),
            hook: Box::new(hook),
            phase: Phase::Idle,
        }
    }
}

impl<S, T, E> Stream for SignalStream<S>
where
    S: Stream<Item = Result<T, E>>,
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.phase == Phase::Idle {
            this.phase = Phase::Running;
            (this.hook)(Signal::Subscribe);
        }

        let polled = this.inner.as_mut().poll_next(cx);
        // Error 之後視為已終止，不再發出 Complete
        if this.phase == Phase::Running {
            match &polled {
                Poll::Ready(Some(Ok(_))) => (this.hook)(Signal::Next),
                Poll::Ready(Some(Err(_))) => {
                    this.phase = Phase::Done;
                    (this.hook)(Signal::Error);
                }
                Poll::Ready(None) => {
                    this.phase = Phase::Done;
                    (this.hook)(Signal::Complete);
                }
                Poll::Pending => {}
            }
        }
        polled
    }
}

impl<S> Drop for SignalStream<S> {
    fn drop(&mut self) {
        if self.phase == Phase::Running {
            (self.hook)(Signal::Cancel);
        }
    }
}

/// 收集 signal 的紀錄器，可 clone 後分給多個 hook
#[derive(Debug, Clone, Default)]
pub struct SignalLog {
    signals: Arc<Mutex<Vec<Signal>>>,
}

impl SignalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hook(&self) -> impl FnMut(Signal) + Send + 'static {
        let signals = Arc::clone(&self.signals);
        move |signal| {
            if let Ok(mut recorded) = signals.lock() {
                recorded.push(signal);
            }
        }
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.signals
            .lock()
            .map(|recorded| recorded.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, signal: Signal) -> bool {
        self.signals().contains(&signal)
    }
}
