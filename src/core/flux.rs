//! 多值運算子。
//!
//! 多值結果就是 `Stream<Item = Result<T, E>>`。`concurrency` 為 0 時一律視為 1。
//! 一個 poll 內最多處理 [`POLL_BUDGET`] 個就緒元素，超過就讓出執行緒。

use crate::core::lifecycle::{log_signal, Signal, SignalStream};
use futures::stream::{Stream, TryStreamExt};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

pub const POLL_BUDGET: usize = 32;

pub trait FluxExt<T, E>: Stream<Item = Result<T, E>> + Sized {
    /// 一次只訂閱一個 inner，前一個結束才換下一個；保證順序、不交錯
    fn concat_map<U, S, F>(self, f: F) -> impl Stream<Item = Result<U, E>>
    where
        F: FnMut(T) -> S,
        S: Stream<Item = Result<U, E>>,
    {
        self.map_ok(f).try_flatten()
    }

    /// 最多 `concurrency` 個 inner 同時執行，結果交錯送出
    fn merge_map<U, S, F>(self, f: F, concurrency: usize) -> impl Stream<Item = Result<U, E>>
    where
        F: FnMut(T) -> S,
        S: Stream<Item = Result<U, E>> + Unpin,
    {
        self.map_ok(f).try_flatten_unordered(concurrency.max(1))
    }

    /// inner 同時執行，但依來源順序送出結果。
    ///
    /// 排在最前面的 inner 一有值就送出，後面的先暫存。
    fn flat_map_sequential<U, S, F>(self, f: F, concurrency: usize) -> FlatMapSequential<Self, F, S, U, E>
    where
        F: FnMut(T) -> S,
        S: Stream<Item = Result<U, E>>,
    {
        FlatMapSequential::new(self, f, concurrency)
    }

    /// 只送出最新 inner 的值；來源有新元素時，上一個 inner 被 drop（取消）
    fn switch_map<U, S, F>(self, f: F) -> SwitchMap<Self, F, S>
    where
        F: FnMut(T) -> S,
        S: Stream<Item = Result<U, E>>,
    {
        SwitchMap::new(self, f)
    }

    /// 第一個 Err 送出後就結束，上游隨即被 drop
    fn stop_on_error(self) -> StopOnError<Self> {
        StopOnError::new(self)
    }

    /// 取第一個元素，其餘的訂閱隨之取消
    fn first_item(self) -> impl Future<Output = Result<Option<T>, E>> {
        async move {
            let mut stream = Box::pin(self);
            stream.try_next().await
        }
    }

    fn on_signal<H>(self, hook: H) -> SignalStream<Self>
    where
        H: FnMut(Signal) + Send + 'static,
    {
        SignalStream::new(self, hook)
    }

    fn traced(self, name: &str) -> SignalStream<Self> {
        SignalStream::new(self, log_signal(name))
    }
}

impl<S, T, E> FluxExt<T, E> for S where S: Stream<Item = Result<T, E>> {}

pub struct StopOnError<S> {
    inner: Option<Pin<Box<S>>>,
}

impl<S> StopOnError<S> {
    fn new(inner: S) -> Self {
        Self {
            inner: Some(Box::pin(inner)),
        }
    }
}

impl<S, T, E> Stream for StopOnError<S>
where
    S: Stream<Item = Result<T, E>>,
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };

        match inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(value))) => Poll::Ready(Some(Ok(value))),
            Poll::Ready(Some(Err(e))) => {
                // 不再 poll 上游：還沒開始的不會被訂閱，進行中的被取消
                this.inner = None;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.inner = None;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

struct Queued<S, U, E> {
    stream: Pin<Box<S>>,
    buffered: VecDeque<Result<U, E>>,
    done: bool,
}

impl<S, U, E> Queued<S, U, E>
where
    S: Stream<Item = Result<U, E>>,
{
    /// 先把已就緒的值收進緩衝；回傳是否用完額度
    fn prefetch(&mut self, cx: &mut Context<'_>, budget: &mut usize) -> bool {
        while !self.done {
            if *budget == 0 {
                return true;
            }
            match self.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => {
                    *budget -= 1;
                    self.buffered.push_back(item);
                }
                Poll::Ready(None) => self.done = true,
                Poll::Pending => break,
            }
        }
        false
    }
}

pub struct FlatMapSequential<St, F, S, U, E> {
    outer: Pin<Box<St>>,
    outer_done: bool,
    f: F,
    limit: usize,
    inners: VecDeque<Queued<S, U, E>>,
}

// 所有欄位都經由 `Pin<Box<_>>` 或 `&mut` 存取，本身不需要被 pin
impl<St, F, S, U, E> Unpin for FlatMapSequential<St, F, S, U, E> {}

impl<St, F, S, U, E> FlatMapSequential<St, F, S, U, E> {
    fn new(outer: St, f: F, concurrency: usize) -> Self {
        Self {
            outer: Box::pin(outer),
            outer_done: false,
            f,
            limit: concurrency.max(1),
            inners: VecDeque::new(),
        }
    }

    fn fail(&mut self, e: E) -> Poll<Option<Result<U, E>>> {
        self.inners.clear();
        self.outer_done = true;
        Poll::Ready(Some(Err(e)))
    }
}

impl<St, F, S, T, U, E> Stream for FlatMapSequential<St, F, S, U, E>
where
    St: Stream<Item = Result<T, E>>,
    F: FnMut(T) -> S,
    S: Stream<Item = Result<U, E>>,
{
    type Item = Result<U, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            while !this.outer_done && this.inners.len() < this.limit {
                match this.outer.as_mut().poll_next(cx) {
                    Poll::Ready(Some(Ok(value))) => this.inners.push_back(Queued {
                        stream: Box::pin((this.f)(value)),
                        buffered: VecDeque::new(),
                        done: false,
                    }),
                    Poll::Ready(Some(Err(e))) => return this.fail(e),
                    Poll::Ready(None) => this.outer_done = true,
                    Poll::Pending => break,
                }
            }

            let Some(head) = this.inners.front_mut() else {
                break;
            };
            if let Some(item) = head.buffered.pop_front() {
                return match item {
                    Err(e) => this.fail(e),
                    ok => Poll::Ready(Some(ok)),
                };
            }
            if !head.done {
                match head.stream.as_mut().poll_next(cx) {
                    Poll::Ready(Some(Err(e))) => return this.fail(e),
                    Poll::Ready(Some(ok)) => return Poll::Ready(Some(ok)),
                    Poll::Ready(None) => head.done = true,
                    Poll::Pending => break,
                }
            }
            // head 已結束，換下一個並補上空出的名額
            this.inners.pop_front();
        }

        let mut budget = POLL_BUDGET;
        let mut exhausted = false;
        for inner in this.inners.iter_mut().skip(1) {
            exhausted |= inner.prefetch(cx, &mut budget);
        }
        if exhausted {
            cx.waker().wake_by_ref();
        }

        if this.outer_done && this.inners.is_empty() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}

pub struct SwitchMap<S, F, I> {
    outer: Pin<Box<S>>,
    outer_done: bool,
    f: F,
    inner: Option<Pin<Box<I>>>,
}

// `f` is only ever reached through `&mut`, never pinned.
impl<S, F, I> Unpin for SwitchMap<S, F, I> {}

impl<S, F, I> SwitchMap<S, F, I> {
    fn new(outer: S, f: F) -> Self {
        Self {
            outer: Box::pin(outer),
            outer_done: false,
            f,
            inner: None,
        }
    }
}

impl<S, F, I, T, U, E> Stream for SwitchMap<S, F, I>
where
    S: Stream<Item = Result<T, E>>,
    F: FnMut(T) -> I,
    I: Stream<Item = Result<U, E>>,
{
    type Item = Result<U, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        // 把來源已就緒的元素取出，只留最後一個 inner；額度用完先讓出
        let mut budget = POLL_BUDGET;
        while !this.outer_done {
            if budget == 0 {
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
            match this.outer.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(value))) => {
                    budget -= 1;
                    this.inner = Some(Box::pin((this.f)(value)));
                }
                Poll::Ready(Some(Err(e))) => {
                    this.inner = None;
                    this.outer_done = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => this.outer_done = true,
                Poll::Pending => break,
            }
        }

        if let Some(inner) = this.inner.as_mut() {
            match inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => return Poll::Ready(Some(item)),
                Poll::Ready(None) => this.inner = None,
                Poll::Pending => return Poll::Pending,
            }
        }

        if this.outer_done {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}
