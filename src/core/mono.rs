//! 單值運算子。
//!
//! 單值結果就是 `Future<Output = Result<T, E>>`，被 poll 之前什麼都不會執行。

use crate::core::flux::FluxExt;
use crate::core::lifecycle::{log_signal, Signal, SignalFuture};
use futures::future;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use std::future::Future;
use std::time::Duration;

pub trait MonoExt<T, E>: Future<Output = Result<T, E>> + Sized {
    /// 先等自己完成，再用結果建立第二個請求；兩者依序執行
    fn zip_when<U, B, F>(self, f: F) -> impl Future<Output = Result<(T, U), E>>
    where
        F: FnOnce(&T) -> B,
        B: Future<Output = Result<U, E>>,
    {
        async move {
            let first = self.await?;
            let second = f(&first).await?;
            Ok((first, second))
        }
    }

    /// 兩者同時執行；任一方失敗時另一方會被 drop（取消）
    fn zip_with<U, B>(self, other: B) -> impl Future<Output = Result<(T, U), E>>
    where
        B: Future<Output = Result<U, E>>,
    {
        future::try_join(self, other)
    }

    /// 同 `zip_with`，但只關心是否完成
    fn and<U, B>(self, other: B) -> impl Future<Output = Result<(), E>>
    where
        B: Future<Output = Result<U, E>>,
    {
        async move { future::try_join(self, other).await.map(|_| ()) }
    }

    /// 自己的值之後才訂閱 `other`，不會交錯
    fn concat_with<B>(self, other: B) -> impl Stream<Item = Result<T, E>>
    where
        B: Future<Output = Result<T, E>>,
    {
        stream::once(self)
            .chain(stream::once(other))
            .stop_on_error()
    }

    /// 兩者同時執行，依完成順序送出
    fn merge_with<B>(self, other: B) -> impl Stream<Item = Result<T, E>>
    where
        B: Future<Output = Result<T, E>>,
    {
        stream::select(stream::once(self), stream::once(other)).stop_on_error()
    }

    fn then_return<V>(self, value: V) -> impl Future<Output = Result<V, E>> {
        async move { self.await.map(|_| value) }
    }

    fn flat_map<U, B, F>(self, f: F) -> impl Future<Output = Result<U, E>>
    where
        F: FnOnce(T) -> B,
        B: Future<Output = Result<U, E>>,
    {
        async move { f(self.await?).await }
    }

    fn flat_map_many<U, S, F>(self, f: F) -> impl Stream<Item = Result<U, E>>
    where
        F: FnOnce(T) -> S,
        S: Stream<Item = Result<U, E>>,
    {
        stream::once(async move { self.await.map(f) }).try_flatten()
    }

    /// map + filter：回傳 `None` 時結果為空
    fn map_not_null<U, F>(self, f: F) -> impl Future<Output = Result<Option<U>, E>>
    where
        F: FnOnce(T) -> Option<U>,
    {
        async move { self.await.map(f) }
    }

    /// 等 `f(&value)` 完成後才送出原本的值；`f` 的結果被丟棄，錯誤則往外傳
    fn delay_until<U, B, F>(self, f: F) -> impl Future<Output = Result<T, E>>
    where
        F: FnOnce(&T) -> B,
        B: Future<Output = Result<U, E>>,
    {
        async move {
            let value = self.await?;
            f(&value).await?;
            Ok(value)
        }
    }

    /// 成功的值延後 `delay` 送出；錯誤不延遲
    fn delay_element(self, delay: Duration) -> impl Future<Output = Result<T, E>> {
        async move {
            let value = self.await?;
            tokio::time::sleep(delay).await;
            Ok(value)
        }
    }

    fn on_signal<H>(self, hook: H) -> SignalFuture<Self>
    where
        H: FnMut(Signal) + Send + 'static,
    {
        SignalFuture::new(self, hook)
    }

    fn traced(self, name: &str) -> SignalFuture<Self> {
        SignalFuture::new(self, log_signal(name))
    }
}

impl<F, T, E> MonoExt<T, E> for F where F: Future<Output = Result<T, E>> {}
