use crate::domain::model::{Todo, User};
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn user_agent(&self) -> &str;
}

/// JSONPlaceholder 的三個唯讀端點
///
/// 單值結果以 future 表示；多值結果是惰性的 stream，第一次 poll 時才發出請求。
#[async_trait]
pub trait TodoApi: Send + Sync {
    /// `GET /todos/{todo_id}`，id 原樣送出（例如 `"12d"`）
    async fn get_todo(&self, todo_id: &str) -> Result<Todo>;

    /// `GET /todos`
    fn get_todos(&self) -> BoxStream<'_, Result<Todo>>;

    /// `GET /users`
    fn get_users(&self) -> BoxStream<'_, Result<User>>;
}
