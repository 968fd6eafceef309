mod common;

use anyhow::Result;
use common::{client, expected_todo, mock_not_found, mock_todo, mock_todo_with_delay};
use futures::{future, stream, StreamExt};
use httpmock::prelude::*;
use reactor_workshop::{MonoExt, Signal, SignalLog, TodoApi, WorkshopError};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn assert_not_found(err: WorkshopError) {
    assert!(err.is_not_found(), "expected NotFound, got {:?}", err);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
}

// zip_when: 第一個完成後才開始第二個
#[tokio::test]
async fn test_zip_when_surfaces_not_found() -> Result<()> {
    let server = MockServer::start();
    let todo_mock = mock_todo(&server, 1);
    let missing_mock = mock_not_found(&server, "12d");
    let client = client(&server);

    let result = client
        .get_todo("1")
        .traced("getTodo(1)")
        .zip_when(|_| client.get_todo("12d").traced("getTodo(12d)"))
        .await;

    assert_not_found(assert_err!(result));
    todo_mock.assert();
    missing_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_zip_when_does_not_start_second_when_first_fails() -> Result<()> {
    let server = MockServer::start();
    let missing_mock = mock_not_found(&server, "12d");
    let todo_mock = mock_todo(&server, 1);
    let client = client(&server);

    let result = client
        .get_todo("12d")
        .zip_when(|_| client.get_todo("1"))
        .await;

    assert_not_found(assert_err!(result));
    missing_mock.assert();
    assert_eq!(todo_mock.hits(), 0);
    Ok(())
}

// zip_with: 同時執行，一方失敗另一方被取消
#[tokio::test]
async fn test_zip_with_surfaces_not_found_and_cancels_other() -> Result<()> {
    let server = MockServer::start();
    mock_todo_with_delay(&server, 1, Duration::from_millis(500));
    mock_not_found(&server, "12d");
    let client = client(&server);

    let log = SignalLog::new();
    let result = client
        .get_todo("1")
        .on_signal(log.hook())
        .zip_with(client.get_todo("12d").traced("getTodo(12d)"))
        .await;

    assert_not_found(assert_err!(result));
    assert_eq!(log.signals(), vec![Signal::Subscribe, Signal::Cancel]);
    Ok(())
}

#[tokio::test]
async fn test_zip_with_pairs_values() -> Result<()> {
    let server = MockServer::start();
    mock_todo(&server, 1);
    mock_todo(&server, 2);
    let client = client(&server);

    let (first, second) = client.get_todo("1").zip_with(client.get_todo("2")).await?;

    assert_eq!(first, expected_todo(1));
    assert_eq!(second, expected_todo(2));
    Ok(())
}

// and: 只關心兩者都完成
#[tokio::test]
async fn test_and_joins_and_returns_unit() -> Result<()> {
    let first = future::lazy(|_| {
        tracing::info!("exec first!");
        Ok::<_, WorkshopError>(())
    });
    let second = future::lazy(|_| {
        tracing::info!("exec second!");
        Ok::<_, WorkshopError>(())
    });

    assert_ok!(first.and(second).await);
    Ok(())
}

// concat_with: 第一個成功後才訂閱第二個，不交錯
#[tokio::test]
async fn test_concat_with_emits_in_order_then_completes() -> Result<()> {
    let server = MockServer::start();
    mock_todo(&server, 1);
    let second_mock = mock_todo(&server, 12);
    let client = client(&server);

    let mut todos = Box::pin(
        client
            .get_todo("1")
            .delay_element(Duration::from_millis(200))
            .concat_with(client.get_todo("12")),
    );

    assert_eq!(todos.next().await.transpose()?, Some(expected_todo(1)));
    assert_eq!(second_mock.hits(), 0);

    let second = todos.next().await.transpose()?;
    assert_eq!(second.as_ref().map(|t| t.title.as_str()), Some("ipsa repellendus fugit nisi"));
    assert_eq!(second.map(|t| t.completed), Some(true));
    assert!(todos.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_concat_with_does_not_request_second_after_not_found() -> Result<()> {
    let server = MockServer::start();
    mock_not_found(&server, "12d");
    let todo_mock = mock_todo(&server, 1);
    let client = client(&server);

    let items: Vec<_> = client
        .get_todo("12d")
        .concat_with(client.get_todo("1"))
        .collect()
        .await;

    assert_eq!(items.len(), 1);
    assert_not_found(assert_err!(items.into_iter().next().unwrap()));
    assert_eq!(todo_mock.hits(), 0);
    Ok(())
}

// then_return: 成功時改送出指定值，失敗時傳遞錯誤
#[tokio::test]
async fn test_then_return() -> Result<()> {
    let server = MockServer::start();
    mock_todo(&server, 1);
    mock_not_found(&server, "12d");
    let client = client(&server);

    assert_eq!(client.get_todo("1").then_return("OK").await?, "OK");
    assert_not_found(assert_err!(client.get_todo("12d").then_return("OK").await));
    Ok(())
}

// flat_map 回傳單值，flat_map_many 回傳多值
#[tokio::test]
async fn test_flat_map_many_vs_flat_map() -> Result<()> {
    let server = MockServer::start();
    mock_todo(&server, 1);
    let chained_mock = mock_todo(&server, 12);
    let client = &client(&server);

    let todo = client
        .get_todo("1")
        .flat_map(|todo| {
            let id = format!("{}2", todo.id);
            async move { client.get_todo(&id).await }
        })
        .await?;
    assert_eq!(todo, expected_todo(12));

    let todos: Vec<_> = client
        .get_todo("1")
        .flat_map_many(|todo| {
            let id = format!("{}2", todo.id);
            stream::once(async move { client.get_todo(&id).await })
        })
        .collect()
        .await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].as_ref().ok(), Some(&expected_todo(12)));

    chained_mock.assert_hits(2);
    Ok(())
}

// merge_with: 兩者同時執行，依完成順序送出
#[tokio::test]
async fn test_merge_with_emits_both() -> Result<()> {
    let server = MockServer::start();
    mock_todo(&server, 1);
    mock_todo_with_delay(&server, 2, Duration::from_millis(200));
    let client = client(&server);

    let todos: Vec<_> = client
        .get_todo("1")
        .merge_with(client.get_todo("2"))
        .collect()
        .await;

    let todos = todos.into_iter().collect::<reactor_workshop::Result<Vec<_>>>()?;
    assert_eq!(todos, vec![expected_todo(1), expected_todo(2)]);
    Ok(())
}

#[tokio::test]
async fn test_merge_with_stops_on_not_found() -> Result<()> {
    let server = MockServer::start();
    mock_todo_with_delay(&server, 1, Duration::from_millis(1_500));
    mock_not_found(&server, "12d");
    let client = client(&server);

    let log = SignalLog::new();
    let start = std::time::Instant::now();
    let items: Vec<_> = client
        .get_todo("1")
        .on_signal(log.hook())
        .merge_with(client.get_todo("12d"))
        .collect()
        .await;

    // 不等慢的那個完成，直接取消
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(items.len(), 1);
    assert_not_found(assert_err!(items.into_iter().next().unwrap()));
    assert_eq!(log.signals(), vec![Signal::Subscribe, Signal::Cancel]);
    Ok(())
}

// map_not_null: filter + map
#[tokio::test]
async fn test_map_not_null() -> Result<()> {
    let server = MockServer::start();
    mock_todo(&server, 1);
    mock_todo(&server, 12);
    let client = client(&server);

    let open = client
        .get_todo("1")
        .map_not_null(|todo| todo.completed.then_some(todo.id))
        .await?;
    let done = client
        .get_todo("12")
        .map_not_null(|todo| todo.completed.then_some(todo.id))
        .await?;

    assert_eq!(open, None);
    assert_eq!(done, Some(12));
    Ok(())
}

// delay_until 等待觸發器後送出原值；flat_map 改送出新值
#[tokio::test]
async fn test_delay_until_vs_flat_map() -> Result<()> {
    let server = MockServer::start();
    mock_todo(&server, 1);
    let trigger_mock = mock_todo(&server, 12);
    let client = client(&server);

    let same = client
        .get_todo("1")
        .delay_until(|todo| {
            tracing::info!("Consumer argument: {}", todo.id);
            client.get_todo("12")
        })
        .await?;
    assert_eq!(same, expected_todo(1));
    trigger_mock.assert_hits(1);

    let replaced = client
        .get_todo("1")
        .flat_map(|_| client.get_todo("12"))
        .await?;
    assert_eq!(replaced, expected_todo(12));
    Ok(())
}

#[tokio::test]
async fn test_delay_until_propagates_trigger_error() -> Result<()> {
    let server = MockServer::start();
    mock_todo(&server, 1);
    mock_not_found(&server, "12d");
    let client = client(&server);

    let result = client
        .get_todo("1")
        .delay_until(|_| client.get_todo("12d"))
        .await;

    assert_not_found(assert_err!(result));
    Ok(())
}
