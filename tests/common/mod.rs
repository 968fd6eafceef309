#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use reactor_workshop::{Todo, TodoClient};
use serde_json::{json, Value};
use std::time::Duration;

/// JSONPlaceholder 的資料量
pub const TODO_COUNT: u64 = 200;
pub const USER_COUNT: u64 = 10;

pub fn todo_fixture(id: u64) -> Value {
    match id {
        1 => json!({"userId": 1, "id": 1, "title": "delectus aut autem", "completed": false}),
        2 => json!({"userId": 1, "id": 2, "title": "quis ut nam facilis et officia qui", "completed": false}),
        12 => json!({"userId": 1, "id": 12, "title": "ipsa repellendus fugit nisi", "completed": true}),
        _ => json!({
            "userId": (id - 1) / 20 + 1,
            "id": id,
            "title": format!("todo {}", id),
            "completed": id % 3 == 0
        }),
    }
}

pub fn user_fixture(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("User {}", id),
        "username": format!("user{}", id),
        "email": format!("user{}@example.com", id),
        "address": {
            "street": "Kulas Light",
            "suite": format!("Apt. {}", 500 + id),
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    })
}

pub fn expected_todo(id: u64) -> Todo {
    serde_json::from_value(todo_fixture(id)).unwrap()
}

pub fn client(server: &MockServer) -> TodoClient {
    TodoClient::new(&server.base_url()).unwrap()
}

pub fn mock_todo(server: &MockServer, id: u64) -> Mock<'_> {
    mock_todo_with_delay(server, id, Duration::ZERO)
}

pub fn mock_todo_with_delay(server: &MockServer, id: u64, delay: Duration) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path(format!("/todos/{}", id));
        then.status(200)
            .header("Content-Type", "application/json")
            .delay(delay)
            .json_body(todo_fixture(id));
    })
}

pub fn mock_not_found<'a>(server: &'a MockServer, id: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path(format!("/todos/{}", id));
        then.status(404)
            .header("Content-Type", "application/json")
            .json_body(json!({}));
    })
}

pub fn mock_todos(server: &MockServer) -> Mock<'_> {
    let todos: Vec<Value> = (1..=TODO_COUNT).map(todo_fixture).collect();
    server.mock(|when, then| {
        when.method(GET).path("/todos");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(Value::Array(todos));
    })
}

pub fn mock_users(server: &MockServer) -> Mock<'_> {
    let users: Vec<Value> = (1..=USER_COUNT).map(user_fixture).collect();
    server.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(Value::Array(users));
    })
}
