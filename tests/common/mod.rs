//! Shared helpers: an in-memory gateway and a router driven with `oneshot`.
#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use catalog_api::{
    app::build_router,
    config::{AppConfig, Environment},
    gateway::{Expect, GatewayError, ResultSet, RoutineGateway, RoutineOutput, RoutineParams},
    middleware::account::AccountContext,
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub routine: String,
    pub params: RoutineParams,
    pub expect: Expect,
}

/// Returns canned result sets per routine name and records every call.
#[derive(Default)]
pub struct FakeGateway {
    responses: Mutex<HashMap<String, Vec<ResultSet>>>,
    failing: Mutex<HashSet<String>>,
    panicking: Mutex<HashSet<String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, routine: &str, sets: Vec<ResultSet>) {
        self.responses
            .lock()
            .unwrap()
            .insert(routine.to_string(), sets);
    }

    pub fn fail(&self, routine: &str) {
        self.failing.lock().unwrap().insert(routine.to_string());
    }

    pub fn panic_on(&self, routine: &str) {
        self.panicking.lock().unwrap().insert(routine.to_string());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoutineGateway for FakeGateway {
    async fn execute(
        &self,
        routine: &str,
        params: &RoutineParams,
        expect: Expect,
    ) -> Result<RoutineOutput, GatewayError> {
        self.calls.lock().unwrap().push(RecordedCall {
            routine: routine.to_string(),
            params: params.clone(),
            expect,
        });

        if self.panicking.lock().unwrap().contains(routine) {
            panic!("fake gateway asked to panic for {routine}");
        }
        if self.failing.lock().unwrap().contains(routine) {
            return Err(GatewayError::Database(sqlx::Error::PoolTimedOut));
        }

        let sets = self
            .responses
            .lock()
            .unwrap()
            .get(routine)
            .cloned()
            .unwrap_or_default();
        Ok(RoutineOutput::shape(expect, sets))
    }
}

/// Build a result set from a JSON array of objects.
pub fn rows(value: Value) -> ResultSet {
    value
        .as_array()
        .expect("rows fixture must be an array")
        .iter()
        .map(|row| row.as_object().expect("row must be an object").clone())
        .collect()
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: Environment::Development,
        api_version: "v1".to_string(),
        db_max_connections: 1,
        cors_origins: Vec::new(),
        default_account_id: 1,
    }
}

pub fn app(gateway: Arc<FakeGateway>) -> Router {
    let state = AppState::new(gateway, AccountContext::new(1));
    build_router(state, &test_config())
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
