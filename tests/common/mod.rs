#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use gated_items::flags::{
    EvaluationRequest, EvaluationResponse, EvaluationTransport, FlagClient, FlagError,
};
use gated_items::items::{Item, ItemStore, PageParams, Pagination, StoreError};
use gated_items::state::AppState;

// ── Flags ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Answer {
    Value(&'static str),
    Unavailable,
    Rejected,
}

/// Answers by flag key; unknown keys are unavailable.
#[derive(Default)]
pub struct FakeFlags {
    answers: Mutex<HashMap<String, Answer>>,
    pub calls: Mutex<Vec<EvaluationRequest>>,
}

impl FakeFlags {
    pub fn with(answers: &[(&str, Answer)]) -> Arc<Self> {
        let flags = Self::default();
        for (key, answer) in answers {
            flags.set(key, answer.clone());
        }
        Arc::new(flags)
    }

    pub fn set(&self, key: &str, answer: Answer) {
        self.answers.lock().unwrap().insert(key.to_string(), answer);
    }

    pub fn calls_for(&self, key: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.flag_key == key)
            .count()
    }
}

#[async_trait]
impl EvaluationTransport for FakeFlags {
    async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResponse, FlagError> {
        self.calls.lock().unwrap().push(request.clone());
        let answer = self
            .answers
            .lock()
            .unwrap()
            .get(&request.flag_key)
            .cloned()
            .unwrap_or(Answer::Unavailable);

        match answer {
            Answer::Value(value) => Ok(EvaluationResponse {
                value: value.to_string(),
                matched: true,
            }),
            Answer::Unavailable => Err(FlagError::Unavailable {
                key: request.flag_key.clone(),
                reason: "connection refused".to_string(),
            }),
            Answer::Rejected => Err(FlagError::Rejected {
                key: request.flag_key.clone(),
                status: 400,
                message: "bad request".to_string(),
            }),
        }
    }
}

// ── Store ───────────────────────────────────────────────────────

/// In-memory store that counts writes.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<Vec<Item>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Seeds items with creation times one minute apart, oldest first.
    pub fn seeded(titles: &[&str]) -> Arc<Self> {
        let store = Self::default();
        let start = Utc::now() - Duration::hours(1);
        {
            let mut items = store.items.lock().unwrap();
            for (i, title) in titles.iter().enumerate() {
                let at = start + Duration::minutes(i as i64);
                items.push(Item {
                    id: Uuid::new_v4(),
                    title: title.to_string(),
                    description: None,
                    created_at: at,
                    updated_at: at,
                });
            }
        }
        Arc::new(store)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Item> {
        self.items.lock().unwrap().clone()
    }

    pub fn id_of(&self, title: &str) -> Uuid {
        self.snapshot()
            .into_iter()
            .find(|i| i.title == title)
            .map(|i| i.id)
            .unwrap()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn find(&self, id: Uuid) -> Result<Item, StoreError> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self, params: PageParams) -> Result<(Vec<Item>, Pagination), StoreError> {
        let mut items = self.snapshot();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = items.len() as i64;

        let page = items
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.per_page() as usize)
            .collect();

        Ok((page, Pagination::new(params, total)))
    }

    async fn create(&self, mut item: Item) -> Result<Item, StoreError> {
        let errors = item.validate();
        if errors.has_any() {
            return Err(StoreError::Invalid(errors));
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        item.id = Uuid::new_v4();
        item.created_at = Utc::now();
        item.updated_at = item.created_at;
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn update(&self, mut item: Item) -> Result<Item, StoreError> {
        let errors = item.validate();
        if errors.has_any() {
            return Err(StoreError::Invalid(errors));
        }

        let mut items = self.items.lock().unwrap();
        let slot = items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or(StoreError::NotFound)?;

        self.writes.fetch_add(1, Ordering::SeqCst);
        item.updated_at = Utc::now();
        *slot = item.clone();
        Ok(item)
    }

    async fn destroy(&self, id: Uuid) -> Result<(), StoreError> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Err(StoreError::NotFound);
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn app_state(store: Arc<MemoryStore>, flags: Arc<FakeFlags>) -> AppState {
    AppState {
        store,
        flags: FlagClient::new(flags),
    }
}
