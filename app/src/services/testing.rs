//! In-memory `VotingBackend` for service and router tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use voting_backend::{
    AppStatus, BackendError, Category, CategoryStatus, Choice, ChoiceTally, NewCategory,
    NewChoice, Vote, VotingBackend,
};

#[derive(Default)]
struct Store {
    categories: Vec<Category>,
    choices: Vec<Choice>,
    votes: HashMap<(String, String), String>,
    tallies: Vec<ChoiceTally>,
    is_running: bool,
    registered: Vec<String>,
    next_id: u32,
}

#[derive(Default)]
pub struct FakeBackend {
    store: Mutex<Store>,
    fail_reads: Mutex<bool>,
    fail_writes: Mutex<bool>,
    fail_register: Mutex<bool>,
    writes: AtomicUsize,
    vote_reads: AtomicUsize,
    category_reads: AtomicUsize,
    register_calls: AtomicUsize,
}

pub fn category(id: &str, order_index: i64, status: CategoryStatus) -> Category {
    Category {
        id: id.into(),
        name: format!("Category {id}"),
        status,
        order_index,
        rigged: false,
    }
}

pub fn choice(id: &str, category_id: &str, name: &str, hidden: bool) -> Choice {
    Choice {
        id: id.into(),
        name: name.into(),
        image_ref: format!("{id}.png"),
        category_id: category_id.into(),
        hidden,
        rigged_vote_count: 0,
    }
}

pub fn tally(category_id: &str, choice_id: &str, name: &str, votes: i64) -> ChoiceTally {
    ChoiceTally {
        category_id: category_id.into(),
        choice_id: choice_id.into(),
        choice_name: name.into(),
        image_ref: String::new(),
        hidden: false,
        vote_count: votes,
        rigged_vote_count: 0,
    }
}

fn unavailable() -> BackendError {
    BackendError::ApiError {
        status: 503,
        message: "backend unavailable".into(),
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.store.lock().unwrap().is_running = true;
        backend
    }

    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        self.store.lock().unwrap().categories = categories;
        self
    }

    pub fn with_choices(self, choices: Vec<Choice>) -> Self {
        self.store.lock().unwrap().choices = choices;
        self
    }

    pub fn with_tallies(self, tallies: Vec<ChoiceTally>) -> Self {
        self.store.lock().unwrap().tallies = tallies;
        self
    }

    pub fn set_running(&self, is_running: bool) {
        self.store.lock().unwrap().is_running = is_running;
    }

    pub fn set_category_status(&self, id: &str, status: CategoryStatus) {
        let mut store = self.store.lock().unwrap();
        if let Some(c) = store.categories.iter_mut().find(|c| c.id == id) {
            c.status = status;
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn fail_register(&self, fail: bool) {
        *self.fail_register.lock().unwrap() = fail;
    }

    /// Successful and failed write attempts (vote, status and management writes).
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn vote_reads(&self) -> usize {
        self.vote_reads.load(Ordering::SeqCst)
    }

    pub fn category_reads(&self) -> usize {
        self.category_reads.load(Ordering::SeqCst)
    }

    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    pub fn registered(&self) -> Vec<String> {
        self.store.lock().unwrap().registered.clone()
    }

    pub fn votes(&self) -> Vec<Vote> {
        self.store
            .lock()
            .unwrap()
            .votes
            .iter()
            .map(|((s, c), choice)| Vote {
                session_id: s.clone(),
                category_id: c.clone(),
                choice_id: choice.clone(),
            })
            .collect()
    }

    fn read_guard(&self) -> Result<(), BackendError> {
        if *self.fail_reads.lock().unwrap() {
            return Err(unavailable());
        }
        Ok(())
    }

    fn write_guard(&self) -> Result<(), BackendError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if *self.fail_writes.lock().unwrap() {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl VotingBackend for FakeBackend {
    async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.category_reads.fetch_add(1, Ordering::SeqCst);
        self.read_guard()?;
        Ok(self.store.lock().unwrap().categories.clone())
    }

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>, BackendError> {
        self.category_reads.fetch_add(1, Ordering::SeqCst);
        self.read_guard()?;
        let store = self.store.lock().unwrap();
        Ok(store.categories.iter().find(|c| c.id == category_id).cloned())
    }

    async fn list_choices(
        &self,
        category_id: &str,
        include_hidden: bool,
    ) -> Result<Vec<Choice>, BackendError> {
        self.read_guard()?;
        let store = self.store.lock().unwrap();
        let mut choices: Vec<Choice> = store
            .choices
            .iter()
            .filter(|c| c.category_id == category_id && (include_hidden || !c.hidden))
            .cloned()
            .collect();
        choices.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(choices)
    }

    async fn find_vote(
        &self,
        session_id: &str,
        category_id: &str,
    ) -> Result<Option<Vote>, BackendError> {
        self.vote_reads.fetch_add(1, Ordering::SeqCst);
        self.read_guard()?;
        let store = self.store.lock().unwrap();
        Ok(store
            .votes
            .get(&(session_id.to_string(), category_id.to_string()))
            .map(|choice_id| Vote {
                session_id: session_id.into(),
                category_id: category_id.into(),
                choice_id: choice_id.clone(),
            }))
    }

    async fn upsert_vote(&self, vote: &Vote) -> Result<(), BackendError> {
        self.write_guard()?;
        self.store.lock().unwrap().votes.insert(
            (vote.session_id.clone(), vote.category_id.clone()),
            vote.choice_id.clone(),
        );
        Ok(())
    }

    async fn update_vote(&self, vote: &Vote) -> Result<(), BackendError> {
        self.write_guard()?;
        let mut store = self.store.lock().unwrap();
        match store
            .votes
            .get_mut(&(vote.session_id.clone(), vote.category_id.clone()))
        {
            Some(choice) => {
                *choice = vote.choice_id.clone();
                Ok(())
            }
            None => Err(BackendError::ApiError {
                status: 404,
                message: "no vote".into(),
            }),
        }
    }

    async fn register_session(&self, session_id: &str) -> Result<(), BackendError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_register.lock().unwrap() {
            return Err(unavailable());
        }
        self.store
            .lock()
            .unwrap()
            .registered
            .push(session_id.to_string());
        Ok(())
    }

    async fn get_app_status(&self) -> Result<AppStatus, BackendError> {
        self.read_guard()?;
        Ok(AppStatus {
            is_running: self.store.lock().unwrap().is_running,
        })
    }

    async fn set_app_status(&self, is_running: bool) -> Result<(), BackendError> {
        self.write_guard()?;
        self.store.lock().unwrap().is_running = is_running;
        Ok(())
    }

    async fn update_category_status(
        &self,
        category_id: &str,
        status: CategoryStatus,
    ) -> Result<(), BackendError> {
        self.write_guard()?;
        let mut store = self.store.lock().unwrap();
        let category = store
            .categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or(BackendError::ApiError {
                status: 404,
                message: "category not found".into(),
            })?;
        category.status = status;
        Ok(())
    }

    async fn fetch_results(&self) -> Result<Vec<ChoiceTally>, BackendError> {
        self.read_guard()?;
        Ok(self.store.lock().unwrap().tallies.clone())
    }

    async fn fetch_category_results(
        &self,
        category_id: &str,
    ) -> Result<Vec<ChoiceTally>, BackendError> {
        self.read_guard()?;
        let store = self.store.lock().unwrap();
        Ok(store
            .tallies
            .iter()
            .filter(|t| t.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category, BackendError> {
        self.write_guard()?;
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let created = Category {
            id: format!("new-c{}", store.next_id),
            name: category.name.clone(),
            status: category.status,
            order_index: category.order_index,
            rigged: false,
        };
        store.categories.push(created.clone());
        Ok(created)
    }

    async fn delete_category(&self, category_id: &str) -> Result<(), BackendError> {
        self.write_guard()?;
        let mut store = self.store.lock().unwrap();
        store.categories.retain(|c| c.id != category_id);
        store.choices.retain(|c| c.category_id != category_id);
        Ok(())
    }

    async fn create_choice(&self, choice: &NewChoice) -> Result<Choice, BackendError> {
        self.write_guard()?;
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let created = Choice {
            id: format!("new-o{}", store.next_id),
            name: choice.name.clone(),
            image_ref: choice.image_ref.clone(),
            category_id: choice.category_id.clone(),
            hidden: choice.hidden,
            rigged_vote_count: 0,
        };
        store.choices.push(created.clone());
        Ok(created)
    }

    async fn set_choice_hidden(&self, choice_id: &str, hidden: bool) -> Result<(), BackendError> {
        self.write_guard()?;
        let mut store = self.store.lock().unwrap();
        if let Some(c) = store.choices.iter_mut().find(|c| c.id == choice_id) {
            c.hidden = hidden;
        }
        Ok(())
    }

    async fn delete_choice(&self, choice_id: &str) -> Result<(), BackendError> {
        self.write_guard()?;
        self.store
            .lock()
            .unwrap()
            .choices
            .retain(|c| c.id != choice_id);
        Ok(())
    }
}
