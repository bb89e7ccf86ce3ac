use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rolodex_navigation::Contact;

use super::{ApiError, ContactApi, Fields};

/// In process contact resource, used by the demo mode and the tests. Every
/// request is recorded as `METHOD /path` for later inspection.
#[derive(Debug, Default)]
pub struct MemoryContactApi {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    contacts: Vec<Contact>,
    failure: Option<ApiError>,
    next_id: u64,
    requests: Vec<String>,
}

impl MemoryContactApi {
    pub fn new(contacts: Vec<Contact>) -> Self {
        let next_id = contacts.len() as u64 + 1;
        Self {
            state: Mutex::new(State {
                contacts,
                next_id,
                ..Default::default()
            }),
        }
    }

    pub fn demo() -> Self {
        let contacts = [
            ("Shruti", "Kapoor", "shrutikapoor08", true),
            ("Glenn", "Reyes", "glnnrys", false),
            ("Ryan", "Florence", "ryanflorence", false),
            ("Oscar", "Newman", "__oscarnewman", false),
            ("Michael", "Jackson", "mjackson", false),
            ("Christopher", "Chedeau", "vjeux", false),
            ("Cameron", "Matheson", "cmatheson", false),
            ("Brooks", "Lybrand", "BrooksLybrand", false),
            ("Alex", "Anderson", "ralex1993", false),
            ("Kent C.", "Dodds", "kentcdodds", false),
        ];

        Self::new(
            contacts
                .into_iter()
                .enumerate()
                .map(|(index, (first, last, twitter, favorite))| Contact {
                    id: to_base36(index as u64 + 1),
                    first: Some(first.to_string()),
                    last: Some(last.to_string()),
                    twitter: Some(format!("@{}", twitter)),
                    favorite,
                    ..Default::default()
                })
                .collect(),
        )
    }

    pub fn requests(&self) -> Vec<String> {
        self.state().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    pub fn contacts(&self) -> Vec<Contact> {
        self.state().contacts.clone()
    }

    /// Every following request fails with `failure` until reset with `None`.
    pub fn fail_with(&self, failure: Option<ApiError>) {
        self.state().failure = failure;
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, request: String) -> Result<MutexGuard<'_, State>, ApiError> {
        let mut state = self.state();

        tracing::trace!("memory api request: {}", request);
        state.requests.push(request);

        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }

        Ok(state)
    }
}

#[async_trait]
impl ContactApi for MemoryContactApi {
    async fn list(&self, query: Option<&str>) -> Result<Vec<Contact>, ApiError> {
        let query = query.filter(|query| !query.is_empty());
        let request = match query {
            Some(query) => format!("GET /contacts?query={}", query),
            None => "GET /contacts".to_string(),
        };

        let state = self.begin(request)?;
        let mut contacts: Vec<_> = state
            .contacts
            .iter()
            .filter(|contact| query.map_or(true, |query| matches_query(contact, query)))
            .cloned()
            .collect();

        contacts.sort_by_key(sort_key);

        Ok(contacts)
    }

    async fn read(&self, id: &str) -> Result<Contact, ApiError> {
        let state = self.begin(format!("GET /contacts/{}", id))?;
        find(&state.contacts, id).cloned()
    }

    async fn create(&self) -> Result<Contact, ApiError> {
        let mut state = self.begin("POST /contacts".to_string())?;

        let contact = Contact {
            id: to_base36(state.next_id),
            first: Some(String::new()),
            last: Some(String::new()),
            ..Default::default()
        };

        state.next_id += 1;
        state.contacts.push(contact.clone());

        Ok(contact)
    }

    async fn update(&self, id: &str, fields: &Fields) -> Result<Contact, ApiError> {
        let mut state = self.begin(format!("PUT /contacts/{}", id))?;
        let contact = find_mut(&mut state.contacts, id)?;
        for (key, value) in fields {
            let value = Some(value.clone());
            match key.as_str() {
                "avatar" => contact.avatar = value,
                "first" => contact.first = value,
                "last" => contact.last = value,
                "notes" => contact.notes = value,
                "twitter" => contact.twitter = value,
                _ => tracing::debug!("ignoring unknown contact field: {}", key),
            }
        }

        Ok(contact.clone())
    }

    async fn favorite(&self, id: &str, favorite: bool) -> Result<Contact, ApiError> {
        let mut state = self.begin(format!("PUT /contacts/{}/favorite", id))?;
        let contact = find_mut(&mut state.contacts, id)?;
        contact.favorite = favorite;

        Ok(contact.clone())
    }

    async fn delete(&self, id: &str) -> Result<Option<Contact>, ApiError> {
        let mut state = self.begin(format!("DELETE /contacts/{}", id))?;
        match state.contacts.iter().position(|contact| contact.id == id) {
            Some(index) => Ok(Some(state.contacts.remove(index))),
            None => Err(not_found(id)),
        }
    }
}

/// Every character of the query has to appear in order within a single word
/// of the full name, ignoring case.
fn matches_query(contact: &Contact, query: &str) -> bool {
    let query = query.to_lowercase();
    let full = contact.full().unwrap_or_default().to_lowercase();

    full.split(' ').any(|word| {
        let mut chars = word.chars();
        query.chars().all(|expected| chars.any(|char| char == expected))
    })
}

fn sort_key(contact: &Contact) -> (String, String) {
    let lower = |value: &Option<String>| value.as_deref().unwrap_or_default().to_lowercase();
    (lower(&contact.last), lower(&contact.first))
}

fn find<'a>(contacts: &'a [Contact], id: &str) -> Result<&'a Contact, ApiError> {
    contacts
        .iter()
        .find(|contact| contact.id == id)
        .ok_or_else(|| not_found(id))
}

fn find_mut<'a>(contacts: &'a mut [Contact], id: &str) -> Result<&'a mut Contact, ApiError> {
    contacts
        .iter_mut()
        .find(|contact| contact.id == id)
        .ok_or_else(|| not_found(id))
}

fn not_found(id: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        body: format!("contact {}", id),
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }

    let mut result = Vec::new();
    while value > 0 {
        result.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    result.reverse();

    String::from_utf8_lossy(&result).into_owned()
}
