//! In-memory `ContactsApi` that records every call

use std::sync::Mutex;

use agenda_contacts::{Contact, ContactsApi, ContactsError, Email, Phone, Result};
use async_trait::async_trait;

/// A call observed by [`FakeApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Create(Contact),
    Update(i64, Contact),
    Delete(i64),
    Get(i64),
    AddPhone(Phone),
    AddEmail(Email),
}

#[derive(Default)]
struct State {
    contacts: Vec<Contact>,
    next_id: i64,
    calls: Vec<ApiCall>,
    fail_list: bool,
    fail_save: bool,
    fail_delete: bool,
    fail_phone: bool,
    fail_email: bool,
    omit_saved_id: bool,
}

pub struct FakeApi {
    state: Mutex<State>,
}

fn server_error() -> ContactsError {
    ContactsError::Status {
        status: 500,
        body: "{\"detail\":\"boom\"}".to_string(),
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 100,
                ..Default::default()
            }),
        }
    }

    pub fn with_contacts(self, contacts: Vec<Contact>) -> Self {
        self.state.lock().unwrap().contacts = contacts;
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn fail_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_list = fail;
    }

    pub fn fail_save(&self, fail: bool) {
        self.state.lock().unwrap().fail_save = fail;
    }

    pub fn fail_delete(&self, fail: bool) {
        self.state.lock().unwrap().fail_delete = fail;
    }

    pub fn fail_phone(&self, fail: bool) {
        self.state.lock().unwrap().fail_phone = fail;
    }

    pub fn fail_email(&self, fail: bool) {
        self.state.lock().unwrap().fail_email = fail;
    }

    /// Answer creates and updates with a 2xx body that carries no id
    pub fn omit_saved_id(&self, omit: bool) {
        self.state.lock().unwrap().omit_saved_id = omit;
    }
}

#[async_trait]
impl ContactsApi for FakeApi {
    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::List);
        if state.fail_list {
            return Err(server_error());
        }
        Ok(state.contacts.clone())
    }

    async fn create_contact(&self, contact: &Contact) -> Result<Contact> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::Create(contact.clone()));
        if state.fail_save {
            return Err(server_error());
        }
        if state.omit_saved_id {
            return Ok(Contact::new(contact.name.clone()));
        }
        let mut created = contact.clone();
        created.id = state.next_id;
        created.phones.clear();
        created.emails.clear();
        state.next_id += 1;
        state.contacts.push(created.clone());
        Ok(created)
    }

    async fn update_contact(&self, id: i64, contact: &Contact) -> Result<Contact> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::Update(id, contact.clone()));
        if state.fail_save {
            return Err(server_error());
        }
        if state.omit_saved_id {
            return Ok(Contact::new(contact.name.clone()));
        }
        let mut updated = contact.clone();
        updated.id = id;
        updated.phones.clear();
        updated.emails.clear();
        state.contacts.retain(|c| c.id != id);
        state.contacts.push(updated.clone());
        Ok(updated)
    }

    async fn delete_contact(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::Delete(id));
        if state.fail_delete {
            return Err(ContactsError::Status {
                status: 404,
                body: String::new(),
            });
        }
        state.contacts.retain(|c| c.id != id);
        Ok(())
    }

    async fn get_contact(&self, id: i64) -> Result<Contact> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::Get(id));
        state
            .contacts
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(ContactsError::Status {
                status: 404,
                body: String::new(),
            })
    }

    async fn add_phone(&self, phone: &Phone) -> Result<Phone> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::AddPhone(phone.clone()));
        if state.fail_phone {
            return Err(server_error());
        }
        let mut created = phone.clone();
        created.id = state.next_id;
        state.next_id += 1;
        if let Some(owner) = state.contacts.iter_mut().find(|c| c.id == phone.persona_id) {
            owner.phones.push(created.clone());
        }
        Ok(created)
    }

    async fn add_email(&self, email: &Email) -> Result<Email> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::AddEmail(email.clone()));
        if state.fail_email {
            return Err(server_error());
        }
        let mut created = email.clone();
        created.id = state.next_id;
        state.next_id += 1;
        if let Some(owner) = state.contacts.iter_mut().find(|c| c.id == email.persona_id) {
            owner.emails.push(created.clone());
        }
        Ok(created)
    }
}
