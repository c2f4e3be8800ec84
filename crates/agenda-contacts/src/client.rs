//! REST client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::api::ContactsApi;
use crate::error::{ContactsError, Result};
use crate::models::{Contact, ContactsConfig, Email, Phone};

/// HTTP client for the contacts REST API
#[derive(Clone)]
pub struct ContactsClient {
    client: Client,
    base_url: String,
}

impl ContactsClient {
    /// Create a new client
    pub fn new(config: &ContactsConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ContactsError::Configuration("base URL is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ContactsError::Configuration(e.to_string()))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        info!("Contacts client initialized for: {}", base_url);

        Ok(Self { client, base_url })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Turn a non-2xx answer into `ContactsError::Status`, keeping the server payload
    async fn check_status(response: Response, action: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        error!("{} failed: {} - {}", action, status, error_text);
        Err(ContactsError::Status {
            status: status.as_u16(),
            body: error_text,
        })
    }

    /// Decode a 2xx body; an empty or `null` body is an empty-success failure
    async fn read_body<T: DeserializeOwned>(response: Response, action: &str) -> Result<T> {
        let text = response
            .text()
            .await
            .map_err(|e| ContactsError::Connection(e.to_string()))?;

        if text.trim().is_empty() {
            error!("{} returned an empty body", action);
            return Err(ContactsError::EmptyResponse(action.to_string()));
        }

        match serde_json::from_str::<Option<T>>(&text) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => {
                error!("{} returned a null body", action);
                Err(ContactsError::EmptyResponse(action.to_string()))
            }
            Err(e) => {
                error!("{} returned an unexpected body: {}", action, e);
                Err(ContactsError::Parse(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl ContactsApi for ContactsClient {
    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let url = self.url("personas");

        debug!("Fetching contacts from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ContactsError::Connection(e.to_string()))?;

        let response = Self::check_status(response, "List contacts").await?;
        let contacts: Vec<Contact> = Self::read_body(response, "List contacts").await?;

        info!("Fetched {} contacts", contacts.len());
        Ok(contacts)
    }

    async fn create_contact(&self, contact: &Contact) -> Result<Contact> {
        let url = self.url("personas");

        debug!("Creating contact: {}", contact.display_name());

        let response = self
            .client
            .post(&url)
            .json(contact)
            .send()
            .await
            .map_err(|e| ContactsError::Connection(e.to_string()))?;

        let response = Self::check_status(response, "Create contact").await?;
        let created: Contact = Self::read_body(response, "Create contact").await?;

        info!("Created contact: {}", created.id);
        Ok(created)
    }

    async fn update_contact(&self, id: i64, contact: &Contact) -> Result<Contact> {
        let url = self.url(&format!("personas/{}", id));

        debug!("Updating contact: {}", id);

        let response = self
            .client
            .put(&url)
            .json(contact)
            .send()
            .await
            .map_err(|e| ContactsError::Connection(e.to_string()))?;

        let response = Self::check_status(response, "Update contact").await?;
        let updated: Contact = Self::read_body(response, "Update contact").await?;

        info!("Updated contact: {}", id);
        Ok(updated)
    }

    async fn delete_contact(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("personas/{}", id));

        debug!("Deleting contact: {}", id);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| ContactsError::Connection(e.to_string()))?;

        Self::check_status(response, "Delete contact").await?;

        info!("Deleted contact: {}", id);
        Ok(())
    }

    async fn get_contact(&self, id: i64) -> Result<Contact> {
        let url = self.url(&format!("personas/{}", id));

        debug!("Fetching contact: {}", id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ContactsError::Connection(e.to_string()))?;

        let response = Self::check_status(response, "Get contact").await?;
        Self::read_body(response, "Get contact").await
    }

    async fn add_phone(&self, phone: &Phone) -> Result<Phone> {
        let url = self.url("phones");

        debug!("Adding phone for contact {}", phone.persona_id);

        let response = self
            .client
            .post(&url)
            .json(phone)
            .send()
            .await
            .map_err(|e| ContactsError::Connection(e.to_string()))?;

        let response = Self::check_status(response, "Add phone").await?;
        let created: Phone = Self::read_body(response, "Add phone").await?;

        info!("Added phone {} to contact {}", created.id, phone.persona_id);
        Ok(created)
    }

    async fn add_email(&self, email: &Email) -> Result<Email> {
        let url = self.url("emails");

        debug!("Adding email for contact {}", email.persona_id);

        let response = self
            .client
            .post(&url)
            .json(email)
            .send()
            .await
            .map_err(|e| ContactsError::Connection(e.to_string()))?;

        let response = Self::check_status(response, "Add email").await?;
        let created: Email = Self::read_body(response, "Add email").await?;

        info!("Added email {} to contact {}", created.id, email.persona_id);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ContactsClient {
        ContactsClient::new(&ContactsConfig::new(format!("{}/", server.uri()))).unwrap()
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let result = ContactsClient::new(&ContactsConfig::new("  "));
        assert!(matches!(result, Err(ContactsError::Configuration(_))));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ContactsConfig::new("http://localhost:8000/api/");
        let client = ContactsClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[tokio::test]
    async fn test_list_contacts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/personas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 1,
                    "name": "Ana",
                    "phones": [{"id": 4, "persona_id": 1, "number": "555", "label": "Casa"}]
                },
                {"id": 2, "name": "Luis", "profile_picture": null}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let contacts = client_for(&server).await.list_contacts().await.unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].phones[0].number, "555");
        assert_eq!(contacts[1].name, "Luis");
    }

    #[tokio::test]
    async fn test_create_contact_posts_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/personas"))
            .and(body_json(json!({
                "id": 0,
                "name": "Ana",
                "last_name": "",
                "company": "",
                "address": "",
                "city": "",
                "state": "",
                "profile_picture": null,
                "phones": [],
                "emails": []
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9, "name": "Ana"})))
            .expect(1)
            .mount(&server)
            .await;

        let created = client_for(&server)
            .await
            .create_contact(&Contact::new("Ana"))
            .await
            .unwrap();
        assert_eq!(created.id, 9);
    }

    #[tokio::test]
    async fn test_update_contact_uses_put_with_id() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/personas/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "Ana"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut contact = Contact::new("Ana");
        contact.id = 5;
        let updated = client_for(&server).await.update_contact(5, &contact).await.unwrap();
        assert_eq!(updated.id, 5);
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/personas/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client_for(&server).await.delete_contact(7).await.is_ok());
    }

    #[tokio::test]
    async fn test_server_error_keeps_payload() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/personas/7"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.delete_contact(7).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        match err {
            ContactsError::Status { body, .. } => assert_eq!(body, "not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_success_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/personas/3"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/personas"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(matches!(
            client.get_contact(3).await,
            Err(ContactsError::EmptyResponse(_))
        ));
        assert!(matches!(
            client.create_contact(&Contact::new("Ana")).await,
            Err(ContactsError::EmptyResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unexpected_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/personas"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).await.list_contacts().await;
        assert!(matches!(result, Err(ContactsError::Parse(_))));
    }

    #[tokio::test]
    async fn test_add_phone_and_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/phones"))
            .and(body_json(json!({"id": 0, "persona_id": 5, "number": "Casa", "label": "555"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(
                json!({"id": 11, "persona_id": 5, "number": "Casa", "label": "555"}),
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"id": 12, "persona_id": 5, "email": "Persona", "label": "a@b.c"}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let mut phone = Phone::new("Casa", "555");
        phone.persona_id = 5;
        assert_eq!(client.add_phone(&phone).await.unwrap().id, 11);

        let mut email = Email::new("Persona", "a@b.c");
        email.persona_id = 5;
        assert_eq!(client.add_email(&email).await.unwrap().id, 12);
    }

    #[tokio::test]
    async fn test_connection_failure() {
        // Bind then release a port so nothing listens on it
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = ContactsConfig::new(format!("http://127.0.0.1:{}", port));
        let client = ContactsClient::new(&config).unwrap();
        assert!(matches!(
            client.list_contacts().await,
            Err(ContactsError::Connection(_))
        ));
    }
}
