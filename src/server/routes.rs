//! Contact routes and the axum router that serves them.
//!
//! | Method | Path              | Operation |
//! |--------|-------------------|-----------|
//! | POST   | `/contact`        | add       |
//! | GET    | `/contact/:name`  | get       |
//! | PUT    | `/contact`        | update    |
//! | DELETE | `/contact/:name`  | delete    |
//! | GET    | `/contact?page=&pageSize=&query=` | search |

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Router;

use crate::domain::ValidationError;
use crate::error::{ContactError, ContactResult};
use crate::models::Contact;
use crate::repositories::ContactStore;
use crate::server::endpoint::{ApiResponse, Endpoint, ResponseHead, Route};
use crate::server::envelope::ResponseEnvelope;

pub struct AddContact {
    store: Arc<dyn ContactStore>,
}

#[async_trait]
impl Route for AddContact {
    type Request = Bytes;

    async fn handle(&self, body: Bytes, _head: &mut ResponseHead) -> ContactResult<ResponseEnvelope> {
        let contact = Contact::from_json(&body)?;
        self.store.add(&contact).await?;
        ResponseEnvelope::success(&contact)
    }
}

pub struct GetContact {
    store: Arc<dyn ContactStore>,
}

#[async_trait]
impl Route for GetContact {
    type Request = String;

    async fn handle(&self, name: String, _head: &mut ResponseHead) -> ContactResult<ResponseEnvelope> {
        let contact = self.store.get(&name).await?;
        ResponseEnvelope::success(&contact)
    }
}

/// Replaces a contact and answers with the record it replaced.
pub struct UpdateContact {
    store: Arc<dyn ContactStore>,
}

#[async_trait]
impl Route for UpdateContact {
    type Request = Bytes;

    async fn handle(&self, body: Bytes, _head: &mut ResponseHead) -> ContactResult<ResponseEnvelope> {
        let contact = Contact::from_json(&body)?;
        let previous = self.store.update(&contact).await?;
        ResponseEnvelope::success(&previous)
    }
}

pub struct DeleteContact {
    store: Arc<dyn ContactStore>,
}

#[async_trait]
impl Route for DeleteContact {
    type Request = String;

    async fn handle(&self, name: String, _head: &mut ResponseHead) -> ContactResult<ResponseEnvelope> {
        self.store.delete(&name).await?;
        Ok(ResponseEnvelope::empty())
    }
}

pub struct SearchContacts {
    store: Arc<dyn ContactStore>,
}

#[async_trait]
impl Route for SearchContacts {
    type Request = HashMap<String, String>;

    async fn handle(
        &self,
        params: HashMap<String, String>,
        _head: &mut ResponseHead,
    ) -> ContactResult<ResponseEnvelope> {
        let page = parse_count(&params, "page", "page parameter")?;
        let page_size = parse_count(&params, "pageSize", "page size parameter")?;
        let query = params.get("query").map(String::as_str);

        let contacts = self.store.search(page, page_size, query).await?;
        ResponseEnvelope::success(&contacts)
    }
}

/// Read a required non-negative integer query parameter.
fn parse_count(
    params: &HashMap<String, String>,
    key: &'static str,
    description: &'static str,
) -> Result<u32, ValidationError> {
    let value = params.get(key).ok_or(ValidationError::Missing(description))?;
    let invalid = || ValidationError::InvalidParameter {
        name: key,
        value: value.clone(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse::<u32>().map_err(|_| invalid())
}

/// Every contact endpoint, sharing one store.
pub struct ContactEndpoints {
    pub add: Endpoint<AddContact>,
    pub get: Endpoint<GetContact>,
    pub update: Endpoint<UpdateContact>,
    pub delete: Endpoint<DeleteContact>,
    pub search: Endpoint<SearchContacts>,
}

impl ContactEndpoints {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self {
            add: Endpoint::new(AddContact {
                store: store.clone(),
            }),
            get: Endpoint::new(GetContact {
                store: store.clone(),
            }),
            update: Endpoint::new(UpdateContact {
                store: store.clone(),
            }),
            delete: Endpoint::new(DeleteContact {
                store: store.clone(),
            }),
            search: Endpoint::new(SearchContacts { store }),
        }
    }
}

type SharedEndpoints = State<Arc<ContactEndpoints>>;

fn malformed(text: String) -> ContactError {
    ValidationError::MalformedRequest(text).into()
}

pub async fn add_contact(
    State(endpoints): SharedEndpoints,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse {
    match body {
        Ok(body) => endpoints.add.respond(body).await,
        Err(rejection) => endpoints.add.reject(malformed(rejection.body_text())),
    }
}

pub async fn get_contact(
    State(endpoints): SharedEndpoints,
    name: Result<Path<String>, PathRejection>,
) -> ApiResponse {
    match name {
        Ok(Path(name)) => endpoints.get.respond(name).await,
        Err(rejection) => endpoints.get.reject(malformed(rejection.body_text())),
    }
}

pub async fn update_contact(
    State(endpoints): SharedEndpoints,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse {
    match body {
        Ok(body) => endpoints.update.respond(body).await,
        Err(rejection) => endpoints.update.reject(malformed(rejection.body_text())),
    }
}

pub async fn delete_contact(
    State(endpoints): SharedEndpoints,
    name: Result<Path<String>, PathRejection>,
) -> ApiResponse {
    match name {
        Ok(Path(name)) => endpoints.delete.respond(name).await,
        Err(rejection) => endpoints.delete.reject(malformed(rejection.body_text())),
    }
}

pub async fn search_contacts(
    State(endpoints): SharedEndpoints,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResponse {
    match params {
        Ok(Query(params)) => endpoints.search.respond(params).await,
        Err(rejection) => endpoints.search.reject(malformed(rejection.body_text())),
    }
}

/// Build the contact router over `store`.
pub fn router(store: Arc<dyn ContactStore>) -> Router {
    Router::new()
        .route(
            "/contact",
            post(add_contact).put(update_contact).get(search_contacts),
        )
        .route("/contact/:name", get(get_contact).delete(delete_contact))
        .with_state(Arc::new(ContactEndpoints::new(store)))
}
