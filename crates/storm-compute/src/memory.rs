//! In-memory Storm account simulation.
//!
//! [`MemoryStore`] holds per-account server and image state. Accounts are
//! keyed explicitly and registered when a [`MemoryDispatcher`] is created
//! for them; nothing is materialized on read. The dispatcher answers the
//! server and image operations and feeds its replies through the same
//! interpreter as the live client, so failures come back as
//! `full_error` application errors exactly as the API reports them.

use crate::models::{Image, Page, Server, DEFAULT_PAGE_SIZE};
use crate::operations::Operation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use storm_core::params::PARAMS_KEY;
use storm_core::response::interpret;
use storm_core::{ApiRequest, ApiResponse, Dispatcher, Error, Result, UniqId};
use tracing::debug;

/// Error class reported for unknown ids.
pub const RECORD_NOT_FOUND: &str = "LW::Exception::RecordNotFound";
/// Error class reported for missing parameters.
pub const INPUT_REQUIRED: &str = "LW::Exception::Input::Required";

const RUNNING: &str = "Running";
const STOPPED: &str = "Stopped";

/// Successful body or `full_error` envelope.
type Reply = std::result::Result<Value, Value>;

/// Last modification time of each record, per collection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LastModified {
    /// Servers by `uniq_id`.
    pub servers: BTreeMap<String, DateTime<Utc>>,
    /// Images by id.
    pub images: BTreeMap<u64, DateTime<Utc>>,
}

/// State of one simulated account.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AccountData {
    /// Servers by `uniq_id`.
    pub servers: BTreeMap<String, Server>,
    /// Power status of each server.
    pub server_status: BTreeMap<String, String>,
    /// Images by id.
    pub images: BTreeMap<u64, Image>,
    /// Modification timestamps.
    pub last_modified: LastModified,
    next_image_id: u64,
    next_ip: u32,
}

/// Shared per-account store. Clones share the same state.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    accounts: Arc<RwLock<HashMap<String, AccountData>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `account` with empty state if it is not known yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn register(&self, account: &str) -> Result<()> {
        self.write()?.entry(account.to_string()).or_default();
        Ok(())
    }

    /// Drop every account.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn reset(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }

    /// Drop the named accounts, leaving the rest untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn reset_accounts<I, S>(&self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut accounts = self.write()?;
        for id in ids {
            accounts.remove(id.as_ref());
        }
        Ok(())
    }

    /// Registered account ids, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn account_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.read()?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Snapshot of one account's state, `None` if it is not registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn account(&self, account: &str) -> Result<Option<AccountData>> {
        Ok(self.read()?.get(account).cloned())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, AccountData>>> {
        self.accounts.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, AccountData>>> {
        self.accounts.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> Error {
    Error::Transport("memory store lock poisoned".to_string())
}

/// [`Dispatcher`] answering from a [`MemoryStore`] on behalf of one account.
#[derive(Debug, Clone)]
pub struct MemoryDispatcher {
    store: MemoryStore,
    account: String,
}

impl MemoryDispatcher {
    /// Create a dispatcher for `account`, registering it in `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn new(store: &MemoryStore, account: impl Into<String>) -> Result<Self> {
        let account = account.into();
        store.register(&account)?;
        Ok(Self {
            store: store.clone(),
            account,
        })
    }

    /// Account this dispatcher acts for.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Clear this account's state. Other accounts are untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn reset_data(&self) -> Result<()> {
        let mut accounts = self.store.write()?;
        accounts.insert(self.account.clone(), AccountData::default());
        Ok(())
    }

    fn apply(&self, operation: Operation, params: &Map<String, Value>) -> Result<Reply> {
        let mut accounts = self.store.write()?;
        let data = accounts.get_mut(&self.account).ok_or_else(|| {
            Error::NotFound(format!("account `{}` is not registered", self.account))
        })?;
        let now = Utc::now();

        let reply = match operation {
            Operation::ListServers => Ok(paginate(data.servers.values().cloned(), params)),
            Operation::GetServer => data.server(params).map(to_value),
            Operation::CreateServer => Ok(to_value(data.create_server(params, now))),
            Operation::CloneServer => data.clone_server(params, now).map(to_value),
            Operation::UpdateServer => data.update_server(params, now).map(to_value),
            Operation::ResizeServer => data.resize_server(params, now).map(to_value),
            Operation::DeleteServer => data.delete_server(params),
            Operation::ServerStatus => data.server_status(params),
            Operation::StartServer => data.set_status(params, RUNNING, "started", now),
            Operation::ShutdownServer => data.set_status(params, STOPPED, "shutdown", now),
            Operation::RebootServer => data.set_status(params, RUNNING, "rebooted", now),
            Operation::ListImages => Ok(paginate(data.images.values().cloned(), params)),
            Operation::GetImageDetails => data.image(params).map(to_value),
            Operation::CreateImage => data.create_image(params, now),
            Operation::UpdateImage => data.update_image(params, now).map(to_value),
            Operation::DeleteImage => data.delete_image(params),
            Operation::RestoreImage => data.restore_image(params, now),
            other => {
                return Err(Error::NotImplemented(format!(
                    "{other} is not simulated in memory"
                )))
            }
        };

        Ok(reply)
    }
}

#[async_trait]
impl Dispatcher for MemoryDispatcher {
    async fn issue(&self, request: ApiRequest) -> Result<ApiResponse> {
        let operation = Operation::from_path(&request.path).ok_or_else(|| {
            Error::NotImplemented(format!("{} is not simulated in memory", request.path))
        })?;

        let params = request
            .body
            .as_ref()
            .and_then(|body| body.get(PARAMS_KEY))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let reply = match operation
            .required_params()
            .iter()
            .find(|key| params.get(**key).map_or(true, Value::is_null))
        {
            Some(key) => Err(input_required(key)),
            None => self.apply(operation, &params)?,
        };

        debug!(
            account = %self.account,
            operation = operation.name(),
            ok = reply.is_ok(),
            "Answered Storm operation from memory"
        );

        let body = serde_json::to_vec(&reply.unwrap_or_else(|fault| fault))?;
        interpret(&request.path, StatusCode::OK, HeaderMap::new(), &body)
    }
}

impl AccountData {
    fn server(&self, params: &Map<String, Value>) -> std::result::Result<Server, Value> {
        let uniq_id = str_param(params, "uniq_id").unwrap_or_default();
        self.servers
            .get(uniq_id)
            .cloned()
            .ok_or_else(|| record_not_found("LW::Server", "uniq_id", uniq_id))
    }

    fn server_mut(&mut self, params: &Map<String, Value>) -> std::result::Result<&mut Server, Value> {
        let uniq_id = str_param(params, "uniq_id").unwrap_or_default();
        self.servers
            .get_mut(uniq_id)
            .ok_or_else(|| record_not_found("LW::Server", "uniq_id", uniq_id))
    }

    fn image(&self, params: &Map<String, Value>) -> std::result::Result<Image, Value> {
        let id = image_id(params)?;
        self.images
            .get(&id)
            .cloned()
            .ok_or_else(|| record_not_found("Storm::Image", "id", &id.to_string()))
    }

    fn fresh_uniq_id(&self) -> String {
        loop {
            let candidate = UniqId::generate();
            if !self.servers.contains_key(candidate.as_str()) {
                return candidate.as_str().to_string();
            }
        }
    }

    fn fresh_ip(&mut self) -> String {
        self.next_ip += 1;
        format!("10.0.{}.{}", self.next_ip / 250, self.next_ip % 250 + 1)
    }

    fn insert_server(&mut self, server: Server, now: DateTime<Utc>) -> Server {
        let uniq_id = server.uniq_id.clone();
        self.server_status.insert(uniq_id.clone(), RUNNING.to_string());
        self.last_modified.servers.insert(uniq_id.clone(), now);
        self.servers.insert(uniq_id, server.clone());
        server
    }

    fn create_server(&mut self, params: &Map<String, Value>, now: DateTime<Utc>) -> Server {
        let server = Server {
            uniq_id: self.fresh_uniq_id(),
            domain: str_param(params, "domain").unwrap_or_default().to_string(),
            ip: Some(self.fresh_ip()),
            ip_count: Some(u64_param(params, "ip_count").unwrap_or(1)),
            config_id: u64_param(params, "config_id"),
            config_description: None,
            template: str_param(params, "template").map(str::to_string),
            template_description: None,
            image_id: u64_param(params, "image_id"),
            active: Some(1),
            backup_enabled: Some(flag_param(params, "backup_enabled").unwrap_or(0)),
            create_date: Some(timestamp(now)),
            zone: params.get("zone").cloned(),
        };
        self.insert_server(server, now)
    }

    fn clone_server(
        &mut self,
        params: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> std::result::Result<Server, Value> {
        let source = self.server(params)?;
        let clone = Server {
            uniq_id: self.fresh_uniq_id(),
            domain: str_param(params, "domain").unwrap_or_default().to_string(),
            ip: Some(self.fresh_ip()),
            config_id: u64_param(params, "config_id").or(source.config_id),
            create_date: Some(timestamp(now)),
            ..source
        };
        Ok(self.insert_server(clone, now))
    }

    fn update_server(
        &mut self,
        params: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> std::result::Result<Server, Value> {
        let server = self.server_mut(params)?;
        if let Some(domain) = str_param(params, "domain") {
            server.domain = domain.to_string();
        }
        if let Some(flag) = flag_param(params, "backup_enabled") {
            server.backup_enabled = Some(flag);
        }
        let server = server.clone();
        self.last_modified.servers.insert(server.uniq_id.clone(), now);
        Ok(server)
    }

    fn resize_server(
        &mut self,
        params: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> std::result::Result<Server, Value> {
        let config_id = u64_param(params, "config_id");
        let server = self.server_mut(params)?;
        server.config_id = config_id;
        let server = server.clone();
        self.last_modified.servers.insert(server.uniq_id.clone(), now);
        Ok(server)
    }

    fn delete_server(&mut self, params: &Map<String, Value>) -> Reply {
        let uniq_id = self.server(params)?.uniq_id;
        self.servers.remove(&uniq_id);
        self.server_status.remove(&uniq_id);
        self.last_modified.servers.remove(&uniq_id);
        Ok(json!({ "destroyed": uniq_id }))
    }

    fn server_status(&self, params: &Map<String, Value>) -> Reply {
        let uniq_id = self.server(params)?.uniq_id;
        let status = self
            .server_status
            .get(&uniq_id)
            .map_or(RUNNING, String::as_str);
        Ok(json!({ "status": status }))
    }

    fn set_status(
        &mut self,
        params: &Map<String, Value>,
        status: &str,
        verb: &str,
        now: DateTime<Utc>,
    ) -> Reply {
        let uniq_id = self.server(params)?.uniq_id;
        self.server_status.insert(uniq_id.clone(), status.to_string());
        self.last_modified.servers.insert(uniq_id.clone(), now);
        let mut body = Map::new();
        body.insert(verb.to_string(), Value::String(uniq_id));
        Ok(Value::Object(body))
    }

    fn create_image(&mut self, params: &Map<String, Value>, now: DateTime<Utc>) -> Reply {
        let source = self.server(params)?;
        let name = str_param(params, "name").unwrap_or_default().to_string();

        self.next_image_id += 1;
        let id = self.next_image_id;
        let image = Image {
            id,
            name: name.clone(),
            source_hostname: Some(source.domain),
            source_uniq_id: Some(source.uniq_id),
            template: source.template,
            template_description: source.template_description,
            time_taken: Some(timestamp(now)),
            size: None,
        };
        self.images.insert(id, image);
        self.last_modified.images.insert(id, now);
        Ok(json!({ "created": name }))
    }

    fn update_image(
        &mut self,
        params: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> std::result::Result<Image, Value> {
        let mut image = self.image(params)?;
        if let Some(name) = str_param(params, "name") {
            image.name = name.to_string();
        }
        self.images.insert(image.id, image.clone());
        self.last_modified.images.insert(image.id, now);
        Ok(image)
    }

    fn delete_image(&mut self, params: &Map<String, Value>) -> Reply {
        let id = self.image(params)?.id;
        self.images.remove(&id);
        self.last_modified.images.remove(&id);
        Ok(json!({ "deleted": id }))
    }

    fn restore_image(&mut self, params: &Map<String, Value>, now: DateTime<Utc>) -> Reply {
        let id = self.image(params)?.id;
        let server = self.server_mut(params)?;
        server.image_id = Some(id);
        let uniq_id = server.uniq_id.clone();
        self.last_modified.servers.insert(uniq_id.clone(), now);
        Ok(json!({ "reimaged": uniq_id }))
    }
}

fn paginate<T, I>(items: I, params: &Map<String, Value>) -> Value
where
    T: Serialize,
    I: Iterator<Item = T>,
{
    let page = Page::paginate(
        items.collect(),
        u64_param(params, "page_num").unwrap_or(1),
        u64_param(params, "page_size").unwrap_or(DEFAULT_PAGE_SIZE),
    );
    to_value(page)
}

fn to_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn image_id(params: &Map<String, Value>) -> std::result::Result<u64, Value> {
    u64_param(params, "id").ok_or_else(|| {
        let raw = params.get("id").map(Value::to_string).unwrap_or_default();
        record_not_found("Storm::Image", "id", &raw)
    })
}

fn str_param<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Value::as_str)
}

fn u64_param(params: &Map<String, Value>, key: &str) -> Option<u64> {
    match params.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn flag_param(params: &Map<String, Value>, key: &str) -> Option<i64> {
    match params.get(key)? {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn record_not_found(record: &str, field: &str, value: &str) -> Value {
    json!({
        "error_class": RECORD_NOT_FOUND,
        "field": field,
        "full_error": format!("Record '{record}' not found: {field}={value}"),
    })
}

fn input_required(field: &str) -> Value {
    json!({
        "error_class": INPUT_REQUIRED,
        "field": field,
        "full_error": format!("Required parameter '{field}' missing"),
    })
}
