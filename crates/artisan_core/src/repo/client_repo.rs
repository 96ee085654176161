//! Client store contract and SQLite implementation.
//!
//! # Responsibility
//! - Answer "find one client whose `users_permissions_user` equals V".
//! - Provide the administrative insert path used by the reseller form.
//!
//! # Invariants
//! - Lookups are read-only and issue exactly one query.
//! - When several clients reference one user, the lowest `id` wins.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::client::{Client, ClientId, NewClient, RESERVED_FIELDS};
use crate::model::user::UserId;
use crate::model::ModelValidationError;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    users_permissions_user,
    users_permissions_user_kind,
    attributes
FROM clients";

const REQUIRED_CLIENT_COLUMNS: &[&str] = &[
    "id",
    "users_permissions_user",
    "attributes",
    "users_permissions_user_kind",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for client persistence and lookup.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    InvalidData(String),
    /// Connection was not opened through `open_db*` (or is out of date).
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "client lookup failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted client data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Read capability the client resolver depends on.
pub trait ClientStore {
    /// Returns the client linked to `user_id`, or `None` when no client is linked.
    fn find_one_by_user(&self, user_id: &UserId) -> RepoResult<Option<Client>>;
}

impl<S: ClientStore + ?Sized> ClientStore for &S {
    fn find_one_by_user(&self, user_id: &UserId) -> RepoResult<Option<Client>> {
        (**self).find_one_by_user(user_id)
    }
}

/// SQLite-backed client store.
pub struct SqliteClientStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on a damaged schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Inserts a new client and returns the stored record.
    pub fn create_client(&self, client: &NewClient) -> RepoResult<Client> {
        client.validate()?;

        let attributes = Value::Object(client.attributes.clone()).to_string();
        self.conn.execute(
            "INSERT INTO clients (
                users_permissions_user,
                users_permissions_user_kind,
                attributes
            ) VALUES (?1, ?2, ?3);",
            params![
                client.users_permissions_user.as_ref().map(UserId::to_db_text),
                client.users_permissions_user.as_ref().map(UserId::db_kind),
                attributes,
            ],
        )?;

        Ok(Client {
            id: self.conn.last_insert_rowid(),
            users_permissions_user: client.users_permissions_user.clone(),
            attributes: client.attributes.clone(),
        })
    }

    /// Gets one client by id.
    pub fn get_client(&self, id: ClientId) -> RepoResult<Option<Client>> {
        let row = self
            .conn
            .query_row(
                &format!("{CLIENT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_raw_client,
            )
            .optional()?;

        row.map(RawClient::into_client).transpose()
    }
}

impl ClientStore for SqliteClientStore<'_> {
    fn find_one_by_user(&self, user_id: &UserId) -> RepoResult<Option<Client>> {
        // LIMIT 2 is enough to tell "exactly one" from "more than one".
        let mut stmt = self.conn.prepare_cached(&format!(
            "{CLIENT_SELECT_SQL}
             WHERE users_permissions_user = ?1
             ORDER BY id ASC
             LIMIT 2;"
        ))?;

        let mut rows = stmt.query([user_id.to_db_text()])?;
        let Some(first) = rows.next()? else {
            return Ok(None);
        };
        let client = read_raw_client(first)?;

        if let Some(extra) = rows.next()? {
            let extra_id: ClientId = extra.get("id")?;
            warn!(
                "event=client_integrity_anomaly module=repo status=first_match user_id={} kept_client_id={} extra_client_id={}",
                user_id, client.id, extra_id
            );
        }

        client.into_client().map(Some)
    }
}

struct RawClient {
    id: ClientId,
    users_permissions_user: Option<String>,
    users_permissions_user_kind: Option<String>,
    attributes: String,
}

impl RawClient {
    fn into_client(self) -> RepoResult<Client> {
        let attributes = match serde_json::from_str::<Value>(&self.attributes) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(RepoError::InvalidData(format!(
                    "clients.attributes for id {} is not an object (found {})",
                    self.id,
                    json_kind(&other)
                )));
            }
            Err(err) => {
                return Err(RepoError::InvalidData(format!(
                    "clients.attributes for id {} is not valid JSON: {err}",
                    self.id
                )));
            }
        };

        let users_permissions_user = match self.users_permissions_user {
            Some(text) if text.is_empty() => {
                return Err(RepoError::InvalidData(format!(
                    "empty clients.users_permissions_user for id {}",
                    self.id
                )));
            }
            Some(text) => {
                let kind = self.users_permissions_user_kind;
                let user = UserId::from_db_parts(text, kind.as_deref()).ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid clients.users_permissions_user_kind `{}` for id {}",
                        kind.as_deref().unwrap_or_default(),
                        self.id
                    ))
                })?;
                Some(user)
            }
            None => None,
        };

        Ok(Client {
            id: self.id,
            users_permissions_user,
            attributes: without_reserved(attributes),
        })
    }
}

fn read_raw_client(row: &Row<'_>) -> rusqlite::Result<RawClient> {
    Ok(RawClient {
        id: row.get("id")?,
        users_permissions_user: row.get("users_permissions_user")?,
        users_permissions_user_kind: row.get("users_permissions_user_kind")?,
        attributes: row.get("attributes")?,
    })
}

fn without_reserved(mut attributes: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED_FIELDS {
        attributes.remove(*key);
    }
    attributes
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'clients'
        );",
        [],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable("clients"));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('clients');")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(missing) = REQUIRED_CLIENT_COLUMNS
        .iter()
        .find(|column| !columns.iter().any(|name| name.as_str() == **column))
    {
        return Err(RepoError::MissingRequiredColumn {
            table: "clients",
            column: *missing,
        });
    }

    Ok(())
}
