//! Client repository implementation backed by SeaORM.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};

use super::entities::client::{self, ActiveModel, Entity as ClientEntity, Model};
use common::{AppError, AppResult};
use domain::{Client, Cnpj};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Client repository trait for dependency injection.
///
/// Implemented by the relational store and by the caching decorator that
/// wraps it, so callers never know which one they hold.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Find client by store-assigned ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Client>>;

    /// Find client by CNPJ
    async fn find_by_cnpj(&self, cnpj: &Cnpj) -> AppResult<Option<Client>>;

    /// Persist a new client and return it with its assigned ID
    async fn add(&self, client: Client) -> AppResult<Client>;

    /// List all clients ordered by ID
    async fn list(&self) -> AppResult<Vec<Client>>;
}

/// Concrete implementation of ClientRepository
pub struct ClientStore {
    db: DatabaseConnection,
}

impl ClientStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClientRepository for ClientStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Client>> {
        let result = ClientEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(to_domain).transpose()
    }

    async fn find_by_cnpj(&self, cnpj: &Cnpj) -> AppResult<Option<Client>> {
        let result = ClientEntity::find()
            .filter(client::Column::Cnpj.eq(cnpj.as_str()))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(to_domain).transpose()
    }

    async fn add(&self, client: Client) -> AppResult<Client> {
        let active_model = ActiveModel {
            id: NotSet,
            trade_name: Set(client.trade_name().to_string()),
            cnpj: Set(client.cnpj().as_str().to_string()),
            active: Set(client.is_active()),
            created_at: Set(client.created_at()),
            updated_at: Set(client.updated_at()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| insert_error(e, client.cnpj()))?;

        tracing::debug!(client_id = model.id, "Client row inserted");
        to_domain(model)
    }

    async fn list(&self) -> AppResult<Vec<Client>> {
        let models = ClientEntity::find()
            .order_by_asc(client::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(to_domain).collect()
    }
}

fn to_domain(model: Model) -> AppResult<Client> {
    let id = model.id;
    model.into_domain().map_err(|e| {
        tracing::error!(client_id = id, error = %e, "Stored client row failed validation");
        AppError::internal(format!("Invalid client row {}: {}", id, e))
    })
}

fn insert_error(err: DbErr, cnpj: &Cnpj) -> AppError {
    let sql_err = err.sql_err();
    classify_insert_error(sql_err, err, cnpj)
}

/// A concurrent insert that slipped past the pre-check hits the unique index.
fn classify_insert_error(sql_err: Option<SqlErr>, err: DbErr, cnpj: &Cnpj) -> AppError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(cnpj = %cnpj, detail = %detail, "Unique CNPJ index rejected insert");
            AppError::conflict(format!("Client with CNPJ {}", cnpj))
        }
        _ => AppError::from(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn model(id: i64, cnpj: &str) -> Model {
        Model {
            id,
            trade_name: "Empresa Teste LTDA".to_string(),
            cnpj: cnpj.to_string(),
            active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_model_into_domain() {
        let client = model(7, "01775634000189").into_domain().unwrap();

        assert_eq!(client.id(), 7);
        assert_eq!(client.cnpj().formatted(), "01.775.634/0001-89");
        assert_eq!(client.updated_at(), None);
    }

    #[test]
    fn test_corrupt_row_is_internal_error() {
        let result = to_domain(model(7, "12345678901234"));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_find_by_id_maps_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(7, "01775634000189")]])
            .into_connection();
        let store = ClientStore::new(db);

        let client = store.find_by_id(7).await.unwrap().unwrap();
        assert_eq!(client.id(), 7);
        assert_eq!(client.trade_name(), "Empresa Teste LTDA");
    }

    #[tokio::test]
    async fn test_find_by_cnpj_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();
        let store = ClientStore::new(db);

        let cnpj = Cnpj::parse("01775634000189").unwrap();
        assert!(store.find_by_cnpj(&cnpj).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_maps_all_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                model(1, "01775634000189"),
                model(2, "90942116000132"),
            ]])
            .into_connection();
        let store = ClientStore::new(db);

        let clients = store.list().await.unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[1].cnpj().as_str(), "90942116000132");
    }

    #[tokio::test]
    async fn test_add_returns_assigned_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(15, "01775634000189")]])
            .into_connection();
        let store = ClientStore::new(db);

        let cnpj = Cnpj::parse("01775634000189").unwrap();
        let client = Client::new("Empresa Teste LTDA", cnpj).unwrap();

        let created = store.add(client).await.unwrap();
        assert_eq!(created.id(), 15);
        assert!(created.is_persisted());
    }

    #[test]
    fn test_unique_violation_becomes_conflict() {
        let cnpj = Cnpj::parse("01775634000189").unwrap();
        let err = classify_insert_error(
            Some(SqlErr::UniqueConstraintViolation(
                "idx_clients_cnpj".to_string(),
            )),
            DbErr::Custom("duplicate key".to_string()),
            &cnpj,
        );

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(
            err.user_message(),
            "Client with CNPJ 01.775.634/0001-89 already exists"
        );
    }

    #[test]
    fn test_other_insert_failures_stay_database_errors() {
        let cnpj = Cnpj::parse("01775634000189").unwrap();

        let reset = DbErr::Custom("connection reset".to_string());
        let err = classify_insert_error(None, reset, &cnpj);
        assert!(matches!(err, AppError::Database(_)));

        let err = classify_insert_error(
            Some(SqlErr::ForeignKeyConstraintViolation("fk".to_string())),
            DbErr::Custom("fk".to_string()),
            &cnpj,
        );
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_add_propagates_database_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let store = ClientStore::new(db);

        let cnpj = Cnpj::parse("01775634000189").unwrap();
        let client = Client::new("Empresa Teste LTDA", cnpj).unwrap();

        assert!(matches!(store.add(client).await, Err(AppError::Database(_))));
    }
}
