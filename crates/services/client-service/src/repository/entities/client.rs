//! Client database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Client, ClientParts, Cnpj, DomainResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub trade_name: String,
    /// Normalized 14-digit CNPJ
    #[sea_orm(unique)]
    pub cnpj: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert database model to domain entity, re-validating stored values
    pub fn into_domain(self) -> DomainResult<Client> {
        Client::rehydrate(ClientParts {
            id: self.id,
            trade_name: self.trade_name,
            cnpj: Cnpj::parse(&self.cnpj)?,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
