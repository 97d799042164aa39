use std::sync::Arc;

use async_trait::async_trait;
use legacy_mediator_sdk::{DataGroup, MediatorError, RecordStorage, StorageReadResult};
use tracing::{debug, instrument};

use crate::config::MediatorConfig;
use crate::domain::convert::{ConvertContext, role_group};
use crate::domain::delimiter::Delimiter;
use crate::domain::error::{DomainError, parse_id};
use crate::domain::ports::{Row, SelectQuery, SqlExecutor};
use crate::domain::record_type::{RecordFamily, TypeBinding, TypeRegistry};
use crate::domain::roles::{GroupRow, Role, RoleResolver};
use crate::domain::tree_reader::{MultiRowTreeReader, OrganisationHierarchy};
use crate::domain::updater::OrganisationUpdater;

/// Single-row window used by keyed reads.
const SINGLE_ROW: Delimiter = Delimiter {
    limit: Some(1),
    offset: None,
};

/// Storage facade over the legacy relational database.
///
/// Organisation variants are read with their parents and predecessors
/// attached and can be updated. Users are read with their derived role
/// attached. Every call is independent; the mediator holds no per-call state.
pub struct LegacyMediator {
    executor: Arc<dyn SqlExecutor>,
    roles: Arc<dyn RoleResolver>,
    registry: TypeRegistry,
    reader: Arc<MultiRowTreeReader>,
    hierarchy: OrganisationHierarchy,
    updater: OrganisationUpdater,
    config: MediatorConfig,
}

impl LegacyMediator {
    #[must_use]
    pub fn new(
        executor: Arc<dyn SqlExecutor>,
        roles: Arc<dyn RoleResolver>,
        config: MediatorConfig,
    ) -> Self {
        let reader = Arc::new(MultiRowTreeReader::new(
            executor.clone(),
            config.relations.clone(),
        ));
        let max_depth = config.max_hierarchy_depth;
        let updater = OrganisationUpdater::new(
            executor.clone(),
            config.tables.clone(),
            OrganisationHierarchy::new(reader.clone(), max_depth),
        );

        Self {
            registry: TypeRegistry::from_config(&config),
            hierarchy: OrganisationHierarchy::new(reader.clone(), max_depth),
            executor,
            roles,
            reader,
            updater,
            config,
        }
    }

    /// Ids of every ancestor of an organisation, nearest level first.
    ///
    /// # Errors
    /// - `MediatorError::NotImplemented` for types outside the organisation family
    /// - `MediatorError::InvalidIdentifier` for a non-integer id
    /// - `MediatorError::Validation` when the hierarchy exceeds the configured depth
    /// - `MediatorError::Backend` when a query fails
    #[instrument(skip(self), fields(record.type = record_type, record.id = id))]
    pub async fn read_ancestors(
        &self,
        record_type: &str,
        id: &str,
    ) -> Result<Vec<String>, MediatorError> {
        self.registry.require_organisation("readAncestors", record_type)?;
        let organisation_id = parse_id(id)?;
        let ancestors = self.hierarchy.ancestors(organisation_id).await?;
        Ok(ancestors.iter().map(ToString::to_string).collect())
    }

    async fn read_record(&self, record_type: &str, id: &str) -> Result<DataGroup, DomainError> {
        let (binding, row) = self.fetch_row(record_type, id).await?;
        self.assemble(binding, &row).await
    }

    /// Keyed single-row fetch from the type's view, without children.
    async fn fetch_row(
        &self,
        record_type: &str,
        id: &str,
    ) -> Result<(&TypeBinding, Row), DomainError> {
        let binding = self.registry.require("read", record_type)?;
        let db_id = parse_id(id)?;

        let query = SelectQuery::new(binding.view.as_str())
            .filter(binding.id_column, db_id)
            .delimited(SINGLE_ROW);
        let row = self
            .fetch(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found(record_type, id))?;
        Ok((binding, row))
    }

    async fn list(
        &self,
        operation: &'static str,
        record_type: &str,
        filter: &DataGroup,
    ) -> Result<StorageReadResult, DomainError> {
        let binding = self.registry.require(operation, record_type)?;

        let query = SelectQuery::new(binding.view.as_str()).order_by(binding.id_column);
        let query = match binding.family {
            RecordFamily::Organisation => query.delimited(Delimiter::from_filter(filter)?),
            RecordFamily::User => query,
        };
        let rows = self.fetch(&query).await?;
        debug!(rows = rows.len(), "converting listed rows");

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(self.assemble(binding, row).await?);
        }
        Ok(StorageReadResult::new(records))
    }

    async fn count_view(
        &self,
        operation: &'static str,
        record_type: &str,
        filter: &DataGroup,
    ) -> Result<u64, DomainError> {
        let binding = self.registry.require_organisation(operation, record_type)?;
        let query =
            SelectQuery::new(binding.view.as_str()).delimited(Delimiter::from_filter(filter)?);
        self.executor
            .count_rows(&query)
            .await
            .map_err(DomainError::backend)
    }

    /// Convert one row and attach the children its family carries.
    async fn assemble(&self, binding: &TypeBinding, row: &Row) -> Result<DataGroup, DomainError> {
        let ctx = ConvertContext {
            record_type: binding.record_type,
            data_divider: &self.config.data_divider,
        };
        let mut record = (binding.converter)(row, &ctx)?;
        let db_id = row.int(binding.id_column).ok_or_else(|| {
            DomainError::validation(format!("row has no integer {}", binding.id_column))
        })?;

        match binding.family {
            RecordFamily::Organisation => self.reader.attach_relations(&mut record, db_id).await?,
            RecordFamily::User => {
                if let Some(role) = self.user_role(db_id).await? {
                    record.add_child(role_group(&role));
                }
            }
        }
        Ok(record)
    }

    async fn user_role(&self, db_id: i64) -> Result<Option<Role>, DomainError> {
        let query = SelectQuery::new(self.config.users.groups.as_str()).filter("db_id", db_id);
        let rows = self.fetch(&query).await?;
        let groups: Vec<GroupRow> = rows.iter().map(GroupRow::from).collect();
        Ok(self.roles.resolve(&groups))
    }

    async fn fetch(&self, query: &SelectQuery) -> Result<Vec<Row>, DomainError> {
        self.executor
            .read_rows(query)
            .await
            .map_err(DomainError::backend)
    }
}

#[async_trait]
impl RecordStorage for LegacyMediator {
    #[instrument(skip(self), fields(record.type = record_type, record.id = id))]
    async fn read(&self, record_type: &str, id: &str) -> Result<DataGroup, MediatorError> {
        Ok(self.read_record(record_type, id).await?)
    }

    async fn create(
        &self,
        record_type: &str,
        _id: &str,
        _record: DataGroup,
        _data_divider: &str,
    ) -> Result<(), MediatorError> {
        Err(DomainError::not_implemented("create", record_type).into())
    }

    async fn delete(&self, record_type: &str, _id: &str) -> Result<(), MediatorError> {
        Err(DomainError::not_implemented("delete", record_type).into())
    }

    async fn links_exist(&self, record_type: &str, _id: &str) -> Result<bool, MediatorError> {
        Err(DomainError::not_implemented("linksExist", record_type).into())
    }

    #[instrument(skip(self, record), fields(record.type = record_type, record.id = id))]
    async fn update(
        &self,
        record_type: &str,
        id: &str,
        record: DataGroup,
    ) -> Result<(), MediatorError> {
        self.registry.require_organisation("update", record_type)?;
        let organisation_id = parse_id(id)?;
        self.updater.update(organisation_id, &record).await?;
        Ok(())
    }

    #[instrument(skip(self, filter), fields(record.type = record_type))]
    async fn read_list(
        &self,
        record_type: &str,
        filter: &DataGroup,
    ) -> Result<StorageReadResult, MediatorError> {
        Ok(self.list("readList", record_type, filter).await?)
    }

    #[instrument(skip(self, filter), fields(record.type = record_type))]
    async fn read_abstract_list(
        &self,
        record_type: &str,
        filter: &DataGroup,
    ) -> Result<StorageReadResult, MediatorError> {
        Ok(self.list("readAbstractList", record_type, filter).await?)
    }

    async fn read_link_list(
        &self,
        record_type: &str,
        _id: &str,
    ) -> Result<Vec<DataGroup>, MediatorError> {
        Err(DomainError::not_implemented("readLinkList", record_type).into())
    }

    async fn generate_link_collection(
        &self,
        record_type: &str,
        _id: &str,
    ) -> Result<Vec<DataGroup>, MediatorError> {
        Err(DomainError::not_implemented("generateLinkCollection", record_type).into())
    }

    #[instrument(skip(self, filter), fields(record.type = record_type))]
    async fn count(&self, record_type: &str, filter: &DataGroup) -> Result<u64, MediatorError> {
        Ok(self.count_view("count", record_type, filter).await?)
    }

    #[instrument(skip(self, filter), fields(record.type = record_type))]
    async fn count_abstract(
        &self,
        record_type: &str,
        implementing_types: &[String],
        filter: &DataGroup,
    ) -> Result<u64, MediatorError> {
        debug!(?implementing_types, "counting over the abstract view");
        Ok(self.count_view("countAbstract", record_type, filter).await?)
    }

    #[instrument(skip(self), fields(record.type = record_type, record.id = id))]
    async fn exists(&self, record_type: &str, id: &str) -> bool {
        match self.fetch_row(record_type, id).await {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "existence probe failed");
                false
            }
        }
    }
}
