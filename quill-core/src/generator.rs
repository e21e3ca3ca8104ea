use crate::{
    ClassMap, Configuration, Dialect, EntityType, Parameters, Predicate, PropertyMap, QueryError,
    Result, SelectParts, Sort, StatementKind, Value, separated_by, try_separated_by,
};
use std::sync::Arc;

/// Assembles the statements of every operation from class maps, predicates and the dialect.
///
/// Statements that only depend on the class map (select, update and delete by key, insert,
/// identity retrieval) are cached by the configuration. Anything carrying a predicate is built
/// on every call.
#[derive(Debug, Clone)]
pub struct SqlGenerator {
    config: Arc<Configuration>,
}

impl SqlGenerator {
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }

    pub fn configuration(&self) -> &Arc<Configuration> {
        &self.config
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.config.dialect()
    }

    pub fn map(&self, entity: EntityType) -> Result<Arc<ClassMap>> {
        self.config.get_map(entity)
    }

    pub fn supports_multiple_statements(&self) -> bool {
        self.dialect().supports_multiple_statements()
    }

    fn mapped_property<'m>(&self, map: &'m ClassMap, property: &str) -> Result<&'m PropertyMap> {
        let result = map.property(property)?;
        if result.ignored {
            return Err(QueryError::IgnoredProperty {
                entity: map.entity_name.to_string(),
                property: property.to_string(),
            }
            .into());
        }
        Ok(result)
    }

    /// Write the table qualified column of `property`, failing if it is unknown or ignored.
    pub fn write_column_for(&self, out: &mut String, entity: EntityType, property: &str) -> Result<()> {
        let map = self.map(entity)?;
        let property = self.mapped_property(&map, property)?;
        self.dialect()
            .write_column_name(out, Some(&map), property, false);
        Ok(())
    }

    pub fn write_parameter(&self, out: &mut String, parameters: &mut Parameters, base: &str, value: Value) {
        self.dialect().write_parameter(out, parameters, base, value);
    }

    pub fn table_name(&self, entity: EntityType) -> Result<String> {
        let map = self.map(entity)?;
        let mut out = String::new();
        self.dialect().write_table_name(&mut out, &map);
        Ok(out)
    }

    pub fn column_name(&self, entity: EntityType, property: &str, alias: bool) -> Result<String> {
        let map = self.map(entity)?;
        let property = self.mapped_property(&map, property)?;
        let mut out = String::new();
        self.dialect()
            .write_column_name(&mut out, Some(&map), property, alias);
        Ok(out)
    }

    /// Selected columns, aliased to the property names where they differ.
    pub fn columns(&self, entity: EntityType) -> Result<Arc<str>> {
        let map = self.map(entity)?;
        self.config
            .cached_statement(entity, StatementKind::Columns, || {
                let mut out = String::with_capacity(128);
                separated_by(
                    &mut out,
                    map.columns(),
                    |out, p| self.dialect().write_column_name(out, Some(&map), p, true),
                    ", ",
                );
                Ok(out)
            })
    }

    fn condition(
        &self,
        predicate: Option<&Predicate>,
        parameters: &mut Parameters,
    ) -> Result<Option<String>> {
        predicate
            .map(|p| p.to_sql(self, parameters))
            .transpose()
    }

    fn order_by(&self, sort: &[Sort]) -> Result<String> {
        let mut out = String::new();
        try_separated_by(
            &mut out,
            sort,
            |out, s| {
                self.write_column_for(out, s.entity, &s.property)?;
                out.push_str(if s.ascending { " ASC" } else { " DESC" });
                Ok::<_, crate::Error>(())
            },
            ", ",
        )?;
        Ok(out)
    }

    /// `SELECT columns FROM table [WHERE predicate] [ORDER BY sort]`
    pub fn select(
        &self,
        entity: EntityType,
        predicate: Option<&Predicate>,
        sort: &[Sort],
        parameters: &mut Parameters,
    ) -> Result<String> {
        let map = self.map(entity)?;
        let columns = self.columns(entity)?;
        let condition = self.condition(predicate, parameters)?;
        let order_by = self.order_by(sort)?;
        let mut out = String::with_capacity(256);
        self.dialect().write_select(
            &mut out,
            &SelectParts {
                map: &map,
                columns: &columns,
                condition: condition.as_deref(),
                order_by: &order_by,
            },
        );
        Ok(out)
    }

    fn windowed_parts(
        &self,
        entity: EntityType,
        predicate: Option<&Predicate>,
        sort: &[Sort],
        parameters: &mut Parameters,
    ) -> Result<(Arc<ClassMap>, Arc<str>, Option<String>, String)> {
        let map = self.map(entity)?;
        if sort.is_empty() {
            log::warn!("Refused to page `{}` without a sort", map.entity_name);
            return Err(QueryError::MissingSort(map.entity_name.to_string()).into());
        }
        let columns = self.columns(entity)?;
        let condition = self.condition(predicate, parameters)?;
        let order_by = self.order_by(sort)?;
        Ok((map, columns, condition, order_by))
    }

    /// Select the 1-based `page` of `results_per_page` rows, a sort is required.
    pub fn select_paged(
        &self,
        entity: EntityType,
        predicate: Option<&Predicate>,
        sort: &[Sort],
        page: u64,
        results_per_page: u64,
        parameters: &mut Parameters,
    ) -> Result<String> {
        if page == 0 || results_per_page == 0 {
            return Err(QueryError::InvalidPaging(format!(
                "page must be at least 1 and results per page positive, got page {page} of {results_per_page}"
            ))
            .into());
        }
        let (map, columns, condition, order_by) =
            self.windowed_parts(entity, predicate, sort, parameters)?;
        let mut out = String::with_capacity(256);
        self.dialect().write_paged_select(
            &mut out,
            &SelectParts {
                map: &map,
                columns: &columns,
                condition: condition.as_deref(),
                order_by: &order_by,
            },
            page,
            results_per_page,
            parameters,
        )?;
        Ok(out)
    }

    /// Select at most `max_results` rows after skipping `first_result` rows, a sort is required.
    pub fn select_set(
        &self,
        entity: EntityType,
        predicate: Option<&Predicate>,
        sort: &[Sort],
        first_result: u64,
        max_results: u64,
        parameters: &mut Parameters,
    ) -> Result<String> {
        if max_results == 0 {
            return Err(
                QueryError::InvalidPaging("max results must be positive".into()).into(),
            );
        }
        let (map, columns, condition, order_by) =
            self.windowed_parts(entity, predicate, sort, parameters)?;
        let mut out = String::with_capacity(256);
        self.dialect().write_set_select(
            &mut out,
            &SelectParts {
                map: &map,
                columns: &columns,
                condition: condition.as_deref(),
                order_by: &order_by,
            },
            first_result,
            max_results,
            parameters,
        )?;
        Ok(out)
    }

    /// `SELECT COUNT(*) AS "Total" FROM table [WHERE predicate]`
    pub fn count(
        &self,
        entity: EntityType,
        predicate: Option<&Predicate>,
        parameters: &mut Parameters,
    ) -> Result<String> {
        let map = self.map(entity)?;
        let condition = self.condition(predicate, parameters)?;
        let mut columns = String::from("COUNT(*) AS ");
        self.dialect().write_identifier_quoted(&mut columns, "Total");
        let mut out = String::with_capacity(128);
        self.dialect().write_select(
            &mut out,
            &SelectParts {
                map: &map,
                columns: &columns,
                condition: condition.as_deref(),
                order_by: "",
            },
        );
        Ok(out)
    }

    /// Equality over every key, the values are expected under the property names.
    fn write_key_condition(&self, out: &mut String, map: &ClassMap) -> Result<()> {
        let keys = map.keys();
        let composite = match keys.clone().count() {
            0 => return Err(QueryError::NoKeys(map.entity_name.to_string()).into()),
            1 => false,
            _ => true,
        };
        if composite {
            out.push('(');
        }
        separated_by(
            out,
            keys,
            |out, key| {
                out.push('(');
                self.dialect().write_column_name(out, Some(map), key, false);
                out.push_str(" = ");
                out.push(self.dialect().parameter_prefix());
                out.push_str(&key.name);
                out.push(')');
            },
            " AND ",
        );
        if composite {
            out.push(')');
        }
        Ok(())
    }

    /// Select of one entity by key.
    pub fn get(&self, entity: EntityType) -> Result<Arc<str>> {
        let map = self.map(entity)?;
        let columns = self.columns(entity)?;
        self.config.cached_statement(entity, StatementKind::Get, || {
            let mut condition = String::with_capacity(64);
            self.write_key_condition(&mut condition, &map)?;
            let mut out = String::with_capacity(256);
            self.dialect().write_select(
                &mut out,
                &SelectParts {
                    map: &map,
                    columns: &columns,
                    condition: Some(&condition),
                    order_by: "",
                },
            );
            Ok(out)
        })
    }

    /// `INSERT INTO table (columns) VALUES (parameters)`, identities and read only columns are
    /// left to the database.
    pub fn insert(&self, entity: EntityType) -> Result<Arc<str>> {
        let map = self.map(entity)?;
        self.config.cached_statement(entity, StatementKind::Insert, || {
            let dialect = self.dialect();
            let columns = map.insertable();
            let mut out = String::with_capacity(256);
            out.push_str("INSERT INTO ");
            dialect.write_table_name(&mut out, &map);
            if columns.clone().next().is_none() {
                dialect.write_insert_default_values(&mut out);
                return Ok(out);
            }
            out.push_str(" (");
            separated_by(
                &mut out,
                columns.clone(),
                |out, p| dialect.write_column_name(out, None, p, false),
                ", ",
            );
            out.push_str(") VALUES (");
            separated_by(
                &mut out,
                columns,
                |out, p| {
                    out.push(dialect.parameter_prefix());
                    out.push_str(&p.name);
                },
                ", ",
            );
            out.push(')');
            Ok(out)
        })
    }

    /// `UPDATE table SET column = parameter WHERE keys`, keys generated by the database or by
    /// quill are never rewritten and `exclude_assigned_keys` also protects assigned ones.
    pub fn update(&self, entity: EntityType, exclude_assigned_keys: bool) -> Result<Arc<str>> {
        let map = self.map(entity)?;
        self.config.cached_statement(
            entity,
            StatementKind::Update {
                exclude_assigned_keys,
            },
            || {
                let dialect = self.dialect();
                let columns = map.updatable(exclude_assigned_keys);
                if columns.clone().next().is_none() {
                    return Err(QueryError::NothingToUpdate(map.entity_name.to_string()).into());
                }
                let mut out = String::with_capacity(256);
                out.push_str("UPDATE ");
                dialect.write_table_name(&mut out, &map);
                out.push_str(" SET ");
                separated_by(
                    &mut out,
                    columns,
                    |out, p| {
                        dialect.write_column_name(out, None, p, false);
                        out.push_str(" = ");
                        out.push(dialect.parameter_prefix());
                        out.push_str(&p.name);
                    },
                    ", ",
                );
                out.push_str(" WHERE ");
                self.write_key_condition(&mut out, &map)?;
                Ok(out)
            },
        )
    }

    /// Delete of one entity by key.
    pub fn delete(&self, entity: EntityType) -> Result<Arc<str>> {
        let map = self.map(entity)?;
        self.config.cached_statement(entity, StatementKind::Delete, || {
            let mut out = String::with_capacity(128);
            out.push_str("DELETE FROM ");
            self.dialect().write_table_name(&mut out, &map);
            out.push_str(" WHERE ");
            self.write_key_condition(&mut out, &map)?;
            Ok(out)
        })
    }

    /// Delete of every row matching `predicate`, rejected when the predicate is missing or empty.
    pub fn delete_where(
        &self,
        entity: EntityType,
        predicate: Option<&Predicate>,
        parameters: &mut Parameters,
    ) -> Result<String> {
        let map = self.map(entity)?;
        let Some(predicate) = predicate.filter(|p| !p.is_empty()) else {
            log::warn!(
                "Refused to delete from `{}` without a predicate",
                map.entity_name
            );
            return Err(QueryError::EmptyPredicate(map.entity_name.to_string()).into());
        };
        let mut out = String::with_capacity(128);
        out.push_str("DELETE FROM ");
        self.dialect().write_table_name(&mut out, &map);
        out.push_str(" WHERE ");
        predicate.write_sql(self, &mut out, parameters)?;
        Ok(out)
    }

    /// Query reading back the identity generated by the last insert.
    pub fn identity(&self, entity: EntityType) -> Result<Arc<str>> {
        let map = self.map(entity)?;
        if map.identity().is_none() {
            return Err(QueryError::Unsupported(format!(
                "Entity `{}` has no identity key",
                map.entity_name
            ))
            .into());
        }
        self.config
            .cached_statement(entity, StatementKind::Identity, || {
                let mut out = String::with_capacity(64);
                self.dialect().write_identity_sql(&mut out, &map);
                Ok(out)
            })
    }
}
