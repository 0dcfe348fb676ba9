use super::{ColumnMeta, IntrospectError, SchemaIntrospector, TableMeta, TableRef};
use crate::sql::{Dialect, parse_sql};

/// Schema metadata held in memory, typically read from a DDL dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemorySchema {
    tables: Vec<TableMeta>,
}

impl InMemorySchema {
    pub fn new(tables: Vec<TableMeta>) -> Self {
        Self { tables }
    }

    /// Read `CREATE TABLE` statements from a SQL dump.
    pub fn from_sql(input: &str, dialect: Dialect) -> Result<Self, IntrospectError> {
        Ok(Self::new(parse_sql(input, dialect)?))
    }

    pub fn with_table(mut self, table: TableMeta) -> Self {
        self.tables.push(table);
        self
    }

    pub fn table_metas(&self) -> &[TableMeta] {
        &self.tables
    }

    /// Find a table by its plain or schema-qualified name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&TableRef> {
        self.tables
            .iter()
            .map(|t| &t.table)
            .find(|t| t.name.eq_ignore_ascii_case(name) || t.qualified_name().eq_ignore_ascii_case(name))
    }

    fn lookup(&self, table: &TableRef) -> Result<&TableMeta, IntrospectError> {
        self.tables
            .iter()
            .find(|t| &t.table == table)
            .ok_or_else(|| IntrospectError::UnknownTable(table.qualified_name()))
    }
}

impl SchemaIntrospector for InMemorySchema {
    fn tables(&self) -> Result<Vec<TableRef>, IntrospectError> {
        Ok(self.tables.iter().map(|t| t.table.clone()).collect())
    }

    fn columns(&self, table: &TableRef) -> Result<Vec<ColumnMeta>, IntrospectError> {
        Ok(self.lookup(table)?.columns.clone())
    }

    fn primary_keys(&self, table: &TableRef) -> Result<Vec<String>, IntrospectError> {
        Ok(self.lookup(table)?.primary_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typemap::SqlType;

    fn orders() -> TableMeta {
        TableMeta {
            table: TableRef::new(Some("APP"), "ORDERS"),
            columns: vec![ColumnMeta::new("ID", SqlType::Integer, 10, false)],
            primary_key: vec!["ID".into()],
        }
    }

    #[test]
    fn test_lookup() {
        let schema = InMemorySchema::default().with_table(orders());
        let table = schema.find("app.orders").unwrap().clone();
        assert_eq!(table.qualified_name(), "APP.ORDERS");
        assert_eq!(schema.columns(&table).unwrap().len(), 1);
        assert_eq!(schema.primary_keys(&table).unwrap(), vec!["ID"]);
        assert!(schema.find("ORDERS").is_some());
    }

    #[test]
    fn test_unknown_table() {
        let schema = InMemorySchema::default().with_table(orders());
        let err = schema.columns(&TableRef::new(None, "MISSING")).unwrap_err();
        assert_eq!(err.to_string(), "Unknown table: MISSING");
    }
}
