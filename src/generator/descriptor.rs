//! Repository descriptor XML output.

use std::fmt::Write;

use convert_case::{Case, Casing};

use super::{ArtifactGenerator, GenerateError, GeneratorContext, TableSnapshot, UnmappedTypePolicy};
use crate::typemap::map_type_code;
use crate::xml::escape;

/// Emits a `gsa-template` document with one item-descriptor per table.
#[derive(Debug, Clone)]
pub struct DescriptorGenerator {
    context: GeneratorContext,
    unmapped: UnmappedTypePolicy,
}

impl DescriptorGenerator {
    pub fn new(context: GeneratorContext) -> Self {
        Self {
            context,
            unmapped: UnmappedTypePolicy::default(),
        }
    }

    pub fn with_unmapped_types(mut self, policy: UnmappedTypePolicy) -> Self {
        self.unmapped = policy;
        self
    }
}

/// Primary keys joined by `,`, else the first column, else empty.
fn id_column_names(snapshot: &TableSnapshot) -> String {
    if !snapshot.primary_keys.is_empty() {
        return snapshot.primary_keys.join(",");
    }
    snapshot
        .columns
        .first()
        .map(|c| c.name.clone())
        .unwrap_or_default()
}

impl ArtifactGenerator for DescriptorGenerator {
    fn context(&self) -> &GeneratorContext {
        &self.context
    }

    fn file_name(&self, object_name: &str) -> String {
        format!("{}Repository.xml", object_name)
    }

    fn needs_primary_keys(&self) -> bool {
        true
    }

    fn write_header(&self, out: &mut String, snapshot: &TableSnapshot) {
        let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            out,
            "<!-- Generated by repodef on {} -->",
            self.context.date_stamp()
        );
        out.push_str("<gsa-template>\n");
        out.push_str("  <header>\n");
        let _ = writeln!(
            out,
            "    <name>{}Repository</name>",
            escape(&snapshot.object_name)
        );
        let _ = writeln!(out, "    <author>{}</author>", escape(self.context.author()));
        let _ = writeln!(
            out,
            "    <description>Repository definition for table {}</description>",
            escape(&snapshot.table.name)
        );
        out.push_str("  </header>\n\n");
        let _ = writeln!(
            out,
            r#"  <item-descriptor name="{}" default="true">"#,
            escape(&snapshot.object_name.to_case(Case::Camel))
        );
        let _ = writeln!(
            out,
            r#"    <table name="{}" type="primary" id-column-names="{}">"#,
            escape(&snapshot.table.qualified_name()),
            escape(&id_column_names(snapshot))
        );
    }

    fn write_body(&self, out: &mut String, snapshot: &TableSnapshot) -> Result<(), GenerateError> {
        for column in &snapshot.columns {
            let data_types = match map_type_code(column.type_code) {
                Some(name) => format!(r#" data-types="{}""#, name),
                None => match self.unmapped {
                    UnmappedTypePolicy::Preserve => {
                        tracing::warn!(
                            "Column {} of table {} has unmapped type code {}",
                            column.name,
                            snapshot.table,
                            column.type_code
                        );
                        r#" data-types="null""#.to_string()
                    }
                    UnmappedTypePolicy::Omit => String::new(),
                    UnmappedTypePolicy::Fail => {
                        return Err(GenerateError::new(format!(
                            "Column {} of table {} has unmapped type code {}",
                            column.name, snapshot.table, column.type_code
                        )));
                    }
                },
            };

            let _ = writeln!(
                out,
                r#"      <property name="{}" column-names="{}"{} required="{}"/>"#,
                escape(&self.context.column_object_name(column)),
                escape(&column.name),
                data_types,
                !column.nullable
            );
        }
        Ok(())
    }

    fn write_footer(&self, out: &mut String, _snapshot: &TableSnapshot) {
        out.push_str("    </table>\n");
        out.push_str("  </item-descriptor>\n");
        out.push_str("</gsa-template>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnMeta, InMemorySchema, TableMeta, TableRef};
    use crate::typemap::SqlType;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn generator() -> DescriptorGenerator {
        DescriptorGenerator::new(
            GeneratorContext::new("jdoe").with_date(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()),
        )
    }

    fn schema(table: TableRef, columns: Vec<ColumnMeta>, pk: &[&str]) -> InMemorySchema {
        InMemorySchema::default().with_table(TableMeta {
            table,
            columns,
            primary_key: pk.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn test_exact_output() {
        let table = TableRef::new(Some("APP"), "ORDERS");
        let schema = schema(
            table.clone(),
            vec![ColumnMeta::new("ID", SqlType::Integer, 10, false)],
            &["ID"],
        );

        let xml = generator().generate(&schema, &table).unwrap();
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- Generated by repodef on 2026-10-16 -->
<gsa-template>
  <header>
    <name>OrderRepository</name>
    <author>jdoe</author>
    <description>Repository definition for table ORDERS</description>
  </header>

  <item-descriptor name="order" default="true">
    <table name="APP.ORDERS" type="primary" id-column-names="ID">
      <property name="id" column-names="ID" data-types="int" required="true"/>
    </table>
  </item-descriptor>
</gsa-template>
"#
        );
    }

    #[test]
    fn test_composite_primary_key() {
        let table = TableRef::new(None, "ORDER_LINES");
        let schema = schema(
            table.clone(),
            vec![
                ColumnMeta::new("ID", SqlType::Integer, 10, false),
                ColumnMeta::new("SUB_ID", SqlType::Integer, 10, false),
            ],
            &["ID", "SUB_ID"],
        );

        let xml = generator().generate(&schema, &table).unwrap();
        assert!(xml.contains(r#"<table name="ORDER_LINES" type="primary" id-column-names="ID,SUB_ID">"#));
        assert!(xml.contains(r#"<item-descriptor name="orderLine" default="true">"#));
    }

    #[test]
    fn test_first_column_fallback() {
        let table = TableRef::new(None, "LEGACY");
        let schema = schema(
            table.clone(),
            vec![
                ColumnMeta::new("LEGACY_KEY", SqlType::Char, 8, true),
                ColumnMeta::new("NOTE", SqlType::VarChar, 10, true),
            ],
            &[],
        );

        let xml = generator().generate(&schema, &table).unwrap();
        assert!(xml.contains(r#"id-column-names="LEGACY_KEY""#));
        assert!(xml.contains(r#"<property name="note" column-names="NOTE" data-types="string" required="false"/>"#));
    }

    #[test]
    fn test_no_columns() {
        let table = TableRef::new(None, "EMPTY");
        let schema = schema(table.clone(), Vec::new(), &[]);

        let xml = generator().generate(&schema, &table).unwrap();
        assert!(xml.contains(r#"id-column-names="">"#));
        assert!(!xml.contains("<property"));
    }

    #[test]
    fn test_unmapped_preserve() {
        let table = TableRef::new(None, "DOCS");
        let schema = schema(
            table.clone(),
            vec![ColumnMeta::new("BODY", SqlType::Other, 0, true)],
            &[],
        );

        let xml = generator().generate(&schema, &table).unwrap();
        assert!(xml.contains(r#"<property name="body" column-names="BODY" data-types="null" required="false"/>"#));
    }

    #[test]
    fn test_unmapped_omit() {
        let table = TableRef::new(None, "DOCS");
        let schema = schema(
            table.clone(),
            vec![ColumnMeta::new("BODY", SqlType::Other, 0, true)],
            &[],
        );

        let xml = generator()
            .with_unmapped_types(UnmappedTypePolicy::Omit)
            .generate(&schema, &table)
            .unwrap();
        assert!(xml.contains(r#"<property name="body" column-names="BODY" required="false"/>"#));
    }

    #[test]
    fn test_unmapped_fail() {
        let table = TableRef::new(None, "DOCS");
        let schema = schema(
            table.clone(),
            vec![ColumnMeta::new("BODY", SqlType::Array, 0, true)],
            &[],
        );

        let err = generator()
            .with_unmapped_types(UnmappedTypePolicy::Fail)
            .generate(&schema, &table)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column BODY of table DOCS has unmapped type code 2003"
        );
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_attribute_values_escaped() {
        let table = TableRef::new(None, "QUOTES");
        let schema = schema(
            table.clone(),
            vec![ColumnMeta::new("A\"B", SqlType::VarChar, 5, true)],
            &[],
        );

        let xml = DescriptorGenerator::new(GeneratorContext::new("O'Brien & Co"))
            .generate(&schema, &table)
            .unwrap();
        assert!(xml.contains("<author>O&apos;Brien &amp; Co</author>"));
        assert!(xml.contains(r#"column-names="A&quot;B""#));
    }
}
