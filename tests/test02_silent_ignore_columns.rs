#![cfg(feature = "sqlite")]

use clap::ValueEnum;
use sql_table::prelude::*;

fn pets_schema() -> Result<Schema, SqlTableError> {
    Schema::builder("pets")
        .column("id", ColumnDefinition::integer_key())
        .column("name", ColumnDefinition::new(DataType::Text))
        .column("age", ColumnDefinition::new(DataType::Integer).nullable())
        .build()
}

async fn pets(kind: BackendKind) -> Result<Table, SqlTableError> {
    let table: Table = Table::new(pets_schema()?, EngineHandle::open(kind, ":memory:").await?);
    table.create().await?;
    Ok(table)
}

#[tokio::test]
async fn undeclared_insert_fields_are_dropped() -> Result<(), SqlTableError> {
    for kind in BackendKind::value_variants() {
        let pets = pets(*kind).await?;
        let rex = pets
            .add(Fields::new().set("name", "Rex").set("owner", "nobody"))
            .await?;
        assert_eq!(rex.get("owner"), None, "{kind:?}");
        assert_eq!(rex.get("age"), Some(&RowValues::Null), "{kind:?}");
        assert_eq!(rex.len(), 3, "{kind:?}");
    }
    Ok(())
}

#[tokio::test]
async fn undeclared_conditions_match_everything() -> Result<(), SqlTableError> {
    for kind in BackendKind::value_variants() {
        let pets = pets(*kind).await?;
        pets.add(Fields::new().set("name", "Rex")).await?;
        pets.add(Fields::new().set("name", "Tom")).await?;

        let opts = GetOptions::new().filter(Condition::eq("species", "cat"));
        assert_eq!(pets.get(&opts).await?.len(), 2, "{kind:?}");
        assert_eq!(pets.count(&opts.conditions).await?, 2, "{kind:?}");
    }
    Ok(())
}

#[tokio::test]
async fn update_ignores_undeclared_fields_but_applies_the_rest() -> Result<(), SqlTableError> {
    for kind in BackendKind::value_variants() {
        let pets = pets(*kind).await?;
        let rex = pets.add(Fields::new().set("name", "Rex")).await?;
        let id = *rex.get("id").and_then(RowValues::as_int).unwrap();

        let changed = pets
            .update(
                &Fields::new().set("age", 3).set("colour", "brown"),
                &GetOptions::new().filter(Condition::eq("id", id)),
            )
            .await?;
        assert_eq!(changed, 1, "{kind:?}");

        let only_unknown = pets
            .update(&Fields::new().set("colour", "brown"), &GetOptions::default())
            .await;
        assert!(
            matches!(only_unknown, Err(SqlTableError::InvalidArgument(_))),
            "{kind:?}"
        );

        let rex = pets
            .first(&GetOptions::new().filter(Condition::eq("id", id)))
            .await?
            .unwrap();
        assert_eq!(rex.get("age"), Some(&RowValues::Int(3)), "{kind:?}");
    }
    Ok(())
}

#[tokio::test]
async fn null_conditions_compare_with_is_null() -> Result<(), SqlTableError> {
    for kind in BackendKind::value_variants() {
        let pets = pets(*kind).await?;
        pets.add(Fields::new().set("name", "Rex").set("age", 4)).await?;
        pets.add(Fields::new().set("name", "Tom")).await?;

        assert_eq!(
            pets.count(&[Condition::eq("age", RowValues::Null)]).await?,
            1,
            "{kind:?}"
        );
        assert_eq!(
            pets.count(&[Condition::ne("age", RowValues::Null)]).await?,
            1,
            "{kind:?}"
        );

        let err = pets
            .count(&[Condition::gt("age", RowValues::Null)])
            .await
            .unwrap_err();
        assert!(matches!(err, SqlTableError::InvalidArgument(_)), "{kind:?}");
    }
    Ok(())
}

#[tokio::test]
async fn update_and_delete_report_affected_rows() -> Result<(), SqlTableError> {
    for kind in BackendKind::value_variants() {
        let pets = pets(*kind).await?;
        for name in ["a", "b", "c"] {
            pets.add(Fields::new().set("name", name)).await?;
        }
        let renamed = pets
            .update(
                &Fields::new().set("name", "z"),
                &GetOptions::new().filter(Condition::any("name", Operator::Eq, ["a", "b"])),
            )
            .await?;
        assert_eq!(renamed, 2, "{kind:?}");
        let removed = pets
            .delete(&GetOptions::new().filter(Condition::eq("name", "z")))
            .await?;
        assert_eq!(removed, 2, "{kind:?}");
        assert_eq!(pets.delete(&GetOptions::default()).await?, 1, "{kind:?}");
    }
    Ok(())
}

#[tokio::test]
async fn engine_errors_pass_through_unchanged() -> Result<(), SqlTableError> {
    for kind in BackendKind::value_variants() {
        let pets = pets(*kind).await?;
        // name is NOT NULL
        let err = pets
            .add(Fields::new().set("name", RowValues::Null))
            .await
            .unwrap_err();
        let from_engine = match &err {
            SqlTableError::SqliteError(_) => *kind == BackendKind::Sqlite,
            #[cfg(feature = "turso")]
            SqlTableError::TursoError(_) => *kind == BackendKind::Turso,
            _ => false,
        };
        assert!(from_engine, "{kind:?}: {err}");
        assert_eq!(pets.count(&[]).await?, 0, "{kind:?}");
    }
    Ok(())
}
