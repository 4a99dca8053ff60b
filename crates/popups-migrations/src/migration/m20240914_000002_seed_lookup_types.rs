//! Seeds the popup type and layout type lookup tables

use sea_orm_migration::prelude::*;

const POPUP_TYPES: [&str; 3] = ["Promotional Offer", "Newsletter Signup", "Social Media Link"];

const LAYOUT_TYPES: [&str; 3] = [
    "Full Screen Overlay",
    "Slide-In Popup",
    "Exit-Intent Popup",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(insert_names(PopupTypes::Table, PopupTypes::Name, &POPUP_TYPES)?)
            .await?;
        manager
            .exec_stmt(insert_names(
                PopupLayoutTypes::Table,
                PopupLayoutTypes::Name,
                &LAYOUT_TYPES,
            )?)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(PopupLayoutTypes::Table)
                    .and_where(Expr::col(PopupLayoutTypes::Name).is_in(LAYOUT_TYPES))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(PopupTypes::Table)
                    .and_where(Expr::col(PopupTypes::Name).is_in(POPUP_TYPES))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

fn insert_names<T, C>(table: T, column: C, names: &[&str]) -> Result<InsertStatement, DbErr>
where
    T: IntoIden + 'static,
    C: IntoIden,
{
    let mut insert = Query::insert();
    insert.into_table(table).columns([column]);
    for name in names {
        insert
            .values([(*name).into()])
            .map_err(|e| DbErr::Migration(e.to_string()))?;
    }
    Ok(insert)
}

#[derive(DeriveIden)]
enum PopupTypes {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum PopupLayoutTypes {
    Table,
    Name,
}
