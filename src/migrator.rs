use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_catalog_tables::Migration),
            Box::new(m20240301_000002_create_order_tables::Migration),
        ]
    }
}

mod m20240301_000001_create_catalog_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Paper::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Paper::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Paper::Name).string().not_null())
                        .col(
                            ColumnDef::new(Paper::Price)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Paper::Stock)
                                .integer()
                                .not_null()
                                .default(0)
                                .check(Expr::col(Paper::Stock).gte(0)),
                        )
                        .col(
                            ColumnDef::new(Paper::Discontinued)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Properties::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Properties::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Properties::PropertyName).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PaperProperties::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(PaperProperties::PaperId).integer().not_null())
                        .col(
                            ColumnDef::new(PaperProperties::PropertyId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(PaperProperties::PaperId)
                                .col(PaperProperties::PropertyId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_paper_properties_paper_id")
                                .from(PaperProperties::Table, PaperProperties::PaperId)
                                .to(Paper::Table, Paper::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_paper_properties_property_id")
                                .from(PaperProperties::Table, PaperProperties::PropertyId)
                                .to(Properties::Table, Properties::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_paper_properties_property_id")
                        .table(PaperProperties::Table)
                        .col(PaperProperties::PropertyId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PaperProperties::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Properties::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Paper::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Paper {
        Table,
        Id,
        Name,
        Price,
        Stock,
        Discontinued,
    }

    #[derive(DeriveIden)]
    enum Properties {
        Table,
        Id,
        PropertyName,
    }

    #[derive(DeriveIden)]
    enum PaperProperties {
        Table,
        PaperId,
        PropertyId,
    }
}

mod m20240301_000002_create_order_tables {

    use super::m20240301_000001_create_catalog_tables::Paper;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Customers::Name).string().not_null())
                        .col(ColumnDef::new(Customers::Address).string().not_null())
                        .col(ColumnDef::new(Customers::Phone).string().not_null())
                        .col(ColumnDef::new(Customers::Email).string().not_null())
                        .to_owned(),
                )
                .await?;

            // Customer identity is resolved by email on every order placement
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customers_email")
                        .table(Customers::Table)
                        .col(Customers::Email)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Orders::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Orders::CustomerId).integer().not_null())
                        .col(
                            ColumnDef::new(Orders::OrderDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::DeliveryDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(
                            ColumnDef::new(Orders::TotalAmount)
                                .decimal_len(14, 2)
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_customer_id")
                                .from(Orders::Table, Orders::CustomerId)
                                .to(Customers::Table, Customers::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_customer_id")
                        .table(Orders::Table)
                        .col(Orders::CustomerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderEntries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderEntries::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OrderEntries::OrderId).integer().not_null())
                        .col(ColumnDef::new(OrderEntries::ProductId).integer().not_null())
                        .col(ColumnDef::new(OrderEntries::ProductName).string().not_null())
                        .col(
                            ColumnDef::new(OrderEntries::UnitPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderEntries::Quantity)
                                .integer()
                                .not_null()
                                .check(Expr::col(OrderEntries::Quantity).gt(0)),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_entries_order_id")
                                .from(OrderEntries::Table, OrderEntries::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_entries_product_id")
                                .from(OrderEntries::Table, OrderEntries::ProductId)
                                .to(Paper::Table, Paper::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_entries_order_id")
                        .table(OrderEntries::Table)
                        .col(OrderEntries::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_entries_product_id")
                        .table(OrderEntries::Table)
                        .col(OrderEntries::ProductId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderEntries::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Customers {
        Table,
        Id,
        Name,
        Address,
        Phone,
        Email,
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
        CustomerId,
        OrderDate,
        DeliveryDate,
        Status,
        TotalAmount,
    }

    #[derive(DeriveIden)]
    enum OrderEntries {
        Table,
        Id,
        OrderId,
        ProductId,
        ProductName,
        UnitPrice,
        Quantity,
    }
}
