use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(big_id(Companies::Id))
                    .col(string(Companies::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Warehouses::Table)
                    .if_not_exists()
                    .col(big_id(Warehouses::Id))
                    .col(big_integer(Warehouses::CompanyId))
                    .col(string(Warehouses::Name))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_warehouses_company_id")
                            .from(Warehouses::Table, Warehouses::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_warehouses_company_id")
                    .table(Warehouses::Table)
                    .col(Warehouses::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(big_id(Products::Id))
                    .col(string_len(Products::Name, 255))
                    .col(string_len_uniq(Products::Sku, 64))
                    .col(
                        ColumnDef::new(Products::Price)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(integer(Products::LowStockThreshold).default(10))
                    .col(
                        timestamp_with_time_zone(Products::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE products ADD CONSTRAINT chk_products_price_positive CHECK (price > 0)",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Inventory::Table)
                    .if_not_exists()
                    .col(big_id(Inventory::Id))
                    .col(big_integer(Inventory::ProductId))
                    .col(big_integer(Inventory::WarehouseId))
                    .col(integer(Inventory::Quantity).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_product_id")
                            .from(Inventory::Table, Inventory::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_warehouse_id")
                            .from(Inventory::Table, Inventory::WarehouseId)
                            .to(Warehouses::Table, Warehouses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_inventory_product_warehouse")
                    .table(Inventory::Table)
                    .col(Inventory::ProductId)
                    .col(Inventory::WarehouseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE inventory ADD CONSTRAINT chk_inventory_quantity_non_negative CHECK (quantity >= 0)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Inventory::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Warehouses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;

        Ok(())
    }
}

/// `BIGSERIAL PRIMARY KEY`
pub(crate) fn big_id<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .take()
}

#[derive(DeriveIden)]
pub(crate) enum Companies {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub(crate) enum Warehouses {
    Table,
    Id,
    CompanyId,
    Name,
}

#[derive(DeriveIden)]
pub(crate) enum Products {
    Table,
    Id,
    Name,
    Sku,
    Price,
    LowStockThreshold,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Inventory {
    Table,
    Id,
    ProductId,
    WarehouseId,
    Quantity,
}
