use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000000_create_catalog::{Products, Warehouses, big_id};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(big_id(Suppliers::Id))
                    .col(string(Suppliers::Name))
                    .col(string_null(Suppliers::ContactEmail))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SupplierProducts::Table)
                    .if_not_exists()
                    .col(big_integer(SupplierProducts::SupplierId))
                    .col(big_integer(SupplierProducts::ProductId))
                    .primary_key(
                        Index::create()
                            .col(SupplierProducts::SupplierId)
                            .col(SupplierProducts::ProductId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_supplier_products_supplier_id")
                            .from(SupplierProducts::Table, SupplierProducts::SupplierId)
                            .to(Suppliers::Table, Suppliers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_supplier_products_product_id")
                            .from(SupplierProducts::Table, SupplierProducts::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(big_id(Sales::Id))
                    .col(big_integer(Sales::ProductId))
                    .col(big_integer(Sales::WarehouseId))
                    .col(integer(Sales::Quantity))
                    .col(
                        timestamp_with_time_zone(Sales::SaleDate)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_product_id")
                            .from(Sales::Table, Sales::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_warehouse_id")
                            .from(Sales::Table, Sales::WarehouseId)
                            .to(Warehouses::Table, Warehouses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Low-stock report filters on the last 30 days per (product, warehouse)
        manager
            .create_index(
                Index::create()
                    .name("idx_sales_product_warehouse_date")
                    .table(Sales::Table)
                    .col(Sales::ProductId)
                    .col(Sales::WarehouseId)
                    .col(Sales::SaleDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SupplierProducts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Suppliers {
    Table,
    Id,
    Name,
    ContactEmail,
}

#[derive(DeriveIden)]
enum SupplierProducts {
    Table,
    SupplierId,
    ProductId,
}

#[derive(DeriveIden)]
enum Sales {
    Table,
    Id,
    ProductId,
    WarehouseId,
    Quantity,
    SaleDate,
}
