use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::reservation;

/// A car in the rental catalog.
///
/// Cars are only ever added (by an administrator or the catalog seed); they are
/// never edited or deleted, so reservations can rely on the row staying put.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub brand: String,
    #[sea_orm(column_name = "model")]
    #[serde(rename = "model")]
    pub model_name: String,
    pub year: i32,
    /// Price of one rental day.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub daily_price: Decimal,
    /// File name of the car picture inside the upload directory.
    pub image_filename: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservation,
}

impl Related<reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
