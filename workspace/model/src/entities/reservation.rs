use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::{car, user};

/// A booking of one car by one user over a time range.
///
/// Nothing checks that `start_at` precedes `end_at` or that bookings of the
/// same car do not overlap; there is no booking flow yet.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub car_id: i32,
    pub start_at: DateTime,
    pub end_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// A car with reservations cannot be removed.
    #[sea_orm(
        belongs_to = "car::Entity",
        from = "Column::CarId",
        to = "car::Column::Id",
        on_delete = "Restrict"
    )]
    Car,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
