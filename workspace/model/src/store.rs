//! Query helpers over the entities.
//!
//! Inserts and updates go through the SeaORM `ActiveModel` directly; this
//! module holds the reads. Missing rows are `Ok(None)`, never an error, and
//! every listing comes back in insertion (id ascending) order.
//!
//! Relationships are traversed with explicit queries on the foreign keys
//! (`reservations_by_user`, `reservations_by_car`) instead of back references.

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::{instrument, trace};

use crate::entities::{car, reservation, user};

// Cars

pub async fn find_car<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<car::Model>, DbErr> {
    car::Entity::find_by_id(id).one(db).await
}

pub async fn list_cars<C: ConnectionTrait>(db: &C) -> Result<Vec<car::Model>, DbErr> {
    car::Entity::find()
        .order_by_asc(car::Column::Id)
        .all(db)
        .await
}

pub async fn filter_cars<C: ConnectionTrait>(
    db: &C,
    condition: Condition,
) -> Result<Vec<car::Model>, DbErr> {
    car::Entity::find()
        .filter(condition)
        .order_by_asc(car::Column::Id)
        .all(db)
        .await
}

/// Look up a car by its brand and model name.
pub async fn find_car_by_brand_and_model<C: ConnectionTrait>(
    db: &C,
    brand: &str,
    model_name: &str,
) -> Result<Option<car::Model>, DbErr> {
    car::Entity::find()
        .filter(car::Column::Brand.eq(brand))
        .filter(car::Column::ModelName.eq(model_name))
        .one(db)
        .await
}

// Users

pub async fn find_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find_by_id(id).one(db).await
}

pub async fn list_users<C: ConnectionTrait>(db: &C) -> Result<Vec<user::Model>, DbErr> {
    user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
}

pub async fn filter_users<C: ConnectionTrait>(
    db: &C,
    condition: Condition,
) -> Result<Vec<user::Model>, DbErr> {
    user::Entity::find()
        .filter(condition)
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
}

pub async fn find_user_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
}

pub async fn find_user_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
}

/// First user holding either the username or the email, if any.
pub async fn find_user_by_username_or_email<C: ConnectionTrait>(
    db: &C,
    username: &str,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(username))
                .add(user::Column::Email.eq(email)),
        )
        .order_by_asc(user::Column::Id)
        .one(db)
        .await
}

// Reservations

pub async fn find_reservation<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<reservation::Model>, DbErr> {
    reservation::Entity::find_by_id(id).one(db).await
}

pub async fn list_reservations<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<reservation::Model>, DbErr> {
    reservation::Entity::find()
        .order_by_asc(reservation::Column::Id)
        .all(db)
        .await
}

#[instrument(skip(db))]
pub async fn reservations_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<reservation::Model>, DbErr> {
    trace!("Loading reservations owned by user {}", user_id);
    reservation::Entity::find()
        .filter(reservation::Column::UserId.eq(user_id))
        .order_by_asc(reservation::Column::Id)
        .all(db)
        .await
}

#[instrument(skip(db))]
pub async fn reservations_by_car<C: ConnectionTrait>(
    db: &C,
    car_id: i32,
) -> Result<Vec<reservation::Model>, DbErr> {
    trace!("Loading reservations of car {}", car_id);
    reservation::Entity::find()
        .filter(reservation::Column::CarId.eq(car_id))
        .order_by_asc(reservation::Column::Id)
        .all(db)
        .await
}

/// Reservations of a user joined with the car each one refers to.
#[instrument(skip(db))]
pub async fn reservations_by_user_with_car<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<(reservation::Model, Option<car::Model>)>, DbErr> {
    reservation::Entity::find()
        .filter(reservation::Column::UserId.eq(user_id))
        .find_also_related(car::Entity)
        .order_by_asc(reservation::Column::Id)
        .all(db)
        .await
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, IntoActiveModel, Set};

    use super::*;
    use crate::schema::create_tables;

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        create_tables(&db).await.expect("Failed to create tables");
        db
    }

    async fn insert_user(db: &DatabaseConnection, username: &str, email: &str) -> user::Model {
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set("hash".to_string()),
            role: Set(user::Role::User),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert user")
    }

    async fn insert_car(db: &DatabaseConnection, brand: &str, model_name: &str, year: i32) -> car::Model {
        car::ActiveModel {
            brand: Set(brand.to_string()),
            model_name: Set(model_name.to_string()),
            year: Set(year),
            daily_price: Set(Decimal::new(300, 0)),
            image_filename: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert car")
    }

    async fn insert_reservation(
        db: &DatabaseConnection,
        user_id: i32,
        car_id: i32,
        day: u32,
    ) -> reservation::Model {
        let start = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, day + 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        reservation::ActiveModel {
            user_id: Set(user_id),
            car_id: Set(car_id),
            start_at: Set(start),
            end_at: Set(end),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert reservation")
    }

    #[tokio::test]
    async fn test_get_returns_none_for_missing_rows() {
        let db = setup_db().await;

        assert_eq!(find_car(&db, 1).await.unwrap(), None);
        assert_eq!(find_user(&db, 1).await.unwrap(), None);
        assert_eq!(find_reservation(&db, 1).await.unwrap(), None);
        assert_eq!(find_user_by_email(&db, "nobody@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let db = setup_db().await;

        let fiat = insert_car(&db, "Fiat", "Egea", 2021).await;
        let bmw = insert_car(&db, "BMW", "3 Serisi", 2023).await;
        let audi = insert_car(&db, "Audi", "A4", 2023).await;

        let ids: Vec<i32> = list_cars(&db).await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![fiat.id, bmw.id, audi.id]);
    }

    #[tokio::test]
    async fn test_filter_and_lookup_helpers() {
        let db = setup_db().await;

        insert_car(&db, "Fiat", "Egea", 2021).await;
        let bmw = insert_car(&db, "BMW", "3 Serisi", 2023).await;
        let audi = insert_car(&db, "Audi", "A4", 2023).await;

        let recent = filter_cars(&db, Condition::all().add(car::Column::Year.eq(2023)))
            .await
            .unwrap();
        assert_eq!(recent, vec![bmw.clone(), audi]);

        let found = find_car_by_brand_and_model(&db, "BMW", "3 Serisi").await.unwrap();
        assert_eq!(found, Some(bmw));

        let alice = insert_user(&db, "alice", "alice@x.com").await;
        let bob = insert_user(&db, "bob", "bob@x.com").await;

        assert_eq!(find_user_by_username(&db, "bob").await.unwrap(), Some(bob.clone()));
        assert_eq!(
            find_user_by_username_or_email(&db, "someone", "alice@x.com").await.unwrap(),
            Some(alice.clone())
        );
        assert_eq!(
            find_user_by_username_or_email(&db, "bob", "new@x.com").await.unwrap(),
            Some(bob)
        );
        assert_eq!(
            find_user_by_username_or_email(&db, "carol", "carol@x.com").await.unwrap(),
            None
        );

        let named = filter_users(&db, Condition::all().add(user::Column::Username.eq("alice")))
            .await
            .unwrap();
        assert_eq!(named, vec![alice]);
        assert_eq!(list_users(&db).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_persists_in_place() {
        let db = setup_db().await;

        let alice = insert_user(&db, "alice", "alice@x.com").await;
        let mut active = alice.clone().into_active_model();
        active.city = Set(Some("Izmir".to_string()));
        active.update(&db).await.unwrap();

        let reloaded = find_user(&db, alice.id).await.unwrap().unwrap();
        assert_eq!(reloaded.city.as_deref(), Some("Izmir"));
        assert_eq!(reloaded.username, "alice");
    }

    #[tokio::test]
    async fn test_relationship_queries() {
        let db = setup_db().await;

        let alice = insert_user(&db, "alice", "alice@x.com").await;
        let bob = insert_user(&db, "bob", "bob@x.com").await;
        let clio = insert_car(&db, "Renault", "Clio", 2022).await;
        let golf = insert_car(&db, "Volkswagen", "Golf", 2023).await;

        let first = insert_reservation(&db, alice.id, clio.id, 1).await;
        let other = insert_reservation(&db, bob.id, clio.id, 5).await;
        let second = insert_reservation(&db, alice.id, golf.id, 10).await;

        let by_alice = reservations_by_user(&db, alice.id).await.unwrap();
        assert_eq!(by_alice, vec![first.clone(), second.clone()]);

        let by_clio = reservations_by_car(&db, clio.id).await.unwrap();
        assert_eq!(by_clio, vec![first.clone(), other]);

        let joined = reservations_by_user_with_car(&db, alice.id).await.unwrap();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].0, first);
        assert_eq!(joined[0].1.as_ref().map(|c| c.id), Some(clio.id));
        assert_eq!(joined[1].0, second);
        assert_eq!(joined[1].1.as_ref().map(|c| c.id), Some(golf.id));

        assert_eq!(list_reservations(&db).await.unwrap().len(), 3);
    }
}
