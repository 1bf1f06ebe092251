//! This file serves as the root for all SeaORM entity modules.
//! We define the data models of the car rental application here:
//! the car catalog, the registered users, and the reservations linking them.

pub mod car;
pub mod reservation;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::car::Entity as Car;
    pub use super::reservation::Entity as Reservation;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use crate::schema::create_tables;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Create the schema from the entity definitions
        create_tables(&db).await?;
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        // Setup database
        let db = setup_db().await?;

        // Create users
        let alice = user::ActiveModel {
            username: Set("alice".to_string()),
            email: Set("alice@x.com".to_string()),
            password_hash: Set("hash".to_string()),
            role: Set(user::Role::User),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let admin = user::ActiveModel {
            username: Set("admin".to_string()),
            email: Set("admin@x.com".to_string()),
            password_hash: Set("hash".to_string()),
            full_name: Set(Some("Site Admin".to_string())),
            role: Set(user::Role::Admin),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create cars
        let clio = car::ActiveModel {
            brand: Set("Renault".to_string()),
            model_name: Set("Clio".to_string()),
            year: Set(2022),
            daily_price: Set(Decimal::new(400, 0)),
            image_filename: Set(Some("f-renault-clio.jpg".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let golf = car::ActiveModel {
            brand: Set("Volkswagen".to_string()),
            model_name: Set("Golf".to_string()),
            year: Set(2023),
            daily_price: Set(Decimal::new(5005, 1)), // 500.5
            image_filename: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a reservation
        let start = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let booking = reservation::ActiveModel {
            user_id: Set(alice.id),
            car_id: Set(clio.id),
            start_at: Set(start),
            end_at: Set(end),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Verify users
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.username == "alice" && u.role == user::Role::User));
        assert!(users.iter().any(|u| u.id == admin.id && u.role == user::Role::Admin));

        // Verify cars
        let cars = Car::find().all(&db).await?;
        assert_eq!(cars.len(), 2);
        let stored_golf = cars.iter().find(|c| c.id == golf.id).unwrap();
        assert_eq!(stored_golf.daily_price, Decimal::new(5005, 1));
        assert_eq!(stored_golf.image_filename, None);

        // Verify the reservation through both sides of the relation
        let alice_bookings = alice.find_related(Reservation).all(&db).await?;
        assert_eq!(alice_bookings, vec![booking.clone()]);

        let clio_bookings = Reservation::find()
            .filter(reservation::Column::CarId.eq(clio.id))
            .all(&db)
            .await?;
        assert_eq!(clio_bookings.len(), 1);
        assert_eq!(clio_bookings[0].start_at, start);
        assert_eq!(clio_bookings[0].end_at, end);

        let booked_car = booking.find_related(Car).one(&db).await?;
        assert_eq!(booked_car.map(|c| c.id), Some(clio.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_unique_username_is_enforced() -> Result<(), DbErr> {
        let db = setup_db().await?;

        user::ActiveModel {
            username: Set("alice".to_string()),
            email: Set("alice@x.com".to_string()),
            password_hash: Set("hash".to_string()),
            role: Set(user::Role::User),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let duplicate = user::ActiveModel {
            username: Set("alice".to_string()),
            email: Set("other@x.com".to_string()),
            password_hash: Set("hash".to_string()),
            role: Set(user::Role::User),
            ..Default::default()
        }
        .insert(&db)
        .await;

        assert!(duplicate.is_err());
        assert_eq!(User::find().all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_reservation_requires_existing_car() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let alice = user::ActiveModel {
            username: Set("alice".to_string()),
            email: Set("alice@x.com".to_string()),
            password_hash: Set("hash".to_string()),
            role: Set(user::Role::User),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let moment = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let dangling = reservation::ActiveModel {
            user_id: Set(alice.id),
            car_id: Set(4242),
            start_at: Set(moment),
            end_at: Set(moment),
            ..Default::default()
        }
        .insert(&db)
        .await;

        assert!(dangling.is_err());
        Ok(())
    }

    /// A user with one booking of a car.
    async fn booked_fixture(
        db: &DatabaseConnection,
    ) -> Result<(user::Model, car::Model, reservation::Model), DbErr> {
        let alice = user::ActiveModel {
            username: Set("alice".to_string()),
            email: Set("alice@x.com".to_string()),
            password_hash: Set("hash".to_string()),
            role: Set(user::Role::User),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let clio = car::ActiveModel {
            brand: Set("Renault".to_string()),
            model_name: Set("Clio".to_string()),
            year: Set(2022),
            daily_price: Set(Decimal::new(400, 0)),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let start = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let booking = reservation::ActiveModel {
            user_id: Set(alice.id),
            car_id: Set(clio.id),
            start_at: Set(start),
            end_at: Set(end),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok((alice, clio, booking))
    }

    #[tokio::test]
    async fn test_booked_car_cannot_be_deleted() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let (_alice, clio, booking) = booked_fixture(&db).await?;

        let deleted = Car::delete_by_id(clio.id).exec(&db).await;

        assert!(deleted.is_err());
        assert_eq!(Car::find_by_id(clio.id).one(&db).await?, Some(clio));
        assert_eq!(Reservation::find().all(&db).await?, vec![booking]);
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_user_removes_their_reservations() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let (alice, clio, _booking) = booked_fixture(&db).await?;

        alice.delete(&db).await?;

        assert!(Reservation::find().all(&db).await?.is_empty());
        // The car stays in the catalog
        assert_eq!(Car::find().all(&db).await?, vec![clio]);
        Ok(())
    }
}
