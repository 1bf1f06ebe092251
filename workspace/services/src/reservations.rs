//! Read side of reservations. There is no booking flow yet, so nothing here
//! checks availability or overlapping date ranges.

use model::entities::car;
use model::store;
use sea_orm::DatabaseConnection;
use sea_orm::prelude::DateTime;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::Result;

/// A reservation joined with its car, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationDetails {
    pub id: i32,
    pub car: car::Model,
    pub start_at: DateTime,
    pub end_at: DateTime,
}

/// Reservations owned by `user_id`, oldest first.
#[instrument(skip(db))]
pub async fn list_for_user(db: &DatabaseConnection, user_id: i32) -> Result<Vec<ReservationDetails>> {
    let rows = store::reservations_by_user_with_car(db, user_id).await?;
    debug!("Retrieved {} reservations for user {}", rows.len(), user_id);

    let details = rows
        .into_iter()
        .filter_map(|(reservation, car)| match car {
            Some(car) => Some(ReservationDetails {
                id: reservation.id,
                car,
                start_at: reservation.start_at,
                end_at: reservation.end_at,
            }),
            None => {
                // Unreachable with foreign keys on, but a dangling row must not break the page.
                warn!("Reservation {} points at missing car {}", reservation.id, reservation.car_id);
                None
            }
        })
        .collect();

    Ok(details)
}
