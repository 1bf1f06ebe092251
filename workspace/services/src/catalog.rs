//! The car catalog: listing, administrator additions and the default showroom.

use std::path::Path;
use std::str::FromStr;

use model::entities::car;
use model::store;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::{debug, info, instrument, trace, warn};
use validator::Validate;

use crate::error::{Result, ServiceError};
use crate::identity::Role;
use crate::images::{ImageUpload, discard_image, store_image};

/// Input of the "add car" form.
///
/// `year` and `daily_price` arrive as raw text and are parsed by [`add_car`].
#[derive(Debug, Clone, Default, Validate)]
pub struct NewCar {
    #[validate(length(min = 1))]
    pub brand: String,
    #[validate(length(min = 1))]
    pub model_name: String,
    pub year: String,
    pub daily_price: String,
    pub image: Option<ImageUpload>,
}

/// All cars in insertion order. There is no pagination.
#[instrument(skip(db))]
pub async fn list_cars(db: &DatabaseConnection) -> Result<Vec<car::Model>> {
    let cars = store::list_cars(db).await?;
    debug!("Retrieved {} cars from database", cars.len());
    Ok(cars)
}

fn parse_year(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ServiceError::InvalidNumericField("year".to_string()))
}

/// Prices are stored as `DECIMAL(10, 2)`: at most 8 integer digits and 2 decimals.
fn parse_price(raw: &str) -> Result<Decimal> {
    let invalid = || ServiceError::InvalidNumericField("daily_price".to_string());
    let raw = raw.trim();
    let price = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| invalid())?
        .normalize();
    if price.scale() > 2 || price.abs() >= Decimal::from(100_000_000) {
        return Err(invalid());
    }
    Ok(price)
}

/// Add a car to the catalog.
///
/// # Arguments
///
/// * `db` - Database connection
/// * `role` - Role of the caller; only administrators may add cars
/// * `new_car` - Raw form input
/// * `upload_dir` - Directory receiving the optional picture
///
/// # Errors
///
/// Checked in this order: `Forbidden`, `MissingField` (brand/model),
/// `InvalidNumericField` (year, then price), `UnsupportedImageType`.
#[instrument(skip(db, new_car, upload_dir), fields(brand = %new_car.brand, model = %new_car.model_name))]
pub async fn add_car(
    db: &DatabaseConnection,
    role: Role,
    mut new_car: NewCar,
    upload_dir: &Path,
) -> Result<car::Model> {
    trace!("Entering add_car function");
    if role != Role::Admin {
        warn!("Car creation refused for role {}", role);
        return Err(ServiceError::Forbidden);
    }

    new_car.brand = new_car.brand.trim().to_string();
    new_car.model_name = new_car.model_name.trim().to_string();
    new_car.validate()?;

    let year = parse_year(&new_car.year)?;
    let daily_price = parse_price(&new_car.daily_price)?;

    let image_filename = match new_car.image.as_ref().filter(|upload| upload.is_supplied()) {
        Some(upload) => Some(store_image(upload_dir, upload).await?),
        None => None,
    };

    let inserted = car::ActiveModel {
        brand: Set(new_car.brand),
        model_name: Set(new_car.model_name),
        year: Set(year),
        daily_price: Set(daily_price),
        image_filename: Set(image_filename.clone()),
        ..Default::default()
    }
    .insert(db)
    .await;
    let car = match (inserted, image_filename) {
        (Ok(car), _) => car,
        (Err(e), Some(filename)) => {
            discard_image(upload_dir, &filename).await;
            return Err(e.into());
        }
        (Err(e), None) => return Err(e.into()),
    };

    info!("Car created successfully with ID: {}", car.id);
    Ok(car)
}

/// The cars shown in the showroom out of the box, with their bundled pictures.
const DEFAULT_CARS: [(&str, &str, i32, i64, &str); 9] = [
    ("Citroen", "C3", 2020, 300, "f-citroen-c3.png"),
    ("Fiat", "Egea", 2021, 350, "n-fiat-egea.png"),
    ("Renault", "Clio", 2022, 400, "f-renault-clio.jpg"),
    ("Volkswagen", "Golf", 2023, 500, "polo.png"),
    ("BMW", "3 Serisi", 2023, 1000, "bmw.png"),
    ("Mercedes", "C Serisi", 2023, 1200, "c200.jpg"),
    ("Audi", "A4", 2023, 1100, "audia6.png"),
    ("Ford", "Focus", 2022, 450, "o-ford-focus.png"),
    ("Hyundai", "i20", 2021, 400, "n-hyundai-i20.png"),
];

/// Insert the default showroom cars that are not in the catalog yet.
///
/// A car counts as present when one with the same brand and model exists, so
/// running the seed twice is harmless.
///
/// # Returns
///
/// The number of cars inserted.
#[instrument(skip(db))]
pub async fn seed_cars(db: &DatabaseConnection) -> Result<usize> {
    let mut inserted = 0;
    for (brand, model_name, year, price, image) in DEFAULT_CARS {
        if store::find_car_by_brand_and_model(db, brand, model_name)
            .await?
            .is_some()
        {
            debug!("{} {} already in catalog", brand, model_name);
            continue;
        }

        car::ActiveModel {
            brand: Set(brand.to_string()),
            model_name: Set(model_name.to_string()),
            year: Set(year),
            daily_price: Set(Decimal::from(price)),
            image_filename: Set(Some(image.to_string())),
            ..Default::default()
        }
        .insert(db)
        .await?;
        inserted += 1;
    }

    info!("Seeded {} default cars", inserted);
    Ok(inserted)
}
