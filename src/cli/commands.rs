pub mod create_admin;
pub mod initdb;
pub mod seed_cars;
pub mod serve;

pub use create_admin::create_admin;
pub use initdb::init_database;
pub use seed_cars::seed_cars;
pub use serve::serve;
