//! Repository layer for database operations

pub mod attendances;
pub mod customers;
pub mod groups;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub customers: customers::CustomersRepository,
    pub groups: groups::GroupsRepository,
    pub attendances: attendances::AttendancesRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            customers: customers::CustomersRepository::new(pool.clone()),
            groups: groups::GroupsRepository::new(pool.clone()),
            attendances: attendances::AttendancesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Cheap connectivity probe used by the readiness endpoint
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
