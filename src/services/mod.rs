//! Business logic services

pub mod attendances;
pub mod auth;
pub mod customers;
pub mod groups;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub customers: customers::CustomersService,
    pub groups: groups::GroupsService,
    pub attendances: attendances::AttendancesService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            customers: customers::CustomersService::new(repository.clone()),
            groups: groups::GroupsService::new(repository.clone()),
            attendances: attendances::AttendancesService::new(repository.clone()),
            repository,
        }
    }
}
