//! Customer service: records, derived age and billing state

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use validator::{Validate, ValidateEmail};

use crate::{
    accrual::{self, Accrual},
    error::{AppError, AppResult},
    models::{
        customer::{CreateCustomer, Customer, CustomerDetails, CustomerFields, UpdateCustomer},
        group::GroupShort,
    },
    repository::Repository,
    validation::calculate_age,
};

#[derive(Clone)]
pub struct CustomersService {
    repository: Repository,
}

impl CustomersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Every customer with age and billing state at `as_of`
    pub async fn list(&self, as_of: DateTime<Utc>) -> AppResult<Vec<CustomerDetails>> {
        let customers = self.repository.customers.list().await?;
        self.with_details(customers, as_of).await
    }

    /// Customers whose attendance since the last payment reached the threshold
    pub async fn overdue(&self, as_of: DateTime<Utc>) -> AppResult<Vec<CustomerDetails>> {
        let mut customers = self.list(as_of).await?;
        customers.retain(|c| c.overdue);
        Ok(customers)
    }

    pub async fn get(&self, id: i32, as_of: DateTime<Utc>) -> AppResult<CustomerDetails> {
        let customer = self.repository.customers.get_by_id(id).await?;
        let (from, to) = accrual::AccrualWindow::new(customer.last_payment_date, as_of).date_bounds();
        let attendances = if from <= to {
            self.repository
                .attendances
                .list_present_for_customer(id, from, to)
                .await?
        } else {
            Vec::new()
        };
        let accrual = accrual::accrue(&customer, &attendances, as_of);

        let group = match customer.group_id {
            Some(group_id) => Some(GroupShort::from(
                &self.repository.groups.get_by_id(group_id).await?,
            )),
            None => None,
        };

        Ok(details(customer, group, accrual, as_of))
    }

    pub async fn create(&self, data: CreateCustomer) -> AppResult<Customer> {
        data.validate()?;
        let fields = CustomerFields::from(data);
        self.check_fields(&fields).await?;

        let customer = self.repository.customers.create(&fields).await?;
        tracing::info!("Created customer {} ({})", customer.id, customer.full_name());
        Ok(customer)
    }

    pub async fn update(&self, id: i32, data: UpdateCustomer) -> AppResult<Customer> {
        data.validate()?;
        if let Some(Some(email)) = &data.email {
            if !email.trim().is_empty() && !email.validate_email() {
                return Err(AppError::Validation("Invalid email format".to_string()));
            }
        }

        let current = self.repository.customers.get_by_id(id).await?;
        let mut fields = CustomerFields::merged(&current, &data);
        fields.email = fields.email.filter(|e| !e.trim().is_empty());
        self.check_fields(&fields).await?;

        self.repository.customers.update(id, &fields).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.customers.delete(id).await?;
        tracing::info!("Deleted customer {} and their attendance", id);
        Ok(())
    }

    /// Record a payment made now: the billing window restarts, attendance
    /// history is kept
    pub async fn record_payment(&self, id: i32) -> AppResult<CustomerDetails> {
        let paid_at = Utc::now();
        let customer = self.repository.customers.record_payment(id, paid_at).await?;
        tracing::info!(
            "Recorded payment for customer {} at {}",
            customer.id,
            customer.last_payment_date
        );
        self.get(customer.id, paid_at.max(customer.last_payment_date)).await
    }

    async fn check_fields(&self, fields: &CustomerFields) -> AppResult<()> {
        check_date_of_birth(fields.date_of_birth, Utc::now().date_naive())?;
        if let Some(group_id) = fields.group_id {
            if !self.repository.groups.exists(group_id).await? {
                return Err(AppError::Validation(format!("Group {} does not exist", group_id)));
            }
        }
        Ok(())
    }

    /// Bulk path: one attendance query covering every open window
    async fn with_details(
        &self,
        customers: Vec<Customer>,
        as_of: DateTime<Utc>,
    ) -> AppResult<Vec<CustomerDetails>> {
        let attendances = match accrual::bulk_date_bounds(&customers, as_of) {
            Some((from, to)) => {
                self.repository
                    .attendances
                    .list_present_between(from, to)
                    .await?
            }
            None => Vec::new(),
        };
        let accruals = accrual::accrue_many(&customers, &attendances, as_of);

        let groups: HashMap<i32, GroupShort> = self
            .repository
            .groups
            .list()
            .await?
            .iter()
            .map(|g| (g.id, GroupShort::from(g)))
            .collect();

        Ok(customers
            .into_iter()
            .map(|customer| {
                let accrual = accruals.get(&customer.id).copied().unwrap_or_default();
                let group = customer.group_id.and_then(|id| groups.get(&id).cloned());
                details(customer, group, accrual, as_of)
            })
            .collect())
    }
}

fn check_date_of_birth(date_of_birth: NaiveDate, today: NaiveDate) -> AppResult<()> {
    if date_of_birth > today {
        return Err(AppError::Validation(
            "Date of birth cannot be in the future".to_string(),
        ));
    }
    Ok(())
}

fn details(
    customer: Customer,
    group: Option<GroupShort>,
    accrual: Accrual,
    as_of: DateTime<Utc>,
) -> CustomerDetails {
    CustomerDetails {
        age: calculate_age(customer.date_of_birth, as_of.date_naive()),
        group,
        attendance_count: accrual.attendance_count,
        overdue: accrual.overdue,
        customer,
    }
}
