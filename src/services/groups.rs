//! Class group service

use std::collections::HashMap;

use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        customer::CustomerShort,
        group::{CreateGroup, Group, GroupDetails, GroupFields, UpdateGroup},
    },
    repository::Repository,
    validation::{join_weekdays, parse_wall_clock, validate_time_range, validate_weekdays},
};

#[derive(Clone)]
pub struct GroupsService {
    repository: Repository,
}

impl GroupsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All groups with their members
    pub async fn list(&self) -> AppResult<Vec<GroupDetails>> {
        let groups = self.repository.groups.list().await?;
        let mut members: HashMap<i32, Vec<CustomerShort>> = HashMap::new();
        for customer in self.repository.customers.list_short_with_group().await? {
            if let Some(group_id) = customer.group_id {
                members.entry(group_id).or_default().push(customer);
            }
        }

        Ok(groups
            .into_iter()
            .map(|group| {
                let customers = members.remove(&group.id).unwrap_or_default();
                details(group, customers)
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> AppResult<GroupDetails> {
        let group = self.repository.groups.get_by_id(id).await?;
        let customers = self.repository.customers.list_by_group(id).await?;
        Ok(details(group, customers))
    }

    pub async fn create(&self, data: CreateGroup) -> AppResult<Group> {
        data.validate()?;
        let fields = build_fields(
            data.name,
            data.description,
            &data.weekdays,
            &data.start_time,
            &data.end_time,
            data.price,
            data.is_permanent,
        )?;
        let group = self.repository.groups.create(&fields).await?;
        tracing::info!("Created group {} ({})", group.id, group.name);
        Ok(group)
    }

    /// Apply a partial update; the merged result must satisfy the same rules
    /// as a newly created group
    pub async fn update(&self, id: i32, data: UpdateGroup) -> AppResult<Group> {
        data.validate()?;
        let current = self.repository.groups.get_by_id(id).await?;

        let start_time = data
            .start_time
            .unwrap_or_else(|| current.start_time.format("%H:%M:%S").to_string());
        let end_time = data
            .end_time
            .unwrap_or_else(|| current.end_time.format("%H:%M:%S").to_string());

        let fields = build_fields(
            data.name.unwrap_or(current.name),
            data.description.unwrap_or(current.description),
            data.weekdays.as_deref().unwrap_or(&current.weekdays),
            &start_time,
            &end_time,
            data.price.unwrap_or(current.price),
            data.is_permanent.unwrap_or(current.is_permanent),
        )?;
        self.repository.groups.update(id, &fields).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.groups.delete(id).await?;
        tracing::info!("Deleted group {}", id);
        Ok(())
    }
}

fn details(group: Group, customers: Vec<CustomerShort>) -> GroupDetails {
    // stored weekdays were validated on write
    let weekday_names = validate_weekdays(&group.weekdays)
        .unwrap_or_default()
        .iter()
        .map(|d| d.display_name().to_string())
        .collect();
    GroupDetails {
        group,
        weekday_names,
        customers,
    }
}

fn build_fields(
    name: String,
    description: Option<String>,
    weekdays: &str,
    start_time: &str,
    end_time: &str,
    price: Decimal,
    is_permanent: bool,
) -> AppResult<GroupFields> {
    let days = validate_weekdays(weekdays)?;
    let start_time = parse_wall_clock(start_time)?;
    let end_time = parse_wall_clock(end_time)?;
    validate_time_range(start_time, end_time)?;

    if price < Decimal::ZERO {
        return Err(AppError::Validation("Price must not be negative".to_string()));
    }

    Ok(GroupFields {
        name: name.trim().to_string(),
        description: description.filter(|d| !d.trim().is_empty()),
        weekdays: join_weekdays(&days),
        start_time,
        end_time,
        price,
        is_permanent,
    })
}
