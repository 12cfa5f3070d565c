//! Column sets for the business, user and category lists.

use serde_json::Value;

use crate::format::{date, date_time, short_id};
use crate::models::{Business, Category, CategoryKind, User};
use crate::table::{Align, Column};

/// Columns of the business list.
#[must_use]
pub fn business_columns() -> Vec<Column<Business>> {
    vec![
        Column::new("name", "Business").sortable(),
        Column::new("status", "Status")
            .sortable()
            .render(|_, business: &Business| business.status.label().to_owned()),
        Column::new("address", "Address")
            .hide_on_mobile()
            .hide_on_tablet()
            .render(render_business_address),
        Column::new("userId", "Owner")
            .hide_on_mobile()
            .render(|_, business: &Business| format!("ID: {}", short_id(business.user_id.as_inner()))),
        Column::new("open", "Open")
            .sortable()
            .hide_on_mobile()
            .render(|_, business: &Business| if business.open { "Open" } else { "Closed" }.to_owned()),
        Column::new("rating", "Rating")
            .sortable()
            .hide_on_mobile()
            .hide_on_tablet()
            .align(Align::Right)
            .render(|_, business: &Business| {
                business
                    .rating
                    .map_or_else(|| "No rating".to_owned(), |rating| format!("{rating:.1}"))
            }),
        Column::new("createdAt", "Created")
            .sortable()
            .hide_on_mobile()
            .render(|_, business: &Business| date(business.created_at)),
    ]
}

/// Address plus phone, when known.
fn render_business_address(_: Option<&Value>, business: &Business) -> String {
    let address = business.address.as_deref().unwrap_or_default();
    match business.phone.as_deref() {
        Some(phone) if !phone.is_empty() => format!("{address} ({phone})"),
        Some(_) | None => address.to_owned(),
    }
}

/// Columns of the client user list.
#[must_use]
pub fn user_columns() -> Vec<Column<User>> {
    vec![
        Column::new("fullName", "User").sortable(),
        Column::new("email", "Email")
            .sortable()
            .hide_on_mobile()
            .hide_on_tablet()
            .render(|_, user: &User| match user.phone.as_deref() {
                Some(phone) if !phone.is_empty() => format!("{} ({phone})", user.email),
                Some(_) | None => user.email.clone(),
            }),
        Column::new("role", "Role")
            .sortable()
            .hide_on_mobile()
            .render(|_, user: &User| user.role.label().to_owned()),
        Column::new("subscriptions", "Subscriptions")
            .hide_on_mobile()
            .align(Align::Right)
            .render(|_, user: &User| {
                format!(
                    "{} total, {} active",
                    user.subscriptions.len(),
                    user.active_subscriptions()
                )
            }),
        Column::new("createdAt", "Registered")
            .sortable()
            .hide_on_mobile()
            .render(|_, user: &User| date_time(user.created_at)),
    ]
}

/// Columns of a category list.
#[must_use]
pub fn category_columns<K: CategoryKind>() -> Vec<Column<Category<K>>> {
    vec![
        Column::new("id", "ID").hide_on_mobile(),
        Column::new("name", "Name").sortable(),
        Column::new("image", "Image")
            .hide_on_mobile()
            .hide_on_tablet()
            .render(|image, _| {
                if image.is_some_and(|value| !value.is_null()) {
                    "yes".to_owned()
                } else {
                    "no".to_owned()
                }
            }),
        Column::new("createdAt", "Created")
            .sortable()
            .hide_on_mobile()
            .render(|_, category: &Category<K>| date(category.created_at)),
        Column::new("updatedAt", "Updated")
            .sortable()
            .hide_on_mobile()
            .hide_on_tablet()
            .render(|_, category: &Category<K>| date(category.updated_at)),
    ]
}
