//! Read-only commands: businesses, details, services, staff, locations.

use barberbot_core::Category;

use crate::app::App;
use crate::error::ClientResult;
use crate::render;

pub async fn businesses(app: &App, category: Category, min_rating: Option<f32>) -> ClientResult<()> {
    let overview = app
        .runner
        .run("businesses", move || async move {
            Ok(app.catalog.overview(category, min_rating).await)
        })
        .await?;
    app.emit(overview.as_slice(), render::overview)
}

pub async fn info(app: &App, business: &str) -> ClientResult<()> {
    let business = app.catalog.business(business)?;
    let details = app
        .runner
        .run("info", move || app.catalog.details(business))
        .await?;
    app.emit(&details, render::details)
}

pub async fn services(app: &App, business: &str) -> ClientResult<()> {
    let business = app.catalog.business(business)?;
    let services = app
        .runner
        .run("services", move || app.catalog.services(business))
        .await?;
    app.emit(services.as_slice(), render::services)
}

pub async fn resources(app: &App, business: &str, location: Option<&str>) -> ClientResult<()> {
    let business = app.catalog.business(business)?;
    let resources = app
        .runner
        .run("resources", move || app.catalog.resources(business, location))
        .await?;
    app.emit(resources.as_slice(), render::resources)
}

pub async fn locations(app: &App, business: &str) -> ClientResult<()> {
    let business = app.catalog.business(business)?;
    let locations = app
        .runner
        .run("locations", move || app.catalog.locations(business))
        .await?;
    app.emit(locations.as_slice(), render::locations)
}
