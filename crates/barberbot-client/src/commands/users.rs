//! End-user registry commands.

use barberbot_booking::BookingError;

use crate::app::App;
use crate::error::ClientResult;
use crate::render;

pub async fn list(app: &App) -> ClientResult<()> {
    let store = app.store()?;
    let users = app
        .runner
        .run("users", move || async move { store.users().await.map_err(BookingError::from) })
        .await?;
    app.emit(users.as_slice(), render::users)
}

/// Registers a phone number; registering it again is a no-op.
pub async fn register(app: &App, phone: &str) -> ClientResult<()> {
    let store = app.store()?;
    let user = app
        .runner
        .run("register-user", move || async move {
            store.register_user(phone).await.map_err(BookingError::from)
        })
        .await?;
    app.emit(&user, render::user)
}
