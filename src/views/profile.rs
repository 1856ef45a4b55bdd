use askama::Template;
use tracing::warn;

use super::{warning, ViewContext};
use crate::error::AppError;

pub const PLACEHOLDER_PICTURE: &str = "/static/images/portrait-placeholder.svg";

#[derive(Template)]
#[template(path = "views/profile.html")]
struct ProfileTemplate {
    username: String,
    email: String,
    show_account_error: bool,
    picture_src: String,
    description: String,
}

pub async fn load(ctx: &ViewContext<'_>) -> Result<String, AppError> {
    let Some(user) = ctx.session.current_user() else {
        return warning("Please log in to view your profile.");
    };

    let (account, picture, description) = tokio::join!(
        ctx.api.user(ctx.session, &user.subject),
        ctx.profiles.picture(&user.subject),
        ctx.profiles.description(&user.subject),
    );
    let (email, show_account_error) = match account {
        Ok(account) => (account.email, false),
        Err(err) => {
            warn!(user = %user.subject, "failed to load account details: {err}");
            (String::new(), true)
        }
    };

    let template = ProfileTemplate {
        username: user.subject,
        email,
        show_account_error,
        picture_src: picture.unwrap_or_else(|| PLACEHOLDER_PICTURE.to_string()),
        description: description.unwrap_or_default(),
    };
    Ok(template.render()?)
}
