use askama::Template;
use tracing::warn;

use super::{notice, warning, ViewContext};
use crate::{error::AppError, models::user::Buddy};

#[derive(Template)]
#[template(path = "views/buddies.html")]
struct BuddiesTemplate {
    pending: Vec<BuddyRow>,
    sent: Vec<BuddyRow>,
    buddies: Vec<BuddyRow>,
}

struct BuddyRow {
    id: i64,
    username: String,
    email: String,
}

impl From<Buddy> for BuddyRow {
    fn from(buddy: Buddy) -> Self {
        Self {
            id: buddy.id,
            username: buddy.username,
            email: buddy.email,
        }
    }
}

pub async fn load(ctx: &ViewContext<'_>) -> Result<String, AppError> {
    let Some(user) = ctx.session.current_user() else {
        return warning("Please log in to view your buddies.");
    };

    let (buddies, pending, sent) = tokio::join!(
        ctx.api.buddies(ctx.session, &user.subject),
        ctx.api.pending_buddy_requests(ctx.session, &user.subject),
        ctx.api.sent_buddy_requests(ctx.session, &user.subject),
    );
    let (buddies, pending, sent) = match (buddies, pending, sent) {
        (Ok(buddies), Ok(pending), Ok(sent)) => (buddies, pending, sent),
        (buddies, pending, sent) => {
            let err = [buddies.err(), pending.err(), sent.err()]
                .into_iter()
                .flatten()
                .next();
            if let Some(err) = err {
                warn!(user = %user.subject, "failed to load buddies: {err}");
            }
            return notice("danger", "Failed to load buddies. Please try again later.");
        }
    };

    let template = BuddiesTemplate {
        pending: pending.into_iter().map(BuddyRow::from).collect(),
        sent: sent.into_iter().map(BuddyRow::from).collect(),
        buddies: buddies.into_iter().map(BuddyRow::from).collect(),
    };
    Ok(template.render()?)
}
