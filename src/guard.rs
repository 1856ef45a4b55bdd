use crate::{models::trip::Trip, session::Identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Permit,
    Deny,
}

/// Organizer or listed participant may see a trip; nobody else, and never
/// an anonymous visitor.
pub fn authorize_trip(identity: Option<&Identity>, trip: &Trip) -> Access {
    match identity {
        Some(user) if user.id == trip.organizer_id || trip.has_participant(&user.subject) => {
            Access::Permit
        }
        _ => Access::Deny,
    }
}

pub fn is_organizer(identity: Option<&Identity>, trip: &Trip) -> bool {
    identity.is_some_and(|user| user.id == trip.organizer_id)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::trip::TripStatus;

    fn trip(organizer_id: i64, participants: &[&str]) -> Trip {
        Trip {
            id: 1,
            title: "Trip".into(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            destination: "Wien".into(),
            organizer_id,
            status: TripStatus::Planning,
            latitude: None,
            longitude: None,
            participant_usernames: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn identity(subject: &str, id: i64) -> Identity {
        Identity {
            subject: subject.into(),
            id,
            role: None,
        }
    }

    #[test]
    fn organizer_is_permitted() {
        let user = identity("carol", 5);
        assert_eq!(authorize_trip(Some(&user), &trip(5, &[])), Access::Permit);
        assert!(is_organizer(Some(&user), &trip(5, &[])));
    }

    #[test]
    fn participant_is_permitted() {
        let user = identity("bob", 2);
        assert_eq!(
            authorize_trip(Some(&user), &trip(99, &["alice", "bob"])),
            Access::Permit
        );
        assert!(!is_organizer(Some(&user), &trip(99, &["bob"])));
    }

    #[test]
    fn strangers_and_anonymous_are_denied() {
        let user = identity("eve", 3);
        assert_eq!(authorize_trip(Some(&user), &trip(99, &["alice"])), Access::Deny);
        assert_eq!(authorize_trip(None, &trip(5, &["bob"])), Access::Deny);
    }
}
