//! Club roster used as the favourites catalog

use serde::{Deserialize, Serialize};
use sitekit_select::Catalog;

/// One squad member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Catalog id (also the shirt lookup key on the page)
    pub id: u32,
    /// Display name
    pub name: String,
    /// Playing position
    pub position: String,
    /// Shirt number
    pub number: u32,
    /// Avatar identity
    pub initials: String,
    /// Avatar background
    pub color: String,
}

impl Member {
    /// Create member
    #[must_use]
    pub fn new(
        id: u32,
        name: impl Into<String>,
        position: impl Into<String>,
        initials: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position: position.into(),
            number: id,
            initials: initials.into(),
            color: color.into(),
        }
    }

    /// Set a shirt number different from the id
    #[inline]
    #[must_use]
    pub fn with_number(mut self, number: u32) -> Self {
        self.number = number;
        self
    }
}

/// Favourites catalog keyed by member id
pub type Roster = Catalog<u32, Member>;

/// Build a roster from members, keyed by their ids
#[must_use]
pub fn roster(members: impl IntoIterator<Item = Member>) -> Roster {
    members.into_iter().map(|m| (m.id, m)).collect()
}

/// The first-team squad shown on the club site
#[must_use]
pub fn club_squad() -> Vec<Member> {
    vec![
        Member::new(7, "Tawanda Moyo", "Forward", "TM", "#0b6623"),
        Member::new(4, "Brian Ncube", "Midfield", "BN", "#0a8b4d"),
        Member::new(1, "Peter Mlambo", "Goalkeeper", "PM", "#0e6b3a"),
        Member::new(11, "Samuel Dube", "Defence", "SD", "#0f8a3c"),
        Member::new(9, "Kevin Sibanda", "Forward", "KS", "#127a37"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_keeps_squad_order() {
        let roster = roster(club_squad());
        let ids: Vec<u32> = roster.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, [7, 4, 1, 11, 9]);
        assert_eq!(roster.get(&11).unwrap().name, "Samuel Dube");
    }

    #[test]
    fn roster_deserializes_from_toml() {
        let text = r##"
            id = 10
            name = "Farai Chuma"
            position = "Midfield"
            number = 22
            initials = "FC"
            color = "#0b6623"
        "##;
        let member: Member = toml::from_str(text).unwrap();
        assert_eq!(
            member,
            Member::new(10, "Farai Chuma", "Midfield", "FC", "#0b6623").with_number(22)
        );
    }
}
