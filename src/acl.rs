//! Permission checks over a user's fine-grained capability set.

use crate::models::UserProfile;

/// Needed
///
/// A permission requirement: nothing, one permission, or several permissions that
/// must all be held.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Needed<'a> {
    #[default]
    Nothing,
    One(&'a str),
    All(Vec<&'a str>),
}

impl<'a> Needed<'a> {
    fn as_slice(&self) -> &[&'a str] {
        match self {
            Needed::Nothing => &[],
            // An empty permission name is no requirement at all.
            Needed::One("") => &[],
            Needed::One(p) => std::slice::from_ref(p),
            Needed::All(list) => list,
        }
    }
}

impl<'a> From<&'a str> for Needed<'a> {
    fn from(p: &'a str) -> Self {
        Needed::One(p)
    }
}

impl<'a> From<&'a String> for Needed<'a> {
    fn from(p: &'a String) -> Self {
        Needed::One(p.as_str())
    }
}

impl<'a> From<Option<&'a str>> for Needed<'a> {
    fn from(p: Option<&'a str>) -> Self {
        p.map_or(Needed::Nothing, Needed::One)
    }
}

impl<'a> From<&'a [&'a str]> for Needed<'a> {
    fn from(list: &'a [&'a str]) -> Self {
        Needed::All(list.to_vec())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for Needed<'a> {
    fn from(list: [&'a str; N]) -> Self {
        Needed::All(list.to_vec())
    }
}

impl<'a> From<Vec<&'a str>> for Needed<'a> {
    fn from(list: Vec<&'a str>) -> Self {
        Needed::All(list)
    }
}

impl<'a> From<&'a [String]> for Needed<'a> {
    fn from(list: &'a [String]) -> Self {
        Needed::All(list.iter().map(String::as_str).collect())
    }
}

impl<'a> From<&'a Vec<String>> for Needed<'a> {
    fn from(list: &'a Vec<String>) -> Self {
        Needed::All(list.iter().map(String::as_str).collect())
    }
}

/// can
///
/// Decides whether `user` satisfies `needed`.
///
/// - No user never passes, not even an empty requirement.
/// - An empty requirement passes for any user.
/// - Otherwise every listed permission must be present (case-sensitive).
pub fn can<'a>(user: Option<&UserProfile>, needed: impl Into<Needed<'a>>) -> bool {
    let Some(user) = user else {
        return false;
    };
    let needed = needed.into();
    needed
        .as_slice()
        .iter()
        .all(|p| user.permissions.contains(*p))
}
