//! The closed catalog of route groups.

use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

/// Logical route group. Every value except [`GroupId::Root`] maps to a child
/// scope mounted at `/{name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupId {
    Root,
    V1,
    V2,
    V3,
    Dev,
    Api,
    Docs,
}

impl GroupId {
    pub const ALL: [GroupId; 7] = [
        GroupId::Root,
        GroupId::V1,
        GroupId::V2,
        GroupId::V3,
        GroupId::Dev,
        GroupId::Api,
        GroupId::Docs,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            GroupId::Root => "root",
            GroupId::V1 => "v1",
            GroupId::V2 => "v2",
            GroupId::V3 => "v3",
            GroupId::Dev => "dev",
            GroupId::Api => "api",
            GroupId::Docs => "docs",
        }
    }

    /// Name of the child scope this group resolves to.
    ///
    /// `None` for the root group: its routes go straight onto the engine.
    pub const fn scope_name(self) -> Option<&'static str> {
        match self {
            GroupId::Root => None,
            other => Some(other.name()),
        }
    }

    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for GroupId {
    type Error = RegistryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        GroupId::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| RegistryError::InvalidGroup(value.to_string()))
    }
}

impl FromStr for GroupId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupId::ALL
            .into_iter()
            .find(|group| group.name() == s)
            .ok_or_else(|| RegistryError::InvalidGroup(s.to_string()))
    }
}

impl TryFrom<&str> for GroupId {
    type Error = RegistryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_scope_names_distinct() {
        let names: Vec<&str> = GroupId::ALL
            .iter()
            .filter_map(|group| group.scope_name())
            .collect();
        assert_eq!(names.len(), GroupId::ALL.len() - 1);
        assert!(names.iter().all(|name| !name.is_empty()));
        assert_eq!(names.iter().collect::<HashSet<_>>().len(), names.len());
    }

    #[test]
    fn test_root_is_sentinel() {
        assert_eq!(GroupId::Root.scope_name(), None);
        assert_eq!(GroupId::V1.scope_name(), Some("v1"));
    }

    #[test]
    fn test_ordinals_round_trip() {
        for group in GroupId::ALL {
            assert_eq!(GroupId::try_from(group.ordinal()).unwrap(), group);
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            GroupId::try_from(7u8),
            Err(RegistryError::InvalidGroup("7".into()))
        );
        assert!(GroupId::try_from(u8::MAX).is_err());
        assert_eq!(
            "v4".parse::<GroupId>(),
            Err(RegistryError::InvalidGroup("v4".into()))
        );
        assert!("".parse::<GroupId>().is_err());
        assert_eq!("docs".parse::<GroupId>().unwrap(), GroupId::Docs);
    }
}
