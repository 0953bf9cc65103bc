use std::str::FromStr;

use super::EntryKind;
use crate::error::FilterSpecError;

/// Set of entry kinds accepted by `-type`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TypeSet {
    pub files: bool,
    pub dirs: bool,
    pub symlinks: bool,
}

impl TypeSet {
    pub fn contains(&self, kind: EntryKind) -> bool {
        match kind {
            EntryKind::File => self.files,
            EntryKind::Directory => self.dirs,
            EntryKind::Symlink => self.symlinks,
            EntryKind::Other => false,
        }
    }
}

impl FromStr for TypeSet {
    type Err = FilterSpecError;

    /// Accepts a single letter or a comma-separated list such as `f,d`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = Self::default();
        for letter in s.split(',') {
            let slot = match letter.trim() {
                "f" => &mut set.files,
                "d" => &mut set.dirs,
                "l" => &mut set.symlinks,
                _ => return Err(FilterSpecError::UnknownType(s.to_owned())),
            };
            if *slot {
                return Err(FilterSpecError::DuplicateType(s.to_owned()));
            }
            *slot = true;
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letters() {
        let files: TypeSet = "f".parse().unwrap();
        assert!(files.contains(EntryKind::File));
        assert!(!files.contains(EntryKind::Directory));
        assert!(!files.contains(EntryKind::Symlink));

        let links: TypeSet = "l".parse().unwrap();
        assert!(links.contains(EntryKind::Symlink));
        assert!(!links.contains(EntryKind::File));
    }

    #[test]
    fn comma_list_forms_a_union() {
        let set: TypeSet = "f,d".parse().unwrap();
        assert!(set.contains(EntryKind::File));
        assert!(set.contains(EntryKind::Directory));
        assert!(!set.contains(EntryKind::Symlink));
        assert!(!set.contains(EntryKind::Other));
    }

    #[test]
    fn rejects_unknown_and_repeated_letters() {
        assert_eq!(
            "x".parse::<TypeSet>(),
            Err(FilterSpecError::UnknownType("x".to_owned()))
        );
        assert_eq!(
            "fd".parse::<TypeSet>(),
            Err(FilterSpecError::UnknownType("fd".to_owned()))
        );
        assert_eq!(
            "".parse::<TypeSet>(),
            Err(FilterSpecError::UnknownType(String::new()))
        );
        assert_eq!(
            "f,f".parse::<TypeSet>(),
            Err(FilterSpecError::DuplicateType("f,f".to_owned()))
        );
    }
}
