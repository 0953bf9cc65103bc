use crate::core::pattern::CompiledPatterns;
use crate::error::FilterSpecError;
use crate::models::{Entry, EntryKind, SizeFilter, TypeSet};

/// Raw filter settings as collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Case-sensitive glob on the base name
    pub name: Option<String>,
    /// Case-insensitive glob on the base name
    pub iname: Option<String>,
    /// `f`, `d`, `l` or a comma-separated combination
    pub types: Option<String>,
    pub min_depth: Option<usize>,
    /// Maximum depth to report and descend (None means unlimited)
    pub max_depth: Option<usize>,
    /// `[+|-]N[b|k|m|g|t]`
    pub size: Option<String>,
    pub empty: bool,
    pub ignore_hidden: bool,
    /// Base-name globs that are never reported
    pub exclude: Vec<String>,
    /// Base-name globs for directories that are never descended into
    pub exclude_dir: Vec<String>,
    pub follow_symlinks: bool,
}

/// Validated, pre-compiled filter. Built once and shared read-only by the walk.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    pub name: Option<CompiledPatterns>,
    pub types: Option<TypeSet>,
    pub min_depth: usize,
    pub max_depth: Option<usize>,
    pub size: Option<SizeFilter>,
    pub empty: bool,
    pub ignore_hidden: bool,
    pub exclude: CompiledPatterns,
    pub exclude_dir: CompiledPatterns,
    pub follow_symlinks: bool,
}

impl FilterSpec {
    pub fn new(options: &FilterOptions) -> Result<Self, FilterSpecError> {
        let name = match (&options.name, &options.iname) {
            (Some(_), Some(_)) => return Err(FilterSpecError::ConflictingNamePatterns),
            (Some(pattern), None) => Some(CompiledPatterns::new(&[pattern])?),
            (None, Some(pattern)) => Some(CompiledPatterns::case_insensitive(&[pattern])?),
            (None, None) => None,
        };

        Ok(Self {
            name,
            types: options.types.as_deref().map(str::parse::<TypeSet>).transpose()?,
            min_depth: options.min_depth.unwrap_or(0),
            max_depth: options.max_depth,
            size: options.size.as_deref().map(str::parse::<SizeFilter>).transpose()?,
            empty: options.empty,
            ignore_hidden: options.ignore_hidden,
            exclude: CompiledPatterns::new(options.exclude.as_slice())?,
            exclude_dir: CompiledPatterns::new(options.exclude_dir.as_slice())?,
            follow_symlinks: options.follow_symlinks,
        })
    }
}

/// Whether `entry` satisfies every active criterion of `spec`.
pub fn matches(entry: &Entry, spec: &FilterSpec) -> bool {
    // Roots are exempt from the name-based exclusions.
    if !entry.is_root {
        if spec.ignore_hidden && entry.is_hidden() {
            return false;
        }
        if spec.exclude.matches(&entry.name) {
            return false;
        }
    }

    if entry.depth < spec.min_depth {
        return false;
    }
    if let Some(max) = spec.max_depth
        && entry.depth > max
    {
        return false;
    }

    if let Some(name) = &spec.name
        && !name.matches(&entry.name)
    {
        return false;
    }

    if let Some(types) = &spec.types
        && !types.contains(entry.kind)
    {
        return false;
    }

    if let Some(size) = &spec.size
        && !(entry.kind == EntryKind::File && size.accepts(entry.size))
    {
        return false;
    }

    if spec.empty && !is_empty(entry) {
        return false;
    }

    true
}

fn is_empty(entry: &Entry) -> bool {
    match entry.kind {
        EntryKind::File => entry.size == 0,
        EntryKind::Directory => entry.is_empty_dir == Some(true),
        EntryKind::Symlink | EntryKind::Other => false,
    }
}

/// Whether the walk must not descend into `entry`. Says nothing about
/// whether the entry itself is reported.
pub fn should_prune(entry: &Entry, spec: &FilterSpec) -> bool {
    // Children of a directory at max depth would all be out of range.
    if let Some(max) = spec.max_depth
        && entry.depth >= max
    {
        return true;
    }

    if entry.is_root {
        return false;
    }

    spec.exclude_dir.matches(&entry.name) || (spec.ignore_hidden && entry.is_hidden())
}
