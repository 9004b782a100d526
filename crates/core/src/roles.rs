//! Role Hierarchy
//!
//! A total order over named roles. Each role maps to an integer [`Rank`]; a
//! user's effective rank is the highest rank among the roles they hold, or
//! [`Rank::NONE`] when they hold no recognised role.
//!
//! The table is an explicit value built once at start-up (either the built-in
//! [`RoleHierarchy::default`] or a YAML file) and shared by reference.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs,
    path::Path,
};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known role names.
pub mod names {
    /// Full system access.
    pub const SUPERADMIN: &str = "superadmin";
    /// Floor coordination; assigns pickers and manages users.
    pub const COORDINATOR: &str = "coordinator";
    /// Order administration.
    pub const ADMIN: &str = "admin";
    /// Returns administration.
    pub const ADMIN_RETUR: &str = "admin-retur";
    /// Finance.
    pub const FINANCE: &str = "finance";
    /// Picks order lines from the shelves.
    pub const PICKER: &str = "picker";
    /// Hands parcels to carriers.
    pub const OUTBOUND: &str = "outbound";
    /// Quality control for the ribbon line.
    pub const QC_RIBBON: &str = "qc-ribbon";
    /// Quality control for the online line.
    pub const QC_ONLINE: &str = "qc-online";
    /// Mobile operator for the ribbon line.
    pub const MB_RIBBON: &str = "mb-ribbon";
    /// Mobile operator for the online line.
    pub const MB_ONLINE: &str = "mb-online";
    /// Packing station.
    pub const PACKING: &str = "packing";
    /// Read-only access.
    pub const GUEST: &str = "guest";
}

/// Permission rank of a role. Higher outranks lower.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Rank(u8);

impl Rank {
    /// Rank of a user holding no recognised role.
    pub const NONE: Rank = Rank(0);

    /// Create a rank from its numeric level.
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    /// Numeric level.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// A named role and where it sits in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Unique role name.
    pub name: String,

    /// Position in the hierarchy.
    pub rank: Rank,

    /// Human readable description, used when seeding storage.
    #[serde(default)]
    pub description: String,
}

impl RoleDefinition {
    fn builtin(name: &str, rank: u8, description: &str) -> Self {
        Self {
            name: name.to_string(),
            rank: Rank::new(rank),
            description: description.to_string(),
        }
    }
}

/// Errors raised while building a hierarchy from configuration.
#[derive(Debug, Error)]
pub enum RoleHierarchyError {
    /// The file could not be read.
    #[error("failed to read role hierarchy file")]
    Io(#[from] std::io::Error),

    /// The YAML document is malformed.
    #[error("failed to parse role hierarchy")]
    Parse(#[from] serde_norway::Error),

    /// A role name appears more than once.
    #[error("role '{0}' is defined more than once")]
    DuplicateRole(String),

    /// A role was given rank 0, which is reserved for "no role".
    #[error("role '{0}' must have a rank above 0")]
    ZeroRank(String),

    /// A role has an empty name.
    #[error("role names cannot be empty")]
    EmptyName,
}

#[derive(Debug, Deserialize)]
struct RoleHierarchyFile {
    roles: Vec<RoleDefinition>,
}

/// Static mapping from role name to rank.
#[derive(Debug, Clone)]
pub struct RoleHierarchy {
    roles: Vec<RoleDefinition>,
    index: FxHashMap<String, usize>,
}

impl RoleHierarchy {
    /// Build a hierarchy from explicit definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is empty or repeated, or a rank is zero.
    pub fn new(roles: Vec<RoleDefinition>) -> Result<Self, RoleHierarchyError> {
        let mut index = FxHashMap::default();

        for (position, role) in roles.iter().enumerate() {
            if role.name.trim().is_empty() {
                return Err(RoleHierarchyError::EmptyName);
            }

            if role.rank == Rank::NONE {
                return Err(RoleHierarchyError::ZeroRank(role.name.clone()));
            }

            if index.insert(role.name.clone(), position).is_some() {
                return Err(RoleHierarchyError::DuplicateRole(role.name.clone()));
            }
        }

        Ok(Self { roles, index })
    }

    /// Parse a YAML document of the form `roles: [{name, rank, description}]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RoleHierarchyError> {
        let file: RoleHierarchyFile = serde_norway::from_str(yaml)?;

        Self::new(file.roles)
    }

    /// Load a YAML hierarchy from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_yaml_file(path: &Path) -> Result<Self, RoleHierarchyError> {
        let yaml = fs::read_to_string(path)?;

        Self::from_yaml_str(&yaml)
    }

    /// Rank of the named role, if the role is known.
    pub fn rank(&self, role: &str) -> Option<Rank> {
        self.definition(role).map(|definition| definition.rank)
    }

    /// Full definition of the named role.
    pub fn definition(&self, role: &str) -> Option<&RoleDefinition> {
        self.index
            .get(role)
            .and_then(|&position| self.roles.get(position))
    }

    /// Whether the role name is part of the hierarchy.
    pub fn contains(&self, role: &str) -> bool {
        self.index.contains_key(role)
    }

    /// Highest rank among the given role names; unknown names are ignored.
    pub fn effective_rank<S: AsRef<str>>(&self, roles: &[S]) -> Rank {
        roles
            .iter()
            .filter_map(|role| self.rank(role.as_ref()))
            .max()
            .unwrap_or(Rank::NONE)
    }

    /// Whether a holder of `actor` strictly outranks a holder of `target`.
    /// Both roles must be known.
    pub fn can_manage_role(&self, actor: &str, target: &str) -> bool {
        match (self.rank(actor), self.rank(target)) {
            (Some(actor), Some(target)) => actor > target,
            _ => false,
        }
    }

    /// All definitions in declaration order.
    pub fn definitions(&self) -> impl Iterator<Item = &RoleDefinition> {
        self.roles.iter()
    }
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        use names::{
            ADMIN, ADMIN_RETUR, COORDINATOR, FINANCE, GUEST, MB_ONLINE, MB_RIBBON, OUTBOUND,
            PACKING, PICKER, QC_ONLINE, QC_RIBBON, SUPERADMIN,
        };

        let roles = vec![
            RoleDefinition::builtin(SUPERADMIN, 9, "Super administrator with full system access"),
            RoleDefinition::builtin(COORDINATOR, 4, "Coordinator with high-level management access"),
            RoleDefinition::builtin(ADMIN, 3, "Administrator with mid-level management access"),
            RoleDefinition::builtin(ADMIN_RETUR, 3, "Returns administrator"),
            RoleDefinition::builtin(FINANCE, 3, "Finance with financial management access"),
            RoleDefinition::builtin(PICKER, 2, "Picker with basic operational access"),
            RoleDefinition::builtin(OUTBOUND, 2, "Outbound with shipping management access"),
            RoleDefinition::builtin(QC_RIBBON, 2, "Quality control for ribbon products"),
            RoleDefinition::builtin(QC_ONLINE, 2, "Quality control for online products"),
            RoleDefinition::builtin(MB_RIBBON, 2, "Mobile operator for ribbon products"),
            RoleDefinition::builtin(MB_ONLINE, 2, "Mobile operator for online products"),
            RoleDefinition::builtin(PACKING, 2, "Packing station operator"),
            RoleDefinition::builtin(GUEST, 1, "Guest with limited access"),
        ];

        let index = roles
            .iter()
            .enumerate()
            .map(|(position, role)| (role.name.clone(), position))
            .collect();

        Self { roles, index }
    }
}
