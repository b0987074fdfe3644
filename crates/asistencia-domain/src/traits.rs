//! Trait definitions for external interactions
//!
//! Member persistence lives outside this crate; intake code reaches it only
//! through these traits.

use crate::{Member, Rut};

/// Trait for looking up and registering members by RUT
///
/// Lookups compare cleaned forms, so `12.345.678-5` and `123456785` find
/// the same member.
pub trait MemberDirectory {
    /// Error type for directory operations
    type Error;

    /// Find the member registered under a RUT
    fn find_by_rut(&self, rut: &Rut) -> Result<Option<Member>, Self::Error>;

    /// Register a member
    fn insert(&mut self, member: Member) -> Result<(), Self::Error>;

    /// Number of registered members
    fn len(&self) -> Result<usize, Self::Error>;

    /// Whether no members are registered
    fn is_empty(&self) -> Result<bool, Self::Error> {
        Ok(self.len()? == 0)
    }
}
