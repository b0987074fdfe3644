//! Member module - the record a formatted RUT ends up in

use crate::traits::MemberDirectory;
use crate::{Rut, RutError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;

/// A registered member (socia)
///
/// Only the RUT is required. Every other field defaults to an empty string
/// so partially filled imports deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Formatted RUT, e.g. `12.345.678-5`
    pub rut: String,

    /// Given names
    #[serde(default)]
    pub nombres: String,

    /// Paternal surname
    #[serde(default)]
    pub apellido_paterno: String,

    /// Maternal surname
    #[serde(default)]
    pub apellido_materno: String,

    /// Contact email
    #[serde(default)]
    pub email: String,

    /// Membership status ("Activo", "Inactivo", ...)
    #[serde(default = "default_estado")]
    pub estado: String,
}

fn default_estado() -> String {
    "Activo".to_string()
}

impl Member {
    /// Create a member from a valid RUT, storing its formatted form
    pub fn new(rut: &Rut) -> Self {
        Self {
            rut: rut.formatted(),
            estado: default_estado(),
            ..Self::default()
        }
    }

    /// Set the name fields
    pub fn with_names(
        mut self,
        nombres: impl Into<String>,
        apellido_paterno: impl Into<String>,
        apellido_materno: impl Into<String>,
    ) -> Self {
        self.nombres = nombres.into();
        self.apellido_paterno = apellido_paterno.into();
        self.apellido_materno = apellido_materno.into();
        self
    }

    /// Full name, skipping empty parts
    pub fn full_name(&self) -> String {
        [&self.nombres, &self.apellido_paterno, &self.apellido_materno]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse the stored RUT back into a value
    pub fn parsed_rut(&self) -> Result<Rut, RutError> {
        Rut::parse(&self.rut)
    }

    /// Prepare an imported record for storage under `rut`
    ///
    /// Replaces the cell text with the formatted RUT and fills a blank
    /// `estado` with "Activo". Name and email fields are kept as given.
    pub fn registered(mut self, rut: &Rut) -> Self {
        self.rut = rut.formatted();
        if self.estado.trim().is_empty() {
            self.estado = default_estado();
        }
        self
    }
}

/// A bare RUT cell, with every other field blank
impl From<&str> for Member {
    fn from(rut: &str) -> Self {
        Self {
            rut: rut.to_string(),
            ..Self::default()
        }
    }
}

/// Directory held entirely in memory, keyed by cleaned RUT
///
/// Backs the interactive check-in session and tests.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    members: HashMap<String, Member>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over registered members in no particular order
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }
}

impl MemberDirectory for InMemoryDirectory {
    type Error = Infallible;

    fn find_by_rut(&self, rut: &Rut) -> Result<Option<Member>, Self::Error> {
        Ok(self.members.get(&rut.cleaned()).cloned())
    }

    fn insert(&mut self, member: Member) -> Result<(), Self::Error> {
        let key = crate::clean(&member.rut);
        self.members.insert(key, member);
        Ok(())
    }

    fn len(&self) -> Result<usize, Self::Error> {
        Ok(self.members.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_member_stores_formatted_rut() {
        let rut = Rut::parse("123456785").unwrap();
        let member = Member::new(&rut);
        assert_eq!(member.rut, "12.345.678-5");
        assert_eq!(member.estado, "Activo");
        assert_eq!(member.parsed_rut().unwrap(), rut);
    }

    #[test]
    fn test_full_name_skips_empty_parts() {
        let rut = Rut::parse("11111111-1").unwrap();
        let member = Member::new(&rut).with_names("María José", "", "González");
        assert_eq!(member.full_name(), "María José González");
        assert_eq!(Member::new(&rut).full_name(), "");
    }

    #[test]
    fn test_registered_keeps_names_and_defaults_estado() {
        let rut = Rut::parse("12345678-5").unwrap();
        let row = Member {
            rut: " 123456785 ".to_string(),
            email: "ana@example.cl".to_string(),
            ..Member::default()
        }
        .with_names("Ana", "Pérez", "Soto");

        let member = row.registered(&rut);
        assert_eq!(member.rut, "12.345.678-5");
        assert_eq!(member.full_name(), "Ana Pérez Soto");
        assert_eq!(member.email, "ana@example.cl");
        assert_eq!(member.estado, "Activo");

        let inactive = Member {
            estado: "Inactivo".to_string(),
            ..Member::from("123456785")
        };
        assert_eq!(inactive.registered(&rut).estado, "Inactivo");
    }

    #[test]
    fn test_from_cell() {
        let member = Member::from("12.345.678-5");
        assert_eq!(member.rut, "12.345.678-5");
        assert_eq!(member.full_name(), "");
        assert_eq!(member.estado, "");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let member: Member = serde_json::from_str(r#"{"rut":"12.345.678-5"}"#).unwrap();
        assert_eq!(member.nombres, "");
        assert_eq!(member.apellido_materno, "");
        assert_eq!(member.estado, "Activo");
    }

    #[test]
    fn test_directory_lookup_ignores_punctuation() {
        let mut directory = InMemoryDirectory::new();
        let rut = Rut::parse("12.345.678-5").unwrap();
        directory.insert(Member::new(&rut)).unwrap();

        let lookup = Rut::parse("12345678 5").unwrap();
        let found = directory.find_by_rut(&lookup).unwrap();
        assert_eq!(found.map(|m| m.rut), Some("12.345.678-5".to_string()));
        assert_eq!(directory.len().unwrap(), 1);
        assert!(!directory.is_empty().unwrap());
    }

    #[test]
    fn test_directory_miss() {
        let directory = InMemoryDirectory::new();
        let rut = Rut::parse("11111111-1").unwrap();
        assert!(directory.find_by_rut(&rut).unwrap().is_none());
        assert!(directory.is_empty().unwrap());
    }
}
