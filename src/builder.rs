//! Typestate builder for constructing [`DigitalLink`] records.
//!
//! This module provides a builder that uses phantom types to enforce at
//! compile-time that the required components are set before `build()`.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::error::BuilderError;
use crate::link::DigitalLink;
use crate::ordering::KeyQualifierOrder;

/// Marker: no components set yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

/// Marker: the domain has been set.
#[derive(Debug, Clone, Copy, Default)]
pub struct HasDomain;

/// Marker: domain and identifier are set, ready to build.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ready;

/// A typestate builder for [`DigitalLink`] records.
///
/// The builder enforces at compile-time that the domain is set first and the
/// identifier second; key qualifiers, attributes and the ordering policy are
/// optional and only available once both are present.
///
/// # Examples
///
/// ```
/// use digital_link::DigitalLinkBuilder;
///
/// let dl = DigitalLinkBuilder::new()
///     .domain("https://gs1.evrythng.com")
///     .identifier("01", "9780345418913")
///     .key_qualifier("10", "38737643")
///     .key_qualifier("21", "58943")
///     .attribute("15", "230911")
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     dl.to_web_uri_string().unwrap(),
///     "https://gs1.evrythng.com/01/9780345418913/10/38737643/21/58943?15=230911"
/// );
/// ```
///
/// # Compile-Time Safety
///
/// Calling methods out of order is a compile error:
///
/// ```compile_fail
/// use digital_link::DigitalLinkBuilder;
///
/// // Error: cannot set the identifier before the domain
/// let builder = DigitalLinkBuilder::new()
///     .identifier("01", "9780345418913");  // Compile error!
/// ```
///
/// ```compile_fail
/// use digital_link::DigitalLinkBuilder;
///
/// // Error: cannot build without an identifier
/// let dl = DigitalLinkBuilder::new()
///     .domain("https://example.com")
///     .build();  // Compile error!
/// ```
#[derive(Debug, Clone)]
pub struct DigitalLinkBuilder<State = Empty> {
    domain: String,
    identifier: Option<(String, String)>,
    key_qualifiers: Vec<(String, String)>,
    attributes: BTreeMap<String, String>,
    ordering: KeyQualifierOrder,
    _state: PhantomData<State>,
}

impl DigitalLinkBuilder<Empty> {
    /// Creates a new builder in the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            domain: String::new(),
            identifier: None,
            key_qualifiers: Vec::new(),
            attributes: BTreeMap::new(),
            ordering: KeyQualifierOrder::Insertion,
            _state: PhantomData,
        }
    }

    /// Sets the domain (`scheme://host`, custom path segments permitted) and
    /// advances to the [`HasDomain`] state.
    #[must_use]
    pub fn domain(self, domain: impl Into<String>) -> DigitalLinkBuilder<HasDomain> {
        DigitalLinkBuilder {
            domain: domain.into(),
            identifier: self.identifier,
            key_qualifiers: self.key_qualifiers,
            attributes: self.attributes,
            ordering: self.ordering,
            _state: PhantomData,
        }
    }
}

impl Default for DigitalLinkBuilder<Empty> {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitalLinkBuilder<HasDomain> {
    /// Sets the identifier pair and advances to the [`Ready`] state.
    ///
    /// `code` is a numeric AI such as `"01"` or a short alias such as
    /// `"gtin"`.
    #[must_use]
    pub fn identifier(
        self,
        code: impl Into<String>,
        value: impl Into<String>,
    ) -> DigitalLinkBuilder<Ready> {
        DigitalLinkBuilder {
            domain: self.domain,
            identifier: Some((code.into(), value.into())),
            key_qualifiers: self.key_qualifiers,
            attributes: self.attributes,
            ordering: self.ordering,
            _state: PhantomData,
        }
    }
}

impl DigitalLinkBuilder<Ready> {
    /// Adds a key qualifier. Re-setting a code overwrites its value without
    /// duplicating its position.
    #[must_use]
    pub fn key_qualifier(
        mut self,
        code: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let code = code.into();
        let value = value.into();
        match self.key_qualifiers.iter_mut().find(|(k, _)| *k == code) {
            Some((_, v)) => *v = value,
            None => self.key_qualifiers.push((code, value)),
        }
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attribute(mut self, code: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(code.into(), value.into());
        self
    }

    /// Stores an explicit qualifier order for serialization.
    #[must_use]
    pub fn key_qualifiers_order(mut self, order: Vec<String>) -> Self {
        self.ordering = KeyQualifierOrder::Explicit(order);
        self
    }

    /// Switches weight-sorted serialization on or off.
    #[must_use]
    pub fn sort_key_qualifiers(mut self, sort: bool) -> Self {
        if sort {
            self.ordering = KeyQualifierOrder::WeightSorted;
        } else if self.ordering == KeyQualifierOrder::WeightSorted {
            self.ordering = KeyQualifierOrder::Insertion;
        }
        self
    }

    /// Replaces the ordering policy.
    #[must_use]
    pub fn ordering(mut self, ordering: KeyQualifierOrder) -> Self {
        self.ordering = ordering;
        self
    }

    /// Builds the record.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::EmptyDomain`] or
    /// [`BuilderError::EmptyIdentifier`] when the required strings are empty.
    pub fn build(self) -> Result<DigitalLink, BuilderError> {
        if self.domain.is_empty() {
            return Err(BuilderError::EmptyDomain);
        }
        let Some(identifier) = self.identifier else {
            return Err(BuilderError::EmptyIdentifier);
        };
        if identifier.0.is_empty() || identifier.1.is_empty() {
            return Err(BuilderError::EmptyIdentifier);
        }
        Ok(DigitalLink::from_raw_parts(
            self.domain,
            identifier,
            self.key_qualifiers,
            self.attributes,
            self.ordering,
        ))
    }
}
