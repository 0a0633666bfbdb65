//! Resource descriptor: what a transport needs to register a resource.

use serde::{Deserialize, Serialize};

use crate::error::{SmartNodeError, ValidationError};

/// Registration metadata for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub path: String,
    pub resource_types: Vec<String>,
    pub interfaces: Vec<String>,
    pub discoverable: bool,
    pub observable: bool,
}

impl ResourceDescriptor {
    /// Create a builder for constructing a [`ResourceDescriptor`].
    #[must_use]
    pub fn builder() -> ResourceDescriptorBuilder {
        ResourceDescriptorBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::InvalidInput`] when the path does not start
    /// with `/`, or when no resource type or interface is declared.
    pub fn validate(&self) -> Result<(), SmartNodeError> {
        if !self.path.starts_with('/') {
            return Err(ValidationError::InvalidPath.into());
        }
        if self.resource_types.is_empty() {
            return Err(ValidationError::NoResourceTypes.into());
        }
        if self.interfaces.is_empty() {
            return Err(ValidationError::NoInterfaces.into());
        }
        Ok(())
    }

    /// Whether `path` addresses this resource.
    ///
    /// A trailing slash is not significant, so `/light` matches `/light/`.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.path.trim_end_matches('/') == path.trim_end_matches('/')
    }
}

/// Step-by-step builder for [`ResourceDescriptor`].
#[derive(Debug)]
pub struct ResourceDescriptorBuilder {
    path: Option<String>,
    resource_types: Vec<String>,
    interfaces: Vec<String>,
    discoverable: bool,
    observable: bool,
}

impl Default for ResourceDescriptorBuilder {
    fn default() -> Self {
        Self {
            path: None,
            resource_types: Vec::new(),
            interfaces: Vec::new(),
            discoverable: true,
            observable: true,
        }
    }
}

impl ResourceDescriptorBuilder {
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_types.push(resource_type.into());
        self
    }

    #[must_use]
    pub fn interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    #[must_use]
    pub fn discoverable(mut self, discoverable: bool) -> Self {
        self.discoverable = discoverable;
        self
    }

    #[must_use]
    pub fn observable(mut self, observable: bool) -> Self {
        self.observable = observable;
        self
    }

    /// Consume the builder, validate, and return a [`ResourceDescriptor`].
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::InvalidInput`] if the descriptor is invalid.
    pub fn build(self) -> Result<ResourceDescriptor, SmartNodeError> {
        let descriptor = ResourceDescriptor {
            path: self.path.unwrap_or_default(),
            resource_types: self.resource_types,
            interfaces: self.interfaces,
            discoverable: self.discoverable,
            observable: self.observable,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion() -> ResourceDescriptorBuilder {
        ResourceDescriptor::builder()
            .path("/a/pir")
            .resource_type("oic.r.sensor.motion")
            .interface("oic.if.baseline")
    }

    #[test]
    fn should_build_discoverable_observable_descriptor_by_default() {
        let descriptor = motion().build().unwrap();
        assert_eq!(descriptor.path, "/a/pir");
        assert!(descriptor.discoverable);
        assert!(descriptor.observable);
    }

    #[test]
    fn should_keep_declaration_order_of_types_and_interfaces() {
        let descriptor = ResourceDescriptor::builder()
            .path("/light/")
            .resource_type("oic.wk.col")
            .resource_type("oic.r.light")
            .interface("oic.if.baseline")
            .interface("oic.if.b")
            .interface("oic.if.ll")
            .build()
            .unwrap();
        assert_eq!(descriptor.resource_types, ["oic.wk.col", "oic.r.light"]);
        assert_eq!(descriptor.interfaces.len(), 3);
    }

    #[test]
    fn should_reject_relative_path() {
        let result = motion().path("a/pir").build();
        assert!(matches!(
            result,
            Err(SmartNodeError::InvalidInput(ValidationError::InvalidPath))
        ));
    }

    #[test]
    fn should_reject_missing_resource_type() {
        let result = ResourceDescriptor::builder()
            .path("/a/pir")
            .interface("oic.if.baseline")
            .build();
        assert!(matches!(
            result,
            Err(SmartNodeError::InvalidInput(ValidationError::NoResourceTypes))
        ));
    }

    #[test]
    fn should_reject_missing_interface() {
        let result = ResourceDescriptor::builder()
            .path("/a/pir")
            .resource_type("oic.r.sensor.motion")
            .build();
        assert!(matches!(
            result,
            Err(SmartNodeError::InvalidInput(ValidationError::NoInterfaces))
        ));
    }

    #[test]
    fn should_match_path_ignoring_trailing_slash() {
        let descriptor = ResourceDescriptor::builder()
            .path("/light/")
            .resource_type("oic.r.light")
            .interface("oic.if.baseline")
            .build()
            .unwrap();
        assert!(descriptor.matches("/light"));
        assert!(descriptor.matches("/light/"));
        assert!(!descriptor.matches("/lights"));
    }
}
