use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("address '{0}' has no domain")]
    MissingDomain(String),
    #[error("address '{0}' has an empty node before '@'")]
    EmptyNode(String),
    #[error("address '{0}' has an empty resource after '/'")]
    EmptyResource(String),
    #[error("address '{0}' has more than one '@' before the resource")]
    InvalidDomain(String),
}

/// A messaging address without a resource, e.g. `alice@example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BareAddress {
    node: Option<String>,
    domain: String,
}

impl BareAddress {
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for BareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Some(node) => write!(f, "{}@{}", node, self.domain),
            None => f.write_str(&self.domain),
        }
    }
}

/// A full messaging address `node@domain/resource`. Node and resource are
/// optional, the domain is not. Node and domain compare case-insensitively,
/// the resource is kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    bare: BareAddress,
    resource: Option<String>,
}

impl Address {
    pub fn bare(&self) -> BareAddress {
        self.bare.clone()
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }
}

impl From<BareAddress> for Address {
    fn from(bare: BareAddress) -> Self {
        Self {
            bare,
            resource: None,
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AddressError::Empty);
        }

        // The resource may itself contain '@' or '/', so split it off first.
        let (rest, resource) = match s.split_once('/') {
            Some((_, "")) => return Err(AddressError::EmptyResource(s.to_string())),
            Some((rest, resource)) => (rest, Some(resource.to_string())),
            None => (s, None),
        };
        let (node, domain) = match rest.split_once('@') {
            Some(("", _)) => return Err(AddressError::EmptyNode(s.to_string())),
            Some((node, domain)) => (Some(node.to_lowercase()), domain),
            None => (None, rest),
        };
        if domain.is_empty() {
            return Err(AddressError::MissingDomain(s.to_string()));
        }
        if domain.contains('@') {
            return Err(AddressError::InvalidDomain(s.to_string()));
        }

        Ok(Self {
            bare: BareAddress {
                node,
                domain: domain.to_lowercase(),
            },
            resource,
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource {
            Some(resource) => write!(f, "{}/{}", self.bare, resource),
            None => write!(f, "{}", self.bare),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice@example.com/laptop", Some("alice"), "example.com", Some("laptop"))]
    #[case("alice@example.com", Some("alice"), "example.com", None)]
    #[case("example.com", None, "example.com", None)]
    #[case("conference.example.com/room@x/y", None, "conference.example.com", Some("room@x/y"))]
    #[case("Bob@Example.COM", Some("bob"), "example.com", None)]
    #[case("Bob@Example.COM/Desk", Some("bob"), "example.com", Some("Desk"))]
    fn test_parse_address(
        #[case] input: &str,
        #[case] node: Option<&str>,
        #[case] domain: &str,
        #[case] resource: Option<&str>,
    ) {
        let address: Address = input.parse().unwrap();
        assert_eq!(address.bare().node(), node);
        assert_eq!(address.bare().domain(), domain);
        assert_eq!(address.resource(), resource);
    }

    #[rstest]
    #[case("", AddressError::Empty)]
    #[case("   ", AddressError::Empty)]
    #[case("alice@", AddressError::MissingDomain("alice@".to_string()))]
    #[case("@example.com", AddressError::EmptyNode("@example.com".to_string()))]
    #[case("alice@example.com/", AddressError::EmptyResource("alice@example.com/".to_string()))]
    #[case("alice@bob@example.com", AddressError::InvalidDomain("alice@bob@example.com".to_string()))]
    #[case("a@b@c/res", AddressError::InvalidDomain("a@b@c/res".to_string()))]
    fn test_parse_rejects_malformed_address(#[case] input: &str, #[case] expected: AddressError) {
        assert_eq!(input.parse::<Address>().unwrap_err(), expected);
    }

    #[test]
    fn test_bare_drops_resource() {
        let address: Address = "alice@example.com/phone".parse().unwrap();
        assert_eq!(address.bare().to_string(), "alice@example.com");
        assert_eq!(address.to_string(), "alice@example.com/phone");
    }

    #[test]
    fn test_case_variants_are_the_same_contact() {
        let upper: Address = "Bob@Example.COM".parse().unwrap();
        let lower: Address = "bob@example.com".parse().unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.bare(), lower.bare());
        assert_eq!(upper.to_string(), "bob@example.com");
    }
}
