use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A ledger entity id, `shard.realm.num`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
  pub shard: u64,
  pub realm: u64,
  pub num: u64,
}

pub type AccountId = EntityId;
pub type TokenId = EntityId;
pub type TopicId = EntityId;

impl EntityId {
  pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
    Self { shard, realm, num }
  }
}

impl fmt::Display for EntityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
  }
}

impl FromStr for EntityId {
  type Err = LedgerError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || LedgerError::InvalidEntityId {
      value: s.to_string(),
    };

    let mut parts = s.trim().split('.');
    let mut next = || -> Result<u64, LedgerError> {
      parts
        .next()
        .filter(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(&invalid)?
        .parse()
        .map_err(|_| invalid())
    };

    let id = EntityId::new(next()?, next()?, next()?);
    if parts.next().is_some() {
      return Err(invalid());
    }
    Ok(id)
  }
}

impl TryFrom<String> for EntityId {
  type Error = LedgerError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<EntityId> for String {
  fn from(id: EntityId) -> Self {
    id.to_string()
  }
}

/// A single NFT: token id plus serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftId {
  pub token_id: TokenId,
  pub serial: u64,
}

impl fmt::Display for NftId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.token_id, self.serial)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_entity_id() {
    let id: EntityId = "0.0.12345".parse().unwrap();
    assert_eq!(id, EntityId::new(0, 0, 12345));
    assert_eq!(id.to_string(), "0.0.12345");
  }

  #[test]
  fn test_parse_trims_whitespace() {
    let id: EntityId = " 1.2.3 ".parse().unwrap();
    assert_eq!(id, EntityId::new(1, 2, 3));
  }

  #[test]
  fn test_reject_malformed_ids() {
    for bad in ["", "0.0", "0.0.1.2", "0.0.x", "0..1", "-1.0.1", "0.0.+1", "abc"] {
      assert!(bad.parse::<EntityId>().is_err(), "accepted {:?}", bad);
    }
  }

  #[test]
  fn test_serde_as_string() {
    let id = EntityId::new(0, 0, 7);
    assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!("0.0.7"));

    let parsed: EntityId = serde_json::from_value(serde_json::json!("0.0.7")).unwrap();
    assert_eq!(parsed, id);
    assert!(serde_json::from_value::<EntityId>(serde_json::json!("7")).is_err());
  }
}
