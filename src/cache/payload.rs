//! Typed cache payloads.
//!
//! Values are stored as a JSON `CacheEnvelope`: a format version plus a
//! tagged `CachePayload`. Entries written by a different version, or that no
//! longer decode, are treated as misses.

use bytes::Bytes;
use carta_api_types::{DishResponse, MenuResponse, MenuTreeNode, SubmenuResponse};
use serde::{Deserialize, Serialize};

use super::error::CacheError;

pub const PAYLOAD_VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CachePayload {
    Menu(MenuResponse),
    MenuList(Vec<MenuResponse>),
    Submenu(SubmenuResponse),
    SubmenuList(Vec<SubmenuResponse>),
    Dish(DishResponse),
    DishList(Vec<DishResponse>),
    Tree(Vec<MenuTreeNode>),
}

impl CachePayload {
    pub fn kind(&self) -> &'static str {
        match self {
            CachePayload::Menu(_) => "menu",
            CachePayload::MenuList(_) => "menu_list",
            CachePayload::Submenu(_) => "submenu",
            CachePayload::SubmenuList(_) => "submenu_list",
            CachePayload::Dish(_) => "dish",
            CachePayload::DishList(_) => "dish_list",
            CachePayload::Tree(_) => "tree",
        }
    }
}

#[derive(Debug, Deserialize)]
struct CacheEnvelope {
    version: u16,
    payload: serde_json::Value,
}

#[derive(Serialize)]
struct CacheEnvelopeRef<'a> {
    version: u16,
    payload: &'a CachePayload,
}

pub fn encode(payload: &CachePayload) -> Result<Bytes, CacheError> {
    let envelope = CacheEnvelopeRef {
        version: PAYLOAD_VERSION,
        payload,
    };
    Ok(Bytes::from(serde_json::to_vec(&envelope)?))
}

/// Decode an envelope, checking the version before touching the payload body.
pub fn decode(bytes: &[u8]) -> Result<CachePayload, CacheError> {
    let envelope: CacheEnvelope = serde_json::from_slice(bytes)?;
    if envelope.version != PAYLOAD_VERSION {
        return Err(CacheError::Version {
            found: envelope.version,
            expected: PAYLOAD_VERSION,
        });
    }
    Ok(serde_json::from_value(envelope.payload)?)
}

/// Values that can be stored in the catalog cache.
pub trait Cacheable: Sized {
    fn to_payload(&self) -> CachePayload;

    fn from_payload(payload: CachePayload) -> Option<Self>;
}

macro_rules! cacheable {
    ($ty:ty, $variant:ident) => {
        impl Cacheable for $ty {
            fn to_payload(&self) -> CachePayload {
                CachePayload::$variant(self.clone())
            }

            fn from_payload(payload: CachePayload) -> Option<Self> {
                match payload {
                    CachePayload::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

cacheable!(MenuResponse, Menu);
cacheable!(Vec<MenuResponse>, MenuList);
cacheable!(SubmenuResponse, Submenu);
cacheable!(Vec<SubmenuResponse>, SubmenuList);
cacheable!(DishResponse, Dish);
cacheable!(Vec<DishResponse>, DishList);
cacheable!(Vec<MenuTreeNode>, Tree);
