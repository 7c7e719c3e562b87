// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Sheet Core Parser
//!
//! STEP/IFC parser built with [nom](https://docs.rs/nom), sized for tabular
//! property extraction. Provides zero-copy tokenization, fast entity
//! scanning with [memchr](https://docs.rs/memchr), and lazy per-entity
//! decoding through a byte-offset index.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_sheet_core::{EntityScanner, EntityDecoder};
//!
//! let content = std::fs::read_to_string("model.ifc")?;
//!
//! // Scan for entities without decoding
//! let mut scanner = EntityScanner::new(&content);
//! while let Some((id, type_name, start, end)) = scanner.next_entity() {
//!     println!("#{} {}", id, type_name);
//! }
//!
//! // Decode on demand
//! let mut decoder = EntityDecoder::new(&content);
//! let wall = decoder.decode_by_id(2)?;
//! println!("{:?}", wall.get_string(2));
//! ```

pub mod decoder;
pub mod error;
pub mod parser;
pub mod schema;
pub mod value;

pub use decoder::{build_entity_index, EntityDecoder, EntityIndex};
pub use error::{Error, Result};
pub use parser::{parse_entity, EntityScanner, Token};
pub use schema::{
    canonical_class, detect_schema_version, is_building_element, BUILDING_ELEMENT_CLASSES,
};
pub use value::{AttributeValue, DecodedEntity};
