// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On-demand entity decoding backed by a byte-offset index.

use crate::error::{Error, Result};
use crate::parser::parse_entity;
use crate::value::{AttributeValue, DecodedEntity};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Entity id -> (start, end) byte span.
pub type EntityIndex = FxHashMap<u32, (usize, usize)>;

/// Build the entity index in one O(n) pass over the content.
#[inline]
pub fn build_entity_index(content: &str) -> EntityIndex {
    let bytes = content.as_bytes();
    let len = bytes.len();

    // Roughly one entity per 50 bytes in real-world files
    let mut index = FxHashMap::with_capacity_and_hasher(len / 50, Default::default());

    let mut pos = 0;

    while pos < len {
        let Some(hash_offset) = memchr::memchr(b'#', &bytes[pos..]) else {
            break;
        };

        let start = pos + hash_offset;
        pos = start + 1;

        let id_start = pos;
        while pos < len && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let id_end = pos;

        // Tolerate `#45 = ` as well as `#45=`
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        if id_end > id_start && pos < len && bytes[pos] == b'=' {
            let id = parse_u32_inline(bytes, id_start, id_end);

            if let Some(semicolon_offset) = memchr::memchr(b';', &bytes[pos..]) {
                pos += semicolon_offset + 1;
                index.insert(id, (start, pos));
            } else {
                break; // No terminator, malformed tail
            }
        }
    }

    index
}

/// u32 from ASCII digits without allocation.
#[inline]
fn parse_u32_inline(bytes: &[u8], start: usize, end: usize) -> u32 {
    let mut result: u32 = 0;
    for &byte in &bytes[start..end] {
        result = result
            .wrapping_mul(10)
            .wrapping_add(byte.wrapping_sub(b'0') as u32);
    }
    result
}

/// Lazy entity decoder with a per-id cache.
///
/// The index can be shared across threads via `Arc`, so parallel workers can
/// each hold a cheap local decoder over the same content.
pub struct EntityDecoder<'a> {
    content: &'a str,
    cache: FxHashMap<u32, Arc<DecodedEntity>>,
    entity_index: Option<Arc<EntityIndex>>,
}

impl<'a> EntityDecoder<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            cache: FxHashMap::default(),
            entity_index: None,
        }
    }

    /// Create a decoder sharing a pre-built index.
    pub fn with_arc_index(content: &'a str, index: Arc<EntityIndex>) -> Self {
        Self {
            content,
            cache: FxHashMap::default(),
            entity_index: Some(index),
        }
    }

    fn build_index(&mut self) {
        if self.entity_index.is_none() {
            self.entity_index = Some(Arc::new(build_entity_index(self.content)));
        }
    }

    /// Decode the entity spanning `start..end`.
    #[inline]
    pub fn decode_at(&mut self, start: usize, end: usize) -> Result<Arc<DecodedEntity>> {
        let content = self.content;
        let line = &content[start..end];
        let (id, type_name, tokens) = parse_entity(line).map_err(|e| {
            Error::parse(
                start,
                format!("{} (input: {:?})", e, &line[..line.len().min(100)]),
            )
        })?;

        if let Some(entity) = self.cache.get(&id) {
            return Ok(entity.clone());
        }

        let attributes = tokens.iter().map(AttributeValue::from_token).collect();
        let entity = Arc::new(DecodedEntity::new(id, type_name.to_string(), attributes));
        self.cache.insert(id, entity.clone());
        Ok(entity)
    }

    /// Decode an entity by id through the index.
    #[inline]
    pub fn decode_by_id(&mut self, entity_id: u32) -> Result<Arc<DecodedEntity>> {
        if let Some(entity) = self.cache.get(&entity_id) {
            return Ok(entity.clone());
        }

        self.build_index();

        let (start, end) = self
            .entity_index
            .as_ref()
            .and_then(|idx| idx.get(&entity_id).copied())
            .ok_or(Error::EntityNotFound(entity_id))?;

        self.decode_at(start, end)
    }

    /// Follow a `#ref` attribute. Returns None for null/derived values.
    #[inline]
    pub fn resolve_ref(&mut self, attr: &AttributeValue) -> Result<Option<Arc<DecodedEntity>>> {
        match attr.as_entity_ref() {
            Some(id) => Ok(Some(self.decode_by_id(id)?)),
            None => Ok(None),
        }
    }

    /// Follow every `#ref` in a list attribute, skipping non-references.
    pub fn resolve_ref_list(&mut self, attr: &AttributeValue) -> Result<Vec<Arc<DecodedEntity>>> {
        let list = attr
            .as_list()
            .ok_or_else(|| Error::UnexpectedAttribute("expected list".to_string()))?;

        let mut entities = Vec::with_capacity(list.len());
        for item in list {
            if let Some(id) = item.as_entity_ref() {
                entities.push(self.decode_by_id(id)?);
            }
        }
        Ok(entities)
    }

    /// Number of decoded entities held in the cache.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = "\
#1=IFCPROJECT('guid',$,'Project',$,$,$,$,$,$);\n\
#2=IFCWALL('guid2',#1,'Wall-001',$,$,$,$,'W1');\n\
#3=IFCPROPERTYSET('guid3',$,'Pset_WallCommon',$,(#4));\n\
#4=IFCPROPERTYSINGLEVALUE('LoadBearing',$,IFCBOOLEAN(.T.),$);\n";

    #[test]
    fn test_build_entity_index() {
        let index = build_entity_index(CONTENT);
        assert_eq!(index.len(), 4);
        let (start, end) = index[&2];
        assert!(CONTENT[start..end].starts_with("#2=IFCWALL"));
    }

    #[test]
    fn test_decode_by_id() {
        let mut decoder = EntityDecoder::new(CONTENT);
        let wall = decoder.decode_by_id(2).unwrap();
        assert!(wall.is_type("IfcWall"));
        assert_eq!(wall.get_string(2), Some("Wall-001"));

        // Second decode comes from the cache
        let again = decoder.decode_by_id(2).unwrap();
        assert!(Arc::ptr_eq(&wall, &again));
        assert_eq!(decoder.cache_size(), 1);
    }

    #[test]
    fn test_resolve_ref_list() {
        let mut decoder = EntityDecoder::new(CONTENT);
        let pset = decoder.decode_by_id(3).unwrap();
        let props = decoder
            .resolve_ref_list(pset.get(4).unwrap())
            .unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].get_string(0), Some("LoadBearing"));
    }

    #[test]
    fn test_missing_entity() {
        let mut decoder = EntityDecoder::new(CONTENT);
        assert!(matches!(
            decoder.decode_by_id(99),
            Err(Error::EntityNotFound(99))
        ));
    }
}
