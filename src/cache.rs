//! Memoization of resolved highlight regions.
//!
//! Resolving a sentence set against a page is deterministic, so re-renders
//! of the same view can skip the strategy chain entirely. Entries own their
//! region lists; nothing here aliases live run objects. Keys carry an
//! optional layout-scale discriminator for hosts whose extractors report
//! zoom-dependent coordinates; scale-independent hosts leave it unset and
//! zoom changes stay cache hits.

use std::num::NonZeroUsize;

use lru::LruCache;

use align::HighlightRegion;

/// Cache key: one resolved view of one document page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    document_id: String,
    sentence_ids: Vec<String>,
    page_number: u32,
    scale_key: Option<u32>,
}

impl CacheKey {
    /// Sentence-id order is irrelevant to the result, so ids are sorted into
    /// the key.
    pub fn new(
        document_id: impl Into<String>,
        sentence_ids: &[String],
        page_number: u32,
        scale_key: Option<u32>,
    ) -> Self {
        let mut sentence_ids = sentence_ids.to_vec();
        sentence_ids.sort();
        sentence_ids.dedup();
        Self {
            document_id: document_id.into(),
            sentence_ids,
            page_number,
            scale_key,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }
}

/// LRU cache of resolution output.
pub struct AlignmentCache {
    inner: LruCache<CacheKey, Vec<HighlightRegion>>,
}

impl AlignmentCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<&Vec<HighlightRegion>> {
        self.inner.get(key)
    }

    pub fn put(&mut self, key: CacheKey, regions: Vec<HighlightRegion>) {
        self.inner.put(key, regions);
    }

    /// Drop every entry belonging to a document.
    pub fn invalidate_document(&mut self, document_id: &str) {
        let stale: Vec<CacheKey> = self
            .inner
            .iter()
            .filter(|(k, _)| k.document_id == document_id)
            .map(|(k, _)| k.clone())
            .collect();
        for key in stale {
            self.inner.pop(&key);
        }
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use align::{ConfidenceTier, StyleHint};
    use layout::BoundingBox;

    fn region(sentence_id: &str) -> HighlightRegion {
        HighlightRegion {
            sentence_id: sentence_id.to_string(),
            bbox: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            source_run_indices: vec![0],
            confidence: 0.9,
            tier: ConfidenceTier::High,
            style_hint: StyleHint::Solid,
        }
    }

    #[test]
    fn key_is_order_insensitive_over_sentence_ids() {
        let a = CacheKey::new("doc", &["s2".into(), "s1".into()], 1, None);
        let b = CacheKey::new("doc", &["s1".into(), "s2".into()], 1, None);
        assert_eq!(a, b);
    }

    #[test]
    fn scale_key_discriminates() {
        let a = CacheKey::new("doc", &["s1".into()], 1, Some(100));
        let b = CacheKey::new("doc", &["s1".into()], 1, Some(150));
        assert_ne!(a, b);
    }

    #[test]
    fn put_get_roundtrip() {
        let mut cache = AlignmentCache::new(4);
        let key = CacheKey::new("doc", &["s1".into()], 1, None);
        cache.put(key.clone(), vec![region("s1")]);
        assert_eq!(cache.get(&key).map(Vec::len), Some(1));
    }

    #[test]
    fn invalidate_document_is_wholesale() {
        let mut cache = AlignmentCache::new(8);
        cache.put(
            CacheKey::new("doc-a", &["s1".into()], 1, None),
            vec![region("s1")],
        );
        cache.put(
            CacheKey::new("doc-a", &["s2".into()], 2, None),
            vec![region("s2")],
        );
        cache.put(
            CacheKey::new("doc-b", &["s1".into()], 1, None),
            vec![region("s1")],
        );

        cache.invalidate_document("doc-a");
        assert_eq!(cache.len(), 1);
        assert!(cache
            .get(&CacheKey::new("doc-b", &["s1".into()], 1, None))
            .is_some());
    }

    #[test]
    fn capacity_evicts_least_recent() {
        let mut cache = AlignmentCache::new(2);
        let k1 = CacheKey::new("doc", &["s1".into()], 1, None);
        let k2 = CacheKey::new("doc", &["s2".into()], 1, None);
        let k3 = CacheKey::new("doc", &["s3".into()], 1, None);
        cache.put(k1.clone(), vec![region("s1")]);
        cache.put(k2, vec![region("s2")]);
        cache.put(k3, vec![region("s3")]);
        assert!(cache.get(&k1).is_none());
        assert_eq!(cache.len(), 2);
    }
}
