use std::collections::BTreeSet;

use crate::collection::MediaCollection;
use crate::decode::MediaDecoder;
use crate::error::IndexError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub loaded: Vec<usize>,
    pub failed: Vec<usize>,
    pub evicted: Vec<usize>,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.loaded.is_empty() && self.failed.is_empty() && self.evicted.is_empty()
    }
}

/// Keeps the set of resident full-resolution items equal to what the
/// viewport needs.
#[derive(Default)]
pub struct ViewerResidencyReconciler {
    resident: BTreeSet<usize>,
}

impl ViewerResidencyReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resident(&self) -> &BTreeSet<usize> {
        &self.resident
    }

    pub fn is_resident(&self, index: usize) -> bool {
        self.resident.contains(&index)
    }

    /// Load every needed item that is not resident, then release every
    /// resident item that is no longer needed.
    pub fn reconcile<D: MediaDecoder>(
        &mut self,
        collection: &mut MediaCollection<D::Resource>,
        decoder: &D,
        needed: &BTreeSet<usize>,
    ) -> Result<Reconciliation, IndexError> {
        let mut report = Reconciliation::default();

        for &index in needed {
            if self.resident.contains(&index) {
                continue;
            }
            if load_full(collection, decoder, index)? {
                self.resident.insert(index);
                report.loaded.push(index);
            } else {
                report.failed.push(index);
            }
        }

        let stale: Vec<usize> = self.resident.difference(needed).copied().collect();
        for index in stale {
            collection.clear_full(index)?;
            self.resident.remove(&index);
            report.evicted.push(index);
        }

        Ok(report)
    }
}

/// Animation first, static image if the decoder declines.
fn load_full<D: MediaDecoder>(
    collection: &mut MediaCollection<D::Resource>,
    decoder: &D,
    index: usize,
) -> Result<bool, IndexError> {
    let path = collection.get(index)?.path().to_path_buf();

    match decoder.decode_animation(&path) {
        Ok(Some(animation)) => {
            let size = decoder.file_byte_size(&path);
            return collection.set_animation(index, Ok(animation), size);
        }
        Ok(None) => {}
        Err(e) => log::debug!("[viewer] animation {} failed: {}", path.display(), e),
    }

    let decoded = decoder.decode_full(&path);
    let size = match &decoded {
        Ok(_) => decoder.file_byte_size(&path),
        Err(e) => {
            log::debug!("[viewer] could not load {}: {}", path.display(), e);
            0
        }
    };
    collection.set_full_image(index, decoded, size)
}
