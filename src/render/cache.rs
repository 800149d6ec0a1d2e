use image::RgbaImage;
use std::collections::HashMap;
use std::sync::Arc;

/// Key identifying one item of one layer
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct LayerImageKey {
    /// Position of the layer in stacking order
    pub layer_index: usize,
    /// Position of the item within its layer
    pub item_index: usize,
}

impl LayerImageKey {
    /// Create a key for the given layer and item
    pub const fn new(layer_index: usize, item_index: usize) -> Self {
        Self {
            layer_index,
            item_index,
        }
    }
}

struct CachedImage {
    image: Arc<RgbaImage>,
    last_used: u64,
}

/// Memoization cache for decoded, resized layer images
///
/// Lives for one run, whose output resolution is fixed, so cached images can
/// be drawn as they are. Only successful resolutions are stored. The decoded
/// bytes held never exceed the budget: the least recently used images are
/// dropped to make room, and an image larger than the whole budget is handed
/// back without being stored.
pub struct LayerImageCache {
    images: HashMap<LayerImageKey, CachedImage>,
    budget: usize,
    held: usize,
    clock: u64,

    /// Cache performance statistics
    pub stats: CacheStats,
}

/// Performance metrics for cache effectiveness
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of images dropped to stay within the budget
    pub evictions: usize,
}

impl LayerImageCache {
    /// Create an empty cache holding at most `budget` bytes of pixels
    pub fn with_budget(budget: usize) -> Self {
        Self {
            images: HashMap::new(),
            budget,
            held: 0,
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    /// Look up a resolved image, counting the hit or miss
    pub fn get(&mut self, key: LayerImageKey) -> Option<Arc<RgbaImage>> {
        self.clock += 1;
        if let Some(entry) = self.images.get_mut(&key) {
            entry.last_used = self.clock;
            self.stats.hits += 1;
            Some(Arc::clone(&entry.image))
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Store a resolved image and hand back the shared handle
    pub fn insert(&mut self, key: LayerImageKey, image: RgbaImage) -> Arc<RgbaImage> {
        let image = Arc::new(image);
        let size = image_bytes(&image);
        if size > self.budget {
            return image;
        }

        if let Some(previous) = self.images.remove(&key) {
            self.held -= image_bytes(&previous.image);
        }
        while self.held + size > self.budget {
            if !self.evict_least_recent() {
                break;
            }
        }

        self.clock += 1;
        self.held += size;
        self.images.insert(
            key,
            CachedImage {
                image: Arc::clone(&image),
                last_used: self.clock,
            },
        );
        image
    }

    fn evict_least_recent(&mut self) -> bool {
        let Some(oldest) = self
            .images
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(&key, _)| key)
        else {
            return false;
        };

        if let Some(evicted) = self.images.remove(&oldest) {
            self.held -= image_bytes(&evicted.image);
            self.stats.evictions += 1;
        }
        true
    }

    /// Bytes of decoded pixels currently held
    pub const fn held_bytes(&self) -> usize {
        self.held
    }

    /// Byte budget the cache stays within
    pub const fn budget(&self) -> usize {
        self.budget
    }

    /// Number of cached images
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn image_bytes(image: &RgbaImage) -> usize {
    image.as_raw().len()
}
