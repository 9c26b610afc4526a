//! Asynchronous image resource cache.
//!
//! One load per distinct URL (two records could share artwork), started
//! on worker threads so a fetch in flight never stalls a render tick.
//! The UI thread drains completions with [`ImageCache::poll`] and reads
//! ready images per frame; a failed load downgrades the node to a solid
//! color circle. Entries are never evicted for the session lifetime,
//! which is fine for a bounded catalog.

use crossbeam_channel::{unbounded, Receiver, Sender};
use drakonomi_core::{Dragon, DragonId};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ImageError {
    #[error("image fetch failed: {0}")]
    Fetch(String),
    #[error("image decode failed: {0}")]
    Decode(String),
}

/// Source of raw image bytes. The GUI injects an HTTP implementation;
/// tests inject stubs.
pub trait ImageFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError>;
}

/// A decoded, square-cropped, circle-masked RGBA8 image, ready to draw
/// inside a node circle at any radius.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Clone)]
pub enum ImageState {
    Pending,
    Ready(Arc<LoadedImage>),
    Failed,
}

pub struct ImageCache {
    fetcher: Arc<dyn ImageFetcher>,
    by_url: HashMap<String, ImageState>,
    url_of: HashMap<DragonId, String>,
    tx: Sender<(String, Result<LoadedImage, ImageError>)>,
    rx: Receiver<(String, Result<LoadedImage, ImageError>)>,
}

impl ImageCache {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            fetcher,
            by_url: HashMap::new(),
            url_of: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Register the entities' artwork and begin a load for every URL not
    /// seen before. Safe to call repeatedly with overlapping lists;
    /// already-resolved URLs are not refetched.
    pub fn acquire(&mut self, dragons: &[Dragon]) {
        for dragon in dragons {
            let Some(url) = dragon.image_url.as_deref().filter(|u| !u.is_empty()) else {
                continue;
            };
            self.url_of.insert(dragon.id, url.to_string());
            if self.by_url.contains_key(url) {
                continue;
            }
            self.by_url.insert(url.to_string(), ImageState::Pending);

            let fetcher = Arc::clone(&self.fetcher);
            let tx = self.tx.clone();
            let url = url.to_string();
            std::thread::spawn(move || {
                let result = fetcher
                    .fetch(&url)
                    .and_then(|bytes| decode_and_mask(&bytes));
                // The receiver only disappears when the cache is dropped.
                let _ = tx.send((url, result));
            });
        }
    }

    /// Drain completed loads; returns how many finished since the last
    /// poll so the caller knows whether a repaint is warranted.
    pub fn poll(&mut self) -> usize {
        let mut completed = 0;
        while let Ok((url, result)) = self.rx.try_recv() {
            completed += 1;
            match result {
                Ok(img) => {
                    self.by_url.insert(url, ImageState::Ready(Arc::new(img)));
                }
                Err(err) => {
                    tracing::warn!(%url, %err, "image load failed, using solid fill");
                    self.by_url.insert(url, ImageState::Failed);
                }
            }
        }
        completed
    }

    /// The ready image for an entity, if its load has completed.
    pub fn get(&self, id: DragonId) -> Option<&Arc<LoadedImage>> {
        match self.url_of.get(&id).and_then(|url| self.by_url.get(url)) {
            Some(ImageState::Ready(img)) => Some(img),
            _ => None,
        }
    }

    pub fn state(&self, id: DragonId) -> Option<&ImageState> {
        self.url_of.get(&id).and_then(|url| self.by_url.get(url))
    }

    pub fn ready_count(&self) -> usize {
        self.by_url
            .values()
            .filter(|s| matches!(s, ImageState::Ready(_)))
            .count()
    }

    /// True once no load is in flight.
    pub fn is_settled(&self) -> bool {
        !self
            .by_url
            .values()
            .any(|s| matches!(s, ImageState::Pending))
    }
}

/// Decode, center-crop to a square, and apply a circular alpha mask with
/// a soft edge so the renderer can draw the image straight into a node
/// circle.
fn decode_and_mask(bytes: &[u8]) -> Result<LoadedImage, ImageError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(ImageError::Decode("empty image".to_string()));
    }

    let side = w.min(h);
    let mut square =
        image::imageops::crop_imm(&rgba, (w - side) / 2, (h - side) / 2, side, side).to_image();

    let center = (side as f32 - 1.0) / 2.0;
    let radius = side as f32 / 2.0;
    for (x, y, pixel) in square.enumerate_pixels_mut() {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let coverage = ((radius - (dx * dx + dy * dy).sqrt()) / 1.5).clamp(0.0, 1.0);
        pixel[3] = (pixel[3] as f32 * coverage) as u8;
    }

    Ok(LoadedImage {
        width: side,
        height: side,
        rgba: square.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn png_bytes(size: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(size, size, image::Rgba([10, 200, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        bytes
    }

    struct CountingFetcher {
        calls: AtomicUsize,
        bytes: Vec<u8>,
    }

    impl ImageFetcher for CountingFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, ImageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.bytes.clone())
        }
    }

    struct FailingFetcher;

    impl ImageFetcher for FailingFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
            Err(ImageError::Fetch(format!("no route to {url}")))
        }
    }

    fn dragon(id: u64, url: Option<&str>) -> Dragon {
        Dragon {
            id: DragonId(id),
            name: format!("dragon-{id}"),
            origin: String::new(),
            common_names: Vec::new(),
            description: String::new(),
            tags: Vec::new(),
            image_url: url.map(|u| u.to_string()),
        }
    }

    fn wait_until_settled(cache: &mut ImageCache) {
        for _ in 0..400 {
            cache.poll();
            if cache.is_settled() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("image loads did not settle in time");
    }

    #[test]
    fn test_loads_are_deduped_by_url() {
        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
            bytes: png_bytes(16),
        });
        let mut cache = ImageCache::new(Arc::clone(&fetcher) as Arc<dyn ImageFetcher>);

        cache.acquire(&[
            dragon(1, Some("https://img.test/shared.png")),
            dragon(2, Some("https://img.test/shared.png")),
            dragon(3, Some("https://img.test/other.png")),
            dragon(4, None),
        ]);
        wait_until_settled(&mut cache);

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert!(cache.get(DragonId(1)).is_some());
        assert!(cache.get(DragonId(2)).is_some());
        assert!(cache.get(DragonId(3)).is_some());
        assert!(cache.get(DragonId(4)).is_none());

        // Re-acquiring with a grown list keeps prior entries and does
        // not refetch them.
        cache.acquire(&[
            dragon(1, Some("https://img.test/shared.png")),
            dragon(5, Some("https://img.test/shared.png")),
        ]);
        wait_until_settled(&mut cache);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert!(cache.get(DragonId(5)).is_some());
    }

    #[test]
    fn test_failed_load_degrades_to_none() {
        let mut cache = ImageCache::new(Arc::new(FailingFetcher));
        cache.acquire(&[dragon(1, Some("https://img.test/missing.png"))]);
        wait_until_settled(&mut cache);

        assert!(cache.get(DragonId(1)).is_none());
        assert!(matches!(cache.state(DragonId(1)), Some(ImageState::Failed)));
        assert_eq!(cache.ready_count(), 0);
    }

    #[test]
    fn test_mask_is_circular() {
        let img = decode_and_mask(&png_bytes(32)).unwrap();
        assert_eq!(img.width, 32);
        assert_eq!(img.height, 32);

        let alpha = |x: u32, y: u32| img.rgba[((y * img.width + x) * 4 + 3) as usize];
        // Corners are clipped away, the center is fully opaque.
        assert_eq!(alpha(0, 0), 0);
        assert_eq!(alpha(31, 31), 0);
        assert_eq!(alpha(16, 16), 255);
    }

    #[test]
    fn test_non_square_source_is_center_cropped() {
        let img = image::RgbaImage::from_pixel(64, 32, image::Rgba([1, 2, 3, 255]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();

        let loaded = decode_and_mask(&bytes).unwrap();
        assert_eq!(loaded.width, 32);
        assert_eq!(loaded.height, 32);
        assert_eq!(loaded.rgba.len(), 32 * 32 * 4);
    }

    #[test]
    fn test_undecodable_bytes_fail() {
        let mut cache = ImageCache::new(Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
            bytes: b"not an image".to_vec(),
        }));
        cache.acquire(&[dragon(1, Some("https://img.test/garbage.bin"))]);
        wait_until_settled(&mut cache);
        assert!(matches!(cache.state(DragonId(1)), Some(ImageState::Failed)));
    }
}
