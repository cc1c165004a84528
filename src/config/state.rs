// Application state module
// Shared per-process state handed to every request handler

use std::io;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use super::types::Config;
use crate::notify::Notifier;
use crate::store::{Collection, Order, Product, SliderImage};

/// The three whole-document collections
pub struct Stores {
    pub products: Collection<Product>,
    pub orders: Collection<Order>,
    pub slider: Collection<SliderImage>,
}

impl Stores {
    /// Open the collections under the configured data directory
    pub fn open(data_dir: &Path) -> Self {
        Self {
            products: Collection::open(data_dir.join("products.json")),
            orders: Collection::open(data_dir.join("orders.json")),
            slider: Collection::open(data_dir.join("slider.json")),
        }
    }

    /// In-memory collections for tests
    pub fn in_memory() -> Self {
        Self {
            products: Collection::in_memory(),
            orders: Collection::in_memory(),
            slider: Collection::in_memory(),
        }
    }
}

/// Application state
pub struct AppState {
    pub config: Config,
    pub stores: Stores,
    pub notifier: Notifier,

    // Cached config value for fast access without locks
    pub cached_access_log: AtomicBool,
}

impl AppState {
    /// Create `AppState`, ensuring storage directories exist and loading the
    /// persisted collections
    pub fn new(config: Config) -> io::Result<Self> {
        let data_dir = Path::new(&config.storage.data_dir);
        std::fs::create_dir_all(data_dir)?;
        std::fs::create_dir_all(&config.storage.uploads_dir)?;

        let stores = Stores::open(data_dir);
        let notifier = Notifier::new(&config.notify);
        let cached_access_log = AtomicBool::new(config.logging.access_log);

        Ok(Self {
            config,
            stores,
            notifier,
            cached_access_log,
        })
    }
}
