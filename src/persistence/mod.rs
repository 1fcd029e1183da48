//! Best-effort key/value persistence
//!
//! Every persisted value is a plain integer stored as a string. Missing or
//! malformed entries read back as the caller's default; writes never fail
//! from the caller's point of view.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Storage keys, one per persisted value
pub mod keys {
    pub const SNAKE_HIGH_SCORE: &str = "snakeHighScore";
    pub const BREAKOUT_HIGH_SCORE: &str = "breakoutHighScore";
    pub const SLOTS_BALANCE: &str = "slotsBalance";
    pub const SLOTS_TOTAL_WINNINGS: &str = "slotsTotalWinnings";
}

/// Raw string key/value backend
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// The store is the one resource shared between games
pub type SharedStore = Rc<RefCell<dyn ScoreStore>>;

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<MemoryStore>> {
        Rc::new(RefCell::new(Self::new()))
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Parse a stored number
///
/// Accepts plain integers and finite decimals (truncated). Negative,
/// empty or non-numeric values are rejected.
pub fn parse_number(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => Some(f.trunc() as u64),
        _ => None,
    }
}

/// Read a number, falling back to `default` when absent or malformed
pub fn read_number(store: &dyn ScoreStore, key: &str, default: u64) -> u64 {
    match store.get(key) {
        None => default,
        Some(raw) => parse_number(&raw).unwrap_or_else(|| {
            log::warn!("Ignoring malformed stored value for {}: {:?}", key, raw);
            default
        }),
    }
}

pub fn write_number(store: &mut dyn ScoreStore, key: &str, value: u64) {
    store.set(key, &value.to_string());
}

/// Open the platform's durable store
#[cfg(target_arch = "wasm32")]
pub fn open_default() -> SharedStore {
    Rc::new(RefCell::new(LocalStorageStore::new()))
}

/// Native builds keep values for the lifetime of the process only
#[cfg(not(target_arch = "wasm32"))]
pub fn open_default() -> SharedStore {
    MemoryStore::shared()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42));
        assert_eq!(parse_number(" 7 "), Some(7));
        assert_eq!(parse_number("12.9"), Some(12));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("-5"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_read_number_defaults() {
        let mut store = MemoryStore::new();
        assert_eq!(read_number(&store, keys::SLOTS_BALANCE, 100), 100);

        store.set(keys::SLOTS_BALANCE, "not a number");
        assert_eq!(read_number(&store, keys::SLOTS_BALANCE, 100), 100);

        write_number(&mut store, keys::SLOTS_BALANCE, 250);
        assert_eq!(store.get(keys::SLOTS_BALANCE).as_deref(), Some("250"));
        assert_eq!(read_number(&store, keys::SLOTS_BALANCE, 100), 250);
    }

    #[test]
    fn test_shared_store_last_write_wins() {
        let concrete = MemoryStore::shared();
        let a: SharedStore = concrete.clone();
        let b: SharedStore = concrete.clone();

        write_number(&mut *a.borrow_mut(), keys::SNAKE_HIGH_SCORE, 10);
        write_number(&mut *b.borrow_mut(), keys::SNAKE_HIGH_SCORE, 30);
        assert_eq!(read_number(&*concrete.borrow(), keys::SNAKE_HIGH_SCORE, 0), 30);
    }
}
