//! Browser LocalStorage backend

use super::{Storage, StoreError};

/// `window.localStorage`
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's LocalStorage, if the browser allows it
    pub fn open() -> Result<Self, StoreError> {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { inner })
    }
}

fn js_err(err: wasm_bindgen::JsValue) -> StoreError {
    StoreError::Backend(format!("{err:?}"))
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get_item(key).map_err(js_err)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set_item(key, value).map_err(js_err)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.inner.remove_item(key).map_err(js_err)
    }
}
