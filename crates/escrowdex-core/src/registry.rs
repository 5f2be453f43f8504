//! Registry of fungible assets the exchange can hold in custody.

use std::collections::HashMap;

use escrowdex_types::{Address, EscrowdexError, Result, SharedAsset};

/// Maps a fungible-asset contract address to its shared capability.
#[derive(Default)]
pub struct AssetRegistry {
    assets: HashMap<Address, SharedAsset>,
}

impl AssetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
        }
    }

    /// Register an asset under its own address and return that address.
    ///
    /// # Errors
    /// - `WrongAssetPath` if the asset claims the native sentinel address
    /// - `DuplicateAsset` if the address is already registered
    pub fn register(&mut self, asset: SharedAsset) -> Result<Address> {
        let address = asset.lock().address();
        if address.is_native() {
            return Err(EscrowdexError::WrongAssetPath {
                operation: "register_asset",
            });
        }
        if self.assets.contains_key(&address) {
            return Err(EscrowdexError::DuplicateAsset(address));
        }
        self.assets.insert(address, asset);
        Ok(address)
    }

    /// Look up a registered asset.
    ///
    /// # Errors
    /// `UnknownAsset` if nothing is registered at `address`.
    pub fn get(&self, address: &Address) -> Result<SharedAsset> {
        self.assets
            .get(address)
            .cloned()
            .ok_or(EscrowdexError::UnknownAsset(*address))
    }

    /// Registered addresses, sorted.
    #[must_use]
    pub fn addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self.assets.keys().copied().collect();
        addresses.sort();
        addresses
    }
}

impl std::fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetRegistry")
            .field("assets", &self.addresses())
            .finish()
    }
}
