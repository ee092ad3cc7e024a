use candid::{CandidType, Deserialize, Principal};
use ic_stable_structures::storable::Bound;
use ic_stable_structures::{Memory, StableCell, Storable};
use std::borrow::Cow;

use super::guard::{require_admin, AccessGate};
use super::types::LedgerError;

/// Assets listed when the installer does not pass its own list.
pub const DEFAULT_SUPPORTED_ASSETS: [&str; 4] = ["BTC", "ETH", "ICP", "USDT"];

/// Install arguments. Omitted fields fall back to the installer and the
/// default asset list.
#[derive(CandidType, Deserialize, Clone, Debug, Default)]
pub struct InitArgs {
    pub owner: Option<Principal>,
    pub supported_assets: Option<Vec<String>>,
}

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    pub owner: Principal,
    pub supported_assets: Vec<String>,
}

impl LedgerConfig {
    pub fn from_init_args(args: InitArgs, installer: Principal) -> Self {
        Self {
            owner: args.owner.unwrap_or(installer),
            supported_assets: args.supported_assets.unwrap_or_else(|| {
                DEFAULT_SUPPORTED_ASSETS.iter().map(|s| s.to_string()).collect()
            }),
        }
    }
}

impl Default for LedgerConfig {
    // Anonymous owner means nobody can administer until init runs
    fn default() -> Self {
        Self::from_init_args(InitArgs::default(), Principal::anonymous())
    }
}

impl Storable for LedgerConfig {
    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(candid::encode_one(self).expect(
            "CRITICAL: Failed to encode LedgerConfig."
        ))
    }

    fn into_bytes(self) -> Vec<u8> {
        self.to_bytes().into_owned()
    }

    fn from_bytes(bytes: Cow<'_, [u8]>) -> Self {
        candid::decode_one(&bytes).expect(
            "CRITICAL: Failed to decode LedgerConfig from stable storage."
        )
    }

    const BOUND: Bound = Bound::Unbounded;
}

/// Owner and asset list, persisted across upgrades.
pub struct ConfigStore<M: Memory> {
    cell: StableCell<LedgerConfig, M>,
}

impl<M: Memory> ConfigStore<M> {
    /// Opens the stored config, or the default one on fresh memory.
    pub fn init(memory: M) -> Self {
        Self {
            cell: StableCell::init(memory, LedgerConfig::default()),
        }
    }

    pub fn install(&mut self, config: LedgerConfig) {
        self.cell.set(config);
    }

    pub fn owner(&self) -> Principal {
        self.cell.get().owner
    }

    pub fn supported_assets(&self) -> Vec<String> {
        self.cell.get().supported_assets.clone()
    }

    /// Hands the admin role to `new_owner` and returns the previous owner.
    pub fn transfer_ownership(&mut self, caller: &Principal, new_owner: Principal) -> Result<Principal, LedgerError> {
        require_admin(&*self, caller)?;
        if new_owner == Principal::anonymous() {
            return Err(LedgerError::InvalidArgument {
                reason: "owner cannot be the anonymous principal".to_string(),
            });
        }

        let mut config = self.cell.get().clone();
        let previous = config.owner;
        config.owner = new_owner;
        self.cell.set(config);
        Ok(previous)
    }
}

impl<M: Memory> AccessGate for ConfigStore<M> {
    fn is_admin(&self, caller: &Principal) -> bool {
        // the anonymous principal is never an admin, even on an uninstalled store
        *caller != Principal::anonymous() && *caller == self.cell.get().owner
    }
}
