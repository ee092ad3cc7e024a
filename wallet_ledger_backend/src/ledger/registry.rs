use candid::{CandidType, Deserialize, Nat};
use ic_stable_structures::storable::Bound;
use ic_stable_structures::{Memory, StableBTreeMap, Storable};
use std::borrow::Cow;

use super::iterable_map::TombstonedOrderedMap;
use super::nat_helpers::fits_u256;
use super::types::{EntryStatus, LedgerError, UserProfile, Wallet, WalletEntry};
use super::wallet::LedgerOp;

const MAX_ID_LEN: usize = 128;
const MAX_ASSET_LEN: usize = 32;

/// Everything the ledger stores about one user.
#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    pub wallets: TombstonedOrderedMap<String, Wallet>,
}

impl Storable for UserRecord {
    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(
            candid::encode_one(self).expect(
                "CRITICAL: Failed to encode UserRecord. \
                 This should never happen unless there's a bug in candid serialization."
            )
        )
    }

    fn into_bytes(self) -> Vec<u8> {
        self.to_bytes().into_owned()
    }

    fn from_bytes(bytes: Cow<'_, [u8]>) -> Self {
        candid::decode_one(&bytes).expect(
            "CRITICAL: Failed to decode UserRecord from stable storage. \
             This indicates storage corruption or an incompatible canister upgrade."
        )
    }

    // Wallet maps grow with every asset ever touched
    const BOUND: Bound = Bound::Unbounded;
}

/// All users, keyed by id.
///
/// Mutations read the record, compute the new state on the copy and insert it
/// back only once every check passed. A rejected call leaves storage as it was,
/// including the lazily created wallet entry.
pub struct Registry<M: Memory> {
    users: StableBTreeMap<String, UserRecord, M>,
}

impl<M: Memory> Registry<M> {
    pub fn init(memory: M) -> Self {
        Self {
            users: StableBTreeMap::init(memory),
        }
    }

    pub fn user_count(&self) -> u64 {
        self.users.len()
    }

    pub fn contains_user(&self, id: &str) -> bool {
        self.users.contains_key(&id.to_string())
    }

    /// Registers a new user with no wallets. Ids are never overwritten.
    pub fn create_user(&mut self, id: String, email: String, name: String) -> Result<(), LedgerError> {
        validate_id(&id)?;
        if self.users.contains_key(&id) {
            return Err(LedgerError::AlreadyExists { id });
        }

        let record = UserRecord {
            id: id.clone(),
            email,
            name,
            wallets: TombstonedOrderedMap::new(),
        };
        self.users.insert(id, record);
        Ok(())
    }

    pub fn get_user_name(&self, id: &str) -> Result<String, LedgerError> {
        Ok(self.load(id)?.name)
    }

    pub fn get_user_profile(&self, id: &str) -> Result<UserProfile, LedgerError> {
        let record = self.load(id)?;
        Ok(UserProfile {
            wallet_count: record.wallets.len() as u64,
            id: record.id,
            email: record.email,
            name: record.name,
        })
    }

    pub fn get_wallet_size(&self, id: &str) -> Result<u64, LedgerError> {
        Ok(self.load(id)?.wallets.len() as u64)
    }

    /// Balance of `asset`; an asset the user never touched reads as zero.
    pub fn get_wallet(&self, id: &str, asset: &str) -> Result<Wallet, LedgerError> {
        let record = self.load(id)?;
        Ok(record.wallets.get(&asset.to_string()).cloned().unwrap_or_default())
    }

    /// Live wallets in the order their assets were first touched.
    pub fn list_wallets(&self, id: &str) -> Result<Vec<WalletEntry>, LedgerError> {
        let record = self.load(id)?;
        Ok(record
            .wallets
            .iter()
            .map(|(asset, wallet)| WalletEntry {
                asset: asset.clone(),
                free: wallet.free.clone(),
                hold: wallet.hold.clone(),
            })
            .collect())
    }

    /// Runs `op` against the `(id, asset)` wallet, creating it on first use.
    ///
    /// The user is resolved before the arguments are checked, so an unknown
    /// id always reports `NotFound`.
    pub fn apply(&mut self, id: &str, asset: &str, op: LedgerOp, amount: &Nat) -> Result<EntryStatus, LedgerError> {
        let mut record = self.load(id)?;
        validate_asset(asset)?;
        if !fits_u256(amount) {
            return Err(LedgerError::ArithmeticOverflow);
        }

        let asset = asset.to_string();

        let current = record.wallets.get(&asset).cloned().unwrap_or_default();
        let updated = current.apply(op, amount)?;

        let status = EntryStatus::from(record.wallets.insert(asset.clone()));
        if let Some(slot) = record.wallets.get_mut(&asset) {
            *slot = updated;
        }
        self.users.insert(record.id.clone(), record);
        Ok(status)
    }

    /// Tombstones an asset whose balances are both zero.
    pub fn close_wallet(&mut self, id: &str, asset: &str) -> Result<(), LedgerError> {
        let mut record = self.load(id)?;
        let asset = asset.to_string();

        let wallet = record.wallets.get(&asset).ok_or_else(|| LedgerError::NotFound {
            what: format!("wallet {} for user {}", asset, record.id),
        })?;
        if !wallet.is_empty() {
            return Err(LedgerError::WalletNotEmpty { asset });
        }

        record.wallets.remove(&asset);
        self.users.insert(record.id.clone(), record);
        Ok(())
    }

    /// Slot bookkeeping of a user's wallet map, for diagnostics and tests.
    pub fn wallet_slots(&self, id: &str) -> Result<(usize, usize), LedgerError> {
        let record = self.load(id)?;
        Ok((record.wallets.len(), record.wallets.slot_count()))
    }

    fn load(&self, id: &str) -> Result<UserRecord, LedgerError> {
        self.users
            .get(&id.to_string())
            .ok_or_else(|| LedgerError::user_not_found(id))
    }
}

fn validate_id(id: &str) -> Result<(), LedgerError> {
    if id.is_empty() {
        return Err(LedgerError::InvalidArgument { reason: "user id must not be empty".to_string() });
    }
    if id.len() > MAX_ID_LEN {
        return Err(LedgerError::InvalidArgument {
            reason: format!("user id longer than {} bytes", MAX_ID_LEN),
        });
    }
    Ok(())
}

fn validate_asset(asset: &str) -> Result<(), LedgerError> {
    if asset.is_empty() || asset.len() > MAX_ASSET_LEN {
        return Err(LedgerError::InvalidArgument {
            reason: format!("asset symbol must be 1-{} bytes", MAX_ASSET_LEN),
        });
    }
    Ok(())
}
