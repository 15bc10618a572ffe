//! The ledger state machine — balances, allowances, total supply.

use std::collections::HashMap;

use crate::error::LedgerError;
use crate::event::{EventBus, TokenEvent};
use crate::snapshot::{LedgerSnapshot, SNAPSHOT_VERSION};
use ingot_types::{AccountId, Amount, TokenMetadata};

/// Bookkeeping engine for one fungible token.
///
/// Owns per-account balances, per (owner, spender) allowances and the
/// total-supply counter. Reads on missing keys return zero (accounts are
/// created implicitly at zero and rest at zero when emptied). Supply is
/// mutated only by [`Ledger::mint`] and [`Ledger::burn`], which adjust a
/// balance and the counter together, preserving
/// `total_supply == Σ balances`.
///
/// All mutating operations take `&mut self`: exclusive access is the
/// serialization boundary — there is exactly one writer at any instant, and
/// every operation runs to completion before another can observe the state.
#[derive(Debug)]
pub struct Ledger {
    metadata: TokenMetadata,
    balances: HashMap<AccountId, Amount>,
    allowances: HashMap<(AccountId, AccountId), Amount>,
    total_supply: Amount,
    events: EventBus,
}

impl Ledger {
    pub fn new(metadata: TokenMetadata) -> Self {
        Self {
            metadata,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: Amount::ZERO,
            events: EventBus::new(),
        }
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance of `account`, zero if the account has never been touched.
    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    /// Allowance granted by `owner` to `spender`, zero if never set.
    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Register a listener for [`TokenEvent`]s emitted by this ledger.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&TokenEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    /// Move `amount` from `from` to `to`. Total supply is unchanged.
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if to.is_null() {
            return Err(LedgerError::InvalidRecipient);
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount.raw(),
                available: available.raw(),
            });
        }
        self.debit(from, amount);
        self.credit(to, amount);
        self.events.emit(&TokenEvent::Transfer {
            from,
            to,
            value: amount,
        });
        Ok(())
    }

    /// Set the allowance of `spender` over `owner`'s balance to exactly
    /// `amount`, overwriting any prior value.
    pub fn approve(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if spender.is_null() {
            return Err(LedgerError::InvalidSpender);
        }
        self.allowances.insert((owner, spender), amount);
        self.events.emit(&TokenEvent::Approval {
            owner,
            spender,
            value: amount,
        });
        Ok(())
    }

    /// Raise the allowance by `delta`. Returns the new absolute allowance.
    ///
    /// The allowance is not bounded by the owner's balance — it may exceed it.
    pub fn increase_allowance(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        delta: Amount,
    ) -> Result<Amount, LedgerError> {
        if spender.is_null() {
            return Err(LedgerError::InvalidSpender);
        }
        let current = self.allowance(owner, spender);
        let updated = current
            .checked_add(delta)
            .ok_or(LedgerError::AllowanceOverflow {
                current: current.raw(),
                delta: delta.raw(),
            })?;
        self.allowances.insert((owner, spender), updated);
        self.events.emit(&TokenEvent::Approval {
            owner,
            spender,
            value: updated,
        });
        Ok(updated)
    }

    /// Lower the allowance by `delta`. Returns the new absolute allowance.
    ///
    /// The underflow check fires before the null-spender check: decreasing
    /// from a zero allowance by any positive delta reports
    /// [`LedgerError::AllowanceUnderflow`] for every spender, the null
    /// account included.
    pub fn decrease_allowance(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        delta: Amount,
    ) -> Result<Amount, LedgerError> {
        let current = self.allowance(owner, spender);
        let updated = current
            .checked_sub(delta)
            .ok_or(LedgerError::AllowanceUnderflow {
                delta: delta.raw(),
                current: current.raw(),
            })?;
        if spender.is_null() {
            return Err(LedgerError::InvalidSpender);
        }
        self.allowances.insert((owner, spender), updated);
        self.events.emit(&TokenEvent::Approval {
            owner,
            spender,
            value: updated,
        });
        Ok(updated)
    }

    /// Transfer on behalf of `from`, gated by and consuming `spender`'s
    /// allowance.
    ///
    /// The allowance check fires first; a transfer failure (bad recipient,
    /// short balance) leaves the allowance untouched.
    pub fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount.raw(),
                available: allowed.raw(),
            });
        }
        self.transfer(from, to, amount)?;
        // Cannot underflow: the allowance was checked above.
        let remaining = allowed - amount;
        self.allowances.insert((from, spender), remaining);
        self.events.emit(&TokenEvent::Approval {
            owner: from,
            spender,
            value: remaining,
        });
        Ok(())
    }

    /// Create `amount` new tokens for `to`, raising total supply.
    ///
    /// Authorization is the embedder's concern: whoever holds `&mut Ledger`
    /// can mint.
    pub fn mint(&mut self, to: AccountId, amount: Amount) -> Result<(), LedgerError> {
        if to.is_null() {
            return Err(LedgerError::InvalidRecipient);
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow {
                supply: self.total_supply.raw(),
                amount: amount.raw(),
            })?;
        self.total_supply = supply;
        self.credit(to, amount);
        self.events.emit(&TokenEvent::Transfer {
            from: AccountId::NULL,
            to,
            value: amount,
        });
        Ok(())
    }

    /// Destroy `amount` tokens held by `from`, lowering total supply.
    pub fn burn(&mut self, from: AccountId, amount: Amount) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount.raw(),
                available: available.raw(),
            });
        }
        self.debit(from, amount);
        // The burned balance is part of the supply, so this cannot underflow.
        self.total_supply = self.total_supply.saturating_sub(amount);
        self.events.emit(&TokenEvent::Transfer {
            from,
            to: AccountId::NULL,
            value: amount,
        });
        Ok(())
    }

    /// Burn on behalf of `from`, gated by and consuming `spender`'s
    /// allowance exactly as [`Ledger::transfer_from`] does.
    pub fn burn_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount.raw(),
                available: allowed.raw(),
            });
        }
        self.burn(from, amount)?;
        // Cannot underflow: the allowance was checked above.
        let remaining = allowed - amount;
        self.allowances.insert((from, spender), remaining);
        self.events.emit(&TokenEvent::Approval {
            owner: from,
            spender,
            value: remaining,
        });
        Ok(())
    }

    /// Capture the ledger state in deterministic order.
    ///
    /// Zero entries are elided: an account debited to zero snapshots the same
    /// as one never touched, so snapshot equality is exact state equality.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut balances: Vec<(AccountId, Amount)> = self
            .balances
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(account, amount)| (*account, *amount))
            .collect();
        balances.sort_by_key(|(account, _)| *account);

        let mut allowances: Vec<(AccountId, AccountId, Amount)> = self
            .allowances
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|((owner, spender), amount)| (*owner, *spender, *amount))
            .collect();
        allowances.sort_by_key(|(owner, spender, _)| (*owner, *spender));

        LedgerSnapshot {
            version: SNAPSHOT_VERSION,
            metadata: self.metadata.clone(),
            total_supply: self.total_supply,
            balances,
            allowances,
        }
    }

    /// Rebuild a ledger from a snapshot. Event subscriptions do not survive
    /// the round-trip; the restored ledger starts with an empty bus.
    pub fn restore(snapshot: LedgerSnapshot) -> Self {
        Self {
            metadata: snapshot.metadata,
            balances: snapshot.balances.into_iter().collect(),
            allowances: snapshot
                .allowances
                .into_iter()
                .map(|(owner, spender, amount)| ((owner, spender), amount))
                .collect(),
            total_supply: snapshot.total_supply,
            events: EventBus::new(),
        }
    }

    fn credit(&mut self, account: AccountId, amount: Amount) {
        let balance = self.balances.entry(account).or_insert(Amount::ZERO);
        // Cannot overflow: a balance is bounded by total supply, which the
        // mint path checks.
        *balance = *balance + amount;
    }

    fn debit(&mut self, account: AccountId, amount: Amount) {
        let balance = self.balances.entry(account).or_insert(Amount::ZERO);
        *balance = balance.saturating_sub(amount);
    }
}
