//! Nullable underlying tokens.

use std::collections::HashMap;

use ingot_ledger::{Ledger, LedgerError, UnderlyingError, UnderlyingToken};
use ingot_types::{AccountId, Amount, TokenMetadata};

/// A fully functional in-memory underlying token, backed by a [`Ledger`].
///
/// Behaves like a real external token — balances, allowances and both
/// transfer shapes all work — so wrap/unwrap flows can be exercised
/// end-to-end without any transport. Test setup goes through
/// [`LedgerUnderlying::mint`] and [`LedgerUnderlying::approve`];
/// out-of-band custody manipulation (for defensive-path tests) goes through
/// [`LedgerUnderlying::ledger_mut`].
pub struct LedgerUnderlying {
    id: AccountId,
    ledger: Ledger,
}

impl LedgerUnderlying {
    pub fn new(id: AccountId, metadata: TokenMetadata) -> Self {
        Self {
            id,
            ledger: Ledger::new(metadata),
        }
    }

    /// Mint underlying tokens to `to` (test setup).
    pub fn mint(&mut self, to: AccountId, amount: Amount) -> Result<(), LedgerError> {
        self.ledger.mint(to, amount)
    }

    /// Grant `spender` an allowance from `owner` (test setup; in production
    /// the holder grants this to the wrapper before calling wrap).
    pub fn approve(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.ledger.approve(owner, spender, amount)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }
}

impl UnderlyingToken for LedgerUnderlying {
    fn token_id(&self) -> AccountId {
        self.id
    }

    fn balance_of(&self, account: AccountId) -> Amount {
        self.ledger.balance_of(account)
    }

    fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.ledger.allowance(owner, spender)
    }

    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), UnderlyingError> {
        self.ledger.transfer(from, to, amount)?;
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), UnderlyingError> {
        self.ledger.transfer_from(spender, from, to, amount)?;
        Ok(())
    }
}

/// A scripted underlying token for exercising failure paths.
///
/// Balances are fixed at construction and never move; transfers succeed or
/// fail according to the configured script. Useful for driving paths a
/// functional implementation cannot reach on demand, such as the wrapper's
/// defensive handling of a rejected custody push.
pub struct NullUnderlying {
    id: AccountId,
    balances: HashMap<AccountId, Amount>,
    fail_transfer: Option<UnderlyingError>,
    fail_transfer_from: Option<UnderlyingError>,
}

impl NullUnderlying {
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            balances: HashMap::new(),
            fail_transfer: None,
            fail_transfer_from: None,
        }
    }

    /// Fix the reported balance of `account`.
    pub fn set_balance(&mut self, account: AccountId, amount: Amount) {
        self.balances.insert(account, amount);
    }

    /// Make every `transfer` (custody push) fail with `err`.
    pub fn fail_transfer_with(&mut self, err: UnderlyingError) {
        self.fail_transfer = Some(err);
    }

    /// Make every `transfer_from` (custody pull) fail with `err`.
    pub fn fail_transfer_from_with(&mut self, err: UnderlyingError) {
        self.fail_transfer_from = Some(err);
    }
}

impl UnderlyingToken for NullUnderlying {
    fn token_id(&self) -> AccountId {
        self.id
    }

    fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    fn allowance(&self, _owner: AccountId, _spender: AccountId) -> Amount {
        Amount::ZERO
    }

    fn transfer(
        &mut self,
        _from: AccountId,
        _to: AccountId,
        _amount: Amount,
    ) -> Result<(), UnderlyingError> {
        match &self.fail_transfer {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn transfer_from(
        &mut self,
        _spender: AccountId,
        _from: AccountId,
        _to: AccountId,
        _amount: Amount,
    ) -> Result<(), UnderlyingError> {
        match &self.fail_transfer_from {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
