//! The wrapper state machine — custody on one ledger, issuance on the other.

use crate::error::WrapError;
use ingot_ledger::{Ledger, LedgerError, TokenEvent, UnderlyingToken};
use ingot_types::{AccountId, Amount, TokenMetadata};

/// Issues a wrapped token 1:1 against custody of an underlying token.
///
/// The wrapper owns its wrapped-token [`Ledger`] exclusively and never hands
/// out a mutable reference, so `mint`/`burn` on the wrapped token are
/// reachable only through [`Wrapper::wrap`] and [`Wrapper::unwrap`] — that
/// ownership is the mint authorization. The underlying token is external and
/// only referenced; the wrapper touches it solely through its `transfer` /
/// `transfer_from` operations, under the `custody` account identity that
/// holders pre-approve for wrapping.
pub struct Wrapper<U: UnderlyingToken> {
    ledger: Ledger,
    underlying: U,
    custody: AccountId,
}

impl<U: UnderlyingToken> Wrapper<U> {
    /// Create a wrapper with an empty wrapped-token ledger.
    ///
    /// # Panics
    /// Panics if `custody` is the null account — it would collide with the
    /// mint/burn sentinel on the underlying ledger.
    pub fn new(metadata: TokenMetadata, underlying: U, custody: AccountId) -> Self {
        assert!(
            !custody.is_null(),
            "custody account must not be the null account"
        );
        Self {
            ledger: Ledger::new(metadata),
            underlying,
            custody,
        }
    }

    /// Identity of the configured underlying token.
    pub fn underlying_token(&self) -> AccountId {
        self.underlying.token_id()
    }

    /// The wrapper's own account on the underlying ledger.
    pub fn custody_account(&self) -> AccountId {
        self.custody
    }

    /// The wrapper's balance on the underlying ledger. Equals the wrapped
    /// total supply for a correctly operating wrapper.
    pub fn custody_balance(&self) -> Amount {
        self.underlying.balance_of(self.custody)
    }

    /// Shared view of the wrapped-token ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Shared view of the underlying collaborator.
    pub fn underlying(&self) -> &U {
        &self.underlying
    }

    pub fn metadata(&self) -> &TokenMetadata {
        self.ledger.metadata()
    }

    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.ledger.balance_of(account)
    }

    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.ledger.allowance(owner, spender)
    }

    /// Register a listener for wrapped-token events.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&TokenEvent) + Send + Sync>) {
        self.ledger.subscribe(listener);
    }

    /// Pull `amount` of underlying from `holder` into custody and mint the
    /// same amount of wrapped tokens to `holder`.
    ///
    /// Requires `holder` to have pre-granted the custody account an
    /// allowance of at least `amount` on the underlying ledger; the
    /// underlying's own failures (short balance, short allowance) propagate
    /// as [`WrapError::UnderlyingTransferFailed`].
    pub fn wrap(&mut self, holder: AccountId, amount: Amount) -> Result<(), WrapError> {
        // Mint preconditions are validated before the underlying moves, so
        // the mint below cannot fail and the pull is never left unmatched.
        if holder.is_null() {
            return Err(LedgerError::InvalidRecipient.into());
        }
        let supply = self.ledger.total_supply();
        if supply.checked_add(amount).is_none() {
            return Err(LedgerError::SupplyOverflow {
                supply: supply.raw(),
                amount: amount.raw(),
            }
            .into());
        }
        self.underlying
            .transfer_from(self.custody, holder, self.custody, amount)
            .map_err(WrapError::UnderlyingTransferFailed)?;
        self.ledger.mint(holder, amount)?;
        tracing::debug!(holder = %holder, amount = %amount, "wrapped");
        Ok(())
    }

    /// Burn `amount` of `holder`'s wrapped tokens and push the same amount
    /// of underlying from custody back to `holder`. The exact inverse of
    /// [`Wrapper::wrap`].
    pub fn unwrap(&mut self, holder: AccountId, amount: Amount) -> Result<(), WrapError> {
        let held = self.ledger.balance_of(holder);
        if held < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount.raw(),
                available: held.raw(),
            }
            .into());
        }
        self.push_underlying(holder, amount)?;
        self.ledger.burn(holder, amount)?;
        tracing::debug!(holder = %holder, amount = %amount, "unwrapped");
        Ok(())
    }

    /// Unwrap on behalf of `holder`, gated by and consuming `spender`'s
    /// burn allowance on the wrapped ledger. The allowance check fires
    /// first, exactly as `burn_from` orders its checks.
    pub fn unwrap_from(
        &mut self,
        spender: AccountId,
        holder: AccountId,
        amount: Amount,
    ) -> Result<(), WrapError> {
        let allowed = self.ledger.allowance(holder, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount.raw(),
                available: allowed.raw(),
            }
            .into());
        }
        let held = self.ledger.balance_of(holder);
        if held < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount.raw(),
                available: held.raw(),
            }
            .into());
        }
        self.push_underlying(holder, amount)?;
        self.ledger.burn_from(spender, holder, amount)?;
        tracing::debug!(spender = %spender, holder = %holder, amount = %amount, "unwrapped via allowance");
        Ok(())
    }

    /// Transfer wrapped tokens. Pass-through to the wrapped ledger.
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.ledger.transfer(from, to, amount)
    }

    /// Approve a spender on the wrapped ledger.
    pub fn approve(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.ledger.approve(owner, spender, amount)
    }

    pub fn increase_allowance(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        delta: Amount,
    ) -> Result<Amount, LedgerError> {
        self.ledger.increase_allowance(owner, spender, delta)
    }

    pub fn decrease_allowance(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        delta: Amount,
    ) -> Result<Amount, LedgerError> {
        self.ledger.decrease_allowance(owner, spender, delta)
    }

    /// Transfer wrapped tokens on behalf of `from`. Pass-through to the
    /// wrapped ledger.
    ///
    /// There is deliberately no `burn` pass-through: destroying wrapped
    /// tokens without releasing custody would strand underlying value and
    /// break the supply/custody equality.
    pub fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.ledger.transfer_from(spender, from, to, amount)
    }

    fn push_underlying(&mut self, holder: AccountId, amount: Amount) -> Result<(), WrapError> {
        self.underlying
            .transfer(self.custody, holder, amount)
            .map_err(|err| {
                // Unreachable while custody equals wrapped supply; report it,
                // never assume it.
                tracing::error!(
                    error = %err,
                    holder = %holder,
                    amount = %amount,
                    "custody push refused by underlying — supply/custody invariant breached"
                );
                WrapError::UnderlyingTransferFailed(err)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingot_ledger::UnderlyingError;
    use ingot_nullables::{LedgerUnderlying, NullUnderlying};

    fn acct(n: u8) -> AccountId {
        AccountId::new([n; 32])
    }

    fn amt(raw: u128) -> Amount {
        Amount::new(raw)
    }

    const UNDERLYING_ID: u8 = 0xEE;
    const CUSTODY: u8 = 0xCC;

    fn wrapped_metadata() -> TokenMetadata {
        TokenMetadata::new("Wrapped Gold", "wGLD", 18)
    }

    /// A wrapper over a functional in-memory underlying, with `holder`
    /// funded and the custody account approved for `approved`.
    fn funded_wrapper(
        holder: AccountId,
        funded: Amount,
        approved: Amount,
    ) -> Wrapper<LedgerUnderlying> {
        let mut underlying =
            LedgerUnderlying::new(acct(UNDERLYING_ID), TokenMetadata::new("Gold", "GLD", 18));
        underlying.mint(holder, funded).unwrap();
        underlying.approve(holder, acct(CUSTODY), approved).unwrap();
        Wrapper::new(wrapped_metadata(), underlying, acct(CUSTODY))
    }

    #[test]
    fn underlying_token_reports_configured_identity() {
        let wrapper = funded_wrapper(acct(1), amt(0), amt(0));
        assert_eq!(wrapper.underlying_token(), acct(UNDERLYING_ID));
        assert_eq!(wrapper.custody_account(), acct(CUSTODY));
    }

    #[test]
    #[should_panic(expected = "custody account")]
    fn null_custody_account_is_refused() {
        let underlying =
            LedgerUnderlying::new(acct(UNDERLYING_ID), TokenMetadata::new("Gold", "GLD", 18));
        let _ = Wrapper::new(wrapped_metadata(), underlying, AccountId::NULL);
    }

    #[test]
    fn wrap_moves_underlying_into_custody_and_mints() {
        let holder = acct(1);
        let mut wrapper = funded_wrapper(holder, amt(100), amt(50));

        wrapper.wrap(holder, amt(50)).unwrap();

        assert_eq!(wrapper.underlying().balance_of(holder), amt(50));
        assert_eq!(wrapper.custody_balance(), amt(50));
        assert_eq!(wrapper.balance_of(holder), amt(50));
        assert_eq!(wrapper.total_supply(), amt(50));
    }

    #[test]
    fn wrap_without_allowance_fails_with_underlying_reason() {
        let holder = acct(1);
        let mut wrapper = funded_wrapper(holder, amt(100), amt(0));

        let err = wrapper.wrap(holder, amt(1)).unwrap_err();
        assert_eq!(
            err,
            WrapError::UnderlyingTransferFailed(UnderlyingError::InsufficientAllowance {
                needed: 1,
                available: 0,
            })
        );
        assert_eq!(wrapper.total_supply(), Amount::ZERO);
        assert_eq!(wrapper.underlying().balance_of(holder), amt(100));
    }

    #[test]
    fn wrap_beyond_underlying_balance_fails_and_mutates_nothing() {
        let holder = acct(1);
        let mut wrapper = funded_wrapper(holder, amt(100), amt(200));

        let err = wrapper.wrap(holder, amt(101)).unwrap_err();
        assert_eq!(
            err,
            WrapError::UnderlyingTransferFailed(UnderlyingError::InsufficientBalance {
                needed: 101,
                available: 100,
            })
        );
        assert_eq!(wrapper.balance_of(holder), Amount::ZERO);
        assert_eq!(wrapper.custody_balance(), Amount::ZERO);
        // The underlying allowance was not consumed either.
        assert_eq!(
            wrapper.underlying().allowance(holder, acct(CUSTODY)),
            amt(200)
        );
    }

    #[test]
    fn wrap_to_null_holder_is_rejected_before_touching_underlying() {
        let holder = acct(1);
        let mut wrapper = funded_wrapper(holder, amt(100), amt(100));

        let err = wrapper.wrap(AccountId::NULL, amt(10)).unwrap_err();
        assert_eq!(err, WrapError::Ledger(LedgerError::InvalidRecipient));
        assert_eq!(wrapper.underlying().balance_of(holder), amt(100));
        assert_eq!(wrapper.custody_balance(), Amount::ZERO);
    }

    #[test]
    fn unwrap_burns_and_returns_underlying() {
        let holder = acct(1);
        let mut wrapper = funded_wrapper(holder, amt(100), amt(50));
        wrapper.wrap(holder, amt(50)).unwrap();

        wrapper.unwrap(holder, amt(50)).unwrap();

        assert_eq!(wrapper.underlying().balance_of(holder), amt(100));
        assert_eq!(wrapper.custody_balance(), Amount::ZERO);
        assert_eq!(wrapper.balance_of(holder), Amount::ZERO);
        assert_eq!(wrapper.total_supply(), Amount::ZERO);
    }

    #[test]
    fn unwrap_more_than_held_fails_before_any_underlying_movement() {
        let holder = acct(1);
        let mut wrapper = funded_wrapper(holder, amt(100), amt(50));
        wrapper.wrap(holder, amt(50)).unwrap();

        let err = wrapper.unwrap(holder, amt(51)).unwrap_err();
        assert_eq!(
            err,
            WrapError::Ledger(LedgerError::InsufficientBalance {
                needed: 51,
                available: 50,
            })
        );
        assert_eq!(wrapper.custody_balance(), amt(50));
        assert_eq!(wrapper.balance_of(holder), amt(50));
    }

    #[test]
    fn unwrap_by_stranger_fails_on_their_own_empty_balance() {
        let holder = acct(1);
        let stranger = acct(2);
        let mut wrapper = funded_wrapper(holder, amt(100), amt(50));
        wrapper.wrap(holder, amt(50)).unwrap();

        // The stranger holds no wrapped tokens; unwrapping their own balance
        // fails, and the holder's tokens are untouched.
        let err = wrapper.unwrap(stranger, amt(1)).unwrap_err();
        assert_eq!(
            err,
            WrapError::Ledger(LedgerError::InsufficientBalance {
                needed: 1,
                available: 0,
            })
        );
        assert_eq!(wrapper.balance_of(holder), amt(50));
    }

    #[test]
    fn unwrap_from_consumes_burn_allowance() {
        let holder = acct(1);
        let operator = acct(2);
        let mut wrapper = funded_wrapper(holder, amt(100), amt(60));
        wrapper.wrap(holder, amt(60)).unwrap();
        wrapper.approve(holder, operator, amt(40)).unwrap();

        wrapper.unwrap_from(operator, holder, amt(30)).unwrap();

        assert_eq!(wrapper.balance_of(holder), amt(30));
        assert_eq!(wrapper.allowance(holder, operator), amt(10));
        assert_eq!(wrapper.underlying().balance_of(holder), amt(70));
        assert_eq!(wrapper.custody_balance(), amt(30));
    }

    #[test]
    fn unwrap_from_without_allowance_fails() {
        let holder = acct(1);
        let operator = acct(2);
        let mut wrapper = funded_wrapper(holder, amt(100), amt(60));
        wrapper.wrap(holder, amt(60)).unwrap();

        let err = wrapper.unwrap_from(operator, holder, amt(30)).unwrap_err();
        assert_eq!(
            err,
            WrapError::Ledger(LedgerError::InsufficientAllowance {
                needed: 30,
                available: 0,
            })
        );
        assert_eq!(wrapper.balance_of(holder), amt(60));
        assert_eq!(wrapper.custody_balance(), amt(60));
    }

    #[test]
    fn unwrap_from_allowance_check_precedes_balance_check() {
        let holder = acct(1);
        let operator = acct(2);
        let mut wrapper = funded_wrapper(holder, amt(100), amt(10));
        wrapper.wrap(holder, amt(10)).unwrap();
        wrapper.approve(holder, operator, amt(5)).unwrap();

        let err = wrapper.unwrap_from(operator, holder, amt(20)).unwrap_err();
        assert_eq!(
            err,
            WrapError::Ledger(LedgerError::InsufficientAllowance {
                needed: 20,
                available: 5,
            })
        );
    }

    #[test]
    fn defensive_custody_push_failure_leaves_wrapped_ledger_intact() {
        let holder = acct(1);
        let mut wrapper = funded_wrapper(holder, amt(100), amt(50));
        wrapper.wrap(holder, amt(50)).unwrap();

        // Simulate out-of-band custody loss on the underlying ledger: the
        // supply/custody equality is now breached externally.
        wrapper
            .underlying
            .ledger_mut()
            .burn(acct(CUSTODY), amt(20))
            .unwrap();

        let err = wrapper.unwrap(holder, amt(50)).unwrap_err();
        assert_eq!(
            err,
            WrapError::UnderlyingTransferFailed(UnderlyingError::InsufficientBalance {
                needed: 50,
                available: 30,
            })
        );
        // The wrapped ledger saw no mutation: balances and supply unchanged.
        assert_eq!(wrapper.balance_of(holder), amt(50));
        assert_eq!(wrapper.total_supply(), amt(50));
        // What remains in custody is still redeemable.
        wrapper.unwrap(holder, amt(30)).unwrap();
        assert_eq!(wrapper.balance_of(holder), amt(20));
    }

    #[test]
    fn scripted_underlying_rejection_propagates_verbatim() {
        let mut underlying = NullUnderlying::new(acct(UNDERLYING_ID));
        underlying.fail_transfer_from_with(UnderlyingError::Rejected("paused".into()));
        let mut wrapper = Wrapper::new(wrapped_metadata(), underlying, acct(CUSTODY));

        let err = wrapper.wrap(acct(1), amt(10)).unwrap_err();
        assert_eq!(
            err,
            WrapError::UnderlyingTransferFailed(UnderlyingError::Rejected("paused".into()))
        );
        assert_eq!(wrapper.total_supply(), Amount::ZERO);
    }

    #[test]
    fn wrap_supply_overflow_is_rejected_before_the_pull() {
        let holder = acct(1);
        // Scripted underlying: the pull would succeed, but the supply check
        // must fire first.
        let underlying = NullUnderlying::new(acct(UNDERLYING_ID));
        let mut wrapper = Wrapper::new(wrapped_metadata(), underlying, acct(CUSTODY));
        wrapper.wrap(holder, amt(u128::MAX)).unwrap();

        let err = wrapper.wrap(holder, amt(1)).unwrap_err();
        assert_eq!(
            err,
            WrapError::Ledger(LedgerError::SupplyOverflow {
                supply: u128::MAX,
                amount: 1,
            })
        );
    }

    #[test]
    fn wrapped_tokens_transfer_like_any_token() {
        let holder = acct(1);
        let other = acct(2);
        let mut wrapper = funded_wrapper(holder, amt(100), amt(100));
        wrapper.wrap(holder, amt(100)).unwrap();

        wrapper.transfer(holder, other, amt(40)).unwrap();
        assert_eq!(wrapper.balance_of(holder), amt(60));
        assert_eq!(wrapper.balance_of(other), amt(40));

        // The recipient can unwrap what they received.
        wrapper.unwrap(other, amt(40)).unwrap();
        assert_eq!(wrapper.underlying().balance_of(other), amt(40));
        assert_eq!(wrapper.total_supply(), amt(60));
        assert_eq!(wrapper.custody_balance(), amt(60));
    }
}
