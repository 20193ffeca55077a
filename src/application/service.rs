use tracing::info;

use crate::domain::{
    settle_debit, to_money, Account, AccountBook, AccountId, Debit, LoanAccount, LoanBook, Money,
    SessionState,
};
use crate::storage::{StoreConfig, StoreLock, Stores};

use super::AppError;

/// Application service implementing the ATM operations.
/// This is the primary interface for any client (CLI, tests, embedding programs).
///
/// Nothing is cached between calls: each operation locks the stores, reads
/// what it needs from disk and writes back what it changed.
pub struct LedgerService {
    stores: Stores,
}

/// The logged-in account with its outstanding loan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStatus {
    pub name: AccountId,
    pub balance: Money,
    pub owed: Money,
}

impl LedgerService {
    /// Create a new ledger service over the given stores.
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Open the stores described by `config`.
    pub fn open(config: StoreConfig) -> Self {
        Self::new(Stores::open(config))
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    // ========================
    // Session operations
    // ========================

    /// Log in, opening the account with a zero balance if it has never been seen.
    pub async fn login(&self, account_id: &str) -> Result<Account, AppError> {
        if account_id.is_empty() {
            return Err(AppError::EmptyAccountId);
        }

        let lock = self.stores.lock().await?;

        if let SessionState::LoggedIn(current) = self.session_state(&lock).await? {
            return Err(AppError::SessionAlreadyActive(current));
        }

        let account = self.find_or_create_locked(&lock, account_id).await?;
        self.stores.session.save_session(account_id).await?;

        info!(account = %account.name, balance = %account.balance, "logged in");
        Ok(account)
    }

    /// Log out whoever is logged in. Returns `None` if nobody was.
    pub async fn logout(&self) -> Result<Option<AccountId>, AppError> {
        let _lock = self.stores.lock().await?;

        let previous = SessionState::from_slot(self.stores.session.clear_session().await?);
        match previous.account() {
            Some(id) => info!(account = id, "logged out"),
            None => info!("logout requested with no active session"),
        }

        Ok(previous.into_account())
    }

    // ========================
    // Account operations
    // ========================

    /// Get an account, creating it with a zero balance if it does not exist.
    pub async fn find_or_create_account(&self, account_id: &str) -> Result<Account, AppError> {
        if account_id.is_empty() {
            return Err(AppError::EmptyAccountId);
        }

        let lock = self.stores.lock().await?;
        self.find_or_create_locked(&lock, account_id).await
    }

    /// Add `amount` to the logged-in account. Returns the new balance.
    pub async fn deposit(&self, amount: f64) -> Result<Money, AppError> {
        let amount = validate_amount(amount)?;

        let lock = self.stores.lock().await?;
        let account_id = self.require_session(&lock).await?;

        let mut accounts = self.stores.accounts.load_accounts().await?;
        let balance = accounts
            .get_mut(&account_id)
            .ok_or_else(|| AppError::AccountNotFound(account_id.clone()))?;

        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| overflow(&account_id, amount))?;
        let balance = *balance;

        self.stores.accounts.save_accounts(&accounts).await?;

        info!(account = %account_id, %amount, %balance, "deposit");
        Ok(balance)
    }

    /// Take `amount` out of the logged-in account.
    ///
    /// An overdraft is turned into a loan and the balance stops at zero.
    /// Returns the new balance.
    pub async fn withdraw(&self, amount: f64) -> Result<Money, AppError> {
        let amount = validate_amount(amount)?;

        let lock = self.stores.lock().await?;
        let account_id = self.require_session(&lock).await?;

        let mut accounts = self.stores.accounts.load_accounts().await?;
        let mut loans = self.stores.loans.load_loans().await?;

        let debit = apply_debit(&mut accounts, &mut loans, &account_id, amount)?;
        self.stores
            .save_debit(&lock, &account_id, &accounts, &loans)
            .await?;

        info!(
            account = %account_id,
            %amount,
            balance = %debit.balance,
            owed = %debit.owed,
            borrowed = %debit.borrowed,
            "withdrawal"
        );
        Ok(debit.balance)
    }

    /// Move `amount` from the logged-in account to `destination_id`.
    ///
    /// Both accounts must already exist. An overdraft on the sending side is
    /// turned into a loan exactly as for a withdrawal. Returns the sender's
    /// new balance.
    pub async fn transfer(&self, destination_id: &str, amount: f64) -> Result<Money, AppError> {
        let amount = validate_amount(amount)?;

        let lock = self.stores.lock().await?;
        let origin_id = self.require_session(&lock).await?;

        if origin_id == destination_id {
            return Err(AppError::SelfTransfer(origin_id));
        }

        let mut accounts = self.stores.accounts.load_accounts().await?;
        let mut loans = self.stores.loans.load_loans().await?;

        if !accounts.contains_key(&origin_id) {
            return Err(AppError::AccountNotFound(origin_id));
        }
        let credited = accounts
            .get(destination_id)
            .ok_or_else(|| AppError::AccountNotFound(destination_id.to_string()))?
            .checked_add(amount)
            .ok_or_else(|| overflow(destination_id, amount))?;

        let debit = apply_debit(&mut accounts, &mut loans, &origin_id, amount)?;
        accounts.insert(destination_id.to_string(), credited);

        self.stores
            .save_debit(&lock, &origin_id, &accounts, &loans)
            .await?;

        info!(
            from = %origin_id,
            to = destination_id,
            %amount,
            balance = %debit.balance,
            owed = %debit.owed,
            borrowed = %debit.borrowed,
            "transfer"
        );
        Ok(debit.balance)
    }

    // ========================
    // Queries
    // ========================

    /// Balance and debt of the logged-in account, or `None` when logged out.
    pub async fn status(&self) -> Result<Option<AccountStatus>, AppError> {
        let lock = self.stores.lock().await?;

        let Some(account_id) = self.session_state(&lock).await?.into_account() else {
            return Ok(None);
        };

        let accounts = self.stores.accounts.load_accounts().await?;
        let loans = self.stores.loans.load_loans().await?;

        let account = Account::find(&accounts, &account_id)
            .ok_or_else(|| AppError::AccountNotFound(account_id.clone()))?;

        Ok(Some(AccountStatus {
            owed: LoanAccount::find(&loans, &account_id).owed,
            name: account.name,
            balance: account.balance,
        }))
    }

    /// Outstanding loan for any account. Zero when nothing is on record.
    pub async fn loan(&self, account_id: &str) -> Result<Money, AppError> {
        let _lock = self.stores.lock().await?;
        let loans = self.stores.loans.load_loans().await?;
        Ok(LoanAccount::find(&loans, account_id).owed)
    }

    // ========================
    // Helpers (caller holds the lock)
    // ========================

    async fn session_state(&self, _lock: &StoreLock) -> Result<SessionState, AppError> {
        Ok(SessionState::from_slot(
            self.stores.session.load_session().await?,
        ))
    }

    async fn require_session(&self, lock: &StoreLock) -> Result<AccountId, AppError> {
        self.session_state(lock)
            .await?
            .into_account()
            .ok_or(AppError::NotLoggedIn)
    }

    async fn find_or_create_locked(
        &self,
        _lock: &StoreLock,
        account_id: &str,
    ) -> Result<Account, AppError> {
        let mut accounts = self.stores.accounts.load_accounts().await?;

        if let Some(account) = Account::find(&accounts, account_id) {
            return Ok(account);
        }

        accounts.insert(account_id.to_string(), Money::ZERO);
        self.stores.accounts.save_accounts(&accounts).await?;

        info!(account = account_id, "opened account");
        Ok(Account::new(account_id, Money::ZERO))
    }
}

fn validate_amount(amount: f64) -> Result<Money, AppError> {
    to_money(amount).ok_or_else(|| AppError::InvalidAmount(amount.to_string()))
}

fn overflow(account_id: &str, amount: Money) -> AppError {
    AppError::InvalidAmount(format!(
        "{} would overflow the balance of {}",
        amount, account_id
    ))
}

/// Debit `account_id` in memory, moving any overdraft into `loans`.
/// An existing loan is left exactly as it was unless new debt is added.
fn apply_debit(
    accounts: &mut AccountBook,
    loans: &mut LoanBook,
    account_id: &str,
    amount: Money,
) -> Result<Debit, AppError> {
    let balance = *accounts
        .get(account_id)
        .ok_or_else(|| AppError::AccountNotFound(account_id.to_string()))?;
    let loan = LoanAccount::find(loans, account_id);

    let debit =
        settle_debit(balance, amount, loan.owed).ok_or_else(|| overflow(account_id, amount))?;

    accounts.insert(account_id.to_string(), debit.balance);
    if debit.borrowed > Money::ZERO {
        loans.insert(loan.id, debit.owed);
    }

    Ok(debit)
}
