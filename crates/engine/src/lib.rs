pub use category::{ExpenseCategory, IncomeType};
pub use currency::Currency;
pub use error::EngineError;
pub use ops::{CurrencyTotals, Engine, EngineBuilder, GroupTotal, MonthlySummary};
pub use settings::{
    DataRetention, DateFormat, Language, Notifications, Settings, SettingsPatch, Theme,
};
pub use transaction::{Transaction, TransactionKind};
pub use user::{ExternalIdentity, User};
pub use validate::{ExpenseDraft, IncomeDraft, TransactionDraft, TransactionPatch};

mod category;
mod currency;
mod error;
mod ops;
mod settings;
mod transaction;
mod user;
mod user_transactions;
mod util;
mod validate;

pub type ResultEngine<T> = Result<T, EngineError>;
