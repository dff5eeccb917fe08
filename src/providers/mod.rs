// Providers: leaf components the coordinators compose.
pub mod clock;
pub mod crypto_provider;
pub mod notification_provider;
pub mod password_validator_provider;
pub mod token_provider;

pub use clock::{Clock, ManualClock, SystemClock};
pub use crypto_provider::CryptoProvider;
pub use notification_provider::{InMemoryNotifier, LogNotifier, NotificationKind, Notifier};
pub use password_validator_provider::{PasswordPolicy, PasswordValidatorProvider};
pub use token_provider::{TokenProvider, TokenSettings};
