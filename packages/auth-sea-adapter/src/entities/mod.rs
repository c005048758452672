pub mod account;
pub mod session;
pub mod user;
pub mod verification;

pub use account::Entity as Accounts;
pub use account::Model as Account;
pub use session::Entity as Sessions;
pub use session::Model as Session;
pub use user::Entity as Users;
pub use user::Model as User;
pub use verification::Entity as Verifications;
pub use verification::Model as Verification;
