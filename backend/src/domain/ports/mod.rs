//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`UserOnboarding`, `LoginService`, `WeightLedger`,
//! `CatalogueCommand`, `CatalogueQuery`, `SocialCommand`) are what inbound
//! adapters call. Driven ports (repositories, the password hasher and the
//! invitation mailer) are what the domain services call; each exposes a
//! strongly typed error enum so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod catalogue_command;
mod catalogue_query;
mod catalogue_repository;
mod invitation_mailer;
mod listing_repository;
mod login_service;
mod password_hasher;
mod social_command;
mod social_repository;
mod user_onboarding;
mod weight_ledger;
mod weight_repository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{
    AccountRepository, AccountRepositoryError, NewAccount, StoredCredentials,
};
pub use catalogue_command::CatalogueCommand;
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
#[cfg(test)]
pub use invitation_mailer::MockInvitationMailer;
pub use invitation_mailer::{
    FixtureInvitationMailer, InvitationMailer, InvitationMailerError,
};
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{ListingRepository, ListingRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
pub use social_command::SocialCommand;
#[cfg(test)]
pub use social_repository::MockSocialRepository;
pub use social_repository::{SocialRepository, SocialRepositoryError};
pub use user_onboarding::{IssuedInvitation, RegistrationReceipt, UserOnboarding};
pub use weight_ledger::WeightLedger;
#[cfg(test)]
pub use weight_repository::MockWeightRepository;
pub use weight_repository::{WeightRepository, WeightRepositoryError};

#[cfg(test)]
mod tests;
