//! Abuse-resistant one-time code issuance and validation

pub mod email;
pub mod issuer;
pub mod store;
pub mod validator;

pub use email::{EmailSender, TracingEmailSender};
pub use issuer::{IssueReceipt, VerificationIssuer};
pub use store::{CodeStore, InMemoryCodeStore, VerificationCode};
pub use validator::VerificationValidator;
