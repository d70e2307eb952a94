pub mod deed;
pub mod forms;
pub mod health;
pub mod session;

pub use deed::{BorrowerValidation, Deed};
pub use forms::{
    AuthCodeForm, BorrowerReferenceForm, DateOfBirthForm, FormData, NetworkAgreementForm,
    ValidatedForm,
};
pub use health::ServiceHealthEntry;
pub use session::{BorrowerSession, SessionState};
