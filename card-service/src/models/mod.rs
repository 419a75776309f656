pub mod card;

pub use card::{CardRequest, CardResult, ConfirmCardForm, ConfirmRequest, CreateCardForm};
