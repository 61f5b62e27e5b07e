pub mod chat;
pub mod doctor;
pub mod inspect;
pub mod onboard;
