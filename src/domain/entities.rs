pub mod consultation;
pub mod email;
