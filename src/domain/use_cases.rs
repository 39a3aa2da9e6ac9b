pub mod consultation;
