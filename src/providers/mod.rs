pub mod seb_avista;
pub mod seb_spot;
