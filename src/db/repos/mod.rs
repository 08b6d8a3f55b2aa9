pub mod activities;
pub mod campaigns;
pub mod collection;
pub mod kv;
pub mod leads;
pub mod users;
pub mod videos;
